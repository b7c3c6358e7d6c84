//! Route Table - page identifier to template identifier mapping.
//!
//! Pure lookup, no state beyond the registered pairs. Populated while the
//! engine is being built and immutable afterwards; an unknown page resolves
//! to the designated default.

use std::collections::HashMap;

/// Fallback page identifier used when a lookup misses.
pub const DEFAULT_PAGE: &str = "home";

/// Static mapping from page identifier to content-template identifier.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<String, String>,
    default_page: String,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            default_page: DEFAULT_PAGE.to_string(),
        }
    }

    /// Override the designated default page identifier.
    pub fn with_default(mut self, page: impl Into<String>) -> Self {
        self.default_page = page.into();
        self
    }

    /// Register a `(page, template)` pair. Re-registering a page replaces
    /// its template.
    pub fn add(&mut self, page: impl Into<String>, template: impl Into<String>) {
        self.routes.insert(page.into(), template.into());
    }

    pub fn contains(&self, page: &str) -> bool {
        self.routes.contains_key(page)
    }

    /// Resolve a requested page identifier, substituting the default for
    /// unknown pages. The substitution is silent: unknown identifiers are
    /// not an error at this layer.
    pub fn resolve<'a>(&'a self, page: &'a str) -> &'a str {
        if self.routes.contains_key(page) {
            page
        } else {
            &self.default_page
        }
    }

    /// Template identifier for a page, without default substitution.
    pub fn template(&self, page: &str) -> Option<&str> {
        self.routes.get(page).map(String::as_str)
    }

    pub fn default_page(&self) -> &str {
        &self.default_page
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_pages() {
        let mut routes = RouteTable::new();
        routes.add("faq", "faq-template");

        assert_eq!(routes.resolve("faq"), "faq");
        assert_eq!(routes.template("faq"), Some("faq-template"));
    }

    #[test]
    fn unknown_page_falls_back_to_default() {
        let mut routes = RouteTable::new();
        routes.add("home", "home-template");

        assert_eq!(routes.resolve("nope"), "home");
        assert_eq!(routes.template("nope"), None);
    }

    #[test]
    fn custom_default_page() {
        let mut routes = RouteTable::new().with_default("landing");
        routes.add("landing", "landing-template");

        assert_eq!(routes.resolve("missing"), "landing");
        assert_eq!(routes.default_page(), "landing");
    }

    #[test]
    fn re_registration_replaces_template() {
        let mut routes = RouteTable::new();
        routes.add("shop", "old-template");
        routes.add("shop", "new-template");

        assert_eq!(routes.len(), 1);
        assert_eq!(routes.template("shop"), Some("new-template"));
    }
}
