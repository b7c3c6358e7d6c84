//! # Engine: Serialized Page Transitions
//!
//! The `Engine` owns the navigation state and drives the two-phase content
//! replacement: fade out, swap, fade in. At most one transition is ever in
//! flight; requests arriving mid-transition coalesce into a single pending
//! slot (last-write-wins) that is drained once the running transition
//! completes. There is no cancellation: a started transition always runs to
//! completion.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::Instrument;

use hashnav_core::media::GestureSource;
use hashnav_core::{Host, NavState, PageLoaded, Phase, RouteTable, TransitionTiming};

use crate::media;

/// Page-specific initializer invoked after a swap into its page, after
/// embedded scripts execute and before the page-loaded event.
pub type PageHook<H> = Box<dyn Fn(&mut H) + Send + Sync>;

/// How many page-loaded events may sit unread per subscriber before the
/// oldest is dropped.
const EVENT_CAPACITY: usize = 16;

struct Inner<H: Host> {
    host: H,
    nav: NavState,
}

/// The transition state machine.
///
/// Construct through [`Engine::builder`]; routes and page hooks are
/// registered there and frozen once the engine exists. The engine is shared
/// behind an `Arc` so the timed driver task and the boundary adapter see the
/// same state.
pub struct Engine<H: Host> {
    routes: RouteTable,
    timing: TransitionTiming,
    hooks: HashMap<String, PageHook<H>>,
    inner: Mutex<Inner<H>>,
    events: broadcast::Sender<PageLoaded>,
}

impl<H: Host> Engine<H> {
    pub fn builder(host: H) -> EngineBuilder<H> {
        EngineBuilder {
            host,
            routes: RouteTable::new(),
            timing: TransitionTiming::default(),
            hooks: HashMap::new(),
        }
    }

    /// Subscribe to page-loaded events. Any number of subscribers may exist.
    pub fn subscribe(&self) -> broadcast::Receiver<PageLoaded> {
        self.events.subscribe()
    }

    pub fn current_page(&self) -> String {
        self.inner.lock().nav.current.clone()
    }

    pub fn in_transition(&self) -> bool {
        self.inner.lock().nav.in_transition
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn timing(&self) -> &TransitionTiming {
        &self.timing
    }

    /// Record a navigation request while a transition is in flight,
    /// overwriting any previously queued one. The in-flight check and the
    /// queue write happen under one lock, so a transition completing
    /// concurrently cannot swallow the request.
    ///
    /// Returns whether the request was queued; `false` means the engine is
    /// idle and the caller should navigate itself.
    pub fn queue_pending(&self, page: &str) -> bool {
        let mut inner = self.inner.lock();
        if !inner.nav.in_transition {
            return false;
        }
        inner.nav.queue_pending(page);
        true
    }

    /// Update the active-link indicator. The indicator may run ahead of the
    /// actual content while a transition is in flight.
    pub fn set_active_link(&self, page: &str) {
        self.inner.lock().host.set_active_link(page);
    }

    /// Current fragment, falling back to the default page when the fragment
    /// is absent or empty.
    pub fn fragment_or_default(&self) -> String {
        self.inner
            .lock()
            .host
            .read_fragment()
            .filter(|fragment| !fragment.is_empty())
            .unwrap_or_else(|| self.routes.default_page().to_string())
    }

    /// Run a closure against the host surface. Intended for embedders that
    /// need page access outside a transition, and for tests.
    pub fn with_host<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        f(&mut self.inner.lock().host)
    }

    /// The URL-mutating entry point: push the fragment, adopt the page as
    /// current, load its content, and move the active-link indicator.
    pub fn navigate(self: &Arc<Self>, page: &str) {
        {
            let mut inner = self.inner.lock();
            inner.host.push_fragment(page);
            inner.nav.current = page.to_string();
        }
        self.request_load(page);
        self.inner.lock().host.set_active_link(page);
    }

    /// Adopt `page` as current and load its content without touching the
    /// fragment. Used when the platform already moved the fragment
    /// (back/forward navigation) and at startup.
    pub fn load_in_place(self: &Arc<Self>, page: &str) {
        self.inner.lock().nav.current = page.to_string();
        self.request_load(page);
    }

    /// Start a transition to `page`, resolving unknown identifiers to the
    /// default page.
    ///
    /// No-op while a transition is already in flight; re-entrant requests
    /// belong in the pending slot (see [`Engine::queue_pending`]), not here.
    pub fn request_load(self: &Arc<Self>, page: &str) {
        let (resolved, content) = {
            let mut inner = self.inner.lock();
            if inner.nav.in_transition {
                tracing::debug!(page, "load refused, transition already in flight");
                return;
            }
            inner.nav.in_transition = true;
            inner.nav.clear_pending();

            let resolved = self.routes.resolve(page).to_string();
            let content = self
                .routes
                .template(&resolved)
                .and_then(|template_id| inner.host.clone_template(template_id));
            let Some(content) = content else {
                // Missing template content stalls the transition with the
                // in-flight flag still set. Deliberately not recovered; see
                // DESIGN.md before hardening.
                tracing::warn!(page = %resolved, "template content missing, transition stalled");
                return;
            };

            inner.host.set_loading(true);
            inner.host.set_phase(Phase::Exiting);
            (resolved, content)
        };

        let span = tracing::info_span!(
            "transition",
            id = %uuid::Uuid::new_v4(),
            page = %resolved,
        );
        let engine = Arc::clone(self);
        tokio::spawn(engine.run_transition(resolved, content).instrument(span));
    }

    /// Drive one transition to completion: exit phase, swap, enter phase,
    /// then drain at most one queued request.
    async fn run_transition(self: Arc<Self>, page: String, content: H::Content) {
        tokio::time::sleep(self.timing.exit).await;

        {
            let mut inner = self.inner.lock();
            inner.host.set_loading(false);
            inner.host.swap_content(content);
            inner.host.set_phase(Phase::Entering);

            // Cloned template scripts are inert on every platform; rebuild
            // each one so it actually executes.
            for script in inner.host.take_inert_scripts() {
                inner.host.instantiate_script(script);
            }

            media::ensure_playing(&inner.host.media_elements(), &self.timing);

            if let Some(hook) = self.hooks.get(&page) {
                hook(&mut inner.host);
            }
            tracing::debug!("content swapped");
        }

        tokio::time::sleep(self.timing.enter).await;

        let pending = {
            let mut inner = self.inner.lock();
            inner.host.set_phase(Phase::Idle);
            inner.nav.in_transition = false;

            // Second pass covers media that raced layout during the swap.
            media::ensure_playing(&inner.host.media_elements(), &self.timing);

            let _ = self.events.send(PageLoaded::new(page.as_str()));
            inner.host.scroll_to_top();
            inner.nav.take_pending()
        };

        if let Some(next) = pending {
            tracing::debug!(page = %next, "draining queued navigation");
            self.navigate(&next);
        }
    }

    /// Arm a document-level one-shot resume: on the first user interaction,
    /// issue a single play attempt for every currently paused media element,
    /// muted unless the user explicitly unmuted it.
    pub fn resume_media_on_first_gesture<G: GestureSource>(self: &Arc<Self>, gestures: G) {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            gestures.next_gesture().await;
            let elements = engine.inner.lock().host.media_elements();
            media::resume_all(&elements);
        });
    }
}

/// Builds an [`Engine`]. Route and hook registration happens here; once
/// `build` runs, the tables are immutable.
pub struct EngineBuilder<H: Host> {
    host: H,
    routes: RouteTable,
    timing: TransitionTiming,
    hooks: HashMap<String, PageHook<H>>,
}

impl<H: Host> EngineBuilder<H> {
    /// Register a `(page, template)` pair.
    pub fn route(mut self, page: impl Into<String>, template: impl Into<String>) -> Self {
        self.routes.add(page, template);
        self
    }

    /// Override the default page identifier used for unknown lookups and an
    /// absent fragment.
    pub fn default_page(mut self, page: impl Into<String>) -> Self {
        self.routes = self.routes.with_default(page);
        self
    }

    pub fn timing(mut self, timing: TransitionTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Register a page-specific initializer, keyed by page identifier.
    pub fn hook(
        mut self,
        page: impl Into<String>,
        hook: impl Fn(&mut H) + Send + Sync + 'static,
    ) -> Self {
        self.hooks.insert(page.into(), Box::new(hook));
        self
    }

    /// Freeze registration and construct the engine, deriving the current
    /// page from the host's fragment (or the default page).
    pub fn build(self) -> Arc<Engine<H>> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let current = self
            .host
            .read_fragment()
            .filter(|fragment| !fragment.is_empty())
            .unwrap_or_else(|| self.routes.default_page().to_string());

        Arc::new(Engine {
            routes: self.routes,
            timing: self.timing,
            hooks: self.hooks,
            inner: Mutex::new(Inner {
                host: self.host,
                nav: NavState::starting_at(current),
            }),
            events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashnav_core::memory::MemoryHost;

    fn host_with_home() -> MemoryHost {
        let mut host = MemoryHost::new();
        host.insert_template("home-template", "<h1>Home</h1>");
        host
    }

    #[tokio::test]
    async fn current_page_derives_from_fragment_at_build() {
        let mut host = host_with_home();
        host.set_fragment(Some("faq".into()));
        let engine = Engine::builder(host).route("home", "home-template").build();

        assert_eq!(engine.current_page(), "faq");
        assert!(!engine.in_transition());
    }

    #[tokio::test]
    async fn missing_fragment_means_default_page() {
        let engine = Engine::builder(host_with_home())
            .route("home", "home-template")
            .build();

        assert_eq!(engine.current_page(), "home");
        assert_eq!(engine.fragment_or_default(), "home");
    }

    #[tokio::test]
    async fn empty_fragment_means_default_page() {
        let mut host = host_with_home();
        host.set_fragment(Some(String::new()));
        let engine = Engine::builder(host).route("home", "home-template").build();

        assert_eq!(engine.current_page(), "home");
    }

    #[tokio::test]
    async fn queue_pending_is_refused_while_idle() {
        let engine = Engine::builder(host_with_home())
            .route("home", "home-template")
            .build();

        // Nothing queued: the caller is told to navigate itself.
        assert!(!engine.queue_pending("faq"));
        assert!(!engine.in_transition());
    }

    #[tokio::test(start_paused = true)]
    async fn queue_pending_accepts_only_during_a_transition() {
        let engine = Engine::builder(host_with_home())
            .route("home", "home-template")
            .build();

        engine.request_load("home");
        assert!(engine.queue_pending("faq"));

        tokio::time::sleep(std::time::Duration::from_secs(2)).await;
        // The queued request drained once the transition completed.
        assert!(!engine.in_transition());
        assert_eq!(engine.current_page(), "faq");
        assert!(!engine.queue_pending("home"));
    }
}
