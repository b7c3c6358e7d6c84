use serde::{Deserialize, Serialize};

/// Broadcast once per completed transition, carrying the resolved page
/// identifier. External collaborators subscribe through the engine; there is
/// no ambient event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLoaded {
    pub page: String,
}

impl PageLoaded {
    pub fn new(page: impl Into<String>) -> Self {
        Self { page: page.into() }
    }
}
