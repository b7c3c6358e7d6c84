pub mod config;
pub mod event;
pub mod host;
pub mod media;
pub mod memory;
pub mod routes;
pub mod state;

pub use config::TransitionTiming;
pub use event::PageLoaded;
pub use host::{Host, ScriptSpec};
pub use media::{GestureSource, MediaElement, PlayRejected};
pub use routes::{DEFAULT_PAGE, RouteTable};
pub use state::{NavState, Phase};
