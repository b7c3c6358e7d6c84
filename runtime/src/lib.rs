pub mod engine;
pub mod media;

pub mod prelude {
    pub use crate::engine::{Engine, EngineBuilder};
    pub use crate::media::ensure_playing;
}

pub use engine::{Engine, EngineBuilder, PageHook};
pub use media::ensure_playing;
