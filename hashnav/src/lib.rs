//! hashnav facade crate.
//!
//! Re-exports the core, runtime, and ingress crates behind a single entry
//! point. A host embeds the stack by implementing [`Host`] (and
//! [`MediaElement`] for its media handles), building an [`Engine`] with its
//! routes and page hooks, and feeding interaction events through an
//! [`Ingress`]:
//!
//! ```rust,no_run
//! use hashnav::prelude::*;
//! use hashnav::core::memory::MemoryHost;
//!
//! let mut host = MemoryHost::new();
//! host.insert_template("home-template", "<h1>Home</h1>");
//!
//! let engine = Engine::builder(host)
//!     .route("home", "home-template")
//!     .build();
//! let ingress = Ingress::new(engine);
//! ingress.start();
//! ```

pub use hashnav_core as core;
pub use hashnav_ingress as ingress;
pub use hashnav_runtime as runtime;

pub use hashnav_core::{
    DEFAULT_PAGE, GestureSource, Host, MediaElement, NavState, PageLoaded, Phase, PlayRejected,
    RouteTable, ScriptSpec, TransitionTiming,
};
pub use hashnav_ingress::{Disposition, Ingress};
pub use hashnav_runtime::{Engine, EngineBuilder};

pub mod prelude {
    pub use hashnav_core::{
        GestureSource, Host, MediaElement, PageLoaded, Phase, RouteTable, ScriptSpec,
        TransitionTiming,
    };
    pub use hashnav_ingress::{Disposition, Ingress};
    pub use hashnav_runtime::prelude::*;
}
