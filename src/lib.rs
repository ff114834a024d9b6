#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]

extern crate alloc;

pub mod cache;
pub mod component;
pub mod config;
pub mod events;
pub mod host;
pub mod hot_reload;
pub mod logging;
pub mod node;
pub mod pipeline;

#[doc(inline)]
pub use cache::{ResolutionCache, ResolvedView, ResolvedViewModel};
#[doc(inline)]
pub use component::{Component, ComponentType, Method};
#[doc(inline)]
pub use config::Config;
#[doc(inline)]
pub use events::{
    EventTarget, GlobalEvent, Headless, Listener, ListenerRegistry, Runtime, Windowed,
};
#[doc(inline)]
pub use host::{Host, HostBuilder};
#[doc(inline)]
pub use hot_reload::Reload;
#[doc(inline)]
pub use node::{Node, NodeId};

#[doc(inline)]
pub use track_core::{
    Attrs, Capability, Class, ClassRegistry, ComponentMetadata, ConfigurationError, Declaration,
    Definer, Error, EventBinding, LoadError, Loader, Pipe, RenderContext, Result, VNode, Verbs,
    View, ViewModel, ViewModelMetadata, view_fn,
};

/// Re-export of `tracing`, for views that log.
pub use tracing as log;

pub mod prelude {
    //! Commonly used items.
    //!
    //! ```
    //! use track::prelude::*;
    //!
    //! let host = Host::builder().build();
    //! assert!(host.cache().is_empty());
    //! ```
    pub use crate::{
        Class, ClassRegistry, Component, ComponentType, Config, GlobalEvent, Host, Node, Pipe,
        RenderContext, VNode, View, ViewModel, Verbs, view_fn,
    };
}
