//! Core building blocks of the Track component system.
//!
//! This crate holds everything that does not depend on a live rendering node:
//!
//! - [`dsl`]: the fixed verb tables and the definer evaluator,
//! - [`builder`]: validation of evaluated definer chains into metadata,
//! - [`class`]: declared classes, capability checks and the [`Loader`] seam,
//! - [`view`] / [`view_model`]: the renderer and viewmodel traits,
//! - [`pipe`]: the value bag shared by one render pass,
//! - [`error`]: the error taxonomy.

extern crate alloc;

pub mod builder;
pub mod class;
pub mod dsl;
pub mod error;
pub mod metadata;
pub mod pipe;
pub mod view;
pub mod view_model;

#[doc(inline)]
pub use builder::{Definable, build, build_view_model};
#[doc(inline)]
pub use class::{Capability, Class, ClassRegistry, Loader};
#[doc(inline)]
pub use dsl::{Definer, Verbs};
#[doc(inline)]
pub use error::{ConfigurationError, Error, LoadError, Result};
#[doc(inline)]
pub use metadata::{ComponentMetadata, Declaration, EventBinding, ViewModelMetadata};
#[doc(inline)]
pub use pipe::Pipe;
#[doc(inline)]
pub use view::{Attrs, RenderContext, VNode, View, view_fn};
#[doc(inline)]
pub use view_model::ViewModel;
