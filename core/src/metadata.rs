//! Immutable metadata produced by the builder.

use crate::class::Class;

/// A view or viewmodel declaration, either by identifier or by class.
#[derive(Debug, Clone)]
pub enum Declaration {
    /// Resolved lazily through the loader.
    Ident(String),
    /// Capability-checked at build time and instantiated per node.
    Class(Class),
}

impl Declaration {
    /// Identifier or class name, used in logs and error messages.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Ident(ident) => ident,
            Self::Class(class) => class.name(),
        }
    }

    /// Returns the identifier of an identifier-form declaration.
    #[must_use]
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Self::Ident(ident) => Some(ident),
            Self::Class(_) => None,
        }
    }
}

impl PartialEq for Declaration {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Ident(a), Self::Ident(b)) => a == b,
            (Self::Class(a), Self::Class(b)) => Class::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for Declaration {
    fn from(value: &str) -> Self {
        Self::Ident(value.into())
    }
}

impl From<String> for Declaration {
    fn from(value: String) -> Self {
        Self::Ident(value)
    }
}

impl From<Class> for Declaration {
    fn from(value: Class) -> Self {
        Self::Class(value)
    }
}

impl From<&Class> for Declaration {
    fn from(value: &Class) -> Self {
        Self::Class(value.clone())
    }
}

/// A global event declared with `event(name, handler)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventBinding {
    /// Event name on the global target, e.g. `scroll`.
    pub event: String,
    /// Name of the component handler to invoke.
    pub handler: String,
}

impl EventBinding {
    /// Creates a binding.
    pub fn new(event: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            handler: handler.into(),
        }
    }
}

/// Validated metadata of a component type.
///
/// Built once per component instance and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentMetadata {
    name: String,
    views: Vec<Declaration>,
    view_model: Option<Declaration>,
    events: Vec<EventBinding>,
}

impl ComponentMetadata {
    pub(crate) const fn new(
        name: String,
        views: Vec<Declaration>,
        view_model: Option<Declaration>,
        events: Vec<EventBinding>,
    ) -> Self {
        Self {
            name,
            views,
            view_model,
            events,
        }
    }

    /// Component name; never empty.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// View declarations in render order.
    #[must_use]
    pub fn views(&self) -> &[Declaration] {
        &self.views
    }

    /// Explicit viewmodel declaration, if any.
    #[must_use]
    pub const fn view_model(&self) -> Option<&Declaration> {
        self.view_model.as_ref()
    }

    /// Global event bindings in declaration order.
    #[must_use]
    pub fn events(&self) -> &[EventBinding] {
        &self.events
    }
}

/// Metadata of a built viewmodel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModelMetadata {
    name: String,
}

impl ViewModelMetadata {
    pub(crate) const fn new(name: String) -> Self {
        Self { name }
    }

    /// Viewmodel name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
