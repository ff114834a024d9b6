//! Error taxonomy shared by the builder, the resolution cache and the pipeline.

use thiserror::Error;

use crate::class::Capability;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Top-level error produced while building, resolving or rendering a component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The definer chain is missing or produced invalid metadata.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A declared class does not satisfy the capability it is used for.
    #[error("`{class}` does not implement the {expected} capability")]
    TypeMismatch {
        /// Name of the offending class.
        class: String,
        /// Capability the declaration required.
        expected: Capability,
    },

    /// The loader could not find or construct a declared class.
    #[error(transparent)]
    Resolution(#[from] LoadError),

    /// Rendering was requested but no view could be resolved.
    #[error("component `{component}` has no views to render")]
    RenderPrecondition {
        /// Name of the component being rendered.
        component: String,
    },

    /// Global events were bound twice without an intervening unbind.
    #[error("global events of `{component}` are already bound")]
    AlreadyBound {
        /// Name of the component.
        component: String,
    },
}

impl Error {
    /// Creates a [`Error::TypeMismatch`] for the given class name.
    pub fn type_mismatch(class: impl Into<String>, expected: Capability) -> Self {
        Self::TypeMismatch {
            class: class.into(),
            expected,
        }
    }

    /// Returns `true` for failures the view list treats as "no viewmodel".
    #[must_use]
    pub const fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }
}

/// Build-time failures caused by a definer or by its absence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No definer exists anywhere in the type's chain.
    #[error("{0}.definer is undefined")]
    MissingDefiner(String),

    /// The chain finished without calling `name`.
    #[error("component name is undefined; the definer of `{0}` must call `name(\"component_name\")`")]
    MissingName(String),

    /// `name` was called with an empty string.
    #[error("component name of `{0}` must not be empty")]
    EmptyName(String),

    /// A definer called a verb that is not part of the active vocabulary.
    #[error("unknown verb `{0}`")]
    UnknownVerb(String),

    /// A verb was called with arguments of the wrong shape.
    #[error("invalid arguments for `{verb}`: {reason}")]
    InvalidArguments {
        /// Verb name.
        verb: &'static str,
        /// Human readable description of the mismatch.
        reason: String,
    },

    /// An `event` declaration names a handler the component does not have.
    #[error("`{component}` has no handler named `{handler}` for event `{event}`")]
    UnknownHandler {
        /// Label of the component type.
        component: String,
        /// Declared event name.
        event: String,
        /// Declared handler name.
        handler: String,
    },
}

/// Failures of the class loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Nothing is registered at the requested path.
    #[error("no class registered at `{0}`")]
    NotFound(String),

    /// A class was found but could not be constructed.
    #[error("failed to construct `{path}`: {reason}")]
    Construct {
        /// Path that was loaded.
        path: String,
        /// Reason reported by the loader.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_definer_names_the_type() {
        let error = Error::from(ConfigurationError::MissingDefiner("HogeComponent".into()));
        assert_eq!(error.to_string(), "HogeComponent.definer is undefined");
    }

    #[test]
    fn type_mismatch_display() {
        let error = Error::type_mismatch("Plain", Capability::View);
        assert_eq!(
            error.to_string(),
            "`Plain` does not implement the View capability"
        );
        assert!(!error.is_resolution());
    }

    #[test]
    fn load_errors_are_resolution_failures() {
        let error = Error::from(LoadError::NotFound("views/components/a".into()));
        assert!(error.is_resolution());
        assert_eq!(error.to_string(), "no class registered at `views/components/a`");
    }
}
