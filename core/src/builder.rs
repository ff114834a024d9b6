//! Turns definer chains into validated metadata.

use crate::{
    class::Class,
    dsl::{COMPONENT_VERBS, Definer, VIEW_MODEL_VERBS, evaluate},
    error::{ConfigurationError, Result},
    metadata::{ComponentMetadata, ViewModelMetadata},
};

/// Something that can be described by a chain of definers.
pub trait Definable {
    /// Type label used in error messages, e.g. `HogeComponent`.
    fn label(&self) -> &str;

    /// Definers to evaluate, most-base first.
    fn definer_chain(&self) -> Vec<Definer>;

    /// Returns `true` when `handler` names an event handler of this type.
    fn has_handler(&self, _handler: &str) -> bool {
        false
    }
}

/// Evaluates the chain of `target` and validates the result.
///
/// # Errors
///
/// - [`ConfigurationError::MissingDefiner`] when the chain is empty.
/// - [`ConfigurationError::MissingName`] / [`ConfigurationError::EmptyName`]
///   when no usable name was declared.
/// - [`ConfigurationError::UnknownHandler`] when an `event` names a handler
///   the type does not have.
/// - [`crate::Error::TypeMismatch`] when a declared class fails its
///   capability check.
pub fn build<T: Definable + ?Sized>(target: &T) -> Result<ComponentMetadata> {
    let label = target.label();
    let chain = target.definer_chain();
    if chain.is_empty() {
        return Err(ConfigurationError::MissingDefiner(label.into()).into());
    }

    let declarations = evaluate(&COMPONENT_VERBS, &chain)?;
    let name = match declarations.name {
        None => return Err(ConfigurationError::MissingName(label.into()).into()),
        Some(name) if name.is_empty() => {
            return Err(ConfigurationError::EmptyName(label.into()).into());
        }
        Some(name) => name,
    };

    if let Some(binding) = declarations
        .events
        .iter()
        .find(|binding| !target.has_handler(&binding.handler))
    {
        return Err(ConfigurationError::UnknownHandler {
            component: label.into(),
            event: binding.event.clone(),
            handler: binding.handler.clone(),
        }
        .into());
    }

    tracing::debug!(
        component = %name,
        label,
        definers = chain.len(),
        views = declarations.views.len(),
        events = declarations.events.len(),
        "built component metadata"
    );

    Ok(ComponentMetadata::new(
        name,
        declarations.views,
        declarations.view_model,
        declarations.events,
    ))
}

/// Builds the metadata of a viewmodel class.
///
/// A class without a definer is named after itself.
///
/// # Errors
///
/// Fails when the definer calls anything but `name`, or leaves the name
/// empty.
pub fn build_view_model(class: &Class) -> Result<ViewModelMetadata> {
    let Some(definer) = class.definer() else {
        return Ok(ViewModelMetadata::new(class.name().into()));
    };
    let declarations = evaluate(&VIEW_MODEL_VERBS, core::slice::from_ref(definer))?;
    match declarations.name {
        Some(name) if !name.is_empty() => Ok(ViewModelMetadata::new(name)),
        Some(_) => Err(ConfigurationError::EmptyName(class.name().into()).into()),
        None => Err(ConfigurationError::MissingName(class.name().into()).into()),
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;

    use super::*;
    use crate::{
        class::Capability,
        dsl::Verbs,
        error::Error,
        metadata::{Declaration, EventBinding},
        view::{RenderContext, VNode, View},
        view_model::ViewModel,
    };

    struct Mock {
        label: &'static str,
        chain: Vec<Definer>,
        handlers: &'static [&'static str],
    }

    impl Mock {
        fn new(label: &'static str) -> Self {
            Self {
                label,
                chain: Vec::new(),
                handlers: &[],
            }
        }

        fn define(mut self, definer: impl Fn(&mut Verbs<'_>) + 'static) -> Self {
            self.chain.push(Rc::new(definer));
            self
        }

        const fn handlers(mut self, handlers: &'static [&'static str]) -> Self {
            self.handlers = handlers;
            self
        }
    }

    impl Definable for Mock {
        fn label(&self) -> &str {
            self.label
        }

        fn definer_chain(&self) -> Vec<Definer> {
            self.chain.clone()
        }

        fn has_handler(&self, handler: &str) -> bool {
            self.handlers.contains(&handler)
        }
    }

    struct MockView;

    impl View for MockView {
        fn render(&self, _cx: &mut RenderContext<'_>, yielded: Option<VNode>) -> Option<VNode> {
            yielded
        }
    }

    struct MockViewModel;

    impl ViewModel for MockViewModel {}

    #[test]
    fn builds_class_declarations() {
        let view = Class::view("MockView", || MockView);
        let view_model = Class::view_model("MockViewModel", || MockViewModel);
        let (v, vm) = (view.clone(), view_model.clone());
        let mock = Mock::new("HogeHoge").define(move |d| {
            d.name("mock_component").view(&v).view(&v).viewmodel(&vm);
        });

        let metadata = build(&mock).unwrap();
        assert_eq!(metadata.name(), "mock_component");
        assert_eq!(metadata.views().len(), 2);
        assert!(metadata.views().iter().all(|d| *d == Declaration::from(&view)));
        assert_eq!(metadata.view_model(), Some(&Declaration::from(&view_model)));
    }

    #[test]
    fn missing_definer_is_fatal() {
        assert_eq!(
            build(&Mock::new("Empty")),
            Err(ConfigurationError::MissingDefiner("Empty".into()).into())
        );
    }

    #[test]
    fn missing_or_empty_name_is_fatal() {
        let unnamed = Mock::new("Unnamed").define(|d| {
            d.views(["a"]);
        });
        assert_eq!(
            build(&unnamed),
            Err(ConfigurationError::MissingName("Unnamed".into()).into())
        );

        let blank = Mock::new("Blank").define(|d| {
            d.name("");
        });
        assert_eq!(
            build(&blank),
            Err(ConfigurationError::EmptyName("Blank".into()).into())
        );
    }

    #[test]
    fn last_name_wins_across_the_chain() {
        let mock = Mock::new("Derived")
            .define(|d| {
                d.name("base").views(["a", "b"]);
            })
            .define(|d| {
                d.views(["c"]).name("derived");
            });
        let metadata = build(&mock).unwrap();
        assert_eq!(metadata.name(), "derived");
        let order: Vec<_> = metadata.views().iter().map(Declaration::label).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn redeclaring_name_keeps_accumulated_views() {
        let mock = Mock::new("Derived")
            .define(|d| {
                d.views(["a"]);
            })
            .define(|d| {
                d.name("first").views(["b"]).name("second");
            });
        let metadata = build(&mock).unwrap();
        assert_eq!(metadata.name(), "second");
        assert_eq!(metadata.views().len(), 2);
    }

    #[test]
    fn non_view_class_fails_with_type_mismatch() {
        let plain = Class::plain("NotAView");
        let mock = Mock::new("Hoge").define(move |d| {
            d.name("hoge").view(&plain);
        });
        assert_eq!(
            build(&mock),
            Err(Error::type_mismatch("NotAView", Capability::View))
        );
    }

    #[test]
    fn event_handlers_must_exist() {
        let mock = Mock::new("Scroller")
            .handlers(&["on_scroll"])
            .define(|d| {
                d.name("scroller").event("scroll", "on_scroll");
            });
        let metadata = build(&mock).unwrap();
        assert_eq!(metadata.events(), [EventBinding::new("scroll", "on_scroll")]);

        let broken = Mock::new("Broken").define(|d| {
            d.name("broken").event("resize", "on_resize");
        });
        assert!(matches!(
            build(&broken),
            Err(Error::Configuration(ConfigurationError::UnknownHandler { .. }))
        ));
    }

    struct Bare(Definer);

    impl Definable for Bare {
        fn label(&self) -> &str {
            "Bare"
        }

        fn definer_chain(&self) -> Vec<Definer> {
            vec![Rc::clone(&self.0)]
        }
    }

    #[test]
    fn types_without_handlers_reject_events() {
        let bare = Bare(Rc::new(|d| {
            d.name("bare").event("scroll", "on_scroll");
        }));
        assert!(!bare.has_handler("on_scroll"));
        assert!(matches!(
            build(&bare),
            Err(Error::Configuration(ConfigurationError::UnknownHandler { .. }))
        ));
    }

    #[test]
    fn view_model_metadata() {
        let named = Class::view_model("MockViewModel", || MockViewModel).with_definer(|d| {
            d.name("mock_viewmodel");
        });
        assert_eq!(build_view_model(&named).unwrap().name(), "mock_viewmodel");

        let anonymous = Class::view_model("Anonymous", || MockViewModel);
        assert_eq!(build_view_model(&anonymous).unwrap().name(), "Anonymous");

        let greedy = Class::view_model("Greedy", || MockViewModel).with_definer(|d| {
            d.name("greedy").event("scroll", "on_scroll");
        });
        assert_eq!(
            build_view_model(&greedy),
            Err(ConfigurationError::UnknownVerb("event".into()).into())
        );
    }
}
