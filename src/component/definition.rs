//! Component types: definers plus event handler methods.

use alloc::{collections::BTreeMap, rc::Rc};
use core::fmt;

use track_core::{Definable, Definer, Verbs};

use super::Component;
use crate::events::GlobalEvent;

/// An event handler method of a component type.
pub type Method = Rc<dyn Fn(&Component, &GlobalEvent)>;

/// A component type.
///
/// Types form a single-inheritance chain through [`ComponentType::extends`].
/// Definers are evaluated from the most-base type down; methods are looked up
/// from the most-derived type up.
///
/// ```
/// use track::ComponentType;
///
/// let header = ComponentType::new("HeaderComponent").define(|d| {
///     d.name("header").views(["header", "shadow"]);
/// });
/// assert_eq!(header.label(), "HeaderComponent");
/// ```
pub struct ComponentType {
    label: String,
    definer: Option<Definer>,
    parent: Option<Rc<ComponentType>>,
    methods: BTreeMap<String, Method>,
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentType")
            .field("label", &self.label)
            .field("defined", &self.definer.is_some())
            .field("parent", &self.parent.as_ref().map(|parent| parent.label()))
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ComponentType {
    /// Creates a type without definer, parent or methods.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            definer: None,
            parent: None,
            methods: BTreeMap::new(),
        }
    }

    /// Sets the definer of this type.
    #[must_use]
    pub fn define(mut self, definer: impl Fn(&mut Verbs<'_>) + 'static) -> Self {
        self.definer = Some(Rc::new(definer));
        self
    }

    /// Makes this type derive from `parent`.
    #[must_use]
    pub fn extends(mut self, parent: &Rc<Self>) -> Self {
        self.parent = Some(Rc::clone(parent));
        self
    }

    /// Adds an event handler method.
    #[must_use]
    pub fn method(
        mut self,
        name: impl Into<String>,
        method: impl Fn(&Component, &GlobalEvent) + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Rc::new(method));
        self
    }

    /// Type label, e.g. `HeaderComponent`.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Parent type.
    #[must_use]
    pub fn parent(&self) -> Option<&Rc<Self>> {
        self.parent.as_ref()
    }

    /// This type followed by its ancestors, most-derived first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Self> {
        core::iter::successors(Some(self), |ty| ty.parent.as_deref())
    }

    /// Looks up a method on this type or its nearest ancestor defining it.
    #[must_use]
    pub fn find_method(&self, name: &str) -> Option<&Method> {
        self.ancestors().find_map(|ty| ty.methods.get(name))
    }
}

impl Definable for ComponentType {
    fn label(&self) -> &str {
        &self.label
    }

    fn definer_chain(&self) -> Vec<Definer> {
        let mut chain: Vec<Definer> = self
            .ancestors()
            .filter_map(|ty| ty.definer.clone())
            .collect();
        chain.reverse();
        chain
    }

    fn has_handler(&self, handler: &str) -> bool {
        self.find_method(handler).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_core::build;

    #[test]
    fn chain_runs_base_first() {
        let base = Rc::new(ComponentType::new("Base").define(|d| {
            d.name("base").views(["a"]);
        }));
        let middle = Rc::new(ComponentType::new("Middle").extends(&base));
        let leaf = ComponentType::new("Leaf").extends(&middle).define(|d| {
            d.views(["b"]);
        });

        assert_eq!(leaf.definer_chain().len(), 2);
        let metadata = build(&leaf).expect("leaf inherits the base name");
        assert_eq!(metadata.name(), "base");
        let labels: Vec<_> = metadata.views().iter().map(|d| d.label()).collect();
        assert_eq!(labels, ["a", "b"]);
    }

    #[test]
    fn undefined_chain_names_the_type() {
        let error = build(&ComponentType::new("HogeComponent")).unwrap_err();
        assert_eq!(error.to_string(), "HogeComponent.definer is undefined");
    }

    #[test]
    fn methods_are_inherited() {
        let base = Rc::new(ComponentType::new("Base").method("on_scroll", |_, _| {}));
        let derived = ComponentType::new("Derived")
            .extends(&base)
            .method("on_resize", |_, _| {});

        assert!(derived.has_handler("on_scroll"));
        assert!(derived.has_handler("on_resize"));
        assert!(!base.has_handler("on_resize"));
    }
}
