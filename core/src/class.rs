//! Declared classes, capability markers and the loader seam.
//!
//! A [`Class`] is the unit a definer refers to when it declares a view or a
//! viewmodel: it carries a name, an optional parent class and, somewhere in its
//! ancestry, a factory that marks it as a `View` or a `ViewModel`. Capability
//! checks walk the ancestry, so a class derived from a view class is a view
//! even when it adds nothing of its own.
//!
//! Identifier-form declarations are turned into classes by a [`Loader`].
//! [`ClassRegistry`] is the in-memory loader used by most hosts and by tests.

use alloc::{collections::BTreeMap, rc::Rc};
use core::fmt::{self, Debug, Display};

use crate::{
    dsl::{Definer, Verbs},
    error::{Error, LoadError, Result},
    view::View,
    view_model::ViewModel,
};

/// Capability a class must satisfy to be used in a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// The class renders part of a component.
    View,
    /// The class holds data and behavior for a component.
    ViewModel,
}

impl Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View => f.write_str("View"),
            Self::ViewModel => f.write_str("ViewModel"),
        }
    }
}

type ViewFactory = Rc<dyn Fn() -> Box<dyn View>>;
type ViewModelFactory = Rc<dyn Fn() -> Box<dyn ViewModel>>;

#[derive(Clone)]
enum Body {
    View(ViewFactory),
    ViewModel(ViewModelFactory),
    Abstract,
}

impl Body {
    const fn capability(&self) -> Option<Capability> {
        match self {
            Self::View(_) => Some(Capability::View),
            Self::ViewModel(_) => Some(Capability::ViewModel),
            Self::Abstract => None,
        }
    }
}

#[derive(Clone)]
struct ClassInner {
    name: String,
    parent: Option<Class>,
    body: Body,
    definer: Option<Definer>,
}

/// A reference-counted handle to a declared class.
///
/// Cloning is cheap and preserves identity, see [`Class::ptr_eq`].
#[derive(Clone)]
pub struct Class(Rc<ClassInner>);

impl Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.0.name)
            .field("capability", &self.capability())
            .field("parent", &self.0.parent.as_ref().map(Self::name))
            .finish_non_exhaustive()
    }
}

impl Class {
    fn from_inner(name: impl Into<String>, parent: Option<Self>, body: Body) -> Self {
        Self(Rc::new(ClassInner {
            name: name.into(),
            parent,
            body,
            definer: None,
        }))
    }

    /// Creates a view class whose instances are produced by `factory`.
    pub fn view<V, F>(name: impl Into<String>, factory: F) -> Self
    where
        V: View,
        F: Fn() -> V + 'static,
    {
        Self::from_inner(
            name,
            None,
            Body::View(Rc::new(move || Box::new(factory()) as Box<dyn View>)),
        )
    }

    /// Creates a viewmodel class whose instances are produced by `factory`.
    pub fn view_model<M, F>(name: impl Into<String>, factory: F) -> Self
    where
        M: ViewModel,
        F: Fn() -> M + 'static,
    {
        Self::from_inner(
            name,
            None,
            Body::ViewModel(Rc::new(move || Box::new(factory()) as Box<dyn ViewModel>)),
        )
    }

    /// Creates a class that satisfies no capability.
    pub fn plain(name: impl Into<String>) -> Self {
        Self::from_inner(name, None, Body::Abstract)
    }

    /// Derives a new class from `self` without overriding its factory.
    #[must_use]
    pub fn extend(&self, name: impl Into<String>) -> Self {
        Self::from_inner(name, Some(self.clone()), Body::Abstract)
    }

    /// Attaches a definer, evaluated when a viewmodel of this class is built.
    #[must_use]
    pub fn with_definer(self, definer: impl Fn(&mut Verbs<'_>) + 'static) -> Self {
        let mut inner = (*self.0).clone();
        inner.definer = Some(Rc::new(definer));
        Self(Rc::new(inner))
    }

    /// Returns the class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns the direct parent class, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.0.parent.as_ref()
    }

    /// Iterates over `self` and then each ancestor, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Self> {
        core::iter::successors(Some(self), |class| class.parent())
    }

    /// Returns the capability of the nearest ancestor that defines one.
    #[must_use]
    pub fn capability(&self) -> Option<Capability> {
        self.ancestors().find_map(|class| class.0.body.capability())
    }

    /// Returns `true` when the class (or an ancestor) provides `capability`.
    #[must_use]
    pub fn satisfies(&self, capability: Capability) -> bool {
        self.capability() == Some(capability)
    }

    /// Fails with [`Error::TypeMismatch`] unless the class provides `capability`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when the capability check fails.
    pub fn ensure(&self, capability: Capability) -> Result<()> {
        if self.satisfies(capability) {
            Ok(())
        } else {
            Err(Error::type_mismatch(self.name(), capability))
        }
    }

    /// Returns the nearest definer in the ancestry.
    #[must_use]
    pub fn definer(&self) -> Option<&Definer> {
        self.ancestors().find_map(|class| class.0.definer.as_ref())
    }

    fn body(&self) -> &Body {
        self.ancestors()
            .map(|class| &class.0.body)
            .find(|body| body.capability().is_some())
            .unwrap_or(&Body::Abstract)
    }

    /// Creates a new view instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when the class is not a view class.
    pub fn instantiate_view(&self) -> Result<Box<dyn View>> {
        match self.body() {
            Body::View(factory) => Ok(factory()),
            _ => Err(Error::type_mismatch(self.name(), Capability::View)),
        }
    }

    /// Creates a new viewmodel instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when the class is not a viewmodel class.
    pub fn instantiate_view_model(&self) -> Result<Box<dyn ViewModel>> {
        match self.body() {
            Body::ViewModel(factory) => Ok(factory()),
            _ => Err(Error::type_mismatch(self.name(), Capability::ViewModel)),
        }
    }

    /// Returns `true` when both handles point to the same class.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

/// Turns a textual identifier into a class.
///
/// Paths are namespaced as `<kind>/<component type>s/<identifier>`, for
/// example `views/components/header`.
pub trait Loader {
    /// Loads the class registered at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] when nothing is registered at `path`,
    /// or [`LoadError::Construct`] when the class cannot be produced.
    fn load(&self, path: &str) -> Result<Class, LoadError>;
}

impl<F> Loader for F
where
    F: Fn(&str) -> Result<Class, LoadError>,
{
    fn load(&self, path: &str) -> Result<Class, LoadError> {
        self(path)
    }
}

/// An in-memory [`Loader`] keyed by path.
#[derive(Debug, Default, Clone)]
pub struct ClassRegistry {
    classes: BTreeMap<String, Class>,
}

impl ClassRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            classes: BTreeMap::new(),
        }
    }

    /// Registers `class` at `path`, replacing any previous entry.
    pub fn register(&mut self, path: impl Into<String>, class: Class) -> Option<Class> {
        let path = path.into();
        tracing::trace!(%path, class = class.name(), "registering class");
        self.classes.insert(path, class)
    }

    /// Builder-style variant of [`ClassRegistry::register`].
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, class: Class) -> Self {
        self.register(path, class);
        self
    }

    /// Removes the class registered at `path`.
    pub fn unregister(&mut self, path: &str) -> Option<Class> {
        self.classes.remove(path)
    }

    /// Returns the number of registered classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Loader for ClassRegistry {
    fn load(&self, path: &str) -> Result<Class, LoadError> {
        self.classes
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(path.into()))
    }
}
