//! Live components and their lifecycle hooks.
//!
//! A [`Component`] is one occurrence of a [`ComponentType`] attached to a
//! rendering node. Its metadata is built before the component exists, so a
//! component is never observable without a valid name.
//!
//! The host drives the hooks in this order:
//!
//! | hook                           | effect                                       |
//! |--------------------------------|----------------------------------------------|
//! | [`Component::on_init`]         | binds declared global events                 |
//! | [`Component::on_create`]       | nothing                                      |
//! | [`Component::on_before_update`]| always allows the update                     |
//! | [`Component::on_update`]       | swaps the node, dropping a stale cache entry |
//! | [`Component::on_before_remove`]| unbinds global events                        |
//! | [`Component::on_remove`]       | drops the node's cache entry                 |
//!
//! Dropping the last handle of a component also drops its cache entry.

mod definition;

pub use definition::{ComponentType, Method};

use alloc::{
    borrow::Cow,
    rc::{Rc, Weak},
};
use core::{
    cell::{Ref, RefCell},
    fmt,
};

use track_core::{Attrs, ComponentMetadata, Declaration, Pipe, Result, VNode, build};

use crate::{
    cache::{ResolvedView, ResolvedViewModel},
    events::{GlobalEvent, Listener, Subscriptions},
    host::Host,
    node::{Node, NodeId},
    pipeline,
};

struct ComponentInner {
    ty: Rc<ComponentType>,
    metadata: ComponentMetadata,
    host: Host,
    node: RefCell<Node>,
    subscriptions: RefCell<Subscriptions>,
}

impl Drop for ComponentInner {
    fn drop(&mut self) {
        // Resolved instances never outlive the node's component.
        let id = self.node.get_mut().id();
        if self.host.cache().invalidate(id) {
            tracing::trace!(
                component = self.metadata.name(),
                node = id.raw(),
                "dropped without unmount"
            );
        }
    }
}

/// A component attached to a rendering node.
///
/// Cloning yields another handle to the same component.
#[derive(Clone)]
pub struct Component(Rc<ComponentInner>);

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name())
            .field("type", &self.0.ty.label())
            .field("node", &self.node_id())
            .field(
                "bound",
                &self.0.subscriptions.try_borrow().map(|s| s.is_bound()).ok(),
            )
            .finish()
    }
}

impl Component {
    /// Builds the metadata of `ty` and attaches a component to `node`.
    ///
    /// # Errors
    ///
    /// Returns the configuration or type error raised while building the
    /// metadata. No component is created in that case.
    pub fn new(ty: &Rc<ComponentType>, node: Node, host: &Host) -> Result<Self> {
        let metadata = build(&**ty)?;
        Ok(Self(Rc::new(ComponentInner {
            ty: Rc::clone(ty),
            metadata,
            host: host.clone(),
            node: RefCell::new(node),
            subscriptions: RefCell::new(Subscriptions::default()),
        })))
    }

    /// Declared component name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.metadata.name()
    }

    /// Metadata built from the type's definer chain.
    #[must_use]
    pub fn metadata(&self) -> &ComponentMetadata {
        &self.0.metadata
    }

    /// The component's type.
    #[must_use]
    pub fn component_type(&self) -> &Rc<ComponentType> {
        &self.0.ty
    }

    /// The host this component is attached through.
    #[must_use]
    pub fn host(&self) -> &Host {
        &self.0.host
    }

    /// Component kind, as configured on the host.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.0.host.config().kind
    }

    /// The current rendering node.
    #[must_use]
    pub fn node(&self) -> Ref<'_, Node> {
        self.0.node.borrow()
    }

    /// Identity of the current rendering node.
    #[must_use]
    pub fn node_id(&self) -> NodeId {
        self.0.node.borrow().id()
    }

    /// Attributes of the current rendering node.
    #[must_use]
    pub fn attrs(&self) -> Ref<'_, Attrs> {
        Ref::map(self.0.node.borrow(), Node::attrs)
    }

    /// View declarations to resolve, after applying the name fallback.
    #[must_use]
    pub fn view_declarations(&self) -> Cow<'_, [Declaration]> {
        let declared = self.0.metadata.views();
        if declared.is_empty() && self.0.host.config().fallback_to_name {
            Cow::Owned(vec![Declaration::Ident(self.name().into())])
        } else {
            Cow::Borrowed(declared)
        }
    }

    /// Resolved views of the current node.
    ///
    /// # Errors
    ///
    /// See [`crate::ResolutionCache::views`].
    pub fn views(&self) -> Result<Rc<[ResolvedView]>> {
        self.0.host.cache().views(self)
    }

    /// Resolved viewmodel of the current node.
    ///
    /// # Errors
    ///
    /// See [`crate::ResolutionCache::view_model`].
    pub fn view_model(&self) -> Result<Rc<ResolvedViewModel>> {
        self.0.host.cache().view_model(self)
    }

    /// Renders the component with a fresh pipe.
    ///
    /// # Errors
    ///
    /// See [`pipeline::render`].
    pub fn view(&self) -> Result<Option<VNode>> {
        let mut pipe = Pipe::new();
        pipeline::render(self, &mut pipe)
    }

    /// Renders the component with a caller-provided pipe.
    ///
    /// # Errors
    ///
    /// See [`pipeline::render`].
    pub fn render_with(&self, pipe: &mut Pipe) -> Result<Option<VNode>> {
        pipeline::render(self, pipe)
    }

    /// Returns `true` while global events are bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.0.subscriptions.borrow().is_bound()
    }

    /// Returns `true` when both handles refer to the same component.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Creates a listener that calls the `handler` method on this component.
    ///
    /// The listener does not keep the component alive.
    pub(crate) fn bound_handler(&self, handler: &str) -> Option<Listener> {
        let method = Rc::clone(self.0.ty.find_method(handler)?);
        let component: Weak<ComponentInner> = Rc::downgrade(&self.0);
        Some(Rc::new(move |event: &GlobalEvent| {
            if let Some(inner) = component.upgrade() {
                method(&Self(inner), event);
            }
        }))
    }

    /// Binds the declared global events.
    ///
    /// # Errors
    ///
    /// Returns [`track_core::Error::AlreadyBound`] when the events are bound
    /// already.
    pub fn on_init(&self) -> Result<()> {
        self.0
            .subscriptions
            .borrow_mut()
            .bind_all(self, self.0.host.runtime())
    }

    /// Called once the node is attached.
    pub fn on_create(&self) {
        tracing::trace!(component = self.name(), node = self.node_id().raw(), "created");
    }

    /// Decides whether an update should proceed.
    #[must_use]
    pub const fn on_before_update(&self) -> bool {
        true
    }

    /// Replaces the rendering node.
    ///
    /// When the node identity changes, the entry of the previous node is
    /// dropped from the cache.
    pub fn on_update(&self, node: Node) {
        let previous = self.0.node.replace(node);
        let current = self.node_id();
        if previous.id() != current && self.0.host.cache().invalidate(previous.id()) {
            tracing::debug!(
                component = self.name(),
                from = previous.id().raw(),
                to = current.raw(),
                "node replaced; dropped cached resolution"
            );
        }
    }

    /// Unbinds global events. Returns the number of listeners removed.
    pub fn on_before_remove(&self) -> usize {
        self.0
            .subscriptions
            .borrow_mut()
            .unbind_all(self, self.0.host.runtime())
    }

    /// Drops the node's cache entry.
    pub fn on_remove(&self) {
        self.0.host.cache().invalidate(self.node_id());
    }
}
