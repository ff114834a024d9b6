//! Per-node resolution cache.
//!
//! Resolving a component's views loads classes, checks capabilities and
//! creates instances. The result is stored per rendering node so that every
//! later access from the same node returns the very same instances, while two
//! nodes sharing a component type never share one.
//!
//! Entries only hold fully resolved values: a resolution that fails part-way
//! stores nothing and is retried on the next access.

use alloc::{
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
};
use core::{cell::RefCell, fmt};

use track_core::{
    Attrs, Capability, Class, Declaration, Pipe, RenderContext, Result, VNode, View, ViewModel,
    ViewModelMetadata, build_view_model,
};

use crate::{component::Component, host::Host, node::NodeId};

/// A view instance owned by one node, bound to that node's viewmodel.
pub struct ResolvedView {
    label: String,
    view: Box<dyn View>,
    view_model: Option<Rc<ResolvedViewModel>>,
}

impl fmt::Debug for ResolvedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedView")
            .field("label", &self.label)
            .field("view_model", &self.view_model)
            .finish_non_exhaustive()
    }
}

impl ResolvedView {
    /// The declaration this view was resolved from.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The viewmodel bound to this view, if one was resolved.
    #[must_use]
    pub const fn view_model(&self) -> Option<&Rc<ResolvedViewModel>> {
        self.view_model.as_ref()
    }

    /// Renders this view around `yielded`.
    pub fn render(
        &self,
        component: &str,
        attrs: &Attrs,
        pipe: &mut Pipe,
        yielded: Option<VNode>,
    ) -> Option<VNode> {
        let view_model = self.view_model.as_deref().map(ResolvedViewModel::instance);
        let mut cx = RenderContext::new(component, attrs, pipe, view_model);
        self.view.render(&mut cx, yielded)
    }
}

/// A viewmodel instance owned by one node.
pub struct ResolvedViewModel {
    metadata: ViewModelMetadata,
    instance: Box<dyn ViewModel>,
}

impl fmt::Debug for ResolvedViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedViewModel")
            .field("name", &self.metadata.name())
            .finish_non_exhaustive()
    }
}

impl ResolvedViewModel {
    /// Declared viewmodel name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.metadata.name()
    }

    /// Viewmodel metadata.
    #[must_use]
    pub const fn metadata(&self) -> &ViewModelMetadata {
        &self.metadata
    }

    /// The instance itself.
    #[must_use]
    pub fn instance(&self) -> &dyn ViewModel {
        &*self.instance
    }

    /// Downcasts the instance to a concrete viewmodel type.
    #[must_use]
    pub fn downcast_ref<T: ViewModel>(&self) -> Option<&T> {
        self.instance().downcast_ref()
    }
}

#[derive(Default)]
struct CacheEntry {
    views: Option<Rc<[ResolvedView]>>,
    view_model: Option<Rc<ResolvedViewModel>>,
    // Loader paths consulted while resolving, for path-based invalidation.
    sources: BTreeSet<String>,
}

/// Resolved views and viewmodels keyed by rendering node.
#[derive(Default)]
pub struct ResolutionCache {
    entries: RefCell<BTreeMap<NodeId, CacheEntry>>,
}

impl fmt::Debug for ResolutionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionCache")
            .field("nodes", &self.len())
            .finish()
    }
}

impl ResolutionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the resolved views of `component`, in declaration order.
    ///
    /// When no view is declared and the host allows it, the component name is
    /// used as the only view identifier. A viewmodel that cannot be loaded is
    /// treated as absent; any other viewmodel failure is returned.
    ///
    /// # Errors
    ///
    /// Fails when a view cannot be loaded, is not a view class, or the
    /// viewmodel is declared but invalid.
    pub fn views(&self, component: &Component) -> Result<Rc<[ResolvedView]>> {
        let id = component.node_id();
        if let Some(views) = self.cached(id, |entry| entry.views.clone()) {
            return Ok(views);
        }

        let mut sources = BTreeSet::new();
        let view_model = match self.view_model_with_sources(component, &mut sources) {
            Ok(view_model) => Some(view_model),
            Err(error) if error.is_resolution() => {
                tracing::debug!(
                    component = component.name(),
                    %error,
                    "rendering without a viewmodel"
                );
                None
            }
            Err(error) => return Err(error),
        };

        let host = component.host();
        let mut views = Vec::new();
        for declaration in component.view_declarations().iter() {
            let class = match declaration {
                Declaration::Class(class) => class.clone(),
                Declaration::Ident(ident) => {
                    load(host, host.config().view_path(ident), &mut sources)?
                }
            };
            views.push(ResolvedView {
                label: declaration.label().into(),
                view: class.instantiate_view()?,
                view_model: view_model.clone(),
            });
        }
        let views: Rc<[ResolvedView]> = views.into();

        tracing::debug!(
            component = component.name(),
            node = id.raw(),
            views = views.len(),
            "resolved views"
        );
        let mut entries = self.entries.borrow_mut();
        let entry = entries.entry(id).or_default();
        entry.sources.extend(sources);
        entry.views = Some(Rc::clone(&views));
        Ok(views)
    }

    /// Returns the viewmodel of `component`.
    ///
    /// An undeclared viewmodel is looked up under the component name.
    ///
    /// # Errors
    ///
    /// Returns [`track_core::Error::Resolution`] when nothing can be loaded,
    /// [`track_core::Error::TypeMismatch`] when the class is not a viewmodel,
    /// or a configuration error from the viewmodel's definer.
    pub fn view_model(&self, component: &Component) -> Result<Rc<ResolvedViewModel>> {
        self.view_model_with_sources(component, &mut BTreeSet::new())
    }

    /// Drops the entry of one node. Returns `true` when an entry existed.
    pub fn invalidate(&self, id: NodeId) -> bool {
        let removed = self.entries.borrow_mut().remove(&id);
        removed.is_some()
    }

    /// Drops the entries of every node whose resolution consulted `path`.
    ///
    /// Returns the number of entries dropped.
    pub fn invalidate_source(&self, path: &str) -> usize {
        let removed: Vec<CacheEntry> = {
            let mut entries = self.entries.borrow_mut();
            let stale: Vec<NodeId> = entries
                .iter()
                .filter(|(_, entry)| entry.sources.contains(path))
                .map(|(id, _)| *id)
                .collect();
            stale.iter().filter_map(|id| entries.remove(id)).collect()
        };
        removed.len()
    }

    /// Drops every entry. Returns the number of entries dropped.
    pub fn invalidate_all(&self) -> usize {
        let removed = core::mem::take(&mut *self.entries.borrow_mut());
        removed.len()
    }

    /// Returns `true` when `id` has an entry.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.entries.borrow().contains_key(&id)
    }

    /// Number of nodes with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` when no node has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn view_model_with_sources(
        &self,
        component: &Component,
        sources: &mut BTreeSet<String>,
    ) -> Result<Rc<ResolvedViewModel>> {
        let id = component.node_id();
        if let Some(view_model) = self.cached(id, |entry| entry.view_model.clone()) {
            return Ok(view_model);
        }

        let view_model = Rc::new(resolve_view_model(component, sources)?);
        tracing::trace!(
            component = component.name(),
            node = id.raw(),
            view_model = view_model.name(),
            "resolved viewmodel"
        );
        let mut entries = self.entries.borrow_mut();
        let entry = entries.entry(id).or_default();
        entry.sources.extend(sources.iter().cloned());
        entry.view_model = Some(Rc::clone(&view_model));
        Ok(view_model)
    }

    fn cached<T>(&self, id: NodeId, get: impl FnOnce(&CacheEntry) -> Option<T>) -> Option<T> {
        self.entries.borrow().get(&id).and_then(get)
    }
}

fn load(host: &Host, path: String, sources: &mut BTreeSet<String>) -> Result<Class> {
    let loaded = host.loader().load(&path);
    sources.insert(path);
    Ok(loaded?)
}

fn resolve_view_model(
    component: &Component,
    sources: &mut BTreeSet<String>,
) -> Result<ResolvedViewModel> {
    let host = component.host();
    let class = match component.metadata().view_model() {
        Some(Declaration::Class(class)) => class.clone(),
        Some(Declaration::Ident(ident)) => {
            load(host, host.config().view_model_path(ident), sources)?
        }
        None => load(host, host.config().view_model_path(component.name()), sources)?,
    };
    class.ensure(Capability::ViewModel)?;
    let metadata = build_view_model(&class)?;
    let instance = class.instantiate_view_model()?;
    Ok(ResolvedViewModel { metadata, instance })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache() {
        let cache = ResolutionCache::new();
        let id = NodeId::next();
        assert!(cache.is_empty());
        assert!(!cache.contains(id));
        assert!(!cache.invalidate(id));
        assert_eq!(cache.invalidate_all(), 0);
        assert_eq!(cache.invalidate_source("views/components/any"), 0);
    }
}
