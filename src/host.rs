//! The host environment components are attached through.

use alloc::rc::Rc;
use core::fmt;

use track_core::{ClassRegistry, Loader, Result};

use crate::{
    cache::ResolutionCache,
    component::{Component, ComponentType},
    config::Config,
    events::{Headless, Runtime},
    node::Node,
};

struct HostInner {
    config: Config,
    loader: Rc<dyn Loader>,
    runtime: Rc<dyn Runtime>,
    cache: ResolutionCache,
}

/// Shared configuration, class loader, runtime and resolution cache.
///
/// Cloning yields another handle to the same host.
#[derive(Clone)]
pub struct Host(Rc<HostInner>);

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("config", &self.0.config)
            .field("global_events", &self.0.runtime.has_global_events())
            .field("cache", &self.0.cache)
            .finish_non_exhaustive()
    }
}

impl Host {
    /// Starts building a host.
    #[must_use]
    pub fn builder() -> HostBuilder {
        HostBuilder::new()
    }

    /// Host configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.0.config
    }

    /// Class loader used for identifier-form declarations.
    #[must_use]
    pub fn loader(&self) -> &dyn Loader {
        &*self.0.loader
    }

    /// The runtime environment.
    #[must_use]
    pub fn runtime(&self) -> &dyn Runtime {
        &*self.0.runtime
    }

    /// Per-node resolution cache.
    #[must_use]
    pub fn cache(&self) -> &ResolutionCache {
        &self.0.cache
    }

    /// Creates a component on `node` and runs its `init` and `create` hooks.
    ///
    /// # Errors
    ///
    /// Fails when the metadata of `ty` cannot be built or its events cannot
    /// be bound.
    pub fn mount(&self, ty: &Rc<ComponentType>, node: Node) -> Result<Component> {
        let component = Component::new(ty, node, self)?;
        component.on_init()?;
        component.on_create();
        Ok(component)
    }

    /// Runs the removal hooks of `component`.
    pub fn unmount(&self, component: &Component) {
        let removed = component.on_before_remove();
        component.on_remove();
        tracing::trace!(component = component.name(), listeners = removed, "unmounted");
    }
}

/// Builder for [`Host`].
///
/// Defaults to an empty [`ClassRegistry`], the [`Headless`] runtime and the
/// default [`Config`].
pub struct HostBuilder {
    config: Config,
    loader: Option<Rc<dyn Loader>>,
    runtime: Option<Rc<dyn Runtime>>,
}

impl fmt::Debug for HostBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostBuilder")
            .field("config", &self.config)
            .field("loader", &self.loader.is_some())
            .field("runtime", &self.runtime.is_some())
            .finish()
    }
}

impl Default for HostBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HostBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            loader: None,
            runtime: None,
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the class loader.
    #[must_use]
    pub fn with_loader(self, loader: impl Loader + 'static) -> Self {
        self.with_shared_loader(Rc::new(loader))
    }

    /// Sets a class loader shared with other owners.
    #[must_use]
    pub fn with_shared_loader(mut self, loader: Rc<dyn Loader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Sets the runtime.
    #[must_use]
    pub fn with_runtime(mut self, runtime: impl Runtime + 'static) -> Self {
        self.runtime = Some(Rc::new(runtime));
        self
    }

    /// Builds the host.
    #[must_use]
    pub fn build(self) -> Host {
        let loader = self
            .loader
            .unwrap_or_else(|| Rc::new(ClassRegistry::new()));
        let runtime = self.runtime.unwrap_or_else(|| Rc::new(Headless));
        tracing::debug!(
            kind = %self.config.kind,
            global_events = runtime.has_global_events(),
            "built host"
        );
        Host(Rc::new(HostInner {
            config: self.config,
            loader,
            runtime,
            cache: ResolutionCache::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Windowed;

    #[test]
    fn defaults_are_headless_and_empty() {
        let host = Host::builder().build();
        assert!(!host.runtime().has_global_events());
        assert!(host.loader().load("views/components/hoge").is_err());
        assert_eq!(host.config(), &Config::default());
        assert!(host.cache().is_empty());
    }

    #[test]
    fn builder_overrides() {
        let config = Config {
            kind: "page".into(),
            ..Config::default()
        };
        let host = Host::builder()
            .with_config(config)
            .with_runtime(Windowed::new())
            .build();
        assert_eq!(host.config().kind, "page");
        assert!(host.runtime().has_global_events());
    }
}
