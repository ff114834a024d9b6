//! Global event subscriptions.
//!
//! A component declares `event("scroll", "on_scroll")` in its definer. When
//! the host initializes the component, each declaration is turned into a
//! listener bound to that component and registered on the runtime's global
//! target. The listeners are retained so teardown removes exactly the values
//! that were registered.
//!
//! Binding only happens when the [`Runtime`] reports a global target (a
//! browser window, a desktop shell); on a headless runtime it is a no-op.

use alloc::rc::Rc;
use core::{cell::RefCell, fmt};

use serde_json::Value;
use track_core::{Error, Result};

use crate::component::Component;

/// A callable registered on a global event target.
pub type Listener = Rc<dyn Fn(&GlobalEvent)>;

/// An event dispatched by a global target.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalEvent {
    name: String,
    detail: Value,
}

impl GlobalEvent {
    /// Creates an event without payload.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_detail(name, Value::Null)
    }

    /// Creates an event carrying `detail`.
    pub fn with_detail(name: impl Into<String>, detail: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            detail: detail.into(),
        }
    }

    /// Event name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Event payload.
    #[must_use]
    pub const fn detail(&self) -> &Value {
        &self.detail
    }
}

/// A global event target such as a window.
pub trait EventTarget {
    /// Registers `listener` for `event`.
    fn add_listener(&self, event: &str, listener: &Listener);

    /// Removes a listener previously passed to [`EventTarget::add_listener`].
    ///
    /// Implementations must compare listeners by identity.
    fn remove_listener(&self, event: &str, listener: &Listener);
}

/// The runtime environment a host runs in.
pub trait Runtime {
    /// Returns `true` when a global event target exists.
    fn has_global_events(&self) -> bool;

    /// The global event target. Only consulted when
    /// [`Runtime::has_global_events`] returns `true`.
    fn global_target(&self) -> &dyn EventTarget;
}

impl<R: Runtime + ?Sized> Runtime for Rc<R> {
    fn has_global_events(&self) -> bool {
        (**self).has_global_events()
    }

    fn global_target(&self) -> &dyn EventTarget {
        (**self).global_target()
    }
}

/// A runtime without global events, e.g. server-side rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl EventTarget for Headless {
    fn add_listener(&self, _event: &str, _listener: &Listener) {}

    fn remove_listener(&self, _event: &str, _listener: &Listener) {}
}

impl Runtime for Headless {
    fn has_global_events(&self) -> bool {
        false
    }

    fn global_target(&self) -> &dyn EventTarget {
        self
    }
}

/// An in-process global target that dispatches events to its listeners.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RefCell<Vec<(String, Listener)>>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.borrow();
        f.debug_list()
            .entries(listeners.iter().map(|(event, _)| event))
            .finish()
    }
}

impl ListenerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Invokes every listener registered for the event, in registration order.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, event: &GlobalEvent) -> usize {
        // Snapshot so listeners may (un)register while being dispatched.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(name, _)| name == event.name())
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    /// Number of listeners registered for `event`.
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(name, _)| name == event)
            .count()
    }

    /// Returns `true` when no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

impl EventTarget for ListenerRegistry {
    fn add_listener(&self, event: &str, listener: &Listener) {
        self.listeners
            .borrow_mut()
            .push((event.into(), Rc::clone(listener)));
    }

    fn remove_listener(&self, event: &str, listener: &Listener) {
        let mut listeners = self.listeners.borrow_mut();
        if let Some(index) = listeners
            .iter()
            .position(|(name, registered)| name == event && Rc::ptr_eq(registered, listener))
        {
            listeners.remove(index);
        }
    }
}

/// A runtime with an in-process global target.
#[derive(Debug, Default)]
pub struct Windowed {
    target: ListenerRegistry,
}

impl Windowed {
    /// Creates a runtime with an empty target.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The global target, for dispatching events.
    #[must_use]
    pub const fn target(&self) -> &ListenerRegistry {
        &self.target
    }
}

impl Runtime for Windowed {
    fn has_global_events(&self) -> bool {
        true
    }

    fn global_target(&self) -> &dyn EventTarget {
        &self.target
    }
}

/// A listener retained for removal.
#[derive(Clone)]
pub struct Subscription {
    event: String,
    listener: Listener,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

impl Subscription {
    /// Event name.
    #[must_use]
    pub fn event(&self) -> &str {
        &self.event
    }

    /// The exact listener registered on the target.
    #[must_use]
    pub const fn listener(&self) -> &Listener {
        &self.listener
    }
}

/// The global subscriptions of one component: `Unbound -> Bound -> Unbound`.
#[derive(Debug, Default)]
pub struct Subscriptions {
    bound: bool,
    entries: Vec<Subscription>,
}

impl Subscriptions {
    /// Returns `true` between a successful bind and the next unbind.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.bound
    }

    /// Retained subscriptions in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[Subscription] {
        &self.entries
    }

    /// Binds every event declared by `component`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyBound`] when called again before
    /// [`Subscriptions::unbind_all`].
    pub fn bind_all(&mut self, component: &Component, runtime: &dyn Runtime) -> Result<()> {
        if !runtime.has_global_events() {
            tracing::trace!(component = component.name(), "no global target; skipping event binding");
            return Ok(());
        }
        if self.bound {
            return Err(Error::AlreadyBound {
                component: component.name().into(),
            });
        }

        let target = runtime.global_target();
        for binding in component.metadata().events() {
            let Some(listener) = component.bound_handler(&binding.handler) else {
                // Handler names are validated at build time.
                continue;
            };
            target.add_listener(&binding.event, &listener);
            self.entries.push(Subscription {
                event: binding.event.clone(),
                listener,
            });
        }
        self.bound = true;
        tracing::debug!(
            component = component.name(),
            events = self.entries.len(),
            "bound global events"
        );
        Ok(())
    }

    /// Removes every retained listener from the global target.
    ///
    /// Returns the number of listeners removed.
    pub fn unbind_all(&mut self, component: &Component, runtime: &dyn Runtime) -> usize {
        if !runtime.has_global_events() {
            return 0;
        }
        let target = runtime.global_target();
        let removed = self.entries.len();
        for subscription in self.entries.drain(..) {
            target.remove_listener(&subscription.event, &subscription.listener);
        }
        self.bound = false;
        tracing::debug!(component = component.name(), removed, "unbound global events");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn registry_dispatches_by_name() {
        let registry = ListenerRegistry::new();
        let hits = Rc::new(Cell::new(0));
        let listener: Listener = {
            let hits = Rc::clone(&hits);
            Rc::new(move |_event| hits.set(hits.get() + 1))
        };
        registry.add_listener("scroll", &listener);

        assert_eq!(registry.dispatch(&GlobalEvent::new("scroll")), 1);
        assert_eq!(registry.dispatch(&GlobalEvent::new("resize")), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn removal_is_by_identity() {
        let registry = ListenerRegistry::new();
        let first: Listener = Rc::new(|_| {});
        let lookalike: Listener = Rc::new(|_| {});
        registry.add_listener("scroll", &first);

        registry.remove_listener("scroll", &lookalike);
        assert_eq!(registry.listener_count("scroll"), 1);

        registry.remove_listener("resize", &first);
        assert_eq!(registry.listener_count("scroll"), 1);

        registry.remove_listener("scroll", &first);
        assert!(registry.is_empty());
    }

    #[test]
    fn headless_has_no_global_events() {
        assert!(!Headless.has_global_events());
        assert!(Windowed::new().has_global_events());
    }

    #[test]
    fn event_payload() {
        let event = GlobalEvent::with_detail("scroll", 120);
        assert_eq!(event.name(), "scroll");
        assert_eq!(event.detail(), &Value::from(120));
    }
}
