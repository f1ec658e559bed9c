//! Host augmentation
//!
//! Any type can gain dispatch capability by embedding an [`EventRegistry`] and
//! implementing [`EventDispatcher`]: the two accessors are the only required methods,
//! everything else is delegated to the embedded registry.
//!
//! # Example
//! ```
//! use event_dispatcher::{EventDispatcher, EventRegistry, Listener, ListenerError};
//!
//! #[derive(Default)]
//! struct Door {
//!     events: EventRegistry<&'static str>,
//! }
//!
//! impl EventDispatcher for Door {
//!     type Context = &'static str;
//!     type Error = ListenerError;
//!
//!     fn event_registry(&self) -> &EventRegistry<Self::Context, Self::Error> {
//!         &self.events
//!     }
//!
//!     fn event_registry_mut(&mut self) -> &mut EventRegistry<Self::Context, Self::Error> {
//!         &mut self.events
//!     }
//! }
//!
//! let mut door = Door::default();
//! let on_open = Listener::new(|_| Ok(()));
//! door.subscribe("open", on_open.clone(), Some("front"));
//! door.dispatch("open").unwrap();
//! assert!(door.has_callback_for("open", &on_open));
//! ```

use crate::registry::EventRegistry;
use crate::types::{Listener, ListenerResult};

/// Event dispatch capability for a host type that embeds an [`EventRegistry`]
///
/// Each host owns its own registry, so listener state is never shared between hosts.
pub trait EventDispatcher {
    /// Context value listeners may be subscribed with
    type Context;

    /// Error type listeners return
    type Error;

    /// The host's registry
    fn event_registry(&self) -> &EventRegistry<Self::Context, Self::Error>;

    /// The host's registry, mutably
    fn event_registry_mut(&mut self) -> &mut EventRegistry<Self::Context, Self::Error>;

    /// Reset the host's registry to a fresh, empty one
    ///
    /// Any listener registered before is discarded.
    fn augment(&mut self) {
        log::debug!(
            "Augmenting host, discarding {} listener(s)",
            self.event_registry().total_listener_count()
        );
        *self.event_registry_mut() = EventRegistry::new();
    }

    /// See [`EventRegistry::subscribe`]
    fn subscribe(
        &mut self,
        event_name: impl Into<String>,
        listener: Listener<Self::Context, Self::Error>,
        context: Option<Self::Context>,
    ) {
        self.event_registry_mut().subscribe(event_name, listener, context);
    }

    /// See [`EventRegistry::unsubscribe`]
    fn unsubscribe(&mut self, event_name: &str, listener: &Listener<Self::Context, Self::Error>) {
        self.event_registry_mut().unsubscribe(event_name, listener);
    }

    /// See [`EventRegistry::dispatch`]
    ///
    /// For a host shared through `Rc<RefCell<_>>`, take
    /// [`EventRegistry::snapshot`] under a short borrow and pass it to
    /// [`dispatch_entries`](crate::registry::dispatch_entries) instead, so listeners can
    /// change the host's registry while they run.
    fn dispatch(&self, event_name: &str) -> ListenerResult<Self::Error> {
        self.event_registry().dispatch(event_name)
    }

    /// See [`EventRegistry::has_listener_for`]
    fn has_listener_for(&self, event_name: &str) -> bool {
        self.event_registry().has_listener_for(event_name)
    }

    /// See [`EventRegistry::has_callback_for`]
    fn has_callback_for(
        &self,
        event_name: &str,
        listener: &Listener<Self::Context, Self::Error>,
    ) -> bool {
        self.event_registry().has_callback_for(event_name, listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ListenerError;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Host {
        registry: EventRegistry<u32>,
    }

    impl EventDispatcher for Host {
        type Context = u32;
        type Error = ListenerError;

        fn event_registry(&self) -> &EventRegistry<u32> {
            &self.registry
        }

        fn event_registry_mut(&mut self) -> &mut EventRegistry<u32> {
            &mut self.registry
        }
    }

    fn counter() -> (Listener<u32>, Rc<Cell<u32>>) {
        let total = Rc::new(Cell::new(0));
        let total_clone = Rc::clone(&total);
        let listener = Listener::new(move |ctx: Option<&u32>| {
            total_clone.set(total_clone.get() + ctx.copied().unwrap_or(1));
            Ok(())
        });
        (listener, total)
    }

    #[test]
    fn test_host_delegates_to_registry() {
        let mut host = Host::default();
        let (listener, total) = counter();

        host.subscribe("add", listener.clone(), Some(5));
        assert!(host.has_listener_for("add"));
        assert!(host.has_callback_for("add", &listener));

        host.dispatch("add").unwrap();
        assert_eq!(total.get(), 5);

        host.unsubscribe("add", &listener);
        assert!(!host.has_listener_for("add"));
        assert!(!host.has_callback_for("add", &listener));
    }

    #[test]
    fn test_no_shared_store_between_hosts() {
        let mut first = Host::default();
        let second = Host::default();
        let (listener, _) = counter();

        first.subscribe("add", listener.clone(), None);

        assert!(first.has_callback_for("add", &listener));
        assert!(!second.has_callback_for("add", &listener));
        assert!(!second.has_listener_for("add"));
    }

    #[test]
    fn test_augment_discards_listeners() {
        let mut host = Host::default();
        let (listener, total) = counter();

        host.subscribe("add", listener.clone(), None);
        host.augment();
        host.dispatch("add").unwrap();

        assert!(!host.has_listener_for("add"));
        assert_eq!(total.get(), 0);
    }
}
