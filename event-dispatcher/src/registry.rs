//! Listener registry and dispatch
//!
//! The [`EventRegistry`] maps event names to the ordered list of listeners subscribed
//! to them. Insertion order is dispatch order, and an event name is only present in
//! the map while at least one listener is registered for it.

use crate::types::{Listener, ListenerEntry, ListenerError, ListenerResult};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

/// Per-host listener registry
pub struct EventRegistry<C, E = ListenerError> {
    listeners: HashMap<String, Vec<ListenerEntry<C, E>>>,
}

impl<C, E> EventRegistry<C, E> {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }

    /// Register `listener` for `event_name`
    ///
    /// The listener is appended after any listener already registered for the event.
    /// Registering the same listener twice is allowed; it then fires twice per dispatch.
    pub fn subscribe(
        &mut self,
        event_name: impl Into<String>,
        listener: Listener<C, E>,
        context: Option<C>,
    ) {
        let event_name = event_name.into();
        log::debug!("Subscribing listener to '{}'", event_name);
        self.listeners
            .entry(event_name)
            .or_default()
            .push(ListenerEntry::new(listener, context));
    }

    /// Wrap `callback` in a new listener, register it and return its handle
    ///
    /// # Example
    /// ```
    /// use event_dispatcher::EventRegistry;
    ///
    /// let mut registry: EventRegistry<()> = EventRegistry::new();
    /// let handle = registry.subscribe_fn("ready", |_| Ok(()), None);
    /// assert!(registry.has_callback_for("ready", &handle));
    ///
    /// registry.unsubscribe("ready", &handle);
    /// assert!(!registry.has_listener_for("ready"));
    /// ```
    pub fn subscribe_fn<F>(
        &mut self,
        event_name: impl Into<String>,
        callback: F,
        context: Option<C>,
    ) -> Listener<C, E>
    where
        F: Fn(Option<&C>) -> ListenerResult<E> + 'static,
    {
        let listener = Listener::new(callback);
        self.subscribe(event_name, listener.clone(), context);
        listener
    }

    /// Remove every registration of `listener` for `event_name`, whatever its context
    ///
    /// Unknown events and listeners that were never registered are ignored.
    pub fn unsubscribe(&mut self, event_name: &str, listener: &Listener<C, E>) {
        self.remove_where(event_name, |entry| entry.listener() == listener);
    }

    /// Remove the registrations of `listener` for `event_name` subscribed with `context`
    ///
    /// Registrations of the same listener under a different context are kept.
    pub fn unsubscribe_with_context(
        &mut self,
        event_name: &str,
        listener: &Listener<C, E>,
        context: Option<&C>,
    ) where
        C: PartialEq,
    {
        self.remove_where(event_name, |entry| {
            entry.listener() == listener && entry.context() == context
        });
    }

    fn remove_where<P>(&mut self, event_name: &str, matches: P)
    where
        P: Fn(&ListenerEntry<C, E>) -> bool,
    {
        let Some(entries) = self.listeners.get_mut(event_name) else {
            log::trace!("Unsubscribe from '{}' ignored: no listeners", event_name);
            return;
        };

        let before = entries.len();
        entries.retain(|entry| !matches(entry));
        let removed = before - entries.len();

        if entries.is_empty() {
            self.listeners.remove(event_name);
        }

        log::debug!("Unsubscribed {} listener(s) from '{}'", removed, event_name);
    }

    /// Invoke every listener registered for `event_name`, in registration order
    ///
    /// Listeners subscribed with a context receive `Some(&context)`, the others `None`.
    /// Dispatching an event with no listeners does nothing. The listener list is copied
    /// before the first invocation, see [`dispatch_entries`].
    ///
    /// # Errors
    /// The first listener that returns an error stops the dispatch: the listeners after
    /// it are not invoked and its error is returned as is.
    pub fn dispatch(&self, event_name: &str) -> ListenerResult<E> {
        dispatch_entries(event_name, &self.snapshot(event_name))
    }

    /// Dispatch `event_name` on a registry shared through a `RefCell`
    ///
    /// The registry is only borrowed while the listener list is copied, so listeners
    /// may subscribe or unsubscribe on the same registry while they run.
    ///
    /// # Example
    /// ```
    /// use event_dispatcher::{EventRegistry, Listener};
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    ///
    /// let registry: Rc<RefCell<EventRegistry<()>>> = Rc::default();
    /// let slot: Rc<RefCell<Option<Listener<()>>>> = Rc::default();
    ///
    /// // A listener that removes itself on its first invocation
    /// let (events, me) = (Rc::clone(&registry), Rc::clone(&slot));
    /// let once = Listener::new(move |_| {
    ///     if let Some(me) = me.borrow().as_ref() {
    ///         events.borrow_mut().unsubscribe("ready", me);
    ///     }
    ///     Ok(())
    /// });
    /// *slot.borrow_mut() = Some(once.clone());
    /// registry.borrow_mut().subscribe("ready", once, None);
    ///
    /// EventRegistry::dispatch_shared(&registry, "ready").unwrap();
    /// assert!(!registry.borrow().has_listener_for("ready"));
    /// ```
    pub fn dispatch_shared(registry: &RefCell<Self>, event_name: &str) -> ListenerResult<E> {
        let entries = registry.borrow().snapshot(event_name);
        dispatch_entries(event_name, &entries)
    }

    /// Copy of the registrations for `event_name`, in dispatch order
    pub fn snapshot(&self, event_name: &str) -> Vec<ListenerEntry<C, E>> {
        self.listeners_for(event_name).to_vec()
    }

    /// Check if at least one listener is registered for `event_name`
    pub fn has_listener_for(&self, event_name: &str) -> bool {
        self.listeners.contains_key(event_name)
    }

    /// Check if `listener` is registered for `event_name`
    pub fn has_callback_for(&self, event_name: &str, listener: &Listener<C, E>) -> bool {
        self.listeners_for(event_name)
            .iter()
            .any(|entry| entry.listener() == listener)
    }

    /// All registrations for `event_name`, in dispatch order
    pub fn listeners_for(&self, event_name: &str) -> &[ListenerEntry<C, E>] {
        self.listeners
            .get(event_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of registrations for `event_name`
    pub fn listener_count(&self, event_name: &str) -> usize {
        self.listeners_for(event_name).len()
    }

    /// Number of registrations across all events
    pub fn total_listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Names of the events that currently have listeners (unordered)
    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.listeners.keys().map(String::as_str)
    }

    /// True if no listener is registered at all
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Invoke `entries` in order, stopping at the first listener error
///
/// Works on a copy taken with [`EventRegistry::snapshot`]: a listener removed during
/// the dispatch still runs in it, and a listener added during the dispatch only runs
/// on the next one.
pub fn dispatch_entries<C, E>(
    event_name: &str,
    entries: &[ListenerEntry<C, E>],
) -> ListenerResult<E> {
    if entries.is_empty() {
        log::trace!("Dispatch of '{}' skipped: no listeners", event_name);
        return Ok(());
    }

    log::debug!("Dispatching '{}' to {} listener(s)", event_name, entries.len());

    for (index, entry) in entries.iter().enumerate() {
        log::trace!("Invoking listener #{} for '{}'", index, event_name);
        if let Err(e) = entry.invoke() {
            log::debug!("Listener #{} for '{}' failed, dispatch aborted", index, event_name);
            return Err(e);
        }
    }

    Ok(())
}

impl<C, E> Default for EventRegistry<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E> fmt::Debug for EventRegistry<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, entries) in &self.listeners {
            map.entry(name, &entries.len());
        }
        map.finish()
    }
}
