//! Core types for the event dispatcher library
//!
//! This module defines the listener handle, the registry entry that pairs a listener
//! with its optional context, and the default error type listeners can return.

use std::fmt;
use std::rc::Rc;

/// Result type returned by listener callbacks
pub type ListenerResult<E = ListenerError> = std::result::Result<(), E>;

/// Errors a listener can report back through `dispatch`
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("Listener failed: {0}")]
    Failed(String),
}

impl ListenerError {
    /// Create a `Failed` error from any message
    pub fn failed(message: impl Into<String>) -> Self {
        ListenerError::Failed(message.into())
    }
}

type Callback<C, E> = dyn Fn(Option<&C>) -> ListenerResult<E>;

/// A cloneable handle to a listener callback
///
/// Handles are compared by identity: clones of the same handle are equal, while two
/// handles built from identical closures are not. This is what `unsubscribe` and
/// `has_callback_for` match on.
///
/// The callback receives `Some(&context)` when the listener was subscribed with a
/// context, and `None` otherwise.
pub struct Listener<C, E = ListenerError> {
    callback: Rc<Callback<C, E>>,
}

impl<C, E> Listener<C, E> {
    /// Wrap a closure into a new listener handle
    ///
    /// # Example
    /// ```
    /// use event_dispatcher::Listener;
    ///
    /// let greet: Listener<String> = Listener::new(|name: Option<&String>| {
    ///     println!("hello {}", name.map(String::as_str).unwrap_or("world"));
    ///     Ok(())
    /// });
    /// assert_eq!(greet, greet.clone());
    /// ```
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(Option<&C>) -> ListenerResult<E> + 'static,
    {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Invoke the callback directly
    pub fn call(&self, context: Option<&C>) -> ListenerResult<E> {
        (self.callback)(context)
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.callback) as *const ()
    }
}

impl<C, E> Clone for Listener<C, E> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<C, E> PartialEq for Listener<C, E> {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl<C, E> Eq for Listener<C, E> {}

impl<C, E> fmt::Debug for Listener<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", self.addr())
    }
}

/// A registered listener together with the context it was subscribed with
///
/// Entries are cheap to clone: the listener and its context are both shared, so a
/// dispatch can work on a copy of the list while listeners change the registry.
pub struct ListenerEntry<C, E = ListenerError> {
    listener: Listener<C, E>,
    context: Option<Rc<C>>,
}

impl<C, E> ListenerEntry<C, E> {
    pub(crate) fn new(listener: Listener<C, E>, context: Option<C>) -> Self {
        Self {
            listener,
            context: context.map(Rc::new),
        }
    }

    /// The registered listener handle
    pub fn listener(&self) -> &Listener<C, E> {
        &self.listener
    }

    /// The context passed to the listener on dispatch, if any
    pub fn context(&self) -> Option<&C> {
        self.context.as_deref()
    }

    /// Invoke the listener with the stored context
    pub fn invoke(&self) -> ListenerResult<E> {
        self.listener.call(self.context.as_deref())
    }
}

impl<C, E> Clone for ListenerEntry<C, E> {
    fn clone(&self) -> Self {
        Self {
            listener: self.listener.clone(),
            context: self.context.clone(),
        }
    }
}

impl<C: fmt::Debug, E> fmt::Debug for ListenerEntry<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("listener", &self.listener)
            .field("context", &self.context)
            .finish()
    }
}
