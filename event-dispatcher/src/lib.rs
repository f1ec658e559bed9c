//! Event Dispatcher Library
//!
//! A small, synchronous publish/subscribe building block: register listeners against
//! named events, remove them, and dispatch an event to every listener registered for it.
//!
//! # Architecture
//!
//! This library is intentionally minimal:
//! - [`EventRegistry`] owns the event name → listeners mapping and performs dispatch
//! - [`Listener`] is a cloneable callback handle compared by identity
//! - [`EventDispatcher`] lets any host type expose the registry operations by
//!   embedding a registry
//!
//! The library does NOT:
//! - Match events by wildcard or namespace
//! - Dispatch asynchronously or defer dispatch
//! - Isolate listeners from each other's failures
//! - Synchronize access across threads (registries are `!Send`)
//!
//! # Example Usage
//!
//! ```
//! use event_dispatcher::{EventRegistry, Listener};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let greetings = Rc::new(RefCell::new(Vec::new()));
//! let mut registry: EventRegistry<String> = EventRegistry::new();
//!
//! let log = Rc::clone(&greetings);
//! let greet = Listener::new(move |name: Option<&String>| {
//!     let name = name.map(String::as_str).unwrap_or("stranger");
//!     log.borrow_mut().push(format!("hello {}", name));
//!     Ok(())
//! });
//!
//! registry.subscribe("wave", greet.clone(), None);
//! registry.subscribe("wave", greet.clone(), Some("Ana".to_string()));
//! registry.dispatch("wave").unwrap();
//!
//! assert_eq!(*greetings.borrow(), vec!["hello stranger", "hello Ana"]);
//! ```

// Public modules
pub mod dispatcher;
pub mod registry;
pub mod types;

// Re-export main types for convenience
pub use dispatcher::EventDispatcher;
pub use registry::{dispatch_entries, EventRegistry};
pub use types::{Listener, ListenerEntry, ListenerError, ListenerResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
