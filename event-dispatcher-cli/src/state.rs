//! Invocation log shared between the runner and the declarative listeners

use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;

/// One listener invocation observed during a dispatch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invocation {
    /// 1-based index of the dispatch step
    pub step: usize,
    pub event: String,
    pub listener: String,
    pub context: Option<Value>,
    pub note: Option<String>,
}

/// Collects invocations while the runner dispatches events
///
/// The runner marks which step is dispatching; listeners only know their own name and
/// the context they were invoked with.
#[derive(Debug, Default)]
pub struct InvocationLog {
    current: RefCell<Option<(usize, String)>>,
    invocations: RefCell<Vec<Invocation>>,
}

impl InvocationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a dispatch step
    pub fn begin_dispatch(&self, step: usize, event: &str) {
        *self.current.borrow_mut() = Some((step, event.to_string()));
    }

    /// Mark the end of the current dispatch step
    pub fn end_dispatch(&self) {
        self.current.borrow_mut().take();
    }

    pub fn record(&self, listener: &str, context: Option<&Value>, note: Option<&str>) {
        let (step, event) = self
            .current
            .borrow()
            .clone()
            .unwrap_or_else(|| (0, String::new()));

        log::trace!("Recorded invocation of '{}' for '{}'", listener, event);
        self.invocations.borrow_mut().push(Invocation {
            step,
            event,
            listener: listener.to_string(),
            context: context.cloned(),
            note: note.map(str::to_string),
        });
    }

    pub fn len(&self) -> usize {
        self.invocations.borrow().len()
    }

    /// Snapshot of everything recorded so far
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }
}
