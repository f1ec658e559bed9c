//! Declarative listeners
//!
//! Turns the `[[listeners]]` entries of a scenario into listener handles that report
//! to the shared [`InvocationLog`].

use crate::config::{ListenerAction, ListenerConfig};
use crate::state::InvocationLog;
use event_dispatcher::{Listener, ListenerError};
use serde_json::Value;
use std::collections::HashMap;
use std::rc::Rc;

/// Listener handle type used by the scenario host
pub type ScenarioListener = Listener<Value, ListenerError>;

/// Build the listener described by `config`
pub fn build_listener(config: &ListenerConfig, log: &Rc<InvocationLog>) -> ScenarioListener {
    let name = config.name.clone();
    let message = config.message.clone();
    let log = Rc::clone(log);

    match config.action {
        ListenerAction::Record => Listener::new(move |ctx: Option<&Value>| {
            log.record(&name, ctx, message.as_deref());
            Ok(())
        }),
        ListenerAction::Fail => {
            let error = message.unwrap_or_else(|| format!("listener '{}' failed", name));
            Listener::new(move |ctx: Option<&Value>| {
                log.record(&name, ctx, Some(&error));
                Err(ListenerError::failed(error.clone()))
            })
        }
    }
}

/// Build every declared listener, keyed by name
pub fn build_listeners(
    configs: &[ListenerConfig],
    log: &Rc<InvocationLog>,
) -> HashMap<String, ScenarioListener> {
    configs
        .iter()
        .map(|config| (config.name.clone(), build_listener(config, log)))
        .collect()
}
