//! The host object scenarios are run against

use crate::callbacks::ScenarioListener;
use crate::report::RegisteredEvent;
use event_dispatcher::{EventDispatcher, EventRegistry, ListenerError};
use serde_json::Value;
use std::collections::HashMap;

/// A named host carrying its own listener registry
pub struct ScenarioHost {
    name: String,
    events: EventRegistry<Value, ListenerError>,
}

impl ScenarioHost {
    pub fn new(name: impl Into<String>) -> Self {
        let mut host = Self {
            name: name.into(),
            events: EventRegistry::new(),
        };
        host.augment();
        host
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registry contents, with listener handles mapped back to their declared names
    ///
    /// Events are sorted by name; listeners keep dispatch order.
    pub fn registered_events(
        &self,
        listeners: &HashMap<String, ScenarioListener>,
    ) -> Vec<RegisteredEvent> {
        let mut names: Vec<&str> = self.events.event_names().collect();
        names.sort_unstable();

        names
            .into_iter()
            .map(|event| RegisteredEvent {
                event: event.to_string(),
                listeners: self
                    .events
                    .listeners_for(event)
                    .iter()
                    .map(|entry| {
                        listeners
                            .iter()
                            .find(|(_, handle)| *handle == entry.listener())
                            .map(|(name, _)| name.clone())
                            .unwrap_or_else(|| "<anonymous>".to_string())
                    })
                    .collect(),
            })
            .collect()
    }
}

impl EventDispatcher for ScenarioHost {
    type Context = Value;
    type Error = ListenerError;

    fn event_registry(&self) -> &EventRegistry<Value, ListenerError> {
        &self.events
    }

    fn event_registry_mut(&mut self) -> &mut EventRegistry<Value, ListenerError> {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_dispatcher::Listener;

    #[test]
    fn test_registered_events_names_listeners() {
        let mut host = ScenarioHost::new("test");
        let greet: ScenarioListener = Listener::new(|_| Ok(()));
        let stray: ScenarioListener = Listener::new(|_| Ok(()));
        let known = HashMap::from([("greet".to_string(), greet.clone())]);

        host.subscribe("wave", greet.clone(), None);
        host.subscribe("wave", stray, None);
        host.subscribe("bow", greet, None);

        let events = host.registered_events(&known);

        assert_eq!(host.name(), "test");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event, "bow");
        assert_eq!(events[1].listeners, vec!["greet", "<anonymous>"]);
    }
}
