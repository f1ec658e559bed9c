//! Minimal demo: a button that notifies listeners when clicked
//!
//! Run with `RUST_LOG=debug cargo run --example wave` to see registry logging.

use event_dispatcher::{EventDispatcher, EventRegistry, Listener, ListenerError};

struct Button {
    label: String,
    events: EventRegistry<String>,
}

impl Button {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            events: EventRegistry::new(),
        }
    }

    fn click(&self) -> Result<(), ListenerError> {
        println!("[{}] clicked", self.label);
        self.dispatch("click")
    }
}

impl EventDispatcher for Button {
    type Context = String;
    type Error = ListenerError;

    fn event_registry(&self) -> &EventRegistry<String> {
        &self.events
    }

    fn event_registry_mut(&mut self) -> &mut EventRegistry<String> {
        &mut self.events
    }
}

fn main() -> Result<(), ListenerError> {
    env_logger::init();

    let mut button = Button::new("OK");

    let beep = Listener::new(|_: Option<&String>| {
        println!("  beep");
        Ok(())
    });
    let say = Listener::new(|who: Option<&String>| {
        println!("  hello {}", who.map(String::as_str).unwrap_or("stranger"));
        Ok(())
    });

    button.subscribe("click", beep.clone(), None);
    button.subscribe("click", say.clone(), Some("Ana".to_string()));
    button.click()?;

    button.unsubscribe("click", &beep);
    button.click()?;

    Ok(())
}
