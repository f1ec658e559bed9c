//! Scenario runner
//!
//! Drives a [`ScenarioHost`] through the scripted steps and collects a report.

use crate::callbacks::{build_listeners, ScenarioListener};
use crate::config::{ScenarioConfig, ScenarioError, StepConfig};
use crate::host::ScenarioHost;
use crate::report::{DispatchRecord, ExpectationResult, ScenarioReport};
use crate::state::InvocationLog;
use anyhow::Result;
use event_dispatcher::EventDispatcher;
use std::collections::HashMap;
use std::rc::Rc;

/// Run every step of `config` against a fresh host
///
/// A failing dispatch stops the run unless `continue_on_error` is set; either way it
/// is recorded in the report rather than returned as an error.
pub fn run_scenario(
    config: &ScenarioConfig,
    name: &str,
    continue_on_error: bool,
) -> Result<ScenarioReport> {
    log::info!("Running scenario '{}' ({} step(s))", name, config.steps.len());

    let recorder = Rc::new(InvocationLog::new());
    let listeners = build_listeners(&config.listeners, &recorder);
    let mut host = ScenarioHost::new(name);

    let mut dispatches = Vec::new();
    let mut expectations = Vec::new();
    let mut steps_run = 0;
    let mut aborted = false;

    for (index, step) in config.steps.iter().enumerate() {
        let step_no = index + 1;
        steps_run = step_no;

        match step {
            StepConfig::Subscribe { event, listener, context } => {
                let handle = lookup(&listeners, step_no, listener)?;
                host.subscribe(event.as_str(), handle.clone(), context.clone());
            }
            StepConfig::Unsubscribe { event, listener } => {
                let handle = lookup(&listeners, step_no, listener)?;
                host.unsubscribe(event, handle);
            }
            StepConfig::Dispatch { event } => {
                let registered = host.event_registry().listener_count(event);
                recorder.begin_dispatch(step_no, event);
                let outcome = host.dispatch(event);
                recorder.end_dispatch();

                let error = outcome.err().map(|e| e.to_string());
                if let Some(err) = &error {
                    log::warn!("Step {}: dispatch of '{}' failed: {}", step_no, event, err);
                }
                let failed = error.is_some();
                dispatches.push(DispatchRecord {
                    step: step_no,
                    event: event.clone(),
                    registered,
                    error,
                });

                if failed && !continue_on_error {
                    log::warn!("Aborting scenario '{}' at step {}", host.name(), step_no);
                    aborted = true;
                    break;
                }
            }
            StepConfig::Expect { event, listener, present } => {
                let actual = match listener {
                    Some(listener) => {
                        let handle = lookup(&listeners, step_no, listener)?;
                        host.has_callback_for(event, handle)
                    }
                    None => host.has_listener_for(event),
                };
                if actual != *present {
                    log::warn!("Step {}: expectation on '{}' failed", step_no, event);
                }
                expectations.push(ExpectationResult {
                    step: step_no,
                    event: event.clone(),
                    listener: listener.clone(),
                    expected: *present,
                    actual,
                });
            }
        }
    }

    log::info!(
        "Scenario '{}' finished: {} invocation(s), {} dispatch(es)",
        name,
        recorder.len(),
        dispatches.len()
    );

    Ok(ScenarioReport {
        scenario: name.to_string(),
        generated_at: chrono::Utc::now(),
        steps_total: config.steps.len(),
        steps_run,
        aborted,
        dispatches,
        invocations: recorder.invocations(),
        expectations,
        registry: host.registered_events(&listeners),
    })
}

fn lookup<'a>(
    listeners: &'a HashMap<String, ScenarioListener>,
    step: usize,
    name: &str,
) -> Result<&'a ScenarioListener, ScenarioError> {
    listeners.get(name).ok_or_else(|| ScenarioError::UnknownListener {
        step,
        name: name.to_string(),
    })
}
