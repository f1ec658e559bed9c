//! Report generation
//!
//! Renders the outcome of a scenario run as plain text or JSON.

use crate::config::OutputFormat;
use crate::state::Invocation;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

/// Result of one dispatch step
#[derive(Debug, Clone, Serialize)]
pub struct DispatchRecord {
    pub step: usize,
    pub event: String,
    /// Listeners registered when the dispatch started
    pub registered: usize,
    /// Error returned by the listener that aborted the dispatch
    pub error: Option<String>,
}

/// Result of one expect step
#[derive(Debug, Clone, Serialize)]
pub struct ExpectationResult {
    pub step: usize,
    pub event: String,
    pub listener: Option<String>,
    pub expected: bool,
    pub actual: bool,
}

impl ExpectationResult {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

/// An event still registered at the end of the run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisteredEvent {
    pub event: String,
    pub listeners: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub generated_at: DateTime<Utc>,
    pub steps_total: usize,
    pub steps_run: usize,
    /// True if a failed dispatch stopped the run early
    pub aborted: bool,
    pub dispatches: Vec<DispatchRecord>,
    pub invocations: Vec<Invocation>,
    pub expectations: Vec<ExpectationResult>,
    pub registry: Vec<RegisteredEvent>,
}

impl ScenarioReport {
    pub fn failed_expectations(&self) -> usize {
        self.expectations.iter().filter(|e| !e.passed()).count()
    }

    pub fn failed_dispatches(&self) -> usize {
        self.dispatches.iter().filter(|d| d.error.is_some()).count()
    }

    /// True if the run completed and every expectation held
    pub fn passed(&self) -> bool {
        !self.aborted && self.failed_expectations() == 0
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Txt => Ok(self.render_txt()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    fn render_txt(&self) -> String {
        let mut out = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(out, "Scenario: {}", self.scenario);
        let _ = writeln!(out, "Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(out, "Steps: {}/{}", self.steps_run, self.steps_total);

        let _ = writeln!(out, "\nDispatches:");
        if self.dispatches.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for d in &self.dispatches {
            match &d.error {
                None => {
                    let _ = writeln!(
                        out,
                        "  #{:<3} {:<20} {} listener(s)",
                        d.step, d.event, d.registered
                    );
                }
                Some(err) => {
                    let _ = writeln!(
                        out,
                        "  #{:<3} {:<20} {} listener(s), FAILED: {}",
                        d.step, d.event, d.registered, err
                    );
                }
            }
        }

        let _ = writeln!(out, "\nInvocations:");
        if self.invocations.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for inv in &self.invocations {
            let context = inv
                .context
                .as_ref()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string());
            let _ = write!(
                out,
                "  #{:<3} {:<20} {:<20} {}",
                inv.step, inv.event, inv.listener, context
            );
            if let Some(note) = &inv.note {
                let _ = write!(out, "  ({})", note);
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "\nExpectations:");
        if self.expectations.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for e in &self.expectations {
            let target = match &e.listener {
                Some(listener) => format!("{} -> {}", e.event, listener),
                None => e.event.clone(),
            };
            let _ = writeln!(
                out,
                "  #{:<3} {:<4} {} (expected {}, got {})",
                e.step,
                if e.passed() { "ok" } else { "FAIL" },
                target,
                e.expected,
                e.actual
            );
        }

        let _ = writeln!(out, "\nRegistry:");
        if self.registry.is_empty() {
            let _ = writeln!(out, "  (empty)");
        }
        for r in &self.registry {
            let _ = writeln!(out, "  {:<20} {}", r.event, r.listeners.join(", "));
        }

        let _ = writeln!(out, "\nSummary:");
        let _ = writeln!(out, "  Dispatch failures:    {}", self.failed_dispatches());
        let _ = writeln!(out, "  Failed expectations:  {}", self.failed_expectations());
        let _ = writeln!(
            out,
            "  Result:               {}",
            if self.passed() {
                "PASSED"
            } else if self.aborted {
                "ABORTED"
            } else {
                "FAILED"
            }
        );

        out
    }
}
