//! Scenario file loading and validation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A scenario loaded from a TOML file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioConfig {
    /// Display name (defaults to the file stem)
    pub name: Option<String>,
    /// Keep running after a dispatch fails
    #[serde(default)]
    pub continue_on_error: bool,
    #[serde(default)]
    pub listeners: Vec<ListenerConfig>,
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

/// A declarative listener
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenerConfig {
    pub name: String,
    #[serde(default)]
    pub action: ListenerAction,
    /// Note attached to recorded invocations, or the error message of a failing listener
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenerAction {
    /// Append an entry to the invocation log
    #[default]
    Record,
    /// Record the invocation, then return an error
    Fail,
}

/// One scripted operation on the scenario host
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StepConfig {
    Subscribe {
        event: String,
        listener: String,
        #[serde(default)]
        context: Option<Value>,
    },
    Unsubscribe {
        event: String,
        listener: String,
    },
    Dispatch {
        event: String,
    },
    /// Check `has_callback_for` when `listener` is set, `has_listener_for` otherwise
    Expect {
        event: String,
        #[serde(default)]
        listener: Option<String>,
        #[serde(default = "default_true")]
        present: bool,
    },
}

fn default_true() -> bool {
    true
}

impl StepConfig {
    pub fn listener(&self) -> Option<&str> {
        match self {
            StepConfig::Subscribe { listener, .. } | StepConfig::Unsubscribe { listener, .. } => {
                Some(listener.as_str())
            }
            StepConfig::Expect { listener, .. } => listener.as_deref(),
            StepConfig::Dispatch { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

/// Errors found while validating a scenario
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Listener '{0}' is declared more than once")]
    DuplicateListener(String),

    #[error("Step {step}: unknown listener '{name}'")]
    UnknownListener { step: usize, name: String },
}

impl ScenarioConfig {
    /// Check listener names are unique and every step references a declared listener
    pub fn validate(&self) -> std::result::Result<(), ScenarioError> {
        let mut names = HashSet::new();
        for listener in &self.listeners {
            if !names.insert(listener.name.as_str()) {
                return Err(ScenarioError::DuplicateListener(listener.name.clone()));
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            let step_no = index + 1;
            if let Some(name) = step.listener() {
                if !names.contains(name) {
                    return Err(ScenarioError::UnknownListener {
                        step: step_no,
                        name: name.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Scenario name, falling back to the file stem of `path`
    pub fn display_name(&self, path: &Path) -> String {
        self.name.clone().unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "scenario".to_string())
        })
    }
}

/// Load and validate a scenario from a TOML file
pub fn load_config(path: &Path) -> Result<ScenarioConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file: {:?}", path))?;

    let config = parse_config(&content)
        .with_context(|| format!("Invalid scenario file: {:?}", path))?;

    log::debug!(
        "Scenario has {} listener(s) and {} step(s)",
        config.listeners.len(),
        config.steps.len()
    );
    Ok(config)
}

/// Parse and validate a scenario from TOML text
pub fn parse_config(content: &str) -> Result<ScenarioConfig> {
    let config: ScenarioConfig = toml::from_str(content).context("Failed to parse TOML")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const WAVE: &str = r#"
        name = "wave"

        [[listeners]]
        name = "greet"

        [[listeners]]
        name = "greet_with_name"
        action = "record"
        message = "named greeting"

        [[steps]]
        op = "subscribe"
        event = "wave"
        listener = "greet"

        [[steps]]
        op = "subscribe"
        event = "wave"
        listener = "greet_with_name"
        context = { name = "Ana" }

        [[steps]]
        op = "dispatch"
        event = "wave"

        [[steps]]
        op = "expect"
        event = "wave"
        listener = "greet"
    "#;

    #[test]
    fn test_config_deserialization() {
        let config = parse_config(WAVE).unwrap();

        assert_eq!(config.name.as_deref(), Some("wave"));
        assert!(!config.continue_on_error);
        assert_eq!(config.listeners.len(), 2);
        assert_eq!(config.listeners[0].action, ListenerAction::Record);
        assert_eq!(config.steps.len(), 4);

        match &config.steps[1] {
            StepConfig::Subscribe { context, .. } => {
                assert_eq!(context.as_ref(), Some(&serde_json::json!({ "name": "Ana" })));
            }
            other => panic!("unexpected step: {:?}", other),
        }
        match &config.steps[3] {
            StepConfig::Expect { listener, present, .. } => {
                assert_eq!(listener.as_deref(), Some("greet"));
                assert!(*present);
            }
            other => panic!("unexpected step: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_listener_rejected() {
        let toml_content = r#"
            [[listeners]]
            name = "a"

            [[listeners]]
            name = "a"
            action = "fail"
        "#;

        let config: ScenarioConfig = toml::from_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ScenarioError::DuplicateListener(name)) if name == "a"
        ));
    }

    #[test]
    fn test_unknown_listener_rejected() {
        let toml_content = r#"
            [[steps]]
            op = "unsubscribe"
            event = "wave"
            listener = "ghost"
        "#;

        let err = parse_config(toml_content).unwrap_err();
        let validation = err.downcast_ref::<ScenarioError>().unwrap();
        assert!(matches!(
            validation,
            ScenarioError::UnknownListener { step: 1, name } if name == "ghost"
        ));
    }

    #[test]
    fn test_empty_event_name_accepted() {
        let toml_content = r#"
            [[listeners]]
            name = "a"

            [[steps]]
            op = "subscribe"
            event = ""
            listener = "a"
        "#;

        let config = parse_config(toml_content).unwrap();
        assert_eq!(config.steps[0].listener(), Some("a"));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(WAVE.replace("name = \"wave\"\n", "").as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        let expected_stem = file.path().file_stem().unwrap().to_string_lossy().into_owned();

        assert_eq!(config.name, None);
        assert_eq!(config.display_name(file.path()), expected_stem);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/scenario.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read scenario file"));
    }
}
