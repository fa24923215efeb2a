//! Declarative YAML scenario specification

use pairwise_common::{ItemState, SubmitAction};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{E2eError, E2eResult};

/// A complete scenario parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Unique name for this scenario
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering scenarios
    #[serde(default)]
    pub tags: Vec<String>,

    /// Inline page markup
    #[serde(default)]
    pub fixture: Option<String>,

    /// Page markup file, relative to the spec file
    #[serde(default)]
    pub fixture_file: Option<PathBuf>,

    /// Run the page-load restore before the first step
    #[serde(default = "default_restore_on_load")]
    pub restore_on_load: bool,

    /// Steps to execute in order
    pub steps: Vec<ScenarioStep>,

    /// Directory the spec was loaded from
    #[serde(skip)]
    pub source_dir: Option<PathBuf>,
}

fn default_restore_on_load() -> bool {
    true
}

/// A single step in a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Click an element by id
    Click { target: String },

    /// Press a key on an element by id
    Keypress { target: String },

    /// Replay the page-load restore
    Restore,

    /// Check whether the form would submit
    Submit {
        button: SubmitAction,
        expect_accepted: bool,
        #[serde(default)]
        expect_message: Option<String>,
    },

    /// Assert something about the elements matching a selector
    Assert {
        selector: String,
        #[serde(default)]
        count: Option<usize>,
        #[serde(default)]
        attribute: Option<AttributeAssertion>,
        #[serde(default)]
        has_class: Option<String>,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        text: Option<String>,
    },

    /// Assert the joint item state and hidden field
    AssertState {
        left: ItemState,
        right: ItemState,
        #[serde(default)]
        selected_item_id: Option<String>,
    },

    /// Assert the serialized page
    AssertHtml { html: String },

    /// Run the ARIA audit
    Audit {
        #[serde(default)]
        expect_issues: usize,
    },

    /// Log a message (for debugging)
    Log { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeAssertion {
    pub name: String,
    pub value: Option<String>,
    #[serde(default)]
    pub contains: Option<String>,
}

impl ScenarioSpec {
    /// Parse a scenario from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        serde_yaml::from_str(yaml).map_err(E2eError::from)
    }

    /// Parse a scenario from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut spec = Self::from_yaml(&content)
            .map_err(|e| E2eError::SpecParse(format!("{}: {}", path.display(), e)))?;
        spec.source_dir = path.parent().map(Path::to_path_buf);
        Ok(spec)
    }

    /// Load all scenarios from a directory
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut entries: Vec<PathBuf> = walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .collect();
        entries.sort();

        entries.iter().map(|p| Self::from_file(p)).collect()
    }

    /// Filter scenarios by tag
    pub fn filter_by_tag<'a>(specs: &'a [Self], tag: &str) -> Vec<&'a Self> {
        specs.iter().filter(|s| s.tags.iter().any(|t| t == tag)).collect()
    }

    /// Page markup for this scenario
    pub fn load_fixture(&self) -> E2eResult<String> {
        if let Some(html) = &self.fixture {
            return Ok(html.clone());
        }
        let file = self
            .fixture_file
            .as_ref()
            .ok_or_else(|| E2eError::MissingFixture(self.name.clone()))?;
        let path = match &self.source_dir {
            Some(dir) if file.is_relative() => dir.join(file),
            _ => file.clone(),
        };
        Ok(std::fs::read_to_string(path)?)
    }
}

impl ScenarioStep {
    /// Short label used in results and logs
    pub fn name(&self) -> String {
        match self {
            ScenarioStep::Click { target } => format!("click:{}", target),
            ScenarioStep::Keypress { target } => format!("keypress:{}", target),
            ScenarioStep::Restore => "restore".to_string(),
            ScenarioStep::Submit { button, .. } => format!("submit:{:?}", button).to_lowercase(),
            ScenarioStep::Assert { selector, .. } => format!("assert:{}", selector),
            ScenarioStep::AssertState { .. } => "assert_state".to_string(),
            ScenarioStep::AssertHtml { .. } => "assert_html".to_string(),
            ScenarioStep::Audit { .. } => "audit".to_string(),
            ScenarioStep::Log { .. } => "log".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_spec() {
        let yaml = r#"
name: select-then-tie
description: Clicking both items ties them
tags:
  - ties
  - smoke
fixture: '<img id="left-item" class="left-item">'
steps:
  - action: click
    target: left-item
  - action: assert_state
    left: selected
    right: unselected
    selected_item_id: "1"
  - action: submit
    button: confirm
    expect_accepted: true
  - action: restore
"#;
        let spec = ScenarioSpec::from_yaml(yaml).unwrap();
        assert_eq!(spec.name, "select-then-tie");
        assert_eq!(spec.steps.len(), 4);
        assert!(spec.restore_on_load);
        assert!(matches!(
            spec.steps[1],
            ScenarioStep::AssertState {
                left: ItemState::Selected,
                ..
            }
        ));
        assert_eq!(spec.steps[2].name(), "submit:confirm");
    }

    #[test]
    fn test_parse_assert_step() {
        let yaml = r#"
name: hints
fixture_file: fixtures/rank.html
restore_on_load: false
steps:
  - action: assert
    selector: .selected-hint
    count: 0
  - action: assert
    selector: '#left-item'
    attribute:
      name: aria-checked
      value: "false"
  - action: audit
"#;
        let spec = ScenarioSpec::from_yaml(yaml).unwrap();
        assert!(!spec.restore_on_load);
        assert_eq!(spec.fixture_file, Some(PathBuf::from("fixtures/rank.html")));
        assert!(matches!(spec.steps[2], ScenarioStep::Audit { expect_issues: 0 }));
    }

    #[test]
    fn test_missing_fixture() {
        let spec = ScenarioSpec::from_yaml("name: empty\nsteps: []\n").unwrap();
        assert!(matches!(spec.load_fixture(), Err(E2eError::MissingFixture(_))));
    }

    #[test]
    fn test_filter_by_tag() {
        let specs = vec![
            ScenarioSpec::from_yaml("name: a\ntags: [ties]\nsteps: []\n").unwrap(),
            ScenarioSpec::from_yaml("name: b\nsteps: []\n").unwrap(),
        ];
        let tied = ScenarioSpec::filter_by_tag(&specs, "ties");
        assert_eq!(tied.len(), 1);
        assert_eq!(tied[0].name, "a");
    }
}
