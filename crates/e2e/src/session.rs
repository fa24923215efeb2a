//! Step execution against an in-memory page

use pairwise_common::{audit, InteractionEvent, ItemView, RankPage};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use crate::error::{E2eError, E2eResult};
use crate::spec::{AttributeAssertion, ScenarioStep};

/// Result of a single step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub step_name: String,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// One loaded page that steps run against
pub struct PageSession {
    page: RankPage,
}

impl PageSession {
    /// Parse the fixture, optionally running the page-load restore
    pub fn open(fixture: &str, restore_on_load: bool) -> E2eResult<Self> {
        let mut page = RankPage::parse(fixture)?;
        if restore_on_load {
            page.restore()?;
        }
        Ok(Self { page })
    }

    pub fn page(&self) -> &RankPage {
        &self.page
    }

    /// Execute a step, capturing failure in the result
    pub fn execute_step(&mut self, step: &ScenarioStep) -> StepResult {
        let start = Instant::now();
        let step_name = step.name();

        debug!("Executing step: {}", step_name);

        let result = self.run(step);
        let duration_ms = start.elapsed().as_millis() as u64;

        StepResult {
            success: result.is_ok(),
            step_name,
            duration_ms,
            error: result.err().map(|e| e.to_string()),
        }
    }

    fn run(&mut self, step: &ScenarioStep) -> E2eResult<()> {
        match step {
            ScenarioStep::Click { target } => self.dispatch(InteractionEvent::Click, target),
            ScenarioStep::Keypress { target } => self.dispatch(InteractionEvent::KeyPress, target),
            ScenarioStep::Restore => {
                self.page.restore()?;
                Ok(())
            }
            ScenarioStep::Submit {
                button,
                expect_accepted,
                expect_message,
            } => {
                let check = self.page.check_submission(*button)?;
                if check.is_accepted() != *expect_accepted {
                    return Err(E2eError::AssertionFailed(format!(
                        "expected accepted={} for {:?}, got {:?}",
                        expect_accepted, button, check
                    )));
                }
                if let (Some(expected), pairwise_common::SubmitCheck::Rejected { message }) =
                    (expect_message, &check)
                {
                    if expected != message {
                        return Err(E2eError::AssertionFailed(format!(
                            "expected rejection message '{}', got '{}'",
                            expected, message
                        )));
                    }
                }
                Ok(())
            }
            ScenarioStep::Assert {
                selector,
                count,
                attribute,
                has_class,
                value,
                text,
            } => self.assert(
                selector,
                *count,
                attribute.as_ref(),
                has_class.as_deref(),
                value.as_deref(),
                text.as_deref(),
            ),
            ScenarioStep::AssertState {
                left,
                right,
                selected_item_id,
            } => {
                let state = self.page.current_state()?;
                if state.left != *left || state.right != *right {
                    return Err(E2eError::AssertionFailed(format!(
                        "expected state ({}, {}), got ({}, {})",
                        left, right, state.left, state.right
                    )));
                }
                if let Some(expected) = selected_item_id {
                    let actual = self.page.selected_item_id()?;
                    if &actual != expected {
                        return Err(E2eError::AssertionFailed(format!(
                            "expected selected_item_id '{}', got '{}'",
                            expected, actual
                        )));
                    }
                }
                Ok(())
            }
            ScenarioStep::AssertHtml { html } => {
                let actual = self.page.to_html();
                if actual.trim() != html.trim() {
                    return Err(E2eError::AssertionFailed(format!(
                        "page markup differs\nexpected: {}\n  actual: {}",
                        html.trim(),
                        actual.trim()
                    )));
                }
                Ok(())
            }
            ScenarioStep::Audit { expect_issues } => {
                let issues = audit(self.page.document());
                if issues.len() != *expect_issues {
                    let summary: Vec<String> = issues
                        .iter()
                        .map(|i| format!("[{}] {} at {}", i.rule, i.message, i.context))
                        .collect();
                    return Err(E2eError::AuditFailed(format!(
                        "expected {} issue(s), found {}: {}",
                        expect_issues,
                        issues.len(),
                        summary.join("; ")
                    )));
                }
                Ok(())
            }
            ScenarioStep::Log { message } => {
                info!("[SCENARIO LOG] {}", message);
                Ok(())
            }
        }
    }

    fn dispatch(&mut self, event: InteractionEvent, target: &str) -> E2eResult<()> {
        let target = target.trim_start_matches('#');
        self.page.dispatch(event, target)?;
        Ok(())
    }

    fn assert(
        &self,
        selector: &str,
        count: Option<usize>,
        attribute: Option<&AttributeAssertion>,
        has_class: Option<&str>,
        value: Option<&str>,
        text: Option<&str>,
    ) -> E2eResult<()> {
        let doc = self.page.document();
        let nodes = doc.query_selector_all(selector)?;

        if let Some(expected) = count {
            if nodes.len() != expected {
                return Err(E2eError::AssertionFailed(format!(
                    "expected {} element(s) matching '{}', found {}",
                    expected,
                    selector,
                    nodes.len()
                )));
            }
        }

        let checks_elements =
            attribute.is_some() || has_class.is_some() || value.is_some() || text.is_some();
        if checks_elements && nodes.is_empty() {
            return Err(E2eError::AssertionFailed(format!(
                "no element matches '{}'",
                selector
            )));
        }

        for node in nodes {
            if let Some(attr) = attribute {
                let actual = doc.attr(node, &attr.name);
                if let Some(expected) = &attr.value {
                    if actual != Some(expected.as_str()) {
                        return Err(E2eError::AssertionFailed(format!(
                            "'{}' attribute {}: expected {:?}, got {:?}",
                            selector, attr.name, expected, actual
                        )));
                    }
                }
                if let Some(needle) = &attr.contains {
                    if !actual.map(|a| a.contains(needle.as_str())).unwrap_or(false) {
                        return Err(E2eError::AssertionFailed(format!(
                            "'{}' attribute {} does not contain {:?}",
                            selector, attr.name, needle
                        )));
                    }
                }
            }
            if let Some(class_name) = has_class {
                if !doc.has_class(node, class_name) {
                    return Err(E2eError::AssertionFailed(format!(
                        "'{}' lacks class '{}'",
                        selector, class_name
                    )));
                }
            }
            if let Some(expected) = value {
                let actual = doc.value(node)?;
                if actual != expected {
                    return Err(E2eError::AssertionFailed(format!(
                        "'{}' value: expected '{}', got '{}'",
                        selector, expected, actual
                    )));
                }
            }
            if let Some(expected) = text {
                let actual = doc.text_content(node);
                if actual != expected {
                    return Err(E2eError::AssertionFailed(format!(
                        "'{}' text: expected '{}', got '{}'",
                        selector, expected, actual
                    )));
                }
            }
        }

        Ok(())
    }
}
