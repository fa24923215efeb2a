//! Error types for scenario testing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Scenario spec parse error: {0}")]
    SpecParse(String),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Scenario '{0}' has no fixture")]
    MissingFixture(String),

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Accessibility audit failed: {0}")]
    AuditFailed(String),

    #[error("Page error: {0}")]
    Page(#[from] pairwise_common::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
