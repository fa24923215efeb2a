//! Scenario runner that loads specs, drives pages and collects results

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::error::{E2eError, E2eResult};
use crate::session::{PageSession, StepResult};
use crate::spec::ScenarioSpec;

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

/// Result of running all scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

impl ScenarioSuiteResult {
    pub fn from_results(results: Vec<ScenarioResult>, duration_ms: u64) -> Self {
        let passed = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
            duration_ms,
            results,
        }
    }
}

/// Configuration for the scenario runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub specs_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            specs_dir: PathBuf::from("scenarios"),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

/// Main scenario runner
pub struct ScenarioRunner {
    /// Scenario specs directory
    specs_dir: PathBuf,

    /// Output directory for results
    output_dir: PathBuf,
}

impl ScenarioRunner {
    /// Create a new runner with default configuration
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    /// Create a runner with custom configuration
    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            specs_dir: config.specs_dir,
            output_dir: config.output_dir,
        }
    }

    /// Run all scenarios in the specs directory
    pub fn run_all(&self) -> E2eResult<ScenarioSuiteResult> {
        let specs = ScenarioSpec::load_all(&self.specs_dir)?;
        Ok(self.run_specs(&specs))
    }

    /// Run scenarios matching a tag
    pub fn run_tagged(&self, tag: &str) -> E2eResult<ScenarioSuiteResult> {
        let specs = ScenarioSpec::load_all(&self.specs_dir)?;
        let filtered: Vec<ScenarioSpec> = ScenarioSpec::filter_by_tag(&specs, tag)
            .into_iter()
            .cloned()
            .collect();
        Ok(self.run_specs(&filtered))
    }

    /// Run a specific scenario by name
    pub fn run_test(&self, name: &str) -> E2eResult<ScenarioResult> {
        let specs = ScenarioSpec::load_all(&self.specs_dir)?;
        let spec = specs
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| E2eError::ScenarioNotFound(name.to_string()))?;

        self.run_spec(&spec)
    }

    /// Run a list of scenarios
    pub fn run_specs(&self, specs: &[ScenarioSpec]) -> ScenarioSuiteResult {
        let start = Instant::now();
        let mut results = Vec::new();

        info!("Running {} scenario(s)...", specs.len());

        for spec in specs {
            let result = match self.run_spec(spec) {
                Ok(result) => result,
                Err(e) => ScenarioResult {
                    name: spec.name.clone(),
                    success: false,
                    duration_ms: 0,
                    steps: vec![],
                    error: Some(e.to_string()),
                },
            };
            if result.success {
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let suite = ScenarioSuiteResult::from_results(results, start.elapsed().as_millis() as u64);

        info!(
            "Scenario Results: {} passed, {} failed ({} ms)",
            suite.passed, suite.failed, suite.duration_ms
        );

        suite
    }

    /// Run a single scenario, stopping at the first failing step
    pub fn run_spec(&self, spec: &ScenarioSpec) -> E2eResult<ScenarioResult> {
        let start = Instant::now();
        debug!("Running scenario: {}", spec.name);

        let fixture = spec.load_fixture()?;
        let mut session = PageSession::open(&fixture, spec.restore_on_load)?;

        let mut step_results = Vec::new();
        let mut scenario_error: Option<String> = None;

        for step in &spec.steps {
            let result = session.execute_step(step);
            if !result.success {
                scenario_error = Some(format!(
                    "{}: {}",
                    result.step_name,
                    result.error.as_deref().unwrap_or("unknown error")
                ));
                step_results.push(result);
                break;
            }
            step_results.push(result);
        }

        Ok(ScenarioResult {
            name: spec.name.clone(),
            success: scenario_error.is_none(),
            duration_ms: start.elapsed().as_millis() as u64,
            steps: step_results,
            error: scenario_error,
        })
    }

    /// Write scenario results to JSON file
    pub fn write_results(&self, results: &ScenarioSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("scenario-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
