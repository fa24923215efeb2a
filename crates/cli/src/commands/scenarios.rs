//! Run YAML scenarios through the e2e harness

use clap::Args;
use pairwise_e2e::runner::{RunnerConfig, ScenarioResult, ScenarioSuiteResult};
use pairwise_e2e::ScenarioRunner;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::ScenarioConfig;
use crate::output::{print_error, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct ScenarioArgs {
    /// Scenario directory (defaults to the configured one)
    #[arg(long)]
    pub specs: Option<PathBuf>,

    /// Only run scenarios with this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Only run the named scenario
    #[arg(long)]
    pub name: Option<String>,

    /// Results directory (defaults to the configured one)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct ResultDisplay<'a>(&'a ScenarioResult);

impl TableDisplay for ResultDisplay<'_> {
    fn headers() -> Vec<&'static str> {
        vec!["Scenario", "Status", "Steps", "Duration", "Error"]
    }

    fn row(&self) -> Vec<String> {
        let r = self.0;
        vec![
            r.name.clone(),
            if r.success { "✅ passed" } else { "❌ failed" }.to_string(),
            r.steps.len().to_string(),
            format!("{} ms", r.duration_ms),
            r.error.clone().unwrap_or_else(|| "-".to_string()),
        ]
    }
}

pub fn run(args: &ScenarioArgs, config: &ScenarioConfig) -> anyhow::Result<ScenarioSuiteResult> {
    let runner = ScenarioRunner::with_config(RunnerConfig {
        specs_dir: args.specs.clone().unwrap_or_else(|| config.specs_dir.clone()),
        output_dir: args.output.clone().unwrap_or_else(|| config.output_dir.clone()),
    });

    let suite = match (&args.name, &args.tag) {
        (Some(name), _) => {
            let result = runner.run_test(name)?;
            ScenarioSuiteResult::from_results(vec![result.clone()], result.duration_ms)
        }
        (None, Some(tag)) => runner.run_tagged(tag)?,
        (None, None) => runner.run_all()?,
    };
    runner.write_results(&suite)?;
    Ok(suite)
}

/// Returns the number of failed scenarios
pub fn execute(
    args: ScenarioArgs,
    config: &ScenarioConfig,
    format: OutputFormat,
) -> anyhow::Result<usize> {
    let suite = run(&args, config)?;
    let rows: Vec<ResultDisplay> = suite.results.iter().map(ResultDisplay).collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&suite)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&suite)?),
        _ => {
            print_list(&rows, format);
            let summary = format!(
                "{} passed, {} failed ({} ms)",
                suite.passed, suite.failed, suite.duration_ms
            );
            if suite.failed == 0 {
                print_success(&summary);
            } else {
                print_error(&summary);
            }
        }
    }
    Ok(suite.failed)
}
