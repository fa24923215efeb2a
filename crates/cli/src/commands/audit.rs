//! ARIA audit of a fixture

use clap::Args;
use pairwise_common::{AuditIssue, InteractionEvent};
use std::path::PathBuf;

use super::{click_target, load_page};
use crate::output::{print_list, print_success, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct AuditArgs {
    /// Page fixture (HTML)
    pub fixture: PathBuf,

    /// Items to click before auditing; repeatable
    #[arg(long = "click", value_name = "TARGET")]
    pub clicks: Vec<String>,

    /// Skip the page-load restore
    #[arg(long)]
    pub no_restore: bool,
}

impl TableDisplay for AuditIssue {
    fn headers() -> Vec<&'static str> {
        vec!["Rule", "Element", "Message"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.rule.to_string(),
            self.context.clone(),
            self.message.clone(),
        ]
    }
}

pub fn run(args: &AuditArgs) -> anyhow::Result<Vec<AuditIssue>> {
    let mut page = load_page(&args.fixture)?;
    if !args.no_restore {
        page.restore()?;
    }
    for value in &args.clicks {
        page.dispatch(InteractionEvent::Click, &click_target(value))?;
    }
    Ok(pairwise_common::audit(page.document()))
}

/// Returns the number of issues found
pub fn execute(args: AuditArgs, format: OutputFormat) -> anyhow::Result<usize> {
    let issues = run(&args)?;
    if issues.is_empty() {
        if format == OutputFormat::Table {
            print_success("No accessibility issues found");
        } else {
            print_list(&issues, format);
        }
    } else {
        print_list(&issues, format);
    }
    Ok(issues.len())
}
