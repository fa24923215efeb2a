//! Submission check

use clap::Args;
use pairwise_common::{InteractionEvent, SubmitAction, SubmitCheck};
use serde::Serialize;
use std::path::PathBuf;

use super::{click_target, load_page};
use crate::output::{print_item, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct CheckArgs {
    /// Page fixture (HTML)
    pub fixture: PathBuf,

    /// Submit button: skip, confirm or other
    #[arg(long)]
    pub button: SubmitAction,

    /// Items to click before submitting; repeatable
    #[arg(long = "click", value_name = "TARGET")]
    pub clicks: Vec<String>,

    /// Skip the page-load restore
    #[arg(long)]
    pub no_restore: bool,
}

#[derive(Debug, Serialize)]
struct CheckDisplay {
    button: SubmitAction,
    #[serde(flatten)]
    check: SubmitCheck,
}

impl TableDisplay for CheckDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Button", "Outcome", "Message"]
    }

    fn row(&self) -> Vec<String> {
        let (outcome, message) = match &self.check {
            SubmitCheck::Accepted => ("accepted", "-".to_string()),
            SubmitCheck::Rejected { message } => ("rejected", message.clone()),
        };
        vec![
            format!("{:?}", self.button).to_lowercase(),
            outcome.to_string(),
            message,
        ]
    }
}

pub fn run(args: &CheckArgs) -> anyhow::Result<SubmitCheck> {
    let mut page = load_page(&args.fixture)?;
    if !args.no_restore {
        page.restore()?;
    }
    for value in &args.clicks {
        page.dispatch(InteractionEvent::Click, &click_target(value))?;
    }
    Ok(page.check_submission(args.button)?)
}

pub fn execute(args: CheckArgs, format: OutputFormat) -> anyhow::Result<()> {
    let check = run(&args)?;
    print_item(
        &CheckDisplay {
            button: args.button,
            check,
        },
        format,
    );
    Ok(())
}
