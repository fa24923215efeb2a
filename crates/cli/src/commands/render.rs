//! Replay clicks and the page-load restore against a fixture

use clap::Args;
use pairwise_common::{InteractionEvent, RankPage};
use std::path::PathBuf;
use tracing::{debug, info};

use super::{click_target, load_page, PageSnapshot};
use crate::output::{print_item, OutputFormat};

#[derive(Args)]
pub struct RenderArgs {
    /// Page fixture (HTML)
    pub fixture: PathBuf,

    /// Item to click: left, right or an element id; repeatable
    #[arg(long = "click", value_name = "TARGET")]
    pub clicks: Vec<String>,

    /// Press a key on the targets instead of clicking
    #[arg(long)]
    pub keypress: bool,

    /// Skip the page-load restore
    #[arg(long)]
    pub no_restore: bool,
}

#[derive(Args)]
pub struct RestoreArgs {
    /// Page fixture (HTML)
    pub fixture: PathBuf,
}

pub fn run(args: &RenderArgs) -> anyhow::Result<RankPage> {
    let mut page = load_page(&args.fixture)?;
    if !args.no_restore {
        if let Some(state) = page.restore()? {
            info!(left = %state.left, right = %state.right, "restored prior outcome");
        }
    }

    let event = if args.keypress {
        InteractionEvent::KeyPress
    } else {
        InteractionEvent::Click
    };
    for value in &args.clicks {
        let target = click_target(value);
        match page.dispatch(event, &target)? {
            Some(state) => {
                debug!(target = %target, left = %state.left, right = %state.right, "applied")
            }
            None => debug!(target = %target, "event ignored"),
        }
    }

    Ok(page)
}

pub fn execute(args: RenderArgs, format: OutputFormat) -> anyhow::Result<()> {
    let page = run(&args)?;
    print_snapshot(&page, format)
}

pub fn execute_restore(args: RestoreArgs, format: OutputFormat) -> anyhow::Result<()> {
    let page = run(&RenderArgs {
        fixture: args.fixture,
        clicks: Vec::new(),
        keypress: false,
        no_restore: false,
    })?;
    print_snapshot(&page, format)
}

fn print_snapshot(page: &RankPage, format: OutputFormat) -> anyhow::Result<()> {
    let snapshot = PageSnapshot::capture(page)?;
    match format {
        OutputFormat::Html => println!("{}", snapshot.html),
        _ => print_item(&snapshot, format),
    }
    Ok(())
}
