//! CLI command implementations

pub mod audit;
pub mod check;
pub mod render;
pub mod scenarios;

use anyhow::Context;
use pairwise_common::{ItemState, ItemView, RankPage, Side};
use serde::Serialize;
use std::path::Path;

use crate::output::TableDisplay;

/// Parse a fixture file into a page
pub fn load_page(fixture: &Path) -> anyhow::Result<RankPage> {
    let html = std::fs::read_to_string(fixture)
        .with_context(|| format!("reading fixture {}", fixture.display()))?;
    Ok(RankPage::parse(&html)?)
}

/// Element id for a `--click` value: `left`, `right` or an element id
pub fn click_target(value: &str) -> String {
    match value.parse::<Side>() {
        Ok(side) => side.element_id().to_string(),
        Err(_) => value.trim_start_matches('#').to_string(),
    }
}

/// Observable widget state after a command ran
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub left: ItemState,
    pub right: ItemState,
    pub selected_item_id: String,
    pub hints: usize,
    #[serde(skip)]
    pub html: String,
}

impl PageSnapshot {
    pub fn capture(page: &RankPage) -> anyhow::Result<Self> {
        let state = page.current_state()?;
        Ok(Self {
            left: state.left,
            right: state.right,
            selected_item_id: page.selected_item_id()?,
            hints: page.hint_count(),
            html: page.to_html(),
        })
    }
}

impl TableDisplay for PageSnapshot {
    fn headers() -> Vec<&'static str> {
        vec!["Left", "Right", "Selected Item", "Hints"]
    }

    fn row(&self) -> Vec<String> {
        let selected = if self.selected_item_id.is_empty() {
            "-".to_string()
        } else {
            self.selected_item_id.clone()
        };
        vec![
            self.left.to_string(),
            self.right.to_string(),
            selected,
            self.hints.to_string(),
        ]
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_target() {
        assert_eq!(click_target("left"), "left-item");
        assert_eq!(click_target("right"), "right-item");
        assert_eq!(click_target("#right-item"), "right-item");
        assert_eq!(click_target("banner"), "banner");
    }

    #[test]
    fn test_snapshot_of_restored_tie() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = fixtures::write(&dir, fixtures::RANK);
        let mut page = load_page(&path).unwrap();
        page.restore().unwrap();

        let snapshot = PageSnapshot::capture(&page).unwrap();
        assert_eq!(snapshot.left, ItemState::Tied);
        assert_eq!(snapshot.right, ItemState::Tied);
        assert_eq!(snapshot.hints, 2);
        assert_eq!(snapshot.row()[2], "-");
    }

    #[test]
    fn test_missing_fixture_file() {
        let err = load_page(Path::new("/nonexistent/rank.html")).unwrap_err();
        assert!(err.to_string().contains("reading fixture"));
    }
}
