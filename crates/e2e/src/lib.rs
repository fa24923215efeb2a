//! Pairwise Scenario Test Framework
//!
//! Replays declarative YAML scenarios against comparison page fixtures:
//! - Parses scenario specs (fixture markup plus ordered steps)
//! - Loads each fixture into an in-memory page and runs the page-load restore
//! - Dispatches clicks and key presses through the selection controller
//! - Asserts on classes, attributes, hidden fields, markup and ARIA audit
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Scenario Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioRunner                                             │
//! │    ├── run_all() / run_tagged() / run_test()                │
//! │    ├── run_spec(spec) -> ScenarioResult                     │
//! │    └── write_results(suite) -> scenario-results.json        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioSpec (YAML)                                        │
//! │    ├── name, description, tags                              │
//! │    ├── fixture | fixture_file, restore_on_load              │
//! │    └── steps: [ScenarioStep]                                │
//! │          ├── click / keypress { target }                    │
//! │          ├── restore                                        │
//! │          ├── submit { button, expect_accepted }             │
//! │          ├── assert { selector, count?, attribute?, ... }   │
//! │          ├── assert_state { left, right, selected_item_id } │
//! │          ├── assert_html { html }                           │
//! │          └── audit { expect_issues }                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod runner;
pub mod session;
pub mod spec;

pub use error::{E2eError, E2eResult};
pub use runner::ScenarioRunner;
pub use spec::{ScenarioSpec, ScenarioStep};
