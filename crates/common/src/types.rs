//! Core types for the comparison widget

use serde::{Deserialize, Serialize};

/// Which of the two displayed items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Element id of the item on this side
    pub fn element_id(self) -> &'static str {
        match self {
            Side::Left => "left-item",
            Side::Right => "right-item",
        }
    }

    /// Role class marking the item on this side
    pub fn role_class(self) -> &'static str {
        self.element_id()
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" | "left-item" => Ok(Side::Left),
            "right" | "right-item" => Ok(Side::Right),
            other => Err(format!("unknown side '{}'", other)),
        }
    }
}

/// Display state of a single item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    Unselected,
    Selected,
    Tied,
    Skipped,
}

impl Default for ItemState {
    fn default() -> Self {
        Self::Unselected
    }
}

impl ItemState {
    /// Whether the item is part of the current choice (and so `aria-checked`)
    pub fn is_chosen(self) -> bool {
        matches!(self, ItemState::Selected | ItemState::Tied)
    }

    /// State class and hint variant rendered for this state
    pub fn rendering(self) -> Option<(StateClass, HintVariant)> {
        match self {
            ItemState::Unselected => None,
            ItemState::Selected => Some((StateClass::SelectedItem, HintVariant::Selected)),
            ItemState::Tied => Some((StateClass::SelectionTied, HintVariant::Tied)),
            ItemState::Skipped => Some((StateClass::SelectionSkipped, HintVariant::Skipped)),
        }
    }
}

impl std::fmt::Display for ItemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemState::Unselected => write!(f, "unselected"),
            ItemState::Selected => write!(f, "selected"),
            ItemState::Tied => write!(f, "tied"),
            ItemState::Skipped => write!(f, "skipped"),
        }
    }
}

/// Joint state of both items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonState {
    pub left: ItemState,
    pub right: ItemState,
}

impl ComparisonState {
    pub fn new(left: ItemState, right: ItemState) -> Self {
        Self { left, right }
    }

    pub fn both(state: ItemState) -> Self {
        Self::new(state, state)
    }

    /// One side in `state`, the other unselected
    pub fn only(side: Side, state: ItemState) -> Self {
        let mut out = Self::default();
        out.set(side, state);
        out
    }

    pub fn get(&self, side: Side) -> ItemState {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn set(&mut self, side: Side, state: ItemState) {
        match side {
            Side::Left => self.left = state,
            Side::Right => self.right = state,
        }
    }

    /// The side holding the sole selection, if exactly one item is selected
    pub fn selected_side(&self) -> Option<Side> {
        match (self.left, self.right) {
            (ItemState::Selected, r) if r != ItemState::Selected => Some(Side::Left),
            (l, ItemState::Selected) if l != ItemState::Selected => Some(Side::Right),
            _ => None,
        }
    }

    pub fn is_tie(&self) -> bool {
        self.left == ItemState::Tied && self.right == ItemState::Tied
    }
}

/// External identifier of a compared item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Comparison settings read from the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    pub left_id: ItemId,
    pub right_id: ItemId,
    pub allow_ties: bool,
}

impl ComparisonConfig {
    pub fn item_id(&self, side: Side) -> &ItemId {
        match side {
            Side::Left => &self.left_id,
            Side::Right => &self.right_id,
        }
    }

    /// Value written to `selected_item_id` for a given state
    pub fn selected_item_id(&self, state: &ComparisonState) -> &str {
        state
            .selected_side()
            .map(|side| self.item_id(side).as_str())
            .unwrap_or("")
    }

    /// Side whose id matches, left first
    pub fn side_of(&self, id: &str) -> Option<Side> {
        Side::BOTH.into_iter().find(|side| self.item_id(*side).as_str() == id)
    }
}

/// Localized hint labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorLabels {
    pub selected: String,
    pub tied: String,
    pub skipped: String,
}

impl IndicatorLabels {
    pub fn label(&self, variant: HintVariant) -> &str {
        match variant {
            HintVariant::Selected => &self.selected,
            HintVariant::Tied => &self.tied,
            HintVariant::Skipped => &self.skipped,
        }
    }
}

/// CSS state classes set on items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateClass {
    SelectedItem,
    SelectionTied,
    SelectionSkipped,
}

impl StateClass {
    pub const ALL: [StateClass; 3] = [
        StateClass::SelectedItem,
        StateClass::SelectionTied,
        StateClass::SelectionSkipped,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StateClass::SelectedItem => "selected-item",
            StateClass::SelectionTied => "selection-tied",
            StateClass::SelectionSkipped => "selection-skipped",
        }
    }
}

impl std::fmt::Display for StateClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label variant of a hint node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintVariant {
    Selected,
    Tied,
    Skipped,
}

impl HintVariant {
    /// Classes on the label span
    pub fn span_class(self) -> &'static str {
        match self {
            HintVariant::Selected => "fs-1 fw-bold bg-white p-1 border border-success text-success",
            HintVariant::Tied => "fs-1 fw-bold bg-white p-1 border border-primary text-primary",
            HintVariant::Skipped => "fs-1 fw-bold bg-white p-1 border border-black",
        }
    }
}

/// Prior comparison outcome rendered by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialState {
    Tied,
    Selected,
    Skipped,
}

impl InitialState {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "tied" => Some(InitialState::Tied),
            "selected" => Some(InitialState::Selected),
            "skipped" => Some(InitialState::Skipped),
            _ => None,
        }
    }
}

/// User events that drive the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionEvent {
    Click,
    KeyPress,
}

/// Form submit buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitAction {
    Skip,
    Confirm,
    Other,
}

impl std::str::FromStr for SubmitAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" | "skip-button" => Ok(SubmitAction::Skip),
            "confirm" | "confirm-button-d" => Ok(SubmitAction::Confirm),
            "other" => Ok(SubmitAction::Other),
            other => Err(format!("unknown submit button '{}'", other)),
        }
    }
}

/// Outcome of a submission check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitCheck {
    Accepted,
    Rejected { message: String },
}

impl SubmitCheck {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitCheck::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ComparisonConfig {
        ComparisonConfig {
            left_id: "1".into(),
            right_id: "2".into(),
            allow_ties: true,
        }
    }

    #[test]
    fn test_selected_side_requires_exactly_one() {
        assert_eq!(
            ComparisonState::only(Side::Right, ItemState::Selected).selected_side(),
            Some(Side::Right)
        );
        assert_eq!(ComparisonState::both(ItemState::Selected).selected_side(), None);
        assert_eq!(ComparisonState::both(ItemState::Tied).selected_side(), None);
        assert_eq!(ComparisonState::default().selected_side(), None);
    }

    #[test]
    fn test_selected_item_id_follows_state() {
        let config = config();
        let state = ComparisonState::only(Side::Left, ItemState::Selected);
        assert_eq!(config.selected_item_id(&state), "1");
        assert_eq!(config.selected_item_id(&ComparisonState::both(ItemState::Tied)), "");
    }

    #[test]
    fn test_side_of_id() {
        let config = config();
        assert_eq!(config.side_of("2"), Some(Side::Right));
        assert_eq!(config.side_of("3"), None);
    }

    #[test]
    fn test_initial_state_parse() {
        assert_eq!(InitialState::parse("tied"), Some(InitialState::Tied));
        assert_eq!(InitialState::parse("skipped"), Some(InitialState::Skipped));
        assert_eq!(InitialState::parse(""), None);
    }

    #[test]
    fn test_state_class_serde_names() {
        let json = serde_json::to_string(&StateClass::SelectionTied).unwrap();
        assert_eq!(json, "\"selection-tied\"");
    }
}
