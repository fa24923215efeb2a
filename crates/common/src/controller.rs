//! Selection controller
//!
//! The decision table lives in [`next_state`], a pure function of the current
//! joint state, the clicked side and the tie setting. [`render`] applies a
//! state to anything implementing [`ItemView`], always replacing the whole
//! display: every state class, hint and `aria-checked` flag is cleared before
//! the new state is drawn. Nothing is cached between calls; the view is read
//! fresh on every click.

use tracing::debug;

use crate::error::Result;
use crate::types::{
    ComparisonConfig, ComparisonState, HintVariant, InitialState, ItemState, Side, StateClass,
};

/// Capabilities the controller needs from the two rendered items
pub trait ItemView {
    /// Current display state of one item
    fn item_state(&self, side: Side) -> Result<ItemState>;

    fn set_aria_checked(&mut self, side: Side, checked: bool) -> Result<()>;

    /// Remove `class` from both items and drop every hint node
    fn clear_hints(&mut self, class: StateClass) -> Result<()>;

    /// Attach one hint after the item on `side` and mark it with `class`
    fn render_hint(&mut self, class: StateClass, side: Side, variant: HintVariant) -> Result<()>;

    /// Write the hidden `selected_item_id` field
    fn set_selected_item_id(&mut self, value: &str) -> Result<()>;

    fn reset_aria_checked(&mut self) -> Result<()> {
        for side in Side::BOTH {
            self.set_aria_checked(side, false)?;
        }
        Ok(())
    }

    fn current_state(&self) -> Result<ComparisonState> {
        Ok(ComparisonState::new(
            self.item_state(Side::Left)?,
            self.item_state(Side::Right)?,
        ))
    }
}

/// Next joint state after a click on `clicked`
///
/// Only the Selected state counts as selected here. Tied and skipped items
/// count as unselected, so a click on either half of a tie selects the
/// clicked item alone.
pub fn next_state(current: ComparisonState, clicked: Side, allow_ties: bool) -> ComparisonState {
    let clicked_selected = current.get(clicked) == ItemState::Selected;
    let other_selected = current.get(clicked.other()) == ItemState::Selected;

    match (clicked_selected, other_selected) {
        (false, false) => ComparisonState::only(clicked, ItemState::Selected),
        (false, true) if allow_ties => ComparisonState::both(ItemState::Tied),
        (false, true) => ComparisonState::only(clicked, ItemState::Selected),
        (true, true) => ComparisonState::only(clicked.other(), ItemState::Selected),
        (true, false) => ComparisonState::default(),
    }
}

/// State to replay on page load for a prior comparison outcome
pub fn restore_state(
    initial: InitialState,
    initial_selected_id: &str,
    config: &ComparisonConfig,
) -> ComparisonState {
    match initial {
        InitialState::Tied => ComparisonState::both(ItemState::Tied),
        InitialState::Skipped => ComparisonState::both(ItemState::Skipped),
        InitialState::Selected => config
            .side_of(initial_selected_id)
            .map(|side| ComparisonState::only(side, ItemState::Selected))
            .unwrap_or_default(),
    }
}

/// Draw `state` onto the view
pub fn render<V: ItemView + ?Sized>(
    view: &mut V,
    state: &ComparisonState,
    config: &ComparisonConfig,
) -> Result<()> {
    for class in StateClass::ALL {
        view.clear_hints(class)?;
    }
    view.reset_aria_checked()?;

    for side in Side::BOTH {
        let item = state.get(side);
        if let Some((class, variant)) = item.rendering() {
            view.render_hint(class, side, variant)?;
        }
        if item.is_chosen() {
            view.set_aria_checked(side, true)?;
        }
    }

    view.set_selected_item_id(config.selected_item_id(state))
}

/// Handle a click (or key press) on one item
pub fn apply_click<V: ItemView + ?Sized>(
    view: &mut V,
    clicked: Side,
    config: &ComparisonConfig,
) -> Result<ComparisonState> {
    let current = view.current_state()?;
    let next = next_state(current, clicked, config.allow_ties);
    debug!(
        %clicked,
        from_left = %current.left,
        from_right = %current.right,
        to_left = %next.left,
        to_right = %next.right,
        "selection transition"
    );
    render(view, &next, config)?;
    Ok(next)
}

/// Replay a prior outcome without user interaction
pub fn restore<V: ItemView + ?Sized>(
    view: &mut V,
    initial: InitialState,
    initial_selected_id: &str,
    config: &ComparisonConfig,
) -> Result<ComparisonState> {
    let state = restore_state(initial, initial_selected_id, config);
    debug!(?initial, left = %state.left, right = %state.right, "restoring comparison");
    render(view, &state, config)?;
    Ok(state)
}
