//! Comparison page bound to a [`Document`]
//!
//! [`RankPage`] reads its configuration from the hidden fields a rank
//! template renders and implements [`ItemView`] over the `left-item` and
//! `right-item` elements.

use tracing::{debug, warn};

use crate::controller::{self, ItemView};
use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::types::{
    ComparisonConfig, ComparisonState, HintVariant, IndicatorLabels, InitialState,
    InteractionEvent, ItemState, Side, StateClass, SubmitAction, SubmitCheck,
};

/// Marker class of generated hint nodes
pub const HINT_CLASS: &str = "selected-hint";

pub mod fields {
    pub const ITEM_1_ID: &str = "item_1_id";
    pub const ITEM_2_ID: &str = "item_2_id";
    pub const ALLOW_TIES: &str = "allow-ties";
    pub const SELECTED_ITEM_ID: &str = "selected_item_id";
    pub const SELECTED_INDICATOR: &str = "selected_item_indicator";
    pub const TIED_INDICATOR: &str = "tied_items_indicator";
    pub const SKIPPED_INDICATOR: &str = "skipped_items_indicator";
    pub const COMPARISON_ID: &str = "comparison_id";
    pub const INITIAL_SELECTED_ITEM_ID: &str = "initial_selected_item_id";
    pub const INITIAL_STATE: &str = "initial_state";
    pub const SKIP_BUTTON_ERROR: &str = "skip_button_error";
    pub const CONFIRM_BUTTON_ERROR: &str = "confirm_button_error";
}

#[derive(Debug)]
pub struct RankPage {
    doc: Document,
}

impl RankPage {
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    pub fn parse(html: &str) -> Result<Self> {
        Ok(Self::new(Document::parse(html)?))
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn to_html(&self) -> String {
        self.doc.to_html()
    }

    fn field(&self, id: &str) -> Result<String> {
        let node = self.doc.require(id)?;
        self.doc.value(node)
    }

    pub fn item(&self, side: Side) -> Result<NodeId> {
        self.doc.require(side.element_id())
    }

    /// Item ids and tie setting, read fresh from the page
    pub fn config(&self) -> Result<ComparisonConfig> {
        Ok(ComparisonConfig {
            left_id: self.field(fields::ITEM_1_ID)?.into(),
            right_id: self.field(fields::ITEM_2_ID)?.into(),
            allow_ties: self.field(fields::ALLOW_TIES)? != "false",
        })
    }

    pub fn labels(&self) -> Result<IndicatorLabels> {
        Ok(IndicatorLabels {
            selected: self.field(fields::SELECTED_INDICATOR)?,
            tied: self.field(fields::TIED_INDICATOR)?,
            skipped: self.field(fields::SKIPPED_INDICATOR)?,
        })
    }

    pub fn selected_item_id(&self) -> Result<String> {
        self.field(fields::SELECTED_ITEM_ID)
    }

    pub fn hint_count(&self) -> usize {
        self.doc.elements_by_class(HINT_CLASS).len()
    }

    /// Side an element belongs to; anything not marked `right-item` is left
    pub fn side_of(&self, node: NodeId) -> Side {
        if self.doc.has_class(node, Side::Right.role_class()) {
            Side::Right
        } else {
            Side::Left
        }
    }

    /// Handle a click on an item element
    pub fn click(&mut self, node: NodeId) -> Result<ComparisonState> {
        let side = self.side_of(node);
        let config = self.config()?;
        controller::apply_click(self, side, &config)
    }

    /// Route a user event; only image items react
    pub fn dispatch(
        &mut self,
        event: InteractionEvent,
        target_id: &str,
    ) -> Result<Option<ComparisonState>> {
        let node = self.doc.require(target_id)?;
        if self.doc.tag_name(node) != Some("img") {
            warn!(?event, target = target_id, "ignoring event on non-image element");
            return Ok(None);
        }
        debug!(?event, target = target_id, "dispatching event");
        self.click(node).map(Some)
    }

    /// Page-load replay of a prior comparison outcome
    pub fn restore(&mut self) -> Result<Option<ComparisonState>> {
        let Some(comparison) = self.doc.by_id(fields::COMPARISON_ID) else {
            return Ok(None);
        };
        if self.doc.value(comparison)?.is_empty() {
            return Ok(None);
        }

        let raw_state = self.field(fields::INITIAL_STATE)?;
        let Some(initial) = InitialState::parse(&raw_state) else {
            debug!(initial_state = %raw_state, "no prior outcome to restore");
            return Ok(None);
        };
        let initial_selected_id = self.field(fields::INITIAL_SELECTED_ITEM_ID)?;
        let config = self.config()?;
        controller::restore(self, initial, &initial_selected_id, &config).map(Some)
    }

    /// Whether the rank form may be submitted with `action`
    pub fn check_submission(&self, action: SubmitAction) -> Result<SubmitCheck> {
        let left = self.doc.attr(self.item(Side::Left)?, "aria-checked");
        let right = self.doc.attr(self.item(Side::Right)?, "aria-checked");

        let (accepted, error_field) = match action {
            SubmitAction::Skip => (
                left == Some("false") && right == Some("false"),
                fields::SKIP_BUTTON_ERROR,
            ),
            SubmitAction::Confirm => (
                left == Some("true") || right == Some("true"),
                fields::CONFIRM_BUTTON_ERROR,
            ),
            SubmitAction::Other => return Ok(SubmitCheck::Accepted),
        };

        if accepted {
            Ok(SubmitCheck::Accepted)
        } else {
            Ok(SubmitCheck::Rejected {
                message: self.field(error_field)?,
            })
        }
    }
}

impl ItemView for RankPage {
    fn item_state(&self, side: Side) -> Result<ItemState> {
        let node = self.item(side)?;
        let has = |class: StateClass| self.doc.has_class(node, class.as_str());
        Ok(if has(StateClass::SelectedItem) {
            ItemState::Selected
        } else if has(StateClass::SelectionTied) {
            ItemState::Tied
        } else if has(StateClass::SelectionSkipped) {
            ItemState::Skipped
        } else {
            ItemState::Unselected
        })
    }

    fn set_aria_checked(&mut self, side: Side, checked: bool) -> Result<()> {
        let node = self.item(side)?;
        self.doc
            .set_attr(node, "aria-checked", if checked { "true" } else { "false" })
    }

    fn clear_hints(&mut self, class: StateClass) -> Result<()> {
        for side in Side::BOTH {
            let node = self.item(side)?;
            self.doc.remove_class(node, class.as_str())?;
        }
        for hint in self.doc.elements_by_class(HINT_CLASS) {
            self.doc.remove_node(hint);
        }
        Ok(())
    }

    fn render_hint(&mut self, class: StateClass, side: Side, variant: HintVariant) -> Result<()> {
        let labels = self.labels()?;
        let item = self.item(side)?;

        let div = self.doc.create_element("div");
        self.doc.set_attr(div, "class", HINT_CLASS)?;
        self.doc.set_attr(div, "style", "pointer-events:none;")?;

        let span = self.doc.create_element("span");
        self.doc.set_attr(span, "class", variant.span_class())?;
        self.doc.set_attr(span, "aria-hidden", "true")?;
        self.doc.set_text_content(span, labels.label(variant))?;
        self.doc.append_child(div, span)?;

        self.doc.add_class(item, class.as_str())?;
        self.doc.insert_after(item, div)
    }

    fn set_selected_item_id(&mut self, value: &str) -> Result<()> {
        let node = self.doc.require(fields::SELECTED_ITEM_ID)?;
        self.doc.set_value(node, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const INDICATORS: &str = concat!(
        r#"<input type="hidden" id="selected_item_indicator" value="HIGHER"/>"#,
        r#"<input type="hidden" id="tied_items_indicator" value="EQUAL"/>"#,
        r#"<input type="hidden" id="skipped_items_indicator" value="SKIPPED"/>"#,
    );

    const INDICATORS_SERIALIZED: &str = concat!(
        r#"<input type="hidden" id="selected_item_indicator" value="HIGHER">"#,
        r#"<input type="hidden" id="tied_items_indicator" value="EQUAL">"#,
        r#"<input type="hidden" id="skipped_items_indicator" value="SKIPPED">"#,
    );

    fn page(body: &str) -> RankPage {
        RankPage::parse(&format!("{}{}", INDICATORS, body)).unwrap()
    }

    fn widget(allow_ties: bool, left_class: &str, right_class: &str) -> RankPage {
        widget_with_field(&allow_ties.to_string(), left_class, right_class)
    }

    fn widget_with_field(allow_ties: &str, left_class: &str, right_class: &str) -> RankPage {
        page(&format!(
            concat!(
                r#"<input type="hidden" id="selected_item_id">"#,
                r#"<input type="hidden" id="item_1_id" value="1"/>"#,
                r#"<input type="hidden" id="item_2_id" value="2"/>"#,
                r#"<input type="hidden" id="allow-ties" value="{}"/>"#,
                r#"<img id="left-item" class="{}" aria-checked="{}"/>"#,
                r#"<img id="right-item" class="{}" aria-checked="{}"/>"#,
            ),
            allow_ties,
            left_class,
            left_class.contains("selected-item"),
            right_class,
            right_class.contains("selected-item"),
        ))
    }

    fn count(page: &RankPage, class: &str) -> usize {
        page.document().elements_by_class(class).len()
    }

    fn aria(page: &RankPage, side: Side) -> String {
        let node = page.item(side).unwrap();
        page.document().attr(node, "aria-checked").unwrap_or("").to_string()
    }

    #[test]
    fn test_selected_hint_markup() {
        let mut page = page(r#"<img id="left-item"/><img id="right-item"/>"#);
        page.render_hint(StateClass::SelectedItem, Side::Left, HintVariant::Selected).unwrap();
        let expected = format!(
            concat!(
                "{}",
                r#"<img id="left-item" class="selected-item">"#,
                r#"<div class="selected-hint" style="pointer-events:none;">"#,
                r#"<span class="fs-1 fw-bold bg-white p-1 border border-success text-success" aria-hidden="true">HIGHER</span>"#,
                "</div>",
                r#"<img id="right-item">"#,
            ),
            INDICATORS_SERIALIZED
        );
        assert_eq!(page.to_html(), expected);
    }

    #[test]
    fn test_tied_hint_markup_on_both_items() {
        let mut page = page(r#"<img id="left-item"/><img id="right-item"/>"#);
        for side in Side::BOTH {
            page.render_hint(StateClass::SelectionTied, side, HintVariant::Tied).unwrap();
        }
        let hint = concat!(
            r#"<div class="selected-hint" style="pointer-events:none;">"#,
            r#"<span class="fs-1 fw-bold bg-white p-1 border border-primary text-primary" aria-hidden="true">EQUAL</span>"#,
            "</div>",
        );
        let expected = format!(
            r#"{}<img id="left-item" class="selection-tied">{}<img id="right-item" class="selection-tied">{}"#,
            INDICATORS_SERIALIZED, hint, hint
        );
        assert_eq!(page.to_html(), expected);
    }

    #[test]
    fn test_clear_hints_removes_class_and_every_hint() {
        let skipped_hint = concat!(
            r#"<div class="selected-hint" style="pointer-events:none;">"#,
            r#"<span class="fs-1 fw-bold bg-white p-1 border border-black">SKIPPED</span>"#,
            "</div>",
        );
        let mut page = page(&format!(
            r#"<img id="left-item" class="selection-skipped">{}<img id="right-item" class="selection-skipped">{}"#,
            skipped_hint, skipped_hint
        ));

        page.clear_hints(StateClass::SelectionSkipped).unwrap();
        let expected = format!(
            r#"{}<img id="left-item" class=""><img id="right-item" class="">"#,
            INDICATORS_SERIALIZED
        );
        assert_eq!(page.to_html(), expected);

        page.clear_hints(StateClass::SelectionSkipped).unwrap();
        assert_eq!(page.to_html(), expected);
    }

    #[test]
    fn test_first_click_selects_item() {
        let mut page = widget(true, "left-item", "right-item");
        let left = page.item(Side::Left).unwrap();
        page.click(left).unwrap();

        assert_eq!(page.selected_item_id().unwrap(), "1");
        assert_eq!(count(&page, "selected-item"), 1);
        assert_eq!(count(&page, "selection-tied"), 0);
        assert_eq!(count(&page, HINT_CLASS), 1);
        assert_eq!(aria(&page, Side::Left), "true");
        assert_eq!(aria(&page, Side::Right), "false");
    }

    #[test]
    fn test_click_other_with_ties_allowed() {
        let mut page = widget(true, "left-item selected-item", "right-item");
        let right = page.item(Side::Right).unwrap();
        page.click(right).unwrap();

        assert_eq!(page.selected_item_id().unwrap(), "");
        assert_eq!(count(&page, "selected-item"), 0);
        assert_eq!(count(&page, "selection-tied"), 2);
        assert_eq!(count(&page, HINT_CLASS), 2);
        assert_eq!(aria(&page, Side::Left), "true");
        assert_eq!(aria(&page, Side::Right), "true");
        for hint in page.document().elements_by_class(HINT_CLASS) {
            assert_eq!(page.document().text_content(hint), "EQUAL");
        }
    }

    #[test]
    fn test_click_other_with_ties_disallowed() {
        let mut page = widget(false, "left-item selected-item", "right-item");
        let right = page.item(Side::Right).unwrap();
        page.click(right).unwrap();

        assert_eq!(page.selected_item_id().unwrap(), "2");
        assert_eq!(count(&page, "selected-item"), 1);
        assert_eq!(count(&page, "selection-tied"), 0);
        assert_eq!(count(&page, HINT_CLASS), 1);
        assert_eq!(aria(&page, Side::Left), "false");
        assert_eq!(aria(&page, Side::Right), "true");
    }

    #[test]
    fn test_click_one_of_two_selected_promotes_other() {
        let mut page = widget(true, "left-item selected-item", "right-item selected-item");
        let right = page.item(Side::Right).unwrap();
        page.click(right).unwrap();

        assert_eq!(page.selected_item_id().unwrap(), "1");
        assert_eq!(count(&page, "selected-item"), 1);
        assert_eq!(count(&page, HINT_CLASS), 1);
        assert_eq!(aria(&page, Side::Left), "true");
        assert_eq!(aria(&page, Side::Right), "false");
    }

    #[test]
    fn test_click_half_of_tie_selects_clicked() {
        let mut page = widget(true, "left-item", "right-item");
        let left = page.item(Side::Left).unwrap();
        let right = page.item(Side::Right).unwrap();
        page.click(left).unwrap();
        page.click(right).unwrap();
        page.click(left).unwrap();

        assert_eq!(page.selected_item_id().unwrap(), "1");
        assert_eq!(
            page.current_state().unwrap(),
            ComparisonState::only(Side::Left, ItemState::Selected)
        );
        assert_eq!(count(&page, HINT_CLASS), 1);
        assert_eq!(aria(&page, Side::Left), "true");
        assert_eq!(aria(&page, Side::Right), "false");
    }

    #[test]
    fn test_tied_classes_count_as_unselected() {
        let mut page = widget(true, "left-item selection-tied", "right-item selection-tied");
        let state = page.dispatch(InteractionEvent::Click, "left-item").unwrap();

        assert_eq!(state, Some(ComparisonState::only(Side::Left, ItemState::Selected)));
        assert_eq!(page.selected_item_id().unwrap(), "1");
        assert_eq!(count(&page, "selection-tied"), 0);
    }

    #[test]
    fn test_click_removes_stray_hint() {
        let mut page = page(concat!(
            r#"<input type="hidden" id="selected_item_id">"#,
            r#"<input type="hidden" id="item_1_id" value="1">"#,
            r#"<div class="selected-hint" style="pointer-events:none;">"#,
            r#"<span aria-hidden="true">HIGHER</span>"#,
            "</div>",
            r#"<input type="hidden" id="item_2_id" value="2">"#,
            r#"<input type="hidden" id="allow-ties" value="true">"#,
            r#"<img id="left-item" class="left-item" aria-checked="false">"#,
            r#"<img id="right-item" class="right-item" aria-checked="false">"#,
        ));
        page.dispatch(InteractionEvent::Click, "right-item").unwrap();

        let hints = page.document().elements_by_class(HINT_CLASS);
        assert_eq!(hints.len(), 1);
        let right = page.item(Side::Right).unwrap();
        assert_eq!(page.document().parent(hints[0]), page.document().parent(right));
        let expected = format!(
            concat!(
                "{}",
                r#"<input type="hidden" id="selected_item_id">"#,
                r#"<input type="hidden" id="item_1_id" value="1">"#,
                r#"<input type="hidden" id="item_2_id" value="2">"#,
                r#"<input type="hidden" id="allow-ties" value="true">"#,
                r#"<img id="left-item" class="left-item" aria-checked="false">"#,
                r#"<img id="right-item" class="right-item selected-item" aria-checked="true">"#,
                r#"<div class="selected-hint" style="pointer-events:none;">"#,
                r#"<span class="fs-1 fw-bold bg-white p-1 border border-success text-success" aria-hidden="true">HIGHER</span>"#,
                "</div>",
            ),
            INDICATORS_SERIALIZED
        );
        assert_eq!(page.to_html(), expected);
    }

    #[test]
    fn test_reclick_deselects() {
        let mut page = widget(true, "left-item selected-item", "right-item");
        let left = page.item(Side::Left).unwrap();
        page.click(left).unwrap();

        assert_eq!(page.selected_item_id().unwrap(), "");
        assert_eq!(count(&page, "selected-item"), 0);
        assert_eq!(count(&page, HINT_CLASS), 0);
        assert_eq!(aria(&page, Side::Left), "false");
        assert_eq!(aria(&page, Side::Right), "false");
    }

    #[test_case("false", false ; "literal false")]
    #[test_case("False", true ; "capitalised false")]
    #[test_case("", true ; "empty")]
    #[test_case("0", true ; "zero")]
    #[test_case("true", true ; "literal true")]
    fn test_allow_ties_only_disabled_by_literal_false(value: &str, expected: bool) {
        let page = widget_with_field(value, "left-item", "right-item");
        assert_eq!(page.config().unwrap().allow_ties, expected);
    }

    #[test]
    fn test_missing_allow_ties_field_is_an_error() {
        let page = page(concat!(
            r#"<input type="hidden" id="item_1_id" value="1">"#,
            r#"<input type="hidden" id="item_2_id" value="2">"#,
        ));
        match page.config() {
            Err(Error::MissingElement { id }) => assert_eq!(id, "allow-ties"),
            other => panic!("unexpected: {:?}", other.map(|c| c.allow_ties)),
        }
    }

    #[test]
    fn test_dispatch_ignores_non_image_targets() {
        let mut page = widget(true, "left-item", "right-item");
        let state = page.dispatch(InteractionEvent::Click, "item_1_id").unwrap();
        assert_eq!(state, None);
        assert_eq!(count(&page, HINT_CLASS), 0);
    }

    #[test]
    fn test_keypress_behaves_like_click() {
        let mut page = widget(true, "left-item", "right-item");
        let state = page.dispatch(InteractionEvent::KeyPress, "right-item").unwrap();
        assert_eq!(state, Some(ComparisonState::only(Side::Right, ItemState::Selected)));
        assert_eq!(page.selected_item_id().unwrap(), "2");
    }

    #[test]
    fn test_missing_config_field_is_an_error() {
        let mut page =
            page(r#"<img id="left-item" class="left-item"/><img id="right-item" class="right-item"/>"#);
        let left = page.item(Side::Left).unwrap();
        assert!(matches!(page.click(left), Err(Error::MissingElement { .. })));
    }

    fn restorable(initial_state: &str, initial_selected: &str) -> RankPage {
        page(&format!(
            concat!(
                r#"<input type="hidden" id="selected_item_id" value="">"#,
                r#"<input type="hidden" id="item_1_id" value="1">"#,
                r#"<input type="hidden" id="item_2_id" value="2">"#,
                r#"<input type="hidden" id="allow-ties" value="true">"#,
                r#"<input type="hidden" id="comparison_id" value="7">"#,
                r#"<input type="hidden" id="initial_selected_item_id" value="{}">"#,
                r#"<input type="hidden" id="initial_state" value="{}">"#,
                r#"<img id="left-item" class="left-item" alt="left" aria-checked="false">"#,
                r#"<img id="right-item" class="right-item" alt="right" aria-checked="false">"#,
            ),
            initial_selected, initial_state
        ))
    }

    #[test]
    fn test_restore_selected_matches_click_output() {
        let mut restored = restorable("selected", "2");
        let state = restored.restore().unwrap();
        assert_eq!(state, Some(ComparisonState::only(Side::Right, ItemState::Selected)));

        let mut clicked = restorable("selected", "2");
        clicked.dispatch(InteractionEvent::Click, "right-item").unwrap();

        assert_eq!(restored.to_html(), clicked.to_html());
        assert_eq!(restored.selected_item_id().unwrap(), "2");
        assert_eq!(clicked.selected_item_id().unwrap(), "2");
    }

    #[test]
    fn test_restore_tied_matches_click_output() {
        let mut restored = restorable("tied", "");
        restored.restore().unwrap();

        let mut clicked = restorable("tied", "");
        clicked.dispatch(InteractionEvent::Click, "left-item").unwrap();
        clicked.dispatch(InteractionEvent::Click, "right-item").unwrap();

        assert_eq!(restored.to_html(), clicked.to_html());
        assert_eq!(restored.selected_item_id().unwrap(), "");
    }

    #[test]
    fn test_restore_skipped() {
        let mut page = restorable("skipped", "");
        page.restore().unwrap();

        assert_eq!(count(&page, "selection-skipped"), 2);
        assert_eq!(count(&page, HINT_CLASS), 2);
        assert_eq!(aria(&page, Side::Left), "false");
        assert_eq!(aria(&page, Side::Right), "false");
    }

    #[test]
    fn test_restore_needs_comparison_id() {
        let mut page = widget(true, "left-item", "right-item");
        assert_eq!(page.restore().unwrap(), None);

        let mut unknown = restorable("pending", "1");
        assert_eq!(unknown.restore().unwrap(), None);
        assert_eq!(count(&unknown, HINT_CLASS), 0);
    }

    fn submittable(left: &str, right: &str) -> RankPage {
        page(&format!(
            concat!(
                r#"<input type="hidden" id="skip_button_error" value="Deselect items to skip">"#,
                r#"<input type="hidden" id="confirm_button_error" value="Select an item first">"#,
                r#"<img id="left-item" aria-checked="{}"><img id="right-item" aria-checked="{}">"#,
            ),
            left, right
        ))
    }

    #[test]
    fn test_skip_requires_nothing_checked() {
        let page = submittable("false", "false");
        assert_eq!(page.check_submission(SubmitAction::Skip).unwrap(), SubmitCheck::Accepted);

        let page = submittable("true", "false");
        assert_eq!(
            page.check_submission(SubmitAction::Skip).unwrap(),
            SubmitCheck::Rejected {
                message: "Deselect items to skip".into()
            }
        );
    }

    #[test]
    fn test_confirm_requires_something_checked() {
        let page = submittable("false", "true");
        assert!(page.check_submission(SubmitAction::Confirm).unwrap().is_accepted());

        let page = submittable("false", "false");
        assert_eq!(
            page.check_submission(SubmitAction::Confirm).unwrap(),
            SubmitCheck::Rejected {
                message: "Select an item first".into()
            }
        );
        assert!(page.check_submission(SubmitAction::Other).unwrap().is_accepted());
    }
}
