//! ARIA audit of a rendered comparison widget

use serde::{Deserialize, Serialize};

use crate::dom::Document;
use crate::page::HINT_CLASS;
use crate::types::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditRule {
    /// Images need a text alternative
    ImageAlt,
    /// Items expose `aria-checked` as `true` or `false`
    AriaChecked,
    /// Hint labels are decorative and hidden from assistive technology
    HintHidden,
}

impl std::fmt::Display for AuditRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditRule::ImageAlt => write!(f, "image-alt"),
            AuditRule::AriaChecked => write!(f, "aria-checked"),
            AuditRule::HintHidden => write!(f, "hint-hidden"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditIssue {
    pub rule: AuditRule,
    /// Serialized start of the offending element
    pub context: String,
    pub message: String,
}

fn context(doc: &Document, node: crate::dom::NodeId) -> String {
    let html = doc.outer_html(node);
    match html.find('>') {
        Some(end) => html[..=end].to_string(),
        None => html,
    }
}

/// Run every rule against the document
pub fn audit(doc: &Document) -> Vec<AuditIssue> {
    let mut issues = Vec::new();

    for img in doc.elements_by_tag("img") {
        if doc.attr(img, "alt").is_none() {
            issues.push(AuditIssue {
                rule: AuditRule::ImageAlt,
                context: context(doc, img),
                message: "img element has no alt attribute".into(),
            });
        }
    }

    for side in Side::BOTH {
        let Some(item) = doc.by_id(side.element_id()) else {
            continue;
        };
        match doc.attr(item, "aria-checked") {
            Some("true") | Some("false") => {}
            Some(other) => issues.push(AuditIssue {
                rule: AuditRule::AriaChecked,
                context: context(doc, item),
                message: format!("{} item has aria-checked=\"{}\"", side, other),
            }),
            None => issues.push(AuditIssue {
                rule: AuditRule::AriaChecked,
                context: context(doc, item),
                message: format!("{} item has no aria-checked attribute", side),
            }),
        }
    }

    for hint in doc.elements_by_class(HINT_CLASS) {
        let hidden = doc
            .elements()
            .into_iter()
            .filter(|node| doc.parent(*node) == Some(hint))
            .all(|label| doc.attr(label, "aria-hidden") == Some("true"));
        if !hidden {
            issues.push(AuditIssue {
                rule: AuditRule::HintHidden,
                context: context(doc, hint),
                message: "hint label is exposed to assistive technology".into(),
            });
        }
    }

    issues
}
