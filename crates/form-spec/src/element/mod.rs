pub mod kind;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{MAX_KIND_LENGTH, ValidationError};
use crate::ids::{ElementId, PageId, QuestionSheetId};

pub use kind::{DefaultsProvider, ElementKind, TemplateResolver};

/// Owning container of a nested element. An element without one sits directly on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ParentRef {
    QuestionGrid(ElementId),
    QuestionGridWithTotal(ElementId),
    ChoiceField(ElementId),
}

impl ParentRef {
    pub fn id(&self) -> ElementId {
        match self {
            ParentRef::QuestionGrid(id)
            | ParentRef::QuestionGridWithTotal(id)
            | ParentRef::ChoiceField(id) => *id,
        }
    }

    pub fn is_grid(&self) -> bool {
        matches!(
            self,
            ParentRef::QuestionGrid(_) | ParentRef::QuestionGridWithTotal(_)
        )
    }
}

/// Target whose display depends on this element's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionalLink {
    #[default]
    None,
    /// Kept pointing at the element that follows this one on its page.
    NextElement {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<ElementId>,
    },
    Page { id: PageId },
}

impl ConditionalLink {
    pub fn follows_next(&self) -> bool {
        matches!(self, ConditionalLink::NextElement { .. })
    }

    pub fn points_to(&self, element: ElementId) -> bool {
        matches!(self, ConditionalLink::NextElement { id: Some(id) } if *id == element)
    }
}

/// A section, question or content block on a question sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Position inside the parent container; page positions live on the page link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_question_sheet_id: Option<QuestionSheetId>,
    #[serde(default)]
    pub conditional: ConditionalLink,
    /// Comma separated answers that trigger the conditional link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
}

impl Element {
    /// Unsaved element; the store assigns the id on create.
    pub fn draft(kind: ElementKind) -> Self {
        Self {
            id: ElementId(0),
            kind,
            label: None,
            style: None,
            content: None,
            required: false,
            position: None,
            parent: None,
            related_question_sheet_id: None,
            conditional: ConditionalLink::None,
            conditional_answer: None,
            object_name: None,
            attribute_name: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_conditional(mut self, conditional: ConditionalLink, answer: &str) -> Self {
        self.conditional = conditional;
        self.conditional_answer = Some(answer.to_string());
        self
    }

    pub fn is_question(&self) -> bool {
        self.kind.is_question()
    }

    pub fn grid_parent(&self) -> Option<ElementId> {
        self.parent.filter(ParentRef::is_grid).map(|parent| parent.id())
    }

    pub fn template_key(&self) -> &'static str {
        self.kind.template_key(self.style.as_deref())
    }

    pub fn reuseable(&self, config: &EngineConfig) -> bool {
        !config.never_reuse_elements && self.kind.is_reusable()
    }

    /// Fills blank content and style from the variant's defaults.
    pub fn set_defaults(&mut self) {
        if is_blank(self.content.as_deref())
            && let Some(content) = self.kind.default_content()
        {
            self.content = Some(content.to_string());
        }
        if is_blank(self.style.as_deref()) {
            self.style = Some(self.kind.default_style().to_string());
        }
    }

    pub fn validate(&self, config: &EngineConfig) -> Result<(), ValidationError> {
        if self.kind.name().len() > MAX_KIND_LENGTH {
            return Err(ValidationError::TooLong {
                field: "kind",
                max: MAX_KIND_LENGTH,
            });
        }
        match self.style.as_deref() {
            None => return Err(ValidationError::Blank { field: "style" }),
            Some(style) if style.trim().is_empty() => {
                return Err(ValidationError::Blank { field: "style" });
            }
            Some(style) if style.chars().count() > MAX_KIND_LENGTH => {
                return Err(ValidationError::TooLong {
                    field: "style",
                    max: MAX_KIND_LENGTH,
                });
            }
            Some(_) => {}
        }
        if let Some(label) = &self.label
            && label.chars().count() > config.max_label_length
        {
            return Err(ValidationError::TooLong {
                field: "label",
                max: config.max_label_length,
            });
        }
        Ok(())
    }

    /// Trigger answers from `conditional_answer`.
    pub fn conditional_answers(&self) -> Vec<&str> {
        self.conditional_answer
            .as_deref()
            .map(split_answers)
            .unwrap_or_default()
    }
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|value| value.trim().is_empty())
}

pub(crate) fn split_answers(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_answers_drops_blank_segments() {
        assert_eq!(split_answers("A, B,,C "), vec!["A", "B", "C"]);
        assert!(split_answers("").is_empty());
    }

    #[test]
    fn defaults_keep_existing_values() {
        let mut element = Element::draft(ElementKind::ChoiceField).with_style("radio");
        element.content = Some("Yes\nNo".into());
        element.set_defaults();
        assert_eq!(element.style.as_deref(), Some("radio"));
        assert_eq!(element.content.as_deref(), Some("Yes\nNo"));
    }

    #[test]
    fn validate_rejects_missing_and_long_style() {
        let config = EngineConfig::default();
        let element = Element::draft(ElementKind::TextField);
        assert_eq!(
            element.validate(&config),
            Err(ValidationError::Blank { field: "style" })
        );
        let element = element.with_style("x".repeat(41));
        assert_eq!(
            element.validate(&config),
            Err(ValidationError::TooLong {
                field: "style",
                max: 40
            })
        );
    }

    #[test]
    fn grid_parent_ignores_choice_fields() {
        let mut element = Element::draft(ElementKind::Question);
        element.parent = Some(ParentRef::ChoiceField(ElementId(3)));
        assert_eq!(element.grid_parent(), None);
        element.parent = Some(ParentRef::QuestionGridWithTotal(ElementId(4)));
        assert_eq!(element.grid_parent(), Some(ElementId(4)));
    }
}
