use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::ids::ElementId;

use super::ParentRef;

/// Closed set of element variants stored in the `kind` column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum ElementKind {
    Question,
    Section,
    Paragraph,
    ChoiceField,
    QuestionGrid,
    QuestionGridWithTotal,
    TextField,
    DateField,
    FileField,
    AttachmentField,
    AddressField,
    PaymentQuestion,
    SchoolPicker,
    ProjectPreference,
    StateChooser,
    ReferenceQuestion,
}

/// Values applied once to a new element whose fields are blank.
pub trait DefaultsProvider {
    fn default_content(&self) -> Option<&'static str>;
    fn default_style(&self) -> &'static str;
}

/// Maps an element to the template that presents it.
pub trait TemplateResolver {
    fn template_key(&self, style: Option<&str>) -> &'static str;
}

impl ElementKind {
    pub const ALL: [ElementKind; 16] = [
        ElementKind::Question,
        ElementKind::Section,
        ElementKind::Paragraph,
        ElementKind::ChoiceField,
        ElementKind::QuestionGrid,
        ElementKind::QuestionGridWithTotal,
        ElementKind::TextField,
        ElementKind::DateField,
        ElementKind::FileField,
        ElementKind::AttachmentField,
        ElementKind::AddressField,
        ElementKind::PaymentQuestion,
        ElementKind::SchoolPicker,
        ElementKind::ProjectPreference,
        ElementKind::StateChooser,
        ElementKind::ReferenceQuestion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Question => "Question",
            ElementKind::Section => "Section",
            ElementKind::Paragraph => "Paragraph",
            ElementKind::ChoiceField => "ChoiceField",
            ElementKind::QuestionGrid => "QuestionGrid",
            ElementKind::QuestionGridWithTotal => "QuestionGridWithTotal",
            ElementKind::TextField => "TextField",
            ElementKind::DateField => "DateField",
            ElementKind::FileField => "FileField",
            ElementKind::AttachmentField => "AttachmentField",
            ElementKind::AddressField => "AddressField",
            ElementKind::PaymentQuestion => "PaymentQuestion",
            ElementKind::SchoolPicker => "SchoolPicker",
            ElementKind::ProjectPreference => "ProjectPreference",
            ElementKind::StateChooser => "StateChooser",
            ElementKind::ReferenceQuestion => "ReferenceQuestion",
        }
    }

    /// Snake-cased variant name, the fallback for both style and template.
    pub fn snake_name(&self) -> &'static str {
        match self {
            ElementKind::Question => "question",
            ElementKind::Section => "section",
            ElementKind::Paragraph => "paragraph",
            ElementKind::ChoiceField => "choice_field",
            ElementKind::QuestionGrid => "question_grid",
            ElementKind::QuestionGridWithTotal => "question_grid_with_total",
            ElementKind::TextField => "text_field",
            ElementKind::DateField => "date_field",
            ElementKind::FileField => "file_field",
            ElementKind::AttachmentField => "attachment_field",
            ElementKind::AddressField => "address_field",
            ElementKind::PaymentQuestion => "payment_question",
            ElementKind::SchoolPicker => "school_picker",
            ElementKind::ProjectPreference => "project_preference",
            ElementKind::StateChooser => "state_chooser",
            ElementKind::ReferenceQuestion => "reference_question",
        }
    }

    /// True for every variant that collects an answer.
    pub fn is_question(&self) -> bool {
        !matches!(
            self,
            ElementKind::Paragraph
                | ElementKind::Section
                | ElementKind::QuestionGrid
                | ElementKind::QuestionGridWithTotal
        )
    }

    pub fn is_grid(&self) -> bool {
        matches!(
            self,
            ElementKind::QuestionGrid | ElementKind::QuestionGridWithTotal
        )
    }

    pub fn is_container(&self) -> bool {
        self.is_grid() || matches!(self, ElementKind::ChoiceField)
    }

    /// Parent reference a child of a container of this kind carries.
    pub fn child_ref(&self, container: ElementId) -> Option<ParentRef> {
        match self {
            ElementKind::QuestionGrid => Some(ParentRef::QuestionGrid(container)),
            ElementKind::QuestionGridWithTotal => Some(ParentRef::QuestionGridWithTotal(container)),
            ElementKind::ChoiceField => Some(ParentRef::ChoiceField(container)),
            _ => None,
        }
    }

    /// Eligible for sharing across sheets instead of always being copied.
    pub fn is_reusable(&self) -> bool {
        self.is_question() || self.is_grid()
    }
}

impl DefaultsProvider for ElementKind {
    fn default_content(&self) -> Option<&'static str> {
        match self {
            ElementKind::ChoiceField => Some("Choice One\nChoice Two\nChoice Three"),
            ElementKind::Paragraph => Some("Lorem ipsum..."),
            _ => None,
        }
    }

    fn default_style(&self) -> &'static str {
        match self {
            ElementKind::TextField => "essay",
            ElementKind::DateField => "date",
            ElementKind::FileField => "file",
            ElementKind::Paragraph => "paragraph",
            ElementKind::Section => "section",
            ElementKind::ChoiceField => "checkbox",
            ElementKind::QuestionGrid => "grid",
            ElementKind::QuestionGridWithTotal => "grid_with_total",
            ElementKind::ReferenceQuestion => "peer",
            other => other.snake_name(),
        }
    }
}

impl TemplateResolver for ElementKind {
    fn template_key(&self, style: Option<&str>) -> &'static str {
        match (self, style) {
            (ElementKind::TextField | ElementKind::AddressField, Some("essay")) => {
                "text_area_field"
            }
            (ElementKind::TextField | ElementKind::AddressField, _) => "text_field",
            (ElementKind::ChoiceField, Some("acceptance")) => "acceptance",
            (ElementKind::DateField, Some("mmyy")) => "date_field_mmyy",
            (other, _) => other.snake_name(),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementKind {
    type Err = ValidationError;

    /// Accepts `TextField`, `Fe::TextField` and `text_field`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Blank { field: "kind" });
        }
        let bare = trimmed.rsplit("::").next().unwrap_or(trimmed);
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.name() == bare || kind.snake_name() == bare)
            .ok_or_else(|| ValidationError::UnknownKind(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_namespaced_and_snake_names() {
        assert_eq!("Fe::DateField".parse::<ElementKind>(), Ok(ElementKind::DateField));
        assert_eq!(
            "question_grid_with_total".parse::<ElementKind>(),
            Ok(ElementKind::QuestionGridWithTotal)
        );
        assert_eq!(
            "Widget".parse::<ElementKind>(),
            Err(ValidationError::UnknownKind("Widget".into()))
        );
        assert_eq!(
            " ".parse::<ElementKind>(),
            Err(ValidationError::Blank { field: "kind" })
        );
    }

    #[test]
    fn question_variants_exclude_layout_and_grids() {
        let non_questions: Vec<_> = ElementKind::ALL
            .into_iter()
            .filter(|kind| !kind.is_question())
            .collect();
        assert_eq!(
            non_questions,
            vec![
                ElementKind::Section,
                ElementKind::Paragraph,
                ElementKind::QuestionGrid,
                ElementKind::QuestionGridWithTotal,
            ]
        );
    }

    #[test]
    fn every_style_default_fits_the_column() {
        for kind in ElementKind::ALL {
            assert!(!kind.default_style().is_empty());
            assert!(kind.default_style().len() <= crate::error::MAX_KIND_LENGTH);
            assert!(kind.name().len() <= crate::error::MAX_KIND_LENGTH);
        }
    }
}
