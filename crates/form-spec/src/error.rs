use thiserror::Error;

use crate::ids::{ElementId, PageId, QuestionSheetId};

/// Maximum length of the `kind` and `style` columns.
pub const MAX_KIND_LENGTH: usize = 40;

/// Failures that block an element from being persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} can't be blank")]
    Blank { field: &'static str },
    #[error("{field} is too long (maximum is {max} characters)")]
    TooLong { field: &'static str, max: usize },
    #[error("unknown element kind '{0}'")]
    UnknownKind(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("element {0} not found")]
    ElementNotFound(ElementId),
    #[error("page {0} not found")]
    PageNotFound(PageId),
    #[error("question sheet {0} not found")]
    QuestionSheetNotFound(QuestionSheetId),
    #[error("element {0} cannot hold child elements")]
    NotAContainer(ElementId),
    #[error("element {element} cannot be nested inside {parent}, which it contains")]
    ContainerCycle { element: ElementId, parent: ElementId },
}

/// Reasons a declared length limit could not be resolved.
///
/// These never leave [`crate::ResponseEvaluator::limit`]; they are logged and
/// reported as "no limit".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitLookupError {
    #[error("element does not name an object and attribute")]
    Unmapped,
    #[error("object '{0}' is absent on the answer sheet")]
    MissingObject(String),
    #[error("type '{0}' is not registered")]
    UnknownType(String),
    #[error("type '{type_name}' has no attribute '{attribute}'")]
    UnknownAttribute { type_name: String, attribute: String },
    #[error("attribute '{attribute}' on '{type_name}' declares no limit")]
    Unlimited { type_name: String, attribute: String },
}
