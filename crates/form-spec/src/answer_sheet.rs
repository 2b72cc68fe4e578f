use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{ElementId, QuestionSheetId};

/// A filled-in instance of a question sheet, as the engine sees it.
pub trait AnswerSheet {
    fn question_sheet_id(&self) -> QuestionSheetId;

    /// Response text shown for the element; multiple answers are comma separated.
    fn displayed_response(&self, element: ElementId) -> Option<String>;

    /// Type name of the nested object at `path`, or `None` when it is absent.
    fn object_type(&self, path: &str) -> Option<String>;
}

/// Answer sheet loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryAnswerSheet {
    pub question_sheet_id: QuestionSheetId,
    #[serde(default)]
    pub responses: BTreeMap<ElementId, String>,
    #[serde(default)]
    pub objects: BTreeMap<String, Option<String>>,
}

impl MemoryAnswerSheet {
    pub fn new(question_sheet_id: QuestionSheetId) -> Self {
        Self {
            question_sheet_id,
            responses: BTreeMap::new(),
            objects: BTreeMap::new(),
        }
    }

    pub fn with_response(mut self, element: ElementId, response: impl Into<String>) -> Self {
        self.responses.insert(element, response.into());
        self
    }

    pub fn with_object(mut self, path: impl Into<String>, type_name: Option<&str>) -> Self {
        self.objects
            .insert(path.into(), type_name.map(str::to_string));
        self
    }
}

impl AnswerSheet for MemoryAnswerSheet {
    fn question_sheet_id(&self) -> QuestionSheetId {
        self.question_sheet_id
    }

    fn displayed_response(&self, element: ElementId) -> Option<String> {
        self.responses.get(&element).cloned()
    }

    fn object_type(&self, path: &str) -> Option<String> {
        self.objects.get(path).cloned().flatten()
    }
}
