use serde::Serialize;

use crate::answer_sheet::AnswerSheet;
use crate::config::EngineConfig;
use crate::element::{Element, ElementKind, is_blank};
use crate::error::{FormError, LimitLookupError};
use crate::ids::{ElementId, PageId};
use crate::store::FormStore;

/// Per-element evaluation of one answer sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementReport {
    pub id: ElementId,
    pub page_id: PageId,
    pub kind: ElementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub template: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    pub required: bool,
    pub visible: bool,
    pub has_response: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    pub reuseable: bool,
}

/// Answers per-response questions about elements: requiredness, visibility,
/// length limits.
pub struct ResponseEvaluator<'a> {
    store: &'a FormStore,
    config: &'a EngineConfig,
}

impl<'a> ResponseEvaluator<'a> {
    pub fn new(store: &'a FormStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn has_response(&self, element: &Element, answers: &dyn AnswerSheet) -> bool {
        match element.kind {
            ElementKind::Section | ElementKind::Paragraph => false,
            kind if kind.is_grid() => self.store.children(element.id).into_iter().any(|child| {
                self.store
                    .element(child)
                    .is_ok_and(|child| self.has_response(child, answers))
            }),
            _ => !is_blank(answers.displayed_response(element.id).as_deref()),
        }
    }

    /// Declared length limit of the answer sheet attribute the element
    /// writes to. Any lookup failure means "no limit".
    pub fn limit(&self, element: &Element, answers: Option<&dyn AnswerSheet>) -> Option<usize> {
        let answers = answers?;
        match self.resolve_limit(element, answers) {
            Ok(limit) => Some(limit),
            Err(LimitLookupError::Unmapped) => None,
            Err(err) => {
                log::debug!("no length limit for element {}: {}", element.id, err);
                None
            }
        }
    }

    fn resolve_limit(
        &self,
        element: &Element,
        answers: &dyn AnswerSheet,
    ) -> Result<usize, LimitLookupError> {
        let (Some(object), Some(attribute)) = (
            element.object_name.as_deref().filter(|name| !name.trim().is_empty()),
            element
                .attribute_name
                .as_deref()
                .filter(|name| !name.trim().is_empty()),
        ) else {
            return Err(LimitLookupError::Unmapped);
        };
        let type_name = answers
            .object_type(object)
            .ok_or_else(|| LimitLookupError::MissingObject(object.to_string()))?;
        self.config.schema.column_limit(&type_name, attribute)
    }

    pub fn reuseable(&self, element: &Element) -> bool {
        element.reuseable(self.config)
    }

    pub fn matches_condition(&self, element: &Element, answers: &dyn AnswerSheet) -> bool {
        element.matches_condition(answers)
    }

    pub fn is_required(&self, element: &Element, answers: Option<&dyn AnswerSheet>) -> bool {
        self.store.is_required(element, answers)
    }

    pub fn is_visible(&self, element: &Element, answers: &dyn AnswerSheet) -> bool {
        self.store.is_visible(element, answers)
    }

    /// Evaluates every element of the answer sheet's question sheet, page by page.
    pub fn report(&self, answers: &dyn AnswerSheet) -> Result<Vec<ElementReport>, FormError> {
        let sheet = self.store.question_sheet(answers.question_sheet_id())?;
        let mut reports = Vec::new();
        for page in self.store.pages_of_sheet(sheet.id) {
            for id in self.store.page_all_elements(page.id) {
                let element = self.store.element(id)?;
                let position = match element.parent {
                    Some(_) => element.position,
                    None => self.store.position_on(id, Some(page.id))?,
                };
                reports.push(ElementReport {
                    id,
                    page_id: page.id,
                    kind: element.kind,
                    label: element.label.clone(),
                    template: element.template_key(),
                    position,
                    required: self.is_required(element, Some(answers)),
                    visible: self.is_visible(element, answers),
                    has_response: self.has_response(element, answers),
                    limit: self.limit(element, Some(answers)),
                    reuseable: self.reuseable(element),
                });
            }
        }
        Ok(reports)
    }
}
