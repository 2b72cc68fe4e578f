use std::collections::BTreeSet;

use crate::answer_sheet::AnswerSheet;
use crate::element::{ConditionalLink, Element, split_answers};
use crate::error::FormError;
use crate::ids::{ElementId, QuestionSheetId};
use crate::store::FormStore;

impl Element {
    /// True when a displayed response shares at least one value with
    /// `conditional_answer`.
    ///
    /// Both sides are split on commas and each value is trimmed, so a
    /// response of `"A, B"` matches a conditional answer of `"B"`. Empty
    /// values are ignored.
    pub fn matches_condition(&self, answers: &dyn AnswerSheet) -> bool {
        let Some(response) = answers.displayed_response(self.id) else {
            return false;
        };
        let triggers: BTreeSet<_> = self.conditional_answers().into_iter().collect();
        if triggers.is_empty() {
            return false;
        }
        split_answers(&response)
            .into_iter()
            .any(|value| triggers.contains(value))
    }
}

impl FormStore {
    /// Points a next-element link at whatever follows `element` on its pages.
    ///
    /// An element linked on several pages takes the successor from the last
    /// page that has one.
    pub(crate) fn link_forward(&self, element: &mut Element) {
        if !element.conditional.follows_next() {
            return;
        }
        let mut successors = Vec::new();
        for page in self.element_pages(element.id) {
            let ordered = self.page_elements(page);
            if let Some(index) = ordered.iter().position(|id| *id == element.id)
                && let Some(next) = ordered.get(index + 1)
            {
                successors.push(*next);
            }
        }
        if successors.len() > 1 {
            log::warn!(
                "element {} sits on {} pages with successors; keeping the last",
                element.id,
                successors.len()
            );
        }
        if let Some(next) = successors.last() {
            element.conditional = ConditionalLink::NextElement { id: Some(*next) };
        }
    }

    /// Repoints the predecessor of `element` on each of its pages at it, when
    /// that predecessor follows its next element. Returns the ids updated.
    pub(crate) fn relink_previous(&mut self, element: ElementId) -> Result<Vec<ElementId>, FormError> {
        let mut relinked = Vec::new();
        for page in self.element_pages(element) {
            let ordered = self.page_elements(page);
            let Some(index) = ordered.iter().position(|id| *id == element) else {
                continue;
            };
            if index == 0 {
                continue;
            }
            let previous = self.element_mut(ordered[index - 1])?;
            if previous.conditional.follows_next() {
                previous.conditional = ConditionalLink::NextElement { id: Some(element) };
                log::debug!("relinked element {} to {}", previous.id, element);
                relinked.push(previous.id);
            }
        }
        Ok(relinked)
    }

    /// Element placed before `element` on the first page of the question
    /// sheet that holds it.
    pub fn previous_element(
        &self,
        element: ElementId,
        question_sheet: QuestionSheetId,
    ) -> Option<&Element> {
        let page = self.element_pages(element).into_iter().find(|page| {
            self.page(*page)
                .is_ok_and(|page| page.question_sheet_id == question_sheet)
        })?;
        let ordered = self.page_elements(page);
        let index = ordered.iter().position(|id| *id == element)?;
        if index == 0 {
            return None;
        }
        self.element(ordered[index - 1]).ok()
    }

    /// True when the element is hidden because the question before it
    /// targets it and its trigger answer was not given.
    pub fn conditionally_hidden(&self, element: &Element, answers: &dyn AnswerSheet) -> bool {
        if element.grid_parent().is_some() {
            return false;
        }
        let Some(previous) = self.previous_element(element.id, answers.question_sheet_id()) else {
            return false;
        };
        previous.is_question()
            && previous.conditional.points_to(element.id)
            && !previous.matches_condition(answers)
    }

    pub fn is_required(&self, element: &Element, answers: Option<&dyn AnswerSheet>) -> bool {
        if let Some(answers) = answers
            && self.conditionally_hidden(element, answers)
        {
            return false;
        }
        element.required
    }

    pub fn is_visible(&self, element: &Element, answers: &dyn AnswerSheet) -> bool {
        !self.conditionally_hidden(element, answers)
    }
}
