use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::error::FormError;
use crate::ids::{ElementId, PageId, QuestionSheetId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionSheet {
    pub id: QuestionSheetId,
    pub label: String,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Page {
    pub id: PageId,
    pub question_sheet_id: QuestionSheetId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub number: u32,
    /// Every element on the page, nested ones included. Rebuilt after saves.
    #[serde(default)]
    pub all_element_ids: Vec<ElementId>,
}

/// Membership of an element on a page, carrying its page-local position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PageElement {
    pub page_id: PageId,
    pub element_id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

/// In-memory form document: question sheets, pages, page links and elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormStore {
    #[serde(default)]
    pub question_sheets: Vec<QuestionSheet>,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub page_elements: Vec<PageElement>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl FormStore {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Runs `f` against the store, restoring the prior state if it fails.
    pub fn transaction<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, FormError>,
    ) -> Result<T, FormError> {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            log::debug!("rolling back form store transaction");
            *self = snapshot;
        }
        result
    }

    pub fn add_question_sheet(&mut self, label: impl Into<String>) -> QuestionSheetId {
        let id = QuestionSheetId(
            self.question_sheets
                .iter()
                .map(|sheet| sheet.id.0)
                .max()
                .unwrap_or(0)
                + 1,
        );
        self.question_sheets.push(QuestionSheet {
            id,
            label: label.into(),
            archived: false,
        });
        id
    }

    pub fn add_page(
        &mut self,
        question_sheet_id: QuestionSheetId,
        label: impl Into<String>,
    ) -> Result<PageId, FormError> {
        self.question_sheet(question_sheet_id)?;
        let id = PageId(self.pages.iter().map(|page| page.id.0).max().unwrap_or(0) + 1);
        let number = self
            .pages
            .iter()
            .filter(|page| page.question_sheet_id == question_sheet_id)
            .count() as u32
            + 1;
        self.pages.push(Page {
            id,
            question_sheet_id,
            label: label.into(),
            number,
            all_element_ids: Vec::new(),
        });
        Ok(id)
    }

    pub fn question_sheet(&self, id: QuestionSheetId) -> Result<&QuestionSheet, FormError> {
        self.question_sheets
            .iter()
            .find(|sheet| sheet.id == id)
            .ok_or(FormError::QuestionSheetNotFound(id))
    }

    pub fn page(&self, id: PageId) -> Result<&Page, FormError> {
        self.pages
            .iter()
            .find(|page| page.id == id)
            .ok_or(FormError::PageNotFound(id))
    }

    pub(crate) fn page_mut(&mut self, id: PageId) -> Result<&mut Page, FormError> {
        self.pages
            .iter_mut()
            .find(|page| page.id == id)
            .ok_or(FormError::PageNotFound(id))
    }

    pub fn element(&self, id: ElementId) -> Result<&Element, FormError> {
        self.elements
            .iter()
            .find(|element| element.id == id)
            .ok_or(FormError::ElementNotFound(id))
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> Result<&mut Element, FormError> {
        self.elements
            .iter_mut()
            .find(|element| element.id == id)
            .ok_or(FormError::ElementNotFound(id))
    }

    pub(crate) fn next_element_id(&self) -> ElementId {
        ElementId(
            self.elements
                .iter()
                .map(|element| element.id.0)
                .max()
                .unwrap_or(0)
                + 1,
        )
    }

    pub(crate) fn upsert_element(&mut self, element: Element) {
        match self.elements.iter_mut().find(|row| row.id == element.id) {
            Some(row) => *row = element,
            None => self.elements.push(element),
        }
    }

    pub fn pages_of_sheet(&self, question_sheet_id: QuestionSheetId) -> Vec<&Page> {
        let mut pages: Vec<_> = self
            .pages
            .iter()
            .filter(|page| page.question_sheet_id == question_sheet_id)
            .collect();
        pages.sort_by_key(|page| page.number);
        pages
    }

    /// Pages the element is linked to, in link order.
    pub fn element_pages(&self, element: ElementId) -> Vec<PageId> {
        let mut seen = BTreeSet::new();
        self.page_elements
            .iter()
            .filter(|link| link.element_id == element)
            .filter(|link| seen.insert(link.page_id))
            .map(|link| link.page_id)
            .collect()
    }

    pub(crate) fn page_element(&self, page: PageId, element: ElementId) -> Option<&PageElement> {
        self.page_elements
            .iter()
            .find(|link| link.page_id == page && link.element_id == element)
    }

    pub(crate) fn page_element_mut(
        &mut self,
        page: PageId,
        element: ElementId,
    ) -> Option<&mut PageElement> {
        self.page_elements
            .iter_mut()
            .find(|link| link.page_id == page && link.element_id == element)
    }

    /// Elements placed directly on the page, ordered by page position.
    pub fn page_elements(&self, page: PageId) -> Vec<ElementId> {
        let mut links: Vec<_> = self
            .page_elements
            .iter()
            .filter(|link| link.page_id == page)
            .collect();
        links.sort_by_key(|link| position_key(link.position));
        links.into_iter().map(|link| link.element_id).collect()
    }

    /// Elements owned by `container`, ordered by their container position.
    pub fn children(&self, container: ElementId) -> Vec<ElementId> {
        let mut children: Vec<_> = self
            .elements
            .iter()
            .filter(|element| element.parent.is_some_and(|parent| parent.id() == container))
            .collect();
        children.sort_by_key(|element| (position_key(element.position), element.id));
        children.into_iter().map(|element| element.id).collect()
    }

    /// Direct children followed by each child's nested elements.
    pub fn all_elements(&self, element: ElementId) -> Vec<ElementId> {
        let children = self.children(element);
        let nested: Vec<_> = children
            .iter()
            .flat_map(|child| self.all_elements(*child))
            .collect();
        children.into_iter().chain(nested).collect()
    }

    pub fn page_all_elements(&self, page: PageId) -> Vec<ElementId> {
        let direct = self.page_elements(page);
        let nested: Vec<_> = direct
            .iter()
            .flat_map(|element| self.all_elements(*element))
            .collect();
        direct.into_iter().chain(nested).collect()
    }

    /// Distinct elements on pages of question sheets that are not archived.
    pub fn active_elements(&self) -> Vec<&Element> {
        let live_pages: BTreeSet<_> = self
            .pages
            .iter()
            .filter(|page| {
                self.question_sheet(page.question_sheet_id)
                    .is_ok_and(|sheet| !sheet.archived)
            })
            .map(|page| page.id)
            .collect();
        let ids: BTreeSet<_> = self
            .page_elements
            .iter()
            .filter(|link| live_pages.contains(&link.page_id))
            .map(|link| link.element_id)
            .collect();
        self.elements
            .iter()
            .filter(|element| ids.contains(&element.id))
            .collect()
    }

    pub fn questions(&self) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|element| element.is_question())
            .collect()
    }
}

fn position_key(position: Option<i64>) -> (bool, i64) {
    (position.is_none(), position.unwrap_or_default())
}
