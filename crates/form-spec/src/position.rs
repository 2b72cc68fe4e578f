use crate::error::FormError;
use crate::ids::{ElementId, PageId};
use crate::store::FormStore;

impl FormStore {
    /// Page-local position when `page` is given, otherwise the element's
    /// own container position.
    pub fn position_on(
        &self,
        element: ElementId,
        page: Option<PageId>,
    ) -> Result<Option<i64>, FormError> {
        match page {
            Some(page) => Ok(self
                .page_element(page, element)
                .and_then(|link| link.position)),
            None => Ok(self.element(element)?.position),
        }
    }

    /// Stores `position` in the given scope and hands it back. A page the
    /// element is not linked to leaves everything untouched.
    pub fn set_position(
        &mut self,
        element: ElementId,
        position: i64,
        page: Option<PageId>,
    ) -> Result<i64, FormError> {
        match page {
            Some(page) => {
                if let Some(link) = self.page_element_mut(page, element) {
                    link.position = Some(position);
                }
            }
            None => self.element_mut(element)?.position = Some(position),
        }
        Ok(position)
    }

    /// `page` itself, or the first page the element is linked to.
    pub fn page_id(&self, element: ElementId, page: Option<PageId>) -> Option<PageId> {
        page.or_else(|| self.element_pages(element).first().copied())
    }

    pub(crate) fn next_page_position(&self, page: PageId) -> i64 {
        self.page_elements
            .iter()
            .filter(|link| link.page_id == page)
            .filter_map(|link| link.position)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// One past the highest position among the container's children.
    pub fn next_child_position(&self, container: ElementId) -> i64 {
        self.children(container)
            .into_iter()
            .filter_map(|child| self.element(child).ok().and_then(|child| child.position))
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Recomputes the page's cached id list, nested grid contents included.
    pub fn rebuild_all_element_ids(&mut self, page: PageId) -> Result<&[ElementId], FormError> {
        let ids = self.page_all_elements(page);
        log::debug!("rebuilt page {} element cache: {} ids", page, ids.len());
        let page = self.page_mut(page)?;
        page.all_element_ids = ids;
        Ok(&page.all_element_ids)
    }
}
