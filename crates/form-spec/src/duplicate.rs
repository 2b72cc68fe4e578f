use crate::element::ConditionalLink;
use crate::error::FormError;
use crate::ids::{ElementId, PageId};
use crate::lifecycle::RebuildTarget;
use crate::store::FormStore;

impl FormStore {
    /// Copies an element and everything nested in it onto `page`.
    ///
    /// With a `parent` container the copy becomes its last child; otherwise
    /// it is linked onto the page. Copies skip validation. Returns the id of
    /// the new root.
    pub fn duplicate(
        &mut self,
        element: ElementId,
        page: PageId,
        parent: Option<ElementId>,
    ) -> Result<ElementId, FormError> {
        self.transaction(|store| {
            store.page(page)?;
            if let Some(parent) = parent {
                store.check_acyclic(element, parent)?;
            }
            let mut rebuilds = Vec::new();
            let copy = store.duplicate_subtree(element, page, parent, &mut rebuilds)?;
            store.apply_rebuilds(&rebuilds)?;
            log::debug!("duplicated element {} as {} on page {}", element, copy, page);
            Ok(copy)
        })
    }

    fn duplicate_subtree(
        &mut self,
        source: ElementId,
        page: PageId,
        parent: Option<ElementId>,
        rebuilds: &mut Vec<RebuildTarget>,
    ) -> Result<ElementId, FormError> {
        let mut copy = self.element(source)?.clone();
        let children = self.children(source);
        copy.id = self.next_element_id();
        copy.position = None;
        copy.parent = None;
        if copy.conditional.follows_next() {
            copy.conditional = ConditionalLink::NextElement { id: None };
        }
        if let Some(parent) = parent {
            let container = self.element(parent)?;
            copy.parent = Some(
                container
                    .kind
                    .child_ref(parent)
                    .ok_or(FormError::NotAContainer(parent))?,
            );
            copy.position = Some(self.next_child_position(parent));
        }

        let outcome = self.save_deferred(copy)?;
        rebuilds.extend(outcome.rebuilds);
        if parent.is_none() {
            let linked = self.link_to_page(outcome.element_id, page, None)?;
            rebuilds.extend(linked.rebuilds);
        }

        for child in children {
            self.duplicate_subtree(child, page, Some(outcome.element_id), rebuilds)?;
        }
        Ok(outcome.element_id)
    }
}
