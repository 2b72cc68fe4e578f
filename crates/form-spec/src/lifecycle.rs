use std::collections::BTreeSet;

use crate::config::EngineConfig;
use crate::element::{ConditionalLink, Element};
use crate::error::FormError;
use crate::ids::{ElementId, PageId};
use crate::store::{FormStore, PageElement};

/// A cache that has to be rebuilt after a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RebuildTarget {
    Page(PageId),
    /// Every page holding this container, and its own container in turn.
    Container(ElementId),
}

/// What a save changed beyond the element row itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub element_id: ElementId,
    /// Predecessors whose next-element link now points at the saved element.
    pub relinked: Vec<ElementId>,
    pub rebuilds: Vec<RebuildTarget>,
}

impl FormStore {
    /// Applies defaults to a new element, validates it and saves it.
    pub fn create(&mut self, mut draft: Element, config: &EngineConfig) -> Result<ElementId, FormError> {
        draft.id = self.next_element_id();
        draft.set_defaults();
        draft.validate(config)?;
        self.check_parent(&draft)?;
        self.save_and_rebuild(draft)
    }

    pub fn update(&mut self, element: Element, config: &EngineConfig) -> Result<ElementId, FormError> {
        self.element(element.id)?;
        element.validate(config)?;
        self.check_parent(&element)?;
        self.save_and_rebuild(element)
    }

    fn check_parent(&self, element: &Element) -> Result<(), FormError> {
        let Some(parent) = element.parent else {
            return Ok(());
        };
        self.check_acyclic(element.id, parent.id())?;
        let container = self.element(parent.id())?;
        if container.kind.child_ref(container.id) == Some(parent) {
            Ok(())
        } else {
            Err(FormError::NotAContainer(container.id))
        }
    }

    /// Rejects nesting `element` under itself or one of its own descendants.
    pub(crate) fn check_acyclic(&self, element: ElementId, parent: ElementId) -> Result<(), FormError> {
        if parent == element || self.all_elements(element).contains(&parent) {
            return Err(FormError::ContainerCycle { element, parent });
        }
        Ok(())
    }

    fn save_and_rebuild(&mut self, element: Element) -> Result<ElementId, FormError> {
        self.transaction(|store| {
            let outcome = store.save_deferred(element)?;
            store.apply_rebuilds(&outcome.rebuilds)?;
            Ok(outcome.element_id)
        })
    }

    /// Persists the element and relinks its predecessors, leaving the cache
    /// rebuilds to the caller. No validation runs here.
    pub fn save_deferred(&mut self, mut element: Element) -> Result<SaveOutcome, FormError> {
        self.link_forward(&mut element);
        let element_id = element.id;
        let parent = element.parent;
        let previous_parent = self
            .element(element_id)
            .ok()
            .and_then(|stored| stored.parent)
            .filter(|stored| Some(*stored) != parent);
        log::debug!("saving element {} ({})", element_id, element.kind);
        self.upsert_element(element);
        let relinked = self.relink_previous(element_id)?;

        let mut rebuilds: Vec<_> = self
            .element_pages(element_id)
            .into_iter()
            .map(RebuildTarget::Page)
            .collect();
        if let Some(parent) = parent {
            rebuilds.push(RebuildTarget::Container(parent.id()));
        }
        if let Some(previous) = previous_parent {
            rebuilds.push(RebuildTarget::Container(previous.id()));
        }
        Ok(SaveOutcome {
            element_id,
            relinked,
            rebuilds,
        })
    }

    /// Rebuilds every page reached from `targets`, each page once.
    pub fn apply_rebuilds(&mut self, targets: &[RebuildTarget]) -> Result<Vec<PageId>, FormError> {
        let mut pages = BTreeSet::new();
        let mut visited = BTreeSet::new();
        let mut pending: Vec<_> = targets.to_vec();
        while let Some(target) = pending.pop() {
            match target {
                RebuildTarget::Page(page) => {
                    pages.insert(page);
                }
                RebuildTarget::Container(container) => {
                    if !visited.insert(container) {
                        continue;
                    }
                    let element = self.element(container)?;
                    pending.extend(
                        self.element_pages(container)
                            .into_iter()
                            .map(RebuildTarget::Page),
                    );
                    if let Some(parent) = element.parent {
                        pending.push(RebuildTarget::Container(parent.id()));
                    }
                }
            }
        }
        for page in &pages {
            self.rebuild_all_element_ids(*page)?;
        }
        Ok(pages.into_iter().collect())
    }

    /// Links an element onto a page, at the end unless `position` is given.
    pub fn place_on_page(
        &mut self,
        element: ElementId,
        page: PageId,
        position: Option<i64>,
    ) -> Result<(), FormError> {
        self.transaction(|store| {
            let outcome = store.link_to_page(element, page, position)?;
            store.apply_rebuilds(&outcome.rebuilds)?;
            Ok(())
        })
    }

    pub(crate) fn link_to_page(
        &mut self,
        element: ElementId,
        page: PageId,
        position: Option<i64>,
    ) -> Result<SaveOutcome, FormError> {
        self.page(page)?;
        let current = self.element(element)?.clone();
        if self.page_element(page, element).is_none() {
            let position = position.unwrap_or_else(|| self.next_page_position(page));
            self.page_elements.push(PageElement {
                page_id: page,
                element_id: element,
                position: Some(position),
            });
        }
        self.save_deferred(current)
    }

    /// Removes an element, its nested elements and their page links.
    pub fn destroy(&mut self, element: ElementId) -> Result<Vec<ElementId>, FormError> {
        self.transaction(|store| {
            let root = store.element(element)?.clone();
            let mut doomed = vec![element];
            doomed.extend(store.all_elements(element));

            let mut pages: BTreeSet<_> = doomed
                .iter()
                .flat_map(|id| store.element_pages(*id))
                .collect();
            let mut rebuilds = Vec::new();
            if let Some(parent) = root.parent {
                rebuilds.push(RebuildTarget::Container(parent.id()));
                pages.extend(store.element_pages(parent.id()));
            }

            store.page_elements.retain(|link| !doomed.contains(&link.element_id));
            store.elements.retain(|row| !doomed.contains(&row.id));
            for row in store.elements.iter_mut() {
                if matches!(row.conditional, ConditionalLink::NextElement { id: Some(id) } if doomed.contains(&id))
                {
                    row.conditional = ConditionalLink::NextElement { id: None };
                }
            }
            for page in &pages {
                store.relink_page(*page)?;
            }
            rebuilds.extend(pages.into_iter().map(RebuildTarget::Page));
            store.apply_rebuilds(&rebuilds)?;
            log::debug!("destroyed element {} and {} nested", element, doomed.len() - 1);
            Ok(doomed)
        })
    }

    /// Repoints every next-element link on the page at its current successor.
    pub(crate) fn relink_page(&mut self, page: PageId) -> Result<(), FormError> {
        let ordered = self.page_elements(page);
        for (index, id) in ordered.iter().enumerate() {
            let next = ordered.get(index + 1).copied();
            let element = self.element_mut(*id)?;
            if element.conditional.follows_next()
                && let Some(next) = next
            {
                element.conditional = ConditionalLink::NextElement { id: Some(next) };
            }
        }
        Ok(())
    }
}
