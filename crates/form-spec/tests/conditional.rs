use form_spec::{
    AnswerSheet, ConditionalLink, Element, ElementId, ElementKind, EngineConfig, FormStore,
    MemoryAnswerSheet, PageId, QuestionSheetId,
};

fn fixture_store() -> FormStore {
    FormStore::from_json(include_str!("fixtures/application_form.json")).expect("fixture")
}

fn answered(element: u64, response: &str) -> MemoryAnswerSheet {
    MemoryAnswerSheet::new(QuestionSheetId(1)).with_response(ElementId(element), response)
}

fn trigger(answer: Option<&str>) -> Element {
    let mut element = Element::draft(ElementKind::ChoiceField);
    element.id = ElementId(1);
    element.conditional_answer = answer.map(str::to_string);
    element
}

#[test]
fn condition_matches_on_any_shared_answer() {
    let element = trigger(Some("B,C"));
    assert!(element.matches_condition(&answered(1, "A,B")));

    let element = trigger(Some("C"));
    assert!(!element.matches_condition(&answered(1, "A")));
}

#[test]
fn condition_values_are_trimmed_before_matching() {
    let element = trigger(Some("B"));
    assert!(element.matches_condition(&answered(1, "A, B")));

    let element = trigger(Some(" , "));
    assert!(!element.matches_condition(&answered(1, " ")));
}

#[test]
fn condition_needs_both_answer_and_response() {
    assert!(!trigger(None).matches_condition(&answered(1, "A")));
    assert!(!trigger(Some("")).matches_condition(&answered(1, "A")));
    assert!(!trigger(Some("A")).matches_condition(&MemoryAnswerSheet::new(QuestionSheetId(1))));
}

#[test]
fn hidden_follow_up_is_not_required() {
    let store = fixture_store();
    let follow_up = store.element(ElementId(3)).unwrap();

    let declined = answered(2, "No");
    assert!(!store.is_required(follow_up, Some(&declined)));
    assert!(!store.is_visible(follow_up, &declined));

    let accepted = answered(2, "Yes");
    assert!(store.is_required(follow_up, Some(&accepted)));
    assert!(store.is_visible(follow_up, &accepted));

    assert!(store.is_required(follow_up, None));
}

#[test]
fn unanswered_trigger_hides_follow_up() {
    let store = fixture_store();
    let follow_up = store.element(ElementId(3)).unwrap();
    let empty = MemoryAnswerSheet::new(QuestionSheetId(1));
    assert!(!store.is_required(follow_up, Some(&empty as &dyn AnswerSheet)));
}

#[test]
fn stored_flag_applies_without_a_conditional_predecessor() {
    let store = fixture_store();
    let answers = answered(2, "No");
    let trigger = store.element(ElementId(2)).unwrap();
    assert!(store.is_required(trigger, Some(&answers)));

    let column = store.element(ElementId(5)).unwrap();
    assert!(store.is_required(column, Some(&answers)));

    let end = store.element(ElementId(7)).unwrap();
    assert!(!store.is_required(end, Some(&answers)));
}

#[test]
fn previous_element_is_scoped_to_the_question_sheet() {
    let store = fixture_store();
    assert_eq!(
        store
            .previous_element(ElementId(3), QuestionSheetId(1))
            .map(|element| element.id),
        Some(ElementId(2))
    );
    assert!(store.previous_element(ElementId(3), QuestionSheetId(2)).is_none());
    assert!(store.previous_element(ElementId(1), QuestionSheetId(1)).is_none());
}

#[test]
fn save_points_next_element_link_at_successor() {
    let mut store = fixture_store();
    let config = EngineConfig::default();
    let mut trigger = store.element(ElementId(2)).unwrap().clone();
    trigger.conditional = ConditionalLink::NextElement { id: None };
    store.update(trigger, &config).expect("update");

    assert_eq!(
        store.element(ElementId(2)).unwrap().conditional,
        ConditionalLink::NextElement {
            id: Some(ElementId(3))
        }
    );
}

#[test]
fn inserting_after_a_trigger_relinks_it() {
    let mut store = fixture_store();
    let config = EngineConfig::default();
    let note = store
        .create(Element::draft(ElementKind::Question).with_label("Note"), &config)
        .expect("create");
    store
        .place_on_page(note, PageId(1), Some(2))
        .expect("place");

    assert_eq!(store.page_elements(PageId(1)), vec![ElementId(1), ElementId(2), note, ElementId(3)]);
    assert!(
        store
            .element(ElementId(2))
            .unwrap()
            .conditional
            .points_to(note)
    );

    let declined = answered(2, "No");
    let follow_up = store.element(ElementId(3)).unwrap();
    assert!(store.is_required(follow_up, Some(&declined)));
    let note = store.element(note).unwrap();
    assert!(!store.is_visible(note, &declined));
}

#[test]
fn chained_triggers_link_as_elements_are_appended() {
    let mut store = fixture_store();
    let config = EngineConfig::default();
    let first = store
        .create(
            Element::draft(ElementKind::Question)
                .with_conditional(ConditionalLink::NextElement { id: None }, "Y"),
            &config,
        )
        .expect("first");
    store.place_on_page(first, PageId(1), None).expect("place");
    assert_eq!(
        store.element(first).unwrap().conditional,
        ConditionalLink::NextElement { id: None }
    );

    let second = store
        .create(Element::draft(ElementKind::Question), &config)
        .expect("second");
    store.place_on_page(second, PageId(1), None).expect("place");
    assert!(store.element(first).unwrap().conditional.points_to(second));
    assert_eq!(store.position_on(second, Some(PageId(1))), Ok(Some(5)));
}

#[test]
fn element_on_two_pages_keeps_last_successor() {
    let mut store = fixture_store();
    let config = EngineConfig::default();
    let shared = store
        .create(
            Element::draft(ElementKind::Question)
                .with_conditional(ConditionalLink::NextElement { id: None }, "Y"),
            &config,
        )
        .expect("create");
    store.place_on_page(shared, PageId(1), Some(1)).expect("page 1");
    assert!(store.element(shared).unwrap().conditional.points_to(ElementId(2)));

    store.place_on_page(shared, PageId(2), Some(0)).expect("page 2");
    assert!(store.element(shared).unwrap().conditional.points_to(ElementId(4)));
}

#[test]
fn page_links_are_never_rewritten() {
    let mut store = fixture_store();
    let config = EngineConfig::default();
    let id = store
        .create(
            Element::draft(ElementKind::Question)
                .with_conditional(ConditionalLink::Page { id: PageId(2) }, "Y"),
            &config,
        )
        .expect("create");
    store.place_on_page(id, PageId(1), Some(1)).expect("place");
    assert_eq!(
        store.element(id).unwrap().conditional,
        ConditionalLink::Page { id: PageId(2) }
    );
}

#[test]
fn destroying_the_target_relinks_the_trigger() {
    let mut store = fixture_store();
    let removed = store.destroy(ElementId(3)).expect("destroy");
    assert_eq!(removed, vec![ElementId(3)]);
    assert_eq!(
        store.element(ElementId(2)).unwrap().conditional,
        ConditionalLink::NextElement { id: None }
    );
    assert_eq!(
        store.page(PageId(1)).unwrap().all_element_ids,
        vec![ElementId(1), ElementId(2)]
    );
}

#[test]
fn destroying_a_grid_removes_its_columns() {
    let mut store = fixture_store();
    let removed = store.destroy(ElementId(4)).expect("destroy");
    assert_eq!(
        removed,
        vec![ElementId(4), ElementId(5), ElementId(6), ElementId(7)]
    );
    assert!(store.element(ElementId(6)).is_err());
    assert_eq!(store.page(PageId(2)).unwrap().all_element_ids, vec![ElementId(8)]);
}
