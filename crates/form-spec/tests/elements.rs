use form_spec::{
    Element, ElementId, ElementKind, EngineConfig, FormError, FormStore, ParentRef,
    ValidationError,
};

fn fixture_store() -> FormStore {
    FormStore::from_json(include_str!("fixtures/application_form.json")).expect("fixture")
}

#[test]
fn address_field_template_follows_style() {
    let address = Element::draft(ElementKind::AddressField);
    assert_eq!(address.template_key(), "text_field");

    let essay = address.with_style("essay");
    assert_eq!(essay.template_key(), "text_area_field");
}

#[test]
fn other_templates_default_to_snake_case() {
    assert_eq!(
        Element::draft(ElementKind::QuestionGridWithTotal).template_key(),
        "question_grid_with_total"
    );
    assert_eq!(
        Element::draft(ElementKind::DateField)
            .with_style("mmyy")
            .template_key(),
        "date_field_mmyy"
    );
    assert_eq!(
        Element::draft(ElementKind::ChoiceField)
            .with_style("acceptance")
            .template_key(),
        "acceptance"
    );
}

#[test]
fn blank_choice_field_gets_three_choices_and_checkbox() {
    let mut store = FormStore::default();
    let config = EngineConfig::default();
    let id = store
        .create(Element::draft(ElementKind::ChoiceField).with_label("Pick"), &config)
        .expect("create");

    let choice = store.element(id).expect("saved");
    assert_eq!(
        choice.content.as_deref(),
        Some("Choice One\nChoice Two\nChoice Three")
    );
    assert_eq!(choice.style.as_deref(), Some("checkbox"));
}

#[test]
fn every_kind_has_kind_and_style_after_create() {
    let mut store = FormStore::default();
    let config = EngineConfig::default();
    for kind in ElementKind::ALL {
        let id = store.create(Element::draft(kind), &config).expect("create");
        let element = store.element(id).expect("saved");
        assert_eq!(element.kind, kind);
        assert!(!element.style.as_deref().unwrap_or("").trim().is_empty());
    }
    assert_eq!(store.elements.len(), ElementKind::ALL.len());
}

#[test]
fn style_defaults_per_kind() {
    let mut store = FormStore::default();
    let config = EngineConfig::default();
    let cases = [
        (ElementKind::TextField, "essay"),
        (ElementKind::DateField, "date"),
        (ElementKind::FileField, "file"),
        (ElementKind::ReferenceQuestion, "peer"),
        (ElementKind::QuestionGridWithTotal, "grid_with_total"),
        (ElementKind::PaymentQuestion, "payment_question"),
    ];
    for (kind, style) in cases {
        let id = store.create(Element::draft(kind), &config).expect("create");
        assert_eq!(store.element(id).unwrap().style.as_deref(), Some(style));
    }

    let paragraph = store
        .create(Element::draft(ElementKind::Paragraph), &config)
        .expect("create");
    assert_eq!(
        store.element(paragraph).unwrap().content.as_deref(),
        Some("Lorem ipsum...")
    );
}

#[test]
fn oversized_style_blocks_the_save() {
    let mut store = fixture_store();
    let before = store.clone();
    let config = EngineConfig::default();

    let result = store.create(
        Element::draft(ElementKind::TextField).with_style("s".repeat(41)),
        &config,
    );
    assert_eq!(
        result,
        Err(FormError::Validation(ValidationError::TooLong {
            field: "style",
            max: 40
        }))
    );
    assert_eq!(store, before);
}

#[test]
fn update_rejects_blank_style() {
    let mut store = fixture_store();
    let config = EngineConfig::default();
    let mut element = store.element(ElementId(3)).unwrap().clone();
    element.style = Some("   ".into());
    assert_eq!(
        store.update(element, &config),
        Err(FormError::Validation(ValidationError::Blank { field: "style" }))
    );
}

#[test]
fn label_length_uses_configured_maximum() {
    let mut store = FormStore::default();
    let config = EngineConfig {
        max_label_length: 10,
        ..EngineConfig::default()
    };
    let result = store.create(
        Element::draft(ElementKind::Question).with_label("A label that is too long"),
        &config,
    );
    assert_eq!(
        result,
        Err(FormError::Validation(ValidationError::TooLong {
            field: "label",
            max: 10
        }))
    );
    assert!(store.elements.is_empty());
}

#[test]
fn parent_must_be_a_matching_container() {
    let mut store = fixture_store();
    let config = EngineConfig::default();

    let mut under_address = Element::draft(ElementKind::TextField);
    under_address.parent = Some(ParentRef::QuestionGrid(ElementId(8)));
    assert_eq!(
        store.create(under_address, &config),
        Err(FormError::NotAContainer(ElementId(8)))
    );

    let mut wrong_variant = Element::draft(ElementKind::TextField);
    wrong_variant.parent = Some(ParentRef::ChoiceField(ElementId(4)));
    assert_eq!(
        store.create(wrong_variant, &config),
        Err(FormError::NotAContainer(ElementId(4)))
    );
}

#[test]
fn active_elements_skip_archived_sheets_and_nested_rows() {
    let store = fixture_store();
    let active: Vec<_> = store.active_elements().iter().map(|e| e.id.0).collect();
    assert_eq!(active, vec![1, 2, 3, 4, 8]);

    let questions: Vec<_> = store.questions().iter().map(|e| e.id.0).collect();
    assert_eq!(questions, vec![2, 3, 5, 6, 7, 8]);
}

#[test]
fn document_round_trips_through_json() {
    let store = fixture_store();
    let json = serde_json::to_string(&store).expect("serialize");
    assert_eq!(FormStore::from_json(&json).expect("deserialize"), store);
}

#[test]
fn element_cannot_be_nested_inside_itself_or_a_descendant() {
    let mut store = fixture_store();
    let config = EngineConfig::default();
    let mut inner = Element::draft(ElementKind::QuestionGrid);
    inner.parent = Some(ParentRef::QuestionGrid(ElementId(4)));
    inner.position = Some(4);
    let inner = store.create(inner, &config).expect("inner grid");
    let before = store.clone();

    let mut grid = store.element(ElementId(4)).unwrap().clone();
    grid.parent = Some(ParentRef::QuestionGrid(ElementId(4)));
    assert_eq!(
        store.update(grid.clone(), &config),
        Err(FormError::ContainerCycle {
            element: ElementId(4),
            parent: ElementId(4),
        })
    );

    grid.parent = Some(ParentRef::QuestionGrid(inner));
    assert_eq!(
        store.update(grid, &config),
        Err(FormError::ContainerCycle {
            element: ElementId(4),
            parent: inner,
        })
    );
    assert_eq!(store, before);
    assert_eq!(store.all_elements(ElementId(4)), vec![ElementId(5), ElementId(6), ElementId(7), inner]);
}
