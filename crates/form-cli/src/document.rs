use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use form_spec::{
    ConditionalLink, Element, ElementId, EngineConfig, FormStore, MemoryAnswerSheet, PageId,
};

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

pub const CONFIG_ENV: &str = "FORM_ENGINE_CONFIG";

pub fn load_document(path: &Path) -> CliResult<FormStore> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read document {}: {}", path.display(), err))?;
    Ok(FormStore::from_json(&contents)?)
}

pub fn write_document(path: &Path, store: &FormStore) -> CliResult<()> {
    let contents = serde_json::to_string_pretty(store)?;
    fs::write(path, contents + "\n")?;
    Ok(())
}

pub fn load_answers(path: &Path) -> CliResult<MemoryAnswerSheet> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Reads the engine config from `path`, else from `FORM_ENGINE_CONFIG`, else defaults.
pub fn load_config(path: Option<PathBuf>) -> CliResult<EngineConfig> {
    let candidate = path.or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));
    let Some(candidate) = candidate else {
        return Ok(EngineConfig::default());
    };
    if candidate.as_os_str().is_empty() {
        return Err("config path cannot be empty".into());
    }
    log::debug!("loading engine config from {}", candidate.display());
    let contents = fs::read_to_string(&candidate)
        .map_err(|err| format!("failed to read config {}: {}", candidate.display(), err))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Text outline of every question sheet, page and element in the document.
pub fn describe(store: &FormStore, config: &EngineConfig) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Form document: {} sheet(s), {} page(s), {} element(s); labels up to {} chars",
        store.question_sheets.len(),
        store.pages.len(),
        store.elements.len(),
        config.max_label_length
    ));
    for sheet in &store.question_sheets {
        let archived = if sheet.archived { " [archived]" } else { "" };
        lines.push(format!("Question sheet {}: {}{}", sheet.id, sheet.label, archived));
        for page in store.pages_of_sheet(sheet.id) {
            lines.push(format!(
                "  Page {} (#{}): {} [cached: {}]",
                page.id,
                page.number,
                page.label,
                join_ids(&page.all_element_ids)
            ));
            for element in store.page_elements(page.id) {
                describe_element(store, config, element, Some(page.id), 2, &mut lines);
            }
        }
    }
    lines.join("\n")
}

fn describe_element(
    store: &FormStore,
    config: &EngineConfig,
    id: ElementId,
    page: Option<PageId>,
    depth: usize,
    lines: &mut Vec<String>,
) {
    let Ok(element) = store.element(id) else {
        lines.push(format!("{}[{}] <missing>", "  ".repeat(depth), id));
        return;
    };
    let position = store
        .position_on(id, page)
        .ok()
        .flatten()
        .map(|position| position.to_string())
        .unwrap_or_else(|| "-".into());
    lines.push(format!(
        "{}{}. [{}] {}",
        "  ".repeat(depth),
        position,
        element.id,
        summarize(element, config)
    ));
    for child in store.children(id) {
        describe_element(store, config, child, None, depth + 1, lines);
    }
}

fn summarize(element: &Element, config: &EngineConfig) -> String {
    let mut entry = format!(
        "{} \"{}\" style={} template={}",
        element.kind,
        element.label.as_deref().unwrap_or(""),
        element.style.as_deref().unwrap_or("-"),
        element.template_key()
    );
    if element.required {
        entry.push_str(" [required]");
    }
    if element.reuseable(config) {
        entry.push_str(" [reusable]");
    }
    match element.conditional {
        ConditionalLink::None => {}
        ConditionalLink::NextElement { id } => entry.push_str(&format!(
            " shows {} when {}",
            id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
            element.conditional_answer.as_deref().unwrap_or("")
        )),
        ConditionalLink::Page { id } => entry.push_str(&format!(
            " shows page {} when {}",
            id,
            element.conditional_answer.as_deref().unwrap_or("")
        )),
    }
    entry
}

fn join_ids(ids: &[ElementId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
