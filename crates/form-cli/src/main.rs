mod document;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use document::{CliResult, describe, load_answers, load_config, load_document, write_document};
use form_spec::{
    ConditionalLink, Element, ElementId, ElementKind, EngineConfig, FormError, FormStore, PageId,
    ResponseEvaluator,
};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Form element engine CLI",
    long_about = "Edits question sheet documents (elements, grids, conditional links) and evaluates answer sheets against them"
)]
struct Cli {
    /// Engine configuration JSON (defaults to FORM_ENGINE_CONFIG when unset).
    #[arg(long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,
    /// Log engine activity at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the pages and elements of a form document.
    Inspect {
        #[arg(long, value_name = "DOC")]
        doc: PathBuf,
    },
    /// Create an element on a page or inside a container.
    Add {
        #[arg(long, value_name = "DOC")]
        doc: PathBuf,
        /// Element kind, e.g. TextField or text_field.
        #[arg(long)]
        kind: String,
        /// Page to place the element on.
        #[arg(long, conflicts_with = "parent", required_unless_present = "parent")]
        page: Option<u64>,
        /// Grid or choice field that owns the element.
        #[arg(long)]
        parent: Option<u64>,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        style: Option<String>,
        #[arg(long)]
        required: bool,
        /// Show the following element only when one of these comma separated answers is given.
        #[arg(long, value_name = "ANSWERS")]
        conditional_answer: Option<String>,
        /// Position on the page or in the container (defaults to last).
        #[arg(long)]
        position: Option<i64>,
    },
    /// Copy an element and its nested elements onto a page.
    Duplicate {
        #[arg(long, value_name = "DOC")]
        doc: PathBuf,
        #[arg(long)]
        element: u64,
        #[arg(long)]
        page: u64,
        /// Container to copy into instead of linking onto the page.
        #[arg(long)]
        parent: Option<u64>,
    },
    /// Rebuild the cached element ids of every page.
    Rebuild {
        #[arg(long, value_name = "DOC")]
        doc: PathBuf,
    },
    /// Report requiredness, visibility and limits for an answer sheet.
    Evaluate {
        #[arg(long, value_name = "DOC")]
        doc: PathBuf,
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
    },
    /// Print the JSON Schema of form documents.
    Schema,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config)?;
    match cli.command {
        Command::Inspect { doc } => {
            let store = load_document(&doc)?;
            println!("{}", describe(&store, &config));
            Ok(())
        }
        Command::Add {
            doc,
            kind,
            page,
            parent,
            label,
            style,
            required,
            conditional_answer,
            position,
        } => {
            let input = AddInput {
                kind,
                page,
                parent,
                label,
                style,
                required,
                conditional_answer,
                position,
            };
            run_add(&doc, input, &config)
        }
        Command::Duplicate {
            doc,
            element,
            page,
            parent,
        } => run_duplicate(&doc, element, page, parent),
        Command::Rebuild { doc } => run_rebuild(&doc),
        Command::Evaluate { doc, answers } => run_evaluate(&doc, &answers, &config),
        Command::Schema => {
            let schema = schemars::schema_for!(FormStore);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

struct AddInput {
    kind: String,
    page: Option<u64>,
    parent: Option<u64>,
    label: Option<String>,
    style: Option<String>,
    required: bool,
    conditional_answer: Option<String>,
    position: Option<i64>,
}

fn run_add(doc: &Path, input: AddInput, config: &EngineConfig) -> CliResult<()> {
    let mut store = load_document(doc)?;
    let kind: ElementKind = input.kind.parse()?;

    let mut draft = Element::draft(kind).with_required(input.required);
    draft.label = input.label;
    draft.style = input.style;
    if let Some(answer) = &input.conditional_answer {
        draft = draft.with_conditional(ConditionalLink::NextElement { id: None }, answer);
    }

    let id = match (input.parent, input.page) {
        (Some(parent), _) => {
            let parent = ElementId(parent);
            let container = store.element(parent)?;
            draft.parent = Some(
                container
                    .kind
                    .child_ref(parent)
                    .ok_or(FormError::NotAContainer(parent))?,
            );
            draft.position = Some(
                input
                    .position
                    .unwrap_or_else(|| store.next_child_position(parent)),
            );
            store.create(draft, config)?
        }
        (None, Some(page)) => {
            let page = PageId(page);
            store.page(page)?;
            let id = store.create(draft, config)?;
            store.place_on_page(id, page, input.position)?;
            id
        }
        (None, None) => return Err("either --page or --parent is required".into()),
    };

    write_document(doc, &store)?;
    let element = store.element(id)?;
    println!(
        "Created element {} ({}, style {})",
        id,
        element.kind,
        element.style.as_deref().unwrap_or("-")
    );
    Ok(())
}

fn run_duplicate(doc: &Path, element: u64, page: u64, parent: Option<u64>) -> CliResult<()> {
    let mut store = load_document(doc)?;
    let copy = store.duplicate(ElementId(element), PageId(page), parent.map(ElementId))?;
    let nested = store.all_elements(copy).len();
    write_document(doc, &store)?;
    println!(
        "Duplicated element {} as {} ({} nested element(s))",
        element, copy, nested
    );
    Ok(())
}

fn run_rebuild(doc: &Path) -> CliResult<()> {
    let mut store = load_document(doc)?;
    let pages: Vec<_> = store.pages.iter().map(|page| page.id).collect();
    for page in &pages {
        let cached = store.rebuild_all_element_ids(*page)?;
        println!("Page {}: {} element(s)", page, cached.len());
    }
    write_document(doc, &store)?;
    Ok(())
}

fn run_evaluate(doc: &Path, answers: &Path, config: &EngineConfig) -> CliResult<()> {
    let store = load_document(doc)?;
    let answers = load_answers(answers)?;
    let evaluator = ResponseEvaluator::new(&store, config);
    let report = evaluator.report(&answers)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
