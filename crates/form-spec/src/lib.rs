#![allow(missing_docs)]

pub mod answer_sheet;
pub mod conditional;
pub mod config;
pub mod duplicate;
pub mod element;
pub mod error;
pub mod ids;
pub mod lifecycle;
pub mod position;
pub mod response;
pub mod store;

pub use answer_sheet::{AnswerSheet, MemoryAnswerSheet};
pub use config::{ColumnSpec, EngineConfig, SchemaRegistry, TypeSchema};
pub use element::{
    ConditionalLink, DefaultsProvider, Element, ElementKind, ParentRef, TemplateResolver,
};
pub use error::{FormError, LimitLookupError, ValidationError};
pub use ids::{ElementId, PageId, QuestionSheetId};
pub use lifecycle::{RebuildTarget, SaveOutcome};
pub use response::{ElementReport, ResponseEvaluator};
pub use store::{FormStore, Page, PageElement, QuestionSheet};
