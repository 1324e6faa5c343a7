//! Core domain types and traits for trigger builds.
//!
//! This crate contains:
//! - The three-level entity model (global settings, repositories, triggers)
//! - The layered settings record and its fallback rule
//! - Step graph definitions handed to a build-graph executor
//! - Collaborator traits for rendering, archiving and publishing

pub mod collaborator;
pub mod context;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod settings;
pub mod value;

pub use context::TemplateContext;
pub use error::{EntityKind, Error, ErrorKind, Result};
pub use model::{GlobalSettings, RepositoryEntry, TriggerEntry, TriggerName, TriggerView};
pub use pipeline::{Step, StepAction, StepKind, TriggerPipeline};
pub use settings::{SettingKey, Settings};
pub use value::Value;
