//! Pipeline compilation for trigger builds.
//!
//! For every trigger this crate computes the working directories, the
//! template context and the five-step graph
//! `materializeFixed, materializeTemplates -> render -> archive -> publish`.
//! It also carries the bundled build-wrapper and template resources and the
//! code that materializes them.

pub mod compiler;
pub mod context;
pub mod dispatch;
pub mod layout;
pub mod materialize;
pub mod resources;

pub use compiler::{PipelineCompiler, ProjectProperties};
pub use dispatch::{Collaborators, run_step};
pub use layout::TriggerLayout;
pub use resources::{BundledResources, ResourceSource};
