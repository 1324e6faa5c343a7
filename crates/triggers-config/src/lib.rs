//! KDL trigger declarations for trigger builds.
//!
//! This crate handles:
//! - Parsing `triggers { ... }` blocks into a plain declaration tree
//! - Resolving that tree into the entity model
//! - Compiling every trigger as soon as it is declared

pub mod declaration;
pub mod error;
pub mod resolver;

pub use declaration::{Declaration, DeclarationNode, parse_declaration};
pub use error::{ConfigError, ConfigResult};
pub use resolver::{ConfigurationResolver, Resolution, resolve_file, resolve_triggers};
