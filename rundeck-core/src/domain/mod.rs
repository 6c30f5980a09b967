//! Core domain types
//!
//! Normalized records built from server responses. Every record is a plain
//! value produced fresh per call; nothing here is cached or mutated after
//! construction.

use std::collections::BTreeMap;

pub mod event;
pub mod execution;
pub mod job;
pub mod node;
pub mod project;
pub mod results;
pub mod system;

/// Flattened element fields: tag or attribute name to text (`None` when empty)
pub type Fields = BTreeMap<String, Option<String>>;

/// Flattened element attributes
pub type Attributes = BTreeMap<String, String>;
