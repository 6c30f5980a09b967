//! Rundeck Core
//!
//! Value types shared by the Rundeck client and CLI.
//!
//! This crate contains:
//! - Domain types: normalized records produced from server responses (Job, Execution, etc.)
//! - DTOs: request options and their query-parameter encoding
//! - Timestamp helpers for the server's wire format

pub mod domain;
pub mod dto;
pub mod timestamp;
