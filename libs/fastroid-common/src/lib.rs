//! Fastroid Common - Shared helpers for the fastroid mapper and form utilities
//!
//! This crate provides identifier conversion, message templating and a few
//! small string/date helpers used by `fastroid-core`.
//!
//! # Examples
//!
//! ```
//! use fastroid_common::{format_message, to_db_name, REQUIRED_TEMPLATE};
//!
//! assert_eq!(to_db_name("departmentId"), "DEPARTMENT_ID");
//! assert_eq!(format_message(REQUIRED_TEMPLATE, &["Name"]), "Name is required.");
//! ```

pub mod constants;
pub mod utils;

pub use constants::*;
pub use utils::*;
