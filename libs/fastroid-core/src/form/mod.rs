//! Form input, validation and copying into entities

mod copy;
mod input;
pub mod validators;

pub use copy::{copy_entity, create_entity, Submission};
pub use input::{read_form, FormSource, MapFormSource};
pub use validators::validate;
