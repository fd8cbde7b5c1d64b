//! Schema-driven mapper over SQLite

mod helper;
mod manager;
pub mod mappers;
pub mod plan;
pub mod query_builders;

pub use helper::{DatabaseHelper, SqliteHelper};
pub use manager::{DatabaseManager, SelectBuilder, WriteBuilder, WriteKind, NOTHING_STAGED};
pub use mappers::map_row;
pub use plan::ColumnPlan;
pub use query_builders::JoinKind;
