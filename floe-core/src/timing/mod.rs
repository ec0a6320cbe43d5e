//! Freeze-duration timing
//!
//! The base freeze time comes from a room-water × ambient-air table. The
//! table can be replaced at runtime by the diagnostic interface; rows are
//! collected by a [`TableAssembler`] and only a complete table is handed
//! to the engine.

pub mod assembler;
pub mod table;

pub use assembler::TableAssembler;
pub use table::{IceSize, TableError, TimingTable, MAX_INDEX, TABLE_DIM};
