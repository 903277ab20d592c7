//! CSV block parsing into sparse row blocks.
//!
//! Converts contiguous byte ranges of delimiter-separated text into a sparse,
//! row-oriented numeric structure for dataset ingestion: per-row feature
//! `(index, value)` pairs, one or more label values per row, and an optional
//! per-row instance weight.
//!
//! The parser is invoked per block: an external splitter hands it byte ranges
//! that respect line boundaries, and each [`CsvBlockParser::parse_block`] call
//! fills a caller-owned [`RowBlock`]. Parsing is pure and allocation-light, so
//! disjoint ranges can be parsed concurrently with zero coordination;
//! [`CsvBlockParser::parse_buffer`] does exactly that for whole in-memory
//! buffers.

pub mod block;
pub mod columns;
pub mod config;
pub mod error;
pub mod field;
pub mod parser;
mod scan;

pub use block::RowBlock;
pub use columns::{ColumnRole, ColumnRoleMap, ColumnWarning};
pub use config::CsvConfig;
pub use error::ParseError;
pub use field::FieldValue;
pub use parser::CsvBlockParser;
