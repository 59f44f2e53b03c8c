//! Pass one of a two-pass assembler macro processor.
//!
//! A single forward scan over macro source builds four tables for pass two: the macro name
//! table, the keyword-default table, the parameter name tables and the macro definition
//! (body) table.

pub mod ast;
pub mod emit;
pub mod error;
pub mod parser;
pub mod processor;
pub mod source;
pub mod tables;

pub use error::MacroError;
pub use processor::{Diagnostic, DiagnosticKind, Pass1, PassConfig, PassOutput, perform};
pub use tables::{BodyEntry, KeywordDefault, MacroNameEntry, MacroTables, ParameterTable};
