use thiserror::Error;

use crate::parser::Rule;

/// Errors that stop pass one.
///
/// Table-level problems (unresolved references, duplicate names) never show up here; they are
/// recorded as [`crate::processor::Diagnostic`]s and the scan goes on. Structural problems
/// only become errors when the pass runs in strict mode.
#[derive(Debug, Error)]
pub enum MacroError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not split line: {0}")]
    Grammar(#[from] Box<pest::error::Error<Rule>>),

    #[error("line {line}: `{first}` appears outside of a macro definition")]
    StrayLine { line: usize, first: String },

    #[error("line {line}: nested MACRO inside `{name}` is not supported")]
    NestedMacro { line: usize, name: String },

    #[error("{}", unterminated_message(.name))]
    UnterminatedMacro { name: Option<String> },

    #[error("table serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

fn unterminated_message(name: &Option<String>) -> String {
    match name {
        Some(name) => format!("macro `{name}` is missing its MEND"),
        None => "MACRO header at end of input has no prototype line".to_string(),
    }
}
