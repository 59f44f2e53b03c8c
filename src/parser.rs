use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::ast::{ParamSpec, TokenLine};
use crate::error::MacroError;

#[derive(Parser)]
#[grammar = "src/line.pest"]
pub struct LineParser;

impl LineParser {
    /// Split a source line into fields on single spaces.
    ///
    /// Nothing is trimmed or merged: `"A  B"` gives `["A", "", "B"]`.
    pub fn tokenize(line: &str) -> Result<TokenLine<'_>, MacroError> {
        let pairs = LineParser::parse(Rule::line, line).map_err(Box::new)?;
        let fields = pairs
            .flatten()
            .filter(|p| p.as_rule() == Rule::field)
            .map(|p| p.as_str())
            .collect();
        Ok(TokenLine::new(fields))
    }

    /// Parse one prototype field into its comma-separated parameter specifications.
    ///
    /// Empty pieces (`"A,,B"`, or an empty field) come back as `Positional("")`; the caller
    /// decides what to do with them.
    pub fn parse_parameters(field: &str) -> Result<Vec<ParamSpec<'_>>, MacroError> {
        let pairs = LineParser::parse(Rule::parameter_list, field).map_err(Box::new)?;
        Ok(pairs
            .flatten()
            .filter(|p| p.as_rule() == Rule::parameter)
            .map(Self::parse_parameter)
            .collect())
    }

    fn parse_parameter(pair: Pair<'_, Rule>) -> ParamSpec<'_> {
        let mut name = "";
        let mut default = None;
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::param_name => name = inner.as_str(),
                Rule::keyword => {
                    default = Some(
                        inner
                            .into_inner()
                            .find(|p| p.as_rule() == Rule::param_default)
                            .map(|p| p.as_str())
                            .unwrap_or(""),
                    )
                }
                _ => {}
            }
        }

        match default {
            Some(default) => ParamSpec::Keyword { name, default },
            None => ParamSpec::Positional(name),
        }
    }
}
