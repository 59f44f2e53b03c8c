use std::fmt;

use log::{debug, info, trace, warn};

use crate::ast::{ParamSpec, TokenLine};
use crate::error::MacroError;
use crate::parser::LineParser;
use crate::tables::{BodyEntry, MEND, MacroNameEntry, MacroTables};

const MACRO: &str = "MACRO";

/// Options for a pass-one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassConfig {
    /// Leading character of a formal-parameter reference
    pub sigil: char,
    /// Ignore the first physical line
    pub skip_header: bool,
    /// Turn stray lines, nested `MACRO` and missing `MEND` into errors
    pub strict: bool,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            sigil: '&',
            skip_header: true,
            strict: false,
        }
    }
}

impl PassConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sigil(mut self, sigil: char) -> Self {
        self.sigil = sigil;
        self
    }

    pub fn skip_header(mut self, skip: bool) -> Self {
        self.skip_header = skip;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A line outside any macro definition; it was skipped
    StrayLine { first: String },
    /// `MACRO` inside an open definition; it was skipped
    NestedMacro { name: String },
    /// Input ended inside a definition. `None` when only the `MACRO` header was seen
    UnterminatedMacro { name: Option<String> },
    UnresolvedParameter { name: String, operand: String },
    DuplicateParameter { name: String, parameter: String },
    DuplicateMacro { name: String },
    EmptyParameterName { name: String },
}

/// Something odd found while building the tables. Never stops the scan unless strict mode
/// says so.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based physical line number; for end-of-input findings, the line count
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Hard error under strict mode
    fn as_strict_error(&self) -> Option<MacroError> {
        match &self.kind {
            DiagnosticKind::StrayLine { first } => Some(MacroError::StrayLine {
                line: self.line,
                first: first.clone(),
            }),
            DiagnosticKind::NestedMacro { name } => Some(MacroError::NestedMacro {
                line: self.line,
                name: name.clone(),
            }),
            DiagnosticKind::UnterminatedMacro { name } => {
                Some(MacroError::UnterminatedMacro { name: name.clone() })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            DiagnosticKind::StrayLine { first } => {
                write!(f, "`{first}` outside of a macro definition, skipped")
            }
            DiagnosticKind::NestedMacro { name } => {
                write!(f, "nested MACRO inside `{name}`, skipped")
            }
            DiagnosticKind::UnterminatedMacro { name: Some(name) } => {
                write!(f, "macro `{name}` has no {MEND}")
            }
            DiagnosticKind::UnterminatedMacro { name: None } => {
                write!(f, "{MACRO} without a prototype line")
            }
            DiagnosticKind::UnresolvedParameter { name, operand } => {
                write!(f, "`{operand}` is not a parameter of `{name}`")
            }
            DiagnosticKind::DuplicateParameter { name, parameter } => {
                write!(f, "`{name}` declares `{parameter}` more than once")
            }
            DiagnosticKind::DuplicateMacro { name } => {
                write!(f, "macro `{name}` is defined again")
            }
            DiagnosticKind::EmptyParameterName { name } => {
                write!(f, "`{name}` declares a parameter with an empty name")
            }
        }
    }
}

/// The macro whose body is being read
#[derive(Debug)]
struct OpenMacro {
    name: String,
    parameters: Vec<String>,
}

impl OpenMacro {
    fn position(&self, operand: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p == operand)
    }
}

#[derive(Debug)]
enum State {
    Outside,
    ExpectPrototype,
    InBody(OpenMacro),
}

/// What a finished pass hands over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutput {
    pub tables: MacroTables,
    pub diagnostics: Vec<Diagnostic>,
}

/// Pass one: a single forward scan that builds the macro tables.
#[derive(Debug)]
pub struct Pass1 {
    config: PassConfig,
    state: State,
    tables: MacroTables,
    diagnostics: Vec<Diagnostic>,
    line: usize,
}

impl Default for Pass1 {
    fn default() -> Self {
        Self::new(PassConfig::default())
    }
}

impl Pass1 {
    pub fn new(config: PassConfig) -> Self {
        Self {
            config,
            state: State::Outside,
            tables: MacroTables::new(),
            diagnostics: Vec::new(),
            line: 0,
        }
    }

    /// Scan all `lines` and return the tables (main entry point)
    pub fn perform<S: AsRef<str>>(mut self, lines: &[S]) -> Result<PassOutput, MacroError> {
        let skip = usize::from(self.config.skip_header && !lines.is_empty());
        self.line = skip;
        for line in &lines[skip..] {
            self.line += 1;
            self.feed(line.as_ref())?;
        }
        self.finish()
    }

    fn feed(&mut self, line: &str) -> Result<(), MacroError> {
        let tokens = LineParser::tokenize(line)?;
        trace!("line {}: {:?}", self.line, tokens.fields());

        let state = std::mem::replace(&mut self.state, State::Outside);
        self.state = self.step(state, &tokens)?;
        Ok(())
    }

    fn step(&mut self, state: State, tokens: &TokenLine) -> Result<State, MacroError> {
        match state {
            State::ExpectPrototype => Ok(State::InBody(self.prototype(tokens)?)),
            State::Outside if tokens.first() == MACRO => Ok(State::ExpectPrototype),
            State::Outside => {
                self.report(DiagnosticKind::StrayLine {
                    first: tokens.first().to_string(),
                })?;
                Ok(State::Outside)
            }
            State::InBody(_) if tokens.first() == MEND => {
                self.tables.push_body(BodyEntry::terminator());
                self.tables.close_body();
                Ok(State::Outside)
            }
            State::InBody(open) if tokens.first() == MACRO => {
                self.report(DiagnosticKind::NestedMacro {
                    name: open.name.clone(),
                })?;
                Ok(State::InBody(open))
            }
            State::InBody(open) => {
                self.body_line(&open, tokens)?;
                Ok(State::InBody(open))
            }
        }
    }

    fn prototype(&mut self, tokens: &TokenLine) -> Result<OpenMacro, MacroError> {
        let name = tokens.first().to_string();
        let body_start = self.tables.body().len();
        let kpd_start = self.tables.keyword_defaults().len();
        let mut parameters: Vec<String> = Vec::new();
        let mut num_kpd = 0;
        let mut num_pp = 0;

        for field in tokens.rest() {
            for spec in LineParser::parse_parameters(field)? {
                let param = spec.name();
                if param.is_empty() {
                    self.report(DiagnosticKind::EmptyParameterName { name: name.clone() })?;
                } else if parameters.iter().any(|p| p == param) {
                    self.report(DiagnosticKind::DuplicateParameter {
                        name: name.clone(),
                        parameter: param.to_string(),
                    })?;
                }

                match spec {
                    ParamSpec::Keyword { default, .. } => {
                        self.tables.push_keyword_default(param, default);
                        num_kpd += 1;
                    }
                    ParamSpec::Positional(_) => num_pp += 1,
                }
                debug!("parameter added: {param}");
                parameters.push(param.to_string());
            }
        }

        self.tables.push_name(MacroNameEntry {
            name: name.clone(),
            num_kpd,
            num_pp,
            body_start,
            body_len: 0,
            kpd_start,
        });
        if self
            .tables
            .register_parameters(&name, parameters.clone())
            .is_some()
        {
            self.report(DiagnosticKind::DuplicateMacro { name: name.clone() })?;
        }
        info!("added to map: {name} ({num_kpd} keyword, {num_pp} positional)");

        Ok(OpenMacro { name, parameters })
    }

    fn body_line(&mut self, open: &OpenMacro, tokens: &TokenLine) -> Result<(), MacroError> {
        let (operand1, operand1_index) = self.operand(open, tokens.get(1))?;
        let (operand2, operand2_index) = self.operand(open, tokens.get(2))?;
        self.tables.push_body(BodyEntry {
            mnemonic: tokens.first().to_string(),
            operand1,
            operand2,
            operand1_index,
            operand2_index,
        });
        Ok(())
    }

    /// Keep `field` only when it is a parameter reference, and resolve it against the open
    /// macro's parameter list
    fn operand(
        &mut self,
        open: &OpenMacro,
        field: Option<&str>,
    ) -> Result<(Option<String>, Option<usize>), MacroError> {
        let Some(field) = field.filter(|f| f.starts_with(self.config.sigil)) else {
            return Ok((None, None));
        };

        let index = open.position(field);
        if index.is_none() {
            self.report(DiagnosticKind::UnresolvedParameter {
                name: open.name.clone(),
                operand: field.to_string(),
            })?;
        }
        Ok((Some(field.to_string()), index))
    }

    fn finish(mut self) -> Result<PassOutput, MacroError> {
        match std::mem::replace(&mut self.state, State::Outside) {
            State::Outside => {}
            State::ExpectPrototype => {
                self.report(DiagnosticKind::UnterminatedMacro { name: None })?
            }
            State::InBody(open) => {
                self.tables.close_body();
                self.report(DiagnosticKind::UnterminatedMacro {
                    name: Some(open.name),
                })?
            }
        }

        Ok(PassOutput {
            tables: self.tables,
            diagnostics: self.diagnostics,
        })
    }

    fn report(&mut self, kind: DiagnosticKind) -> Result<(), MacroError> {
        let diagnostic = Diagnostic {
            line: self.line,
            kind,
        };
        if self.config.strict {
            if let Some(err) = diagnostic.as_strict_error() {
                return Err(err);
            }
        }
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
        Ok(())
    }
}

/// Run pass one over `lines` with the default configuration
pub fn perform<S: AsRef<str>>(lines: &[S]) -> Result<PassOutput, MacroError> {
    Pass1::default().perform(lines)
}
