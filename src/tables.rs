use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Keyword parameter default, one per `name=default` on a prototype line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordDefault {
    pub name: String,
    pub default: String,
}

/// Macro name table entry.
///
/// `body_start` and `kpd_start` are the lengths of the body table and the keyword-default
/// table at the moment the prototype line was read, so the macro's keyword defaults are
/// `kpd_start..kpd_start + num_kpd`. `body_len` counts the body lines, `MEND` included, and is
/// filled in when the body is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroNameEntry {
    pub name: String,
    pub num_kpd: usize,
    pub num_pp: usize,
    pub body_start: usize,
    pub body_len: usize,
    pub kpd_start: usize,
}

impl MacroNameEntry {
    pub fn kpd_range(&self) -> Range<usize> {
        self.kpd_start..self.kpd_start + self.num_kpd
    }

    pub fn body_range(&self) -> Range<usize> {
        self.body_start..self.body_start + self.body_len
    }
}

/// Macro definition table entry, one per body line.
///
/// Only formal-parameter references are kept as operands. An operand with no index is a
/// reference to a name the macro never declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyEntry {
    pub mnemonic: String,
    pub operand1: Option<String>,
    pub operand2: Option<String>,
    pub operand1_index: Option<usize>,
    pub operand2_index: Option<usize>,
}

pub const MEND: &str = "MEND";

impl BodyEntry {
    /// The entry closing every macro body
    pub fn terminator() -> Self {
        Self {
            mnemonic: MEND.to_string(),
            ..Default::default()
        }
    }

    pub fn is_terminator(&self) -> bool {
        self.mnemonic == MEND && self.operand1.is_none() && self.operand2.is_none()
    }
}

/// Macro name -> formal parameter names, defaults stripped, in declaration order
pub type ParameterTable = BTreeMap<String, Vec<String>>;

/// The four tables built by pass one.
///
/// The keyword-default and body tables are shared by every macro; a [`MacroNameEntry`]
/// refers into them by offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroTables {
    names: Vec<MacroNameEntry>,
    keyword_defaults: Vec<KeywordDefault>,
    parameters: ParameterTable,
    body: Vec<BodyEntry>,
}

impl MacroTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reassemble tables that were saved earlier. No consistency checks are made.
    pub fn from_parts(
        names: Vec<MacroNameEntry>,
        keyword_defaults: Vec<KeywordDefault>,
        parameters: ParameterTable,
        body: Vec<BodyEntry>,
    ) -> Self {
        Self {
            names,
            keyword_defaults,
            parameters,
            body,
        }
    }

    pub fn names(&self) -> &[MacroNameEntry] {
        &self.names
    }

    pub fn keyword_defaults(&self) -> &[KeywordDefault] {
        &self.keyword_defaults
    }

    pub fn parameters(&self) -> &ParameterTable {
        &self.parameters
    }

    pub fn body(&self) -> &[BodyEntry] {
        &self.body
    }

    /// Latest definition of `name`
    pub fn find(&self, name: &str) -> Option<&MacroNameEntry> {
        self.names.iter().rev().find(|e| e.name == name)
    }

    pub fn parameters_of(&self, name: &str) -> Option<&[String]> {
        self.parameters.get(name).map(Vec::as_slice)
    }

    pub fn keyword_defaults_of(&self, entry: &MacroNameEntry) -> &[KeywordDefault] {
        self.keyword_defaults
            .get(entry.kpd_range())
            .unwrap_or_default()
    }

    /// Body lines of `entry`, `MEND` included
    pub fn body_of(&self, entry: &MacroNameEntry) -> &[BodyEntry] {
        self.body.get(entry.body_range()).unwrap_or_default()
    }

    pub(crate) fn push_name(&mut self, entry: MacroNameEntry) {
        self.names.push(entry);
    }

    /// Record the body length of the latest macro; its body ends at the end of the table.
    pub(crate) fn close_body(&mut self) {
        let end = self.body.len();
        if let Some(entry) = self.names.last_mut() {
            entry.body_len = end - entry.body_start;
        }
    }

    pub(crate) fn push_keyword_default(&mut self, name: &str, default: &str) {
        self.keyword_defaults.push(KeywordDefault {
            name: name.to_string(),
            default: default.to_string(),
        });
    }

    /// Returns the list previously registered under `name`, if any.
    pub(crate) fn register_parameters(
        &mut self,
        name: &str,
        parameters: Vec<String>,
    ) -> Option<Vec<String>> {
        self.parameters.insert(name.to_string(), parameters)
    }

    pub(crate) fn push_body(&mut self, entry: BodyEntry) {
        self.body.push(entry);
    }
}

impl fmt::Display for MacroTables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PNTAB")?;
        for (name, params) in &self.parameters {
            writeln!(f, "Macro Name: {name}")?;
            for param in params {
                writeln!(f, "  {param}")?;
            }
        }

        writeln!(f, "MNTAB")?;
        for e in &self.names {
            writeln!(
                f,
                "{} {} {} {} {}",
                e.name, e.num_kpd, e.num_pp, e.body_start, e.kpd_start
            )?;
        }

        writeln!(f, "KPDTAB")?;
        for kpd in &self.keyword_defaults {
            writeln!(f, "{} {}", kpd.name, kpd.default)?;
        }

        writeln!(f, "MDTAB")?;
        for (i, entry) in self.body.iter().enumerate() {
            write!(f, "{i} {}", entry.mnemonic)?;
            for (operand, index) in [
                (&entry.operand1, entry.operand1_index),
                (&entry.operand2, entry.operand2_index),
            ] {
                match (operand, index) {
                    (Some(op), Some(idx)) => write!(f, " {op}(P,{idx})")?,
                    (Some(op), None) => write!(f, " {op}(?)")?,
                    _ => {}
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_macros() -> MacroTables {
        let mut tables = MacroTables::new();
        tables.push_name(MacroNameEntry {
            name: "A".to_string(),
            num_kpd: 1,
            num_pp: 0,
            body_start: 0,
            body_len: 0,
            kpd_start: 0,
        });
        tables.push_keyword_default("&X", "5");
        tables.register_parameters("A", vec!["&X".to_string()]);
        tables.push_body(BodyEntry {
            mnemonic: "LOAD".to_string(),
            operand1: Some("&X".to_string()),
            operand1_index: Some(0),
            ..Default::default()
        });
        tables.push_body(BodyEntry::terminator());
        tables.close_body();

        tables.push_name(MacroNameEntry {
            name: "B".to_string(),
            num_kpd: 0,
            num_pp: 0,
            body_start: 2,
            body_len: 0,
            kpd_start: 1,
        });
        tables.register_parameters("B", vec![]);
        tables.push_body(BodyEntry::terminator());
        tables.close_body();
        tables
    }

    #[test]
    fn test_body_of_uses_recorded_length() {
        let tables = two_macros();
        let a = tables.find("A").unwrap();
        let b = tables.find("B").unwrap();
        assert_eq!(tables.body_of(a).len(), 2);
        assert!(tables.body_of(a)[1].is_terminator());
        assert_eq!(tables.body_of(b), &[BodyEntry::terminator()]);
        assert_eq!((a.body_range(), b.body_range()), (0..2, 2..3));
    }

    #[test]
    fn test_keyword_defaults_of() {
        let tables = two_macros();
        let a = tables.find("A").unwrap();
        let b = tables.find("B").unwrap();
        assert_eq!(
            tables.keyword_defaults_of(a),
            &[KeywordDefault {
                name: "&X".to_string(),
                default: "5".to_string()
            }]
        );
        assert!(tables.keyword_defaults_of(b).is_empty());
    }

    #[test]
    fn test_out_of_range_entry_is_empty() {
        let tables = two_macros();
        let bogus = MacroNameEntry {
            name: "Z".to_string(),
            num_kpd: 3,
            num_pp: 0,
            body_start: 10,
            body_len: 5,
            kpd_start: 10,
        };
        assert!(tables.body_of(&bogus).is_empty());
        assert!(tables.keyword_defaults_of(&bogus).is_empty());
        assert!(tables.find("Z").is_none());
    }

    #[test]
    fn test_listing() {
        let listing = two_macros().to_string();
        assert!(listing.contains("Macro Name: A\n  &X\n"));
        assert!(listing.contains("A 1 0 0 0\n"));
        assert!(listing.contains("B 0 0 2 1\n"));
        assert!(listing.contains("&X 5\n"));
        assert!(listing.contains("0 LOAD &X(P,0)\n"));
        assert!(listing.contains("1 MEND\n"));
    }
}
