/// Fields of one source line, split on single spaces.
///
/// Fields borrow from the line they were split from. There is always at least one field;
/// an empty line gives a single empty field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLine<'a> {
    fields: Vec<&'a str>,
}

impl<'a> TokenLine<'a> {
    pub fn new(fields: Vec<&'a str>) -> Self {
        if fields.is_empty() {
            return Self { fields: vec![""] };
        }
        Self { fields }
    }

    /// Field 0: the mnemonic of a body line, or the macro name of a prototype.
    pub fn first(&self) -> &'a str {
        self.fields[0]
    }

    /// Field `n`, or `None` when the line is too short.
    pub fn get(&self, n: usize) -> Option<&'a str> {
        self.fields.get(n).copied()
    }

    /// Everything after field 0.
    pub fn rest(&self) -> &[&'a str] {
        &self.fields[1..]
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[&'a str] {
        &self.fields
    }
}

/// One formal parameter as written on a prototype line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSpec<'a> {
    /// `&DEST`
    Positional(&'a str),
    /// `&REG=1`; the default is everything after the first `=` and may be empty
    Keyword { name: &'a str, default: &'a str },
}

impl<'a> ParamSpec<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            ParamSpec::Positional(name) => name,
            ParamSpec::Keyword { name, .. } => name,
        }
    }
}
