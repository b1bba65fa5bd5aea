use std::fmt::{self, Display};
use std::ops::Deref;

use super::quoted::UnquoteError;

/// What is wrong with a line.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Cause {
    #[error("missing right bracket")]
    MissingRightBracket,
    #[error("missing equal sign")]
    MissingEqualSign,
    #[error("space not allowed in key")]
    SpaceInKey,
    #[error("section header cannot be empty")]
    EmptySection,
    #[error("missing key and value")]
    EmptyField,
    #[error(transparent)]
    Quote(#[from] UnquoteError),
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// A malformed line.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("syntax error on line {line}: {cause}: {text}")]
pub struct SyntaxError {
    pub(crate) line: usize,
    pub(crate) text: String,
    #[source]
    pub(crate) cause: Cause,
}

impl SyntaxError {
    pub(crate) fn new(line: usize, text: &str, cause: Cause) -> Self {
        Self {
            line,
            text: text.to_owned(),
            cause,
        }
    }

    /// 1-based number of the offending line.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The offending line, without surrounding whitespace.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cause(&self) -> &Cause {
        &self.cause
    }
}

/// Every syntax error of one input, in line order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SyntaxErrors(pub(crate) Vec<SyntaxError>);

impl SyntaxErrors {
    pub(crate) fn push(&mut self, error: SyntaxError) {
        self.0.push(error)
    }
}

impl Deref for SyntaxErrors {
    type Target = [SyntaxError];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for SyntaxErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxErrors {}

impl IntoIterator for SyntaxErrors {
    type Item = SyntaxError;
    type IntoIter = std::vec::IntoIter<SyntaxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
