//! Streaming parser for `.ini`, `.conf` and `.cfg` files.
//!
//! ```text
//! # a comment
//! debug = false
//!
//! [example]
//! hostname = "example.com"
//! text = 'single "quoted" string'
//! ```
//!
//! * comments start with `#` or `;` and span the whole line
//! * sections start with `[` and end with `]`
//! * values may be quoted with `"`, `` ` `` or `'`
//! * spaces around keys and values are removed
//!
//! Keys cannot contain spaces, values cannot span lines and a comment
//! character after a value ends the value.

mod error;
mod extract;
mod parser;
mod quoted;
mod scanner;

pub use self::error::{Cause, SyntaxError, SyntaxErrors};
pub use self::parser::{Error, ErrorPolicy, Parser, ParserBuilder};
pub use self::quoted::{unquote, UnquoteError};

use std::io::BufRead;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;
pub type HandlerResult = Result<(), HandlerError>;

/// One non-blank line of input.
///
/// `section` is always the currently open section, the other parts are
/// empty when the line does not have them.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Field<'a> {
    pub line: usize,
    pub section: &'a str,
    pub key: &'a str,
    pub value: &'a str,
    pub comment: &'a str,
}

impl<'a> Field<'a> {
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && self.value.is_empty() && self.comment.is_empty()
    }
}

/// Receives every field the [`Parser`] finds.
///
/// `error` is only ever set with [`ErrorPolicy::CollectAll`]. Returning an
/// error stops the parser unless it was built with
/// [`abort_on_handler_error(false)`](ParserBuilder::abort_on_handler_error).
pub trait Mapping {
    fn map(&mut self, field: &Field<'_>, error: Option<&SyntaxError>) -> HandlerResult;
}

impl<F> Mapping for F
where
    F: FnMut(&Field<'_>, Option<&SyntaxError>) -> HandlerResult,
{
    fn map(&mut self, field: &Field<'_>, error: Option<&SyntaxError>) -> HandlerResult {
        self(field, error)
    }
}

/// Parses all of `reader`, stopping at the first malformed line.
pub fn map<R, F>(reader: R, mut mapping: F) -> Result<(), Error>
where
    R: BufRead,
    F: FnMut(&Field<'_>, Option<&SyntaxError>) -> HandlerResult,
{
    Parser::new(reader).map(&mut mapping)
}

/// Parses all of `input`, stopping at the first malformed line.
pub fn map_str<F>(input: &str, mapping: F) -> Result<(), Error>
where
    F: FnMut(&Field<'_>, Option<&SyntaxError>) -> HandlerResult,
{
    map(input.as_bytes(), mapping)
}
