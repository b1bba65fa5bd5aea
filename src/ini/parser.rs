use std::io::{self, BufRead};

use log::{debug, trace, warn};

use super::error::{Cause, SyntaxError, SyntaxErrors};
use super::extract::extract;
use super::scanner::scan;
use super::{Field, HandlerError, Mapping};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("{0}")]
    Syntaxes(SyntaxErrors),
    #[error("line {line}: {source}")]
    Handler {
        line: usize,
        #[source]
        source: HandlerError,
    },
}

impl Error {
    /// The input itself is malformed (as opposed to failing to read it or
    /// the handler giving up).
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax(_) | Error::Syntaxes(_))
    }

    pub fn syntax_errors(&self) -> &[SyntaxError] {
        match self {
            Error::Syntax(e) => std::slice::from_ref(e),
            Error::Syntaxes(errors) => &errors.0,
            _ => &[],
        }
    }
}

/// What to do when a line is malformed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ErrorPolicy {
    /// Stop at the first malformed line and return its error. The handler
    /// never sees that line.
    #[default]
    FailFast,
    /// Hand every malformed line to the handler together with its error,
    /// keep going and return all errors at the end.
    CollectAll,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Scanning,
    Done,
}

/// Streams an ini formatted input, one line at a time.
#[derive(Debug)]
pub struct Parser<R> {
    reader: R,
    buf: Vec<u8>,
    line: usize,
    section: String,
    policy: ErrorPolicy,
    abort_on_handler_error: bool,
    state: State,
}

impl<R: BufRead> Parser<R> {
    pub fn new(reader: R) -> Self {
        ParserBuilder::new().build(reader)
    }

    /// Number of the last line read.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The currently open section, empty outside of any section.
    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Reads the input until it is exhausted, calling `mapping` once for
    /// every line that is not blank.
    ///
    /// A line that is not valid UTF-8 is a syntax error like any other.
    /// Calling it again once the parser is done does nothing.
    pub fn map<M: Mapping + ?Sized>(&mut self, mapping: &mut M) -> Result<(), Error> {
        let mut errors = SyntaxErrors::default();

        while self.state == State::Scanning {
            self.buf.clear();
            let n = match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(n) => n,
                Err(e) => {
                    self.state = State::Done;
                    return Err(e.into());
                }
            };
            if n == 0 {
                self.state = State::Done;
                break;
            }
            self.line += 1;

            let delivered = match std::str::from_utf8(&self.buf) {
                Ok(text) => {
                    let text = text.trim();
                    if text.is_empty() {
                        continue;
                    }

                    let extracted = extract(text, &scan(text));
                    if let Some(section) = extracted.section {
                        debug!("line {}: entering section {section:?}", self.line);
                        self.section.clear();
                        self.section.push_str(section);
                    }

                    let field = Field {
                        line: self.line,
                        section: &self.section,
                        key: extracted.key,
                        value: &extracted.value,
                        comment: extracted.comment,
                    };
                    let error = extracted
                        .error
                        .map(|cause| SyntaxError::new(self.line, text, cause));
                    self.deliver(mapping, &field, error, &mut errors)
                }
                Err(_) => {
                    let text = String::from_utf8_lossy(&self.buf);
                    let field = Field {
                        line: self.line,
                        section: &self.section,
                        ..Field::default()
                    };
                    let error = SyntaxError::new(self.line, text.trim(), Cause::InvalidUtf8);
                    self.deliver(mapping, &field, Some(error), &mut errors)
                }
            };

            if let Err(e) = delivered {
                self.state = State::Done;
                return Err(e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Syntaxes(errors))
        }
    }

    /// Hands one field to `mapping` according to the error policy.
    fn deliver<M: Mapping + ?Sized>(
        &self,
        mapping: &mut M,
        field: &Field<'_>,
        error: Option<SyntaxError>,
        errors: &mut SyntaxErrors,
    ) -> Result<(), Error> {
        let error = match error {
            Some(e) if self.policy == ErrorPolicy::FailFast => return Err(e.into()),
            error => error,
        };

        let result = match &error {
            Some(e) => {
                warn!("{e}");
                mapping.map(field, Some(e))
            }
            None => {
                trace!("{field:?}");
                mapping.map(field, None)
            }
        };

        if let Err(source) = result {
            if self.abort_on_handler_error {
                return Err(Error::Handler {
                    line: field.line,
                    source,
                });
            }
            warn!("line {}: ignoring handler failure: {source}", field.line);
        }

        if let Some(e) = error {
            errors.push(e);
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct ParserBuilder {
    policy: ErrorPolicy,
    abort_on_handler_error: bool,
}

impl Default for ParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserBuilder {
    pub fn new() -> Self {
        ParserBuilder {
            policy: ErrorPolicy::default(),
            abort_on_handler_error: true,
        }
    }

    pub fn build<R: BufRead>(&self, reader: R) -> Parser<R> {
        Parser {
            reader,
            buf: Vec::new(),
            line: 0,
            section: String::new(),
            policy: self.policy,
            abort_on_handler_error: self.abort_on_handler_error,
            state: State::Scanning,
        }
    }

    pub fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Stop parsing as soon as the handler returns an error (the default),
    /// or log the failure and carry on.
    pub fn abort_on_handler_error(mut self, abort: bool) -> Self {
        self.abort_on_handler_error = abort;
        self
    }
}
