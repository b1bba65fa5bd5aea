use std::borrow::Cow;

use super::error::Cause;
use super::quoted::{is_quoted, normalize_quotes, unquote};
use super::scanner::Markers;

/// The parts of one line.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Extracted<'a> {
    /// `Some` when the line opened a new section.
    pub(crate) section: Option<&'a str>,
    pub(crate) key: &'a str,
    pub(crate) value: Cow<'a, str>,
    pub(crate) comment: &'a str,
    pub(crate) error: Option<Cause>,
}

impl<'a> Extracted<'a> {
    fn fail(&mut self, cause: Cause) {
        // the first problem found on a line is the one reported
        self.error.get_or_insert(cause);
    }

    fn is_empty(&self) -> bool {
        self.section.map_or(true, str::is_empty)
            && self.key.is_empty()
            && self.value.is_empty()
            && self.comment.is_empty()
    }
}

/// Slices the section, key, value and comment out of a trimmed `line`
/// using the positions found by [`scan`](super::scanner::scan).
pub(crate) fn extract<'a>(line: &'a str, markers: &Markers) -> Extracted<'a> {
    let mut extracted = Extracted::default();

    if markers.is_section_header() {
        extracted.section = grab_section(&mut extracted, line, markers);
    }
    if markers.is_comment() {
        extracted.comment = line;
    }
    if let Some(equal) = markers.equal {
        grab_key_value(&mut extracted, line, equal, markers.comment);
    }

    if extracted.error.is_none() && extracted.is_empty() && !line.is_empty() {
        extracted.fail(match (extracted.section, markers.equal) {
            (Some(_), _) => Cause::EmptySection,
            (None, Some(_)) => Cause::EmptyField,
            (None, None) => Cause::MissingEqualSign,
        });
    }

    extracted
}

// SECTION_HEADER = '[' TEXT ']' ANY*
fn grab_section<'a>(
    extracted: &mut Extracted<'a>,
    line: &'a str,
    markers: &Markers,
) -> Option<&'a str> {
    match (markers.left_bracket, markers.right_bracket) {
        (Some(left), Some(right)) if right > left => Some(line[left + 1..right].trim()),
        _ => {
            extracted.fail(Cause::MissingRightBracket);
            None
        }
    }
}

// ENTRY = KEY WS* '=' WS* VALUE
fn grab_key_value<'a>(
    extracted: &mut Extracted<'a>,
    line: &'a str,
    equal: usize,
    comment: Option<usize>,
) {
    let key = line[..equal].trim();
    extracted.key = key;
    if key.contains(char::is_whitespace) {
        extracted.fail(Cause::SpaceInKey);
        return;
    }

    // anything from a comment character on is dropped
    let end = comment.filter(|&c| c > equal).unwrap_or(line.len());
    let raw = line[equal + 1..end].trim();
    extracted.value = grab_value(extracted, raw);
}

fn grab_value<'a>(extracted: &mut Extracted<'a>, raw: &'a str) -> Cow<'a, str> {
    if !is_quoted(raw) {
        return Cow::Borrowed(raw);
    }

    let unquoted = match normalize_quotes(raw) {
        Some(normalized) => unquote(&normalized),
        None => unquote(raw),
    };
    match unquoted {
        Ok(value) => Cow::Owned(value),
        Err(e) => {
            extracted.fail(e.into());
            Cow::Borrowed(raw)
        }
    }
}
