use std::char::CharTryFromError;
use std::str::Chars;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum UnquoteError {
    #[error("missing end quote")]
    MissingEndQuote,
    #[error("unescaped {0:?} inside quoted value")]
    UnescapedQuote(char),
    #[error("unknown escape sequence \"\\{0}\"")]
    UnknownSequence(char),
    #[error("incomplete escape sequence")]
    SequenceIncomplete,
    #[error("expected {expected} {radix} digits in escape sequence, but got {code:?}")]
    InvalidDigit {
        expected: usize,
        radix: &'static str,
        code: String,
    },
    #[error("escape sequence does not encode a valid character: {0}")]
    UnicodeCharInvalid(CharTryFromError),
    #[error("byte escape {0:#04x} is outside of ASCII")]
    NonAsciiByte(u32),
    #[error("single quotes must enclose exactly one character")]
    NotSingleCharacter,
}

/// Removes the surrounding quotes from `raw` and resolves its escape
/// sequences.
///
/// * `"..."` knows the usual backslash escapes (`\n`, `\t`, `\"`, `\x7f`,
///   `\101`, `\u00e9`, `\U0001f600`, ...).
/// * `` `...` `` is raw: no escapes, carriage returns are dropped.
/// * `'.'` encloses exactly one (possibly escaped) character.
pub fn unquote(raw: &str) -> Result<String, UnquoteError> {
    let mut chars = raw.chars();
    let quote = match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && matches!(first, '"' | '\'' | '`') => first,
        _ => return Err(UnquoteError::MissingEndQuote),
    };
    let inner = chars.as_str();

    if quote == '`' {
        if inner.contains('`') {
            return Err(UnquoteError::UnescapedQuote('`'));
        }
        return Ok(inner.replace('\r', ""));
    }

    // shortcut
    if quote == '"' && !inner.contains(['\\', '"']) {
        return Ok(inner.to_owned());
    }

    let mut parser = Quoted {
        chars: inner.chars(),
        cur: None,
        quote,
    };
    parser.bump();

    let unquoted = parser.parse_and_unquote()?;
    if quote == '\'' && unquoted.chars().count() != 1 {
        return Err(UnquoteError::NotSingleCharacter);
    }
    Ok(unquoted)
}

/// Rewrites a value enclosed in single ticks to use backticks, so that
/// `'text'` unquotes the same way `` `text` `` does.
pub fn normalize_quotes(value: &str) -> Option<String> {
    let inner = value.strip_prefix('\'')?.strip_suffix('\'')?;
    Some(format!("`{inner}`"))
}

/// `value` starts with one of the recognized quote characters.
pub fn is_quoted(value: &str) -> bool {
    value.starts_with(['"', '\'', '`'])
}

struct Quoted<'a> {
    chars: Chars<'a>,
    cur: Option<char>,
    quote: char,
}

impl<'a> Quoted<'a> {
    fn bump(&mut self) {
        self.cur = self.chars.next();
    }

    fn parse_and_unquote(&mut self) -> Result<String, UnquoteError> {
        let mut result = String::new();

        while let Some(c) = self.cur {
            match c {
                '\\' => {
                    self.bump();
                    result.push(self.parse_escape_sequence()?);
                }
                c if c == self.quote => return Err(UnquoteError::UnescapedQuote(c)),
                c => result.push(c),
            }
            self.bump();
        }

        Ok(result)
    }

    // leaves `cur` on the last character of the sequence
    fn parse_escape_sequence(&mut self) -> Result<char, UnquoteError> {
        let Some(c) = self.cur else {
            return Err(UnquoteError::SequenceIncomplete);
        };

        let r = match c {
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{b}',
            '\\' => '\\',
            c if c == self.quote => c,
            'x' => {
                // 2 character hex encoded byte
                self.bump();
                self.parse_byte_escape(2, 16)?
            }
            '0'..='7' => {
                // 3 character octal encoded byte
                self.parse_byte_escape(3, 8)?
            }
            'u' => {
                // 4 character hex encoding
                self.bump();
                self.parse_unicode_escape(4)?
            }
            'U' => {
                // 8 character hex encoding
                self.bump();
                self.parse_unicode_escape(8)?
            }
            c => return Err(UnquoteError::UnknownSequence(c)),
        };

        Ok(r)
    }

    fn parse_byte_escape(&mut self, max_chars: usize, radix: u32) -> Result<char, UnquoteError> {
        let code = self.parse_digits(max_chars, radix)?;
        if code > 0x7f {
            return Err(UnquoteError::NonAsciiByte(code));
        }
        Ok(char::from(code as u8))
    }

    fn parse_unicode_escape(&mut self, max_chars: usize) -> Result<char, UnquoteError> {
        let code = self.parse_digits(max_chars, 16)?;
        char::try_from(code).map_err(UnquoteError::UnicodeCharInvalid)
    }

    fn parse_digits(&mut self, max_chars: usize, radix: u32) -> Result<u32, UnquoteError> {
        let mut code = String::with_capacity(max_chars);
        for i in 0..max_chars {
            let Some(c) = self.cur else {
                return Err(UnquoteError::SequenceIncomplete);
            };
            code.push(c);
            if !c.is_digit(radix) {
                return Err(UnquoteError::InvalidDigit {
                    expected: max_chars,
                    radix: if radix == 8 { "octal" } else { "hex" },
                    code,
                });
            }
            if i + 1 != max_chars {
                self.bump();
            }
        }

        u32::from_str_radix(&code, radix).map_err(|_| UnquoteError::InvalidDigit {
            expected: max_chars,
            radix: if radix == 8 { "octal" } else { "hex" },
            code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod unquote {
        use super::*;

        #[test]
        fn double_quotes_without_escapes() {
            assert_eq!(unquote("\"example.com\""), Ok("example.com".into()));
        }

        #[test]
        fn empty_double_quotes() {
            assert_eq!(unquote("\"\""), Ok("".into()));
        }

        #[test]
        fn keeps_other_quotes_inside() {
            assert_eq!(unquote("\"it's `fine`\""), Ok("it's `fine`".into()));
        }

        #[test]
        fn unescapes_single_character_sequences() {
            let input = "\"\\a\\b\\f\\n\\r\\t\\v\\\\\\\"\"";

            assert_eq!(unquote(input), Ok("\u{7}\u{8}\u{c}\n\r\t\u{b}\\\"".into()));
        }

        #[test]
        fn unescapes_numeric_sequences() {
            let input = "\"\\x41 \\101 \\u00e9 \\U0001F600\"";

            assert_eq!(unquote(input), Ok("A A \u{e9} \u{1F600}".into()));
        }

        #[test]
        fn backticks_are_raw() {
            assert_eq!(unquote("`a\\nb \"c\"`"), Ok("a\\nb \"c\"".into()));
        }

        #[test]
        fn backticks_drop_carriage_returns() {
            assert_eq!(unquote("`a\rb`"), Ok("ab".into()));
        }

        #[test]
        fn single_quotes_hold_one_character() {
            assert_eq!(unquote("'h'"), Ok("h".into()));
            assert_eq!(unquote("'\\''"), Ok("'".into()));
            assert_eq!(unquote("'\\n'"), Ok("\n".into()));
        }

        #[test]
        fn fails_with_many_characters_in_single_quotes() {
            assert_eq!(unquote("'hello'"), Err(UnquoteError::NotSingleCharacter));
        }

        #[test]
        fn fails_without_end_quote() {
            assert_eq!(unquote("\"value"), Err(UnquoteError::MissingEndQuote));
            assert_eq!(unquote("`value"), Err(UnquoteError::MissingEndQuote));
            assert_eq!(unquote("\"value'"), Err(UnquoteError::MissingEndQuote));
        }

        #[test]
        fn fails_with_lone_quote() {
            assert_eq!(unquote("\""), Err(UnquoteError::MissingEndQuote));
        }

        #[test]
        fn fails_with_unquoted_input() {
            assert_eq!(unquote("value"), Err(UnquoteError::MissingEndQuote));
            assert_eq!(unquote(""), Err(UnquoteError::MissingEndQuote));
        }

        #[test]
        fn fails_with_escaped_end_quote() {
            assert_eq!(unquote("\"value\\\""), Err(UnquoteError::SequenceIncomplete));
        }

        #[test]
        fn fails_with_unescaped_quote_inside() {
            assert_eq!(
                unquote("\"say \"hi\"\""),
                Err(UnquoteError::UnescapedQuote('"'))
            );
            assert_eq!(unquote("`a`b`"), Err(UnquoteError::UnescapedQuote('`')));
        }

        #[test]
        fn fails_with_unknown_escape_char() {
            assert_eq!(unquote("\"\\_\""), Err(UnquoteError::UnknownSequence('_')));
        }

        #[test]
        fn fails_with_escaped_single_quote_in_double_quotes() {
            assert_eq!(unquote("\"\\'\""), Err(UnquoteError::UnknownSequence('\'')));
        }

        #[test]
        fn fails_with_illegal_hex_digit() {
            assert_eq!(
                unquote("\"\\u12x4\""),
                Err(UnquoteError::InvalidDigit {
                    expected: 4,
                    radix: "hex",
                    code: "12x".into(),
                })
            );
        }

        #[test]
        fn fails_with_illegal_octal_digit() {
            assert_eq!(
                unquote("\"\\678\""),
                Err(UnquoteError::InvalidDigit {
                    expected: 3,
                    radix: "octal",
                    code: "678".into(),
                })
            );
        }

        #[test]
        fn fails_with_incomplete_unicode_sequence() {
            assert_eq!(unquote("\"\\u12\""), Err(UnquoteError::SequenceIncomplete));
        }

        #[test]
        fn fails_with_surrogate() {
            assert!(matches!(
                unquote("\"\\uD800\""),
                Err(UnquoteError::UnicodeCharInvalid(_))
            ));
        }

        #[test]
        fn fails_with_non_ascii_byte() {
            assert_eq!(unquote("\"\\xff\""), Err(UnquoteError::NonAsciiByte(0xff)));
        }
    }

    mod normalize_quotes {
        use super::*;

        #[test]
        fn rewrites_single_ticks() {
            assert_eq!(normalize_quotes("'text'"), Some("`text`".into()));
        }

        #[test]
        fn keeps_inner_quotes() {
            assert_eq!(
                normalize_quotes("'single \"quoted\" string'"),
                Some("`single \"quoted\" string`".into())
            );
        }

        #[test]
        fn ignores_unterminated_single_tick() {
            assert_eq!(normalize_quotes("'text"), None);
        }

        #[test]
        fn ignores_lone_single_tick() {
            assert_eq!(normalize_quotes("'"), None);
        }

        #[test]
        fn ignores_other_quotes() {
            assert_eq!(normalize_quotes("\"text\""), None);
            assert_eq!(normalize_quotes("`text`"), None);
        }
    }

    mod is_quoted {
        use super::*;

        #[test]
        fn recognizes_quote_characters() {
            assert!(is_quoted("\"a\""));
            assert!(is_quoted("'a'"));
            assert!(is_quoted("`a`"));
            assert!(is_quoted("\"unterminated"));
        }

        #[test]
        fn rejects_bare_values() {
            assert!(!is_quoted("a\""));
            assert!(!is_quoted(""));
        }
    }
}
