//! `ingrid` reads ini files line by line and hands every section, field and
//! comment it finds to a caller supplied [`Mapping`].
//!
//! ```
//! let input = "debug = false\n\n[example]\nhostname = \"example.com\"\n";
//! let mut found = Vec::new();
//!
//! ingrid::map_str(input, |field, _| {
//!     if !field.key.is_empty() {
//!         found.push(format!("{}.{} = {}", field.section, field.key, field.value));
//!     }
//!     Ok(())
//! })
//! .unwrap();
//!
//! assert_eq!(found, [".debug = false", "example.hostname = example.com"]);
//! ```

pub mod ini;

pub use self::ini::{
    map, map_str, unquote, Cause, Error, ErrorPolicy, Field, HandlerError, HandlerResult,
    Mapping, Parser, ParserBuilder, SyntaxError, SyntaxErrors, UnquoteError,
};
