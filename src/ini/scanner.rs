/// Positions of the structural characters of one line.
///
/// Every position is the byte index of the *first* occurrence of that
/// character. Nothing after a comment character is looked at, so a marker
/// found behind it is never recorded.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Markers {
    pub(crate) left_bracket: Option<usize>,
    pub(crate) right_bracket: Option<usize>,
    pub(crate) equal: Option<usize>,
    pub(crate) comment: Option<usize>,
}

impl Markers {
    /// A line whose first character opens a section header.
    pub(crate) fn is_section_header(&self) -> bool {
        self.left_bracket == Some(0)
    }

    /// A line whose first character starts a comment.
    pub(crate) fn is_comment(&self) -> bool {
        self.comment == Some(0)
    }
}

/// Scans `line` once, left to right, and records where `[`, `]`, `=` and
/// the comment start (`#` or `;`) are.
///
/// Comment characters are not protected by quotes: `k = "a;b"` has its
/// comment start inside the quoted value.
pub(crate) fn scan(line: &str) -> Markers {
    let mut markers = Markers::default();

    for (i, b) in line.bytes().enumerate() {
        let slot = match b {
            b'#' | b';' => {
                markers.comment = Some(i);
                break;
            }
            b'[' => &mut markers.left_bracket,
            b']' => &mut markers.right_bracket,
            b'=' => &mut markers.equal,
            _ => continue,
        };
        slot.get_or_insert(i);
    }

    markers
}
