//! Splitting text around a match for highlighting.
//!
//! [`highlight_result`] turns a text and its [`MatchResult`] into three
//! segments (before, matched, after). Each segment carries a style class
//! scoped to the rendering component: `{component}__unmask` for the plain
//! parts and `{component}__mask` for the match. The [`Display`](std::fmt::Display)
//! form wraps segments in BBCode-style tags, ready for the standout styling
//! layer:
//!
//! ```
//! use standout_sift::{highlight_result, MatchResult};
//!
//! let matches = MatchResult::Index(6);
//! let highlight = highlight_result("v-list-item", "Hello World", Some(&matches), 5).unwrap();
//! assert_eq!(
//!     highlight.to_string(),
//!     "[v-list-item__unmask]Hello [/v-list-item__unmask]\
//!      [v-list-item__mask]World[/v-list-item__mask]\
//!      [v-list-item__unmask][/v-list-item__unmask]"
//! );
//! ```

use std::fmt;

use crate::error::{Result, SiftError};
use crate::matching::MatchResult;

/// A text, either untouched or split around a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Highlight<'t> {
    /// Nothing to highlight.
    Plain(&'t str),
    /// Text split around one match.
    Split(SplitText<'t>),
}

impl<'t> Highlight<'t> {
    /// Returns the segments of a split text, or `None` for plain text.
    pub fn segments(&self) -> Option<[Segment<'_>; 3]> {
        match self {
            Highlight::Plain(_) => None,
            Highlight::Split(split) => Some(split.segments()),
        }
    }

    /// Returns `true` if the text was split.
    pub fn is_split(&self) -> bool {
        matches!(self, Highlight::Split(_))
    }
}

impl fmt::Display for Highlight<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Highlight::Plain(text) => f.write_str(text),
            Highlight::Split(split) => {
                for segment in split.segments() {
                    write!(f, "{}", segment)?;
                }
                Ok(())
            }
        }
    }
}

/// Text split into the part before a match, the match, and the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitText<'t> {
    /// Component name used to scope the style classes, normalized to a
    /// valid tag name (see [`highlight_result`]).
    pub component: String,
    /// Text before the match.
    pub before: &'t str,
    /// The matched text.
    pub matched: &'t str,
    /// Text after the match.
    pub after: &'t str,
}

impl SplitText<'_> {
    /// Class of the unmatched segments.
    pub fn unmask_class(&self) -> String {
        format!("{}__unmask", self.component)
    }

    /// Class of the matched segment.
    pub fn mask_class(&self) -> String {
        format!("{}__mask", self.component)
    }

    /// The three segments, in order.
    pub fn segments(&self) -> [Segment<'_>; 3] {
        let unmask = self.unmask_class();
        [
            Segment {
                class: unmask.clone(),
                text: self.before,
                matched: false,
            },
            Segment {
                class: self.mask_class(),
                text: self.matched,
                matched: true,
            },
            Segment {
                class: unmask,
                text: self.after,
                matched: false,
            },
        ]
    }
}

/// One styled piece of a split text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'t> {
    /// Style class.
    pub class: String,
    /// Segment text.
    pub text: &'t str,
    /// Whether this is the matched segment.
    pub matched: bool,
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{0}]{1}[/{0}]", self.class, self.text)
    }
}

/// Splits `text` around the match described by `matches`.
///
/// Only index results are split; offsets and `length` count characters and
/// are clamped to the text. Absent, negative, boolean and `NoMatch` results
/// leave the text plain. Span results are not supported and return
/// [`SiftError::Unimplemented`].
///
/// Style tags only accept lowercase ASCII letters, digits, `_` and `-`, and
/// must start with a letter or `_`. The component name is normalized to fit:
/// ASCII letters are lowercased, other characters become `-`, and a `_` is
/// prepended when the name would start with a digit or `-`. `VListItem`
/// yields the classes `vlistitem__unmask` and `vlistitem__mask`.
pub fn highlight_result<'t>(
    component: &str,
    text: &'t str,
    matches: Option<&MatchResult>,
    length: usize,
) -> Result<Highlight<'t>> {
    let index = match matches {
        Some(MatchResult::Spans(_)) => {
            return Err(SiftError::Unimplemented("highlighting multiple matches"))
        }
        Some(MatchResult::Span(..)) => {
            return Err(SiftError::Unimplemented("highlighting span matches"))
        }
        Some(MatchResult::Index(index)) => *index,
        Some(MatchResult::NoMatch) | Some(MatchResult::Bool(_)) | None => {
            return Ok(Highlight::Plain(text))
        }
    };

    let Ok(start) = usize::try_from(index) else {
        return Ok(Highlight::Plain(text));
    };

    let start_byte = byte_offset(text, start);
    let end_byte = start_byte + byte_offset(&text[start_byte..], length);

    Ok(Highlight::Split(SplitText {
        component: tag_name(component),
        before: &text[..start_byte],
        matched: &text[start_byte..end_byte],
        after: &text[end_byte..],
    }))
}

/// Normalizes `component` into a valid style tag name.
fn tag_name(component: &str) -> String {
    let mut name: String = component
        .chars()
        .map(|c| match c.to_ascii_lowercase() {
            c @ ('a'..='z' | '0'..='9' | '_' | '-') => c,
            _ => '-',
        })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        name.insert(0, '_');
    }
    name
}

/// Byte offset of the `chars`-th character, or the text length if shorter.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(byte, _)| byte)
}
