//! Placeholder substitution.
//!
//! Every replacement runs through [`splice`]: matches are located in the
//! original text from left to right, never in already inserted values, so a
//! value that itself looks like a placeholder is never substituted again.

use std::borrow::Cow;
use std::ops::Range;

use regex::Regex;

/// Something that can be located inside a text.
pub trait Needle {
    /// Byte range of the first match starting at or after `start`.
    fn find_at(&self, haystack: &str, start: usize) -> Option<Range<usize>>;
}

impl Needle for Regex {
    fn find_at(&self, haystack: &str, start: usize) -> Option<Range<usize>> {
        Regex::find_at(self, haystack, start).map(|m| m.range())
    }
}

impl Needle for str {
    fn find_at(&self, haystack: &str, start: usize) -> Option<Range<usize>> {
        if self.is_empty() {
            return None;
        }
        haystack[start..]
            .find(self)
            .map(|offset| start + offset..start + offset + self.len())
    }
}

/// A class or id token: the literal text, not followed by another identifier
/// character. `nav-about` matches in `nav-about active` but not in
/// `nav-about-us`.
#[derive(Debug, Clone, Copy)]
pub struct ClassToken<'a>(pub &'a str);

impl Needle for ClassToken<'_> {
    fn find_at(&self, haystack: &str, start: usize) -> Option<Range<usize>> {
        let first = self.0.chars().next()?;
        let mut from = start;

        while let Some(span) = self.0.find_at(haystack, from) {
            let followed_by_ident = haystack[span.end..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

            if !followed_by_ident {
                return Some(span);
            }
            from = span.start + first.len_utf8();
        }

        None
    }
}

/// Replace every non-overlapping match of `needle` with `value`.
///
/// Text outside the matches is copied verbatim. Returns the input borrowed
/// when nothing matches.
pub fn splice<'t, N>(text: &'t str, needle: &N, value: &str) -> Cow<'t, str>
where
    N: Needle + ?Sized,
{
    let mut spliced: Option<String> = None;
    let mut cursor = 0;
    let mut search = 0;

    while search <= text.len() {
        let Some(span) = needle.find_at(text, search) else {
            break;
        };

        let out = spliced.get_or_insert_with(|| String::with_capacity(text.len()));
        out.push_str(&text[cursor..span.start]);
        out.push_str(value);
        cursor = span.end;

        search = if span.is_empty() {
            // Step past an empty match so the scan always advances.
            match text[span.end..].chars().next() {
                Some(c) => span.end + c.len_utf8(),
                None => break,
            }
        } else {
            span.end
        };
    }

    match spliced {
        Some(mut out) => {
            out.push_str(&text[cursor..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(text),
    }
}

/// Replace every match of `pattern` with `value`.
pub fn replace_pattern<'t>(text: &'t str, pattern: &Regex, value: &str) -> Cow<'t, str> {
    splice(text, pattern, value)
}

/// Replace every occurrence of `source` with `value`. An empty `source`
/// never matches.
pub fn replace_literal<'t>(text: &'t str, source: &str, value: &str) -> Cow<'t, str> {
    splice(text, source, value)
}

/// Pattern for a `{{ ... symbol ... }}` placeholder.
///
/// Anything, newlines included, may surround the symbol inside the braces.
/// The symbol is matched literally and case-sensitively.
pub fn placeholder(symbol: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?s)\{{\{{.*?{}.*?\}}\}}", regex::escape(symbol)))
}
