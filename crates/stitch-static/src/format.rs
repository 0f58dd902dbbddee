//! HTML re-indentation.
//!
//! Works line by line: each line is trimmed and re-indented by the element
//! depth at its start. Line contents are never split or joined, so inline
//! markup keeps its meaning. Bodies of `pre`, `textarea`, `script` and
//! `style` are copied verbatim.

use std::sync::LazyLock;

use regex::Regex;

use crate::collaborators::HtmlFormatter;

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/)?([A-Za-z][A-Za-z0-9-]*)[^>]*>").expect("tag pattern is valid")
});

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

const RAW_ELEMENTS: &[&str] = &["pre", "textarea", "script", "style"];

/// Line-based HTML indenter.
#[derive(Debug, Clone)]
pub struct Indenter {
    indent: String,
}

impl Indenter {
    pub fn new(width: usize) -> Self {
        Self {
            indent: " ".repeat(width),
        }
    }
}

impl Default for Indenter {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Tag counts for one line.
#[derive(Debug, Default, PartialEq, Eq)]
struct LineShape {
    /// Closing tags before any opening tag on a line that starts with `</`
    leading_closes: usize,
    opens: usize,
    closes: usize,
    /// Raw element opened but not closed on this line
    raw: Option<String>,
}

fn shape(line: &str) -> LineShape {
    let mut shape = LineShape::default();
    let mut leading = line.starts_with("</");
    let mut pos = 0;

    while let Some(caps) = TAG.captures_at(line, pos) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        pos = whole.end();
        let name = caps[2].to_ascii_lowercase();

        if caps.get(1).is_some() {
            shape.closes += 1;
            if leading {
                shape.leading_closes += 1;
            }
            continue;
        }

        leading = false;
        if VOID_ELEMENTS.contains(&name.as_str()) || whole.as_str().ends_with("/>") {
            continue;
        }
        shape.opens += 1;

        if RAW_ELEMENTS.contains(&name.as_str()) {
            // Skip the raw body so markup-like text inside it is not counted.
            match find_close(&line[pos..], &name) {
                Some(offset) => pos += offset,
                None => {
                    shape.raw = Some(name);
                    break;
                }
            }
        }
    }

    shape
}

/// Byte offset of `</name` in `text`, ignoring ASCII case.
fn find_close(text: &str, name: &str) -> Option<usize> {
    text.to_ascii_lowercase().find(&format!("</{name}"))
}

impl HtmlFormatter for Indenter {
    fn format(&self, html: &str) -> String {
        let mut out = String::with_capacity(html.len() + html.len() / 4);
        let mut depth: usize = 0;
        let mut raw: Option<String> = None;
        let mut previous_blank = true;

        for line in html.lines() {
            if let Some(name) = raw.take() {
                out.push_str(line);
                out.push('\n');

                match find_close(line, &name) {
                    Some(offset) => {
                        depth = depth.saturating_sub(1);
                        let rest = &line[offset..];
                        let after = rest.find('>').map_or("", |end| &rest[end + 1..]);
                        let tail = shape(after);
                        depth = (depth + tail.opens).saturating_sub(tail.closes);
                        raw = tail.raw;
                    }
                    None => raw = Some(name),
                }
                previous_blank = false;
                continue;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                if !previous_blank {
                    out.push('\n');
                }
                previous_blank = true;
                continue;
            }
            previous_blank = false;

            let line_shape = shape(trimmed);
            let level = depth.saturating_sub(line_shape.leading_closes);

            for _ in 0..level {
                out.push_str(&self.indent);
            }
            // Trailing whitespace on a line that opens a raw element belongs to its body.
            if line_shape.raw.is_some() {
                out.push_str(line.trim_start());
            } else {
                out.push_str(trimmed);
            }
            out.push('\n');

            depth = (depth + line_shape.opens).saturating_sub(line_shape.closes);
            raw = line_shape.raw;
        }

        out
    }
}
