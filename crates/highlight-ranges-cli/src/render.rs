//! Text output for flattened range trees.
//!
//! Both renderers walk the draw list from `RangeTree::flatten` rather than the
//! tree itself, relying on `depth` to know when enclosing spans close.

use highlight_ranges_engine::{FlatRange, Tag};
use std::fmt::Write;

fn snippet(chars: &[char], start: usize, end: usize) -> String {
    if start >= end {
        return String::new();
    }
    chars[start..end.min(chars.len())].iter().collect()
}

/// One line per range: indentation by depth, span, sibling index, tag and the
/// covered text.
pub fn render_list(flat: &[FlatRange<Tag>], text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();
    for entry in flat {
        let range = &entry.range;
        let _ = writeln!(
            out,
            "{:indent$}[{}, {}) #{} {:?} {:?}",
            "",
            range.start(),
            range.end(),
            entry.node_index,
            range.tag(),
            snippet(&chars, range.start(), range.end()),
            indent = entry.depth * 2
        );
    }
    out
}

struct HtmlWriter<'a> {
    chars: &'a [char],
    out: String,
    cursor: usize,
}

impl HtmlWriter<'_> {
    fn text_until(&mut self, end: usize) {
        let text = snippet(self.chars, self.cursor, end);
        self.out.push_str(&html_escape::encode_text(&text));
        self.cursor = self.cursor.max(end);
    }

    fn open(&mut self, entry: &FlatRange<Tag>, class_key: &str) {
        self.text_until(entry.range.start());
        self.out.push_str("<span");
        if let Some(class) = entry.range.tag().get(class_key) {
            let _ = write!(
                self.out,
                " class=\"{}\"",
                html_escape::encode_double_quoted_attribute(class)
            );
        }
        let _ = write!(self.out, " data-node-index=\"{}\">", entry.node_index);
    }

    fn close(&mut self, end: usize) {
        self.text_until(end);
        self.out.push_str("</span>");
    }
}

/// Nested `<span>` markup over `text`, one span per flattened range.
///
/// The span's class comes from the tag value under `class_key`; the text is
/// HTML-escaped.
pub fn render_html(flat: &[FlatRange<Tag>], text: &str, class_key: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut writer = HtmlWriter {
        chars: &chars,
        out: String::new(),
        cursor: 0,
    };
    // Ends of the spans currently open, innermost last.
    let mut open: Vec<usize> = Vec::new();

    for entry in flat {
        while open.len() > entry.depth {
            if let Some(end) = open.pop() {
                writer.close(end);
            }
        }
        writer.open(entry, class_key);
        open.push(entry.range.end());
    }
    while let Some(end) = open.pop() {
        writer.close(end);
    }
    writer.text_until(chars.len());
    writer.out
}
