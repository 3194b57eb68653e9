use anyhow::{Context, Result, bail};
use highlight_ranges_engine::Range;
use serde::Deserialize;
use std::path::Path;

/// A TOML file of `[[range]]` tables, each holding `start`, `end` or
/// `length`, and an optional `tag` table.
#[derive(Debug, Deserialize)]
struct RangeFile {
    #[serde(default, rename = "range")]
    ranges: Vec<Range>,
}

pub fn parse_ranges(content: &str) -> Result<Vec<Range>, toml::de::Error> {
    let file: RangeFile = toml::from_str(content)?;
    Ok(file.ranges)
}

pub fn read_ranges(path: &Path) -> Result<Vec<Range>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read ranges file {}", path.display()))?;
    parse_ranges(&content)
        .with_context(|| format!("Failed to parse ranges file {}", path.display()))
}

/// Ensures every range ends within a text of `text_len` characters.
pub fn check_bounds(ranges: &[Range], text_len: usize) -> Result<()> {
    if let Some(range) = ranges.iter().find(|range| range.end() > text_len) {
        bail!(
            "Range [{}, {}) extends past the end of the text ({text_len} characters)",
            range.start(),
            range.end()
        );
    }
    Ok(())
}
