//! Frontmatter block extraction and key-value parsing

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;

use super::record::{FrontmatterRecord, KNOWN_KEYS};
use crate::error::{self, Result};

const DELIMITER: &str = "---";

#[allow(clippy::expect_used)] // literal pattern
static KEY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_.-]*)[ \t]*:(?:[ \t]|$)").expect("valid key regex")
});

/// Entry document split into header record and body
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub record: FrontmatterRecord,
    pub body: String,
    /// 1-based line number of the first body line
    pub body_start_line: usize,
}

/// One `key:` line plus its continuation lines
struct RawEntry<'a> {
    key: &'a str,
    line: usize,
    first: &'a str,
    continuation: Vec<&'a str>,
}

impl RawEntry<'_> {
    /// Value text exactly as written after `key:`
    fn raw_value(&self) -> String {
        let mut raw = self.first.trim().to_string();
        for line in &self.continuation {
            raw.push('\n');
            raw.push_str(line);
        }
        // Trailing blank continuation lines carry no meaning
        raw.truncate(raw.trim_end().len());
        raw
    }

    /// Source text of this entry as a standalone YAML document
    fn yaml_source(&self) -> String {
        let mut source = format!("{}: {}", self.key, self.first.trim());
        for line in &self.continuation {
            source.push('\n');
            source.push_str(line);
        }
        source.push('\n');
        source
    }
}

/// Parse an entry document into frontmatter record and body
///
/// `path` is the document path used in error messages.
pub fn parse_document(content: &str, path: &str) -> Result<ParsedDocument> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let lines: Vec<&str> = content.lines().collect();

    if lines.first().map(|l| l.trim_end()) != Some(DELIMITER) {
        return Err(error::bundle::frontmatter_parse(
            path,
            1,
            "missing opening '---' delimiter",
        ));
    }

    let end_idx = lines[1..]
        .iter()
        .position(|l| l.trim_end() == DELIMITER)
        .map(|i| i + 1)
        .ok_or_else(|| {
            error::bundle::frontmatter_parse(path, 1, "unterminated block, no closing '---'")
        })?;

    let entries = split_entries(&lines[1..end_idx], path)?;
    let record = build_record(&entries, path)?;

    Ok(ParsedDocument {
        record,
        body: lines[end_idx + 1..].join("\n"),
        body_start_line: end_idx + 2,
    })
}

fn split_entries<'a>(header: &[&'a str], path: &str) -> Result<Vec<RawEntry<'a>>> {
    let mut entries: Vec<RawEntry<'a>> = Vec::new();

    for (idx, line) in header.iter().enumerate() {
        // Header starts on line 2, after the opening delimiter
        let line_no = idx + 2;
        let is_continuation = line.starts_with([' ', '\t']) || line.starts_with('-');

        if line.trim().is_empty() {
            if let Some(current) = entries.last_mut() {
                current.continuation.push(line);
            }
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        if is_continuation {
            match entries.last_mut() {
                Some(current) => current.continuation.push(line),
                None => {
                    return Err(error::bundle::frontmatter_parse(
                        path,
                        line_no,
                        "indented line before any key",
                    ));
                }
            }
            continue;
        }

        let Some(caps) = KEY_LINE.captures(line) else {
            return Err(error::bundle::frontmatter_parse(
                path,
                line_no,
                format!("expected 'key: value', found '{}'", line.trim()),
            ));
        };
        let key = caps.get(1).map_or("", |m| m.as_str());
        if entries.iter().any(|e| e.key == key) {
            return Err(error::bundle::frontmatter_parse(
                path,
                line_no,
                format!("duplicate key '{key}'"),
            ));
        }
        let first = &line[caps.get(0).map_or(0, |m| m.end())..];
        entries.push(RawEntry {
            key,
            line: line_no,
            first,
            continuation: Vec::new(),
        });
    }

    Ok(entries)
}

fn build_record(entries: &[RawEntry<'_>], path: &str) -> Result<FrontmatterRecord> {
    let mut record = FrontmatterRecord::default();
    let mut key_lines = BTreeMap::new();

    for entry in entries {
        key_lines.insert(entry.key.to_string(), entry.line);

        if !KNOWN_KEYS.contains(&entry.key) {
            record
                .extra_fields
                .insert(entry.key.to_string(), entry.raw_value());
            continue;
        }

        let value = parse_value(entry, path)?;
        match entry.key {
            "name" => record.name = Some(value),
            "description" => record.description = Some(value),
            _ => record.type_value = Some(value),
        }
    }

    record.key_lines = key_lines;
    Ok(record)
}

/// Scalar value of a known key; nested values fall back to their raw text
fn parse_value(entry: &RawEntry<'_>, path: &str) -> Result<String> {
    let mapping: serde_yaml::Mapping =
        serde_yaml::from_str(&entry.yaml_source()).map_err(|e| {
            error::bundle::frontmatter_parse(path, entry.line, format!("'{}': {e}", entry.key))
        })?;

    let value = mapping
        .get(Value::String(entry.key.to_string()))
        .cloned()
        .unwrap_or(Value::Null);

    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => entry.raw_value(),
    })
}
