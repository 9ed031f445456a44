//! Typed frontmatter record

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[cfg(test)]
use serde_yaml::Value;

/// Keys with a fixed meaning; everything else lands in `extra_fields`
pub const KNOWN_KEYS: &[&str] = &["name", "description", "type"];

/// Kind of capability a bundle declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SkillType {
    Workflow,
    Tool,
    Knowledge,
    Unspecified,
}

impl SkillType {
    pub const ALL: [SkillType; 4] = [
        SkillType::Workflow,
        SkillType::Tool,
        SkillType::Knowledge,
        SkillType::Unspecified,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SkillType::Workflow => "workflow",
            SkillType::Tool => "tool",
            SkillType::Knowledge => "knowledge",
            SkillType::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkillType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Parsed header of an entry document
///
/// Known fields hold the YAML scalar value as a string. Unknown keys keep the
/// value text exactly as written so they can be rendered back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontmatterRecord {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Raw `type` value; see [`FrontmatterRecord::skill_type`]
    pub type_value: Option<String>,
    pub extra_fields: BTreeMap<String, String>,
    /// 1-based line of every key in the entry document
    pub key_lines: BTreeMap<String, usize>,
}

impl FrontmatterRecord {
    /// Declared type; `None` when absent, `Some(Err(raw))` when unrecognised
    pub fn skill_type(&self) -> Option<Result<SkillType, String>> {
        self.type_value.as_deref().map(str::parse)
    }

    /// Declared type with absence defaulting to `unspecified`
    pub fn effective_type(&self) -> Option<SkillType> {
        match self.skill_type() {
            None => Some(SkillType::Unspecified),
            Some(Ok(t)) => Some(t),
            Some(Err(_)) => None,
        }
    }

    /// Line of `key` in the entry document, if the key is present
    pub fn line_of(&self, key: &str) -> Option<usize> {
        self.key_lines.get(key).copied()
    }

    /// Render the record back to a `---` delimited header block
    #[cfg(test)]
    pub fn to_header(&self) -> String {
        let mut out = String::from("---\n");
        for (key, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("type", &self.type_value),
        ] {
            if let Some(value) = value {
                out.push_str(key);
                out.push_str(": ");
                out.push_str(&render_scalar(value));
                out.push('\n');
            }
        }
        for (key, raw) in &self.extra_fields {
            out.push_str(key);
            out.push(':');
            if !raw.is_empty() && !raw.starts_with('\n') {
                out.push(' ');
            }
            out.push_str(raw);
            out.push('\n');
        }
        out.push_str("---\n");
        out
    }
}

/// Quote a scalar only when YAML would otherwise read it differently
#[cfg(test)]
fn render_scalar(value: &str) -> String {
    let reparsed: Option<Value> = serde_yaml::from_str(value).ok();
    let plain = matches!(reparsed, Some(Value::String(ref s)) if s == value)
        && !value.contains('\n');
    if plain {
        return value.to_string();
    }
    serde_yaml::to_string(&Value::String(value.to_string()))
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{value:?}"))
}
