//! Entry document frontmatter
//!
//! Parses the `---` delimited key-value header at the top of `SKILL.md` into
//! a [`FrontmatterRecord`]. The parser is permissive about what values look
//! like (values are YAML), strict about block structure, and keeps every key
//! it does not recognise.

mod parse;
mod record;

pub use parse::{ParsedDocument, parse_document};
pub use record::{FrontmatterRecord, SkillType};
