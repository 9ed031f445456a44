//! Line scanner for path-like tokens in markdown text
//!
//! Pure text processing: no filesystem access happens here.

use once_cell::sync::Lazy;
use regex::Regex;

use super::TokenClass;

#[allow(clippy::expect_used)] // literal pattern
static CODE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid regex"));

#[allow(clippy::expect_used)] // literal pattern
static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"!?\[[^\]]*\]\(\s*(<[^>]*>|[^)\s]+)(?:\s+["'][^"']*["'])?\s*\)"#)
        .expect("valid regex")
});

#[allow(clippy::expect_used)] // literal pattern
static URL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").expect("valid regex"));

#[allow(clippy::expect_used)] // literal pattern
static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9+.-]*://\S+").expect("valid regex"));

/// Programs whose first non-flag argument is a script path
const INTERPRETERS: &[&str] = &[
    "python", "python3", "python2", "bash", "sh", "zsh", "node", "deno", "bun", "ruby", "perl",
    "source", ".", "npx", "tsx", "pwsh",
];

/// Extensions that mark a bare argument as a script path
const SCRIPT_EXTENSIONS: &[&str] = &[
    ".py", ".sh", ".bash", ".zsh", ".js", ".mjs", ".cjs", ".ts", ".rb", ".pl", ".ps1",
];

/// A path-like token as found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub text: String,
    pub line: usize,
    pub class: TokenClass,
    /// First argument of a command invocation, i.e. the script itself
    pub is_command_target: bool,
}

/// Scans documents for path-like tokens
pub struct Scanner {
    mention: Regex,
}

impl Scanner {
    /// `designated` are the scripts/references/assets folder names
    #[allow(clippy::expect_used)] // names are escaped
    pub fn new(designated: &[&str]) -> Self {
        let names: Vec<String> = designated.iter().map(|d| regex::escape(d)).collect();
        let pattern = format!(
            r"(?:^|[^\w./-])((?:{})/[\w.-]+(?:/[\w.-]+)*/?)",
            names.join("|")
        );
        Self {
            mention: Regex::new(&pattern).expect("mention pattern is built from escaped names"),
        }
    }

    /// Scan `text`, whose first line is line `first_line` of its document
    pub fn scan(&self, text: &str, first_line: usize) -> Vec<RawToken> {
        let mut tokens = Vec::new();
        let mut fence: Option<&str> = None;

        for (idx, line) in text.lines().enumerate() {
            let line_no = first_line + idx;
            let trimmed = line.trim_start();

            if let Some(marker) = fence_marker(trimmed) {
                match fence {
                    Some(open) if marker == open && is_bare_fence(trimmed, marker) => fence = None,
                    Some(_) => {}
                    None => fence = Some(marker),
                }
                continue;
            }
            if fence.is_some() {
                scan_command(trimmed, line_no, &mut tokens);
                continue;
            }

            self.scan_prose(line, line_no, &mut tokens);
        }

        tokens
    }

    fn scan_prose(&self, line: &str, line_no: usize, tokens: &mut Vec<RawToken>) {
        for caps in CODE_SPAN.captures_iter(line) {
            let span = caps.get(1).map_or("", |m| m.as_str()).trim();
            if starts_with_command(span) {
                scan_command(span, line_no, tokens);
                continue;
            }
            for word in span.split_whitespace() {
                let word = strip_punctuation(word);
                if is_path_like(word) && !is_absolute(word) {
                    tokens.push(token(word, line_no, TokenClass::CodeSpan, false));
                }
            }
        }

        // Links and mentions never match inside code spans
        let without_code = blank_matches(&CODE_SPAN, line);
        for caps in LINK.captures_iter(&without_code) {
            let target = caps.get(1).map_or("", |m| m.as_str());
            if let Some(target) = clean_link_target(target) {
                tokens.push(token(&target, line_no, TokenClass::Link, false));
            }
        }

        let prose = blank_matches(&LINK, &without_code);
        let before_command = tokens.len();
        if starts_with_command(prose.trim_start()) {
            scan_command(prose.trim_start(), line_no, tokens);
        }
        // Remote URLs are never bundle paths, whatever their query or fragment holds
        let prose = blank_matches(&BARE_URL, &prose);
        for caps in self.mention.captures_iter(&prose) {
            if let Some(m) = caps.get(1) {
                let text = m.as_str().trim_end_matches('.');
                if tokens[before_command..].iter().any(|t| t.text.trim_start_matches("./") == text) {
                    continue;
                }
                tokens.push(token(text, line_no, TokenClass::Mention, false));
            }
        }
    }
}

fn token(text: &str, line: usize, class: TokenClass, is_command_target: bool) -> RawToken {
    RawToken {
        text: text.to_string(),
        line,
        class,
        is_command_target,
    }
}

fn fence_marker(trimmed: &str) -> Option<&'static str> {
    if trimmed.starts_with("```") {
        Some("```")
    } else if trimmed.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

/// A closing fence carries no info string
fn is_bare_fence(trimmed: &str, marker: &str) -> bool {
    let fence_char = marker.chars().next().unwrap_or('`');
    trimmed.trim_start_matches(fence_char).trim().is_empty()
}

/// Replace every match with spaces so byte offsets stay stable
fn blank_matches(re: &Regex, line: &str) -> String {
    re.replace_all(line, |caps: &regex::Captures<'_>| {
        " ".repeat(caps.get(0).map_or(0, |m| m.as_str().len()))
    })
    .into_owned()
}

/// Drop a shell prompt and list markers in front of a command
fn strip_command_prefix(line: &str) -> &str {
    let mut rest = line.trim_start();
    for prefix in ["$ ", "> ", "- ", "* ", "+ "] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped.trim_start();
        }
    }
    rest
}

fn starts_with_command(text: &str) -> bool {
    let first = strip_command_prefix(text).split_whitespace().next();
    first.is_some_and(|w| INTERPRETERS.contains(&w) || w == "uv" || w.starts_with("./"))
}

/// Collect script claims from a command line; segments split on `&&`, `||`, `;` and `|`
fn scan_command(line: &str, line_no: usize, tokens: &mut Vec<RawToken>) {
    let flattened = line.replace("&&", ";").replace("||", ";").replace('|', ";");
    for segment in flattened.split(';') {
        let mut words = strip_command_prefix(segment)
            .split_whitespace()
            .map(strip_quotes)
            .peekable();
        let Some(program) = words.next() else {
            continue;
        };

        let mut expect_target = true;
        if program.starts_with("./") {
            tokens.push(token(program, line_no, TokenClass::Command, true));
            expect_target = false;
        } else if program == "uv" {
            if words.peek() != Some(&"run") {
                continue;
            }
            words.next();
        } else if !INTERPRETERS.contains(&program) {
            continue;
        }

        for arg in words {
            if arg.starts_with('-') {
                continue;
            }
            let looks_like_path = arg.contains('/') || has_script_extension(arg);
            if expect_target {
                if looks_like_path && !is_template(arg) && !arg.contains("://") {
                    tokens.push(token(arg, line_no, TokenClass::Command, true));
                }
                expect_target = false;
            } else if arg.contains('/') && is_path_like(arg) && !is_absolute(arg) {
                tokens.push(token(arg, line_no, TokenClass::Command, false));
            }
        }
    }
}

fn has_script_extension(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    SCRIPT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn strip_quotes(word: &str) -> &str {
    word.trim_matches(|c| c == '"' || c == '\'')
}

fn strip_punctuation(word: &str) -> &str {
    word.trim_start_matches(['(', '"', '\''])
        .trim_end_matches([',', ';', ':', ')', '"', '\'', '.'])
}

fn is_template(word: &str) -> bool {
    word.contains(['*', '?', '{', '}', '<', '>', '$', '~', '|', '[', ']'])
}

fn is_absolute(word: &str) -> bool {
    word.starts_with('/') || word.starts_with('\\')
}

/// Heuristic shape check for code span and argument tokens
pub fn is_path_like(word: &str) -> bool {
    if word.len() < 3 || !word.contains('/') || word.contains("://") || is_template(word) {
        return false;
    }
    if word.contains("//") || word.starts_with('@') {
        return false;
    }
    word.chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '/'))
}

/// Normalise a link target; `None` for external links and anchors
fn clean_link_target(raw: &str) -> Option<String> {
    let target = raw.trim().trim_start_matches('<').trim_end_matches('>');
    if target.is_empty() || target.starts_with('#') || URL_SCHEME.is_match(target) {
        return None;
    }
    let end = target.find(['#', '?']).unwrap_or(target.len());
    let target = target[..end].replace("%20", " ");
    if target.is_empty() {
        None
    } else {
        Some(target)
    }
}
