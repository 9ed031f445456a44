//! Script languages, grammars and entry point detection

use tree_sitter::{Language, Node};

/// Languages the dry-run check understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptLanguage {
    Python,
    Shell,
    JavaScript,
}

impl ScriptLanguage {
    pub fn name(self) -> &'static str {
        match self {
            ScriptLanguage::Python => "Python",
            ScriptLanguage::Shell => "shell",
            ScriptLanguage::JavaScript => "JavaScript",
        }
    }

    pub fn grammar(self) -> Language {
        match self {
            ScriptLanguage::Python => tree_sitter_python::LANGUAGE.into(),
            ScriptLanguage::Shell => tree_sitter_bash::LANGUAGE.into(),
            ScriptLanguage::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        }
    }

    /// Infer the language from the file extension, falling back to the shebang
    pub fn detect(path: &str, source: &[u8]) -> Option<Self> {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Self::from_extension(ext),
            _ => Self::from_shebang(source),
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "py" | "pyw" => Some(ScriptLanguage::Python),
            "sh" | "bash" | "zsh" => Some(ScriptLanguage::Shell),
            "js" | "mjs" | "cjs" => Some(ScriptLanguage::JavaScript),
            _ => None,
        }
    }

    fn from_shebang(source: &[u8]) -> Option<Self> {
        let first_line = source.split(|b| *b == b'\n').next()?;
        let line = std::str::from_utf8(first_line).ok()?.strip_prefix("#!")?;
        let mut words = line.split_whitespace();
        let mut program = words.next()?.rsplit('/').next()?;
        if program == "env" {
            program = words.find(|w| !w.starts_with('-'))?;
        }
        Self::from_interpreter(program)
    }

    fn from_interpreter(program: &str) -> Option<Self> {
        if program.starts_with("python") {
            return Some(ScriptLanguage::Python);
        }
        match program {
            "sh" | "bash" | "zsh" | "dash" | "ksh" => Some(ScriptLanguage::Shell),
            "node" | "nodejs" | "deno" | "bun" => Some(ScriptLanguage::JavaScript),
            _ => None,
        }
    }

    /// Whether the top level of the tree holds something a host can invoke
    pub fn has_entry_point(self, root: Node<'_>, source: &[u8]) -> bool {
        let mut cursor = root.walk();
        root.named_children(&mut cursor).any(|node| match self {
            ScriptLanguage::Python => python_entry(node, source),
            ScriptLanguage::Shell => shell_entry(node),
            ScriptLanguage::JavaScript => javascript_entry(node),
        })
    }
}

fn python_entry(node: Node<'_>, source: &[u8]) -> bool {
    match node.kind() {
        "function_definition" | "class_definition" | "decorated_definition" => true,
        "if_statement" => node
            .child_by_field_name("condition")
            .and_then(|c| c.utf8_text(source).ok())
            .is_some_and(|text| text.contains("__name__") && text.contains("__main__")),
        "expression_statement" => first_named_kind(node) == Some("call"),
        _ => false,
    }
}

fn shell_entry(node: Node<'_>) -> bool {
    !matches!(
        node.kind(),
        "comment" | "variable_assignment" | "variable_assignments"
    )
}

fn javascript_entry(node: Node<'_>) -> bool {
    match node.kind() {
        "function_declaration"
        | "generator_function_declaration"
        | "class_declaration"
        | "export_statement" => true,
        "expression_statement" => matches!(
            first_named_kind(node),
            Some("call_expression" | "await_expression")
        ),
        _ => false,
    }
}

fn first_named_kind(node: Node<'_>) -> Option<&'static str> {
    node.named_child(0).map(|child| child.kind())
}
