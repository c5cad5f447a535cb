//! Syntax colouring for code samples.
//!
//! Code is parsed with tree-sitter at build time and its tokens are wrapped in
//! `span.tok-*` elements styled by the page stylesheet. Only markup is added:
//! stripping the spans and unescaping gives back the source byte for byte.
//!
//! Languages without a bundled grammar, and sources the parser rejects, render
//! as plain escaped text.

use maud::{Markup, html};
use tree_sitter::{Node, Parser};

/// Languages with a bundled grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    Rust,
    TypeScript,
    Go,
}

impl Language {
    /// Match a code block's `language` tag, ignoring case.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Some(Language::Python),
            "rust" | "rs" => Some(Language::Rust),
            "typescript" | "ts" | "javascript" | "js" => Some(Language::TypeScript),
            "go" | "golang" => Some(Language::Go),
            _ => None,
        }
    }

    fn grammar(self) -> tree_sitter::Language {
        match self {
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Go => tree_sitter_go::LANGUAGE.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenClass {
    Keyword,
    String,
    Comment,
    Number,
    Constant,
    Type,
    Function,
}

impl TokenClass {
    fn css_class(self) -> &'static str {
        match self {
            TokenClass::Keyword => "tok-keyword",
            TokenClass::String => "tok-string",
            TokenClass::Comment => "tok-comment",
            TokenClass::Number => "tok-number",
            TokenClass::Constant => "tok-constant",
            TokenClass::Type => "tok-type",
            TokenClass::Function => "tok-function",
        }
    }
}

/// A classified byte range of the source.
#[derive(Debug)]
struct Token {
    start: usize,
    end: usize,
    class: TokenClass,
}

/// Render `code` with token spans, or as plain text when it cannot be parsed.
pub fn highlight(language: Option<&str>, code: &str) -> Markup {
    let tokens = language
        .and_then(Language::from_tag)
        .map(|lang| tokenize(lang, code))
        .unwrap_or_default();

    let mut segments: Vec<(Option<TokenClass>, &str)> = Vec::with_capacity(tokens.len() * 2 + 1);
    let mut pos = 0;
    for token in &tokens {
        if token.start < pos {
            continue;
        }
        let (Some(before), Some(text)) = (code.get(pos..token.start), code.get(token.start..token.end))
        else {
            continue;
        };
        segments.push((None, before));
        segments.push((Some(token.class), text));
        pos = token.end;
    }
    segments.push((None, code.get(pos..).unwrap_or_default()));

    html! {
        @for (class, text) in segments {
            @match class {
                Some(class) => { span class=(class.css_class()) { (text) } },
                None => { (text) },
            }
        }
    }
}

/// Tokens in source order, never overlapping.
fn tokenize(language: Language, code: &str) -> Vec<Token> {
    let mut parser = Parser::new();
    if let Err(err) = parser.set_language(&language.grammar()) {
        tracing::warn!(?language, error = %err, "grammar unavailable, code left plain");
        return Vec::new();
    }
    let Some(tree) = parser.parse(code, None) else {
        tracing::warn!(?language, "parse failed, code left plain");
        return Vec::new();
    };

    let mut tokens = Vec::new();
    collect_tokens(tree.root_node(), &mut tokens);
    tokens
}

fn collect_tokens(node: Node, tokens: &mut Vec<Token>) {
    if let Some(class) = node_class(&node) {
        if node.end_byte() > node.start_byte() {
            tokens.push(Token {
                start: node.start_byte(),
                end: node.end_byte(),
                class,
            });
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_tokens(child, tokens);
    }
}

fn node_class(node: &Node) -> Option<TokenClass> {
    let kind = node.kind();
    // Whole-node tokens; their children are not visited.
    match kind {
        "comment" | "line_comment" | "block_comment" => return Some(TokenClass::Comment),
        "string"
        | "string_literal"
        | "raw_string_literal"
        | "char_literal"
        | "interpreted_string_literal"
        | "rune_literal"
        | "template_string" => return Some(TokenClass::String),
        "boolean_literal" => return Some(TokenClass::Constant),
        _ => {}
    }
    if node.child_count() > 0 {
        return None;
    }
    if !node.is_named() {
        let is_word = !kind.is_empty() && kind.chars().all(|c| c.is_ascii_alphabetic() || c == '_');
        return is_word.then_some(TokenClass::Keyword);
    }
    match kind {
        "integer" | "float" | "integer_literal" | "float_literal" | "int_literal"
        | "imaginary_literal" | "number" => Some(TokenClass::Number),
        "true" | "false" | "none" | "nil" | "null" | "undefined" => Some(TokenClass::Constant),
        "type_identifier" | "primitive_type" => Some(TokenClass::Type),
        "mutable_specifier" | "self" | "crate" | "super" => Some(TokenClass::Keyword),
        "identifier" | "field_identifier" | "property_identifier" if names_definition(node) => {
            Some(TokenClass::Function)
        }
        _ => None,
    }
}

/// Whether `node` is the name of a function, method, or class definition.
fn names_definition(node: &Node) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    matches!(
        parent.kind(),
        "function_definition"
            | "class_definition"
            | "function_item"
            | "function_declaration"
            | "method_declaration"
            | "method_definition"
    ) && parent
        .child_by_field_name("name")
        .is_some_and(|name| name.id() == node.id())
}
