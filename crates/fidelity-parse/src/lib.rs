//! Recursive-descent parser producing full-fidelity syntax trees.
//!
//! The parser never fails: unexpected tokens become skipped-text trivia and
//! absent tokens become zero-width tokens, each with a diagnostic, so the tree
//! always reproduces the input exactly.

use std::fmt::Write as _;

use fidelity_errors::Diagnostic;
use fidelity_syntax::{Element as _, NodeOrToken, SyntaxElement, SyntaxNode, SyntaxToken};
use text_size::{TextRange, TextSize};

mod checker;
mod grammar;
mod options;
mod parser;
mod token_set;

pub use checker::GrammarChecker;
pub use options::ParseOptions;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parse {
    root: SyntaxNode,
    diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Tokenizer and parser diagnostics, ordered by position.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Indented dump of the tree with absolute ranges, followed by the
    /// diagnostics.
    pub fn debug_tree(&self) -> String {
        let mut out = String::new();
        write_node(&mut out, &self.root, TextSize::new(0), 0);
        for diagnostic in &self.diagnostics {
            writeln!(out, "error@{:?}: {}", diagnostic.range(), diagnostic.message()).unwrap();
        }
        out
    }
}

pub fn parse(text: &str, options: &ParseOptions) -> Parse {
    let _span = tracing::debug_span!("parse", len = text.len()).entered();

    let mut p = parser::Parser::new(text, options);
    grammar::source_unit(&mut p);
    let (root, diagnostics) = p.build_tree();

    tracing::debug!(diagnostics = diagnostics.len(), "parsed source unit");
    Parse { root, diagnostics }
}

fn write_node(out: &mut String, node: &SyntaxNode, start: TextSize, depth: usize) -> TextSize {
    let range = TextRange::at(start, node.full_width());
    writeln!(out, "{:indent$}{:?}@{range:?}", "", node.kind(), indent = depth * 2).unwrap();
    let mut offset = start;
    for child in node.children() {
        offset = write_child(out, child, offset, depth + 1);
    }
    range.end()
}

fn write_child(out: &mut String, child: &SyntaxElement, start: TextSize, depth: usize) -> TextSize {
    let nested = match child {
        SyntaxElement::Node(node) => return write_node(out, node, start, depth),
        SyntaxElement::Token(token) => return write_token(out, token, start, depth),
        SyntaxElement::List(list) => list.iter().map(NodeOrToken::Node).collect::<Vec<_>>(),
        SyntaxElement::SeparatedList(list) => list.elements().collect(),
    };

    let range = TextRange::at(start, child.full_width());
    writeln!(out, "{:indent$}{:?}@{range:?}", "", child.kind(), indent = depth * 2).unwrap();
    let mut offset = start;
    for slot in nested {
        offset = match slot {
            NodeOrToken::Node(node) => write_node(out, node, offset, depth + 1),
            NodeOrToken::Token(token) => write_token(out, token, offset, depth + 1),
        };
    }
    range.end()
}

fn write_token(out: &mut String, token: &SyntaxToken, start: TextSize, depth: usize) -> TextSize {
    let indent = depth * 2;
    let range = TextRange::at(start + token.leading_trivia().full_width(), token.width());
    if token.is_zero_width() {
        writeln!(out, "{:indent$}{:?}@{range:?} missing", "", token.kind()).unwrap();
    } else {
        writeln!(out, "{:indent$}{:?}@{range:?} {:?}", "", token.kind(), token.text()).unwrap();
    }
    for trivia in token.leading_trivia() {
        writeln!(out, "{:indent$}  < {:?} {:?}", "", trivia.trivia_kind(), trivia.text()).unwrap();
    }
    for trivia in token.trailing_trivia() {
        writeln!(out, "{:indent$}  > {:?} {:?}", "", trivia.trivia_kind(), trivia.text()).unwrap();
    }
    range.end() + token.trailing_trivia().full_width()
}
