//! Writes syntax trees back out through a [`TextWriter`].
//!
//! [`Emitter::emit_full_text`] reproduces the parsed source byte for byte.
//! [`Emitter::emit_tree`] writes an indented outline of the tree using the
//! indentation and line terminator from [`FormattingOptions`].

use std::io;

use fidelity_syntax::{
    Element, SeparatedSyntaxList, SyntaxList, SyntaxNode, SyntaxToken, SyntaxWalker, TriviaKind,
    walk_list, walk_node, walk_separated_list,
};
use text_size::{TextRange, TextSize};

mod options;
mod writer;

pub use options::FormattingOptions;
pub use writer::{IoWriter, StringWriter, TextWriter};

pub struct Emitter<'a, W> {
    options: &'a FormattingOptions,
    writer: W,
}

impl<'a, W: TextWriter> Emitter<'a, W> {
    pub fn new(options: &'a FormattingOptions, writer: W) -> Self {
        Self { options, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    pub fn emit_full_text(&mut self, root: &SyntaxNode) -> io::Result<()> {
        for token in root.tokens() {
            self.writer.write(token.leading_trivia().text())?;
            self.writer.write(token.text())?;
            self.writer.write(token.trailing_trivia().text())?;
        }
        self.writer.close()
    }

    pub fn emit_tree(&mut self, root: &SyntaxNode) -> io::Result<()> {
        let mut dumper = TreeDumper {
            options: self.options,
            writer: &mut self.writer,
            position: TextSize::new(0),
            depth: 0,
            error: None,
        };
        dumper.visit_node(root);
        if let Some(err) = dumper.error {
            return Err(err);
        }
        self.writer.close()
    }
}

/// Returns `true` if a blank line separates `token` from `previous`.
///
/// The trailing trivia of `previous` and the leading trivia of `token` are
/// inspected as one run. With no previous token the run starts at the
/// beginning of a line.
pub fn blank_line_before(token: &SyntaxToken, previous: Option<&SyntaxToken>) -> bool {
    let trivia = match previous {
        Some(previous) => previous.trailing_trivia().concat(token.leading_trivia()),
        None => token.leading_trivia().clone(),
    };

    let mut at_line_start = previous.is_none();
    for piece in &trivia {
        match piece.trivia_kind() {
            TriviaKind::Newline if at_line_start => return true,
            TriviaKind::Newline => at_line_start = true,
            TriviaKind::Whitespace => {}
            _ => at_line_start = false,
        }
    }
    false
}

struct TreeDumper<'a, W> {
    options: &'a FormattingOptions,
    writer: W,
    position: TextSize,
    depth: u32,
    error: Option<io::Error>,
}

impl<W: TextWriter> TreeDumper<'_, W> {
    fn line(&mut self, element: &impl Element, text: Option<&str>) {
        if self.error.is_some() {
            return;
        }
        let indent = self.options.indentation(self.depth * self.options.indent_spaces);
        let range = TextRange::at(self.position, element.full_width());
        let line = match text {
            Some(text) => format!("{indent}{:?}@{range:?} {text:?}", element.kind()),
            None => format!("{indent}{:?}@{range:?}", element.kind()),
        };
        if let Err(err) = self.writer.write_line(&line) {
            self.error = Some(err);
        }
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }
}

impl<W: TextWriter> SyntaxWalker for TreeDumper<'_, W> {
    fn visit_node(&mut self, node: &SyntaxNode) {
        self.line(node, None);
        self.nested(|this| walk_node(this, node));
    }

    fn visit_list(&mut self, list: &SyntaxList) {
        self.line(list, None);
        self.nested(|this| walk_list(this, list));
    }

    fn visit_separated_list(&mut self, list: &SeparatedSyntaxList) {
        self.line(list, None);
        self.nested(|this| walk_separated_list(this, list));
    }

    fn visit_token(&mut self, token: &SyntaxToken) {
        if token.is_zero_width() {
            self.line(token, Some(""));
        } else {
            self.line(token, Some(token.text()));
        }
        self.position += token.full_width();
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use fidelity_parse::{ParseOptions, parse};

    use super::*;

    fn tokens(text: &str) -> Vec<SyntaxToken> {
        let parse = parse(text, &ParseOptions::default());
        parse.root().tokens().cloned().collect()
    }

    #[test]
    fn full_text_round_trips() {
        let text = "let a = 1 // one\r\n\r\n  @ if (a) { f(a,) }\n/* open";
        let parse = parse(text, &ParseOptions::default());

        let options = FormattingOptions::default();
        let mut emitter = Emitter::new(&options, StringWriter::new(options.new_line.clone()));
        emitter.emit_full_text(parse.root()).unwrap();
        assert_eq!(emitter.into_writer().into_string(), text);
    }

    #[test]
    fn tree_outline_honors_options() {
        let parse = parse("f(x);", &ParseOptions::default());
        let options = FormattingOptions {
            indent_spaces: 2,
            new_line: "\n".to_owned(),
            ..FormattingOptions::default()
        };
        let mut writer = StringWriter::new(options.new_line.clone());
        Emitter::new(&options, &mut writer).emit_tree(parse.root()).unwrap();
        expect![[r#"
            SOURCE_UNIT@0..5
              LIST@0..5
                EXPRESSION_STATEMENT@0..5
                  INVOCATION_EXPRESSION@0..4
                    NAME_EXPRESSION@0..1
                      IDENTIFIER@0..1 "f"
                    ARGUMENT_LIST@1..4
                      OPEN_PAREN@1..2 "("
                      SEPARATED_LIST@2..3
                        NAME_EXPRESSION@2..3
                          IDENTIFIER@2..3 "x"
                      CLOSE_PAREN@3..4 ")"
                  SEMICOLON@4..5 ";"
              EOF@5..5 ""
        "#]]
        .assert_eq(writer.as_str());
    }

    #[test]
    fn blank_lines_span_both_trivia_runs() {
        let tokens = tokens("a\n\nb\n// c\nd\n  \n e");
        let names: Vec<_> = tokens.iter().map(SyntaxToken::text).collect();
        assert_eq!(names, ["a", "b", "d", "e", ""]);

        assert!(!blank_line_before(&tokens[0], None));
        assert!(blank_line_before(&tokens[1], Some(&tokens[0])));
        assert!(!blank_line_before(&tokens[2], Some(&tokens[1])));
        assert!(blank_line_before(&tokens[3], Some(&tokens[2])));
    }
}
