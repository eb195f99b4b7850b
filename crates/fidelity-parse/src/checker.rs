use fidelity_errors::Diagnostic;
use fidelity_syntax::SyntaxKind::*;
use fidelity_syntax::{
    Element as _, NodeOrToken, SeparatedSyntaxList, SyntaxElement, SyntaxNode, SyntaxToken,
    SyntaxWalker, walk_node,
};
use text_size::{TextRange, TextSize};

/// Reports constructs the parser accepts but the language forbids.
///
/// Runs over a finished tree and only reads it, so the same tree can be
/// checked any number of times.
#[derive(Debug, Default)]
pub struct GrammarChecker {
    position: TextSize,
    diagnostics: Vec<Diagnostic>,
}

impl GrammarChecker {
    pub fn check(root: &SyntaxNode) -> Vec<Diagnostic> {
        let mut checker = Self::default();
        checker.visit_node(root);
        checker.diagnostics
    }

    fn check_variable_declaration(&mut self, declaration: &SyntaxNode) {
        let is_const = declaration
            .children()
            .first()
            .and_then(SyntaxElement::as_token)
            .is_some_and(|keyword| keyword.kind() == CONST_KW);

        let mut offset = self.position;
        for child in declaration.children() {
            if let SyntaxElement::SeparatedList(declarators) = child {
                self.check_declarators(declarators, offset, is_const);
            }
            offset += child.full_width();
        }
    }

    fn check_declarators(&mut self, list: &SeparatedSyntaxList, start: TextSize, is_const: bool) {
        let mut offset = start;
        for slot in list.elements() {
            match slot {
                NodeOrToken::Node(declarator) => {
                    let initialized = declarator
                        .children()
                        .iter()
                        .any(|child| child.kind() == EQUALS_VALUE_CLAUSE);
                    if is_const && !initialized {
                        let range = significant_range(declarator.first_token(), offset);
                        self.diagnostics.push(Diagnostic::error(
                            "const declarations must be initialized",
                            range,
                        ));
                    }
                    offset += declarator.full_width();
                }
                NodeOrToken::Token(separator) => offset += separator.full_width(),
            }
        }

        if list.has_trailing_separator() {
            let index = list.count() - 1;
            if let Ok(separator) = list.separator_at(index) {
                let end = start + list.full_width();
                self.diagnostics.push(Diagnostic::error(
                    "trailing comma not allowed in variable declaration",
                    significant_range(Some(separator), end - separator.full_width()),
                ));
            }
        }
    }
}

/// Range of the significant text of `token`, which starts at `start` with its
/// trivia. Missing tokens map to an empty range at `start`.
fn significant_range(token: Option<&SyntaxToken>, start: TextSize) -> TextRange {
    match token {
        Some(token) => {
            TextRange::at(start + token.leading_trivia().full_width(), token.width())
        }
        None => TextRange::empty(start),
    }
}

impl SyntaxWalker for GrammarChecker {
    fn visit_node(&mut self, node: &SyntaxNode) {
        if node.kind() == VARIABLE_DECLARATION {
            self.check_variable_declaration(node);
        }
        walk_node(self, node);
    }

    fn visit_token(&mut self, token: &SyntaxToken) {
        self.position += token.full_width();
    }
}
