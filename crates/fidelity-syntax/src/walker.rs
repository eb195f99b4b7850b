//! Depth-first traversal with overridable hooks.
//!
//! Each `visit_*` hook defaults to the matching `walk_*` function, which
//! recurses into the children. A walker that overrides only
//! [`SyntaxWalker::visit_token`] still sees every token of the tree. To stop
//! early, keep a flag in the walker and check it before recursing.

use rustc_hash::FxHashSet;
use text_size::TextSize;

use crate::element::{Element, NodeOrToken, SyntaxElement};
use crate::{
    SeparatedSyntaxList, SyntaxKind, SyntaxList, SyntaxNode, SyntaxNodeOrToken, SyntaxToken,
    Trivia, TriviaList,
};

/// Pre-order, left-to-right traversal over the tree.
///
/// A walker keeps its own state and is not meant to be shared between
/// concurrent traversals.
pub trait SyntaxWalker {
    fn visit_element(&mut self, element: &SyntaxElement) {
        walk_element(self, element);
    }

    fn visit_node(&mut self, node: &SyntaxNode) {
        walk_node(self, node);
    }

    fn visit_token(&mut self, token: &SyntaxToken) {
        walk_token(self, token);
    }

    fn visit_list(&mut self, list: &SyntaxList) {
        walk_list(self, list);
    }

    fn visit_separated_list(&mut self, list: &SeparatedSyntaxList) {
        walk_separated_list(self, list);
    }

    fn visit_trivia_list(&mut self, trivia: &TriviaList) {
        walk_trivia_list(self, trivia);
    }

    fn visit_trivia(&mut self, _trivia: Trivia<'_>) {}
}

pub fn walk_element<W: SyntaxWalker + ?Sized>(walker: &mut W, element: &SyntaxElement) {
    match element {
        SyntaxElement::Token(token) => walker.visit_token(token),
        SyntaxElement::Node(node) => walker.visit_node(node),
        SyntaxElement::List(list) => walker.visit_list(list),
        SyntaxElement::SeparatedList(list) => walker.visit_separated_list(list),
    }
}

pub fn walk_node<W: SyntaxWalker + ?Sized>(walker: &mut W, node: &SyntaxNode) {
    for child in node.children() {
        walker.visit_element(child);
    }
}

/// Visits the leading trivia, then the trailing trivia.
pub fn walk_token<W: SyntaxWalker + ?Sized>(walker: &mut W, token: &SyntaxToken) {
    walker.visit_trivia_list(token.leading_trivia());
    walker.visit_trivia_list(token.trailing_trivia());
}

pub fn walk_list<W: SyntaxWalker + ?Sized>(walker: &mut W, list: &SyntaxList) {
    for node in list {
        walker.visit_node(node);
    }
}

pub fn walk_separated_list<W: SyntaxWalker + ?Sized>(walker: &mut W, list: &SeparatedSyntaxList) {
    for slot in list.elements() {
        match slot {
            NodeOrToken::Node(node) => walker.visit_node(node),
            NodeOrToken::Token(separator) => walker.visit_token(separator),
        }
    }
}

pub fn walk_trivia_list<W: SyntaxWalker + ?Sized>(walker: &mut W, trivia: &TriviaList) {
    for piece in trivia {
        walker.visit_trivia(piece);
    }
}

/// Whether a [`PositionTrackingWalker`] descends into a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Descend {
    Into,
    Skip,
}

/// Walker that knows the absolute start of everything it visits.
///
/// `on_element` is called for each node before its children and for each
/// token. Returning [`Descend::Skip`] for a node skips its subtree while the
/// position still advances past it.
pub struct PositionTrackingWalker<F> {
    position: TextSize,
    on_element: F,
}

impl<F> PositionTrackingWalker<F>
where
    F: FnMut(SyntaxNodeOrToken<'_>, TextSize) -> Descend,
{
    pub fn new(on_element: F) -> Self {
        Self::starting_at(TextSize::new(0), on_element)
    }

    /// Starts counting at `position`, for walks over a subtree of a larger
    /// tree.
    pub fn starting_at(position: TextSize, on_element: F) -> Self {
        Self { position, on_element }
    }

    pub fn position(&self) -> TextSize {
        self.position
    }

    /// Advances past `element` without visiting it.
    pub fn skip(&mut self, element: &impl Element) {
        self.position += element.full_width();
    }
}

impl<F> SyntaxWalker for PositionTrackingWalker<F>
where
    F: FnMut(SyntaxNodeOrToken<'_>, TextSize) -> Descend,
{
    fn visit_node(&mut self, node: &SyntaxNode) {
        match (self.on_element)(NodeOrToken::Node(node), self.position) {
            Descend::Into => walk_node(self, node),
            Descend::Skip => self.skip(node),
        }
    }

    fn visit_token(&mut self, token: &SyntaxToken) {
        (self.on_element)(NodeOrToken::Token(token), self.position);
        self.skip(token);
    }
}

/// Collects the distinct texts of every identifier token. Trivia is ignored.
#[derive(Debug, Default)]
pub struct IdentifierCollector {
    identifiers: FxHashSet<Box<str>>,
}

impl IdentifierCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(root: &SyntaxNode) -> FxHashSet<Box<str>> {
        let mut collector = Self::new();
        collector.visit_node(root);
        collector.identifiers
    }

    pub fn contains(&self, name: &str) -> bool {
        self.identifiers.contains(name)
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn into_set(self) -> FxHashSet<Box<str>> {
        self.identifiers
    }
}

impl SyntaxWalker for IdentifierCollector {
    fn visit_token(&mut self, token: &SyntaxToken) {
        if token.kind() == SyntaxKind::IDENTIFIER && !self.identifiers.contains(token.text()) {
            self.identifiers.insert(token.text().into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;
    use crate::TriviaKind;

    fn token(kind: SyntaxKind, text: &str) -> SyntaxElement {
        let space = TriviaList::new([Trivia::new(TriviaKind::Whitespace, " ")]);
        SyntaxToken::new(kind, text, TriviaList::empty(), space).into()
    }

    fn name(text: &str) -> SyntaxElement {
        SyntaxNode::new(NAME_EXPRESSION, [token(IDENTIFIER, text)]).into()
    }

    /// `a = 1; b = a + 2;`
    fn program() -> SyntaxNode {
        let first = SyntaxNode::new(
            ASSIGNMENT_EXPRESSION,
            [
                name("a"),
                token(EQUALS, "="),
                SyntaxNode::new(LITERAL_EXPRESSION, [token(NUMERIC_LITERAL, "1")]).into(),
            ],
        );
        let sum = SyntaxNode::new(
            BINARY_EXPRESSION,
            [
                name("a"),
                token(PLUS, "+"),
                SyntaxNode::new(LITERAL_EXPRESSION, [token(NUMERIC_LITERAL, "2")]).into(),
            ],
        );
        let second =
            SyntaxNode::new(ASSIGNMENT_EXPRESSION, [name("b"), token(EQUALS, "="), sum.into()]);
        let statements = [first, second].map(|expression| {
            SyntaxNode::new(EXPRESSION_STATEMENT, [expression.into(), token(SEMICOLON, ";")])
        });
        SyntaxNode::new(SOURCE_UNIT, [SyntaxList::new(statements).into()])
    }

    #[test]
    fn token_hook_alone_sees_every_identifier() {
        let root = program();
        assert_eq!(root.full_text(), "a = 1 ; b = a + 2 ; ");

        let identifiers = IdentifierCollector::collect(&root);
        let mut identifiers: Vec<_> = identifiers.iter().map(|it| &**it).collect();
        identifiers.sort_unstable();
        assert_eq!(identifiers, ["a", "b"]);
    }

    #[derive(Default)]
    struct Counter {
        nodes: usize,
        lists: usize,
        trivia: String,
        order: Vec<SyntaxKind>,
    }

    impl SyntaxWalker for Counter {
        fn visit_node(&mut self, node: &SyntaxNode) {
            self.nodes += 1;
            self.order.push(node.kind());
            walk_node(self, node);
        }

        fn visit_list(&mut self, list: &SyntaxList) {
            self.lists += 1;
            walk_list(self, list);
        }

        fn visit_trivia(&mut self, trivia: Trivia<'_>) {
            self.trivia.push_str(trivia.text());
        }
    }

    #[test]
    fn default_hooks_recurse_in_pre_order() {
        let root = program();
        let mut counter = Counter::default();
        counter.visit_node(&root);

        assert_eq!(counter.lists, 1);
        assert_eq!(counter.nodes, 11);
        assert_eq!(counter.trivia, " ".repeat(10));
        assert_eq!(
            &counter.order[..4],
            [SOURCE_UNIT, EXPRESSION_STATEMENT, ASSIGNMENT_EXPRESSION, NAME_EXPRESSION]
        );
    }

    #[test]
    fn position_tracking_with_skips() {
        let root = program();
        let mut seen = Vec::new();
        let mut walker = PositionTrackingWalker::new(|element, start| match element {
            NodeOrToken::Node(node) if node.kind() == BINARY_EXPRESSION => Descend::Skip,
            NodeOrToken::Node(_) => Descend::Into,
            NodeOrToken::Token(token) => {
                seen.push((token.text().to_owned(), u32::from(start)));
                Descend::Into
            }
        });
        walker.visit_node(&root);
        assert_eq!(walker.position(), root.full_width());
        drop(walker);

        let texts: Vec<_> = seen.iter().map(|(text, start)| (text.as_str(), *start)).collect();
        assert_eq!(
            texts,
            [("a", 0), ("=", 2), ("1", 4), (";", 6), ("b", 8), ("=", 10), (";", 18)]
        );
    }
}
