//! Bottom-up construction of trees from a stream of start/finish events.

use crate::element::{NodeOrToken, SyntaxElement};
use crate::{SeparatedSyntaxList, SyntaxKind, SyntaxList, SyntaxNode, SyntaxToken, TriviaList};

/// Builds a tree from nested `start_*`/`finish_*` calls.
///
/// Children of every open node share a single buffer, drained when the
/// node is finished. Misuse, such as an unbalanced `finish_*` call or a token
/// pushed directly into a plain list, panics.
pub struct TreeBuilder {
    opened: Vec<Opened>,
    children: Vec<SyntaxElement>,
}

#[derive(Debug, Clone, Copy)]
enum Opened {
    Node { kind: SyntaxKind, first_child: usize },
    List { first_child: usize },
    SeparatedList { first_child: usize },
}

impl Drop for TreeBuilder {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.opened.is_empty() {
            panic!("you should call `TreeBuilder::finish()`");
        }
    }
}

const DEFAULT_TREE_DEPTH: usize = 128;
const DEFAULT_CHILDREN_LEN: usize = 1024;

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            opened: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            children: Vec::with_capacity(DEFAULT_CHILDREN_LEN),
        }
    }

    /// Returns the most recently opened node or list.
    #[track_caller]
    fn last_opened(&self) -> Opened {
        *self.opened.last().expect("no opened nodes?")
    }

    /// Starts a new node of the given kind.
    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.opened.push(Opened::Node { kind, first_child: self.children.len() });
    }

    /// Finishes the most recently started node.
    #[track_caller]
    pub fn finish_node(&mut self) {
        let Opened::Node { kind, first_child } = self.last_opened() else {
            panic!("expected an opened node, found an opened list");
        };
        self.opened.pop();
        let node = SyntaxNode::new(kind, self.children.drain(first_child..));
        self.children.push(node.into());
    }

    /// Starts a list of nodes under the current node.
    #[track_caller]
    pub fn start_list(&mut self) {
        self.expect_last_opened_node();
        self.opened.push(Opened::List { first_child: self.children.len() });
    }

    /// Finishes the most recently started list.
    #[track_caller]
    pub fn finish_list(&mut self) {
        let Opened::List { first_child } = self.last_opened() else {
            panic!("expected an opened list");
        };
        self.opened.pop();
        let list: SyntaxList = self
            .children
            .drain(first_child..)
            .map(|child| match child {
                SyntaxElement::Node(node) => node,
                other => panic!("lists hold nodes only, found {other:?}"),
            })
            .collect();
        self.children.push(list.into());
    }

    /// Starts a list of nodes interleaved with separator tokens.
    #[track_caller]
    pub fn start_separated_list(&mut self) {
        self.expect_last_opened_node();
        self.opened.push(Opened::SeparatedList { first_child: self.children.len() });
    }

    /// Finishes the most recently started separated list.
    #[track_caller]
    pub fn finish_separated_list(&mut self) {
        let Opened::SeparatedList { first_child } = self.last_opened() else {
            panic!("expected an opened separated list");
        };
        self.opened.pop();
        let slots = self.children.drain(first_child..).map(|child| match child {
            SyntaxElement::Node(node) => NodeOrToken::Node(node),
            SyntaxElement::Token(token) => NodeOrToken::Token(token),
            other => panic!("separated lists hold nodes and tokens only, found {other:?}"),
        });
        let list = SeparatedSyntaxList::new(slots.collect::<Vec<_>>())
            .unwrap_or_else(|err| panic!("malformed separated list: {err}"));
        self.children.push(list.into());
    }

    /// Adds a token with its leading and trailing trivia.
    #[track_caller]
    pub fn token(
        &mut self,
        kind: SyntaxKind,
        text: &str,
        leading_trivia: TriviaList,
        trailing_trivia: TriviaList,
    ) {
        self.push_token(SyntaxToken::new(kind, text, leading_trivia, trailing_trivia));
    }

    /// Adds an already built token.
    #[track_caller]
    pub fn push_token(&mut self, token: SyntaxToken) {
        if let Opened::List { .. } = self.last_opened() {
            panic!("cannot add {token:?} to a list of nodes");
        }
        self.children.push(token.into());
    }

    /// Adds an already built node, sharing it with whatever tree it came from.
    #[track_caller]
    pub fn push_node(&mut self, node: SyntaxNode) {
        self.last_opened();
        self.children.push(node.into());
    }

    #[track_caller]
    fn expect_last_opened_node(&self) {
        match self.last_opened() {
            Opened::Node { .. } => {}
            Opened::List { .. } | Opened::SeparatedList { .. } => {
                panic!("expected an opened node, found an opened list")
            }
        }
    }

    /// Finishes building and returns the root node.
    #[track_caller]
    pub fn finish(mut self) -> SyntaxNode {
        assert!(self.opened.is_empty(), "unfinished nodes: {:?}", self.opened);
        let mut children = std::mem::take(&mut self.children);
        match (children.pop(), children.is_empty()) {
            (Some(SyntaxElement::Node(root)), true) => root,
            _ => panic!("a tree must have exactly one root node"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;
    use crate::element::Element as _;
    use crate::{Trivia, TriviaKind};

    fn space() -> TriviaList {
        TriviaList::new([Trivia::new(TriviaKind::Whitespace, " ")])
    }

    #[test]
    fn builds_nested_lists() {
        let mut builder = TreeBuilder::new();
        builder.start_node(PARAMETER_LIST);
        builder.token(OPEN_PAREN, "(", TriviaList::empty(), TriviaList::empty());
        builder.start_separated_list();
        for (i, name) in ["a", "b"].into_iter().enumerate() {
            if i > 0 {
                builder.token(COMMA, ",", TriviaList::empty(), space());
            }
            builder.start_node(PARAMETER);
            builder.token(IDENTIFIER, name, TriviaList::empty(), TriviaList::empty());
            builder.finish_node();
        }
        builder.finish_separated_list();
        builder.token(CLOSE_PAREN, ")", TriviaList::empty(), TriviaList::empty());
        builder.finish_node();

        let root = builder.finish();
        assert_eq!(root.kind(), PARAMETER_LIST);
        assert_eq!(root.full_text(), "(a, b)");
        assert_eq!(root.child_count(), 3);
        let parameters = root.children()[1].as_separated_list().unwrap();
        assert_eq!(parameters.count(), 2);
        assert!(!parameters.has_trailing_separator());
    }

    #[test]
    fn reuses_existing_subtrees() {
        let mut builder = TreeBuilder::new();
        builder.start_node(NAME_EXPRESSION);
        builder.token(IDENTIFIER, "x", TriviaList::empty(), TriviaList::empty());
        builder.finish_node();
        let name = builder.finish();

        let mut builder = TreeBuilder::new();
        builder.start_node(BLOCK);
        builder.start_list();
        builder.push_node(name.clone());
        builder.push_node(name.clone());
        builder.finish_list();
        builder.finish_node();
        let block = builder.finish();

        let list = block.children()[0].as_list().unwrap();
        assert!(list.node_at(1).unwrap().ptr_eq(&name));
        assert_eq!(block.full_text(), "xx");
    }

    #[test]
    #[should_panic(expected = "cannot add")]
    fn tokens_are_rejected_in_plain_lists() {
        let mut builder = TreeBuilder::new();
        builder.start_node(BLOCK);
        builder.start_list();
        builder.token(SEMICOLON, ";", TriviaList::empty(), TriviaList::empty());
    }

    #[test]
    #[should_panic(expected = "TreeBuilder::finish")]
    fn unfinished_builder_panics_on_drop() {
        let mut builder = TreeBuilder::new();
        builder.start_node(BLOCK);
        drop(builder);
    }
}
