//! Deep position lookups.
//!
//! Elements store no absolute positions. These helpers descend from a root,
//! threading the running start offset down the tree, and report absolute
//! starts relative to the root they were given.

use text_size::{TextRange, TextSize};

use crate::element::{Element, NodeOrToken, SyntaxElement};
use crate::{SyntaxNode, SyntaxResult, SyntaxToken};

/// An element together with its absolute start.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Positioned<T> {
    pub start: TextSize,
    pub element: T,
}

impl<T: Element> Positioned<T> {
    pub fn range(&self) -> TextRange {
        TextRange::at(self.start, self.element.full_width())
    }
}

/// Returns the token whose full span contains `position`.
///
/// The token at a boundary is the one that starts there, except at the end of
/// the root where the last non-empty token is returned.
pub fn token_at_position(
    root: &SyntaxNode,
    position: TextSize,
) -> SyntaxResult<Positioned<&SyntaxToken>> {
    descend(root, position, |_| {})
}

/// Returns every node on the path from `root` down to the token at `position`,
/// outermost first.
pub fn ancestors_at_position(
    root: &SyntaxNode,
    position: TextSize,
) -> SyntaxResult<Vec<Positioned<&SyntaxNode>>> {
    let mut ancestors = Vec::new();
    descend(root, position, |node| ancestors.push(node))?;
    Ok(ancestors)
}

/// Returns the innermost node spanning `position` that matches `pred`.
pub fn innermost_node_at_position(
    root: &SyntaxNode,
    position: TextSize,
    mut pred: impl FnMut(&SyntaxNode) -> bool,
) -> SyntaxResult<Option<Positioned<&SyntaxNode>>> {
    let ancestors = ancestors_at_position(root, position)?;
    Ok(ancestors.into_iter().rev().find(|node| pred(node.element)))
}

fn descend<'a>(
    root: &'a SyntaxNode,
    position: TextSize,
    mut on_node: impl FnMut(Positioned<&'a SyntaxNode>),
) -> SyntaxResult<Positioned<&'a SyntaxToken>> {
    let mut node = root;
    let mut start = TextSize::new(0);

    loop {
        on_node(Positioned { start, element: node });
        let (child, offset) = node.child_containing_position(position - start)?;
        start += offset;

        let child = match child {
            SyntaxElement::Token(token) => NodeOrToken::Token(token),
            SyntaxElement::Node(node) => NodeOrToken::Node(node),
            SyntaxElement::List(list) => {
                let (node, offset) = list.node_containing_position(position - start)?;
                start += offset;
                NodeOrToken::Node(node)
            }
            SyntaxElement::SeparatedList(list) => {
                let (slot, offset) = list.element_containing_position(position - start)?;
                start += offset;
                slot
            }
        };

        match child {
            NodeOrToken::Token(token) => return Ok(Positioned { start, element: token }),
            NodeOrToken::Node(child) => node = child,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::{self, *};
    use crate::{SeparatedSyntaxList, SyntaxError, SyntaxList, Trivia, TriviaKind, TriviaList};

    fn token(kind: SyntaxKind, text: &str, trailing: &str) -> SyntaxToken {
        let trailing = match trailing {
            "" => TriviaList::empty(),
            space => TriviaList::new([Trivia::new(TriviaKind::Whitespace, space)]),
        };
        SyntaxToken::new(kind, text, TriviaList::empty(), trailing)
    }

    fn name(text: &str) -> SyntaxNode {
        SyntaxNode::new(NAME_EXPRESSION, [token(IDENTIFIER, text, "").into()])
    }

    /// `f(a, b);` as a statement list inside a source unit.
    fn tree() -> SyntaxNode {
        let arguments = SeparatedSyntaxList::new([
            NodeOrToken::Node(name("a")),
            NodeOrToken::Token(token(COMMA, ",", " ")),
            NodeOrToken::Node(name("b")),
        ])
        .unwrap();
        let argument_list = SyntaxNode::new(
            ARGUMENT_LIST,
            [
                token(OPEN_PAREN, "(", "").into(),
                arguments.into(),
                token(CLOSE_PAREN, ")", "").into(),
            ],
        );
        let call = SyntaxNode::new(INVOCATION_EXPRESSION, [name("f").into(), argument_list.into()]);
        let statement =
            SyntaxNode::new(EXPRESSION_STATEMENT, [call.into(), token(SEMICOLON, ";", "").into()]);
        SyntaxNode::new(
            SOURCE_UNIT,
            [SyntaxList::new([statement]).into(), SyntaxToken::missing(EOF).into()],
        )
    }

    #[test]
    fn tokens_at_every_position() {
        let root = tree();
        assert_eq!(root.full_text(), "f(a, b);");

        let found: Vec<_> = (0..=8u32)
            .map(|p| {
                let token = token_at_position(&root, p.into()).unwrap();
                (token.element.text(), u32::from(token.start))
            })
            .collect();
        assert_eq!(
            found,
            [
                ("f", 0),
                ("(", 1),
                ("a", 2),
                (",", 3),
                (",", 3),
                ("b", 5),
                (")", 6),
                (";", 7),
                (";", 7),
            ]
        );
    }

    #[test]
    fn ancestors_are_outermost_first() {
        let root = tree();
        let ancestors = ancestors_at_position(&root, TextSize::new(5)).unwrap();
        let path: Vec<_> =
            ancestors.iter().map(|it| (it.element.kind(), u32::from(it.start))).collect();
        assert_eq!(
            path,
            [
                (SOURCE_UNIT, 0),
                (EXPRESSION_STATEMENT, 0),
                (INVOCATION_EXPRESSION, 0),
                (ARGUMENT_LIST, 1),
                (NAME_EXPRESSION, 5),
            ]
        );
        assert_eq!(ancestors[3].range(), TextRange::new(TextSize::new(1), TextSize::new(7)));

        let call = innermost_node_at_position(&root, TextSize::new(2), |node| {
            node.kind() == INVOCATION_EXPRESSION
        });
        assert_eq!(call.map(|it| it.map(|it| it.start)), Ok(Some(TextSize::new(0))));
    }

    #[test]
    fn empty_source_resolves_to_eof() {
        let root = SyntaxNode::new(
            SOURCE_UNIT,
            [SyntaxList::empty().into(), token(EOF, "", "").into()],
        );

        let token = token_at_position(&root, TextSize::new(0)).unwrap();
        assert_eq!((token.element.kind(), token.start), (EOF, TextSize::new(0)));

        let ancestors = ancestors_at_position(&root, TextSize::new(0)).unwrap();
        assert_eq!(ancestors.len(), 1);
        assert!(token_at_position(&root, TextSize::new(1)).is_err());
    }

    #[test]
    fn outside_of_the_root() {
        let root = tree();
        assert_eq!(
            token_at_position(&root, TextSize::new(9)),
            Err(SyntaxError::PositionOutOfRange {
                position: TextSize::new(9),
                full_width: TextSize::new(8)
            })
        );
    }
}
