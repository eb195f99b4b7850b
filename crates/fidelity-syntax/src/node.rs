use std::fmt;

use text_size::TextSize;
use triomphe::ThinArc;

use crate::element::{
    Element, ElementCategory, ElementFlags, NodeOrToken, SyntaxElement, child_containing_position,
};
use crate::separated_list::SeparatedSlots;
use crate::{SyntaxError, SyntaxKind, SyntaxResult, SyntaxToken};

#[derive(Eq, Hash, PartialEq)]
struct NodeHeader {
    kind: SyntaxKind,
    full_width: TextSize,
    flags: ElementFlags,
}

/// Composite element with an ordered sequence of children.
///
/// Width and flags are aggregated from the children when the node is created.
/// A node holds no reference to its parent, so the same subtree can be shared
/// by several trees.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct SyntaxNode {
    ptr: ThinArc<NodeHeader, SyntaxElement>,
}

impl SyntaxNode {
    pub fn new(kind: SyntaxKind, children: impl IntoIterator<Item = SyntaxElement>) -> Self {
        debug_assert!(kind.is_node(), "{kind:?} is not a node kind");
        let children: Vec<_> = children.into_iter().collect();

        let mut full_width = TextSize::new(0);
        let mut flags = ElementFlags::empty();
        flags.set(ElementFlags::IS_TYPESCRIPT_SPECIFIC, kind.is_typescript_specific());
        for child in &children {
            full_width += child.full_width();
            flags |= child.flags();
        }

        let header = NodeHeader { kind, full_width, flags };
        Self { ptr: ThinArc::from_header_and_iter(header, children.into_iter()) }
    }

    pub fn children(&self) -> &[SyntaxElement] {
        &self.ptr.slice
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    pub fn child(&self, index: usize) -> SyntaxResult<&SyntaxElement> {
        self.children()
            .get(index)
            .ok_or(SyntaxError::IndexOutOfRange { index, count: self.child_count() })
    }

    pub fn flags(&self) -> ElementFlags {
        self.ptr.header.header.flags
    }

    pub fn is_typescript_specific(&self) -> bool {
        self.flags().contains(ElementFlags::IS_TYPESCRIPT_SPECIFIC)
    }

    pub fn has_skipped_text(&self) -> bool {
        self.flags().contains(ElementFlags::HAS_SKIPPED_TEXT)
    }

    pub fn has_zero_width_token(&self) -> bool {
        self.flags().contains(ElementFlags::HAS_ZERO_WIDTH_TOKEN)
    }

    /// First token of the subtree, skipping zero-width tokens and empty lists.
    pub fn first_token(&self) -> Option<&SyntaxToken> {
        self.children().iter().find_map(SyntaxElement::first_token)
    }

    /// Last token of the subtree, skipping zero-width tokens and empty lists.
    pub fn last_token(&self) -> Option<&SyntaxToken> {
        self.children().iter().rev().find_map(SyntaxElement::last_token)
    }

    /// Returns the child spanning `position` and its start, both relative to
    /// the start of this node.
    pub fn child_containing_position(
        &self,
        position: TextSize,
    ) -> SyntaxResult<(&SyntaxElement, TextSize)> {
        child_containing_position(
            self.children().iter().map(|child| (child.full_width(), child)),
            position,
            self.full_width(),
            |child| child.contains_token(),
        )
    }

    pub(crate) fn contains_token(&self) -> bool {
        self.full_width() > TextSize::new(0)
            || self.children().iter().any(SyntaxElement::contains_token)
    }

    /// Returns a new node with the child at `index` replaced. Every other child
    /// is shared with `self`.
    pub fn replace_child(&self, index: usize, element: SyntaxElement) -> SyntaxResult<Self> {
        let mut children = self.children().to_vec();
        let slot = children
            .get_mut(index)
            .ok_or(SyntaxError::IndexOutOfRange { index, count: self.child_count() })?;
        *slot = element;
        Ok(Self::new(self.kind(), children))
    }

    /// Returns `true` if both handles point to the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::eq(&*self.ptr, &*other.ptr)
    }

    /// Iterates children, flattening lists into their nodes and separators.
    pub fn children_with_tokens(&self) -> ChildrenWithTokens<'_> {
        ChildrenWithTokens { active_list: None, children: self.children().iter() }
    }
}

impl Element for SyntaxNode {
    fn kind(&self) -> SyntaxKind {
        self.ptr.header.header.kind
    }

    fn full_width(&self) -> TextSize {
        self.ptr.header.header.full_width
    }

    fn write_full_text(&self, out: &mut String) {
        for child in self.children() {
            child.write_full_text(out);
        }
    }

    fn category(&self) -> ElementCategory {
        ElementCategory::Node
    }
}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} ", self.kind(), self.full_width())?;
        f.debug_list().entries(self.children()).finish()
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_text())
    }
}

/// Borrowed node-or-token, the item type of flattened child iteration.
pub type SyntaxNodeOrToken<'a> = NodeOrToken<&'a SyntaxNode, &'a SyntaxToken>;

#[derive(Clone)]
enum ActiveList<'a> {
    Nodes(std::slice::Iter<'a, SyntaxNode>),
    Slots(SeparatedSlots<'a>),
}

/// Iterator over children including tokens, flattening lists.
#[derive(Clone)]
pub struct ChildrenWithTokens<'a> {
    active_list: Option<ActiveList<'a>>,
    children: std::slice::Iter<'a, SyntaxElement>,
}

impl<'a> Iterator for ChildrenWithTokens<'a> {
    type Item = SyntaxNodeOrToken<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(active) = &mut self.active_list {
                let item = match active {
                    ActiveList::Nodes(nodes) => nodes.next().map(NodeOrToken::Node),
                    ActiveList::Slots(slots) => slots.next(),
                };
                match item {
                    Some(item) => return Some(item),
                    None => self.active_list = None,
                }
            }

            match self.children.next()? {
                SyntaxElement::Node(it) => return Some(NodeOrToken::Node(it)),
                SyntaxElement::Token(it) => return Some(NodeOrToken::Token(it)),
                SyntaxElement::List(it) => self.active_list = Some(ActiveList::Nodes(it.iter())),
                SyntaxElement::SeparatedList(it) => {
                    self.active_list = Some(ActiveList::Slots(it.elements()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;
    use crate::{SeparatedSyntaxList, SyntaxList, Trivia, TriviaKind, TriviaList};

    fn token(kind: SyntaxKind, text: &str) -> SyntaxElement {
        SyntaxToken::new(kind, text, TriviaList::empty(), TriviaList::empty()).into()
    }

    fn spaced(kind: SyntaxKind, text: &str) -> SyntaxElement {
        let space = TriviaList::new([Trivia::new(TriviaKind::Whitespace, " ")]);
        SyntaxToken::new(kind, text, TriviaList::empty(), space).into()
    }

    fn name(text: &str) -> SyntaxNode {
        SyntaxNode::new(NAME_EXPRESSION, [spaced(IDENTIFIER, text)])
    }

    #[test]
    fn aggregates_are_computed_bottom_up() {
        let missing = SyntaxElement::Token(SyntaxToken::missing(CLOSE_PAREN));
        let inner = SyntaxNode::new(
            PARENTHESIZED_EXPRESSION,
            [token(OPEN_PAREN, "("), name("a").into(), missing],
        );
        let annotation = SyntaxNode::new(TYPE_ANNOTATION, [spaced(COLON, ":")]);
        let outer = SyntaxNode::new(EXPRESSION_STATEMENT, [inner.into(), annotation.into()]);

        assert_eq!(outer.full_text(), "(a : ");
        assert_eq!(outer.full_width(), TextSize::new(5));
        assert!(outer.has_zero_width_token());
        assert!(outer.is_typescript_specific());
        assert!(!outer.has_skipped_text());
        assert_eq!(outer.child_count(), 2);
        assert!(outer.is_node());
    }

    #[test]
    fn child_access_out_of_range() {
        let node = name("a");
        assert!(node.child(0).is_ok());
        assert_eq!(node.child(1).err(), Some(SyntaxError::IndexOutOfRange { index: 1, count: 1 }));
    }

    #[test]
    fn first_and_last_token_skip_empty_children() {
        let node = SyntaxNode::new(
            VARIABLE_STATEMENT,
            [
                SyntaxToken::missing(VAR_KW).into(),
                SyntaxList::empty().into(),
                token(IDENTIFIER, "x"),
                token(SEMICOLON, ";"),
                SyntaxToken::missing(SEMICOLON).into(),
            ],
        );
        assert_eq!(node.first_token().map(SyntaxToken::text), Some("x"));
        assert_eq!(node.last_token().map(SyntaxToken::text), Some(";"));

        let empty = SyntaxNode::new(EMPTY_STATEMENT, [SyntaxToken::missing(SEMICOLON).into()]);
        assert_eq!(empty.first_token(), None);
    }

    #[test]
    fn position_lookup_boundaries() {
        // "a b " as two children of width 2.
        let node = SyntaxNode::new(BINARY_EXPRESSION, [name("a").into(), name("b").into()]);

        let child_at = |p: u32| {
            node.child_containing_position(p.into())
                .map(|(child, start)| (child.full_text(), u32::from(start)))
        };
        assert_eq!(child_at(0), Ok(("a ".to_owned(), 0)));
        assert_eq!(child_at(1), Ok(("a ".to_owned(), 0)));
        assert_eq!(child_at(2), Ok(("b ".to_owned(), 2)));
        assert_eq!(child_at(4), Ok(("b ".to_owned(), 2)));
        assert_eq!(
            child_at(5),
            Err(SyntaxError::PositionOutOfRange {
                position: TextSize::new(5),
                full_width: TextSize::new(4)
            })
        );
    }

    #[test]
    fn zero_width_children_lose_ties() {
        let node = SyntaxNode::new(
            RETURN_STATEMENT,
            [
                token(RETURN_KW, "return"),
                SyntaxToken::missing(IDENTIFIER).into(),
                SyntaxToken::missing(SEMICOLON).into(),
            ],
        );
        let (child, start) = node.child_containing_position(TextSize::new(6)).unwrap();
        assert_eq!(child.kind(), RETURN_KW);
        assert_eq!(start, TextSize::new(0));

        let all_missing = SyntaxNode::new(
            EXPRESSION_STATEMENT,
            [SyntaxToken::missing(IDENTIFIER).into(), SyntaxToken::missing(SEMICOLON).into()],
        );
        let (child, _) = all_missing.child_containing_position(TextSize::new(0)).unwrap();
        assert_eq!(child.kind(), IDENTIFIER);

        let empty_body = SyntaxNode::new(
            BLOCK,
            [
                SyntaxList::empty().into(),
                SeparatedSyntaxList::empty().into(),
                SyntaxToken::missing(CLOSE_BRACE).into(),
            ],
        );
        let (child, start) = empty_body.child_containing_position(TextSize::new(0)).unwrap();
        assert_eq!((child.kind(), start), (CLOSE_BRACE, TextSize::new(0)));

        let only_lists = SyntaxNode::new(BLOCK, [SyntaxList::empty().into()]);
        assert!(only_lists.child_containing_position(TextSize::new(0)).is_err());

        let childless = SyntaxNode::new(BLOCK, Vec::new());
        assert!(childless.child_containing_position(TextSize::new(0)).is_err());
    }

    #[test]
    fn replace_child_shares_the_rest() {
        let left = name("a");
        let right = name("b");
        let node = SyntaxNode::new(BINARY_EXPRESSION, [left.clone().into(), right.clone().into()]);

        let edited = node.replace_child(1, name("c").into()).unwrap();
        assert_eq!(node.full_text(), "a b ");
        assert_eq!(edited.full_text(), "a c ");
        assert!(edited.children()[0].as_node().unwrap().ptr_eq(&left));
        assert!(node.children()[1].as_node().unwrap().ptr_eq(&right));
        assert!(!edited.ptr_eq(&node));

        assert_eq!(
            node.replace_child(2, name("d").into()).err(),
            Some(SyntaxError::IndexOutOfRange { index: 2, count: 2 })
        );
    }

    #[test]
    fn children_with_tokens_flattens_lists() {
        let list = SyntaxList::new([name("a"), name("b")]);
        let node =
            SyntaxNode::new(BLOCK, [token(OPEN_BRACE, "{"), list.into(), token(CLOSE_BRACE, "}")]);

        let kinds: Vec<_> = node.children_with_tokens().map(|it| it.kind()).collect();
        assert_eq!(kinds, [OPEN_BRACE, NAME_EXPRESSION, NAME_EXPRESSION, CLOSE_BRACE]);
    }
}
