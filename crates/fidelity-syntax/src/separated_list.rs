use std::fmt;
use std::iter::FusedIterator;

use text_size::TextSize;
use triomphe::ThinArc;

use crate::element::{
    Element, ElementCategory, ElementFlags, NodeOrToken, child_containing_position,
};
use crate::list::ListHeader;
use crate::{SyntaxError, SyntaxKind, SyntaxNode, SyntaxNodeOrToken, SyntaxResult, SyntaxToken};

/// Owned slot of a separated list: a node at even positions, a separator
/// token at odd ones.
pub type SeparatedSlot = NodeOrToken<SyntaxNode, SyntaxToken>;

/// Nodes interleaved with separator tokens, such as `a, b, c`.
///
/// Slots always alternate `node (separator node)* separator?`. A trailing
/// separator is legal and must be queried with
/// [`SeparatedSyntaxList::has_trailing_separator`].
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct SeparatedSyntaxList {
    ptr: Option<ThinArc<ListHeader, SeparatedSlot>>,
}

impl SeparatedSyntaxList {
    pub const fn empty() -> Self {
        Self { ptr: None }
    }

    /// Validates the alternation of `slots` and builds the list.
    pub fn new(slots: impl IntoIterator<Item = SeparatedSlot>) -> SyntaxResult<Self> {
        let slots: Vec<_> = slots.into_iter().collect();
        if slots.is_empty() {
            return Ok(Self::empty());
        }

        let mut full_width = TextSize::new(0);
        let mut flags = ElementFlags::empty();
        for (slot, element) in slots.iter().enumerate() {
            match (slot % 2 == 0, element) {
                (true, NodeOrToken::Node(node)) => flags |= node.flags(),
                (false, NodeOrToken::Token(token)) => flags |= token.flags(),
                (true, NodeOrToken::Token(_)) => {
                    return Err(SyntaxError::MalformedSeparatedList { slot, expected: "node" });
                }
                (false, NodeOrToken::Node(_)) => {
                    return Err(SyntaxError::MalformedSeparatedList {
                        slot,
                        expected: "separator token",
                    });
                }
            }
            full_width += element.full_width();
        }

        let header = ListHeader { full_width, flags };
        Ok(Self { ptr: Some(ThinArc::from_header_and_iter(header, slots.into_iter())) })
    }

    pub fn slots(&self) -> &[SeparatedSlot] {
        match &self.ptr {
            None => &[],
            Some(ptr) => &ptr.slice,
        }
    }

    /// Number of nodes, separators excluded.
    pub fn count(&self) -> usize {
        self.slot_count().div_ceil(2)
    }

    pub fn separator_count(&self) -> usize {
        self.slot_count() / 2
    }

    /// Number of nodes and separators.
    pub fn slot_count(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    pub fn has_trailing_separator(&self) -> bool {
        self.slot_count() != 0 && self.slot_count() % 2 == 0
    }

    pub fn node_at(&self, index: usize) -> SyntaxResult<&SyntaxNode> {
        let out_of_range = SyntaxError::IndexOutOfRange { index, count: self.count() };
        match self.slots().get(index.checked_mul(2).ok_or(out_of_range)?) {
            Some(NodeOrToken::Node(node)) => Ok(node),
            _ => Err(out_of_range),
        }
    }

    /// Separator following the node at `index`.
    ///
    /// The last node may legitimately have no separator, which is reported as
    /// [`SyntaxError::MissingSeparator`] rather than as an out-of-range index.
    pub fn separator_at(&self, index: usize) -> SyntaxResult<&SyntaxToken> {
        if index >= self.count() {
            return Err(SyntaxError::IndexOutOfRange { index, count: self.separator_count() });
        }
        match self.slots().get(2 * index + 1) {
            Some(NodeOrToken::Token(token)) => Ok(token),
            _ => Err(SyntaxError::MissingSeparator { index }),
        }
    }

    pub fn slot_at(&self, index: usize) -> SyntaxResult<SyntaxNodeOrToken<'_>> {
        self.slots()
            .get(index)
            .map(NodeOrToken::as_ref)
            .ok_or(SyntaxError::IndexOutOfRange { index, count: self.slot_count() })
    }

    /// Iterates nodes, skipping separators.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &SyntaxNode> + Clone + '_ {
        self.slots().iter().step_by(2).filter_map(NodeOrToken::as_node)
    }

    /// Iterates nodes and separators in source order.
    pub fn elements(&self) -> SeparatedSlots<'_> {
        SeparatedSlots { slots: self.slots().iter() }
    }

    pub fn to_vec(&self) -> Vec<SyntaxNode> {
        self.nodes().cloned().collect()
    }

    pub fn to_element_vec(&self) -> Vec<SeparatedSlot> {
        self.slots().to_vec()
    }

    pub fn flags(&self) -> ElementFlags {
        self.ptr.as_ref().map_or(ElementFlags::empty(), |ptr| ptr.header.header.flags)
    }

    pub fn has_skipped_text(&self) -> bool {
        self.flags().contains(ElementFlags::HAS_SKIPPED_TEXT)
    }

    pub fn has_zero_width_token(&self) -> bool {
        self.flags().contains(ElementFlags::HAS_ZERO_WIDTH_TOKEN)
    }

    pub fn is_typescript_specific(&self) -> bool {
        self.flags().contains(ElementFlags::IS_TYPESCRIPT_SPECIFIC)
    }

    pub fn first_token(&self) -> Option<&SyntaxToken> {
        self.slots().iter().find_map(|slot| match slot {
            NodeOrToken::Node(node) => node.first_token(),
            NodeOrToken::Token(token) => token.first_token(),
        })
    }

    pub fn last_token(&self) -> Option<&SyntaxToken> {
        self.slots().iter().rev().find_map(|slot| match slot {
            NodeOrToken::Node(node) => node.last_token(),
            NodeOrToken::Token(token) => token.last_token(),
        })
    }

    /// Returns the node or separator spanning `position` and its start, both
    /// relative to the start of this list.
    pub fn element_containing_position(
        &self,
        position: TextSize,
    ) -> SyntaxResult<(SyntaxNodeOrToken<'_>, TextSize)> {
        child_containing_position(
            self.elements().map(|slot| (slot.full_width(), slot)),
            position,
            self.full_width(),
            |slot| match slot {
                NodeOrToken::Node(node) => node.contains_token(),
                NodeOrToken::Token(_) => true,
            },
        )
    }
}

impl Element for SeparatedSyntaxList {
    fn kind(&self) -> SyntaxKind {
        SyntaxKind::SEPARATED_LIST
    }

    fn full_width(&self) -> TextSize {
        self.ptr.as_ref().map_or(TextSize::new(0), |ptr| ptr.header.header.full_width)
    }

    fn write_full_text(&self, out: &mut String) {
        for slot in self.slots() {
            slot.write_full_text(out);
        }
    }

    fn category(&self) -> ElementCategory {
        ElementCategory::SeparatedList
    }
}

impl fmt::Debug for SeparatedSyntaxList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SEPARATED_LIST@{:?} ", self.full_width())?;
        f.debug_list().entries(self.elements()).finish()
    }
}

/// Iterator over the slots of a [`SeparatedSyntaxList`].
#[derive(Clone)]
pub struct SeparatedSlots<'a> {
    slots: std::slice::Iter<'a, SeparatedSlot>,
}

impl<'a> Iterator for SeparatedSlots<'a> {
    type Item = SyntaxNodeOrToken<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.slots.next().map(NodeOrToken::as_ref)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl DoubleEndedIterator for SeparatedSlots<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.slots.next_back().map(NodeOrToken::as_ref)
    }
}

impl ExactSizeIterator for SeparatedSlots<'_> {}

impl FusedIterator for SeparatedSlots<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;
    use crate::{Trivia, TriviaKind, TriviaList};

    fn name(text: &str) -> SeparatedSlot {
        let token = SyntaxToken::new(IDENTIFIER, text, TriviaList::empty(), TriviaList::empty());
        NodeOrToken::Node(SyntaxNode::new(NAME_EXPRESSION, [token.into()]))
    }

    fn comma() -> SeparatedSlot {
        let space = TriviaList::new([Trivia::new(TriviaKind::Whitespace, " ")]);
        NodeOrToken::Token(SyntaxToken::new(COMMA, ",", TriviaList::empty(), space))
    }

    #[test]
    fn counts_and_access() {
        let list = SeparatedSyntaxList::new([name("a"), comma(), name("b"), comma(), name("c")])
            .unwrap();

        assert_eq!(list.full_text(), "a, b, c");
        assert_eq!((list.count(), list.separator_count(), list.slot_count()), (3, 2, 5));
        assert!(!list.has_trailing_separator());
        assert_eq!(list.node_at(2).map(Element::full_text), Ok("c".to_owned()));
        assert_eq!(list.separator_at(1).map(SyntaxToken::text), Ok(","));
        assert_eq!(list.separator_at(2), Err(SyntaxError::MissingSeparator { index: 2 }));
        let out_of_range = SyntaxError::IndexOutOfRange { index: 3, count: 2 };
        assert_eq!(list.separator_at(3), Err(out_of_range));
        let out_of_range = SyntaxError::IndexOutOfRange { index: 3, count: 3 };
        assert_eq!(list.node_at(3).err(), Some(out_of_range));
        assert_eq!(list.slot_at(1).map(|slot| slot.kind()), Ok(COMMA));

        let nodes: Vec<_> = list.nodes().map(Element::full_text).collect();
        assert_eq!(nodes, ["a", "b", "c"]);
        let kinds: Vec<_> = list.elements().map(|slot| slot.kind()).collect();
        assert_eq!(kinds, [NAME_EXPRESSION, COMMA, NAME_EXPRESSION, COMMA, NAME_EXPRESSION]);
    }

    #[test]
    fn trailing_separator() {
        let list = SeparatedSyntaxList::new([name("a"), comma()]).unwrap();
        assert!(list.has_trailing_separator());
        assert_eq!(list.count(), 1);
        assert_eq!(list.separator_at(0).map(SyntaxToken::text), Ok(","));
        assert_eq!(list.to_vec().len(), 1);
        assert_eq!(list.to_element_vec().len(), 2);

        assert!(!SeparatedSyntaxList::empty().has_trailing_separator());
    }

    #[test]
    fn rejects_broken_alternation() {
        assert_eq!(
            SeparatedSyntaxList::new([comma()]),
            Err(SyntaxError::MalformedSeparatedList { slot: 0, expected: "node" })
        );
        assert_eq!(
            SeparatedSyntaxList::new([name("a"), name("b")]),
            Err(SyntaxError::MalformedSeparatedList { slot: 1, expected: "separator token" })
        );
    }

    #[test]
    fn element_containing_position_reaches_separators() {
        let list = SeparatedSyntaxList::new([name("a"), comma(), name("b")]).unwrap();
        let at = |p: u32| {
            list.element_containing_position(p.into()).map(|(slot, start)| (slot.kind(), start))
        };

        assert_eq!(at(0), Ok((NAME_EXPRESSION, TextSize::new(0))));
        assert_eq!(at(1), Ok((COMMA, TextSize::new(1))));
        assert_eq!(at(2), Ok((COMMA, TextSize::new(1))));
        assert_eq!(at(3), Ok((NAME_EXPRESSION, TextSize::new(3))));
        assert_eq!(at(4), Ok((NAME_EXPRESSION, TextSize::new(3))));
        assert!(at(5).is_err());
    }

    #[test]
    fn tokens_of_missing_separators_flag_the_list() {
        let missing = NodeOrToken::Token(SyntaxToken::missing(COMMA));
        let list = SeparatedSyntaxList::new([name("a"), missing, name("b")]).unwrap();
        assert!(list.has_zero_width_token());
        assert_eq!(list.first_token().map(SyntaxToken::text), Some("a"));
        assert_eq!(list.last_token().map(SyntaxToken::text), Some("b"));
        assert_eq!(list.full_text(), "ab");
    }
}
