use std::fmt;

use text_size::TextSize;
use triomphe::ThinArc;

use crate::element::{Element, ElementCategory, ElementFlags, child_containing_position};
use crate::{SyntaxError, SyntaxKind, SyntaxNode, SyntaxResult, SyntaxToken};

#[derive(Debug, Eq, Hash, PartialEq)]
pub(crate) struct ListHeader {
    pub(crate) full_width: TextSize,
    pub(crate) flags: ElementFlags,
}

/// Homogeneous sequence of sibling nodes, such as the statements of a block.
///
/// An empty list does not allocate.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct SyntaxList {
    ptr: Option<ThinArc<ListHeader, SyntaxNode>>,
}

impl SyntaxList {
    pub const fn empty() -> Self {
        Self { ptr: None }
    }

    pub fn new(nodes: impl IntoIterator<Item = SyntaxNode>) -> Self {
        let nodes: Vec<_> = nodes.into_iter().collect();
        if nodes.is_empty() {
            return Self::empty();
        }

        let header = ListHeader {
            full_width: nodes.iter().map(Element::full_width).sum(),
            flags: nodes.iter().fold(ElementFlags::empty(), |flags, node| flags | node.flags()),
        };
        Self { ptr: Some(ThinArc::from_header_and_iter(header, nodes.into_iter())) }
    }

    pub fn nodes(&self) -> &[SyntaxNode] {
        match &self.ptr {
            None => &[],
            Some(ptr) => &ptr.slice,
        }
    }

    pub fn count(&self) -> usize {
        self.nodes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    pub fn node_at(&self, index: usize) -> SyntaxResult<&SyntaxNode> {
        self.nodes().get(index).ok_or(SyntaxError::IndexOutOfRange { index, count: self.count() })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SyntaxNode> {
        self.nodes().iter()
    }

    /// Snapshot of the nodes. The list is unaffected by changes to the result.
    pub fn to_vec(&self) -> Vec<SyntaxNode> {
        self.nodes().to_vec()
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
        self.iter().find_map(SyntaxNode::first_token)
    }

    pub fn last_token(&self) -> Option<&SyntaxToken> {
        self.iter().rev().find_map(SyntaxNode::last_token)
    }

    /// Returns the node spanning `position` and its start, both relative to the
    /// start of this list.
    pub fn node_containing_position(
        &self,
        position: TextSize,
    ) -> SyntaxResult<(&SyntaxNode, TextSize)> {
        child_containing_position(
            self.iter().map(|node| (node.full_width(), node)),
            position,
            self.full_width(),
            |node| node.contains_token(),
        )
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.ptr, &other.ptr) {
            (None, None) => true,
            (Some(this), Some(other)) => std::ptr::eq(&**this, &**other),
            _ => false,
        }
    }
}

impl Element for SyntaxList {
    fn kind(&self) -> SyntaxKind {
        SyntaxKind::LIST
    }

    fn full_width(&self) -> TextSize {
        self.ptr.as_ref().map_or(TextSize::new(0), |ptr| ptr.header.header.full_width)
    }

    fn write_full_text(&self, out: &mut String) {
        for node in self.iter() {
            node.write_full_text(out);
        }
    }

    fn category(&self) -> ElementCategory {
        ElementCategory::List
    }
}

impl fmt::Debug for SyntaxList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LIST@{:?} ", self.full_width())?;
        f.debug_list().entries(self.nodes()).finish()
    }
}

impl<'a> IntoIterator for &'a SyntaxList {
    type Item = &'a SyntaxNode;
    type IntoIter = std::slice::Iter<'a, SyntaxNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<SyntaxNode> for SyntaxList {
    fn from_iter<I: IntoIterator<Item = SyntaxNode>>(iter: I) -> Self {
        Self::new(iter)
    }
}
