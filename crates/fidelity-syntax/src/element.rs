//! The capability set shared by every element of the tree.

use std::fmt;

use text_size::TextSize;

use crate::{
    SeparatedSyntaxList, SyntaxError, SyntaxKind, SyntaxList, SyntaxNode, SyntaxResult, SyntaxToken,
};

/// Mutually exclusive element categories, used for safe downcasting.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ElementCategory {
    Token,
    Node,
    List,
    SeparatedList,
    TriviaList,
    Trivia,
}

/// Operations every element of the tree supports.
///
/// `full_text` is derived from the element and its descendants only, so any
/// subtree can be serialized on its own. For every element
/// `full_text().len() == full_width()`.
pub trait Element {
    fn kind(&self) -> SyntaxKind;

    /// Width including all attached trivia.
    fn full_width(&self) -> TextSize;

    /// Appends the exact source text spanned by this element.
    fn write_full_text(&self, out: &mut String);

    fn category(&self) -> ElementCategory;

    fn full_text(&self) -> String {
        let mut out = String::with_capacity(usize::from(self.full_width()));
        self.write_full_text(&mut out);
        out
    }

    fn is_token(&self) -> bool {
        self.category() == ElementCategory::Token
    }

    fn is_node(&self) -> bool {
        self.category() == ElementCategory::Node
    }

    fn is_list(&self) -> bool {
        self.category() == ElementCategory::List
    }

    fn is_separated_list(&self) -> bool {
        self.category() == ElementCategory::SeparatedList
    }

    fn is_trivia_list(&self) -> bool {
        self.category() == ElementCategory::TriviaList
    }

    fn is_trivia(&self) -> bool {
        self.category() == ElementCategory::Trivia
    }
}

bitflags::bitflags! {
    /// Facts aggregated bottom-up over a subtree.
    ///
    /// A parent has a flag iff it has the property itself or any child has it.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct ElementFlags: u8 {
        const HAS_SKIPPED_TEXT = 1 << 0;
        const HAS_ZERO_WIDTH_TOKEN = 1 << 1;
        const IS_TYPESCRIPT_SPECIFIC = 1 << 2;
    }
}

/// A child of a node: anything but trivia.
#[derive(Clone, Eq, Hash, PartialEq)]
pub enum SyntaxElement {
    Token(SyntaxToken),
    Node(SyntaxNode),
    List(SyntaxList),
    SeparatedList(SeparatedSyntaxList),
}

impl SyntaxElement {
    pub fn flags(&self) -> ElementFlags {
        match self {
            SyntaxElement::Token(it) => it.flags(),
            SyntaxElement::Node(it) => it.flags(),
            SyntaxElement::List(it) => it.flags(),
            SyntaxElement::SeparatedList(it) => it.flags(),
        }
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
        match self {
            SyntaxElement::Token(it) => it.first_token(),
            SyntaxElement::Node(it) => it.first_token(),
            SyntaxElement::List(it) => it.first_token(),
            SyntaxElement::SeparatedList(it) => it.first_token(),
        }
    }

    pub fn last_token(&self) -> Option<&SyntaxToken> {
        match self {
            SyntaxElement::Token(it) => it.last_token(),
            SyntaxElement::Node(it) => it.last_token(),
            SyntaxElement::List(it) => it.last_token(),
            SyntaxElement::SeparatedList(it) => it.last_token(),
        }
    }

    /// `true` if the subtree holds at least one token, zero-width ones
    /// included. Only empty lists and nodes made of them hold none.
    pub(crate) fn contains_token(&self) -> bool {
        match self {
            SyntaxElement::Token(_) => true,
            SyntaxElement::Node(it) => it.contains_token(),
            SyntaxElement::List(it) => it.iter().any(SyntaxNode::contains_token),
            SyntaxElement::SeparatedList(it) => it.elements().any(|slot| match slot {
                NodeOrToken::Node(node) => node.contains_token(),
                NodeOrToken::Token(_) => true,
            }),
        }
    }

    pub fn as_token(&self) -> Option<&SyntaxToken> {
        match self {
            SyntaxElement::Token(it) => Some(it),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            SyntaxElement::Node(it) => Some(it),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&SyntaxList> {
        match self {
            SyntaxElement::List(it) => Some(it),
            _ => None,
        }
    }

    pub fn as_separated_list(&self) -> Option<&SeparatedSyntaxList> {
        match self {
            SyntaxElement::SeparatedList(it) => Some(it),
            _ => None,
        }
    }
}

impl Element for SyntaxElement {
    fn kind(&self) -> SyntaxKind {
        match self {
            SyntaxElement::Token(it) => it.kind(),
            SyntaxElement::Node(it) => it.kind(),
            SyntaxElement::List(it) => it.kind(),
            SyntaxElement::SeparatedList(it) => it.kind(),
        }
    }

    fn full_width(&self) -> TextSize {
        match self {
            SyntaxElement::Token(it) => it.full_width(),
            SyntaxElement::Node(it) => it.full_width(),
            SyntaxElement::List(it) => it.full_width(),
            SyntaxElement::SeparatedList(it) => it.full_width(),
        }
    }

    fn write_full_text(&self, out: &mut String) {
        match self {
            SyntaxElement::Token(it) => it.write_full_text(out),
            SyntaxElement::Node(it) => it.write_full_text(out),
            SyntaxElement::List(it) => it.write_full_text(out),
            SyntaxElement::SeparatedList(it) => it.write_full_text(out),
        }
    }

    fn category(&self) -> ElementCategory {
        match self {
            SyntaxElement::Token(_) => ElementCategory::Token,
            SyntaxElement::Node(_) => ElementCategory::Node,
            SyntaxElement::List(_) => ElementCategory::List,
            SyntaxElement::SeparatedList(_) => ElementCategory::SeparatedList,
        }
    }
}

impl fmt::Debug for SyntaxElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxElement::Token(it) => fmt::Debug::fmt(it, f),
            SyntaxElement::Node(it) => fmt::Debug::fmt(it, f),
            SyntaxElement::List(it) => fmt::Debug::fmt(it, f),
            SyntaxElement::SeparatedList(it) => fmt::Debug::fmt(it, f),
        }
    }
}

impl From<SyntaxToken> for SyntaxElement {
    fn from(token: SyntaxToken) -> Self {
        SyntaxElement::Token(token)
    }
}

impl From<SyntaxNode> for SyntaxElement {
    fn from(node: SyntaxNode) -> Self {
        SyntaxElement::Node(node)
    }
}

impl From<SyntaxList> for SyntaxElement {
    fn from(list: SyntaxList) -> Self {
        SyntaxElement::List(list)
    }
}

impl From<SeparatedSyntaxList> for SyntaxElement {
    fn from(list: SeparatedSyntaxList) -> Self {
        SyntaxElement::SeparatedList(list)
    }
}

/// Node-or-token wrapper, used for the slots of a separated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    /// Converts into the node variant, if any.
    pub fn into_node(self) -> Option<N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Converts into the token variant, if any.
    pub fn into_token(self) -> Option<T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }

    /// Returns a shared reference to the node, if any.
    pub fn as_node(&self) -> Option<&N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Returns a shared reference to the token, if any.
    pub fn as_token(&self) -> Option<&T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }

    pub fn as_ref(&self) -> NodeOrToken<&N, &T> {
        match self {
            NodeOrToken::Node(node) => NodeOrToken::Node(node),
            NodeOrToken::Token(token) => NodeOrToken::Token(token),
        }
    }
}

impl<N: Element, T: Element> Element for NodeOrToken<N, T> {
    fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    fn full_width(&self) -> TextSize {
        match self {
            NodeOrToken::Node(node) => node.full_width(),
            NodeOrToken::Token(token) => token.full_width(),
        }
    }

    fn write_full_text(&self, out: &mut String) {
        match self {
            NodeOrToken::Node(node) => node.write_full_text(out),
            NodeOrToken::Token(token) => token.write_full_text(out),
        }
    }

    fn category(&self) -> ElementCategory {
        match self {
            NodeOrToken::Node(node) => node.category(),
            NodeOrToken::Token(token) => token.category(),
        }
    }
}

impl<E: Element + ?Sized> Element for &E {
    fn kind(&self) -> SyntaxKind {
        (**self).kind()
    }

    fn full_width(&self) -> TextSize {
        (**self).full_width()
    }

    fn write_full_text(&self, out: &mut String) {
        (**self).write_full_text(out);
    }

    fn category(&self) -> ElementCategory {
        (**self).category()
    }
}

/// Finds the child spanning `position` among `children`, given as
/// `(full_width, child)` pairs in source order.
///
/// Intervals are half-open, so a boundary belongs to the child that starts
/// there and zero-width children are never picked by the scan. The end of the
/// span resolves to the last non-empty child. When every child is zero width,
/// the leftmost one for which `contains_token` holds is returned, so an empty
/// list never shadows a zero-width token next to it.
pub(crate) fn child_containing_position<T>(
    children: impl IntoIterator<Item = (TextSize, T)>,
    position: TextSize,
    full_width: TextSize,
    contains_token: impl Fn(&T) -> bool,
) -> SyntaxResult<(T, TextSize)> {
    let out_of_range = SyntaxError::PositionOutOfRange { position, full_width };
    if position > full_width {
        return Err(out_of_range);
    }

    let mut offset = TextSize::new(0);
    let mut last_non_empty = None;
    let mut first_zero_width = None;

    for (width, child) in children {
        let end = offset + width;
        if width == TextSize::new(0) {
            if first_zero_width.is_none() && contains_token(&child) {
                first_zero_width = Some((child, offset));
            }
            continue;
        }
        if offset <= position && position < end {
            return Ok((child, offset));
        }
        last_non_empty = Some((child, offset));
        offset = end;
    }

    last_non_empty.or(first_zero_width).ok_or(out_of_range)
}
