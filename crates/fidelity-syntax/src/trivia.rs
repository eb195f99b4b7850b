//! Trivia pieces and the immutable lists attached to tokens.

use std::fmt;
use std::iter::FusedIterator;

use text_size::{TextLen, TextSize};
use triomphe::ThinArc;

use crate::element::{Element, ElementCategory};
use crate::{SyntaxError, SyntaxKind, SyntaxResult};

/// Kinds of trivia stored alongside tokens.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TriviaKind {
    Whitespace,
    Newline,
    SingleLineComment,
    MultiLineComment,
    /// Source text the parser could not give a grammatical role.
    SkippedText,
}

impl TriviaKind {
    pub fn syntax_kind(self) -> SyntaxKind {
        match self {
            TriviaKind::Whitespace => SyntaxKind::WHITESPACE_TRIVIA,
            TriviaKind::Newline => SyntaxKind::NEWLINE_TRIVIA,
            TriviaKind::SingleLineComment => SyntaxKind::SINGLE_LINE_COMMENT_TRIVIA,
            TriviaKind::MultiLineComment => SyntaxKind::MULTI_LINE_COMMENT_TRIVIA,
            TriviaKind::SkippedText => SyntaxKind::SKIPPED_TEXT_TRIVIA,
        }
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TriviaKind::SingleLineComment | TriviaKind::MultiLineComment)
    }
}

/// A trivia fragment with its kind and length.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TriviaPiece {
    pub kind: TriviaKind,
    pub len: TextSize,
}

impl TriviaPiece {
    /// Creates a new trivia piece with the given kind and length.
    pub fn new(kind: TriviaKind, len: TextSize) -> Self {
        Self { kind, len }
    }
}

bitflags::bitflags! {
    /// Aggregate facts about a run of trivia.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct TriviaFlags: u8 {
        const HAS_COMMENT = 1 << 0;
        const HAS_NEWLINE = 1 << 1;
        const HAS_SKIPPED_TEXT = 1 << 2;
    }
}

/// One piece of non-significant text, borrowed from the list that owns it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Trivia<'a> {
    kind: TriviaKind,
    text: &'a str,
}

impl<'a> Trivia<'a> {
    pub fn new(kind: TriviaKind, text: &'a str) -> Self {
        Self { kind, text }
    }

    pub fn trivia_kind(self) -> TriviaKind {
        self.kind
    }

    pub fn text(self) -> &'a str {
        self.text
    }

    pub fn is_whitespace(self) -> bool {
        self.kind == TriviaKind::Whitespace
    }

    pub fn is_newline(self) -> bool {
        self.kind == TriviaKind::Newline
    }

    pub fn is_comment(self) -> bool {
        self.kind.is_comment()
    }

    pub fn is_skipped_text(self) -> bool {
        self.kind == TriviaKind::SkippedText
    }

    /// Newline trivia, or a comment or skipped text spanning a line break.
    pub fn has_newline(self) -> bool {
        match self.kind {
            TriviaKind::Newline => true,
            TriviaKind::Whitespace | TriviaKind::SingleLineComment => false,
            TriviaKind::MultiLineComment | TriviaKind::SkippedText => {
                self.text.contains(['\n', '\r'])
            }
        }
    }

    pub fn flags(self) -> TriviaFlags {
        let mut flags = TriviaFlags::empty();
        flags.set(TriviaFlags::HAS_COMMENT, self.is_comment());
        flags.set(TriviaFlags::HAS_NEWLINE, self.has_newline());
        flags.set(TriviaFlags::HAS_SKIPPED_TEXT, self.is_skipped_text());
        flags
    }
}

impl Element for Trivia<'_> {
    fn kind(&self) -> SyntaxKind {
        self.kind.syntax_kind()
    }

    fn full_width(&self) -> TextSize {
        self.text.text_len()
    }

    fn write_full_text(&self, out: &mut String) {
        out.push_str(self.text);
    }

    fn category(&self) -> ElementCategory {
        ElementCategory::Trivia
    }
}

#[derive(Debug, Eq, Hash, PartialEq)]
struct TriviaHeader {
    text: Box<str>,
    flags: TriviaFlags,
}

/// Ordered, immutable run of trivia attached before or after a token.
///
/// The concatenated text and the aggregate flags are computed once, when the
/// list is created. An empty list does not allocate.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct TriviaList {
    ptr: Option<ThinArc<TriviaHeader, TriviaPiece>>,
}

impl fmt::Debug for TriviaList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriviaList")
            .field("pieces", &self.pieces())
            .field("full_width", &self.full_width())
            .finish()
    }
}

impl TriviaList {
    pub const fn empty() -> Self {
        Self { ptr: None }
    }

    pub fn new<'a>(trivia: impl IntoIterator<Item = Trivia<'a>>) -> Self {
        let mut text = String::new();
        let mut pieces = Vec::new();
        let mut flags = TriviaFlags::empty();

        for trivia in trivia {
            text.push_str(trivia.text);
            pieces.push(TriviaPiece::new(trivia.kind, trivia.text.text_len()));
            flags |= trivia.flags();
        }

        Self::from_parts(text.into_boxed_str(), &pieces, flags)
    }

    /// Builds a list from contiguous `text` split into `pieces`.
    pub fn from_pieces(text: &str, pieces: &[TriviaPiece]) -> Self {
        assert_eq!(
            pieces.iter().map(|piece| piece.len).sum::<TextSize>(),
            text.text_len(),
            "trivia pieces must cover the text exactly"
        );
        let flags = TriviaIter::new(text, pieces).fold(TriviaFlags::empty(), |flags, trivia| {
            flags | trivia.flags()
        });
        Self::from_parts(text.into(), pieces, flags)
    }

    fn from_parts(text: Box<str>, pieces: &[TriviaPiece], flags: TriviaFlags) -> Self {
        if pieces.is_empty() {
            return Self::empty();
        }
        let header = TriviaHeader { text, flags };
        Self { ptr: Some(ThinArc::from_header_and_slice(header, pieces)) }
    }

    fn header(&self) -> Option<&TriviaHeader> {
        self.ptr.as_ref().map(|ptr| &ptr.header.header)
    }

    pub fn pieces(&self) -> &[TriviaPiece] {
        match &self.ptr {
            None => &[],
            Some(ptr) => &ptr.slice,
        }
    }

    pub fn count(&self) -> usize {
        self.pieces().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    /// Returns the concatenated text of every piece.
    pub fn text(&self) -> &str {
        self.header().map_or("", |header| &header.text)
    }

    pub fn flags(&self) -> TriviaFlags {
        self.header().map_or(TriviaFlags::empty(), |header| header.flags)
    }

    pub fn has_comment(&self) -> bool {
        self.flags().contains(TriviaFlags::HAS_COMMENT)
    }

    pub fn has_newline(&self) -> bool {
        self.flags().contains(TriviaFlags::HAS_NEWLINE)
    }

    pub fn has_skipped_text(&self) -> bool {
        self.flags().contains(TriviaFlags::HAS_SKIPPED_TEXT)
    }

    pub fn iter(&self) -> TriviaIter<'_> {
        TriviaIter::new(self.text(), self.pieces())
    }

    pub fn get(&self, index: usize) -> SyntaxResult<Trivia<'_>> {
        self.iter().nth(index).ok_or(SyntaxError::IndexOutOfRange { index, count: self.count() })
    }

    pub fn last(&self) -> Option<Trivia<'_>> {
        self.iter().next_back()
    }

    /// Returns a new list holding `self` followed by `other`.
    pub fn concat(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }

        let text = [self.text(), other.text()].concat();
        let pieces = [self.pieces(), other.pieces()].concat();
        Self::from_parts(text.into_boxed_str(), &pieces, self.flags() | other.flags())
    }
}

impl Element for TriviaList {
    fn kind(&self) -> SyntaxKind {
        SyntaxKind::TRIVIA_LIST
    }

    fn full_width(&self) -> TextSize {
        self.text().text_len()
    }

    fn write_full_text(&self, out: &mut String) {
        out.push_str(self.text());
    }

    fn category(&self) -> ElementCategory {
        ElementCategory::TriviaList
    }
}

impl<'a> IntoIterator for &'a TriviaList {
    type Item = Trivia<'a>;
    type IntoIter = TriviaIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the trivia of a [`TriviaList`].
#[derive(Clone)]
pub struct TriviaIter<'a> {
    text: &'a str,
    pieces: std::slice::Iter<'a, TriviaPiece>,
}

impl<'a> TriviaIter<'a> {
    fn new(text: &'a str, pieces: &'a [TriviaPiece]) -> Self {
        Self { text, pieces: pieces.iter() }
    }
}

impl<'a> Iterator for TriviaIter<'a> {
    type Item = Trivia<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let piece = self.pieces.next()?;
        let (text, rest) = self.text.split_at(piece.len.into());
        self.text = rest;
        Some(Trivia::new(piece.kind, text))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pieces.size_hint()
    }
}

impl DoubleEndedIterator for TriviaIter<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let piece = self.pieces.next_back()?;
        let (rest, text) = self.text.split_at(self.text.len() - usize::from(piece.len));
        self.text = rest;
        Some(Trivia::new(piece.kind, text))
    }
}

impl ExactSizeIterator for TriviaIter<'_> {}

impl FusedIterator for TriviaIter<'_> {}
