use std::fmt;

use text_size::{TextLen, TextSize};
use triomphe::Arc;

use crate::element::{Element, ElementCategory, ElementFlags};
use crate::{SyntaxKind, TriviaList};

#[derive(Eq, Hash, PartialEq)]
struct TokenData {
    kind: SyntaxKind,
    flags: ElementFlags,
    leading: TriviaList,
    text: Box<str>,
    trailing: TriviaList,
}

/// Leaf of the tree and the only element that owns source text.
///
/// Cloning is a reference count bump. Every "modification" returns a new
/// token and leaves the receiver untouched.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct SyntaxToken {
    data: Arc<TokenData>,
}

impl SyntaxToken {
    pub fn new(
        kind: SyntaxKind,
        text: impl Into<Box<str>>,
        leading: TriviaList,
        trailing: TriviaList,
    ) -> Self {
        debug_assert!(kind.is_token(), "{kind:?} is not a token kind");
        let text = text.into();

        let mut flags = ElementFlags::empty();
        flags.set(
            ElementFlags::HAS_SKIPPED_TEXT,
            leading.has_skipped_text() || trailing.has_skipped_text(),
        );
        flags.set(ElementFlags::HAS_ZERO_WIDTH_TOKEN, text.is_empty() && kind != SyntaxKind::EOF);

        Self { data: Arc::new(TokenData { kind, flags, leading, text, trailing }) }
    }

    /// Synthesizes a zero-width token standing in for a missing one.
    pub fn missing(kind: SyntaxKind) -> Self {
        Self::new(kind, "", TriviaList::empty(), TriviaList::empty())
    }

    pub fn with_leading_trivia(&self, leading: TriviaList) -> Self {
        Self::new(self.kind(), self.text(), leading, self.trailing_trivia().clone())
    }

    pub fn with_trailing_trivia(&self, trailing: TriviaList) -> Self {
        Self::new(self.kind(), self.text(), self.leading_trivia().clone(), trailing)
    }

    /// The significant text, without trivia.
    pub fn text(&self) -> &str {
        &self.data.text
    }

    pub fn width(&self) -> TextSize {
        self.data.text.text_len()
    }

    pub fn leading_trivia(&self) -> &TriviaList {
        &self.data.leading
    }

    pub fn trailing_trivia(&self) -> &TriviaList {
        &self.data.trailing
    }

    pub fn flags(&self) -> ElementFlags {
        self.data.flags
    }

    /// `true` for tokens synthesized by error recovery. End of file is never
    /// zero width, even though it has no significant text.
    pub fn is_zero_width(&self) -> bool {
        self.flags().contains(ElementFlags::HAS_ZERO_WIDTH_TOKEN)
    }

    pub fn has_skipped_text(&self) -> bool {
        self.flags().contains(ElementFlags::HAS_SKIPPED_TEXT)
    }

    pub fn first_token(&self) -> Option<&Self> {
        (!self.is_zero_width()).then_some(self)
    }

    pub fn last_token(&self) -> Option<&Self> {
        self.first_token()
    }

    /// Returns `true` if both handles point to the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Element for SyntaxToken {
    fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    fn full_width(&self) -> TextSize {
        self.leading_trivia().full_width() + self.width() + self.trailing_trivia().full_width()
    }

    fn write_full_text(&self, out: &mut String) {
        out.push_str(self.leading_trivia().text());
        out.push_str(self.text());
        out.push_str(self.trailing_trivia().text());
    }

    fn category(&self) -> ElementCategory {
        ElementCategory::Token
    }
}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.full_width())?;
        if self.is_zero_width() {
            return f.write_str(" (missing)");
        }
        write!(f, " {:?}", self.text())
    }
}

impl fmt::Display for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.leading_trivia().text())?;
        f.write_str(self.text())?;
        f.write_str(self.trailing_trivia().text())
    }
}
