use fidelity_syntax::SyntaxKind;

/// Set of token kinds the parser starts or stops on.
///
/// Every token kind fits in one `u128`. Building a set from a node or trivia
/// kind fails at compile time when the set is a `const`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TokenSet(u128);

impl TokenSet {
    pub(crate) const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= mask(kinds[i]);
            i += 1;
        }
        Self(bits)
    }

    pub(crate) const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub(crate) const fn contains(self, kind: SyntaxKind) -> bool {
        kind.is_token() && self.0 & mask(kind) != 0
    }
}

const fn mask(kind: SyntaxKind) -> u128 {
    assert!(kind.is_token(), "only token kinds can be members of a TokenSet");
    1 << (kind as u16 - SyntaxKind::EOF as u16)
}
