//! Full-fidelity, immutable syntax tree.
//!
//! Every character of the source, including whitespace, comments and text the
//! parser had to skip, is owned by exactly one token or by the trivia attached
//! to it, so the concatenated full text of the root reproduces the input.
//! Elements carry no parent pointers and no absolute positions: widths are
//! relative, and callers that need offsets thread a running start down the
//! descent (see [`token_at_position`] and [`PositionTrackingWalker`]).

mod builder;
mod element;
mod error;
mod invariants;
mod list;
mod navigation;
mod node;
mod preorder;
mod separated_list;
mod syntax_kind;
mod token;
mod trivia;
mod walker;

pub use builder::TreeBuilder;
pub use element::{Element, ElementCategory, ElementFlags, NodeOrToken, SyntaxElement};
pub use error::{SyntaxError, SyntaxResult};
/// Structural self-checks, used by tests and by the `check` command.
pub use invariants::{InvariantChecker, InvariantViolation};
pub use list::SyntaxList;
pub use navigation::{
    Positioned, ancestors_at_position, innermost_node_at_position, token_at_position,
};
pub use node::{ChildrenWithTokens, SyntaxNode, SyntaxNodeOrToken};
pub use preorder::{Preorder, WalkEvent};
pub use separated_list::{SeparatedSlot, SeparatedSlots, SeparatedSyntaxList};
/// Token and node kinds used throughout the tree.
pub use syntax_kind::SyntaxKind;
pub use text_size::{TextRange, TextSize};
pub use token::SyntaxToken;
pub use trivia::{Trivia, TriviaFlags, TriviaIter, TriviaKind, TriviaList, TriviaPiece};
pub use walker::{
    Descend, IdentifierCollector, PositionTrackingWalker, SyntaxWalker, walk_element, walk_list,
    walk_node, walk_separated_list, walk_token, walk_trivia_list,
};
