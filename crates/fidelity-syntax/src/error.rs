use text_size::TextSize;

/// Programmer-error conditions reported by element accessors.
///
/// Malformed source never produces one of these; it is represented in the tree
/// itself through zero-width tokens and skipped-text trivia.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("index {index} is out of range for an element with {count} entries")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("position {position:?} is outside of an element spanning 0..{full_width:?}")]
    PositionOutOfRange { position: TextSize, full_width: TextSize },

    /// The node at `index` is the last one and no trailing separator follows it.
    #[error("node {index} is not followed by a separator")]
    MissingSeparator { index: usize },

    #[error("separated list slot {slot} must be a {expected}")]
    MalformedSeparatedList { slot: usize, expected: &'static str },
}

pub type SyntaxResult<T> = Result<T, SyntaxError>;
