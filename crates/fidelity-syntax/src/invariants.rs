use text_size::TextSize;

use crate::element::{Element, ElementFlags, NodeOrToken};
use crate::walker::{SyntaxWalker, walk_list, walk_node, walk_separated_list};
use crate::{SeparatedSyntaxList, SyntaxKind, SyntaxList, SyntaxNode, SyntaxToken};

/// First broken structural invariant found in a tree.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{kind:?} at {start:?}: {message}")]
pub struct InvariantViolation {
    pub kind: SyntaxKind,
    pub start: TextSize,
    pub message: String,
}

/// Walks a whole tree and verifies width additivity, flag aggregation and
/// separated-list alternation.
#[derive(Debug, Default)]
pub struct InvariantChecker {
    position: TextSize,
    violation: Option<InvariantViolation>,
}

impl InvariantChecker {
    pub fn check(root: &SyntaxNode) -> Result<(), InvariantViolation> {
        let mut checker = Self::default();
        checker.visit_node(root);
        match checker.violation {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }

    fn fail(&mut self, element: &impl Element, message: String) {
        if self.violation.is_none() {
            self.violation =
                Some(InvariantViolation { kind: element.kind(), start: self.position, message });
        }
    }

    fn check_aggregates(
        &mut self,
        element: &impl Element,
        width: TextSize,
        flags: ElementFlags,
        children: impl Iterator<Item = (TextSize, ElementFlags)>,
    ) {
        let (child_width, child_flags) = children.fold(
            (TextSize::new(0), ElementFlags::empty()),
            |(sum, union), (child_width, child_flags)| (sum + child_width, union | child_flags),
        );

        if width != child_width {
            self.fail(element, format!("width {width:?} but children sum to {child_width:?}"));
        }
        let own = if element.kind().is_typescript_specific() {
            ElementFlags::IS_TYPESCRIPT_SPECIFIC
        } else {
            ElementFlags::empty()
        };
        if flags != own | child_flags {
            self.fail(element, format!("flags {flags:?} but children have {child_flags:?}"));
        }
    }
}

impl SyntaxWalker for InvariantChecker {
    fn visit_node(&mut self, node: &SyntaxNode) {
        if self.violation.is_some() {
            return;
        }
        let children = node.children().iter().map(|child| (child.full_width(), child.flags()));
        self.check_aggregates(node, node.full_width(), node.flags(), children);
        walk_node(self, node);
    }

    fn visit_list(&mut self, list: &SyntaxList) {
        if self.violation.is_some() {
            return;
        }
        let children = list.iter().map(|node| (node.full_width(), node.flags()));
        self.check_aggregates(list, list.full_width(), list.flags(), children);
        walk_list(self, list);
    }

    fn visit_separated_list(&mut self, list: &SeparatedSyntaxList) {
        if self.violation.is_some() {
            return;
        }
        let children = list.elements().map(|slot| match slot {
            NodeOrToken::Node(node) => (node.full_width(), node.flags()),
            NodeOrToken::Token(token) => (token.full_width(), token.flags()),
        });
        self.check_aggregates(list, list.full_width(), list.flags(), children);

        for (slot, element) in list.elements().enumerate() {
            if (slot % 2 == 0) != matches!(element, NodeOrToken::Node(_)) {
                self.fail(list, format!("slot {slot} breaks node/separator alternation"));
            }
        }
        walk_separated_list(self, list);
    }

    fn visit_token(&mut self, token: &SyntaxToken) {
        if self.violation.is_some() {
            return;
        }
        let (text, width) = (token.full_text(), token.full_width());
        if TextSize::of(text.as_str()) != width {
            self.fail(token, format!("text {text:?} does not match width {width:?}"));
        }
        let skipped =
            token.leading_trivia().has_skipped_text() || token.trailing_trivia().has_skipped_text();
        if token.has_skipped_text() != skipped {
            self.fail(token, "skipped text flag disagrees with its trivia".to_owned());
        }
        self.position += width;
    }
}
