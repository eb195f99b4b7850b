use crate::element::NodeOrToken;
use crate::node::ChildrenWithTokens;
use crate::{SyntaxNode, SyntaxToken};

/// Preorder walk event. Lists are flattened, so only nodes and tokens appear.
#[derive(Clone, Copy, Debug)]
pub enum WalkEvent<'a> {
    EnterNode(&'a SyntaxNode),
    LeaveNode(&'a SyntaxNode),
    Token(&'a SyntaxToken),
}

/// Preorder traversal over nodes and tokens.
#[derive(Clone)]
pub struct Preorder<'a> {
    stack: Vec<(&'a SyntaxNode, ChildrenWithTokens<'a>)>,
    root: Option<&'a SyntaxNode>,
}

impl<'a> Preorder<'a> {
    #[inline]
    fn new(start: &'a SyntaxNode) -> Preorder<'a> {
        Preorder { stack: Vec::with_capacity(128), root: Some(start) }
    }

    /// Skips the rest of the most recently entered node, without a
    /// [`WalkEvent::LeaveNode`] for it.
    #[inline]
    pub fn skip_subtree(&mut self) {
        assert!(self.stack.pop().is_some(), "must have a subtree to skip");
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = WalkEvent<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let Some((_, active_node)) = self.stack.last_mut() else {
            let root = self.root.take()?;
            self.stack.push((root, root.children_with_tokens()));
            return Some(WalkEvent::EnterNode(root));
        };
        match active_node.next() {
            Some(NodeOrToken::Node(child)) => {
                self.stack.push((child, child.children_with_tokens()));
                Some(WalkEvent::EnterNode(child))
            }
            Some(NodeOrToken::Token(child)) => Some(WalkEvent::Token(child)),
            None => {
                let (exited_node, _) = self.stack.pop()?;
                Some(WalkEvent::LeaveNode(exited_node))
            }
        }
    }
}

impl SyntaxNode {
    /// Returns a preorder iterator over nodes and tokens.
    #[inline]
    pub fn preorder_with_tokens(&self) -> Preorder<'_> {
        Preorder::new(self)
    }

    /// Iterates the tokens of the subtree in source order.
    pub fn tokens(&self) -> impl Iterator<Item = &SyntaxToken> {
        self.preorder_with_tokens().filter_map(|event| match event {
            WalkEvent::Token(token) => Some(token),
            WalkEvent::EnterNode(_) | WalkEvent::LeaveNode(_) => None,
        })
    }
}
