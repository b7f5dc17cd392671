//! Lazy tree walking with an explicit skip-subtree signal.

use rowan::WalkEvent;

use crate::parser::{SyntaxKind, SyntaxNode};

/// What the callback of [`walk`] wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitAction {
    /// Descend into the node's children.
    Continue,
    /// Do not visit the node's children.
    SkipChildren,
    /// Abort the whole walk.
    Stop,
}

/// Preorder walk over `root`, entering each node once.
///
/// Returns `false` when the callback stopped the walk.
pub fn walk(root: &SyntaxNode, mut f: impl FnMut(&SyntaxNode) -> VisitAction) -> bool {
    let mut preorder = root.preorder();
    while let Some(event) = preorder.next() {
        if let WalkEvent::Enter(node) = event {
            match f(&node) {
                VisitAction::Continue => {}
                VisitAction::SkipChildren => preorder.skip_subtree(),
                VisitAction::Stop => return false,
            }
        }
    }
    true
}

/// Lazily yields the nodes of `kind` under `root` (root included).
///
/// Restartable: each call creates a fresh iterator.
pub fn nodes_of_kind(root: &SyntaxNode, kind: SyntaxKind) -> impl Iterator<Item = SyntaxNode> {
    root.descendants().filter(move |n| n.kind() == kind)
}
