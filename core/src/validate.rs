//! Structural and semantic checks delegated to an external validator
//! at two points in the tree builder's per-element protocol.
use crate::deferred::Deferral;
use crate::options::Options;
use crate::tree::{DataTree, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Ok,
    /// Reject the whole parse.
    HardFail,
    /// Drop just this node/subtree, without failing the parse.
    SoftDiscard,
}

/// Extension points invoked from the tree builder. The default
/// implementation is permissive: every check passes, which is the right
/// behavior for a core that has no external validator wired in and is
/// asked only to bind and decode, not fully validate, a tree.
pub trait ValidationHooks {
    /// Called immediately after a node is linked into the tree, before its
    /// children are visited: positional legality (e.g. choice-branch
    /// uniqueness).
    fn context(
        &mut self,
        _tree: &DataTree,
        _node: NodeId,
        _options: Options,
        _deferrals: &[Deferral],
    ) -> HookOutcome {
        HookOutcome::Ok
    }

    /// Called after a node's children have all been visited: mandatory
    /// descendants, list keys, uniques, when/must.
    fn content(
        &mut self,
        _tree: &DataTree,
        _node: NodeId,
        _options: Options,
        _deferrals: &[Deferral],
    ) -> HookOutcome {
        HookOutcome::Ok
    }
}

/// The permissive default used when no validator is supplied.
#[derive(Debug, Default)]
pub struct PermissiveHooks;

impl ValidationHooks for PermissiveHooks {}
