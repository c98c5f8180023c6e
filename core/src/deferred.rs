//! Resolves LEAFREF and INSTANCE-IDENTIFIER targets once, after the
//! whole document has been built, rather than interleaved with parsing.
use std::rc::Rc;

use crate::error::CoreError;
use crate::tree::{DataTree, NodeId, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferralKind {
    Leafref,
    InstanceIdentifier,
}

/// Created by the value decoder whenever it cannot resolve a
/// path-bearing value immediately.
#[derive(Debug)]
pub struct Deferral {
    pub leaf: NodeId,
    pub kind: DeferralKind,
    pub text: Rc<str>,
    pub require_instance: bool,
}

/// Resolves every path in `text` against the data tree rooted at the
/// leaf's nearest ancestor, the restricted subset of YANG instance paths
/// this core recognizes: `/module:step/module:step[...]`, matched by
/// schema name+namespace and, for list predicates, by child leaf value.
fn resolve_path(tree: &DataTree, from: NodeId, text: &str) -> Option<NodeId> {
    let parent = tree.get(from).parent;
    let mut candidates: Vec<NodeId> = match parent {
        Some(p) => tree.children(p).collect(),
        None => tree.roots().collect(),
    };

    let steps: Vec<&str> = text.trim_start_matches('/').split('/').collect();
    let mut matched: Vec<NodeId> = Vec::new();
    for (i, step) in steps.iter().enumerate() {
        let (name_part, predicate) = match step.find('[') {
            Some(idx) => (&step[..idx], Some(&step[idx..])),
            None => (*step, None),
        };
        let (module_name, local) = name_part.split_once(':')?;

        matched = candidates
            .iter()
            .copied()
            .filter(|id| {
                let schema = &tree.get(*id).schema;
                &*schema.name == local && &*schema.module.name == module_name
            })
            .filter(|id| match predicate {
                Some(p) => matches_predicate(tree, *id, p),
                None => true,
            })
            .collect();
        if matched.is_empty() {
            return None;
        }
        if i + 1 < steps.len() {
            candidates = matched
                .iter()
                .flat_map(|id| tree.children(*id).collect::<Vec<_>>())
                .collect();
        }
    }
    matched.into_iter().next()
}

fn matches_predicate(tree: &DataTree, id: NodeId, predicate: &str) -> bool {
    let inner = predicate.trim_start_matches('[').trim_end_matches(']');
    let Some((key, expected)) = inner.split_once('=') else {
        return true;
    };
    let expected = expected.trim_matches('\'').trim_matches('"');
    let key = key.trim();
    tree.children(id).any(|child| {
        &*tree.get(child).schema.name == key
            && matches!(&tree.get(child).kind, NodeKind::Leaf { value_str, .. } if value_str.as_ref() == expected)
    })
}

/// Drains `deferrals`, binding each leaf's `resolved_ref`. A failure with
/// `require_instance` true fails the whole parse.
pub fn resolve_all(tree: &mut DataTree, deferrals: Vec<Deferral>) -> Result<(), CoreError> {
    for deferral in deferrals {
        let found = resolve_path(tree, deferral.leaf, &deferral.text);
        match (found, deferral.require_instance) {
            (Some(target), _) => {
                if let NodeKind::Leaf {
                    resolved_ref,
                    unresolved,
                    ..
                } = &mut tree.get_mut(deferral.leaf).kind
                {
                    *resolved_ref = Some(target);
                    *unresolved = false;
                }
            }
            (None, false) => {
                if let NodeKind::Leaf { unresolved, .. } = &mut tree.get_mut(deferral.leaf).kind {
                    *unresolved = false;
                }
            }
            (None, true) => {
                return Err(CoreError::reference(format!(
                    "{:?} target {:?} does not exist",
                    deferral.kind, deferral.text
                )));
            }
        }
    }
    Ok(())
}
