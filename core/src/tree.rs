//! The typed data tree. An owned arena indexed by [`NodeId`], rather than
//! an intrusive doubly-linked structure — the sibling ring invariant
//! (parent/first-child/next-sibling/circular-prev) is preserved exactly,
//! just addressed by index instead of raw pointer.
use std::fmt;
use std::rc::Rc;

use yang_data_schema::{Module, SchemaNode};

use crate::value::DecodedValue;
use crate::xml_io::OwnedXmlNode;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    fn idx(self) -> usize {
        self.0 as usize
    }

    #[cfg(test)]
    pub fn test_id(n: u32) -> Self {
        Self(n)
    }

    /// Placeholder used before a node is linked in; [`DataTree::insert_child`]
    /// always overwrites it.
    pub(crate) fn dangling() -> Self {
        Self(u32::MAX)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId(#{})", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub module: Option<Rc<Module>>,
    pub name: Rc<str>,
    pub value: Rc<str>,
}

#[derive(Debug)]
pub enum NodeKind {
    Inner {
        first_child: Option<NodeId>,
    },
    Leaf {
        value_str: Rc<str>,
        value: DecodedValue,
        value_type: yang_data_schema::TypeBase,
        /// Bound once a LEAFREF or INSTANCE-IDENTIFIER target is resolved.
        resolved_ref: Option<NodeId>,
        unresolved: bool,
    },
    Anyxml {
        payload: Vec<OwnedXmlNode>,
    },
}

#[derive(Debug)]
pub struct Node {
    pub schema: Rc<SchemaNode>,
    pub attributes: Vec<Attribute>,
    pub parent: Option<NodeId>,
    pub prev_sibling: NodeId,
    pub next_sibling: Option<NodeId>,
    pub kind: NodeKind,
}

/// Where a newly built node is spliced into its sibling ring. Only leaf-list
/// and list insertion recognizes the NETCONF `insert`/`value` attributes;
/// every other node uses `Last`.
#[derive(Debug, Clone)]
pub enum Insert {
    Last,
    First,
    Before(Rc<str>),
    After(Rc<str>),
}

#[derive(Debug, Default)]
pub struct DataTree {
    nodes: Vec<Node>,
    first_root: Option<NodeId>,
}

impl DataTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.idx()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.idx()]
    }

    pub fn roots(&self) -> Siblings<'_> {
        Siblings {
            tree: self,
            next: self.first_root,
        }
    }

    pub fn children(&self, parent: NodeId) -> Siblings<'_> {
        let head = match &self.get(parent).kind {
            NodeKind::Inner { first_child } => *first_child,
            _ => None,
        };
        Siblings { tree: self, next: head }
    }

    fn head(&self, parent: Option<NodeId>) -> Option<NodeId> {
        match parent {
            Some(p) => match &self.get(p).kind {
                NodeKind::Inner { first_child } => *first_child,
                _ => None,
            },
            None => self.first_root,
        }
    }

    fn set_head(&mut self, parent: Option<NodeId>, head: Option<NodeId>) {
        match parent {
            Some(p) => {
                if let NodeKind::Inner { first_child } = &mut self.get_mut(p).kind {
                    *first_child = head;
                }
            }
            None => self.first_root = head,
        }
    }

    /// Links a freshly allocated node into its parent's (or the tree's
    /// top-level) sibling ring, maintaining `first.prev == last` and
    /// `n.next == None || n.next.prev == n`.
    pub fn insert_child(&mut self, parent: Option<NodeId>, mut node: Node, insert: Insert) -> NodeId {
        node.parent = parent;
        let id = NodeId(self.nodes.len() as u32);
        node.prev_sibling = id;
        node.next_sibling = None;
        self.nodes.push(node);

        let head = self.head(parent);
        let Some(head) = head else {
            self.set_head(parent, Some(id));
            return id;
        };

        let splice_before = |tree: &mut Self, target: NodeId| {
            let prev = tree.get(target).prev_sibling;
            let is_head = tree.head(parent) == Some(target);
            tree.get_mut(id).next_sibling = Some(target);
            tree.get_mut(id).prev_sibling = prev;
            tree.get_mut(target).prev_sibling = id;
            if is_head {
                tree.set_head(parent, Some(id));
            } else {
                tree.get_mut(prev).next_sibling = Some(id);
            }
        };
        let splice_after = |tree: &mut Self, target: NodeId| {
            let next = tree.get(target).next_sibling;
            tree.get_mut(id).prev_sibling = target;
            tree.get_mut(id).next_sibling = next;
            tree.get_mut(target).next_sibling = Some(id);
            match next {
                Some(n) => tree.get_mut(n).prev_sibling = id,
                None => {
                    let head = tree.head(parent).unwrap();
                    tree.get_mut(head).prev_sibling = id;
                }
            }
        };
        let find_by_value = |tree: &Self, value: &str| -> Option<NodeId> {
            let mut cur = Some(head);
            while let Some(c) = cur {
                if let NodeKind::Leaf { value_str, .. } = &tree.get(c).kind {
                    if value_str.as_ref() == value {
                        return Some(c);
                    }
                }
                cur = tree.get(c).next_sibling;
            }
            None
        };

        match insert {
            Insert::Last => splice_before_tail(self, parent, id, head),
            Insert::First => splice_before(self, head),
            Insert::Before(value) => {
                let target = find_by_value(self, &value).unwrap_or(head);
                splice_before(self, target);
            }
            Insert::After(value) => {
                let tail = self.get(head).prev_sibling;
                let target = find_by_value(self, &value).unwrap_or(tail);
                splice_after(self, target);
            }
        }
        id
    }
}

fn splice_before_tail(tree: &mut DataTree, parent: Option<NodeId>, id: NodeId, head: NodeId) {
    let tail = tree.get(head).prev_sibling;
    tree.get_mut(id).prev_sibling = tail;
    tree.get_mut(tail).next_sibling = Some(id);
    tree.get_mut(head).prev_sibling = id;
    let _ = parent;
}

pub struct Siblings<'a> {
    tree: &'a DataTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Siblings<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.get(current).next_sibling;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yang_data_schema::{NodeType, Type, TypeBase};

    fn leaf_node(schema: Rc<SchemaNode>, text: &str) -> Node {
        Node {
            schema,
            attributes: Vec::new(),
            parent: None,
            prev_sibling: NodeId(0),
            next_sibling: None,
            kind: NodeKind::Leaf {
                value_str: Rc::from(text),
                value: DecodedValue::Str(Rc::from(text)),
                value_type: TypeBase::String,
                resolved_ref: None,
                unresolved: false,
            },
        }
    }

    #[test]
    fn insert_before_reorders_user_ordered_leaf_list() {
        let m = Module::new("m", "urn:m");
        let schema = Rc::new(SchemaNode::leaf_list(
            "x",
            Rc::clone(&m),
            Rc::new(Type::string()),
        ));
        let mut tree = DataTree::new();
        let a = tree.insert_child(None, leaf_node(Rc::clone(&schema), "a"), Insert::Last);
        let _b = tree.insert_child(
            None,
            leaf_node(Rc::clone(&schema), "b"),
            Insert::Before(Rc::from("a")),
        );

        let order: Vec<&str> = tree
            .roots()
            .map(|id| match &tree.get(id).kind {
                NodeKind::Leaf { value_str, .. } => value_str.as_ref(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(order, vec!["b", "a"]);

        let head = tree.first_root.unwrap();
        let tail = tree.get(head).prev_sibling;
        assert_eq!(tail, a);
        assert!(tree.get(a).next_sibling.is_none());
    }

    #[test]
    fn sibling_ring_stays_circular_after_several_appends() {
        let m = Module::new("m", "urn:m");
        let schema = Rc::new(SchemaNode::leaf_list(
            "x",
            Rc::clone(&m),
            Rc::new(Type::string()),
        ));
        let mut tree = DataTree::new();
        for v in ["a", "b", "c"] {
            tree.insert_child(None, leaf_node(Rc::clone(&schema), v), Insert::Last);
        }
        let head = tree.first_root.unwrap();
        let tail = tree.get(head).prev_sibling;
        let mut cur = head;
        let mut count = 1;
        while let Some(next) = tree.get(cur).next_sibling {
            assert_eq!(tree.get(next).prev_sibling, cur);
            cur = next;
            count += 1;
        }
        assert_eq!(cur, tail);
        assert_eq!(count, 3);
    }
}
