use std::rc::Rc;

use crate::module::Module;
use crate::types::Type;

/// The kind of schema node, per RFC 7950's YANG statement taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Container,
    List,
    Leaf,
    LeafList,
    Anyxml,
    Choice,
    Case,
    Uses,
    Grouping,
    Input,
    Output,
    Rpc,
    Notification,
    Augment,
}

impl NodeType {
    /// CHOICE, CASE, USES, INPUT, and OUTPUT never appear in data but
    /// must be descended through while resolving an instance element
    /// against the schema tree.
    pub fn is_transparent(self) -> bool {
        matches!(
            self,
            Self::Choice | Self::Case | Self::Uses | Self::Input | Self::Output
        )
    }

    /// "GROUPING is always skipped during data binding."
    pub fn is_grouping(self) -> bool {
        matches!(self, Self::Grouping)
    }

    pub fn is_inner(self) -> bool {
        matches!(
            self,
            Self::Container | Self::List | Self::Rpc | Self::Notification
        )
    }

    pub fn is_leaf_like(self) -> bool {
        matches!(self, Self::Leaf | Self::LeafList)
    }

    pub fn is_user_orderable(self) -> bool {
        matches!(self, Self::List | Self::LeafList)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Current,
    Deprecated,
    Obsolete,
}

/// Per-node flags: config r/w, mandatory, user-ordered, status.
#[derive(Debug, Clone, Copy)]
pub struct NodeFlags {
    pub config: bool,
    pub mandatory: bool,
    pub user_ordered: bool,
    pub status: Status,
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self {
            config: true,
            mandatory: false,
            user_ordered: false,
            status: Status::Current,
        }
    }
}

/// A schema node, consumed but not owned by the data core: whoever loads
/// the YANG modules builds and keeps the [`SchemaContext`](crate::SchemaContext),
/// and this crate only ever borrows it.
#[derive(Debug)]
pub struct SchemaNode {
    pub name: Rc<str>,
    pub module: Rc<Module>,
    pub nodetype: NodeType,
    pub flags: NodeFlags,
    pub when: Option<String>,
    pub type_: Option<Rc<Type>>,
    pub children: Vec<Rc<SchemaNode>>,
    /// List/leaf-list keys, by child leaf name, for identity-constraint
    /// checks performed by the validation hooks.
    pub keys: Vec<Rc<str>>,
}

impl SchemaNode {
    pub fn new(name: impl Into<Rc<str>>, module: Rc<Module>, nodetype: NodeType) -> Self {
        Self {
            name: name.into(),
            module,
            nodetype,
            flags: NodeFlags::default(),
            when: None,
            type_: None,
            children: Vec::new(),
            keys: Vec::new(),
        }
    }

    pub fn leaf(name: impl Into<Rc<str>>, module: Rc<Module>, type_: Rc<Type>) -> Self {
        let mut n = Self::new(name, module, NodeType::Leaf);
        n.type_ = Some(type_);
        n
    }

    pub fn leaf_list(name: impl Into<Rc<str>>, module: Rc<Module>, type_: Rc<Type>) -> Self {
        let mut n = Self::new(name, module, NodeType::LeafList);
        n.type_ = Some(type_);
        n
    }

    pub fn with_child(mut self, child: SchemaNode) -> Self {
        self.children.push(Rc::new(child));
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = SchemaNode>) -> Self {
        self.children.extend(children.into_iter().map(Rc::new));
        self
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_keys(mut self, keys: impl IntoIterator<Item = impl Into<Rc<str>>>) -> Self {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Finds a (possibly transparent) child schema node in this node's
    /// children by name+namespace, the per-node half of top-level
    /// resolution.
    pub fn find_child(&self, name: &str, namespace: &str) -> Option<Rc<SchemaNode>> {
        resolve_in(&self.children, name, namespace)
    }
}

/// Walks a sibling list, skipping GROUPING, recursing through transparent
/// nodes, and matching concrete nodes by (name, namespace) identity.
pub fn resolve_in(siblings: &[Rc<SchemaNode>], name: &str, namespace: &str) -> Option<Rc<SchemaNode>> {
    for sibling in siblings {
        if sibling.nodetype.is_grouping() {
            continue;
        }
        if sibling.nodetype.is_transparent() {
            if let Some(found) = resolve_in(&sibling.children, name, namespace) {
                return Some(found);
            }
            continue;
        }
        if &*sibling.name == name && &*sibling.module.namespace == namespace {
            return Some(Rc::clone(sibling));
        }
    }
    None
}
