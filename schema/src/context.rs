use std::collections::HashMap;
use std::rc::Rc;

use crate::error::SchemaError;
use crate::identity::IdentityTable;
use crate::module::Module;
use crate::node::{resolve_in, SchemaNode};

/// The assembled schema a [`crate`] consumer hands to the data core: every
/// loaded module, its top-level data nodes, and the identity DAG shared
/// across all of them.
///
/// YANG textual parsing is out of scope here; a context is assembled
/// programmatically by a caller that already owns a compiled schema (e.g.
/// embedded `.yang` metadata, a YIN reader, or a generated module).
#[derive(Debug, Default)]
pub struct SchemaContext {
    modules: HashMap<Rc<str>, Rc<Module>>,
    top_level: HashMap<Rc<str>, Vec<Rc<SchemaNode>>>,
    identities: IdentityTable,
}

impl SchemaContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, module: Rc<Module>) {
        self.top_level.entry(Rc::clone(&module.name)).or_default();
        self.modules.insert(Rc::clone(&module.name), module);
    }

    pub fn module(&self, name: &str) -> Option<&Rc<Module>> {
        self.modules.get(name)
    }

    pub fn modules(&self) -> impl Iterator<Item = &Rc<Module>> {
        self.modules.values()
    }

    /// Registers `node` as a top-level schema node of `module`. The module
    /// must already have been added with [`Self::add_module`].
    pub fn add_top_level(
        &mut self,
        module_name: &str,
        node: SchemaNode,
    ) -> Result<(), SchemaError> {
        let nodes = self
            .top_level
            .get_mut(module_name)
            .ok_or_else(|| SchemaError::UnknownModule(module_name.to_string()))?;
        nodes.push(Rc::new(node));
        Ok(())
    }

    pub fn top_level_nodes(&self, module_name: &str) -> &[Rc<SchemaNode>] {
        self.top_level
            .get(module_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The entry point for top-of-tree resolution: finds a top-level node by
    /// (name, namespace) across every loaded module, descending through
    /// transparent nodes the same way [`SchemaNode::find_child`] does for
    /// inner resolution.
    pub fn resolve_top_level(&self, name: &str, namespace: &str) -> Option<Rc<SchemaNode>> {
        for nodes in self.top_level.values() {
            if let Some(found) = resolve_in(nodes, name, namespace) {
                return Some(found);
            }
        }
        None
    }

    pub fn identities(&self) -> &IdentityTable {
        &self.identities
    }

    pub fn identities_mut(&mut self) -> &mut IdentityTable {
        &mut self.identities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;
    use crate::types::{Type, TypeBase};

    fn module() -> Rc<Module> {
        Module::new("iana-if-type", "urn:ietf:params:xml:ns:yang:iana-if-type")
    }

    #[test]
    fn resolves_top_level_container_by_namespace() {
        let mut ctx = SchemaContext::new();
        let m = module();
        ctx.add_module(Rc::clone(&m));
        ctx.add_top_level(
            "iana-if-type",
            SchemaNode::new("interfaces", Rc::clone(&m), NodeType::Container).with_child(
                SchemaNode::leaf("name", Rc::clone(&m), Rc::new(Type::builtin(TypeBase::String))),
            ),
        )
        .unwrap();

        let found = ctx
            .resolve_top_level("interfaces", "urn:ietf:params:xml:ns:yang:iana-if-type")
            .expect("container should resolve");
        assert_eq!(&*found.name, "interfaces");
        assert!(ctx
            .resolve_top_level("interfaces", "urn:wrong:ns")
            .is_none());
    }

    #[test]
    fn descends_through_transparent_choice_case() {
        let mut ctx = SchemaContext::new();
        let m = module();
        ctx.add_module(Rc::clone(&m));
        let leaf = SchemaNode::leaf("a", Rc::clone(&m), Rc::new(Type::builtin(TypeBase::String)));
        let case = SchemaNode::new("case-a", Rc::clone(&m), NodeType::Case).with_child(leaf);
        let choice = SchemaNode::new("c", Rc::clone(&m), NodeType::Choice).with_child(case);
        ctx.add_top_level("iana-if-type", choice).unwrap();

        let found = ctx
            .resolve_top_level("a", "urn:ietf:params:xml:ns:yang:iana-if-type")
            .expect("leaf under choice/case should resolve transparently");
        assert_eq!(&*found.name, "a");
    }

    #[test]
    fn add_top_level_rejects_unknown_module() {
        let mut ctx = SchemaContext::new();
        let m = module();
        let err = ctx
            .add_top_level(
                "no-such-module",
                SchemaNode::new("x", m, NodeType::Container),
            )
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownModule(_)));
    }
}
