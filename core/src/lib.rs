//! Schema-driven parsing and serialization of YANG instance data: binds
//! XML elements to schema nodes, decodes their typed values, and
//! serializes the resulting tree back to XML or JSON.
//!
//! The schema itself ([`yang_data_schema::SchemaContext`]) is an external
//! collaborator, assembled and loaded elsewhere; this crate only consumes
//! it.

pub mod deferred;
pub mod dictionary;
pub mod error;
pub mod json_io;
pub mod options;
pub mod path;
pub mod tree;
pub mod validate;
pub mod value;
pub mod xml_io;

pub use error::{CoreError, CoreResult, Outcome};
pub use json_io::print_data_json;
pub use options::Options;
pub use tree::{DataTree, NodeId};
pub use validate::{HookOutcome, PermissiveHooks, ValidationHooks};
pub use xml_io::{parse_data_xml, parse_rpc_output_xml, print_data_xml};

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use yang_data_schema::{Module, NodeFlags, NodeType, SchemaContext, SchemaNode, Type};

    use super::*;
    use crate::tree::NodeKind;

    fn module(ctx: &mut SchemaContext, name: &str, ns: &str) -> Rc<Module> {
        let m = Module::new(name, ns);
        ctx.add_module(Rc::clone(&m));
        m
    }

    #[test]
    fn insert_before_reorders_user_ordered_leaf_list_across_parses() {
        let mut ctx = SchemaContext::new();
        let m = module(&mut ctx, "m", "urn:m");
        let leaf_list = SchemaNode::leaf_list("x", Rc::clone(&m), Rc::new(Type::string()))
            .with_flags(NodeFlags {
                user_ordered: true,
                ..NodeFlags::default()
            });
        ctx.add_top_level("m", leaf_list).unwrap();

        // Fold two successive single-element parses into one datastore-wide
        // tree, the way a caller assembling a full instance document would.
        let doc1 = roxmltree::Document::parse(r#"<x xmlns="urn:m">a</x>"#).unwrap();
        let doc2 = roxmltree::Document::parse(
            r#"<x xmlns="urn:m" xmlns:yang="urn:ietf:params:xml:ns:yang:1" yang:insert="before" yang:value="a">b</x>"#,
        )
        .unwrap();

        let mut tree = DataTree::new();
        let mut dict = crate::dictionary::Dictionary::new();
        let mut deferrals = Vec::new();
        let mut hooks = PermissiveHooks;
        crate::xml_io::build_element(
            &mut tree,
            &ctx,
            None,
            doc1.root_element(),
            Options::empty(),
            &mut dict,
            &mut deferrals,
            &mut hooks,
        )
        .unwrap();
        crate::xml_io::build_element(
            &mut tree,
            &ctx,
            None,
            doc2.root_element(),
            Options::empty(),
            &mut dict,
            &mut deferrals,
            &mut hooks,
        )
        .unwrap();

        let order: Vec<&str> = tree
            .roots()
            .map(|id| match &tree.get(id).kind {
                NodeKind::Leaf { value_str, .. } => value_str.as_ref(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn lax_mode_unknown_element_returns_empty_tree() {
        let ctx = SchemaContext::new();
        let doc = roxmltree::Document::parse(r#"<foo xmlns="urn:unknown"/>"#).unwrap();
        let tree = parse_data_xml(&ctx, doc.root_element(), Options::empty()).unwrap();
        assert!(tree.roots().next().is_none());
    }

    #[test]
    fn strict_mode_unknown_element_errors() {
        let ctx = SchemaContext::new();
        let doc = roxmltree::Document::parse(r#"<foo xmlns="urn:unknown"/>"#).unwrap();
        let err = parse_data_xml(&ctx, doc.root_element(), Options::STRICT).unwrap_err();
        assert!(matches!(err, CoreError::SchemaBinding(_)));
    }

    #[test]
    fn anyxml_passthrough_preserves_children() {
        let mut ctx = SchemaContext::new();
        let m = module(&mut ctx, "m", "urn:m");
        ctx.add_top_level("m", SchemaNode::new("a", Rc::clone(&m), NodeType::Anyxml))
            .unwrap();
        let doc = roxmltree::Document::parse(r#"<a xmlns="urn:m"><b x="1"/><c/></a>"#).unwrap();
        let tree = parse_data_xml(&ctx, doc.root_element(), Options::empty()).unwrap();
        let root = tree.roots().next().unwrap();
        let NodeKind::Anyxml { payload } = &tree.get(root).kind else {
            panic!("expected anyxml node");
        };
        let mut buf = String::new();
        for node in payload {
            node.write_xml(&mut buf);
        }
        assert_eq!(buf, r#"<b x="1"/><c/>"#);
    }

    #[test]
    fn json_elides_namespace_on_same_module_child() {
        let mut ctx = SchemaContext::new();
        let m1 = module(&mut ctx, "m1", "urn:m1");
        let m2 = module(&mut ctx, "m2", "urn:m2");
        let foo = SchemaNode::new("foo", Rc::clone(&m1), NodeType::Container)
            .with_child(SchemaNode::leaf("bar", Rc::clone(&m1), Rc::new(Type::string())))
            .with_child(SchemaNode::leaf("baz", Rc::clone(&m2), Rc::new(Type::string())));
        ctx.add_top_level("m1", foo).unwrap();

        let xml = r#"<foo xmlns="urn:m1"><bar>1</bar><baz xmlns="urn:m2">2</baz></foo>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        let tree = parse_data_xml(&ctx, doc.root_element(), Options::empty()).unwrap();
        let json = print_data_json(&tree).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("m1:foo").is_some());
        let inner = &value["m1:foo"];
        assert_eq!(inner["bar"], "1");
        assert_eq!(inner["m2:baz"], "2");
    }
}
