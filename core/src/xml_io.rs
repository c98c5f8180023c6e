//! Builds the data tree from XML and handles the XML half of serialization.
//!
//! The raw XML tokenizer is out of scope here; this module consumes
//! `roxmltree`'s zero-copy tree as that external tokenizer and builds the
//! owned [`DataTree`] from it.
use std::fmt::Write as _;
use std::rc::Rc;

use yang_data_schema::{NodeType, SchemaContext, SchemaNode};

use crate::dictionary::Dictionary;
use crate::error::{CoreError, Outcome};
use crate::options::Options;
use crate::path::{NamespaceScope, PathContext};
use crate::tree::{Attribute, DataTree, Insert, Node, NodeId, NodeKind};
use crate::validate::{HookOutcome, ValidationHooks};
use crate::value::{self, DecodedValue};

/// The NETCONF `insert`/`value`/`operation` attribute namespace.
const YANG_ATTR_NS: &str = "urn:ietf:params:xml:ns:yang:1";

/// A deep-copied XML element, used for the anyxml payload — a deep copy
/// keeps input-immutable behavior the default.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedXml {
    pub name: Rc<str>,
    pub attrs: Vec<(Rc<str>, Rc<str>)>,
    pub children: Vec<OwnedXmlNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OwnedXmlNode {
    Element(OwnedXml),
    Text(Rc<str>),
}

impl OwnedXml {
    fn from_node(node: roxmltree::Node) -> Self {
        Self {
            name: Rc::from(node.tag_name().name()),
            attrs: node
                .attributes()
                .iter()
                .map(|a| (Rc::from(a.name()), Rc::from(a.value())))
                .collect(),
            children: owned_children(node),
        }
    }

    pub fn write_xml(&self, out: &mut String) {
        write!(out, "<{}", self.name).ok();
        for (name, value) in &self.attrs {
            write!(out, " {name}=\"{}\"", escape_xml(value)).ok();
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_xml(out);
        }
        write!(out, "</{}>", self.name).ok();
    }
}

impl OwnedXmlNode {
    pub fn write_xml(&self, out: &mut String) {
        match self {
            OwnedXmlNode::Element(e) => e.write_xml(out),
            OwnedXmlNode::Text(t) => out.push_str(&escape_xml(t)),
        }
    }
}

fn owned_children(node: roxmltree::Node) -> Vec<OwnedXmlNode> {
    node.children()
        .filter_map(|c| {
            if c.is_element() {
                Some(OwnedXmlNode::Element(OwnedXml::from_node(c)))
            } else if c.is_text() {
                c.text().map(|t| OwnedXmlNode::Text(Rc::from(t)))
            } else {
                None
            }
        })
        .collect()
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn in_scope_namespaces(elem: roxmltree::Node) -> Vec<NamespaceScope> {
    let mut ancestors: Vec<_> = elem.ancestors().collect();
    ancestors.reverse();
    let mut out = Vec::new();
    for node in ancestors {
        for ns in node.namespaces() {
            out.push(NamespaceScope {
                prefix: ns.name().map(Rc::from),
                uri: Rc::from(ns.uri()),
            });
        }
    }
    out
}

fn initial_kind(schema: &SchemaNode) -> NodeKind {
    match schema.nodetype {
        NodeType::Leaf | NodeType::LeafList => NodeKind::Leaf {
            value_str: Rc::from(""),
            value: DecodedValue::Empty,
            value_type: yang_data_schema::TypeBase::Empty,
            resolved_ref: None,
            unresolved: false,
        },
        NodeType::Anyxml => NodeKind::Anyxml { payload: Vec::new() },
        _ => NodeKind::Inner { first_child: None },
    }
}

fn parse_insert_attrs(schema_node: &SchemaNode, elem: roxmltree::Node) -> Result<Insert, CoreError> {
    let mut insert_kind = None;
    let mut value = None;
    for attr in elem.attributes() {
        if attr.namespace() == Some(YANG_ATTR_NS) {
            match attr.name() {
                "insert" => insert_kind = Some(attr.value()),
                "value" => value = Some(attr.value()),
                _ => {}
            }
        }
    }
    if insert_kind.is_none() && value.is_none() {
        return Ok(Insert::Last);
    }
    if !schema_node.nodetype.is_user_orderable() || !schema_node.flags.user_ordered {
        return Err(CoreError::structural(
            "insert/value attribute on a non-user-ordered node",
        ));
    }
    match insert_kind.unwrap_or("last") {
        "first" if value.is_none() => Ok(Insert::First),
        "last" if value.is_none() => Ok(Insert::Last),
        "before" => value
            .map(|v| Insert::Before(Rc::from(v)))
            .ok_or_else(|| CoreError::structural("insert=before requires a value attribute")),
        "after" => value
            .map(|v| Insert::After(Rc::from(v)))
            .ok_or_else(|| CoreError::structural("insert=after requires a value attribute")),
        "first" | "last" => Err(CoreError::structural(
            "value attribute forbidden with insert=first/last",
        )),
        other => Err(CoreError::structural(format!("unknown insert kind {other:?}"))),
    }
}

fn copy_attributes(
    tree: &mut DataTree,
    id: NodeId,
    schema: &SchemaContext,
    elem: roxmltree::Node,
    dict: &mut Dictionary,
) {
    let mut attrs = Vec::new();
    for attr in elem.attributes() {
        if attr.namespace() == Some(YANG_ATTR_NS) {
            continue;
        }
        match attr.namespace() {
            None => log::warn!("attribute {:?} has no namespace, ignoring", attr.name()),
            Some(ns) => match schema.modules().find(|m| &*m.namespace == ns) {
                Some(m) => attrs.push(Attribute {
                    module: Some(Rc::clone(m)),
                    name: dict.intern(attr.name()),
                    value: dict.intern(attr.value()),
                }),
                None => log::warn!(
                    "attribute {:?} belongs to unknown module {ns:?}, skipping",
                    attr.name()
                ),
            },
        }
    }
    tree.get_mut(id).attributes = attrs;
}

/// A validation hook's outcome as the ternary parse status it actually is:
/// `HardFail` unwinds the whole parse as an error, `SoftDiscard` drops only
/// the node under construction, `Ok` lets the builder continue.
fn hook_outcome(outcome: HookOutcome, context: &str) -> Outcome<()> {
    match outcome {
        HookOutcome::Ok => Outcome::Ok(()),
        HookOutcome::HardFail => Outcome::HardFail(CoreError::semantic(format!(
            "validation hook rejected {context}"
        ))),
        HookOutcome::SoftDiscard => Outcome::SoftDiscard,
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn build_element(
    tree: &mut DataTree,
    schema: &SchemaContext,
    parent: Option<NodeId>,
    elem: roxmltree::Node,
    options: Options,
    dict: &mut Dictionary,
    deferrals: &mut Vec<crate::deferred::Deferral>,
    hooks: &mut dyn ValidationHooks,
) -> Result<Option<NodeId>, CoreError> {
    let ns = elem
        .tag_name()
        .namespace()
        .ok_or_else(|| CoreError::structural("element has no namespace"))?;
    let name = elem.tag_name().name();

    let schema_node = match parent {
        Some(p) => tree.get(p).schema.find_child(name, ns),
        None => schema.resolve_top_level(name, ns),
    };
    let schema_node = match schema_node {
        Some(s) => s,
        None => {
            let namespace_known = schema.modules().any(|m| &*m.namespace == ns);
            if options.contains(Options::STRICT) || namespace_known {
                return Err(CoreError::schema_binding(format!(
                    "no schema node for {{{ns}}}{name}"
                )));
            }
            return Ok(None);
        }
    };

    let insert = parse_insert_attrs(&schema_node, elem)?;
    let node = Node {
        schema: Rc::clone(&schema_node),
        attributes: Vec::new(),
        parent,
        prev_sibling: NodeId::dangling(),
        next_sibling: None,
        kind: initial_kind(&schema_node),
    };
    let id = tree.insert_child(parent, node, insert);

    match hook_outcome(hooks.context(tree, id, options, deferrals), "the element") {
        Outcome::Ok(()) => {}
        Outcome::HardFail(e) => return Err(e),
        Outcome::SoftDiscard => return Ok(None),
    }

    match schema_node.nodetype {
        NodeType::Leaf | NodeType::LeafList => {
            let text = elem.text().unwrap_or("").trim();
            let type_ = schema_node
                .type_
                .as_ref()
                .ok_or_else(|| CoreError::internal("leaf schema node has no type"))?;
            let in_scope = in_scope_namespaces(elem);
            let path_ctx = PathContext::new(schema, in_scope);
            let decoded = value::decode(
                id,
                type_,
                text,
                schema.identities(),
                &path_ctx,
                dict,
                options.resolve_now(),
                deferrals,
            )?;
            let unresolved = matches!(
                decoded.value_type,
                yang_data_schema::TypeBase::Leafref | yang_data_schema::TypeBase::InstanceIdentifier
            );
            tree.get_mut(id).kind = NodeKind::Leaf {
                value_str: decoded.value_str,
                value: decoded.value,
                value_type: decoded.value_type,
                resolved_ref: None,
                unresolved,
            };
        }
        NodeType::Anyxml => {
            tree.get_mut(id).kind = NodeKind::Anyxml {
                payload: owned_children(elem),
            };
        }
        _ => {}
    }

    copy_attributes(tree, id, schema, elem, dict);

    if schema_node.nodetype.is_inner() {
        let child_options = match schema_node.nodetype {
            NodeType::Rpc | NodeType::Notification => Options::empty(),
            _ => options,
        };
        for child in elem.children().filter(|n| n.is_element()) {
            build_element(tree, schema, Some(id), child, child_options, dict, deferrals, hooks)?;
        }
    }

    match hook_outcome(hooks.content(tree, id, options, deferrals), "the element's content") {
        Outcome::Ok(()) => {}
        Outcome::HardFail(e) => return Err(e),
        Outcome::SoftDiscard => return Ok(None),
    }

    Ok(Some(id))
}

/// Parses a single top-level element against `schema`.
pub fn parse_data_xml(
    schema: &SchemaContext,
    root: roxmltree::Node,
    options: Options,
) -> Result<DataTree, CoreError> {
    let mut tree = DataTree::new();
    let mut dict = Dictionary::new();
    let mut deferrals = Vec::new();
    let mut hooks = crate::validate::PermissiveHooks;
    build_element(&mut tree, schema, None, root, options, &mut dict, &mut deferrals, &mut hooks)?;
    if options.resolve_now() {
        crate::deferred::resolve_all(&mut tree, deferrals)?;
    }
    Ok(tree)
}

/// Resolves children directly against the supplied RPC's OUTPUT schema
/// node rather than a top-level module scan.
pub fn parse_rpc_output_xml(
    schema: &SchemaContext,
    rpc_node: &SchemaNode,
    root: roxmltree::Node,
    options: Options,
) -> Result<DataTree, CoreError> {
    let name = root.tag_name().name();
    let ns = root
        .tag_name()
        .namespace()
        .ok_or_else(|| CoreError::structural("element has no namespace"))?;
    let schema_node = rpc_node
        .find_child(name, ns)
        .ok_or_else(|| CoreError::schema_binding(format!("{name:?} is not an RPC output child")))?;

    let mut tree = DataTree::new();
    let mut dict = Dictionary::new();
    let mut deferrals = Vec::new();
    let mut hooks = crate::validate::PermissiveHooks;
    let node = Node {
        schema: Rc::clone(&schema_node),
        attributes: Vec::new(),
        parent: None,
        prev_sibling: NodeId::dangling(),
        next_sibling: None,
        kind: initial_kind(&schema_node),
    };
    let id = tree.insert_child(None, node, Insert::Last);
    if schema_node.nodetype.is_inner() {
        for child in root.children().filter(|n| n.is_element()) {
            build_element(
                &mut tree,
                schema,
                Some(id),
                child,
                Options::empty(),
                &mut dict,
                &mut deferrals,
                &mut hooks,
            )?;
        }
    }
    crate::deferred::resolve_all(&mut tree, deferrals)?;
    Ok(tree)
}

/// XML encoding. Emits default-namespace declarations only at module
/// boundaries, and declares path-typed prefixes from
/// [`crate::path::json2xml`] on the leaf carrying them.
pub fn print_data_xml(schema: &SchemaContext, tree: &DataTree, formatted: bool) -> Result<String, CoreError> {
    let mut out = String::new();
    for root in tree.roots() {
        write_node(schema, tree, root, None, formatted, 0, &mut out)?;
        if formatted {
            out.push('\n');
        }
    }
    Ok(out)
}

fn write_node(
    schema: &SchemaContext,
    tree: &DataTree,
    id: NodeId,
    parent_ns: Option<&str>,
    formatted: bool,
    depth: usize,
    out: &mut String,
) -> Result<(), CoreError> {
    let node = tree.get(id);
    let indent = if formatted { "  ".repeat(depth) } else { String::new() };
    out.push_str(&indent);
    write!(out, "<{}", node.schema.name).ok();

    let own_ns = node.schema.module.namespace.as_ref();
    if parent_ns != Some(own_ns) {
        write!(out, " xmlns=\"{own_ns}\"").ok();
    }

    let mut path_prefixes: Vec<(Rc<str>, Rc<str>)> = Vec::new();
    let leaf_text = match &node.kind {
        NodeKind::Leaf { value_str, value_type, .. } => {
            if matches!(
                value_type,
                yang_data_schema::TypeBase::Identityref | yang_data_schema::TypeBase::InstanceIdentifier
            ) {
                let ctx = PathContext::new(schema, Vec::new());
                if let Ok((xml, declared)) = crate::path::json2xml(value_str, &ctx) {
                    path_prefixes = declared;
                    Some(xml)
                } else {
                    Some(value_str.to_string())
                }
            } else {
                Some(value_str.to_string())
            }
        }
        _ => None,
    };

    for (prefix, uri) in &path_prefixes {
        write!(out, " xmlns:{prefix}=\"{uri}\"").ok();
    }
    for attr in &node.attributes {
        let qname = match &attr.module {
            Some(m) => format!("{}:{}", m.name, attr.name),
            None => attr.name.to_string(),
        };
        write!(out, " {qname}=\"{}\"", escape_xml(&attr.value)).ok();
    }

    match &node.kind {
        NodeKind::Leaf { .. } => {
            let text = leaf_text.unwrap_or_default();
            write!(out, ">{}</{}>", escape_xml(&text), node.schema.name).ok();
        }
        NodeKind::Anyxml { payload } => {
            out.push('>');
            for child in payload {
                child.write_xml(out);
            }
            write!(out, "</{}>", node.schema.name).ok();
        }
        NodeKind::Inner { .. } => {
            let children: Vec<NodeId> = tree.children(id).collect();
            if children.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                if formatted {
                    out.push('\n');
                }
                for child in children {
                    write_node(schema, tree, child, Some(own_ns), formatted, depth + 1, out)?;
                    if formatted {
                        out.push('\n');
                    }
                }
                out.push_str(&indent);
                write!(out, "</{}>", node.schema.name).ok();
            }
        }
    }
    Ok(())
}
