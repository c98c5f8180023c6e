//! JSON encoding (draft-ietf-netmod-yang-json wire compatibility). No
//! JSON parse entry point exists here — instance data only ever arrives
//! as XML; JSON is an output format only.
use std::rc::Rc;

use serde_json::{Map, Number, Value};
use yang_data_schema::{NodeType, TypeBase};

use crate::error::CoreError;
use crate::tree::{DataTree, NodeId, NodeKind};
use crate::value::DecodedValue;

fn number_from_text(text: &str) -> Value {
    if text.contains('.') {
        return text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(text.to_string()));
    }
    if let Ok(i) = text.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(u) = text.parse::<u64>() {
        return Value::Number(u.into());
    }
    Value::String(text.to_string())
}

/// LEAFREF serializes the target leaf's string value.
fn leaf_value(tree: &DataTree, id: NodeId) -> Value {
    let NodeKind::Leaf {
        value_str,
        value,
        value_type,
        resolved_ref,
        ..
    } = &tree.get(id).kind
    else {
        return Value::Null;
    };
    match value_type {
        TypeBase::Bool => Value::Bool(matches!(value, DecodedValue::Bool(true))),
        TypeBase::Empty => Value::Array(vec![Value::Null]),
        TypeBase::Leafref => match resolved_ref {
            Some(target) => leaf_value(tree, *target),
            None => Value::String(value_str.to_string()),
        },
        b if b.is_numeric() => number_from_text(value_str),
        _ => Value::String(value_str.to_string()),
    }
}

fn attrs_value(tree: &DataTree, id: NodeId) -> Option<Value> {
    let node = tree.get(id);
    if node.attributes.is_empty() {
        return None;
    }
    let mut obj = Map::new();
    for attr in &node.attributes {
        let key = match &attr.module {
            Some(m) => format!("{}:{}", m.name, attr.name),
            None => attr.name.to_string(),
        };
        obj.insert(key, Value::String(attr.value.to_string()));
    }
    Some(Value::Object(obj))
}

fn key_for(schema: &yang_data_schema::SchemaNode, parent_ns: Option<&str>) -> String {
    if parent_ns == Some(schema.module.namespace.as_ref()) {
        schema.name.to_string()
    } else {
        format!("{}:{}", schema.module.name, schema.name)
    }
}

fn build_object(tree: &DataTree, children: impl Iterator<Item = NodeId>, parent_ns: Option<&str>) -> Map<String, Value> {
    let mut map = Map::new();
    let ids: Vec<NodeId> = children.collect();
    let mut i = 0;
    while i < ids.len() {
        let id = ids[i];
        let schema = Rc::clone(&tree.get(id).schema);
        let mut run = vec![id];
        let mut j = i + 1;
        while j < ids.len() && Rc::ptr_eq(&tree.get(ids[j]).schema, &schema) {
            run.push(ids[j]);
            j += 1;
        }
        let key = key_for(&schema, parent_ns);

        match schema.nodetype {
            NodeType::LeafList => {
                let mut values = Vec::with_capacity(run.len());
                let mut attr_values = Vec::with_capacity(run.len());
                let mut any_attrs = false;
                for &cid in &run {
                    values.push(leaf_value(tree, cid));
                    let a = attrs_value(tree, cid);
                    any_attrs |= a.is_some();
                    attr_values.push(a.unwrap_or(Value::Null));
                }
                map.insert(key.clone(), Value::Array(values));
                if any_attrs {
                    map.insert(format!("@{key}"), Value::Array(attr_values));
                }
            }
            NodeType::List => {
                let own_ns = Some(schema.module.namespace.as_ref());
                let mut values = Vec::with_capacity(run.len());
                let mut attr_values = Vec::with_capacity(run.len());
                let mut any_attrs = false;
                for &cid in &run {
                    let sub = build_object(tree, tree.children(cid), own_ns);
                    values.push(Value::Object(sub));
                    let a = attrs_value(tree, cid);
                    any_attrs |= a.is_some();
                    attr_values.push(a.unwrap_or(Value::Null));
                }
                map.insert(key.clone(), Value::Array(values));
                if any_attrs {
                    map.insert(format!("@{key}"), Value::Array(attr_values));
                }
            }
            NodeType::Leaf => {
                map.insert(key.clone(), leaf_value(tree, id));
                if let Some(attrs) = attrs_value(tree, id) {
                    map.insert(format!("@{key}"), attrs);
                }
            }
            NodeType::Anyxml => {
                let mut buf = String::new();
                if let NodeKind::Anyxml { payload } = &tree.get(id).kind {
                    for child in payload {
                        child.write_xml(&mut buf);
                    }
                }
                map.insert(key, Value::String(buf));
            }
            _ => {
                let own_ns = Some(schema.module.namespace.as_ref());
                let sub = build_object(tree, tree.children(id), own_ns);
                map.insert(key, Value::Object(sub));
            }
        }
        i = j;
    }
    map
}

pub fn print_data_json(tree: &DataTree) -> Result<String, CoreError> {
    let map = build_object(tree, tree.roots(), None);
    serde_json::to_string_pretty(&Value::Object(map)).map_err(|e| CoreError::internal(e.to_string()))
}
