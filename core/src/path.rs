//! Translates identity/instance-identifier path-bearing values between
//! XML's `prefix:local` (prefix bound by an in-scope `xmlns:` declaration)
//! and JSON's `module-name:local` conventions (RFC 7950).
use std::rc::Rc;

use yang_data_schema::SchemaContext;

use crate::error::CoreError;

/// One in-scope XML namespace declaration, as seen at the element where a
/// path-bearing value was found.
#[derive(Debug, Clone)]
pub struct NamespaceScope {
    pub prefix: Option<Rc<str>>,
    pub uri: Rc<str>,
}

/// Everything [`xml2json`]/[`json2xml`] need to resolve prefixes against
/// loaded modules.
pub struct PathContext<'a> {
    pub schema: &'a SchemaContext,
    pub in_scope: Vec<NamespaceScope>,
}

impl<'a> PathContext<'a> {
    pub fn new(schema: &'a SchemaContext, in_scope: Vec<NamespaceScope>) -> Self {
        Self { schema, in_scope }
    }

    fn lookup_xml_prefix(&self, prefix: &str) -> Option<&str> {
        self.in_scope
            .iter()
            .rev()
            .find(|scope| scope.prefix.as_deref() == Some(prefix))
            .map(|scope| scope.uri.as_ref())
    }
}

fn split_step(step: &str) -> (&str, &str) {
    match step.find('[') {
        Some(idx) => (&step[..idx], &step[idx..]),
        None => (step, ""),
    }
}

fn translate_step_xml_to_json(step: &str, ctx: &PathContext) -> Result<String, CoreError> {
    let (token, predicate) = split_step(step);
    let (prefix, local) = token
        .split_once(':')
        .ok_or_else(|| CoreError::type_error(format!("path token {token:?} has no prefix")))?;
    let uri = ctx
        .lookup_xml_prefix(prefix)
        .ok_or_else(|| CoreError::type_error(format!("unbound XML prefix {prefix:?}")))?;
    let module = ctx
        .schema
        .modules()
        .find(|m| &*m.namespace == uri)
        .ok_or_else(|| CoreError::type_error(format!("no module owns namespace {uri:?}")))?;
    Ok(format!("{}:{}{}", module.name, local, predicate))
}

/// `xml2json(expr, element_context)`: a bare token (identityref) or a
/// `/`-separated instance-identifier path, each step re-prefixed from its
/// XML namespace to the owning module's name.
pub fn xml2json(expr: &str, ctx: &PathContext) -> Result<String, CoreError> {
    if !expr.starts_with('/') {
        return translate_step_xml_to_json(expr, ctx);
    }
    let mut out = String::new();
    for step in expr.split('/').skip(1) {
        out.push('/');
        out.push_str(&translate_step_xml_to_json(step, ctx)?);
    }
    Ok(out)
}

/// Silent-mode [`xml2json`] for union member trial decoding: a translation
/// failure skips the subtype rather than failing the whole value.
pub fn xml2json_silent(expr: &str, ctx: &PathContext) -> Option<String> {
    xml2json(expr, ctx).ok()
}

fn translate_step_json_to_xml(
    step: &str,
    ctx: &PathContext,
    declared: &mut Vec<(Rc<str>, Rc<str>)>,
) -> Result<String, CoreError> {
    let (token, predicate) = split_step(step);
    let (module_name, local) = token
        .split_once(':')
        .ok_or_else(|| CoreError::type_error(format!("path token {token:?} has no module prefix")))?;
    let module = ctx
        .schema
        .module(module_name)
        .ok_or_else(|| CoreError::type_error(format!("unknown module {module_name:?}")))?;
    let prefix = Rc::clone(&module.name);
    if !declared.iter().any(|(p, _)| *p == prefix) {
        declared.push((Rc::clone(&prefix), Rc::clone(&module.namespace)));
    }
    Ok(format!("{prefix}:{local}{predicate}"))
}

/// `json2xml(expr, schema_module)`: returns the XML-prefixed expression
/// plus the `(prefix, namespace)` pairs the caller must declare on the
/// containing element. Module names double as XML prefixes here.
pub fn json2xml(
    expr: &str,
    ctx: &PathContext,
) -> Result<(String, Vec<(Rc<str>, Rc<str>)>), CoreError> {
    let mut declared = Vec::new();
    if !expr.starts_with('/') {
        let xml = translate_step_json_to_xml(expr, ctx, &mut declared)?;
        return Ok((xml, declared));
    }
    let mut out = String::new();
    for step in expr.split('/').skip(1) {
        out.push('/');
        out.push_str(&translate_step_json_to_xml(step, ctx, &mut declared)?);
    }
    Ok((out, declared))
}

#[cfg(test)]
mod tests {
    use super::*;
    use yang_data_schema::Module;

    fn ctx_with<'a>(schema: &'a SchemaContext, prefix: &str, uri: &str) -> PathContext<'a> {
        PathContext::new(
            schema,
            vec![NamespaceScope {
                prefix: Some(Rc::from(prefix)),
                uri: Rc::from(uri),
            }],
        )
    }

    #[test]
    fn xml2json_translates_bare_token() {
        let mut schema = SchemaContext::new();
        schema.add_module(Module::new("m", "urn:m"));
        let ctx = ctx_with(&schema, "p", "urn:m");
        assert_eq!(xml2json("p:id1", &ctx).unwrap(), "m:id1");
    }

    #[test]
    fn xml2json_rejects_unbound_prefix() {
        let schema = SchemaContext::new();
        let ctx = ctx_with(&schema, "p", "urn:m");
        assert!(xml2json("q:id1", &ctx).is_err());
        assert!(xml2json_silent("q:id1", &ctx).is_none());
    }

    #[test]
    fn json2xml_declares_module_prefix() {
        let mut schema = SchemaContext::new();
        schema.add_module(Module::new("m", "urn:m"));
        let ctx = ctx_with(&schema, "p", "urn:m");
        let (xml, declared) = json2xml("m:id1", &ctx).unwrap();
        assert_eq!(xml, "m:id1");
        assert_eq!(declared, vec![(Rc::from("m"), Rc::from("urn:m"))]);
    }
}
