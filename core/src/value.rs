//! Decodes a leaf's textual value against its schema type
//! (RFC 7950).
use std::rc::Rc;

use yang_data_schema::{Identity, IdentityTable, Ref, Type, TypeBase};

use crate::deferred::{Deferral, DeferralKind};
use crate::dictionary::Dictionary;
use crate::error::CoreError;
use crate::path::{self, PathContext};
use crate::tree::NodeId;

#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Bool(bool),
    Int64(i64),
    Uint64(u64),
    Decimal64(i64),
    Str(Rc<str>),
    Binary(Rc<str>),
    Enum { name: Rc<str>, value: i64 },
    Bits(Vec<Rc<str>>),
    Empty,
    Identityref(Ref<Identity>),
    InstanceIdentifier(Rc<str>),
    Leafref(Rc<str>),
}

pub struct Decoded {
    pub value_str: Rc<str>,
    pub value: DecodedValue,
    pub value_type: TypeBase,
}

#[allow(clippy::too_many_arguments)]
pub fn decode(
    leaf: NodeId,
    type_: &Type,
    text: &str,
    identities: &IdentityTable,
    path_ctx: &PathContext,
    dict: &mut Dictionary,
    resolve_now: bool,
    deferrals: &mut Vec<Deferral>,
) -> Result<Decoded, CoreError> {
    match type_.base {
        TypeBase::Bool => decode_bool(text, dict),
        TypeBase::Int8 | TypeBase::Int16 | TypeBase::Int32 | TypeBase::Int64 => {
            decode_int(type_, text, dict)
        }
        TypeBase::Uint8 | TypeBase::Uint16 | TypeBase::Uint32 | TypeBase::Uint64 => {
            decode_uint(type_, text, dict)
        }
        TypeBase::Dec64 => decode_decimal64(type_, text, dict),
        TypeBase::String => decode_string(type_, text, dict),
        TypeBase::Binary => decode_binary(type_, text, dict),
        TypeBase::Enum => decode_enum(type_, text, dict),
        TypeBase::Bits => decode_bits(type_, text, dict),
        TypeBase::Empty => decode_empty(text, dict),
        TypeBase::Identityref => decode_identityref(type_, text, identities, path_ctx, dict, false),
        TypeBase::InstanceIdentifier => {
            decode_instance_identifier(text, path_ctx, dict, resolve_now, leaf, deferrals, false)
        }
        TypeBase::Leafref => decode_leafref(text, type_, dict, resolve_now, leaf, deferrals),
        TypeBase::Union => decode_union(
            leaf, type_, text, identities, path_ctx, dict, resolve_now, deferrals,
        ),
    }
}

fn decode_bool(text: &str, dict: &mut Dictionary) -> Result<Decoded, CoreError> {
    let value = match text {
        "true" => true,
        "false" => false,
        other => return Err(CoreError::type_error(format!("{other:?} is not a valid boolean"))),
    };
    Ok(Decoded {
        value_str: dict.intern(text),
        value: DecodedValue::Bool(value),
        value_type: TypeBase::Bool,
    })
}

fn range_for(base: TypeBase) -> (i128, i128) {
    match base {
        TypeBase::Int8 => (i8::MIN as i128, i8::MAX as i128),
        TypeBase::Int16 => (i16::MIN as i128, i16::MAX as i128),
        TypeBase::Int32 => (i32::MIN as i128, i32::MAX as i128),
        TypeBase::Int64 => (i64::MIN as i128, i64::MAX as i128),
        TypeBase::Uint8 => (0, u8::MAX as i128),
        TypeBase::Uint16 => (0, u16::MAX as i128),
        TypeBase::Uint32 => (0, u32::MAX as i128),
        TypeBase::Uint64 => (0, u64::MAX as i128),
        _ => (i128::MIN, i128::MAX),
    }
}

fn decode_int(type_: &Type, text: &str, dict: &mut Dictionary) -> Result<Decoded, CoreError> {
    let parsed: i128 = text
        .parse()
        .map_err(|_| CoreError::type_error(format!("{text:?} is not a valid integer")))?;
    let (lo, hi) = type_.range.map_or_else(
        || range_for(type_.base),
        |r| (r.min as i128, r.max as i128),
    );
    if parsed < lo || parsed > hi {
        return Err(CoreError::type_error(format!("{text} out of range [{lo}, {hi}]")));
    }
    Ok(Decoded {
        value_str: dict.intern(text),
        value: DecodedValue::Int64(parsed as i64),
        value_type: type_.base,
    })
}

fn decode_uint(type_: &Type, text: &str, dict: &mut Dictionary) -> Result<Decoded, CoreError> {
    let parsed: i128 = text
        .parse()
        .map_err(|_| CoreError::type_error(format!("{text:?} is not a valid unsigned integer")))?;
    let (lo, hi) = type_.range.map_or_else(
        || range_for(type_.base),
        |r| (r.min as i128, r.max as i128),
    );
    if parsed < lo || parsed > hi {
        return Err(CoreError::type_error(format!("{text} out of range [{lo}, {hi}]")));
    }
    Ok(Decoded {
        value_str: dict.intern(text),
        value: DecodedValue::Uint64(parsed as u64),
        value_type: type_.base,
    })
}

fn decode_decimal64(type_: &Type, text: &str, dict: &mut Dictionary) -> Result<Decoded, CoreError> {
    let digits = type_.fraction_digits.ok_or_else(|| {
        CoreError::internal("decimal64 type missing fraction-digits")
    })?;
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, text),
    };
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, f),
        None => (body, ""),
    };
    if frac_part.len() > digits as usize {
        return Err(CoreError::type_error(format!(
            "{text:?} has more than {digits} fraction digits"
        )));
    }
    let int_val: i64 = int_part
        .parse()
        .map_err(|_| CoreError::type_error(format!("{text:?} is not a valid decimal64")))?;
    let mut frac_val: i64 = if frac_part.is_empty() {
        0
    } else {
        frac_part
            .parse()
            .map_err(|_| CoreError::type_error(format!("{text:?} is not a valid decimal64")))?
    };
    for _ in frac_part.len()..digits as usize {
        frac_val *= 10;
    }
    let scale = 10i64.pow(digits as u32);
    let scaled = sign * (int_val * scale + frac_val);
    if let Some(range) = type_.range {
        if scaled < range.min || scaled > range.max {
            return Err(CoreError::type_error(format!("{text} out of range")));
        }
    }
    Ok(Decoded {
        value_str: dict.intern(text),
        value: DecodedValue::Decimal64(scaled),
        value_type: TypeBase::Dec64,
    })
}

fn decode_string(type_: &Type, text: &str, dict: &mut Dictionary) -> Result<Decoded, CoreError> {
    check_string_constraints(type_, text)?;
    Ok(Decoded {
        value_str: dict.intern(text),
        value: DecodedValue::Str(dict.intern(text)),
        value_type: TypeBase::String,
    })
}

fn check_string_constraints(type_: &Type, text: &str) -> Result<(), CoreError> {
    let len = text.chars().count();
    if let Some(min) = type_.string.min_length {
        if len < min {
            return Err(CoreError::type_error(format!("{text:?} shorter than {min}")));
        }
    }
    if let Some(max) = type_.string.max_length {
        if len > max {
            return Err(CoreError::type_error(format!("{text:?} longer than {max}")));
        }
    }
    for pattern in &type_.string.patterns {
        if !simple_pattern_matches(pattern, text) {
            return Err(CoreError::type_error(format!(
                "{text:?} does not match pattern {pattern:?}"
            )));
        }
    }
    Ok(())
}

/// Pattern facets are full XSD regexes in YANG; evaluating them, like
/// when/must XPath expressions, is treated as an external concern here.
/// This recognizes only a literal-text pattern as a sanity check, and
/// otherwise accepts — a real deployment supplies a regex engine.
fn simple_pattern_matches(pattern: &str, text: &str) -> bool {
    if pattern.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return pattern == text;
    }
    true
}

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn base64_decode(text: &str) -> Option<Vec<u8>> {
    let clean: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if clean.is_empty() || clean.len() % 4 != 0 {
        return None;
    }
    let mut out = Vec::with_capacity(clean.len() / 4 * 3);
    for chunk in clean.chunks(4) {
        let mut vals = [0u8; 4];
        let mut pad = 0;
        for (i, &b) in chunk.iter().enumerate() {
            if b == b'=' {
                pad += 1;
                continue;
            }
            vals[i] = BASE64_ALPHABET.iter().position(|&c| c == b)? as u8;
        }
        out.push((vals[0] << 2) | (vals[1] >> 4));
        if pad < 2 {
            out.push((vals[1] << 4) | (vals[2] >> 2));
        }
        if pad < 1 {
            out.push((vals[2] << 6) | vals[3]);
        }
    }
    Some(out)
}

fn decode_binary(type_: &Type, text: &str, dict: &mut Dictionary) -> Result<Decoded, CoreError> {
    let bytes = base64_decode(text)
        .ok_or_else(|| CoreError::type_error(format!("{text:?} is not valid base64")))?;
    if let Some(min) = type_.string.min_length {
        if bytes.len() < min {
            return Err(CoreError::type_error("binary value shorter than min-length"));
        }
    }
    if let Some(max) = type_.string.max_length {
        if bytes.len() > max {
            return Err(CoreError::type_error("binary value longer than max-length"));
        }
    }
    let interned = dict.intern(text);
    Ok(Decoded {
        value_str: Rc::clone(&interned),
        value: DecodedValue::Binary(interned),
        value_type: TypeBase::Binary,
    })
}

fn decode_enum(type_: &Type, text: &str, dict: &mut Dictionary) -> Result<Decoded, CoreError> {
    let found = type_
        .enums
        .iter()
        .find(|e| &*e.name == text)
        .ok_or_else(|| CoreError::type_error(format!("{text:?} is not a declared enum value")))?;
    Ok(Decoded {
        value_str: dict.intern(text),
        value: DecodedValue::Enum {
            name: dict.intern(&found.name),
            value: found.value,
        },
        value_type: TypeBase::Enum,
    })
}

fn decode_bits(type_: &Type, text: &str, dict: &mut Dictionary) -> Result<Decoded, CoreError> {
    let mut seen = Vec::new();
    for name in text.split_whitespace() {
        if !type_.bits.iter().any(|b| &*b.name == name) {
            return Err(CoreError::type_error(format!("{name:?} is not a declared bit")));
        }
        if seen.iter().any(|s: &Rc<str>| s.as_ref() == name) {
            return Err(CoreError::type_error(format!("duplicate bit {name:?}")));
        }
        seen.push(dict.intern(name));
    }
    Ok(Decoded {
        value_str: dict.intern(text),
        value: DecodedValue::Bits(seen),
        value_type: TypeBase::Bits,
    })
}

fn decode_empty(text: &str, dict: &mut Dictionary) -> Result<Decoded, CoreError> {
    if !text.is_empty() {
        return Err(CoreError::type_error("empty-typed leaf carries non-empty text"));
    }
    Ok(Decoded {
        value_str: dict.intern(""),
        value: DecodedValue::Empty,
        value_type: TypeBase::Empty,
    })
}

fn decode_identityref(
    type_: &Type,
    text: &str,
    identities: &IdentityTable,
    path_ctx: &PathContext,
    dict: &mut Dictionary,
    silent: bool,
) -> Result<Decoded, CoreError> {
    let translated = if silent {
        match path::xml2json_silent(text, path_ctx) {
            Some(t) => t,
            None => return Err(CoreError::type_error("identityref prefix did not translate")),
        }
    } else {
        path::xml2json(text, path_ctx)?
    };
    let (module_name, name) = translated
        .split_once(':')
        .ok_or_else(|| CoreError::type_error(format!("{translated:?} is not module:name")))?;
    let candidate = identities
        .find(module_name, name)
        .ok_or_else(|| CoreError::type_error(format!("unknown identity {translated:?}")))?;
    if let Some(base) = type_.identity_base {
        if !identities.derives_from(candidate, base) {
            return Err(CoreError::type_error(format!(
                "{translated:?} does not derive from the declared base identity"
            )));
        }
    }
    Ok(Decoded {
        value_str: dict.intern(&translated),
        value: DecodedValue::Identityref(candidate),
        value_type: TypeBase::Identityref,
    })
}

#[allow(clippy::too_many_arguments)]
fn decode_instance_identifier(
    text: &str,
    path_ctx: &PathContext,
    dict: &mut Dictionary,
    resolve_now: bool,
    leaf: NodeId,
    deferrals: &mut Vec<Deferral>,
    silent: bool,
) -> Result<Decoded, CoreError> {
    let translated = if silent {
        match path::xml2json_silent(text, path_ctx) {
            Some(t) => t,
            None => return Err(CoreError::type_error("instance-identifier prefix did not translate")),
        }
    } else {
        path::xml2json(text, path_ctx)?
    };
    let interned = dict.intern(&translated);
    if resolve_now {
        deferrals.push(Deferral {
            leaf,
            kind: DeferralKind::InstanceIdentifier,
            text: Rc::clone(&interned),
            require_instance: true,
        });
    }
    Ok(Decoded {
        value_str: Rc::clone(&interned),
        value: DecodedValue::InstanceIdentifier(interned),
        value_type: TypeBase::InstanceIdentifier,
    })
}

fn decode_leafref(
    text: &str,
    type_: &Type,
    dict: &mut Dictionary,
    resolve_now: bool,
    leaf: NodeId,
    deferrals: &mut Vec<Deferral>,
) -> Result<Decoded, CoreError> {
    let interned = dict.intern(text);
    if resolve_now {
        let path = type_.leafref_path.clone().unwrap_or_default();
        deferrals.push(Deferral {
            leaf,
            kind: DeferralKind::Leafref,
            text: Rc::from(path.as_str()),
            require_instance: type_.require_instance,
        });
    }
    Ok(Decoded {
        value_str: Rc::clone(&interned),
        value: DecodedValue::Leafref(interned),
        value_type: TypeBase::Leafref,
    })
}

#[allow(clippy::too_many_arguments)]
fn decode_union(
    leaf: NodeId,
    type_: &Type,
    text: &str,
    identities: &IdentityTable,
    path_ctx: &PathContext,
    dict: &mut Dictionary,
    resolve_now: bool,
    deferrals: &mut Vec<Deferral>,
) -> Result<Decoded, CoreError> {
    for member in &type_.union_members {
        let attempt = if member.base.is_path_bearing() {
            match member.base {
                TypeBase::Identityref => {
                    decode_identityref(member, text, identities, path_ctx, dict, true)
                }
                TypeBase::InstanceIdentifier => decode_instance_identifier(
                    text, path_ctx, dict, resolve_now, leaf, deferrals, true,
                ),
                _ => unreachable!(),
            }
        } else {
            decode(
                leaf, member, text, identities, path_ctx, dict, resolve_now, deferrals,
            )
        };
        if let Ok(decoded) = attempt {
            return Ok(decoded);
        }
    }
    Err(CoreError::type_error(format!(
        "{text:?} matched no union subtype"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use yang_data_schema::{Module, SchemaContext};

    fn empty_ctx(schema: &SchemaContext) -> PathContext<'_> {
        PathContext::new(schema, Vec::new())
    }

    #[test]
    fn decodes_bool_and_rejects_garbage() {
        let mut dict = Dictionary::new();
        let d = decode_bool("true", &mut dict).unwrap();
        assert_eq!(d.value, DecodedValue::Bool(true));
        assert!(decode_bool("yes", &mut dict).is_err());
    }

    #[test]
    fn int_range_is_enforced() {
        let mut dict = Dictionary::new();
        let t = Type::builtin(TypeBase::Int8).with_range(-5, 5);
        assert!(decode_int(&t, "5", &mut dict).is_ok());
        assert!(decode_int(&t, "6", &mut dict).is_err());
    }

    #[test]
    fn decimal64_scales_fraction() {
        let mut dict = Dictionary::new();
        let t = Type::decimal64(2);
        let d = decode_decimal64(&t, "3.14", &mut dict).unwrap();
        assert_eq!(d.value, DecodedValue::Decimal64(314));
    }

    #[test]
    fn union_tries_identityref_then_falls_back_to_string() {
        let mut schema = SchemaContext::new();
        let m = Module::new("m", "urn:m");
        schema.add_module(Rc::clone(&m));
        let base = schema
            .identities_mut()
            .register("foo", Rc::clone(&m), None)
            .unwrap();
        schema
            .identities_mut()
            .register("id1", Rc::clone(&m), Some(base))
            .unwrap();

        let identity_type = Rc::new(Type::identityref(base));
        let string_type = Rc::new(Type::string());
        let union = Type::union(vec![identity_type, string_type]);

        let mut dict = Dictionary::new();
        let mut deferrals = Vec::new();
        let leaf = NodeId::test_id(0);

        let with_ns = PathContext::new(
            &schema,
            vec![path::NamespaceScope {
                prefix: Some(Rc::from("p")),
                uri: Rc::from("urn:m"),
            }],
        );
        let decoded = decode_union(
            leaf,
            &union,
            "p:id1",
            schema.identities(),
            &with_ns,
            &mut dict,
            true,
            &mut deferrals,
        )
        .unwrap();
        assert_eq!(decoded.value_type, TypeBase::Identityref);

        let no_ns = empty_ctx(&schema);
        let decoded = decode_union(
            leaf,
            &union,
            "p:id1",
            schema.identities(),
            &no_ns,
            &mut dict,
            true,
            &mut deferrals,
        )
        .unwrap();
        assert_eq!(decoded.value_type, TypeBase::String);
        assert_eq!(&*decoded.value_str, "p:id1");
    }
}
