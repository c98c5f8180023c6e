use std::rc::Rc;

use crate::arena::Ref;
use crate::identity::Identity;

/// The built-in base a typedef chain is ultimately rooted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeBase {
    Binary,
    Bits,
    Bool,
    Dec64,
    Empty,
    Enum,
    Identityref,
    InstanceIdentifier,
    Leafref,
    String,
    Union,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
}

impl TypeBase {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Uint8
                | Self::Uint16
                | Self::Uint32
                | Self::Uint64
                | Self::Dec64
        )
    }

    pub fn is_path_bearing(self) -> bool {
        matches!(self, Self::Identityref | Self::InstanceIdentifier)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NumericRange {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone)]
pub struct StringConstraints {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Stored as text; full XPath-grade pattern evaluation is out of scope
    /// here, but pattern facets that are plain regex-shaped string
    /// constraints are still applied by the value decoder.
    pub patterns: Vec<String>,
}

impl Default for StringConstraints {
    fn default() -> Self {
        Self {
            min_length: None,
            max_length: None,
            patterns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    pub name: Rc<str>,
    pub value: i64,
}

#[derive(Debug, Clone)]
pub struct BitValue {
    pub name: Rc<str>,
    pub position: u32,
}

/// A typedef chain rooted at a built-in base.
#[derive(Debug, Clone)]
pub struct Type {
    pub base: TypeBase,
    pub range: Option<NumericRange>,
    pub fraction_digits: Option<u8>,
    pub string: StringConstraints,
    pub enums: Vec<EnumValue>,
    pub bits: Vec<BitValue>,
    /// Restricted YANG path subset text; resolved lazily by deferred resolution.
    pub leafref_path: Option<String>,
    pub require_instance: bool,
    pub identity_base: Option<Ref<Identity>>,
    /// UNION subtypes, tried in declaration order.
    pub union_members: Vec<Rc<Type>>,
}

impl Type {
    pub fn builtin(base: TypeBase) -> Self {
        Self {
            base,
            range: None,
            fraction_digits: None,
            string: StringConstraints::default(),
            enums: Vec::new(),
            bits: Vec::new(),
            leafref_path: None,
            require_instance: true,
            identity_base: None,
            union_members: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::builtin(TypeBase::String)
    }

    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.range = Some(NumericRange { min, max });
        self
    }

    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.string.min_length = min;
        self.string.max_length = max;
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.string.patterns.push(pattern.into());
        self
    }

    pub fn decimal64(fraction_digits: u8) -> Self {
        let mut t = Self::builtin(TypeBase::Dec64);
        t.fraction_digits = Some(fraction_digits);
        t
    }

    pub fn enumeration(values: Vec<EnumValue>) -> Self {
        let mut t = Self::builtin(TypeBase::Enum);
        t.enums = values;
        t
    }

    pub fn bits(values: Vec<BitValue>) -> Self {
        let mut t = Self::builtin(TypeBase::Bits);
        t.bits = values;
        t
    }

    pub fn leafref(path: impl Into<String>, require_instance: bool) -> Self {
        let mut t = Self::builtin(TypeBase::Leafref);
        t.leafref_path = Some(path.into());
        t.require_instance = require_instance;
        t
    }

    pub fn instance_identifier(require_instance: bool) -> Self {
        let mut t = Self::builtin(TypeBase::InstanceIdentifier);
        t.require_instance = require_instance;
        t
    }

    pub fn identityref(base: Ref<Identity>) -> Self {
        let mut t = Self::builtin(TypeBase::Identityref);
        t.identity_base = Some(base);
        t
    }

    pub fn union(members: Vec<Rc<Type>>) -> Self {
        let mut t = Self::builtin(TypeBase::Union);
        t.union_members = members;
        t
    }
}
