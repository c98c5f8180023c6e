use std::rc::Rc;

use crate::arena::{Arena, Ref};
use crate::error::SchemaError;
use crate::module::Module;

/// Schema component: an `identity` statement. Identities form a DAG through
/// `base`/`derived`, so they are stored in an arena and referenced by index.
#[derive(Debug)]
pub struct Identity {
    pub name: Rc<str>,
    pub module: Rc<Module>,
    pub base: Option<Ref<Identity>>,
    pub derived: Vec<Ref<Identity>>,
}

/// Owns every identity loaded into a [`crate::SchemaContext`] and answers
/// identity-derivation queries when decoding IDENTITYREF values.
#[derive(Debug, Default)]
pub struct IdentityTable {
    arena: Arena<Identity>,
}

impl IdentityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<Rc<str>>,
        module: Rc<Module>,
        base: Option<Ref<Identity>>,
    ) -> Result<Ref<Identity>, SchemaError> {
        let name = name.into();
        if self.find(&module.name, &name).is_some() {
            return Err(SchemaError::DuplicateIdentity {
                module: module.name.to_string(),
                name: name.to_string(),
            });
        }
        let identity_ref = self.arena.push(Identity {
            name,
            module,
            base,
            derived: Vec::new(),
        });
        if let Some(base) = base {
            self.arena.get_mut(base).derived.push(identity_ref);
        }
        Ok(identity_ref)
    }

    pub fn get(&self, r: Ref<Identity>) -> &Identity {
        self.arena.get(r)
    }

    pub fn find(&self, module_name: &str, name: &str) -> Option<Ref<Identity>> {
        self.arena
            .iter()
            .find(|(_, id)| &*id.module.name == module_name && &*id.name == name)
            .map(|(r, _)| r)
    }

    /// True iff `candidate` is `base` itself or transitively derived from it.
    pub fn derives_from(&self, candidate: Ref<Identity>, base: Ref<Identity>) -> bool {
        if candidate == base {
            return true;
        }
        let mut current = self.arena.get(candidate).base;
        while let Some(b) = current {
            if b == base {
                return true;
            }
            current = self.arena.get(b).base;
        }
        false
    }
}
