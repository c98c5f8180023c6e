use std::rc::Rc;

/// A loaded YANG module (or submodule, already resolved to its belongs-to
/// module's namespace, per RFC 7950 "Namespace comparison").
///
/// Two data nodes share a namespace scope iff their `Module`s are
/// pointer-identical `Rc`s, which is what lets the resolver and the
/// serializer use cheap identity comparisons instead of string compares.
#[derive(Debug, PartialEq, Eq)]
pub struct Module {
    pub name: Rc<str>,
    pub namespace: Rc<str>,
}

impl Module {
    pub fn new(name: impl Into<Rc<str>>, namespace: impl Into<Rc<str>>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            namespace: namespace.into(),
        })
    }
}
