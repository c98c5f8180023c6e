use bitflags::bitflags;

bitflags! {
    /// Parser/printer behavior flags.
    ///
    /// Default behavior with no flags set: unknown elements in a known
    /// namespace are silently dropped, values must resolve, and no
    /// edit-protocol attributes are recognized.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Options: u32 {
        /// Unknown elements in a known namespace are errors rather than
        /// silently skipped.
        const STRICT = 0b0000_0001;
        /// Each consumed XML child is freed as it is processed. The owned
        /// arena backing [`crate::tree::DataTree`] makes this a no-op here;
        /// the flag is retained for interface fidelity.
        const DESTRUCT = 0b0000_0010;
        /// Filter semantics: values may be absent, leafref/instance-identifier
        /// targets are not resolved, empty nodes may be pruned.
        const FILTER = 0b0000_0100;
        /// Edit semantics: recognize `insert`/`value` attributes in the
        /// NETCONF-operation namespace; skip value resolution.
        const EDIT = 0b0000_1000;
        const GET = 0b0001_0000;
        const GETCONFIG = 0b0010_0000;
    }
}

impl Options {
    /// Filter/edit/get/get-config modes all defer leafref and
    /// instance-identifier resolution.
    pub fn resolve_now(self) -> bool {
        !self.intersects(Self::FILTER | Self::EDIT | Self::GET | Self::GETCONFIG)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::empty()
    }
}
