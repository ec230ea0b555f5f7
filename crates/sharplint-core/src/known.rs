//! Per-session cache of well-known framework type references.
//!
//! Each entry is resolved by qualified name at most once per session; a
//! miss is memoized as "absent" rather than surfaced as an error, and
//! detectors skip the sub-checks that depend on the missing symbol.

use std::sync::OnceLock;

use tracing::debug;

use crate::model::{Compilation, TypeId};

/// Qualified names of the framework types the detectors consult.
pub mod well_known {
    pub const OBJECT: &str = "System.Object";
    pub const BOOLEAN: &str = "System.Boolean";
    pub const STRING: &str = "System.String";
    pub const EXCEPTION: &str = "System.Exception";
    pub const EVENT_ARGS: &str = "System.EventArgs";
    pub const OPERATION_CANCELED_EXCEPTION: &str = "System.OperationCanceledException";
    pub const CONSOLE: &str = "System.Console";
    pub const IENUMERABLE_OF_T: &str = "System.Collections.Generic.IEnumerable`1";
}

#[derive(Debug, Default)]
pub struct KnownSymbols {
    object: OnceLock<Option<TypeId>>,
    boolean: OnceLock<Option<TypeId>>,
    string: OnceLock<Option<TypeId>>,
    event_args: OnceLock<Option<TypeId>>,
    operation_canceled: OnceLock<Option<TypeId>>,
    console: OnceLock<Option<TypeId>>,
    enumerable_of_t: OnceLock<Option<TypeId>>,
}

impl KnownSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(
        slot: &OnceLock<Option<TypeId>>,
        compilation: &Compilation,
        qualified_name: &str,
    ) -> Option<TypeId> {
        *slot.get_or_init(|| {
            let found = compilation.types.by_qualified_name(qualified_name);
            if found.is_none() {
                debug!(type_name = qualified_name, "well-known type not present");
            }
            found
        })
    }

    pub fn object(&self, compilation: &Compilation) -> Option<TypeId> {
        Self::resolve(&self.object, compilation, well_known::OBJECT)
    }

    pub fn boolean(&self, compilation: &Compilation) -> Option<TypeId> {
        Self::resolve(&self.boolean, compilation, well_known::BOOLEAN)
    }

    pub fn string(&self, compilation: &Compilation) -> Option<TypeId> {
        Self::resolve(&self.string, compilation, well_known::STRING)
    }

    pub fn event_args(&self, compilation: &Compilation) -> Option<TypeId> {
        Self::resolve(&self.event_args, compilation, well_known::EVENT_ARGS)
    }

    pub fn operation_canceled_exception(&self, compilation: &Compilation) -> Option<TypeId> {
        Self::resolve(
            &self.operation_canceled,
            compilation,
            well_known::OPERATION_CANCELED_EXCEPTION,
        )
    }

    pub fn console(&self, compilation: &Compilation) -> Option<TypeId> {
        Self::resolve(&self.console, compilation, well_known::CONSOLE)
    }

    pub fn enumerable_of_t(&self, compilation: &Compilation) -> Option<TypeId> {
        Self::resolve(&self.enumerable_of_t, compilation, well_known::IENUMERABLE_OF_T)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Compilation;

    #[test]
    fn resolves_present_types() {
        let compilation = crate::model::CompilationBuilder::with_core_types().build();
        let known = KnownSymbols::new();

        assert!(known.console(&compilation).is_some());
        assert!(known.event_args(&compilation).is_some());
        assert_eq!(
            known.console(&compilation),
            compilation.types.by_qualified_name(well_known::CONSOLE)
        );
    }

    #[test]
    fn missing_type_is_absent_not_an_error() {
        let compilation = Compilation::builder().build();
        let known = KnownSymbols::new();

        assert!(known.operation_canceled_exception(&compilation).is_none());
        // Second lookup hits the memoized miss.
        assert!(known.operation_canceled_exception(&compilation).is_none());
    }

    #[test]
    fn repeated_lookups_return_the_same_handle() {
        let compilation = crate::model::CompilationBuilder::with_core_types().build();
        let known = KnownSymbols::new();

        let first = known.boolean(&compilation);
        let second = known.boolean(&compilation);
        assert_eq!(first, second);
        assert!(first.is_some());
    }
}
