//! The resolved program model consumed by every detector.
//!
//! A [`Compilation`] is one resolved symbol/type universe: a type registry,
//! a method arena, and the source files with their extracted operations.
//! The program-model provider constructs it through [`CompilationBuilder`];
//! the analysis core only ever reads it.

pub mod builder;
pub mod ops;
pub mod source;
pub mod symbols;
pub mod types;

use id_arena::Arena;

pub use builder::CompilationBuilder;
pub use ops::{
    Argument, ArgumentValue, CatchClause, Invocation, Lambda, LambdaForm, NameContext,
    NameDeclaration, Operation, Statement,
};
pub use source::{FileId, SourceFile, Span, span_of};
pub use symbols::{MethodDef, MethodId, MethodKind, Param};
pub use types::{DelegateSignature, TypeDef, TypeId, TypeKind, TypeRegistry};

pub struct Compilation {
    pub types: TypeRegistry,
    pub(crate) methods: Arena<MethodDef>,
    pub(crate) source_files: Arena<SourceFile>,
}

impl Compilation {
    pub fn builder() -> CompilationBuilder {
        CompilationBuilder::new()
    }

    pub fn method(&self, id: MethodId) -> &MethodDef {
        &self.methods[id]
    }

    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.source_files[id]
    }

    /// Files in registration order.
    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.source_files.iter().map(|(_, file)| file)
    }
}
