//! Construction API for the program model.
//!
//! This is the surface the program-model provider (or a test) uses to
//! assemble a [`Compilation`]. Files own their operations in source order;
//! method declarations are registered through [`CompilationBuilder::add_method`]
//! so the declaration operation and the symbol stay consistent.

use id_arena::Arena;

use crate::known::well_known;

use super::Compilation;
use super::ops::Operation;
use super::source::{FileId, SourceFile};
use super::symbols::{MethodDef, MethodId};
use super::types::{TypeDef, TypeId, TypeKind, TypeRegistry};

pub struct CompilationBuilder {
    types: TypeRegistry,
    methods: Arena<MethodDef>,
    source_files: Arena<SourceFile>,
}

impl Default for CompilationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilationBuilder {
    pub fn new() -> Self {
        Self {
            types: TypeRegistry::new(),
            methods: Arena::new(),
            source_files: Arena::new(),
        }
    }

    /// Builder preloaded with the common `System` types most detectors
    /// consult. Tests for known-symbol absence start from `new()` instead.
    pub fn with_core_types() -> Self {
        let mut builder = Self::new();
        let object = builder.declare_type(TypeDef::new(TypeKind::Class, "Object", well_known::OBJECT));
        builder.declare_type(
            TypeDef::new(TypeKind::Struct, "Boolean", well_known::BOOLEAN).with_base(object),
        );
        builder.declare_type(
            TypeDef::new(TypeKind::Struct, "Int32", "System.Int32").with_base(object),
        );
        builder.declare_type(
            TypeDef::new(TypeKind::Class, "String", well_known::STRING).with_base(object),
        );
        let exception = builder.declare_type(
            TypeDef::new(TypeKind::Class, "Exception", well_known::EXCEPTION).with_base(object),
        );
        builder.declare_type(
            TypeDef::new(
                TypeKind::Class,
                "OperationCanceledException",
                well_known::OPERATION_CANCELED_EXCEPTION,
            )
            .with_base(exception),
        );
        builder.declare_type(
            TypeDef::new(TypeKind::Class, "EventArgs", well_known::EVENT_ARGS).with_base(object),
        );
        builder
            .declare_type(TypeDef::new(TypeKind::Class, "Console", well_known::CONSOLE).with_base(object));
        builder.declare_type(TypeDef::new(
            TypeKind::Interface,
            "IEnumerable`1",
            well_known::IENUMERABLE_OF_T,
        ));
        builder
    }

    pub fn declare_type(&mut self, def: TypeDef) -> TypeId {
        self.types.declare(def)
    }

    pub fn type_named(&self, qualified_name: &str) -> Option<TypeId> {
        self.types.by_qualified_name(qualified_name)
    }

    pub fn add_file(&mut self, path: &str, source: &str) -> FileId {
        self.source_files.alloc_with_id(|id| SourceFile {
            id,
            path: path.to_string(),
            source: source.to_string(),
            operations: Vec::new(),
        })
    }

    /// Registers a method declared in `file` and records its declaration
    /// operation there.
    pub fn add_method(&mut self, file: FileId, mut def: MethodDef) -> MethodId {
        def.file = Some(file);
        let id = self.methods.alloc(def);
        self.source_files[file].operations.push(Operation::Method(id));
        id
    }

    /// Registers a method with no source location (metadata-only symbol).
    pub fn add_external_method(&mut self, def: MethodDef) -> MethodId {
        self.methods.alloc(def)
    }

    pub fn add_operation(&mut self, file: FileId, operation: Operation) {
        self.source_files[file].operations.push(operation);
    }

    pub fn build(self) -> Compilation {
        Compilation {
            types: self.types,
            methods: self.methods,
            source_files: self.source_files,
        }
    }
}
