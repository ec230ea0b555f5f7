//! Resolved method and parameter symbols.

use id_arena::Id;

use super::source::{FileId, Span};
use super::types::TypeId;

pub type MethodId = Id<MethodDef>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Ordinary,
    LocalFunction,
    Constructor,
    Operator,
    PropertyAccessor,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: Option<TypeId>,
    pub span: Span,
}

impl Param {
    pub fn new(name: &str, ty: Option<TypeId>) -> Self {
        Self {
            name: name.to_string(),
            ty,
            span: Span::default(),
        }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

#[derive(Debug)]
pub struct MethodDef {
    pub name: String,
    pub kind: MethodKind,
    pub containing_type: Option<TypeId>,
    pub is_async: bool,
    /// `None` means the method returns no value.
    pub returns: Option<TypeId>,
    pub is_override: bool,
    /// Explicit interface implementation; the signature is fixed by contract.
    pub implements_interface_member: bool,
    pub params: Vec<Param>,
    pub attributes: Vec<String>,
    pub span: Span,
    pub return_type_span: Option<Span>,
    /// Source file of the declaration; `None` for metadata-only symbols.
    pub file: Option<FileId>,
}

impl MethodDef {
    pub fn new(name: &str, kind: MethodKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            containing_type: None,
            is_async: false,
            returns: None,
            is_override: false,
            implements_interface_member: false,
            params: Vec::new(),
            attributes: Vec::new(),
            span: Span::default(),
            return_type_span: None,
            file: None,
        }
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn returning(mut self, ty: TypeId) -> Self {
        self.returns = Some(ty);
        self
    }

    pub fn overriding(mut self) -> Self {
        self.is_override = true;
        self
    }

    pub fn implementing_interface(mut self) -> Self {
        self.implements_interface_member = true;
        self
    }

    pub fn in_type(mut self, ty: TypeId) -> Self {
        self.containing_type = Some(ty);
        self
    }

    pub fn with_params(mut self, params: Vec<Param>) -> Self {
        self.params = params;
        self
    }

    pub fn with_attribute(mut self, attribute: &str) -> Self {
        self.attributes.push(attribute.to_string());
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_return_type_span(mut self, span: Span) -> Self {
        self.return_type_span = Some(span);
        self
    }
}
