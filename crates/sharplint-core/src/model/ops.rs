//! Resolved operations: the per-occurrence facts detectors consume.
//!
//! Each variant carries what the program-model provider resolved for one
//! syntax occurrence. Detectors read these facts and never re-resolve
//! anything themselves.

use super::source::Span;
use super::symbols::{MethodId, Param};
use super::types::TypeId;

#[derive(Debug)]
pub enum Operation {
    /// A method or local function declaration.
    Method(MethodId),
    /// A function literal targeting a delegate type.
    Lambda(Lambda),
    /// A `catch` clause.
    Catch(CatchClause),
    /// A call expression with a resolved target.
    Invocation(Invocation),
    /// An identifier introduced by a non-method declaration.
    Name(NameDeclaration),
}

/// How a function literal was bound to its delegate type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LambdaForm {
    /// Implicit conversion at an assignment or argument position.
    Conversion,
    /// Explicit delegate construction, e.g. `new EventHandler(...)`.
    DelegateCreation,
}

#[derive(Debug)]
pub struct Lambda {
    pub is_async: bool,
    pub delegate_type: Option<TypeId>,
    pub form: LambdaForm,
    pub params: Vec<Param>,
    pub span: Span,
}

impl Lambda {
    pub fn new(form: LambdaForm, delegate_type: Option<TypeId>) -> Self {
        Self {
            is_async: false,
            delegate_type,
            form,
            params: Vec::new(),
            span: Span::default(),
        }
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn with_params(mut self, params: Vec<Param>) -> Self {
        self.params = params;
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// Statements as far as emptiness analysis cares about them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement {
    /// A bare statement separator with no effect.
    Empty,
    Throw,
    Expression,
    Other,
}

#[derive(Debug)]
pub struct CatchClause {
    /// Declared caught type; `None` for a bare `catch`.
    pub caught_type: Option<TypeId>,
    pub body: Vec<Statement>,
    /// Span of the `catch` keyword token.
    pub keyword_span: Span,
}

impl CatchClause {
    pub fn new(caught_type: Option<TypeId>) -> Self {
        Self {
            caught_type,
            body: Vec::new(),
            keyword_span: Span::default(),
        }
    }

    pub fn with_body(mut self, body: Vec<Statement>) -> Self {
        self.body = body;
        self
    }

    pub fn at_keyword(mut self, span: Span) -> Self {
        self.keyword_span = span;
        self
    }
}

#[derive(Debug, Clone)]
pub enum ArgumentValue {
    /// A plain string literal, in full.
    StringLiteral(String),
    /// An interpolated string; `leading` is the literal text before the
    /// first interpolation hole.
    InterpolatedString { leading: String },
    /// Anything without compile-time-known text.
    Other,
}

#[derive(Debug)]
pub struct Argument {
    pub value: ArgumentValue,
    pub ty: Option<TypeId>,
    /// `None` when the provider could not resolve a span for the argument.
    pub span: Option<Span>,
}

impl Argument {
    pub fn literal(text: &str) -> Self {
        Self {
            value: ArgumentValue::StringLiteral(text.to_string()),
            ty: None,
            span: None,
        }
    }

    pub fn interpolated(leading: &str) -> Self {
        Self {
            value: ArgumentValue::InterpolatedString {
                leading: leading.to_string(),
            },
            ty: None,
            span: None,
        }
    }

    pub fn other() -> Self {
        Self {
            value: ArgumentValue::Other,
            ty: None,
            span: None,
        }
    }

    pub fn typed(mut self, ty: TypeId) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

#[derive(Debug)]
pub struct Invocation {
    /// Resolved target procedure name.
    pub callee_name: String,
    /// Resolved containing type of the target.
    pub receiver_type: Option<TypeId>,
    pub arguments: Vec<Argument>,
    pub span: Span,
    /// Name/identifier sub-span of the callee, when resolvable.
    pub callee_span: Option<Span>,
    /// Lexically inside the program's top-level entry statements.
    pub top_level: bool,
    pub enclosing_method: Option<MethodId>,
    /// Innermost enclosing type declaration at the call site.
    pub enclosing_type: Option<TypeId>,
}

impl Invocation {
    pub fn new(callee_name: &str, receiver_type: Option<TypeId>) -> Self {
        Self {
            callee_name: callee_name.to_string(),
            receiver_type,
            arguments: Vec::new(),
            span: Span::default(),
            callee_span: None,
            top_level: false,
            enclosing_method: None,
            enclosing_type: None,
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<Argument>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_callee_span(mut self, span: Span) -> Self {
        self.callee_span = Some(span);
        self
    }

    pub fn in_top_level(mut self) -> Self {
        self.top_level = true;
        self
    }

    pub fn enclosed_by(mut self, method: MethodId) -> Self {
        self.enclosing_method = Some(method);
        self
    }

    pub fn in_type(mut self, ty: TypeId) -> Self {
        self.enclosing_type = Some(ty);
        self
    }
}

/// Declaration context for an introduced identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameContext {
    Local {
        /// Declared within a `for` statement's own initializer clause.
        in_for_initializer: bool,
    },
    Field {
        is_const: bool,
    },
    /// A single pattern/designation variable, e.g. `is string s`.
    PatternVariable,
    /// One element of a parenthesized or deconstruction designation.
    Designation,
    /// A `foreach` iteration variable.
    ForEach,
}

#[derive(Debug)]
pub struct NameDeclaration {
    pub name: String,
    pub ty: Option<TypeId>,
    pub span: Span,
    pub context: NameContext,
}

impl NameDeclaration {
    pub fn new(name: &str, context: NameContext) -> Self {
        Self {
            name: name.to_string(),
            ty: None,
            span: Span::default(),
            context,
        }
    }

    pub fn local(name: &str) -> Self {
        Self::new(
            name,
            NameContext::Local {
                in_for_initializer: false,
            },
        )
    }

    pub fn typed(mut self, ty: TypeId) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}
