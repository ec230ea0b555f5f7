//! MNA0001: async procedures that return no awaitable result.
//!
//! An async method or anonymous function whose declared return is void
//! cannot be awaited, so its exceptions bypass the caller and crash the
//! process. Event handlers are the conventional exception and are exempt
//! by default.

use crate::declare_rule;
use crate::diagnostic::Diagnostic;
use crate::model::{Lambda, MethodDef, MethodKind, Operation};
use crate::options::{OptionLookup, RuleOptions};
use crate::rules::helpers::is_event_handler_shape;
use crate::rules::{Rule, RuleMetadata};
use crate::session::RuleContext;

#[derive(Debug, Clone)]
pub struct AsyncVoidOptions {
    /// Exempt methods with the conventional `(object, EventArgs)` shape.
    pub allow_event_handlers: bool,
    /// Also inspect lambdas and delegate-creation expressions.
    pub check_anonymous_delegates: bool,
}

impl Default for AsyncVoidOptions {
    fn default() -> Self {
        Self {
            allow_event_handlers: true,
            check_anonymous_delegates: true,
        }
    }
}

impl RuleOptions for AsyncVoidOptions {
    const RULE_ID: &'static str = "MNA0001";

    fn bind(lookup: &OptionLookup<'_>) -> Self {
        let defaults = Self::default();
        Self {
            allow_event_handlers: lookup
                .boolean("allow_event_handlers", defaults.allow_event_handlers),
            check_anonymous_delegates: lookup
                .boolean("check_anonymous_delegates", defaults.check_anonymous_delegates),
        }
    }
}

declare_rule!(
    AsyncVoidRule,
    id = "MNA0001",
    name = "async-void",
    description = "Async methods and anonymous functions should return an awaitable result",
    category = Reliability,
    severity = Warning
);

impl Rule for AsyncVoidRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check_operation(&self, operation: &Operation, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        match operation {
            Operation::Method(id) => self.check_method(ctx.compilation().method(*id), ctx),
            Operation::Lambda(lambda) => self.check_lambda(lambda, ctx),
            _ => Vec::new(),
        }
    }
}

impl AsyncVoidRule {
    fn check_method(&self, method: &MethodDef, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        if !matches!(method.kind, MethodKind::Ordinary | MethodKind::LocalFunction) {
            return Vec::new();
        }
        if !method.is_async || method.returns.is_some() {
            return Vec::new();
        }
        // Overrides and interface implementations cannot change the
        // signature they inherit.
        if method.is_override || method.implements_interface_member {
            return Vec::new();
        }

        let options = ctx.options::<AsyncVoidOptions>();
        if options.allow_event_handlers
            && is_event_handler_shape(ctx.compilation(), ctx.known(), &method.params)
        {
            return Vec::new();
        }

        let what = match method.kind {
            MethodKind::LocalFunction => "local function",
            _ => "method",
        };
        let span = method.return_type_span.unwrap_or(method.span);
        let (line, column, end_line, end_column) = ctx.span_range(span);
        vec![
            Diagnostic::new(
                self.metadata.id,
                self.metadata.severity,
                format!(
                    "Async {what} '{}' returns no awaitable result",
                    method.name
                ),
                &ctx.file.path,
                line,
                column,
            )
            .with_end(end_line, end_column)
            .with_suggestion("Return a task-like type so callers can await completion and observe failures"),
        ]
    }

    fn check_lambda(&self, lambda: &Lambda, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let options = ctx.options::<AsyncVoidOptions>();
        if !options.check_anonymous_delegates || !lambda.is_async {
            return Vec::new();
        }

        // The hazard exists only when the target delegate's invoke
        // signature returns nothing; an unresolved delegate stays silent.
        let returns_nothing = lambda
            .delegate_type
            .and_then(|ty| ctx.compilation().types.get(ty).invoke.as_ref())
            .is_some_and(|signature| signature.returns.is_none());
        if !returns_nothing {
            return Vec::new();
        }

        if options.allow_event_handlers
            && is_event_handler_shape(ctx.compilation(), ctx.known(), &lambda.params)
        {
            return Vec::new();
        }

        let (line, column, end_line, end_column) = ctx.span_range(lambda.span);
        vec![
            Diagnostic::new(
                self.metadata.id,
                self.metadata.severity,
                "Async anonymous function returns no awaitable result",
                &ctx.file.path,
                line,
                column,
            )
            .with_end(end_line, end_column)
            .with_suggestion("Target a task-returning delegate so failures can be observed"),
        ]
    }
}
