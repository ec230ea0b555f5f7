//! MNA0002: catch clauses that silently swallow exceptions.

use std::collections::HashSet;

use crate::declare_rule;
use crate::diagnostic::Diagnostic;
use crate::model::{CatchClause, Operation, Statement};
use crate::options::{CaseSensitivity, OptionLookup, RuleOptions};
use crate::rules::{Rule, RuleMetadata};
use crate::session::RuleContext;

#[derive(Debug, Clone)]
pub struct EmptyCatchOptions {
    /// Tolerate empty handlers for cancellation exceptions.
    pub ignore_cancellation: bool,
    /// Count a body of bare `;` statements as empty.
    pub treat_empty_statement_as_empty: bool,
    /// Qualified exception type names whose empty handlers are accepted.
    pub allowed_exception_types: HashSet<String>,
}

impl Default for EmptyCatchOptions {
    fn default() -> Self {
        Self {
            ignore_cancellation: true,
            treat_empty_statement_as_empty: false,
            allowed_exception_types: HashSet::new(),
        }
    }
}

impl RuleOptions for EmptyCatchOptions {
    const RULE_ID: &'static str = "MNA0002";

    fn bind(lookup: &OptionLookup<'_>) -> Self {
        let defaults = Self::default();
        Self {
            ignore_cancellation: lookup.boolean("ignore_cancellation", defaults.ignore_cancellation),
            treat_empty_statement_as_empty: lookup.boolean(
                "treat_empty_statement_as_empty",
                defaults.treat_empty_statement_as_empty,
            ),
            allowed_exception_types: lookup.name_set(
                "allowed_exception_types",
                &[],
                CaseSensitivity::Sensitive,
            ),
        }
    }
}

declare_rule!(
    EmptyCatchRule,
    id = "MNA0002",
    name = "empty-catch",
    description = "Catch blocks should handle, log, or rethrow the exception",
    category = Reliability,
    severity = Warning
);

impl Rule for EmptyCatchRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check_operation(&self, operation: &Operation, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let Operation::Catch(clause) = operation else {
            return Vec::new();
        };

        let options = ctx.options::<EmptyCatchOptions>();
        if !is_empty_body(clause, &options) {
            return Vec::new();
        }
        if is_suppressed_type(clause, &options, ctx) {
            return Vec::new();
        }

        let (line, column, end_line, end_column) = ctx.span_range(clause.keyword_span);
        vec![
            Diagnostic::new(
                self.metadata.id,
                self.metadata.severity,
                "Empty catch block swallows exceptions",
                &ctx.file.path,
                line,
                column,
            )
            .with_end(end_line, end_column)
            .with_suggestion("Handle the exception, log it, or rethrow"),
        ]
    }
}

fn is_empty_body(clause: &CatchClause, options: &EmptyCatchOptions) -> bool {
    clause.body.is_empty()
        || (options.treat_empty_statement_as_empty
            && clause.body.iter().all(|s| *s == Statement::Empty))
}

fn is_suppressed_type(
    clause: &CatchClause,
    options: &EmptyCatchOptions,
    ctx: &RuleContext<'_>,
) -> bool {
    let Some(caught) = clause.caught_type else {
        // A bare `catch` names no type and is never suppressed.
        return false;
    };

    if options.ignore_cancellation {
        if let Some(canceled) = ctx.known().operation_canceled_exception(ctx.compilation()) {
            if ctx.compilation().types.is_or_derives_from(caught, canceled) {
                return true;
            }
        }
    }

    let qualified = &ctx.compilation().types.get(caught).qualified_name;
    options.allowed_exception_types.contains(qualified)
}
