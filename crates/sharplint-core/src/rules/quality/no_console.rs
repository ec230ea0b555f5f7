//! MNA0003: unstructured console output.
//!
//! Direct `Console.Write`/`Console.WriteLine` calls bypass the host's
//! logging pipeline. When a required message prefix is configured, a call
//! whose text is known and lacks the prefix reports that instead; a call
//! whose text cannot be known at compile time is left alone.

use crate::declare_rule;
use crate::diagnostic::Diagnostic;
use crate::model::{Argument, Invocation, Operation};
use crate::options::{OptionLookup, RuleOptions};
use crate::rules::helpers::{has_test_marker, is_test_path, leading_literal_text};
use crate::rules::{Rule, RuleMetadata};
use crate::session::RuleContext;

#[derive(Debug, Clone)]
pub struct NoConsoleOptions {
    /// When non-empty, known message text must start with this prefix.
    pub required_prefix: String,
    pub required_prefix_ignore_case: bool,
    /// Tolerate console calls in top-level entry statements.
    pub allow_in_top_level: bool,
    /// Tolerate console calls in test files and test-marked code.
    pub allow_in_tests: bool,
}

impl Default for NoConsoleOptions {
    fn default() -> Self {
        Self {
            required_prefix: String::new(),
            required_prefix_ignore_case: false,
            allow_in_top_level: false,
            allow_in_tests: true,
        }
    }
}

impl RuleOptions for NoConsoleOptions {
    const RULE_ID: &'static str = "MNA0003";

    fn bind(lookup: &OptionLookup<'_>) -> Self {
        let defaults = Self::default();
        Self {
            required_prefix: lookup.string("required_prefix", &defaults.required_prefix),
            required_prefix_ignore_case: lookup.boolean(
                "required_prefix_ignore_case",
                defaults.required_prefix_ignore_case,
            ),
            allow_in_top_level: lookup.boolean("allow_in_top_level", defaults.allow_in_top_level),
            allow_in_tests: lookup.boolean("allow_in_tests", defaults.allow_in_tests),
        }
    }
}

declare_rule!(
    NoConsoleWriteRule,
    id = "MNA0003",
    name = "no-console-write",
    description = "Console output should go through the logging abstraction",
    category = Quality,
    severity = Info
);

impl Rule for NoConsoleWriteRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check_operation(&self, operation: &Operation, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let Operation::Invocation(call) = operation else {
            return Vec::new();
        };
        if call.callee_name != "Write" && call.callee_name != "WriteLine" {
            return Vec::new();
        }

        // Only the framework Console type qualifies; a user-defined type
        // of the same name, or an unresolved receiver, does not.
        let Some(console) = ctx.known().console(ctx.compilation()) else {
            return Vec::new();
        };
        if call.receiver_type != Some(console) {
            return Vec::new();
        }

        let options = ctx.options::<NoConsoleOptions>();

        if !options.required_prefix.is_empty() {
            if let Some(finding) = self.check_prefix(call, &options, ctx) {
                return vec![finding];
            }
        }

        if options.allow_in_top_level && call.top_level {
            return Vec::new();
        }
        if options.allow_in_tests
            && (is_test_path(&ctx.file.path)
                || has_test_marker(ctx.compilation(), call.enclosing_method, call.enclosing_type))
        {
            return Vec::new();
        }

        let span = call.callee_span.unwrap_or(call.span);
        let (line, column, end_line, end_column) = ctx.span_range(span);
        vec![
            Diagnostic::new(
                self.metadata.id,
                self.metadata.severity,
                format!("Unexpected Console.{} call", call.callee_name),
                &ctx.file.path,
                line,
                column,
            )
            .with_end(end_line, end_column)
            .with_suggestion("Route output through the logging abstraction"),
        ]
    }
}

impl NoConsoleWriteRule {
    /// Prefix sub-check: at most one finding per call, and a prefix
    /// violation preempts the general check.
    fn check_prefix(
        &self,
        call: &Invocation,
        options: &NoConsoleOptions,
        ctx: &RuleContext<'_>,
    ) -> Option<Diagnostic> {
        let argument = self.message_argument(call, ctx)?;
        let text = leading_literal_text(&argument.value)?;

        let matches = if options.required_prefix_ignore_case {
            text.to_lowercase()
                .starts_with(&options.required_prefix.to_lowercase())
        } else {
            text.starts_with(&options.required_prefix)
        };
        if matches {
            return None;
        }

        let span = argument
            .span
            .or(call.callee_span)
            .unwrap_or(call.span);
        let (line, column, end_line, end_column) = ctx.span_range(span);
        Some(
            Diagnostic::new(
                self.metadata.id,
                self.metadata.severity,
                format!(
                    "Console message does not start with the required prefix '{}'",
                    options.required_prefix
                ),
                &ctx.file.path,
                line,
                column,
            )
            .with_end(end_line, end_column)
            .with_note("required_prefix", options.required_prefix.clone()),
        )
    }

    /// First argument carrying string text, by literal shape or resolved
    /// string type.
    fn message_argument<'c>(
        &self,
        call: &'c Invocation,
        ctx: &RuleContext<'_>,
    ) -> Option<&'c Argument> {
        let string_type = ctx.known().string(ctx.compilation());
        call.arguments.iter().find(|argument| {
            leading_literal_text(&argument.value).is_some()
                || (argument.ty.is_some() && argument.ty == string_type)
        })
    }
}
