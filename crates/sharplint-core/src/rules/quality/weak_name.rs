//! MNA0004: identifiers whose names carry no meaning.
//!
//! Covers locals, fields, pattern variables, deconstruction designations,
//! `foreach` variables, and parameters. A name fails either by falling
//! under the configured minimum length or by appearing on the weak-word
//! list; the allowed list wins over both.

use std::collections::HashSet;

use crate::declare_rule;
use crate::diagnostic::Diagnostic;
use crate::model::{MethodDef, NameContext, NameDeclaration, Operation, Param, TypeId};
use crate::options::{CaseSensitivity, OptionLookup, RuleOptions};
use crate::rules::helpers::Candidate;
use crate::rules::{Rule, RuleMetadata};
use crate::session::RuleContext;

/// Single-letter counters conventional in `for` initializers.
const LOOP_COUNTERS: &[&str] = &["i", "j", "k"];

const DEFAULT_WEAK_NAMES: &[&str] = &["foo", "bar", "baz", "tmp", "temp", "obj", "val", "data"];

#[derive(Debug, Clone)]
pub struct WeakNameOptions {
    pub min_length: usize,
    /// Names accepted verbatim, matched case-sensitively.
    pub allowed_names: HashSet<String>,
    /// Placeholder words rejected outright, matched case-insensitively.
    pub weak_names: HashSet<String>,
    /// Also evaluate `foreach` iteration variables.
    pub check_foreach: bool,
}

impl Default for WeakNameOptions {
    fn default() -> Self {
        Self {
            min_length: 3,
            allowed_names: HashSet::new(),
            weak_names: DEFAULT_WEAK_NAMES.iter().map(|s| s.to_string()).collect(),
            check_foreach: false,
        }
    }
}

impl RuleOptions for WeakNameOptions {
    const RULE_ID: &'static str = "MNA0004";

    fn bind(lookup: &OptionLookup<'_>) -> Self {
        let defaults = Self::default();
        Self {
            min_length: lookup.integer("min_length", defaults.min_length as i64, 1..=64) as usize,
            allowed_names: lookup.name_set("allowed_names", &[], CaseSensitivity::Sensitive),
            weak_names: lookup.name_set(
                "weak_names",
                DEFAULT_WEAK_NAMES,
                CaseSensitivity::Insensitive,
            ),
            check_foreach: lookup.boolean("check_foreach", defaults.check_foreach),
        }
    }
}

declare_rule!(
    WeakIdentifierRule,
    id = "MNA0004",
    name = "weak-identifier",
    description = "Identifiers should have descriptive names",
    category = Quality,
    severity = Info
);

impl Rule for WeakIdentifierRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check_operation(&self, operation: &Operation, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        match operation {
            Operation::Name(declaration) => self.check_declaration(declaration, ctx),
            Operation::Method(id) => self.check_parameters(ctx.compilation().method(*id), ctx),
            _ => Vec::new(),
        }
    }
}

impl WeakIdentifierRule {
    fn check_declaration(
        &self,
        declaration: &NameDeclaration,
        ctx: &RuleContext<'_>,
    ) -> Vec<Diagnostic> {
        let options = ctx.options::<WeakNameOptions>();

        match declaration.context {
            // Constants are named by a different convention entirely.
            NameContext::Field { is_const: true } => return Vec::new(),
            NameContext::Local {
                in_for_initializer: true,
            } if LOOP_COUNTERS.contains(&declaration.name.as_str()) => return Vec::new(),
            NameContext::ForEach if !options.check_foreach => return Vec::new(),
            _ => {}
        }

        let candidate = Candidate {
            name: declaration.name.clone(),
            declared_type: declaration.ty,
            span: declaration.span,
        };
        self.evaluate(&candidate, &options, ctx).into_iter().collect()
    }

    fn check_parameters(&self, method: &MethodDef, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let options = ctx.options::<WeakNameOptions>();
        method
            .params
            .iter()
            .enumerate()
            .filter(|(index, param)| !is_conventional_event_param(*index, param, method, ctx))
            .filter_map(|(_, param)| {
                let candidate = Candidate {
                    name: param.name.clone(),
                    declared_type: param.ty,
                    span: param.span,
                };
                self.evaluate(&candidate, &options, ctx)
            })
            .collect()
    }

    fn evaluate(
        &self,
        candidate: &Candidate,
        options: &WeakNameOptions,
        ctx: &RuleContext<'_>,
    ) -> Option<Diagnostic> {
        let name = candidate.name.as_str();
        if name == "_" {
            // A discard deliberately has no name.
            return None;
        }

        let trimmed = name.strip_prefix('_').unwrap_or(name);
        if options.allowed_names.contains(name) || options.allowed_names.contains(trimmed) {
            return None;
        }

        let reason = if trimmed.chars().count() < options.min_length {
            format!(
                "Identifier '{name}' is shorter than the configured minimum of {} characters",
                options.min_length
            )
        } else if options.weak_names.contains(&name.to_lowercase()) {
            format!("Identifier '{name}' is a non-descriptive placeholder name")
        } else {
            return None;
        };

        let (line, column, end_line, end_column) = ctx.span_range(candidate.span);
        let mut diagnostic = Diagnostic::new(
            self.metadata.id,
            self.metadata.severity,
            reason,
            &ctx.file.path,
            line,
            column,
        )
        .with_end(end_line, end_column);

        if let Some(suggestion) = self.naming_hint(candidate.declared_type, ctx) {
            diagnostic = diagnostic.with_suggestion(suggestion);
        }
        Some(diagnostic)
    }

    /// Type-driven naming hint, when the declared type suggests one.
    fn naming_hint(&self, declared_type: Option<TypeId>, ctx: &RuleContext<'_>) -> Option<String> {
        let ty = declared_type?;
        let compilation = ctx.compilation();
        let known = ctx.known();

        if Some(ty) == known.boolean(compilation) {
            return Some("Boolean names read best with an is/has/can prefix".to_string());
        }

        let is_sequence = compilation.types.is_array(ty)
            || known
                .enumerable_of_t(compilation)
                .is_some_and(|enumerable| compilation.types.implements(ty, enumerable));
        if is_sequence {
            return Some("Collection names read best in the plural".to_string());
        }

        None
    }
}

fn is_conventional_event_param(
    index: usize,
    param: &Param,
    method: &MethodDef,
    ctx: &RuleContext<'_>,
) -> bool {
    if index != 1 || method.params.len() != 2 || param.name != "e" {
        return false;
    }
    let compilation = ctx.compilation();
    let known = ctx.known();

    let sender_is_object = match (method.params[0].ty, known.object(compilation)) {
        (Some(ty), Some(object)) => ty == object,
        _ => false,
    };
    if !sender_is_object {
        return false;
    }

    match (param.ty, known.event_args(compilation)) {
        (Some(ty), Some(event_args)) => compilation.types.is_or_derives_from(ty, event_args),
        _ => false,
    }
}
