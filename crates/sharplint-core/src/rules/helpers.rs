//! Shared predicates used by multiple rules.

use std::collections::HashSet;

use crate::known::KnownSymbols;
use crate::model::{ArgumentValue, Compilation, MethodId, Param, Span, TypeId};

/// Attribute names that mark a method or type as test code, with the
/// conventional `Attribute` suffix already stripped.
const TEST_MARKER_ATTRIBUTES: &[&str] = &[
    "Fact",
    "Theory",
    "Test",
    "TestCase",
    "TestCaseSource",
    "TestMethod",
    "DataTestMethod",
    "TestFixture",
    "TestClass",
];

/// Recognizes a test-marker attribute by its written name, with or
/// without the `Attribute` suffix.
pub fn is_test_marker(attribute: &str) -> bool {
    let stripped = attribute.strip_suffix("Attribute").unwrap_or(attribute);
    TEST_MARKER_ATTRIBUTES.contains(&stripped)
}

/// Checks if a file path points at test code by its directory layout.
pub fn is_test_path(path: &str) -> bool {
    path.to_lowercase().contains("tests")
}

/// True when the method, or any type enclosing the call site, carries a
/// test-marker attribute. The enclosing-type walk starts at
/// `innermost_type` when given, otherwise at the method's containing type.
pub fn has_test_marker(
    compilation: &Compilation,
    method: Option<MethodId>,
    innermost_type: Option<TypeId>,
) -> bool {
    if let Some(id) = method {
        let def = compilation.method(id);
        if def.attributes.iter().any(|a| is_test_marker(a)) {
            return true;
        }
    }

    let start = innermost_type.or_else(|| {
        method.and_then(|id| compilation.method(id).containing_type)
    });

    let mut seen = HashSet::new();
    let mut current = start;
    while let Some(id) = current {
        if !seen.insert(id) {
            break;
        }
        let def = compilation.types.get(id);
        if def.attributes.iter().any(|a| is_test_marker(a)) {
            return true;
        }
        current = def.containing_type;
    }

    false
}

/// Matches the conventional event-handler signature: two parameters, an
/// `object` sender and a payload that derives from `EventArgs` or, when
/// the derivation cannot be established, whose type name ends in
/// `EventArgs`.
pub fn is_event_handler_shape(
    compilation: &Compilation,
    known: &KnownSymbols,
    params: &[Param],
) -> bool {
    if params.len() != 2 {
        return false;
    }

    let sender_is_object = match (params[0].ty, known.object(compilation)) {
        (Some(ty), Some(object)) => ty == object,
        _ => false,
    };
    if !sender_is_object {
        return false;
    }

    match params[1].ty {
        Some(ty) => {
            let derives = known
                .event_args(compilation)
                .is_some_and(|event_args| compilation.types.is_or_derives_from(ty, event_args));
            derives || compilation.types.get(ty).name.ends_with("EventArgs")
        }
        None => false,
    }
}

/// Compile-time-known leading text of an argument, when any exists.
pub fn leading_literal_text(value: &ArgumentValue) -> Option<&str> {
    match value {
        ArgumentValue::StringLiteral(text) => Some(text),
        ArgumentValue::InterpolatedString { leading } if !leading.is_empty() => Some(leading),
        _ => None,
    }
}

/// One identifier under naming evaluation, detached from where it was
/// declared.
#[derive(Debug)]
pub struct Candidate {
    pub name: String,
    pub declared_type: Option<TypeId>,
    pub span: Span,
}
