//! Diagnostic reporting for analysis results.
//!
//! A [`Diagnostic`] is one reported finding: rule id, message, 1-based
//! location, intrinsic severity, and optional metadata. It is immutable
//! once emitted and owned by whoever collects it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::rules::Severity;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Free-form string metadata, e.g. the configured prefix a call missed.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub notes: BTreeMap<String, String>,
}

impl Diagnostic {
    pub fn new(
        rule_id: &str,
        severity: Severity,
        message: impl Into<String>,
        file: &str,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity,
            message: message.into(),
            file: file.to_string(),
            line,
            column,
            end_line: None,
            end_column: None,
            suggestion: None,
            notes: BTreeMap::new(),
        }
    }

    pub fn with_end(mut self, end_line: usize, end_column: usize) -> Self {
        self.end_line = Some(end_line);
        self.end_column = Some(end_column);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_note(mut self, key: &str, value: impl Into<String>) -> Self {
        self.notes.insert(key.to_string(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_location_and_metadata() {
        let diagnostic = Diagnostic::new(
            "MNA0003",
            Severity::Info,
            "Unexpected Console.Write call",
            "src/App.cs",
            3,
            9,
        )
        .with_end(3, 14)
        .with_suggestion("Use the logging abstraction")
        .with_note("required_prefix", "[APP]");

        assert_eq!(diagnostic.rule_id, "MNA0003");
        assert_eq!((diagnostic.line, diagnostic.column), (3, 9));
        assert_eq!(diagnostic.end_line, Some(3));
        assert_eq!(diagnostic.end_column, Some(14));
        assert_eq!(
            diagnostic.notes.get("required_prefix").map(String::as_str),
            Some("[APP]")
        );
    }

    #[test]
    fn serializes_without_empty_optionals() {
        let diagnostic = Diagnostic::new(
            "MNA0002",
            Severity::Warning,
            "Empty catch block swallows exceptions",
            "src/App.cs",
            1,
            1,
        );

        let json = serde_json::to_value(&diagnostic).expect("serializable");
        assert_eq!(json["rule_id"], "MNA0002");
        assert_eq!(json["severity"], "warning");
        assert!(json.get("suggestion").is_none());
        assert!(json.get("notes").is_none());
    }
}
