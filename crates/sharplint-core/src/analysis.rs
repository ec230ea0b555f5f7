//! The analysis orchestrator.
//!
//! An [`Analyzer`] owns a rule registry and drives one pass over a
//! compilation: files in registration order, operations in source order,
//! rules in registration order per operation, so repeated runs over the
//! same input produce identically ordered findings.

use tracing::debug;

use crate::config::RulesConfig;
use crate::diagnostic::Diagnostic;
use crate::model::Compilation;
use crate::options::{OptionLookup, OptionsProvider};
use crate::rules::quality::{NoConsoleWriteRule, WeakIdentifierRule};
use crate::rules::reliability::{AsyncVoidRule, EmptyCatchRule};
use crate::rules::{RuleRegistry, Severity};
use crate::session::{AnalysisSession, CancellationToken, RuleContext};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("analysis was canceled")]
    Canceled,
}

pub struct Analyzer {
    registry: RuleRegistry,
}

impl Analyzer {
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    /// Analyzer with the built-in rule set registered.
    pub fn with_default_rules() -> Self {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(AsyncVoidRule::new()));
        registry.register(Box::new(EmptyCatchRule::new()));
        registry.register(Box::new(NoConsoleWriteRule::new()));
        registry.register(Box::new(WeakIdentifierRule::new()));
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut RuleRegistry {
        &mut self.registry
    }

    pub fn configure(&mut self, config: &RulesConfig) {
        self.registry.configure(config);
    }

    /// Runs every enabled rule over every operation of the compilation.
    ///
    /// Cancellation is cooperative and checked before each operation; a
    /// canceled run returns no partial results.
    pub fn analyze(
        &self,
        compilation: &Compilation,
        provider: &dyn OptionsProvider,
        cancellation: CancellationToken,
    ) -> Result<Vec<Diagnostic>, AnalysisError> {
        let session = AnalysisSession::new(compilation, provider, cancellation);
        let mut findings = Vec::new();

        for file in compilation.files() {
            let ctx = RuleContext {
                session: &session,
                file,
            };
            for operation in &file.operations {
                if session.cancellation.is_cancelled() {
                    debug!(file = %file.path, "analysis canceled");
                    return Err(AnalysisError::Canceled);
                }
                let mut batch = self.registry.run_operation(operation, &ctx);
                apply_file_severity(&mut batch, provider, &file.path);
                findings.extend(batch);
            }
        }

        debug!(findings = findings.len(), "analysis complete");
        Ok(findings)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Applies a per-file `<ruleId>.severity` override from the raw options,
/// on top of whatever the registry already decided. Unrecognized values
/// are ignored.
fn apply_file_severity(findings: &mut [Diagnostic], provider: &dyn OptionsProvider, file: &str) {
    for finding in findings.iter_mut() {
        let lookup = OptionLookup::new(provider, file, &finding.rule_id);
        if let Some(raw) = lookup.raw("severity") {
            if let Some(severity) = parse_severity(&raw) {
                finding.severity = severity;
            }
        }
    }
}

fn parse_severity(raw: &str) -> Option<Severity> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "error" => Some(Severity::Error),
        "warning" => Some(Severity::Warning),
        "info" => Some(Severity::Info),
        "hint" => Some(Severity::Hint),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompilationBuilder, NameDeclaration, Operation};
    use crate::options::MapOptions;

    fn weak_name_compilation() -> crate::model::Compilation {
        let mut builder = CompilationBuilder::with_core_types();
        let file = builder.add_file("src/App.cs", "var tmp = 1;");
        builder.add_operation(file, Operation::Name(NameDeclaration::local("tmp")));
        builder.build()
    }

    #[test]
    fn default_rules_are_registered_in_id_order() {
        let analyzer = Analyzer::with_default_rules();
        let ids: Vec<_> = analyzer.registry().rules().map(|r| r.metadata().id).collect();

        assert_eq!(ids, vec!["MNA0001", "MNA0002", "MNA0003", "MNA0004"]);
    }

    #[test]
    fn analyze_reports_weak_name() {
        let compilation = weak_name_compilation();
        let analyzer = Analyzer::with_default_rules();

        let findings = analyzer
            .analyze(&compilation, &MapOptions::new(), CancellationToken::new())
            .unwrap();

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "MNA0004");
    }

    #[test]
    fn canceled_token_aborts_before_any_operation() {
        let compilation = weak_name_compilation();
        let analyzer = Analyzer::with_default_rules();
        let token = CancellationToken::new();
        token.cancel();

        let result = analyzer.analyze(&compilation, &MapOptions::new(), token);

        assert_eq!(result, Err(AnalysisError::Canceled));
    }

    #[test]
    fn per_file_severity_override_applies() {
        let compilation = weak_name_compilation();
        let analyzer = Analyzer::with_default_rules();
        let provider = MapOptions::new().set("MNA0004.severity", "error");

        let findings = analyzer
            .analyze(&compilation, &provider, CancellationToken::new())
            .unwrap();

        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn malformed_severity_override_is_ignored() {
        let compilation = weak_name_compilation();
        let analyzer = Analyzer::with_default_rules();
        let provider = MapOptions::new().set("MNA0004.severity", "loud");

        let findings = analyzer
            .analyze(&compilation, &provider, CancellationToken::new())
            .unwrap();

        assert_eq!(findings[0].severity, Severity::Info);
    }
}
