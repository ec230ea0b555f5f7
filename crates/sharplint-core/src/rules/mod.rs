//! Rule system for program-model analysis.
//!
//! Each rule is an independent detector evaluated once per resolved
//! operation. Rules are stateless beyond the session caches reachable
//! through the [`RuleContext`]; a registry decides which rules run and
//! applies configured severity overrides.

pub mod helpers;
pub mod quality;
pub mod reliability;

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::config::RulesConfig;
use crate::diagnostic::Diagnostic;
use crate::model::Operation;
use crate::session::RuleContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    Quality,
    Reliability,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: RuleCategory,
    pub severity: Severity,
    pub docs_url: Option<&'static str>,
    pub examples: Option<&'static str>,
}

pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;

    /// Evaluates one resolved operation; unmatched shapes yield nothing.
    fn check_operation(&self, operation: &Operation, ctx: &RuleContext<'_>) -> Vec<Diagnostic>;
}

pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    disabled_rules: HashSet<String>,
    severity_overrides: HashMap<String, Severity>,
    quality_enabled: bool,
    reliability_enabled: bool,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            disabled_rules: HashSet::new(),
            severity_overrides: HashMap::new(),
            quality_enabled: true,
            reliability_enabled: true,
        }
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn configure(&mut self, config: &RulesConfig) {
        self.disabled_rules.clear();
        self.severity_overrides.clear();

        for rule_ref in &config.disabled {
            self.disabled_rules.insert(rule_ref.clone());
        }

        for (rule_ref, severity_value) in &config.severity {
            self.severity_overrides
                .insert(rule_ref.clone(), (*severity_value).into());
        }

        self.quality_enabled = config.quality.unwrap_or(true);
        self.reliability_enabled = config.reliability.unwrap_or(true);
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Runs every enabled rule against one operation, in registration
    /// order, and applies configured severity overrides.
    pub fn run_operation(&self, operation: &Operation, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        self.rules
            .iter()
            .filter(|rule| self.should_run_rule(rule.as_ref()))
            .flat_map(|rule| {
                let mut diagnostics = rule.check_operation(operation, ctx);
                self.apply_severity_overrides(rule.as_ref(), &mut diagnostics);
                diagnostics
            })
            .collect()
    }

    fn should_run_rule(&self, rule: &dyn Rule) -> bool {
        let metadata = rule.metadata();

        if !self.quality_enabled && metadata.category == RuleCategory::Quality {
            return false;
        }
        if !self.reliability_enabled && metadata.category == RuleCategory::Reliability {
            return false;
        }

        !self.is_rule_disabled(metadata)
    }

    fn is_rule_disabled(&self, metadata: &RuleMetadata) -> bool {
        self.disabled_rules.contains(metadata.id) || self.disabled_rules.contains(metadata.name)
    }

    fn apply_severity_overrides(&self, rule: &dyn Rule, diagnostics: &mut [Diagnostic]) {
        let metadata = rule.metadata();

        let override_severity = self
            .severity_overrides
            .get(metadata.id)
            .or_else(|| self.severity_overrides.get(metadata.name));

        if let Some(severity) = override_severity {
            for diagnostic in diagnostics.iter_mut() {
                diagnostic.severity = *severity;
            }
        }
    }

    pub fn is_rule_enabled(&self, id_or_name: &str) -> bool {
        if let Some(rule) = self
            .get_rule(id_or_name)
            .or_else(|| self.get_rule_by_name(id_or_name))
        {
            self.should_run_rule(rule)
        } else {
            false
        }
    }

    pub fn get_rule(&self, id: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.metadata().id == id)
            .map(|r| r.as_ref())
    }

    pub fn get_rule_by_name(&self, name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.metadata().name == name)
            .map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[macro_export]
macro_rules! declare_rule {
    (
        $name:ident,
        id = $id:literal,
        name = $rule_name:literal,
        description = $desc:literal,
        category = $cat:ident,
        severity = $sev:ident
        $(, docs_url = $url:literal)?
        $(, examples = $examples:literal)?
    ) => {
        pub struct $name {
            metadata: $crate::rules::RuleMetadata,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    metadata: $crate::rules::RuleMetadata {
                        id: $id,
                        name: $rule_name,
                        description: $desc,
                        category: $crate::rules::RuleCategory::$cat,
                        severity: $crate::rules::Severity::$sev,
                        docs_url: declare_rule!(@docs_url $($url)?),
                        examples: declare_rule!(@examples $($examples)?),
                    },
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
    (@docs_url $url:literal) => { Some($url) };
    (@docs_url) => { None };
    (@examples $examples:literal) => { Some($examples) };
    (@examples) => { None };
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Compilation, NameDeclaration, Operation};
    use crate::options::MapOptions;

    struct TestRule {
        metadata: RuleMetadata,
        diagnostics_to_return: Vec<Diagnostic>,
    }

    impl TestRule {
        fn new(id: &'static str) -> Self {
            Self {
                metadata: RuleMetadata {
                    id,
                    name: "test-rule",
                    description: "A test rule",
                    category: RuleCategory::Quality,
                    severity: Severity::Warning,
                    docs_url: None,
                    examples: None,
                },
                diagnostics_to_return: Vec::new(),
            }
        }

        fn with_name(mut self, name: &'static str) -> Self {
            self.metadata.name = name;
            self
        }

        fn with_category(mut self, category: RuleCategory) -> Self {
            self.metadata.category = category;
            self
        }

        fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
            self.diagnostics_to_return.push(diagnostic);
            self
        }
    }

    impl Rule for TestRule {
        fn metadata(&self) -> &RuleMetadata {
            &self.metadata
        }

        fn check_operation(
            &self,
            _operation: &Operation,
            _ctx: &RuleContext<'_>,
        ) -> Vec<Diagnostic> {
            self.diagnostics_to_return.clone()
        }
    }

    fn probe_compilation() -> Compilation {
        let mut builder = Compilation::builder();
        let file = builder.add_file("src/App.cs", "class App { }");
        builder.add_operation(file, Operation::Name(NameDeclaration::local("probe")));
        builder.build()
    }

    fn run_registry(registry: &RuleRegistry, compilation: &Compilation) -> Vec<Diagnostic> {
        let provider = MapOptions::new();
        let session = crate::session::AnalysisSession::new(
            compilation,
            &provider,
            crate::session::CancellationToken::new(),
        );
        let file = compilation.files().next().unwrap();
        let ctx = RuleContext {
            session: &session,
            file,
        };
        registry.run_operation(&file.operations[0], &ctx)
    }

    #[test]
    fn registry_contains_all_rules() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(TestRule::new("T001")));
        registry.register(Box::new(TestRule::new("T002")));
        registry.register(Box::new(TestRule::new("T003")));

        let rules: Vec<_> = registry.rules().collect();

        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].metadata().id, "T001");
        assert_eq!(rules[2].metadata().id, "T003");
    }

    #[test]
    fn run_operation_collects_in_registration_order() {
        let mut registry = RuleRegistry::new();
        let diag1 = Diagnostic::new("T001", Severity::Warning, "Issue 1", "src/App.cs", 1, 1);
        let diag2 = Diagnostic::new("T002", Severity::Error, "Issue 2", "src/App.cs", 2, 1);
        registry.register(Box::new(TestRule::new("T001").with_diagnostic(diag1)));
        registry.register(Box::new(TestRule::new("T002").with_diagnostic(diag2)));

        let compilation = probe_compilation();
        let diagnostics = run_registry(&registry, &compilation);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].rule_id, "T001");
        assert_eq!(diagnostics[1].rule_id, "T002");
    }

    #[test]
    fn disabled_rule_not_executed() {
        let mut registry = RuleRegistry::new();
        let diag = Diagnostic::new("T001", Severity::Info, "noise", "src/App.cs", 1, 1);
        registry.register(Box::new(
            TestRule::new("T001").with_name("noisy").with_diagnostic(diag),
        ));

        registry.configure(&RulesConfig {
            disabled: vec!["T001".to_string()],
            ..Default::default()
        });

        let compilation = probe_compilation();
        assert!(run_registry(&registry, &compilation).is_empty());
    }

    #[test]
    fn disabled_rule_by_name_not_executed() {
        let mut registry = RuleRegistry::new();
        let diag = Diagnostic::new("T001", Severity::Info, "noise", "src/App.cs", 1, 1);
        registry.register(Box::new(
            TestRule::new("T001").with_name("noisy").with_diagnostic(diag),
        ));

        registry.configure(&RulesConfig {
            disabled: vec!["noisy".to_string()],
            ..Default::default()
        });

        let compilation = probe_compilation();
        assert!(run_registry(&registry, &compilation).is_empty());
    }

    #[test]
    fn disable_category() {
        let mut registry = RuleRegistry::new();
        let quality = Diagnostic::new("Q001", Severity::Warning, "quality", "src/App.cs", 1, 1);
        let reliability =
            Diagnostic::new("R001", Severity::Warning, "reliability", "src/App.cs", 2, 1);
        registry.register(Box::new(
            TestRule::new("Q001")
                .with_category(RuleCategory::Quality)
                .with_diagnostic(quality),
        ));
        registry.register(Box::new(
            TestRule::new("R001")
                .with_category(RuleCategory::Reliability)
                .with_diagnostic(reliability),
        ));

        registry.configure(&RulesConfig {
            quality: Some(false),
            ..Default::default()
        });

        let compilation = probe_compilation();
        let diagnostics = run_registry(&registry, &compilation);

        assert_eq!(diagnostics.len(), 1, "only the reliability rule should run");
        assert_eq!(diagnostics[0].rule_id, "R001");
    }

    #[test]
    fn override_severity_by_id() {
        use crate::config::SeverityValue;

        let mut registry = RuleRegistry::new();
        let diag = Diagnostic::new("T001", Severity::Warning, "issue", "src/App.cs", 1, 1);
        registry.register(Box::new(TestRule::new("T001").with_diagnostic(diag)));

        let mut severity = HashMap::new();
        severity.insert("T001".to_string(), SeverityValue::Error);
        registry.configure(&RulesConfig {
            severity,
            ..Default::default()
        });

        let compilation = probe_compilation();
        let diagnostics = run_registry(&registry, &compilation);

        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn is_rule_enabled_respects_configuration() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(TestRule::new("T001")));
        registry.register(Box::new(TestRule::new("T002").with_name("other")));

        registry.configure(&RulesConfig {
            disabled: vec!["T002".to_string()],
            ..Default::default()
        });

        assert!(registry.is_rule_enabled("T001"));
        assert!(!registry.is_rule_enabled("T002"));
        assert!(!registry.is_rule_enabled("UNKNOWN"));
    }

    #[test]
    fn registry_len_returns_count() {
        let mut registry = RuleRegistry::new();
        assert!(registry.is_empty());

        registry.register(Box::new(TestRule::new("T001")));
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    declare_rule!(
        MacroTestRule,
        id = "M001",
        name = "macro-test",
        description = "Tests the declare_rule! macro",
        category = Quality,
        severity = Info
    );

    impl Rule for MacroTestRule {
        fn metadata(&self) -> &RuleMetadata {
            &self.metadata
        }

        fn check_operation(
            &self,
            _operation: &Operation,
            _ctx: &RuleContext<'_>,
        ) -> Vec<Diagnostic> {
            Vec::new()
        }
    }

    #[test]
    fn declare_rule_macro_creates_rule() {
        let rule = MacroTestRule::new();
        let metadata = rule.metadata();

        assert_eq!(metadata.id, "M001");
        assert_eq!(metadata.name, "macro-test");
        assert_eq!(metadata.category, RuleCategory::Quality);
        assert_eq!(metadata.severity, Severity::Info);
        assert!(metadata.docs_url.is_none());
        assert!(metadata.examples.is_none());
    }
}
