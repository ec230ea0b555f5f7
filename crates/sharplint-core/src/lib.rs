//! Core analysis engine for Sharplint.
//!
//! The engine consumes a resolved program model (a [`model::Compilation`]
//! assembled by a host-side provider), runs a configurable set of rules
//! over it, and reports [`Diagnostic`] findings. Configuration flows in
//! through an [`options::OptionsProvider`]; the bundled
//! [`config::Config`] implements it on top of `sharplint.toml`.

pub mod analysis;
pub mod config;
pub mod diagnostic;
pub mod known;
pub mod model;
pub mod options;
pub mod rules;
pub mod session;

pub use analysis::{AnalysisError, Analyzer};
pub use diagnostic::Diagnostic;
pub use session::{AnalysisSession, CancellationToken, RuleContext};
