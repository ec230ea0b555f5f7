//! Analysis session state shared by every detector invocation.
//!
//! A session is one end-to-end pass over a compilation. It owns the two
//! per-session caches and the cancellation signal; it is constructed at
//! analysis start and discarded at analysis end, so concurrent sessions
//! never interfere.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::known::KnownSymbols;
use crate::model::{Compilation, SourceFile, Span};
use crate::options::{OptionsCache, OptionsProvider, RuleOptions};

/// Cooperative cancellation signal, checked at operation granularity.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

pub struct AnalysisSession<'a> {
    pub compilation: &'a Compilation,
    pub provider: &'a dyn OptionsProvider,
    pub options: OptionsCache,
    pub known: KnownSymbols,
    pub cancellation: CancellationToken,
}

impl<'a> AnalysisSession<'a> {
    pub fn new(
        compilation: &'a Compilation,
        provider: &'a dyn OptionsProvider,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            compilation,
            provider,
            options: OptionsCache::new(),
            known: KnownSymbols::new(),
            cancellation,
        }
    }

    pub fn options_for<O: RuleOptions>(&self, file: &SourceFile) -> Arc<O> {
        self.options.for_file(file, self.provider)
    }
}

/// Per-invocation view handed to a rule: the session plus the file whose
/// operation is being evaluated.
pub struct RuleContext<'a> {
    pub session: &'a AnalysisSession<'a>,
    pub file: &'a SourceFile,
}

impl<'a> RuleContext<'a> {
    pub fn compilation(&self) -> &'a Compilation {
        self.session.compilation
    }

    pub fn known(&self) -> &KnownSymbols {
        &self.session.known
    }

    pub fn options<O: RuleOptions>(&self) -> Arc<O> {
        self.session.options_for(self.file)
    }

    pub fn span_range(&self, span: Span) -> (usize, usize, usize, usize) {
        self.file.span_range(span)
    }
}
