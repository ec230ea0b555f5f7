//! Source files, spans, and line/column mapping.

use id_arena::Id;

use super::ops::Operation;

pub type FileId = Id<SourceFile>;

/// Byte span into a file's source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub lo: u32,
    pub hi: u32,
}

impl Span {
    pub fn new(lo: u32, hi: u32) -> Self {
        Self { lo, hi }
    }
}

/// One analyzed file: its path, text, and the resolved operations the
/// program-model provider extracted from it, in source order.
pub struct SourceFile {
    pub id: FileId,
    pub path: String,
    pub source: String,
    pub operations: Vec<Operation>,
}

impl SourceFile {
    /// 1-based line and column for a byte offset.
    pub fn line_col(&self, offset: u32) -> (usize, usize) {
        let pos = (offset as usize).min(self.source.len());
        if self.source.is_empty() || pos == 0 {
            return (1, 1);
        }

        let prefix = &self.source[..pos];
        let line = prefix.matches('\n').count() + 1;
        let last_newline = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = pos - last_newline + 1;

        (line, column)
    }

    /// 1-based (line, column, end line, end column) for a span.
    pub fn span_range(&self, span: Span) -> (usize, usize, usize, usize) {
        let (line, column) = self.line_col(span.lo);
        let (end_line, end_column) = self.line_col(span.hi);
        (line, column, end_line, end_column)
    }
}

/// Locates the first occurrence of `needle` in `source` as a span.
///
/// Test convenience; the real provider carries spans from its parser.
pub fn span_of(source: &str, needle: &str) -> Span {
    match source.find(needle) {
        Some(start) => Span::new(start as u32, (start + needle.len()) as u32),
        None => Span::default(),
    }
}
