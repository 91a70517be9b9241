//! Line-oriented rewriting of marked identifiers.
//!
//! A marker comment such as `// obf: Entity.posX, Tessellator` arms a
//! replacement scope for exactly the next line. Every literal occurrence of
//! each short name (`posX`, `Tessellator`) on that line becomes its token.
//! Matching is plain substring replacement, not token-aware: the short names
//! used in practice do not collide with unrelated text in the processed file.

use crate::errors::Result;
use crate::table::ObfuscationTable;
use serde::Serialize;
use tracing::debug;

/// Dropped from output wherever it appears; obfuscated classes live in the
/// root package.
pub const PACKAGE_DECLARATION: &str = "package net.minecraft.src;";

pub const MARKER_PREFIX: &str = "// obf:";

/// Short-name to token pairs taken from one marker line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReplacementScope {
    replacements: Vec<(String, String)>,
}

impl ReplacementScope {
    /// Builds a scope from the text following [`MARKER_PREFIX`].
    pub fn from_marker(body: &str, table: &ObfuscationTable) -> Result<Self> {
        let mut scope = Self::default();
        for qualified in body.split(',').map(str::trim) {
            let token = table.resolve(qualified)?;
            scope.insert(short_name(qualified), token);
        }
        Ok(scope)
    }

    fn insert(&mut self, short: &str, token: &str) {
        match self.replacements.iter_mut().find(|(name, _)| name == short) {
            Some(existing) => existing.1 = token.to_string(),
            None => self
                .replacements
                .push((short.to_string(), token.to_string())),
        }
    }

    /// Returns the rewritten line and the number of substrings replaced.
    pub fn apply(&self, line: &str) -> (String, usize) {
        let mut out = line.to_string();
        let mut hits = 0;
        for (short, token) in &self.replacements {
            let found = out.matches(short.as_str()).count();
            if found > 0 {
                hits += found;
                out = out.replace(short.as_str(), token);
            }
        }
        (out, hits)
    }

    pub fn get(&self, short: &str) -> Option<&str> {
        self.replacements
            .iter()
            .find(|(name, _)| name == short)
            .map(|(_, token)| token.as_str())
    }

    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }
}

/// Member part after the last `.`, or the whole name.
pub fn short_name(qualified: &str) -> &str {
    qualified
        .rsplit_once('.')
        .map_or(qualified, |(_, member)| member)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    pub lines_read: usize,
    pub lines_written: usize,
    pub package_lines_dropped: usize,
    pub markers: usize,
    pub scopes_applied: usize,
    pub replacements: usize,
    /// `package_lines_dropped + scopes_applied`
    pub adjusted_lines: usize,
}

pub struct LineTransformer<'a> {
    table: &'a ObfuscationTable,
    pending: Option<ReplacementScope>,
    stats: TransformStats,
}

impl<'a> LineTransformer<'a> {
    pub fn new(table: &'a ObfuscationTable) -> Self {
        Self {
            table,
            pending: None,
            stats: TransformStats::default(),
        }
    }

    /// Feeds one physical line, terminator included if present. Returns the
    /// line to emit, or `None` when the line is dropped.
    pub fn process_line(&mut self, line: &str) -> Result<Option<String>> {
        self.stats.lines_read += 1;
        let trimmed = line.trim();

        if trimmed == PACKAGE_DECLARATION {
            self.stats.package_lines_dropped += 1;
            self.stats.adjusted_lines += 1;
            return Ok(None);
        }

        if let Some(body) = trimmed.strip_prefix(MARKER_PREFIX) {
            let scope = ReplacementScope::from_marker(body, self.table)?;
            debug!(line = self.stats.lines_read, names = scope.len(), "marker");
            self.pending = Some(scope);
            self.stats.markers += 1;
            return Ok(Some(self.emit(line)));
        }

        if let Some(scope) = self.pending.take() {
            let (rewritten, hits) = scope.apply(line);
            debug!(line = self.stats.lines_read, replacements = hits, "scope applied");
            self.stats.scopes_applied += 1;
            self.stats.replacements += hits;
            self.stats.adjusted_lines += 1;
            self.stats.lines_written += 1;
            return Ok(Some(rewritten));
        }

        Ok(Some(self.emit(line)))
    }

    fn emit(&mut self, line: &str) -> String {
        self.stats.lines_written += 1;
        line.to_string()
    }

    pub fn has_pending_scope(&self) -> bool {
        self.pending.is_some()
    }

    pub fn adjusted_lines(&self) -> usize {
        self.stats.adjusted_lines
    }

    pub fn stats(&self) -> TransformStats {
        self.stats
    }

    /// Ends the run. A scope still pending at end of input is dropped.
    pub fn finish(self) -> TransformStats {
        if self.pending.is_some() {
            debug!("input ended with an unconsumed marker");
        }
        self.stats
    }
}
