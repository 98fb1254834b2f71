#![forbid(unsafe_code)]

//! Shorthand edge compiler.
//!
//! Turns line-oriented shorthand such as
//!
//! ```text
//! Home > Work
//! > Gym
//! ^ Pool
//! ```
//!
//! into the ordered, duplicate-free edge list `Home→Work, Work→Gym, Work→Pool`.
//! Compilation is total: lines that cannot be read or resolved are skipped,
//! never reported as errors.

mod resolve;
mod tokenize;

use qv_core::{CompileOptions, EdgeSet, LineOutcome, LineReport, SkipReason};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, trace};

pub use resolve::CarryOver;
pub use tokenize::tokenize_line;

/// Incremental compiler state for one pass over the input.
#[derive(Debug, Clone, Default)]
pub struct EdgeCompiler {
    options: CompileOptions,
    carry: CarryOver,
    edges: EdgeSet,
}

impl EdgeCompiler {
    #[must_use]
    pub fn new(options: CompileOptions) -> Self {
        Self {
            options,
            carry: CarryOver::new(),
            edges: EdgeSet::new(),
        }
    }

    /// Feed the next raw line and report what it contributed.
    pub fn push_line(&mut self, raw: &str) -> LineOutcome {
        if raw.trim().is_empty() {
            return LineOutcome::Skipped {
                reason: SkipReason::Blank,
            };
        }
        let Some(parsed) = tokenize_line(raw) else {
            return LineOutcome::Skipped {
                reason: SkipReason::Malformed,
            };
        };
        let edge = match self.carry.resolve(parsed) {
            Ok(edge) => edge,
            Err(reason) => return LineOutcome::Skipped { reason },
        };

        if edge.is_self_loop() && !self.options.self_loops.keeps_self_loops() {
            LineOutcome::SelfLoopRemoved { edge }
        } else if self.edges.insert(edge.clone()) {
            LineOutcome::Emitted { edge }
        } else {
            LineOutcome::Duplicate { edge }
        }
    }

    #[must_use]
    pub fn edges(&self) -> &EdgeSet {
        &self.edges
    }

    #[must_use]
    pub fn finish(self) -> EdgeSet {
        self.edges
    }
}

/// Compiled edges together with what every input line contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileReport {
    pub edges: EdgeSet,
    pub lines: Vec<LineReport>,
}

impl CompileReport {
    /// Lines that carried text but produced no edge.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|report| {
                matches!(
                    report.outcome,
                    LineOutcome::Skipped { reason } if reason != SkipReason::Blank
                )
            })
            .count()
    }

    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|report| matches!(report.outcome, LineOutcome::Duplicate { .. }))
            .count()
    }

    #[must_use]
    pub fn removed_self_loop_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|report| matches!(report.outcome, LineOutcome::SelfLoopRemoved { .. }))
            .count()
    }

    /// Non-blank lines that produced no edge, with their 1-based line numbers.
    pub fn skipped(&self) -> impl Iterator<Item = (usize, SkipReason)> + '_ {
        self.lines.iter().filter_map(|report| match report.outcome {
            LineOutcome::Skipped { reason } if reason != SkipReason::Blank => {
                Some((report.line, reason))
            }
            _ => None,
        })
    }
}

/// Compile shorthand text with the default options (self-loops retained).
#[must_use]
pub fn compile(text: &str) -> EdgeSet {
    compile_with_options(text, &CompileOptions::default())
}

#[must_use]
pub fn compile_with_options(text: &str, options: &CompileOptions) -> EdgeSet {
    let mut compiler = EdgeCompiler::new(*options);
    for line in text.lines() {
        let _ = compiler.push_line(line);
    }
    let edges = compiler.finish();
    debug!(
        edges = edges.len(),
        self_loops = options.self_loops.as_str(),
        "compiled shorthand"
    );
    edges
}

/// Compile and keep a per-line account of the outcome.
#[must_use]
pub fn compile_traced(text: &str, options: &CompileOptions) -> CompileReport {
    let mut compiler = EdgeCompiler::new(*options);
    let mut lines = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let outcome = compiler.push_line(raw);
        if let LineOutcome::Skipped { reason } = outcome
            && reason != SkipReason::Blank
        {
            trace!(line = index + 1, reason = reason.as_str(), "skipped line");
        }
        lines.push(LineReport {
            line: index + 1,
            outcome,
        });
    }

    let report = CompileReport {
        edges: compiler.finish(),
        lines,
    };
    debug!(
        edges = report.edges.len(),
        skipped = report.skipped_count(),
        duplicates = report.duplicate_count(),
        "compiled shorthand with line report"
    );
    report
}

#[must_use]
pub fn compile_evidence_json(report: &CompileReport) -> String {
    json!({
        "edge_count": report.edges.len(),
        "node_count": report.edges.nodes().len(),
        "self_loop_count": report.edges.self_loop_count(),
        "line_count": report.lines.len(),
        "skipped_count": report.skipped_count(),
        "duplicate_count": report.duplicate_count(),
    })
    .to_string()
}
