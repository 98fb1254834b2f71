#![forbid(unsafe_code)]

//! Core data model for quiver: node identifiers, the shorthand operators,
//! parsed lines, directed edges and the ordered, duplicate-free edge set.

mod config;

pub use config::{ConfigError, ConfigErrorCode, LineStyle, NodeShape, RenderConfig};

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// A trimmed, case-sensitive node label.
///
/// Two identifiers are equal iff their trimmed forms are byte-identical. An
/// empty label is not an identifier; it is the "absent" state and is
/// represented by `Option<NodeId>::None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Trim `raw` and wrap it, or return `None` when nothing is left.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The symbol between origin and destination on a shorthand line.
///
/// The operator only matters when the origin is omitted: it selects which
/// previous endpoint is carried over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// `>`: an omitted origin continues from the previous destination.
    Follow,
    /// `^`: an omitted origin branches from the previous origin.
    Branch,
}

impl Operator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Follow => ">",
            Self::Branch => "^",
        }
    }

    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            '>' => Some(Self::Follow),
            '^' => Some(Self::Branch),
            _ => None,
        }
    }
}

/// Error type for operator parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOperatorError(String);

impl fmt::Display for ParseOperatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operator: {}", self.0)
    }
}

impl std::error::Error for ParseOperatorError {}

impl FromStr for Operator {
    type Err = ParseOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next().and_then(Self::from_char), chars.next()) {
            (Some(operator), None) => Ok(operator),
            _ => Err(ParseOperatorError(s.to_string())),
        }
    }
}

/// A tokenized, not yet resolved, shorthand line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLine {
    pub origin: Option<NodeId>,
    pub operator: Operator,
    pub destination: Option<NodeId>,
}

/// A directed edge between two named nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    #[must_use]
    pub const fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {}", self.from, self.to)
    }
}

/// Ordered sequence of edges without duplicates.
///
/// Insertion order is preserved; re-inserting an edge that is already present
/// leaves the set unchanged, so every edge keeps its first-seen position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(into = "Vec<Edge>", from = "Vec<Edge>")]
pub struct EdgeSet {
    edges: Vec<Edge>,
    index: FxHashSet<Edge>,
}

impl EdgeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `edge` unless an equal edge is already present.
    ///
    /// Returns `true` when the edge was added.
    pub fn insert(&mut self, edge: Edge) -> bool {
        if self.index.contains(&edge) {
            return false;
        }
        self.index.insert(edge.clone());
        self.edges.push(edge);
        true
    }

    #[must_use]
    pub fn contains(&self, edge: &Edge) -> bool {
        self.index.contains(edge)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Edge] {
        &self.edges
    }

    /// Every node that appears as an endpoint, in first-appearance order.
    ///
    /// Within one edge the origin is visited before the destination.
    #[must_use]
    pub fn nodes(&self) -> Vec<&NodeId> {
        let mut seen: FxHashSet<&NodeId> = FxHashSet::default();
        let mut nodes = Vec::new();
        for edge in &self.edges {
            for node in [&edge.from, &edge.to] {
                if seen.insert(node) {
                    nodes.push(node);
                }
            }
        }
        nodes
    }

    #[must_use]
    pub fn self_loop_count(&self) -> usize {
        self.edges.iter().filter(|edge| edge.is_self_loop()).count()
    }

    /// `(from, to)` pairs as borrowed strings, in order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.edges
            .iter()
            .map(|edge| (edge.from.as_str(), edge.to.as_str()))
            .collect()
    }
}

impl PartialEq for EdgeSet {
    fn eq(&self, other: &Self) -> bool {
        self.edges == other.edges
    }
}

impl Eq for EdgeSet {}

impl From<Vec<Edge>> for EdgeSet {
    fn from(edges: Vec<Edge>) -> Self {
        edges.into_iter().collect()
    }
}

impl From<EdgeSet> for Vec<Edge> {
    fn from(set: EdgeSet) -> Self {
        set.edges
    }
}

impl FromIterator<Edge> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        let mut set = Self::new();
        for edge in iter {
            set.insert(edge);
        }
        set
    }
}

impl IntoIterator for EdgeSet {
    type Item = Edge;
    type IntoIter = std::vec::IntoIter<Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.into_iter()
    }
}

impl<'a> IntoIterator for &'a EdgeSet {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

/// Whether self-loops survive into the compiled edge set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SelfLoopPolicy {
    #[default]
    Retain,
    Remove,
}

impl SelfLoopPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Retain => "retain",
            Self::Remove => "remove",
        }
    }

    #[must_use]
    pub const fn keeps_self_loops(self) -> bool {
        matches!(self, Self::Retain)
    }
}

/// Error type for self-loop policy parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSelfLoopPolicyError(String);

impl fmt::Display for ParseSelfLoopPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown self-loop policy: {}", self.0)
    }
}

impl std::error::Error for ParseSelfLoopPolicyError {}

impl FromStr for SelfLoopPolicy {
    type Err = ParseSelfLoopPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "retain" | "keep" => Ok(Self::Retain),
            "remove" | "drop" => Ok(Self::Remove),
            _ => Err(ParseSelfLoopPolicyError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    pub self_loops: SelfLoopPolicy,
}

impl CompileOptions {
    #[must_use]
    pub const fn with_self_loops(mut self, policy: SelfLoopPolicy) -> Self {
        self.self_loops = policy;
        self
    }
}

/// Why a line contributed no edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// The line was empty or whitespace only.
    Blank,
    /// No operator in the expected position.
    Malformed,
    /// No origin written and none to carry over.
    UnresolvedOrigin,
    /// Neither a destination nor an origin to fall back to.
    UnresolvedDestination,
}

impl SkipReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Malformed => "malformed",
            Self::UnresolvedOrigin => "unresolved-origin",
            Self::UnresolvedDestination => "unresolved-destination",
        }
    }

    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Blank => "blank line",
            Self::Malformed => "no '>' or '^' operator found",
            Self::UnresolvedOrigin => "origin omitted and no earlier line to carry it from",
            Self::UnresolvedDestination => "neither destination nor origin given",
        }
    }
}

/// What a single input line contributed to the compiled edge set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LineOutcome {
    Emitted { edge: Edge },
    Duplicate { edge: Edge },
    SelfLoopRemoved { edge: Edge },
    Skipped { reason: SkipReason },
}

impl LineOutcome {
    #[must_use]
    pub const fn edge(&self) -> Option<&Edge> {
        match self {
            Self::Emitted { edge } | Self::Duplicate { edge } | Self::SelfLoopRemoved { edge } => {
                Some(edge)
            }
            Self::Skipped { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineReport {
    /// 1-based line number in the input text.
    pub line: usize,
    pub outcome: LineOutcome,
}

#[cfg(test)]
mod tests {
    use super::{
        CompileOptions, Edge, EdgeSet, LineOutcome, NodeId, Operator, SelfLoopPolicy, SkipReason,
    };

    fn node(raw: &str) -> NodeId {
        NodeId::new(raw).expect("non-empty node id")
    }

    fn edge(from: &str, to: &str) -> Edge {
        Edge::new(node(from), node(to))
    }

    #[test]
    fn node_id_trims_and_rejects_empty() {
        assert_eq!(node("  Alpha \t").as_str(), "Alpha");
        assert_eq!(NodeId::new(""), None);
        assert_eq!(NodeId::new("   "), None);
    }

    #[test]
    fn node_id_is_case_sensitive() {
        assert_ne!(node("alpha"), node("Alpha"));
        assert_eq!(node(" Alpha"), node("Alpha  "));
    }

    #[test]
    fn operator_string_mapping_is_stable() {
        assert_eq!(Operator::Follow.as_str(), ">");
        assert_eq!(Operator::Branch.as_str(), "^");
        assert_eq!(">".parse::<Operator>(), Ok(Operator::Follow));
        assert_eq!(" ^ ".parse::<Operator>(), Ok(Operator::Branch));
        assert!(">>".parse::<Operator>().is_err());
        assert!("-".parse::<Operator>().is_err());
    }

    #[test]
    fn edge_set_keeps_first_occurrence() {
        let mut set = EdgeSet::new();
        assert!(set.insert(edge("A", "B")));
        assert!(set.insert(edge("B", "C")));
        assert!(!set.insert(edge("A", "B")));
        assert_eq!(set.pairs(), vec![("A", "B"), ("B", "C")]);
    }

    #[test]
    fn edge_set_treats_reversed_edges_as_distinct() {
        let set: EdgeSet = vec![edge("A", "B"), edge("B", "A")].into();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&edge("B", "A")));
    }

    #[test]
    fn nodes_follow_first_appearance() {
        let set: EdgeSet = vec![edge("C", "A"), edge("A", "B"), edge("B", "C")].into();
        let nodes: Vec<&str> = set.nodes().into_iter().map(NodeId::as_str).collect();
        assert_eq!(nodes, vec!["C", "A", "B"]);
    }

    #[test]
    fn self_loop_count_counts_only_loops() {
        let set: EdgeSet = vec![edge("A", "A"), edge("A", "B"), edge("B", "B")].into();
        assert_eq!(set.self_loop_count(), 2);
        assert!(set.as_slice()[0].is_self_loop());
    }

    #[test]
    fn edge_set_serializes_as_plain_list() {
        let set: EdgeSet = vec![edge("A", "B")].into();
        let json = serde_json::to_string(&set).expect("serialize edge set");
        assert_eq!(json, r#"[{"from":"A","to":"B"}]"#);

        let decoded: EdgeSet =
            serde_json::from_str(r#"[{"from":"A","to":"B"},{"from":"A","to":"B"}]"#)
                .expect("deserialize edge set");
        assert_eq!(decoded, set);
    }

    #[test]
    fn self_loop_policy_defaults_to_retain() {
        assert_eq!(SelfLoopPolicy::default(), SelfLoopPolicy::Retain);
        assert_eq!(CompileOptions::default().self_loops, SelfLoopPolicy::Retain);
        assert_eq!("Remove".parse::<SelfLoopPolicy>(), Ok(SelfLoopPolicy::Remove));
        assert_eq!("keep".parse::<SelfLoopPolicy>(), Ok(SelfLoopPolicy::Retain));
        assert!("sometimes".parse::<SelfLoopPolicy>().is_err());
    }

    #[test]
    fn compile_options_deserialize_with_defaults() {
        let options: CompileOptions = serde_json::from_str("{}").expect("empty options");
        assert_eq!(options, CompileOptions::default());

        let options: CompileOptions =
            serde_json::from_str(r#"{"selfLoops":"remove"}"#).expect("explicit policy");
        assert_eq!(options.self_loops, SelfLoopPolicy::Remove);
    }

    #[test]
    fn line_outcome_exposes_edge() {
        let emitted = LineOutcome::Emitted {
            edge: edge("A", "B"),
        };
        assert_eq!(emitted.edge(), Some(&edge("A", "B")));
        assert!(!emitted.is_skipped());

        let skipped = LineOutcome::Skipped {
            reason: SkipReason::Malformed,
        };
        assert_eq!(skipped.edge(), None);
        assert!(skipped.is_skipped());
        assert_eq!(SkipReason::UnresolvedOrigin.as_str(), "unresolved-origin");
    }

    #[test]
    fn line_outcome_serializes_with_kind_tag() {
        let outcome = LineOutcome::Skipped {
            reason: SkipReason::Blank,
        };
        let json = serde_json::to_string(&outcome).expect("serialize outcome");
        assert_eq!(json, r#"{"kind":"skipped","reason":"blank"}"#);
    }
}
