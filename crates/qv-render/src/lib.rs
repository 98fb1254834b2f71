#![forbid(unsafe_code)]

//! Renderer-ready documents for a compiled edge set.
//!
//! Layout is left to the consumer. These adapters only carry the topology
//! (taken solely from the edge set) and the visual settings of a
//! [`RenderConfig`] into a form a network renderer can load directly.

mod dot;
mod vis;

pub use dot::render_dot;
pub use vis::{
    VisArrowHead, VisArrows, VisDashes, VisEdge, VisFont, VisNetworkDocument, VisNode, VisPhysics,
    VisSmooth, render_vis_network,
};

use std::fmt;
use std::str::FromStr;

use qv_core::{ConfigError, EdgeSet, RenderConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderTarget {
    /// vis-network `{ nodes, edges, options }` JSON document.
    #[default]
    VisNetwork,
    /// Graphviz DOT source.
    Dot,
}

impl RenderTarget {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VisNetwork => "vis",
            Self::Dot => "dot",
        }
    }
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for render target parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRenderTargetError(String);

impl fmt::Display for ParseRenderTargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown render target: {}", self.0)
    }
}

impl std::error::Error for ParseRenderTargetError {}

impl FromStr for RenderTarget {
    type Err = ParseRenderTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vis" | "vis-network" | "visnetwork" => Ok(Self::VisNetwork),
            "dot" | "graphviz" => Ok(Self::Dot),
            _ => Err(ParseRenderTargetError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid render config: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to serialize render document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Validate `config` and render `edges` to text for `target`.
pub fn render(
    edges: &EdgeSet,
    config: &RenderConfig,
    target: RenderTarget,
) -> Result<String, RenderError> {
    config.validate()?;
    let output = match target {
        RenderTarget::VisNetwork => serde_json::to_string_pretty(&render_vis_network(edges, config))?,
        RenderTarget::Dot => render_dot(edges, config),
    };
    debug!(
        target = target.as_str(),
        nodes = edges.nodes().len(),
        edges = edges.len(),
        bytes = output.len(),
        "rendered edge set"
    );
    Ok(output)
}

/// Shortest decimal form: integers without a fraction, others to two places.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let fixed = format!("{value:.2}");
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
