//! vis-network style document.

use qv_core::{EdgeSet, LineStyle, RenderConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisNetworkDocument {
    pub nodes: Vec<VisNode>,
    pub edges: Vec<VisEdge>,
    pub physics: VisPhysics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisNode {
    pub id: String,
    pub label: String,
    pub shape: String,
    pub size: f64,
    pub font: VisFont,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisFont {
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisEdge {
    pub from: String,
    pub to: String,
    pub arrows: VisArrows,
    pub width: f64,
    pub dashes: VisDashes,
    pub smooth: VisSmooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisArrows {
    pub to: VisArrowHead,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisArrowHead {
    pub enabled: bool,
    pub scale_factor: f64,
}

/// `false` for solid lines, otherwise a dash/gap pattern in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VisDashes {
    Off(bool),
    Pattern(Vec<u32>),
}

impl From<LineStyle> for VisDashes {
    fn from(style: LineStyle) -> Self {
        match style {
            LineStyle::Solid => Self::Off(false),
            LineStyle::Dashed => Self::Pattern(vec![8, 6]),
            LineStyle::Dotted => Self::Pattern(vec![2, 4]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisSmooth {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub roundness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisPhysics {
    pub solver: String,
    pub node_distance: f64,
    pub charge: f64,
}

#[must_use]
pub fn render_vis_network(edges: &EdgeSet, config: &RenderConfig) -> VisNetworkDocument {
    let font = VisFont {
        size: config.label_size,
    };
    let nodes = edges
        .nodes()
        .into_iter()
        .map(|node| VisNode {
            id: node.to_string(),
            label: node.to_string(),
            shape: config.node_shape.as_str().to_string(),
            size: config.node_size,
            font,
        })
        .collect();

    let arrows = VisArrows {
        to: VisArrowHead {
            enabled: true,
            scale_factor: config.arrow_size,
        },
    };
    let smooth = VisSmooth {
        enabled: config.smooth_edges(),
        kind: "continuous".to_string(),
        roundness: config.curvature,
    };
    let edges = edges
        .iter()
        .map(|edge| VisEdge {
            from: edge.from.to_string(),
            to: edge.to.to_string(),
            arrows,
            width: config.edge_width,
            dashes: config.line_style.into(),
            smooth: smooth.clone(),
        })
        .collect();

    VisNetworkDocument {
        nodes,
        edges,
        physics: VisPhysics {
            solver: "repulsion".to_string(),
            node_distance: config.node_distance,
            charge: config.charge,
        },
    }
}
