use std::fmt::Write;

use qv_core::{EdgeSet, LineStyle, NodeShape, RenderConfig};

use crate::format_number;

/// Graphviz points per inch; DOT sizes node widths and separation in inches.
const POINTS_PER_INCH: f64 = 72.0;

#[must_use]
pub fn render_dot(edges: &EdgeSet, config: &RenderConfig) -> String {
    let mut out = String::from("digraph quiver {\n");

    let splines = if config.smooth_edges() { "curved" } else { "line" };
    let _ = writeln!(
        out,
        "  graph [nodesep={}, ranksep={}, splines={splines}];",
        format_number(config.node_distance / POINTS_PER_INCH),
        format_number(config.node_distance / POINTS_PER_INCH),
    );
    let _ = writeln!(
        out,
        "  node [shape={}, width={}, fontsize={}];",
        dot_shape(config.node_shape),
        format_number(config.node_size * 2.0 / POINTS_PER_INCH),
        format_number(config.label_size),
    );
    let _ = writeln!(
        out,
        "  edge [penwidth={}, arrowsize={}, style={}];",
        format_number(config.edge_width),
        format_number(config.arrow_size),
        dot_style(config.line_style),
    );

    for node in edges.nodes() {
        let _ = writeln!(out, "  {};", quote_id(node.as_str()));
    }
    for edge in edges {
        let _ = writeln!(
            out,
            "  {} -> {};",
            quote_id(edge.from.as_str()),
            quote_id(edge.to.as_str())
        );
    }

    out.push('}');
    out.push('\n');
    out
}

const fn dot_shape(shape: NodeShape) -> &'static str {
    match shape {
        NodeShape::Dot | NodeShape::Circle => "circle",
        NodeShape::Ellipse => "ellipse",
        NodeShape::Box => "box",
        NodeShape::Diamond => "diamond",
        NodeShape::Square => "square",
        NodeShape::Triangle => "triangle",
        NodeShape::Star => "star",
        NodeShape::Text => "plaintext",
    }
}

const fn dot_style(style: LineStyle) -> &'static str {
    match style {
        LineStyle::Solid => "solid",
        LineStyle::Dashed => "dashed",
        LineStyle::Dotted => "dotted",
    }
}

fn quote_id(id: &str) -> String {
    let mut quoted = String::with_capacity(id.len() + 2);
    quoted.push('"');
    for ch in id.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}
