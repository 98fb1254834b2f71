//! Visual configuration bundle handed to the rendering adapters.
//!
//! Nothing in here can change which nodes or edges exist; it only describes
//! how a renderer should draw them.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    #[default]
    Dot,
    Ellipse,
    Box,
    Circle,
    Diamond,
    Square,
    Triangle,
    Star,
    Text,
}

impl NodeShape {
    pub const ALL: [Self; 9] = [
        Self::Dot,
        Self::Ellipse,
        Self::Box,
        Self::Circle,
        Self::Diamond,
        Self::Square,
        Self::Triangle,
        Self::Star,
        Self::Text,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Ellipse => "ellipse",
            Self::Box => "box",
            Self::Circle => "circle",
            Self::Diamond => "diamond",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::Star => "star",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeShape {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|shape| shape.as_str() == lower)
            .ok_or_else(|| ConfigError::UnknownValue {
                field: "node_shape",
                value: s.to_string(),
                expected: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    pub const ALL: [Self; 3] = [Self::Solid, Self::Dashed, Self::Dotted];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
        }
    }

    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Solid)
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == lower)
            .ok_or_else(|| ConfigError::UnknownValue {
                field: "line_style",
                value: s.to_string(),
                expected: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ConfigErrorCode {
    #[default]
    OutOfRange,
    UnknownValue,
}

impl ConfigErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OutOfRange => "quiver/config/out-of-range",
            Self::UnknownValue => "quiver/config/unknown-value",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} = {value} is outside the supported range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("unknown {field} '{value}'; expected one of {expected}")]
    UnknownValue {
        field: &'static str,
        value: String,
        expected: String,
    },
}

impl ConfigError {
    #[must_use]
    pub const fn code(&self) -> ConfigErrorCode {
        match self {
            Self::OutOfRange { .. } => ConfigErrorCode::OutOfRange,
            Self::UnknownValue { .. } => ConfigErrorCode::UnknownValue,
        }
    }

    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::OutOfRange { field, .. } | Self::UnknownValue { field, .. } => *field,
        }
    }
}

/// Presentation settings for a rendered network diagram.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Node radius/size in pixels.
    pub node_size: f64,
    pub node_shape: NodeShape,
    /// Label font size in pixels.
    pub label_size: f64,
    /// Edge stroke width in pixels.
    pub edge_width: f64,
    /// Arrowhead scale factor.
    pub arrow_size: f64,
    /// Edge roundness, 0 is straight.
    pub curvature: f64,
    pub line_style: LineStyle,
    /// Preferred spring length between connected nodes.
    pub node_distance: f64,
    /// Node repulsion; more negative pushes nodes further apart.
    pub charge: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            node_size: 25.0,
            node_shape: NodeShape::Dot,
            label_size: 14.0,
            edge_width: 1.0,
            arrow_size: 1.0,
            curvature: 0.5,
            line_style: LineStyle::Solid,
            node_distance: 100.0,
            charge: -30.0,
        }
    }
}

const NODE_SIZE_RANGE: RangeInclusive<f64> = 1.0..=200.0;
const LABEL_SIZE_RANGE: RangeInclusive<f64> = 1.0..=100.0;
const EDGE_WIDTH_RANGE: RangeInclusive<f64> = 0.1..=20.0;
const ARROW_SIZE_RANGE: RangeInclusive<f64> = 0.1..=5.0;
const CURVATURE_RANGE: RangeInclusive<f64> = 0.0..=1.0;
const NODE_DISTANCE_RANGE: RangeInclusive<f64> = 10.0..=1000.0;
const CHARGE_RANGE: RangeInclusive<f64> = -1000.0..=0.0;

impl RenderConfig {
    /// Check every numeric setting against its supported range.
    ///
    /// The first offending field is reported. NaN is never in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("node_size", self.node_size, NODE_SIZE_RANGE)?;
        check_range("label_size", self.label_size, LABEL_SIZE_RANGE)?;
        check_range("edge_width", self.edge_width, EDGE_WIDTH_RANGE)?;
        check_range("arrow_size", self.arrow_size, ARROW_SIZE_RANGE)?;
        check_range("curvature", self.curvature, CURVATURE_RANGE)?;
        check_range("node_distance", self.node_distance, NODE_DISTANCE_RANGE)?;
        check_range("charge", self.charge, CHARGE_RANGE)?;
        Ok(())
    }

    #[must_use]
    pub fn smooth_edges(&self) -> bool {
        self.curvature > 0.0
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    range: RangeInclusive<f64>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ConfigErrorCode, LineStyle, NodeShape, RenderConfig};

    #[test]
    fn default_config_is_valid() {
        assert_eq!(RenderConfig::default().validate(), Ok(()));
    }

    #[test]
    fn out_of_range_value_reports_field() {
        let config = RenderConfig {
            curvature: 1.5,
            ..RenderConfig::default()
        };
        let err = config.validate().expect_err("curvature above 1 is invalid");
        assert_eq!(err.code(), ConfigErrorCode::OutOfRange);
        assert_eq!(err.field(), "curvature");
        assert_eq!(err.code().as_str(), "quiver/config/out-of-range");
    }

    #[test]
    fn nan_is_rejected() {
        let config = RenderConfig {
            node_size: f64::NAN,
            ..RenderConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "node_size",
                ..
            })
        ));
    }

    #[test]
    fn positive_charge_is_rejected() {
        let config = RenderConfig {
            charge: 10.0,
            ..RenderConfig::default()
        };
        assert_eq!(config.validate().map_err(|err| err.field()), Err("charge"));
    }

    #[test]
    fn shapes_and_styles_round_trip_through_strings() {
        for shape in NodeShape::ALL {
            assert_eq!(shape.as_str().parse::<NodeShape>(), Ok(shape));
        }
        for style in LineStyle::ALL {
            assert_eq!(style.as_str().parse::<LineStyle>(), Ok(style));
        }
        assert_eq!("BOX".parse::<NodeShape>(), Ok(NodeShape::Box));
    }

    #[test]
    fn unknown_shape_lists_expected_values() {
        let err = "hexagon".parse::<NodeShape>().expect_err("hexagon is unsupported");
        assert_eq!(err.code(), ConfigErrorCode::UnknownValue);
        let message = err.to_string();
        assert!(message.contains("hexagon"));
        assert!(message.contains("diamond"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"node_size": 40, "line_style": "dashed"}"#)
                .expect("partial config should deserialize");
        assert_eq!(config.node_size, 40.0);
        assert_eq!(config.line_style, LineStyle::Dashed);
        assert_eq!(config.charge, RenderConfig::default().charge);
    }
}
