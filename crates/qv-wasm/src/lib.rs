#![forbid(unsafe_code)]

use std::sync::{LazyLock, RwLock};

use qv_core::{
    CompileOptions, ConfigError, EdgeSet, LineStyle, NodeShape, RenderConfig, SelfLoopPolicy,
    SkipReason,
};
use qv_export::{ExportFormat, export};
use qv_parser::{compile_traced, compile_with_options};
use qv_render::{RenderTarget, render};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;

#[derive(Debug, Clone, Default, PartialEq)]
struct RuntimeConfig {
    compile: CompileOptions,
    render: RenderConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RuntimeInitConfig {
    self_loops: Option<String>,
    render: RenderConfigOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RenderConfigOverrides {
    node_size: Option<f64>,
    node_shape: Option<String>,
    label_size: Option<f64>,
    edge_width: Option<f64>,
    arrow_size: Option<f64>,
    curvature: Option<f64>,
    line_style: Option<String>,
    node_distance: Option<f64>,
    charge: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompileOutput {
    edges: EdgeSet,
    node_count: usize,
    skipped: Vec<SkippedLine>,
}

#[derive(Debug, Clone, Serialize)]
struct SkippedLine {
    line: usize,
    reason: SkipReason,
    message: &'static str,
}

static RUNTIME_CONFIG: LazyLock<RwLock<RuntimeConfig>> =
    LazyLock::new(|| RwLock::new(RuntimeConfig::default()));

fn read_runtime_config() -> RuntimeConfig {
    match RUNTIME_CONFIG.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn write_runtime_config(config: RuntimeConfig) {
    match RUNTIME_CONFIG.write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => {
            let mut guard = poisoned.into_inner();
            *guard = config;
        }
    }
}

fn js_error(message: impl Into<String>) -> JsValue {
    JsValue::from_str(&message.into())
}

fn parse_js_value_or_default<T>(value: Option<JsValue>) -> Result<T, JsValue>
where
    T: for<'de> Deserialize<'de> + Default,
{
    match value {
        None => Ok(T::default()),
        Some(raw) if raw.is_undefined() || raw.is_null() => Ok(T::default()),
        Some(raw) => {
            #[cfg(target_arch = "wasm32")]
            {
                serde_wasm_bindgen::from_value(raw)
                    .map_err(|err| js_error(format!("invalid config: {err}")))
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = raw;
                Ok(T::default())
            }
        }
    }
}

fn to_js_value<T>(value: &T) -> Result<JsValue, JsValue>
where
    T: Serialize,
{
    #[cfg(target_arch = "wasm32")]
    {
        serde_wasm_bindgen::to_value(value)
            .map_err(|err| js_error(format!("failed to serialize response: {err}")))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        serde_json::to_string(value)
            .map(|json| JsValue::from_str(&json))
            .map_err(|err| js_error(format!("failed to serialize response: {err}")))
    }
}

fn merge_compile_options(
    base: CompileOptions,
    self_loops: Option<&str>,
) -> Result<CompileOptions, String> {
    match self_loops {
        None => Ok(base),
        Some(name) => name
            .parse::<SelfLoopPolicy>()
            .map(|policy| base.with_self_loops(policy))
            .map_err(|err| format!("{err}; expected one of retain,remove")),
    }
}

/// Apply `overrides` on top of `base` and validate the result.
fn merge_render_config(
    base: &RenderConfig,
    overrides: &RenderConfigOverrides,
) -> Result<RenderConfig, ConfigError> {
    let mut merged = base.clone();

    if let Some(value) = overrides.node_size {
        merged.node_size = value;
    }
    if let Some(value) = overrides.node_shape.as_deref() {
        merged.node_shape = value.parse::<NodeShape>()?;
    }
    if let Some(value) = overrides.label_size {
        merged.label_size = value;
    }
    if let Some(value) = overrides.edge_width {
        merged.edge_width = value;
    }
    if let Some(value) = overrides.arrow_size {
        merged.arrow_size = value;
    }
    if let Some(value) = overrides.curvature {
        merged.curvature = value;
    }
    if let Some(value) = overrides.line_style.as_deref() {
        merged.line_style = value.parse::<LineStyle>()?;
    }
    if let Some(value) = overrides.node_distance {
        merged.node_distance = value;
    }
    if let Some(value) = overrides.charge {
        merged.charge = value;
    }

    merged.validate()?;
    Ok(merged)
}

fn merge_runtime_config(
    base: &RuntimeConfig,
    overrides: &RuntimeInitConfig,
) -> Result<RuntimeConfig, String> {
    Ok(RuntimeConfig {
        compile: merge_compile_options(base.compile, overrides.self_loops.as_deref())?,
        render: merge_render_config(&base.render, &overrides.render)
            .map_err(|err| format!("{}: {err}", err.code().as_str()))?,
    })
}

fn compile_output(text: &str, options: &CompileOptions) -> CompileOutput {
    let report = compile_traced(text, options);
    let skipped = report
        .skipped()
        .map(|(line, reason)| SkippedLine {
            line,
            reason,
            message: reason.describe(),
        })
        .collect();
    CompileOutput {
        node_count: report.edges.nodes().len(),
        edges: report.edges,
        skipped,
    }
}

fn export_text(
    text: &str,
    format: Option<&str>,
    options: &CompileOptions,
) -> Result<String, String> {
    let format = match format {
        None => ExportFormat::default(),
        Some(name) => name
            .parse::<ExportFormat>()
            .map_err(|err| format!("{err}; expected one of tribble,data-frame,csv,json"))?,
    };
    Ok(export(&compile_with_options(text, options), format))
}

fn render_text(
    text: &str,
    target: Option<&str>,
    runtime: &RuntimeConfig,
) -> Result<String, String> {
    let target = match target {
        None => RenderTarget::default(),
        Some(name) => name
            .parse::<RenderTarget>()
            .map_err(|err| format!("{err}; expected one of vis,dot"))?,
    };
    let edges = compile_with_options(text, &runtime.compile);
    render(&edges, &runtime.render, target).map_err(|err| err.to_string())
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn init(config: Option<JsValue>) -> Result<(), JsValue> {
    let overrides: RuntimeInitConfig = parse_js_value_or_default(config)?;
    let next = merge_runtime_config(&read_runtime_config(), &overrides).map_err(js_error)?;
    write_runtime_config(next);
    Ok(())
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = compile))]
pub fn compile_js(text: &str, options: Option<JsValue>) -> Result<JsValue, JsValue> {
    let overrides: RuntimeInitConfig = parse_js_value_or_default(options)?;
    let compile = merge_compile_options(
        read_runtime_config().compile,
        overrides.self_loops.as_deref(),
    )
    .map_err(js_error)?;
    to_js_value(&compile_output(text, &compile))
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = exportEdges))]
pub fn export_edges_js(text: &str, format: Option<String>) -> Result<String, JsValue> {
    let runtime = read_runtime_config();
    export_text(text, format.as_deref(), &runtime.compile).map_err(js_error)
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = render))]
pub fn render_js(
    text: &str,
    target: Option<String>,
    overrides: Option<JsValue>,
) -> Result<String, JsValue> {
    let overrides: RuntimeInitConfig = parse_js_value_or_default(overrides)?;
    let runtime = merge_runtime_config(&read_runtime_config(), &overrides).map_err(js_error)?;
    render_text(text, target.as_deref(), &runtime).map_err(js_error)
}
