#![forbid(unsafe_code)]

//! quiver CLI - compile edge shorthand into edge lists, exports and network documents.
//!
//! # Commands
//!
//! - `compile`: Print the compiled edge list (or a summary) as JSON
//! - `export`: Write the edge list as a tribble, data.frame, CSV or JSON literal
//! - `render`: Produce a vis-network document or Graphviz DOT source
//! - `check`: Report what every input line contributed

use std::ffi::OsStr;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use qv_core::{
    CompileOptions, LineOutcome, LineReport, LineStyle, NodeShape, RenderConfig, SelfLoopPolicy,
    SkipReason,
};
use qv_export::{ExportFormat, export};
use qv_parser::{compile_evidence_json, compile_traced, compile_with_options};
use qv_render::{RenderTarget, render};
use serde::Serialize;
use tracing::{debug, info, warn};

/// quiver CLI - compile edge shorthand into edge lists, exports and network documents.
#[derive(Debug, Parser)]
#[command(
    name = "qv-cli",
    version,
    about = "quiver CLI - compile edge shorthand into edge lists, exports and network documents",
    long_about = "Turns one-line-per-edge shorthand into a directed edge list.\n\n\
        `A > B` draws an edge, `> C` continues from the last destination and\n\
        `^ D` branches from the last origin."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging (can be repeated for more detail: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile shorthand and print the edge list as JSON.
    Compile {
        /// Input file path, "-" for stdin, or inline shorthand text.
        #[arg(default_value = "-")]
        input: String,

        /// Keep or drop edges whose origin equals their destination
        #[arg(long, default_value = "retain")]
        self_loops: SelfLoopPolicy,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Print edge/node/line counts instead of the edge list
        #[arg(long)]
        summary: bool,
    },

    /// Export the compiled edges as a copyable literal.
    Export {
        /// Input file path, "-" for stdin, or inline shorthand text.
        #[arg(default_value = "-")]
        input: String,

        /// Export format (tribble, data-frame, csv, json)
        #[arg(short, long, default_value = "tribble")]
        format: ExportFormat,

        /// Output file path. If omitted, writes to stdout.
        #[arg(short, long)]
        output: Option<String>,

        /// Keep or drop edges whose origin equals their destination
        #[arg(long, default_value = "retain")]
        self_loops: SelfLoopPolicy,
    },

    /// Render the compiled edges as a network document.
    Render {
        /// Input file path, "-" for stdin, or inline shorthand text.
        #[arg(default_value = "-")]
        input: String,

        /// Render target (vis, dot)
        #[arg(short, long, default_value = "vis")]
        target: RenderTarget,

        /// Render config file (.toml, .yaml, .yml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file path. If omitted, writes to stdout.
        #[arg(short, long)]
        output: Option<String>,

        /// Node size in pixels
        #[arg(long)]
        node_size: Option<f64>,

        /// Node shape (dot, ellipse, box, circle, diamond, square, triangle, star, text)
        #[arg(long)]
        node_shape: Option<NodeShape>,

        /// Edge line style (solid, dashed, dotted)
        #[arg(long)]
        line_style: Option<LineStyle>,

        /// Keep or drop edges whose origin equals their destination
        #[arg(long, default_value = "retain")]
        self_loops: SelfLoopPolicy,
    },

    /// Report what every input line contributed.
    Check {
        /// Input file path, "-" for stdin, or inline shorthand text.
        #[arg(default_value = "-")]
        input: String,

        /// Output as JSON (per-line outcomes)
        #[arg(long)]
        json: bool,

        /// Exit with non-zero status when any non-blank line was skipped
        #[arg(long)]
        strict: bool,

        /// Keep or drop edges whose origin equals their destination
        #[arg(long, default_value = "retain")]
        self_loops: SelfLoopPolicy,
    },
}

/// Render settings given on the command line; each one replaces the config file value.
#[derive(Debug, Clone, Copy, Default)]
struct RenderFlags {
    node_size: Option<f64>,
    node_shape: Option<NodeShape>,
    line_style: Option<LineStyle>,
}

/// Result of checking an input.
#[derive(Debug, Serialize)]
struct CheckResult {
    valid: bool,
    edge_count: usize,
    node_count: usize,
    skipped_count: usize,
    duplicate_count: usize,
    removed_self_loop_count: usize,
    lines: Vec<LineReport>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Compile {
            input,
            self_loops,
            pretty,
            summary,
        } => cmd_compile(&input, self_loops, pretty, summary),

        Command::Export {
            input,
            format,
            output,
            self_loops,
        } => cmd_export(&input, format, output.as_deref(), self_loops),

        Command::Render {
            input,
            target,
            config,
            output,
            node_size,
            node_shape,
            line_style,
            self_loops,
        } => cmd_render(
            &input,
            target,
            config.as_deref(),
            output.as_deref(),
            RenderFlags {
                node_size,
                node_shape,
                line_style,
            },
            self_loops,
        ),

        Command::Check {
            input,
            json,
            strict,
            self_loops,
        } => cmd_check(&input, json, strict, self_loops),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init();
}

fn load_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else if Path::new(input).exists() {
        std::fs::read_to_string(input).context(format!("Failed to read file: {input}"))
    } else {
        // Treat as inline shorthand text
        Ok(input.to_string())
    }
}

fn write_output(output: Option<&str>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).context(format!("Failed to write to: {path}"))?;
            info!("Wrote output to: {path}");
        }
        None => {
            io::stdout()
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

fn with_trailing_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

// =============================================================================
// Command: compile
// =============================================================================

fn cmd_compile(
    input: &str,
    self_loops: SelfLoopPolicy,
    pretty: bool,
    summary: bool,
) -> Result<()> {
    let source = load_input(input)?;
    let options = CompileOptions::default().with_self_loops(self_loops);
    let report = compile_traced(&source, &options);

    let output = if summary {
        let evidence = compile_evidence_json(&report);
        if pretty {
            let value: serde_json::Value = serde_json::from_str(&evidence)?;
            serde_json::to_string_pretty(&value)?
        } else {
            evidence
        }
    } else if pretty {
        serde_json::to_string_pretty(&report.edges)?
    } else {
        serde_json::to_string(&report.edges)?
    };

    println!("{output}");

    for (line, reason) in report.skipped() {
        warn!("Skipped line {line}: {}", reason.describe());
    }

    Ok(())
}

// =============================================================================
// Command: export
// =============================================================================

fn cmd_export(
    input: &str,
    format: ExportFormat,
    output: Option<&str>,
    self_loops: SelfLoopPolicy,
) -> Result<()> {
    let source = load_input(input)?;
    let options = CompileOptions::default().with_self_loops(self_loops);
    let edges = compile_with_options(&source, &options);

    debug!(format = format.as_str(), edges = edges.len(), "exporting");
    write_output(output, &with_trailing_newline(export(&edges, format)))
}

// =============================================================================
// Command: render
// =============================================================================

fn cmd_render(
    input: &str,
    target: RenderTarget,
    config_path: Option<&Path>,
    output: Option<&str>,
    flags: RenderFlags,
    self_loops: SelfLoopPolicy,
) -> Result<()> {
    let base = match config_path {
        Some(path) => load_render_config(path)?,
        None => RenderConfig::default(),
    };
    let config = apply_render_flags(base, flags);

    let source = load_input(input)?;
    let options = CompileOptions::default().with_self_loops(self_loops);
    let edges = compile_with_options(&source, &options);

    let rendered = render(&edges, &config, target)
        .with_context(|| format!("Failed to render {target} output"))?;
    write_output(output, &with_trailing_newline(rendered))
}

/// Read a render config, choosing the parser from the file extension.
fn load_render_config(path: &Path) -> Result<RenderConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);

    let config: RenderConfig = match extension.as_deref() {
        Some("toml") => toml::from_str(&raw)
            .with_context(|| format!("Invalid TOML config: {}", path.display()))?,
        Some("yaml" | "yml") => serde_yaml::from_str(&raw)
            .with_context(|| format!("Invalid YAML config: {}", path.display()))?,
        Some("json") => serde_json::from_str(&raw)
            .with_context(|| format!("Invalid JSON config: {}", path.display()))?,
        _ => bail!(
            "Unsupported config file '{}': expected a .toml, .yaml, .yml or .json extension",
            path.display()
        ),
    };

    debug!(path = %path.display(), "loaded render config");
    Ok(config)
}

fn apply_render_flags(mut config: RenderConfig, flags: RenderFlags) -> RenderConfig {
    if let Some(value) = flags.node_size {
        config.node_size = value;
    }
    if let Some(value) = flags.node_shape {
        config.node_shape = value;
    }
    if let Some(value) = flags.line_style {
        config.line_style = value;
    }
    config
}

// =============================================================================
// Command: check
// =============================================================================

fn cmd_check(
    input: &str,
    json_output: bool,
    strict: bool,
    self_loops: SelfLoopPolicy,
) -> Result<()> {
    let source = load_input(input)?;
    let options = CompileOptions::default().with_self_loops(self_loops);
    let report = compile_traced(&source, &options);

    let skipped_count = report.skipped_count();
    let result = CheckResult {
        valid: !strict || skipped_count == 0,
        edge_count: report.edges.len(),
        node_count: report.edges.nodes().len(),
        skipped_count,
        duplicate_count: report.duplicate_count(),
        removed_self_loop_count: report.removed_self_loop_count(),
        lines: report.lines,
    };

    if json_output {
        let output = serde_json::to_string_pretty(&result)?;
        println!("{output}");
    } else {
        if result.valid {
            println!("✓ {} edges between {} nodes", result.edge_count, result.node_count);
        } else {
            println!("✗ {} line(s) produced no edge", result.skipped_count);
        }

        for line in &result.lines {
            if let Some(detail) = describe_outcome(&line.outcome) {
                println!("  line {}: {detail}", line.line);
            }
        }
    }

    if !result.valid {
        std::process::exit(1);
    }

    Ok(())
}

/// Emitted edges and blank lines are not reported.
fn describe_outcome(outcome: &LineOutcome) -> Option<String> {
    match outcome {
        LineOutcome::Emitted { .. } => None,
        LineOutcome::Duplicate { edge } => Some(format!("duplicate of {edge}")),
        LineOutcome::SelfLoopRemoved { edge } => Some(format!("self-loop {edge} removed")),
        LineOutcome::Skipped {
            reason: SkipReason::Blank,
        } => None,
        LineOutcome::Skipped { reason } => Some(format!("skipped ({})", reason.describe())),
    }
}

#[cfg(test)]
mod tests {
    use super::{RenderFlags, apply_render_flags, describe_outcome, load_render_config};
    use qv_core::{Edge, LineOutcome, LineStyle, NodeId, NodeShape, RenderConfig, SkipReason};
    use std::io::Write;

    fn config_file(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("create temp config");
        file.write_all(body.as_bytes()).expect("write temp config");
        file
    }

    #[test]
    fn loads_toml_config() {
        let file = config_file(".toml", "node_size = 40\nnode_shape = \"box\"\n");
        let config = load_render_config(file.path()).expect("toml parses");
        assert_eq!(config.node_size, 40.0);
        assert_eq!(config.node_shape, NodeShape::Box);
        assert_eq!(config.curvature, RenderConfig::default().curvature);
    }

    #[test]
    fn loads_yaml_config() {
        let file = config_file(".yml", "line_style: dotted\ncharge: -120\n");
        let config = load_render_config(file.path()).expect("yaml parses");
        assert_eq!(config.line_style, LineStyle::Dotted);
        assert_eq!(config.charge, -120.0);
    }

    #[test]
    fn loads_json_config() {
        let file = config_file(".json", r#"{ "edge_width": 2.5 }"#);
        let config = load_render_config(file.path()).expect("json parses");
        assert_eq!(config.edge_width, 2.5);
    }

    #[test]
    fn rejects_unknown_config_extension() {
        let file = config_file(".ini", "node_size=40");
        let err = load_render_config(file.path()).expect_err("ini is unsupported");
        assert!(err.to_string().contains("Unsupported config file"));
    }

    #[test]
    fn flags_override_config_values() {
        let base = RenderConfig {
            node_size: 60.0,
            ..RenderConfig::default()
        };
        let merged = apply_render_flags(
            base,
            RenderFlags {
                node_size: Some(10.0),
                node_shape: Some(NodeShape::Star),
                line_style: None,
            },
        );
        assert_eq!(merged.node_size, 10.0);
        assert_eq!(merged.node_shape, NodeShape::Star);
        assert_eq!(merged.line_style, LineStyle::Solid);
    }

    #[test]
    fn quiet_outcomes_are_not_described() {
        let edge = Edge::new(
            NodeId::new("A").expect("id"),
            NodeId::new("B").expect("id"),
        );
        assert_eq!(describe_outcome(&LineOutcome::Emitted { edge: edge.clone() }), None);
        assert_eq!(
            describe_outcome(&LineOutcome::Skipped {
                reason: SkipReason::Blank
            }),
            None
        );
        assert_eq!(
            describe_outcome(&LineOutcome::Duplicate { edge }).as_deref(),
            Some("duplicate of A > B")
        );
    }
}
