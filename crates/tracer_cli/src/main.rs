//! XTR Tracer CLI
//!
//! Renders a symbolic trace (`.xtr`) against the intermediate format model
//! (`.if`) it was produced from.
//!
//! Exit status is 0 on success, 1 when the trace is malformed or does not
//! match the model, and 2 when the model cannot be loaded.

#![warn(missing_docs)]
#![warn(clippy::all)]

use clap::{ArgGroup, Parser, ValueEnum};
use color_eyre::eyre::{bail, Result, WrapErr};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracer_core::TracerError;
use tracer_model::Model;
use tracer_render::{OutputFormat, RelationStyle, RenderConfig, Renderer};
use tracer_trace::{
    guard_scopes, GuardAnnotator, TraceReader, TraceStep, Transition, Unannotated,
};
use tracing_subscriber::EnvFilter;

const TRACE_ERROR: u8 = 1;
const MODEL_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "tracer")]
#[command(about = "Render UPPAAL XTR traces against their IF model", long_about = None)]
#[command(group(ArgGroup::new("model").required(true).args(["model_file", "model_text"])))]
struct Cli {
    /// Path to the .xtr trace
    #[arg(short, long, value_name = "PATH")]
    trace: PathBuf,
    /// Path to the .if model
    #[arg(short = 'i', long = "if", value_name = "PATH")]
    model_file: Option<PathBuf>,
    /// The .if model as a string
    #[arg(short = 's', long = "string-if", value_name = "TEXT")]
    model_text: Option<String>,
    /// Write to a file instead of stdout
    #[arg(short, long = "output-file", value_name = "PATH")]
    output: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Write `<=` instead of `≤`
    #[arg(long)]
    ascii: bool,
    /// List non-trivial guards and their process clocks after each transition
    #[arg(long)]
    guard_scopes: bool,
    /// Log filter, e.g. `debug` or `tracer_model=info`; overrides RUST_LOG
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl Cli {
    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            relation: if self.ascii {
                RelationStyle::Ascii
            } else {
                RelationStyle::Unicode
            },
            format: match self.format {
                Format::Text => OutputFormat::Text,
                Format::Json => OutputFormat::Json,
            },
        }
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn report(err: &TracerError) {
    eprintln!("error: {}", err);
    for hint in err.hints() {
        eprintln!("hint: {}", hint);
    }
}

fn describe_guards(model: &Model, transition: &Transition) -> Option<String> {
    let scopes = guard_scopes(model, transition);
    if scopes.is_empty() {
        return None;
    }
    let lines: Vec<String> = scopes
        .iter()
        .map(|s| format!("  guard {}: {} [clocks: {}]", s.process, s.guard, s.clocks.join(", ")))
        .collect();
    Some(lines.join("\n"))
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let loaded = match (&cli.model_file, &cli.model_text) {
        (Some(path), _) => match File::open(path) {
            Ok(file) => tracer_model::load(BufReader::new(file)),
            Err(err) => Err(TracerError::Io {
                message: format!("cannot open model {}: {}", path.display(), err),
            }),
        },
        (None, Some(text)) => tracer_model::parse(text),
        (None, None) => bail!("one of --if or --string-if is required"),
    };
    let model = match loaded {
        Ok(model) => model,
        Err(err) => {
            report(&err);
            return Ok(ExitCode::from(MODEL_ERROR));
        }
    };

    let trace = File::open(&cli.trace)
        .wrap_err_with(|| format!("cannot open trace {}", cli.trace.display()))?;
    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).wrap_err_with(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let annotator: &dyn GuardAnnotator = if cli.guard_scopes {
        &describe_guards
    } else {
        &Unannotated
    };
    let renderer = Renderer::new(&model, cli.render_config());
    tracing::info!(trace = %cli.trace.display(), "rendering trace");

    for step in TraceReader::for_model(BufReader::new(trace), &model) {
        let step = match step {
            Ok(step) => step,
            Err(err) => {
                out.flush()?;
                report(&err);
                return Ok(ExitCode::from(TRACE_ERROR));
            }
        };
        let annotation = match &step {
            TraceStep::Transition(transition) => annotator.annotate(&model, transition),
            TraceStep::State(_) => None,
        };
        renderer.write_step(&mut out, &step, annotation.as_deref())?;
    }
    out.flush()?;

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_source_is_required() {
        assert!(Cli::try_parse_from(["tracer", "-t", "a.xtr"]).is_err());
    }

    #[test]
    fn test_model_sources_are_exclusive() {
        let args = ["tracer", "-t", "a.xtr", "-i", "a.if", "-s", "layout"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "tracer",
            "--trace",
            "a.xtr",
            "--if",
            "a.if",
            "--output-file",
            "out.txt",
            "--format",
            "json",
            "--ascii",
        ])
        .unwrap();
        assert_eq!(cli.model_file, Some(PathBuf::from("a.if")));
        assert_eq!(cli.output, Some(PathBuf::from("out.txt")));
        assert_eq!(cli.format, Format::Json);
        let config = cli.render_config();
        assert_eq!(config.relation, RelationStyle::Ascii);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_default_config() {
        let cli = Cli::try_parse_from(["tracer", "-t", "a.xtr", "-s", "layout"]).unwrap();
        assert_eq!(cli.model_text.as_deref(), Some("layout"));
        assert_eq!(cli.render_config(), RenderConfig::default());
    }

    #[test]
    fn test_describe_guards() {
        let model = tracer_model::parse(concat!(
            "layout\n0:clock:1:t(0)\n1:clock:1:P.x\n2:location::a\n3:location::b\n\n",
            "processes\n0:0:P\n\n",
            "locations\n2:0:1\n3:0:1\n\n",
            "edges\n0:2:3:4:1:1\n0:3:2:1:1:1\n\n",
            "expressions\n1:0:0:1\n4:0:0:x > 3\n",
        ))
        .unwrap();
        let guarded = Transition::new().with_edge(0, 0, vec![]);
        assert_eq!(
            describe_guards(&model, &guarded).as_deref(),
            Some("  guard P: x > 3 [clocks: x]")
        );
        let trivial = Transition::new().with_edge(0, 1, vec![]);
        assert_eq!(describe_guards(&model, &trivial), None);
    }
}
