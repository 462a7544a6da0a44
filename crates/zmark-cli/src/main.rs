use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use zmark::{ErrorPolicy, FormatConfig};

#[derive(Debug, Parser)]
#[command(name = "zmark", version, about = "Parse and reformat markup documents")]
struct Args {
    /// Input file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// Emit everything on one line
    #[arg(long)]
    compact: bool,
    /// Indent width in spaces
    #[arg(long, default_value_t = 2)]
    indent: usize,
    /// Require a leading declaration and exact attribute syntax
    #[arg(long)]
    strict: bool,
    /// Reject documents that carry attributes
    #[arg(long)]
    no_attributes: bool,
    /// Put each leaf value on its own indented line
    #[arg(long)]
    expand_leaves: bool,
    /// Containers with at most this many children are written inline
    #[arg(long, default_value_t = 0)]
    inline_limit: usize,
    /// Downgrade non-structural findings to warnings on stderr
    #[arg(long)]
    lenient_report: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = FormatConfig::default()
        .with_pretty(!args.compact)
        .with_indent(" ".repeat(args.indent))
        .with_strict(args.strict)
        .with_allow_attributes(!args.no_attributes)
        .with_simplify_leaves(!args.expand_leaves)
        .with_inline_child_limit(args.inline_limit)
        .with_error_policy(if args.lenient_report {
            ErrorPolicy::Report
        } else {
            ErrorPolicy::Fail
        });

    let text = read_input(&args.input)?;
    debug!(bytes = text.len(), "read input");

    let mut reader = zmark::DocumentReader::new(&text, &config);
    let doc = reader.parse().context("failed to parse document")?;
    for warning in reader.warnings() {
        eprintln!("warning: {warning}");
    }

    let output = zmark::write_document(&doc, &config);
    write_output(&args.output, output.as_bytes())?;
    Ok(())
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}
