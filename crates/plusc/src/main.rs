use std::path::PathBuf;
use std::process;
use std::sync::Once;

use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use clap::Parser;

use plus_common::{Diagnostic, MinusStyle};

mod driver;

use driver::{DriverError, Job, Options};

/// Lexical analyzer for the Plus language.
///
/// Reads <BASE>.plus and writes the token listing to <BASE>.lx.
#[derive(Parser)]
#[command(
    name = "la",
    version,
    about,
    long_about = "Lexical analyzer for the Plus language.\n\nReads <BASE>.plus and writes one line per token to <BASE>.lx.\nExtensions, lexeme limits and the listing of '-' can be set in a Plus.toml\nfound next to the source file or in any parent directory.\n\nExamples:\n  la hello                 Lex hello.plus into hello.lx\n  la hello -o tokens.txt   Write the listing to a custom path\n  la hello --emit-tokens   Print the token stream as JSON"
)]
struct Cli {
    /// Source file name without its extension.
    base: PathBuf,

    /// Output file path (default: <BASE>.lx).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file to use instead of searching for Plus.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// How a standalone '-' is listed: 'operator' or 'omit'.
    #[arg(long, value_parser = parse_minus)]
    minus: Option<MinusStyle>,

    /// Print the token stream as JSON to stdout instead of writing a listing.
    #[arg(long = "emit-tokens")]
    emit_tokens: bool,

    /// Suppress warnings and the success message.
    #[arg(short, long)]
    quiet: bool,
}

fn parse_minus(s: &str) -> Result<MinusStyle, String> {
    s.parse()
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version go to stdout and succeed; misuse exits 1.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_tracing();

    if let Err(e) = run(&cli) {
        if let DriverError::Lexical { .. } = e {
            eprintln!("Lexical analysis failed due to errors.");
        } else {
            eprintln!("error: {}", e);
        }
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), DriverError> {
    let options = Options {
        base: cli.base.clone(),
        output: cli.output.clone(),
        config: cli.config.clone(),
        minus: cli.minus,
    };
    let job = Job::resolve(&options)?;
    let source = job.read_input()?;
    let file_name = job.file_name();
    let text = String::from_utf8_lossy(&source);

    let result = if cli.emit_tokens {
        job.token_dump(&source).map(|json| println!("{}", json))
    } else {
        job.write_listing(&source).map(|summary| {
            if !cli.quiet {
                for warning in &summary.warnings {
                    print_diagnostic(warning, &text, &file_name);
                }
                println!(
                    "Lexical analysis completed successfully. Output written to {}",
                    job.output.display()
                );
            }
        })
    };

    if let Err(DriverError::Lexical { ref diagnostics }) = result {
        for diag in diagnostics {
            print_diagnostic(diag, &text, &file_name);
        }
    }
    result
}

/// Install a stderr `tracing` subscriber when `RUST_LOG` is set, e.g.
/// `RUST_LOG=plus_lexer=trace` to see every token.
fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

fn print_diagnostic(diag: &Diagnostic, source: &str, file_name: &str) {
    let Some(report) = build_report(diag, file_name, true) else {
        eprintln!("{}", diag);
        if let Some(ref suggestion) = diag.suggestion {
            eprintln!("   = help: {}", suggestion);
        }
        return;
    };

    if report.eprint((file_name, Source::from(source))).is_err() {
        eprintln!("{}", diag);
    }
}

/// The ariadne report for a located diagnostic. Spans are byte offsets, so
/// the report indexes the source by byte rather than by char.
fn build_report<'a>(
    diag: &Diagnostic,
    file_name: &'a str,
    color: bool,
) -> Option<Report<'a, (&'a str, Range<usize>)>> {
    let span = diag.span.as_ref()?;
    let range = span.byte_range();
    let (kind, label_color) = if diag.is_error() {
        (ReportKind::Error, Color::Red)
    } else {
        (ReportKind::Warning, Color::Yellow)
    };

    let mut report = Report::build(kind, file_name, range.start)
        .with_config(
            Config::default()
                .with_index_type(IndexType::Byte)
                .with_color(color),
        )
        .with_message(format!(
            "{} (line {}, column {})",
            diag.message, span.start.line, span.start.column
        ))
        .with_label(
            Label::new((file_name, range))
                .with_message(&diag.message)
                .with_color(label_color),
        );
    if let Some(ref suggestion) = diag.suggestion {
        report = report.with_help(suggestion);
    }
    Some(report.finish())
}
