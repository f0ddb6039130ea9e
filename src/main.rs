//! HTML Injector CLI
//!
//! Usage:
//!   html-injector [OPTIONS] <SOURCE> <OUTPUT>
//!
//! Options:
//!   -c, --config <FILE>    Configuration file (TOML format)
//!       --max-depth <N>    Maximum number of template injection passes per page
//!   -v, --verbose          More log output (repeat for trace)
//!   -q, --quiet            Only log errors
//!   -h, --help             Print help

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};

use html_injector::{
    build_tree, BuildError, InjectError, InjectorConfig, LocalFileSystem, LogHandler,
    TemplateError,
};

#[derive(Parser)]
#[command(name = "html-injector", version)]
#[command(about = "Splice HTML templates into a tree of static pages")]
struct Cli {
    /// Folder containing pages, templates and other files
    source: PathBuf,

    /// Folder to write the processed tree to (replaced if it exists)
    output: PathBuf,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of template injection passes per page
    #[arg(long)]
    max_depth: Option<usize>,

    /// More log output (repeat for trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    if !cli.quiet {
        println!("\nHTML Injector v{}\n", env!("CARGO_PKG_VERSION"));
        println!("Source folder: {}", cli.source.display());
        println!("Output folder: {}\n", cli.output.display());
    }

    let mut config = match &cli.config {
        Some(path) => match InjectorConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => InjectorConfig::default(),
    };
    if let Some(max_depth) = cli.max_depth {
        config = config.with_max_depth(max_depth);
    }

    let mut handler = LogHandler::new();
    let result = build_tree(
        &mut LocalFileSystem::new(),
        &cli.source,
        &cli.output,
        &config,
        &mut handler,
    );

    if let Err(e) = result {
        print_source_report(&e);
        std::process::exit(1);
    }
}

/// Show where in the offending file the markup broke, when that is known
fn print_source_report(err: &BuildError) {
    let (path, source): (&Path, &InjectError) = match err {
        BuildError::Page { path, source } => (path, source),
        BuildError::Template(TemplateError::Malformed { path, source }) => (path, source),
        _ => return,
    };
    if source.span().is_none() {
        return;
    }
    if let Ok(text) = fs::read_to_string(path) {
        eprint!("{}", source.format(&text, &path.display().to_string()));
    }
}
