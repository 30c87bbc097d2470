//! Loads one XML file and prints its root element.

use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use firexml::{Document, LoadError, NodeRef, DEFAULT_MAX_DEPTH};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Arguments {
    /// The file to parse
    #[arg(default_value = "test.xml")]
    path: PathBuf,

    /// Trim whitespace off both ends of every inner text
    #[arg(short = 't', long = "trim")]
    trim: bool,

    /// How many levels of nested elements to allow below the root
    #[arg(short = 'd', long = "max-depth", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Arguments::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Arguments) -> Result<()> {
    let bytes = fs::read(&args.path)
        .with_context(|| format!("reading xml from {}", args.path.display()))?;

    let doc = Document::from_bytes_with(&bytes, |parser| {
        parser.trim_whitespace(args.trim).max_depth(args.max_depth)
    })
    .map_err(|e| match e {
        LoadError::Parse(e) => anyhow!("{}: {}", args.path.display(), e.excerpt(&bytes)),
        other => anyhow::Error::new(other).context(args.path.display().to_string()),
    })?;

    let root = doc.root();
    println!("{}: {}", root.tag(), root.inner_text());
    for attr in root.attributes() {
        println!("  {}=\"{}\"", attr.name(), attr.value());
    }
    for child in root.children() {
        print_tree(child);
    }
    Ok(())
}

fn print_tree(node: NodeRef<'_>) {
    println!("{}<{}> {}", "  ".repeat(node.depth()), node.tag(), node.inner_text());
    for child in node.children() {
        print_tree(child);
    }
}
