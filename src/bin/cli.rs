use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use walkdir::WalkDir;

use shardbuild::{is_text, Document, IndexBuilder, RepositoryDescriptor};

#[derive(Parser, Debug)]
pub struct Cli {
    #[clap(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    // Build a shard from every file under a directory.
    Build(BuildArgs),
}

#[derive(Parser, Debug)]
pub struct BuildArgs {
    pub dir: PathBuf,

    // Defaults to an empty descriptor.
    #[clap(long)]
    pub repo: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();
    match args.cmd {
        Command::Build(a) => build(a),
    }
}

fn build(args: BuildArgs) -> Result<()> {
    let descriptor = match &args.repo {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading repository descriptor {path:?}"))?;
            serde_json::from_str::<RepositoryDescriptor>(&raw)
                .with_context(|| format!("parsing repository descriptor {path:?}"))?
        }
        None => RepositoryDescriptor::default(),
    };

    let mut builder = IndexBuilder::new(Some(descriptor)).context("constructing index builder")?;

    let start = Instant::now();
    let mut accepted = 0usize;
    let mut rejected_binary = 0usize;
    let mut rejected_error = 0usize;

    for entry in WalkDir::new(&args.dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let relative = path
            .strip_prefix(&args.dir)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned();

        let content = match fs::read(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(?path, error = %e, "skipping unreadable file");
                rejected_error += 1;
                continue;
            }
        };

        if !is_text(&content) {
            rejected_binary += 1;
            continue;
        }

        match builder.add(Document::new(relative.clone(), content)) {
            Ok(_) => accepted += 1,
            Err(e) => {
                warn!(name = %relative, error = %e, "skipping document");
                rejected_error += 1;
            }
        }
    }

    info!(
        accepted,
        rejected_binary,
        rejected_error,
        content_size = builder.content_size(),
        elapsed = ?start.elapsed(),
        "shard build complete",
    );

    Ok(())
}
