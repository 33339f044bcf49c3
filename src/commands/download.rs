//! # Download Command Implementation
//!
//! This module implements the `download` subcommand: walk a template
//! directory on GitHub, then write every file below a local folder, keeping
//! the repository-relative layout.
//!
//! The output folder is prepared before any request is sent, so a bad
//! `--output` costs no API quota.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use log::info;

use kata::defaults::DEFAULT_OUTPUT_DIR;

use super::{explain, load_config, template_path, Session};
use crate::cli::GlobalArgs;

/// Download a template directory into a local folder
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Owner of the template repository (user or organisation).
    pub owner: String,

    /// Name of the template repository.
    pub repo: String,

    /// Directory inside the repository; the repository root when omitted.
    pub path: Option<String>,

    /// Folder to write the files into. Created when missing.
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,
}

/// Execute the `download` command.
pub fn execute(args: DownloadArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    prepare_output_dir(&args.output)?;

    let session = Session::connect(&config)?;
    let root_path = template_path(args.path.as_deref());

    let files = session
        .explorer()
        .explore(&args.owner, &args.repo, &root_path)
        .map_err(|e| explain(e, &config.github.token_env))?;

    session
        .downloader()
        .download_all(&args.output, &files)
        .map_err(|e| explain(e, &config.github.token_env))?;

    println!(
        "Downloaded {} file(s) from {}/{} into {}",
        files.len(),
        args.owner,
        args.repo,
        args.output.display()
    );
    Ok(())
}

/// Create `dir` when missing; refuse an existing path that is not a directory.
fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        if !dir.is_dir() {
            bail!("Output path '{}' exists and is not a directory", dir.display());
        }
        return Ok(());
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory '{}'", dir.display()))?;
    info!("Created output directory {}", dir.display());
    Ok(())
}
