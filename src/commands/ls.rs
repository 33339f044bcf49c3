//! # Ls Command Implementation
//!
//! This module implements the `ls` subcommand, which walks a template
//! directory and prints every file it would download, without writing
//! anything to disk.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;

use kata::explorer::DownloadableFile;

use super::{explain, load_config, template_path, Session};
use crate::cli::GlobalArgs;

/// List every file of a template directory
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Owner of the template repository (user or organisation).
    pub owner: String,

    /// Name of the template repository.
    pub repo: String,

    /// Directory inside the repository; the repository root when omitted.
    pub path: Option<String>,
}

/// Execute the `ls` command.
pub fn execute(args: LsArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let session = Session::connect(&config)?;
    let root_path = template_path(args.path.as_deref());

    let mut files = session
        .explorer()
        .explore(&args.owner, &args.repo, &root_path)
        .map_err(|e| explain(e, &config.github.token_env))?;
    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_listing(&mut out, &files)?;
    Ok(())
}

/// One `path<TAB>locator` line per file, then the total.
fn write_listing<W: Write>(out: &mut W, files: &[DownloadableFile]) -> io::Result<()> {
    for file in files {
        writeln!(out, "{}\t{}", file.relative_path, file.download_locator)?;
    }
    writeln!(out, "{} file(s)", files.len())
}
