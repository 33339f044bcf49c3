//! # Init Command Implementation
//!
//! This module implements the `init` subcommand, which creates a new kata
//! directory from a template of the configured template repository.
//!
//! ## Functionality
//!
//! - **Name Check**: the kata name becomes a directory name and may only hold
//!   letters, digits and `_`
//! - **Template Choice**: the template name may be left out when the language
//!   has a single template or keeps its template at the root
//! - **No Overwrite**: an existing kata directory is refused
//!
//! The name and the parent directory are checked before any request is sent.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use kata::template::{InitKataService, TemplateCatalog};

use super::{explain, load_config, Session};
use crate::cli::GlobalArgs;

/// Create a new kata from a template
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Name of the kata, also the name of the new directory.
    pub name: String,

    /// Language directory of the template repository.
    pub language: String,

    /// Template of that language; optional when there is only one.
    pub template: Option<String>,

    /// Directory to create the kata in.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,
}

/// Execute the `init` command.
pub fn execute(args: InitArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let template_repo = config.github.template_repo()?;

    let session = Session::connect(&config)?;
    let service = InitKataService::new(
        TemplateCatalog::new(session.provider(), template_repo),
        session.explorer(),
        session.downloader(),
    );

    let kata_dir = service
        .init_kata(
            &args.dir,
            &args.name,
            &args.language,
            args.template.as_deref(),
        )
        .map_err(|e| explain(e, &config.github.token_env))?;

    println!("Created kata '{}' at {}", args.name, kata_dir.display());
    Ok(())
}
