use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

use retag::core::ConfigLoader;
use retag::{apply_tag_edit, confirmation_line, EditOptions};

#[derive(Parser)]
#[command(author, version, about = "Apply the mixBus tag edit to a source file", long_about = None)]
struct Cli {
    /// File to edit (defaults to the configured or built-in target)
    target: Option<PathBuf>,

    /// Directory a relative target is resolved against
    #[arg(long)]
    root: Option<PathBuf>,

    /// Configuration file to use instead of the project or global one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show the change without writing it
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Keep a .backup copy of the original file
    #[arg(long)]
    backup: bool,

    /// Write in place instead of through a temp file
    #[arg(long)]
    no_atomic: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    retag::logging::init_logging(cli.verbose);
    debug!("retag v{}", retag::version());

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to determine working directory")?,
    };

    let (config, source) = ConfigLoader::new(&root)
        .with_explicit(cli.config)
        .load()
        .context("Failed to load configuration")?;
    debug!("Configuration source: {:?}", source);

    let edit = config.tag_edit().with_target(cli.target);
    let options = EditOptions::from(&config.editor).with_overrides(cli.dry_run, cli.backup, cli.no_atomic);

    let path = edit.resolved_target(&root);
    debug!("Editing {}", path.display());

    let outcome = match apply_tag_edit(&path, &edit, options) {
        Ok(outcome) => outcome,
        // Errors naming a path already say which file failed
        Err(e) if e.path().is_some() => return Err(e.into()),
        Err(e) => return Err(anyhow::Error::new(e).context(format!("Failed to edit {}", path.display()))),
    };
    info!("Edited {}", outcome.path.display());

    if options.dry_run {
        match &outcome.preview {
            Some(preview) => print!("{}", preview),
            None => println!("retag: no changes for {}", outcome.path.display()),
        }
    } else {
        println!("{}", confirmation_line(&outcome));
    }

    Ok(())
}
