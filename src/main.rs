//! CLI entry point for aicat

use std::io::{self, BufWriter, IsTerminal};
use std::path::PathBuf;
use std::process;

use aicat::error::Result;
use aicat::template::TEMPLATE_DIR_ENV;
use aicat::{
    Concatenator, ExplicitSelection, IgnoreCache, OutputConfig, SelectionCriteria, TemplateStore,
    select_files,
};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "aicat")]
#[command(about = "Concatenate and optionally transform file contents")]
#[command(
    long_about = "Concatenate and optionally transform file contents based on specified patterns.\n\
                  Each file is printed after a '--- FILE: <path> ---' header."
)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Root directory to start from, or a glob to select files without descending
    root: Option<String>,

    #[command(flatten)]
    selection: SelectionArgs,

    /// Show files skipped by ignore rules and other diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding stored templates (default: ~/.aicat/templates)
    #[arg(long = "template-dir", value_name = "DIR", env = TEMPLATE_DIR_ENV, global = true)]
    template_dir: Option<PathBuf>,
}

/// Options selecting and transforming files; shared by `store`.
#[derive(clap::Args, Debug, Clone, Default)]
struct SelectionArgs {
    /// Type of files to search for (f for regular files, or a template name)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    file_type: Option<String>,

    /// Print files whose contents are not valid UTF-8
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    binary: Option<bool>,

    /// Patterns file names must match (comma separated, can be repeated)
    #[arg(short = 'p', long = "patterns", value_name = "GLOB", value_delimiter = ',')]
    patterns: Option<Vec<String>>,

    /// Patterns excluding file names (comma separated, can be repeated)
    #[arg(short = 'x', long = "exclude", value_name = "GLOB", value_delimiter = ',')]
    exclude: Option<Vec<String>>,

    /// Shell command to transform file contents (_path_ and _contents_ are substituted)
    #[arg(long, value_name = "CMD")]
    transform: Option<String>,

    /// Respect .gitignore files (default)
    #[arg(long = "gitignore", overrides_with = "no_gitignore")]
    gitignore: bool,

    /// Do not respect .gitignore files
    #[arg(long = "no-gitignore", overrides_with = "gitignore")]
    no_gitignore: bool,
}

impl SelectionArgs {
    fn explicit(&self, verbose: bool) -> ExplicitSelection {
        let gitignore = match (self.gitignore, self.no_gitignore) {
            (_, true) => Some(false),
            (true, false) => Some(true),
            (false, false) => None,
        };
        ExplicitSelection {
            file_type: self.file_type.clone(),
            binary: self.binary,
            patterns: self.patterns.clone(),
            exclude: self.exclude.clone(),
            transform: self.transform.clone(),
            gitignore,
            verbose,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },
}

#[derive(Subcommand, Debug)]
enum TemplateAction {
    /// Store a new template (overwrites one with the same name)
    Store {
        /// Template name
        name: String,

        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Delete an existing template
    Delete {
        /// Template name
        name: String,
    },
    /// List all templates
    List,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

fn template_store(dir: Option<PathBuf>) -> Result<TemplateStore> {
    match dir {
        Some(dir) => Ok(TemplateStore::new(dir)),
        None => Ok(TemplateStore::default_location()?),
    }
}

fn run_cat(args: &Args) -> Result<()> {
    let explicit = args.selection.explicit(args.verbose);
    let store = template_store(args.template_dir.clone())?;
    let criteria = SelectionCriteria::resolve(&explicit, &store)?;
    debug!("selection: {:?}", criteria);

    let root = args.root.as_deref().unwrap_or(".");
    let cache = IgnoreCache::new();
    let files = select_files(root, &criteria, &cache)?;
    debug!(
        "{} files selected, {} ignore files compiled",
        files.len(),
        cache.compilations()
    );

    let stdout = io::stdout();
    let mut concatenator =
        Concatenator::new(BufWriter::new(stdout.lock()), OutputConfig::from(&criteria));
    let summary = concatenator.write_files(&files)?;

    if criteria.verbose {
        info!(
            "{} files written, {} skipped",
            summary.written, summary.skipped
        );
    }
    Ok(())
}

fn run_template(action: &TemplateAction, args: &Args) -> Result<()> {
    let store = template_store(args.template_dir.clone())?;
    debug!("template store: {}", store.dir().display());

    match action {
        TemplateAction::Store { name, selection } => {
            let template = selection.explicit(args.verbose).to_template();
            store.store(name, &template)?;
            println!("Template stored successfully");
        }
        TemplateAction::Delete { name } => {
            store.delete(name)?;
            println!("Template deleted successfully");
        }
        TemplateAction::List => {
            for (name, template) in store.list()? {
                println!("{:<20} {}", name, serde_json::to_string(&template)?);
            }
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match &args.command {
        Some(Command::Template { action }) => run_template(action, &args),
        None => run_cat(&args),
    };

    if let Err(e) = result {
        let code = e.exit_code();
        if code != 0 {
            eprintln!("aicat: {}", e);
        }
        process::exit(code);
    }
}
