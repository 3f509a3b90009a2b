pub mod corpus;
pub mod model;
pub mod render;
pub mod search;
pub mod settings;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

use model::types::{OptionsPatch, SearchOptions};
use search::pattern::QueryError;
use settings::SettingsStore;

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "glossary-search",
    version,
    about = "Lexical search over bilingual glossary files"
)]
pub struct Cli {
    /// Path to the settings file (defaults to platform data dir)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search a glossary file
    Search {
        /// Query text; `*` matches a run of non-space characters
        query: String,

        /// Glossary file to search
        #[arg(long)]
        corpus: PathBuf,

        /// Anchor matches to the start of an entry or sub-entry
        #[arg(long)]
        start: bool,

        /// Allow matches to end mid-word
        #[arg(long)]
        no_end: bool,

        /// Match case exactly
        #[arg(long)]
        case_sensitive: bool,

        /// Result cap for this search only
        #[arg(long)]
        max: Option<f64>,

        /// Minimum normalized query length for this search only
        #[arg(long)]
        min: Option<f64>,

        /// Emit an HTML table instead of terminal output
        #[arg(long)]
        html: bool,

        /// Emit JSON display records instead of terminal output
        #[arg(long, conflicts_with = "html")]
        json: bool,
    },
    /// Show or update persistent search options
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Check a glossary file for side-alignment defects
    Validate {
        /// Glossary file to check
        #[arg(long)]
        corpus: PathBuf,
    },
    /// Generate shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the current options as JSON
    Show,
    /// Update options; invalid numeric values keep their previous setting
    Set {
        #[arg(long)]
        start: Option<bool>,
        #[arg(long)]
        end: Option<bool>,
        #[arg(long)]
        ignore_case: Option<bool>,
        #[arg(long)]
        max: Option<f64>,
        #[arg(long)]
        timeout: Option<f64>,
        #[arg(long)]
        min: Option<f64>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let store = match &cli.settings {
        Some(path) => SettingsStore::at(path.clone()),
        None => SettingsStore::default_location(),
    };

    match cli.command {
        Commands::Search {
            query,
            corpus,
            start,
            no_end,
            case_sensitive,
            max,
            min,
            html,
            json,
        } => {
            let mut options = OptionsPatch {
                max,
                min,
                ..Default::default()
            }
            .apply(&store.load());
            if start {
                options.start = true;
            }
            if no_end {
                options.end = false;
            }
            if case_sensitive {
                options.ignore_case = false;
            }
            run_search(&query, &corpus, &options, html, json)
        }
        Commands::Config { action } => run_config(&store, action),
        Commands::Validate { corpus } => run_validate(&corpus),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "glos", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn run_search(
    query: &str,
    corpus_path: &Path,
    options: &SearchOptions,
    html: bool,
    json: bool,
) -> Result<()> {
    let entries = corpus::load(corpus_path)?;
    let ranked = match search::rank::rank(&entries, query, options) {
        Ok(ranked) => ranked,
        Err(err @ QueryError::TooShort { .. }) => {
            // No search performed; distinct from zero results.
            eprintln!("{err}");
            std::process::exit(2);
        }
        Err(err) => return Err(err.into()),
    };

    if html {
        println!("{}", render::html::render_results(&ranked));
    } else if json {
        let entries: Vec<serde_json::Value> = ranked
            .entries
            .iter()
            .map(|entry| {
                serde_json::json!({
                    "text": entry.raw(),
                    "lines": render::format_line(entry, &ranked.pattern),
                })
            })
            .collect();
        let out = serde_json::json!({
            "truncated": ranked.truncated,
            "entries": entries,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", render::term::render_results(&ranked));
    }
    Ok(())
}

fn run_config(store: &SettingsStore, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&store.load())?);
            Ok(())
        }
        ConfigAction::Set {
            start,
            end,
            ignore_case,
            max,
            timeout,
            min,
        } => {
            let patch = OptionsPatch {
                start,
                end,
                ignore_case,
                max,
                timeout,
                min,
            };
            let next = patch.apply(&store.load());
            store.save(&next)?;
            println!("{}", serde_json::to_string_pretty(&next)?);
            Ok(())
        }
    }
}

fn run_validate(corpus_path: &Path) -> Result<()> {
    let entries = corpus::load(corpus_path)?;
    let bad = corpus::audit(&entries);
    if bad.is_empty() {
        println!("{} entries, all aligned", entries.len());
        return Ok(());
    }
    for entry in &bad {
        println!("entry {}: misaligned sides: {}", entry.index, entry.text);
    }
    eprintln!("{} of {} entries misaligned", bad.len(), entries.len());
    std::process::exit(1);
}

/// Platform data directory for settings.
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "glossary-search", "glossary-search")
        .expect("project dirs available")
        .data_dir()
        .to_path_buf()
}
