use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use nayan_core::locale::Language;
use nayan_core::settings::Settings;
use nayan_engine::cli::{self, FileOptions, OutputHandlers, ReplOptions};
use nayan_engine::config::{ConfigLoader, NayanConfig};
use nayan_engine::fixture;
use nayan_engine::simulator::Simulator;
use nayan_engine::store::FileStore;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nayan", version, about = "Nayan Deep keyboard shortcuts")]
struct Args {
    /// Shortcut store (defaults to storage.path from the config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Config file (defaults to ./nayan.yaml, then ~/.nayan/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the shortcuts of a site
    List { domain: String },
    /// Bind a key combination to an element selector
    Bind {
        domain: String,
        selector: String,
        /// e.g. "shift+s", "ctrl+alt+k"
        combo: String,
    },
    /// Remove a shortcut by selector or combo
    Unbind { domain: String, target: String },
    /// List sites that have shortcuts
    Domains,
    /// Delete every shortcut and preference
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Show or set the feedback language (en, hi, mr)
    Language { code: Option<String> },
    /// Drive the page core against a fixture page
    Simulate {
        /// Page fixture (JSON)
        fixture: PathBuf,
        /// Commands to execute (non-interactive mode)
        #[arg(long)]
        file: Option<String>,
    },
}

async fn load_config(path: Option<&Path>) -> anyhow::Result<NayanConfig> {
    ConfigLoader::default()
        .load(path)
        .await
        .context("Failed to load configuration")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref()).await?;
    let store_path = args.store.unwrap_or_else(|| config.storage.path.clone());
    tracing::debug!("Using store {}", store_path.display());
    let store = FileStore::new(store_path);

    match args.command {
        Command::List { domain } => {
            let table = Settings::new(store).list(&domain).await?;
            if table.is_empty() {
                println!("No shortcuts for {}", domain);
            }
            for binding in &table {
                println!("{:<16} {}", binding.combo, binding.selector);
            }
        }
        Command::Bind {
            domain,
            selector,
            combo,
        } => {
            let (combo, _) = Settings::new(store).bind(&domain, &selector, &combo).await?;
            println!("{}{}", language_of(&config).messages().saved, combo);
        }
        Command::Unbind { domain, target } => {
            let removed = Settings::new(store).unbind(&domain, &target).await?;
            println!(
                "{}: {} ({})",
                language_of(&config).messages().deleted,
                removed.selector,
                removed.combo
            );
        }
        Command::Domains => {
            for domain in Settings::new(store).domains().await? {
                println!("{}", domain);
            }
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("Refusing to delete every shortcut without --yes");
            }
            Settings::new(store).reset().await?;
            println!("All shortcuts deleted");
        }
        Command::Language { code } => {
            let settings = Settings::new(store);
            let language = match code {
                Some(code) => settings.set_language(&code).await?,
                None => settings
                    .language()
                    .await?
                    .unwrap_or_else(|| language_of(&config)),
            };
            println!("{}", language.code());
        }
        Command::Simulate { fixture, file } => {
            let page = fixture::load_page(&fixture)
                .await
                .with_context(|| format!("Failed to load fixture {}", fixture.display()))?;
            let mut simulator = Simulator::new(page, store, config).await;
            simulate(&mut simulator, file).await?;
        }
    }
    Ok(())
}

fn language_of(config: &NayanConfig) -> Language {
    Language::resolve(&config.language)
}

async fn simulate(simulator: &mut Simulator<FileStore>, file: Option<String>) -> anyhow::Result<()> {
    let output = OutputHandlers {
        out: |msg| println!("{}", msg),
        err: |msg| eprintln!("{}", msg),
    };

    let result = match file {
        Some(path) => {
            cli::run_file(simulator, output, &path, FileOptions { stop_on_error: true }).await
        }
        None => {
            let domain = simulator.session().domain().unwrap_or("(inactive page)").to_string();
            let banner = format!("Page loaded: {}. Type 'help' for commands.", domain);
            cli::run_repl(
                simulator,
                output,
                ReplOptions {
                    banner_lines: &[banner.as_str(), "Type 'exit' or 'quit' to close."],
                    prompt: "> ",
                    exit_commands: &["exit", "quit"],
                },
            )
            .await
        }
    };
    result.map_err(|e| anyhow::anyhow!("{}", e))
}
