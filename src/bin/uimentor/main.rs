//! UI Mentor CLI
//!
//! Walks through a website build tutorial in the terminal and composes
//! preview documents from HTML/CSS/JS files.
//!
//! Usage:
//!   uimentor key set sk-...
//!   uimentor start --description "a login page" --image mockup.png
//!   uimentor compose --html index.html --css style.css --js app.js --out preview.html
//!   uimentor preview --html index.html --css style.css --js app.js --out preview.html

mod tutorial;
mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use uimentor::{
    compose, Credential, CredentialStore, EditorSettings, FileCredentialStore, MentorConfig,
};

#[derive(Parser)]
#[command(
    name = "uimentor",
    about = "Learn to build a website step by step from screenshots",
    version
)]
struct Args {
    /// TOML config file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Model identifier (overrides config)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Reply token cap (overrides config)
    #[arg(long, global = true)]
    max_tokens: Option<u32>,

    /// Chat-completion API base URL (overrides config)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Credential file (defaults to the user config directory)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the stored API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Start a tutorial from a description and/or screenshots
    Start {
        /// What the website should look like
        #[arg(short = 'd', long, default_value = "")]
        description: String,

        /// Screenshot files, in order
        #[arg(short = 'i', long = "image")]
        images: Vec<PathBuf>,

        /// API key for this run only (or set OPENAI_API_KEY env var)
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Compose a preview document once
    Compose {
        #[command(flatten)]
        sources: Sources,
    },

    /// Recompose the preview whenever the source files settle
    Preview {
        #[command(flatten)]
        sources: Sources,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Store a key
    Set { key: String },
    /// Print the stored key, masked
    Show,
    /// Remove the stored key
    Clear,
}

#[derive(clap::Args, Clone)]
pub struct Sources {
    /// Markup file
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Stylesheet file
    #[arg(long)]
    pub css: Option<PathBuf>,

    /// Script file
    #[arg(long)]
    pub js: Option<PathBuf>,

    /// Editor settings JSON ({"html": {...}, "css": {...}, "js": {...}})
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Output file (stdout when omitted, required for preview)
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = resolve_config(&args)?;
    let store = resolve_store(&args)?;

    match args.command {
        Command::Key { action } => run_key(action, store.as_ref()),
        Command::Start {
            description,
            images,
            api_key,
        } => {
            let store: Arc<dyn CredentialStore> = match api_key.and_then(Credential::new) {
                Some(credential) => {
                    Arc::new(uimentor::tutorial::MemoryCredentialStore::with_credential(credential))
                }
                None => store,
            };
            tutorial::run(&config, store, &description, &images).await
        }
        Command::Compose { sources } => {
            let settings = load_settings(sources.settings.as_deref())?;
            let document = compose(
                &read_optional(sources.html.as_deref())?,
                &read_optional(sources.css.as_deref())?,
                &read_optional(sources.js.as_deref())?,
                &settings,
            );
            match sources.out {
                Some(out) => {
                    std::fs::write(&out, document)
                        .with_context(|| format!("Failed to write {}", out.display()))?;
                    println!("Wrote {}", out.display());
                }
                None => print!("{}", document),
            }
            Ok(())
        }
        Command::Preview { sources } => watch::run(&config, sources).await,
    }
}

fn resolve_config(args: &Args) -> Result<MentorConfig> {
    let mut config = match &args.config {
        Some(path) => MentorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MentorConfig::default(),
    };
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(max_tokens) = args.max_tokens {
        config.max_tokens = max_tokens;
    }
    if let Some(api_base) = &args.api_base {
        config.api_base_url = api_base.clone();
    }
    Ok(config)
}

fn resolve_store(args: &Args) -> Result<Arc<dyn CredentialStore>> {
    let store = match &args.storage {
        Some(path) => FileCredentialStore::new(path),
        None => FileCredentialStore::default_location()?,
    };
    log::debug!("Credential storage: {}", store.path().display());
    Ok(Arc::new(store))
}

fn run_key(action: KeyAction, store: &dyn CredentialStore) -> Result<()> {
    match action {
        KeyAction::Set { key } => {
            let credential = Credential::new(key).context("API key must not be blank")?;
            store.save(&credential)?;
            println!("API key saved.");
        }
        KeyAction::Show => match store.load()? {
            Some(credential) => println!("{}", mask(credential.expose())),
            None => println!("No API key stored."),
        },
        KeyAction::Clear => {
            store.clear()?;
            println!("API key removed.");
        }
    }
    Ok(())
}

fn mask(secret: &str) -> String {
    let tail: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{}", tail)
}

pub fn load_settings(path: Option<&Path>) -> Result<EditorSettings> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings {}", path.display()))?;
            serde_json::from_str(&text).context("Failed to parse settings JSON")
        }
        None => Ok(EditorSettings::default()),
    }
}

pub fn read_optional(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => Ok(String::new()),
    }
}
