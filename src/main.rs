use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand};
use tracing::debug;

use vault_image_gen_lib::config::default_data_file;
use vault_image_gen_lib::constants::{DEFAULT_GEMINI_ENDPOINT, DEFAULT_OPENAI_ENDPOINT};
use vault_image_gen_lib::{
    clear_history, delete_history_item, generate_image, get_history_item, get_settings,
    history_link, list_history, regenerate, set_setting, AppState, Endpoints, FsVault,
    GenerateImageRequest, GeneratedImageResponse, HistoryItem, ImageSize, JsonFileStore,
    LLMProvider, Settings, Vault,
};

/// Generate images with OpenAI or Gemini and file them into a notes vault
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Vault root directory
    #[arg(long, default_value = ".")]
    vault: PathBuf,

    /// Settings and history file (defaults to the user config directory)
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// OpenAI API base URL
    #[arg(long, env = "VAULT_IMAGE_GEN_OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_ENDPOINT)]
    openai_base_url: String,

    /// Gemini API base URL
    #[arg(long, env = "VAULT_IMAGE_GEN_GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_ENDPOINT)]
    gemini_base_url: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an image and print its embed link
    Generate {
        prompt: String,
        #[arg(short, long)]
        size: Option<ImageSize>,
        #[arg(long)]
        style: Option<String>,
        #[arg(short, long)]
        provider: Option<LLMProvider>,
    },
    /// Browse past generations
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    List {
        #[arg(long)]
        json: bool,
    },
    Show { id: String },
    /// Print the embed link of a past image
    Link { id: String },
    Delete { id: String },
    Clear,
    /// Run a past prompt again with the same options
    Regenerate { id: String },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    Show,
    /// e.g. `settings set provider gemini`
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let data_file = match args.data_file {
        Some(path) => path,
        None => default_data_file()?,
    };
    debug!(vault = %args.vault.display(), data = %data_file.display(), "starting");

    let endpoints = Endpoints::new(args.openai_base_url, args.gemini_base_url);
    let mut state = AppState::load(
        FsVault::new(&args.vault),
        JsonFileStore::new(&data_file),
        &endpoints,
    )
    .await
    .with_context(|| format!("Failed to load data from {}", data_file.display()))?;

    match args.command {
        Command::Generate {
            prompt,
            size,
            style,
            provider,
        } => {
            let response = generate_image(
                &mut state,
                GenerateImageRequest {
                    prompt,
                    size,
                    style,
                    provider,
                },
            )
            .await?;
            print_generated(&state, &response);
        }
        Command::History { action } => match action {
            HistoryAction::List { json } => {
                let items = list_history(&state);
                if json {
                    println!("{}", serde_json::to_string_pretty(&items)?);
                } else if items.is_empty() {
                    println!("No images generated yet.");
                } else {
                    println!("{} image(s) in history", items.len());
                    for item in &items {
                        print_item_line(item);
                    }
                }
            }
            HistoryAction::Show { id } => {
                let item = get_history_item(&state, &id)?;
                println!("{}", serde_json::to_string_pretty(&item)?);
                println!(
                    "file: {}",
                    state
                        .generator()
                        .vault()
                        .resolve_display_path(&item.image_path)
                        .display()
                );
            }
            HistoryAction::Link { id } => println!("{}", history_link(&state, &id)?),
            HistoryAction::Delete { id } => {
                delete_history_item(&mut state, &id).await?;
                println!("Item removed from history");
            }
            HistoryAction::Clear => {
                clear_history(&mut state).await?;
                println!("History cleared");
            }
            HistoryAction::Regenerate { id } => {
                let response = regenerate(&mut state, &id).await?;
                print_generated(&state, &response);
            }
        },
        Command::Settings { action } => match action {
            SettingsAction::Show => print_settings(&get_settings(&state))?,
            SettingsAction::Set { key, value } => {
                let settings = set_setting(&mut state, &key, &value).await?;
                print_settings(&settings)?;
            }
        },
    }

    Ok(())
}

fn print_generated(state: &AppState<FsVault, JsonFileStore>, response: &GeneratedImageResponse) {
    if response.item.was_translated() {
        eprintln!("translated: {}", response.item.translated_prompt);
    }
    if let Some(revised) = &response.revised_prompt {
        eprintln!("revised prompt: {revised}");
    }
    eprintln!(
        "saved: {}",
        state
            .generator()
            .vault()
            .resolve_display_path(&response.item.image_path)
            .display()
    );
    println!("{}", response.link);
}

fn print_item_line(item: &HistoryItem) {
    let when = Local
        .timestamp_millis_opt(item.timestamp)
        .single()
        .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| item.timestamp.to_string());
    println!(
        "{}  {}  {}/{}/{}  {}",
        item.id, when, item.provider, item.size, item.style, item.original_prompt
    );
    if item.was_translated() {
        println!("    -> {}", item.translated_prompt);
    }
}

/// Keys are masked; everything else is printed as stored.
fn print_settings(settings: &Settings) -> Result<()> {
    let mut masked = settings.clone();
    masked.openai_api_key = mask(&masked.openai_api_key);
    masked.gemini_api_key = mask(&masked.gemini_api_key);
    println!("{}", serde_json::to_string_pretty(&masked)?);
    Ok(())
}

fn mask(key: &str) -> String {
    if key.is_empty() {
        return String::new();
    }
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{tail}")
}
