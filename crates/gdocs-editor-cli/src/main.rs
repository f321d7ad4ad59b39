use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gdocs_editor_config::Config;
use gdocs_editor_engine::{DocumentTools, StyleRequest, ToolError};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use std::{io, process};

mod client;

use client::GoogleDocsClient;

#[derive(Parser, Debug)]
#[command(name = "gdocs-editor", version, about = "Read and edit Google Docs documents")]
struct Cli {
    /// Config file to use instead of ~/.config/gdocs-editor/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the document's title
    GetTitle { document_id: String },
    /// Replace the whole document body (`-` reads stdin)
    Update {
        document_id: String,
        content: String,
    },
    /// Append text on a new line at the end (`-` reads stdin)
    Append { document_id: String, text: String },
    /// Print the document's visible text
    Read { document_id: String },
    /// Style the first occurrence of some text
    Format {
        document_id: String,
        text_to_find: String,
        #[command(flatten)]
        style: StyleArgs,
    },
}

#[derive(Args, Debug)]
struct StyleArgs {
    #[arg(long)]
    bold: Option<bool>,
    #[arg(long)]
    italic: Option<bool>,
    #[arg(long)]
    underline: Option<bool>,
    /// Size in points; 0 leaves the size unchanged
    #[arg(long)]
    font_size: Option<f64>,
    #[arg(long)]
    font_family: Option<String>,
    /// Hex color such as #1A2B3C
    #[arg(long)]
    color: Option<String>,
}

impl From<StyleArgs> for StyleRequest {
    fn from(args: StyleArgs) -> Self {
        Self {
            bold: args.bold,
            italic: args.italic,
            underline: args.underline,
            font_size_pt: args.font_size,
            font_family: args.font_family,
            foreground_color_hex: args.color,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let loaded = match path {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("Config file '{}' does not exist", path.display()))?,
        None => Config::load()?.unwrap_or_default(),
    };
    Ok(loaded)
}

/// `-` means "read from stdin"; anything else is taken literally.
fn text_argument(value: String) -> Result<String> {
    if value != "-" {
        return Ok(value);
    }
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read text from stdin")?;
    Ok(text)
}

async fn run(tools: &DocumentTools<GoogleDocsClient>, command: Command) -> Result<String> {
    let output = match command {
        Command::GetTitle { document_id } => tools.get_title(&document_id).await,
        Command::Update {
            document_id,
            content,
        } => {
            let content = text_argument(content)?;
            tools.update_document_content(&document_id, &content).await
        }
        Command::Append { document_id, text } => {
            let text = text_argument(text)?;
            tools.append_to_document(&document_id, &text).await
        }
        Command::Read { document_id } => tools.read_document(&document_id).await,
        Command::Format {
            document_id,
            text_to_find,
            style,
        } => {
            tools
                .format_text(&document_id, &text_to_find, &style.into())
                .await
        }
    };
    output.map_err(report)
}

fn report(error: ToolError) -> anyhow::Error {
    if error.is_input_error() {
        log::warn!("{error}");
    } else {
        log::error!("{error}");
    }
    anyhow::Error::new(error)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e:#}");
            process::exit(1);
        }
    };

    // RUST_LOG, when set, overrides the configured level
    env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .parse_default_env()
        .init();

    let access_token = match config.resolve_access_token() {
        Ok(Some(token)) => token,
        Ok(None) => {
            eprintln!(
                "Error: No access token found. Set {} or access_token_file in {}",
                config.access_token_env,
                Config::config_path().display()
            );
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let service = match GoogleDocsClient::new(
        &config.api_base_url,
        &access_token,
        Duration::from_secs(config.request_timeout_secs),
    ) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Error: Failed to create HTTP client: {e}");
            process::exit(1);
        }
    };
    log::info!("Using document service at {}", config.api_base_url);

    let tools = DocumentTools::new(service);
    match run(&tools, cli.command).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}
