//! Josera Card - a digital business card editor.
//!
//! Edits a single card (contact fields, logo, export options) and exports it
//! as a JPEG snapshot, a single-page PDF or a self-contained interactive HTML
//! card with an embedded vCard QR code. Logos can be edited with a text
//! instruction through the Gemini image API.
//!
//! QUICK START:
//!   josera-card edit                                  # Interactive editor
//!   josera-card export --set name="Jane Doe"          # JPEG, PDF and HTML
//!   josera-card export -f html --logo logo.png        # HTML with your logo
//!   josera-card vcard --set phone="+62 800 123"       # Print the vCard
//!   josera-card config init                           # Write default config

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{encode_vcard, format_saved, EditorSession};
use cli::{repl, Cli, Commands, ConfigAction, FormatSelection};
use domain::{AppConfig, CardData, CardField, Direction};
use infrastructure::{
    config_file_path, discover_font, ensure_config_exists, load_config, load_config_from_file,
    read_logo_file, save_artifact, save_config, GeminiClient,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
async fn run(cli: Cli) -> domain::Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Edit => {
            let config = load_config(config_path)?;
            cmd_edit(&config).await?;
        }
        Commands::Export {
            format,
            out,
            logo,
            set,
            no_qr,
            direction,
            prompt,
        } => {
            let config = load_config(config_path)?;
            let request = ExportRequest {
                selection: format,
                out_dir: out.unwrap_or_else(|| config.export.output_dir.clone()),
                logo,
                overrides: set,
                no_qr,
                direction,
                prompt,
            };
            cmd_export(&config, request).await?;
        }
        Commands::Vcard { set } => {
            cmd_vcard(&set);
        }
        Commands::Config { action } => {
            cmd_config(action, config_path)?;
        }
    }

    Ok(())
}

/// Start a session from configuration, loading the card font.
fn new_session(config: &AppConfig) -> EditorSession {
    let font = discover_font(config.render.font_path.as_deref());
    EditorSession::from_config(config, font)
}

/// Interactive editor command.
async fn cmd_edit(config: &AppConfig) -> domain::Result<()> {
    let mut session = new_session(config);

    let editor = match GeminiClient::from_env(&config.editor) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!(error = %e, "AI logo editing disabled");
            None
        }
    };

    repl::run_editor(
        &mut session,
        editor.as_ref(),
        &config.export.output_dir,
        config.upload.max_logo_bytes,
    )
    .await
}

/// Arguments of the one-shot export.
struct ExportRequest {
    selection: FormatSelection,
    out_dir: PathBuf,
    logo: Option<PathBuf>,
    overrides: Vec<(CardField, String)>,
    no_qr: bool,
    direction: Option<Direction>,
    prompt: Option<String>,
}

/// One-shot export command.
async fn cmd_export(config: &AppConfig, request: ExportRequest) -> domain::Result<()> {
    let mut session = new_session(config);

    for (field, value) in &request.overrides {
        session.update_field(field.key(), value)?;
    }
    if request.no_qr {
        session.set_show_qr_code(false);
    }
    if let Some(direction) = request.direction {
        session.set_direction(direction);
    }

    if let Some(path) = &request.logo {
        let bytes = read_logo_file(path, config.upload.max_logo_bytes)?;
        session.upload_logo(&bytes)?;
    }

    if let Some(prompt) = request.prompt {
        let client = GeminiClient::from_env(&config.editor)?;
        session.set_prompt(prompt);
        println!("{}", "Generating logo...".dimmed());
        session.request_ai_edit(&client).await?;
        println!("{} Logo updated", "✓".green());
    }

    for format in request.selection.formats() {
        let artifact = session.export(format)?;
        let path = save_artifact(&request.out_dir, &artifact)?;
        println!("{}", format_saved(&artifact, &path));
    }

    Ok(())
}

/// Print the vCard for the default card with overrides.
fn cmd_vcard(overrides: &[(CardField, String)]) {
    let card = overrides
        .iter()
        .fold(CardData::sample(), |card, (field, value)| card.with_field(*field, value.as_str()));

    print!("{}", encode_vcard(&card));
}

/// Configuration file management command.
fn cmd_config(action: ConfigAction, override_path: Option<&Path>) -> domain::Result<()> {
    let path = config_file_path(override_path);

    match action {
        ConfigAction::Init { force: true } => {
            let config = if path.exists() {
                load_config_from_file(&path)?
            } else {
                AppConfig::default()
            };
            save_config(&config, &path)?;
            println!("{} Wrote {}", "✓".green().bold(), path.display());
        }
        ConfigAction::Init { force: false } => {
            if ensure_config_exists(&path)? {
                println!("{} Created {}", "✓".green().bold(), path.display());
            } else {
                println!("{} already exists", path.display().to_string().yellow());
            }
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let config = load_config(override_path)?;
            let content = toml::to_string_pretty(&config).map_err(|e| domain::AppError::Config {
                message: format!("Failed to serialize config: {e}"),
            })?;
            println!("{} {}", "📄".bold(), path.display().to_string().cyan());
            println!();
            println!("{content}");
        }
    }

    Ok(())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
