use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use enclosure_quote::app::App;
use enclosure_quote::config::Config;
use enclosure_quote::logging;
use enclosure_quote::quote::{format_money, PriceBreakdown, SelectionState, Surface, SummaryFields};
use enclosure_quote::session::{FileSessionStore, SessionStore};
use enclosure_quote::submission::{
    ContactForm, LeadPayload, SubmissionFlow, SubmissionPhase, SubmitError, WebFormsClient,
};
use enclosure_quote::wizard::{CatalogTemplates, Wizard};

#[derive(Parser)]
#[command(name = "enclosure-quote")]
#[command(about = "Price a balcony or loggia enclosure and request a call back")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Session id whose snapshot to use
    #[arg(short, long, conflicts_with = "new_session")]
    session: Option<String>,

    /// Start a fresh session with a generated id
    #[arg(long)]
    new_session: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Price an enclosure without the wizard
    Quote {
        /// Enclosure type name from the catalog
        enclosure: String,

        /// Length in meters
        length: f64,

        /// Width in meters
        width: f64,

        /// Height in meters
        height: f64,

        /// Wall finish material
        #[arg(long)]
        walls: Option<String>,

        /// Ceiling finish material
        #[arg(long)]
        ceiling: Option<String>,

        /// Floor finish material
        #[arg(long)]
        floor: Option<String>,

        /// Add-on name (repeatable)
        #[arg(short, long = "add-on")]
        add_on: Vec<String>,
    },

    /// Write the effective configuration to .enclosure-quote/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the saved snapshot of the session
    Show,

    /// Erase the saved snapshot of the session
    Reset,

    /// Send the saved quote as a lead
    Submit {
        /// Contact name
        #[arg(long)]
        name: String,

        /// Phone number or e-mail
        #[arg(long)]
        contact: String,

        /// Optional note
        #[arg(long, default_value = "")]
        note: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    // Determine if we're running in TUI mode (no subcommand)
    let is_tui_mode = cli.command.is_none();

    // Initialize logging (file-based for TUI, stderr for CLI)
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    let session_id = match (&cli.session, cli.new_session) {
        (Some(id), _) => id.clone(),
        (None, true) => {
            let id = uuid::Uuid::new_v4().to_string();
            println!("Session: {}", id);
            id
        }
        (None, false) => "default".to_string(),
    };
    let store = FileSessionStore::new(
        &config.state_path(),
        &session_id,
        config.session.ttl_minutes,
    );
    tracing::debug!(session = %session_id, path = %store.path().display(), "Using session store");

    match cli.command {
        Some(Commands::Quote {
            enclosure,
            length,
            width,
            height,
            walls,
            ceiling,
            floor,
            add_on,
        }) => {
            let finishes = [
                (Surface::Walls, walls),
                (Surface::Ceiling, ceiling),
                (Surface::Floor, floor),
            ];
            cmd_quote(&config, &enclosure, [length, width, height], &finishes, &add_on)?;
        }
        Some(Commands::Init { force }) => {
            cmd_init(&config, force)?;
        }
        Some(Commands::Show) => {
            cmd_show(&config, &store)?;
        }
        Some(Commands::Reset) => {
            cmd_reset(&store)?;
        }
        Some(Commands::Submit {
            name,
            contact,
            note,
        }) => {
            let form = ContactForm {
                name,
                contact,
                note,
            };
            cmd_submit(&config, &store, form).await?;
        }
        None => {
            // No subcommand = launch the wizard
            run_tui(config, store, logging_handle.log_file_path).await?;
        }
    }

    Ok(())
}

async fn run_tui(
    config: Config,
    store: FileSessionStore,
    log_file_path: Option<PathBuf>,
) -> Result<()> {
    enclosure_quote::ui::terminal_guard::install_panic_hook();

    let templates = CatalogTemplates::new(config.catalog.clone(), config.ui.currency.clone());
    let wizard = Wizard::restore(Box::new(store), Box::new(templates), config.transition_delay());
    let sink = Arc::new(WebFormsClient::new(&config.submission)?);

    let mut app = App::new(config, wizard, sink);
    let result = app.run().await;

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

fn cmd_quote(
    config: &Config,
    enclosure: &str,
    [length, width, height]: [f64; 3],
    finishes: &[(Surface, Option<String>)],
    add_ons: &[String],
) -> Result<()> {
    let catalog = &config.catalog;
    let Some(option) = catalog.find_enclosure(enclosure) else {
        let known: Vec<_> = catalog.enclosure_types.iter().map(|e| e.name.as_str()).collect();
        bail!("Unknown enclosure type '{}' (known: {})", enclosure, known.join(", "));
    };

    let mut state = SelectionState::default();
    state.select_enclosure(option.name.clone(), option.base_price, option.french);
    if !state.set_dimensions(length, width, height) {
        bail!("Dimensions must be positive numbers of a realistic size");
    }

    for (surface, name) in finishes {
        let Some(name) = name else { continue };
        let material = catalog
            .find_material(*surface, name)
            .with_context(|| format!("Unknown {} material '{}'", surface.label(), name))?;
        if !state.select_finish(*surface, material.name.clone(), material.coefficient) {
            bail!("{} finish is not available for {}", surface.label(), option.name);
        }
    }

    for name in add_ons {
        let add_on = catalog
            .find_add_on(name)
            .with_context(|| format!("Unknown add-on '{}'", name))?;
        if !state.has_add_on(&add_on.to_add_on()) {
            state.toggle_add_on(add_on.to_add_on());
        }
    }

    let currency = &config.ui.currency;
    let breakdown = PriceBreakdown::of(&state);
    println!("Quote for {}", option.name);
    println!("{}", "─".repeat(40));
    println!("Surface area   {:.2} m²", breakdown.surface_area);
    println!("Base price     {} per m²", money(breakdown.base_price, currency));
    println!("Interior       {} per m²", money(breakdown.interior, currency));
    println!("Add-ons        {}", money(breakdown.add_ons, currency));
    println!("{}", "─".repeat(40));
    println!("Total          {}", format_money(breakdown.total, currency));

    Ok(())
}

fn money(amount: f64, currency: &str) -> String {
    format_money(amount.round() as i64, currency)
}

fn cmd_init(config: &Config, force: bool) -> Result<()> {
    let path = Config::local_config_path();
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    config.save()?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn load_snapshot(store: &FileSessionStore) -> Option<SelectionState> {
    match store.load() {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable session snapshot");
            None
        }
    }
}

fn cmd_show(config: &Config, store: &FileSessionStore) -> Result<()> {
    let Some(state) = load_snapshot(store) else {
        println!("No saved session");
        return Ok(());
    };

    println!("Step {}", state.step());
    println!("{}", "─".repeat(40));
    for (label, value) in SummaryFields::from_state(&state).rows(&config.ui.currency) {
        println!("{:<10} {}", label, value);
    }
    Ok(())
}

fn cmd_reset(store: &FileSessionStore) -> Result<()> {
    if !store.exists() {
        println!("No saved session");
        return Ok(());
    }
    store.clear().context("Failed to erase session snapshot")?;
    println!("Session erased");
    Ok(())
}

async fn cmd_submit(config: &Config, store: &FileSessionStore, form: ContactForm) -> Result<()> {
    if !form.is_valid() {
        bail!("Name and contact are required");
    }
    let state = load_snapshot(store).unwrap_or_default();
    let payload = LeadPayload::build(&config.submission.access_key, &form, &state);
    let client = WebFormsClient::new(&config.submission)?;

    let mut flow = SubmissionFlow::new();
    match flow.submit(&form, &payload, &client).await {
        SubmissionPhase::Success => {
            if let Err(e) = store.clear() {
                tracing::warn!(error = %e, "Failed to erase session snapshot");
            }
            println!("Request sent!");
            Ok(())
        }
        SubmissionPhase::Failure(e) => {
            eprintln!("{}", SubmitError::TITLE);
            bail!("{}: {}", e.user_message(), e)
        }
        SubmissionPhase::Idle | SubmissionPhase::Submitting => {
            bail!("Submission did not run")
        }
    }
}
