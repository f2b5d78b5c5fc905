// ============================================================================
// LazySpend - Suivi des dépenses dans le terminal
// ============================================================================
// Programme TUI : ajout, liste et suppression de dépenses, avec total et
// nombre de dépenses, persistées dans un fichier JSON entre les sessions.
//
// Boucle principale : Render → Input → Update, un seul thread, pas d'async.
// ============================================================================

use std::io;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use lazyspend::app::App;
use lazyspend::config::Config;
use lazyspend::storage::{JsonFileStorage, KeyValueStorage, MemoryStorage};
use lazyspend::store::ExpenseStore;
use lazyspend::ui::{events::EventHandler, render};

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : on log vers un
// fichier avec rotation quotidienne.
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans `<log_dir>/lazyspend.log.<date>`.
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/lazyspend/logs/lazyspend.log.*
/// RUST_LOG=lazyspend=trace cargo run
/// ```
fn init_logging(config: &Config) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = &config.log_dir;
    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "lazyspend.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazyspend=debug,info".into()),
        )
        .try_init()
        .context("Logging déjà initialisé")?;

    info!(log_dir = %log_dir.display(), "Logging initialisé");
    Ok(())
}

// ============================================================================
// Ouverture du stockage
// ============================================================================
// Si le répertoire de données est inutilisable, la session continue en
// mémoire et l'interface l'affiche en permanence dans le header.
// ============================================================================

fn open_storage(config: &Config) -> (Box<dyn KeyValueStorage>, Option<String>) {
    match JsonFileStorage::open(&config.data_dir) {
        Ok(storage) => (Box::new(storage), None),
        Err(e) => {
            warn!(error = ?e, "Data directory unavailable, running in memory only");
            (
                Box::new(MemoryStorage::new()),
                Some(format!(
                    "Stockage indisponible ({}) : les dépenses ne seront pas sauvegardées",
                    config.data_dir.display()
                )),
            )
        }
    }
}

fn main() -> Result<()> {
    let config = Config::from_env();

    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(?config, "LazySpend starting up");

    let (storage, warning) = open_storage(&config);
    let store = ExpenseStore::load(storage, &config.storage_key);

    let mut app = App::new(store);
    if let Some(warning) = warning {
        app = app.with_persistence_warning(warning);
    }

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!(count = app.store.count(), "Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================

/// Exécute la boucle principale jusqu'à ce que l'utilisateur quitte
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    while app.is_running() {
        // 1. RENDER
        terminal.draw(|frame| render(frame, app))?;

        // 2. INPUT
        match events.next() {
            Ok(event) => handle_event(app, event),
            Err(e) => warn!(error = %e, "Failed to read terminal event"),
        }

        // 3. UPDATE
        app.tick();
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================
// Le formulaire capture toutes les touches tant qu'il est ouvert ('q' ou 'd'
// font partie d'un nom de dépense). Sur le dashboard, toute touche autre que
// celle attendue annule la confirmation en cours.
// ============================================================================

fn handle_event(app: &mut App, event: lazyspend::ui::events::Event) {
    use lazyspend::ui::events::{
        get_char_from_event, is_add_event, is_backspace_event, is_clear_event, is_delete_event,
        is_down_event, is_enter_event, is_escape_event, is_interrupt_event, is_left_event,
        is_next_field_event, is_previous_field_event, is_quit_event, is_right_event, is_up_event,
        Event,
    };

    if let Event::Tick = event {
        return;
    }

    if is_interrupt_event(&event) {
        info!("Interrupted by user");
        app.quit();
        return;
    }

    if app.is_in_input_mode() {
        if is_escape_event(&event) {
            info!("User cancelled input");
            app.cancel_input();
        } else if is_enter_event(&event) {
            app.enter();
        } else if is_next_field_event(&event) {
            app.next_field();
        } else if is_previous_field_event(&event) {
            app.previous_field();
        } else if is_right_event(&event) {
            app.next_category();
        } else if is_left_event(&event) {
            app.previous_category();
        } else if is_backspace_event(&event) {
            app.backspace();
        } else if let Some(c) = get_char_from_event(&event) {
            app.append_char(c);
        }
        return;
    }

    if is_quit_event(&event) {
        if app.is_awaiting_quit_confirmation() {
            info!("User confirmed quit");
            app.quit();
        } else {
            app.cancel_confirmations();
            info!("User requested quit (awaiting confirmation)");
            app.request_quit();
        }
    } else if is_delete_event(&event) {
        if app.is_awaiting_delete_confirmation() {
            info!("User confirmed delete");
            app.delete_selected();
        } else {
            app.cancel_confirmations();
            debug!("User requested delete (awaiting confirmation)");
            app.request_delete();
        }
    } else if is_clear_event(&event) {
        if app.is_awaiting_clear_confirmation() {
            info!("User confirmed clear all");
            app.clear_all();
        } else {
            app.cancel_confirmations();
            debug!("User requested clear all (awaiting confirmation)");
            app.request_clear();
        }
    } else if is_add_event(&event) {
        info!("User opened add form");
        app.start_input();
    } else if is_up_event(&event) {
        app.cancel_confirmations();
        app.navigate_up();
    } else if is_down_event(&event) {
        app.cancel_confirmations();
        app.navigate_down();
    } else {
        app.cancel_confirmations();
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
