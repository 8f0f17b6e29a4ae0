//! Skillflow Telegram bot
//!
//! Main application entry point

use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use tracing::{error, info, warn};

use skillflow::{
    config::Settings,
    database::{self, create_pool, run_migrations},
    handlers::{self, Command},
    memory::PgMemoryStore,
    search::SearchClient,
    skills::PreferencesSkill,
    state::SessionRegistry,
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("loading settings")?;
    settings.validate().context("validating settings")?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", skillflow::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = database::DatabaseConfig::from(&settings.database);
    let db_pool = create_pool(&db_config).await?;
    run_migrations(&db_pool).await?;

    let store = Arc::new(PgMemoryStore::new(db_pool));

    let search = match SearchClient::new(settings.search.clone()) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!(error = %e, "Search client unavailable, product search disabled");
            None
        }
    };

    // Register skills
    let mut sessions = SessionRegistry::new(store);
    sessions.register(Arc::new(PreferencesSkill::new(search)?));

    let package = settings.skills.default_package.clone();
    if !sessions.has_skill(&package) {
        anyhow::bail!("default package {} is not a registered skill", package);
    }

    let sessions = Arc::new(sessions);
    spawn_session_sweeper(Arc::clone(&sessions), Duration::from_secs(settings.skills.session_idle_minutes * 60));

    let bot = Bot::new(&settings.bot.token);

    if let Some(webhook_url) = &settings.bot.webhook_url {
        info!("Webhook URL configured: {}", webhook_url);
        info!("Note: Webhook setup not implemented in this version, falling back to polling");
    }

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![sessions, Arc::new(package)])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("Starting bot with polling mode...");
    dispatcher.dispatch().await;

    info!("Skillflow bot has been shut down.");
    Ok(())
}

/// Periodically drop conversations idle for longer than `max_idle`
fn spawn_session_sweeper(sessions: Arc<SessionRegistry>, max_idle: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(max_idle.min(Duration::from_secs(60)));
        loop {
            interval.tick().await;
            sessions.evict_idle(max_idle).await;
        }
    });
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_commands)
        )
        .branch(
            dptree::filter(|msg: Message| msg.text().is_some())
                .endpoint(handle_messages)
        )
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    sessions: Arc<SessionRegistry>,
    package: Arc<String>,
) -> HandlerResult {
    if let Err(e) = handlers::handle_command(bot, msg, cmd, &sessions, &package).await {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    sessions: Arc<SessionRegistry>,
    package: Arc<String>,
) -> HandlerResult {
    if let Err(e) = handlers::handle_message(bot, msg, &sessions, &package).await {
        error!(error = %e, "Error handling message");
        return Err(e.into());
    }

    Ok(())
}
