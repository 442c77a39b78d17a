use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use intent_bot::application::errors::BotError;
use intent_bot::application::messaging::{ActivityRouter, IntentClassifier, MATCH_THRESHOLD};
use intent_bot::domain::entities::Activity;
use intent_bot::domain::traits::Bot;
use intent_bot::infrastructure::adapters::console::{parse_input, ConsoleAdapter, ConsoleInput, ConsoleSession};
use intent_bot::infrastructure::config::Config;
use intent_bot::{build_router, build_store};

#[derive(Parser)]
#[command(name = "intent-bot")]
#[command(about = "A greeter and intent dispatcher bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console
    Run {
        /// Start signed in with this access token
        #[arg(short, long)]
        token: Option<String>,

        /// Identity provider of the token
        #[arg(short, long, default_value = "github")]
        provider: String,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
    /// Show the best catalog match for some text
    Classify {
        text: String,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token, provider } => {
            if let Err(e) = run_bot(&cli.config, token, provider) {
                tracing::error!("Bot stopped: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("intent-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
        Commands::Classify { text } => {
            classify(&text);
        }
    }
}

fn load_config(config_path: &str) -> Config {
    if std::path::Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    }
}

fn run_bot(config_path: &str, token: Option<String>, provider: String) -> Result<(), BotError> {
    let config = load_config(config_path);
    tracing::info!("Starting intent-bot: {}", config.bot.name);

    let console = config.console();
    if !console.enabled {
        return Err(BotError::Config("adapters.console is disabled".to_string()));
    }

    let store = build_store(&config)?;
    let router = build_router(&config, store)?;
    tracing::info!("Router ready with {} handlers", router.len());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;

    rt.block_on(async {
        let bot = ConsoleAdapter::new(&config.bot.name);
        let mut session = ConsoleSession::new(&console, bot.bot_info().account());
        if let Some(token) = token {
            session.sign_in(provider, token);
        }
        run_console_bot(&bot, &router, session).await
    })
}

/// Process one activity and any follow-up the channel sends back
async fn process_and_send<B: Bot>(bot: &B, router: &ActivityRouter, session: &mut ConsoleSession, activity: Activity) {
    let mut next = Some(activity);
    while let Some(activity) = next.take() {
        match router.process(activity).await {
            Ok(outbound) => {
                if let Err(e) = bot.send_activities(session.conversation_id(), &outbound).await {
                    tracing::error!("Failed to send: {}", e);
                }
                next = session.observe(&outbound);
            }
            Err(e) => {
                println!("[ERROR] {}", e);
            }
        }
    }
}

async fn run_console_bot<B: Bot>(bot: &B, router: &ActivityRouter, mut session: ConsoleSession) -> Result<(), BotError> {
    bot.start().await?;

    let info = bot.bot_info();
    tracing::info!("Bot started: {}", info.name);

    let join = session.join();
    process_and_send(bot, router, &mut session, join).await;

    // Main loop (for console mode)
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| BotError::Internal(format!("Failed to read stdin: {}", e)))?
    {
        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(e) => {
                println!("[ERROR] {}", e);
                continue;
            }
        };

        if input == ConsoleInput::Quit {
            break;
        }

        if let Some(activity) = session.activity_for(input) {
            process_and_send(bot, router, &mut session, activity).await;
        }
    }

    tracing::info!("Console closed");
    Ok(())
}

fn classify(text: &str) {
    let classifier = IntentClassifier::default();
    match classifier.best_match(text) {
        Some(best) => {
            let verdict = if best.score > MATCH_THRESHOLD { "matched" } else { "unmatched" };
            println!("{} {:?} score={:.3} ({})", best.label, best.intent, best.score, verdict);
        }
        None => println!("unmatched"),
    }
}

fn init_config() {
    let config = Config::default();
    match serde_yaml::to_string(&config) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => tracing::error!("Failed to serialize config: {}", e),
    }
}
