use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use common_services::config::proc_loader::file_to_config;
use common_services::logging::subscriber::{self, LogLevel};
use common_services::storage::MemoryStorage;
use common_services::Services;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "common-services.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum, ignore_case = true)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a token against the format configured for its key
    Check {
        #[arg(short, long)]
        key: String,
        #[arg(short, long, env = "TOKEN")]
        token: String,
    },
    /// List configured token keys
    Keys,
    /// Write one message through the logging facade
    Log {
        #[arg(short, long, value_enum, ignore_case = true, default_value = "info")]
        level: LogLevel,
        message: String,
    },
}

fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config, start logging
    // -------------------------------

    let args = Args::parse();
    let services_config = file_to_config(Path::new(&args.config))?;
    subscriber::run(&services_config, args.log_level);

    // -------------------------------
    // 2. Build services
    //
    // no browser here: tokens only live for this process
    // -------------------------------

    let services = Services::builder()
        .config(services_config)
        .storage(MemoryStorage::new())
        .build()?;
    info!("services started from '{}'", args.config);

    let log = services.log_service();
    let tokens = services.token_service();

    // -------------------------------
    // 3. Run command
    // -------------------------------

    match args.command {
        Command::Check { key, token } => {
            tokens.validate(&key, &token)?;
            println!("token for '{}' is valid", key);
        }
        Command::Keys => {
            for key in tokens.registered_keys() {
                println!("{}", key);
            }
        }
        Command::Log { level, message } => match level {
            LogLevel::ERROR => log.error(&message),
            LogLevel::WARN => log.warn(&message),
            LogLevel::INFO => log.info(&message),
            LogLevel::DEBUG | LogLevel::TRACE => log.debug(&message),
        },
    }

    Ok(())
}
