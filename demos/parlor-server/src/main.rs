use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use parlor::{ParlorServer, QueryIdentity};
use parlor_room::HubConfig;
use parlor_rules::RoomOptions;
use parlor_store::{MemoryStore, StoreConfig};
use tracing_subscriber::EnvFilter;

/// Runs a Parlor game server with an in-memory room store.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    bind: String,

    /// Seconds a new room stays joinable
    #[arg(long, default_value_t = 300)]
    room_ttl_secs: u64,

    /// Pause before each bot roll and move, in milliseconds
    #[arg(long, default_value_t = 1000)]
    bot_delay_ms: u64,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log: String,

    /// Room to create at startup: tic-tac-toe, snakes-ladders or
    /// ludo[:online|computer|local][:N]. Repeatable.
    #[arg(short, long = "create", value_name = "GAME")]
    create: Vec<RoomOptions>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = Arc::new(MemoryStore::new(StoreConfig {
        room_ttl: Duration::from_secs(args.room_ttl_secs),
        ..StoreConfig::default()
    }));

    let rooms = if args.create.is_empty() {
        vec![RoomOptions::tic_tac_toe()]
    } else {
        args.create
    };
    for options in &rooms {
        let code = store.create_room(options);
        tracing::info!(
            %code,
            game = %options.game_type,
            mode = ?options.mode,
            players = options.player_count,
            "ws://{}/ws/game/{code}/",
            args.bind
        );
    }

    let delay = Duration::from_millis(args.bot_delay_ms);
    let server = ParlorServer::builder()
        .bind(&args.bind)
        .hub_config(HubConfig {
            bot_think_delay: delay,
            bot_move_delay: delay,
            ..HubConfig::default()
        })
        .build(store, QueryIdentity)
        .await?;

    server.run().await?;
    Ok(())
}
