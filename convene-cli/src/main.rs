use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use colored::*;
use convene::client::{
    ClientConfig, ConnectionState, ConveneClient, RemoteStatus, SessionError, SessionObserver,
    WebRtcTransportFactory,
};
use convene::model::{IceServerConfig, MemberId, MemberInfo, RoomId};
use convene::server::ServerConfig;
use convene::server::config::DEFAULT_PORT;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "convene")]
#[command(about = "Room-based WebRTC signaling relay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Serve {
        #[arg(long, env = "CONVENE_HOST", default_value = "0.0.0.0")]
        host: IpAddr,

        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Comma-separated STUN urls (`stun:` or `stuns:`) handed to clients.
        /// Defaults to the public Google STUN servers.
        #[arg(long, env = "CONVENE_ICE_SERVERS", value_delimiter = ',')]
        ice_servers: Vec<String>,
    },

    /// Join a room and negotiate with every other member until Ctrl-C.
    Join {
        #[arg(long, default_value = "ws://localhost:3001/ws")]
        server: String,

        #[arg(short, long)]
        room: String,

        #[arg(short, long)]
        name: String,

        #[arg(long)]
        member_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve {
            host,
            port,
            ice_servers,
        } => {
            let ice_servers = parse_ice_servers(ice_servers)?;
            info!(
                "Starting relay on {}:{} with {} ICE servers",
                host,
                port,
                ice_servers.len()
            );

            println!("{}", "Starting Convene relay...".green().bold());
            println!("   Listening: {}:{}", host, port);
            for server in &ice_servers {
                println!("   ICE:       {}", server.urls.join(", "));
            }

            convene::server::serve(ServerConfig {
                host,
                port,
                ice_servers,
            })
            .await?;
        }

        Commands::Join {
            server,
            room,
            name,
            member_id,
        } => {
            let mut config = ClientConfig::new(server, RoomId::new(room), name);
            if let Some(id) = member_id {
                config = config.with_member_id(MemberId::from(id));
            }

            println!(
                "{} {} as {} ({})",
                "Joining".cyan().bold(),
                config.room_id,
                config.display_name,
                config.member_id
            );

            info!("Joining room {} via {}", config.room_id, config.server_url);
            let client = ConveneClient::connect(
                config,
                Arc::new(WebRtcTransportFactory),
                Box::new(ConsoleObserver),
            )
            .await
            .context("Failed to connect to the signaling server")?;

            tokio::signal::ctrl_c().await?;
            println!("{}", "Leaving room...".yellow());
            client.shutdown().await;
        }
    }

    Ok(())
}

/// STUN urls from the command line. Credentialed TURN servers cannot be
/// expressed as a bare url, so only STUN schemes are accepted.
fn parse_ice_servers(urls: Vec<String>) -> Result<Vec<IceServerConfig>> {
    let urls: Vec<String> = urls
        .into_iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect();

    if urls.is_empty() {
        return Ok(ServerConfig::default_ice_servers());
    }

    urls.into_iter()
        .map(|url| {
            if !(url.starts_with("stun:") || url.starts_with("stuns:")) {
                bail!("Unsupported ICE server url {url}: only stun: and stuns: are accepted");
            }
            Ok(IceServerConfig::stun(url))
        })
        .collect()
}

/// Prints room activity as it happens.
struct ConsoleObserver;

#[async_trait]
impl SessionObserver for ConsoleObserver {
    async fn on_member_joined(&self, member: &MemberInfo) {
        println!(
            "{} {} ({})",
            "+".green().bold(),
            member.display_name,
            member.member_id
        );
    }

    async fn on_member_left(&self, member_id: &MemberId) {
        println!("{} {}", "-".red().bold(), member_id);
    }

    async fn on_session_stable(&self, member_id: &MemberId) {
        println!("{} negotiated with {}", "✓".green(), member_id);
    }

    async fn on_session_failed(&self, member_id: &MemberId, error: &SessionError) {
        println!("{} {}: {}", "✗".red(), member_id, error);
    }

    async fn on_status_changed(&self, member_id: &MemberId, status: &RemoteStatus) {
        println!(
            "{} {} muted={} video_off={} sharing={}",
            "~".cyan(),
            member_id,
            status.audio_muted,
            status.video_off,
            status.screen_sharing
        );
    }

    async fn on_connection_state(&self, member_id: &MemberId, state: ConnectionState) {
        println!("{} {} {:?}", "·".dimmed(), member_id, state);
    }
}
