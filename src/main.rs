#![cfg_attr(not(test), deny(clippy::panic))]

use clap::Parser;
use std::net::SocketAddr;
use webrtc_signal_relay::config;
use webrtc_signal_relay::logging;
use webrtc_signal_relay::server::SignalingServer;
use webrtc_signal_relay::websocket;

/// Signal Relay -- in-memory WebSocket signaling relay for two-party WebRTC calls
#[derive(Parser, Debug)]
#[command(name = "webrtc-signal-relay")]
#[command(about = "An in-memory WebSocket signaling relay for two-party WebRTC calls")]
#[command(version)]
struct Cli {
    /// Validate configuration and exit without starting the server.
    #[arg(long, short = 'c', conflicts_with = "print_config")]
    validate_config: bool,

    /// Print the loaded configuration to stdout (as JSON) and exit.
    #[arg(long, conflicts_with = "validate_config")]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::load();

    if cli.print_config {
        let json = serde_json::to_string_pretty(&cfg)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    let validation_result = config::validate_config(&cfg);

    if cli.validate_config {
        match validation_result {
            Ok(()) => {
                println!("Configuration validation passed");
                println!();
                println!("Configuration summary:");
                println!("  Port: {}", cfg.port);
                println!("  Environment: {}", cfg.environment);
                println!("  STUN servers: {}", cfg.stun_servers.join(", "));
                println!(
                    "  Enforce relay membership: {}",
                    cfg.server.enforce_relay_membership
                );
                println!(
                    "  Static bundle: {}",
                    cfg.server.static_dir.as_deref().unwrap_or("(disabled)")
                );
                return Ok(());
            }
            Err(e) => {
                eprintln!("Configuration validation failed:\n{e}");
                std::process::exit(1);
            }
        }
    }

    validation_result?;

    logging::init_with_config(&cfg.logging);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!(
        %addr,
        environment = %cfg.environment,
        stun_servers = cfg.stun_servers.len(),
        "Starting signal relay"
    );

    let server = SignalingServer::from_config(&cfg);
    let app = websocket::create_router(
        &cfg.security.cors_origins,
        cfg.server.static_dir.as_deref(),
    )
    .with_state(server);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Signal relay listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Signal relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod cli_tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn no_flags_starts_the_server() {
        let cli = Cli::try_parse_from(["webrtc-signal-relay"]).unwrap();
        assert!(!cli.validate_config);
        assert!(!cli.print_config);
    }

    #[test]
    fn validate_config_has_short_form() {
        let cli = Cli::try_parse_from(["webrtc-signal-relay", "-c"]).unwrap();
        assert!(cli.validate_config);

        let cli = Cli::try_parse_from(["webrtc-signal-relay", "--validate-config"]).unwrap();
        assert!(cli.validate_config);
    }

    #[test]
    fn print_config_flag() {
        let cli = Cli::try_parse_from(["webrtc-signal-relay", "--print-config"]).unwrap();
        assert!(cli.print_config);
        assert!(!cli.validate_config);
    }

    #[test]
    fn validate_and_print_are_mutually_exclusive() {
        let err = Cli::try_parse_from([
            "webrtc-signal-relay",
            "--validate-config",
            "--print-config",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("cannot be used with"));
    }

    #[test]
    fn help_lists_flags() {
        let err = Cli::try_parse_from(["webrtc-signal-relay", "--help"]).unwrap_err();
        let help_text = err.to_string();
        assert!(help_text.contains("--validate-config"));
        assert!(help_text.contains("--print-config"));
    }
}
