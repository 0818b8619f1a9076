//! Configuration validation functions.

use super::Config;
use url::Url;

const STUN_SCHEMES: [&str; 2] = ["stun", "stuns"];

/// Validate a loaded configuration before the server starts.
pub fn validate_config(config: &Config) -> anyhow::Result<()> {
    for server in &config.stun_servers {
        let url = Url::parse(server.trim())
            .map_err(|e| anyhow::anyhow!("stun_servers entry '{server}' is not a valid URL: {e}"))?;
        if !STUN_SCHEMES.contains(&url.scheme()) {
            anyhow::bail!(
                "stun_servers entry '{server}' must use the stun: or stuns: scheme (got '{}:')",
                url.scheme()
            );
        }
    }

    if config.server.outbound_queue_capacity == 0 {
        anyhow::bail!("server.outbound_queue_capacity must be greater than zero");
    }

    if config.protocol.max_room_id_length == 0 {
        anyhow::bail!("protocol.max_room_id_length must be greater than zero");
    }

    if config.security.max_message_size == 0 {
        anyhow::bail!("security.max_message_size must be greater than zero");
    }

    if config.is_production() && config.security.cors_origins.trim() == "*" {
        eprintln!(
            "\nSECURITY WARNING: permissive CORS in production!\n\
             ===================================================================\n\
             Any origin can open signaling sessions against this relay.\n\
             Restrict it to the origin serving the client bundle:\n\
             export SIGNAL_RELAY__SECURITY__CORS_ORIGINS=\"https://call.example.com\"\n\
             ===================================================================\n"
        );
    }

    config.websocket.validate()?;

    Ok(())
}
