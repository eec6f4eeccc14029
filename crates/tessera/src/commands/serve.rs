//! Builder server command.

use anyhow::Result;
use tessera_server::Server;

use crate::config::Config;

/// Run the builder server.
pub async fn run(config: &Config, port: Option<u16>, open: bool) -> Result<()> {
    let mut server_config = config.server();
    if let Some(port) = port {
        server_config.port = port;
    }
    server_config.open = server_config.open && open;

    if !server_config.public_dir.exists() {
        tracing::warn!(
            "Public directory {} not found; only the API will be served",
            server_config.public_dir.display()
        );
    }

    tracing::info!("Starting server on port {}", server_config.port);

    Server::new(server_config).start().await?;

    Ok(())
}
