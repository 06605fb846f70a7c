use crate::config::GatewayConfig;
use crate::store::{self, StoreClient};
use gateway_framework::{Gateway, Registry, RegistryError};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("Failed to build registry: {0}")]
    Registry(#[from] RegistryError),
    #[error("Store task failed: {0}")]
    Join(#[from] JoinError),
}

/// The running sample gateway: one store actor per resource type behind a
/// [`Gateway`].
///
/// # Example
///
/// ```ignore
/// let system = GatewaySystem::start(&GatewayConfig::default())?;
/// let mut ctx = RequestContext::new(identity);
/// let response = system.gateway.respond(&["networks"], &Method::GET, &mut ctx).await?;
/// system.shutdown().await?;
/// ```
pub struct GatewaySystem {
    pub gateway: Gateway,

    /// Clients for direct access to the stores, in config order.
    pub clients: Vec<StoreClient>,

    /// Task handles for all running store actors (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl GatewaySystem {
    /// Spawns the stores and builds the gateway. Must be called inside a tokio runtime.
    pub fn start(config: &GatewayConfig) -> Result<Self, SystemError> {
        let mut builder = Registry::builder();
        let mut clients = Vec::with_capacity(config.resources.len());
        let mut handles = Vec::with_capacity(config.resources.len());

        for resource in &config.resources {
            let resource = resource.resource_type();
            let (actor, client) = store::new(resource.clone(), config.store.buffer_size);
            // Register first so a rejected resource never gets a running task.
            builder = builder.register(resource, Arc::new(client.clone()))?;
            handles.push(tokio::spawn(actor.run()));
            clients.push(client);
        }

        let registry = builder.build();
        info!(collections = ?registry.collections(), "Gateway started");

        Ok(Self {
            gateway: Gateway::new(Arc::new(registry)),
            clients,
            handles,
        })
    }

    /// Drops every client and waits for the store actors to finish.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        drop(self.gateway);
        drop(self.clients);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Store task failed");
                return Err(SystemError::Join(e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
