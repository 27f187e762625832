//! Cluster selection and the connections it resolves to.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use sol_rpc::{Commitment, RpcClient};
use tracing::info;

use crate::config::Config;
use crate::error::PanelError;
use crate::lock;
use crate::network::NetworkClient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Cluster {
    #[default]
    Devnet,
    Mainnet,
}

impl Cluster {
    pub const ALL: [Cluster; 2] = [Cluster::Devnet, Cluster::Mainnet];

    pub fn name(&self) -> &'static str {
        match self {
            Cluster::Devnet => "devnet",
            Cluster::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Cluster {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "devnet" => Ok(Cluster::Devnet),
            "mainnet" => Ok(Cluster::Mainnet),
            other => Err(PanelError::InvalidInput(format!("unknown cluster: {other}"))),
        }
    }
}

/// A cluster and the URL it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub cluster: Cluster,
    pub url: String,
}

impl Endpoint {
    pub fn resolve(config: &Config, cluster: Cluster) -> Self {
        Self {
            cluster,
            url: config.url_for(cluster).to_string(),
        }
    }
}

/// Turns an endpoint into a live client.
pub trait Connector: Send + Sync {
    fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn NetworkClient>, PanelError>;
}

/// Connector producing `sol_rpc::RpcClient`s.
#[derive(Debug, Clone)]
pub struct RpcConnector {
    timeout: std::time::Duration,
    commitment: Commitment,
}

impl RpcConnector {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: config.request_timeout(),
            commitment: config.commitment,
        }
    }
}

impl Connector for RpcConnector {
    fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn NetworkClient>, PanelError> {
        let client = RpcClient::new(endpoint.url.clone(), self.timeout, self.commitment)?;
        Ok(Arc::new(client))
    }
}

/// Live client for one resolved endpoint.
#[derive(Clone)]
pub struct Connection {
    pub endpoint: Endpoint,
    pub client: Arc<dyn NetworkClient>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// A panel's network selector.
///
/// Operations take a [`Connection`] snapshot once at start; switching the
/// cluster afterwards only affects operations started later.
pub struct ClusterSelection {
    config: Config,
    connector: Arc<dyn Connector>,
    current: Mutex<Connection>,
}

impl ClusterSelection {
    pub fn new(
        config: Config,
        connector: Arc<dyn Connector>,
        cluster: Cluster,
    ) -> Result<Self, PanelError> {
        let endpoint = Endpoint::resolve(&config, cluster);
        let client = connector.connect(&endpoint)?;
        Ok(Self {
            config,
            connector,
            current: Mutex::new(Connection { endpoint, client }),
        })
    }

    /// Switch to `cluster`, replacing the live connection. Re-selecting the
    /// current cluster also reconnects.
    pub fn select(&self, cluster: Cluster) -> Result<(), PanelError> {
        let endpoint = Endpoint::resolve(&self.config, cluster);
        let client = self.connector.connect(&endpoint)?;
        info!(cluster = %cluster, url = %endpoint.url, "endpoint selected");
        *lock(&self.current) = Connection { endpoint, client };
        Ok(())
    }

    pub fn cluster(&self) -> Cluster {
        lock(&self.current).endpoint.cluster
    }

    pub fn endpoint(&self) -> Endpoint {
        lock(&self.current).endpoint.clone()
    }

    pub fn snapshot(&self) -> Connection {
        lock(&self.current).clone()
    }
}
