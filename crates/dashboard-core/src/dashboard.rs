//! The four panels behind a tab switcher, sharing one identity provider and
//! one notification feed.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::config::Config;
use crate::endpoint::{Cluster, ClusterSelection, Connector};
use crate::error::PanelError;
use crate::identity::{Identity, IdentityProvider};
use crate::lock;
use crate::notification::NotificationFeed;
use crate::panels::{AirdropPanel, HistoryPanel, TokenPanel, TransferPanel};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Transfer,
    CreateToken,
    Airdrop,
    Transaction,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Transfer, Tab::CreateToken, Tab::Airdrop, Tab::Transaction];

    pub fn id(&self) -> &'static str {
        match self {
            Tab::Transfer => "transfer",
            Tab::CreateToken => "create-token",
            Tab::Airdrop => "airdrop",
            Tab::Transaction => "transaction",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tab {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.id() == s)
            .ok_or_else(|| PanelError::InvalidInput(format!("unknown tab: {s}")))
    }
}

pub struct Dashboard {
    identity: IdentityProvider,
    feed: NotificationFeed,
    active_tab: Mutex<Tab>,
    pub transfer: TransferPanel,
    pub token: TokenPanel,
    pub airdrop: AirdropPanel,
    pub history: HistoryPanel,
}

impl Dashboard {
    /// Wire every panel to `connector`. Panels start on devnet; the airdrop
    /// panel stays there.
    pub fn new(config: Config, connector: Arc<dyn Connector>) -> Result<Self, PanelError> {
        config.validate()?;
        let identity = IdentityProvider::new();
        let feed = NotificationFeed::new();
        let selection =
            |cluster| ClusterSelection::new(config.clone(), connector.clone(), cluster);

        Ok(Self {
            transfer: TransferPanel::new(identity.clone(), feed.clone(), selection(Cluster::Devnet)?),
            token: TokenPanel::new(identity.clone(), feed.clone(), selection(Cluster::Devnet)?),
            airdrop: AirdropPanel::new(identity.clone(), feed.clone(), selection(Cluster::Devnet)?),
            history: HistoryPanel::new(identity.clone(), feed.clone(), selection(Cluster::Devnet)?),
            active_tab: Mutex::new(Tab::default()),
            identity,
            feed,
        })
    }

    pub fn identity(&self) -> &IdentityProvider {
        &self.identity
    }

    pub fn notifications(&self) -> &NotificationFeed {
        &self.feed
    }

    pub fn active_tab(&self) -> Tab {
        *lock(&self.active_tab)
    }

    pub fn select_tab(&self, tab: Tab) {
        info!(%tab, "tab selected");
        *lock(&self.active_tab) = tab;
    }

    /// Connect `identity` and refresh the history panel for it. A failed
    /// refresh is reported in the feed and does not undo the connection.
    pub async fn connect_identity(&self, identity: Arc<dyn Identity>) -> [u8; 32] {
        let address = self.identity.connect(identity);
        self.refresh_history_for_identity().await;
        address
    }

    pub async fn disconnect_identity(&self) {
        self.identity.disconnect();
        self.refresh_history_for_identity().await;
    }

    async fn refresh_history_for_identity(&self) {
        match self.history.on_identity_changed().await {
            Ok(count) => debug!(count, "history refreshed for identity change"),
            Err(e) => debug!(error = %e, "history refresh after identity change failed"),
        }
    }
}
