//! Headless core of a Solana dashboard.
//!
//! Four panels (transfer, token creation, airdrop, history) share an
//! [`IdentityProvider`](identity::IdentityProvider) and a
//! [`NotificationFeed`](notification::NotificationFeed). Each panel owns its
//! form state and its own [`ClusterSelection`](endpoint::ClusterSelection);
//! network access goes through the [`NetworkClient`](network::NetworkClient)
//! trait so tests can swap in fakes.

pub mod config;
pub mod dashboard;
pub mod endpoint;
pub mod error;
pub mod format;
pub mod identity;
pub mod logging;
pub mod network;
pub mod notification;
pub mod pagination;
pub mod panels;
pub mod submission;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod test_support;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use config::Config;
pub use dashboard::{Dashboard, Tab};
pub use endpoint::{Cluster, ClusterSelection, Connection, Connector, Endpoint, RpcConnector};
pub use error::PanelError;
pub use identity::{Identity, IdentityProvider, KeypairIdentity};
pub use network::NetworkClient;
pub use notification::{Notification, NotificationFeed, Variant};
pub use submission::{SubmissionPipeline, SubmissionReceipt};
pub use types::{BalanceChange, SubmissionStatus, TransactionDetail, TransactionRecord};
pub use workflow::WorkflowState;

/// Lock a panel mutex. State stays usable after a panic in another holder.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
