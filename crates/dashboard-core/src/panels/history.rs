//! Transaction history for the connected wallet or an entered address.

use std::sync::Mutex;

use chain_sol::{bytes_to_address, parse_address};
use tracing::{debug, info};

use crate::config::HISTORY_FETCH_LIMIT;
use crate::endpoint::{Cluster, ClusterSelection};
use crate::error::PanelError;
use crate::identity::IdentityProvider;
use crate::lock;
use crate::notification::NotificationFeed;
use crate::pagination::Pager;
use crate::types::{TransactionDetail, TransactionRecord};

/// Where the history address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSource {
    External([u8; 32]),
    ConnectedWallet([u8; 32]),
}

impl AddressSource {
    pub fn address(&self) -> [u8; 32] {
        match self {
            AddressSource::External(a) | AddressSource::ConnectedWallet(a) => *a,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AddressSource::External(_) => "external address",
            AddressSource::ConnectedWallet(_) => "connected wallet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailView {
    #[default]
    Hidden,
    Loading {
        signature: String,
    },
    Loaded(TransactionDetail),
    /// The node does not know the signature.
    Missing {
        signature: String,
    },
}

#[derive(Debug)]
struct HistoryState {
    external_text: String,
    records: Vec<TransactionRecord>,
    pager: Pager,
    /// Bumped per fetch; only the latest fetch may store its result.
    generation: u64,
    loading: bool,
    detail: DetailView,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self {
            external_text: String::new(),
            records: Vec::new(),
            pager: Pager::new(0),
            generation: 0,
            loading: false,
            detail: DetailView::Hidden,
        }
    }
}

pub struct HistoryPanel {
    identity: IdentityProvider,
    feed: NotificationFeed,
    selection: ClusterSelection,
    state: Mutex<HistoryState>,
}

impl HistoryPanel {
    pub fn new(
        identity: IdentityProvider,
        feed: NotificationFeed,
        selection: ClusterSelection,
    ) -> Self {
        Self {
            identity,
            feed,
            selection,
            state: Mutex::new(HistoryState::default()),
        }
    }

    /// Replace the external address text. When the text changed and the
    /// panel now resolves to an address, the list is refetched for it;
    /// otherwise `Ok(None)` and nothing is fetched.
    pub async fn set_external_address(&self, text: &str) -> Result<Option<usize>, PanelError> {
        let text = text.trim();
        {
            let mut state = lock(&self.state);
            if state.external_text == text {
                return Ok(None);
            }
            state.external_text = text.to_string();
        }
        match self.resolve_address() {
            Ok(Some(_)) => self.refresh().await.map(Some),
            _ => Ok(None),
        }
    }

    pub fn external_address_text(&self) -> String {
        lock(&self.state).external_text.clone()
    }

    /// Non-empty external text wins over the connected wallet; if that text
    /// does not parse there is no usable address.
    pub fn resolve_address(&self) -> Result<Option<AddressSource>, PanelError> {
        let external = lock(&self.state).external_text.clone();
        if external.is_empty() {
            return Ok(self.identity.address().map(AddressSource::ConnectedWallet));
        }
        parse_address(&external)
            .map(|a| Some(AddressSource::External(a)))
            .ok_or_else(|| PanelError::InvalidInput(format!("invalid address: {external}")))
    }

    pub fn can_refresh(&self) -> bool {
        matches!(self.resolve_address(), Ok(Some(_)))
    }

    pub fn records(&self) -> Vec<TransactionRecord> {
        lock(&self.state).records.clone()
    }

    /// Records on the current page.
    pub fn page_records(&self) -> Vec<TransactionRecord> {
        let state = lock(&self.state);
        state.records[state.pager.range()].to_vec()
    }

    pub fn pager(&self) -> Pager {
        lock(&self.state).pager
    }

    pub fn next_page(&self) -> bool {
        lock(&self.state).pager.next()
    }

    pub fn previous_page(&self) -> bool {
        lock(&self.state).pager.previous()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    pub fn detail(&self) -> DetailView {
        lock(&self.state).detail.clone()
    }

    pub fn close_detail(&self) {
        lock(&self.state).detail = DetailView::Hidden;
    }

    pub fn cluster(&self) -> Cluster {
        self.selection.cluster()
    }

    /// Switch endpoint and refetch from it.
    pub async fn select_cluster(&self, cluster: Cluster) -> Result<usize, PanelError> {
        self.selection.select(cluster)?;
        self.refresh().await
    }

    /// Refetch after the identity provider changed.
    pub async fn on_identity_changed(&self) -> Result<usize, PanelError> {
        self.refresh().await
    }

    /// Fetch up to 100 recent records and replace the list. Returns the
    /// number of records stored.
    pub async fn refresh(&self) -> Result<usize, PanelError> {
        let source = match self.resolve_address() {
            Ok(Some(source)) => source,
            Ok(None) => {
                self.feed.failure(
                    "No address provided",
                    "Please connect your wallet or enter an external address",
                );
                return Err(PanelError::InvalidInput("no address provided".into()));
            }
            Err(e) => {
                self.feed.failure("Failed to fetch transactions", e.to_string());
                return Err(e);
            }
        };

        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.loading = true;
            state.generation
        };

        let connection = self.selection.snapshot();
        let address = source.address();
        info!(
            cluster = %connection.endpoint.cluster,
            address = %bytes_to_address(&address),
            "fetching history"
        );
        let result = connection
            .client
            .recent_transactions(&address, HISTORY_FETCH_LIMIT)
            .await;

        let mut state = lock(&self.state);
        if state.generation != generation {
            debug!(generation, "discarding superseded history fetch");
            return result.map(|records| records.len());
        }
        state.loading = false;

        match result {
            Ok(mut records) => {
                records.truncate(HISTORY_FETCH_LIMIT);
                let count = records.len();
                state.pager.reset(count);
                state.records = records;
                self.feed.success(
                    "Transactions fetched",
                    format!("Retrieved {count} transactions for {}", source.label()),
                );
                Ok(count)
            }
            Err(e) => {
                self.feed.failure("Failed to fetch transactions", e.to_string());
                Err(e)
            }
        }
    }

    /// Fetch the parsed transaction for `signature` into the detail view.
    pub async fn view_detail(&self, signature: &str) -> Result<DetailView, PanelError> {
        lock(&self.state).detail = DetailView::Loading {
            signature: signature.to_string(),
        };

        let connection = self.selection.snapshot();
        let result = connection.client.transaction_detail(signature).await;

        let mut state = lock(&self.state);
        let still_wanted = matches!(
            &state.detail,
            DetailView::Loading { signature: pending } if pending == signature
        );

        match result {
            Ok(found) => {
                let view = match found {
                    Some(detail) => DetailView::Loaded(detail),
                    None => DetailView::Missing {
                        signature: signature.to_string(),
                    },
                };
                if still_wanted {
                    state.detail = view.clone();
                }
                Ok(view)
            }
            Err(e) => {
                if still_wanted {
                    state.detail = DetailView::Hidden;
                    self.feed
                        .failure("Failed to fetch transaction details", e.to_string());
                } else {
                    debug!(signature, error = %e, "discarding superseded detail failure");
                }
                Err(e)
            }
        }
    }
}
