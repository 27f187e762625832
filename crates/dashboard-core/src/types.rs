use sol_rpc::Commitment;

/// One row of the history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub signature: String,
    pub slot: u64,
    /// Unix seconds; `None` when the node does not report it.
    pub block_time: Option<i64>,
    pub succeeded: bool,
    pub confirmation_status: Option<Commitment>,
    pub memo: Option<String>,
}

/// Lamport balance of one account before and after a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceChange {
    pub account: String,
    pub pre: u64,
    pub post: u64,
}

impl BalanceChange {
    pub fn delta(&self) -> i128 {
        i128::from(self.post) - i128::from(self.pre)
    }
}

/// Parsed transaction shown in the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDetail {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
    pub fee: u64,
    pub succeeded: bool,
    pub balance_changes: Vec<BalanceChange>,
    pub logs: Vec<String>,
}

/// Result of a single status lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Processed,
    Confirmed,
    Finalized,
    /// Landed but the runtime rejected it.
    Failed(String),
}

impl SubmissionStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, SubmissionStatus::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_delta_signed() {
        let paid = BalanceChange {
            account: "A".into(),
            pre: 1_000_000_000,
            post: 499_995_000,
        };
        assert_eq!(paid.delta(), -500_005_000);

        let received = BalanceChange {
            account: "B".into(),
            pre: 0,
            post: u64::MAX,
        };
        assert_eq!(received.delta(), i128::from(u64::MAX));
    }
}
