pub mod airdrop;
pub mod history;
pub mod token;
pub mod transfer;

pub use airdrop::{clamp_airdrop_amount, AirdropPanel, AirdropTarget};
pub use history::{AddressSource, DetailView, HistoryPanel};
pub use token::{token_creation_instructions, TokenCreationIntent, TokenPanel};
pub use transfer::TransferPanel;
