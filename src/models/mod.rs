pub mod transport;

pub use transport::{compute_balance, AdvanceType, BalanceStatus, TransportRecord};
