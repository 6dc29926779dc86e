//! Ledger error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    #[error("unknown snapshot {id}: latest sealed id is {latest}")]
    UnknownSnapshot { id: u64, latest: u64 },

    #[error("insufficient balance for {account}: requested {requested}, available {available}")]
    InsufficientBalance {
        account: String,
        requested: u64,
        available: u64,
    },

    #[error("amount overflow")]
    AmountOverflow,

    #[error("total supply overflow")]
    SupplyOverflow,
}

pub type Result<T> = std::result::Result<T, LedgerError>;
