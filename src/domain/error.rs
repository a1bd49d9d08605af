#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("no account with that username")]
    NotFound,

    #[error("incorrect pin")]
    BadPin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("transfer amount must be positive")]
    InvalidAmount,

    #[error("no recipient with that username")]
    UnknownRecipient,

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("cannot transfer to the same account")]
    SelfTransfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoanError {
    #[error("loan amount must be positive")]
    InvalidAmount,

    #[error("no deposit large enough to back this loan")]
    NotEligible,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("ingestion failed with: {0}")]
    Ingestion(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Loan(#[from] LoanError),

    #[error("no account is logged in")]
    NotLoggedIn,

    #[error("duplicate username '{0}' in seed accounts")]
    DuplicateUsername(String),
}
