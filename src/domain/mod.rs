pub mod account;
pub mod command;
pub mod error;
pub mod format;
pub mod traits;

pub use account::{Account, AccountSet, Summary, derive_username};
pub use command::Command;
pub use error::{AuthError, Error, LoanError, TransferError};
pub use traits::{CommandStream, LocaleFormatter, RejectionSink};
