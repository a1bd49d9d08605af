use rust_decimal::Decimal;

/// One user action, already parsed and typed at the ingestion boundary.
#[derive(Debug, Clone)]
pub enum Command {
    Login { username: String, pin: u32 },
    Logout,
    Transfer { to: String, amount: Decimal },
    RequestLoan { amount: Decimal },
    CloseAccount { username: String, pin: u32 },
    ToggleSort,
    Statement,
    Summary,
    Balance,
}

impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Command::Login { username, .. } => write!(f, "login,user={username}"),
            Command::Logout => write!(f, "logout"),
            Command::Transfer { to, amount } => write!(f, "transfer,to={to},amount={amount}"),
            Command::RequestLoan { amount } => write!(f, "loan,amount={amount}"),
            Command::CloseAccount { username, .. } => write!(f, "close,user={username}"),
            Command::ToggleSort => write!(f, "sort"),
            Command::Statement => write!(f, "statement"),
            Command::Summary => write!(f, "summary"),
            Command::Balance => write!(f, "balance"),
        }
    }
}
