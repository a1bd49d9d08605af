use chrono::Utc;
use futures::StreamExt;
use rust_decimal::Decimal;

use crate::domain::format::relative_day_label;
use crate::domain::{Command, CommandStream, Error, LocaleFormatter, RejectionSink};
use crate::ledger::LedgerEngine;

/// Drives the ledger from a command stream, standing in for the original
/// browser UI: applies each command, re-renders the logged-in account after
/// successful mutations and routes every rejection to the sink.
#[derive(Debug)]
pub struct Teller<I, D, F>
where
    I: CommandStream,
    D: RejectionSink,
    F: LocaleFormatter,
{
    commands: I,
    rejections: D,
    formatter: F,
    ledger: LedgerEngine,
    sorted: bool,
}

impl<I, D, F> Teller<I, D, F>
where
    I: CommandStream,
    D: RejectionSink,
    F: LocaleFormatter,
{
    pub fn new(commands: I, rejections: D, formatter: F, ledger: LedgerEngine) -> Self {
        Self {
            commands,
            rejections,
            formatter,
            ledger,
            sorted: false,
        }
    }

    pub async fn process(&mut self) -> Result<(), Error> {
        let mut commands = self.commands.stream();

        while let Some(command) = commands.next().await {
            if let Err(e) = self.settle_due_loans() {
                self.rejections.report(&e);
            }
            match command {
                Ok(command) => {
                    if let Err(e) = self.apply(command) {
                        self.rejections.report(&e);
                    }
                }
                Err(e) => self.rejections.report(&e),
            }
        }

        self.drain_pending_loans().await
    }

    fn apply(&mut self, command: Command) -> Result<(), Error> {
        tracing::debug!(%command, "applying command");
        match command {
            Command::Login { username, pin } => {
                self.ledger.login(&username, pin)?;
                self.print_welcome();
                self.render_account()?;
            }
            Command::Logout => self.ledger.logout(),
            Command::Transfer { to, amount } => {
                self.ledger.transfer(&to, amount)?;
                self.render_account()?;
            }
            Command::RequestLoan { amount } => {
                self.ledger.request_loan(amount)?;
                println!("Loan approved, processing...");
            }
            Command::CloseAccount { username, pin } => {
                self.ledger.close_account(&username, pin)?;
                println!("Account closed");
            }
            Command::ToggleSort => {
                self.sorted = !self.sorted;
                self.render_statement()?;
            }
            Command::Statement => self.render_statement()?,
            Command::Summary => self.render_summary()?,
            Command::Balance => self.render_balance()?,
        }
        Ok(())
    }

    /// Loans whose processing delay elapsed while earlier commands ran.
    fn settle_due_loans(&mut self) -> Result<(), Error> {
        let applied = self.ledger.process_due_loans(Utc::now());
        if applied > 0 && self.ledger.current_account().is_some() {
            self.render_account()?;
        }
        Ok(())
    }

    /// After the script ends, waits out the remaining loan delays so no
    /// approved loan is lost on shutdown.
    async fn drain_pending_loans(&mut self) -> Result<(), Error> {
        while let Some(due) = self.ledger.next_loan_due() {
            let wait = (due - Utc::now()).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;
            self.settle_due_loans()?;
        }
        Ok(())
    }

    fn print_welcome(&self) {
        if let Some(account) = self.ledger.current_account() {
            println!("Welcome back, {}!", account.first_name());
        }
    }

    fn render_account(&mut self) -> Result<(), Error> {
        self.render_statement()?;
        self.render_balance()?;
        self.render_summary()
    }

    fn render_statement(&self) -> Result<(), Error> {
        let account = self.ledger.current_account().ok_or(Error::NotLoggedIn)?;
        let now = Utc::now();
        for (index, amount, date) in self.ledger.statement(self.sorted)? {
            let kind = if amount > Decimal::ZERO {
                "deposit"
            } else {
                "withdrawal"
            };
            let when = relative_day_label(date, now, &account.locale, &self.formatter);
            let value = self
                .formatter
                .currency(amount, &account.locale, &account.currency);
            println!("{index} {kind}  {when}  {value}");
        }
        Ok(())
    }

    fn render_balance(&mut self) -> Result<(), Error> {
        let balance = self.ledger.balance()?;
        let account = self.ledger.current_account().ok_or(Error::NotLoggedIn)?;
        let value = self
            .formatter
            .currency(balance, &account.locale, &account.currency);
        println!("Balance: {value}");
        Ok(())
    }

    fn render_summary(&self) -> Result<(), Error> {
        let account = self.ledger.current_account().ok_or(Error::NotLoggedIn)?;
        let summary = self.ledger.summary()?;
        let fmt = |amount| {
            self.formatter
                .currency(amount, &account.locale, &account.currency)
        };
        println!(
            "In: {}  Out: {}  Interest: {}",
            fmt(summary.incomes),
            fmt(summary.expenses),
            fmt(summary.interest)
        );
        Ok(())
    }
}
