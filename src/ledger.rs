use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    Account, AccountSet, AuthError, Error, LoanError, Summary, TransferError,
};

/// Simulated processing time before an approved loan lands on the account.
pub const LOAN_PROCESSING_DELAY: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone)]
struct PendingLoan {
    username: String,
    amount: Decimal,
    due: DateTime<Utc>,
}

/// Owns the account set, the single authenticated session and the queue of
/// approved-but-not-yet-applied loans. Every operation validates fully
/// before mutating; failures never leave partial state behind.
#[derive(Debug)]
pub struct LedgerEngine {
    accounts: AccountSet,
    session: Option<String>,
    pending_loans: Vec<PendingLoan>,
}

impl LedgerEngine {
    pub fn new(accounts: AccountSet) -> Self {
        Self {
            accounts,
            session: None,
            pending_loans: Vec::new(),
        }
    }

    pub fn accounts(&self) -> &AccountSet {
        &self.accounts
    }

    pub fn current_account(&self) -> Option<&Account> {
        self.session.as_deref().and_then(|u| self.accounts.get(u))
    }

    fn session_username(&self) -> Result<String, Error> {
        self.session.clone().ok_or(Error::NotLoggedIn)
    }

    pub fn login(&mut self, username: &str, pin: u32) -> Result<(), AuthError> {
        match self.accounts.get(username) {
            None => Err(AuthError::NotFound),
            Some(account) if !account.pin_matches(pin) => {
                tracing::warn!(username, "login rejected");
                Err(AuthError::BadPin)
            }
            Some(_) => {
                self.session = Some(username.to_owned());
                tracing::info!(username, "logged in");
                Ok(())
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(username) = self.session.take() {
            tracing::info!(%username, "logged out");
        }
    }

    /// Balance of the logged-in account, recomputed from its movements.
    pub fn balance(&mut self) -> Result<Decimal, Error> {
        let username = self.session_username()?;
        let account = self.accounts.get_mut(&username).ok_or(Error::NotLoggedIn)?;
        Ok(account.balance())
    }

    pub fn summary(&self) -> Result<Summary, Error> {
        let account = self.current_account().ok_or(Error::NotLoggedIn)?;
        Ok(account.summary())
    }

    /// Movement rows of the logged-in account as (display index, amount,
    /// timestamp), ascending by amount when `sorted`.
    pub fn statement(
        &self,
        sorted: bool,
    ) -> Result<Vec<(usize, Decimal, DateTime<Utc>)>, Error> {
        let account = self.current_account().ok_or(Error::NotLoggedIn)?;
        let mut rows: Vec<_> = account.entries().collect();
        if sorted {
            rows.sort_by(|a, b| a.0.cmp(&b.0));
        }
        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(i, (amount, date))| (i + 1, amount, date))
            .collect())
    }

    pub fn transfer(&mut self, to: &str, amount: Decimal) -> Result<(), Error> {
        let from = self.session_username()?;
        if amount <= Decimal::ZERO {
            return Err(TransferError::InvalidAmount.into());
        }
        if !self.accounts.contains(to) {
            return Err(TransferError::UnknownRecipient.into());
        }
        let balance = self
            .accounts
            .get_mut(&from)
            .ok_or(Error::NotLoggedIn)?
            .balance();
        if amount > balance {
            return Err(TransferError::InsufficientFunds.into());
        }
        if to == from {
            return Err(TransferError::SelfTransfer.into());
        }

        // Validation is complete; debit and credit are applied as one step,
        // each side with its own timestamp.
        let (source, target) = self
            .accounts
            .pair_mut(&from, to)
            .ok_or(TransferError::UnknownRecipient)?;
        source.record_movement(-amount, Utc::now());
        target.record_movement(amount, Utc::now());
        tracing::info!(from = %from, to, amount = %amount, "transfer applied");
        Ok(())
    }

    /// Approves a loan if any past deposit covers 10% of the requested
    /// amount (floored to a whole figure first) and queues it for deferred
    /// processing. Nothing is queued on rejection.
    pub fn request_loan(&mut self, amount: Decimal) -> Result<(), Error> {
        let username = self.session_username()?;
        let amount = amount.floor();
        if amount <= Decimal::ZERO {
            return Err(LoanError::InvalidAmount.into());
        }
        let account = self.accounts.get(&username).ok_or(Error::NotLoggedIn)?;
        let threshold = amount / Decimal::from(10);
        let eligible = account
            .movements()
            .iter()
            .any(|m| *m > Decimal::ZERO && *m >= threshold);
        if !eligible {
            tracing::warn!(%username, amount = %amount, "loan rejected");
            return Err(LoanError::NotEligible.into());
        }

        let due = Utc::now() + LOAN_PROCESSING_DELAY;
        tracing::info!(%username, amount = %amount, %due, "loan approved");
        self.pending_loans.push(PendingLoan {
            username,
            amount,
            due,
        });
        Ok(())
    }

    /// Applies every pending loan whose due time has passed. A loan whose
    /// account was closed in the meantime is dropped, never applied to a
    /// nonexistent account. Returns how many loans were applied.
    pub fn process_due_loans(&mut self, now: DateTime<Utc>) -> usize {
        let mut applied = 0;
        let pending = std::mem::take(&mut self.pending_loans);
        for loan in pending {
            if loan.due > now {
                self.pending_loans.push(loan);
                continue;
            }
            match self.accounts.get_mut(&loan.username) {
                Some(account) => {
                    account.record_movement(loan.amount, now);
                    tracing::info!(username = %loan.username, amount = %loan.amount, "loan credited");
                    applied += 1;
                }
                None => {
                    tracing::warn!(username = %loan.username, "dropping loan for closed account");
                }
            }
        }
        applied
    }

    pub fn next_loan_due(&self) -> Option<DateTime<Utc>> {
        self.pending_loans.iter().map(|loan| loan.due).min()
    }

    /// Re-authenticates against the logged-in account itself: a confirmation
    /// username naming any other account fails, even a valid one.
    pub fn close_account(&mut self, confirm_username: &str, confirm_pin: u32) -> Result<(), Error> {
        let username = self.session_username()?;
        if confirm_username != username {
            return Err(AuthError::NotFound.into());
        }
        let account = self.accounts.get(&username).ok_or(Error::NotLoggedIn)?;
        if !account.pin_matches(confirm_pin) {
            return Err(AuthError::BadPin.into());
        }

        self.accounts.remove(&username);
        self.session = None;
        tracing::info!(%username, "account closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn engine() -> LedgerEngine {
        let mut jonas = Account::new("Jonas Schmedtmann", dec!(1.2), 1111, "EUR", "pt-PT");
        for amount in [dec!(200), dec!(450), dec!(-400), dec!(300)] {
            jonas.record_movement(amount, Utc::now());
        }
        let mut jessica = Account::new("Jessica Davis", dec!(1.5), 2222, "USD", "en-US");
        jessica.record_movement(dec!(100), Utc::now());

        let accounts = AccountSet::from_accounts(vec![jonas, jessica])
            .expect("seed usernames are unique");
        LedgerEngine::new(accounts)
    }

    #[test]
    fn login_establishes_session() {
        let mut engine = engine();
        assert!(engine.login("js", 1111).is_ok());
        assert_eq!(engine.current_account().map(|a| a.username()), Some("js"));
    }

    #[test]
    fn login_rejects_wrong_pin_and_unknown_user() {
        let mut engine = engine();
        assert_eq!(engine.login("js", 9999), Err(AuthError::BadPin));
        assert_eq!(engine.login("zz", 1111), Err(AuthError::NotFound));
        assert!(engine.current_account().is_none());
    }

    #[test]
    fn transfer_debits_and_credits_with_aligned_dates() {
        let mut engine = engine();
        engine.login("js", 1111).unwrap();
        engine.transfer("jd", dec!(50)).unwrap();

        let jonas = engine.accounts().get("js").unwrap();
        let jessica = engine.accounts().get("jd").unwrap();
        assert_eq!(*jonas.movements().last().unwrap(), dec!(-50));
        assert_eq!(*jessica.movements().last().unwrap(), dec!(50));
        assert_eq!(jonas.movements().len(), jonas.movement_dates().len());
        assert_eq!(jessica.movements().len(), jessica.movement_dates().len());
        assert_eq!(engine.balance().unwrap(), dec!(500));
    }

    #[test]
    fn transfer_rejects_insufficient_funds_without_mutation() {
        let mut engine = engine();
        engine.login("jd", 2222).unwrap(); // balance 100
        let result = engine.transfer("js", dec!(150));
        assert!(matches!(
            result,
            Err(Error::Transfer(TransferError::InsufficientFunds))
        ));
        assert_eq!(engine.accounts().get("jd").unwrap().movements().len(), 1);
        assert_eq!(engine.accounts().get("js").unwrap().movements().len(), 4);
    }

    #[test]
    fn transfer_rejects_self_transfer() {
        let mut engine = engine();
        engine.login("js", 1111).unwrap();
        let result = engine.transfer("js", dec!(10));
        assert!(matches!(
            result,
            Err(Error::Transfer(TransferError::SelfTransfer))
        ));
        assert_eq!(engine.accounts().get("js").unwrap().movements().len(), 4);
    }

    #[test]
    fn transfer_rejects_nonpositive_amount_and_unknown_recipient() {
        let mut engine = engine();
        engine.login("js", 1111).unwrap();
        assert!(matches!(
            engine.transfer("jd", dec!(0)),
            Err(Error::Transfer(TransferError::InvalidAmount))
        ));
        assert!(matches!(
            engine.transfer("zz", dec!(10)),
            Err(Error::Transfer(TransferError::UnknownRecipient))
        ));
    }

    #[test]
    fn operations_require_a_session() {
        let mut engine = engine();
        assert!(matches!(
            engine.transfer("jd", dec!(10)),
            Err(Error::NotLoggedIn)
        ));
        assert!(matches!(
            engine.request_loan(dec!(10)),
            Err(Error::NotLoggedIn)
        ));
        assert!(matches!(engine.balance(), Err(Error::NotLoggedIn)));
    }

    #[test]
    fn loan_is_floored_queued_and_applied_after_the_delay() {
        let mut engine = engine();
        engine.login("js", 1111).unwrap(); // largest deposit 450
        engine.request_loan(dec!(4000.9)).unwrap(); // floors to 4000, 10% = 400

        // Not due yet.
        assert_eq!(engine.process_due_loans(Utc::now()), 0);
        assert_eq!(engine.balance().unwrap(), dec!(550));

        let later = Utc::now() + LOAN_PROCESSING_DELAY;
        assert_eq!(engine.process_due_loans(later), 1);
        assert_eq!(engine.balance().unwrap(), dec!(4550));
        let jonas = engine.accounts().get("js").unwrap();
        assert_eq!(jonas.movements().len(), jonas.movement_dates().len());
    }

    #[test]
    fn loan_rejects_when_no_deposit_covers_ten_percent() {
        let mut engine = engine();
        engine.login("jd", 2222).unwrap(); // largest deposit 100
        let result = engine.request_loan(dec!(2000));
        assert!(matches!(result, Err(Error::Loan(LoanError::NotEligible))));
        assert_eq!(engine.next_loan_due(), None);
    }

    #[test]
    fn loan_rejects_nonpositive_amount() {
        let mut engine = engine();
        engine.login("js", 1111).unwrap();
        assert!(matches!(
            engine.request_loan(dec!(0.7)), // floors to 0
            Err(Error::Loan(LoanError::InvalidAmount))
        ));
    }

    #[test]
    fn pending_loan_for_a_closed_account_is_dropped() {
        let mut engine = engine();
        engine.login("js", 1111).unwrap();
        engine.request_loan(dec!(1000)).unwrap();
        engine.close_account("js", 1111).unwrap();

        let later = Utc::now() + LOAN_PROCESSING_DELAY;
        assert_eq!(engine.process_due_loans(later), 0);
        assert_eq!(engine.next_loan_due(), None);
    }

    #[test]
    fn close_rejects_wrong_pin_and_keeps_the_account() {
        let mut engine = engine();
        engine.login("js", 1111).unwrap();
        let before = engine.accounts().len();
        let result = engine.close_account("js", 9999);
        assert!(matches!(result, Err(Error::Auth(AuthError::BadPin))));
        assert_eq!(engine.accounts().len(), before);
        assert!(engine.current_account().is_some());
    }

    #[test]
    fn close_only_accepts_the_sessions_own_username() {
        let mut engine = engine();
        engine.login("js", 1111).unwrap();
        // jd/2222 is a valid credential pair, just not this session's.
        let result = engine.close_account("jd", 2222);
        assert!(matches!(result, Err(Error::Auth(AuthError::NotFound))));
        assert_eq!(engine.accounts().len(), 2);
    }

    #[test]
    fn close_removes_the_account_and_ends_the_session() {
        let mut engine = engine();
        engine.login("js", 1111).unwrap();
        engine.close_account("js", 1111).unwrap();
        assert!(engine.current_account().is_none());
        assert!(!engine.accounts().contains("js"));
        assert_eq!(engine.accounts().len(), 1);
    }

    #[test]
    fn statement_sorts_ascending_on_request() {
        let mut engine = engine();
        engine.login("js", 1111).unwrap();
        let rows = engine.statement(true).unwrap();
        let amounts: Vec<_> = rows.iter().map(|(_, amount, _)| *amount).collect();
        assert_eq!(amounts, vec![dec!(-400), dec!(200), dec!(300), dec!(450)]);
        // Display indices follow the sorted order.
        assert_eq!(rows[0].0, 1);
        assert_eq!(rows[3].0, 4);
    }
}
