use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::Error;

/// Lowercase initials of each whitespace-separated word in the owner's name,
/// e.g. "Jessica Davis" -> "jd". An empty owner yields an empty string.
pub fn derive_username(owner: &str) -> String {
    owner
        .to_lowercase()
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

#[derive(Debug, Clone)]
pub struct Account {
    pub owner: String,
    username: String,
    movements: Vec<Decimal>,
    movement_dates: Vec<DateTime<Utc>>,
    pub interest_rate: Decimal, // percent applied per deposit
    pin: u32,
    pub currency: String,
    pub locale: String,
    balance: Decimal, // cache; movements is the source of truth
}

/// Aggregated incomes, expenses and eligible interest for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub incomes: Decimal,
    pub expenses: Decimal,
    pub interest: Decimal,
}

impl Account {
    pub fn new(owner: &str, interest_rate: Decimal, pin: u32, currency: &str, locale: &str) -> Self {
        Self {
            owner: owner.to_owned(),
            username: derive_username(owner),
            movements: Vec::new(),
            movement_dates: Vec::new(),
            interest_rate,
            pin,
            currency: currency.to_owned(),
            locale: locale.to_owned(),
            balance: Decimal::ZERO,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn first_name(&self) -> &str {
        self.owner.split_whitespace().next().unwrap_or(&self.owner)
    }

    pub fn pin_matches(&self, pin: u32) -> bool {
        self.pin == pin
    }

    /// The only mutation path: appends the amount and its timestamp together,
    /// keeping movements and movement_dates index-aligned.
    pub fn record_movement(&mut self, amount: Decimal, at: DateTime<Utc>) {
        self.movements.push(amount);
        self.movement_dates.push(at);
        self.balance = self.movements.iter().sum();
    }

    pub fn movements(&self) -> &[Decimal] {
        &self.movements
    }

    pub fn movement_dates(&self) -> &[DateTime<Utc>] {
        &self.movement_dates
    }

    pub fn entries(&self) -> impl Iterator<Item = (Decimal, DateTime<Utc>)> + '_ {
        self.movements
            .iter()
            .copied()
            .zip(self.movement_dates.iter().copied())
    }

    /// Recomputes the balance from the movements and refreshes the cache.
    pub fn balance(&mut self) -> Decimal {
        self.balance = self.movements.iter().sum();
        self.balance
    }

    pub fn summary(&self) -> Summary {
        let incomes = self
            .movements
            .iter()
            .filter(|m| m.is_sign_positive() && !m.is_zero())
            .sum();

        let expenses: Decimal = self
            .movements
            .iter()
            .filter(|m| m.is_sign_negative())
            .sum();

        // Interest is earned per deposit; a contribution below 1.0 is
        // discarded before summing, not rounded into the total.
        let interest = self
            .movements
            .iter()
            .filter(|m| m.is_sign_positive() && !m.is_zero())
            .map(|deposit| deposit * self.interest_rate / Decimal::from(100))
            .filter(|earned| *earned >= Decimal::ONE)
            .sum();

        Summary {
            incomes,
            expenses: expenses.abs(),
            interest,
        }
    }
}

/// All accounts, keyed by derived username.
#[derive(Debug, Default)]
pub struct AccountSet {
    accounts: HashMap<String, Account>,
}

impl AccountSet {
    /// Builds the set from the seed list. Two owners whose names collapse to
    /// the same initials would silently shadow each other, so collisions are
    /// rejected up front.
    pub fn from_accounts(accounts: Vec<Account>) -> Result<Self, Error> {
        let mut map = HashMap::new();
        for account in accounts {
            match map.entry(account.username().to_owned()) {
                Entry::Vacant(e) => {
                    e.insert(account);
                }
                Entry::Occupied(e) => {
                    return Err(Error::DuplicateUsername(e.key().clone()));
                }
            }
        }
        Ok(Self { accounts: map })
    }

    pub fn get(&self, username: &str) -> Option<&Account> {
        self.accounts.get(username)
    }

    pub fn get_mut(&mut self, username: &str) -> Option<&mut Account> {
        self.accounts.get_mut(username)
    }

    /// Both accounts mutably at once, for the debit+credit step of a
    /// transfer. Returns None if the usernames are equal or either is absent.
    pub fn pair_mut(&mut self, a: &str, b: &str) -> Option<(&mut Account, &mut Account)> {
        if a == b {
            return None;
        }
        match self.accounts.get_disjoint_mut([a, b]) {
            [Some(x), Some(y)] => Some((x, y)),
            _ => None,
        }
    }

    pub fn contains(&self, username: &str) -> bool {
        self.accounts.contains_key(username)
    }

    pub fn remove(&mut self, username: &str) -> Option<Account> {
        self.accounts.remove(username)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
