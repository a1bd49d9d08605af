use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;

use crate::domain::Account;

/// The fixed demo accounts, rebuilt on every run. Movement dates are offsets
/// from `now` so the most recent entries exercise the Today/Yesterday labels.
pub fn seed_accounts(now: DateTime<Utc>) -> Vec<Account> {
    vec![
        account(
            "Jonas Schmedtmann",
            Decimal::new(12, 1),
            1111,
            "EUR",
            "pt-PT",
            now,
            &[
                (Decimal::from(200), 240),
                (Decimal::new(45523, 2), 180),
                (Decimal::new(-3065, 1), 120),
                (Decimal::from(25000), 60),
                (Decimal::new(-64221, 2), 30),
                (Decimal::new(-1339, 1), 10),
                (Decimal::new(7997, 2), 1),
                (Decimal::from(1300), 0),
            ],
        ),
        account(
            "Jessica Davis",
            Decimal::new(15, 1),
            2222,
            "USD",
            "en-US",
            now,
            &[
                (Decimal::from(5000), 300),
                (Decimal::from(3400), 250),
                (Decimal::from(-150), 200),
                (Decimal::from(-790), 150),
                (Decimal::from(-3210), 100),
                (Decimal::from(-1000), 50),
                (Decimal::from(8500), 7),
                (Decimal::from(-30), 2),
            ],
        ),
        account(
            "Steven Thomas Williams",
            Decimal::new(7, 1),
            3333,
            "GBP",
            "en-GB",
            now,
            &[
                (Decimal::from(200), 400),
                (Decimal::from(-200), 350),
                (Decimal::from(340), 300),
                (Decimal::from(-300), 250),
                (Decimal::from(-20), 200),
                (Decimal::from(50), 150),
                (Decimal::from(400), 100),
                (Decimal::from(-460), 50),
            ],
        ),
        account(
            "Sarah Smith",
            Decimal::ONE,
            4444,
            "EUR",
            "de-DE",
            now,
            &[
                (Decimal::from(430), 90),
                (Decimal::from(1000), 70),
                (Decimal::from(700), 45),
                (Decimal::from(50), 20),
                (Decimal::from(90), 3),
            ],
        ),
    ]
}

fn account(
    owner: &str,
    interest_rate: Decimal,
    pin: u32,
    currency: &str,
    locale: &str,
    now: DateTime<Utc>,
    movements: &[(Decimal, i64)],
) -> Account {
    let mut account = Account::new(owner, interest_rate, pin, currency, locale);
    for (amount, days_ago) in movements {
        account.record_movement(*amount, now - TimeDelta::days(*days_ago));
    }
    account
}
