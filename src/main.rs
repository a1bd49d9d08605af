mod domain;
mod ingestion;
mod ledger;
mod rejections;
mod seed;
mod teller;

use std::{env, fs::File, path::Path};

use chrono::Utc;

use crate::domain::AccountSet;
use crate::domain::format::BasicLocaleFormatter;
use crate::ledger::LedgerEngine;
use crate::rejections::StdErrRejections;
use crate::teller::Teller;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout is the rendered account views.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let mut args = env::args();
    let script_path = args.nth(1).ok_or("usage: bankist_engine <commands.csv>")?;
    let file = File::open(Path::new(&script_path))?;

    let accounts = AccountSet::from_accounts(seed::seed_accounts(Utc::now()))?;
    let ledger = LedgerEngine::new(accounts);
    let commands = ingestion::CsvCommands::new(file)?;

    let mut teller = Teller::new(
        commands,
        StdErrRejections::default(),
        BasicLocaleFormatter,
        ledger,
    );
    teller.process().await?;

    Ok(())
}
