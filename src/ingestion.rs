use std::io::Read;
use std::pin::Pin;

use futures::stream::{self, Stream};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::traits::CommandStream;
use crate::domain::{Command, Error};

pub struct CsvCommands<R: Read> {
    reader: Option<csv::Reader<R>>,
}

impl<R: Read> CsvCommands<R> {
    pub fn new(reader: R) -> Result<Self, Error> {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        Ok(Self { reader: Some(rdr) })
    }
}

/// Internal shape used only for CSV deserialization. This is the raw form
/// input; `TryFrom` below is the typed-parse boundary, so the engine only
/// ever sees well-formed commands.
#[derive(Debug, Deserialize)]
struct CsvRow {
    action: String,
    user: Option<String>,
    pin: Option<u32>,
    to: Option<String>,
    amount: Option<Decimal>,
}

impl TryFrom<CsvRow> for Command {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self, Self::Error> {
        let action = row.action.trim().to_ascii_lowercase();
        match action.as_str() {
            "login" => match (row.user, row.pin) {
                (Some(username), Some(pin)) => Ok(Command::Login { username, pin }),
                _ => Err(Error::Ingestion("login needs user and pin".to_owned())),
            },
            "logout" => Ok(Command::Logout),
            "transfer" => match (row.to, row.amount) {
                (Some(to), Some(amount)) => Ok(Command::Transfer { to, amount }),
                _ => Err(Error::Ingestion(
                    "transfer needs a recipient and an amount".to_owned(),
                )),
            },
            "loan" => match row.amount {
                Some(amount) => Ok(Command::RequestLoan { amount }),
                None => Err(Error::Ingestion("loan needs an amount".to_owned())),
            },
            "close" => match (row.user, row.pin) {
                (Some(username), Some(pin)) => Ok(Command::CloseAccount { username, pin }),
                _ => Err(Error::Ingestion("close needs user and pin".to_owned())),
            },
            "sort" => Ok(Command::ToggleSort),
            "statement" => Ok(Command::Statement),
            "summary" => Ok(Command::Summary),
            "balance" => Ok(Command::Balance),
            other => Err(Error::Ingestion(format!("invalid action: {}", other))),
        }
    }
}

impl<R: Read + Send + 'static> CommandStream for CsvCommands<R> {
    type Commands = Pin<Box<dyn Stream<Item = Result<Command, Error>> + Send>>;

    fn stream(&mut self) -> Self::Commands {
        // Take ownership of the reader so the iterator we build owns all data and is 'static.
        let reader = match self.reader.take() {
            Some(r) => r,
            None => {
                // Already consumed; return an empty stream.
                return Box::pin(stream::iter(Vec::<Result<Command, Error>>::new()));
            }
        };

        let iter = reader
            .into_deserialize::<CsvRow>()
            .map(|row_res| match row_res {
                Ok(row) => Command::try_from(row),
                Err(e) => Err(Error::Ingestion(format!(
                    "CSV deserialization error: {}",
                    e
                ))),
            });

        Box::pin(stream::iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use rust_decimal_macros::dec;

    async fn parse(script: &str) -> Vec<Result<Command, Error>> {
        let mut commands =
            CsvCommands::new(std::io::Cursor::new(script.as_bytes().to_vec())).expect("reader");
        commands.stream().collect().await
    }

    #[tokio::test]
    async fn parses_a_session_script() {
        let script = "action,user,pin,to,amount\n\
            login,js,1111,,\n\
            transfer,,,jd,50.5\n\
            loan,,,,2000\n\
            logout,,,,";
        let commands = parse(script).await;
        assert_eq!(commands.len(), 4);
        assert!(matches!(
            &commands[0],
            Ok(Command::Login { username, pin: 1111 }) if username == "js"
        ));
        assert!(matches!(
            &commands[1],
            Ok(Command::Transfer { to, amount }) if to == "jd" && *amount == dec!(50.5)
        ));
        assert!(matches!(
            &commands[2],
            Ok(Command::RequestLoan { amount }) if *amount == dec!(2000)
        ));
        assert!(matches!(&commands[3], Ok(Command::Logout)));
    }

    #[tokio::test]
    async fn malformed_rows_become_errors_not_panics() {
        let script = "action,user,pin,to,amount\n\
            frobnicate,,,,\n\
            login,js,not-a-pin,,\n\
            transfer,,,jd,";
        let commands = parse(script).await;
        assert_eq!(commands.len(), 3);
        assert!(commands.iter().all(|c| c.is_err()));
    }
}
