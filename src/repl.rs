//! Interactive command loop.
//!
//! Each input line is one command. `call <path>` passes straight through to
//! a private call; the other commands map to [`Updater`] actions. A failing
//! action prints its error and the loop carries on.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::CoinSpotError;
use crate::rest::CoinSpotApi;
use crate::sheets::SpreadsheetService;
use crate::updater::Updater;

/// Word, argument hint and description of every command, in help order.
pub const COMMANDS: &[(&str, &str, &str)] = &[
    ("g", "", "Show total gains as a percent of spent"),
    ("sum", "", "Show summary status of all holdings"),
    ("up", "", "Update Google Spreadsheet"),
    ("bal", "", "Show balances of all coins"),
    ("all", "", "Show balances and summary"),
    ("hist", "", "Append the current total to the history sheet"),
    ("price", "<coin>", "Show latest prices of a coin"),
    ("call", "<path>", "Call a read-only endpoint, e.g. call my/balances"),
    ("help", "", "Show help"),
    ("q", "", "Quit"),
];

const PROMPT: &str = "# ";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line
    Empty,
    /// `g`: gain percent from the sheet
    Gain,
    /// `sum`: spent, value and gain from the sheet
    Status,
    /// `up`: write the current total to the sheet
    Update,
    /// `bal`: every coin balance and the total
    Balances,
    /// `all`: status then balances
    All,
    /// `hist`: append a history row
    History,
    /// `price <coin>`: latest prices of one coin
    Price(String),
    /// `call <path>`: raw read-only private call
    Call(String),
    /// `help`: list commands
    Help,
    /// `q`: leave the loop
    Quit,
    /// Anything else, including a command missing its argument
    Unknown(String),
}

impl Command {
    /// Parse one input line.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match (word, rest) {
            ("", _) => Self::Empty,
            ("g", "") => Self::Gain,
            ("sum", "") => Self::Status,
            ("up", "") => Self::Update,
            ("bal", "") => Self::Balances,
            ("all", "") => Self::All,
            ("hist", "") => Self::History,
            ("help", "") => Self::Help,
            ("q", "") => Self::Quit,
            ("price", coin) if !coin.is_empty() => Self::Price(coin.to_string()),
            ("call", path) if !path.is_empty() => Self::Call(path.to_string()),
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// Help text listing every command.
pub fn help_text() -> String {
    COMMANDS
        .iter()
        .map(|(word, args, description)| {
            let usage = if args.is_empty() {
                (*word).to_string()
            } else {
                format!("{word} {args}")
            };
            format!("{usage:>13}  {description}\n")
        })
        .collect()
}

/// The REPL over an [`Updater`].
#[derive(Debug)]
pub struct Repl<C, S> {
    updater: Updater<C, S>,
}

impl<C, S> Repl<C, S>
where
    C: CoinSpotApi,
    S: SpreadsheetService,
{
    /// Create a new REPL.
    pub fn new(updater: Updater<C, S>) -> Self {
        Self { updater }
    }

    /// Read commands from `input` until `q` or end of input.
    pub async fn run<R, W>(&self, input: R, output: &mut W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        output.write_all(help_text().as_bytes()).await?;
        output.write_all(b"\n").await?;

        let mut lines = input.lines();
        loop {
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let command = Command::parse(&line);
            if command == Command::Quit {
                break;
            }

            let text = match self.execute(&command).await {
                Ok(text) => text,
                Err(err) => {
                    tracing::debug!(?command, error = %err, "command failed");
                    format!("Error: {err}\n")
                }
            };
            output.write_all(text.as_bytes()).await?;
        }

        output.flush().await
    }

    /// Run one command and render its output.
    pub async fn execute(&self, command: &Command) -> Result<String, CoinSpotError> {
        let text = match command {
            Command::Empty | Command::Quit => String::new(),
            Command::Help => help_text(),
            Command::Unknown(_) => "Type 'help' for a list of commands.\n".to_string(),
            Command::Gain => match self.updater.gain_percent().await? {
                Some(gain) => format!("Gain {}\n", gain.round_dp(2).normalize()),
                None => "Gain n/a\n".to_string(),
            },
            Command::Status => format!("{}\n", self.updater.status().await?),
            Command::Update => format!("{}\n", self.updater.update_spreadsheet().await?),
            Command::Balances => self.balances_text().await?,
            Command::All => {
                let status = self.updater.status().await?;
                format!("{status}\n{}", self.balances_text().await?)
            }
            Command::History => format!("Appended {}\n", self.updater.record_history().await?),
            Command::Price(coin) => {
                let price = self.updater.price(coin).await?;
                let show = |v: Option<rust_decimal::Decimal>| {
                    v.map_or_else(|| "n/a".to_string(), |v| v.to_string())
                };
                format!(
                    "{}: bid {} ask {} last {}\n",
                    coin.to_ascii_uppercase(),
                    show(price.bid),
                    show(price.ask),
                    show(price.last)
                )
            }
            Command::Call(path) => format!("{}\n", self.updater.call(path).await?),
        };
        Ok(text)
    }

    async fn balances_text(&self) -> Result<String, CoinSpotError> {
        let balances = self.updater.balances().await?;
        Ok(format!("{balances}TOTAL: ${:.2} AUD\n", balances.total()))
    }
}
