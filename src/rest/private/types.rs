//! Types for private REST API endpoints.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;

/// The fiat currency balances are valued in. Excluded from portfolio totals.
pub const FIAT: &str = "AUD";

// ========== Balances ==========

/// Response of `/api/ro/my/balances`.
///
/// CoinSpot returns each holding as a single-entry object, e.g.
/// `[{"BTC": {...}}, {"ETH": {...}}]`.
#[derive(Debug, Clone, Deserialize)]
pub struct Balances {
    /// `"ok"` on success
    pub status: String,
    /// One map per holding, keyed by coin symbol
    #[serde(default)]
    pub balances: Vec<BTreeMap<String, Holding>>,
}

impl Balances {
    /// Iterate over every `(coin, holding)` pair in response order.
    pub fn holdings(&self) -> impl Iterator<Item = (&str, &Holding)> {
        self.balances
            .iter()
            .flat_map(|entry| entry.iter().map(|(coin, holding)| (coin.as_str(), holding)))
    }

    /// Total AUD value of every holding except AUD itself.
    pub fn total(&self) -> Decimal {
        self.holdings()
            .filter(|(coin, _)| *coin != FIAT)
            .map(|(_, holding)| holding.audbalance)
            .sum()
    }

    /// Find one coin's holding.
    pub fn get(&self, coin: &str) -> Option<&Holding> {
        self.holdings()
            .find(|(symbol, _)| symbol.eq_ignore_ascii_case(coin))
            .map(|(_, holding)| holding)
    }
}

impl fmt::Display for Balances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (coin, holding) in self.holdings() {
            writeln!(f, "{coin:>5}: {holding}")?;
        }
        Ok(())
    }
}

/// A single coin holding.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Holding {
    /// Amount of the coin held
    #[serde(default)]
    pub balance: Decimal,
    /// Value of the holding in AUD
    #[serde(default)]
    pub audbalance: Decimal,
    /// AUD rate used for the valuation
    #[serde(default)]
    pub rate: Decimal,
}

impl fmt::Display for Holding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let balance = self.balance.round_dp(6).normalize().to_string();
        let rate = format!("${}", self.rate.round_dp(2));
        write!(
            f,
            "{balance:>8} x {rate:>10} = ${} {FIAT}",
            self.audbalance.round_dp(2)
        )
    }
}

// ========== Open transactions ==========

/// Response of `/api/ro/my/transactions/open`.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenTransactions {
    /// `"ok"` on success
    pub status: String,
    /// Open buy orders
    #[serde(default)]
    pub buyorders: Vec<OpenOrder>,
    /// Open sell orders
    #[serde(default)]
    pub sellorders: Vec<OpenOrder>,
}

impl OpenTransactions {
    /// Whether there are no open orders on either side.
    pub fn is_empty(&self) -> bool {
        self.buyorders.is_empty() && self.sellorders.is_empty()
    }
}

/// An open order.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenOrder {
    /// Coin symbol
    #[serde(default)]
    pub coin: Option<String>,
    /// Market, e.g. `BTC/AUD`
    #[serde(default)]
    pub market: Option<String>,
    /// Order amount in coin
    #[serde(default)]
    pub amount: Decimal,
    /// Creation time as reported by CoinSpot
    #[serde(default)]
    pub created: Option<String>,
    /// Fee excluding GST, in AUD
    #[serde(default, rename = "audfeeExGst")]
    pub aud_fee_ex_gst: Option<Decimal>,
    /// GST component, in AUD
    #[serde(default, rename = "audGst")]
    pub aud_gst: Option<Decimal>,
    /// Total order value, in AUD
    #[serde(default)]
    pub audtotal: Option<Decimal>,
}

// ========== Deposits ==========

/// Response of `/api/ro/my/deposits`.
#[derive(Debug, Clone, Deserialize)]
pub struct Deposits {
    /// `"ok"` on success
    pub status: String,
    /// Deposit history
    #[serde(default)]
    pub deposits: Vec<Deposit>,
}

impl Deposits {
    /// Sum of all deposit amounts, in AUD.
    pub fn total(&self) -> Decimal {
        self.deposits.iter().map(|deposit| deposit.amount).sum()
    }
}

/// A single AUD deposit.
#[derive(Debug, Clone, Deserialize)]
pub struct Deposit {
    /// Amount deposited, in AUD
    #[serde(default)]
    pub amount: Decimal,
    /// Creation time as reported by CoinSpot
    #[serde(default)]
    pub created: Option<String>,
    /// Deposit status, e.g. `completed`
    #[serde(default)]
    pub status: Option<String>,
    /// Deposit method
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Reference attached to the deposit
    #[serde(default)]
    pub reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_balances() -> Balances {
        serde_json::from_str(
            r#"{
                "status": "ok",
                "balances": [
                    {"AUD": {"balance": 100.5, "audbalance": 100.5, "rate": 1}},
                    {"BTC": {"balance": 0.5, "audbalance": 20000, "rate": 40000}},
                    {"ETH": {"balance": 2, "audbalance": 5000.25, "rate": 2500.125}}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_balances_total_excludes_fiat() {
        let balances = sample_balances();
        assert_eq!(balances.total(), "25000.25".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_balances_lookup() {
        let balances = sample_balances();
        assert_eq!(balances.holdings().count(), 3);
        assert_eq!(balances.get("btc").unwrap().rate, Decimal::from(40000));
        assert!(balances.get("XRP").is_none());
    }

    #[test]
    fn test_balances_display() {
        let text = sample_balances().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("  BTC:"));
        assert!(lines[1].contains("0.5 x"));
        assert!(lines[1].ends_with("= $20000 AUD"));
    }

    #[test]
    fn test_empty_balances() {
        let balances: Balances = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert_eq!(balances.total(), Decimal::ZERO);
        assert_eq!(balances.to_string(), "");
    }

    #[test]
    fn test_open_transactions_deserialize() {
        let json = r#"{
            "status": "ok",
            "buyorders": [{
                "coin": "BTC",
                "market": "BTC/AUD",
                "amount": 0.01,
                "created": "2024-01-01T00:00:00.000Z",
                "audfeeExGst": 0.9,
                "audGst": 0.09,
                "audtotal": 400
            }],
            "sellorders": []
        }"#;
        let open: OpenTransactions = serde_json::from_str(json).unwrap();
        assert!(!open.is_empty());
        assert_eq!(open.buyorders[0].market.as_deref(), Some("BTC/AUD"));
        assert_eq!(open.buyorders[0].aud_gst, Some("0.09".parse().unwrap()));
    }

    #[test]
    fn test_deposits_total() {
        let json = r#"{
            "status": "ok",
            "deposits": [
                {"amount": 500, "created": "2024-01-01", "status": "completed", "type": "payid", "reference": "A1"},
                {"amount": "250.50", "status": "completed"}
            ]
        }"#;
        let deposits: Deposits = serde_json::from_str(json).unwrap();
        assert_eq!(deposits.deposits[0].kind.as_deref(), Some("payid"));
        assert_eq!(deposits.total(), "750.50".parse::<Decimal>().unwrap());
    }
}
