//! CoinSpot REST API endpoint constants.

/// Public endpoints (no authentication required).
pub mod public {
    /// Latest buy, sell and last prices for every coin.
    pub const LATEST: &str = "/pubapi/latest";
}

/// Private endpoints (authentication required).
pub mod private {
    /// Prefix of every read-only endpoint; `call <path>` is resolved against it.
    pub const READ_ONLY_PREFIX: &str = "/api/ro/";
    /// All coin balances.
    pub const BALANCES: &str = "/api/ro/my/balances";
    /// Single coin balance; the coin symbol is appended.
    pub const COIN_BALANCE_PREFIX: &str = "/api/ro/my/balances/:";
    /// Open buy and sell orders.
    pub const OPEN_TRANSACTIONS: &str = "/api/ro/my/transactions/open";
    /// AUD deposit history.
    pub const DEPOSITS: &str = "/api/ro/my/deposits";

    /// Resolve a path given relative to [`READ_ONLY_PREFIX`], e.g.
    /// `my/balances` to `/api/ro/my/balances`.
    pub fn read_only(path: &str) -> String {
        format!("{READ_ONLY_PREFIX}{}", path.trim().trim_start_matches('/'))
    }
}
