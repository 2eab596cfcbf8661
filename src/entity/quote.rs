use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,       // Ticker the quote was scraped for
    pub price: String,        // Last traded price, as printed on the page
    pub change: String,       // Price change, optionally signed
}
