use serde::{Deserialize, Serialize};

/// A currency the order can be paid with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub id: String,
    /// Human readable name, e.g. "Ethereum".
    pub title: String,
    /// Ticker symbol, e.g. "ETH".
    pub name: String,
}

impl Currency {
    pub fn new(id: impl Into<String>, title: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            name: name.into(),
        }
    }
}

/// Finds a currency by id in an ordered list.
pub fn find<'a>(currencies: &'a [Currency], id: &str) -> Option<&'a Currency> {
    currencies.iter().find(|c| c.id == id)
}
