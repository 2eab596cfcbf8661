use chrono::NaiveDateTime;
use std::fmt;

use super::Quote;

/// Why a single symbol could not be refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    SearchInputMissing,
    FieldMissing(&'static str),
    // The browser failed while working on this symbol
    Automation(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::SearchInputMissing => write!(f, "search box not found"),
            FailureReason::FieldMissing(field) => write!(f, "{} not found", field),
            FailureReason::Automation(message) => write!(f, "automation error: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolFailure {
    pub symbol: String,
    pub reason: FailureReason,
}

impl SymbolFailure {
    pub fn new(symbol: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            symbol: symbol.into(),
            reason,
        }
    }

    // Warning shown to the user
    pub fn warning(&self) -> String {
        match &self.reason {
            FailureReason::SearchInputMissing => {
                format!("Could not find search bar for {}", self.symbol)
            }
            FailureReason::FieldMissing(_) => format!("Could not find data for {}", self.symbol),
            FailureReason::Automation(message) => {
                format!("Error processing {}: {}", self.symbol, message)
            }
        }
    }
}

/// Outcome of one refresh batch that ran to completion.
#[derive(Debug, Clone, Default)]
pub struct RefreshReport {
    pub updated: Vec<Quote>,
    pub failures: Vec<SymbolFailure>,
    pub timestamp: Option<NaiveDateTime>,
}

impl RefreshReport {
    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updated.is_empty() && self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_name_the_symbol() {
        let missing = SymbolFailure::new("NGPL", FailureReason::SearchInputMissing);
        assert_eq!(missing.warning(), "Could not find search bar for NGPL");

        let no_data = SymbolFailure::new("HRL", FailureReason::FieldMissing("price"));
        assert_eq!(no_data.warning(), "Could not find data for HRL");

        let crashed = SymbolFailure::new("API", FailureReason::Automation("target crashed".into()));
        assert_eq!(crashed.warning(), "Error processing API: target crashed");
    }
}
