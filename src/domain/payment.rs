use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of the payment screen.
///
/// Only a successful submission moves `NotPaid` to `Paid`; nothing moves it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    NotPaid,
    Paid,
}

impl PaymentStatus {
    pub fn is_paid(&self) -> bool {
        *self == PaymentStatus::Paid
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::NotPaid => f.write_str("not_paid"),
            PaymentStatus::Paid => f.write_str("paid"),
        }
    }
}
