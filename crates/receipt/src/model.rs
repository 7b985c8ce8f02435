//! Sale data model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primary key of a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct SaleId(pub i64);

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SaleId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(SaleId)
    }
}

/// One sales transaction ("biglietteria" entry)
///
/// Monetary fields are non-negative; `balance_due` is computed upstream as
/// `sale_price - deposit_paid` and is not re-checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sale {
    pub id: SaleId,
    pub client_name: Option<String>,
    pub address: Option<String>,
    pub fiscal_code: Option<String>,
    /// Payment reference / PNR code
    pub payment_reference: Option<String>,
    pub itinerary: Option<String>,
    pub service: Option<String>,
    pub payment_method: Option<String>,
    pub net_cost: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub deposit_paid: Option<Decimal>,
    pub balance_due: Option<Decimal>,
    pub agent_fee: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i64>,
}

impl Sale {
    /// A sale with only the mandatory fields set
    pub fn new(id: SaleId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            client_name: None,
            address: None,
            fiscal_code: None,
            payment_reference: None,
            itinerary: None,
            service: None,
            payment_method: None,
            net_cost: None,
            sale_price: None,
            deposit_paid: None,
            balance_due: None,
            agent_fee: None,
            created_at,
            created_by: None,
        }
    }
}

/// Net/sale price pair of an optional extra (insurance, express handling)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubService {
    pub net: Decimal,
    pub sale: Decimal,
}

/// A passenger (line item) of a sale
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Passenger {
    pub name: Option<String>,
    pub net_cost: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub insurance: Option<SubService>,
    pub express: Option<SubService>,
    pub status: Option<String>,
    /// Stored as text; may be missing or malformed
    pub payment_date: Option<String>,
    /// Stored as text; may be missing or malformed
    pub activation_date: Option<String>,
}

/// A payment installment of a sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Installment {
    /// Ordinal, 1-based
    pub number: i32,
    pub amount: Option<Decimal>,
    /// Due or paid date, stored as text; may be missing or malformed
    pub due_date: Option<String>,
    pub paid: bool,
}

/// The user who created a sale
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct Agent {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// A sale with everything a receipt needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub sale: Sale,
    pub passengers: Vec<Passenger>,
    /// Ordered by `number` ascending
    pub installments: Vec<Installment>,
    pub agent: Option<Agent>,
}
