//! Allow-list of reference-data tables that maintenance may reset

use crate::ReceiptError;
use std::fmt;
use std::str::FromStr;

/// A reference-data table that may be emptied in bulk
///
/// Each variant maps to a fixed statement; table names never come from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceTable {
    PaymentMethods,
    Airlines,
    TourOperators,
    Destinations,
    DeparturePoints,
}

impl ReferenceTable {
    pub const ALL: [ReferenceTable; 5] = [
        ReferenceTable::PaymentMethods,
        ReferenceTable::Airlines,
        ReferenceTable::TourOperators,
        ReferenceTable::Destinations,
        ReferenceTable::DeparturePoints,
    ];

    /// Table name in the database
    pub fn table_name(self) -> &'static str {
        match self {
            ReferenceTable::PaymentMethods => "payment_methods",
            ReferenceTable::Airlines => "airlines",
            ReferenceTable::TourOperators => "tour_operators",
            ReferenceTable::Destinations => "destinations",
            ReferenceTable::DeparturePoints => "departure_points",
        }
    }

    /// Statement that empties the table
    pub fn delete_statement(self) -> &'static str {
        match self {
            ReferenceTable::PaymentMethods => "DELETE FROM payment_methods",
            ReferenceTable::Airlines => "DELETE FROM airlines",
            ReferenceTable::TourOperators => "DELETE FROM tour_operators",
            ReferenceTable::Destinations => "DELETE FROM destinations",
            ReferenceTable::DeparturePoints => "DELETE FROM departure_points",
        }
    }
}

impl FromStr for ReferenceTable {
    type Err = ReceiptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.table_name() == wanted)
            .ok_or_else(|| ReceiptError::UnknownReferenceTable(s.to_string()))
    }
}

impl fmt::Display for ReferenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tables() {
        assert_eq!(
            "payment_methods".parse::<ReferenceTable>().unwrap(),
            ReferenceTable::PaymentMethods
        );
        assert_eq!(
            "Tour-Operators".parse::<ReferenceTable>().unwrap(),
            ReferenceTable::TourOperators
        );
    }

    #[test]
    fn test_rejects_unknown_and_injection() {
        assert!("users".parse::<ReferenceTable>().is_err());
        assert!("airlines; DROP TABLE sales"
            .parse::<ReferenceTable>()
            .is_err());
    }

    #[test]
    fn test_statements_target_own_table() {
        for table in ReferenceTable::ALL {
            assert_eq!(
                table.delete_statement(),
                format!("DELETE FROM {}", table.table_name())
            );
        }
    }
}
