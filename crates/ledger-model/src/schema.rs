//! Fixed column schema of the project table.
//!
//! The store file carries exactly these columns, in this order. The set never
//! changes at runtime; the only schema evolution the workspace knows about is
//! backfilling [`columns::TOTAL_CONTRIBUTION_CORRECT`] on legacy stores.

/// Column name constants, in no particular order. See [`COLUMN_ORDER`] for
/// the persisted ordering.
pub mod columns {
    pub const NUMBER: &str = "Number";
    pub const CLIENT_NAME: &str = "Client Name";
    pub const BUSINESS_NAME: &str = "Business Name";
    pub const DATE: &str = "Date";
    pub const SERVICES: &str = "Services";
    pub const PAYMENT_GOT_PERCENT: &str = "Payment Got (%)";
    pub const QUOTE: &str = "Quote";
    pub const AMOUNT_TOTAL: &str = "Amount Total";
    pub const TRANSFER_METHOD: &str = "Transfer Method";
    pub const TOTAL_CONTRIBUTION_CORRECT: &str = "Total Contribution Correct";
}

use crate::collaborator::Collaborator;

/// The full persisted column set, in table order.
pub const COLUMN_ORDER: [&str; 16] = [
    columns::NUMBER,
    columns::CLIENT_NAME,
    columns::BUSINESS_NAME,
    columns::DATE,
    columns::SERVICES,
    columns::PAYMENT_GOT_PERCENT,
    columns::QUOTE,
    columns::AMOUNT_TOTAL,
    columns::TRANSFER_METHOD,
    "Meet's Contribution (%)",
    "Meet's Part",
    "Spandan's Contribution (%)",
    "Spandan's Part",
    "Srey's Contribution (%)",
    "Srey's Part",
    columns::TOTAL_CONTRIBUTION_CORRECT,
];

/// Columns that hold Float64 values in memory.
pub fn numeric_columns() -> Vec<&'static str> {
    let mut cols = vec![
        columns::PAYMENT_GOT_PERCENT,
        columns::QUOTE,
        columns::AMOUNT_TOTAL,
    ];
    for collaborator in Collaborator::ALL {
        cols.push(collaborator.contribution_column());
        cols.push(collaborator.part_column());
    }
    cols
}

/// Columns that hold free-text or enum strings in memory. The date column is
/// handled separately because it is normalized, not just cast.
pub fn text_columns() -> Vec<&'static str> {
    vec![
        columns::NUMBER,
        columns::CLIENT_NAME,
        columns::BUSINESS_NAME,
        columns::SERVICES,
        columns::TRANSFER_METHOD,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_order_is_complete() {
        assert_eq!(COLUMN_ORDER.len(), 16);
        for col in numeric_columns() {
            assert!(COLUMN_ORDER.contains(&col), "missing numeric column {col}");
        }
        for col in text_columns() {
            assert!(COLUMN_ORDER.contains(&col), "missing text column {col}");
        }
        assert!(COLUMN_ORDER.contains(&columns::DATE));
        assert!(COLUMN_ORDER.contains(&columns::TOTAL_CONTRIBUTION_CORRECT));
    }

    #[test]
    fn collaborator_columns_follow_contribution_then_part() {
        let meet_contrib = COLUMN_ORDER
            .iter()
            .position(|c| *c == "Meet's Contribution (%)")
            .unwrap();
        let meet_part = COLUMN_ORDER.iter().position(|c| *c == "Meet's Part").unwrap();
        assert_eq!(meet_part, meet_contrib + 1);
    }
}
