//! Read-side projections over a loaded project table.
//!
//! The dashboard's main panel shows a bar chart of payment percentages per
//! client and an exception table of projects whose payment is not yet 100%.
//! Both are pure functions over a frame the caller already loaded; rendering
//! stays with the presentation layer.

use anyhow::{Context, Result};
use polars::prelude::{DataFrame, IntoLazy, col, lit};
use serde::{Deserialize, Serialize};

use ledger_common::{any_to_f64, any_to_string};
use ledger_model::schema::columns;

/// One bar of the "Client Name vs Payment Got (%)" chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBar {
    pub client_name: String,
    pub payment_got_percent: f64,
}

/// Chart data: one entry per row, in table order.
///
/// Rows with a missing payment value contribute a zero-height bar rather
/// than being dropped, so the chart stays aligned with the table view.
pub fn payment_by_client(table: &DataFrame) -> Result<Vec<PaymentBar>> {
    let clients = table
        .column(columns::CLIENT_NAME)
        .context("client name column")?;
    let payments = table
        .column(columns::PAYMENT_GOT_PERCENT)
        .context("payment column")?;

    let mut bars = Vec::with_capacity(table.height());
    for idx in 0..table.height() {
        let client_name = any_to_string(clients.get(idx)?);
        let payment_got_percent = any_to_f64(payments.get(idx)?).unwrap_or(0.0);
        bars.push(PaymentBar {
            client_name,
            payment_got_percent,
        });
    }
    Ok(bars)
}

/// The exception view: projects whose payment is not 100%, projected to the
/// client name and payment columns.
///
/// A null payment cell counts as outstanding: comparing null with 100 yields
/// null, which `filter` would otherwise drop, and a project with no recorded
/// payment is the opposite of fully paid.
pub fn outstanding_payments(table: &DataFrame) -> Result<DataFrame> {
    table
        .clone()
        .lazy()
        .filter(
            col(columns::PAYMENT_GOT_PERCENT)
                .neq(lit(100.0))
                .fill_null(lit(true)),
        )
        .select([col(columns::CLIENT_NAME), col(columns::PAYMENT_GOT_PERCENT)])
        .collect()
        .context("outstanding payments view")
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    fn sample_table() -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                columns::CLIENT_NAME.into(),
                vec!["Acme", "Beta", "Gamma"],
            ),
            Column::new(
                columns::PAYMENT_GOT_PERCENT.into(),
                vec![100.0, 60.0, 0.0],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn chart_data_keeps_table_order() {
        let bars = payment_by_client(&sample_table()).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].client_name, "Acme");
        assert_eq!(bars[0].payment_got_percent, 100.0);
        assert_eq!(bars[2].payment_got_percent, 0.0);
    }

    #[test]
    fn outstanding_view_drops_fully_paid_rows() {
        let view = outstanding_payments(&sample_table()).unwrap();
        assert_eq!(view.height(), 2);
        assert_eq!(view.width(), 2);

        let clients = view.column(columns::CLIENT_NAME).unwrap();
        assert_eq!(any_to_string(clients.get(0).unwrap()), "Beta");
        assert_eq!(any_to_string(clients.get(1).unwrap()), "Gamma");
    }

    #[test]
    fn null_payment_counts_as_outstanding() {
        let table = DataFrame::new(vec![
            Column::new(
                columns::CLIENT_NAME.into(),
                vec!["Acme", "Beta", "Gamma"],
            ),
            Column::new(
                columns::PAYMENT_GOT_PERCENT.into(),
                vec![Some(100.0), None, Some(60.0)],
            ),
        ])
        .unwrap();

        let view = outstanding_payments(&table).unwrap();
        assert_eq!(view.height(), 2);

        let clients = view.column(columns::CLIENT_NAME).unwrap();
        assert_eq!(any_to_string(clients.get(0).unwrap()), "Beta");
        assert_eq!(any_to_string(clients.get(1).unwrap()), "Gamma");
    }

    #[test]
    fn missing_payment_becomes_zero_bar() {
        let table = DataFrame::new(vec![
            Column::new(columns::CLIENT_NAME.into(), vec![Some("Acme"), None]),
            Column::new(
                columns::PAYMENT_GOT_PERCENT.into(),
                vec![Some(50.0), None],
            ),
        ])
        .unwrap();

        let bars = payment_by_client(&table).unwrap();
        assert_eq!(bars[1].client_name, "");
        assert_eq!(bars[1].payment_got_percent, 0.0);
    }
}
