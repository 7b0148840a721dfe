//! Legacy CSV export of one member's recorded movements.
//!
//! Consumers parse these files as-is, so the format is pinned: the Spanish
//! header, `dd/mm/yyyy` dates, an always-quoted description column and
//! two-decimal amounts. Rows run in entry order, not display order.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::{display_date, Member, Transaction};

const HEADER: &str = "Fecha,Tipo,Descripción,Cuota,Monto,Saldo";

/// Render the CSV for one member's movements, with the running balance
/// seeded from the member's period opening balance. Empty descriptions
/// become `-`.
pub fn movements_csv(member: &Member, movements: &[Transaction]) -> String {
    let mut csv = String::from(HEADER);
    csv.push('\n');

    let mut running_balance = member.opening_balance;
    for movement in movements {
        let amount = movement.period_amount();
        running_balance += amount;

        csv.push_str(&format!(
            "{},{},\"{}\",{},{},{}\n",
            display_date(movement.date),
            movement.category,
            movement.description_or_dash(),
            movement.installment_label(),
            money(amount),
            money(running_balance),
        ));
    }

    csv
}

/// `movimientos_{legajo}_{yyyy-mm-dd}.csv`, the historical download name.
pub fn filename(member: &Member, today: NaiveDate) -> String {
    format!("movimientos_{}_{}.csv", member.legajo, today.format("%Y-%m-%d"))
}

fn money(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}
