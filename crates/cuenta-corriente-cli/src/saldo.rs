use anstyle::{AnsiColor, Color, Style};
use anyhow::{Result, bail};
use cuenta_corriente::Decimal;
use cuenta_corriente::directory::MemberQuery;
use cuenta_corriente::ledger::BalanceLedger;
use cuenta_corriente::model::display_date;
use cuenta_corriente_sheets::SheetsClient;

use crate::config::Sources;

pub async fn show_saldo(sources: &Sources, query: &MemberQuery) -> Result<()> {
    let session = crate::load_session(sources);
    let Some(member) = session.find(query).cloned() else {
        bail!("No se encontró el afiliado");
    };

    let client = SheetsClient::new(&sources.script_url);
    let remote = client.fetch_movements(member.dni).await;
    let ledger = session.ledger_for(&member, remote);

    let bold = Style::new().bold();
    let reset = Style::new();

    println!(
        "{bold}{}{reset}  (DNI {} · Legajo {})",
        member.full_name, member.dni, member.legajo
    );
    println!();

    if ledger.rows.is_empty() {
        println!("No hay movimientos en el período");
    } else {
        println!(
            "{bold}{:<10}  {:<11}  {:<28}  {:>5}  {:>12}  {:>12}{reset}",
            "Fecha", "Tipo", "Descripción", "Cuota", "Monto", "Saldo"
        );
        for row in &ledger.rows {
            let amount_style = amount_style(row.period_amount);
            println!(
                "{:<10}  {:<11}  {:<28}  {:>5}  {amount_style}{:>12}{reset}  {:>12}",
                display_date(row.movement.date),
                row.movement.category.label(),
                truncated(row.movement.description_or_dash(), 28),
                row.movement.installment_label(),
                money(row.period_amount),
                money(row.running_balance),
            );
        }
    }

    println!();
    print_balances(&ledger);

    Ok(())
}

pub fn print_balances(ledger: &BalanceLedger) {
    let bold = Style::new().bold();
    let reset = Style::new();
    let total_style = amount_style(ledger.movements_total);

    println!("  Saldo inicial:            {:>12}", money(ledger.opening_balance));
    println!(
        "  Movimientos del período:  {total_style}{:>12}{reset}",
        money(ledger.movements_total)
    );
    println!(
        "  {bold}Saldo final:              {:>12}{reset}",
        money(ledger.closing_balance)
    );
}

fn amount_style(amount: Decimal) -> Style {
    if amount < Decimal::ZERO {
        Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)))
    } else {
        Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)))
    }
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

fn truncated(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max - 1).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_descriptions_by_characters() {
        assert_eq!(truncated("corto", 28), "corto");
        assert_eq!(truncated("una descripción realmente larga", 10), "una descr…");
    }

    #[test]
    fn money_renders_two_decimals() {
        assert_eq!(money(Decimal::from(300)), "300.00");
        assert_eq!(money("-50.5".parse().unwrap()), "-50.50");
    }
}
