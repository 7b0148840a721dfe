use anstyle::{AnsiColor, Color, Style};
use anyhow::{Result, anyhow, bail};
use chrono::{Local, NaiveDate};
use cuenta_corriente::Decimal;
use cuenta_corriente::directory::MemberQuery;
use cuenta_corriente::model::{Category, Transaction};
use cuenta_corriente_sheets::{SheetsClient, SubmitOutcome};

use crate::config::Sources;

pub async fn record(
    sources: &Sources,
    query: &MemberQuery,
    tipo: Category,
    monto: Decimal,
    cuotas: u32,
    fecha: Option<NaiveDate>,
    descripcion: Option<String>,
) -> Result<()> {
    let mut session = crate::load_session(sources);
    let Some(member) = session.select(query) else {
        bail!("No se encontró el afiliado");
    };

    let fecha = fecha.unwrap_or_else(|| Local::now().date_naive());
    let movement = Transaction::draft(&member, tipo, monto, cuotas, fecha, descripcion.as_deref())
        .map_err(|message| anyhow!(message))?;

    let client = SheetsClient::new(&sources.script_url);
    let outcome = client.submit_movement(&movement).await;

    let ok_style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
    let warn_style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
    let reset = Style::new();

    match outcome {
        SubmitOutcome::Confirmed => {
            println!("{ok_style}✓{reset} Transacción guardada correctamente");
        }
        SubmitOutcome::Unconfirmed => {
            println!(
                "{warn_style}!{reset} Transacción registrada localmente, sin confirmación del registro remoto"
            );
        }
        SubmitOutcome::Rejected(reason) => {
            bail!("Error al guardar la transacción: {reason}");
        }
    }
    session.record(movement);

    let remote = client.fetch_movements(member.dni).await;
    let ledger = session.ledger_for(&member, remote);
    println!();
    crate::saldo::print_balances(&ledger);

    Ok(())
}
