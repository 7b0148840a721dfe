use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Local;
use cuenta_corriente::directory::MemberQuery;
use cuenta_corriente::export;

use crate::config::Sources;

/// Write the CSV of the movements recorded in the roster seed for one
/// member. Matches the web download byte for byte.
pub fn write_csv(sources: &Sources, query: &MemberQuery, output: Option<PathBuf>) -> Result<()> {
    let session = crate::load_session(sources);
    let Some(member) = session.find(query) else {
        bail!("No se encontró el afiliado");
    };

    let movements = session.cache().for_member(member.dni);
    if movements.is_empty() {
        bail!("No hay movimientos para exportar");
    }

    let csv = export::movements_csv(member, &movements);
    let path = output
        .unwrap_or_else(|| PathBuf::from(export::filename(member, Local::now().date_naive())));
    std::fs::write(&path, &csv)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    println!("{} movimientos exportados a {}", movements.len(), path.display());
    Ok(())
}
