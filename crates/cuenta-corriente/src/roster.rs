//! Startup roster document (`base.json`).

use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Deserialize;

use crate::model::{Member, Transaction};

/// Contents of the static roster file: the member list plus any movements
/// recorded before this deployment. Both arrays are optional so a bare
/// `{"afiliados": [...]}` file keeps working.
#[derive(Debug, Default, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub afiliados: Vec<Member>,
    #[serde(default)]
    pub movimientos: Vec<Transaction>,
}

pub fn load_roster(path: &Path) -> Result<Roster> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file: {}", path.display()))?;
    let roster: Roster = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse roster file: {}", path.display()))?;
    tracing::debug!(
        "roster loaded: {} afiliados, {} seed movements",
        roster.afiliados.len(),
        roster.movimientos.len()
    );
    Ok(roster)
}
