//! Wire-level records shared with the movement log and the roster file.
//!
//! Field names follow the legacy JSON schema (`dni`, `monto_total`, ...);
//! amounts travel as plain JSON numbers.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One roster entry, keyed by DNI with the file number (`legajo`) as a
/// secondary lookup key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub dni: u64,
    pub legajo: String,
    #[serde(rename = "nombre_apellido")]
    pub full_name: String,
    #[serde(
        rename = "saldo_inicial_periodo",
        with = "rust_decimal::serde::float",
        default
    )]
    pub opening_balance: Decimal,
}

/// Movement type. The wire tokens are the lowercase Spanish names the
/// spreadsheet stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "orden")]
    Order,
    #[serde(rename = "prestacion")]
    Service,
    #[serde(rename = "varios")]
    Misc,
}

impl Category {
    fn wire_token(self) -> &'static str {
        match self {
            Category::Order => "orden",
            Category::Service => "prestacion",
            Category::Misc => "varios",
        }
    }

    /// Capitalized form shown in tables and default descriptions.
    pub fn label(self) -> &'static str {
        match self {
            Category::Order => "Orden",
            Category::Service => "Prestacion",
            Category::Misc => "Varios",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_token())
    }
}

/// One movement as stored in the log.
///
/// `total_amount` is the full agreed amount; when `installments > 1` only
/// `total_amount / installments` hits the current period balance. A single
/// record carries the whole installment plan, so `installment_number` is
/// always 1 for rows created here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub dni: u64,
    #[serde(default)]
    pub legajo: String,
    #[serde(rename = "nombre_apellido", default)]
    pub full_name: String,
    #[serde(rename = "tipo")]
    pub category: Category,
    #[serde(rename = "monto_total", with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(rename = "cuotas", default = "default_one")]
    pub installments: u32,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "cuota_numero", default = "default_one")]
    pub installment_number: u32,
    pub timestamp: DateTime<Utc>,
}

fn default_one() -> u32 {
    1
}

impl Transaction {
    /// Build an operator-entered movement, applying the entry-form rules:
    /// the amount must be positive, installments only apply to
    /// prestaciones and a blank description falls back to
    /// `"{Tipo} - {dd/mm/yyyy}"`.
    pub fn draft(
        member: &Member,
        category: Category,
        total_amount: Decimal,
        installments: u32,
        date: NaiveDate,
        description: Option<&str>,
    ) -> Result<Transaction, String> {
        if total_amount <= Decimal::ZERO {
            return Err("Ingrese un monto válido".to_string());
        }
        let installments = match category {
            Category::Service => installments,
            _ => 1,
        };
        if installments < 1 {
            return Err("Ingrese una cantidad de cuotas válida".to_string());
        }

        let description = match description.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => format!("{} - {}", category.label(), display_date(date)),
        };

        Ok(Transaction {
            dni: member.dni,
            legajo: member.legajo.clone(),
            full_name: member.full_name.clone(),
            category,
            total_amount,
            installments,
            date,
            description,
            installment_number: 1,
            timestamp: Utc::now(),
        })
    }

    /// Amount this movement contributes to the current period.
    pub fn period_amount(&self) -> Decimal {
        if self.installments > 1 {
            self.total_amount / Decimal::from(self.installments)
        } else {
            self.total_amount
        }
    }

    /// `"1/3"` for installment plans, `"-"` for single charges.
    pub fn installment_label(&self) -> String {
        if self.installments > 1 {
            format!("{}/{}", self.installment_number, self.installments)
        } else {
            "-".to_string()
        }
    }

    pub fn description_or_dash(&self) -> &str {
        if self.description.is_empty() {
            "-"
        } else {
            &self.description
        }
    }
}

/// Legacy display form used in tables, default descriptions and the CSV
/// export.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Member {
        Member {
            dni: 30111222,
            legajo: "A-001".to_string(),
            full_name: "Pérez, Juan".to_string(),
            opening_balance: Decimal::from(1000),
        }
    }

    #[test]
    fn parses_wire_transaction() {
        let json = r#"{
            "dni": 30111222,
            "legajo": "A-001",
            "nombre_apellido": "Pérez, Juan",
            "tipo": "prestacion",
            "monto_total": 600,
            "cuotas": 3,
            "fecha": "2024-01-10",
            "descripcion": "Plan dental",
            "cuota_numero": 1,
            "timestamp": "2024-01-10T09:30:00Z"
        }"#;

        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.category, Category::Service);
        assert_eq!(tx.total_amount, Decimal::from(600));
        assert_eq!(tx.installments, 3);
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(tx.period_amount(), Decimal::from(200));
    }

    #[test]
    fn missing_cuotas_defaults_to_single_charge() {
        let json = r#"{
            "dni": 7,
            "tipo": "varios",
            "monto_total": -50.5,
            "fecha": "2024-02-02",
            "timestamp": "2024-02-02T00:00:00Z"
        }"#;

        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.installments, 1);
        assert_eq!(tx.installment_number, 1);
        assert_eq!(tx.description, "");
        assert_eq!(tx.period_amount(), "-50.5".parse::<Decimal>().unwrap());
    }

    #[test]
    fn serializes_with_wire_names_and_plain_numbers() {
        let tx = Transaction::draft(
            &member(),
            Category::Order,
            Decimal::from(300),
            1,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            Some("Orden inicial"),
        )
        .unwrap();

        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["tipo"], "orden");
        assert_eq!(value["monto_total"], 300.0);
        assert_eq!(value["cuotas"], 1);
        assert_eq!(value["fecha"], "2024-01-05");
        assert_eq!(value["nombre_apellido"], "Pérez, Juan");
    }

    #[test]
    fn draft_rejects_non_positive_amounts() {
        let err = Transaction::draft(
            &member(),
            Category::Misc,
            Decimal::ZERO,
            1,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, "Ingrese un monto válido");
    }

    #[test]
    fn draft_forces_single_installment_outside_prestaciones() {
        let tx = Transaction::draft(
            &member(),
            Category::Order,
            Decimal::from(300),
            6,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(tx.installments, 1);
        assert_eq!(tx.description, "Orden - 05/01/2024");
    }

    #[test]
    fn draft_keeps_installment_plan_for_prestaciones() {
        let tx = Transaction::draft(
            &member(),
            Category::Service,
            Decimal::from(600),
            3,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            Some("  Plan dental  "),
        )
        .unwrap();
        assert_eq!(tx.installments, 3);
        assert_eq!(tx.description, "Plan dental");
        assert_eq!(tx.installment_label(), "1/3");
    }

    #[test]
    fn installment_label_is_dash_for_single_charges() {
        let tx = Transaction::draft(
            &member(),
            Category::Order,
            Decimal::from(300),
            1,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(tx.installment_label(), "-");
    }
}
