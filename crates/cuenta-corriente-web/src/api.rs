use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{Local, NaiveDate};
use cuenta_corriente::directory::MemberQuery;
use cuenta_corriente::ledger::BalanceLedger;
use cuenta_corriente::model::{Category, Member, Transaction, display_date};
use cuenta_corriente::{Decimal, export};
use cuenta_corriente_sheets::SubmitOutcome;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

#[derive(Serialize)]
pub struct InitResponse {
    pub total_afiliados: usize,
    pub aviso: Option<String>,
}

#[derive(Serialize)]
pub struct SerializedMember {
    pub dni: u64,
    pub legajo: String,
    pub nombre_apellido: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub saldo_inicial_periodo: Decimal,
}

#[derive(Serialize)]
pub struct SerializedBalances {
    #[serde(with = "rust_decimal::serde::float")]
    pub saldo_inicial: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub movimientos_periodo: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub saldo_final: Decimal,
}

/// One table row, already in display form: `dd/mm/yyyy` date, capitalized
/// type label, `-` placeholders and the running balance after the row.
#[derive(Serialize)]
pub struct SerializedMovement {
    pub fecha: String,
    pub tipo: String,
    pub descripcion: String,
    pub cuota: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub monto: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub saldo: Decimal,
}

#[derive(Serialize)]
pub struct MemberResponse {
    pub afiliado: SerializedMember,
    pub saldos: SerializedBalances,
    pub movimientos: Vec<SerializedMovement>,
    pub mensaje: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRequest {
    pub tipo: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub monto_total: Decimal,
    #[serde(default)]
    pub cuotas: Option<u32>,
    pub fecha: NaiveDate,
    #[serde(default)]
    pub descripcion: Option<String>,
}

#[derive(Serialize)]
pub struct SaveResponse {
    pub entrega: String,
    pub saldos: SerializedBalances,
    pub movimientos: Vec<SerializedMovement>,
    pub mensaje: String,
}

fn serialize_member(member: &Member) -> SerializedMember {
    SerializedMember {
        dni: member.dni,
        legajo: member.legajo.clone(),
        nombre_apellido: member.full_name.clone(),
        saldo_inicial_periodo: member.opening_balance,
    }
}

fn serialize_ledger(ledger: &BalanceLedger) -> (SerializedBalances, Vec<SerializedMovement>) {
    let saldos = SerializedBalances {
        saldo_inicial: ledger.opening_balance,
        movimientos_periodo: ledger.movements_total,
        saldo_final: ledger.closing_balance,
    };

    let movimientos = ledger
        .rows
        .iter()
        .map(|row| SerializedMovement {
            fecha: display_date(row.movement.date),
            tipo: row.movement.category.label().to_string(),
            descripcion: row.movement.description_or_dash().to_string(),
            cuota: row.movement.installment_label(),
            monto: row.period_amount,
            saldo: row.running_balance,
        })
        .collect();

    (saldos, movimientos)
}

pub async fn init_handler(State(state): State<AppState>) -> Json<InitResponse> {
    let session = state.session.lock().unwrap();
    let total_afiliados = session.directory().len();
    tracing::info!("Serving init data for {total_afiliados} afiliados");

    Json(InitResponse {
        total_afiliados,
        aviso: state.roster_notice.clone(),
    })
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub dni: Option<u64>,
    pub legajo: Option<String>,
}

/// Look a member up by DNI or legajo, make it the session selection and
/// answer with the freshly computed ledger.
pub async fn search_member(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<MemberResponse>, Response> {
    let query = match (params.dni, params.legajo) {
        (Some(dni), None) => MemberQuery::Dni(dni),
        (None, Some(legajo)) if !legajo.trim().is_empty() => {
            MemberQuery::Legajo(legajo.trim().to_string())
        }
        _ => {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "Por favor ingrese un valor de búsqueda",
            ));
        }
    };

    let member = {
        let mut session = state.session.lock().unwrap();
        session.select(&query)
    }
    .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "No se encontró el afiliado"))?;

    // The lock is not held across the fetch; a fetch failure degrades to
    // an empty remote list instead of an error.
    let remote = state.client.fetch_movements(member.dni).await;

    let ledger = {
        let session = state.session.lock().unwrap();
        session.ledger_for(&member, remote)
    };

    let (saldos, movimientos) = serialize_ledger(&ledger);
    tracing::info!(
        "afiliado {} listed with {} movements",
        member.dni,
        movimientos.len()
    );

    Ok(Json(MemberResponse {
        afiliado: serialize_member(&member),
        saldos,
        movimientos,
        mensaje: "Afiliado encontrado correctamente".to_string(),
    }))
}

/// Record a new movement for the selected member: push it to the remote
/// log, append it to the session log and answer with updated balances.
pub async fn save_movement(
    State(state): State<AppState>,
    Json(payload): Json<SaveRequest>,
) -> Result<Json<SaveResponse>, Response> {
    let (member, movement) = {
        let mut session = state.session.lock().unwrap();
        let member = session.selected().cloned().ok_or_else(|| {
            error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                "No hay afiliado seleccionado",
            )
        })?;
        session.set_category(payload.tipo);

        let movement = Transaction::draft(
            &member,
            payload.tipo,
            payload.monto_total,
            payload.cuotas.unwrap_or(1),
            payload.fecha,
            payload.descripcion.as_deref(),
        )
        .map_err(|message| error_response(StatusCode::UNPROCESSABLE_ENTITY, message))?;

        (member, movement)
    };

    let outcome = state.client.submit_movement(&movement).await;
    let (entrega, mensaje) = match &outcome {
        SubmitOutcome::Confirmed => ("confirmada", "Transacción guardada correctamente"),
        SubmitOutcome::Unconfirmed => (
            "sin confirmar",
            "Transacción registrada localmente, sin confirmación del registro remoto",
        ),
        SubmitOutcome::Rejected(reason) => {
            tracing::error!(
                "remote log rejected movement for afiliado {}: {reason}",
                member.dni
            );
            return Err(error_response(
                StatusCode::BAD_GATEWAY,
                "Error al guardar la transacción",
            ));
        }
    };

    let remote = state.client.fetch_movements(member.dni).await;

    // Append before recomputing so the fresh ledger contains the new row
    // even when the remote does not echo it yet.
    let ledger = {
        let mut session = state.session.lock().unwrap();
        session.record(movement);
        session.ledger_for(&member, remote)
    };

    let (saldos, movimientos) = serialize_ledger(&ledger);
    tracing::info!("movement recorded for afiliado {} ({entrega})", member.dni);

    Ok(Json(SaveResponse {
        entrega: entrega.to_string(),
        saldos,
        movimientos,
        mensaje: mensaje.to_string(),
    }))
}

/// Download the CSV of the session-recorded movements for the selected
/// member, under the historical filename.
pub async fn export_movements(State(state): State<AppState>) -> Result<Response, Response> {
    let session = state.session.lock().unwrap();
    let member = session
        .selected()
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "No hay afiliado seleccionado"))?;

    let movements = session.cache().for_member(member.dni);
    if movements.is_empty() {
        return Err(error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "No hay movimientos para exportar",
        ));
    }

    let csv = export::movements_csv(member, &movements);
    let filename = export::filename(member, Local::now().date_naive());
    tracing::info!("exporting {} movements as {filename}", movements.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
