use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use cuenta_corriente::{Category, Decimal, Transaction};
use cuenta_corriente_sheets::{SheetsClient, SubmitOutcome};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
struct FetchParams {
    dni: u64,
    callback: String,
}

async fn stub_fetch(Query(params): Query<FetchParams>) -> String {
    let payload = match params.dni {
        // Known member: two stored movements, JSONP-wrapped like the
        // script endpoint answers.
        30111222 => json!({
            "status": "success",
            "movimientos": [
                {
                    "dni": 30111222, "legajo": "A-001", "nombre_apellido": "Pérez, Juan",
                    "tipo": "orden", "monto_total": 300, "cuotas": 1,
                    "fecha": "2024-01-05", "descripcion": "Orden inicial",
                    "cuota_numero": 1, "timestamp": "2024-01-05T12:00:00Z"
                },
                {
                    "dni": 30111222, "legajo": "A-001", "nombre_apellido": "Pérez, Juan",
                    "tipo": "prestacion", "monto_total": 600, "cuotas": 3,
                    "fecha": "2024-01-10", "descripcion": "Plan dental",
                    "cuota_numero": 1, "timestamp": "2024-01-10T09:30:00Z"
                }
            ]
        }),
        11111111 => json!({"status": "error", "message": "DNI inválido"}),
        // Some deployments answer plain JSON when no callback reaches them.
        22222222 => {
            return json!({
                "status": "success",
                "movimientos": [
                    {
                        "dni": 22222222, "tipo": "varios", "monto_total": -50.5,
                        "fecha": "2024-02-02", "descripcion": "Ajuste",
                        "timestamp": "2024-02-02T00:00:00Z"
                    }
                ]
            })
            .to_string();
        }
        _ => json!({"status": "success", "movimientos": []}),
    };
    format!("{}({});", params.callback, payload)
}

async fn stub_submit(Json(movement): Json<Value>) -> Json<Value> {
    if movement["monto_total"].as_f64().unwrap_or_default() > 100_000.0 {
        Json(json!({"status": "error", "message": "Monto fuera de rango"}))
    } else {
        Json(json!({"status": "success", "rowNumber": 5}))
    }
}

async fn spawn_stub() -> String {
    let app = Router::new().route("/exec", get(stub_fetch).post(stub_submit));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/exec")
}

fn movement(dni: u64, amount: i64) -> Transaction {
    Transaction {
        dni,
        legajo: "A-001".to_string(),
        full_name: "Pérez, Juan".to_string(),
        category: Category::Misc,
        total_amount: Decimal::from(amount),
        installments: 1,
        date: "2024-02-01".parse().unwrap(),
        description: "Ajuste".to_string(),
        installment_number: 1,
        timestamp: "2024-02-01T10:00:00Z".parse().unwrap(),
    }
}

#[tokio::test]
async fn fetches_and_unwraps_jsonp_movements() {
    let client = SheetsClient::new(spawn_stub().await);

    let movements = client.fetch_movements(30111222).await;
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0].category, Category::Order);
    assert_eq!(movements[1].period_amount(), Decimal::from(200));
}

#[tokio::test]
async fn accepts_plain_json_replies() {
    let client = SheetsClient::new(spawn_stub().await);

    let movements = client.fetch_movements(22222222).await;
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].installments, 1);
    assert_eq!(movements[0].total_amount, "-50.5".parse().unwrap());
}

#[tokio::test]
async fn non_success_status_degrades_to_empty() {
    let client = SheetsClient::new(spawn_stub().await);
    assert!(client.fetch_movements(11111111).await.is_empty());
}

#[tokio::test]
async fn unknown_member_has_no_movements() {
    let client = SheetsClient::new(spawn_stub().await);
    assert!(client.fetch_movements(99).await.is_empty());
}

#[tokio::test]
async fn unreachable_endpoint_degrades_to_empty() {
    let client = SheetsClient::new("http://127.0.0.1:1/exec");
    assert!(client.fetch_movements(30111222).await.is_empty());
}

#[tokio::test]
async fn submit_is_confirmed_on_success_reply() {
    let client = SheetsClient::new(spawn_stub().await);
    let outcome = client.submit_movement(&movement(30111222, 75)).await;
    assert_eq!(outcome, SubmitOutcome::Confirmed);
}

#[tokio::test]
async fn submit_reports_explicit_rejections() {
    let client = SheetsClient::new(spawn_stub().await);
    let outcome = client.submit_movement(&movement(30111222, 200_000)).await;
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected("Monto fuera de rango".to_string())
    );
}

#[tokio::test]
async fn submit_rejects_on_http_errors() {
    let base = spawn_stub().await;
    let client = SheetsClient::new(base.replace("/exec", "/missing"));
    let outcome = client.submit_movement(&movement(30111222, 75)).await;
    assert_eq!(outcome, SubmitOutcome::Rejected("HTTP 404".to_string()));
}

#[tokio::test]
async fn submit_is_unconfirmed_when_unreachable() {
    let client = SheetsClient::new("http://127.0.0.1:1/exec");
    let outcome = client.submit_movement(&movement(30111222, 75)).await;
    assert_eq!(outcome, SubmitOutcome::Unconfirmed);
}
