use std::time::{Duration, SystemTime, UNIX_EPOCH};

use cuenta_corriente::Transaction;
use serde::Deserialize;

/// Outcome of pushing one movement to the remote log.
///
/// The legacy transport was a fire-and-forget POST that could never read
/// the reply. The script endpoint does answer, so the client reports what
/// actually happened and leaves the optimistic-append decision to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The endpoint acknowledged the append.
    Confirmed,
    /// The endpoint answered and refused; the row was not stored.
    Rejected(String),
    /// Transport failure or unreadable reply. The row may or may not have
    /// been stored; the next fetch reconciles either way.
    Unconfirmed,
}

/// HTTP client for one script deployment.
///
/// Reads degrade: any failure fetching movements yields an empty list and
/// a warning, never an error, so balances stay computable from session
/// data alone.
#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    script_url: String,
}

#[derive(Debug, Deserialize)]
struct FetchEnvelope {
    status: String,
    #[serde(default)]
    movimientos: Vec<Transaction>,
}

#[derive(Debug, Deserialize)]
struct SubmitEnvelope {
    status: String,
    #[serde(default)]
    message: String,
}

impl SheetsClient {
    pub fn new(script_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("cuentas/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        SheetsClient {
            http,
            script_url: script_url.into(),
        }
    }

    /// Fetch every stored movement for one member.
    ///
    /// The endpoint only speaks JSONP, so the request carries a callback
    /// name and the reply body arrives as `callback({...})`. Plain JSON
    /// replies are accepted too.
    pub async fn fetch_movements(&self, dni: u64) -> Vec<Transaction> {
        let callback = format!("jsonpCallback_{}", unix_millis());
        let url = format!("{}?dni={}&callback={}", self.script_url, dni, callback);

        let body = match self.read_body(&url).await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!("movement fetch for dni {dni} failed: {err}");
                return Vec::new();
            }
        };

        let payload = strip_jsonp(&body, &callback).unwrap_or(body.as_str());
        match serde_json::from_str::<FetchEnvelope>(payload) {
            Ok(envelope) if envelope.status == "success" => {
                tracing::debug!(
                    "fetched {} movements for dni {dni}",
                    envelope.movimientos.len()
                );
                envelope.movimientos
            }
            Ok(envelope) => {
                tracing::warn!(
                    "movement fetch for dni {dni} answered status {:?}",
                    envelope.status
                );
                Vec::new()
            }
            Err(err) => {
                tracing::warn!("movement fetch for dni {dni} returned an unreadable body: {err}");
                Vec::new()
            }
        }
    }

    async fn read_body(&self, url: &str) -> reqwest::Result<String> {
        self.http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    /// Append one movement to the remote log.
    ///
    /// An HTTP error status or an explicit non-success reply is a
    /// rejection; a transport failure or an unreadable reply leaves the
    /// append unconfirmed.
    pub async fn submit_movement(&self, movement: &Transaction) -> SubmitOutcome {
        let response = match self.http.post(&self.script_url).json(movement).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    "movement submit for dni {} did not complete: {err}",
                    movement.dni
                );
                return SubmitOutcome::Unconfirmed;
            }
        };

        let status = response.status();
        if !status.is_success() {
            return SubmitOutcome::Rejected(format!("HTTP {}", status.as_u16()));
        }

        match response.json::<SubmitEnvelope>().await {
            Ok(envelope) if envelope.status == "success" => SubmitOutcome::Confirmed,
            Ok(envelope) => {
                let reason = if envelope.message.is_empty() {
                    format!("status {}", envelope.status)
                } else {
                    envelope.message
                };
                SubmitOutcome::Rejected(reason)
            }
            Err(err) => {
                tracing::warn!(
                    "movement submit for dni {} got an unreadable reply: {err}",
                    movement.dni
                );
                SubmitOutcome::Unconfirmed
            }
        }
    }
}

/// Strip the `callback(...)` padding from a JSONP body, tolerating
/// surrounding whitespace and a trailing semicolon. `None` when the body
/// is not wrapped with the expected callback.
fn strip_jsonp<'a>(body: &'a str, callback: &str) -> Option<&'a str> {
    let rest = body.trim().strip_prefix(callback)?.trim_start();
    let rest = rest.strip_prefix('(')?.trim_end();
    let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();
    rest.strip_suffix(')').map(str::trim)
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_plain_padding() {
        assert_eq!(
            strip_jsonp(r#"cb_1({"status":"success"})"#, "cb_1"),
            Some(r#"{"status":"success"}"#)
        );
    }

    #[test]
    fn strips_padding_with_semicolon_and_whitespace() {
        assert_eq!(
            strip_jsonp("  cb_1 ( {\"status\":\"success\"} ) ;  ", "cb_1"),
            Some("{\"status\":\"success\"}")
        );
    }

    #[test]
    fn rejects_foreign_callbacks() {
        assert!(strip_jsonp(r#"other({"status":"success"})"#, "cb_1").is_none());
        assert!(strip_jsonp(r#"{"status":"success"}"#, "cb_1").is_none());
    }

    #[test]
    fn fetch_envelope_defaults_missing_movements() {
        let envelope: FetchEnvelope =
            serde_json::from_str(r#"{"status":"no_data"}"#).unwrap();
        assert_eq!(envelope.status, "no_data");
        assert!(envelope.movimientos.is_empty());
    }

    #[test]
    fn fetch_envelope_parses_movements() {
        let envelope: FetchEnvelope = serde_json::from_str(
            r#"{"status":"success","movimientos":[
                {"dni":7,"tipo":"orden","monto_total":300,"cuotas":1,
                 "fecha":"2024-01-05","descripcion":"","cuota_numero":1,
                 "timestamp":"2024-01-05T12:00:00Z"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(envelope.movimientos.len(), 1);
        assert_eq!(envelope.movimientos[0].dni, 7);
    }
}
