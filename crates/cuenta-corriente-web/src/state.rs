use std::path::Path;
use std::sync::{Arc, Mutex};

use cuenta_corriente::roster;
use cuenta_corriente::Session;
use cuenta_corriente_sheets::SheetsClient;

/// Shared application state: one operator session behind a lock plus the
/// remote movement-log client.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    pub client: SheetsClient,
    pub roster_notice: Option<String>,
}

impl AppState {
    /// Load the roster and build the session. A missing or malformed
    /// roster is not fatal: the server starts with an empty directory and
    /// surfaces the notice through `/api/init`.
    pub fn new(roster_path: &Path, script_url: &str) -> Self {
        let (roster, roster_notice) = match roster::load_roster(roster_path) {
            Ok(roster) => (roster, None),
            Err(err) => {
                tracing::warn!("starting with an empty roster: {err:#}");
                (
                    Default::default(),
                    Some("Error al cargar la base de datos".to_string()),
                )
            }
        };

        AppState {
            session: Arc::new(Mutex::new(Session::new(roster))),
            client: SheetsClient::new(script_url),
            roster_notice,
        }
    }
}
