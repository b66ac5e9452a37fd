use moviematch_db::credentials::CredentialStore;
use moviematch_search::SearchOrchestrator;
use sqlx::SqlitePool;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub credentials: CredentialStore,
    pub search: SearchOrchestrator,
}
