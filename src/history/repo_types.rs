use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One chat exchange. Rows are append-only; nothing updates them after
/// insertion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QueryLog {
    pub id: i64,
    pub username: Option<String>,
    pub user_message: Option<String>,
    pub bot_response: Option<String>,
    pub timestamp: Option<String>,
}
