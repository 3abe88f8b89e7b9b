use serde::Deserialize;

/// Request body for appending a chat exchange.
#[derive(Debug, Deserialize)]
pub struct AppendEntryRequest {
    pub user_message: String,
    pub bot_response: String,
}
