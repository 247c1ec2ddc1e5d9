use serde::{Deserialize, Serialize};

/// Credentials for one Xtream server. Immutable value object, passed by
/// reference into every client and generator call. Validation is left to
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCredential {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl ServerCredential {
    pub fn new(url: &str, username: &str, password: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

/// A persisted server record as the record store hands it out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredServer {
    pub id: u32,
    pub url: String,
    pub username: String,
    pub password: String,
    pub created_at: i64,
}

impl StoredServer {
    pub fn credential(&self) -> ServerCredential {
        ServerCredential::new(&self.url, &self.username, &self.password)
    }
}
