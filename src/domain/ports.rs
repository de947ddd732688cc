use crate::core::query::TableQuery;
use crate::domain::model::AdminUser;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Row-oriented access to the hosted structured-data backend.
#[async_trait]
pub trait LiveSource: Send + Sync {
    /// Runs a select. A `single()` query yields exactly one row or an error.
    async fn select(&self, query: &TableQuery) -> Result<Vec<serde_json::Value>>;
    async fn insert(&self, table: &str, row: serde_json::Value) -> Result<()>;
    async fn update(&self, table: &str, id: &str, patch: serde_json::Value) -> Result<()>;
    async fn delete(&self, table: &str, id: &str) -> Result<()>;
    async fn count(&self, table: &str) -> Result<u64>;

    /// A handle that sends requests on behalf of a signed-in user.
    fn with_access_token(&self, access_token: &str) -> Box<dyn LiveSource>;
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Resolves a session token to its user, or `None` when the session is not valid.
    async fn current_user(&self, access_token: &str) -> Result<Option<AdminUser>>;
}
