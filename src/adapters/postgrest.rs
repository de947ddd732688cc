use crate::core::query::TableQuery;
use crate::domain::ports::LiveSource;
use crate::utils::error::{ContentError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use url::Url;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// `LiveSource` over a PostgREST endpoint (Supabase `/rest/v1`).
#[derive(Clone)]
pub struct PostgrestSource {
    base_url: String,
    anon_key: String,
    bearer: String,
    client: Client,
}

impl PostgrestSource {
    pub fn new(base_url: &str, anon_key: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            bearer: anon_key.to_string(),
            client,
        })
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        Url::parse(&format!("{}/rest/v1/{}", self.base_url, table)).map_err(|e| {
            ContentError::ConfigError {
                message: format!("Invalid live source URL: {}", e),
            }
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.bearer)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or(body);

        Err(ContentError::QueryError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl LiveSource for PostgrestSource {
    async fn select(&self, query: &TableQuery) -> Result<Vec<serde_json::Value>> {
        let url = self.table_url(&query.table)?;
        tracing::debug!("Querying live source: {} {:?}", url, query.to_params());

        let mut request = self.authorize(self.client.get(url)).query(&query.to_params());
        if query.single {
            request = request.header("Accept", SINGLE_OBJECT);
        }

        let response = Self::check(request.send().await?).await?;
        let body: serde_json::Value = response.json().await?;

        match body {
            serde_json::Value::Array(rows) => Ok(rows),
            serde_json::Value::Null => Ok(Vec::new()),
            row => Ok(vec![row]),
        }
    }

    async fn insert(&self, table: &str, row: serde_json::Value) -> Result<()> {
        let url = self.table_url(table)?;
        tracing::debug!("Inserting into {}", table);

        let request = self
            .authorize(self.client.post(url))
            .header("Prefer", "return=minimal")
            .json(&serde_json::Value::Array(vec![row]));

        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn update(&self, table: &str, id: &str, patch: serde_json::Value) -> Result<()> {
        let url = self.table_url(table)?;
        tracing::debug!("Updating {} id={}", table, id);

        let request = self
            .authorize(self.client.patch(url))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(&patch);

        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<()> {
        let url = self.table_url(table)?;
        tracing::debug!("Deleting from {} id={}", table, id);

        let request = self
            .authorize(self.client.delete(url))
            .query(&[("id", format!("eq.{}", id))]);

        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn count(&self, table: &str) -> Result<u64> {
        let url = self.table_url(table)?;

        let request = self
            .authorize(self.client.get(url))
            .query(&[("select", "id"), ("limit", "1")])
            .header("Prefer", "count=exact");

        let response = Self::check(request.send().await?).await?;
        let range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        parse_content_range_total(&range).ok_or_else(|| ContentError::QueryError {
            status: response.status().as_u16(),
            message: format!("Missing row count in Content-Range '{}'", range),
        })
    }

    fn with_access_token(&self, access_token: &str) -> Box<dyn LiveSource> {
        let mut scoped = self.clone();
        scoped.bearer = access_token.to_string();
        Box::new(scoped)
    }
}

/// `0-9/42` and `*/0` both carry the total after the slash.
fn parse_content_range_total(range: &str) -> Option<u64> {
    range.rsplit_once('/')?.1.trim().parse().ok()
}
