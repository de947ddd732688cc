use crate::adapters::postgrest::PostgrestSource;
use crate::config::SourceConfig;
use crate::core::fixtures::FixtureSet;
use crate::core::query::{Direction, TableQuery};
use crate::domain::model::{BlogPost, Service, Stats, TeamMember, Testimonial};
use crate::domain::ports::LiveSource;
use crate::utils::error::{ContentError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

/// Reads site content from the live source and falls back to fixtures when the
/// source is unconfigured, errors, or returns no rows. Read operations never fail.
pub struct ContentResolver {
    source: Option<Arc<dyn LiveSource>>,
    fixtures: Arc<FixtureSet>,
}

impl ContentResolver {
    pub fn new(source: Option<Arc<dyn LiveSource>>, fixtures: FixtureSet) -> Self {
        Self {
            source,
            fixtures: Arc::new(fixtures),
        }
    }

    pub fn static_only(fixtures: FixtureSet) -> Self {
        Self::new(None, fixtures)
    }

    /// Builds the resolver once per process. Missing credentials select static-site mode.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let fixtures = FixtureSet::embedded()?;
        let source: Option<Arc<dyn LiveSource>> = match config.credentials() {
            Some((url, anon_key)) => {
                tracing::info!("Live content source configured at {}", url);
                let live = PostgrestSource::new(url, anon_key, config.timeout())?;
                Some(Arc::new(live) as Arc<dyn LiveSource>)
            }
            None => {
                tracing::info!("No live content source configured, serving fixtures");
                None
            }
        };
        Ok(Self::new(source, fixtures))
    }

    pub fn is_live(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> Option<Arc<dyn LiveSource>> {
        self.source.clone()
    }

    pub fn fixtures(&self) -> &FixtureSet {
        &self.fixtures
    }

    /// Opens a memo scope for one incoming request; drop it when the request ends.
    pub fn begin_request(&self) -> RequestScope<'_> {
        RequestScope {
            resolver: self,
            memo: Mutex::new(HashMap::new()),
        }
    }

    pub fn stats(&self) -> Stats {
        self.fixtures.stats
    }

    pub async fn list_services(&self) -> Vec<Service> {
        self.live_rows("services", TableQuery::from("services"))
            .await
            .unwrap_or_else(|| self.fixtures.services.clone())
    }

    pub async fn get_service(&self, slug: &str) -> Option<Service> {
        let query = TableQuery::from("services").eq("slug", slug).single();
        match self.live_rows::<Service>("service", query).await {
            Some(rows) => rows.into_iter().next(),
            None => self.fixtures.service(slug),
        }
    }

    pub async fn list_team(&self) -> Vec<TeamMember> {
        self.live_rows("team", TableQuery::from("team"))
            .await
            .unwrap_or_else(|| self.fixtures.team.clone())
    }

    pub async fn list_testimonials(&self) -> Vec<Testimonial> {
        self.live_rows("testimonials", TableQuery::from("testimonials"))
            .await
            .unwrap_or_else(|| self.fixtures.testimonials.clone())
    }

    pub async fn list_blog_posts(&self, published_only: bool) -> Vec<BlogPost> {
        let mut query = TableQuery::from("blog_posts").order("created_at", Direction::Descending);
        if published_only {
            query = query.eq("published", true);
        }
        self.live_rows("blog posts", query)
            .await
            .unwrap_or_else(|| self.fixtures.blog_posts(published_only))
    }

    pub async fn get_blog_post(&self, slug: &str) -> Option<BlogPost> {
        let query = TableQuery::from("blog_posts")
            .eq("slug", slug)
            .eq("published", true)
            .single();
        match self.live_rows::<BlogPost>("blog post", query).await {
            Some(rows) => rows.into_iter().next(),
            None => self.fixtures.blog_post(slug),
        }
    }

    /// `Some` only for a successful, non-empty, decodable live read.
    async fn live_rows<T: DeserializeOwned>(&self, label: &str, query: TableQuery) -> Option<Vec<T>> {
        let Some(source) = &self.source else {
            tracing::debug!("Static-site mode, using fixture {}", label);
            return None;
        };

        let result = source
            .select(&query)
            .await
            .and_then(|rows| decode_rows::<T>(&query.table, rows));

        match result {
            Ok(rows) if !rows.is_empty() => {
                tracing::info!("✅ Using live {} ({} rows)", label, rows.len());
                Some(rows)
            }
            Ok(_) => {
                tracing::debug!("Live {} returned no rows, using fixtures", label);
                None
            }
            Err(e) => {
                tracing::warn!("⚠️ Live source unavailable, using fixture {}: {}", label, e);
                None
            }
        }
    }
}

fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<serde_json::Value>) -> Result<Vec<T>> {
    serde_json::from_value(serde_json::Value::Array(rows)).map_err(|e| ContentError::DecodeError {
        table: table.to_string(),
        message: e.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoKey {
    operation: &'static str,
    args: String,
}

impl MemoKey {
    pub fn new<A: Serialize>(operation: &'static str, args: &A) -> Self {
        Self {
            operation,
            args: serde_json::to_string(args).unwrap_or_default(),
        }
    }
}

/// Per-request view of the resolver. Each (operation, arguments) pair is
/// resolved at most once while the scope lives.
pub struct RequestScope<'a> {
    resolver: &'a ContentResolver,
    memo: Mutex<HashMap<MemoKey, Arc<dyn Any + Send + Sync>>>,
}

impl<'a> RequestScope<'a> {
    pub async fn list_services(&self) -> Vec<Service> {
        self.memoized(MemoKey::new("list_services", &()), || {
            self.resolver.list_services()
        })
        .await
    }

    pub async fn get_service(&self, slug: &str) -> Option<Service> {
        self.memoized(MemoKey::new("get_service", &slug), || {
            self.resolver.get_service(slug)
        })
        .await
    }

    pub async fn list_team(&self) -> Vec<TeamMember> {
        self.memoized(MemoKey::new("list_team", &()), || self.resolver.list_team())
            .await
    }

    pub async fn list_testimonials(&self) -> Vec<Testimonial> {
        self.memoized(MemoKey::new("list_testimonials", &()), || {
            self.resolver.list_testimonials()
        })
        .await
    }

    pub async fn list_blog_posts(&self, published_only: bool) -> Vec<BlogPost> {
        self.memoized(MemoKey::new("list_blog_posts", &published_only), || {
            self.resolver.list_blog_posts(published_only)
        })
        .await
    }

    pub async fn get_blog_post(&self, slug: &str) -> Option<BlogPost> {
        self.memoized(MemoKey::new("get_blog_post", &slug), || {
            self.resolver.get_blog_post(slug)
        })
        .await
    }

    pub fn stats(&self) -> Stats {
        self.resolver.stats()
    }

    pub fn memoized_len(&self) -> usize {
        self.lock().len()
    }

    async fn memoized<T, F, Fut>(&self, key: MemoKey, compute: F) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if let Some(hit) = self.lookup::<T>(&key) {
            return hit;
        }

        let value = compute().await;
        self.lock().insert(key, Arc::new(value.clone()));
        value
    }

    fn lookup<T: Clone + 'static>(&self, key: &MemoKey) -> Option<T> {
        self.lock()
            .get(key)
            .and_then(|entry| entry.downcast_ref::<T>())
            .cloned()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<MemoKey, Arc<dyn Any + Send + Sync>>> {
        match self.memo.lock() {
            Ok(guard) => guard,
            Err(poison) => poison.into_inner(),
        }
    }
}
