//! Authenticated content management for the admin dashboard.
//!
//! Every operation resolves the caller's session first and then talks to the
//! live source with the caller's own token, so row-level policies apply. A
//! successful mutation reports which rendered pages are now stale.

use crate::adapters::{PostgrestSource, SupabaseAuth};
use crate::config::SourceConfig;
use crate::core::query::{Direction, TableQuery};
use crate::domain::model::{AdminUser, BlogPost, ContactMessage};
use crate::domain::ports::{Authenticator, LiveSource};
use crate::utils::error::{ContentError, Result};
use crate::utils::validation::{require_fields, split_list};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Blog,
    Services,
    Team,
    Testimonials,
}

impl Section {
    pub fn table(self) -> &'static str {
        match self {
            Self::Blog => "blog_posts",
            Self::Services => "services",
            Self::Team => "team",
            Self::Testimonials => "testimonials",
        }
    }

    pub fn admin_path(self) -> &'static str {
        match self {
            Self::Blog => "/admin/blog",
            Self::Services => "/admin/services",
            Self::Team => "/admin/team",
            Self::Testimonials => "/admin/testimonials",
        }
    }

    /// Public page that renders this section's content.
    pub fn public_path(self) -> &'static str {
        match self {
            Self::Blog => "/blog",
            Self::Services => "/services",
            Self::Team => "/about",
            Self::Testimonials => "/",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Blog => "Post",
            Self::Services => "Service",
            Self::Team => "Member",
            Self::Testimonials => "Testimonial",
        }
    }
}

/// Pages to re-render after a mutation, and where the admin UI goes next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminOutcome {
    pub revalidate: Vec<String>,
    pub redirect: Option<String>,
}

impl AdminOutcome {
    fn for_section(section: Section, detail: Option<String>, redirect: bool) -> Self {
        let mut revalidate = vec![
            section.admin_path().to_string(),
            section.public_path().to_string(),
        ];
        revalidate.extend(detail);
        Self {
            revalidate,
            redirect: redirect.then(|| section.admin_path().to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    pub posts: u64,
    pub services: u64,
    pub messages: u64,
}

// Admin forms arrive as loose text fields; absent and blank are both possible.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogPostForm {
    pub id: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub featured_image: Option<String>,
    pub published: Option<String>,
    /// Comma separated.
    pub tags: Option<String>,
}

impl BlogPostForm {
    fn is_published(&self) -> bool {
        self.published.as_deref() == Some("true")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceForm {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub case_study_snippet: Option<String>,
    /// One feature per line.
    pub features: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamMemberForm {
    pub id: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    /// One area per line.
    pub expertise: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestimonialForm {
    pub id: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub content: Option<String>,
    pub avatar_url: Option<String>,
}

pub struct ContentAdmin {
    source: Arc<dyn LiveSource>,
    auth: Arc<dyn Authenticator>,
}

impl ContentAdmin {
    pub fn new(source: Arc<dyn LiveSource>, auth: Arc<dyn Authenticator>) -> Self {
        Self { source, auth }
    }

    /// Admin writes need a live source; static-site mode has nothing to manage.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let (url, anon_key) = config.credentials().ok_or(ContentError::SourceUnavailable)?;
        Ok(Self::new(
            Arc::new(PostgrestSource::new(url, anon_key, config.timeout())?),
            Arc::new(SupabaseAuth::new(url, anon_key, config.timeout())?),
        ))
    }

    async fn authorize(&self, access_token: &str) -> Result<(AdminUser, Box<dyn LiveSource>)> {
        match self.auth.current_user(access_token).await? {
            Some(user) => Ok((user, self.source.with_access_token(access_token))),
            None => {
                tracing::warn!("Rejected admin request without a valid session");
                Err(ContentError::Unauthorized)
            }
        }
    }

    pub async fn create_post(&self, access_token: &str, form: &BlogPostForm) -> Result<AdminOutcome> {
        let (user, source) = self.authorize(access_token).await?;
        require_fields(
            &[form.title.as_deref(), form.slug.as_deref(), form.content.as_deref()],
            "Missing required fields",
        )?;

        let now = Utc::now().to_rfc3339();
        let published = form.is_published();
        let published_at = published.then(|| now.clone());
        let row = json!({
            "id": Uuid::new_v4().to_string(),
            "title": form.title,
            "slug": form.slug,
            "excerpt": form.excerpt,
            "content": form.content,
            "category": form.category,
            "featured_image": form.featured_image,
            "published": published,
            "tags": split_list(form.tags.as_deref(), ','),
            "author": user.email,
            "created_at": now,
            "published_at": published_at,
            "updated_at": now,
        });

        write_logged(Section::Blog, "Create", source.insert(Section::Blog.table(), row)).await?;
        Ok(AdminOutcome::for_section(Section::Blog, None, true))
    }

    pub async fn update_post(&self, access_token: &str, form: &BlogPostForm) -> Result<AdminOutcome> {
        let (_, source) = self.authorize(access_token).await?;
        let id = required_id(form.id.as_deref(), "Missing post ID")?;

        let patch = changed_fields(json!({
            "title": form.title,
            "slug": form.slug,
            "excerpt": form.excerpt,
            "content": form.content,
            "category": form.category,
            "featured_image": form.featured_image,
            "published": form.is_published(),
            "tags": form.tags.as_deref().map(|tags| split_list(Some(tags), ',')),
            "updated_at": Utc::now().to_rfc3339(),
        }));

        write_logged(Section::Blog, "Update", source.update(Section::Blog.table(), id, patch))
            .await?;
        let detail = form.slug.as_ref().map(|slug| format!("/blog/{}", slug));
        Ok(AdminOutcome::for_section(Section::Blog, detail, true))
    }

    pub async fn create_service(&self, access_token: &str, form: &ServiceForm) -> Result<AdminOutcome> {
        let (_, source) = self.authorize(access_token).await?;
        require_fields(
            &[form.title.as_deref(), form.description.as_deref(), form.icon.as_deref()],
            "Missing required fields",
        )?;

        let row = json!({
            "id": Uuid::new_v4().to_string(),
            "title": form.title,
            "description": form.description,
            "slug": form.slug,
            "content": form.content,
            "featured_image": form.featured_image,
            "icon": form.icon,
            "case_study_snippet": form.case_study_snippet,
            "features": split_list(form.features.as_deref(), '\n'),
            "created_at": Utc::now().to_rfc3339(),
        });

        write_logged(Section::Services, "Create", source.insert(Section::Services.table(), row))
            .await?;
        Ok(AdminOutcome::for_section(Section::Services, None, true))
    }

    pub async fn update_service(&self, access_token: &str, form: &ServiceForm) -> Result<AdminOutcome> {
        let (_, source) = self.authorize(access_token).await?;
        let id = required_id(form.id.as_deref(), "Missing service ID")?;

        let patch = changed_fields(json!({
            "title": form.title,
            "description": form.description,
            "slug": form.slug,
            "content": form.content,
            "featured_image": form.featured_image,
            "icon": form.icon,
            "case_study_snippet": form.case_study_snippet,
            "features": form.features.as_deref().map(|lines| split_list(Some(lines), '\n')),
        }));

        write_logged(
            Section::Services,
            "Update",
            source.update(Section::Services.table(), id, patch),
        )
        .await?;
        let detail = form.slug.as_ref().map(|slug| format!("/services/{}", slug));
        Ok(AdminOutcome::for_section(Section::Services, detail, true))
    }

    pub async fn create_member(&self, access_token: &str, form: &TeamMemberForm) -> Result<AdminOutcome> {
        let (_, source) = self.authorize(access_token).await?;
        require_fields(
            &[form.name.as_deref(), form.role.as_deref()],
            "Name and Role are required.",
        )?;

        let row = json!({
            "id": Uuid::new_v4().to_string(),
            "name": form.name,
            "role": form.role,
            "bio": form.bio,
            "avatar_url": form.avatar_url,
            "expertise": split_list(form.expertise.as_deref(), '\n'),
            "created_at": Utc::now().to_rfc3339(),
        });

        write_logged(Section::Team, "Create", source.insert(Section::Team.table(), row)).await?;
        Ok(AdminOutcome::for_section(Section::Team, None, true))
    }

    pub async fn update_member(&self, access_token: &str, form: &TeamMemberForm) -> Result<AdminOutcome> {
        let (_, source) = self.authorize(access_token).await?;
        let id = required_id(form.id.as_deref(), "Missing member ID")?;

        let patch = changed_fields(json!({
            "name": form.name,
            "role": form.role,
            "bio": form.bio,
            "avatar_url": form.avatar_url,
            "expertise": form.expertise.as_deref().map(|lines| split_list(Some(lines), '\n')),
        }));

        write_logged(Section::Team, "Update", source.update(Section::Team.table(), id, patch))
            .await?;
        Ok(AdminOutcome::for_section(Section::Team, None, true))
    }

    pub async fn create_testimonial(
        &self,
        access_token: &str,
        form: &TestimonialForm,
    ) -> Result<AdminOutcome> {
        let (_, source) = self.authorize(access_token).await?;
        require_fields(
            &[form.name.as_deref(), form.content.as_deref()],
            "Name and Content are required.",
        )?;

        let row = json!({
            "id": Uuid::new_v4().to_string(),
            "name": form.name,
            "role": form.role,
            "company": form.company,
            "content": form.content,
            "avatar_url": form.avatar_url,
            "created_at": Utc::now().to_rfc3339(),
        });

        write_logged(
            Section::Testimonials,
            "Create",
            source.insert(Section::Testimonials.table(), row),
        )
        .await?;
        Ok(AdminOutcome::for_section(Section::Testimonials, None, true))
    }

    pub async fn update_testimonial(
        &self,
        access_token: &str,
        form: &TestimonialForm,
    ) -> Result<AdminOutcome> {
        let (_, source) = self.authorize(access_token).await?;
        let id = required_id(form.id.as_deref(), "Missing testimonial ID")?;

        let patch = changed_fields(json!({
            "name": form.name,
            "role": form.role,
            "company": form.company,
            "content": form.content,
            "avatar_url": form.avatar_url,
        }));

        write_logged(
            Section::Testimonials,
            "Update",
            source.update(Section::Testimonials.table(), id, patch),
        )
        .await?;
        Ok(AdminOutcome::for_section(Section::Testimonials, None, true))
    }

    /// Deletes stay on the list page, so no redirect.
    pub async fn delete(&self, access_token: &str, section: Section, id: &str) -> Result<AdminOutcome> {
        let (_, source) = self.authorize(access_token).await?;
        let id = required_id(Some(id), &format!("Missing {} ID", section.label().to_lowercase()))?;

        write_logged(section, "Delete", source.delete(section.table(), id)).await?;
        Ok(AdminOutcome::for_section(section, None, false))
    }

    pub async fn delete_post(&self, access_token: &str, id: &str) -> Result<AdminOutcome> {
        self.delete(access_token, Section::Blog, id).await
    }

    /// Every post including drafts, most recently edited first.
    pub async fn list_all_posts(&self, access_token: &str) -> Result<Vec<BlogPost>> {
        let (_, source) = self.authorize(access_token).await?;
        let query = TableQuery::from("blog_posts").order("updated_at", Direction::Descending);
        decode(&query.table, source.select(&query).await?)
    }

    pub async fn list_contacts(&self, access_token: &str) -> Result<Vec<ContactMessage>> {
        let (_, source) = self.authorize(access_token).await?;
        let query = TableQuery::from("contacts")
            .select("id, name, email, phone, message, company, lead_type, timestamp")
            .order("timestamp", Direction::Descending);
        decode(&query.table, source.select(&query).await?)
    }

    /// Counts that fail to load show as zero.
    pub async fn dashboard(&self, access_token: &str) -> Result<DashboardCounts> {
        let (_, source) = self.authorize(access_token).await?;
        let (posts, services, messages) = tokio::join!(
            source.count("blog_posts"),
            source.count("services"),
            source.count("contacts"),
        );

        Ok(DashboardCounts {
            posts: count_or_zero("blog_posts", posts),
            services: count_or_zero("services", services),
            messages: count_or_zero("contacts", messages),
        })
    }
}

fn required_id<'a>(id: Option<&'a str>, message: &str) -> Result<&'a str> {
    match id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(ContentError::validation(message)),
    }
}

/// Fields absent from an update form are left as stored.
fn changed_fields(patch: serde_json::Value) -> serde_json::Value {
    match patch {
        serde_json::Value::Object(fields) => {
            serde_json::Value::Object(fields.into_iter().filter(|(_, v)| !v.is_null()).collect())
        }
        other => other,
    }
}

async fn write_logged(
    section: Section,
    action: &str,
    write: impl std::future::Future<Output = Result<()>>,
) -> Result<()> {
    write.await.map_err(|e| {
        tracing::error!("{} {} Error: {}", action, section.label(), e);
        e
    })
}

fn decode<T: serde::de::DeserializeOwned>(table: &str, rows: Vec<serde_json::Value>) -> Result<Vec<T>> {
    serde_json::from_value(serde_json::Value::Array(rows)).map_err(|e| ContentError::DecodeError {
        table: table.to_string(),
        message: e.to_string(),
    })
}

fn count_or_zero(table: &str, count: Result<u64>) -> u64 {
    count.unwrap_or_else(|e| {
        tracing::warn!("Could not count {}: {}", table, e);
        0
    })
}
