use crate::domain::model::{BlogPost, Service, Stats, TeamMember, Testimonial};
use crate::utils::error::Result;
use serde::Deserialize;

const EMBEDDED_FIXTURES: &str = include_str!("../../fixtures/content.json");

/// Static content served whenever the live source is absent, failing or empty.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureSet {
    pub services: Vec<Service>,
    pub team: Vec<TeamMember>,
    pub testimonials: Vec<Testimonial>,
    pub blog_posts: Vec<BlogPost>,
    pub stats: Stats,
}

impl FixtureSet {
    /// Decodes the fixture file compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_FIXTURES)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn service(&self, slug: &str) -> Option<Service> {
        self.services
            .iter()
            .find(|s| s.slug.as_deref() == Some(slug))
            .cloned()
    }

    pub fn blog_posts(&self, published_only: bool) -> Vec<BlogPost> {
        self.blog_posts
            .iter()
            .filter(|p| !published_only || p.published)
            .cloned()
            .collect()
    }

    pub fn blog_post(&self, slug: &str) -> Option<BlogPost> {
        self.blog_posts
            .iter()
            .find(|p| p.slug == slug && p.published)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_fixtures_decode() {
        let fixtures = FixtureSet::embedded().unwrap();

        assert_eq!(fixtures.services.len(), 6);
        assert_eq!(fixtures.team.len(), 3);
        assert_eq!(fixtures.testimonials.len(), 3);
        assert_eq!(fixtures.blog_posts.len(), 6);
        assert_eq!(fixtures.stats.countries_served, 15);

        let ids: Vec<&str> = fixtures.services.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
        assert_eq!(fixtures.services[0].title, "Regulatory Strategy & Planning");
    }

    #[test]
    fn test_every_fixture_service_has_a_slug() {
        let fixtures = FixtureSet::embedded().unwrap();
        for service in &fixtures.services {
            let slug = service.slug.as_deref().unwrap();
            assert_eq!(fixtures.service(slug).unwrap().id, service.id);
        }
    }

    #[test]
    fn test_blog_post_lookup() {
        let fixtures = FixtureSet::embedded().unwrap();

        let post = fixtures.blog_post("ectd-4-0-implementation-timeline").unwrap();
        assert_eq!(post.id, "3");
        assert!(fixtures.blog_post("nonexistent-slug").is_none());
    }

    #[test]
    fn test_published_filter_drops_drafts() {
        let mut fixtures = FixtureSet::embedded().unwrap();
        fixtures.blog_posts[0].published = false;
        let slug = fixtures.blog_posts[0].slug.clone();

        let published = fixtures.blog_posts(true);
        assert_eq!(published.len(), 5);
        assert!(published.iter().all(|p| p.published));
        assert_eq!(fixtures.blog_posts(false).len(), 6);
        assert!(fixtures.blog_post(&slug).is_none());
    }

    #[test]
    fn test_from_json_rejects_wrong_shape() {
        assert!(FixtureSet::from_json(r#"{"services": []}"#).is_err());
    }
}
