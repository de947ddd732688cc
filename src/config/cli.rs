use crate::config::toml_config::TomlConfig;
use crate::config::SourceConfig;
use crate::core::contact::submit_contact;
use crate::core::resolver::ContentResolver;
use crate::domain::model::ContactSubmission;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "mevoq-content")]
#[command(about = "Resolve Mevoq site content from the live source, falling back to fixtures")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Live source base URL")]
    pub url: Option<String>,

    #[arg(long, global = true, help = "Live source anon key")]
    pub anon_key: Option<String>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List services
    Services,
    /// Show one service by slug
    Service { slug: String },
    /// List team members
    Team,
    /// List testimonials
    Testimonials,
    /// List blog posts, newest first
    Posts {
        #[arg(long)]
        include_drafts: bool,
    },
    /// Show one published blog post by slug
    Post { slug: String },
    /// Show headline stats
    Stats,
    /// Submit a contact enquiry
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
}

impl CliConfig {
    pub fn file_config(&self) -> Result<TomlConfig> {
        match &self.config {
            Some(path) => TomlConfig::from_file(path),
            None => Ok(TomlConfig::default()),
        }
    }

    /// Environment, then the TOML file, then command-line flags.
    pub fn source_config(&self, file: &TomlConfig) -> SourceConfig {
        let flags = SourceConfig {
            url: self.url.clone(),
            anon_key: self.anon_key.clone(),
            timeout_seconds: self.timeout_seconds,
        };

        SourceConfig::from_env()
            .overlay(file.source.clone())
            .overlay(flags)
    }
}

/// Executes one command against a fresh request scope and returns its JSON output.
pub async fn run(command: &Command, resolver: &ContentResolver) -> Result<serde_json::Value> {
    let scope = resolver.begin_request();

    let output = match command {
        Command::Services => serde_json::to_value(scope.list_services().await)?,
        Command::Service { slug } => serde_json::to_value(scope.get_service(slug).await)?,
        Command::Team => serde_json::to_value(scope.list_team().await)?,
        Command::Testimonials => serde_json::to_value(scope.list_testimonials().await)?,
        Command::Posts { include_drafts } => {
            serde_json::to_value(scope.list_blog_posts(!include_drafts).await)?
        }
        Command::Post { slug } => serde_json::to_value(scope.get_blog_post(slug).await)?,
        Command::Stats => serde_json::to_value(scope.stats())?,
        Command::Contact {
            name,
            email,
            message,
            company,
            phone,
        } => {
            let submission = ContactSubmission {
                name: name.clone(),
                email: email.clone(),
                message: message.clone(),
                company: company.clone(),
                phone: phone.clone(),
                lead_type: None,
            };
            serde_json::to_value(submit_contact(resolver, &submission).await?)?
        }
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures::FixtureSet;

    fn static_resolver() -> ContentResolver {
        ContentResolver::static_only(FixtureSet::embedded().unwrap())
    }

    #[test]
    fn test_parse_subcommand_with_global_flags() {
        let cli = CliConfig::parse_from([
            "mevoq-content",
            "posts",
            "--include-drafts",
            "--url",
            "http://localhost:54321",
            "--verbose",
        ]);

        assert!(cli.verbose);
        assert_eq!(cli.url.as_deref(), Some("http://localhost:54321"));
        assert!(matches!(cli.command, Command::Posts { include_drafts: true }));
    }

    #[test]
    fn test_flags_override_file() {
        let cli = CliConfig::parse_from(["mevoq-content", "--anon-key", "flag-key", "stats"]);
        let file = TomlConfig::from_toml_str(
            r#"
[source]
url = "https://file.supabase.co"
anon_key = "file-key"
"#,
        )
        .unwrap();

        let source = cli.source_config(&file);
        assert_eq!(source.anon_key.as_deref(), Some("flag-key"));
        assert!(source.url.is_some());
    }

    #[test]
    fn test_timeout_flag_wins_even_at_default() {
        let cli = CliConfig::parse_from(["mevoq-content", "--timeout-seconds", "10", "stats"]);
        let file = TomlConfig::from_toml_str(
            r#"
[source]
timeout_seconds = 30
"#,
        )
        .unwrap();

        assert_eq!(cli.source_config(&file).timeout(), 10);

        let no_flag = CliConfig::parse_from(["mevoq-content", "stats"]);
        assert_eq!(no_flag.source_config(&file).timeout(), 30);
    }

    #[tokio::test]
    async fn test_run_service_lookup() {
        let resolver = static_resolver();

        let output = run(
            &Command::Service {
                slug: "quality-compliance".to_string(),
            },
            &resolver,
        )
        .await
        .unwrap();
        assert_eq!(output["title"], "Quality & Compliance");

        let missing = run(
            &Command::Post {
                slug: "nonexistent-slug".to_string(),
            },
            &resolver,
        )
        .await
        .unwrap();
        assert!(missing.is_null());
    }

    #[tokio::test]
    async fn test_run_stats_and_contact() {
        let resolver = static_resolver();

        let stats = run(&Command::Stats, &resolver).await.unwrap();
        assert_eq!(stats["years_experience"], 11);

        let receipt = run(
            &Command::Contact {
                name: "Jane".to_string(),
                email: "jane@example.com".to_string(),
                message: "Hello".to_string(),
                company: None,
                phone: None,
            },
            &resolver,
        )
        .await
        .unwrap();
        assert_eq!(receipt["mock"], true);
    }
}
