// Adapters layer: concrete implementations of the domain ports over HTTP.

pub mod auth;
pub mod postgrest;

pub use auth::SupabaseAuth;
pub use postgrest::PostgrestSource;
