pub mod admin;
pub mod contact;
pub mod fixtures;
pub mod query;
pub mod resolver;

pub use crate::domain::model::{BlogPost, Service, Stats, TeamMember, Testimonial};
pub use crate::domain::ports::{Authenticator, LiveSource};
pub use crate::utils::error::Result;
