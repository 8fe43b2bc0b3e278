//! Client SDK for the workshop content-sharing API: posts, their contents,
//! comments, rating, favorites and moderation.
//!
//! [`HttpClient`] carries the base URL and optional debug identity, and every
//! domain trait ([`PostsApi`], [`CommentsApi`], [`ModerationApi`]) is
//! implemented on it.

pub mod auth;
pub mod comments;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod moderation;
pub mod posts;
pub mod query;
mod shape;

pub use auth::{AuthState, AuthStore, DebugIdentity};
pub use comments::{CommentFilters, CommentsApi};
pub use config::ClientConfig;
pub use error::{ApiError, AuthStoreError};
pub use http::{HttpClient, RequestOptions};
pub use models::*;
pub use moderation::{ModerationActionFilters, ModerationApi};
pub use posts::{PostFilters, PostsApi};
pub use query::{CommentsQueryBuilder, ModerationActionsQueryBuilder, PostsQueryBuilder, QueryParams};
