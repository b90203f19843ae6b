//! # clientdesk-server
//!
//! HTTP surface for Clientdesk: a token-authenticated JSON API over
//! ownership-scoped client records.
//!
//! Requests flow extractor → handler → [`pipeline::ClientPipeline`].
//! Handlers stay thin: they validate the payload shape and delegate every
//! decision (authorization, uniqueness, audit, side effects) to the
//! pipeline, then project the result through [`api_types::ClientResponse`].

pub mod api_types;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod validate;

pub use error::ApiError;
pub use pipeline::ClientPipeline;
pub use state::AppState;
