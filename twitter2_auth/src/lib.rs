pub mod auth;
pub mod body;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
mod form;
pub mod signer;
pub mod user_context;

pub use auth::{BearerToken, OAuth10a, OAuthTokens, Scheme};
pub use body::RequestBody;
pub use client::{AsyncClient, OAuth1Client, OAuth2Client};
pub use config::{AuthConfig, ClientOptions, RequestDefaults, DEFAULT_TIMEOUT};
pub use context::AuthContext;
pub use error::{ConfigError, Error, ErrorKind};
pub use signer::Signer;
pub use user_context::UserContext;

pub use reqwest::{header::HeaderMap, Response, Url};
