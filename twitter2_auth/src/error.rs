use std::{error, fmt};

use crate::auth::Scheme;

/// The error type returned by the signers and by [`AuthContext`](crate::AuthContext)
/// construction.
///
/// Errors produced while handling a request carry the [`Scheme`] of the signer that produced
/// them, so callers can always tell whether the failed attempt used OAuth 1.0a or OAuth 2.0.
#[derive(Debug)]
pub struct Error {
    repr: Box<ErrorRepr>,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.repr.kind
    }

    /// The authentication scheme of the signer which produced this error, or `None` if the error
    /// happened before any signer was involved (for example, invalid configuration).
    pub fn scheme(&self) -> Option<Scheme> {
        self.repr.scheme
    }

    /// Returns `true` if the request failed because it exceeded its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self.repr.kind, ErrorKind::Timeout(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr.scheme {
            Some(scheme) => write!(f, "{} request failed: {}", scheme, self.repr.kind),
            None => fmt::Display::fmt(&self.repr.kind, f),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.repr.kind)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        ErrorRepr {
            kind: ErrorKind::Config(err),
            scheme: None,
        }
        .boxed()
    }
}

#[derive(Debug)]
pub(crate) struct ErrorRepr {
    pub kind: ErrorKind,
    pub scheme: Option<Scheme>,
}

impl ErrorRepr {
    pub(crate) fn boxed(self) -> Error {
        Error { repr: Box::new(self) }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ErrorKind {
    #[error("invalid configuration: {0}")]
    Config(#[source] ConfigError),
    #[error("failed to build the HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("the Authorization header could not be encoded as a header value")]
    BadAuthHeader,
    #[error("failed to build the request: {0}")]
    RequestBuild(#[source] reqwest::Error),
    #[error("the request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("transfer failed: {0}")]
    Transfer(#[source] reqwest::Error),
}

/// Errors caused by invalid credentials or configuration. These are always reported before any
/// request is made.
#[derive(thiserror::Error, Clone, PartialEq, Eq, Debug)]
pub enum ConfigError {
    #[error("the bearer token is empty")]
    EmptyBearerToken,
    #[error("the OAuth 1.0a credential `{0}` is empty")]
    EmptyCredential(&'static str),
    #[error("some OAuth 1.0a credentials were provided but `{0}` is missing")]
    PartialOAuthTokens(&'static str),
    #[error("the environment variable `{0}` is not set")]
    MissingVar(&'static str),
    #[error("`{var}` is not a whole number of seconds")]
    InvalidTimeout { var: &'static str },
    #[error("unknown user context `{0}`")]
    UnknownUserContext(Box<str>),
}
