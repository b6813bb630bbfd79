use std::{fmt, str::FromStr};

use enumscribe::{ScribeStaticStr, TryUnscribe};

use crate::{auth::Scheme, error::ConfigError};

/// Which authentication schemes the caller is willing to use for a request. Some endpoints only
/// accept user-context OAuth 1.0a requests while others accept either scheme, so this is chosen
/// per request rather than per client.
#[derive(ScribeStaticStr, TryUnscribe, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum UserContext {
    /// Always authenticate with the OAuth 2.0 bearer token.
    #[enumscribe(str = "oauth2_only")]
    OAuth2Only,
    /// Sign with OAuth 1.0a if OAuth 1.0a credentials are available, otherwise use the OAuth 2.0
    /// bearer token.
    #[enumscribe(str = "oauth2_or_oauth1")]
    OAuth2OrOAuth1,
}

impl UserContext {
    pub fn as_str(self) -> &'static str {
        self.scribe()
    }
}

impl fmt::Display for UserContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserContext {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_unscribe(s).ok_or_else(|| ConfigError::UnknownUserContext(s.into()))
    }
}

/// Decides which scheme handles a request. OAuth 1.0a is chosen whenever the preference allows
/// it and OAuth 1.0a credentials exist, even if the bearer token would also be accepted.
pub fn select_scheme(preference: UserContext, has_oauth1: bool) -> Scheme {
    match (preference, has_oauth1) {
        (UserContext::OAuth2OrOAuth1, true) => Scheme::OAuth1,
        (UserContext::OAuth2OrOAuth1, false) | (UserContext::OAuth2Only, _) => Scheme::OAuth2,
    }
}
