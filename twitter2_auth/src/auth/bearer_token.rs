use std::{borrow::Cow, fmt};

use crate::error::ConfigError;

use super::{Auth, Scheme};

/// An OAuth 2.0 bearer token, sent as-is in the `Authorization` header of every request. Unlike
/// [`OAuth10a`](crate::auth::oauth10a::OAuth10a) credentials, requests are not individually
/// signed.
///
/// For more information about bearer tokens, see the
/// [Twitter documentation](https://developer.twitter.com/en/docs/authentication/oauth-2-0/bearer-tokens).
#[derive(Clone)]
pub struct BearerToken {
    auth_header: Box<str>,
}

impl BearerToken {
    /// Returns a new `BearerToken`, or an error if the given token is empty. The token is not
    /// otherwise validated; the API is the judge of whether it is acceptable.
    pub fn new<S>(token: S) -> Result<Self, ConfigError>
    where
        S: AsRef<str>,
    {
        let bearer_token = token.as_ref();

        if bearer_token.is_empty() {
            return Err(ConfigError::EmptyBearerToken);
        }

        // Create the Authorization header ahead-of-time, since it will be the same for every
        // request using this `BearerToken`.
        let auth_header = {
            const PREFIX: &str = "Bearer ";
            let mut buf = String::with_capacity(PREFIX.len() + bearer_token.len());
            buf.push_str(PREFIX);
            buf.push_str(bearer_token);
            buf.into_boxed_str()
        };

        Ok(Self { auth_header })
    }
}

impl Auth for BearerToken {
    const SCHEME: Scheme = Scheme::OAuth2;

    fn auth_header(&self, _request: &reqwest::Request) -> Cow<'_, str> {
        Cow::Borrowed(&self.auth_header)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken").finish_non_exhaustive()
    }
}
