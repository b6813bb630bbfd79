pub mod bearer_token;
pub mod oauth10a;
pub mod tokens;

pub use bearer_token::BearerToken;
pub use oauth10a::OAuth10a;
pub use tokens::OAuthTokens;

use std::{borrow::Cow, fmt};

use enumscribe::ScribeStaticStr;

/// The authentication scheme used to authenticate a request.
#[derive(ScribeStaticStr, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Scheme {
    /// [OAuth 1.0a](https://oauth.net/core/1.0a/) user-context request signing.
    #[enumscribe(str = "oauth1")]
    OAuth1,
    /// OAuth 2.0 bearer token.
    #[enumscribe(str = "oauth2")]
    OAuth2,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        self.scribe()
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials which can produce an `Authorization` header for a fully-built request.
pub trait Auth: sealed::Sealed + Send + Sync + 'static {
    const SCHEME: Scheme;

    fn auth_header(&self, request: &reqwest::Request) -> Cow<'_, str>;
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::bearer_token::BearerToken {}
    impl Sealed for super::oauth10a::OAuth10a {}
}
