use std::fmt;

use serde::Deserialize;

use crate::error::ConfigError;

/// The four [OAuth 1.0a](https://oauth.net/core/1.0a/) credentials needed to sign requests on
/// behalf of a specific user. Either all four are present and non-empty, or there is no
/// `OAuthTokens` at all.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawOAuthTokens")]
pub struct OAuthTokens {
    consumer_key: Box<str>,
    consumer_secret: Box<str>,
    access_token: Box<str>,
    access_token_secret: Box<str>,
}

impl OAuthTokens {
    pub fn new<CK, CS, AT, ATS>(
        consumer_key: CK,
        consumer_secret: CS,
        access_token: AT,
        access_token_secret: ATS,
    ) -> Result<Self, ConfigError>
    where
        CK: Into<Box<str>>,
        CS: Into<Box<str>>,
        AT: Into<Box<str>>,
        ATS: Into<Box<str>>,
    {
        Ok(Self {
            consumer_key: non_empty("consumer_key", consumer_key.into())?,
            consumer_secret: non_empty("consumer_secret", consumer_secret.into())?,
            access_token: non_empty("access_token", access_token.into())?,
            access_token_secret: non_empty("access_token_secret", access_token_secret.into())?,
        })
    }

    /// Also known as the API key.
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Also known as the API key secret.
    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn access_token_secret(&self) -> &str {
        &self.access_token_secret
    }
}

impl fmt::Debug for OAuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthTokens")
            .field("consumer_key", &self.consumer_key)
            .field("access_token", &self.access_token)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct RawOAuthTokens {
    consumer_key: String,
    consumer_secret: String,
    access_token: String,
    access_token_secret: String,
}

impl TryFrom<RawOAuthTokens> for OAuthTokens {
    type Error = ConfigError;

    fn try_from(raw: RawOAuthTokens) -> Result<Self, Self::Error> {
        Self::new(
            raw.consumer_key,
            raw.consumer_secret,
            raw.access_token,
            raw.access_token_secret,
        )
    }
}

fn non_empty(field: &'static str, val: Box<str>) -> Result<Box<str>, ConfigError> {
    if val.is_empty() {
        Err(ConfigError::EmptyCredential(field))
    } else {
        Ok(val)
    }
}
