use std::{env, fmt, time::Duration};

use serde::{de, Deserialize, Deserializer};

use crate::{auth::OAuthTokens, error::ConfigError};

/// The timeout used for requests which don't specify their own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const BEARER_TOKEN_VAR: &str = "TWITTER_BEARER_TOKEN";
pub const CONSUMER_KEY_VAR: &str = "TWITTER_CONSUMER_KEY";
pub const CONSUMER_SECRET_VAR: &str = "TWITTER_CONSUMER_SECRET";
pub const ACCESS_TOKEN_VAR: &str = "TWITTER_ACCESS_TOKEN";
pub const ACCESS_TOKEN_SECRET_VAR: &str = "TWITTER_ACCESS_TOKEN_SECRET";
pub const TIMEOUT_SECS_VAR: &str = "TWITTER_TIMEOUT_SECS";

/// Values substituted by the [`AuthContext`](crate::AuthContext) when the caller leaves a request
/// parameter unspecified.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
    /// Defaults to [`DEFAULT_TIMEOUT`]. Deserialized from a whole number of seconds named
    /// `timeout_secs`.
    #[serde(rename = "timeout_secs", deserialize_with = "deserialize_secs")]
    pub timeout: Duration,
}

impl RequestDefaults {
    pub fn timeout_or_default(&self, timeout: Option<Duration>) -> Duration {
        timeout.unwrap_or(self.timeout)
    }
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Options for the HTTP client shared by the signers of an `AuthContext`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    pub defaults: RequestDefaults,
    /// Refuse to send requests over plain HTTP. Defaults to `true`.
    pub https_only: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            defaults: RequestDefaults::default(),
            https_only: true,
        }
    }
}

/// Everything needed to build an [`AuthContext`](crate::AuthContext).
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub bearer_token: String,
    #[serde(default)]
    pub oauth_tokens: Option<OAuthTokens>,
    #[serde(default)]
    pub client: ClientOptions,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("oauth_tokens", &self.oauth_tokens)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl AuthConfig {
    /// Reads the configuration from the `TWITTER_*` environment variables. The bearer token is
    /// required; the four OAuth 1.0a credentials must either all be set or all be unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), but looks variables up with the given function.
    pub fn from_vars<F>(mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let bearer_token = lookup(BEARER_TOKEN_VAR)
            .ok_or(ConfigError::MissingVar(BEARER_TOKEN_VAR))?;

        let oauth_vars = [
            CONSUMER_KEY_VAR,
            CONSUMER_SECRET_VAR,
            ACCESS_TOKEN_VAR,
            ACCESS_TOKEN_SECRET_VAR,
        ]
        .map(|name| (name, lookup(name)));

        let oauth_tokens = if oauth_vars.iter().all(|(_, val)| val.is_none()) {
            None
        } else {
            if let Some(&(name, _)) = oauth_vars.iter().find(|(_, val)| val.is_none()) {
                return Err(ConfigError::PartialOAuthTokens(name));
            }
            let [consumer_key, consumer_secret, access_token, access_token_secret] =
                oauth_vars.map(|(_, val)| val.unwrap_or_default());
            Some(OAuthTokens::new(
                consumer_key,
                consumer_secret,
                access_token,
                access_token_secret,
            )?)
        };

        let mut client = ClientOptions::default();
        if let Some(timeout_secs) = lookup(TIMEOUT_SECS_VAR) {
            let timeout_secs = timeout_secs
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|&secs| secs > 0)
                .ok_or(ConfigError::InvalidTimeout { var: TIMEOUT_SECS_VAR })?;
            client.defaults.timeout = Duration::from_secs(timeout_secs);
        }

        Ok(Self {
            bearer_token,
            oauth_tokens,
            client,
        })
    }
}

fn deserialize_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    match u64::deserialize(deserializer)? {
        0 => Err(de::Error::custom("timeout_secs must be at least 1")),
        secs => Ok(Duration::from_secs(secs)),
    }
}
