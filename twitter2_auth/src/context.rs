use std::time::Duration;

use reqwest::{header::HeaderMap, Response, Url};

use crate::{
    auth::{BearerToken, OAuth10a, OAuthTokens, Scheme},
    body::RequestBody,
    client::{AsyncClient, OAuth1Client, OAuth2Client},
    config::{AuthConfig, ClientOptions, RequestDefaults},
    error::Error,
    signer::Signer,
    user_context::{select_scheme, UserContext},
};

/// Routes each request to either an OAuth 1.0a signer or an OAuth 2.0 bearer token signer.
///
/// A context always has an OAuth 2.0 signer, and has an OAuth 1.0a signer only if OAuth 1.0a
/// credentials were given when it was created. For every request, the OAuth 1.0a signer is used
/// if the request's [`UserContext`] is [`OAuth2OrOAuth1`](UserContext::OAuth2OrOAuth1) and the
/// OAuth 1.0a signer exists; otherwise the OAuth 2.0 signer is used.
///
/// The context never inspects, retries or re-routes a request after handing it to a signer.
/// Whatever the signer returns, success or failure, is returned to the caller unchanged.
#[derive(Clone, Debug)]
pub struct AuthContext<O1 = OAuth1Client, O2 = OAuth2Client> {
    oauth2_client: O2,
    oauth1_client: Option<O1>,
    defaults: RequestDefaults,
}

impl AuthContext {
    /// Returns a new `AuthContext` using the default [`ClientOptions`]. OAuth 1.0a signing is
    /// only available if `oauth_tokens` is given.
    ///
    /// Returns an error if `bearer_token` is empty. No requests are made.
    pub fn new(bearer_token: &str, oauth_tokens: Option<OAuthTokens>) -> Result<Self, Error> {
        Self::with_options(bearer_token, oauth_tokens, &ClientOptions::default())
    }

    pub fn with_options(
        bearer_token: &str,
        oauth_tokens: Option<OAuthTokens>,
        options: &ClientOptions,
    ) -> Result<Self, Error>
    {
        let oauth2_client = AsyncClient::new(BearerToken::new(bearer_token)?, options)?;

        // Both signers share one connection pool.
        let oauth1_client = oauth_tokens
            .map(|tokens| oauth2_client.clone_reauthenticate(OAuth10a::new(&tokens)));

        Ok(Self::from_signers(oauth2_client, oauth1_client, options.defaults))
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, Error> {
        Self::with_options(
            &config.bearer_token,
            config.oauth_tokens.clone(),
            &config.client,
        )
    }
}

impl<O1, O2> AuthContext<O1, O2> {
    /// Returns a new `AuthContext` which routes requests to the given signers.
    pub fn from_signers(oauth2_client: O2, oauth1_client: Option<O1>, defaults: RequestDefaults)
        -> Self
    {
        Self {
            oauth2_client,
            oauth1_client,
            defaults,
        }
    }

    /// Returns `true` if this context has an OAuth 1.0a signer.
    pub fn has_oauth1_client(&self) -> bool {
        self.oauth1_client.is_some()
    }

    pub fn defaults(&self) -> &RequestDefaults {
        &self.defaults
    }

    /// The scheme that a request made with the given preference would be authenticated with.
    pub fn scheme_for(&self, preference: UserContext) -> Scheme {
        select_scheme(preference, self.has_oauth1_client())
    }

    fn select(&self, preference: UserContext) -> Selected<'_, O1, O2> {
        match (self.scheme_for(preference), &self.oauth1_client) {
            (Scheme::OAuth1, Some(oauth1_client)) => Selected::OAuth1(oauth1_client),
            _ => Selected::OAuth2(&self.oauth2_client),
        }
    }
}

impl<O1: Signer, O2: Signer> AuthContext<O1, O2> {
    pub async fn get(
        &self,
        preference: UserContext,
        uri: Url,
        timeout: Option<Duration>,
    ) -> Result<Response, Error>
    {
        let timeout = self.defaults.timeout_or_default(timeout);
        match self.select(preference) {
            Selected::OAuth1(signer) => signer.get(uri, timeout).await,
            Selected::OAuth2(signer) => signer.get(uri, timeout).await,
        }
    }

    pub async fn post(
        &self,
        preference: UserContext,
        uri: Url,
        headers: HeaderMap,
        body: RequestBody,
        timeout: Option<Duration>,
    ) -> Result<Response, Error>
    {
        let timeout = self.defaults.timeout_or_default(timeout);
        match self.select(preference) {
            Selected::OAuth1(signer) => signer.post(uri, headers, body, timeout).await,
            Selected::OAuth2(signer) => signer.post(uri, headers, body, timeout).await,
        }
    }

    pub async fn put(
        &self,
        preference: UserContext,
        uri: Url,
        headers: HeaderMap,
        body: RequestBody,
        timeout: Option<Duration>,
    ) -> Result<Response, Error>
    {
        let timeout = self.defaults.timeout_or_default(timeout);
        match self.select(preference) {
            Selected::OAuth1(signer) => signer.put(uri, headers, body, timeout).await,
            Selected::OAuth2(signer) => signer.put(uri, headers, body, timeout).await,
        }
    }

    pub async fn delete(
        &self,
        preference: UserContext,
        uri: Url,
        timeout: Option<Duration>,
    ) -> Result<Response, Error>
    {
        let timeout = self.defaults.timeout_or_default(timeout);
        match self.select(preference) {
            Selected::OAuth1(signer) => signer.delete(uri, timeout).await,
            Selected::OAuth2(signer) => signer.delete(uri, timeout).await,
        }
    }

    /// Sends a request built by the caller. The response body is left unread, so it can be
    /// streamed with [`Response::chunk`].
    pub async fn send(
        &self,
        preference: UserContext,
        request: reqwest::Request,
        timeout: Option<Duration>,
    ) -> Result<Response, Error>
    {
        let timeout = self.defaults.timeout_or_default(timeout);
        match self.select(preference) {
            Selected::OAuth1(signer) => signer.send(request, timeout).await,
            Selected::OAuth2(signer) => signer.send(request, timeout).await,
        }
    }
}

enum Selected<'a, O1, O2> {
    OAuth1(&'a O1),
    OAuth2(&'a O2),
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use async_trait::async_trait;
    use reqwest::{
        header::{HeaderMap, HeaderValue},
        Method, Response, Url,
    };

    use crate::{
        auth::{OAuthTokens, Scheme},
        body::RequestBody,
        config::{ClientOptions, RequestDefaults},
        error::{ConfigError, Error, ErrorKind},
        signer::Signer,
        user_context::UserContext,
    };

    use super::AuthContext;

    #[derive(Clone, PartialEq, Debug)]
    enum Call {
        Get {
            uri: Url,
            timeout: Duration,
        },
        Post {
            uri: Url,
            headers: HeaderMap,
            body: RequestBody,
            timeout: Duration,
        },
        Put {
            uri: Url,
            headers: HeaderMap,
            body: RequestBody,
            timeout: Duration,
        },
        Delete {
            uri: Url,
            timeout: Duration,
        },
        Send {
            method: Method,
            uri: Url,
            timeout: Duration,
        },
    }

    /// Records every call it receives and responds with its own name as the body.
    #[derive(Clone)]
    struct RecordingSigner {
        name: &'static str,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl RecordingSigner {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                calls: Arc::default(),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) -> Result<Response, Error> {
            self.calls.lock().unwrap().push(call);
            let response = http::Response::builder()
                .status(200)
                .header("x-signer", self.name)
                .body(self.name)
                .unwrap();
            Ok(Response::from(response))
        }
    }

    #[async_trait]
    impl Signer for RecordingSigner {
        async fn get(&self, uri: Url, timeout: Duration) -> Result<Response, Error> {
            self.record(Call::Get { uri, timeout })
        }

        async fn post(
            &self,
            uri: Url,
            headers: HeaderMap,
            body: RequestBody,
            timeout: Duration,
        ) -> Result<Response, Error>
        {
            self.record(Call::Post { uri, headers, body, timeout })
        }

        async fn put(
            &self,
            uri: Url,
            headers: HeaderMap,
            body: RequestBody,
            timeout: Duration,
        ) -> Result<Response, Error>
        {
            self.record(Call::Put { uri, headers, body, timeout })
        }

        async fn delete(&self, uri: Url, timeout: Duration) -> Result<Response, Error> {
            self.record(Call::Delete { uri, timeout })
        }

        async fn send(&self, request: reqwest::Request, timeout: Duration)
            -> Result<Response, Error>
        {
            self.record(Call::Send {
                method: request.method().clone(),
                uri: request.url().clone(),
                timeout,
            })
        }
    }

    type TestContext = AuthContext<RecordingSigner, RecordingSigner>;

    fn recording_context(with_oauth1: bool) -> (TestContext, RecordingSigner, RecordingSigner) {
        let oauth1 = RecordingSigner::new("oauth1");
        let oauth2 = RecordingSigner::new("oauth2");
        let context = AuthContext::from_signers(
            oauth2.clone(),
            with_oauth1.then(|| oauth1.clone()),
            RequestDefaults::default(),
        );
        (context, oauth1, oauth2)
    }

    fn uri() -> Url {
        Url::parse("https://api.twitter.com/2/tweets").unwrap()
    }

    const TEN_SECS: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn test_bearer_only_get() {
        let (context, oauth1, oauth2) = recording_context(false);
        assert!(!context.has_oauth1_client());

        let response = context.get(UserContext::OAuth2OrOAuth1, uri(), None).await.unwrap();

        assert_eq!(response.text().await.unwrap(), "oauth2");
        assert_eq!(oauth2.calls(), [Call::Get { uri: uri(), timeout: TEN_SECS }]);
        assert!(oauth1.calls().is_empty());
    }

    #[tokio::test]
    async fn test_oauth1_preferred_for_post() {
        let (context, oauth1, oauth2) = recording_context(true);
        assert!(context.has_oauth1_client());

        let mut headers = HeaderMap::new();
        headers.insert("x", HeaderValue::from_static("1"));

        let response = context
            .post(
                UserContext::OAuth2OrOAuth1,
                uri(),
                headers.clone(),
                RequestBody::from("payload"),
                None,
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-signer"], "oauth1");
        assert_eq!(
            oauth1.calls(),
            [Call::Post {
                uri: uri(),
                headers,
                body: RequestBody::Text("payload".to_owned()),
                timeout: TEN_SECS,
            }]
        );
        assert!(oauth2.calls().is_empty());
    }

    #[tokio::test]
    async fn test_oauth2_only_delete() {
        let (context, oauth1, oauth2) = recording_context(true);

        context.delete(UserContext::OAuth2Only, uri(), None).await.unwrap();

        assert_eq!(oauth2.calls(), [Call::Delete { uri: uri(), timeout: TEN_SECS }]);
        assert!(oauth1.calls().is_empty());
    }

    #[tokio::test]
    async fn test_send_raw_request() {
        let (context, oauth1, oauth2) = recording_context(true);
        let request = reqwest::Request::new(Method::POST, uri());

        let response = context
            .send(UserContext::OAuth2OrOAuth1, request, Some(Duration::from_secs(5)))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), "oauth1");
        assert_eq!(
            oauth1.calls(),
            [Call::Send {
                method: Method::POST,
                uri: uri(),
                timeout: Duration::from_secs(5),
            }]
        );
        assert!(oauth2.calls().is_empty());
    }

    #[tokio::test]
    async fn test_no_oauth1_ignores_preference() {
        let (context, oauth1, oauth2) = recording_context(false);

        for preference in [UserContext::OAuth2Only, UserContext::OAuth2OrOAuth1] {
            context.get(preference, uri(), None).await.unwrap();
            context
                .put(preference, uri(), HeaderMap::new(), RequestBody::Empty, None)
                .await
                .unwrap();
            context.delete(preference, uri(), None).await.unwrap();
            context
                .send(preference, reqwest::Request::new(Method::GET, uri()), None)
                .await
                .unwrap();
        }

        assert_eq!(oauth2.calls().len(), 8);
        assert!(oauth1.calls().is_empty());
    }

    #[tokio::test]
    async fn test_arguments_passed_through() {
        let (context, oauth1, oauth2) = recording_context(true);

        let mut headers = HeaderMap::new();
        headers.append("x-multi", HeaderValue::from_static("a"));
        headers.append("x-multi", HeaderValue::from_static("b"));
        headers.insert("content-type", HeaderValue::from_static("text/plain"));
        let body = RequestBody::form([("status", "hello world"), ("reply", "")]);
        let timeout = Duration::from_millis(1234);

        context
            .put(UserContext::OAuth2OrOAuth1, uri(), headers.clone(), body.clone(), Some(timeout))
            .await
            .unwrap();
        context
            .post(UserContext::OAuth2Only, uri(), headers.clone(), body.clone(), Some(timeout))
            .await
            .unwrap();

        assert_eq!(
            oauth1.calls(),
            [Call::Put {
                uri: uri(),
                headers: headers.clone(),
                body: body.clone(),
                timeout,
            }]
        );
        assert_eq!(
            oauth2.calls(),
            [Call::Post {
                uri: uri(),
                headers,
                body,
                timeout,
            }]
        );
    }

    #[tokio::test]
    async fn test_alternating_preferences() {
        let (context, oauth1, oauth2) = recording_context(true);

        for i in 0..6 {
            let preference = if i % 2 == 0 {
                UserContext::OAuth2OrOAuth1
            } else {
                UserContext::OAuth2Only
            };
            let expected = if i % 2 == 0 { "oauth1" } else { "oauth2" };

            let response = context.get(preference, uri(), None).await.unwrap();
            assert_eq!(response.headers()["x-signer"], expected);
        }

        assert_eq!(oauth1.calls().len(), 3);
        assert_eq!(oauth2.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_custom_default_timeout() {
        let oauth2 = RecordingSigner::new("oauth2");
        let context = AuthContext::<RecordingSigner, _>::from_signers(
            oauth2.clone(),
            None,
            RequestDefaults {
                timeout: Duration::from_secs(2),
            },
        );

        context.get(UserContext::OAuth2Only, uri(), None).await.unwrap();

        assert_eq!(
            oauth2.calls(),
            [Call::Get { uri: uri(), timeout: Duration::from_secs(2) }]
        );
    }

    #[test]
    fn test_scheme_for() {
        let (context, _, _) = recording_context(true);
        assert_eq!(context.scheme_for(UserContext::OAuth2OrOAuth1), Scheme::OAuth1);
        assert_eq!(context.scheme_for(UserContext::OAuth2Only), Scheme::OAuth2);

        let (context, _, _) = recording_context(false);
        assert_eq!(context.scheme_for(UserContext::OAuth2OrOAuth1), Scheme::OAuth2);
    }

    #[test]
    fn test_new() {
        let context = AuthContext::new("B1", None).unwrap();
        assert!(!context.has_oauth1_client());
        assert_eq!(context.defaults().timeout, Duration::from_secs(10));

        let tokens = OAuthTokens::new("ck", "cs", "at", "ats").unwrap();
        let context = AuthContext::with_options("B1", Some(tokens), &ClientOptions::default())
            .unwrap();
        assert!(context.has_oauth1_client());
    }

    #[test]
    fn test_empty_bearer_token() {
        let err = AuthContext::new("", None).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Config(ConfigError::EmptyBearerToken)));
        assert_eq!(err.scheme(), None);
    }
}
