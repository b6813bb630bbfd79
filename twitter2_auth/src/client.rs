use std::{sync::Arc, time::Duration};

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Method, Url,
};

use crate::{
    auth::{Auth, BearerToken, OAuth10a},
    body::RequestBody,
    config::ClientOptions,
    error::{Error, ErrorKind, ErrorRepr},
};

/// A signer which signs requests with OAuth 1.0a user-context credentials.
pub type OAuth1Client = AsyncClient<OAuth10a>;

/// A signer which authenticates requests with an OAuth 2.0 bearer token.
pub type OAuth2Client = AsyncClient<BearerToken>;

/// An HTTP client which authenticates every request it sends using the credentials `A`.
#[derive(Clone, Debug)]
pub struct AsyncClient<A> {
    http_client: reqwest::Client,
    auth: Arc<A>,
}

impl<A: Auth> AsyncClient<A> {
    pub fn new(auth: A, options: &ClientOptions) -> Result<Self, Error> {
        let http_client = reqwest::Client::builder()
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .https_only(options.https_only)
            .build()
            .map_err(|err| error::<A>(ErrorKind::ClientBuild(err)))?;

        Ok(Self {
            http_client,
            auth: Arc::new(auth),
        })
    }

    /// Create a new client which uses different authentication credentials, but uses the same HTTP
    /// connection pool as this client.
    pub fn clone_reauthenticate<T: Auth>(&self, auth: T) -> AsyncClient<T> {
        AsyncClient {
            http_client: self.http_client.clone(),
            auth: Arc::new(auth),
        }
    }

    pub(crate) fn build_request(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: RequestBody,
    ) -> Result<reqwest::Request, Error>
    {
        let has_content_type = headers.contains_key(CONTENT_TYPE);

        let builder = self.http_client.request(method, url).headers(headers);

        body.attach(builder, has_content_type)
            .build()
            .map_err(|err| error::<A>(ErrorKind::RequestBuild(err)))
    }

    /// Authenticates the given request and sends it. The response is returned as soon as its
    /// headers arrive, whatever its status code; the body is left unread.
    pub(crate) async fn execute(
        &self,
        mut request: reqwest::Request,
        timeout: Duration,
    ) -> Result<reqwest::Response, Error>
    {
        let auth_header = {
            let auth_string = self.auth.auth_header(&request);
            let mut auth_header = HeaderValue::from_str(&auth_string)
                .map_err(|_| error::<A>(ErrorKind::BadAuthHeader))?;
            auth_header.set_sensitive(true);
            auth_header
        };

        request.headers_mut().insert(AUTHORIZATION, auth_header);
        *request.timeout_mut() = Some(timeout);

        tracing::debug!(
            scheme = %A::SCHEME,
            method = %request.method(),
            url = %request.url(),
            ?timeout,
            "sending request"
        );

        let response = self.http_client.execute(request).await.map_err(|err| {
            tracing::debug!(scheme = %A::SCHEME, error = %err, "request failed");
            if err.is_timeout() {
                error::<A>(ErrorKind::Timeout(err))
            } else {
                error::<A>(ErrorKind::Transfer(err))
            }
        })?;

        tracing::debug!(
            scheme = %A::SCHEME,
            status = %response.status(),
            "received response"
        );

        Ok(response)
    }
}

fn error<A: Auth>(kind: ErrorKind) -> Error {
    ErrorRepr {
        kind,
        scheme: Some(A::SCHEME),
    }
    .boxed()
}
