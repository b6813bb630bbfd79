use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Method, Response, Url};

use crate::{auth::Auth, body::RequestBody, client::AsyncClient, error::Error};

/// Authenticates and sends HTTP requests. Implementations receive every argument exactly as the
/// caller of [`AuthContext`](crate::AuthContext) supplied it, apart from the timeout, which has
/// already had the default substituted if the caller left it unspecified.
///
/// Implementations are responsible for enforcing `timeout`.
#[async_trait]
pub trait Signer: Send + Sync {
    async fn get(&self, uri: Url, timeout: Duration) -> Result<Response, Error>;

    async fn post(
        &self,
        uri: Url,
        headers: HeaderMap,
        body: RequestBody,
        timeout: Duration,
    ) -> Result<Response, Error>;

    async fn put(
        &self,
        uri: Url,
        headers: HeaderMap,
        body: RequestBody,
        timeout: Duration,
    ) -> Result<Response, Error>;

    async fn delete(&self, uri: Url, timeout: Duration) -> Result<Response, Error>;

    /// Sends a request built by the caller, for example one with a streamed body. The response
    /// body is not read, so it can be consumed incrementally with
    /// [`Response::chunk`](reqwest::Response::chunk).
    async fn send(&self, request: reqwest::Request, timeout: Duration)
        -> Result<Response, Error>;
}

#[async_trait]
impl<A: Auth> Signer for AsyncClient<A> {
    async fn get(&self, uri: Url, timeout: Duration) -> Result<Response, Error> {
        let request =
            self.build_request(Method::GET, uri, HeaderMap::new(), RequestBody::Empty)?;
        self.execute(request, timeout).await
    }

    async fn post(
        &self,
        uri: Url,
        headers: HeaderMap,
        body: RequestBody,
        timeout: Duration,
    ) -> Result<Response, Error>
    {
        let request = self.build_request(Method::POST, uri, headers, body)?;
        self.execute(request, timeout).await
    }

    async fn put(
        &self,
        uri: Url,
        headers: HeaderMap,
        body: RequestBody,
        timeout: Duration,
    ) -> Result<Response, Error>
    {
        let request = self.build_request(Method::PUT, uri, headers, body)?;
        self.execute(request, timeout).await
    }

    async fn delete(&self, uri: Url, timeout: Duration) -> Result<Response, Error> {
        let request =
            self.build_request(Method::DELETE, uri, HeaderMap::new(), RequestBody::Empty)?;
        self.execute(request, timeout).await
    }

    async fn send(&self, request: reqwest::Request, timeout: Duration)
        -> Result<Response, Error>
    {
        self.execute(request, timeout).await
    }
}
