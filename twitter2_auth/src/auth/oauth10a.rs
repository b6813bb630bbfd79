use std::{borrow::Cow, fmt};

use base64::{engine::GeneralPurpose, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use libshire::{encoding::url::percent_encode, strings::CappedString};
use rand::{distributions::Alphanumeric, CryptoRng, Rng};
use reqwest::header::CONTENT_TYPE;
use sha1::Sha1;

use crate::form::{FormDecoder, FORM_CONTENT_TYPE};

use super::{Auth, OAuthTokens, Scheme};

const NONCE_LEN: usize = 64;

/// Signs requests with [OAuth 1.0a](https://oauth.net/core/1.0a/) HMAC-SHA1 signatures, so that
/// they are made on behalf of the user who owns the access token.
#[derive(Clone)]
pub struct OAuth10a {
    consumer_key_encoded: Box<str>,
    access_token_encoded: Box<str>,
    signing_key: Box<str>,
}

impl OAuth10a {
    pub fn new(tokens: &OAuthTokens) -> Self {
        let signing_key = {
            // Percent encode both components of the signing key.
            let consumer_secret_encoded = percent_encode(tokens.consumer_secret());
            let access_token_secret_encoded = percent_encode(tokens.access_token_secret());

            // Join the two components into a single string, separated by an ampersand.
            let cap = consumer_secret_encoded.len() + access_token_secret_encoded.len() + 1;
            let mut buf = String::with_capacity(cap);
            buf.push_str(&consumer_secret_encoded);
            buf.push('&');
            buf.push_str(&access_token_secret_encoded);
            buf.into_boxed_str()
        };

        Self {
            consumer_key_encoded: percent_encode(tokens.consumer_key()).into(),
            access_token_encoded: percent_encode(tokens.access_token()).into(),
            signing_key,
        }
    }

    /// The sorted, percent-encoded parameter string: the `oauth_*` protocol parameters together
    /// with every query parameter and, for form-encoded requests, every body parameter. Repeated
    /// pairs are all kept.
    fn parameter_string(
        &self,
        request: &reqwest::Request,
        nonce_encoded: &str,
        timestamp: i64,
    ) -> Box<str>
    {
        let mut params = Vec::<(Cow<str>, Cow<str>)>::new();

        params.push((
            Cow::Borrowed("oauth_consumer_key"),
            Cow::Borrowed(&self.consumer_key_encoded),
        ));
        params.push((Cow::Borrowed("oauth_nonce"), Cow::Borrowed(nonce_encoded)));
        params.push((
            Cow::Borrowed("oauth_signature_method"),
            Cow::Borrowed("HMAC-SHA1"),
        ));
        params.push((
            Cow::Borrowed("oauth_timestamp"),
            Cow::Owned(timestamp.to_string()),
        ));
        params.push((
            Cow::Borrowed("oauth_token"),
            Cow::Borrowed(&self.access_token_encoded),
        ));
        params.push((Cow::Borrowed("oauth_version"), Cow::Borrowed("1.0")));

        for_each_request_param(request, |key, val| {
            params.push((
                Cow::Owned(percent_encode(&*key).into_owned()),
                Cow::Owned(percent_encode(&*val).into_owned()),
            ));
        });

        params.sort_unstable();

        let mut buf = String::new();
        for (key, val) in params {
            if !buf.is_empty() {
                buf.push('&');
            }
            buf.push_str(&key);
            buf.push('=');
            buf.push_str(&val);
        }

        buf.into_boxed_str()
    }

    fn signature_base(
        &self,
        request: &reqwest::Request,
        nonce_encoded: &str,
        timestamp: i64,
    ) -> Box<str>
    {
        let method = request.method().as_str();

        // The base URL excludes the query string, since the query parameters are already part of
        // the parameter string.
        let base_url = {
            let mut url = request.url().clone();
            url.set_query(None);
            url.set_fragment(None);
            url
        };
        let base_url_encoded = percent_encode(base_url.as_str());

        let parameter_string = self.parameter_string(request, nonce_encoded, timestamp);
        let parameter_string_encoded = percent_encode(&*parameter_string);

        let cap = method.len() + base_url_encoded.len() + parameter_string_encoded.len() + 2;
        let mut buf = String::with_capacity(cap);
        buf.push_str(method);
        buf.push('&');
        buf.push_str(&base_url_encoded);
        buf.push('&');
        buf.push_str(&parameter_string_encoded);
        buf.into_boxed_str()
    }

    fn signature(
        &self,
        request: &reqwest::Request,
        nonce_encoded: &str,
        timestamp: i64,
    ) -> Box<str>
    {
        const BASE64_ENGINE: GeneralPurpose = base64::engine::general_purpose::STANDARD;

        let base = self.signature_base(request, nonce_encoded, timestamp);

        // Compute `hmac_sha1(signing_key, base)`.
        let signature_bytes = {
            let mut mac = Hmac::<Sha1>::new_from_slice(self.signing_key.as_bytes())
                .expect("HMAC-SHA1 should accept a key of any length");
            mac.update(base.as_bytes());
            mac.finalize().into_bytes()
        };

        BASE64_ENGINE.encode(signature_bytes).into_boxed_str()
    }
}

impl Auth for OAuth10a {
    const SCHEME: Scheme = Scheme::OAuth1;

    fn auth_header(&self, request: &reqwest::Request) -> Cow<'_, str> {
        // The nonce is generated using only the characters 0..=9, A..=Z and a..=z, so it is
        // already percent-encoded.
        let nonce = gen_alphanumeric_nonce(&mut rand::thread_rng());
        let timestamp = Utc::now().timestamp();
        let signature = self.signature(request, &nonce, timestamp);

        Cow::Owned(format!(
            r#"OAuth oauth_consumer_key="{}", oauth_nonce="{}", oauth_signature="{}", oauth_signature_method="HMAC-SHA1", oauth_timestamp="{}", oauth_token="{}", oauth_version="1.0""#,
            self.consumer_key_encoded,
            nonce,
            percent_encode(&*signature),
            timestamp,
            self.access_token_encoded
        ))
    }
}

impl fmt::Debug for OAuth10a {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth10a")
            .field("consumer_key", &self.consumer_key_encoded)
            .field("access_token", &self.access_token_encoded)
            .finish_non_exhaustive()
    }
}

/// Calls `f` with every decoded query parameter of the request, followed by every decoded body
/// parameter if the body is form-encoded and held in memory. Streamed bodies are never signed.
fn for_each_request_param<'r, F>(request: &'r reqwest::Request, mut f: F)
where
    F: FnMut(Cow<'r, str>, Cow<'r, str>),
{
    if let Some(query) = request.url().query() {
        for (key, val) in FormDecoder::new(query) {
            f(key, val);
        }
    }

    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .map_or(false, |content_type| content_type.starts_with(FORM_CONTENT_TYPE));

    if is_form {
        if let Some(body) = request.body().and_then(|body| body.as_bytes()) {
            for (key, val) in FormDecoder::new(body) {
                f(key, val);
            }
        }
    }
}

fn gen_alphanumeric_nonce<R>(rng: &mut R) -> CappedString<NONCE_LEN>
where
    R: Rng + CryptoRng + ?Sized,
{
    let mut buf = CappedString::<NONCE_LEN>::empty();

    // Sample 64 random alphanumeric characters and push them into the buffer.
    for _ in 0..NONCE_LEN {
        buf.push_truncating(char::from(rng.sample(Alphanumeric)));
    }

    buf
}
