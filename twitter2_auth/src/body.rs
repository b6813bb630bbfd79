use reqwest::{
    header::{HeaderValue, CONTENT_TYPE},
    RequestBuilder,
};

use crate::form::{encode_form, FORM_CONTENT_TYPE};

/// The body of a `POST` or `PUT` request. The body is passed to the chosen signer exactly as
/// given; no content type is added unless the body kind implies one and the caller has not set
/// one already.
#[derive(Clone, PartialEq, Default, Debug)]
pub enum RequestBody {
    #[default]
    Empty,
    Text(String),
    Bytes(Vec<u8>),
    /// Form parameters, sent as `application/x-www-form-urlencoded`. Unlike the other body kinds,
    /// form parameters are covered by OAuth 1.0a signatures.
    Form(Vec<(String, String)>),
    Json(serde_json::Value),
}

impl RequestBody {
    pub fn form<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Form(
            params
                .into_iter()
                .map(|(key, val)| (key.into(), val.into()))
                .collect(),
        )
    }

    /// Attaches this body to the request being built. `has_content_type` says whether the caller
    /// supplied their own `Content-Type` header, in which case it is left alone.
    pub(crate) fn attach(self, builder: RequestBuilder, has_content_type: bool) -> RequestBuilder {
        match self {
            Self::Empty => builder,
            Self::Text(text) => builder.body(text),
            Self::Bytes(bytes) => builder.body(bytes),
            Self::Form(params) => {
                let encoded = encode_form(
                    params.iter().map(|(key, val)| (key.as_str(), val.as_str())),
                );
                let builder = if has_content_type {
                    builder
                } else {
                    builder.header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
                };
                builder.body(encoded)
            }
            // `RequestBuilder::json` only sets the content type if there isn't one already.
            Self::Json(json) => builder.json(&json),
        }
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(json: serde_json::Value) -> Self {
        Self::Json(json)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{header::CONTENT_TYPE, Client, Method};
    use serde_json::json;

    use super::RequestBody;

    fn build(body: RequestBody, content_type: Option<&'static str>) -> reqwest::Request {
        let builder = Client::new().request(Method::POST, "https://api.twitter.com/2/tweets");
        let builder = match content_type {
            Some(content_type) => builder.header(CONTENT_TYPE, content_type),
            None => builder,
        };
        body.attach(builder, content_type.is_some()).build().unwrap()
    }

    fn body_bytes(request: &reqwest::Request) -> Option<&[u8]> {
        request.body().and_then(|body| body.as_bytes())
    }

    #[test]
    fn test_form_body() {
        let request = build(RequestBody::form([("status", "hello"), ("lang", "en")]), None);
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(body_bytes(&request), Some(&b"status=hello&lang=en"[..]));
    }

    #[test]
    fn test_caller_content_type_kept() {
        let request = build(
            RequestBody::form([("a", "1")]),
            Some("application/x-www-form-urlencoded; charset=utf-8"),
        );
        let content_types = request.headers().get_all(CONTENT_TYPE).iter().collect::<Vec<_>>();
        assert_eq!(
            content_types,
            ["application/x-www-form-urlencoded; charset=utf-8"]
        );
    }

    #[test]
    fn test_text_and_json_bodies() {
        let request = build(RequestBody::from("payload"), None);
        assert_eq!(body_bytes(&request), Some(&b"payload"[..]));
        assert!(request.headers().get(CONTENT_TYPE).is_none());

        let request = build(RequestBody::from(json!({ "text": "hi" })), None);
        assert_eq!(request.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(body_bytes(&request), Some(&br#"{"text":"hi"}"#[..]));
    }

    #[test]
    fn test_empty_body() {
        let request = build(RequestBody::default(), None);
        assert!(request.body().is_none());
    }
}
