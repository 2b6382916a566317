use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use strum::{Display, EnumString};

use crate::error::Result;

/// Whether the cookie jar (and with it the refresh cookie) travels with a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Credentials {
    #[default]
    Include,
    /// Cookies only when the URL shares the API origin.
    SameOrigin,
    Omit,
}

/// Position of a request in the one-shot 401 recovery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Attempt {
    #[default]
    Initial,
    /// Already resent with a reissued token; a second 401 is final.
    Retrying,
}

/// Method, headers, body and credentials mode for one request.
///
/// # Example
/// ```
/// use townsquare::client::RequestOptions;
///
/// let options = RequestOptions::post()
///     .json(&serde_json::json!({ "message": "hello" }))
///     .unwrap();
/// assert!(options.body.is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub credentials: Credentials,
    attempt: Attempt,
    anonymous: bool,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter when `value` is present.
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(value)?);
        Ok(self)
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Mark as the recovery resend. A 401 on a retried request is returned
    /// as-is instead of triggering another reissue.
    pub fn retried(mut self) -> Self {
        self.attempt = Attempt::Retrying;
        self
    }

    /// Send without the stored bearer token and without 401 recovery
    /// (login, signup, availability checks).
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    pub fn attempt(&self) -> Attempt {
        self.attempt
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }
}
