//! Bearer-token fetch with one-shot recovery from token expiry.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::{debug, warn};

use super::http::HttpClients;
use super::request::{Attempt, RequestOptions};
use crate::auth::{ReissueOutcome, Session};
use crate::error::Result;

/// Executes requests on behalf of a [`Session`].
///
/// A 401 on the first attempt triggers the session's single-flight reissue.
/// On success the request is resent once with the new token and that
/// response is returned whatever its status. On failure the original 401 is
/// returned; unless the failure is the "no session" code, a
/// [`SessionEvent::SessionExpired`](crate::events::SessionEvent) is published
/// first. Any status other than 401 passes through untouched.
#[derive(Clone)]
pub struct AuthFetch {
    clients: HttpClients,
    session: Session,
}

impl AuthFetch {
    pub fn new(clients: HttpClients, session: Session) -> Self {
        Self { clients, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn clients(&self) -> &HttpClients {
        &self.clients
    }

    pub async fn fetch(&self, url: &str, options: RequestOptions) -> Result<reqwest::Response> {
        let mut headers = options.headers.clone();
        if options.body.is_some() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if !options.is_anonymous() && !headers.contains_key(AUTHORIZATION) {
            if let Some(value) = self.session.token().and_then(|t| t.header_value()) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        let resp = self.send(url, &options, headers.clone()).await?;
        if resp.status() != StatusCode::UNAUTHORIZED || options.is_anonymous() {
            return Ok(resp);
        }
        if options.attempt() == Attempt::Retrying {
            debug!(url, "401 on retried request, giving up");
            return Ok(resp);
        }

        debug!(url, "401 received, reissuing access token");
        let token = match self.session.reissue().await {
            ReissueOutcome::Issued(token) => token,
            failed if failed.is_unauthenticated() => {
                debug!(url, "no session to recover");
                return Ok(resp);
            }
            failed => {
                warn!(url, code = ?failed.code(), "token reissue failed, session expired");
                self.session.events().emit_session_expired();
                return Ok(resp);
            }
        };
        let Some(value) = token.header_value() else {
            warn!(url, "reissued token is not a valid header value");
            self.session.events().emit_session_expired();
            return Ok(resp);
        };
        headers.insert(AUTHORIZATION, value);

        let retry = options.retried();
        self.send(url, &retry, headers).await
    }

    async fn send(
        &self,
        url: &str,
        options: &RequestOptions,
        headers: HeaderMap,
    ) -> Result<reqwest::Response> {
        let client = self.clients.for_credentials(options.credentials, url);
        let mut request = client
            .request(options.method.clone(), url)
            .headers(headers);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }
        let resp = request.send().await?;
        debug!(
            method = %options.method,
            url,
            status = resp.status().as_u16(),
            attempt = ?options.attempt(),
            "request completed"
        );
        Ok(resp)
    }
}
