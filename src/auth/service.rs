use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::AuthError;
use super::reissue::ReissueOutcome;
use super::session::SESSION_EXPIRED_MESSAGE;
use super::token::AccessToken;
use crate::client::{ApiClient, Empty, RequestOptions};
use crate::error::TownError;
use crate::events::ToastVariant;
use crate::resources::towns::Town;
use crate::resources::users::{self, SignupRequest, SignupResponse, UserMe};

pub const LOGIN_PATH: &str = "/api/users/login";
pub const LOGOUT_PATH: &str = "/api/users/logout";
pub const ME_PATH: &str = "/api/users/me";

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Check your email and password.";

/// The signed-in user as the rest of the client sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInUser {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub location_id: Option<i64>,
    pub province: Option<String>,
    pub city: Option<String>,
}

impl SignedInUser {
    pub fn town(&self) -> Option<Town> {
        match (self.location_id, &self.province, &self.city) {
            (Some(id), Some(province), Some(city)) => {
                Some(Town::new(id, province.clone(), city.clone()))
            }
            _ => None,
        }
    }
}

impl From<UserMe> for SignedInUser {
    fn from(me: UserMe) -> Self {
        Self {
            id: me.user_id,
            email: me.email,
            nickname: me.nickname,
            location_id: me.location_id,
            province: me.province,
            city: me.city,
        }
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginPayload {
    user_id: i64,
    email: String,
    nickname: String,
    access_token: Option<String>,
    #[serde(default)]
    location_id: Option<i64>,
    #[serde(default)]
    province: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

impl LoginPayload {
    fn into_user(self) -> SignedInUser {
        SignedInUser {
            id: self.user_id,
            email: self.email,
            nickname: self.nickname,
            location_id: self.location_id,
            province: self.province,
            city: self.city,
        }
    }
}

/// Login, signup, session restore and logout against the backend.
///
/// Credentials go out without a bearer token and never trigger 401 recovery;
/// the refresh cookie set by login lands in the client's cookie jar and is
/// what later reissues use.
///
/// # Example
/// ```no_run
/// use townsquare::auth::AuthService;
/// use townsquare::client::ApiClient;
/// use townsquare::config::ClientConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let auth = AuthService::new(ApiClient::new(ClientConfig::from_env())?);
/// let user = auth.login("neighbor@example.com", "secret").await?;
/// println!("signed in as {}", user.nickname);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Exchange email and password for an access token.
    ///
    /// The profile is read from `/api/users/me` when possible and falls back to
    /// the login payload otherwise. The user's town is selected when the
    /// profile has a complete location.
    pub async fn login(&self, email: &str, password: &str) -> Result<SignedInUser, AuthError> {
        let options = RequestOptions::post()
            .anonymous()
            .json(&LoginRequest { email, password })
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        let payload: LoginPayload = self
            .api
            .fetch_json(LOGIN_PATH, options)
            .await
            .map_err(login_error)?
            .into_data()?;

        let token = payload
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(AccessToken::new)
            .ok_or_else(|| AuthError::InvalidResponse("login returned no access token".into()))?;
        let session = self.api.session();
        session.set_token(token);

        let user = match self.fetch_me().await {
            Some(me) => SignedInUser::from(me),
            None => {
                debug!("profile lookup after login failed, using login payload");
                payload.into_user()
            }
        };
        if let Some(town) = user.town() {
            session.select_town(town);
        }
        info!(user_id = user.id, "logged in");
        Ok(user)
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, AuthError> {
        Ok(users::signup(&self.api, request).await?)
    }

    pub async fn check_email(&self, email: &str) -> Result<bool, AuthError> {
        Ok(users::check_email(&self.api, email).await?)
    }

    pub async fn check_nickname(&self, nickname: &str) -> Result<bool, AuthError> {
        Ok(users::check_nickname(&self.api, nickname).await?)
    }

    /// The current user's profile. Goes through the full 401 recovery path.
    pub async fn me(&self) -> Result<SignedInUser, AuthError> {
        if !self.api.session().is_authenticated() {
            return Err(AuthError::NotLoggedIn);
        }
        Ok(users::me(&self.api).await?.into())
    }

    /// Restore a session at startup.
    ///
    /// A stored token that `/me` accepts is used as is. Otherwise the refresh
    /// cookie is exchanged for a new token. Having no session at all ends
    /// quietly; any other reissue failure raises an error toast. Returns the
    /// restored user, or `None` when no session could be restored.
    pub async fn bootstrap(&self) -> Result<Option<SignedInUser>, AuthError> {
        let session = self.api.session();
        if session.is_authenticated() {
            if let Some(me) = self.fetch_me().await {
                return Ok(Some(self.restore(me)));
            }
            debug!("stored token rejected, falling back to reissue");
        }

        match session.reissue().await {
            ReissueOutcome::Issued(_) => {}
            failed if failed.is_unauthenticated() => {
                debug!("no session to restore");
                return Ok(None);
            }
            failed => {
                warn!(code = ?failed.code(), "session restore failed");
                session
                    .events()
                    .emit_toast(SESSION_EXPIRED_MESSAGE, ToastVariant::Error);
                return Ok(None);
            }
        }

        Ok(self.fetch_me().await.map(|me| self.restore(me)))
    }

    /// Tell the backend to drop the refresh cookie, then forget the token and
    /// the selected town. Backend failures are ignored.
    pub async fn logout(&self) {
        let options = RequestOptions::post().anonymous();
        if let Err(err) = self.api.fetch_json::<Empty>(LOGOUT_PATH, options).await {
            debug!(error = %err, "logout request failed, clearing local session anyway");
        }
        self.api.session().end();
        info!("logged out");
    }

    fn restore(&self, me: UserMe) -> SignedInUser {
        let user = SignedInUser::from(me);
        if let Some(town) = user.town() {
            self.api.session().select_town(town);
        }
        info!(user_id = user.id, "session restored");
        user
    }

    /// `/me` with the stored token and no 401 recovery; any failure is `None`.
    async fn fetch_me(&self) -> Option<UserMe> {
        let options = RequestOptions::get().retried();
        match self.api.fetch_json::<UserMe>(ME_PATH, options).await {
            Ok(resp) => resp.data,
            Err(err) => {
                debug!(error = %err, "profile lookup failed");
                None
            }
        }
    }
}

fn login_error(error: TownError) -> AuthError {
    match error {
        TownError::Api {
            status,
            code,
            message,
            body,
        } => {
            let has_message = body
                .as_ref()
                .and_then(|b| b.get("message"))
                .and_then(|m| m.as_str())
                .is_some();
            AuthError::Rejected {
                status,
                code,
                message: if has_message {
                    message
                } else {
                    LOGIN_FAILED_MESSAGE.to_string()
                },
            }
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_error_without_backend_message_uses_login_text() {
        match login_error(TownError::api(401, "Request failed")) {
            AuthError::Rejected { status, message, .. } => {
                assert_eq!(status, 401);
                assert_eq!(message, LOGIN_FAILED_MESSAGE);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn login_error_keeps_backend_message() {
        let err = TownError::Api {
            status: 400,
            code: Some("USER_004".to_string()),
            message: "wrong password".to_string(),
            body: Some(serde_json::json!({ "message": "wrong password" })),
        };
        assert!(matches!(
            login_error(err),
            AuthError::Rejected { message, .. } if message == "wrong password"
        ));
    }

    #[test]
    fn user_town_needs_all_location_parts() {
        let user = SignedInUser {
            id: 1,
            email: "a@b.c".to_string(),
            nickname: "n".to_string(),
            location_id: Some(4),
            province: Some("Seoul".to_string()),
            city: None,
        };
        assert_eq!(user.town(), None);
    }
}
