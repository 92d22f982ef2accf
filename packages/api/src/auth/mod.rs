//! # Authentication flows
//!
//! Each flow validates its input, performs the request, persists the outcome
//! to [`TokenStorage`](store::TokenStorage) and reports it to the
//! [`SessionStore`](store::SessionStore). Sign-in flows invalidate the
//! [`QueryClient`] only after the new tokens are stored, so every refetch
//! carries them. While a flow runs the session's `loading` flag is set; a
//! failure leaves its display message in `error`.
//!
//! | Flow | Endpoint | Session effect |
//! |------|----------|----------------|
//! | [`login`] | `Login` | `set_token` + `set_user` |
//! | [`register`] | `Register` | same as login when the backend returns tokens |
//! | [`forget_password`] | `ForgetPassword` | none |
//! | [`update_profile`] | `UpdateUser` | `set_user` |
//! | [`logout`] | none | `clear_auth`, cache reset |
//! | [`restore_session`] | none | rebuilds the session from storage |

use std::future::Future;

use serde::Deserialize;
use serde_json::{json, Value};
use store::validation;
use store::{SessionStore, User};

use crate::client::{ApiClient, TokenPair};
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::query::QueryClient;
use crate::transport::{FilePart, MultipartForm, RequestBody};

/// Input of the sign-up form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub avatar: Option<FilePart>,
}

impl Registration {
    pub fn validate(&self) -> Result<(), ApiError> {
        validation::require("fullName", &self.full_name)?;
        validation::email(&self.email)?;
        validation::password(&self.password)?;
        validation::password_confirmation(&self.password, &self.confirm_password)?;
        Ok(())
    }

    fn to_form(&self) -> MultipartForm {
        let form = MultipartForm::new()
            .text("FullName", self.full_name.trim())
            .text("Email", self.email.trim())
            .text("Password", self.password.as_str())
            .text("ConfirmPassword", self.confirm_password.as_str());
        match &self.avatar {
            Some(avatar) => form.file("Avatar", avatar.clone()),
            None => form,
        }
    }
}

/// Editable profile fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub avatar: Option<FilePart>,
}

/// Register responses either sign the user in or just confirm the account.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RegisterOutcome {
    Tokens(TokenPair),
    Other(Value),
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    T::deserialize(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Run `flow` with the session's `loading` flag set, recording its error.
async fn tracked<T, F>(session: &SessionStore, flow: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    session.set_error(None);
    session.set_loading(true);
    let result = flow.await;
    session.set_loading(false);
    if let Err(e) = &result {
        session.set_error(Some(e.display_message()));
    }
    result
}

pub async fn login(queries: &QueryClient, email: &str, password: &str) -> Result<User, ApiError> {
    let api = queries.api();
    tracked(api.session(), async {
        validation::email(email)?;
        validation::require("password", password)?;

        let body = RequestBody::Json(json!({ "email": email.trim(), "password": password }));
        let tokens: TokenPair = decode(api.request(&Endpoint::Login, body).await?)?;
        let user = api
            .store_tokens(&tokens.access_token, &tokens.refresh_token)
            .await?;
        queries.invalidate(Endpoint::Login.invalidates());
        tracing::info!("Signed in as {}", user.id);
        Ok(user)
    })
    .await
}

/// Returns the signed-in user when the backend issued tokens, or `None` when
/// the account must still be confirmed before signing in.
pub async fn register(
    queries: &QueryClient,
    registration: &Registration,
) -> Result<Option<User>, ApiError> {
    let api = queries.api();
    tracked(api.session(), async {
        registration.validate()?;

        let body = RequestBody::Multipart(registration.to_form());
        let outcome: RegisterOutcome = decode(api.request(&Endpoint::Register, body).await?)?;
        let user = match outcome {
            RegisterOutcome::Tokens(tokens) => {
                let user = api
                    .store_tokens(&tokens.access_token, &tokens.refresh_token)
                    .await?;
                tracing::info!("Registered and signed in as {}", user.id);
                Some(user)
            }
            RegisterOutcome::Other(_) => {
                tracing::info!("Registered {}", registration.email.trim());
                None
            }
        };
        queries.invalidate(Endpoint::Register.invalidates());
        Ok(user)
    })
    .await
}

/// Ask the backend to email a reset link. Returns the confirmation message.
pub async fn forget_password(queries: &QueryClient, email: &str) -> Result<String, ApiError> {
    validation::email(email)?;
    let endpoint = Endpoint::ForgetPassword {
        email: email.trim().to_string(),
    };
    let envelope = queries
        .api()
        .envelope(&endpoint, RequestBody::Empty)
        .await?;
    Ok(envelope.message)
}

pub async fn update_profile(queries: &QueryClient, update: &ProfileUpdate) -> Result<User, ApiError> {
    let api = queries.api();
    tracked(api.session(), async {
        let current = api
            .session()
            .snapshot()
            .user
            .ok_or_else(|| ApiError::validation("user", "You need to sign in first"))?;
        if let Some(name) = &update.full_name {
            validation::require("fullName", name)?;
        }

        let mut form = MultipartForm::new().text_opt("FullName", update.full_name.as_deref().map(str::trim));
        if let Some(avatar) = &update.avatar {
            form = form.file("Avatar", avatar.clone());
        }
        let endpoint = Endpoint::UpdateUser {
            id: current.id.clone(),
        };
        let returned: Value = queries.mutate(endpoint, RequestBody::Multipart(form)).await?;

        let user = merge_profile(current, update, &returned);
        if let Err(e) = api.tokens().save_user(&user).await {
            tracing::warn!("Failed to persist updated user: {}", e);
        }
        api.session().set_user(user.clone());
        Ok(user)
    })
    .await
}

/// Apply what the backend echoed back (or, failing that, what was sent).
fn merge_profile(mut user: User, update: &ProfileUpdate, returned: &Value) -> User {
    let field = |names: &[&str]| {
        names
            .iter()
            .find_map(|n| returned.get(*n).and_then(Value::as_str))
            .map(str::to_string)
    };
    if let Some(name) = field(&["fullName", "name"]).or_else(|| update.full_name.clone()) {
        user.name = name.trim().to_string();
    }
    if let Some(avatar) = field(&["avatarUrl", "avatar"]) {
        user.avatar = Some(avatar);
    }
    user.updated_at = Some(chrono::Utc::now());
    user
}

/// Sign out locally. There is no server call; tokens simply stop being sent.
pub async fn logout(queries: &QueryClient) {
    let api = queries.api();
    api.clear_local_auth().await;
    queries.reset();
    tracing::info!("Signed out");
}

/// Rebuild the session from persisted tokens at startup. Returns the restored
/// user, if any.
pub async fn restore_session(api: &ApiClient) -> Option<User> {
    let tokens = api.tokens();
    let access_token = tokens.access_token().await?;
    let refresh_token = tokens.refresh_token().await.unwrap_or_default();

    let user = match tokens.user().await {
        Some(user) => user,
        None => match crate::jwt::decode_user(&access_token) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Discarding unreadable persisted token: {}", e);
                tokens.clear().await;
                return None;
            }
        },
    };

    api.session().set_token(access_token, refresh_token);
    api.session().set_user(user.clone());
    tracing::info!("Restored session for {}", user.id);
    Some(user)
}
