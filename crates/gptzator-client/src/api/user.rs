//! Users API.

use serde_json::{Value, json};

use crate::api::by_id;
use crate::auth::Tokens;
use crate::call::api_call;
use crate::client::GptzatorClient;
use crate::error::{ApiError, Result};
use crate::transport::FormPart;
use crate::types::{
    AuthResponse, DocResponse, LoginResponse, MeResponse, SignupRequest, User, UserAvatar,
};

/// Registration, login and profile endpoints.
pub struct UserApi {
    client: GptzatorClient,
}

impl UserApi {
    pub(crate) fn new(client: GptzatorClient) -> Self {
        Self { client }
    }

    /// Get the current user.
    pub async fn me(&self) -> Result<Option<User>> {
        api_call("UserApi.me", async {
            let response: MeResponse = self.client.get("users/me").await?;
            Ok::<_, ApiError>(response.user)
        })
        .await
    }

    pub async fn change_password(&self, old_password: &str, new_password: &str) -> Result<Value> {
        api_call(
            "UserApi.change_password",
            self.client.post(
                "users/me/change-password",
                &json!({ "oldPassword": old_password, "newPassword": new_password }),
            ),
        )
        .await
    }

    /// Request a password reset email.
    pub async fn forgot_password(&self, email: &str) -> Result<Value> {
        api_call(
            "UserApi.forgot_password",
            self.client
                .post("users/forgot-password", &json!({ "email": email })),
        )
        .await
    }

    /// Reset the password with a token from the reset email.
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<Value> {
        api_call(
            "UserApi.reset_password",
            self.client.post(
                "users/reset-password",
                &json!({ "token": token, "password": password }),
            ),
        )
        .await
    }

    /// Log in and store the issued tokens.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        api_call("UserApi.login", async {
            let response: AuthResponse = self
                .client
                .post(
                    "users/login",
                    &json!({ "email": email, "password": password }),
                )
                .await?;
            self.store_tokens(response)
        })
        .await
    }

    /// Register a new user and store the issued tokens.
    pub async fn signup(&self, request: &SignupRequest) -> Result<LoginResponse> {
        api_call("UserApi.signup", async {
            let response: AuthResponse = self.client.post("users/register", request).await?;
            self.store_tokens(response)
        })
        .await
    }

    /// Register a demo user.
    pub async fn signup_demo(&self) -> Result<Option<User>> {
        api_call("UserApi.signup_demo", async {
            let response: MeResponse = self.client.post_empty("users/register-demo").await?;
            Ok::<_, ApiError>(response.user)
        })
        .await
    }

    /// Log out. Local tokens are cleared whether or not the server call succeeds.
    pub async fn logout(&self) -> Result<()> {
        let result = api_call("UserApi.logout", async {
            self.client.post_empty::<Value>("users/logout").await.map(|_| ())
        })
        .await;
        self.client.set_tokens(None);
        result
    }

    pub async fn update_default_thread_model(&self, user_id: &str, model_id: &str) -> Result<User> {
        api_call("UserApi.update_default_thread_model", async {
            let response: DocResponse<User> = self
                .client
                .patch(
                    &format!("users/{}", user_id),
                    &json!({ "defaultThreadModel": model_id }),
                )
                .await?;
            Ok::<_, ApiError>(response.doc)
        })
        .await
    }

    /// Mark an onboarding page as completed.
    pub async fn set_onboarded(&self, user_id: &str, page_name: &str) -> Result<Option<User>> {
        api_call("UserApi.set_onboarded", async {
            let response: MeResponse = self
                .client
                .patch(
                    &format!("users/{}", user_id),
                    &json!({ "onboarded": { page_name: true } }),
                )
                .await?;
            Ok::<_, ApiError>(response.user)
        })
        .await
    }

    /// Upload an avatar image.
    pub async fn upload_avatar(&self, file_name: &str, data: Vec<u8>) -> Result<UserAvatar> {
        api_call("UserApi.upload_avatar", async {
            let response: DocResponse<UserAvatar> = self
                .client
                .post_multipart("users_avatars", vec![FormPart::file("file", file_name, data)])
                .await?;
            Ok::<_, ApiError>(response.doc)
        })
        .await
    }

    pub async fn delete_avatar(&self, file_id: &str) -> Result<Value> {
        api_call(
            "UserApi.delete_avatar",
            self.client.delete_with_query("users_avatars", by_id(file_id)),
        )
        .await
    }

    /// Update first and last name.
    pub async fn update_name(&self, user_id: &str, first_name: &str, last_name: &str) -> Result<User> {
        api_call("UserApi.update_name", async {
            let response: DocResponse<User> = self
                .client
                .patch(
                    &format!("users/{}", user_id),
                    &json!({ "firstName": first_name, "lastName": last_name }),
                )
                .await?;
            Ok::<_, ApiError>(response.doc)
        })
        .await
    }

    /// Set the interface locale (e.g. `"ru"`).
    pub async fn set_locale(&self, locale: &str) -> Result<()> {
        api_call("UserApi.set_locale", async {
            self.client
                .post::<Value, _>("payload-preferences/locale", &json!({ "value": locale }))
                .await
                .map(|_| ())
        })
        .await
    }

    fn store_tokens(&self, response: AuthResponse) -> Result<LoginResponse> {
        let Some(token) = response.token.filter(|t| !t.is_empty()) else {
            return Err(ApiError::local("Login failed: token not returned"));
        };

        let mut tokens = Tokens::new(token.clone());
        if let Some(refresh_token) = response.refresh_token.filter(|t| !t.is_empty()) {
            tokens = tokens.with_refresh_token(refresh_token);
        }
        self.client.set_tokens(Some(tokens));

        Ok(LoginResponse {
            user: response.user,
            token,
        })
    }
}
