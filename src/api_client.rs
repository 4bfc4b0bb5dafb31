//! HTTP API client for the recipe server.
//!
//! One method per resource operation. Every call returns a discriminated
//! [`ApiError`] so callers can tell an expired session apart from a server
//! rejection or a transport failure. The client performs no navigation; on
//! [`ApiError::Auth`] the caller purges the session and returns to login.

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Category, NewRecipe, Recipe, UserProfile};
use crate::session::{SessionStore, TokenPair};

/// Gateway call outcome taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server rejected the bearer token (HTTP 401) or no session exists.
    /// Never produced by the unauthenticated token/register endpoints.
    #[error("Session expired. Please log in again.")]
    Auth,
    /// Any other rejection, with the server's `detail` message when the body
    /// carried one. Includes credential rejections from the token endpoint.
    #[error("{0}")]
    Server(String),
    /// Transport failure: DNS, connect, TLS, or response decoding.
    #[error("An error occurred: {0}")]
    Network(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The slice of the gateway the recipe submission pipeline depends on.
/// Kept as a trait so the pipeline can be exercised without a server.
#[async_trait]
pub trait RecipeApi {
    async fn create_category(&self, name: &str) -> ApiResult<Category>;
    async fn list_recipes(&self) -> ApiResult<Vec<Recipe>>;
    async fn create_recipe(&self, recipe: &NewRecipe) -> ApiResult<Recipe>;
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access: String,
    refresh: String,
}

#[derive(Debug, Serialize)]
struct NewCategory<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// API client for communicating with the recipe server.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    session: SessionStore,
}

impl ApiClient {
    /// Create a new API client over an existing session store.
    pub fn new(base_url: String, session: SessionStore) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Purge the session. Called by views on 401 and on explicit logout.
    pub fn clear_session(&mut self) {
        self.session.clear();
    }

    fn bearer(&self) -> ApiResult<&str> {
        self.session.access_token().ok_or(ApiError::Auth)
    }

    /// Map a non-2xx response on a bearer-authenticated call. 401 is always
    /// [`ApiError::Auth`]; other statuses surface the server's `detail`
    /// message when the body carries one.
    async fn check(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Auth);
        }
        if !status.is_success() {
            return Err(ApiError::Server(Self::detail(response, status).await));
        }
        Ok(response)
    }

    /// Map a non-2xx response on an unauthenticated endpoint. The token
    /// endpoint answers 401 for bad credentials, so here every rejection is
    /// a [`ApiError::Server`] carrying the server's message; no session is
    /// involved.
    async fn check_public(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Server(Self::detail(response, status).await));
        }
        Ok(response)
    }

    async fn detail(response: reqwest::Response, status: StatusCode) -> String {
        response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| format!("Request failed with status {status}"))
    }

    /// Login with username and password, storing the issued token pair.
    pub async fn login(&mut self, username: &str, password: &str) -> ApiResult<()> {
        let request = LoginRequest { username, password };
        let response = self
            .client
            .post(format!("{}/api/token/", self.base_url))
            .json(&request)
            .send()
            .await?;

        let tokens: TokenResponse = Self::check_public(response).await?.json().await?;
        debug!("login succeeded for {username}");
        self.session.set(TokenPair {
            access_token: tokens.access,
            refresh_token: tokens.refresh,
        });
        Ok(())
    }

    /// Register a new user. Does not issue tokens; follow up with login.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> ApiResult<()> {
        let request = RegisterRequest {
            username,
            email,
            password,
        };
        let response = self
            .client
            .post(format!("{}/api/register/", self.base_url))
            .json(&request)
            .send()
            .await?;

        Self::check_public(response).await?;
        Ok(())
    }

    /// Drop the session without contacting the server.
    pub fn logout(&mut self) {
        self.session.clear();
    }

    /// Fetch the signed-in user's profile.
    pub async fn fetch_profile(&self) -> ApiResult<UserProfile> {
        let token = self.bearer()?;
        let response = self
            .client
            .get(format!("{}/api/usersprofile/", self.base_url))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?;

        let profile = Self::check(response).await?.json().await?;
        Ok(profile)
    }

    /// List all categories.
    pub async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        let token = self.bearer()?;
        let response = self
            .client
            .get(format!("{}/api/categories/", self.base_url))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?;

        let categories = Self::check(response).await?.json().await?;
        Ok(categories)
    }

    /// Create a new category and return it with its server-assigned id.
    pub async fn create_category(&self, name: &str) -> ApiResult<Category> {
        let token = self.bearer()?;
        let response = self
            .client
            .post(format!("{}/api/categories/", self.base_url))
            .header("Authorization", format!("Bearer {token}"))
            .json(&NewCategory { name })
            .send()
            .await?;

        let category = Self::check(response).await?.json().await?;
        Ok(category)
    }

    /// List the signed-in user's recipes.
    pub async fn list_recipes(&self) -> ApiResult<Vec<Recipe>> {
        let token = self.bearer()?;
        let response = self
            .client
            .get(format!("{}/api/recipes/", self.base_url))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?;

        let recipes = Self::check(response).await?.json().await?;
        Ok(recipes)
    }

    /// Create a new recipe.
    pub async fn create_recipe(&self, recipe: &NewRecipe) -> ApiResult<Recipe> {
        let token = self.bearer()?;
        let response = self
            .client
            .post(format!("{}/api/recipes/", self.base_url))
            .header("Authorization", format!("Bearer {token}"))
            .json(recipe)
            .send()
            .await?;

        let created = Self::check(response).await?.json().await?;
        Ok(created)
    }

    /// Fetch a single recipe by id.
    pub async fn get_recipe(&self, id: i64) -> ApiResult<Recipe> {
        let token = self.bearer()?;
        let response = self
            .client
            .get(format!("{}/api/recipes/{id}/", self.base_url))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?;

        let recipe = Self::check(response).await?.json().await?;
        Ok(recipe)
    }

    /// Delete a recipe by id.
    pub async fn delete_recipe(&self, id: i64) -> ApiResult<()> {
        let token = self.bearer()?;
        let response = self
            .client
            .delete(format!("{}/api/recipes/{id}/", self.base_url))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RecipeApi for ApiClient {
    async fn create_category(&self, name: &str) -> ApiResult<Category> {
        Self::create_category(self, name).await
    }

    async fn list_recipes(&self) -> ApiResult<Vec<Recipe>> {
        Self::list_recipes(self).await
    }

    async fn create_recipe(&self, recipe: &NewRecipe) -> ApiResult<Recipe> {
        Self::create_recipe(self, recipe).await
    }
}
