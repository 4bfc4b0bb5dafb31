//! Entities exchanged with the recipe server.

use serde::{Deserialize, Serialize};

/// A recipe category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A recipe as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    /// Category id reference.
    pub category: i64,
    /// Category display name; only present on detail responses.
    #[serde(default)]
    pub category_name: Option<String>,
    /// Author user id reference.
    pub author: i64,
}

/// Body of a recipe creation request.
#[derive(Debug, Clone, Serialize)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub category: i64,
    pub author: i64,
}

/// The signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
}
