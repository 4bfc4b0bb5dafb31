//! Integration tests for the recipe submission pipeline.
//!
//! Drives the full category-resolution → duplicate-check → creation sequence
//! against a scripted gateway, verifying call ordering and the terminal state
//! for each failure branch.

use async_trait::async_trait;
use std::sync::Mutex;

use rb_client::api_client::{ApiError, ApiResult, RecipeApi};
use rb_client::models::{Category, NewRecipe, Recipe};
use rb_client::session::{SessionStore, TokenPair};
use rb_client::submission::{RecipeDraft, SubmitState, Submission};

/// Scripted gateway that records every call it receives.
#[derive(Default)]
struct ScriptedApi {
    calls: Mutex<Vec<String>>,
    existing_recipes: Vec<Recipe>,
    next_category_id: i64,
    create_category_error: Option<ApiError>,
    list_recipes_error: Option<ApiError>,
    create_recipe_error: Option<ApiError>,
    /// Captures the body of the creation request for assertions
    created: Mutex<Option<NewRecipe>>,
}

impl ScriptedApi {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl RecipeApi for ScriptedApi {
    async fn create_category(&self, name: &str) -> ApiResult<Category> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(format!("create_category({name})"));
        match &self.create_category_error {
            Some(e) => Err(e.clone()),
            None => Ok(Category {
                id: self.next_category_id,
                name: name.to_string(),
            }),
        }
    }

    async fn list_recipes(&self) -> ApiResult<Vec<Recipe>> {
        self.calls.lock().expect("calls lock").push("list_recipes".to_string());
        match &self.list_recipes_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.existing_recipes.clone()),
        }
    }

    async fn create_recipe(&self, recipe: &NewRecipe) -> ApiResult<Recipe> {
        self.calls.lock().expect("calls lock").push("create_recipe".to_string());
        match &self.create_recipe_error {
            Some(e) => Err(e.clone()),
            None => {
                *self.created.lock().expect("created lock") = Some(recipe.clone());
                Ok(Recipe {
                    id: 100,
                    title: recipe.title.clone(),
                    description: recipe.description.clone(),
                    ingredients: recipe.ingredients.clone(),
                    instructions: recipe.instructions.clone(),
                    category: recipe.category,
                    category_name: None,
                    author: recipe.author,
                })
            }
        }
    }
}

fn draft(title: &str, selected: Option<i64>, new_category: &str) -> RecipeDraft {
    RecipeDraft {
        title: title.to_string(),
        description: "A test dish".to_string(),
        ingredients: "things".to_string(),
        instructions: "cook them".to_string(),
        selected_category: selected,
        new_category: new_category.to_string(),
    }
}

fn recipe(id: i64, title: &str) -> Recipe {
    Recipe {
        id,
        title: title.to_string(),
        description: String::new(),
        ingredients: String::new(),
        instructions: String::new(),
        category: 1,
        category_name: None,
        author: 3,
    }
}

#[tokio::test]
async fn test_brand_new_category_full_happy_path() {
    // Category created first, then the duplicate check, then the recipe;
    // the new category's id flows into the creation request.
    let api = ScriptedApi {
        next_category_id: 42,
        ..ScriptedApi::default()
    };
    let mut submission = Submission::new();

    let state = submission
        .submit(&api, &draft("Chili", None, "Tex-Mex"), &[], 7)
        .await;

    assert_eq!(state, &SubmitState::Succeeded);
    assert_eq!(
        api.calls(),
        vec!["create_category(Tex-Mex)", "list_recipes", "create_recipe"]
    );
    let created = api.created.lock().expect("created lock").clone().expect("recipe created");
    assert_eq!(created.category, 42);
    assert_eq!(created.author, 7);
    assert_eq!(created.title, "Chili");
}

#[tokio::test]
async fn test_category_name_is_trimmed_before_submission() {
    let api = ScriptedApi {
        next_category_id: 9,
        ..ScriptedApi::default()
    };
    let mut submission = Submission::new();

    let state = submission
        .submit(&api, &draft("Chili", None, "  Tex-Mex  "), &[], 7)
        .await;

    assert_eq!(state, &SubmitState::Succeeded);
    assert_eq!(api.calls()[0], "create_category(Tex-Mex)");
}

#[tokio::test]
async fn test_duplicate_category_fails_before_any_call() {
    let api = ScriptedApi::default();
    let mut submission = Submission::new();
    let categories = vec![Category {
        id: 1,
        name: "Tex-Mex".to_string(),
    }];

    let state = submission
        .submit(&api, &draft("Chili", None, "TEX-MEX"), &categories, 7)
        .await;

    assert!(matches!(state, SubmitState::Failed(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_duplicate_title_same_author_blocks_creation() {
    let api = ScriptedApi {
        existing_recipes: vec![recipe(1, "Pasta Bake")],
        ..ScriptedApi::default()
    };
    let mut submission = Submission::new();

    let state = submission
        .submit(&api, &draft("pasta bake", Some(1), ""), &[], 7)
        .await;

    match state {
        SubmitState::Failed(message) => {
            assert_eq!(message, "The recipe \"pasta bake\" already exists in your recipe list.");
        }
        other => panic!("expected Failed, got {other:?}"),
    }
    assert_eq!(api.calls(), vec!["list_recipes"]);
}

#[tokio::test]
async fn test_check_failure_proceeds_to_creation() {
    // The documented race: a failed pre-check is logged, not fatal
    let api = ScriptedApi {
        list_recipes_error: Some(ApiError::Network("connection reset by peer".to_string())),
        ..ScriptedApi::default()
    };
    let mut submission = Submission::new();

    let state = submission.submit(&api, &draft("Chili", Some(1), ""), &[], 7).await;

    assert_eq!(state, &SubmitState::Succeeded);
    assert_eq!(api.calls(), vec!["list_recipes", "create_recipe"]);
}

#[tokio::test]
async fn test_category_creation_failure_stops_the_pipeline() {
    let api = ScriptedApi {
        create_category_error: Some(ApiError::Server("name too long".to_string())),
        ..ScriptedApi::default()
    };
    let mut submission = Submission::new();

    let state = submission.submit(&api, &draft("Chili", None, "Tex-Mex"), &[], 7).await;

    assert_eq!(
        state,
        &SubmitState::Failed("Failed to create category: name too long".to_string())
    );
    // Neither the duplicate check nor creation ran
    assert_eq!(api.calls(), vec!["create_category(Tex-Mex)"]);
}

#[tokio::test]
async fn test_identical_failed_submission_is_idempotent() {
    let api = ScriptedApi {
        existing_recipes: vec![recipe(1, "Chili")],
        ..ScriptedApi::default()
    };
    let mut submission = Submission::new();
    let draft = draft("Chili", Some(1), "");

    let first = submission.submit(&api, &draft, &[], 7).await.clone();
    let second = submission.submit(&api, &draft, &[], 7).await.clone();

    assert_eq!(first, second);
    assert!(matches!(first, SubmitState::Failed(_)));
}

#[tokio::test]
async fn test_unauthenticated_outcome_lets_caller_purge_session() {
    // The pipeline reports Unauthenticated; purging is the caller's job,
    // mirroring what every view does on a 401.
    let api = ScriptedApi {
        create_recipe_error: Some(ApiError::Auth),
        ..ScriptedApi::default()
    };
    let rand_id: u32 = rand::random();
    let path = std::env::temp_dir().join(format!("rb_flow_{rand_id}/session.json"));
    let mut session = SessionStore::empty(path);
    session.set(TokenPair {
        access_token: "expired".to_string(),
        refresh_token: "expired".to_string(),
    });
    let mut submission = Submission::new();

    let state = submission.submit(&api, &draft("Chili", Some(1), ""), &[], 7).await;

    if state == &SubmitState::Unauthenticated {
        session.clear();
    }
    assert!(!session.is_authenticated());
}
