//! Recipe submission pipeline.
//!
//! Resolves a category reference, guards against duplicate titles, and then
//! creates the recipe, as one sequential user-facing operation. Each step is
//! an explicit state so the view layer can render progress and terminal
//! outcomes from a single tagged value.

use log::warn;

use crate::api_client::{ApiError, RecipeApi};
use crate::models::{Category, NewRecipe};

/// Progress of a single submission attempt.
///
/// `Failed`, `Succeeded`, and `Unauthenticated` are terminal for one attempt;
/// a new run starts from `Idle` (or from `Failed`, after the user edits the
/// form). There is no automatic retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    ResolvingCategory,
    CheckingDuplicateRecipe,
    Creating,
    Failed(String),
    Succeeded,
    Unauthenticated,
}

impl SubmitState {
    /// A step of the pipeline is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            Self::ResolvingCategory | Self::CheckingDuplicateRecipe | Self::Creating
        )
    }

    /// Whether a new submission may start from this state.
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed(_))
    }
}

/// Form values for a recipe under construction. The category reference is
/// either an existing selection or a new name, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub selected_category: Option<i64>,
    pub new_category: String,
}

enum CategoryChoice {
    Existing(i64),
    New(String),
}

impl RecipeDraft {
    /// Exactly one of {selected category, new category name} must be set.
    fn category_choice(&self) -> Result<CategoryChoice, String> {
        let new_name = self.new_category.trim();
        match (self.selected_category, new_name.is_empty()) {
            (Some(id), true) => Ok(CategoryChoice::Existing(id)),
            (None, false) => Ok(CategoryChoice::New(new_name.to_string())),
            _ => Err("Please select or enter a category.".to_string()),
        }
    }
}

/// One-at-a-time submission orchestrator.
#[derive(Debug)]
pub struct Submission {
    state: SubmitState,
}

impl Default for Submission {
    fn default() -> Self {
        Self::new()
    }
}

impl Submission {
    pub fn new() -> Self {
        Self {
            state: SubmitState::Idle,
        }
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    /// Return to `Idle` after a terminal state has been rendered.
    pub fn reset(&mut self) {
        self.state = SubmitState::Idle;
    }

    /// Run the full submission sequence: resolve the category, check for a
    /// duplicate title, create the recipe. Steps execute strictly in order;
    /// the returned reference is the terminal state of this attempt.
    ///
    /// `categories` is the already-loaded category set, which is the source
    /// of truth for the duplicate-category check; no server call is made for
    /// a name that matches it.
    pub async fn submit<A>(
        &mut self,
        api: &A,
        draft: &RecipeDraft,
        categories: &[Category],
        author: i64,
    ) -> &SubmitState
    where
        A: RecipeApi + Sync,
    {
        // Only one attempt at a time; Succeeded/Unauthenticated require an
        // explicit reset before resubmitting.
        if !self.state.can_submit() {
            return &self.state;
        }

        let choice = match draft.category_choice() {
            Ok(choice) => choice,
            Err(message) => {
                self.state = SubmitState::Failed(message);
                return &self.state;
            }
        };

        self.state = SubmitState::ResolvingCategory;
        let category_id = match choice {
            CategoryChoice::Existing(id) => id,
            CategoryChoice::New(name) => {
                let lowered = name.to_lowercase();
                if categories
                    .iter()
                    .any(|category| category.name.to_lowercase() == lowered)
                {
                    self.state = SubmitState::Failed(format!(
                        "The category \"{name}\" already exists. Please select it from the list."
                    ));
                    return &self.state;
                }
                match api.create_category(&name).await {
                    Ok(category) => category.id,
                    Err(ApiError::Auth) => {
                        self.state = SubmitState::Unauthenticated;
                        return &self.state;
                    }
                    Err(e) => {
                        self.state = SubmitState::Failed(format!("Failed to create category: {e}"));
                        return &self.state;
                    }
                }
            }
        };

        self.state = SubmitState::CheckingDuplicateRecipe;
        match api.list_recipes().await {
            Ok(recipes) => {
                let lowered = draft.title.to_lowercase();
                if recipes
                    .iter()
                    .any(|recipe| recipe.title.to_lowercase() == lowered)
                {
                    self.state = SubmitState::Failed(format!(
                        "The recipe \"{}\" already exists in your recipe list.",
                        draft.title
                    ));
                    return &self.state;
                }
            }
            Err(ApiError::Auth) => {
                self.state = SubmitState::Unauthenticated;
                return &self.state;
            }
            Err(e) => {
                // Known consistency gap: a failed pre-check does not block
                // creation, it only loses the duplicate guard for this run.
                warn!("duplicate-recipe check failed, proceeding with creation: {e}");
            }
        }

        self.state = SubmitState::Creating;
        let recipe = NewRecipe {
            title: draft.title.clone(),
            description: draft.description.clone(),
            ingredients: draft.ingredients.clone(),
            instructions: draft.instructions.clone(),
            category: category_id,
            author,
        };
        self.state = match api.create_recipe(&recipe).await {
            Ok(_) => SubmitState::Succeeded,
            Err(ApiError::Auth) => SubmitState::Unauthenticated,
            Err(e) => SubmitState::Failed(format!("Failed to add recipe: {e}")),
        };
        &self.state
    }
}
