//! Plain text-mode client for the recipe server.
//!
//! A simple stdin REPL over the API gateway: list, view, and delete recipes,
//! and an interactive add flow that runs the submission pipeline.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::api_client::{ApiClient, ApiError};
use crate::commands::{UserCommand, parse_command};
use crate::models::Recipe;
use crate::submission::{RecipeDraft, SubmitState, Submission};

const HELP: &str = "\
Available commands:
  list              List your recipes
  view ID           Show a recipe
  delete ID         Delete a recipe
  add               Add a new recipe
  whoami            Show your profile
  logout            Log out and exit
  help, quit
";

/// Text-mode recipe client.
pub struct TextClient {
    api: ApiClient,
}

impl TextClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Run the REPL until quit, logout, or session expiry.
    pub async fn run(mut self) -> Result<()> {
        match self.api.fetch_profile().await {
            Ok(profile) => println!("Welcome, {}! Your recipes await.", profile.username),
            Err(ApiError::Auth) => {
                self.api.clear_session();
                println!("Session expired. Please log in again.");
                return Ok(());
            }
            // The greeting is cosmetic; keep going without it
            Err(e) => println!("Welcome, Guest! ({e})"),
        }
        println!("Type 'help' for available commands.\n");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            eprint!("> ");
            let Some(line) = lines.next_line().await? else {
                break; // EOF
            };
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            let command = match parse_command(input) {
                Ok(command) => command,
                Err(e) => {
                    eprintln!("Error: {e}");
                    continue;
                }
            };

            let outcome = match command {
                UserCommand::List => self.list_recipes().await,
                UserCommand::View(id) => self.view_recipe(id).await,
                UserCommand::Delete(id) => self.delete_recipe(id).await,
                UserCommand::Add => self.add_recipe(&mut lines).await,
                UserCommand::WhoAmI => self.whoami().await,
                UserCommand::Logout => {
                    self.api.logout();
                    println!("Logged out.");
                    break;
                }
                UserCommand::Help => {
                    print!("{HELP}");
                    Ok(())
                }
                UserCommand::Quit => break,
            };

            match outcome {
                Ok(()) => {}
                Err(ApiError::Auth) => {
                    self.api.clear_session();
                    println!("Session expired. Please log in again.");
                    break;
                }
                Err(e) => eprintln!("Error: {e}"),
            }
        }

        Ok(())
    }

    async fn list_recipes(&self) -> Result<(), ApiError> {
        let recipes = self.api.list_recipes().await?;
        if recipes.is_empty() {
            println!("No recipes found. Start by adding your first recipe!");
            return Ok(());
        }
        println!("Your recipes:");
        for recipe in &recipes {
            println!("  {}. {} - {}", recipe.id, recipe.title, recipe.description);
        }
        Ok(())
    }

    async fn view_recipe(&self, id: i64) -> Result<(), ApiError> {
        match self.api.get_recipe(id).await {
            Ok(recipe) => {
                print_recipe(&recipe);
                Ok(())
            }
            Err(ApiError::Server(_)) => {
                println!("Recipe not found.");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn delete_recipe(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete_recipe(id).await?;
        println!("Recipe deleted successfully");
        Ok(())
    }

    async fn whoami(&self) -> Result<(), ApiError> {
        let profile = self.api.fetch_profile().await?;
        println!("Signed in as {} (id {})", profile.username, profile.id);
        Ok(())
    }

    /// Interactive add flow: prompt for each field, let the user pick or
    /// enter a category, then run the submission pipeline.
    async fn add_recipe(&self, lines: &mut Lines<BufReader<Stdin>>) -> Result<(), ApiError> {
        let profile = self.api.fetch_profile().await?;
        let categories = self.api.list_categories().await?;

        let title = prompt(lines, "Title: ").await?;
        let description = prompt(lines, "Description: ").await?;
        let ingredients = prompt(lines, "Ingredients: ").await?;
        let instructions = prompt(lines, "Instructions: ").await?;
        if title.is_empty() || description.is_empty() || ingredients.is_empty()
            || instructions.is_empty()
        {
            println!("All recipe fields are required.");
            return Ok(());
        }

        if categories.is_empty() {
            println!("No categories yet.");
        } else {
            println!("Existing categories:");
            for category in &categories {
                println!("  {}. {}", category.id, category.name);
            }
        }
        let selection =
            prompt(lines, "Select a category id, or press Enter to name a new one: ").await?;
        let (selected_category, new_category) = if selection.is_empty() {
            let name = prompt(lines, "New category name: ").await?;
            (None, name)
        } else {
            match selection.parse::<i64>() {
                Ok(id) if categories.iter().any(|c| c.id == id) => (Some(id), String::new()),
                _ => {
                    println!("Invalid category selection.");
                    return Ok(());
                }
            }
        };

        let draft = RecipeDraft {
            title,
            description,
            ingredients,
            instructions,
            selected_category,
            new_category,
        };

        let mut submission = Submission::new();
        println!("Adding...");
        match submission
            .submit(&self.api, &draft, &categories, profile.id)
            .await
        {
            SubmitState::Succeeded => println!("Recipe added successfully!"),
            SubmitState::Failed(message) => println!("{message}"),
            SubmitState::Unauthenticated => return Err(ApiError::Auth),
            // The pipeline always lands on a terminal state
            state => println!("Submission ended unexpectedly in {state:?}"),
        }
        Ok(())
    }
}

/// Prompt on stderr and read one trimmed line.
async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<String, ApiError> {
    eprint!("{label}");
    let line = lines
        .next_line()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?
        .unwrap_or_default();
    Ok(line.trim().to_string())
}

fn print_recipe(recipe: &Recipe) {
    println!("{}", recipe.title);
    println!("  Description:  {}", recipe.description);
    println!("  Ingredients:  {}", recipe.ingredients);
    println!("  Instructions: {}", recipe.instructions);
    println!(
        "  Category:     {}",
        recipe.category_name.as_deref().unwrap_or("N/A")
    );
    println!("  Author:       {}", recipe.author);
}
