//! TUI application for the recipe book client.
//!
//! This module provides a terminal UI using ratatui with screens for login,
//! registration, the recipe list, recipe details, and recipe creation. Views
//! are thin state holders; session gating and the submission pipeline live in
//! the `session`, `api_client`, and `submission` modules.

use anyhow::Result;
use chrono::{DateTime, Utc};
use ratatui::{
    DefaultTerminal, Frame,
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::{Constraint, Flex, Layout, Margin, Position, Rect},
    style::{Style, Stylize},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{
        Block, List, ListDirection, ListItem, ListState, Padding, Paragraph, Scrollbar,
        ScrollbarOrientation, Wrap,
    },
};
use std::time::Duration;

use crate::api_client::{ApiClient, ApiError};
use crate::models::{Category, Recipe, UserProfile};
use crate::submission::{RecipeDraft, SubmitState, Submission};

mod widgets;

use widgets::{Form, FormField, ScrollableList};

const MAX_LOG_RECORDS: usize = 1024;
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

// Add-recipe form field order
const FIELD_TITLE: usize = 0;
const FIELD_DESCRIPTION: usize = 1;
const FIELD_INGREDIENTS: usize = 2;
const FIELD_INSTRUCTIONS: usize = 3;
const FIELD_NEW_CATEGORY: usize = 4;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Screen {
    Login,
    Register,
    RecipeList,
    RecipeDetail,
    AddRecipe,
}

/// Loop control decided by synchronous key handling.
enum Control {
    Continue,
    Quit,
    Action(NetAction),
}

/// A user action that requires the network. The run loop draws a pending
/// frame before performing one, so the triggering control reads as disabled
/// for the duration.
enum NetAction {
    Login,
    Register,
    LoadRecipes,
    OpenDetail(i64),
    DeleteRecipe(i64),
    OpenAddRecipe,
    SubmitRecipe,
}

#[derive(Clone, Copy)]
enum RecordKind {
    Info,
    Alert,
    Error,
}

/// A timestamped terminal message with an importance label to help
/// direct user attention.
struct Record {
    datetime: DateTime<Utc>,
    kind: RecordKind,
    content: String,
}

impl Record {
    fn new(kind: RecordKind, content: String) -> Self {
        Self {
            datetime: Utc::now(),
            kind,
            content,
        }
    }
}

impl From<Record> for ListItem<'_> {
    fn from(val: Record) -> Self {
        let repr = match val.kind {
            RecordKind::Info => "INFO".light_green(),
            RecordKind::Alert => "ALERT".light_magenta(),
            RecordKind::Error => "ERROR".light_red(),
        };

        let msg = vec![
            format!("[{} ", val.datetime.format("%H:%M:%S")).into(),
            Span::styled(format!("{repr:5}"), repr.style),
            format!("]: {}", val.content).into(),
        ];

        ListItem::new(Line::from(msg))
    }
}

/// TUI App state
pub struct TuiApp {
    api: ApiClient,
    screen: Screen,
    /// Login form: username, password
    login_form: Form,
    /// Registration form: username, email, password, confirm password
    register_form: Form,
    /// Add-recipe form: title, description, ingredients, instructions,
    /// new category name
    add_form: Form,
    /// Focused row on the add screen; `add_form.fields.len()` is the
    /// existing-category selector row
    add_focus: usize,
    /// Existing-category selection, an index into `categories`
    category_idx: Option<usize>,
    recipes: Vec<Recipe>,
    recipe_state: ListState,
    detail: Option<Recipe>,
    categories: Vec<Category>,
    profile: Option<UserProfile>,
    submission: Submission,
    /// A network call is in flight; triggering controls are disabled
    pending: bool,
    /// History of recorded messages
    log_handle: ScrollableList,
}

impl TuiApp {
    pub fn new(api: ApiClient) -> Self {
        Self {
            screen: if api.is_authenticated() {
                Screen::RecipeList
            } else {
                Screen::Login
            },
            api,
            login_form: Form::new(vec![
                FormField::new("Username"),
                FormField::masked("Password"),
            ]),
            register_form: Form::new(vec![
                FormField::new("Username"),
                FormField::new("Email"),
                FormField::masked("Password"),
                FormField::masked("Confirm Password"),
            ]),
            add_form: Form::new(vec![
                FormField::new("Title"),
                FormField::new("Description"),
                FormField::new("Ingredients"),
                FormField::new("Instructions"),
                FormField::new("New category"),
            ]),
            add_focus: 0,
            category_idx: None,
            recipes: Vec::new(),
            recipe_state: ListState::default(),
            detail: None,
            categories: Vec::new(),
            profile: None,
            submission: Submission::new(),
            pending: false,
            log_handle: ScrollableList::new(MAX_LOG_RECORDS),
        }
    }

    fn add_log(&mut self, kind: RecordKind, content: String) {
        let record = Record::new(kind, content);
        self.log_handle.push(record.into());
    }

    /// 401 anywhere: purge the session and fall back to the login screen.
    fn auth_expired(&mut self) {
        self.api.clear_session();
        self.screen = Screen::Login;
        self.profile = None;
        self.recipes.clear();
        self.detail = None;
        self.submission.reset();
        self.add_log(
            RecordKind::Error,
            "Session expired. Please log in again.".to_string(),
        );
    }

    // === Network actions ===

    async fn perform(&mut self, action: NetAction) {
        match action {
            NetAction::Login => self.do_login().await,
            NetAction::Register => self.do_register().await,
            NetAction::LoadRecipes => self.load_recipes().await,
            NetAction::OpenDetail(id) => self.open_detail(id).await,
            NetAction::DeleteRecipe(id) => self.delete_recipe(id).await,
            NetAction::OpenAddRecipe => self.open_add_recipe().await,
            NetAction::SubmitRecipe => self.submit_recipe().await,
        }
    }

    async fn do_login(&mut self) {
        let username = self.login_form.value(0).trim().to_string();
        let password = self.login_form.value(1).to_string();
        if username.is_empty() || password.is_empty() {
            self.add_log(
                RecordKind::Error,
                "Please enter a username and password.".to_string(),
            );
            return;
        }

        match self.api.login(&username, &password).await {
            Ok(()) => {
                self.login_form.clear();
                self.add_log(RecordKind::Info, format!("Welcome, {username}!"));
                self.load_recipes().await;
            }
            Err(ApiError::Server(detail)) => {
                self.add_log(RecordKind::Error, format!("Login failed: {detail}"));
            }
            Err(e) => self.add_log(RecordKind::Error, e.to_string()),
        }
    }

    async fn do_register(&mut self) {
        let username = self.register_form.value(0).trim().to_string();
        let email = self.register_form.value(1).trim().to_string();
        let password = self.register_form.value(2).to_string();
        let confirm = self.register_form.value(3).to_string();

        if username.is_empty() || email.is_empty() || password.is_empty() {
            self.add_log(
                RecordKind::Error,
                "Username, email, and password are required.".to_string(),
            );
            return;
        }
        if password != confirm {
            self.add_log(RecordKind::Error, "Passwords do not match!".to_string());
            return;
        }

        match self.api.register(&username, &email, &password).await {
            Ok(()) => {
                self.register_form.clear();
                self.screen = Screen::Login;
                self.add_log(
                    RecordKind::Info,
                    "Registration successful! You can now log in.".to_string(),
                );
            }
            Err(ApiError::Server(detail)) => {
                self.add_log(RecordKind::Error, detail);
            }
            Err(e) => self.add_log(RecordKind::Error, e.to_string()),
        }
    }

    async fn load_recipes(&mut self) {
        match self.api.list_recipes().await {
            Ok(recipes) => {
                self.recipes = recipes;
                self.recipe_state.select(if self.recipes.is_empty() {
                    None
                } else {
                    Some(0)
                });
                self.screen = Screen::RecipeList;
            }
            Err(ApiError::Auth) => {
                self.auth_expired();
                return;
            }
            Err(_) => {
                self.add_log(
                    RecordKind::Error,
                    "Failed to fetch recipes. Please try again.".to_string(),
                );
                return;
            }
        }

        // Header greeting only; a failure here is not worth surfacing
        if self.profile.is_none() {
            if let Ok(profile) = self.api.fetch_profile().await {
                self.profile = Some(profile);
            }
        }
    }

    async fn open_detail(&mut self, id: i64) {
        match self.api.get_recipe(id).await {
            Ok(recipe) => {
                self.detail = Some(recipe);
                self.screen = Screen::RecipeDetail;
            }
            Err(ApiError::Auth) => self.auth_expired(),
            Err(ApiError::Server(_)) => {
                self.add_log(RecordKind::Error, "Recipe not found.".to_string());
            }
            Err(e) => self.add_log(RecordKind::Error, e.to_string()),
        }
    }

    async fn delete_recipe(&mut self, id: i64) {
        match self.api.delete_recipe(id).await {
            Ok(()) => {
                self.detail = None;
                self.add_log(RecordKind::Info, "Recipe deleted successfully".to_string());
                self.load_recipes().await;
            }
            Err(ApiError::Auth) => self.auth_expired(),
            Err(e) => self.add_log(RecordKind::Error, format!("Failed to delete recipe: {e}")),
        }
    }

    /// Load the author id and category set the submission pipeline needs,
    /// then open a fresh add-recipe form.
    async fn open_add_recipe(&mut self) {
        let profile = match self.api.fetch_profile().await {
            Ok(profile) => profile,
            Err(ApiError::Auth) => {
                self.auth_expired();
                return;
            }
            Err(e) => {
                self.add_log(RecordKind::Error, format!("Failed to fetch profile: {e}"));
                return;
            }
        };
        let categories = match self.api.list_categories().await {
            Ok(categories) => categories,
            Err(ApiError::Auth) => {
                self.auth_expired();
                return;
            }
            Err(e) => {
                self.add_log(RecordKind::Error, format!("Failed to fetch categories: {e}"));
                return;
            }
        };

        self.profile = Some(profile);
        self.categories = categories;
        self.add_form.clear();
        self.add_focus = 0;
        self.category_idx = None;
        self.submission.reset();
        self.screen = Screen::AddRecipe;
    }

    async fn submit_recipe(&mut self) {
        // Required-field presence is the view's check; the pipeline owns the
        // category and duplicate rules.
        if (0..=FIELD_INSTRUCTIONS).any(|idx| self.add_form.value(idx).trim().is_empty()) {
            self.add_log(RecordKind::Error, "All recipe fields are required.".to_string());
            return;
        }
        let Some(author) = self.profile.as_ref().map(|profile| profile.id) else {
            self.add_log(RecordKind::Error, "No author profile loaded.".to_string());
            return;
        };

        let draft = RecipeDraft {
            title: self.add_form.value(FIELD_TITLE).trim().to_string(),
            description: self.add_form.value(FIELD_DESCRIPTION).trim().to_string(),
            ingredients: self.add_form.value(FIELD_INGREDIENTS).trim().to_string(),
            instructions: self.add_form.value(FIELD_INSTRUCTIONS).trim().to_string(),
            selected_category: self
                .category_idx
                .and_then(|idx| self.categories.get(idx))
                .map(|category| category.id),
            new_category: self.add_form.value(FIELD_NEW_CATEGORY).to_string(),
        };

        let state = self
            .submission
            .submit(&self.api, &draft, &self.categories, author)
            .await
            .clone();
        match state {
            SubmitState::Succeeded => {
                self.add_form.clear();
                self.category_idx = None;
                self.submission.reset();
                self.add_log(RecordKind::Info, "Recipe added successfully!".to_string());
                self.load_recipes().await;
            }
            SubmitState::Failed(message) => {
                self.add_log(RecordKind::Error, message);
            }
            SubmitState::Unauthenticated => self.auth_expired(),
            // submit() only returns terminal states
            other => self.add_log(RecordKind::Alert, format!("Unexpected state {other:?}")),
        }
    }

    // === Key handling ===

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Control {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match code {
                KeyCode::Up => self.log_handle.move_up(),
                KeyCode::Down => self.log_handle.move_down(),
                KeyCode::Home => self.log_handle.jump_to_first(),
                KeyCode::End => self.log_handle.jump_to_last(),
                KeyCode::Char('c') => return Control::Quit,
                _ => {}
            }
            return Control::Continue;
        }

        match self.screen {
            Screen::Login => self.handle_login_key(code),
            Screen::Register => self.handle_register_key(code),
            Screen::RecipeList => self.handle_list_key(code),
            Screen::RecipeDetail => self.handle_detail_key(code),
            Screen::AddRecipe => self.handle_add_key(code),
        }
    }

    fn handle_login_key(&mut self, code: KeyCode) -> Control {
        match code {
            KeyCode::Enter => return Control::Action(NetAction::Login),
            KeyCode::Tab => {
                self.screen = Screen::Register;
            }
            KeyCode::Esc => return Control::Quit,
            KeyCode::Down => self.login_form.next_field(),
            KeyCode::Up | KeyCode::BackTab => self.login_form.prev_field(),
            _ => Self::edit_field(self.login_form.focused_mut(), code),
        }
        Control::Continue
    }

    fn handle_register_key(&mut self, code: KeyCode) -> Control {
        match code {
            KeyCode::Enter => return Control::Action(NetAction::Register),
            KeyCode::Esc => {
                self.screen = Screen::Login;
            }
            KeyCode::Tab | KeyCode::Down => self.register_form.next_field(),
            KeyCode::Up | KeyCode::BackTab => self.register_form.prev_field(),
            _ => Self::edit_field(self.register_form.focused_mut(), code),
        }
        Control::Continue
    }

    fn handle_list_key(&mut self, code: KeyCode) -> Control {
        match code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Up => {
                let selected = self.recipe_state.selected().unwrap_or(0);
                self.recipe_state.select(Some(selected.saturating_sub(1)));
            }
            KeyCode::Down => {
                if !self.recipes.is_empty() {
                    let selected = self.recipe_state.selected().unwrap_or(0);
                    self.recipe_state
                        .select(Some((selected + 1).min(self.recipes.len() - 1)));
                }
            }
            KeyCode::Enter => {
                if let Some(recipe) = self
                    .recipe_state
                    .selected()
                    .and_then(|idx| self.recipes.get(idx))
                {
                    return Control::Action(NetAction::OpenDetail(recipe.id));
                }
            }
            KeyCode::Char('a') => return Control::Action(NetAction::OpenAddRecipe),
            KeyCode::Char('r') => return Control::Action(NetAction::LoadRecipes),
            KeyCode::Char('x') => {
                self.api.logout();
                self.screen = Screen::Login;
                self.profile = None;
                self.recipes.clear();
                self.add_log(RecordKind::Info, "Logged out.".to_string());
            }
            _ => {}
        }
        Control::Continue
    }

    fn handle_detail_key(&mut self, code: KeyCode) -> Control {
        match code {
            KeyCode::Esc => {
                self.detail = None;
                self.screen = Screen::RecipeList;
            }
            KeyCode::Char('d') => {
                if let Some(recipe) = &self.detail {
                    return Control::Action(NetAction::DeleteRecipe(recipe.id));
                }
            }
            _ => {}
        }
        Control::Continue
    }

    fn handle_add_key(&mut self, code: KeyCode) -> Control {
        let selector_row = self.add_form.fields.len();
        match code {
            KeyCode::Enter => return Control::Action(NetAction::SubmitRecipe),
            KeyCode::Esc => {
                self.screen = Screen::RecipeList;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.add_focus = (self.add_focus + 1) % (selector_row + 1);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.add_focus = (self.add_focus + selector_row) % (selector_row + 1);
            }
            KeyCode::Left if self.add_focus == selector_row => {
                self.category_idx = match self.category_idx {
                    None => None,
                    Some(0) => None,
                    Some(idx) => Some(idx - 1),
                };
            }
            KeyCode::Right if self.add_focus == selector_row => {
                self.category_idx = match self.category_idx {
                    None if self.categories.is_empty() => None,
                    None => Some(0),
                    Some(idx) => Some((idx + 1).min(self.categories.len() - 1)),
                };
            }
            _ if self.add_focus < selector_row => {
                self.add_form.focus = self.add_focus;
                Self::edit_field(self.add_form.focused_mut(), code);
            }
            _ => {}
        }
        Control::Continue
    }

    fn edit_field(input: &mut widgets::UserInput, code: KeyCode) {
        match code {
            KeyCode::Char(to_insert) => input.input(to_insert),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.jump_to_first(),
            KeyCode::End => input.jump_to_last(),
            _ => {}
        }
    }

    // === Rendering ===

    fn draw_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &Form, focus: usize) {
        let lines: Vec<Line> = form
            .fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let label = format!("{:<18}", format!("{}:", field.label));
                let value = field.display_value();
                if idx == focus {
                    Line::from(vec![label.bold().white(), value.into()])
                } else {
                    Line::from(vec![Span::raw(label), value.into()])
                }
            })
            .collect();

        let block = Block::bordered()
            .padding(Padding::uniform(1))
            .title(format!(" {title}  "));
        frame.render_widget(Paragraph::new(lines).block(block), area);

        // Place the cursor inside the focused field
        if let Some(field) = form.fields.get(focus) {
            let cursor_x = area.x + 2 + 18 + field.input.char_idx as u16;
            let cursor_y = area.y + 2 + focus as u16;
            frame.set_cursor_position(Position::new(cursor_x, cursor_y));
        }
    }

    fn draw_login(&self, frame: &mut Frame, area: Rect) {
        let [form_area] = Layout::vertical([Constraint::Max(8)])
            .flex(Flex::Center)
            .areas(area);
        let [form_area] = Layout::horizontal([Constraint::Max(64)])
            .flex(Flex::Center)
            .areas(form_area);
        self.draw_form(frame, form_area, "login", &self.login_form, self.login_form.focus);
    }

    fn draw_register(&self, frame: &mut Frame, area: Rect) {
        let [form_area] = Layout::vertical([Constraint::Max(10)])
            .flex(Flex::Center)
            .areas(area);
        let [form_area] = Layout::horizontal([Constraint::Max(64)])
            .flex(Flex::Center)
            .areas(form_area);
        self.draw_form(
            frame,
            form_area,
            "register",
            &self.register_form,
            self.register_form.focus,
        );
    }

    fn draw_recipe_list(&mut self, frame: &mut Frame, area: Rect) {
        let username = self
            .profile
            .as_ref()
            .map_or("Guest", |profile| profile.username.as_str());
        let title = format!(" Welcome, {username}! Your recipes  ");

        if self.recipes.is_empty() {
            let empty = Paragraph::new("No recipes found. Start by adding your first recipe!")
                .block(Block::bordered().padding(Padding::uniform(1)).title(title));
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .recipes
            .iter()
            .map(|recipe| {
                ListItem::new(Line::from(vec![
                    recipe.title.clone().bold(),
                    format!("  {}", recipe.description).into(),
                ]))
            })
            .collect();
        let list = List::new(items)
            .highlight_symbol("→ ")
            .highlight_style(Style::default().white().bold())
            .block(Block::bordered().padding(Padding::uniform(1)).title(title));
        frame.render_stateful_widget(list, area, &mut self.recipe_state);
    }

    fn draw_recipe_detail(&self, frame: &mut Frame, area: Rect) {
        let Some(recipe) = &self.detail else {
            frame.render_widget(Paragraph::new("Recipe not found."), area);
            return;
        };

        let lines = vec![
            Line::from(vec!["Description:  ".bold(), recipe.description.clone().into()]),
            Line::from(vec!["Ingredients:  ".bold(), recipe.ingredients.clone().into()]),
            Line::from(vec![
                "Instructions: ".bold(),
                recipe.instructions.clone().into(),
            ]),
            Line::from(vec![
                "Category:     ".bold(),
                recipe.category_name.clone().unwrap_or_else(|| "N/A".to_string()).into(),
            ]),
            Line::from(vec!["Author:       ".bold(), recipe.author.to_string().into()]),
        ];
        let detail = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::bordered()
                .padding(Padding::uniform(1))
                .title(format!(" {}  ", recipe.title)),
        );
        frame.render_widget(detail, area);
    }

    fn draw_add_recipe(&self, frame: &mut Frame, area: Rect) {
        let selector_row = self.add_form.fields.len();
        let mut lines: Vec<Line> = self
            .add_form
            .fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let label = format!("{:<18}", format!("{}:", field.label));
                if idx == self.add_focus {
                    Line::from(vec![label.bold().white(), field.display_value().into()])
                } else {
                    Line::from(vec![Span::raw(label), field.display_value().into()])
                }
            })
            .collect();

        let selection = match self.category_idx.and_then(|idx| self.categories.get(idx)) {
            Some(category) => format!("← {} →", category.name),
            None if self.categories.is_empty() => "(none yet — enter a new one)".to_string(),
            None => "← select →".to_string(),
        };
        let label = format!("{:<18}", "Existing category:");
        lines.push(if self.add_focus == selector_row {
            Line::from(vec![label.bold().white(), selection.light_yellow()])
        } else {
            Line::from(vec![Span::raw(label), selection.into()])
        });

        // The submission runs to a terminal state within one pending window,
        // so a single in-flight line covers the whole pipeline.
        if self.pending {
            lines.push(Line::default());
            lines.push(Line::from("Adding...".light_yellow()));
        }

        let form = Paragraph::new(lines).block(
            Block::bordered()
                .padding(Padding::uniform(1))
                .title(" add a new recipe  "),
        );
        frame.render_widget(form, area);

        if let Some(field) = self.add_form.fields.get(self.add_focus) {
            let cursor_x = area.x + 2 + 18 + field.input.char_idx as u16;
            let cursor_y = area.y + 2 + self.add_focus as u16;
            frame.set_cursor_position(Position::new(cursor_x, cursor_y));
        }
    }

    /// Render the log/history window with scrollbar
    fn draw_log(&mut self, frame: &mut Frame, area: Rect) {
        let log_records = self.log_handle.list_items.clone();
        let log_records = List::new(log_records)
            .direction(ListDirection::BottomToTop)
            .block(Block::bordered().title(" messages  "));
        frame.render_stateful_widget(log_records, area, &mut self.log_handle.list_state);

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.log_handle.scroll_state,
        );
    }

    /// Render the help/status bar at the bottom
    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let status_indicator = if self.pending {
            "● Working...".light_yellow()
        } else if self.api.is_authenticated() {
            "● Signed in".green()
        } else {
            "● Signed out".red()
        };

        let keys: &[(&str, &str)] = match self.screen {
            Screen::Login => &[
                ("Enter", "log in"),
                ("Tab", "register"),
                ("Esc", "exit"),
            ],
            Screen::Register => &[("Enter", "register"), ("Esc", "back to login")],
            Screen::RecipeList => &[
                ("Enter", "view"),
                ("a", "add recipe"),
                ("r", "refresh"),
                ("x", "logout"),
                ("Esc", "exit"),
            ],
            Screen::RecipeDetail => &[("d", "delete"), ("Esc", "back")],
            Screen::AddRecipe => &[
                ("Enter", "submit"),
                ("Tab", "next field"),
                ("←/→", "pick category"),
                ("Esc", "back"),
            ],
        };

        let mut help_message = vec![status_indicator];
        for (key, action) in keys {
            help_message.push(" | ".into());
            help_message.push(key.bold().white());
            help_message.push(format!(" {action}").into());
        }
        frame.render_widget(Paragraph::new(Line::from(help_message)), area);
    }

    /// Main draw function - orchestrates rendering of all UI components
    fn draw(&mut self, frame: &mut Frame) {
        let window = Layout::vertical([
            Constraint::Min(6),    // Screen area
            Constraint::Max(10),   // Message log
            Constraint::Length(1), // Help bar
        ]);
        let [screen_area, log_area, help_area] = window.areas(frame.area());

        match self.screen {
            Screen::Login => self.draw_login(frame, screen_area),
            Screen::Register => self.draw_register(frame, screen_area),
            Screen::RecipeList => self.draw_recipe_list(frame, screen_area),
            Screen::RecipeDetail => self.draw_recipe_detail(frame, screen_area),
            Screen::AddRecipe => self.draw_add_recipe(frame, screen_area),
        }
        self.draw_log(frame, log_area);
        self.draw_help_bar(frame, help_area);
    }

    /// Run the TUI application
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        // A persisted session goes straight to the list; a 401 on this first
        // load purges it and falls back to login.
        if self.api.is_authenticated() {
            self.pending = true;
            terminal.draw(|frame| self.draw(frame))?;
            self.load_recipes().await;
            self.pending = false;
        }

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(POLL_TIMEOUT)?
                && let Event::Key(KeyEvent {
                    code,
                    modifiers,
                    kind,
                    ..
                }) = event::read()?
                && kind == KeyEventKind::Press
            {
                match self.handle_key(code, modifiers) {
                    Control::Continue => {}
                    Control::Quit => return Ok(()),
                    Control::Action(action) => {
                        // One network action at a time; show the pending
                        // indicator while it runs.
                        self.pending = true;
                        terminal.draw(|frame| self.draw(frame))?;
                        self.perform(action).await;
                        self.pending = false;
                    }
                }
            }
        }
    }
}
