use url::Url;

use crate::catalog::{Catalog, Outcome};
use crate::models::{Category, CategoryFilter, NewResource, Resource, ResourceFilter};
use crate::tui::{AppAction, InputMode};

const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields (*)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Category,
    Url,
    Description,
}

impl FormField {
    const ORDER: [FormField; 4] = [
        FormField::Title,
        FormField::Category,
        FormField::Url,
        FormField::Description,
    ];

    fn index(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Draft of a resource being typed into the add form.
#[derive(Debug, Clone, Default)]
pub struct ResourceForm {
    pub title: String,
    pub category: Category,
    pub url: String,
    pub description: String,
    pub focus: FormField,
}

impl ResourceForm {
    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Url => Some(&mut self.url),
            FormField::Description => Some(&mut self.description),
            FormField::Category => None,
        }
    }

    /// Checks required fields and the URL, producing the insert payload.
    pub fn validate(&self) -> std::result::Result<NewResource, String> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err(REQUIRED_FIELDS_MESSAGE.to_string());
        }

        let url = normalize_url(self.url.trim())?;

        Ok(NewResource::new(
            self.title.trim(),
            self.category,
            url,
            self.description.trim(),
        ))
    }
}

/// Accepts absolute URLs as typed and bare hosts like `www.example.org`,
/// which get an `https://` prefix.
fn normalize_url(url: &str) -> std::result::Result<String, String> {
    if url.is_empty() {
        return Ok(String::new());
    }

    match Url::parse(url) {
        Ok(_) => Ok(url.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let prefixed = format!("https://{url}");
            Url::parse(&prefixed).map_err(|e| format!("Invalid URL {url:?}: {e}"))?;
            Ok(prefixed)
        }
        Err(e) => Err(format!("Invalid URL {url:?}: {e}")),
    }
}

pub struct App {
    // Data
    pub resources: Vec<Resource>,

    // UI State
    pub selected_index: usize,
    pub category_filter: CategoryFilter,
    pub search_input: String,
    pub mode: InputMode,
    pub form: ResourceForm,
    pub show_help: bool,
    pub status: Option<StatusMessage>,

    // Services
    catalog: Catalog,
}

impl App {
    pub async fn new(catalog: Catalog) -> Self {
        let mut app = Self {
            resources: Vec::new(),
            selected_index: 0,
            category_filter: CategoryFilter::All,
            search_input: String::new(),
            mode: InputMode::Browse,
            form: ResourceForm::default(),
            show_help: false,
            status: None,
            catalog,
        };
        app.reload_resources().await;
        app
    }

    pub fn filter(&self) -> ResourceFilter {
        ResourceFilter::new(self.category_filter.category(), Some(&self.search_input))
    }

    pub fn selected_resource(&self) -> Option<&Resource> {
        self.resources.get(self.selected_index)
    }

    pub async fn handle_action(&mut self, action: AppAction) -> bool {
        match action {
            AppAction::Quit => return true,

            AppAction::MoveUp => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }

            AppAction::MoveDown => {
                if self.selected_index + 1 < self.resources.len() {
                    self.selected_index += 1;
                }
            }

            AppAction::MoveToTop => {
                self.selected_index = 0;
            }

            AppAction::MoveToBottom => {
                self.selected_index = self.resources.len().saturating_sub(1);
            }

            AppAction::CycleCategory => {
                self.category_filter = self.category_filter.cycle();
                self.selected_index = 0;
                self.reload_resources().await;
            }

            AppAction::CycleCategoryBack => {
                self.category_filter = self.category_filter.cycle_back();
                self.selected_index = 0;
                self.reload_resources().await;
            }

            AppAction::OpenInBrowser => self.open_selected(),

            AppAction::DeleteResource => {
                if let Some(resource) = self.selected_resource() {
                    let id = resource.id;
                    let outcome = self.catalog.delete_by_id(id).await;
                    self.report(outcome, "Resource deleted successfully!");
                    self.reload_resources().await;
                }
            }

            AppAction::DeleteByTitle => {
                if let Some(resource) = self.selected_resource() {
                    let title = resource.title.clone();
                    let outcome = self.catalog.delete(&title).await;
                    self.report(outcome, &format!("Deleted every resource titled {title:?}"));
                    self.reload_resources().await;
                }
            }

            AppAction::ShowHelp => {
                self.show_help = true;
            }

            AppAction::HideHelp => {
                self.show_help = false;
            }

            AppAction::StartSearch => {
                self.mode = InputMode::Search;
            }

            AppAction::SearchChar(c) => {
                self.search_input.push(c);
                self.selected_index = 0;
                self.reload_resources().await;
            }

            AppAction::SearchBackspace => {
                self.search_input.pop();
                self.selected_index = 0;
                self.reload_resources().await;
            }

            AppAction::SearchConfirm => {
                self.mode = InputMode::Browse;
            }

            AppAction::SearchCancel => {
                self.mode = InputMode::Browse;
                if !self.search_input.is_empty() {
                    self.search_input.clear();
                    self.selected_index = 0;
                    self.reload_resources().await;
                }
            }

            AppAction::OpenForm => {
                self.form = ResourceForm::default();
                self.mode = InputMode::Form;
            }

            AppAction::FormChar(c) => {
                if let Some(text) = self.form.focused_text() {
                    text.push(c);
                }
            }

            AppAction::FormBackspace => {
                if let Some(text) = self.form.focused_text() {
                    text.pop();
                }
            }

            AppAction::FormNextField => {
                self.form.focus = self.form.focus.next();
            }

            AppAction::FormPrevField => {
                self.form.focus = self.form.focus.prev();
            }

            AppAction::FormCategoryNext => {
                if self.form.focus == FormField::Category {
                    self.form.category = self.form.category.next();
                }
            }

            AppAction::FormCategoryPrev => {
                if self.form.focus == FormField::Category {
                    self.form.category = self.form.category.prev();
                }
            }

            AppAction::FormSubmit => self.submit_form().await,

            AppAction::FormCancel => {
                self.mode = InputMode::Browse;
                self.form = ResourceForm::default();
            }
        }

        false
    }

    async fn submit_form(&mut self) {
        let resource = match self.form.validate() {
            Ok(resource) => resource,
            Err(message) => {
                // Keep the form open so the user can fix it
                self.set_error(message);
                return;
            }
        };

        let outcome = self.catalog.add(resource).await;
        if outcome.is_ok() && outcome.value {
            self.mode = InputMode::Browse;
            self.form = ResourceForm::default();
            self.selected_index = 0;
        }
        self.report(outcome, "Resource added successfully!");
        self.reload_resources().await;
    }

    fn open_selected(&mut self) {
        let Some(resource) = self.selected_resource() else {
            return;
        };

        match resource.url.clone() {
            Some(url) => {
                if let Err(e) = open::that(&url) {
                    tracing::warn!("Failed to open {}: {}", url, e);
                    self.set_error(format!("Could not open {url}: {e}"));
                }
            }
            None => {
                self.status = Some(StatusMessage {
                    text: "This resource has no URL".to_string(),
                    is_error: false,
                });
            }
        }
    }

    /// Re-runs the listing with the current filters. The catalog pushes no
    /// change notifications, so this follows every mutation.
    pub async fn reload_resources(&mut self) {
        let outcome = self.catalog.list(&self.filter()).await;
        if let Some(message) = outcome.error {
            self.set_error(message);
        }
        self.resources = outcome.value;

        if self.selected_index >= self.resources.len() {
            self.selected_index = self.resources.len().saturating_sub(1);
        }
    }

    fn report(&mut self, outcome: Outcome<bool>, success: &str) {
        match outcome.error {
            Some(message) => self.set_error(message),
            None => {
                self.status = Some(StatusMessage {
                    text: success.to_string(),
                    is_error: false,
                });
            }
        }
    }

    fn set_error(&mut self, text: String) {
        self.status = Some(StatusMessage {
            text,
            is_error: true,
        });
    }
}
