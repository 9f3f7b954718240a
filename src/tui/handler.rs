use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Browse,
    Search,
    Form,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    MoveToTop,
    MoveToBottom,
    CycleCategory,
    CycleCategoryBack,
    OpenInBrowser,
    DeleteResource,
    DeleteByTitle,
    ShowHelp,
    HideHelp,
    // Search input actions
    StartSearch,
    SearchChar(char),
    SearchBackspace,
    SearchConfirm,
    SearchCancel,
    // Add-resource form actions
    OpenForm,
    FormChar(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    FormCategoryNext,
    FormCategoryPrev,
    FormSubmit,
    FormCancel,
}

pub fn handle_key_event(key: KeyEvent, mode: InputMode, show_help: bool) -> Option<AppAction> {
    // Ctrl-C quits from any mode, even while typing
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(AppAction::Quit);
    }

    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    match mode {
        InputMode::Search => match key.code {
            KeyCode::Enter => Some(AppAction::SearchConfirm),
            KeyCode::Esc => Some(AppAction::SearchCancel),
            KeyCode::Backspace => Some(AppAction::SearchBackspace),
            KeyCode::Char(c) => Some(AppAction::SearchChar(c)),
            _ => None,
        },

        InputMode::Form => match key.code {
            KeyCode::Enter => Some(AppAction::FormSubmit),
            KeyCode::Esc => Some(AppAction::FormCancel),
            KeyCode::Backspace => Some(AppAction::FormBackspace),
            KeyCode::Tab | KeyCode::Down => Some(AppAction::FormNextField),
            KeyCode::BackTab | KeyCode::Up => Some(AppAction::FormPrevField),
            KeyCode::Right => Some(AppAction::FormCategoryNext),
            KeyCode::Left => Some(AppAction::FormCategoryPrev),
            KeyCode::Char(c) => Some(AppAction::FormChar(c)),
            _ => None,
        },

        InputMode::Browse => match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) => Some(AppAction::Quit),

            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),
            (KeyCode::Char('<'), _) | (KeyCode::Home, _) => Some(AppAction::MoveToTop),
            (KeyCode::Char('>'), _) | (KeyCode::End, _) => Some(AppAction::MoveToBottom),

            (KeyCode::Char('f'), KeyModifiers::NONE) => Some(AppAction::CycleCategory),
            (KeyCode::Char('F'), _) => Some(AppAction::CycleCategoryBack),
            (KeyCode::Char('/'), _) => Some(AppAction::StartSearch),
            (KeyCode::Esc, _) => Some(AppAction::SearchCancel),

            (KeyCode::Char('o'), _) | (KeyCode::Enter, _) => Some(AppAction::OpenInBrowser),
            (KeyCode::Char('a'), _) => Some(AppAction::OpenForm),
            (KeyCode::Char('d'), KeyModifiers::NONE) => Some(AppAction::DeleteResource),
            (KeyCode::Char('D'), _) => Some(AppAction::DeleteByTitle),

            (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

            _ => None,
        },
    }
}
