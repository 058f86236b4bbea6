use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone)]
pub enum AppAction {
    Quit,
    SwitchTab,
    MoveUp,
    MoveDown,
    CyclePlatform,
    CycleTone,
    IncBatchCount,
    DecBatchCount,
    IncEmojiCount,
    DecEmojiCount,
    EditTopic,
    EditKeywords,
    Generate,
    SavePost,
    ExportPost,
    DeleteSaved,
    ClearAllSaved,
    ShowHelp,
    HideHelp,
    // Text input popup actions (topic / keywords)
    InputChar(char),
    InputBackspace,
    InputConfirm,
    InputCancel,
}

pub fn handle_key_event(key: KeyEvent, input_active: bool, show_help: bool) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    // Text input mode
    if input_active {
        return match key.code {
            KeyCode::Enter => Some(AppAction::InputConfirm),
            KeyCode::Esc => Some(AppAction::InputCancel),
            KeyCode::Backspace => Some(AppAction::InputBackspace),
            KeyCode::Char(c) => Some(AppAction::InputChar(c)),
            _ => None,
        };
    }

    // Normal mode
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Tab, _) => Some(AppAction::SwitchTab),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),

        (KeyCode::Char('p'), _) => Some(AppAction::CyclePlatform),
        (KeyCode::Char('t'), _) => Some(AppAction::CycleTone),
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), _) => Some(AppAction::IncBatchCount),
        (KeyCode::Char('-'), _) => Some(AppAction::DecBatchCount),
        (KeyCode::Char(']'), _) => Some(AppAction::IncEmojiCount),
        (KeyCode::Char('['), _) => Some(AppAction::DecEmojiCount),

        (KeyCode::Char('i'), _) => Some(AppAction::EditTopic),
        (KeyCode::Char('w'), _) => Some(AppAction::EditKeywords),

        (KeyCode::Char('g'), _) | (KeyCode::Enter, _) => Some(AppAction::Generate),
        (KeyCode::Char('s'), _) => Some(AppAction::SavePost),
        (KeyCode::Char('e'), _) => Some(AppAction::ExportPost),
        (KeyCode::Char('d'), KeyModifiers::NONE) => Some(AppAction::DeleteSaved),
        (KeyCode::Char('C'), KeyModifiers::SHIFT) => Some(AppAction::ClearAllSaved),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}
