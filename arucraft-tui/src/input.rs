//! Keyboard input handling

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppResult};

/// Handle a key event
pub async fn handle_key(app: &mut App, key: KeyEvent) -> AppResult {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return AppResult::Quit,

        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('h') | KeyCode::Char('l') | KeyCode::Left | KeyCode::Right => {
            app.switch_focus()
        }

        // Sidebar
        KeyCode::Tab => app.toggle_sidebar(),
        KeyCode::Enter => app.open_selected(),

        // Data
        KeyCode::Char('r') => {
            app.refresh_player().await;
            app.refresh(true).await;
        }
        KeyCode::Char('v') => app.refresh_versions().await,

        KeyCode::Char('c') => app.status = None,
        _ => {}
    }
    AppResult::Continue
}
