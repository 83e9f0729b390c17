use crate::app::AppState;
use crate::domain::UiMode;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // Any key dismisses a pending error line
    if app.ui_mode == UiMode::Normal {
        app.clear_error();
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingGoal | UiMode::EditingGoal => handle_input_form_mode(app, key),
        UiMode::ConfirmDelete => handle_confirm_delete_mode(app, key),
        UiMode::EditingYears => handle_years_mode(app, key),
        UiMode::Onboarding => handle_onboarding_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_selection_up();
            Ok(false)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_selection_down();
            Ok(false)
        }

        // Add goal
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.start_add_goal();
            Ok(false)
        }

        // Edit goal (open form with existing data)
        KeyCode::Char('e') | KeyCode::Char('E') => {
            app.start_edit_goal();
            Ok(false)
        }

        // Delete goal (asks first)
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('x') | KeyCode::Delete => {
            app.start_delete_goal();
            Ok(false)
        }

        // Productive years
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.start_edit_years();
            Ok(false)
        }

        // Walk through first run again
        KeyCode::Char('o') | KeyCode::Char('O') => {
            app.restart_onboarding();
            Ok(false)
        }

        // Reload from store
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.load_goals();
            Ok(false)
        }

        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => Ok(true),

        _ => Ok(false),
    }
}

/// Handle keys in input form mode (adding or editing a goal)
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Submit form
        KeyCode::Enter => {
            app.submit_input_form();
            Ok(false)
        }

        // Cancel form
        KeyCode::Esc => {
            app.clear_error();
            app.cancel_input_form();
            Ok(false)
        }

        // Next field
        KeyCode::Tab => {
            app.input_form_toggle_field();
            Ok(false)
        }

        KeyCode::Backspace => {
            app.input_form_backspace();
            Ok(false)
        }

        KeyCode::Char(c) => {
            app.input_form_add_char(c);
            Ok(false)
        }

        _ => Ok(false),
    }
}

fn handle_confirm_delete_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            app.confirm_delete();
            Ok(false)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.cancel_delete();
            Ok(false)
        }
        _ => Ok(false),
    }
}

fn handle_years_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => {
            app.submit_years();
            Ok(false)
        }
        KeyCode::Esc => {
            app.cancel_edit_years();
            Ok(false)
        }
        KeyCode::Backspace => {
            app.years_input_backspace();
            Ok(false)
        }
        KeyCode::Char(c) => {
            app.years_input_add_digit(c);
            Ok(false)
        }
        _ => Ok(false),
    }
}

fn handle_onboarding_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter | KeyCode::Right | KeyCode::Char(' ') => {
            app.advance_onboarding();
            Ok(false)
        }
        KeyCode::Left | KeyCode::Backspace => {
            app.onboarding_back();
            Ok(false)
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => Ok(true),
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Goal, OnboardingStep};
    use chrono::{Duration, Utc};
    use crossterm::event::KeyModifiers;
    use tempfile::{tempdir, TempDir};

    fn create_test_app() -> (TempDir, AppState) {
        let temp_dir = tempdir().unwrap();
        let mut app = AppState::open(temp_dir.path()).unwrap();
        for (name, days) in [("Soon", 5), ("Later", 50)] {
            let goal = Goal::new(app.user.id, name.to_string(), Utc::now() + Duration::days(days));
            app.create_goal(goal);
        }
        (temp_dir, app)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_handle_navigation() {
        let (_dir, mut app) = create_test_app();
        assert_eq!(app.selected_index, 0);

        handle_key(&mut app, key(KeyCode::Down)).unwrap();
        assert_eq!(app.selected_index, 1);

        handle_key(&mut app, key(KeyCode::Char('k'))).unwrap();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_handle_quit() {
        let (_dir, mut app) = create_test_app();
        let should_quit = handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(should_quit);
    }

    #[test]
    fn test_add_goal_via_keys() {
        let (_dir, mut app) = create_test_app();

        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::AddingGoal);

        // 'q' is text while the form is open
        type_text(&mut app, "Quit sugar");
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        type_text(&mut app, "2099-01-31");
        let should_quit = handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert!(!should_quit);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.goals.len(), 3);
        assert_eq!(app.goals[2].name, "Quit sugar");
    }

    #[test]
    fn test_escape_cancels_form() {
        let (_dir, mut app) = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        type_text(&mut app, "Nope");
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.input_form.is_none());
        assert_eq!(app.goals.len(), 2);
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let (_dir, mut app) = create_test_app();

        handle_key(&mut app, key(KeyCode::Char('d'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::ConfirmDelete);
        handle_key(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.goals.len(), 2);

        handle_key(&mut app, key(KeyCode::Char('d'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('y'))).unwrap();
        assert_eq!(app.goals.len(), 1);
        assert_eq!(app.goals[0].name, "Later");
    }

    #[test]
    fn test_edit_years_via_keys() {
        let (_dir, mut app) = create_test_app();

        handle_key(&mut app, key(KeyCode::Char('y'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::EditingYears);
        handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        type_text(&mut app, "12");
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.settings.productive_years(), 12);
    }

    #[test]
    fn test_first_run_walkthrough() {
        let temp_dir = tempdir().unwrap();
        let mut app = AppState::open(temp_dir.path()).unwrap();
        assert!(!app.settings.has_completed_onboarding);
        app.start_onboarding();

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.onboarding, Some(OnboardingStep::YearContext));

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.ui_mode, UiMode::EditingYears);
        handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        type_text(&mut app, "40");
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        // Years saved, the goal form opens next
        assert_eq!(app.settings.productive_years(), 40);
        assert_eq!(app.ui_mode, UiMode::AddingGoal);
        type_text(&mut app, "Learn piano");
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        type_text(&mut app, "2099-03-01");
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.ui_mode, UiMode::Onboarding);
        assert!(matches!(app.onboarding, Some(OnboardingStep::CountdownBegins { .. })));
        assert!(!app.settings.has_completed_onboarding);

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.settings.has_completed_onboarding);
        assert_eq!(app.goals.len(), 1);
        assert_eq!(app.goals[0].name, "Learn piano");
    }

    #[test]
    fn test_onboarding_keys_do_not_leak_to_list() {
        let temp_dir = tempdir().unwrap();
        let mut app = AppState::open(temp_dir.path()).unwrap();
        app.start_onboarding();

        // 'a' and 'd' mean nothing on a walkthrough screen
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('d'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Onboarding);
        assert_eq!(app.onboarding, Some(OnboardingStep::Welcome));

        assert!(handle_key(&mut app, key(KeyCode::Char('q'))).unwrap());
    }

    #[test]
    fn test_restart_onboarding_key() {
        let (_dir, mut app) = create_test_app();
        app.complete_onboarding().unwrap();

        handle_key(&mut app, key(KeyCode::Char('o'))).unwrap();

        assert_eq!(app.ui_mode, UiMode::Onboarding);
        assert_eq!(app.onboarding, Some(OnboardingStep::Welcome));
        assert!(app.goals.is_empty());
        assert!(!app.settings.has_completed_onboarding);
    }
}
