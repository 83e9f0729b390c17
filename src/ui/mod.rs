pub mod details_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod styles;
pub mod year_pane;

use crate::app::AppState;
use details_pane::render_details_pane;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::{render_confirm_delete_modal, render_onboarding_modal, render_years_modal};
use ratatui::{widgets::Paragraph, Frame};
use styles::error_style;
use year_pane::render_year_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    // Render keybindings bar
    render_keybindings(f, layout.keybindings_area);

    // Render panes
    render_list_pane(f, app, layout.list_area);
    render_details_pane(f, app, layout.details_area);
    render_year_pane(f, app, layout.year_area);

    // Error line stays until the next key
    if let Some(error) = &app.error_message {
        let status = Paragraph::new(format!(" {}", error)).style(error_style());
        f.render_widget(status, layout.status_area);
    }

    // Render overlays
    render_confirm_delete_modal(f, app, size);
    render_onboarding_modal(f, app, size);
    render_years_modal(f, app, size);

    // Render input form if active
    if app.input_form.is_some() {
        render_input_form(f, app, size);
    }
}
