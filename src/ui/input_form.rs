use crate::app::{AppState, GoalFormState};
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Label and value for each form field, in tab order
fn fields(form: &GoalFormState) -> [(&'static str, &str); 4] {
    [
        ("Goal:", form.name.as_str()),
        ("Deadline (YYYY-MM-DD):", form.deadline.as_str()),
        ("Why it matters:", form.why.as_str()),
        ("What you'll regret:", form.regret.as_str()),
    ]
}

/// Render the input form for adding or editing a goal
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(form) = &app.input_form else {
        return;
    };

    let modal_area = create_modal_area(area);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let title_text = if form.editing_goal_id.is_some() {
        " Edit Goal "
    } else {
        " New Goal "
    };

    let mut lines = Vec::new();
    for (idx, (label, value)) in fields(form).into_iter().enumerate() {
        let editing = form.editing_field == idx;
        lines.push(Line::raw(if editing {
            format!("{} (editing)", label)
        } else {
            label.to_string()
        }));
        lines.push(Line::from(vec![
            Span::raw("> "),
            Span::styled(value.to_string(), modal_title_style()),
            if editing {
                Span::styled("█", modal_title_style()) // Cursor
            } else {
                Span::raw("")
            },
        ]));
    }
    lines.push(Line::raw(""));

    if let Some(error) = &app.error_message {
        lines.push(Line::styled(error.clone(), error_style()));
    }

    // Instructions
    lines.push(Line::raw("Tab to switch fields  ·  Enter to save  ·  Esc to cancel"));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title_text, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
