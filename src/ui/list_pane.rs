use crate::app::AppState;
use crate::domain::Goal;
use crate::ui::styles::{
    border_style, default_style, muted_style, selected_style, title_style, urgency_badge_style,
};
use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Short "days left" label for a goal row
fn days_left_label(goal: &Goal, now: &DateTime<Local>) -> String {
    let remaining = goal.time_remaining_at(now);
    if remaining.is_zero() {
        "time's up".to_string()
    } else if remaining.days == 1 {
        "1 day".to_string()
    } else if remaining.days > 0 {
        format!("{} days", remaining.days)
    } else {
        format!("{}h {}m", remaining.hours, remaining.minutes)
    }
}

fn goal_row<'a>(goal: &'a Goal, app: &AppState, selected: bool) -> ListItem<'a> {
    let urgency = goal.urgency_level_at(&app.now);
    let text_style = if selected { selected_style() } else { default_style() };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", urgency.icon()), urgency_badge_style(urgency, app.pulse_on())),
        Span::styled(format!(" {}", goal.name), text_style),
        Span::styled(
            format!("  {}", days_left_label(goal, &app.now)),
            if selected { text_style } else { muted_style() },
        ),
    ]);
    ListItem::new(line)
}

/// Render the goal list, nearest deadline first
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Goals ", title_style()));

    if app.goals.is_empty() {
        let empty = Paragraph::new(vec![
            Line::raw(""),
            Line::raw(" No goals yet."),
            Line::raw(" Press 'a' to add one."),
        ])
        .style(muted_style())
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .goals
        .iter()
        .enumerate()
        .map(|(idx, goal)| goal_row(goal, app, idx == app.selected_index))
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    #[test]
    fn test_days_left_label() {
        let now = Local.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let user = Uuid::new_v4();
        let utc = |dt: DateTime<Local>| dt.with_timezone(&chrono::Utc);

        let far = Goal::new(user, "Far".to_string(), utc(now + Duration::days(10)));
        assert_eq!(days_left_label(&far, &now), "10 days");

        let close = Goal::new(user, "Close".to_string(), utc(now + Duration::minutes(90)));
        assert_eq!(days_left_label(&close, &now), "1h 30m");

        let past = Goal::new(user, "Past".to_string(), utc(now - Duration::days(1)));
        assert_eq!(days_left_label(&past, &now), "time's up");
    }
}
