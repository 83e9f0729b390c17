use crate::app::AppState;
use crate::domain::calendar::group_thousands;
use crate::ui::styles::{border_style, default_style, muted_style, title_style, urgency_badge_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn labelled<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![Span::styled(label, title_style()), Span::raw(value)])
}

/// Render the details pane for the selected goal
pub fn render_details_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Countdown ", title_style()));

    let Some(goal) = app.selected_goal() else {
        let empty = Paragraph::new("No goal selected").block(block);
        f.render_widget(empty, area);
        return;
    };

    let now = &app.now;
    let remaining = goal.time_remaining_at(now);
    let elapsed = goal.time_elapsed_at(now);
    let urgency = goal.urgency_level_at(now);
    let life = app.productive_life();
    let year = app.year_progress();

    let mut lines = Vec::new();

    // Name and urgency
    lines.push(Line::from(vec![
        Span::styled(
            format!(" {} {} ", urgency.icon(), urgency.label()),
            urgency_badge_style(urgency, app.pulse_on()),
        ),
        Span::styled(format!("  {}", goal.name), title_style()),
    ]));
    lines.push(labelled(
        "Deadline: ",
        goal.deadline
            .with_timezone(&now.timezone())
            .format("%Y-%m-%d %H:%M")
            .to_string(),
    ));
    lines.push(Line::raw(""));

    // Countdown
    lines.push(Line::from(Span::styled(
        remaining.formatted_countdown(),
        urgency_badge_style(urgency, true),
    )));
    lines.push(labelled("Hours:    ", remaining.formatted_hours()));
    lines.push(labelled("Minutes:  ", remaining.formatted_minutes()));
    lines.push(labelled("Seconds:  ", remaining.formatted_seconds()));
    lines.push(labelled(
        "Weeks:    ",
        format!("{}  (~{} months)", remaining.formatted_weeks(), remaining.formatted_months()),
    ));
    lines.push(labelled(
        "Workdays: ",
        format!("{}  ·  Weekends: {}", remaining.weekdays, remaining.weekends),
    ));
    lines.push(Line::raw(""));

    // Sunk cost and context
    lines.push(labelled(
        "Elapsed:  ",
        format!(
            "{} days ({:.1}% gone, {:.1}% left)",
            group_thousands(elapsed.days),
            elapsed.percent_elapsed,
            elapsed.percent_left()
        ),
    ));
    lines.push(labelled(
        "Of year:  ",
        format!("{:.0}% of what's left of {}", year.percent_of_year(remaining.days), year.year),
    ));
    lines.push(labelled(
        "Of life:  ",
        format!(
            "{:.2}% of ~{} productive days",
            life.percent_of_life(remaining.days),
            group_thousands(life.total_days())
        ),
    ));
    lines.push(Line::raw(""));

    // Rationale
    match &goal.why_it_matters {
        Some(why) => {
            lines.push(Line::from(Span::styled("Why it matters:", title_style())));
            lines.push(Line::styled(format!("  {}", why), default_style()));
        }
        None => lines.push(Line::styled("Why it matters: (empty)", muted_style())),
    }
    match &goal.what_youll_regret {
        Some(regret) => {
            lines.push(Line::from(Span::styled("What you'll regret:", title_style())));
            lines.push(Line::styled(format!("  {}", regret), default_style()));
        }
        None => lines.push(Line::styled("What you'll regret: (empty)", muted_style())),
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
