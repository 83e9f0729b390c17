use crate::app::AppState;
use crate::domain::calendar::group_thousands;
use crate::domain::{OnboardingStep, ProductiveLife, UiMode};
use crate::ui::{
    layout::create_centered_area,
    styles::{modal_bg_style, modal_title_style},
};
use chrono::Local;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn render_small_modal(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let modal_area = create_centered_area(area, lines.len() as u16 + 3);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title.to_string(), modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render the delete confirmation
pub fn render_confirm_delete_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if app.ui_mode != UiMode::ConfirmDelete {
        return;
    }
    let Some(goal) = app.selected_goal() else {
        return;
    };

    let lines = vec![
        Line::raw(""),
        Line::raw(format!("  Delete \"{}\"?", goal.name)),
        Line::raw("  This cannot be undone."),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [y]", modal_title_style()),
            Span::raw(" Delete  "),
            Span::styled("[n]", modal_title_style()),
            Span::raw(" Keep"),
        ]),
    ];

    render_small_modal(f, area, " Delete Goal ", lines);
}

/// Render the productive-years editor
pub fn render_years_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if app.ui_mode != UiMode::EditingYears {
        return;
    }

    let input = Line::from(vec![
        Span::raw("  > "),
        Span::styled(app.years_input.clone(), modal_title_style()),
        Span::styled("█", modal_title_style()),
    ]);
    let help = Line::raw("  Enter to save  ·  Esc to cancel  ·  empty or 0 resets to 30");

    if app.onboarding.is_none() {
        let lines = vec![
            Line::raw(""),
            Line::raw("  Productive years remaining:"),
            input,
            Line::raw(""),
            help,
        ];
        render_small_modal(f, area, " ⏳ Your Time ", lines);
        return;
    }

    let life = ProductiveLife::new(app.years_input.parse().unwrap_or(0));
    let lines = vec![
        Line::raw(""),
        Line::raw("  Be realistic. If you're 28 and expect to stay sharp until 70,"),
        Line::raw("  that's about 42 years."),
        Line::raw(""),
        input,
        Line::raw(format!(
            "  That's approximately {} days, {} weeks, {} months.",
            group_thousands(life.total_days()),
            group_thousands(life.total_weeks()),
            life.total_months()
        )),
        Line::raw(""),
        help,
    ];
    render_small_modal(f, area, " How Many Productive Years Do You Have Left? ", lines);
}

fn key_hint(key: &str, label: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  [{}]", key), modal_title_style()),
        Span::raw(format!(" {}", label)),
    ])
}

/// Render the first-run walkthrough screens
pub fn render_onboarding_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if app.ui_mode != UiMode::Onboarding {
        return;
    }
    let Some(step) = app.onboarding else {
        return;
    };

    let (title, lines) = match step {
        OnboardingStep::Welcome => (
            " ⏰ Time Is Running Out ".to_string(),
            vec![
                Line::raw(""),
                Line::raw("  This app won't track your habits or celebrate your progress."),
                Line::raw("  It will constantly remind you how little time you have left."),
                Line::raw(""),
                Line::raw("  That's the point."),
                Line::raw(""),
                key_hint("Enter", "I understand   [q] Quit"),
            ],
        ),
        OnboardingStep::YearContext => {
            let year = app.year_progress();
            (
                " First, Let's Acknowledge Where We Are ".to_string(),
                vec![
                    Line::raw(""),
                    Line::styled(format!("  {} PROGRESS", year.year), modal_title_style()),
                    Line::raw(format!("  {:.1}% of the year GONE", year.percent_gone)),
                    Line::raw(format!("  {} days remaining", year.days_remaining)),
                    Line::raw(""),
                    Line::raw(format!("  You can't get those {} days back.", year.day_of_year)),
                    Line::raw(format!("  Make the next {} count.", year.days_remaining)),
                    Line::raw(""),
                    key_hint("Enter", "Next   [←] Back"),
                ],
            )
        }
        OnboardingStep::ProductiveYears => (
            " ⏳ Your Time ".to_string(),
            vec![
                Line::raw(""),
                Line::raw("  How many productive years do you have left?"),
                Line::raw("  Every goal you set is a fraction of this finite time."),
                Line::raw(""),
                key_hint("Enter", "Answer   [←] Back"),
            ],
        ),
        OnboardingStep::FirstGoal => (
            " What's Your Deadline? ".to_string(),
            vec![
                Line::raw(""),
                Line::raw("  Name one goal and the date it has to be done by."),
                Line::raw("  Every day you delay is time you'll never get back."),
                Line::raw(""),
                key_hint("Enter", "Create goal   [←] Back"),
            ],
        ),
        OnboardingStep::CountdownBegins { .. } => {
            let mut lines = vec![Line::raw("")];
            if let Some(goal) = app.onboarding_goal() {
                lines.push(Line::styled(format!("  \"{}\"", goal.name), modal_title_style()));
                lines.push(Line::raw(format!(
                    "  Due: {}",
                    goal.deadline.with_timezone(&Local).format("%B %-d, %Y")
                )));
                lines.push(Line::raw(format!(
                    "  {} days remaining",
                    group_thousands(goal.time_remaining_at(&app.now).days)
                )));
                lines.push(Line::raw(""));
            }
            lines.push(Line::raw("  You can't pause time."));
            lines.push(Line::raw("  But you can use it wisely."));
            lines.push(Line::raw(""));
            lines.push(key_hint("Enter", "Start"));
            (" ⏰ Your Countdown Begins ".to_string(), lines)
        }
    };

    render_small_modal(f, area, &title, lines);
}
