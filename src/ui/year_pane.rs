use crate::app::AppState;
use crate::domain::YearProgress;
use crate::ui::styles::{border_style, gauge_style, title_style};
use ratatui::{
    layout::Rect,
    text::Span,
    widgets::{Block, Borders, Gauge},
    Frame,
};

/// Gauge label, e.g. "2024 · 45.2% gone · 201 days left · June"
fn year_label(year: &YearProgress) -> String {
    format!(
        "{} · {:.1}% gone · {} days left · {}",
        year.year,
        year.percent_gone,
        year.days_remaining,
        year.month_name()
    )
}

/// Render the year-progress gauge, coloured by calendar quarter
pub fn render_year_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let year = app.year_progress();
    let ratio = (year.percent_gone / 100.0).clamp(0.0, 1.0);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(" Year ", title_style())),
        )
        .gauge_style(gauge_style(year.urgency_color()))
        .ratio(ratio)
        .label(year_label(&year));

    f.render_widget(gauge, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_year_label() {
        let year = YearProgress::for_date(NaiveDate::from_ymd_opt(2023, 7, 2).unwrap());
        assert_eq!(year_label(&year), "2023 · 50.1% gone · 182 days left · July");
    }
}
