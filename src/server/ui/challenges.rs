//! Challenges view: open invites and their snapshot scores.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::server::state::ServerState;

/// Render the challenges view.
pub fn render(frame: &mut Frame, area: Rect, state: &ServerState) {
    let mut lines: Vec<Line> = Vec::new();

    for record in state.open_challenges() {
        let age_secs = record.created_at.elapsed().as_secs();
        let age = if age_secs < 60 {
            format!("{}s ago", age_secs)
        } else {
            format!("{}m ago", age_secs / 60)
        };

        lines.push(Line::from(vec![
            Span::styled("  ", Style::default()),
            Span::styled(
                format!("{:<10}", record.code),
                Style::default().fg(Color::Yellow).bold(),
            ),
            Span::styled(
                format!("{:<16}", record.inviter),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!("score to beat: {:<4}", record.score),
                Style::default().fg(Color::Green),
            ),
            Span::styled(age, Style::default().fg(Color::DarkGray)),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No open challenges...",
            Style::default().fg(Color::DarkGray).italic(),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Players create invites from their run summary screen.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Open Challenges ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::new(1, 1, 1, 1)),
    );

    frame.render_widget(widget, area);
}
