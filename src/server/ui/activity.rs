//! Activity view: score standings and the live answer feed.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::server::state::{PlayerStatus, ServerState};

/// Render the activity view.
pub fn render(frame: &mut Frame, area: Rect, state: &ServerState) {
    let chunks = Layout::vertical([
        Constraint::Percentage(50), // Standings
        Constraint::Percentage(50), // Live answers
    ])
    .margin(1)
    .split(area);

    render_standings(frame, chunks[0], state);
    render_live_answers(frame, chunks[1], state);
}

fn render_standings(frame: &mut Frame, area: Rect, state: &ServerState) {
    let mut lines: Vec<Line> = Vec::new();

    for (i, player) in state.standings().iter().enumerate() {
        let username = player.username.as_deref().unwrap_or("???");

        let (marker, marker_color) = match player.status {
            PlayerStatus::Playing => ("*", Color::Yellow),
            PlayerStatus::Disconnected => ("x", Color::Red),
            _ => ("+", Color::Green),
        };

        let mode_str = player
            .mode
            .map(|m| format!("[{}]", m.label()))
            .unwrap_or_else(|| "[-]".to_string());

        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}. ", i + 1),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(format!("{} ", marker), Style::default().fg(marker_color)),
            Span::styled(
                format!("{:<16}", username),
                Style::default().fg(Color::White),
            ),
            Span::styled(format!("{:<9}", mode_str), Style::default().fg(Color::Cyan)),
            Span::styled(
                format!("score {:<3} ({} answered)", player.score, player.answered),
                Style::default().fg(Color::Green),
            ),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No registered players yet...",
            Style::default().fg(Color::DarkGray).italic(),
        )));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Standings ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, area);
}

fn render_live_answers(frame: &mut Frame, area: Rect, state: &ServerState) {
    let mut lines: Vec<Line> = Vec::new();

    // Show last N answers (most recent first)
    let max_display = (area.height as usize).saturating_sub(4);
    let answers: Vec<_> = state.live_answers.iter().rev().take(max_display).collect();

    for answer in answers {
        let (symbol, color) = if answer.correct {
            ("+", Color::Green)
        } else {
            ("-", Color::Red)
        };

        let age_secs = answer.timestamp.elapsed().as_secs();
        let age = if age_secs < 60 {
            format!("  {}s ago", age_secs)
        } else {
            format!("  {}m ago", age_secs / 60)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", symbol), Style::default().fg(color)),
            Span::styled(
                format!("{:<16}", answer.username),
                Style::default().fg(Color::White),
            ),
            Span::styled(" -> ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{:<20}", answer.answer), Style::default().fg(color)),
            Span::styled(age, Style::default().fg(Color::DarkGray)),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "  Waiting for answers...",
            Style::default().fg(Color::DarkGray).italic(),
        )));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Live Answers ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, area);
}
