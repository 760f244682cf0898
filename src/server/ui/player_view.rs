//! Player detail view for the server.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::server::state::{PlayerSession, PlayerStatus, ServerState};

/// Render the player detail view.
pub fn render(frame: &mut Frame, area: Rect, state: &ServerState, username: &str) {
    let player = state.get_player_by_name(username);

    let Some(player) = player else {
        let not_found = Paragraph::new(format!("Player '{}' not found", username))
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Player View "));
        frame.render_widget(not_found, area);
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(6), // Player info header
        Constraint::Min(5),    // Current question
        Constraint::Length(3), // Stats
    ])
    .margin(1)
    .split(area);

    render_player_header(frame, chunks[0], player, username);
    render_pending_question(frame, chunks[1], player);
    render_player_stats(frame, chunks[2], player);
}

fn render_player_header(frame: &mut Frame, area: Rect, player: &PlayerSession, username: &str) {
    let status_str = match player.status {
        PlayerStatus::Connected => "Connecting...".to_string(),
        PlayerStatus::Idle => "Idle".to_string(),
        PlayerStatus::Playing => format!(
            "Playing ({})",
            player.mode.map(|m| m.label()).unwrap_or("?")
        ),
        PlayerStatus::Disconnected => "Disconnected".to_string(),
    };

    let status_color = match player.status {
        PlayerStatus::Connected | PlayerStatus::Idle => Color::Yellow,
        PlayerStatus::Playing => Color::Green,
        PlayerStatus::Disconnected => Color::Red,
    };

    let header_text = vec![
        Line::from(vec![
            Span::styled("  Player: ", Style::default().fg(Color::DarkGray)),
            Span::styled(username, Style::default().fg(Color::White).bold()),
        ]),
        Line::from(vec![
            Span::styled("  IP:     ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                player.ip_addr.to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Status: ", Style::default().fg(Color::DarkGray)),
            Span::styled(status_str, Style::default().fg(status_color)),
        ]),
    ];

    let header = Paragraph::new(header_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" Viewing: {} ", username))
            .title_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(header, area);
}

fn render_pending_question(frame: &mut Frame, area: Rect, player: &PlayerSession) {
    let mut lines: Vec<Line> = Vec::new();

    match &player.pending {
        Some(pending) => {
            lines.push(Line::from(vec![
                Span::styled("  Answer:  ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    pending.answer.clone(),
                    Style::default().fg(Color::Green).bold(),
                ),
            ]));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Options served:",
                Style::default().fg(Color::DarkGray),
            )));
            for option in &pending.options {
                let is_answer = *option == pending.answer;
                lines.push(Line::from(vec![
                    Span::styled("    - ", Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        option.clone(),
                        if is_answer {
                            Style::default().fg(Color::Green)
                        } else {
                            Style::default().fg(Color::White)
                        },
                    ),
                ]));
            }
        }
        None => {
            lines.push(Line::from(Span::styled(
                "  No question pending...",
                Style::default().fg(Color::DarkGray).italic(),
            )));
        }
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Current Question ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, area);
}

fn render_player_stats(frame: &mut Frame, area: Rect, player: &PlayerSession) {
    let pct = if player.answered > 0 {
        (player.score as f64 / player.answered as f64) * 100.0
    } else {
        0.0
    };

    let stats_text = format!(
        "  Answered: {}  |  Correct: {}  ({:.0}%)",
        player.answered, player.score, pct
    );

    let color = match pct as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    };

    let stats = Paragraph::new(stats_text)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::TOP));

    frame.render_widget(stats, area);
}
