//! Lobby view for the server.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::server::state::{PlayerStatus, ServerState};

/// Render the lobby view.
pub fn render(frame: &mut Frame, area: Rect, state: &ServerState) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Title
        Constraint::Min(5),    // Player list
        Constraint::Length(3), // Instructions
    ])
    .margin(1)
    .split(area);

    render_title(frame, chunks[0]);
    render_player_list(frame, chunks[1], state);
    render_instructions(frame, chunks[2]);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("CONNECTED PLAYERS")
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center);
    frame.render_widget(title, area);
}

fn render_player_list(frame: &mut Frame, area: Rect, state: &ServerState) {
    let mut lines: Vec<Line> = Vec::new();

    // First show players with usernames
    let mut named_players: Vec<_> = state
        .sessions
        .values()
        .filter(|s| s.username.is_some() && s.is_connected())
        .collect();
    named_players.sort_by(|a, b| a.username.cmp(&b.username));

    for player in named_players {
        let username = player.username.as_deref().unwrap_or("???");
        let (status_str, status_color) = match player.status {
            PlayerStatus::Idle => ("Idle".to_string(), Color::Green),
            PlayerStatus::Playing => {
                let mode = player
                    .mode
                    .map(|m| m.label())
                    .unwrap_or("?");
                (
                    format!("{} run, score {}", mode, player.score),
                    Color::Yellow,
                )
            }
            PlayerStatus::Disconnected => ("Disconnected".to_string(), Color::Red),
            PlayerStatus::Connected => ("Connecting...".to_string(), Color::Yellow),
        };

        lines.push(Line::from(vec![
            Span::styled("  * ", Style::default().fg(Color::Green)),
            Span::styled(
                format!("{:<16}", username),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!("{:<16}", player.ip_addr),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(status_str, Style::default().fg(status_color)),
        ]));
    }

    // Then show players without usernames (connecting)
    let unnamed_players: Vec<_> = state
        .sessions
        .values()
        .filter(|s| s.username.is_none() && s.is_connected())
        .collect();

    for player in unnamed_players {
        lines.push(Line::from(vec![
            Span::styled("  o ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{:<16}", "(unnamed)"),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("{:<16}", player.ip_addr),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled("Connecting...", Style::default().fg(Color::Yellow)),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No players connected yet...",
            Style::default().fg(Color::DarkGray).italic(),
        )));
    }

    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(list, area);
}

fn render_instructions(frame: &mut Frame, area: Rect) {
    let instructions =
        Paragraph::new("Tab to cycle views  |  'view <player>' for detail  |  'help' for commands")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);

    frame.render_widget(instructions, area);
}
