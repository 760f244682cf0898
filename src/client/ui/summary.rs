//! Run summary screen for the client.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::client::state::{ClientApp, ClientState};
use crate::protocol::{GameMode, POINTS_RUN_QUESTIONS};

/// Render the run summary screen.
pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let ClientState::Summary {
        mode,
        score,
        answered,
        challenge,
        invite,
        error,
        ..
    } = &app.state
    else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(7), // Score summary
        Constraint::Min(6),    // Verdict + invite
        Constraint::Length(2), // Controls
    ])
    .margin(1)
    .split(area);

    render_score(frame, chunks[0], *mode, *score, *answered);
    render_verdict(frame, chunks[1], challenge, invite, error, *score);
    render_controls(frame, chunks[2], invite.is_some());
}

fn render_score(frame: &mut Frame, area: Rect, mode: GameMode, score: usize, answered: usize) {
    let score_line = match mode {
        GameMode::Timed => format!("{} correct out of {} answered", score, answered),
        GameMode::Points => format!("{} / {}", score, POINTS_RUN_QUESTIONS),
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RUN COMPLETE",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            score_line,
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from(Span::styled(
            format!("({} mode)", mode.label()),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, area);
}

fn render_verdict(
    frame: &mut Frame,
    area: Rect,
    challenge: &Option<crate::client::state::ChallengeBanner>,
    invite: &Option<(String, String)>,
    error: &Option<String>,
    score: usize,
) {
    let mut lines = vec![Line::from("")];

    if let Some(challenge) = challenge {
        let (verdict, color) = if score > challenge.score {
            (
                format!("You beat {} ({} vs {})!", challenge.inviter, score, challenge.score),
                Color::Green,
            )
        } else if score == challenge.score {
            (
                format!("Tied with {} at {}.", challenge.inviter, score),
                Color::Yellow,
            )
        } else {
            (
                format!(
                    "{} holds the lead ({} vs {}).",
                    challenge.inviter, challenge.score, score
                ),
                Color::Red,
            )
        };
        lines.push(Line::from(Span::styled(
            verdict,
            Style::default().fg(color).bold(),
        )));
        lines.push(Line::from(""));
    }

    match invite {
        Some((code, link)) => {
            lines.push(Line::from(Span::styled(
                "Challenge a friend with this link:",
                Style::default().fg(Color::White),
            )));
            lines.push(Line::from(Span::styled(
                link.clone(),
                Style::default().fg(Color::Yellow).bold(),
            )));
            lines.push(Line::from(vec![
                Span::styled("(invite code ", Style::default().fg(Color::DarkGray)),
                Span::styled(code.clone(), Style::default().fg(Color::Yellow)),
                Span::styled(")", Style::default().fg(Color::DarkGray)),
            ]));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Press [C] to challenge a friend with your score",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    if let Some(err) = error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Challenge ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, invited: bool) {
    let text = if invited {
        "r play again  ·  q quit"
    } else {
        "c challenge a friend  ·  r play again  ·  q quit"
    };

    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);

    frame.render_widget(widget, area);
}
