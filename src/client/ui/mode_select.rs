//! Game mode selection screen for the client.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::client::state::{ClientApp, ClientState};
use crate::protocol::{GameMode, POINTS_RUN_QUESTIONS, TIMED_RUN_SECS};

/// Render the mode select screen.
pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let ClientState::ModeSelect {
        username,
        selected,
        challenge,
        error,
    } = &app.state
    else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Percentage(30),
        Constraint::Length(16),
        Constraint::Percentage(30),
    ])
    .split(area);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "GLOBETROTTER",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Welcome, ", Style::default().fg(Color::White)),
            Span::styled(username, Style::default().fg(Color::Green).bold()),
            Span::styled("!", Style::default().fg(Color::White)),
        ]),
        Line::from(""),
    ];

    if let Some(challenge) = challenge {
        content.push(Line::from(vec![
            Span::styled(
                challenge.inviter.clone(),
                Style::default().fg(Color::Yellow).bold(),
            ),
            Span::styled(
                " challenged you!  Score to beat: ",
                Style::default().fg(Color::White),
            ),
            Span::styled(
                challenge.score.to_string(),
                Style::default().fg(Color::Yellow).bold(),
            ),
        ]));
        content.push(Line::from(""));
    }

    content.push(mode_line(
        GameMode::Timed,
        *selected,
        &format!("Timed    - as many as you can in {}s", TIMED_RUN_SECS),
    ));
    content.push(mode_line(
        GameMode::Points,
        *selected,
        &format!("Points   - {} questions, score out of {}", POINTS_RUN_QUESTIONS, POINTS_RUN_QUESTIONS),
    ));
    content.push(Line::from(""));

    if let Some(err) = error {
        content.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        content.push(Line::from(""));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "j/k or arrows to choose  ·  [Enter] to play  ·  [Q] to quit",
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}

fn mode_line(mode: GameMode, selected: GameMode, text: &str) -> Line<'static> {
    let is_selected = mode == selected;
    let prefix = if is_selected { "> " } else { "  " };
    let style = if is_selected {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::White)
    };

    Line::from(Span::styled(format!("{}{}", prefix, text), style))
}
