//! Round screen for the client: clues, options, and the answer verdict.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::client::state::{ClientApp, ClientState, RoundOutcome};
use crate::protocol::{GameMode, POINTS_RUN_QUESTIONS};

/// Render the round screen.
pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let ClientState::Playing {
        mode,
        round,
        outcome,
        notice,
        selected_option,
        score,
        answered,
        ..
    } = &app.state
    else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(3), // Run progress / timer
        Constraint::Length(7), // Clues
        Constraint::Min(8),    // Options or verdict
        Constraint::Length(2), // Controls
    ])
    .margin(1)
    .split(area);

    render_run_header(frame, chunks[0], app, *mode, *score, *answered);

    if let Some(notice) = notice {
        render_notice(frame, chunks[2], notice);
        render_controls(frame, chunks[3], true);
        return;
    }

    let Some(round) = round else {
        let waiting = Paragraph::new("Waiting for question...")
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(waiting, chunks[1]);
        return;
    };

    render_clues(frame, chunks[1], &round.clues);

    match outcome {
        Some(outcome) => {
            render_outcome(frame, chunks[2], outcome);
            render_controls(frame, chunks[3], true);
        }
        None => {
            render_options(frame, chunks[2], &round.options, *selected_option);
            render_controls(frame, chunks[3], false);
        }
    }
}

fn render_run_header(
    frame: &mut Frame,
    area: Rect,
    app: &ClientApp,
    mode: GameMode,
    score: usize,
    answered: usize,
) {
    let header_text = match mode {
        GameMode::Timed => {
            let remaining = app
                .time_remaining()
                .map(|d| d.as_secs())
                .unwrap_or(0);
            format!("Score: {}  |  Time left: {}s", score, remaining)
        }
        GameMode::Points => format!(
            "Score: {}  |  Question {} of {}",
            score,
            (answered + 1).min(POINTS_RUN_QUESTIONS),
            POINTS_RUN_QUESTIONS
        ),
    };

    let widget = Paragraph::new(header_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan).bold());

    frame.render_widget(widget, area);
}

fn render_clues(frame: &mut Frame, area: Rect, clues: &[String]) {
    let lines: Vec<Line> = clues
        .iter()
        .map(|clue| {
            Line::from(vec![
                Span::styled("* ", Style::default().fg(Color::Cyan)),
                Span::styled(clue.clone(), Style::default().fg(Color::White)),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Where am I? ")
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, options: &[String], selected: usize) {
    let option_labels = ['A', 'B', 'C', 'D', 'E', 'F'];

    let lines: Vec<Line> = options
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let is_selected = i == selected;
            let prefix = if is_selected { "> " } else { "  " };
            let label = option_labels.get(i).copied().unwrap_or('?');

            let style = if is_selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };

            Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(format!("{}) ", label), style),
                Span::styled(opt.clone(), style),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Options ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, area);
}

fn render_outcome(frame: &mut Frame, area: Rect, outcome: &RoundOutcome) {
    let mut lines = vec![Line::from("")];

    if outcome.correct {
        lines.push(Line::from(Span::styled(
            "Correct!",
            Style::default().fg(Color::Green).bold(),
        )));
        if let Some(fact) = &outcome.fun_fact {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Fun fact: ", Style::default().fg(Color::Cyan)),
                Span::styled(fact.clone(), Style::default().fg(Color::White)),
            ]));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "Oops! Not quite.",
            Style::default().fg(Color::Red).bold(),
        )));
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(widget, area);
}

fn render_notice(frame: &mut Frame, area: Rect, notice: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press [Enter] to try another question",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, advancing: bool) {
    let text = if advancing {
        "Enter/Space for next question  ·  q end run"
    } else {
        "j/k or arrows to select  ·  Enter/Space to answer  ·  q end run"
    };

    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);

    frame.render_widget(widget, area);
}
