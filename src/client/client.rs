//! WebSocket client implementation.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::terminal;

use super::state::{ClientApp, ClientState};
use super::ui;

/// Shared client app state.
type SharedApp = Arc<Mutex<ClientApp>>;

/// Run the quiz client.
pub async fn run(
    host: String,
    port: u16,
    invite_code: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = Arc::new(Mutex::new(ClientApp::new(host.clone(), port, invite_code)));

    // Connect to server
    let url = format!("ws://{}:{}", host, port);
    println!("Connecting to {}...", url);

    let (ws_stream, _) = match tokio_tungstenite::connect_async(&url).await {
        Ok(result) => result,
        Err(e) => {
            return Err(format!("Failed to connect to server: {}", e).into());
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ClientMessage>();

    // Spawn task to send messages
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(_) => continue,
            };
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // Spawn task to receive messages
    let app_clone = Arc::clone(&app);
    let tx_clone = tx.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_receiver.next().await {
            let text = match msg {
                Ok(Message::Text(text)) => text.to_string(),
                Ok(Message::Close(_)) => {
                    let mut app = app_clone.lock().await;
                    app.disconnect("Connection closed by server".to_string());
                    break;
                }
                Err(e) => {
                    let mut app = app_clone.lock().await;
                    app.disconnect(format!("Connection error: {}", e));
                    break;
                }
                _ => continue,
            };

            let server_msg: ServerMessage = match serde_json::from_str(&text) {
                Ok(m) => m,
                Err(_) => continue,
            };

            handle_server_message(&app_clone, &tx_clone, server_msg).await;
        }
    });

    // Run TUI
    run_tui(app, tx).await?;

    // Clean up
    recv_task.abort();

    Ok(())
}

/// Handle a message from the server.
async fn handle_server_message(
    app: &SharedApp,
    tx: &mpsc::UnboundedSender<ClientMessage>,
    msg: ServerMessage,
) {
    let mut app = app.lock().await;

    match msg {
        ServerMessage::ConnectionAck => {
            app.enter_name_entry();
        }
        ServerMessage::Registered { username } => {
            // Resolve the invite we were launched with, now that we exist
            // server-side.
            if let Some(code) = app.invite_code.take() {
                let _ = tx.send(ClientMessage::FetchChallenge { invite_code: code });
            }
            app.enter_mode_select(username);
        }
        ServerMessage::RegisterRejected { reason } => {
            app.set_name_error(reason);
        }
        ServerMessage::ReconnectAccepted {
            username,
            mode: _,
            score: _,
            answered: _,
        } => {
            // The run the connection dropped out of is over; pick a mode
            // and start fresh.
            if let Some(code) = app.invite_code.take() {
                let _ = tx.send(ClientMessage::FetchChallenge { invite_code: code });
            }
            app.enter_mode_select(username);
        }
        ServerMessage::RunStarted { mode } => {
            app.enter_playing(mode);
            let _ = tx.send(ClientMessage::NextQuestion);
        }
        ServerMessage::Question { clues, options } => {
            app.set_round(clues, options);
        }
        ServerMessage::AnswerOutcome {
            correct,
            fun_fact,
            score,
            answered,
        } => {
            app.set_outcome(correct, fun_fact, score, answered);
        }
        ServerMessage::QuestionUnavailable { reason } => {
            app.set_notice(reason);
        }
        ServerMessage::ChallengeCreated {
            invite_code,
            invite_link,
        } => {
            app.set_invite(invite_code, invite_link);
        }
        ServerMessage::ChallengeInfo { inviter, score } => {
            app.set_challenge(inviter, score);
        }
        ServerMessage::ChallengeRejected { reason } => {
            app.set_challenge_error(reason);
        }
        ServerMessage::Kicked { reason } => {
            app.disconnect(format!("Kicked: {}", reason));
        }
        ServerMessage::ServerClosing => {
            app.disconnect("Server is shutting down".to_string());
        }
    }
}

/// Run the client TUI.
async fn run_tui(
    app: SharedApp,
    tx: mpsc::UnboundedSender<ClientMessage>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = terminal::init()?;

    loop {
        // Check if should quit; close a timed run whose window has elapsed
        {
            let mut app = app.lock().await;
            if app.should_quit {
                break;
            }
            if app.timed_run_expired() {
                app.enter_summary();
            }
        }

        // Render UI
        {
            let app = app.lock().await;
            terminal.draw(|frame| ui::render(frame, &app))?;
        }

        // Handle input with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                let should_quit = handle_input(&app, &tx, key.code).await;
                if should_quit {
                    break;
                }
            }
        }
    }

    terminal::restore()?;
    Ok(())
}

/// Handle keyboard input.
async fn handle_input(
    app: &SharedApp,
    tx: &mpsc::UnboundedSender<ClientMessage>,
    key: KeyCode,
) -> bool {
    let mut app = app.lock().await;

    match &app.state {
        ClientState::Connecting => {
            if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
                app.should_quit = true;
                return true;
            }
        }
        ClientState::NameEntry { .. } => match key {
            KeyCode::Char('q') | KeyCode::Char('Q') if app.name_input().is_empty() => {
                app.should_quit = true;
                return true;
            }
            KeyCode::Char(c) => {
                app.clear_name_error();
                app.name_input_push(c);
            }
            KeyCode::Backspace => {
                app.clear_name_error();
                app.name_input_pop();
            }
            KeyCode::Enter => {
                let username = app.name_input().to_string();
                if !username.is_empty() {
                    let _ = tx.send(ClientMessage::Register { username });
                }
            }
            KeyCode::Esc => {
                app.should_quit = true;
                return true;
            }
            _ => {}
        },
        ClientState::ModeSelect { selected, .. } => match key {
            KeyCode::Up | KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('k') => {
                app.toggle_mode();
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let _ = tx.send(ClientMessage::StartRun { mode: *selected });
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                app.should_quit = true;
                return true;
            }
            _ => {}
        },
        ClientState::Playing {
            round, outcome, notice, ..
        } => {
            // An outcome (or a failed-question notice) is showing: the next
            // keypress advances the run.
            if outcome.is_some() || notice.is_some() {
                match key {
                    KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n') => {
                        if app.points_run_complete() {
                            app.enter_summary();
                        } else {
                            let _ = tx.send(ClientMessage::NextQuestion);
                        }
                    }
                    KeyCode::Char('q') | KeyCode::Char('Q') => {
                        app.enter_summary();
                    }
                    _ => {}
                }
                return false;
            }

            match key {
                KeyCode::Up | KeyCode::Char('k') => {
                    app.select_previous_option();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    app.select_next_option();
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if round.is_some() {
                        if let Some(answer) = app.selected_answer() {
                            let _ = tx.send(ClientMessage::SubmitAnswer { answer });
                        }
                    }
                }
                KeyCode::Char('q') | KeyCode::Char('Q') => {
                    app.enter_summary();
                }
                _ => {}
            }
        }
        ClientState::Summary { invite, .. } => match key {
            KeyCode::Char('c') | KeyCode::Char('C') => {
                if invite.is_none() {
                    let _ = tx.send(ClientMessage::Challenge);
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                let username = app.state.username().unwrap_or("").to_string();
                app.enter_mode_select(username);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                app.should_quit = true;
                return true;
            }
            _ => {}
        },
        ClientState::Disconnected { .. } => {
            if matches!(
                key,
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc | KeyCode::Enter
            ) {
                app.should_quit = true;
                return true;
            }
        }
    }

    false
}
