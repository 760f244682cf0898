//! WebSocket server implementation.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;

use crate::data::load_destinations_from_json;
use crate::game::{DestinationCatalog, OptionSetBuilder, OPTION_SET_SIZE};
use crate::protocol::{validate_username, ClientMessage, GameMode, ServerMessage};
use crate::terminal;

use super::commands::{execute_command, CommandResult};
use super::state::{PlayerSession, PlayerStatus, QuestionError, ServerState, ServerView};
use super::ui;

/// Shared server state wrapped in Arc<Mutex> for async access.
type SharedState = Arc<Mutex<ServerState>>;

/// Run the quiz server.
pub async fn run<P: AsRef<Path>>(
    port: u16,
    destinations_path: P,
    base_url: String,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load destination reference data
    let destinations = load_destinations_from_json(destinations_path)?;
    println!("Loaded {} destinations", destinations.len());

    let catalog = DestinationCatalog::new(destinations);
    let options = OptionSetBuilder::new(OPTION_SET_SIZE)?;

    // Create shared state
    let state = Arc::new(Mutex::new(ServerState::new(catalog, options, port, base_url)));

    // Start WebSocket server
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    println!("Server listening on {}", addr);

    // Spawn connection acceptor
    let state_clone = Arc::clone(&state);
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    let state = Arc::clone(&state_clone);
                    tokio::spawn(handle_connection(stream, addr, state));
                }
                Err(e) => {
                    eprintln!("Failed to accept connection: {}", e);
                }
            }
        }
    });

    // Run TUI on main thread
    run_tui(state).await?;

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(stream: TcpStream, addr: SocketAddr, state: SharedState) {
    let ip = addr.ip();

    // Check if banned
    {
        let state_guard = state.lock().await;
        if state_guard.banned_ips.contains(&ip) {
            return;
        }
    }

    // Upgrade to WebSocket
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("WebSocket handshake failed: {}", e);
            return;
        }
    };

    let (ws_sender, ws_receiver) = ws_stream.split();

    // Create channel for sending messages to this client
    let (tx, rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Resume a disconnected session from the same IP, or start a new one
    let session_id = {
        let mut state_guard = state.lock().await;

        let reconnect_id = state_guard.ip_to_id.get(&ip).copied().filter(|id| {
            state_guard
                .sessions
                .get(id)
                .is_some_and(|s| matches!(s.status, PlayerStatus::Disconnected))
        });

        if let Some(existing_id) = reconnect_id {
            match state_guard.resume_session(existing_id, tx.clone()) {
                Some((username, mode, score, answered)) => {
                    state_guard.add_to_history(format!("Player {} reconnected", username));
                    let _ = tx.send(ServerMessage::ReconnectAccepted {
                        username,
                        mode,
                        score,
                        answered,
                    });
                }
                None => {
                    let _ = tx.send(ServerMessage::ConnectionAck);
                }
            }

            existing_id
        } else {
            // New connection
            let session = PlayerSession::new(ip, tx.clone());
            let id = session.id;
            state_guard.sessions.insert(id, session);
            state_guard.ip_to_id.insert(ip, id);
            let _ = tx.send(ServerMessage::ConnectionAck);
            id
        }
    };

    // Now handle messages (lock is released)
    handle_messages(session_id, ws_sender, ws_receiver, rx, state, ip).await;
}

/// Handle messages for a connected session.
async fn handle_messages(
    session_id: uuid::Uuid,
    mut ws_sender: futures_util::stream::SplitSink<
        tokio_tungstenite::WebSocketStream<TcpStream>,
        Message,
    >,
    mut ws_receiver: futures_util::stream::SplitStream<
        tokio_tungstenite::WebSocketStream<TcpStream>,
    >,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    state: SharedState,
    _ip: IpAddr,
) {
    // Spawn task to forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
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

    // Process incoming messages
    while let Some(msg) = ws_receiver.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text.to_string(),
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => continue,
        };

        let client_msg: ClientMessage = match serde_json::from_str(&text) {
            Ok(m) => m,
            Err(_) => continue,
        };

        handle_client_message(session_id, client_msg, &state).await;
    }

    // Mark as disconnected
    {
        let mut state = state.lock().await;
        let username_to_log = {
            if let Some(session) = state.sessions.get_mut(&session_id) {
                session.sender = None;
                session.status = PlayerStatus::Disconnected;
                session.username.clone()
            } else {
                None
            }
        };

        if let Some(username) = username_to_log {
            state.add_to_history(format!("Player {} disconnected", username));
        }
    }

    send_task.abort();
}

/// Handle a single client message.
async fn handle_client_message(session_id: uuid::Uuid, msg: ClientMessage, state: &SharedState) {
    let mut state = state.lock().await;

    match msg {
        ClientMessage::Register { username } => {
            handle_register(session_id, username, &mut state);
        }
        ClientMessage::StartRun { mode } => {
            handle_start_run(session_id, mode, &mut state);
        }
        ClientMessage::NextQuestion => {
            handle_next_question(session_id, &mut state);
        }
        ClientMessage::SubmitAnswer { answer } => {
            handle_submit_answer(session_id, answer, &mut state);
        }
        ClientMessage::Challenge => {
            handle_challenge(session_id, &mut state);
        }
        ClientMessage::FetchChallenge { invite_code } => {
            handle_fetch_challenge(session_id, invite_code, &mut state);
        }
    }
}

/// Handle a Register message.
fn handle_register(session_id: uuid::Uuid, username: String, state: &mut ServerState) {
    let username = username.trim().to_string();

    // Validate username
    if let Err(reason) = validate_username(&username) {
        if let Some(session) = state.sessions.get(&session_id) {
            session.send(ServerMessage::RegisterRejected {
                reason: reason.to_string(),
            });
        }
        return;
    }

    // Check if another live session holds the name
    if state.is_username_taken(&username) {
        if let Some(session) = state.sessions.get(&session_id) {
            session.send(ServerMessage::RegisterRejected {
                reason: "Username is already taken".to_string(),
            });
        }
        return;
    }

    if let Some(session) = state.sessions.get_mut(&session_id) {
        state.username_to_id.insert(username.clone(), session_id);
        session.username = Some(username.clone());
        session.status = PlayerStatus::Idle;
        session.send(ServerMessage::Registered {
            username: username.clone(),
        });
        state.add_to_history(format!("Player {} registered", username));
    }
}

/// Handle a StartRun message.
fn handle_start_run(session_id: uuid::Uuid, mode: GameMode, state: &mut ServerState) {
    let username = {
        let Some(session) = state.sessions.get_mut(&session_id) else {
            return;
        };
        if session.username.is_none() {
            session.send(ServerMessage::RegisterRejected {
                reason: "Register a username first".to_string(),
            });
            return;
        }

        session.start_run(mode);
        session.send(ServerMessage::RunStarted { mode });
        session.username.clone().unwrap_or_default()
    };

    state.add_to_history(format!("Player {} started a {} run", username, mode.label()));
}

/// Serve the next question to a player.
///
/// A failed option set draw is a hard error for this question; the client
/// gets `QuestionUnavailable` instead of a short or duplicated option list.
fn handle_next_question(session_id: uuid::Uuid, state: &mut ServerState) {
    if !state.sessions.contains_key(&session_id) {
        return;
    }

    match state.compose_question() {
        Ok((answer, clues, options)) => {
            if let Some(session) = state.sessions.get_mut(&session_id) {
                session.pending = Some(super::state::PendingQuestion {
                    answer,
                    options: options.clone(),
                });
                session.send(ServerMessage::Question { clues, options });
            }
        }
        Err(err) => {
            let reason = match err {
                QuestionError::EmptyCatalog => "No destinations are loaded".to_string(),
                QuestionError::Options(e) => {
                    state.add_to_history(format!("Question draw failed: {}", e));
                    "Could not assemble enough answer options".to_string()
                }
            };
            if let Some(session) = state.sessions.get(&session_id) {
                session.send(ServerMessage::QuestionUnavailable { reason });
            }
        }
    }
}

/// Handle an answer submission.
///
/// One scored attempt per served question: the pending answer is consumed
/// here, so a second submission without a fresh question gets
/// `QuestionUnavailable`.
fn handle_submit_answer(session_id: uuid::Uuid, answer: String, state: &mut ServerState) {
    let outcome = {
        let Some(session) = state.sessions.get_mut(&session_id) else {
            return;
        };

        let Some(pending) = session.pending.take() else {
            session.send(ServerMessage::QuestionUnavailable {
                reason: "No question is pending".to_string(),
            });
            return;
        };

        let correct = answer == pending.answer;
        session.answered += 1;
        if correct {
            session.score += 1;
        }

        (
            session.username.clone().unwrap_or_default(),
            correct,
            pending.answer,
            session.score,
            session.answered,
        )
    };

    let (username, correct, correct_answer, score, answered) = outcome;
    let fun_fact = if correct {
        state.catalog.fun_fact(&correct_answer).map(str::to_string)
    } else {
        None
    };

    if let Some(session) = state.sessions.get(&session_id) {
        session.send(ServerMessage::AnswerOutcome {
            correct,
            fun_fact,
            score,
            answered,
        });
    }

    state.record_live_answer(username, answer, correct);
}

/// Handle a Challenge message: snapshot the current score into an invite.
fn handle_challenge(session_id: uuid::Uuid, state: &mut ServerState) {
    let (username, score) = {
        let Some(session) = state.sessions.get(&session_id) else {
            return;
        };
        match &session.username {
            Some(name) => (name.clone(), session.score),
            None => {
                session.send(ServerMessage::ChallengeRejected {
                    reason: "Register a username first".to_string(),
                });
                return;
            }
        }
    };

    let record = state.create_challenge(username.clone(), score);
    let invite_link = state.invite_link(&record.code);

    if let Some(session) = state.sessions.get(&session_id) {
        session.send(ServerMessage::ChallengeCreated {
            invite_code: record.code.clone(),
            invite_link,
        });
    }

    state.add_to_history(format!(
        "Player {} created invite {} (score {})",
        username, record.code, score
    ));
}

/// Handle a FetchChallenge message.
fn handle_fetch_challenge(session_id: uuid::Uuid, invite_code: String, state: &mut ServerState) {
    let reply = match state.challenges.get(&invite_code) {
        Some(record) => ServerMessage::ChallengeInfo {
            inviter: record.inviter.clone(),
            score: record.score,
        },
        None => ServerMessage::ChallengeRejected {
            reason: "Invalid invite link".to_string(),
        },
    };

    if let Some(session) = state.sessions.get(&session_id) {
        session.send(reply);
    }
}

/// Run the server TUI.
async fn run_tui(state: SharedState) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = terminal::init()?;

    loop {
        // Check if should quit
        {
            let state = state.lock().await;
            if state.should_quit {
                break;
            }
        }

        // Render UI
        {
            let state = state.lock().await;
            terminal.draw(|frame| ui::render(frame, &state))?;
        }

        // Handle input with timeout to allow for periodic updates
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                let should_quit = handle_input(&state, key.code).await;
                if should_quit {
                    break;
                }
            }
        }
    }

    terminal::restore()?;
    Ok(())
}

/// Handle keyboard input for the server TUI.
async fn handle_input(state: &SharedState, key: KeyCode) -> bool {
    let mut state = state.lock().await;

    // If in Help view, Esc or Enter returns to previous view
    if matches!(state.current_view, ServerView::Help) {
        if matches!(key, KeyCode::Esc | KeyCode::Enter) {
            if let Some(prev) = state.previous_view.take() {
                state.current_view = prev;
            } else {
                state.current_view = ServerView::Lobby;
            }
        }
        return false;
    }

    match key {
        KeyCode::Char(c) => {
            state.command_input.push(c);
        }
        KeyCode::Backspace => {
            state.command_input.pop();
        }
        KeyCode::Enter => {
            let input = std::mem::take(&mut state.command_input);
            let result = execute_command(&mut state, &input);

            match result {
                CommandResult::Ok(Some(msg)) => {
                    state.add_to_history(msg);
                }
                CommandResult::Ok(None) => {}
                CommandResult::Error(msg) => {
                    state.add_to_history(format!("Error: {}", msg));
                }
                CommandResult::Quit => {
                    return true;
                }
            }
        }
        KeyCode::Esc => {
            state.command_input.clear();
        }
        KeyCode::Tab => {
            // Cycle through views
            state.current_view = match state.current_view {
                ServerView::Lobby => ServerView::Activity,
                ServerView::Activity => ServerView::Challenges,
                ServerView::Challenges => ServerView::Lobby,
                ServerView::PlayerDetail(_) => ServerView::Lobby,
                ServerView::Help => ServerView::Lobby,
            };
        }
        _ => {}
    }

    false
}
