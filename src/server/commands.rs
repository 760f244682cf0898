//! Server command parser and executor.
//!
//! Handles host commands like `kick`, `ban`, `revoke`, etc.

use std::net::IpAddr;

use crate::protocol::ServerMessage;

use super::state::{PlayerStatus, ServerState, ServerView};

/// Result of executing a command.
pub enum CommandResult {
    /// Command executed successfully with optional message.
    Ok(Option<String>),
    /// Command failed with an error message.
    Error(String),
    /// Server should quit.
    Quit,
}

/// Parse and execute a command.
pub fn execute_command(state: &mut ServerState, input: &str) -> CommandResult {
    let input = input.trim();
    if input.is_empty() {
        return CommandResult::Ok(None);
    }

    let parts: Vec<&str> = input.split_whitespace().collect();
    let command = parts[0].to_lowercase();
    let args = &parts[1..];

    match command.as_str() {
        "quit" | "exit" => cmd_quit(state),
        "kick" => cmd_kick(state, args),
        "ban" => cmd_ban(state, args),
        "unban" => cmd_unban(state, args),
        "view" => cmd_view(state, args),
        "list" => cmd_list(state, args),
        "challenges" => cmd_challenges(state),
        "revoke" => cmd_revoke(state, args),
        "help" | "?" => cmd_help(state),
        _ => CommandResult::Error(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            command
        )),
    }
}

/// Quit the server.
fn cmd_quit(state: &mut ServerState) -> CommandResult {
    state.broadcast_all(ServerMessage::ServerClosing);
    state.should_quit = true;
    CommandResult::Quit
}

/// Kick a player.
fn cmd_kick(state: &mut ServerState, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: kick <username>".to_string());
    }

    let username = args[0];

    if let Some(session) = state.get_player_by_name_mut(username) {
        session.send(ServerMessage::Kicked {
            reason: "Kicked by host".to_string(),
        });
        session.sender = None;
        session.status = PlayerStatus::Disconnected;
        CommandResult::Ok(Some(format!("Kicked player: {}", username)))
    } else {
        CommandResult::Error(format!("Player not found: {}", username))
    }
}

/// Ban a player (kick + ban IP).
fn cmd_ban(state: &mut ServerState, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: ban <username>".to_string());
    }

    let username = args[0];

    if let Some(session) = state.get_player_by_name(username) {
        let ip = session.ip_addr;
        state.banned_ips.insert(ip);

        if let Some(session) = state.get_player_by_name_mut(username) {
            session.send(ServerMessage::Kicked {
                reason: "Banned by host".to_string(),
            });
            session.sender = None;
            session.status = PlayerStatus::Disconnected;
        }

        CommandResult::Ok(Some(format!("Banned player: {} (IP: {})", username, ip)))
    } else {
        CommandResult::Error(format!("Player not found: {}", username))
    }
}

/// Unban an IP address.
fn cmd_unban(state: &mut ServerState, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: unban <ip>".to_string());
    }

    let ip_str = args[0];
    match ip_str.parse::<IpAddr>() {
        Ok(ip) => {
            if state.banned_ips.remove(&ip) {
                CommandResult::Ok(Some(format!("Unbanned IP: {}", ip)))
            } else {
                CommandResult::Error(format!("IP not in ban list: {}", ip))
            }
        }
        Err(_) => CommandResult::Error(format!("Invalid IP address: {}", ip_str)),
    }
}

/// View a specific player or switch to the activity view.
fn cmd_view(state: &mut ServerState, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].to_lowercase() == "all" {
        state.current_view = ServerView::Activity;
        CommandResult::Ok(Some("Viewing all players.".to_string()))
    } else {
        let username = args[0];
        if state.get_player_by_name(username).is_some() {
            state.current_view = ServerView::PlayerDetail(username.to_string());
            CommandResult::Ok(Some(format!("Viewing player: {}", username)))
        } else {
            CommandResult::Error(format!("Player not found: {}", username))
        }
    }
}

/// List players, bans, or challenges.
fn cmd_list(state: &mut ServerState, args: &[&str]) -> CommandResult {
    match args.first().map(|a| a.to_lowercase()).as_deref() {
        Some("bans") => {
            if state.banned_ips.is_empty() {
                CommandResult::Ok(Some("No banned IPs.".to_string()))
            } else {
                let ips: Vec<String> = state.banned_ips.iter().map(|ip| ip.to_string()).collect();
                CommandResult::Ok(Some(format!("Banned IPs: {}", ips.join(", "))))
            }
        }
        Some("challenges") => {
            if state.challenges.is_empty() {
                CommandResult::Ok(Some("No open challenges.".to_string()))
            } else {
                let codes: Vec<String> = state
                    .open_challenges()
                    .iter()
                    .map(|c| format!("{} ({}: {})", c.code, c.inviter, c.score))
                    .collect();
                CommandResult::Ok(Some(format!("Challenges: {}", codes.join(", "))))
            }
        }
        _ => {
            let players: Vec<String> = state
                .sessions
                .values()
                .filter_map(|s| {
                    let name = s.username.as_ref()?;
                    let status_str = match s.status {
                        PlayerStatus::Idle => "idle".to_string(),
                        PlayerStatus::Playing => format!("playing ({})", s.score),
                        PlayerStatus::Disconnected => "disconnected".to_string(),
                        PlayerStatus::Connected => "connecting".to_string(),
                    };
                    Some(format!("{} ({})", name, status_str))
                })
                .collect();

            if players.is_empty() {
                CommandResult::Ok(Some("No players connected.".to_string()))
            } else {
                CommandResult::Ok(Some(format!("Players: {}", players.join(", "))))
            }
        }
    }
}

/// Switch to the challenges view.
fn cmd_challenges(state: &mut ServerState) -> CommandResult {
    state.current_view = ServerView::Challenges;
    CommandResult::Ok(None)
}

/// Revoke an open challenge invite.
fn cmd_revoke(state: &mut ServerState, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: revoke <code>".to_string());
    }

    let code = args[0];
    if state.challenges.remove(code).is_some() {
        CommandResult::Ok(Some(format!("Revoked invite: {}", code)))
    } else {
        CommandResult::Error(format!("No such invite: {}", code))
    }
}

/// Show help.
fn cmd_help(state: &mut ServerState) -> CommandResult {
    state.previous_view = Some(state.current_view.clone());
    state.current_view = ServerView::Help;
    CommandResult::Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{DestinationCatalog, OptionSetBuilder, OPTION_SET_SIZE};
    use crate::models::Destination;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn state() -> ServerState {
        let destinations = ["Paris", "Rome", "Tokyo", "Cairo", "Lima"]
            .iter()
            .map(|name| Destination {
                name: name.to_string(),
                clues: vec!["clue".to_string()],
                fun_facts: vec![],
            })
            .collect();
        ServerState::with_rng(
            DestinationCatalog::new(destinations),
            OptionSetBuilder::new(OPTION_SET_SIZE).unwrap(),
            0,
            "http://localhost".to_string(),
            StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn unknown_command_is_an_error() {
        let mut state = state();
        assert!(matches!(
            execute_command(&mut state, "frobnicate"),
            CommandResult::Error(_)
        ));
    }

    #[test]
    fn revoke_removes_an_open_invite() {
        let mut state = state();
        let record = state.create_challenge("alice".to_string(), 5);

        let input = format!("revoke {}", record.code);
        assert!(matches!(
            execute_command(&mut state, &input),
            CommandResult::Ok(Some(_))
        ));
        assert!(state.challenges.is_empty());

        assert!(matches!(
            execute_command(&mut state, &input),
            CommandResult::Error(_)
        ));
    }

    #[test]
    fn challenges_command_switches_view() {
        let mut state = state();
        execute_command(&mut state, "challenges");
        assert_eq!(state.current_view, ServerView::Challenges);
    }

    #[test]
    fn quit_flags_shutdown() {
        let mut state = state();
        assert!(matches!(
            execute_command(&mut state, "quit"),
            CommandResult::Quit
        ));
        assert!(state.should_quit);
    }

    #[test]
    fn unban_requires_a_known_ip() {
        let mut state = state();
        state.banned_ips.insert("10.0.0.1".parse().unwrap());

        assert!(matches!(
            execute_command(&mut state, "unban 10.0.0.1"),
            CommandResult::Ok(Some(_))
        ));
        assert!(matches!(
            execute_command(&mut state, "unban 10.0.0.1"),
            CommandResult::Error(_)
        ));
        assert!(matches!(
            execute_command(&mut state, "unban not-an-ip"),
            CommandResult::Error(_)
        ));
    }
}
