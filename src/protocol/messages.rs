//! Protocol messages for client-server communication.
//!
//! All messages are serialized as JSON over WebSocket.

use serde::{Deserialize, Serialize};

/// How a run is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Answer as many questions as possible inside a fixed time window.
    Timed,
    /// Fixed number of questions, score out of that total.
    Points,
}

impl GameMode {
    pub fn label(&self) -> &'static str {
        match self {
            GameMode::Timed => "Timed",
            GameMode::Points => "Points",
        }
    }
}

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Client wants to register with a username.
    Register { username: String },

    /// Client begins a scoring run in the given mode.
    StartRun { mode: GameMode },

    /// Client asks for the next question.
    NextQuestion,

    /// Client submits an answer for the pending question.
    SubmitAnswer { answer: String },

    /// Client wants an invite code snapshotting its current score.
    Challenge,

    /// Client looks up a friend's invite.
    FetchChallenge { invite_code: String },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Connection accepted, waiting for Register message.
    ConnectionAck,

    /// Username accepted.
    Registered { username: String },

    /// Username rejected (taken, invalid length, etc.).
    RegisterRejected { reason: String },

    /// Reconnection successful, resuming previous session.
    ReconnectAccepted {
        username: String,
        mode: Option<GameMode>,
        score: usize,
        answered: usize,
    },

    /// A scoring run has begun.
    RunStarted { mode: GameMode },

    /// Next question: clue text plus the shuffled option set.
    ///
    /// The correct name is deliberately absent from the payload; the server
    /// keeps it and verifies submissions itself.
    Question {
        clues: Vec<String>,
        options: Vec<String>,
    },

    /// Outcome of an answer submission. `fun_fact` is present only when
    /// the answer was correct.
    AnswerOutcome {
        correct: bool,
        fun_fact: Option<String>,
        score: usize,
        answered: usize,
    },

    /// No question could be served (exhausted pool, nothing pending).
    QuestionUnavailable { reason: String },

    /// Invite created for the current score.
    ChallengeCreated {
        invite_code: String,
        invite_link: String,
    },

    /// Details behind an invite code.
    ChallengeInfo { inviter: String, score: usize },

    /// Invite lookup or creation failed.
    ChallengeRejected { reason: String },

    /// Client has been kicked by the host.
    Kicked { reason: String },

    /// Server is shutting down.
    ServerClosing,
}

/// Username validation constants.
pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 16;

/// Default server port.
pub const DEFAULT_PORT: u16 = 8712;

/// Invite codes are 4 random bytes rendered as hex.
pub const INVITE_CODE_LENGTH: usize = 8;

/// Seconds in a timed run.
pub const TIMED_RUN_SECS: u64 = 90;

/// Questions in a points run.
pub const POINTS_RUN_QUESTIONS: usize = 10;

/// Validates a username according to the rules.
///
/// Returns `Ok(())` if valid, or `Err` with an error message.
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let trimmed = username.trim();

    if trimmed.len() < USERNAME_MIN_LENGTH {
        return Err("Username must be at least 3 characters");
    }

    if trimmed.len() > USERNAME_MAX_LENGTH {
        return Err("Username must be at most 16 characters");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username("abcdefghijklmnop").is_ok()); // 16 chars
        assert!(validate_username("ab").is_err());
        assert!(validate_username("abcdefghijklmnopq").is_err()); // 17 chars
        assert!(validate_username("  ab  ").is_err()); // trimmed = 2 chars
    }

    #[test]
    fn test_message_serialization() {
        let msg = ClientMessage::StartRun {
            mode: GameMode::Timed,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"StartRun\""));
        assert!(json.contains("\"mode\":\"Timed\""));

        let msg = ServerMessage::Question {
            clues: vec!["City of lights".to_string()],
            options: vec!["Paris".to_string(), "Rome".to_string()],
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"Question\""));
        // the correct answer never travels with the question
        assert!(!json.contains("correct"));
    }

    #[test]
    fn test_answer_outcome_round_trip() {
        let msg = ServerMessage::AnswerOutcome {
            correct: true,
            fun_fact: Some("The Eiffel Tower grows in summer".to_string()),
            score: 3,
            answered: 5,
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: ServerMessage = serde_json::from_str(&json).unwrap();
        match back {
            ServerMessage::AnswerOutcome {
                correct,
                fun_fact,
                score,
                answered,
            } => {
                assert!(correct);
                assert!(fun_fact.is_some());
                assert_eq!(score, 3);
                assert_eq!(answered, 5);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
