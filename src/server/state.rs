//! Server state management.
//!
//! Tracks connected players, their runs, open challenge invites, and the
//! host console.

use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::game::{DestinationCatalog, OptionSetBuilder, OptionSetError};
use crate::protocol::{GameMode, ServerMessage, INVITE_CODE_LENGTH};

/// Current status of a connected player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    /// Connected but hasn't registered a username yet.
    Connected,
    /// Registered, not currently in a run.
    Idle,
    /// In the middle of a scoring run.
    Playing,
    /// Was connected but dropped (can reconnect from the same IP).
    Disconnected,
}

/// What view the host is currently seeing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerView {
    /// Connected players.
    Lobby,
    /// Live answer feed and score standings.
    Activity,
    /// Open challenge invites.
    Challenges,
    /// Detailed view of a specific player.
    PlayerDetail(String),
    /// Help view showing available commands.
    Help,
}

impl Default for ServerView {
    fn default() -> Self {
        Self::Lobby
    }
}

/// The question a player has been served but not yet answered.
///
/// The correct name lives only here; it never goes out on the wire with
/// the question.
#[derive(Debug, Clone)]
pub struct PendingQuestion {
    pub answer: String,
    pub options: Vec<String>,
}

/// A single player session.
pub struct PlayerSession {
    /// Unique session ID.
    pub id: Uuid,
    /// Username (None until Register message received).
    pub username: Option<String>,
    /// Client IP address.
    pub ip_addr: IpAddr,
    /// Current status.
    pub status: PlayerStatus,
    /// Mode of the current (or last) run.
    pub mode: Option<GameMode>,
    /// Correct answers this run.
    pub score: usize,
    /// Questions answered this run.
    pub answered: usize,
    /// Question served but not yet answered.
    pub pending: Option<PendingQuestion>,
    /// Channel to send messages to this client.
    pub sender: Option<mpsc::UnboundedSender<ServerMessage>>,
}

impl PlayerSession {
    /// Create a new session for a connected player.
    pub fn new(ip_addr: IpAddr, sender: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: None,
            ip_addr,
            status: PlayerStatus::Connected,
            mode: None,
            score: 0,
            answered: 0,
            pending: None,
            sender: Some(sender),
        }
    }

    /// Reset run counters for a fresh scoring run.
    pub fn start_run(&mut self, mode: GameMode) {
        self.mode = Some(mode);
        self.score = 0;
        self.answered = 0;
        self.pending = None;
        self.status = PlayerStatus::Playing;
    }

    /// Check if the player is actively connected.
    pub fn is_connected(&self) -> bool {
        self.sender.is_some() && !matches!(self.status, PlayerStatus::Disconnected)
    }

    /// Send a message to this player.
    pub fn send(&self, msg: ServerMessage) -> bool {
        if let Some(sender) = &self.sender {
            sender.send(msg).is_ok()
        } else {
            false
        }
    }
}

/// An open challenge invite.
#[derive(Debug, Clone)]
pub struct ChallengeRecord {
    pub inviter: String,
    pub score: usize,
    pub code: String,
    pub created_at: Instant,
}

/// A record of a recent answer for the live feed.
#[derive(Debug, Clone)]
pub struct LiveAnswer {
    pub username: String,
    pub answer: String,
    pub correct: bool,
    pub timestamp: Instant,
}

/// Why a question could not be composed.
#[derive(Debug)]
pub enum QuestionError {
    /// No destinations loaded at all.
    EmptyCatalog,
    /// The option set builder failed for the drawn destination.
    Options(OptionSetError),
}

/// Main server state.
pub struct ServerState {
    /// Loaded destination reference data.
    pub catalog: DestinationCatalog,
    /// Option set builder shared by all questions.
    pub options: OptionSetBuilder,
    /// Server-held randomness source for draws, shuffles, and invite codes.
    rng: StdRng,
    /// All player sessions (by session ID).
    pub sessions: HashMap<Uuid, PlayerSession>,
    /// Username to session ID mapping.
    pub username_to_id: HashMap<String, Uuid>,
    /// IP address to session ID mapping (for reconnection).
    pub ip_to_id: HashMap<IpAddr, Uuid>,
    /// Banned IP addresses.
    pub banned_ips: HashSet<IpAddr>,
    /// Open challenge invites by code.
    pub challenges: HashMap<String, ChallengeRecord>,
    /// Current view for the host.
    pub current_view: ServerView,
    /// Previous view (for returning from Help).
    pub previous_view: Option<ServerView>,
    /// Current command input.
    pub command_input: String,
    /// Command history for display.
    pub command_history: Vec<String>,
    /// Recent live answers for the activity view.
    pub live_answers: Vec<LiveAnswer>,
    /// Whether the server should shut down.
    pub should_quit: bool,
    /// Server port (for display).
    pub port: u16,
    /// Base URL embedded into invite links.
    pub base_url: String,
}

impl ServerState {
    /// Create a new server state around the loaded catalog.
    pub fn new(
        catalog: DestinationCatalog,
        options: OptionSetBuilder,
        port: u16,
        base_url: String,
    ) -> Self {
        Self::with_rng(catalog, options, port, base_url, StdRng::from_os_rng())
    }

    /// Like `new` but with an explicit randomness source, for tests.
    pub fn with_rng(
        catalog: DestinationCatalog,
        options: OptionSetBuilder,
        port: u16,
        base_url: String,
        rng: StdRng,
    ) -> Self {
        Self {
            catalog,
            options,
            rng,
            sessions: HashMap::new(),
            username_to_id: HashMap::new(),
            ip_to_id: HashMap::new(),
            banned_ips: HashSet::new(),
            challenges: HashMap::new(),
            current_view: ServerView::Lobby,
            previous_view: None,
            command_input: String::new(),
            command_history: Vec::new(),
            live_answers: Vec::new(),
            should_quit: false,
            port,
            base_url,
        }
    }

    /// Draw a destination and assemble its question payload.
    ///
    /// Returns the correct name, the clue list, and the shuffled options.
    /// A failed draw is a hard error for this question; the caller surfaces
    /// it instead of serving a degenerate option set.
    pub fn compose_question(&mut self) -> Result<(String, Vec<String>, Vec<String>), QuestionError> {
        let Some(dest) = self.catalog.pick_random(&mut self.rng) else {
            return Err(QuestionError::EmptyCatalog);
        };
        let name = dest.name.clone();
        let clues = dest.clues.clone();

        let options = self
            .options
            .build(&name, &self.catalog, &mut self.rng)
            .map_err(QuestionError::Options)?;

        Ok((name, clues, options.into_vec()))
    }

    /// Reattach a dropped session to a fresh sender.
    ///
    /// A pending question from before the drop is void; the client asks for
    /// a fresh one. A username re-registered by someone else while the
    /// session was down stays with the new holder, and the resumed player
    /// goes back through name entry, so `Some` is returned only when the
    /// session still owns its name.
    pub fn resume_session(
        &mut self,
        id: Uuid,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Option<(String, Option<GameMode>, usize, usize)> {
        let name_still_held = self
            .sessions
            .get(&id)
            .and_then(|s| s.username.as_ref())
            .is_some_and(|name| self.username_to_id.get(name) == Some(&id));

        let session = self.sessions.get_mut(&id)?;
        session.sender = Some(sender);
        session.pending = None;
        if !name_still_held {
            session.username = None;
        }
        session.status = if session.username.is_some() {
            PlayerStatus::Idle
        } else {
            PlayerStatus::Connected
        };

        session
            .username
            .clone()
            .map(|username| (username, session.mode, session.score, session.answered))
    }

    /// Create a challenge invite snapshotting `score` for `inviter`.
    pub fn create_challenge(&mut self, inviter: String, score: usize) -> ChallengeRecord {
        // Codes are short; loop until one is free.
        let code = loop {
            let candidate = generate_invite_code(&mut self.rng);
            if !self.challenges.contains_key(&candidate) {
                break candidate;
            }
        };

        let record = ChallengeRecord {
            inviter,
            score,
            code: code.clone(),
            created_at: Instant::now(),
        };
        self.challenges.insert(code, record.clone());
        record
    }

    /// The outward-facing link for an invite code.
    pub fn invite_link(&self, code: &str) -> String {
        format!("{}/?invite={}", self.base_url, code)
    }

    /// Get all connected players (with or without username).
    pub fn connected_players(&self) -> Vec<&PlayerSession> {
        self.sessions
            .values()
            .filter(|s| s.is_connected())
            .collect()
    }

    /// Get count of players with usernames.
    pub fn named_player_count(&self) -> usize {
        self.sessions
            .values()
            .filter(|s| s.username.is_some())
            .count()
    }

    /// Check if a username is held by a live session.
    ///
    /// A disconnected session keeps its name reserved only for reconnection
    /// from the same IP, so it does not block new registrations.
    pub fn is_username_taken(&self, username: &str) -> bool {
        self.username_to_id
            .get(username)
            .and_then(|id| self.sessions.get(id))
            .is_some_and(|s| s.is_connected())
    }

    /// Get a player session by username.
    pub fn get_player_by_name(&self, username: &str) -> Option<&PlayerSession> {
        self.username_to_id
            .get(username)
            .and_then(|id| self.sessions.get(id))
    }

    /// Get a mutable player session by username.
    pub fn get_player_by_name_mut(&mut self, username: &str) -> Option<&mut PlayerSession> {
        if let Some(id) = self.username_to_id.get(username).copied() {
            self.sessions.get_mut(&id)
        } else {
            None
        }
    }

    /// Add a live answer record.
    pub fn record_live_answer(&mut self, username: String, answer: String, correct: bool) {
        self.live_answers.push(LiveAnswer {
            username,
            answer,
            correct,
            timestamp: Instant::now(),
        });

        // Keep only the last 50 answers
        if self.live_answers.len() > 50 {
            self.live_answers.remove(0);
        }
    }

    /// Named players ordered by score for the activity view.
    pub fn standings(&self) -> Vec<&PlayerSession> {
        let mut players: Vec<_> = self
            .sessions
            .values()
            .filter(|s| s.username.is_some())
            .collect();
        players.sort_by(|a, b| b.score.cmp(&a.score).then(a.username.cmp(&b.username)));
        players
    }

    /// Open challenges, newest first.
    pub fn open_challenges(&self) -> Vec<&ChallengeRecord> {
        let mut records: Vec<_> = self.challenges.values().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    /// Broadcast a message to all connected players.
    pub fn broadcast_all(&self, msg: ServerMessage) {
        for session in self.sessions.values() {
            if session.is_connected() {
                session.send(msg.clone());
            }
        }
    }

    /// Add a message to command history.
    pub fn add_to_history(&mut self, msg: String) {
        self.command_history.push(msg);
        // Keep only the last 100 messages
        if self.command_history.len() > 100 {
            self.command_history.remove(0);
        }
    }
}

/// Render 4 random bytes as an 8-char hex invite code.
fn generate_invite_code(rng: &mut StdRng) -> String {
    let bytes: [u8; INVITE_CODE_LENGTH / 2] = rng.random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Destination;
    use crate::game::OPTION_SET_SIZE;

    fn dest(name: &str) -> Destination {
        Destination {
            name: name.to_string(),
            clues: vec![format!("clue for {}", name)],
            fun_facts: vec![format!("fact about {}", name)],
        }
    }

    fn state_with(names: &[&str]) -> ServerState {
        let catalog = DestinationCatalog::new(names.iter().map(|n| dest(n)).collect());
        ServerState::with_rng(
            catalog,
            OptionSetBuilder::new(OPTION_SET_SIZE).unwrap(),
            0,
            "http://localhost:5173".to_string(),
            StdRng::seed_from_u64(99),
        )
    }

    #[test]
    fn composed_question_holds_the_invariants() {
        let mut state = state_with(&["Paris", "Rome", "Tokyo", "Cairo", "Lima", "Oslo"]);

        for _ in 0..50 {
            let (answer, clues, options) = state.compose_question().unwrap();
            assert!(!clues.is_empty());
            assert_eq!(options.len(), OPTION_SET_SIZE);
            assert_eq!(options.iter().filter(|o| **o == answer).count(), 1);
            let unique: std::collections::HashSet<_> = options.iter().collect();
            assert_eq!(unique.len(), OPTION_SET_SIZE);
        }
    }

    #[test]
    fn compose_fails_hard_when_catalog_is_too_small() {
        let mut state = state_with(&["Paris", "Rome"]);
        assert!(matches!(
            state.compose_question(),
            Err(QuestionError::Options(OptionSetError::PoolTooSmall { .. }))
        ));
    }

    #[test]
    fn compose_fails_on_empty_catalog() {
        let mut state = state_with(&[]);
        assert!(matches!(
            state.compose_question(),
            Err(QuestionError::EmptyCatalog)
        ));
    }

    #[test]
    fn invite_codes_are_hex_and_unique() {
        let mut state = state_with(&["Paris", "Rome", "Tokyo", "Cairo"]);

        let mut codes = std::collections::HashSet::new();
        for i in 0..100 {
            let record = state.create_challenge("alice".to_string(), i);
            assert_eq!(record.code.len(), INVITE_CODE_LENGTH);
            assert!(record.code.chars().all(|c| c.is_ascii_hexdigit()));
            assert!(codes.insert(record.code.clone()));
        }
        assert_eq!(state.challenges.len(), 100);
    }

    #[test]
    fn invite_link_embeds_base_url_and_code() {
        let mut state = state_with(&["Paris", "Rome", "Tokyo", "Cairo"]);
        let record = state.create_challenge("alice".to_string(), 7);
        let link = state.invite_link(&record.code);
        assert_eq!(
            link,
            format!("http://localhost:5173/?invite={}", record.code)
        );
    }

    fn insert_named_session(state: &mut ServerState, name: &str, ip: &str) -> Uuid {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session = PlayerSession::new(ip.parse().unwrap(), tx);
        session.username = Some(name.to_string());
        session.status = PlayerStatus::Idle;
        let id = session.id;
        state.username_to_id.insert(name.to_string(), id);
        state.sessions.insert(id, session);
        id
    }

    fn drop_connection(state: &mut ServerState, id: Uuid) {
        let session = state.sessions.get_mut(&id).unwrap();
        session.sender = None;
        session.status = PlayerStatus::Disconnected;
    }

    #[test]
    fn resume_restores_a_still_owned_name_and_voids_the_pending_question() {
        let mut state = state_with(&["Paris", "Rome", "Tokyo", "Cairo"]);
        let id = insert_named_session(&mut state, "alice", "10.0.0.1");
        {
            let session = state.sessions.get_mut(&id).unwrap();
            session.start_run(GameMode::Points);
            session.score = 3;
            session.answered = 5;
            session.pending = Some(PendingQuestion {
                answer: "Paris".to_string(),
                options: vec!["Paris".to_string(), "Rome".to_string()],
            });
        }
        drop_connection(&mut state, id);

        let (tx, _rx) = mpsc::unbounded_channel();
        let resumed = state.resume_session(id, tx).unwrap();
        assert_eq!(resumed, ("alice".to_string(), Some(GameMode::Points), 3, 5));

        let session = state.sessions.get(&id).unwrap();
        assert_eq!(session.status, PlayerStatus::Idle);
        assert!(session.pending.is_none());
        assert!(session.is_connected());
    }

    #[test]
    fn resume_yields_a_name_reclaimed_while_disconnected() {
        let mut state = state_with(&["Paris", "Rome", "Tokyo", "Cairo"]);
        let old_id = insert_named_session(&mut state, "alice", "10.0.0.1");
        drop_connection(&mut state, old_id);

        // The freed name goes to a newcomer before the drop resumes.
        let new_id = insert_named_session(&mut state, "alice", "10.0.0.2");

        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(state.resume_session(old_id, tx).is_none());

        let resumed = state.sessions.get(&old_id).unwrap();
        assert!(resumed.username.is_none());
        assert_eq!(resumed.status, PlayerStatus::Connected);
        assert_eq!(state.username_to_id.get("alice"), Some(&new_id));
    }

    #[test]
    fn live_answer_feed_is_timestamped_and_capped() {
        let mut state = state_with(&["Paris", "Rome", "Tokyo", "Cairo"]);
        for i in 0..60 {
            state.record_live_answer(format!("p{}", i), "Paris".to_string(), i % 2 == 0);
        }

        assert_eq!(state.live_answers.len(), 50);
        let newest = state.live_answers.last().unwrap();
        assert_eq!(newest.username, "p59");
        assert!(newest.timestamp.elapsed().as_secs() < 5);
    }

    #[test]
    fn disconnected_sessions_do_not_reserve_usernames() {
        let mut state = state_with(&["Paris", "Rome", "Tokyo", "Cairo"]);
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session = PlayerSession::new("127.0.0.1".parse().unwrap(), tx);
        session.username = Some("alice".to_string());
        let id = session.id;
        state.username_to_id.insert("alice".to_string(), id);
        state.sessions.insert(id, session);

        assert!(state.is_username_taken("alice"));

        let session = state.sessions.get_mut(&id).unwrap();
        session.sender = None;
        session.status = PlayerStatus::Disconnected;
        assert!(!state.is_username_taken("alice"));
    }
}
