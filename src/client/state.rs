//! Client state management.

use std::time::{Duration, Instant};

use crate::protocol::{GameMode, POINTS_RUN_QUESTIONS, TIMED_RUN_SECS};

/// The clue text and options of the round in play.
#[derive(Debug, Clone)]
pub struct RoundData {
    pub clues: Vec<String>,
    pub options: Vec<String>,
}

/// Verdict for the last submitted answer.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub correct: bool,
    pub fun_fact: Option<String>,
}

/// A friend's invite being played against.
#[derive(Debug, Clone)]
pub struct ChallengeBanner {
    pub inviter: String,
    pub score: usize,
}

/// Current state of the client.
#[derive(Debug, Clone)]
pub enum ClientState {
    /// Connecting to server.
    Connecting,

    /// Entering username.
    NameEntry {
        input: String,
        error: Option<String>,
    },

    /// Choosing between timed and points play.
    ModeSelect {
        username: String,
        selected: GameMode,
        challenge: Option<ChallengeBanner>,
        error: Option<String>,
    },

    /// Answering questions in a run.
    Playing {
        username: String,
        mode: GameMode,
        round: Option<RoundData>,
        outcome: Option<RoundOutcome>,
        notice: Option<String>,
        selected_option: usize,
        score: usize,
        answered: usize,
        /// End of the run window (timed mode only).
        deadline: Option<Instant>,
    },

    /// Run finished; scores, verdicts, invite creation.
    Summary {
        username: String,
        mode: GameMode,
        score: usize,
        answered: usize,
        challenge: Option<ChallengeBanner>,
        invite: Option<(String, String)>,
        error: Option<String>,
    },

    /// Disconnected from server.
    Disconnected { message: String },
}

impl Default for ClientState {
    fn default() -> Self {
        Self::Connecting
    }
}

impl ClientState {
    /// Create a new name entry state.
    pub fn name_entry() -> Self {
        Self::NameEntry {
            input: String::new(),
            error: None,
        }
    }

    /// Create a new mode select state.
    pub fn mode_select(username: String, challenge: Option<ChallengeBanner>) -> Self {
        Self::ModeSelect {
            username,
            selected: GameMode::Timed,
            challenge,
            error: None,
        }
    }

    /// Create a disconnected state.
    pub fn disconnected(message: String) -> Self {
        Self::Disconnected { message }
    }

    /// Get the username if available.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::ModeSelect { username, .. }
            | Self::Playing { username, .. }
            | Self::Summary { username, .. } => Some(username),
            _ => None,
        }
    }
}

/// Client application state.
pub struct ClientApp {
    /// Current state.
    pub state: ClientState,
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Invite code supplied on the command line, consumed after registration.
    pub invite_code: Option<String>,
    /// Invite details, once fetched; survives across runs.
    pub challenge: Option<ChallengeBanner>,
    /// Whether the client should quit.
    pub should_quit: bool,
}

impl ClientApp {
    /// Create a new client app.
    pub fn new(host: String, port: u16, invite_code: Option<String>) -> Self {
        Self {
            state: ClientState::Connecting,
            host,
            port,
            invite_code,
            challenge: None,
            should_quit: false,
        }
    }

    /// Get the server address string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Move to name entry state.
    pub fn enter_name_entry(&mut self) {
        self.state = ClientState::name_entry();
    }

    /// Move to mode select state.
    pub fn enter_mode_select(&mut self, username: String) {
        self.state = ClientState::mode_select(username, self.challenge.clone());
    }

    /// Move to playing state for a fresh run.
    pub fn enter_playing(&mut self, mode: GameMode) {
        let username = self.state.username().unwrap_or("").to_string();
        let deadline = match mode {
            GameMode::Timed => Some(Instant::now() + Duration::from_secs(TIMED_RUN_SECS)),
            GameMode::Points => None,
        };
        self.state = ClientState::Playing {
            username,
            mode,
            round: None,
            outcome: None,
            notice: None,
            selected_option: 0,
            score: 0,
            answered: 0,
            deadline,
        };
    }

    /// Set the round served by the server.
    pub fn set_round(&mut self, clues: Vec<String>, options: Vec<String>) {
        if let ClientState::Playing {
            round,
            outcome,
            notice,
            selected_option,
            ..
        } = &mut self.state
        {
            *round = Some(RoundData { clues, options });
            *outcome = None;
            *notice = None;
            *selected_option = 0;
        }
    }

    /// Record the verdict for the submitted answer.
    pub fn set_outcome(
        &mut self,
        correct: bool,
        fun_fact: Option<String>,
        new_score: usize,
        new_answered: usize,
    ) {
        if let ClientState::Playing {
            outcome,
            score,
            answered,
            ..
        } = &mut self.state
        {
            *outcome = Some(RoundOutcome { correct, fun_fact });
            *score = new_score;
            *answered = new_answered;
        }
    }

    /// Show a try-again notice instead of a question.
    pub fn set_notice(&mut self, message: String) {
        if let ClientState::Playing { round, notice, .. } = &mut self.state {
            *round = None;
            *notice = Some(message);
        }
    }

    /// True when the points run has used up its question budget.
    pub fn points_run_complete(&self) -> bool {
        matches!(
            &self.state,
            ClientState::Playing {
                mode: GameMode::Points,
                answered,
                ..
            } if *answered >= POINTS_RUN_QUESTIONS
        )
    }

    /// True when a timed run's window has closed.
    pub fn timed_run_expired(&self) -> bool {
        matches!(
            &self.state,
            ClientState::Playing {
                deadline: Some(deadline),
                ..
            } if Instant::now() >= *deadline
        )
    }

    /// Seconds left in the timed window, if one is running.
    pub fn time_remaining(&self) -> Option<Duration> {
        if let ClientState::Playing {
            deadline: Some(deadline),
            ..
        } = &self.state
        {
            Some(deadline.saturating_duration_since(Instant::now()))
        } else {
            None
        }
    }

    /// Move to the run summary.
    pub fn enter_summary(&mut self) {
        if let ClientState::Playing {
            username,
            mode,
            score,
            answered,
            ..
        } = &self.state
        {
            self.state = ClientState::Summary {
                username: username.clone(),
                mode: *mode,
                score: *score,
                answered: *answered,
                challenge: self.challenge.clone(),
                invite: None,
                error: None,
            };
        }
    }

    /// Record the invite created for this run.
    pub fn set_invite(&mut self, code: String, link: String) {
        if let ClientState::Summary { invite, .. } = &mut self.state {
            *invite = Some((code, link));
        }
    }

    /// Record the fetched challenge details.
    pub fn set_challenge(&mut self, inviter: String, score: usize) {
        let banner = ChallengeBanner { inviter, score };
        self.challenge = Some(banner.clone());
        match &mut self.state {
            ClientState::ModeSelect { challenge, .. }
            | ClientState::Summary { challenge, .. } => {
                *challenge = Some(banner);
            }
            _ => {}
        }
    }

    /// Surface a challenge error on the current screen.
    pub fn set_challenge_error(&mut self, reason: String) {
        match &mut self.state {
            ClientState::ModeSelect { error, .. } | ClientState::Summary { error, .. } => {
                *error = Some(reason);
            }
            _ => {}
        }
    }

    /// Move to disconnected state.
    pub fn disconnect(&mut self, message: String) {
        self.state = ClientState::disconnected(message);
    }

    /// Toggle the highlighted game mode.
    pub fn toggle_mode(&mut self) {
        if let ClientState::ModeSelect { selected, .. } = &mut self.state {
            *selected = match selected {
                GameMode::Timed => GameMode::Points,
                GameMode::Points => GameMode::Timed,
            };
        }
    }

    /// Select next option in the round.
    pub fn select_next_option(&mut self) {
        if let ClientState::Playing {
            round: Some(round),
            selected_option,
            ..
        } = &mut self.state
        {
            if !round.options.is_empty() {
                *selected_option = (*selected_option + 1) % round.options.len();
            }
        }
    }

    /// Select previous option in the round.
    pub fn select_previous_option(&mut self) {
        if let ClientState::Playing {
            round: Some(round),
            selected_option,
            ..
        } = &mut self.state
        {
            let len = round.options.len();
            if len > 0 {
                *selected_option = (*selected_option + len - 1) % len;
            }
        }
    }

    /// The currently highlighted option name, if a round is in play.
    pub fn selected_answer(&self) -> Option<String> {
        if let ClientState::Playing {
            round: Some(round),
            selected_option,
            ..
        } = &self.state
        {
            round.options.get(*selected_option).cloned()
        } else {
            None
        }
    }

    /// Add a character to name input.
    pub fn name_input_push(&mut self, c: char) {
        if let ClientState::NameEntry { input, .. } = &mut self.state {
            if input.len() < crate::protocol::USERNAME_MAX_LENGTH {
                input.push(c);
            }
        }
    }

    /// Remove a character from name input.
    pub fn name_input_pop(&mut self) {
        if let ClientState::NameEntry { input, .. } = &mut self.state {
            input.pop();
        }
    }

    /// Get name input value.
    pub fn name_input(&self) -> &str {
        if let ClientState::NameEntry { input, .. } = &self.state {
            input
        } else {
            ""
        }
    }

    /// Set name entry error.
    pub fn set_name_error(&mut self, err: String) {
        if let ClientState::NameEntry { error, .. } = &mut self.state {
            *error = Some(err);
        }
    }

    /// Clear name entry error.
    pub fn clear_name_error(&mut self) {
        if let ClientState::NameEntry { error, .. } = &mut self.state {
            *error = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> ClientApp {
        ClientApp::new("127.0.0.1".to_string(), 0, None)
    }

    fn app_in_mode_select() -> ClientApp {
        let mut app = app();
        app.enter_mode_select("alice".to_string());
        app
    }

    #[test]
    fn points_run_ends_after_question_budget() {
        let mut app = app_in_mode_select();
        app.enter_playing(GameMode::Points);

        for i in 1..=POINTS_RUN_QUESTIONS {
            app.set_round(vec!["clue".to_string()], vec!["Paris".to_string()]);
            app.set_outcome(true, None, i, i);
            if i < POINTS_RUN_QUESTIONS {
                assert!(!app.points_run_complete());
            }
        }
        assert!(app.points_run_complete());
    }

    #[test]
    fn timed_run_carries_a_deadline() {
        let mut app = app_in_mode_select();
        app.enter_playing(GameMode::Timed);
        assert!(app.time_remaining().is_some());
        assert!(!app.timed_run_expired());

        app.enter_mode_select("alice".to_string());
        app.enter_playing(GameMode::Points);
        assert!(app.time_remaining().is_none());
    }

    #[test]
    fn summary_keeps_run_tallies_and_challenge() {
        let mut app = app_in_mode_select();
        app.set_challenge("bob".to_string(), 7);
        app.enter_playing(GameMode::Timed);
        app.set_round(vec!["clue".to_string()], vec!["Paris".to_string()]);
        app.set_outcome(true, Some("fact".to_string()), 1, 1);
        app.enter_summary();

        match &app.state {
            ClientState::Summary {
                score,
                answered,
                challenge,
                ..
            } => {
                assert_eq!(*score, 1);
                assert_eq!(*answered, 1);
                assert_eq!(challenge.as_ref().unwrap().inviter, "bob");
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn option_selection_wraps() {
        let mut app = app_in_mode_select();
        app.enter_playing(GameMode::Points);
        app.set_round(
            vec!["clue".to_string()],
            vec![
                "Paris".to_string(),
                "Rome".to_string(),
                "Tokyo".to_string(),
            ],
        );

        assert_eq!(app.selected_answer().as_deref(), Some("Paris"));
        app.select_previous_option();
        assert_eq!(app.selected_answer().as_deref(), Some("Tokyo"));
        app.select_next_option();
        app.select_next_option();
        assert_eq!(app.selected_answer().as_deref(), Some("Rome"));
    }

    #[test]
    fn notice_clears_the_round() {
        let mut app = app_in_mode_select();
        app.enter_playing(GameMode::Points);
        app.set_round(vec!["clue".to_string()], vec!["Paris".to_string()]);
        app.set_notice("Could not assemble enough answer options".to_string());

        match &app.state {
            ClientState::Playing { round, notice, .. } => {
                assert!(round.is_none());
                assert!(notice.is_some());
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }
}
