//! Wire protocol shared by client and server.

mod messages;

pub use messages::{
    validate_username, ClientMessage, GameMode, ServerMessage, DEFAULT_PORT, INVITE_CODE_LENGTH,
    POINTS_RUN_QUESTIONS, TIMED_RUN_SECS, USERNAME_MAX_LENGTH, USERNAME_MIN_LENGTH,
};
