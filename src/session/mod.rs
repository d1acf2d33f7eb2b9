pub mod clock;
pub mod compare;
pub mod metrics;
pub mod typing;

pub use typing::{CompletionCause, SessionMode, SessionResult, TypingSession};
