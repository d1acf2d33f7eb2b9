use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

use crate::session::clock::{TestClock, TimeSource, WallClock};
use crate::session::compare::{self, MissedKey};
use crate::session::metrics;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionMode {
    /// Fixed reference text; the test ends when the buffer reaches its length.
    Untimed,
    /// Fixed duration; the test ends when the countdown reaches zero. The
    /// host must supply reference text long enough to outlast any typist.
    Timed { minutes: u32 },
}

impl SessionMode {
    fn budget(self) -> Option<Duration> {
        match self {
            SessionMode::Untimed => None,
            SessionMode::Timed { minutes } => Some(Duration::from_secs(u64::from(minutes) * 60)),
        }
    }

    pub fn is_timed(self) -> bool {
        matches!(self, SessionMode::Timed { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionCause {
    Natural,
    Timeout,
}

/// Final record emitted once when a session reaches `Finished`. Immutable
/// thereafter; the host hands it to results display, progress tracking, and
/// certificate export.
#[derive(Clone, Debug)]
pub struct SessionResult {
    pub normal_wpm: u32,
    pub net_wpm: u32,
    pub error_count: usize,
    pub key_error_tally: HashMap<MissedKey, u32>,
    pub elapsed_secs: f64,
    pub completion_cause: CompletionCause,
}

impl SessionResult {
    /// Most-missed reference keys, highest count first. The overflow
    /// sentinel is skipped; there is no key to practice for typing past
    /// the end of the text.
    pub fn top_missed_keys(&self, limit: usize) -> Vec<char> {
        let mut missed: Vec<(char, u32)> = self
            .key_error_tally
            .iter()
            .filter_map(|(key, &count)| match key {
                MissedKey::Char(ch) if count > 0 => Some((*ch, count)),
                _ => None,
            })
            .collect();
        missed.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        missed.into_iter().take(limit).map(|(ch, _)| ch).collect()
    }
}

/// Live display snapshot produced by `on_tick` while the session runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickUpdate {
    /// Gross WPM over everything typed so far (net WPM is a final-result
    /// figure only).
    pub live_wpm: u32,
    pub error_count: usize,
    pub remaining_secs: Option<u64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// `submit_input` after `Finished` is a host bug, not a runtime
    /// condition; the session stays read-only.
    #[error("typing session is finished; input rejected")]
    Finished,
}

/// The typing-test state machine: owns the typed buffer, error tallies, and
/// the clock, and decides when the session completes.
///
/// `Finished` is terminal. There is no way back to `Running`; a reset means
/// dropping this session and constructing a fresh one.
pub struct TypingSession<S: TimeSource = WallClock> {
    reference: Vec<char>,
    typed: Vec<char>,
    phase: Phase,
    mode: SessionMode,
    clock: TestClock<S>,
    error_count: usize,
    key_error_tally: HashMap<MissedKey, u32>,
    result: Option<SessionResult>,
}

impl TypingSession<WallClock> {
    pub fn start(reference: &str, mode: SessionMode) -> Self {
        Self::with_source(reference, mode, WallClock)
    }
}

impl<S: TimeSource> TypingSession<S> {
    pub fn with_source(reference: &str, mode: SessionMode, source: S) -> Self {
        Self {
            reference: reference.chars().collect(),
            typed: Vec::new(),
            phase: Phase::Idle,
            mode,
            clock: TestClock::with_source(source, mode.budget()),
            error_count: 0,
            key_error_tally: HashMap::new(),
            result: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn reference(&self) -> &[char] {
        &self.reference
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    /// Cursor position = length of the typed buffer.
    pub fn cursor(&self) -> usize {
        self.typed.len()
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn remaining_secs(&self) -> Option<u64> {
        self.clock.remaining_secs()
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// Replace the typed buffer with the input field's current contents and
    /// reclassify every position. The first character fixes the elapsed-time
    /// origin and moves the session to `Running`; in untimed mode, filling
    /// the buffer to the reference length completes it.
    pub fn submit_input(&mut self, buffer: &str) -> Result<(), SessionError> {
        if self.phase == Phase::Finished {
            return Err(SessionError::Finished);
        }

        let new: Vec<char> = buffer.chars().collect();
        if self.phase == Phase::Idle && !new.is_empty() {
            self.clock.start();
            self.phase = Phase::Running;
        }

        // Tally updates fire only on a genuine single-char forward append
        if let Some(miss) = compare::appended_miss(&self.reference, self.typed.len(), &new) {
            *self.key_error_tally.entry(miss).or_insert(0) += 1;
        }

        self.error_count = compare::compare(&self.reference, &new).error_count;
        self.typed = new;

        if self.phase == Phase::Running
            && self.mode == SessionMode::Untimed
            && self.typed.len() >= self.reference.len()
        {
            self.finish(CompletionCause::Natural);
        }
        Ok(())
    }

    /// Periodic tick: refresh live metrics and, in timed mode, poll the
    /// countdown. Inert before the first keystroke and after `Finished`, so
    /// a stale tick can neither mutate a finished session nor fire a second
    /// forced completion.
    pub fn on_tick(&mut self) -> Option<TickUpdate> {
        if self.phase != Phase::Running {
            return None;
        }
        if self.clock.poll_expired() {
            self.finish(CompletionCause::Timeout);
            return None;
        }
        let elapsed = self.clock.elapsed_secs()?;
        Some(TickUpdate {
            live_wpm: metrics::wpm(self.typed.len(), elapsed),
            error_count: self.error_count,
            remaining_secs: self.clock.remaining_secs(),
        })
    }

    fn finish(&mut self, cause: CompletionCause) {
        // Timed results divide by the configured duration, not measured
        // wall time, so a run is reproducible down to the timer's last tick.
        let elapsed_secs = match (self.mode, cause) {
            (SessionMode::Timed { minutes }, _) => f64::from(minutes) * 60.0,
            (SessionMode::Untimed, _) => self.clock.elapsed_secs().unwrap_or(0.0),
        };
        let correct_chars = self.typed.len() - self.error_count;
        let figures = metrics::speed_figures(self.typed.len(), correct_chars, elapsed_secs);

        self.result = Some(SessionResult {
            normal_wpm: figures.normal_wpm,
            net_wpm: figures.net_wpm,
            error_count: self.error_count,
            key_error_tally: self.key_error_tally.clone(),
            elapsed_secs,
            completion_cause: cause,
        });
        self.phase = Phase::Finished;
    }
}
