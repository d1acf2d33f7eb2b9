use crate::catalog::{Category, Corpus, ExerciseBuilder, Level, Track, EXERCISES_PER_LEVEL};
use crate::certificate::{self, CertificateRequest};
use crate::config::Config;
use crate::session::typing::{Phase, TickUpdate};
use crate::session::{SessionMode, SessionResult, TypingSession};
use crate::store::{ProgressData, ProgressStore};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    LevelSelect,
    ProgrammerSelect,
    CategorySelect,
    ExercisePicker,
    DurationSelect,
    Typing,
    Results,
    CertificateName,
    Progress,
}

/// What kind of session is (or was) running. Exercises feed the milestone
/// tracker; drills and timed tests never do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionKind {
    Exercise { track: Track, index: usize },
    ProblemKeys { keys: Vec<char> },
    TimedTest { minutes: u32 },
}

pub struct App {
    pub screen: AppScreen,
    pub theme: &'static Theme,
    pub config: Config,
    pub corpus: Corpus,
    pub progress: ProgressData,
    pub store: Option<ProgressStore>,
    pub session: Option<TypingSession>,
    pub session_kind: Option<SessionKind>,
    pub session_title: String,
    pub input_buffer: String,
    pub live: Option<TickUpdate>,
    pub last_result: Option<SessionResult>,
    pub certificate_name: String,
    pub status: Option<String>,
    pub should_quit: bool,
    /// Cursor for whichever select screen is showing.
    pub select_index: usize,
    /// Track whose exercises the picker is browsing.
    pub picker_track: Option<Track>,
    pub picker_index: usize,
    pub progress_scroll: usize,
}

impl App {
    pub fn new() -> Self {
        let config = Config::load().unwrap_or_default();
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let store = ProgressStore::new().ok();
        let progress = store
            .as_ref()
            .map(|s| s.load_progress())
            .unwrap_or_default();

        Self::assemble(config, theme, store, progress)
    }

    /// App detached from the user's config and data files. Nothing on the
    /// host filesystem is read, created, or written.
    #[cfg(test)]
    pub fn detached() -> Self {
        let theme: &'static Theme = Box::leak(Box::new(Theme {
            name: "default".to_string(),
            colors: crate::ui::theme::ThemeColors::default(),
        }));
        Self::assemble(Config::default(), theme, None, ProgressData::default())
    }

    fn assemble(
        config: Config,
        theme: &'static Theme,
        store: Option<ProgressStore>,
        progress: ProgressData,
    ) -> Self {
        Self {
            screen: AppScreen::Menu,
            theme,
            config,
            corpus: Corpus::load(),
            progress,
            store,
            session: None,
            session_kind: None,
            session_title: String::new(),
            input_buffer: String::new(),
            live: None,
            last_result: None,
            certificate_name: String::new(),
            status: None,
            should_quit: false,
            select_index: 0,
            picker_track: None,
            picker_index: 0,
            progress_scroll: 0,
        }
    }

    pub fn open(&mut self, screen: AppScreen) {
        self.screen = screen;
        self.select_index = 0;
        self.status = None;
    }

    pub fn go_to_menu(&mut self) {
        self.session = None;
        self.input_buffer.clear();
        self.live = None;
        self.open(AppScreen::Menu);
    }

    /// Every progress-tracked source, in pathway order.
    pub fn all_tracks() -> Vec<Track> {
        Level::GENERAL
            .iter()
            .chain(Level::PROGRAMMER.iter())
            .map(|l| Track::Level(*l))
            .chain(Category::ALL.iter().map(|c| Track::Category(*c)))
            .collect()
    }

    pub fn open_picker(&mut self, track: Track) {
        self.picker_track = Some(track);
        // Jump to the first incomplete exercise
        self.picker_index = (0..EXERCISES_PER_LEVEL)
            .find(|i| !self.progress.is_completed(track.name(), *i))
            .unwrap_or(0);
        self.open(AppScreen::ExercisePicker);
    }

    pub fn start_picked_exercise(&mut self) {
        let Some(track) = self.picker_track else {
            return;
        };
        let index = self.picker_index;
        let builder = ExerciseBuilder::new(&self.corpus);
        let exercise = match track {
            Track::Level(level) => builder.level_exercise(level, index),
            Track::Category(category) => builder.category_exercise(category, index),
        };
        let title = exercise.title();
        self.start_session(
            &exercise.text,
            title,
            SessionKind::Exercise { track, index },
            SessionMode::Untimed,
        );
    }

    pub fn start_timed_test(&mut self, minutes: u32) {
        let builder = ExerciseBuilder::new(&self.corpus);
        let text = builder.timed_test_text(minutes);
        self.config.timed_minutes = minutes;
        self.start_session(
            &text,
            format!("{minutes}-Minute Test"),
            SessionKind::TimedTest { minutes },
            SessionMode::Timed { minutes },
        );
    }

    /// Build a drill from the finished session's worst keys. No-op when
    /// the last run had no missed keys.
    pub fn start_problem_key_drill(&mut self) {
        let keys = match self.last_result.as_ref() {
            Some(result) => result.top_missed_keys(3),
            None => return,
        };
        if keys.is_empty() {
            return;
        }
        let builder = ExerciseBuilder::new(&self.corpus);
        let text = builder.problem_key_drill(&keys);
        let label: String = keys.iter().collect();
        self.start_session(
            &text,
            format!("Key Practice [{label}]"),
            SessionKind::ProblemKeys { keys },
            SessionMode::Untimed,
        );
    }

    pub fn retry_session(&mut self) {
        match self.session_kind.clone() {
            Some(SessionKind::Exercise { track, index }) => {
                self.picker_track = Some(track);
                self.picker_index = index;
                self.start_picked_exercise();
            }
            Some(SessionKind::TimedTest { minutes }) => self.start_timed_test(minutes),
            Some(SessionKind::ProblemKeys { keys }) => {
                let builder = ExerciseBuilder::new(&self.corpus);
                let text = builder.problem_key_drill(&keys);
                let label: String = keys.iter().collect();
                self.start_session(
                    &text,
                    format!("Key Practice [{label}]"),
                    SessionKind::ProblemKeys { keys },
                    SessionMode::Untimed,
                );
            }
            None => {}
        }
    }

    fn start_session(&mut self, text: &str, title: String, kind: SessionKind, mode: SessionMode) {
        self.session = Some(TypingSession::start(text, mode));
        self.session_kind = Some(kind);
        self.session_title = title;
        self.input_buffer.clear();
        self.live = None;
        self.last_result = None;
        self.status = None;
        self.screen = AppScreen::Typing;
    }

    pub fn type_char(&mut self, ch: char) {
        self.input_buffer.push(ch);
        self.submit_buffer();
    }

    pub fn backspace(&mut self) {
        self.input_buffer.pop();
        self.submit_buffer();
    }

    fn submit_buffer(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.phase() == Phase::Finished {
            return;
        }
        if session.submit_input(&self.input_buffer).is_err() {
            return;
        }
        if session.phase() == Phase::Finished {
            self.finish_session();
        }
    }

    /// Forward a tick to the running session. A timed session may force
    /// its own completion here.
    pub fn on_tick(&mut self) {
        if self.screen != AppScreen::Typing {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(update) = session.on_tick() {
            self.live = Some(update);
        }
        if session.phase() == Phase::Finished {
            self.finish_session();
        }
    }

    fn finish_session(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        self.last_result = session.result().cloned();

        // Milestones move only for tracked exercises
        if let Some(SessionKind::Exercise { track, index }) = &self.session_kind {
            let (track, index) = (*track, *index);
            self.progress.mark_completed(track.name(), index);
            if let Some(store) = self.store.as_ref() {
                if let Err(err) = store.save_progress(&self.progress) {
                    self.status = Some(format!("Could not save progress: {err}"));
                }
            }
        }

        self.session = None;
        self.input_buffer.clear();
        self.live = None;
        self.screen = AppScreen::Results;
    }

    /// Abandon a session in flight. Nothing is recorded.
    pub fn abandon_session(&mut self) {
        self.session = None;
        self.session_kind = None;
        self.input_buffer.clear();
        self.live = None;
        self.go_to_menu();
    }

    pub fn finished_timed_minutes(&self) -> Option<u32> {
        match &self.session_kind {
            Some(SessionKind::TimedTest { minutes }) if self.last_result.is_some() => {
                Some(*minutes)
            }
            _ => None,
        }
    }

    pub fn open_certificate_name(&mut self) {
        if self.finished_timed_minutes().is_none() {
            return;
        }
        self.certificate_name = self.config.display_name.clone();
        self.open(AppScreen::CertificateName);
    }

    pub fn issue_certificate(&mut self) {
        let (Some(minutes), Some(result)) =
            (self.finished_timed_minutes(), self.last_result.as_ref())
        else {
            return;
        };
        let Some(store) = self.store.as_ref() else {
            self.status = Some("No data directory available".to_string());
            self.screen = AppScreen::Results;
            return;
        };

        let request = CertificateRequest {
            display_name: self.certificate_name.clone(),
            wpm: result.normal_wpm,
            net_wpm: result.net_wpm,
            duration_minutes: minutes,
        };
        match certificate::issue(store, &request) {
            Ok((record, path)) => {
                self.status = Some(format!(
                    "Certificate #{} saved to {}",
                    record.serial,
                    path.display()
                ));
                self.config.display_name = self.certificate_name.trim().to_string();
                let _ = self.config.save();
            }
            Err(err) => {
                self.status = Some(format!("Certificate export failed: {err}"));
            }
        }
        self.screen = AppScreen::Results;
    }
}
