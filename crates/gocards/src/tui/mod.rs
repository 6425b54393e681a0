//! Interactive study screen.
//!
//! [`StudyApp`] owns everything one study session needs: the deck, the live
//! progress, the session state machine, and the progress store. Key events
//! map to session events; whenever an event reports changed progress the app
//! saves immediately, and a failing store demotes the session to
//! memory-only instead of interrupting it.

mod ui;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, warn};

use crate::card::Difficulty;
use crate::deck::Deck;
use crate::error::Result;
use crate::progress::{ProgressStore, StudyProgress};
use crate::session::{Filter, StudyEvent, StudySession};

/// How long to wait for input before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Startup options for a study session.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudyOptions {
    /// Difficulty filter active at startup.
    pub filter: Filter,
    /// Hide already-studied cards from the start.
    pub study_mode: bool,
    /// Shuffle before showing the first card.
    pub shuffle: bool,
    /// Seed for deterministic shuffling.
    pub seed: Option<u64>,
}

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiAction {
    Study(StudyEvent),
    ToggleHelp,
    Quit,
}

/// State for one interactive study run.
#[derive(Debug)]
pub struct StudyApp {
    deck: Deck,
    progress: StudyProgress,
    session: StudySession,
    store: Box<dyn ProgressStore>,
    rng: StdRng,
    persistence_degraded: bool,
    show_help: bool,
    should_quit: bool,
}

impl StudyApp {
    /// Build the app: load saved progress from the store and set up the
    /// initial selection.
    #[must_use]
    pub fn new(deck: Deck, store: Box<dyn ProgressStore>, options: StudyOptions) -> Self {
        let mut progress = store.load();
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut session =
            StudySession::with_options(&deck, &progress, options.filter, options.study_mode);
        if options.shuffle {
            session.apply(&deck, &mut progress, &mut rng, StudyEvent::Shuffle);
        }
        Self {
            deck,
            progress,
            session,
            store,
            rng,
            persistence_degraded: false,
            show_help: false,
            should_quit: false,
        }
    }

    /// Record that saved progress is unavailable for this run.
    ///
    /// Called when the real store could not be opened and the app is running
    /// on the in-memory fallback; the status line tells the user.
    pub fn mark_persistence_degraded(&mut self) {
        self.persistence_degraded = true;
    }

    /// The deck being studied.
    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Live study progress, including marks not yet persisted.
    #[must_use]
    pub fn progress(&self) -> &StudyProgress {
        &self.progress
    }

    /// Current session state.
    #[must_use]
    pub fn session(&self) -> &StudySession {
        &self.session
    }

    /// Whether progress is no longer being saved.
    #[must_use]
    pub fn persistence_degraded(&self) -> bool {
        self.persistence_degraded
    }

    /// Whether the help overlay is showing.
    #[must_use]
    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Handle one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            // Any key closes the help overlay.
            self.show_help = false;
            return;
        }
        match map_key(key.code) {
            Some(UiAction::Quit) => self.should_quit = true,
            Some(UiAction::ToggleHelp) => self.show_help = true,
            Some(UiAction::Study(event)) => self.apply_event(event),
            None => {}
        }
    }

    fn apply_event(&mut self, event: StudyEvent) {
        let applied = self
            .session
            .apply(&self.deck, &mut self.progress, &mut self.rng, event);
        if applied.progress_changed {
            self.persist();
        }
    }

    /// Save current progress, demoting to memory-only on failure.
    fn persist(&mut self) {
        if self.persistence_degraded {
            debug!("skipping save, persistence already degraded");
            return;
        }
        if let Err(e) = self.store.save(&self.progress) {
            warn!(
                "could not save progress via {} store, continuing in memory: {e}",
                self.store.name()
            );
            self.persistence_degraded = true;
        }
    }
}

/// Translate a key press into an action.
fn map_key(code: KeyCode) -> Option<UiAction> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(UiAction::Quit),
        KeyCode::Char('?') => Some(UiAction::ToggleHelp),
        KeyCode::Char(' ') | KeyCode::Enter => Some(UiAction::Study(StudyEvent::Flip)),
        KeyCode::Char('n') | KeyCode::Right => Some(UiAction::Study(StudyEvent::Next)),
        KeyCode::Char('p') | KeyCode::Left => Some(UiAction::Study(StudyEvent::Previous)),
        KeyCode::Char('m') => Some(UiAction::Study(StudyEvent::MarkStudied)),
        KeyCode::Char('s') => Some(UiAction::Study(StudyEvent::Shuffle)),
        KeyCode::Char('u') => Some(UiAction::Study(StudyEvent::ToggleStudyMode)),
        KeyCode::Char('R') => Some(UiAction::Study(StudyEvent::ResetProgress)),
        KeyCode::Char('0') => Some(UiAction::Study(StudyEvent::ChangeFilter(Filter::All))),
        KeyCode::Char('1') => Some(UiAction::Study(StudyEvent::ChangeFilter(Filter::Difficulty(
            Difficulty::Basic,
        )))),
        KeyCode::Char('2') => Some(UiAction::Study(StudyEvent::ChangeFilter(Filter::Difficulty(
            Difficulty::Intermediate,
        )))),
        KeyCode::Char('3') => Some(UiAction::Study(StudyEvent::ChangeFilter(Filter::Difficulty(
            Difficulty::Advanced,
        )))),
        _ => None,
    }
}

/// Run the study screen until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawing fails.
/// Progress save failures never surface here; they demote the session to
/// memory-only.
pub fn run(app: &mut StudyApp) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, app);
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut StudyApp,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                // Windows terminals emit both press and release events.
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, CardId};
    use crate::error::Error;
    use crate::progress::MemoryProgressStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn card(id: CardId, difficulty: Difficulty) -> Card {
        Card {
            id,
            question: format!("question {id}"),
            answer: format!("answer {id}"),
            difficulty,
        }
    }

    fn test_deck() -> Deck {
        Deck::from_cards(vec![
            card(1, Difficulty::Basic),
            card(2, Difficulty::Intermediate),
            card(3, Difficulty::Advanced),
        ])
        .unwrap()
    }

    fn press(app: &mut StudyApp, code: KeyCode) {
        app.handle_key(KeyEvent::from(code));
    }

    /// Store double whose saved state outlives the boxed trait object.
    #[derive(Debug, Clone, Default)]
    struct SharedStore {
        saved: Rc<RefCell<StudyProgress>>,
        save_calls: Rc<RefCell<usize>>,
    }

    impl ProgressStore for SharedStore {
        fn name(&self) -> &'static str {
            "shared-test"
        }

        fn load(&self) -> StudyProgress {
            self.saved.borrow().clone()
        }

        fn save(&mut self, progress: &StudyProgress) -> Result<()> {
            *self.save_calls.borrow_mut() += 1;
            *self.saved.borrow_mut() = progress.clone();
            Ok(())
        }
    }

    /// Store double whose saves always fail.
    #[derive(Debug, Clone, Default)]
    struct FailingStore {
        attempts: Rc<RefCell<usize>>,
    }

    impl ProgressStore for FailingStore {
        fn name(&self) -> &'static str {
            "failing-test"
        }

        fn load(&self) -> StudyProgress {
            StudyProgress::new()
        }

        fn save(&mut self, _progress: &StudyProgress) -> Result<()> {
            *self.attempts.borrow_mut() += 1;
            Err(Error::Io(io::Error::other("disk full")))
        }
    }

    #[test]
    fn test_new_app_starts_on_first_card() {
        let app = StudyApp::new(
            test_deck(),
            Box::new(MemoryProgressStore::new()),
            StudyOptions::default(),
        );
        assert_eq!(app.session().current_card_id(), Some(1));
        assert!(!app.session().revealed());
        assert!(!app.persistence_degraded());
    }

    #[test]
    fn test_new_app_loads_saved_progress() {
        let store = SharedStore::default();
        store
            .saved
            .borrow_mut()
            .mark(2, chrono::Utc::now());

        let app = StudyApp::new(test_deck(), Box::new(store), StudyOptions::default());
        assert!(app.progress().is_studied(2));
    }

    #[test]
    fn test_study_mode_option_hides_loaded_progress() {
        let store = SharedStore::default();
        store
            .saved
            .borrow_mut()
            .mark(1, chrono::Utc::now());

        let options = StudyOptions {
            study_mode: true,
            ..StudyOptions::default()
        };
        let app = StudyApp::new(test_deck(), Box::new(store), options);
        assert_eq!(app.session().ordered_ids(), &[2, 3]);
    }

    #[test]
    fn test_seeded_shuffle_is_deterministic() {
        let options = StudyOptions {
            shuffle: true,
            seed: Some(42),
            ..StudyOptions::default()
        };
        let first = StudyApp::new(
            test_deck(),
            Box::new(MemoryProgressStore::new()),
            options,
        );
        let second = StudyApp::new(
            test_deck(),
            Box::new(MemoryProgressStore::new()),
            options,
        );
        assert_eq!(first.session().ordered_ids(), second.session().ordered_ids());

        let mut ids = first.session().ordered_ids().to_vec();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_mark_key_saves_progress() {
        let store = SharedStore::default();
        let saved = Rc::clone(&store.saved);
        let calls = Rc::clone(&store.save_calls);

        let mut app = StudyApp::new(test_deck(), Box::new(store), StudyOptions::default());
        press(&mut app, KeyCode::Char('m'));

        assert!(saved.borrow().is_studied(1));
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_marking_twice_saves_once() {
        let store = SharedStore::default();
        let calls = Rc::clone(&store.save_calls);

        let mut app = StudyApp::new(test_deck(), Box::new(store), StudyOptions::default());
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('m'));

        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_save_failure_degrades_session() {
        let store = FailingStore::default();
        let attempts = Rc::clone(&store.attempts);

        let mut app = StudyApp::new(test_deck(), Box::new(store), StudyOptions::default());
        press(&mut app, KeyCode::Char('m'));

        assert!(app.persistence_degraded());
        assert_eq!(*attempts.borrow(), 1);
        // The mark still took effect in memory.
        assert!(app.progress().is_studied(1));

        // Once degraded, no further save attempts are made.
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(*attempts.borrow(), 1);
        assert!(app.progress().is_studied(2));
    }

    #[test]
    fn test_reset_key_persists_empty_set() {
        let store = SharedStore::default();
        let saved = Rc::clone(&store.saved);
        let calls = Rc::clone(&store.save_calls);

        let mut app = StudyApp::new(test_deck(), Box::new(store), StudyOptions::default());
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('R'));

        assert!(saved.borrow().is_empty());
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = StudyApp::new(
                test_deck(),
                Box::new(MemoryProgressStore::new()),
                StudyOptions::default(),
            );
            press(&mut app, code);
            assert!(app.should_quit);
        }
    }

    #[test]
    fn test_help_opens_and_any_key_closes() {
        let mut app = StudyApp::new(
            test_deck(),
            Box::new(MemoryProgressStore::new()),
            StudyOptions::default(),
        );
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help());

        // The dismissing key is swallowed, not applied.
        press(&mut app, KeyCode::Char('n'));
        assert!(!app.show_help());
        assert_eq!(app.session().current_card_id(), Some(1));
    }

    #[test]
    fn test_filter_keys() {
        let mut app = StudyApp::new(
            test_deck(),
            Box::new(MemoryProgressStore::new()),
            StudyOptions::default(),
        );
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.session().ordered_ids(), &[2]);

        press(&mut app, KeyCode::Char('0'));
        assert_eq!(app.session().ordered_ids(), &[1, 2, 3]);
    }

    #[test]
    fn test_map_key_navigation() {
        assert_eq!(
            map_key(KeyCode::Char('n')),
            Some(UiAction::Study(StudyEvent::Next))
        );
        assert_eq!(
            map_key(KeyCode::Right),
            Some(UiAction::Study(StudyEvent::Next))
        );
        assert_eq!(
            map_key(KeyCode::Char('p')),
            Some(UiAction::Study(StudyEvent::Previous))
        );
        assert_eq!(
            map_key(KeyCode::Left),
            Some(UiAction::Study(StudyEvent::Previous))
        );
    }

    #[test]
    fn test_map_key_flip() {
        assert_eq!(
            map_key(KeyCode::Char(' ')),
            Some(UiAction::Study(StudyEvent::Flip))
        );
        assert_eq!(
            map_key(KeyCode::Enter),
            Some(UiAction::Study(StudyEvent::Flip))
        );
    }

    #[test]
    fn test_map_key_ignores_unbound_keys() {
        assert_eq!(map_key(KeyCode::Char('x')), None);
        assert_eq!(map_key(KeyCode::Tab), None);
        assert_eq!(map_key(KeyCode::Char('4')), None);
    }

    #[test]
    fn test_unbound_key_changes_nothing() {
        let mut app = StudyApp::new(
            test_deck(),
            Box::new(MemoryProgressStore::new()),
            StudyOptions::default(),
        );
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.session().current_card_id(), Some(1));
        assert!(!app.should_quit);
    }
}
