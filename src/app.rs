use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::layout::{Position, Rect};

use crate::{
    input::InputBuffer,
    language::Language,
    runtime::TrainerEvent,
    session::{InputOutcome, Session, SessionStatus},
    ui::AppLayout,
    word_generator::{WordGenConfig, WordGenerator},
};

/// Word counts offered in the header, selectable with keys 1-3
pub const WORD_COUNT_PRESETS: [usize; 3] = [10, 25, 50];

pub const DEFAULT_FADE_IN_MS: u64 = 1000;

/// Settings resolved from the config file and the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub number_of_words: usize,
    pub prompt: Option<String>,
    pub fade_in: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            number_of_words: WORD_COUNT_PRESETS[0],
            prompt: None,
            fade_in: Duration::from_millis(DEFAULT_FADE_IN_MS),
        }
    }
}

/// An edit of the practice buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Char(char),
    Paste(String),
    Backspace,
    DeleteWord,
}

/// Discrete controller inputs; every session transition goes through one of these
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Edit(Edit),
    Activate,
    Deactivate,
    Restart,
    SetWordCount(usize),
    Quit,
}

/// Owns the current session and everything needed to replace it
#[derive(Debug)]
pub struct App {
    pub session: Session,
    buffer: InputBuffer,
    generator: WordGenerator,
    rng: StdRng,
    fade_in: Duration,
    fade_in_until: Option<Instant>,
    area: Rect,
    should_quit: bool,
}

impl App {
    pub fn new(settings: &AppSettings, language: Language) -> Self {
        Self::with_rng(settings, language, StdRng::from_entropy())
    }

    pub fn with_rng(settings: &AppSettings, language: Language, mut rng: StdRng) -> Self {
        let generator = WordGenerator::new(
            WordGenConfig {
                number_of_words: settings.number_of_words,
                custom_prompt: settings.prompt.clone(),
            },
            language,
        );
        let (prompt, word_count) = generator.generate_prompt(&mut rng);

        Self {
            session: Session::new(prompt, word_count),
            buffer: InputBuffer::new(),
            generator,
            rng,
            fade_in: settings.fade_in,
            fade_in_until: None,
            area: Rect::default(),
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Requested word count, which a custom prompt may not match
    pub fn number_of_words(&self) -> usize {
        self.generator.config().number_of_words
    }

    pub fn is_fading(&self) -> bool {
        self.fade_in_until.is_some()
    }

    /// Terminal area of the last draw, used to hit-test mouse clicks
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    /// Feed one runtime event. Returns true when the screen needs a redraw.
    pub fn handle_event(&mut self, event: TrainerEvent, now: Instant) -> bool {
        let message = match event {
            TrainerEvent::Tick => return self.on_tick(now),
            TrainerEvent::Resize => return true,
            TrainerEvent::Key(key) => self.message_for_key(key),
            TrainerEvent::Mouse(mouse) => self.message_for_mouse(mouse),
            TrainerEvent::Paste(text) => self
                .session
                .accepts_input()
                .then_some(Message::Edit(Edit::Paste(text))),
        };

        match message {
            Some(message) => {
                self.update(message, now);
                true
            }
            None => false,
        }
    }

    pub fn message_for_key(&self, key: KeyEvent) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => return Some(Message::Quit),
            KeyCode::Char('r') if ctrl => return Some(Message::Restart),
            KeyCode::Tab => return Some(Message::Restart),
            KeyCode::Esc => return Some(Message::Deactivate),
            _ => {}
        }

        if self.session.accepts_input() {
            return match key.code {
                KeyCode::Char('w') if ctrl => Some(Message::Edit(Edit::DeleteWord)),
                KeyCode::Backspace
                    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                {
                    Some(Message::Edit(Edit::DeleteWord))
                }
                KeyCode::Backspace => Some(Message::Edit(Edit::Backspace)),
                KeyCode::Char(_) if ctrl => None,
                KeyCode::Char(c) => Some(Message::Edit(Edit::Char(c))),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Enter if self.session.has_ended() => Some(Message::Restart),
            KeyCode::Enter => Some(Message::Activate),
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char(c @ '1'..='3') => {
                let idx = c as usize - '1' as usize;
                Some(Message::SetWordCount(WORD_COUNT_PRESETS[idx]))
            }
            _ => None,
        }
    }

    pub fn message_for_mouse(&self, mouse: MouseEvent) -> Option<Message> {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return None;
        }

        let layout = AppLayout::new(self.area);
        let pos = Position::new(mouse.column, mouse.row);

        if let Some(idx) = layout.preset_rects().iter().position(|r| r.contains(pos)) {
            return Some(Message::SetWordCount(WORD_COUNT_PRESETS[idx]));
        }
        if layout.restart_button().contains(pos) {
            return Some(Message::Restart);
        }
        if layout.practice.contains(pos) {
            // the results overlay covers the practice area once a run ends
            return Some(if self.session.has_ended() {
                Message::Restart
            } else {
                Message::Activate
            });
        }
        if layout.trainer.contains(pos) {
            return None;
        }

        Some(Message::Deactivate)
    }

    pub fn update(&mut self, message: Message, now: Instant) {
        match message {
            Message::Edit(edit) => self.apply_edit(edit, now),
            Message::Activate => {
                if self.session.activate() {
                    log::debug!("input capture enabled");
                }
            }
            Message::Deactivate => {
                let was = self.session.status();
                let status = self.session.deactivate(now);
                log::debug!("input capture disabled, session {status}");
                if was == SessionStatus::InProgress && status == SessionStatus::Abandoned {
                    log::info!(
                        "session abandoned after {} of {} chars, {} errors",
                        self.session.cursor_pos(),
                        self.session.target().chars().count(),
                        self.session.error_count()
                    );
                }
            }
            Message::Restart => self.restart(now),
            Message::SetWordCount(number_of_words) => {
                log::debug!("word count set to {number_of_words}");
                self.generator.set_number_of_words(number_of_words);
                self.restart(now);
            }
            Message::Quit => self.should_quit = true,
        }
    }

    fn apply_edit(&mut self, edit: Edit, now: Instant) {
        if !self.session.accepts_input() {
            return;
        }

        let changed = match edit {
            Edit::Char(c) => self.buffer.push(c),
            Edit::Paste(text) => self.buffer.push_str(&text),
            Edit::Backspace => self.buffer.backspace(),
            Edit::DeleteWord => self.buffer.delete_word(),
        };
        if !changed {
            return;
        }

        if self.session.handle_input(self.buffer.value(), now) == InputOutcome::Completed {
            log::info!(
                "session completed: {} wpm, {} errors, {}% accuracy in {:.2}s",
                self.session.wpm(),
                self.session.error_count(),
                self.session.accuracy(),
                self.session.elapsed().as_secs_f64()
            );
        }
    }

    /// Replace the session with fresh text; input capture starts disabled.
    pub fn restart(&mut self, now: Instant) {
        let (prompt, word_count) = self.generator.generate_prompt(&mut self.rng);
        log::debug!("restart with {word_count} words");

        self.session = Session::new(prompt, word_count);
        self.buffer.clear();
        self.fade_in_until = (!self.fade_in.is_zero()).then(|| now + self.fade_in);
    }

    /// Expire the fade-in flag. Returns true when it changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        match self.fade_in_until {
            Some(until) if now >= until => {
                self.fade_in_until = None;
                true
            }
            _ => false,
        }
    }
}
