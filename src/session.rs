use itertools::Itertools;
use std::time::{Duration, Instant};

use crate::metrics;

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionStatus {
    /// Fresh text, nothing typed yet
    Idle,
    /// First character typed, clock running
    InProgress,
    /// Typed text reached the length of the target
    Completed,
    /// Focus was lost before completion
    Abandoned,
}

/// Result of reconciling one edit of the input buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Input capture is disabled; nothing changed
    Rejected,
    Accepted,
    /// This edit finished the session; further edits are rejected
    Completed,
}

/// Highlight of a single target character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharState {
    Untyped,
    Correct,
    Incorrect,
}

/// State of one practice run over a single target text.
///
/// A session is replaced wholesale on restart; nothing here is ever reset in
/// place. Positions are character indices into the target.
#[derive(Debug, Clone)]
pub struct Session {
    target: String,
    target_len: usize,
    typed: String,
    error_mask: Vec<bool>,
    error_count: usize,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
    focused: bool,
    word_count: usize,
    status: SessionStatus,
}

impl Session {
    pub fn new(target: String, word_count: usize) -> Self {
        let target_len = target.chars().count();
        Self {
            target,
            target_len,
            typed: String::new(),
            error_mask: vec![false; target_len],
            error_count: 0,
            started_at: None,
            ended_at: None,
            focused: false,
            word_count,
            status: SessionStatus::Idle,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn error_mask(&self) -> &[bool] {
        &self.error_mask
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Instant> {
        self.ended_at
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn has_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Whether an edit would currently be reconciled
    pub fn accepts_input(&self) -> bool {
        self.focused && !self.has_ended()
    }

    /// Cursor position: the number of characters typed so far
    pub fn cursor_pos(&self) -> usize {
        self.typed.chars().count()
    }

    /// Enable input capture. Ended sessions stay frozen; returns whether focus
    /// was gained.
    pub fn activate(&mut self) -> bool {
        if self.has_ended() || self.focused {
            return false;
        }
        self.focused = true;
        true
    }

    /// Disable input capture. A run in progress is abandoned: the end time is
    /// recorded and the start time dropped, so it never reports a speed.
    pub fn deactivate(&mut self, now: Instant) -> SessionStatus {
        self.focused = false;

        if self.status == SessionStatus::InProgress {
            self.started_at = None;
            self.ended_at = Some(now);
            self.status = SessionStatus::Abandoned;
        }

        self.status
    }

    /// Reconcile the full, raw buffer content after an edit.
    ///
    /// Every position that differs from the target and has never been marked
    /// is marked and counted once. Reaching the target length completes the
    /// session.
    pub fn handle_input(&mut self, value: &str, now: Instant) -> InputOutcome {
        if !self.accepts_input() {
            return InputOutcome::Rejected;
        }

        self.typed = value.to_string();

        if self.started_at.is_none() && !self.typed.is_empty() {
            self.started_at = Some(now);
            self.status = SessionStatus::InProgress;
        }

        let fresh_errors = self
            .typed
            .chars()
            .zip(self.target.chars())
            .positions(|(typed, expected)| typed != expected)
            .filter(|&idx| !self.error_mask[idx])
            .collect::<Vec<usize>>();

        for idx in fresh_errors {
            self.error_mask[idx] = true;
            self.error_count += 1;
        }

        if self.cursor_pos() >= self.target_len {
            self.ended_at = Some(now);
            self.focused = false;
            self.status = SessionStatus::Completed;
            return InputOutcome::Completed;
        }

        InputOutcome::Accepted
    }

    /// Per-position highlight for the whole target.
    ///
    /// A position that currently differs from the target but was never marked
    /// stays untyped; with first-error marking that only happens past the end
    /// of the mask.
    pub fn char_states(&self) -> Vec<CharState> {
        let mut typed = self.typed.chars();

        self.target
            .chars()
            .zip(self.error_mask.iter())
            .map(|(expected, &marked)| match typed.next() {
                None => CharState::Untyped,
                Some(c) if c == expected => CharState::Correct,
                Some(_) if marked => CharState::Incorrect,
                Some(_) => CharState::Untyped,
            })
            .collect()
    }

    pub fn elapsed(&self) -> Duration {
        metrics::elapsed(self.started_at, self.ended_at)
    }

    /// Words per minute over the target's words; 0 until the run has both a
    /// start and an end.
    pub fn wpm(&self) -> u32 {
        metrics::words_per_minute(
            crate::word_generator::count_words(&self.target),
            self.started_at,
            self.ended_at,
        )
    }

    pub fn accuracy(&self) -> u32 {
        metrics::accuracy(self.target_len, self.error_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn focused(target: &str) -> Session {
        let mut session = Session::new(target.to_string(), target.split(' ').count());
        assert!(session.activate());
        session
    }

    #[test]
    fn test_session_new() {
        let session = Session::new("hello world".to_string(), 2);

        assert_eq!(session.target(), "hello world");
        assert_eq!(session.typed(), "");
        assert_eq!(session.error_mask(), &[false; 11]);
        assert_eq!(session.error_count(), 0);
        assert_eq!(session.started_at(), None);
        assert_eq!(session.ended_at(), None);
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(!session.is_focused());
        assert!(!session.accepts_input());
    }

    #[test]
    fn test_mask_sized_by_chars_not_bytes() {
        let session = Session::new("héllo".to_string(), 1);
        assert_eq!(session.error_mask().len(), 5);
    }

    #[test]
    fn test_input_rejected_until_activated() {
        let mut session = Session::new("test".to_string(), 1);

        assert_eq!(
            session.handle_input("t", Instant::now()),
            InputOutcome::Rejected
        );
        assert_eq!(session.typed(), "");
        assert_eq!(session.started_at(), None);
    }

    #[test]
    fn test_first_char_starts_clock_once() {
        let mut session = focused("test");
        let t0 = Instant::now();

        session.handle_input("t", t0);
        assert_eq!(session.started_at(), Some(t0));
        assert_eq!(session.status(), SessionStatus::InProgress);

        session.handle_input("te", t0 + Duration::from_secs(1));
        session.handle_input("t", t0 + Duration::from_secs(2));
        session.handle_input("", t0 + Duration::from_secs(3));
        session.handle_input("t", t0 + Duration::from_secs(4));
        assert_eq!(session.started_at(), Some(t0));
    }

    #[test]
    fn test_example_single_substitution() {
        let mut session = focused("the cat sat");

        session.handle_input("the b", Instant::now());

        let mut expected = vec![false; 11];
        expected[4] = true;
        assert_eq!(session.error_mask(), expected.as_slice());
        assert_eq!(session.error_count(), 1);

        session.handle_input("the bat sat", Instant::now());
        assert_eq!(session.error_mask(), expected.as_slice());
        assert_eq!(session.error_count(), 1);
    }

    #[test]
    fn test_error_counted_once_per_position() {
        let mut session = focused("abc");
        let now = Instant::now();

        session.handle_input("x", now);
        session.handle_input("", now);
        session.handle_input("y", now);
        session.handle_input("", now);
        session.handle_input("a", now);

        assert_eq!(session.error_count(), 1);
        assert!(session.error_mask()[0]);
        assert_eq!(session.char_states()[0], CharState::Correct);
    }

    #[test]
    fn test_error_count_matches_mask() {
        let mut session = focused("abcdef");
        let now = Instant::now();

        for value in ["x", "xb", "xbz", "xb", "xbc", "xbcq", "xbcd", "xbcde"] {
            session.handle_input(value, now);
        }

        let marked = session.error_mask().iter().filter(|&&m| m).count();
        assert_eq!(session.error_count(), marked);
        assert_eq!(marked, 3);
    }

    #[test]
    fn test_exact_input_completes_and_freezes() {
        let mut session = focused("hi");
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(1);

        assert_eq!(session.handle_input("h", t0), InputOutcome::Accepted);
        assert_eq!(session.handle_input("hi", t1), InputOutcome::Completed);

        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.ended_at(), Some(t1));
        assert!(!session.accepts_input());

        assert_eq!(
            session.handle_input("hix", t1 + Duration::from_secs(1)),
            InputOutcome::Rejected
        );
        assert_eq!(session.typed(), "hi");
        assert_eq!(session.ended_at(), Some(t1));
    }

    #[test]
    fn test_full_length_with_errors_completes() {
        let mut session = focused("ab");

        assert_matches!(
            session.handle_input("xb", Instant::now()),
            InputOutcome::Completed
        );
        assert_eq!(session.error_count(), 1);
        assert_eq!(session.accuracy(), 50);
    }

    #[test]
    fn test_paste_past_target_only_counts_inside() {
        let mut session = focused("ab");

        assert_eq!(
            session.handle_input("abzzz", Instant::now()),
            InputOutcome::Completed
        );
        assert_eq!(session.typed(), "abzzz");
        assert_eq!(session.error_count(), 0);
    }

    #[test]
    fn test_deactivate_in_progress_abandons() {
        let mut session = focused("test");
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(2);

        session.handle_input("te", t0);
        assert_eq!(session.deactivate(t1), SessionStatus::Abandoned);

        assert_eq!(session.ended_at(), Some(t1));
        assert_eq!(session.started_at(), None);
        assert!(!session.is_focused());
        assert_ne!(session.status(), SessionStatus::Completed);
        assert_eq!(session.wpm(), 0);

        // ended sessions cannot be reactivated
        assert!(!session.activate());
        assert_eq!(session.handle_input("tes", t1), InputOutcome::Rejected);
    }

    #[test]
    fn test_deactivate_idle_only_drops_focus() {
        let mut session = focused("test");

        assert_eq!(session.deactivate(Instant::now()), SessionStatus::Idle);
        assert_eq!(session.ended_at(), None);
        assert_eq!(session.handle_input("t", Instant::now()), InputOutcome::Rejected);

        assert!(session.activate());
        assert_eq!(session.handle_input("t", Instant::now()), InputOutcome::Accepted);
    }

    #[test]
    fn test_deactivate_after_completion_keeps_result() {
        let mut session = focused("ab");
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(6);

        session.handle_input("a", t0);
        session.handle_input("ab", t1);
        session.deactivate(t1 + Duration::from_secs(1));

        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.ended_at(), Some(t1));
        // 1 word in 6 seconds
        assert_eq!(session.wpm(), 10);
    }

    #[test]
    fn test_wpm_zero_while_in_progress() {
        let mut session = focused("the cat");
        session.handle_input("the", Instant::now());

        assert_eq!(session.wpm(), 0);
        assert_eq!(session.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SessionStatus::Idle.to_string(), "idle");
        assert_eq!(SessionStatus::InProgress.to_string(), "inprogress");
        assert_eq!(SessionStatus::Abandoned.to_string(), "abandoned");
    }

    #[test]
    fn test_char_states() {
        let mut session = focused("cat");
        let now = Instant::now();

        assert_eq!(session.char_states(), vec![CharState::Untyped; 3]);

        session.handle_input("cx", now);
        assert_eq!(
            session.char_states(),
            vec![CharState::Correct, CharState::Incorrect, CharState::Untyped]
        );
        assert_eq!(session.cursor_pos(), 2);

        session.handle_input("c", now);
        assert_eq!(
            session.char_states(),
            vec![CharState::Correct, CharState::Untyped, CharState::Untyped]
        );
    }
}
