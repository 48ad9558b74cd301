//! Discard-confirmation guard owned by each create/edit view.
//!
//! Every way of leaving the view (Cancel button, back, a link) goes through
//! [`NavigationGuard::attempt`], so there is one state machine:
//!
//! ```text
//! Clean/Dirty --attempt--> ConfirmingDiscard --resolve(true)--> navigated
//!      ^                          |
//!      +-------resolve(false)-----+   (also when the navigation could not happen)
//! ```
//!
//! While armed, leaving always asks, edited or not: only a successful submit
//! lets the user go without a prompt. Views disarm after that submit so the
//! redirect to the list is not intercepted.

use tracing::{debug, info};

use super::{Navigator, Route};

/// Where the user is trying to go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leave {
    To(Route),
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Clean,
    Dirty,
    ConfirmingDiscard(Leave),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The navigation happened.
    Proceeded,
    /// A confirmation prompt with this text is open; answer with `resolve`.
    Prompt(String),
    /// The user stays on the view.
    Stayed,
}

#[derive(Debug)]
pub struct NavigationGuard {
    armed: bool,
    message: String,
    dirty: bool,
    pending: Option<Leave>,
}

impl NavigationGuard {
    /// An armed guard over a clean form.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            armed: true,
            message: message.into(),
            dirty: false,
            pending: None,
        }
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn state(&self) -> GuardState {
        match (&self.pending, self.dirty) {
            (Some(leave), _) => GuardState::ConfirmingDiscard(leave.clone()),
            (None, true) => GuardState::Dirty,
            (None, false) => GuardState::Clean,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Follows the form's dirty flag. An open prompt stays open.
    pub fn sync(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn attempt(&mut self, nav: &mut Navigator, leave: Leave) -> GuardOutcome {
        if !self.armed {
            return perform(nav, leave);
        }
        debug!(?leave, dirty = self.dirty, "Navigation intercepted");
        self.pending = Some(leave);
        GuardOutcome::Prompt(self.message.clone())
    }

    /// Answers an open prompt. Without one this is a no-op.
    ///
    /// Confirming discards the edits only if the navigation actually
    /// happens; a `Back` with no history leaves the form as it was.
    pub fn resolve(&mut self, nav: &mut Navigator, confirm: bool) -> GuardOutcome {
        let Some(leave) = self.pending.take() else {
            return GuardOutcome::Stayed;
        };
        if !confirm {
            return GuardOutcome::Stayed;
        }

        let outcome = perform(nav, leave);
        if outcome == GuardOutcome::Proceeded {
            info!(dirty = self.dirty, "Discarding unsaved changes");
            self.dirty = false;
        }
        outcome
    }

    /// Attempt plus an immediate synchronous answer from `confirm`.
    pub fn attempt_with(
        &mut self,
        nav: &mut Navigator,
        leave: Leave,
        confirm: impl FnOnce(&str) -> bool,
    ) -> GuardOutcome {
        match self.attempt(nav, leave) {
            GuardOutcome::Prompt(message) => {
                let answer = confirm(&message);
                self.resolve(nav, answer)
            }
            outcome => outcome,
        }
    }
}

fn perform(nav: &mut Navigator, leave: Leave) -> GuardOutcome {
    match leave {
        Leave::To(route) => {
            nav.navigate(route);
            GuardOutcome::Proceeded
        }
        Leave::Back => {
            if nav.back() {
                GuardOutcome::Proceeded
            } else {
                GuardOutcome::Stayed
            }
        }
    }
}
