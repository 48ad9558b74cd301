use tracing::debug;

use super::Route;

/// Transient payload handed from a write-completing view to the list it
/// redirects to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavState {
    pub message: Option<String>,
}

/// In-app history. Navigation state is delivered once: the destination takes
/// it with [`Navigator::take_message`] and later reads see nothing.
#[derive(Debug)]
pub struct Navigator {
    current: Route,
    state: Option<NavState>,
    history: Vec<Route>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            current: start,
            state: None,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    pub fn navigate(&mut self, to: Route) {
        self.go(to, None);
    }

    pub fn navigate_with_message(&mut self, to: Route, message: impl Into<String>) {
        self.go(
            to,
            Some(NavState {
                message: Some(message.into()),
            }),
        );
    }

    /// Returns false when there is nowhere to go back to.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                debug!(from = %self.current, to = %previous, "Navigating back");
                self.current = previous;
                self.state = None;
                true
            }
            None => false,
        }
    }

    pub fn take_message(&mut self) -> Option<String> {
        self.state.take().and_then(|state| state.message)
    }

    fn go(&mut self, to: Route, state: Option<NavState>) {
        debug!(from = %self.current, to = %to, "Navigating");
        let previous = std::mem::replace(&mut self.current, to);
        self.history.push(previous);
        self.state = state;
    }
}
