//! Client-side routing: maps a location to the views that render it.
//!
//! The router owns the current [`Location`] and a [`HistoryBackend`].
//! Navigation never reloads anything; it pushes a history entry and updates
//! the current location before returning. Browser back and forward are the
//! only transitions triggered from outside, and they re-read the location
//! from history.

mod history;
mod location;
mod routes;

pub use history::{HistoryBackend, MemoryHistory};
pub use location::Location;
pub use routes::{Route, RouteTable, View};

/// How the viewport should move after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRequest {
    /// Scroll to the top with smooth behavior.
    TopSmooth,
    /// Leave the scroll position to the history backend.
    Restore,
}

/// Outcome of a transition, for the rendering layer to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub location: Location,
    pub views: Vec<View>,
    pub scroll: ScrollRequest,
}

pub struct Router<H> {
    routes: RouteTable,
    history: H,
    current: Location,
}

impl<H: HistoryBackend> Router<H> {
    pub fn new(routes: RouteTable, history: H) -> Self {
        let current = history.current().clone();
        Self {
            routes,
            history,
            current,
        }
    }

    /// Go to `path`, merging `params` over any query already in it.
    pub fn navigate<K, V>(
        &mut self,
        path: &str,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> Navigation
    where
        K: Into<String>,
        V: Into<String>,
    {
        let target = Location::parse(path).with_params(params);
        tracing::debug!(to = %target, "Navigate");
        self.history.push(target.clone());
        self.current = target;
        self.transition(ScrollRequest::TopSmooth)
    }

    /// Browser back. `None` when there is nothing to go back to.
    pub fn back(&mut self) -> Option<Navigation> {
        self.current = self.history.back()?.clone();
        Some(self.transition(ScrollRequest::Restore))
    }

    /// Browser forward. `None` when there is nothing to go forward to.
    pub fn forward(&mut self) -> Option<Navigation> {
        self.current = self.history.forward()?.clone();
        Some(self.transition(ScrollRequest::Restore))
    }

    pub fn location(&self) -> &Location {
        &self.current
    }

    pub fn path(&self) -> &str {
        self.current.path()
    }

    pub fn params(&self) -> &std::collections::BTreeMap<String, String> {
        self.current.params()
    }

    /// Views rendered for the current location.
    pub fn views(&self) -> Vec<View> {
        self.routes.matching(self.current.path())
    }

    fn transition(&self, scroll: ScrollRequest) -> Navigation {
        Navigation {
            location: self.current.clone(),
            views: self.views(),
            scroll,
        }
    }
}

impl Router<MemoryHistory> {
    /// Site routes over an in-memory history starting at `initial`.
    pub fn site(initial: &str) -> Self {
        Self::new(RouteTable::site(), MemoryHistory::new(Location::parse(initial)))
    }
}

/// A navigable link: the same target feeds the rendered `href` and the
/// intercepted click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub to: String,
    pub params: Vec<(String, String)>,
}

impl Link {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn target(&self) -> Location {
        Location::parse(&self.to).with_params(self.params.iter().cloned())
    }

    pub fn href(&self) -> String {
        self.target().href()
    }

    /// Handle a plain click.
    pub fn activate<H: HistoryBackend>(&self, router: &mut Router<H>) -> Navigation {
        router.navigate(&self.to, self.params.iter().cloned())
    }
}
