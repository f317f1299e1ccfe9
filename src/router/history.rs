use super::location::Location;

/// Session history the router pushes to and reads back from.
///
/// A browser-backed implementation would wrap `pushState` and `popstate`;
/// [`MemoryHistory`] serves the command line and tests.
pub trait HistoryBackend {
    /// Add an entry after the current one, discarding any forward entries.
    fn push(&mut self, location: Location);

    /// Step back one entry. `None` at the oldest entry.
    fn back(&mut self) -> Option<&Location>;

    /// Step forward one entry. `None` at the newest entry.
    fn forward(&mut self) -> Option<&Location>;

    fn current(&self) -> &Location;
}

/// In-process history stack.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Location>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(Location::root())
    }
}

impl HistoryBackend for MemoryHistory {
    fn push(&mut self, location: Location) {
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index = self.entries.len() - 1;
    }

    fn back(&mut self) -> Option<&Location> {
        self.index = self.index.checked_sub(1)?;
        self.entries.get(self.index)
    }

    fn forward(&mut self) -> Option<&Location> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    fn current(&self) -> &Location {
        &self.entries[self.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_and_forward() {
        let mut history = MemoryHistory::default();
        history.push(Location::parse("/about"));
        history.push(Location::parse("/epaper"));

        assert_eq!(history.back().unwrap().path(), "/about");
        assert_eq!(history.back().unwrap().path(), "/");
        assert!(history.back().is_none());
        assert_eq!(history.current().path(), "/");

        assert_eq!(history.forward().unwrap().path(), "/about");
        assert_eq!(history.forward().unwrap().path(), "/epaper");
        assert!(history.forward().is_none());
    }

    #[test]
    fn test_push_discards_forward_entries() {
        let mut history = MemoryHistory::default();
        history.push(Location::parse("/about"));
        history.push(Location::parse("/epaper"));
        history.back();
        history.push(Location::parse("/admin"));

        assert_eq!(history.len(), 3);
        assert!(history.forward().is_none());
        assert_eq!(history.back().unwrap().path(), "/about");
    }
}
