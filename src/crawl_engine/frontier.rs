//! FIFO crawl frontier with admission bookkeeping

use std::collections::{HashSet, VecDeque};

use super::crawl_types::FrontierEntry;

/// Breadth-first frontier of one crawl invocation
///
/// A normalized URL is admitted at most once: never again after it has been
/// queued, and never once it is visited. The visited set only grows.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    /// Every URL ever admitted to `queue`
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    #[must_use]
    pub fn new(start: FrontierEntry) -> Self {
        let mut frontier = Self::default();
        frontier.push(start);
        frontier
    }

    /// Admit `entry` unless its URL was already queued or visited
    pub fn push(&mut self, entry: FrontierEntry) -> bool {
        if self.visited.contains(&entry.url) || !self.queued.insert(entry.url.clone()) {
            return false;
        }
        self.queue.push_back(entry);
        true
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Record a visit; `false` when the URL had been visited before
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    #[must_use]
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Entries waiting to be processed
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_fifo_order() {
        let mut frontier = Frontier::new(FrontierEntry::new("https://a.test", 0));
        assert!(frontier.push(FrontierEntry::new("https://a.test/1", 1)));
        assert!(frontier.push(FrontierEntry::new("https://a.test/2", 1)));

        let order: Vec<_> = std::iter::from_fn(|| frontier.pop()).map(|e| e.url).collect();
        assert_eq!(order, ["https://a.test", "https://a.test/1", "https://a.test/2"]);
        assert!(frontier.is_empty());
    }

    #[test]
    fn never_readmits_queued_or_visited_urls() {
        let mut frontier = Frontier::new(FrontierEntry::new("https://a.test", 0));
        assert!(!frontier.push(FrontierEntry::new("https://a.test", 1)));

        let start = frontier.pop().unwrap();
        assert!(frontier.mark_visited(&start.url));
        assert!(!frontier.mark_visited(&start.url));
        assert!(!frontier.push(FrontierEntry::new("https://a.test", 2)));

        assert!(frontier.push(FrontierEntry::new("https://a.test/x", 1)));
        frontier.pop();
        // popped but not yet visited: still refused
        assert!(!frontier.push(FrontierEntry::new("https://a.test/x", 1)));
        assert_eq!(frontier.visited_count(), 1);
    }
}
