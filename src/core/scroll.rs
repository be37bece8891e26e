//! Host-owned scroll offset, shared with listeners through a watch channel.
//!
//! The page owns the [`ScrollFeed`] and pushes offsets whenever it scrolls.
//! Listeners only ever see the latest value; pushes between two reads
//! coalesce.  Dropping a receiver is how a listener unsubscribes.

use tokio::sync::watch;

#[derive(Debug)]
pub struct ScrollFeed {
    tx: watch::Sender<f64>,
}

impl Default for ScrollFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollFeed {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0.0);
        Self { tx }
    }

    /// Publish a new offset.  Negative or NaN offsets are published as 0.
    pub fn push(&self, offset: f64) {
        let offset = if offset > 0.0 { offset } else { 0.0 };
        self.tx.send_if_modified(|current| {
            if *current == offset {
                false
            } else {
                *current = offset;
                true
            }
        });
    }

    pub fn current(&self) -> f64 {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.tx.subscribe()
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_offsets_publish_zero() {
        let feed = ScrollFeed::new();
        feed.push(120.0);
        feed.push(-40.0);
        assert_eq!(feed.current(), 0.0);
        feed.push(f64::NAN);
        assert_eq!(feed.current(), 0.0);
    }

    #[test]
    fn pushes_coalesce_to_latest() {
        let feed = ScrollFeed::new();
        let mut rx = feed.subscribe();
        feed.push(10.0);
        feed.push(20.0);
        feed.push(30.0);
        assert!(rx.has_changed().unwrap_or(false));
        assert_eq!(*rx.borrow_and_update(), 30.0);
        assert!(!rx.has_changed().unwrap_or(true));
    }

    #[test]
    fn identical_push_does_not_notify() {
        let feed = ScrollFeed::new();
        feed.push(5.0);
        let mut rx = feed.subscribe();
        feed.push(5.0);
        assert!(!rx.has_changed().unwrap_or(true));
    }

    #[test]
    fn dropping_receiver_unsubscribes() {
        let feed = ScrollFeed::new();
        let rx = feed.subscribe();
        assert_eq!(feed.listener_count(), 1);
        drop(rx);
        assert_eq!(feed.listener_count(), 0);
    }
}
