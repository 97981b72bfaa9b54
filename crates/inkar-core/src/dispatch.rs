//! UI-thread re-entry queue.
//!
//! List and page state are read and written exclusively by UI-thread
//! code. Background completions (image fetches, remote writes) never
//! touch that state directly; they post a message here and the UI tick
//! drains the queue and applies the results single-threaded.
//!
//! Posting never blocks and delivery is fire-and-forget: a message
//! posted after the queue side has been dropped is silently discarded,
//! which is exactly the cancellation semantic the catalog wants for
//! fetches that outlive their slot.

use tokio::sync::mpsc;

/// Sending half of a [`UiQueue`]. Cheap to clone; safe to move into
/// background tasks.
#[derive(Debug)]
pub struct UiSender<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for UiSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> UiSender<T> {
    /// Posts a message to the UI queue.
    ///
    /// Returns `false` if the queue has been dropped; the message is
    /// discarded in that case.
    pub fn post(&self, message: T) -> bool {
        self.tx.send(message).is_ok()
    }
}

/// Receiving half: owned by the UI loop, drained once per tick.
#[derive(Debug)]
pub struct UiQueue<T> {
    tx: mpsc::UnboundedSender<T>,
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Default for UiQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> UiQueue<T> {
    /// Creates a new empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Returns a sender for background tasks.
    #[must_use]
    pub fn sender(&self) -> UiSender<T> {
        UiSender {
            tx: self.tx.clone(),
        }
    }

    /// Drains every message currently queued, in post order.
    ///
    /// Non-blocking: returns an empty vec when nothing is pending.
    pub fn drain(&mut self) -> Vec<T> {
        let mut messages = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            messages.push(message);
        }
        messages
    }

    /// Waits for the next message.
    ///
    /// Only for tests and event-loop integrations that block on the
    /// queue instead of polling it per frame.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drain_returns_messages_in_post_order() {
        let mut queue = UiQueue::new();
        let sender = queue.sender();

        assert!(sender.post(1));
        assert!(sender.post(2));
        assert!(sender.post(3));

        assert_eq!(queue.drain(), vec![1, 2, 3]);
        assert!(queue.drain().is_empty());
    }

    #[tokio::test]
    async fn post_after_drop_is_discarded() {
        let queue: UiQueue<u32> = UiQueue::new();
        let sender = queue.sender();
        drop(queue);

        // Fire-and-forget: no panic, no error surfaced.
        assert!(!sender.post(42));
    }

    #[tokio::test]
    async fn background_task_posts_back() {
        let mut queue = UiQueue::new();
        let sender = queue.sender();

        let handle = tokio::spawn(async move {
            sender.post("done");
        });
        handle.await.expect("task should finish");

        assert_eq!(queue.drain(), vec!["done"]);
    }

    #[tokio::test]
    async fn recv_waits_for_message() {
        let mut queue = UiQueue::new();
        let sender = queue.sender();

        tokio::spawn(async move {
            sender.post(7u32);
        });

        assert_eq!(queue.recv().await, Some(7));
    }
}
