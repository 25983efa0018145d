use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const DEFAULT_CAPACITY: usize = 10_000;

/// Ids of webhook events already handled in this process, so a re-delivered
/// event is acknowledged without running fulfillment again. Oldest ids are
/// forgotten once `capacity` is reached. Nothing survives a restart.
#[derive(Clone)]
pub struct ProcessedEvents {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    seen: HashSet<String>,
    order: VecDeque<String>,
    capacity: usize,
}

impl Default for ProcessedEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessedEvents {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                seen: HashSet::new(),
                order: VecDeque::new(),
                capacity: capacity.max(1),
            })),
        }
    }

    /// Records `id`. Returns `false` if it was already recorded.
    pub async fn mark(&self, id: &str) -> bool {
        let mut store = self.inner.lock().await;
        if store.seen.contains(id) {
            return false;
        }
        if store.order.len() >= store.capacity {
            if let Some(oldest) = store.order.pop_front() {
                store.seen.remove(&oldest);
            }
        }
        store.seen.insert(id.to_string());
        store.order.push_back(id.to_string());
        true
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.inner.lock().await.seen.contains(id)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.seen.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_mark_of_same_id_is_refused() {
        let events = ProcessedEvents::new();
        assert!(events.mark("evt_1").await);
        assert!(!events.mark("evt_1").await);
        assert!(events.mark("evt_2").await);
        assert_eq!(events.len().await, 2);
    }

    #[tokio::test]
    async fn clones_share_the_same_set() {
        let events = ProcessedEvents::new();
        let other = events.clone();
        assert!(events.mark("evt_1").await);
        assert!(other.contains("evt_1").await);
        assert!(!other.mark("evt_1").await);
    }

    #[tokio::test]
    async fn oldest_ids_are_evicted_at_capacity() {
        let events = ProcessedEvents::with_capacity(2);
        assert!(events.mark("a").await);
        assert!(events.mark("b").await);
        assert!(events.mark("c").await);
        assert_eq!(events.len().await, 2);
        assert!(!events.contains("a").await);
        assert!(events.contains("b").await);
        assert!(events.contains("c").await);
    }
}
