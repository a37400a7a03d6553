use std::sync::{Arc, RwLock};

use r3vi_seq::{
    buffer::vec::VecBuffer,
    view::{
        sequence::{SequenceChange, SequenceView, SequenceViewExt},
        OuterViewPort, Subscription,
    },
};

pub fn strings(items: &[&str]) -> VecBuffer<String> {
    VecBuffer::with_data(items.iter().map(|s| s.to_string()).collect())
}

pub fn content<T>(port: &OuterViewPort<dyn SequenceView<T>>) -> Vec<T>
where
    T: Clone + Send + Sync + 'static,
{
    port.get_view().map(|v| v.iter().collect()).unwrap_or_default()
}

/// Every change delivered to `port`, in order.
pub struct ChangeLog<T>
where
    T: Clone + Send + Sync + 'static,
{
    changes: Arc<RwLock<Vec<SequenceChange<T>>>>,
    _subscription: Subscription<dyn SequenceView<T>>,
}

impl<T> ChangeLog<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn attach(port: &OuterViewPort<dyn SequenceView<T>>) -> Self {
        let changes = Arc::new(RwLock::new(Vec::new()));
        let subscription = {
            let changes = changes.clone();
            port.add_notify_fn(move |change: &SequenceChange<T>| {
                changes.write().unwrap().push(change.clone())
            })
        };
        ChangeLog {
            changes,
            _subscription: subscription,
        }
    }

    pub fn changes(&self) -> Vec<SequenceChange<T>> {
        self.changes.read().unwrap().clone()
    }
}

/// a small deterministic generator for edit sequences
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Lcg(seed)
    }

    pub fn below(&mut self, n: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % n.max(1)
    }
}
