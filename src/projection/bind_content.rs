use {
    crate::view::{
        sequence::{SequenceChange, SequenceView, SequenceViewExt},
        Observer, OuterViewPort, Subscription,
    },
    std::sync::{Arc, RwLock},
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Plain `Vec` mirroring a sequence port.
///
/// The mirror is copied from the view on attach and afterwards only
/// changed by replaying the received [`SequenceChange`]s.
pub struct ContentBinding<T>
where
    T: Clone + Send + Sync + 'static,
{
    data: Arc<RwLock<Vec<T>>>,
    _subscription: Subscription<dyn SequenceView<T>>,
    _port: OuterViewPort<dyn SequenceView<T>>,
}

pub fn bind_content<T>(port: &OuterViewPort<dyn SequenceView<T>>) -> ContentBinding<T>
where
    T: Clone + Send + Sync + 'static,
{
    let data = Arc::new(RwLock::new(Vec::new()));
    let subscription = port.add_observer(Arc::new(RwLock::new(ContentMirror { data: data.clone() })));

    ContentBinding {
        data,
        _subscription: subscription,
        _port: port.clone(),
    }
}

impl<T> ContentBinding<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn get(&self) -> Vec<T> {
        self.data.read().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

struct ContentMirror<T> {
    data: Arc<RwLock<Vec<T>>>,
}

impl<T> Observer<dyn SequenceView<T>> for ContentMirror<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn reset(&mut self, view: Option<Arc<dyn SequenceView<T>>>) {
        *self.data.write().unwrap() = view.map(|v| v.iter().collect()).unwrap_or_default();
    }

    fn notify(&mut self, msg: &SequenceChange<T>) {
        msg.apply_to(&mut self.data.write().unwrap());
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
