use {
    crate::view::View,
    std::sync::{Arc, RwLock},
};

                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                 Observer
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/
pub trait Observer<V: View + ?Sized>: Send + Sync {
    /// called once when the observer is attached to a port
    /// and whenever the port gets a new view
    fn reset(&mut self, _view: Option<Arc<V>>) {}
    fn notify(&mut self, msg: &V::Msg);
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<V: View + ?Sized, O: Observer<V>> Observer<V> for Arc<RwLock<O>> {
    fn reset(&mut self, view: Option<Arc<V>>) {
        self.write().unwrap().reset(view);
    }

    fn notify(&mut self, msg: &V::Msg) {
        self.write().unwrap().notify(msg);
    }
}

                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                 Broadcast
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/

/// Opaque registration token of one observer in an [`ObserverBroadcast`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

pub struct ObserverBroadcast<V: View + ?Sized> {
    next_id: u64,
    observers: Vec<(ObserverId, Arc<RwLock<dyn Observer<V>>>)>,
}

impl<V: View + ?Sized> ObserverBroadcast<V> {
    pub fn new() -> Self {
        ObserverBroadcast {
            next_id: 0,
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, obs: Arc<RwLock<dyn Observer<V>>>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, obs));
        id
    }

    /// Unregisters exactly the observer registered under `id`.
    /// Returns false if it was already removed.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(obs_id, _)| *obs_id != id);
        self.observers.len() != before
    }

    pub fn contains(&self, id: ObserverId) -> bool {
        self.observers.iter().any(|(obs_id, _)| *obs_id == id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// snapshot of the currently registered observers,
    /// so that no lock on the broadcast is held while they run
    fn observers(&self) -> Vec<Arc<RwLock<dyn Observer<V>>>> {
        self.observers.iter().map(|(_, o)| o.clone()).collect()
    }
}

impl<V: View + ?Sized> Default for ObserverBroadcast<V> {
    fn default() -> Self {
        ObserverBroadcast::new()
    }
}

/// Synchronous delivery to every observer of a shared broadcast.
pub trait BroadcastExt<V: View + ?Sized> {
    fn broadcast(&self, msg: &V::Msg);
    fn broadcast_reset(&self, view: Option<Arc<V>>);
}

impl<V: View + ?Sized> BroadcastExt<V> for RwLock<ObserverBroadcast<V>> {
    fn broadcast(&self, msg: &V::Msg) {
        let observers = self.read().unwrap().observers();
        for o in observers {
            o.write().unwrap().notify(msg);
        }
    }

    fn broadcast_reset(&self, view: Option<Arc<V>>) {
        let observers = self.read().unwrap().observers();
        for o in observers {
            o.write().unwrap().reset(view.clone());
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct NotifyFnObserver<V, F>
where
    V: View + ?Sized,
    F: Fn(&V::Msg) + Send + Sync,
{
    f: F,
    _phantom: std::marker::PhantomData<fn(&V)>,
}

impl<V, F> NotifyFnObserver<V, F>
where
    V: View + ?Sized,
    F: Fn(&V::Msg) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        NotifyFnObserver {
            f,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<V, F> Observer<V> for NotifyFnObserver<V, F>
where
    V: View + ?Sized,
    F: Fn(&V::Msg) + Send + Sync,
{
    fn notify(&mut self, msg: &V::Msg) {
        (self.f)(msg);
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct ResetFnObserver<V, F>
where
    V: View + ?Sized,
    F: Fn(Option<Arc<V>>) + Send + Sync,
{
    f: F,
    _phantom: std::marker::PhantomData<fn(&V)>,
}

impl<V, F> ResetFnObserver<V, F>
where
    V: View + ?Sized,
    F: Fn(Option<Arc<V>>) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        ResetFnObserver {
            f,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<V, F> Observer<V> for ResetFnObserver<V, F>
where
    V: View + ?Sized,
    F: Fn(Option<Arc<V>>) + Send + Sync,
{
    fn notify(&mut self, _msg: &V::Msg) {}
    fn reset(&mut self, view: Option<Arc<V>>) {
        (self.f)(view);
    }
}
