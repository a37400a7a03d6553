use {
    crate::view::{
        BroadcastExt, NotifyFnObserver, Observer, ObserverBroadcast, ObserverId, ResetFnObserver,
        View,
    },
    std::sync::{Arc, RwLock, Weak},
};

                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                 View Port
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/
pub struct ViewPort<V: View + ?Sized> {
    view: Arc<RwLock<Option<Arc<V>>>>,
    cast: Arc<RwLock<ObserverBroadcast<V>>>,
}

impl<V: View + ?Sized> ViewPort<V> {
    pub fn new() -> Self {
        ViewPort {
            view: Arc::new(RwLock::new(None)),
            cast: Arc::new(RwLock::new(ObserverBroadcast::new())),
        }
    }

    pub fn with_view(view: Arc<V>) -> Self {
        let port = ViewPort::new();
        port.set_view(Some(view));
        port
    }

    pub fn set_view(&self, view: Option<Arc<V>>) {
        *self.view.write().unwrap() = view.clone();
        self.cast.broadcast_reset(view);
    }

    pub fn get_cast(&self) -> Arc<RwLock<ObserverBroadcast<V>>> {
        self.cast.clone()
    }

    /// Registers `observer` and hands it the current view.
    /// The registration lives as long as the returned [`Subscription`].
    pub fn add_observer(&self, observer: Arc<RwLock<dyn Observer<V>>>) -> Subscription<V> {
        let id = self.cast.write().unwrap().add_observer(observer.clone());

        let view = self.view.read().unwrap().clone();
        observer.write().unwrap().reset(view);

        Subscription {
            id,
            cast: Arc::downgrade(&self.cast),
        }
    }

    pub fn inner(&self) -> InnerViewPort<V> {
        InnerViewPort(self.clone())
    }

    pub fn outer(&self) -> OuterViewPort<V> {
        OuterViewPort(self.clone())
    }

    pub fn into_inner(self) -> InnerViewPort<V> {
        InnerViewPort(self)
    }

    pub fn into_outer(self) -> OuterViewPort<V> {
        OuterViewPort(self)
    }
}

impl<V: View + ?Sized> Clone for ViewPort<V> {
    fn clone(&self) -> Self {
        ViewPort {
            view: self.view.clone(),
            cast: self.cast.clone(),
        }
    }
}

impl<V: View + ?Sized> Default for ViewPort<V> {
    fn default() -> Self {
        ViewPort::new()
    }
}

                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                Subscription
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/

/// Registration of one observer on a port.
///
/// Dropping the subscription (or calling [`Subscription::unsubscribe`])
/// removes exactly this registration, independent of any other observer
/// that might be equal in value.
#[must_use = "dropping a Subscription unregisters its observer"]
pub struct Subscription<V: View + ?Sized> {
    id: ObserverId,
    cast: Weak<RwLock<ObserverBroadcast<V>>>,
}

impl<V: View + ?Sized> Subscription<V> {
    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// false once the port is gone or the observer was removed
    pub fn is_active(&self) -> bool {
        self.cast
            .upgrade()
            .map(|cast| cast.read().unwrap().contains(self.id))
            .unwrap_or(false)
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl<V: View + ?Sized> Drop for Subscription<V> {
    fn drop(&mut self) {
        if let Some(cast) = self.cast.upgrade() {
            cast.write().unwrap().remove_observer(self.id);
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct InnerViewPort<V: View + ?Sized>(pub ViewPort<V>);
pub struct OuterViewPort<V: View + ?Sized>(pub ViewPort<V>);

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<V: View + ?Sized> InnerViewPort<V> {
    pub fn get_broadcast(&self) -> Arc<RwLock<ObserverBroadcast<V>>> {
        self.0.cast.clone()
    }

    pub fn set_view(&self, view: Option<Arc<V>>) -> Arc<RwLock<ObserverBroadcast<V>>> {
        self.0.set_view(view);
        self.get_broadcast()
    }

    pub fn get_view(&self) -> Option<Arc<V>> {
        self.0.view.read().unwrap().clone()
    }

    /// synchronously delivers `msg` to every observer of this port
    pub fn notify(&self, msg: &V::Msg) {
        self.0.cast.broadcast(msg);
    }
}

impl<V: View + ?Sized> Clone for InnerViewPort<V> {
    fn clone(&self) -> Self {
        InnerViewPort(self.0.clone())
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<V: View + ?Sized + 'static> OuterViewPort<V> {
    pub fn get_view(&self) -> Option<Arc<V>> {
        self.0.view.read().unwrap().clone()
    }

    pub fn get_view_arc(&self) -> Arc<RwLock<Option<Arc<V>>>> {
        self.0.view.clone()
    }

    pub fn add_observer(&self, observer: Arc<RwLock<dyn Observer<V>>>) -> Subscription<V> {
        self.0.add_observer(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.0.cast.read().unwrap().observer_count()
    }

    pub fn add_reset_fn<F: Fn(Option<Arc<V>>) + Send + Sync + 'static>(
        &self,
        reset: F,
    ) -> Subscription<V> {
        self.add_observer(Arc::new(RwLock::new(ResetFnObserver::new(reset))))
    }

    pub fn add_notify_fn<F: Fn(&V::Msg) + Send + Sync + 'static>(
        &self,
        notify: F,
    ) -> Subscription<V> {
        self.add_observer(Arc::new(RwLock::new(NotifyFnObserver::new(notify))))
    }

    /// true if both ports share the same view slot,
    /// i.e. they are handles to the same port
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0.view, &other.0.view)
    }
}

impl<V: View + ?Sized> Clone for OuterViewPort<V> {
    fn clone(&self) -> Self {
        OuterViewPort(self.0.clone())
    }
}

impl<V: View + ?Sized> Default for OuterViewPort<V> {
    fn default() -> Self {
        ViewPort::new().into_outer()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
