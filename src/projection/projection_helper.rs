use {
    crate::view::{
        sequence::{SequenceChange, SequenceView},
        BroadcastExt, Observer, ObserverBroadcast, OuterViewPort,
    },
    std::sync::RwLock,
    std::{
        any::Any,
        collections::HashMap,
        hash::Hash,
        sync::{Arc, Weak},
    },
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Keeps the source subscriptions of a projection `P` whose output
/// is a sequence of `Item`.
///
/// Each argument is registered under an `ArgKey`. Removing the key
/// (or dropping the helper together with its projection) releases exactly
/// that argument's registration on its source port.
pub struct ProjectionHelper<ArgKey, P, Item>
where
    ArgKey: Clone + Hash + Eq,
    P: Send + Sync + 'static,
    Item: Clone + Send + Sync + 'static,
{
    // boxed `(Subscription, OuterViewPort)` per argument, dropped on removal
    keepalive: HashMap<ArgKey, Box<dyn Any + Send + Sync>>,
    proj: Arc<RwLock<Weak<RwLock<P>>>>,
    cast: Arc<RwLock<ObserverBroadcast<dyn SequenceView<Item>>>>,
}

impl<ArgKey, P, Item> ProjectionHelper<ArgKey, P, Item>
where
    ArgKey: Clone + Hash + Eq,
    P: Send + Sync + 'static,
    Item: Clone + Send + Sync + 'static,
{
    pub fn new(cast: Arc<RwLock<ObserverBroadcast<dyn SequenceView<Item>>>>) -> Self {
        ProjectionHelper {
            keepalive: HashMap::new(),
            proj: Arc::new(RwLock::new(Weak::new())),
            cast,
        }
    }

    pub fn set_proj(&mut self, proj: &Arc<RwLock<P>>) {
        *self.proj.write().unwrap() = Arc::downgrade(proj);
    }

    /// Subscribes to `port`. Every change of the source is handed to `notify`
    /// together with the projection state; the change it returns is
    /// broadcast to the observers of the projection after the state lock
    /// has been released.
    ///
    /// Replaces a previous argument registered under the same key.
    pub fn new_sequence_arg<SrcItem>(
        &mut self,
        arg_key: ArgKey,
        port: OuterViewPort<dyn SequenceView<SrcItem>>,
        notify: impl Fn(&mut P, &SequenceChange<SrcItem>) -> SequenceChange<Item> + Send + Sync + 'static,
    ) -> Arc<RwLock<Option<Arc<dyn SequenceView<SrcItem>>>>>
    where
        SrcItem: Clone + Send + Sync + 'static,
    {
        self.remove_arg(&arg_key);

        let arg = Arc::new(RwLock::new(ProjectionArg {
            notify: Box::new(notify),
            proj: self.proj.clone(),
            cast: self.cast.clone(),
        }));

        let subscription = port.add_observer(arg);
        let view = port.get_view_arc();

        // the source port lives at least as long as its argument
        self.keepalive.insert(arg_key, Box::new((subscription, port)));

        view
    }

    pub fn remove_arg(&mut self, arg_key: &ArgKey) -> bool {
        self.keepalive.remove(arg_key).is_some()
    }

    pub fn has_arg(&self, arg_key: &ArgKey) -> bool {
        self.keepalive.contains_key(arg_key)
    }

    pub fn arg_count(&self) -> usize {
        self.keepalive.len()
    }
}

/// Special Observer which can access the state of the projection on notify
pub struct ProjectionArg<P, SrcItem, Item>
where
    P: Send + Sync + 'static,
    SrcItem: Clone + Send + Sync + 'static,
    Item: Clone + Send + Sync + 'static,
{
    notify: Box<dyn Fn(&mut P, &SequenceChange<SrcItem>) -> SequenceChange<Item> + Send + Sync + 'static>,
    proj: Arc<RwLock<Weak<RwLock<P>>>>,
    cast: Arc<RwLock<ObserverBroadcast<dyn SequenceView<Item>>>>,
}

impl<P, SrcItem, Item> Observer<dyn SequenceView<SrcItem>> for ProjectionArg<P, SrcItem, Item>
where
    P: Send + Sync + 'static,
    SrcItem: Clone + Send + Sync + 'static,
    Item: Clone + Send + Sync + 'static,
{
    fn notify(&mut self, msg: &SequenceChange<SrcItem>) {
        let Some(p) = self.proj.read().unwrap().upgrade() else {
            return;
        };

        let change = (self.notify)(&mut *p.write().unwrap(), msg);

        if !change.is_empty() {
            self.cast.broadcast(&change);
        }
    }
}
