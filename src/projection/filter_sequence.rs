use {
    crate::{
        error::{Result, SequenceError},
        projection::{projection_helper::ProjectionHelper, sequence_projection::SequenceProjection},
        view::{
            sequence::{
                read_items, AddRemove, ChangeBuilder, Permutation, SequenceChange, SequenceView,
                Update,
            },
            InnerViewPort, OuterViewPort, View, ViewPort,
        },
    },
    std::sync::Arc,
    std::sync::RwLock,
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<T> OuterViewPort<dyn SequenceView<T>>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn filter<P: Fn(&T) -> bool + Send + Sync + 'static>(
        &self,
        pred: P,
    ) -> OuterViewPort<dyn SequenceView<T>> {
        FilterSequence::new(self.clone(), pred).get_port()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

struct Filter<T>
where
    T: Clone + Send + Sync + 'static,
{
    src_view: Arc<RwLock<Option<Arc<dyn SequenceView<T>>>>>,
    pred: Predicate<T>,

    // source index and value of every passing element, by source index
    items: Vec<(usize, T)>,

    proj_helper: ProjectionHelper<(), Self, T>,
}

impl<T> Filter<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// first filtered position whose source index is `src_idx` or greater
    fn lower_bound(&self, src_idx: usize) -> usize {
        self.items.partition_point(|(s, _)| *s < src_idx)
    }

    fn passing(&self, src: Vec<T>) -> Vec<(usize, T)> {
        src.into_iter()
            .enumerate()
            .filter(|(_, x)| (self.pred)(x))
            .collect()
    }

    fn replace_predicate(&mut self, pred: Predicate<T>) -> SequenceChange<T> {
        let removed: Vec<T> = self.items.drain(..).map(|(_, x)| x).collect();

        self.pred = pred;
        self.items = self.passing(read_items(&self.src_view, None));
        let added: Vec<T> = self.items.iter().map(|(_, x)| x.clone()).collect();

        tracing::debug!(removed = removed.len(), added = added.len(), "replaced filter predicate");

        let mut out = ChangeBuilder::new();
        out.add_remove(0, removed, added);
        out.finish()
    }
}

impl<T> View for Filter<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Msg = SequenceChange<T>;
}

impl<T> SequenceView<T> for Filter<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, idx: &usize) -> Result<T> {
        self.items
            .get(*idx)
            .map(|(_, x)| x.clone())
            .ok_or(SequenceError::IndexOutOfRange { idx: *idx, len: self.items.len() })
    }
}

impl<T> SequenceProjection for Filter<T>
where
    T: Clone + Send + Sync + 'static,
{
    type SrcItem = T;
    type Item = T;

    fn on_permute(&mut self, perm: &Permutation, out: &mut ChangeBuilder<T>) {
        let lo = self.lower_bound(perm.from);
        let hi = self.lower_bound(perm.from + perm.len());

        for item in self.items[lo..hi].iter_mut() {
            item.0 = perm.get(item.0);
        }

        let mut order: Vec<usize> = (0..hi - lo).collect();
        order.sort_by_key(|&k| self.items[lo + k].0);

        let reordered: Vec<(usize, T)> = order.iter().map(|&k| self.items[lo + k].clone()).collect();
        self.items.splice(lo..hi, reordered);

        out.permute(Permutation::from_order(lo, &order));
    }

    fn on_update(&mut self, update: &Update<T>, out: &mut ChangeBuilder<T>) {
        for (k, x) in update.values.iter().enumerate() {
            let src_idx = update.from + k;
            let pos = self.lower_bound(src_idx);
            let present = self.items.get(pos).map_or(false, |(s, _)| *s == src_idx);

            match (present, (self.pred)(x)) {
                (true, true) => {
                    self.items[pos].1 = x.clone();
                    out.update(pos, vec![x.clone()]);
                }
                (true, false) => {
                    let (_, old) = self.items.remove(pos);
                    out.add_remove(pos, vec![old], vec![]);
                }
                (false, true) => {
                    self.items.insert(pos, (src_idx, x.clone()));
                    out.add_remove(pos, vec![], vec![x.clone()]);
                }
                (false, false) => {}
            }
        }
    }

    fn on_add_remove(&mut self, edit: &AddRemove<T>, out: &mut ChangeBuilder<T>) {
        let lo = self.lower_bound(edit.at);
        let hi = self.lower_bound(edit.at + edit.removed_len());

        let removed: Vec<T> = self.items.drain(lo..hi).map(|(_, x)| x).collect();

        for item in self.items[lo..].iter_mut() {
            item.0 = item.0 + edit.added_len() - edit.removed_len();
        }

        let added: Vec<(usize, T)> = edit
            .added
            .iter()
            .enumerate()
            .filter(|(_, x)| (self.pred)(*x))
            .map(|(k, x)| (edit.at + k, x.clone()))
            .collect();

        out.add_remove(lo, removed, added.iter().map(|(_, x)| x.clone()).collect());
        self.items.splice(lo..lo, added);
    }

    fn snapshot(&self) -> Vec<T> {
        self.items.iter().map(|(_, x)| x.clone()).collect()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Sequence view keeping the elements of its source that satisfy a
/// replaceable predicate, in source order.
pub struct FilterSequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    filter: Arc<RwLock<Filter<T>>>,
    port: InnerViewPort<dyn SequenceView<T>>,
}

impl<T> FilterSequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(
        src_port: OuterViewPort<dyn SequenceView<T>>,
        pred: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        let port: InnerViewPort<dyn SequenceView<T>> = ViewPort::new().into_inner();
        let mut proj_helper = ProjectionHelper::new(port.get_broadcast());

        let filter = Arc::new(RwLock::new(Filter {
            src_view: proj_helper.new_sequence_arg((), src_port, |s: &mut Filter<T>, change| {
                s.on_source_changed(change)
            }),
            pred: Arc::new(pred),
            items: Vec::new(),
            proj_helper,
        }));

        filter.write().unwrap().proj_helper.set_proj(&filter);
        port.set_view(Some(filter.clone()));

        let population = {
            let mut filter = filter.write().unwrap();
            filter.items = filter.passing(read_items(&filter.src_view, None));
            filter.emit_full_population()
        };
        if !population.is_empty() {
            port.notify(&population);
        }

        FilterSequence { filter, port }
    }

    pub fn get_port(&self) -> OuterViewPort<dyn SequenceView<T>> {
        self.port.0.outer()
    }

    pub fn len(&self) -> usize {
        self.filter.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Result<T> {
        self.filter.read().unwrap().get(&idx)
    }

    /// Re-evaluates the whole source; reported as one full replace.
    pub fn set_predicate(&self, pred: impl Fn(&T) -> bool + Send + Sync + 'static) {
        let change = self.filter.write().unwrap().replace_predicate(Arc::new(pred));
        if !change.is_empty() {
            self.port.notify(&change);
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
