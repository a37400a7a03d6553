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
    std::sync::RwLock,
    std::{cmp::Ordering, sync::Arc},
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<T> OuterViewPort<dyn SequenceView<T>>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn sorted_by<C: Fn(&T, &T) -> Ordering + Send + Sync + 'static>(
        &self,
        cmp: C,
    ) -> OuterViewPort<dyn SequenceView<T>> {
        SortedSequence::new(self.clone(), cmp).get_port()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

struct Sorted<T>
where
    T: Clone + Send + Sync + 'static,
{
    src_view: Arc<RwLock<Option<Arc<dyn SequenceView<T>>>>>,
    cmp: Comparator<T>,

    // sorted position -> (source index, value)
    order: Vec<(usize, T)>,

    proj_helper: ProjectionHelper<(), Self, T>,
}

impl<T> Sorted<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// stable sort of the whole source
    fn sort_source(&self) -> Vec<(usize, T)> {
        let mut order: Vec<(usize, T)> = read_items(&self.src_view, None).into_iter().enumerate().collect();
        order.sort_by(|(_, a), (_, b)| (self.cmp)(a, b));
        order
    }

    fn insert_pos(&self, src_idx: usize, x: &T) -> usize {
        self.order
            .partition_point(|(s, y)| self.cmp_entries((*s, y), (src_idx, x)) == Ordering::Less)
    }

    fn position_of(&self, src_idx: usize) -> Option<usize> {
        self.order.iter().position(|(s, _)| *s == src_idx)
    }

    /// ordering by value, ties broken by source index
    fn cmp_entries(&self, (a_src, a): (usize, &T), (b_src, b): (usize, &T)) -> Ordering {
        (self.cmp)(a, b).then_with(|| a_src.cmp(&b_src))
    }

    /// true if the element at `pos`, changed to `x`, is still in order
    fn fits_at(&self, pos: usize, x: &T) -> bool {
        let src_idx = self.order[pos].0;
        let after_prev = pos == 0 || {
            let (s, y) = &self.order[pos - 1];
            self.cmp_entries((*s, y), (src_idx, x)) == Ordering::Less
        };
        let before_next = pos + 1 >= self.order.len() || {
            let (s, y) = &self.order[pos + 1];
            self.cmp_entries((src_idx, x), (*s, y)) == Ordering::Less
        };
        after_prev && before_next
    }

    fn replace_comparator(&mut self, cmp: Comparator<T>) -> SequenceChange<T> {
        self.cmp = cmp;

        let mut order: Vec<usize> = (0..self.order.len()).collect();
        order.sort_by(|&a, &b| {
            let (a_src, x) = &self.order[a];
            let (b_src, y) = &self.order[b];
            self.cmp_entries((*a_src, x), (*b_src, y))
        });

        self.order = order.iter().map(|&k| self.order[k].clone()).collect();
        tracing::debug!(len = self.order.len(), "replaced comparator");

        let mut out = ChangeBuilder::new();
        out.permute(Permutation::from_order(0, &order));
        out.finish()
    }
}

impl<T> View for Sorted<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Msg = SequenceChange<T>;
}

impl<T> SequenceView<T> for Sorted<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn len(&self) -> usize {
        self.order.len()
    }

    fn get(&self, idx: &usize) -> Result<T> {
        self.order
            .get(*idx)
            .map(|(_, x)| x.clone())
            .ok_or(SequenceError::IndexOutOfRange { idx: *idx, len: self.order.len() })
    }
}

impl<T> SequenceProjection for Sorted<T>
where
    T: Clone + Send + Sync + 'static,
{
    type SrcItem = T;
    type Item = T;

    /// reordering the source only reorders runs of equal elements
    fn on_permute(&mut self, perm: &Permutation, out: &mut ChangeBuilder<T>) {
        for (s, _) in self.order.iter_mut() {
            *s = perm.get(*s);
        }

        let mut order: Vec<usize> = (0..self.order.len()).collect();
        order.sort_by(|&a, &b| {
            let (a_src, x) = &self.order[a];
            let (b_src, y) = &self.order[b];
            self.cmp_entries((*a_src, x), (*b_src, y))
        });

        self.order = order.iter().map(|&k| self.order[k].clone()).collect();
        out.permute(Permutation::from_order(0, &order));
    }

    fn on_update(&mut self, update: &Update<T>, out: &mut ChangeBuilder<T>) {
        for (k, x) in update.values.iter().enumerate() {
            let src_idx = update.from + k;
            let Some(pos) = self.position_of(src_idx) else {
                continue;
            };

            if self.fits_at(pos, x) {
                self.order[pos].1 = x.clone();
                out.update(pos, vec![x.clone()]);
            } else {
                let (_, old) = self.order.remove(pos);
                out.add_remove(pos, vec![old], vec![]);

                let new_pos = self.insert_pos(src_idx, x);
                self.order.insert(new_pos, (src_idx, x.clone()));
                out.add_remove(new_pos, vec![], vec![x.clone()]);
            }
        }
    }

    fn on_add_remove(&mut self, edit: &AddRemove<T>, out: &mut ChangeBuilder<T>) {
        for src_idx in edit.removed_range() {
            if let Some(pos) = self.position_of(src_idx) {
                let (_, old) = self.order.remove(pos);
                out.add_remove(pos, vec![old], vec![]);
            }
        }

        let end = edit.removed_range().end;
        for (s, _) in self.order.iter_mut() {
            if *s >= end {
                *s = *s + edit.added_len() - edit.removed_len();
            }
        }

        for (k, x) in edit.added.iter().enumerate() {
            let src_idx = edit.at + k;
            let pos = self.insert_pos(src_idx, x);
            self.order.insert(pos, (src_idx, x.clone()));
            out.add_remove(pos, vec![], vec![x.clone()]);
        }
    }

    fn snapshot(&self) -> Vec<T> {
        self.order.iter().map(|(_, x)| x.clone()).collect()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Sequence view holding the elements of its source ordered by a
/// replaceable comparator. Equal elements keep their source order,
/// also when the source is reordered.
pub struct SortedSequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    sorted: Arc<RwLock<Sorted<T>>>,
    port: InnerViewPort<dyn SequenceView<T>>,
}

impl<T> SortedSequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(
        src_port: OuterViewPort<dyn SequenceView<T>>,
        cmp: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        let port: InnerViewPort<dyn SequenceView<T>> = ViewPort::new().into_inner();
        let mut proj_helper = ProjectionHelper::new(port.get_broadcast());

        let sorted = Arc::new(RwLock::new(Sorted {
            src_view: proj_helper.new_sequence_arg((), src_port, |s: &mut Sorted<T>, change| {
                s.on_source_changed(change)
            }),
            cmp: Arc::new(cmp),
            order: Vec::new(),
            proj_helper,
        }));

        sorted.write().unwrap().proj_helper.set_proj(&sorted);
        port.set_view(Some(sorted.clone()));

        let population = {
            let mut sorted = sorted.write().unwrap();
            sorted.order = sorted.sort_source();
            sorted.emit_full_population()
        };
        if !population.is_empty() {
            port.notify(&population);
        }

        SortedSequence { sorted, port }
    }

    pub fn get_port(&self) -> OuterViewPort<dyn SequenceView<T>> {
        self.port.0.outer()
    }

    pub fn len(&self) -> usize {
        self.sorted.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Result<T> {
        self.sorted.read().unwrap().get(&idx)
    }

    /// Stable re-sort of the current content, reported as one permutation.
    pub fn set_comparator(&self, cmp: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) {
        let change = self.sorted.write().unwrap().replace_comparator(Arc::new(cmp));
        if !change.is_empty() {
            self.port.notify(&change);
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
