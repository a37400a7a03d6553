use {
    crate::{
        error::{check_index, Result, SequenceError},
        projection::{projection_helper::ProjectionHelper, sequence_projection::SequenceProjection},
        view::{
            sequence::{
                read_items, AddRemove, ChangeBuilder, Permutation, SequenceChange, SequenceEdit,
                SequenceView, Update,
            },
            InnerViewPort, OuterViewPort, View, ViewPort,
        },
    },
    std::sync::RwLock,
    std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

pub type InnerPort<T> = OuterViewPort<dyn SequenceView<T>>;

impl<T> OuterViewPort<dyn SequenceView<InnerPort<T>>>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn flatten(&self) -> OuterViewPort<dyn SequenceView<T>> {
        ConcatSequence::new(self.clone()).get_port()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct SlotId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum ArgKey {
    Outer,
    Slot(SlotId),
}

/// One position of the outer sequence.
struct Slot<T>
where
    T: Clone + Send + Sync + 'static,
{
    id: SlotId,
    // read by the slot's notify closure, rewritten when preceding slots shift
    index: Arc<AtomicUsize>,
    // content as of the last change delivered to this slot,
    // always `offsets[i+1] - offsets[i]` long
    items: Vec<T>,
}

/// Concatenation of the inner sequences held by an outer sequence.
///
/// `offsets[s]` is the flat index where slot `s` begins and
/// `offsets[slots.len()]` is the total length.
pub struct Flatten<T>
where
    T: Clone + Send + Sync + 'static,
{
    slots: Vec<Slot<T>>,
    offsets: Vec<usize>,
    next_slot_id: u64,
    proj_helper: ProjectionHelper<ArgKey, Self, T>,
}

impl<T> View for Flatten<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Msg = SequenceChange<T>;
}

impl<T> SequenceView<T> for Flatten<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn len(&self) -> usize {
        self.offsets[self.slots.len()]
    }

    fn get(&self, idx: &usize) -> Result<T> {
        check_index(*idx, self.len())?;

        let slot_idx = self.get_slot_idx(*idx);
        self.slots[slot_idx]
            .items
            .get(*idx - self.offsets[slot_idx])
            .cloned()
            .ok_or(SequenceError::IndexOutOfRange { idx: *idx, len: self.len() })
    }
}

impl<T> Flatten<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(
        top_port: OuterViewPort<dyn SequenceView<InnerPort<T>>>,
        out_port: InnerViewPort<dyn SequenceView<T>>,
    ) -> Arc<RwLock<Self>> {
        let mut proj_helper = ProjectionHelper::new(out_port.get_broadcast());
        let top = proj_helper.new_sequence_arg(
            ArgKey::Outer,
            top_port,
            |s: &mut Flatten<T>, change| s.on_source_changed(change),
        );

        let flat = Arc::new(RwLock::new(Flatten {
            slots: Vec::new(),
            offsets: vec![0],
            next_slot_id: 0,
            proj_helper,
        }));

        flat.write().unwrap().proj_helper.set_proj(&flat);
        out_port.set_view(Some(flat.clone()));

        let population = {
            let mut flat = flat.write().unwrap();
            let inner_ports = read_items(&top, None);
            flat.splice_slots(0, 0, &inner_ports, &mut ChangeBuilder::new());
            flat.emit_full_population()
        };
        if !population.is_empty() {
            out_port.notify(&population);
        }

        flat
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// number of live subscriptions on inner sequences
    pub fn slot_subscription_count(&self) -> usize {
        self.proj_helper.arg_count() - usize::from(self.proj_helper.has_arg(&ArgKey::Outer))
    }

    fn slot_len(&self, slot_idx: usize) -> usize {
        self.offsets[slot_idx + 1] - self.offsets[slot_idx]
    }

    /// given an index in the flattened sequence,
    /// which slot does it belong to?
    fn get_slot_idx(&self, flat_idx: usize) -> usize {
        self.offsets.partition_point(|&o| o <= flat_idx) - 1
    }

    fn attach_slot(&mut self, slot_idx: usize, port: &InnerPort<T>) -> Slot<T> {
        let id = SlotId(self.next_slot_id);
        self.next_slot_id += 1;

        let index = Arc::new(AtomicUsize::new(slot_idx));
        let view = self.proj_helper.new_sequence_arg(ArgKey::Slot(id), port.clone(), {
            let index = index.clone();
            move |s: &mut Flatten<T>, change| {
                let slot_idx = index.load(Ordering::Relaxed);
                if s.slots.get(slot_idx).map(|slot| slot.id) == Some(id) {
                    s.on_slot_changed(slot_idx, change)
                } else {
                    tracing::warn!(slot = ?id, "change from detached slot ignored");
                    SequenceChange::empty()
                }
            }
        });

        let items = read_items(&view, None);

        tracing::debug!(slot = ?id, index = slot_idx, len = items.len(), "attached inner sequence");
        Slot { id, index, items }
    }

    fn detach_slot(&mut self, slot: &Slot<T>) {
        self.proj_helper.remove_arg(&ArgKey::Slot(slot.id));
        tracing::debug!(slot = ?slot.id, "detached inner sequence");
    }

    fn reindex_from(&mut self, start: usize) {
        for (idx, slot) in self.slots.iter().enumerate().skip(start) {
            slot.index.store(idx, Ordering::Relaxed);
        }
    }

    /// Removes `remove_count` slots at `at` and inserts one slot per
    /// port of `added` in their place. Offsets of the slots before `at`
    /// are left untouched.
    fn splice_slots(
        &mut self,
        at: usize,
        remove_count: usize,
        added: &[InnerPort<T>],
        out: &mut ChangeBuilder<T>,
    ) {
        let flat_at = self.offsets[at];
        let tail_lens: Vec<usize> = (at + remove_count..self.slots.len())
            .map(|s| self.slot_len(s))
            .collect();

        let removed_slots: Vec<Slot<T>> = self.slots.drain(at..at + remove_count).collect();

        let mut removed = Vec::new();
        for slot in removed_slots.iter() {
            removed.extend(slot.items.iter().cloned());
            self.detach_slot(slot);
        }
        out.add_remove(flat_at, removed, Vec::new());

        let mut new_slots = Vec::with_capacity(added.len());
        let mut new_lens = Vec::with_capacity(added.len());
        let mut insert_at = flat_at;
        for (k, port) in added.iter().enumerate() {
            let slot = self.attach_slot(at + k, port);
            let len = slot.items.len();

            new_lens.push(len);
            out.add_remove(insert_at, Vec::new(), slot.items.clone());
            insert_at += len;

            new_slots.push(slot);
        }

        self.slots.splice(at..at, new_slots);
        self.reindex_from(at);

        self.offsets.truncate(at + 1);
        let mut cur = flat_at;
        for len in new_lens.into_iter().chain(tail_lens) {
            cur += len;
            self.offsets.push(cur);
        }
    }

    fn on_slot_changed(&mut self, slot_idx: usize, change: &SequenceChange<T>) -> SequenceChange<T> {
        SlotEdits { flat: self, slot_idx }.on_source_changed(change)
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<T> SequenceProjection for Flatten<T>
where
    T: Clone + Send + Sync + 'static,
{
    type SrcItem = InnerPort<T>;
    type Item = T;

    /// slots travel with their subscriptions; the flat elements of every
    /// moved slot keep their local order inside the block
    fn on_permute(&mut self, perm: &Permutation, out: &mut ChangeBuilder<T>) {
        let range = perm.range();
        let base = self.offsets[range.start];

        let old_lens: Vec<usize> = range.clone().map(|s| self.slot_len(s)).collect();
        let mut new_lens = vec![0; perm.len()];
        let mut moved: Vec<Option<Slot<T>>> = (0..perm.len()).map(|_| None).collect();

        for (k, slot) in self.slots.drain(range.clone()).enumerate() {
            let dst = perm.new_indices[k] - perm.from;
            new_lens[dst] = old_lens[k];
            moved[dst] = Some(slot);
        }
        self.slots.splice(range.start..range.start, moved.into_iter().flatten());

        for (j, len) in new_lens.iter().enumerate() {
            self.offsets[range.start + j + 1] = self.offsets[range.start + j] + len;
        }

        let mut flat_indices = Vec::with_capacity(self.offsets[range.end] - base);
        for (k, len) in old_lens.iter().enumerate() {
            let new_start = self.offsets[perm.new_indices[k]];
            flat_indices.extend(new_start..new_start + len);
        }
        out.permute(Permutation::new(base, flat_indices));

        self.reindex_from(range.start);
    }

    /// every replaced slot is a one-slot splice
    fn on_update(&mut self, update: &Update<InnerPort<T>>, out: &mut ChangeBuilder<T>) {
        for (k, port) in update.values.iter().enumerate() {
            self.splice_slots(update.from + k, 1, std::slice::from_ref(port), out);
        }
    }

    fn on_add_remove(&mut self, edit: &AddRemove<InnerPort<T>>, out: &mut ChangeBuilder<T>) {
        self.splice_slots(edit.at, edit.removed_len(), &edit.added, out);
    }

    fn snapshot(&self) -> Vec<T> {
        self.slots
            .iter()
            .flat_map(|slot| slot.items.iter().cloned())
            .collect()
    }
}

/// Edits of the inner sequence at `slot_idx`, shifted into flat positions.
struct SlotEdits<'a, T>
where
    T: Clone + Send + Sync + 'static,
{
    flat: &'a mut Flatten<T>,
    slot_idx: usize,
}

impl<'a, T> SlotEdits<'a, T>
where
    T: Clone + Send + Sync + 'static,
{
    fn offset(&self) -> usize {
        self.flat.offsets[self.slot_idx]
    }

    /// keeps the slot's cached content in step with the edits it reports
    fn apply(&mut self, edit: SequenceEdit<T>) {
        edit.apply_to(&mut self.flat.slots[self.slot_idx].items);
    }
}

impl<'a, T> SequenceProjection for SlotEdits<'a, T>
where
    T: Clone + Send + Sync + 'static,
{
    type SrcItem = T;
    type Item = T;

    fn on_permute(&mut self, perm: &Permutation, out: &mut ChangeBuilder<T>) {
        out.permute(perm.shifted(self.offset()));
        self.apply(SequenceEdit::Permutation(perm.clone()));
    }

    fn on_update(&mut self, update: &Update<T>, out: &mut ChangeBuilder<T>) {
        out.update(update.from + self.offset(), update.values.clone());
        self.apply(SequenceEdit::Update(update.clone()));
    }

    fn on_add_remove(&mut self, edit: &AddRemove<T>, out: &mut ChangeBuilder<T>) {
        out.add_remove(edit.at + self.offset(), edit.removed.clone(), edit.added.clone());
        self.apply(SequenceEdit::AddRemove(edit.clone()));

        for o in self.flat.offsets[self.slot_idx + 1..].iter_mut() {
            *o = *o + edit.added_len() - edit.removed_len();
        }
    }

    fn snapshot(&self) -> Vec<T> {
        self.flat.slots[self.slot_idx].items.clone()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Live concatenation of a sequence of sequences.
pub struct ConcatSequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    flat: Arc<RwLock<Flatten<T>>>,
    port: OuterViewPort<dyn SequenceView<T>>,
}

impl<T> ConcatSequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(top_port: OuterViewPort<dyn SequenceView<InnerPort<T>>>) -> Self {
        let port = ViewPort::new();
        let flat = Flatten::new(top_port, port.inner());
        ConcatSequence {
            flat,
            port: port.into_outer(),
        }
    }

    pub fn get_port(&self) -> OuterViewPort<dyn SequenceView<T>> {
        self.port.clone()
    }

    pub fn len(&self) -> usize {
        self.flat.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Result<T> {
        self.flat.read().unwrap().get(&idx)
    }

    pub fn offsets(&self) -> Vec<usize> {
        self.flat.read().unwrap().offsets().to_vec()
    }

    pub fn slot_count(&self) -> usize {
        self.flat.read().unwrap().slot_count()
    }

    pub fn slot_subscription_count(&self) -> usize {
        self.flat.read().unwrap().slot_subscription_count()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
