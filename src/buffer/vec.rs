use {
    crate::{
        error::{Result, SequenceError},
        view::{
            sequence::{ChangeBuilder, Permutation, SequenceChange, SequenceView},
            InnerViewPort, OuterViewPort, View, ViewPort,
        },
    },
    std::sync::RwLock,
    std::{
        cmp::Ordering,
        ops::{Deref, DerefMut, Range},
        sync::Arc,
    },
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Read-only view on the data of a [`VecBuffer`]
pub struct VecBufferView<T>(Arc<RwLock<Vec<T>>>);

impl<T> View for VecBufferView<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Msg = SequenceChange<T>;
}

impl<T> SequenceView<T> for VecBufferView<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn len(&self) -> usize {
        self.0.read().unwrap().len()
    }

    fn get(&self, idx: &usize) -> Result<T> {
        let data = self.0.read().unwrap();
        data.get(*idx)
            .cloned()
            .ok_or(SequenceError::IndexOutOfRange { idx: *idx, len: data.len() })
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Observable `Vec`.
///
/// Every mutating call notifies the observers of [`VecBuffer::get_port`]
/// with exactly one [`SequenceChange`] before it returns.
/// Indices passed to mutating calls must be valid, as for `Vec`.
#[derive(Clone)]
pub struct VecBuffer<T>
where
    T: Clone + Send + Sync + 'static,
{
    data: Arc<RwLock<Vec<T>>>,
    port: InnerViewPort<dyn SequenceView<T>>,
}

impl<T> VecBuffer<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn with_data(data: Vec<T>) -> Self {
        let data = Arc::new(RwLock::new(data));
        let port: InnerViewPort<dyn SequenceView<T>> = ViewPort::new().into_inner();
        port.set_view(Some(Arc::new(VecBufferView(data.clone()))));

        VecBuffer { data, port }
    }

    pub fn new() -> Self {
        VecBuffer::with_data(vec![])
    }

    pub fn get_port(&self) -> OuterViewPort<dyn SequenceView<T>> {
        self.port.0.outer()
    }

    /// Groups several mutations into one notification.
    ///
    /// The edits are recorded in the order the operations are performed,
    /// each relative to the state left by the previous one.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut VecTransaction<'_, T>) -> R) -> R {
        let (result, change) = {
            let mut data = self.data.write().unwrap();
            let mut tx = VecTransaction {
                data: &mut data,
                out: ChangeBuilder::new(),
            };
            let result = f(&mut tx);
            (result, tx.out.finish())
        };

        if !change.is_empty() {
            self.port.notify(&change);
        }
        result
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Result<T> {
        let data = self.data.read().unwrap();
        data.get(idx)
            .cloned()
            .ok_or(SequenceError::IndexOutOfRange { idx, len: data.len() })
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.data.read().unwrap().clone()
    }

    pub fn clear(&mut self) {
        self.batch(|tx| tx.clear());
    }

    pub fn push(&mut self, val: T) {
        self.batch(|tx| tx.push(val));
    }

    pub fn remove(&mut self, idx: usize) -> T {
        self.batch(|tx| tx.remove(idx))
    }

    pub fn insert(&mut self, idx: usize, val: T) {
        self.batch(|tx| tx.insert(idx, val));
    }

    /// replaces the element at `idx`, reported as removal + insertion
    pub fn set(&mut self, idx: usize, val: T) -> T {
        self.batch(|tx| tx.set(idx, val))
    }

    pub fn splice(&mut self, range: Range<usize>, vals: impl IntoIterator<Item = T>) -> Vec<T> {
        self.batch(|tx| tx.splice(range, vals))
    }

    /// modifies the element at `idx` in place, reported as update
    pub fn update_with(&mut self, idx: usize, f: impl FnOnce(&mut T)) {
        self.batch(|tx| tx.update_with(idx, f));
    }

    /// stable sort, reported as one permutation
    pub fn sort_by(&mut self, cmp: impl FnMut(&T, &T) -> Ordering) {
        self.batch(|tx| tx.sort_by(cmp));
    }

    pub fn get_mut(&mut self, idx: usize) -> MutableVecAccess<T> {
        MutableVecAccess {
            buf: self.clone(),
            idx,
            val: self.data.read().unwrap()[idx].clone(),
        }
    }
}

impl<T> Default for VecBuffer<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        VecBuffer::new()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Mutation access handed out by [`VecBuffer::batch`].
pub struct VecTransaction<'a, T>
where
    T: Clone + Send + Sync + 'static,
{
    data: &'a mut Vec<T>,
    out: ChangeBuilder<T>,
}

impl<'a, T> VecTransaction<'a, T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.data.get(idx)
    }

    pub fn clear(&mut self) {
        let removed = std::mem::take(self.data);
        self.out.add_remove(0, removed, vec![]);
    }

    pub fn push(&mut self, val: T) {
        let idx = self.data.len();
        self.insert(idx, val);
    }

    pub fn insert(&mut self, idx: usize, val: T) {
        self.data.insert(idx, val.clone());
        self.out.add_remove(idx, vec![], vec![val]);
    }

    pub fn remove(&mut self, idx: usize) -> T {
        let val = self.data.remove(idx);
        self.out.add_remove(idx, vec![val.clone()], vec![]);
        val
    }

    pub fn set(&mut self, idx: usize, val: T) -> T {
        let old = std::mem::replace(&mut self.data[idx], val.clone());
        self.out.add_remove(idx, vec![old.clone()], vec![val]);
        old
    }

    pub fn splice(&mut self, range: Range<usize>, vals: impl IntoIterator<Item = T>) -> Vec<T> {
        let added: Vec<T> = vals.into_iter().collect();
        let removed: Vec<T> = self
            .data
            .splice(range.clone(), added.iter().cloned())
            .collect();
        self.out.add_remove(range.start, removed.clone(), added);
        removed
    }

    pub fn update_with(&mut self, idx: usize, f: impl FnOnce(&mut T)) {
        f(&mut self.data[idx]);
        self.out.update(idx, vec![self.data[idx].clone()]);
    }

    pub fn sort_by(&mut self, mut cmp: impl FnMut(&T, &T) -> Ordering) {
        let mut order: Vec<usize> = (0..self.data.len()).collect();
        order.sort_by(|&a, &b| cmp(&self.data[a], &self.data[b]));

        let sorted: Vec<T> = order.iter().map(|&i| self.data[i].clone()).collect();
        *self.data = sorted;
        self.out.permute(Permutation::from_order(0, &order));
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Copy of one element that is written back as an update when dropped.
pub struct MutableVecAccess<T>
where
    T: Clone + Send + Sync + 'static,
{
    buf: VecBuffer<T>,
    idx: usize,
    val: T,
}

impl<T> Deref for MutableVecAccess<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Target = T;

    fn deref(&self) -> &T {
        &self.val
    }
}

impl<T> DerefMut for MutableVecAccess<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.val
    }
}

impl<T> Drop for MutableVecAccess<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        let val = self.val.clone();
        self.buf.update_with(self.idx, move |x| *x = val);
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
