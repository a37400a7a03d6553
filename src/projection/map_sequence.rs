use {
    crate::{
        error::{check_index, Result, SequenceError},
        projection::{projection_helper::ProjectionHelper, sequence_projection::SequenceProjection},
        view::{
            sequence::{
                read_items, view_len, AddRemove, ChangeBuilder, Permutation, SequenceChange,
                SequenceView, Update,
            },
            InnerViewPort, OuterViewPort, View, ViewPort,
        },
    },
    std::sync::RwLock,
    std::{fmt, sync::Arc},
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<S> OuterViewPort<dyn SequenceView<S>>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn map<D, F>(&self, f: F) -> OuterViewPort<dyn SequenceView<D>>
    where
        D: Clone + Send + Sync + 'static,
        F: Fn(&S) -> D + Send + Sync + 'static,
    {
        MapSequence::new(self.clone(), Mapper::new(f)).get_port()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Element transform of a [`MapSequence`].
///
/// While `Absent` the mapped sequence is empty, whatever the source holds.
pub enum Mapper<S, D> {
    Absent,
    Func(Arc<dyn Fn(&S) -> D + Send + Sync>),
}

impl<S, D> Mapper<S, D> {
    pub fn new(f: impl Fn(&S) -> D + Send + Sync + 'static) -> Self {
        Mapper::Func(Arc::new(f))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Mapper::Absent)
    }

    fn apply(&self, items: &[S]) -> Vec<D> {
        match self {
            Mapper::Absent => Vec::new(),
            Mapper::Func(f) => items.iter().map(|x| f(x)).collect(),
        }
    }
}

impl<S, D> Clone for Mapper<S, D> {
    fn clone(&self) -> Self {
        match self {
            Mapper::Absent => Mapper::Absent,
            Mapper::Func(f) => Mapper::Func(f.clone()),
        }
    }
}

impl<S, D> Default for Mapper<S, D> {
    fn default() -> Self {
        Mapper::Absent
    }
}

impl<S, D> fmt::Debug for Mapper<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mapper::Absent => f.write_str("Mapper::Absent"),
            Mapper::Func(_) => f.write_str("Mapper::Func(..)"),
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct MapSequenceItem<S, D>
where
    S: Clone + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    src_view: Arc<RwLock<Option<Arc<dyn SequenceView<S>>>>>,
    mapper: Mapper<S, D>,
    proj_helper: ProjectionHelper<(), Self, D>,
}

impl<S, D> View for MapSequenceItem<S, D>
where
    S: Clone + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    type Msg = SequenceChange<D>;
}

impl<S, D> SequenceView<D> for MapSequenceItem<S, D>
where
    S: Clone + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    fn len(&self) -> usize {
        if self.mapper.is_absent() {
            0
        } else {
            view_len(&self.src_view)
        }
    }

    fn get(&self, idx: &usize) -> Result<D> {
        check_index(*idx, self.len())?;

        match (&self.mapper, self.src_view.read().unwrap().as_ref()) {
            (Mapper::Func(f), Some(src)) => src.get(idx).map(|x| f(&x)),
            _ => Err(SequenceError::IndexOutOfRange { idx: *idx, len: 0 }),
        }
    }
}

impl<S, D> SequenceProjection for MapSequenceItem<S, D>
where
    S: Clone + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    type SrcItem = S;
    type Item = D;

    fn on_permute(&mut self, perm: &Permutation, out: &mut ChangeBuilder<D>) {
        if !self.mapper.is_absent() {
            out.permute(perm.clone());
        }
    }

    fn on_update(&mut self, update: &Update<S>, out: &mut ChangeBuilder<D>) {
        out.update(update.from, self.mapper.apply(&update.values));
    }

    fn on_add_remove(&mut self, edit: &AddRemove<S>, out: &mut ChangeBuilder<D>) {
        out.add_remove(
            edit.at,
            self.mapper.apply(&edit.removed),
            self.mapper.apply(&edit.added),
        );
    }

    fn snapshot(&self) -> Vec<D> {
        self.mapper.apply(&read_items(&self.src_view, None))
    }
}

impl<S, D> MapSequenceItem<S, D>
where
    S: Clone + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    /// Swaps the transform and returns the full replace it causes.
    fn replace_mapper(&mut self, mapper: Mapper<S, D>) -> SequenceChange<D> {
        let src = read_items(&self.src_view, None);

        let removed = self.mapper.apply(&src);
        self.mapper = mapper;
        let added = self.mapper.apply(&src);

        tracing::debug!(
            removed = removed.len(),
            added = added.len(),
            absent = self.mapper.is_absent(),
            "replaced mapper"
        );

        let mut out = ChangeBuilder::new();
        out.add_remove(0, removed, added);
        out.finish()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Sequence view applying a replaceable [`Mapper`] to every element of its source.
pub struct MapSequence<S, D>
where
    S: Clone + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    map: Arc<RwLock<MapSequenceItem<S, D>>>,
    port: InnerViewPort<dyn SequenceView<D>>,
}

impl<S, D> MapSequence<S, D>
where
    S: Clone + Send + Sync + 'static,
    D: Clone + Send + Sync + 'static,
{
    pub fn new(src_port: OuterViewPort<dyn SequenceView<S>>, mapper: Mapper<S, D>) -> Self {
        let port: InnerViewPort<dyn SequenceView<D>> = ViewPort::new().into_inner();
        let mut proj_helper = ProjectionHelper::new(port.get_broadcast());

        let map = Arc::new(RwLock::new(MapSequenceItem {
            src_view: proj_helper.new_sequence_arg(
                (),
                src_port,
                |s: &mut MapSequenceItem<S, D>, change| s.on_source_changed(change),
            ),
            mapper: Mapper::Absent,
            proj_helper,
        }));

        map.write().unwrap().proj_helper.set_proj(&map);

        // observers already on the port start from the empty view
        // and receive the content as one insertion
        port.set_view(Some(map.clone()));
        let population = {
            let mut map = map.write().unwrap();
            map.mapper = mapper;
            map.emit_full_population()
        };
        if !population.is_empty() {
            port.notify(&population);
        }

        MapSequence { map, port }
    }

    pub fn get_port(&self) -> OuterViewPort<dyn SequenceView<D>> {
        self.port.0.outer()
    }

    pub fn len(&self) -> usize {
        self.map.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Result<D> {
        self.map.read().unwrap().get(&idx)
    }

    pub fn has_mapper(&self) -> bool {
        !self.map.read().unwrap().mapper.is_absent()
    }

    /// Replaces the transform. Observers see one add/remove that
    /// removes the previous content and inserts the newly mapped one.
    pub fn set_mapper(&self, mapper: Mapper<S, D>) {
        let change = self.map.write().unwrap().replace_mapper(mapper);
        if !change.is_empty() {
            self.port.notify(&change);
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
