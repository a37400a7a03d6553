use crate::{error::Result, view::View};

pub mod change;

pub use change::{AddRemove, ChangeBuilder, Permutation, SequenceChange, SequenceEdit, Update};

/// Read access to an ordered sequence whose observers are
/// notified with one [`SequenceChange`] per mutation.
pub trait SequenceView<Item>: View<Msg = SequenceChange<Item>>
where
    Item: Clone + Send + Sync + 'static,
{
    fn len(&self) -> usize;

    /// fails with `IndexOutOfRange` outside of `[0, len)`
    fn get(&self, idx: &usize) -> Result<Item>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub trait SequenceViewExt<Item>: SequenceView<Item>
where
    Item: Clone + Send + Sync + 'static,
{
    fn iter<'a>(&'a self) -> SequenceViewIter<'a, Item, Self> {
        SequenceViewIter {
            _phantom: std::marker::PhantomData,
            view: self,
            cur: 0,
        }
    }
}

impl<Item, V: SequenceView<Item> + ?Sized> SequenceViewExt<Item> for V
where
    Item: Clone + Send + Sync + 'static,
{}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct SequenceViewIter<'a, Item, V>
where
    Item: Clone + Send + Sync + 'static,
    V: SequenceView<Item> + ?Sized,
{
    _phantom: std::marker::PhantomData<Item>,
    view: &'a V,
    cur: usize,
}

impl<'a, Item, V> Iterator for SequenceViewIter<'a, Item, V>
where
    Item: Clone + Send + Sync + 'static,
    V: SequenceView<Item> + ?Sized,
{
    type Item = Item;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.cur;
        self.cur += 1;
        self.view.get(&i).ok()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

use std::sync::RwLock;
use std::{ops::Deref, sync::Arc};

impl<Item: Clone + Send + Sync + 'static, V: SequenceView<Item> + ?Sized> SequenceView<Item> for RwLock<V> {
    fn len(&self) -> usize {
        self.read().unwrap().len()
    }

    fn get(&self, idx: &usize) -> Result<Item> {
        self.read().unwrap().get(idx)
    }
}

impl<Item: Clone + Send + Sync + 'static, V: SequenceView<Item> + ?Sized> SequenceView<Item> for Arc<V> {
    fn len(&self) -> usize {
        self.deref().len()
    }

    fn get(&self, idx: &usize) -> Result<Item> {
        self.deref().get(idx)
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Reads the first `len` items of an optional view.
/// Used by projections holding the view slot of a source port.
pub(crate) fn read_items<Item>(
    view: &RwLock<Option<Arc<dyn SequenceView<Item>>>>,
    len: Option<usize>,
) -> Vec<Item>
where
    Item: Clone + Send + Sync + 'static,
{
    match view.read().unwrap().as_ref() {
        Some(v) => {
            let len = len.unwrap_or_else(|| v.len());
            (0..len).filter_map(|i| v.get(&i).ok()).collect()
        }
        None => Vec::new(),
    }
}

pub(crate) fn view_len<Item>(view: &RwLock<Option<Arc<dyn SequenceView<Item>>>>) -> usize
where
    Item: Clone + Send + Sync + 'static,
{
    view.read().unwrap().as_ref().map_or(0, |v| v.len())
}
