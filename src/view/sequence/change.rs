//! The change protocol of sequence views.
//!
//! A [`SequenceChange`] is an ordered batch of [`SequenceEdit`]s. Every edit
//! is expressed relative to the state produced by the edits listed before
//! it, so replaying them in order (see [`SequenceChange::apply_to`]) turns
//! the previous content into the new one.

use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Reordering of the contiguous range `from .. from + new_indices.len()`.
///
/// The element at old index `from + k` moves to `new_indices[k]`.
/// `new_indices` is a bijection onto the same range.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Permutation {
    pub from: usize,
    pub new_indices: Vec<usize>,
}

impl Permutation {
    pub fn new(from: usize, new_indices: Vec<usize>) -> Self {
        debug_assert!(
            Self::is_bijection(from, &new_indices),
            "permutation targets must cover {}..{} exactly once",
            from,
            from + new_indices.len()
        );
        Permutation { from, new_indices }
    }

    /// Builds the permutation that rearranges the range starting at `from`
    /// into `order`, where `order[k]` is the relative old position of the
    /// element that ends up at relative position `k`.
    pub fn from_order(from: usize, order: &[usize]) -> Self {
        let mut new_indices = vec![0; order.len()];
        for (new_pos, &old_pos) in order.iter().enumerate() {
            new_indices[old_pos] = from + new_pos;
        }
        Permutation::new(from, new_indices)
    }

    fn is_bijection(from: usize, new_indices: &[usize]) -> bool {
        let mut seen = vec![false; new_indices.len()];
        new_indices.iter().all(|&idx| {
            idx >= from
                && idx - from < seen.len()
                && !std::mem::replace(&mut seen[idx - from], true)
        })
    }

    pub fn len(&self) -> usize {
        self.new_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.new_indices.is_empty()
    }

    pub fn range(&self) -> Range<usize> {
        self.from..self.from + self.len()
    }

    /// new position of the element at `old_idx`;
    /// indices outside of the permuted range stay where they are
    pub fn get(&self, old_idx: usize) -> usize {
        if self.range().contains(&old_idx) {
            self.new_indices[old_idx - self.from]
        } else {
            old_idx
        }
    }

    pub fn is_identity(&self) -> bool {
        self.new_indices
            .iter()
            .enumerate()
            .all(|(k, &idx)| idx == self.from + k)
    }

    /// the same reordering applied `offset` positions further right
    pub fn shifted(&self, offset: usize) -> Self {
        Permutation {
            from: self.from + offset,
            new_indices: self.new_indices.iter().map(|idx| idx + offset).collect(),
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// The values in `from .. from + values.len()` changed in place.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Update<T> {
    pub from: usize,
    pub values: Vec<T>,
}

impl<T> Update<T> {
    pub fn range(&self) -> Range<usize> {
        self.from..self.from + self.values.len()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Structural edit: `removed` is taken out at `at`, then `added` is inserted there.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AddRemove<T> {
    pub at: usize,
    pub removed: Vec<T>,
    pub added: Vec<T>,
}

impl<T> AddRemove<T> {
    pub fn added_len(&self) -> usize {
        self.added.len()
    }

    pub fn removed_len(&self) -> usize {
        self.removed.len()
    }

    pub fn was_added(&self) -> bool {
        !self.added.is_empty()
    }

    pub fn was_removed(&self) -> bool {
        !self.removed.is_empty()
    }

    pub fn was_replaced(&self) -> bool {
        self.was_added() && self.was_removed()
    }

    /// range of the removed elements in the previous state
    pub fn removed_range(&self) -> Range<usize> {
        self.at..self.at + self.removed.len()
    }

    /// range of the added elements in the new state
    pub fn added_range(&self) -> Range<usize> {
        self.at..self.at + self.added.len()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SequenceEdit<T> {
    Permutation(Permutation),
    Update(Update<T>),
    AddRemove(AddRemove<T>),
}

impl<T: Clone> SequenceEdit<T> {
    pub fn apply_to(&self, data: &mut Vec<T>) {
        match self {
            SequenceEdit::Permutation(perm) => {
                let old = data[perm.range()].to_vec();
                for (k, val) in old.into_iter().enumerate() {
                    data[perm.new_indices[k]] = val;
                }
            }
            SequenceEdit::Update(update) => {
                data[update.range()].clone_from_slice(&update.values);
            }
            SequenceEdit::AddRemove(edit) => {
                data.splice(edit.removed_range(), edit.added.iter().cloned());
            }
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// One coalesced notification: all edits caused by a single mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SequenceChange<T> {
    edits: Vec<SequenceEdit<T>>,
}

impl<T> SequenceChange<T> {
    pub fn empty() -> Self {
        SequenceChange { edits: Vec::new() }
    }

    pub fn edits(&self) -> &[SequenceEdit<T>] {
        &self.edits
    }

    pub fn into_edits(self) -> Vec<SequenceEdit<T>> {
        self.edits
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SequenceEdit<T>> {
        self.edits.iter()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

impl<T: Clone> SequenceChange<T> {
    /// Replays all edits in order on `data`, which must hold the
    /// content the change was emitted against.
    pub fn apply_to(&self, data: &mut Vec<T>) {
        for edit in self.edits.iter() {
            edit.apply_to(data);
        }
    }
}

impl<T> Default for SequenceChange<T> {
    fn default() -> Self {
        SequenceChange::empty()
    }
}

impl<T> From<Vec<SequenceEdit<T>>> for SequenceChange<T> {
    fn from(edits: Vec<SequenceEdit<T>>) -> Self {
        SequenceChange { edits }
    }
}

impl<'a, T> IntoIterator for &'a SequenceChange<T> {
    type Item = &'a SequenceEdit<T>;
    type IntoIter = std::slice::Iter<'a, SequenceEdit<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.iter()
    }
}

                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
              Change Builder
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/

/// Output transaction of a mutation or projection step.
///
/// Edits are recorded in order; edits without visible effect are dropped and
/// an add/remove that continues the previous one is merged into it.
/// [`ChangeBuilder::finish`] closes the transaction.
#[derive(Debug)]
pub struct ChangeBuilder<T> {
    edits: Vec<SequenceEdit<T>>,
}

impl<T> ChangeBuilder<T> {
    pub fn new() -> Self {
        ChangeBuilder { edits: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn permute(&mut self, perm: Permutation) {
        if perm.is_empty() || perm.is_identity() {
            return;
        }
        self.edits.push(SequenceEdit::Permutation(perm));
    }

    pub fn update(&mut self, from: usize, values: Vec<T>) {
        if values.is_empty() {
            return;
        }
        if let Some(SequenceEdit::Update(last)) = self.edits.last_mut() {
            if last.from + last.values.len() == from {
                last.values.extend(values);
                return;
            }
        }
        self.edits.push(SequenceEdit::Update(Update { from, values }));
    }

    pub fn add_remove(&mut self, at: usize, removed: Vec<T>, added: Vec<T>) {
        if removed.is_empty() && added.is_empty() {
            return;
        }
        if let Some(SequenceEdit::AddRemove(last)) = self.edits.last_mut() {
            // insertion right behind the previously inserted block
            if removed.is_empty() && at == last.at + last.added.len() {
                last.added.extend(added);
                return;
            }
            // removal continuing at the position of a previous pure removal
            if last.added.is_empty() && at == last.at {
                last.removed.extend(removed);
                last.added = added;
                return;
            }
        }
        self.edits
            .push(SequenceEdit::AddRemove(AddRemove { at, removed, added }));
    }

    pub fn finish(self) -> SequenceChange<T> {
        SequenceChange { edits: self.edits }
    }
}

impl<T> Default for ChangeBuilder<T> {
    fn default() -> Self {
        ChangeBuilder::new()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
