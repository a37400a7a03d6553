use crate::view::sequence::{
    AddRemove, ChangeBuilder, Permutation, SequenceChange, SequenceEdit, Update,
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// A derived sequence maintained incrementally from the changes of a source.
///
/// [`on_source_changed`](SequenceProjection::on_source_changed) splits an
/// incoming batch into its sub-edits and hands each one, in source order,
/// to exactly one of the three handlers. Everything the handlers record in
/// the shared [`ChangeBuilder`] leaves as one outgoing change.
pub trait SequenceProjection {
    type SrcItem: Clone + Send + Sync + 'static;
    type Item: Clone + Send + Sync + 'static;

    fn on_permute(&mut self, perm: &Permutation, out: &mut ChangeBuilder<Self::Item>);

    fn on_update(&mut self, update: &Update<Self::SrcItem>, out: &mut ChangeBuilder<Self::Item>);

    fn on_add_remove(
        &mut self,
        edit: &AddRemove<Self::SrcItem>,
        out: &mut ChangeBuilder<Self::Item>,
    );

    /// the complete current content of the projection
    fn snapshot(&self) -> Vec<Self::Item>;

    fn on_source_changed(
        &mut self,
        change: &SequenceChange<Self::SrcItem>,
    ) -> SequenceChange<Self::Item> {
        let mut out = ChangeBuilder::new();

        for edit in change.iter() {
            match edit {
                SequenceEdit::Permutation(perm) => self.on_permute(perm, &mut out),
                SequenceEdit::Update(update) => self.on_update(update, &mut out),
                SequenceEdit::AddRemove(edit) => self.on_add_remove(edit, &mut out),
            }
        }

        let out = out.finish();
        tracing::trace!(
            incoming = change.len(),
            outgoing = out.len(),
            "dispatched source change"
        );
        out
    }

    /// One insertion covering the whole current content, sent when the
    /// projection is attached so that its observers never miss the
    /// initial population.
    fn emit_full_population(&self) -> SequenceChange<Self::Item> {
        let mut out = ChangeBuilder::new();
        out.add_remove(0, Vec::new(), self.snapshot());
        out.finish()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
