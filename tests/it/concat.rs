use r3vi_seq::{
    buffer::vec::VecBuffer,
    projection::{bind_content, ConcatSequence, FilterSequence, InnerPort, SortedSequence},
    view::sequence::{AddRemove, SequenceEdit, SequenceView},
};

use crate::helpers::{content, strings, ChangeLog, Lcg};

fn outer_of(inners: &[&VecBuffer<String>]) -> VecBuffer<InnerPort<String>> {
    VecBuffer::with_data(inners.iter().map(|b| b.get_port()).collect())
}

fn inner_len(port: &InnerPort<String>) -> usize {
    port.get_view().map_or(0, |v| v.len())
}

#[test]
fn list_add() {
    let (a, b, c) = (strings(&["11"]), strings(&["21", "22"]), strings(&[]));
    let mut outer = outer_of(&[&a, &b, &c]);
    let concat = ConcatSequence::new(outer.get_port());
    let actual = bind_content(&concat.get_port());

    assert_eq!(content(&concat.get_port()), vec!["11", "21", "22"]);
    assert_eq!(actual.get(), vec!["11", "21", "22"]);

    outer.insert(1, strings(&["01", "02"]).get_port());

    assert_eq!(content(&concat.get_port()), vec!["11", "01", "02", "21", "22"]);
    assert_eq!(actual.get(), vec!["11", "01", "02", "21", "22"]);
}

#[test]
fn list_add_duplicate() {
    let (a, b, c) = (strings(&["11"]), strings(&["21", "22"]), strings(&[]));
    let mut outer = outer_of(&[&a, &b, &c]);
    let concat = ConcatSequence::new(outer.get_port());
    let actual = bind_content(&concat.get_port());

    outer.insert(0, strings(&["21", "22"]).get_port());

    assert_eq!(content(&concat.get_port()), vec!["21", "22", "11", "21", "22"]);
    assert_eq!(actual.get(), vec!["21", "22", "11", "21", "22"]);
}

#[test]
fn list_remove_first_middle_last() {
    for (removed, expected) in [
        (0, vec!["21", "22"]),
        (1, vec!["11"]),
        (2, vec!["11", "21", "22"]),
    ] {
        let (a, b, c) = (strings(&["11"]), strings(&["21", "22"]), strings(&[]));
        let mut outer = outer_of(&[&a, &b, &c]);
        let concat = ConcatSequence::new(outer.get_port());
        let actual = bind_content(&concat.get_port());

        outer.remove(removed);

        assert_eq!(content(&concat.get_port()), expected);
        assert_eq!(actual.get(), expected);
        assert_eq!(concat.slot_subscription_count(), 2);
    }
}

#[test]
fn list_remove_duplicate_list() {
    let (a, b, c) = (strings(&["11"]), strings(&["21", "22"]), strings(&["11"]));
    let mut outer = outer_of(&[&a, &b, &c]);
    let concat = ConcatSequence::new(outer.get_port());
    let actual = bind_content(&concat.get_port());

    assert_eq!(actual.get(), vec!["11", "21", "22", "11"]);

    outer.remove(2);
    assert_eq!(content(&concat.get_port()), vec!["11", "21", "22"]);
    assert_eq!(actual.get(), vec!["11", "21", "22"]);

    outer.remove(0);
    assert_eq!(content(&concat.get_port()), vec!["21", "22"]);
    assert_eq!(actual.get(), vec!["21", "22"]);
}

#[test]
fn list_update_last_list() {
    let (a, b, c) = (strings(&["11"]), strings(&["21", "22"]), strings(&[]));
    let mut outer = outer_of(&[&a, &b, &c]);
    let concat = ConcatSequence::new(outer.get_port());
    let actual = bind_content(&concat.get_port());

    outer.set(2, strings(&["31", "32", "33"]).get_port());

    assert_eq!(content(&concat.get_port()), vec!["11", "21", "22", "31", "32", "33"]);
    assert_eq!(actual.get(), vec!["11", "21", "22", "31", "32", "33"]);
}

#[test]
fn list_update_in_place() {
    let (a, b, c) = (strings(&["11"]), strings(&["21", "22"]), strings(&["31"]));
    let mut outer = outer_of(&[&a, &b, &c]);
    let concat = ConcatSequence::new(outer.get_port());
    let actual = bind_content(&concat.get_port());
    let log = ChangeLog::attach(&concat.get_port());

    let replacement = strings(&["n1", "n2", "n3"]);
    let new_port = replacement.get_port();
    outer.update_with(1, |port| *port = new_port);

    assert_eq!(content(&concat.get_port()), vec!["11", "n1", "n2", "n3", "31"]);
    assert_eq!(actual.get(), vec!["11", "n1", "n2", "n3", "31"]);
    assert_eq!(concat.offsets(), vec![0, 1, 4, 5]);
    assert_eq!(b.get_port().observer_count(), 0);
    assert_eq!(replacement.get_port().observer_count(), 1);
    assert_eq!(
        log.changes()[0].edits(),
        &[SequenceEdit::AddRemove(AddRemove {
            at: 1,
            removed: vec!["21".into(), "22".into()],
            added: vec!["n1".into(), "n2".into(), "n3".into()],
        })]
    );

    let d = strings(&[]);
    *outer.get_mut(0) = d.get_port();

    assert_eq!(content(&concat.get_port()), vec!["n1", "n2", "n3", "31"]);
    assert_eq!(actual.get(), vec!["n1", "n2", "n3", "31"]);
    assert_eq!(concat.offsets(), vec![0, 0, 3, 4]);
    assert_eq!(a.get_port().observer_count(), 0);
    assert_eq!(concat.slot_subscription_count(), 3);
}

#[test]
fn list_update_via_filtered_list() {
    let (a, b, c) = (strings(&["11"]), strings(&["21", "22"]), strings(&["31"]));
    let outer = outer_of(&[&a, &b, &c]);
    let filtered = FilterSequence::new(outer.get_port(), |_| true);
    let concat = ConcatSequence::new(filtered.get_port());
    let actual = bind_content(&concat.get_port());

    assert_eq!(actual.get(), vec!["11", "21", "22", "31"]);

    filtered.set_predicate(|port| inner_len(port) != 1);
    assert_eq!(content(&concat.get_port()), vec!["21", "22"]);
    assert_eq!(actual.get(), vec!["21", "22"]);
    assert_eq!(a.get_port().observer_count(), 0);

    filtered.set_predicate(|_| true);
    assert_eq!(content(&concat.get_port()), vec!["11", "21", "22", "31"]);
    assert_eq!(actual.get(), vec!["11", "21", "22", "31"]);
    assert_eq!(concat.slot_subscription_count(), 3);
}

#[test]
fn list_permutation() {
    let (a, b, c) = (strings(&["11"]), strings(&["21", "22"]), strings(&[]));
    let outer = outer_of(&[&a, &b, &c]);
    let sorted = SortedSequence::new(outer.get_port(), |x, y| inner_len(x).cmp(&inner_len(y)));
    let concat = ConcatSequence::new(sorted.get_port());
    let actual = bind_content(&concat.get_port());
    let log = ChangeLog::attach(&concat.get_port());

    assert_eq!(actual.get(), vec!["11", "21", "22"]);

    sorted.set_comparator(|x, y| inner_len(y).cmp(&inner_len(x)));

    assert_eq!(content(&concat.get_port()), vec!["21", "22", "11"]);
    assert_eq!(actual.get(), vec!["21", "22", "11"]);

    // moved, never removed and reinserted
    let changes = log.changes();
    assert_eq!(changes.len(), 1);
    assert!(matches!(changes[0].edits(), [SequenceEdit::Permutation(_)]));
    assert_eq!(concat.offsets(), vec![0, 2, 3, 3]);
}

#[test]
fn inner_list_add() {
    let (a, mut b, c) = (strings(&["11"]), strings(&["21", "22"]), strings(&["31"]));
    let outer = outer_of(&[&a, &b, &c]);
    let concat = ConcatSequence::new(outer.get_port());
    let actual = bind_content(&concat.get_port());

    b.push("23".into());

    assert_eq!(content(&concat.get_port()), vec!["11", "21", "22", "23", "31"]);
    assert_eq!(actual.get(), vec!["11", "21", "22", "23", "31"]);
}

#[test]
fn inner_list_add_with_equal_inner_lists() {
    let (a, b, c, mut d) = (strings(&["11"]), strings(&["41"]), strings(&["31"]), strings(&[]));
    let outer = outer_of(&[&a, &b, &c, &d]);
    let concat = ConcatSequence::new(outer.get_port());
    let actual = bind_content(&concat.get_port());

    assert_eq!(actual.get(), vec!["11", "41", "31"]);

    // b and d are equal after this
    d.push("41".into());

    assert_eq!(content(&concat.get_port()), vec!["11", "41", "31", "41"]);
    assert_eq!(actual.get(), vec!["11", "41", "31", "41"]);
}

#[test]
fn inner_list_remove() {
    let (a, mut b, c) = (strings(&["11"]), strings(&["21", "22"]), strings(&["31"]));
    let outer = outer_of(&[&a, &b, &c]);
    let concat = ConcatSequence::new(outer.get_port());
    let actual = bind_content(&concat.get_port());

    b.remove(0);

    assert_eq!(content(&concat.get_port()), vec!["11", "22", "31"]);
    assert_eq!(actual.get(), vec!["11", "22", "31"]);
}

#[test]
fn inner_list_remove_with_equal_inner_lists() {
    let (a, b, c, mut d) = (strings(&["11"]), strings(&[]), strings(&["31"]), strings(&["41"]));
    let outer = outer_of(&[&a, &b, &c, &d]);
    let concat = ConcatSequence::new(outer.get_port());
    let actual = bind_content(&concat.get_port());

    assert_eq!(actual.get(), vec!["11", "31", "41"]);

    // b and d are equal after this
    d.clear();

    assert_eq!(content(&concat.get_port()), vec!["11", "31"]);
    assert_eq!(actual.get(), vec!["11", "31"]);
    assert_eq!(concat.offsets(), vec![0, 1, 1, 2, 2]);
}

#[test]
fn inner_list_update() {
    let (a, mut b, c) = (strings(&["11"]), strings(&["21", "22"]), strings(&["31"]));
    let outer = outer_of(&[&a, &b, &c]);
    let concat = ConcatSequence::new(outer.get_port());
    let actual = bind_content(&concat.get_port());

    b.set(0, "20".into());

    assert_eq!(content(&concat.get_port()), vec!["11", "20", "22", "31"]);
    assert_eq!(actual.get(), vec!["11", "20", "22", "31"]);
}

#[test]
fn inner_list_permute() {
    let (a, c) = (strings(&["11"]), strings(&["31"]));
    let b = strings(&["21", "22"]);
    let b_sorted = SortedSequence::new(b.get_port(), |x: &String, y: &String| x.cmp(y));

    let outer = VecBuffer::with_data(vec![a.get_port(), b_sorted.get_port(), c.get_port()]);
    let concat = ConcatSequence::new(outer.get_port());
    let actual = bind_content(&concat.get_port());

    assert_eq!(actual.get(), vec!["11", "21", "22", "31"]);

    b_sorted.set_comparator(|x: &String, y: &String| y.cmp(x));

    assert_eq!(content(&concat.get_port()), vec!["11", "22", "21", "31"]);
    assert_eq!(actual.get(), vec!["11", "22", "21", "31"]);
}

#[test]
fn replaced_inner_list_has_no_effect() {
    let (a, mut b) = (strings(&["11"]), strings(&["21"]));
    let mut outer = outer_of(&[&a, &b]);
    let concat = ConcatSequence::new(outer.get_port());
    let actual = bind_content(&concat.get_port());
    let log = ChangeLog::attach(&concat.get_port());

    outer.set(1, strings(&["x"]).get_port());
    b.push("22".into());
    b.clear();

    assert_eq!(log.changes().len(), 1);
    assert_eq!(actual.get(), vec!["11", "x"]);
    assert_eq!(b.get_port().observer_count(), 0);
}

#[test]
fn random_edits_match_flattened_inners() {
    let mut rng = Lcg::new(7);
    let mut inners: Vec<VecBuffer<String>> = (0..6)
        .map(|i| strings(&vec!["v"; i % 3]))
        .collect();
    let mut outer = VecBuffer::with_data(inners.iter().map(|b| b.get_port()).collect::<Vec<_>>());
    let concat = ConcatSequence::new(outer.get_port());
    let actual = bind_content(&concat.get_port());

    for step in 0..300 {
        match rng.below(7) {
            0 => {
                let i = rng.below(inners.len());
                outer.insert(rng.below(outer.len() + 1), inners[i].get_port());
            }
            1 if !outer.is_empty() => {
                outer.remove(rng.below(outer.len()));
            }
            2 if !outer.is_empty() => {
                let i = rng.below(inners.len());
                outer.set(rng.below(outer.len()), inners[i].get_port());
            }
            3 => {
                let seed = rng.below(1000);
                outer.sort_by(|x, y| (inner_len(x) * seed % 7).cmp(&(inner_len(y) * seed % 7)));
            }
            4 => {
                let i = rng.below(inners.len());
                let at = rng.below(inners[i].len() + 1);
                inners[i].insert(at, format!("{}", step));
            }
            5 => {
                let i = rng.below(inners.len());
                if !inners[i].is_empty() {
                    let at = rng.below(inners[i].len());
                    inners[i].remove(at);
                }
            }
            _ => {
                let i = rng.below(inners.len());
                if !inners[i].is_empty() {
                    let at = rng.below(inners[i].len());
                    inners[i].update_with(at, |s| s.push('*'));
                }
            }
        }

        let expected: Vec<String> = outer.to_vec().iter().flat_map(content).collect();
        assert_eq!(content(&concat.get_port()), expected, "step {}", step);
        assert_eq!(actual.get(), expected, "step {}", step);

        let offsets = concat.offsets();
        assert_eq!(offsets[0], 0);
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(offsets[outer.len()], concat.len());
        assert_eq!(concat.slot_subscription_count(), outer.len());
    }
}
