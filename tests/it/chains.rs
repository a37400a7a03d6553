use r3vi_seq::{
    buffer::vec::VecBuffer,
    projection::{bind_content, InnerPort},
};

use crate::helpers::{content, strings, ChangeLog};

#[test]
fn map_filter_flatten_sort() {
    let mut a = strings(&["pear", "fig"]);
    let b = strings(&["apple"]);
    let mut outer: VecBuffer<InnerPort<String>> = VecBuffer::new();

    let lengths = outer
        .get_port()
        .flatten()
        .filter(|w: &String| w.len() > 3)
        .map(|w: &String| w.len())
        .sorted_by(|x, y| y.cmp(x));
    let actual = bind_content(&lengths);

    outer.push(a.get_port());
    outer.push(b.get_port());
    assert_eq!(actual.get(), vec![5, 4]);

    a.push("banana".into());
    a.update_with(1, |w| w.push_str("gs"));
    assert_eq!(content(&lengths), vec![6, 5, 5, 4]);
    assert_eq!(actual.get(), vec![6, 5, 5, 4]);

    outer.remove(0);
    assert_eq!(actual.get(), vec![5]);
    assert_eq!(a.get_port().observer_count(), 0);
}

#[test]
fn flatten_of_flatten() {
    let (a, b, mut c) = (strings(&["a"]), strings(&["b"]), strings(&["c"]));
    let mut left: VecBuffer<InnerPort<String>> = VecBuffer::with_data(vec![a.get_port(), b.get_port()]);
    let right: VecBuffer<InnerPort<String>> = VecBuffer::with_data(vec![c.get_port()]);

    let top = VecBuffer::with_data(vec![left.get_port().flatten(), right.get_port().flatten()]);
    let flat = top.get_port().flatten();
    let actual = bind_content(&flat);
    let log = ChangeLog::attach(&flat);

    c.push("d".into());
    left.remove(0);

    assert_eq!(actual.get(), vec!["b", "c", "d"]);
    assert_eq!(content(&flat), vec!["b", "c", "d"]);
    assert_eq!(log.changes().len(), 2);
}

#[test]
fn unobserved_chain_is_released() {
    let buffer = VecBuffer::with_data(vec![1, 2, 3]);
    {
        let chain = buffer.get_port().map(|x: &i32| x + 1).filter(|x: &i32| x % 2 == 0);
        let _binding = bind_content(&chain);
        assert_eq!(buffer.get_port().observer_count(), 1);
    }
    assert_eq!(buffer.get_port().observer_count(), 0);
}
