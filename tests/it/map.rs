use r3vi_seq::{
    buffer::vec::VecBuffer,
    projection::{bind_content, MapSequence, Mapper, SortedSequence},
};

use crate::helpers::content;

fn to_string() -> Mapper<i32, String> {
    Mapper::new(|x: &i32| x.to_string())
}

#[test]
fn list_creation() {
    let buffer = VecBuffer::with_data(vec![3, 7, 1, 5]);
    let mapped = MapSequence::new(buffer.get_port(), to_string());
    let actual = bind_content(&mapped.get_port());

    assert_eq!(content(&mapped.get_port()), vec!["3", "7", "1", "5"]);
    assert_eq!(actual.get(), vec!["3", "7", "1", "5"]);
}

#[test]
fn list_add() {
    let mut buffer = VecBuffer::with_data(vec![3, 7, 1, 5]);
    let mapped = MapSequence::new(buffer.get_port(), to_string());
    let actual = bind_content(&mapped.get_port());

    buffer.push(0);

    assert_eq!(content(&mapped.get_port()), vec!["3", "7", "1", "5", "0"]);
    assert_eq!(actual.get(), vec!["3", "7", "1", "5", "0"]);
}

#[test]
fn list_remove() {
    let mut buffer = VecBuffer::with_data(vec![3, 7, 1, 5]);
    let mapped = MapSequence::new(buffer.get_port(), to_string());
    let actual = bind_content(&mapped.get_port());

    buffer.remove(2);

    assert_eq!(content(&mapped.get_port()), vec!["3", "7", "5"]);
    assert_eq!(actual.get(), vec!["3", "7", "5"]);
}

#[test]
fn list_update() {
    let mut buffer = VecBuffer::with_data(vec![3, 7, 1, 5]);
    let mapped = MapSequence::new(buffer.get_port(), to_string());
    let actual = bind_content(&mapped.get_port());

    buffer.set(2, 4);
    assert_eq!(content(&mapped.get_port()), vec!["3", "7", "4", "5"]);
    assert_eq!(actual.get(), vec!["3", "7", "4", "5"]);

    *buffer.get_mut(0) = 9;
    assert_eq!(actual.get(), vec!["9", "7", "4", "5"]);
}

#[test]
fn list_permutation() {
    let buffer = VecBuffer::with_data(vec![3, 7, 1, 5]);
    let sorted = SortedSequence::new(buffer.get_port(), |a: &i32, b: &i32| a.cmp(b));
    let mapped = MapSequence::new(sorted.get_port(), to_string());
    let actual = bind_content(&mapped.get_port());

    assert_eq!(actual.get(), vec!["1", "3", "5", "7"]);

    sorted.set_comparator(|a: &i32, b: &i32| b.to_string().cmp(&a.to_string()));

    assert_eq!(content(&mapped.get_port()), vec!["7", "5", "3", "1"]);
    assert_eq!(actual.get(), vec!["7", "5", "3", "1"]);
}

#[test]
fn mapper_change() {
    let buffer = VecBuffer::with_data(vec![3, 7, 1, 5]);
    let mapped = MapSequence::new(buffer.get_port(), to_string());
    let actual = bind_content(&mapped.get_port());

    mapped.set_mapper(Mapper::new(|x: &i32| format!("{}!", x)));

    assert_eq!(content(&mapped.get_port()), vec!["3!", "7!", "1!", "5!"]);
    assert_eq!(actual.get(), vec!["3!", "7!", "1!", "5!"]);
}

#[test]
fn mapper_change_to_absent() {
    let buffer = VecBuffer::with_data(vec![3, 7, 1, 5]);
    let mapped = MapSequence::new(buffer.get_port(), to_string());
    let actual = bind_content(&mapped.get_port());

    mapped.set_mapper(Mapper::Absent);

    assert!(content(&mapped.get_port()).is_empty());
    assert!(actual.is_empty());
}

#[test]
fn mapper_change_from_absent() {
    let mut buffer = VecBuffer::with_data(vec![3, 7, 1, 5]);
    let mapped = MapSequence::new(buffer.get_port(), Mapper::<i32, String>::Absent);
    let actual = bind_content(&mapped.get_port());

    assert!(actual.is_empty());
    assert!(mapped.get(0).unwrap_err().is_index_out_of_range());

    buffer.push(2);
    mapped.set_mapper(to_string());

    assert_eq!(content(&mapped.get_port()), vec!["3", "7", "1", "5", "2"]);
    assert_eq!(actual.get(), vec!["3", "7", "1", "5", "2"]);
}
