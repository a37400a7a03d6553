
pub mod projection_helper;
pub mod sequence_projection;

pub mod map_sequence;
pub mod flatten_sequence;
pub mod filter_sequence;
pub mod sorted_sequence;
pub mod bind_content;

pub use {
    bind_content::{bind_content, ContentBinding},
    filter_sequence::FilterSequence,
    flatten_sequence::{ConcatSequence, Flatten, InnerPort},
    map_sequence::{MapSequence, MapSequenceItem, Mapper},
    sequence_projection::SequenceProjection,
    sorted_sequence::SortedSequence,
};
