//! Live derived sequences
//!
//! Using **r3vi-seq** you can define *Projections*, i.e. transformations on
//! sequence *Views* that are updated *reactively* on changes in the source view.
//! These updates are performed incrementally: every mutation of a source is
//! described by one [`SequenceChange`](view::sequence::SequenceChange), a batch of
//! permutations, in-place updates and add/remove edits, and every projection
//! translates it into the equivalent change of its own content.
//!
//! *Views* are accessor interfaces that also define the update protocol (the diff).
//! *Observers* register on a *ViewPort* and are notified synchronously with the
//! diff whenever the view changes. The returned
//! [`Subscription`](view::Subscription) releases the registration when dropped.
//!
//! Projections can be chained with an interface similar to native rust iterators.
//!
//!# Examples
//!
//! ```
//! use r3vi_seq::{buffer::vec::*, view::sequence::*};
//!
//! let mut words = VecBuffer::<String>::new();
//! let mut lines = VecBuffer::new();
//! lines.push(words.get_port());
//!
//! let lengths = lines.get_port()
//!                    .flatten()
//!                    .map(|w: &String| w.len());
//! let view = lengths.get_view().unwrap();
//!
//! words.push("hello".into());
//! words.push("world!".into());
//!
//! assert_eq!(view.len(), 2);
//! assert_eq!(view.get(&1), Ok(6));
//! ```

pub mod error;
pub mod view;
pub mod buffer;
pub mod projection;
