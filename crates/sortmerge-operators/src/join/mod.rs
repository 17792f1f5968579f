//! Map-side sort-merge join.
//!
//! The left input is pulled row by row through [`LeftInput`]; the right input
//! is a seekable sorted store behind [`RightSource`]. Both must be sorted
//! ascending on the join key. [`MergeJoin::produce_next`] advances the join
//! by one bounded step per loop iteration and returns to the caller whenever
//! it has a row, needs more left input, or the upstream segment ends.

pub mod buffer;
pub mod combine;
pub mod merge;
pub mod right;

use sortmerge_core::prelude::Row;

use crate::traits::OpError;

pub use buffer::LeftBuffer;
pub use combine::RowCombiner;
pub use merge::MergeJoin;
pub use right::RightSource;

/// One pull from the upstream left input.
#[derive(Debug, Clone, PartialEq)]
pub enum LeftPoll {
    Row(Row),
    /// No row is ready yet; ask again later.
    Pending,
    /// The current segment ended but more input may follow.
    EndOfSegment,
    /// No more input will ever arrive.
    EndOfInput,
}

pub trait LeftInput {
    fn next_left(&mut self) -> Result<LeftPoll, OpError>;
}

impl<T: LeftInput + ?Sized> LeftInput for &mut T {
    fn next_left(&mut self) -> Result<LeftPoll, OpError> {
        (**self).next_left()
    }
}

impl<T: LeftInput + ?Sized> LeftInput for Box<T> {
    fn next_left(&mut self) -> Result<LeftPoll, OpError> {
        (**self).next_left()
    }
}

/// Result of one `produce_next` call.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinPoll {
    /// A joined row: every left field followed by every right field.
    Row(Row),
    /// Call again once more left input may be available.
    NeedMore,
    /// Upstream ended a segment; the join keeps its state.
    EndOfSegment,
    /// The join is finished. Every later call returns this again.
    EndOfStream,
}
