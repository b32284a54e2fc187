// Copyright (c) 2026 The tsp-tour authors.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use tsp_tour_core::prelude::City;

/// Rejection reasons for a raw tour handed to
/// [`TwoLevelTree::try_set_raw_tour`](crate::TwoLevelTree::try_set_raw_tour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawTourError {
    WrongLength { expected: usize, got: usize },
    CityOutOfRange { city: City },
    DuplicateCity { city: City },
}

impl std::fmt::Display for RawTourError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawTourError::WrongLength { expected, got } => {
                write!(f, "raw tour has {} cities, expected {}", got, expected)
            }
            RawTourError::CityOutOfRange { city } => {
                write!(f, "{} is outside the city range of this tree", city)
            }
            RawTourError::DuplicateCity { city } => {
                write!(f, "{} appears more than once in the raw tour", city)
            }
        }
    }
}

impl std::error::Error for RawTourError {}

/// A broken structural invariant reported by
/// [`TwoLevelTree::validate`](crate::TwoLevelTree::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantViolation {
    /// A forward or backward walk did not return to its start after N steps.
    RingNotClosed { steps_taken: usize },
    /// `succ(pred(n)) != n` or `pred(succ(n)) != n`.
    InverseLinksBroken { city: City },
    /// A city was visited twice (or never) during a full traversal.
    NotAPermutation { city: City },
    /// Raw ids inside a segment are not contiguous along raw `next`.
    SegmentIdsNotContiguous { city: City },
    /// A segment endpoint does not carry the extreme id of its segment.
    BadSegmentEndpoint { parent_id: u32 },
    /// A parent's recorded size disagrees with its actual node count.
    BadSegmentSize { parent_id: u32 },
    /// An empty segment.
    EmptySegment { parent_id: u32 },
    /// Parent ring ids are not `0..P-1` in ring order.
    ParentRingIdsNotContiguous { parent_id: u32 },
    /// Parent ring `prev`/`next` are not inverses.
    ParentRingLinksBroken { parent_id: u32 },
    /// The forward end of a segment is not linked to the forward begin of
    /// the next segment on the ring.
    SegmentBoundaryBroken { parent_id: u32 },
    /// Segment sizes do not add up to the city count.
    SizesDoNotCoverTour { total: u32 },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvariantViolation::RingNotClosed { steps_taken } => {
                write!(f, "tour ring did not close after {} steps", steps_taken)
            }
            InvariantViolation::InverseLinksBroken { city } => {
                write!(f, "succ/pred are not inverses at {}", city)
            }
            InvariantViolation::NotAPermutation { city } => {
                write!(f, "{} is not visited exactly once", city)
            }
            InvariantViolation::SegmentIdsNotContiguous { city } => {
                write!(f, "segment ids are not contiguous at {}", city)
            }
            InvariantViolation::BadSegmentEndpoint { parent_id } => {
                write!(f, "segment {} endpoint id is not extremal", parent_id)
            }
            InvariantViolation::BadSegmentSize { parent_id } => {
                write!(f, "segment {} size disagrees with its node count", parent_id)
            }
            InvariantViolation::EmptySegment { parent_id } => {
                write!(f, "segment {} is empty", parent_id)
            }
            InvariantViolation::ParentRingIdsNotContiguous { parent_id } => {
                write!(f, "parent ring ids break contiguity at {}", parent_id)
            }
            InvariantViolation::ParentRingLinksBroken { parent_id } => {
                write!(f, "parent ring links are not inverses at {}", parent_id)
            }
            InvariantViolation::SegmentBoundaryBroken { parent_id } => {
                write!(f, "boundary arc after segment {} is broken", parent_id)
            }
            InvariantViolation::SizesDoNotCoverTour { total } => {
                write!(f, "segment sizes sum to {} instead of the city count", total)
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}
