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

use crate::tree::index::{NodeIndex, ParentIndex};
use tsp_tour_core::prelude::City;

/// One node per city on the lower level of the tree.
///
/// `id` is a sequence number relative to the raw `next` chain of the owning
/// segment: following `raw_next` inside one segment yields ids increasing by
/// exactly one, regardless of the parent's reverse flag. The id is signed
/// because merges can extend a segment below its current minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentNode {
    pub(crate) city: City,
    pub(crate) id: i32,
    pub(crate) prev: NodeIndex,
    pub(crate) next: NodeIndex,
    pub(crate) parent: ParentIndex,
}

impl SegmentNode {
    /// A self-linked placeholder; `set_raw_tour` wires the real rings.
    pub(crate) fn unlinked(slot: NodeIndex) -> Self {
        Self {
            city: City::new(slot.0),
            id: 0,
            prev: slot,
            next: slot,
            parent: ParentIndex(0),
        }
    }

    #[inline]
    pub fn city(&self) -> City {
        self.city
    }

    /// Sequence number within the owning segment's raw link chain.
    #[inline]
    pub fn raw_id(&self) -> i32 {
        self.id
    }

    /// Raw `prev` link. Its tour direction depends on the owning parent's
    /// reverse flag; use [`TwoLevelTree::pred`](crate::TwoLevelTree::pred)
    /// for the backward-tour neighbor.
    #[inline]
    pub fn raw_prev(&self) -> NodeIndex {
        self.prev
    }

    /// Raw `next` link; see [`raw_prev`](Self::raw_prev).
    #[inline]
    pub fn raw_next(&self) -> NodeIndex {
        self.next
    }

    #[inline]
    pub fn parent(&self) -> ParentIndex {
        self.parent
    }
}

/// One node per segment on the upper level of the tree.
///
/// Parents form their own cyclic doubly-linked ring in forward tour order;
/// ring ids are `0..P-1` cyclically. The lazy `reverse` flag mirrors the
/// segment logically without touching its nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentNode {
    pub(crate) id: u32,
    pub(crate) reverse: bool,
    pub(crate) size: u32,
    pub(crate) segment_begin: NodeIndex,
    pub(crate) segment_end: NodeIndex,
    pub(crate) prev: ParentIndex,
    pub(crate) next: ParentIndex,
}

impl ParentNode {
    pub(crate) fn unlinked(slot: ParentIndex) -> Self {
        Self {
            id: slot.0,
            reverse: false,
            size: 0,
            segment_begin: NodeIndex(0),
            segment_end: NodeIndex(0),
            prev: slot,
            next: slot,
        }
    }

    /// Sequence number on the parent ring.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    /// Number of segment nodes under this parent. Never zero after loading.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Node holding the minimum raw id of the segment.
    #[inline]
    pub fn segment_begin_node(&self) -> NodeIndex {
        self.segment_begin
    }

    /// Node holding the maximum raw id of the segment.
    #[inline]
    pub fn segment_end_node(&self) -> NodeIndex {
        self.segment_end
    }

    #[inline]
    pub fn prev(&self) -> ParentIndex {
        self.prev
    }

    #[inline]
    pub fn next(&self) -> ParentIndex {
        self.next
    }

    /// First node of this segment in a forward traversal.
    #[inline]
    pub fn forward_begin_node(&self) -> NodeIndex {
        if self.reverse {
            self.segment_end
        } else {
            self.segment_begin
        }
    }

    /// Last node of this segment in a forward traversal.
    #[inline]
    pub fn forward_end_node(&self) -> NodeIndex {
        if self.reverse {
            self.segment_begin
        } else {
            self.segment_end
        }
    }

    /// First node of this segment in a backward traversal.
    #[inline]
    pub fn backward_begin_node(&self) -> NodeIndex {
        if self.reverse {
            self.segment_begin
        } else {
            self.segment_end
        }
    }

    /// Last node of this segment in a backward traversal.
    #[inline]
    pub fn backward_end_node(&self) -> NodeIndex {
        if self.reverse {
            self.segment_end
        } else {
            self.segment_begin
        }
    }
}
