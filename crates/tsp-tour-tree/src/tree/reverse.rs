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

use crate::tree::index::NodeIndex;
use crate::tree::two_level::TwoLevelTree;
use tsp_tour_core::prelude::Direction;

impl TwoLevelTree {
    /// Reverses the forward path from `a` to `b` inclusive.
    ///
    /// A path inside one segment is reversed there (lazily when it covers the
    /// whole segment). A path spanning segments is first aligned to segment
    /// boundaries with up to two `split_and_merge` calls, then realized by
    /// flipping the reverse bit of every covered parent and reversing the
    /// order of those parents on the ring. Rebalancing beyond these merges is
    /// deliberately absent; adversarial sequences can unbalance segments.
    ///
    /// No-op when `a == b` or the path is the whole tour.
    pub fn reverse(&mut self, a: NodeIndex, b: NodeIndex) {
        if a == b || self.succ(b) == a {
            return;
        }
        if self.is_path_in_single_segment(a, b) {
            self.reverse_segment(a, b);
            return;
        }
        // Split and merge the smaller half heuristically.
        self.align_reverse_begin(a);
        if self.is_path_in_single_segment(a, b) {
            self.reverse_segment(a, b);
            return;
        }
        self.align_reverse_end(a, b);
        if self.is_path_in_single_segment(a, b) {
            self.reverse_segment(a, b);
            return;
        }
        self.reverse_parent_span(a, b);
    }

    // Makes a the forward begin of its segment unless it already is,
    // merging whichever half of the segment is smaller.
    fn align_reverse_begin(&mut self, a: NodeIndex) {
        let pa = self.node(a).parent();
        if a == self.parent(pa).forward_begin_node() {
            return;
        }
        let forward_end = self.parent(pa).forward_end_node();
        let forward_half =
            (self.node(forward_end).raw_id() - self.node(a).raw_id()).unsigned_abs() + 1;
        if forward_half <= self.parent(pa).size() / 2 {
            self.split_and_merge(a, true, Direction::Forward);
        } else {
            self.split_and_merge(a, false, Direction::Backward);
        }
    }

    // Symmetric alignment for b towards its segment's forward end.
    fn align_reverse_end(&mut self, a: NodeIndex, b: NodeIndex) {
        let pb = self.node(b).parent();
        if b == self.parent(pb).backward_begin_node() {
            return;
        }
        // Special case [....b..] -> [a....]: the reversal wraps almost the
        // whole circle, so b's forward half must leave regardless of size.
        if self.parent(pb).next() == self.node(a).parent() {
            self.split_and_merge(b, true, Direction::Backward);
            return;
        }
        let backward_end = self.parent(pb).backward_end_node();
        let backward_half =
            (self.node(backward_end).raw_id() - self.node(b).raw_id()).unsigned_abs() + 1;
        if backward_half <= self.parent(pb).size() / 2 {
            self.split_and_merge(b, true, Direction::Backward);
        } else {
            self.split_and_merge(b, false, Direction::Forward);
        }
    }

    // The forward path a --> b is now a whole number of complete segments:
    // s1 [a...] [....] [....b] s2. Flip every covered parent's reverse bit,
    // then stitch the covered parents back between s1 and s2 in reversed
    // order, reissuing ring ids and boundary arcs along the way.
    fn reverse_parent_span(&mut self, a: NodeIndex, b: NodeIndex) {
        let pa = self.node(a).parent();
        let pb = self.node(b).parent();
        debug_assert_eq!(self.parent(pa).forward_begin_node(), a);
        debug_assert_eq!(self.parent(pb).forward_end_node(), b);

        let mut span = std::mem::take(&mut self.scratch_parents);
        span.clear();

        let s1 = self.parent(pa).prev();
        let s2 = self.parent(pb).next();
        span.push(s2);
        let mut p = pa;
        while p != s2 {
            self.parents[p.get()].reverse = !self.parents[p.get()].reverse;
            span.push(p);
            p = self.parents[p.get()].next;
        }
        tracing::trace!("reverse: flipping {} complete segments", span.len() - 1);

        let n_parents = self.parents.len() as u32;
        let mut p = s1;
        while let Some(q) = span.pop() {
            self.parents[p.get()].next = q;
            self.parents[q.get()].prev = p;
            self.parents[q.get()].id = (self.parents[p.get()].id + 1) % n_parents;
            let p_last = self.parent(p).forward_end_node();
            let q_first = self.parent(q).forward_begin_node();
            self.connect_arc_forward(p_last, q_first);
            p = q;
        }
        // p is s2 again; the ring ids must have come back around.
        debug_assert_eq!(
            (self.parent(p).id() + 1) % n_parents,
            self.parent(self.parent(p).next()).id()
        );

        self.scratch_parents = span;
    }

    // Single-segment dispatcher: a forward-precedes b under one parent.
    pub(crate) fn reverse_segment(&mut self, a: NodeIndex, b: NodeIndex) {
        let pa = self.node(a).parent();
        debug_assert_eq!(pa, self.node(b).parent());
        let parent = self.parent(pa);
        let is_complete = (a == parent.segment_begin_node() && b == parent.segment_end_node())
            || (b == parent.segment_begin_node() && a == parent.segment_end_node());
        if is_complete {
            self.reverse_complete_segment(a, b);
            return;
        }
        // Ids are contiguous, so the id gap is the path length.
        let path_length = (self.node(a).raw_id() - self.node(b).raw_id()).unsigned_abs() + 1;
        if path_length <= self.nominal_segment_length() * 3 / 4 {
            self.reverse_partial_segment(a, b);
        } else {
            // Shed both ends so [a..b] becomes a complete segment, then flip
            // its bit instead of touching every node.
            self.split_and_merge(a, false, Direction::Backward);
            self.split_and_merge(b, false, Direction::Forward);
            self.reverse_complete_segment(a, b);
        }
    }

    // Lazy reversal of one whole segment: toggle the bit and patch the four
    // raw links bridging to the neighbor segments.
    fn reverse_complete_segment(&mut self, a: NodeIndex, b: NodeIndex) {
        let pi = self.node(a).parent();
        debug_assert_eq!(pi, self.node(b).parent());
        {
            let parent = self.parent(pi);
            debug_assert!(
                (parent.is_reversed()
                    && a == parent.segment_end_node()
                    && b == parent.segment_begin_node())
                    || (!parent.is_reversed()
                        && a == parent.segment_begin_node()
                        && b == parent.segment_end_node())
            );
        }
        // The outside neighbors must come from the parent ring: going
        // through succ/pred breaks when flip has already rewired one side.
        let prev_a = self.parent(self.parent(pi).prev()).forward_end_node();
        let next_b = self.parent(self.parent(pi).next()).forward_begin_node();
        self.parents[pi.get()].reverse = !self.parents[pi.get()].reverse;
        // prev_a -> b and a -> next_b; the endpoint sides of these arcs are
        // resolved against the freshly flipped bit.
        self.connect_arc_forward(prev_a, b);
        self.connect_arc_forward(a, next_b);
    }

    // Physical reversal of a short run inside one segment.
    fn reverse_partial_segment(&mut self, a: NodeIndex, b: NodeIndex) {
        let pi = self.node(a).parent();
        debug_assert_eq!(pi, self.node(b).parent());
        let prev_a = self.pred(a);
        let next_b = self.succ(b);
        let path_length = (self.node(a).raw_id() - self.node(b).raw_id()).abs() + 1;

        // Stash next_b, a, the interior, then b; walking the buffer from the
        // back rebuilds prev_a -> b -> ... -> a -> next_b in forward order.
        let mut buf = std::mem::take(&mut self.scratch_nodes);
        buf.clear();
        buf.push(next_b);
        buf.push(a);
        let mut p = self.succ(a);
        while p != b {
            buf.push(p);
            p = self.succ(p);
        }
        buf.push(b);

        let mut p = prev_a;
        while let Some(q) = buf.pop() {
            self.connect_arc_forward(p, q);
            p = q;
        }
        self.scratch_nodes = buf;

        // At most one of a and b can be a segment endpoint here.
        let parent = &mut self.parents[pi.get()];
        if a == parent.segment_begin {
            parent.segment_begin = b;
        } else if a == parent.segment_end {
            parent.segment_end = b;
        } else if b == parent.segment_begin {
            parent.segment_begin = a;
        } else if b == parent.segment_end {
            parent.segment_end = a;
        }

        // Raw ids run along raw `next`; reseed from the raw neighbor still
        // carrying a valid id (or from the far end when the run became the
        // raw head of the segment) and relabel the reversed span.
        if self.parent(pi).is_reversed() {
            // raw next now runs a -> ... -> b
            let a_id = if a == self.parent(pi).segment_begin_node() {
                self.node(self.node(b).raw_next()).raw_id() - path_length
            } else {
                self.node(self.node(a).raw_prev()).raw_id() + 1
            };
            self.relabel_id(a, b, a_id);
        } else {
            // raw next now runs b -> ... -> a
            let b_id = if b == self.parent(pi).segment_begin_node() {
                self.node(self.node(a).raw_next()).raw_id() - path_length
            } else {
                self.node(self.node(b).raw_prev()).raw_id() + 1
            };
            self.relabel_id(b, a, b_id);
        }
    }
}
