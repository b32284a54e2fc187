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
use tsp_tour_core::prelude::{City, Direction};

impl TwoLevelTree {
    /// How many segments the forward path a --> b touches, incomplete ones
    /// included. O(1).
    pub fn count_n_segments(&self, a: NodeIndex, b: NodeIndex) -> u32 {
        let n = self.n_segments() as u32;
        let pa = self.node(a).parent();
        let pb = self.node(b).parent();
        let apid = self.parent(pa).id();
        let bpid = self.parent(pb).id();
        if apid == bpid {
            let reverse = self.parent(pa).is_reversed();
            let (ia, ib) = (self.node(a).raw_id(), self.node(b).raw_id());
            // Either the path stays inside this one segment, or it wraps
            // around the whole tour and touches everything.
            if (!reverse && ia < ib) || (reverse && ia > ib) {
                return 1;
            }
            return n;
        }
        if bpid > apid {
            bpid - apid + 1
        } else {
            bpid + n - apid + 1
        }
    }

    /// Whether the forward path a --> b is approximately shorter than the
    /// forward path c --> d: fewer segments wins, ties broken by how much of
    /// the boundary segments lies outside the candidate path. A path with
    /// fewer segments may hold more nodes when segments are imbalanced; this
    /// trade is accepted for O(1) cost.
    pub fn is_approximately_shorter(
        &self,
        a: NodeIndex,
        b: NodeIndex,
        c: NodeIndex,
        d: NodeIndex,
    ) -> bool {
        let n_segments_ab = self.count_n_segments(a, b);
        let n_segments_cd = self.count_n_segments(c, d);
        if n_segments_ab != n_segments_cd {
            return n_segments_ab < n_segments_cd;
        }
        let excluded_begin = |x: NodeIndex| {
            let p = self.node(x).parent();
            let begin = self.parent(p).forward_begin_node();
            (self.node(x).raw_id() - self.node(begin).raw_id()).unsigned_abs()
        };
        let excluded_end = |x: NodeIndex| {
            let p = self.node(x).parent();
            let end = self.parent(p).forward_end_node();
            (self.node(x).raw_id() - self.node(end).raw_id()).unsigned_abs()
        };
        excluded_begin(a) + excluded_end(b) > excluded_begin(c) + excluded_end(d)
    }

    /// Removes arcs (a, b) and (c, d) and inserts (a, c) and (b, d) by
    /// reversing whichever of the sub-paths (b..c) or (d..a) looks shorter.
    ///
    /// Both input arcs must currently exist with the same orientation (both
    /// forward or both backward). A no-op when the arcs are adjacent in a way
    /// that makes the flip the identity (`b == c` or `d == a`).
    ///
    /// # Panics
    ///
    /// Panics if the arcs disagree in orientation or are the same arc.
    pub fn flip(&mut self, a: NodeIndex, b: NodeIndex, c: NodeIndex, d: NodeIndex) {
        debug_assert!(self.has_edge(a, b), "flip: (a, b) is not a tour edge");
        debug_assert!(self.has_edge(c, d), "flip: (c, d) is not a tour edge");
        let is_forward = self.succ(a) == b;
        assert!(
            (self.succ(c) == d) == is_forward,
            "flip arcs must share one orientation"
        );
        assert!(!(a == c && b == d), "flip requires two distinct arcs");
        if b == c || d == a {
            return;
        }

        // Reversing the old sub-path (b, c) or (d, a) reconnects (a, c) and
        // (b, d) by itself; no explicit arc deletion is needed. Prefer the
        // shorter path for less work.
        if self.is_approximately_shorter(b, c, d, a) {
            if is_forward {
                self.reverse(b, c);
            } else {
                self.reverse(c, b);
            }
        } else if is_forward {
            self.reverse(d, a);
        } else {
            self.reverse(a, d);
        }
    }

    /// City-labeled form of [`flip`](Self::flip).
    pub fn flip_cities(&mut self, a: City, b: City, c: City, d: City) {
        self.flip(
            self.city_node(a),
            self.city_node(b),
            self.city_node(c),
            self.city_node(d),
        );
    }

    /// Performs a double-bridge move. With an, bn, cn, dn the forward
    /// successors of the arguments, the arcs (a, an), (b, bn), (c, cn),
    /// (d, dn) are removed and (a, cn), (b, dn), (c, an), (d, bn) inserted.
    /// No segment content changes; only the parent ring is rewired, so node
    /// ids keep their values and the move costs O(sqrt N).
    ///
    /// # Panics
    ///
    /// Panics unless a, b, c, d appear in this order on the forward tour,
    /// lie in four distinct segments, and are pairwise non-adjacent.
    pub fn double_bridge_move(&mut self, a: NodeIndex, b: NodeIndex, c: NodeIndex, d: NodeIndex) {
        assert!(
            self.is_between(a, b, c)
                && self.is_between(b, c, d)
                && self.is_between(c, d, a)
                && self.is_between(d, a, b),
            "double_bridge_move arguments must be in forward tour order"
        );
        let (pa, pb, pc, pd) = (
            self.node(a).parent(),
            self.node(b).parent(),
            self.node(c).parent(),
            self.node(d).parent(),
        );
        assert!(
            pa != pb && pa != pc && pa != pd && pb != pc && pb != pd && pc != pd,
            "double_bridge_move arguments must lie in four distinct segments"
        );

        let an = self.succ(a);
        let bn = self.succ(b);
        let cn = self.succ(c);
        let dn = self.succ(d);

        // Force every cut point onto a segment boundary, so the reconnection
        // below only has to rewire the parent ring.
        for p in [a, b, c, d] {
            if self.node(p).parent() == self.node(self.succ(p)).parent() {
                self.split_and_merge(p, false, Direction::Forward);
            }
            #[cfg(debug_assertions)]
            {
                let q = self.succ(p);
                let pp = self.parent(self.node(p).parent());
                let qp = self.parent(self.node(q).parent());
                debug_assert!(
                    p == pp.segment_begin_node() || p == pp.segment_end_node()
                );
                debug_assert!(
                    q == qp.segment_begin_node() || q == qp.segment_end_node()
                );
                debug_assert_eq!(pp.next(), self.node(q).parent());
            }
        }
        tracing::trace!("double_bridge_move: rewiring the parent ring");

        // The order matters: each reconnection reads only boundary nodes.
        self.connect_boundary_arc(a, cn);
        self.connect_boundary_arc(d, bn);
        self.connect_boundary_arc(c, an);
        self.connect_boundary_arc(b, dn);

        // Segments are internally untouched, but their order changed.
        let head = self.head_parent();
        let mut p = head;
        let mut id = 0u32;
        loop {
            self.parents[p.get()].id = id;
            id += 1;
            p = self.parent(p).next();
            if p == head {
                break;
            }
        }
    }

    /// City-labeled form of [`double_bridge_move`](Self::double_bridge_move).
    pub fn double_bridge_move_cities(&mut self, a: City, b: City, c: City, d: City) {
        self.double_bridge_move(
            self.city_node(a),
            self.city_node(b),
            self.city_node(c),
            self.city_node(d),
        );
    }

    // Forward arc p -> q between two segment boundary nodes, carrying the
    // parent ring along.
    fn connect_boundary_arc(&mut self, p: NodeIndex, q: NodeIndex) {
        self.connect_arc_forward(p, q);
        let pp = self.node(p).parent();
        let qp = self.node(q).parent();
        self.parents[pp.get()].next = qp;
        self.parents[qp.get()].prev = pp;
    }
}
