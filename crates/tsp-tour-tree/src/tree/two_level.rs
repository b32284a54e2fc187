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

use crate::tree::err::RawTourError;
use crate::tree::index::{NodeIndex, ParentIndex};
use crate::tree::node::{ParentNode, SegmentNode};
use tsp_tour_core::prelude::{City, Direction};

/// A two-level tree encoding of a Hamiltonian cycle over `n_cities` cities.
///
/// The cycle is partitioned into `P = isqrt(N) + 1` contiguous segments. Each
/// segment node lives in a flat arena indexed by city label; each parent node
/// lives in a flat arena indexed by segment number. All links are indices, so
/// `Clone` produces a fully independent deep copy and moves never invalidate
/// anything.
///
/// A forward tour follows [`succ`](Self::succ); inside a segment whose parent
/// is not reversed this is the raw `next` link, otherwise the raw `prev`
/// link. On the parent ring, forward is always `next`.
///
/// Invariants, restored by every public mutation:
/// - raw ids inside one segment increase by exactly one along raw `next`;
///   `segment_begin_node` carries the minimum, `segment_end_node` the maximum
/// - parent ring ids are `0..P-1` in ring order
/// - `succ` and `pred` are inverses, and a full walk visits every city once
/// - no segment is ever empty
#[derive(Debug, Clone)]
pub struct TwoLevelTree {
    pub(crate) nodes: Vec<SegmentNode>,
    pub(crate) parents: Vec<ParentNode>,
    n_cities: u32,
    origin_city: City,
    nominal_segment_length: u32,
    // Scratch space reused by the mutation routines; cleared, never freed.
    pub(crate) scratch_nodes: Vec<NodeIndex>,
    pub(crate) scratch_parents: Vec<ParentIndex>,
}

impl TwoLevelTree {
    /// Allocates the node and parent pools for `n_cities` cities labeled
    /// `origin_city, origin_city + 1, ...`. The tour order must be supplied
    /// afterwards through [`set_raw_tour`](Self::set_raw_tour).
    ///
    /// # Panics
    ///
    /// Panics if `n_cities < 2`: the structure requires at least two
    /// segments, each non-empty.
    pub fn new(n_cities: u32, origin_city: City) -> Self {
        assert!(n_cities > 0, "a tour needs at least one city");
        let n_parents = n_cities.isqrt() + 1;
        assert!(
            n_cities >= n_parents,
            "n_cities = {} cannot fill {} non-empty segments",
            n_cities,
            n_parents
        );
        debug_assert!(n_parents >= 2);

        let n_slots = origin_city.get() as usize + n_cities as usize;
        let nodes = (0..n_slots)
            .map(|i| SegmentNode::unlinked(NodeIndex::new(i)))
            .collect();
        let parents = (0..n_parents as usize)
            .map(|j| ParentNode::unlinked(ParentIndex::new(j)))
            .collect();

        Self {
            nodes,
            parents,
            n_cities,
            origin_city,
            nominal_segment_length: n_cities / n_parents,
            scratch_nodes: Vec::new(),
            scratch_parents: Vec::new(),
        }
    }

    /// Builds a tree and loads `order` in one step.
    pub fn with_raw_tour(
        n_cities: u32,
        origin_city: City,
        order: &[City],
    ) -> Result<Self, RawTourError> {
        let mut tree = Self::new(n_cities, origin_city);
        tree.try_set_raw_tour(order)?;
        Ok(tree)
    }

    #[inline]
    pub fn n_cities(&self) -> u32 {
        self.n_cities
    }

    #[inline]
    pub fn n_segments(&self) -> usize {
        self.parents.len()
    }

    #[inline]
    pub fn origin_city(&self) -> City {
        self.origin_city
    }

    /// Target segment length `floor(N / P)`, fixed at construction. Only a
    /// heuristic threshold; actual sizes drift with mutations.
    #[inline]
    pub fn nominal_segment_length(&self) -> u32 {
        self.nominal_segment_length
    }

    #[inline]
    pub fn node(&self, i: NodeIndex) -> &SegmentNode {
        &self.nodes[i.get()]
    }

    #[inline]
    pub fn parent(&self, p: ParentIndex) -> &ParentNode {
        &self.parents[p.get()]
    }

    #[inline]
    pub fn is_city_valid(&self, city: City) -> bool {
        city >= self.origin_city && city.get() < self.origin_city.get() + self.n_cities
    }

    /// Arena index of the node bound to `city`.
    #[inline]
    pub fn city_node(&self, city: City) -> NodeIndex {
        debug_assert!(self.is_city_valid(city), "{} is out of range", city);
        NodeIndex(city.get())
    }

    /// Parent of the segment containing `city`.
    #[inline]
    pub fn city_parent(&self, city: City) -> ParentIndex {
        self.node(self.city_node(city)).parent
    }

    #[inline]
    pub fn origin_node(&self) -> NodeIndex {
        self.city_node(self.origin_city)
    }

    /// First parent slot; its `prev` is the tail parent. A stable entry point
    /// for ring traversal, not necessarily the parent with ring id 0.
    #[inline]
    pub fn head_parent(&self) -> ParentIndex {
        ParentIndex(0)
    }

    /// Last parent slot; its `next` is the head parent.
    #[inline]
    pub fn tail_parent(&self) -> ParentIndex {
        ParentIndex::new(self.parents.len() - 1)
    }

    /// Next node on the forward tour. O(1).
    #[inline]
    pub fn succ(&self, i: NodeIndex) -> NodeIndex {
        let node = self.node(i);
        if self.parent(node.parent).reverse {
            node.prev
        } else {
            node.next
        }
    }

    /// Previous node on the forward tour. O(1).
    #[inline]
    pub fn pred(&self, i: NodeIndex) -> NodeIndex {
        let node = self.node(i);
        if self.parent(node.parent).reverse {
            node.next
        } else {
            node.prev
        }
    }

    #[inline]
    pub fn succ_city(&self, city: City) -> City {
        self.node(self.succ(self.city_node(city))).city
    }

    #[inline]
    pub fn pred_city(&self, city: City) -> City {
        self.node(self.pred(self.city_node(city))).city
    }

    /// Whether `b` is reached strictly before `c` on a forward traversal
    /// starting at `a`. O(1), driven by segment ids and parent ring ids.
    ///
    /// # Panics
    ///
    /// Panics if the three nodes are not pairwise distinct.
    pub fn is_between(&self, a: NodeIndex, b: NodeIndex, c: NodeIndex) -> bool {
        assert!(
            a != b && a != c && b != c,
            "is_between requires three distinct nodes"
        );
        let (na, nb, nc) = (self.node(a), self.node(b), self.node(c));
        let (pa, pb, pc) = (na.parent, nb.parent, nc.parent);

        // All three in one segment: compare raw ids, wrap per reverse flag.
        if pa == pb && pb == pc {
            return if self.parent(pa).reverse {
                if nc.id < na.id {
                    nb.id < na.id && nb.id > nc.id
                } else {
                    nb.id < na.id || nb.id > nc.id
                }
            } else if nc.id > na.id {
                nb.id > na.id && nb.id < nc.id
            } else {
                nb.id > na.id || nb.id < nc.id
            };
        }

        // Three distinct segments: cyclic comparison on the parent ring.
        if pa != pb && pa != pc && pb != pc {
            let (ia, ib, ic) = (
                self.parent(pa).id,
                self.parent(pb).id,
                self.parent(pc).id,
            );
            return if ic > ia {
                ib > ia && ib < ic
            } else {
                ib > ia || ib < ic
            };
        }

        // Exactly two share a parent.
        if pa == pb {
            return self.can_reach_in_segment(na, nb);
        }
        if pb == pc {
            return if self.parent(pb).reverse {
                nb.id > nc.id
            } else {
                nb.id < nc.id
            };
        }
        // pa == pc
        !self.can_reach_in_segment(na, nc)
    }

    /// City-labeled form of [`is_between`](Self::is_between).
    #[inline]
    pub fn is_between_cities(&self, a: City, b: City, c: City) -> bool {
        self.is_between(self.city_node(a), self.city_node(b), self.city_node(c))
    }

    // Whether v lies after u on the forward path inside their shared segment.
    #[inline]
    fn can_reach_in_segment(&self, u: &SegmentNode, v: &SegmentNode) -> bool {
        debug_assert_eq!(u.parent, v.parent);
        if self.parent(u.parent).reverse {
            v.id < u.id
        } else {
            u.id < v.id
        }
    }

    // Whether the forward path a -> b stays inside one segment. O(1).
    pub(crate) fn is_path_in_single_segment(&self, a: NodeIndex, b: NodeIndex) -> bool {
        let (na, nb) = (self.node(a), self.node(b));
        if na.parent != nb.parent {
            return false;
        }
        if self.parent(na.parent).reverse {
            na.id > nb.id
        } else {
            na.id < nb.id
        }
    }

    /// Whether `{x, y}` is an edge of the current tour, in either direction.
    #[inline]
    pub fn has_edge(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.succ(a) == b || self.pred(a) == b
    }

    #[inline]
    pub fn has_edge_cities(&self, x: City, y: City) -> bool {
        self.has_edge(self.city_node(x), self.city_node(y))
    }

    /// Orders the endpoints of a current tour edge so the first one's forward
    /// successor is the second.
    ///
    /// # Panics
    ///
    /// Panics if `{x, y}` is not an edge of the tour.
    pub fn turn_forward(&self, x: City, y: City) -> (City, City) {
        assert!(
            self.has_edge_cities(x, y),
            "({}, {}) is not a tour edge",
            x,
            y
        );
        if self.succ_city(x) == y { (x, y) } else { (y, x) }
    }

    /// Loads a forward tour, partitioning `order` into `P` segments of length
    /// `floor(N / P)` (the last takes the remainder) with all reverse flags
    /// cleared. Re-callable; any previous state is overwritten.
    pub fn try_set_raw_tour(&mut self, order: &[City]) -> Result<(), RawTourError> {
        if order.len() != self.n_cities as usize {
            return Err(RawTourError::WrongLength {
                expected: self.n_cities as usize,
                got: order.len(),
            });
        }
        let mut seen = vec![false; self.n_cities as usize];
        for &city in order {
            if !self.is_city_valid(city) {
                return Err(RawTourError::CityOutOfRange { city });
            }
            let slot = (city.get() - self.origin_city.get()) as usize;
            if seen[slot] {
                return Err(RawTourError::DuplicateCity { city });
            }
            seen[slot] = true;
        }
        self.install_raw_tour(order);
        Ok(())
    }

    /// Panicking form of [`try_set_raw_tour`](Self::try_set_raw_tour).
    ///
    /// # Panics
    ///
    /// Panics if `order` is not a permutation of
    /// `[origin_city, origin_city + n_cities)`.
    pub fn set_raw_tour(&mut self, order: &[City]) {
        if let Err(e) = self.try_set_raw_tour(order) {
            panic!("invalid raw tour: {}", e);
        }
    }

    fn install_raw_tour(&mut self, order: &[City]) {
        let n_parents = self.parents.len();
        let segment_length = self.n_cities as usize / n_parents;
        let first = self.city_node(order[0]);
        let last = self.city_node(order[order.len() - 1]);

        for current_segment in 0..n_parents {
            let pi = ParentIndex::new(current_segment);
            let i_begin = current_segment * segment_length;
            // The last segment takes all the remaining cities.
            let i_end = if current_segment + 1 == n_parents {
                self.n_cities as usize
            } else {
                i_begin + segment_length
            };

            let ring_prev = if current_segment > 0 {
                ParentIndex::new(current_segment - 1)
            } else {
                self.tail_parent()
            };
            let ring_next = if current_segment + 1 < n_parents {
                ParentIndex::new(current_segment + 1)
            } else {
                self.head_parent()
            };
            let segment_begin = self.city_node(order[i_begin]);
            let segment_end = self.city_node(order[i_end - 1]);

            let parent = &mut self.parents[current_segment];
            parent.id = current_segment as u32;
            parent.prev = ring_prev;
            parent.next = ring_next;
            parent.reverse = false;
            parent.segment_begin = segment_begin;
            parent.segment_end = segment_end;
            parent.size = (i_end - i_begin) as u32;

            for i in i_begin..i_end {
                let city = order[i];
                let ni = self.city_node(city);
                let prev = if i == 0 {
                    last
                } else {
                    self.city_node(order[i - 1])
                };
                let next = if i + 1 == self.n_cities as usize {
                    first
                } else {
                    self.city_node(order[i + 1])
                };
                let node = &mut self.nodes[ni.get()];
                node.city = city;
                node.parent = pi;
                node.prev = prev;
                node.next = next;
                node.id = (i - i_begin) as i32;
            }
        }
    }

    /// Fills `out` with the tour read from `start` in the given direction.
    /// The single O(N) serialization primitive; `raw_tour*` wrap it.
    pub fn collect_raw_tour(&self, start: City, direction: Direction, out: &mut Vec<City>) {
        out.clear();
        out.reserve(self.n_cities as usize);
        let mut node = self.city_node(start);
        for _ in 0..self.n_cities {
            out.push(self.node(node).city);
            node = match direction {
                Direction::Forward => self.succ(node),
                Direction::Backward => self.pred(node),
            };
        }
    }

    /// The forward tour starting at the origin city.
    pub fn raw_tour(&self) -> Vec<City> {
        self.raw_tour_from(self.origin_city, Direction::Forward)
    }

    pub fn raw_tour_from(&self, start: City, direction: Direction) -> Vec<City> {
        let mut out = Vec::new();
        self.collect_raw_tour(start, direction, &mut out);
        out
    }

    /// Segment sizes in parent slot order. Sizes drift as mutations split
    /// and merge; the order here is arbitrary.
    pub fn actual_segment_sizes(&self) -> Vec<u32> {
        self.parents.iter().map(|p| p.size).collect()
    }

    /// Segment sizes in ring order, starting at the segment owning `start`.
    pub fn actual_segment_sizes_from(&self, start: City) -> Vec<u32> {
        let start_parent = self.city_parent(start);
        let mut out = Vec::with_capacity(self.parents.len());
        let mut p = start_parent;
        loop {
            out.push(self.parent(p).size);
            p = self.parent(p).next;
            if p == start_parent {
                break;
            }
        }
        out
    }

    // Establishes the forward-tour arc p -> q. The single choke point for
    // segment-node link writes during mutations: which raw field an endpoint
    // uses depends on its owning parent's reverse flag.
    pub(crate) fn connect_arc_forward(&mut self, p: NodeIndex, q: NodeIndex) {
        if self.parent(self.node(p).parent).reverse {
            self.nodes[p.get()].prev = q;
        } else {
            self.nodes[p.get()].next = q;
        }
        if self.parent(self.node(q).parent).reverse {
            self.nodes[q.get()].next = p;
        } else {
            self.nodes[q.get()].prev = p;
        }
    }

    // Relabels ids along raw `next` from a to b inclusive, starting at a_id.
    pub(crate) fn relabel_id(&mut self, a: NodeIndex, b: NodeIndex, a_id: i32) {
        debug_assert_eq!(self.node(a).parent, self.node(b).parent);
        self.nodes[a.get()].id = a_id;
        let mut cur = a;
        while cur != b {
            let next = self.node(cur).next;
            self.nodes[next.get()].id = self.node(cur).id + 1;
            cur = next;
        }
    }
}
