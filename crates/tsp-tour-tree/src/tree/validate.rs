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

use crate::tree::err::InvariantViolation;
use crate::tree::index::ParentIndex;
use crate::tree::two_level::TwoLevelTree;

impl TwoLevelTree {
    /// Walks the whole structure and checks every invariant the mutations
    /// promise to restore: ring closure and inverse links on both levels, id
    /// contiguity inside segments and on the parent ring, endpoint extremes,
    /// the city partition, and segment boundary arcs. O(N).
    ///
    /// Meant for tests and debug builds of client solvers; mutations never
    /// call it.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let n = self.n_cities() as usize;
        let origin = self.origin_node();

        // Lower-level ring: closure, inverse links, and the city partition.
        let mut seen = vec![false; n];
        let mut node = origin;
        for _ in 0..n {
            let city = self.node(node).city();
            let slot = (city.get() - self.origin_city().get()) as usize;
            if seen[slot] {
                return Err(InvariantViolation::NotAPermutation { city });
            }
            seen[slot] = true;
            if self.succ(self.pred(node)) != node || self.pred(self.succ(node)) != node {
                return Err(InvariantViolation::InverseLinksBroken { city });
            }
            node = self.succ(node);
        }
        if node != origin {
            return Err(InvariantViolation::RingNotClosed { steps_taken: n });
        }

        // Segments: sizes, endpoint extremes, and raw id contiguity.
        let mut total = 0u32;
        for (slot, parent) in self.parents.iter().enumerate() {
            let parent_id = parent.id();
            if parent.size() == 0 {
                return Err(InvariantViolation::EmptySegment { parent_id });
            }
            total += parent.size();
            let begin = parent.segment_begin_node();
            let end = parent.segment_end_node();
            let id_span = self.node(end).raw_id() - self.node(begin).raw_id() + 1;
            if id_span != parent.size() as i32 {
                return Err(InvariantViolation::BadSegmentEndpoint { parent_id });
            }
            let mut cur = begin;
            for _ in 1..parent.size() {
                let next = self.node(cur).raw_next();
                if self.node(next).parent() != ParentIndex::new(slot) {
                    return Err(InvariantViolation::BadSegmentSize { parent_id });
                }
                if self.node(next).raw_id() != self.node(cur).raw_id() + 1 {
                    return Err(InvariantViolation::SegmentIdsNotContiguous {
                        city: self.node(next).city(),
                    });
                }
                cur = next;
            }
            if cur != end {
                return Err(InvariantViolation::BadSegmentSize { parent_id });
            }
        }
        if total != self.n_cities() {
            return Err(InvariantViolation::SizesDoNotCoverTour { total });
        }

        // Parent ring: inverse links, cyclic id contiguity, boundary arcs.
        let n_parents = self.n_segments() as u32;
        let head = self.head_parent();
        let mut p = head;
        for _ in 0..n_parents {
            let parent = self.parent(p);
            let next = parent.next();
            if self.parent(next).prev() != p {
                return Err(InvariantViolation::ParentRingLinksBroken {
                    parent_id: parent.id(),
                });
            }
            if self.parent(next).id() != (parent.id() + 1) % n_parents {
                return Err(InvariantViolation::ParentRingIdsNotContiguous {
                    parent_id: parent.id(),
                });
            }
            let last = parent.forward_end_node();
            let first_of_next = self.parent(next).forward_begin_node();
            if self.succ(last) != first_of_next || self.pred(first_of_next) != last {
                return Err(InvariantViolation::SegmentBoundaryBroken {
                    parent_id: parent.id(),
                });
            }
            p = next;
        }
        if p != head {
            return Err(InvariantViolation::ParentRingLinksBroken { parent_id: 0 });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::two_level::TwoLevelTree;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use tsp_tour_core::prelude::{City, Direction};

    fn c(x: u32) -> City {
        City::new(x)
    }

    fn cities(xs: &[u32]) -> Vec<City> {
        xs.iter().map(|&x| c(x)).collect()
    }

    fn tour_from(tree: &TwoLevelTree, start: u32) -> Vec<u32> {
        tree.raw_tour_from(c(start), Direction::Forward)
            .iter()
            .map(|x| x.get())
            .collect()
    }

    fn pos(tour: &[u32], x: u32) -> usize {
        tour.iter().position(|&v| v == x).unwrap()
    }

    // Reverses the forward path a..b on a plain vector tour, mirroring the
    // tree's no-op cases.
    fn naive_reverse(tour: &mut Vec<u32>, a: u32, b: u32) {
        if a == b {
            return;
        }
        let pa = pos(tour, a);
        tour.rotate_left(pa);
        let pb = pos(tour, b);
        if pb + 1 == tour.len() {
            return; // the path is the whole cycle
        }
        tour[..=pb].reverse();
    }

    fn naive_double_bridge(tour: &mut Vec<u32>, a: u32, b: u32, cc: u32, d: u32) {
        let pa = pos(tour, a);
        tour.rotate_left(pa);
        let (pb, pc, pd) = (pos(tour, b), pos(tour, cc), pos(tour, d));
        let mut out = Vec::with_capacity(tour.len());
        out.push(tour[0]);
        out.extend_from_slice(&tour[pc + 1..=pd]);
        out.extend_from_slice(&tour[pb + 1..=pc]);
        out.extend_from_slice(&tour[1..=pb]);
        out.extend_from_slice(&tour[pd + 1..]);
        *tour = out;
    }

    fn naive_is_between(tour: &[u32], a: u32, b: u32, cc: u32) -> bool {
        let pa = pos(tour, a);
        for k in 1..tour.len() {
            let v = tour[(pa + k) % tour.len()];
            if v == b {
                return true;
            }
            if v == cc {
                return false;
            }
        }
        unreachable!("b and c must appear on the tour")
    }

    fn assert_tree_matches(tree: &TwoLevelTree, mirror: &[u32]) {
        assert_eq!(tour_from(tree, mirror[0]), mirror, "tour diverged from mirror");
    }

    fn shuffled_tour(n: u32, origin: u32, rng: &mut ChaCha8Rng) -> Vec<u32> {
        let mut order: Vec<u32> = (origin..origin + n).collect();
        order.shuffle(rng);
        order
    }

    #[test]
    fn test_validate_accepts_fresh_trees() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for (n, origin) in [(2, 0), (3, 1), (10, 1), (23, 1), (67, 2), (144, 0)] {
            let order = shuffled_tour(n, origin, &mut rng);
            let tree = TwoLevelTree::with_raw_tour(n, c(origin), &cities(&order)).unwrap();
            tree.validate().unwrap();
        }
    }

    #[test]
    fn test_random_reversals_agree_with_a_naive_mirror() {
        for (seed, n, origin) in [(1u64, 10u32, 1u32), (2, 23, 1), (3, 41, 3), (4, 67, 2)] {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut mirror = shuffled_tour(n, origin, &mut rng);
            let mut tree = TwoLevelTree::with_raw_tour(n, c(origin), &cities(&mirror)).unwrap();

            for _ in 0..200 {
                let a = rng.random_range(origin..origin + n);
                let b = rng.random_range(origin..origin + n);
                tree.reverse(tree.city_node(c(a)), tree.city_node(c(b)));
                if a != b {
                    naive_reverse(&mut mirror, a, b);
                }
                tree.validate().unwrap();
                assert_tree_matches(&tree, &mirror);
            }
        }
    }

    #[test]
    fn test_random_mixed_operations_preserve_all_invariants() {
        for (seed, n, origin) in [(11u64, 23u32, 1u32), (12, 40, 1), (13, 67, 2), (14, 100, 1)] {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut mirror = shuffled_tour(n, origin, &mut rng);
            let mut tree = TwoLevelTree::with_raw_tour(n, c(origin), &cities(&mirror)).unwrap();

            for _ in 0..150 {
                match rng.random_range(0..4u32) {
                    0 => {
                        let a = rng.random_range(origin..origin + n);
                        let b = rng.random_range(origin..origin + n);
                        tree.reverse(tree.city_node(c(a)), tree.city_node(c(b)));
                        if a != b {
                            naive_reverse(&mut mirror, a, b);
                        }
                    }
                    1 => {
                        // split_and_merge never changes the tour; only skip
                        // moves that would drain the donor segment.
                        let s = rng.random_range(origin..origin + n);
                        let include_self = rng.random_bool(0.5);
                        let direction = if rng.random_bool(0.5) {
                            Direction::Forward
                        } else {
                            Direction::Backward
                        };
                        let s_node = tree.city_node(c(s));
                        let parent = tree.parent(tree.node(s_node).parent());
                        let anchor = match direction {
                            Direction::Forward => parent.forward_end_node(),
                            Direction::Backward => parent.forward_begin_node(),
                        };
                        let run = (tree.node(anchor).raw_id() - tree.node(s_node).raw_id())
                            .unsigned_abs()
                            + include_self as u32;
                        if run == parent.size() {
                            continue;
                        }
                        tree.split_and_merge(s_node, include_self, direction);
                    }
                    2 => {
                        let x = rng.random_range(origin..origin + n);
                        let y = rng.random_range(origin..origin + n);
                        if x == y {
                            continue;
                        }
                        let xn = tree.succ_city(c(x));
                        let yn = tree.succ_city(c(y));
                        if xn == c(y) || yn == c(x) {
                            tree.flip_cities(c(x), xn, c(y), yn);
                            continue; // identity flip
                        }
                        // The tree reverses whichever sub-path it judges
                        // shorter; ask it first so the mirror follows along.
                        let shorter = tree.is_approximately_shorter(
                            tree.city_node(xn),
                            tree.city_node(c(y)),
                            tree.city_node(yn),
                            tree.city_node(c(x)),
                        );
                        tree.flip_cities(c(x), xn, c(y), yn);
                        if shorter {
                            naive_reverse(&mut mirror, xn.get(), y);
                        } else {
                            naive_reverse(&mut mirror, yn.get(), x);
                        }
                    }
                    _ => {
                        let mut ps: Vec<usize> = (0..4)
                            .map(|_| rng.random_range(0..n as usize))
                            .collect();
                        ps.sort_unstable();
                        ps.dedup();
                        if ps.len() < 4 {
                            continue;
                        }
                        let gaps_ok = ps.windows(2).all(|w| w[1] - w[0] >= 2)
                            && ps[0] + n as usize - ps[3] >= 2;
                        if !gaps_ok {
                            continue;
                        }
                        let (a, b, cc, d) =
                            (mirror[ps[0]], mirror[ps[1]], mirror[ps[2]], mirror[ps[3]]);
                        let distinct_parents = {
                            let parents = [
                                tree.city_parent(c(a)),
                                tree.city_parent(c(b)),
                                tree.city_parent(c(cc)),
                                tree.city_parent(c(d)),
                            ];
                            parents.iter().enumerate().all(|(i, p)| {
                                parents.iter().skip(i + 1).all(|q| p != q)
                            })
                        };
                        if !distinct_parents {
                            continue;
                        }
                        tree.double_bridge_move_cities(c(a), c(b), c(cc), c(d));
                        naive_double_bridge(&mut mirror, a, b, cc, d);
                    }
                }
                tree.validate().unwrap();
                assert_tree_matches(&tree, &mirror);
            }
        }
    }

    #[test]
    fn test_is_between_agrees_with_a_naive_scan() {
        for (seed, n, origin) in [(21u64, 12u32, 1u32), (22, 23, 1), (23, 67, 2)] {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut mirror = shuffled_tour(n, origin, &mut rng);
            let mut tree = TwoLevelTree::with_raw_tour(n, c(origin), &cities(&mirror)).unwrap();

            // A few reversals first so reverse flags take part.
            for _ in 0..10 {
                let a = rng.random_range(origin..origin + n);
                let b = rng.random_range(origin..origin + n);
                tree.reverse(tree.city_node(c(a)), tree.city_node(c(b)));
                if a != b {
                    naive_reverse(&mut mirror, a, b);
                }
            }
            assert_tree_matches(&tree, &mirror);

            for _ in 0..300 {
                let a = rng.random_range(origin..origin + n);
                let b = rng.random_range(origin..origin + n);
                let x = rng.random_range(origin..origin + n);
                if a == b || a == x || b == x {
                    continue;
                }
                assert_eq!(
                    tree.is_between_cities(c(a), c(b), c(x)),
                    naive_is_between(&mirror, a, b, x),
                    "is_between({}, {}, {}) disagrees with the scan",
                    a,
                    b,
                    x
                );
            }
        }
    }

    #[test]
    fn test_flip_followed_by_inverse_flip_restores_the_tour() {
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        for n in [12u32, 23, 50] {
            let origin = 1u32;
            let mirror = shuffled_tour(n, origin, &mut rng);
            let mut tree = TwoLevelTree::with_raw_tour(n, c(origin), &cities(&mirror)).unwrap();

            for _ in 0..60 {
                let x = rng.random_range(origin..origin + n);
                let y = rng.random_range(origin..origin + n);
                if x == y {
                    continue;
                }
                let xn = tree.succ_city(c(x));
                let yn = tree.succ_city(c(y));
                if xn == c(y) || yn == c(x) {
                    continue;
                }
                let before_forward = tour_from(&tree, origin);
                let before_backward: Vec<u32> = tree
                    .raw_tour_from(c(origin), Direction::Backward)
                    .iter()
                    .map(|v| v.get())
                    .collect();
                // flip(a,b,c,d) inserts (a,c) and (b,d); flipping those two
                // arcs back out undoes the exchange. The tour direction may
                // come back mirrored depending on which sub-path each flip
                // chose to reverse.
                tree.flip_cities(c(x), xn, c(y), yn);
                tree.flip_cities(xn, yn, c(x), c(y));
                let after = tour_from(&tree, origin);
                assert!(
                    after == before_forward || after == before_backward,
                    "double flip did not restore the cycle"
                );
                tree.validate().unwrap();
                // Re-anchor so later iterations keep a consistent mirror.
                if after != before_forward {
                    let restore = cities(&before_forward);
                    tree.set_raw_tour(&restore);
                }
            }
        }
    }
}
