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
    /// Splits the segment owning `s` at `s` and merges the half on the
    /// `direction` side into the adjacent segment in that direction. With
    /// `include_self`, `s` itself moves along; otherwise it stays behind as
    /// the new boundary of its segment.
    ///
    /// The tour encoded by the tree is unchanged; only the partition into
    /// segments shifts. A no-op when there is nothing to move (`s` already
    /// sits on the requested boundary). The parent ring itself is never
    /// modified here, only segment memberships, sizes, endpoints, and ids.
    ///
    /// # Panics
    ///
    /// Panics if the move would leave the donor segment empty.
    pub fn split_and_merge(&mut self, s: NodeIndex, include_self: bool, direction: Direction) {
        let parent_i = self.node(s).parent();
        let neighbor_i = match direction {
            Direction::Forward => self.parent(parent_i).next(),
            Direction::Backward => self.parent(parent_i).prev(),
        };

        // Gather the run to move; scratch buffer is reused across calls.
        let mut moved = std::mem::take(&mut self.scratch_nodes);
        moved.clear();
        if include_self {
            moved.push(s);
        }
        let boundary = match direction {
            Direction::Forward => {
                let mut p = self.succ(s);
                while self.node(p).parent() == parent_i {
                    moved.push(p);
                    p = self.succ(p);
                }
                if include_self { self.pred(s) } else { s }
            }
            Direction::Backward => {
                let mut p = self.pred(s);
                while self.node(p).parent() == parent_i {
                    moved.push(p);
                    p = self.pred(p);
                }
                if include_self { self.succ(s) } else { s }
            }
        };

        if moved.is_empty() {
            self.scratch_nodes = moved;
            return;
        }

        let moved_len = moved.len() as u32;
        self.parents[neighbor_i.get()].size += moved_len;
        self.parents[parent_i.get()].size -= moved_len;
        assert!(
            self.parents[parent_i.get()].size > 0,
            "split_and_merge must not empty segment {}",
            self.parents[parent_i.get()].id
        );
        tracing::trace!(
            "split_and_merge: moving {} nodes {} into segment {}",
            moved_len,
            direction,
            self.parents[neighbor_i.get()].id
        );

        let neighbor_reversed = self.parent(neighbor_i).is_reversed();
        match direction {
            Direction::Forward => {
                // Prepend to the neighbor, walking the gathered run from its
                // far end back towards s so forward order is preserved.
                let mut q = if neighbor_reversed {
                    self.parent(neighbor_i).segment_end_node()
                } else {
                    self.parent(neighbor_i).segment_begin_node()
                };
                let delta_id: i32 = if neighbor_reversed { 1 } else { -1 };
                while let Some(p) = moved.pop() {
                    self.nodes[p.get()].parent = neighbor_i;
                    self.connect_arc_forward(p, q);
                    self.nodes[p.get()].id = self.node(q).raw_id() + delta_id;
                    q = p;
                }
                if neighbor_reversed {
                    self.parents[neighbor_i.get()].segment_end = q;
                } else {
                    self.parents[neighbor_i.get()].segment_begin = q;
                }
                // Repair the donor's boundary.
                self.connect_arc_forward(boundary, q);
                if self.parent(parent_i).is_reversed() {
                    self.parents[parent_i.get()].segment_begin = boundary;
                } else {
                    self.parents[parent_i.get()].segment_end = boundary;
                }
            }
            Direction::Backward => {
                // Append to the neighbor's forward end.
                let mut q = if neighbor_reversed {
                    self.parent(neighbor_i).segment_begin_node()
                } else {
                    self.parent(neighbor_i).segment_end_node()
                };
                let delta_id: i32 = if neighbor_reversed { -1 } else { 1 };
                while let Some(p) = moved.pop() {
                    self.nodes[p.get()].parent = neighbor_i;
                    self.connect_arc_forward(q, p);
                    self.nodes[p.get()].id = self.node(q).raw_id() + delta_id;
                    q = p;
                }
                if neighbor_reversed {
                    self.parents[neighbor_i.get()].segment_begin = q;
                } else {
                    self.parents[neighbor_i.get()].segment_end = q;
                }
                self.connect_arc_forward(q, boundary);
                if self.parent(parent_i).is_reversed() {
                    self.parents[parent_i.get()].segment_end = boundary;
                } else {
                    self.parents[parent_i.get()].segment_begin = boundary;
                }
            }
        }

        self.scratch_nodes = moved;
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::node::ParentNode;
    use crate::tree::two_level::TwoLevelTree;
    use tsp_tour_core::prelude::{City, Direction};

    fn c(x: u32) -> City {
        City::new(x)
    }

    fn cities(xs: &[u32]) -> Vec<City> {
        xs.iter().map(|&x| c(x)).collect()
    }

    fn tree_with(n_cities: u32, origin: u32, order: &[u32]) -> TwoLevelTree {
        TwoLevelTree::with_raw_tour(n_cities, c(origin), &cities(order)).unwrap()
    }

    fn parent_of(tree: &TwoLevelTree, city: u32) -> &ParentNode {
        tree.parent(tree.city_parent(c(city)))
    }

    fn tour_from(tree: &TwoLevelTree, start: u32) -> Vec<u32> {
        tree.raw_tour_from(c(start), Direction::Forward)
            .iter()
            .map(|x| x.get())
            .collect()
    }

    fn tour_backward_from(tree: &TwoLevelTree, start: u32) -> Vec<u32> {
        tree.raw_tour_from(c(start), Direction::Backward)
            .iter()
            .map(|x| x.get())
            .collect()
    }

    #[test]
    fn test_split_and_merge_moves_runs_without_changing_the_tour() {
        let order = [
            11, 13, 6, 8, 4, 1, 2, 5, 9, 10, 7, 12, 14, 3, 15, 16, 17, 18, 20, 19, 23, 22, 21,
        ];
        let mut tree = tree_with(23, 1, &order);
        assert_eq!(tree.actual_segment_sizes(), vec![4, 4, 4, 4, 7]);

        // Merge [11, 13]'s tail (6 inclusive) forward into the next segment.
        tree.split_and_merge(tree.city_node(c(6)), true, Direction::Forward);
        assert_eq!(tree.city_parent(c(6)), tree.city_parent(c(4)));
        assert_eq!(tree.actual_segment_sizes(), vec![2, 6, 4, 4, 7]);
        assert_eq!(
            tour_from(&tree, 6),
            vec![6, 8, 4, 1, 2, 5, 9, 10, 7, 12, 14, 3, 15, 16, 17, 18, 20, 19, 23, 22, 21, 11, 13]
        );
        assert_eq!(tour_from(&tree, 11), order.to_vec());
        tree.validate().unwrap();

        // Reverse the enlarged segment [6, 8, 4, 1, 2, 5] so it carries the
        // reverse flag, then keep splitting across it.
        tree.reverse(tree.city_node(c(6)), tree.city_node(c(5)));
        assert_eq!(
            tour_backward_from(&tree, 10),
            vec![10, 9, 6, 8, 4, 1, 2, 5, 13, 11, 21, 22, 23, 19, 20, 18, 17, 16, 15, 3, 14, 12, 7]
        );
        assert_eq!(
            tour_from(&tree, 11),
            vec![11, 13, 5, 2, 1, 4, 8, 6, 9, 10, 7, 12, 14, 3, 15, 16, 17, 18, 20, 19, 23, 22, 21]
        );
        assert!(parent_of(&tree, 4).is_reversed());

        tree.split_and_merge(tree.city_node(c(4)), true, Direction::Forward);
        assert_eq!(
            tour_from(&tree, 1),
            vec![1, 4, 8, 6, 9, 10, 7, 12, 14, 3, 15, 16, 17, 18, 20, 19, 23, 22, 21, 11, 13, 5, 2]
        );
        assert_eq!(tree.actual_segment_sizes(), vec![2, 3, 7, 4, 7]);
        assert_eq!(
            tour_from(&tree, 11),
            vec![11, 13, 5, 2, 1, 4, 8, 6, 9, 10, 7, 12, 14, 3, 15, 16, 17, 18, 20, 19, 23, 22, 21]
        );
        assert!(parent_of(&tree, 2).is_reversed());
        assert!(!parent_of(&tree, 4).is_reversed());
        tree.validate().unwrap();

        // Backward merge that leaves s behind.
        tree.split_and_merge(tree.city_node(c(19)), false, Direction::Backward);
        assert_eq!(
            tour_from(&tree, 11),
            vec![11, 13, 5, 2, 1, 4, 8, 6, 9, 10, 7, 12, 14, 3, 15, 16, 17, 18, 20, 19, 23, 22, 21]
        );
        assert_eq!(tree.actual_segment_sizes(), vec![2, 3, 7, 7, 4]);
        assert_eq!(
            parent_of(&tree, 19).segment_begin_node(),
            tree.city_node(c(19))
        );
        assert_eq!(
            parent_of(&tree, 16).segment_end_node(),
            tree.city_node(c(20))
        );
        assert!(parent_of(&tree, 2).is_reversed());

        // Backward merge into the reversed segment holding [5, 2, 1].
        tree.split_and_merge(tree.city_node(c(10)), true, Direction::Backward);
        assert_eq!(
            tour_from(&tree, 11),
            vec![11, 13, 5, 2, 1, 4, 8, 6, 9, 10, 7, 12, 14, 3, 15, 16, 17, 18, 20, 19, 23, 22, 21]
        );
        assert_eq!(tree.actual_segment_sizes(), vec![2, 8, 2, 7, 4]);
        assert!(parent_of(&tree, 9).is_reversed());
        assert_eq!(parent_of(&tree, 9).segment_end_node(), tree.city_node(c(5)));
        assert_eq!(parent_of(&tree, 9).segment_begin_node(), tree.city_node(c(10)));
        assert_eq!(parent_of(&tree, 7).segment_end_node(), tree.city_node(c(12)));
        assert_eq!(parent_of(&tree, 12).segment_begin_node(), tree.city_node(c(7)));
        tree.validate().unwrap();

        // Forward merge out of a reversed segment.
        tree.split_and_merge(tree.city_node(c(2)), true, Direction::Forward);
        assert_eq!(
            tour_from(&tree, 11),
            vec![11, 13, 5, 2, 1, 4, 8, 6, 9, 10, 7, 12, 14, 3, 15, 16, 17, 18, 20, 19, 23, 22, 21]
        );
        assert_eq!(tree.actual_segment_sizes(), vec![2, 1, 9, 7, 4]);
        assert!(parent_of(&tree, 5).is_reversed());
        assert!(!parent_of(&tree, 1).is_reversed());
        assert_eq!(parent_of(&tree, 5).segment_begin_node(), tree.city_node(c(5)));
        assert_eq!(parent_of(&tree, 5).segment_end_node(), tree.city_node(c(5)));
        assert_eq!(parent_of(&tree, 12).segment_begin_node(), tree.city_node(c(2)));
        assert_eq!(parent_of(&tree, 2).segment_end_node(), tree.city_node(c(12)));
        assert_eq!(
            tour_backward_from(&tree, 2),
            vec![2, 5, 13, 11, 21, 22, 23, 19, 20, 18, 17, 16, 15, 3, 14, 12, 7, 10, 9, 6, 8, 4, 1]
        );
        tree.validate().unwrap();
    }

    #[test]
    fn test_split_and_merge_on_boundary_is_a_noop() {
        let order = [
            11, 13, 6, 8, 4, 1, 2, 5, 9, 10, 7, 12, 14, 3, 15, 16, 17, 18, 20, 19, 23, 22, 21,
        ];
        let mut tree = tree_with(23, 1, &order);

        // 8 is the forward end of its segment: nothing moves forward of it.
        tree.split_and_merge(tree.city_node(c(8)), false, Direction::Forward);
        assert_eq!(tree.actual_segment_sizes(), vec![4, 4, 4, 4, 7]);
        assert_eq!(tour_from(&tree, 11), order.to_vec());

        // 11 is the forward begin: nothing moves backward of it.
        tree.split_and_merge(tree.city_node(c(11)), false, Direction::Backward);
        assert_eq!(tree.actual_segment_sizes(), vec![4, 4, 4, 4, 7]);
        tree.validate().unwrap();
    }

    #[test]
    #[should_panic(expected = "must not empty segment")]
    fn test_split_and_merge_refuses_to_empty_a_segment() {
        let order = [
            11, 13, 6, 8, 4, 1, 2, 5, 9, 10, 7, 12, 14, 3, 15, 16, 17, 18, 20, 19, 23, 22, 21,
        ];
        let mut tree = tree_with(23, 1, &order);
        // Moving the whole first segment forward would leave it empty.
        tree.split_and_merge(tree.city_node(c(11)), true, Direction::Forward);
    }
}
