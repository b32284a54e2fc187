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

//! A two-level doubly-linked tree tour representation for the symmetric TSP.
//!
//! The tour is a Hamiltonian cycle over `N` labeled cities. Local-search
//! solvers (2-opt, Or-opt, Lin-Kernighan) hammer four primitives: next,
//! prev, between, and path reversal. A plain doubly-linked list makes
//! reversal O(N); a flat array makes it O(N) too. Partitioning the cycle
//! into roughly sqrt(N) segments, each with a lazy reverse flag, brings all
//! four down to O(sqrt(N)) amortized.
//!
//! References:
//! - Fredman, Johnson, McGeoch, Ostheimer, "Data structures for traveling
//!   salesmen", Journal of Algorithms 18(3), 1995.
//! - Helsgaun, "An effective implementation of the Lin-Kernighan traveling
//!   salesman heuristic", EJOR 126(1), 2000.
//! - Osterman, Rego, "A k-level data structure for large-scale traveling
//!   salesman problems", Annals of Operations Research 244(2), 2016.

pub mod tree;

pub use tree::{ParentNode, SegmentNode, TwoLevelTree};
