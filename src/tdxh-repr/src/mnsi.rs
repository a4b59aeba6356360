// Copyright the TDX Hydro contributors. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::link_id::LinkId;

/// A Modified Nested Set Index triple (spec §3).
///
/// `discover`/`finish` are unique within a tree and `discover < finish`;
/// containment of intervals between two reaches sharing a `root_id`
/// determines the upstream relation (P3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mnsi {
    pub root_id: LinkId,
    pub discover: i32,
    pub finish: i32,
}

impl Mnsi {
    pub fn new(root_id: LinkId, discover: i32, finish: i32) -> Self {
        Mnsi { root_id, discover, finish }
    }

    /// P5: a leaf's finish time is exactly one past its discover time.
    pub fn is_leaf(&self) -> bool {
        self.finish == self.discover + 1
    }

    /// Subtree size minus one; used by the dissolve planner as the initial
    /// upper bound on `element_count` (spec §4.4).
    pub fn subtree_bound(&self) -> i64 {
        (self.finish - self.discover) as i64
    }

    /// P3: `self` is upstream of `other` iff they share a root and
    /// `self`'s interval is contained in `other`'s.
    pub fn is_upstream_of(&self, other: &Mnsi) -> bool {
        self.root_id == other.root_id && self.discover >= other.discover && self.finish <= other.finish
    }
}

/// Indices into `mnsi` of every entry upstream of (and including) `target`,
/// per the containment invariant P3.
///
/// Shared by the dissolve planner's `element_count` recompute
/// (SPEC_FULL.md §4.4) and the delineation API's `upstream_basins`
/// (SPEC_FULL.md §4.5), grounded on `original_source/delineation/
/// delineate.py`'s `subset_network`, so the filter is defined exactly once.
pub fn upstream_indices(target: &Mnsi, mnsi: &[Mnsi]) -> Vec<usize> {
    mnsi.iter()
        .enumerate()
        .filter(|(_, m)| m.is_upstream_of(target))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_characterization() {
        let leaf = Mnsi::new(LinkId(1), 4, 5);
        assert!(leaf.is_leaf());
        let internal = Mnsi::new(LinkId(1), 1, 10);
        assert!(!internal.is_leaf());
    }

    #[test]
    fn single_node_tree_boundary_case() {
        // spec §8: single-node tree has MNSI = (id, 1, 2).
        let m = Mnsi::new(LinkId(7), 1, 2);
        assert!(m.is_leaf());
        assert_eq!(m.subtree_bound(), 1);
    }

    #[test]
    fn containment_is_upstream() {
        let root = Mnsi::new(LinkId(50), 1, 10);
        let mid = Mnsi::new(LinkId(30), 3, 8);
        let other_root = Mnsi::new(LinkId(99), 3, 8);

        assert!(mid.is_upstream_of(&root));
        assert!(!root.is_upstream_of(&mid));
        assert!(mid.is_upstream_of(&mid));
        assert!(!other_root.is_upstream_of(&root));
    }

    #[test]
    fn upstream_indices_matches_scenario_one() {
        // Linear chain 10->20->30->40->50 (spec §8 scenario 1, via scenario 6's
        // orientation check): upstream of 30 is {10, 20, 30}.
        let ids = [LinkId(10), LinkId(20), LinkId(30), LinkId(40), LinkId(50)];
        let root = LinkId(50);
        let mnsi = vec![
            Mnsi::new(root, 5, 6),
            Mnsi::new(root, 4, 7),
            Mnsi::new(root, 3, 8),
            Mnsi::new(root, 2, 9),
            Mnsi::new(root, 1, 10),
        ];
        let target = mnsi[2]; // link 30
        let got: Vec<LinkId> = upstream_indices(&target, &mnsi).into_iter().map(|i| ids[i]).collect();
        let mut got = got;
        got.sort();
        assert_eq!(got, vec![LinkId(10), LinkId(20), LinkId(30)]);
    }
}
