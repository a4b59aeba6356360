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

//! MNSI Engine (SPEC_FULL.md §4.2): iterative DFS over the forest of stream
//! network roots, assigning every reach a `(root, discover, finish)` triple.
//!
//! Recursion is emulated with an explicit stack per spec §4.2 and Design
//! Note §9 — watersheds can chain tens of thousands of reaches deep, which
//! a recursive traversal would blow the call stack on.

use tdxh_repr::{Error, Mnsi, Result, StreamTable};

/// Computes MNSI for every reach in `table`, annotating `table.mnsi` in
/// place.
///
/// Child-visit order (the resolved Open Question in spec §9): `us_right`
/// is pushed before `us_left`, so `us_left`'s subtree is discovered first.
pub fn compute_mnsi(table: &mut StreamTable) -> Result<()> {
    let index = table.index();
    let len = table.len();
    let mut discover: Vec<Option<i32>> = vec![None; len];
    let mut finish: Vec<Option<i32>> = vec![None; len];
    let mut root: Vec<Option<tdxh_repr::LinkId>> = vec![None; len];

    for root_idx in table.root_indices() {
        let root_id = table.link_id[root_idx];
        let mut clock: i32 = 1;
        let mut stack: Vec<usize> = vec![root_idx];

        while let Some(&n) = stack.last() {
            if discover[n].is_none() {
                root[n] = Some(root_id);
                discover[n] = Some(clock);
                clock += 1;

                if let Some(right) = table.us_right[n] {
                    let child = *index.get(&right).ok_or(Error::DanglingReference {
                        link_id: table.link_id[n],
                        field: "USLINKNO2",
                    })?;
                    stack.push(child);
                }
                if let Some(left) = table.us_left[n] {
                    let child = *index.get(&left).ok_or(Error::DanglingReference {
                        link_id: table.link_id[n],
                        field: "USLINKNO1",
                    })?;
                    stack.push(child);
                }
            } else if finish[n].is_none() {
                finish[n] = Some(clock);
                stack.pop();
            } else {
                return Err(Error::TopologyCycle { link_id: table.link_id[n] });
            }
        }
    }

    for i in 0..len {
        let (Some(r), Some(d), Some(f)) = (root[i], discover[i], finish[i]) else {
            // Unreachable from any root: the connected component containing
            // this reach has no `ds_link == -1` member, which can only
            // happen if it forms a cycle.
            return Err(Error::TopologyCycle { link_id: table.link_id[i] });
        };
        table.mnsi[i] = Some(Mnsi::new(r, d, f));
    }

    tracing::debug!(reaches = len, "computed MNSI for stream network");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdxh_repr::{LinkId, StreamRow};

    fn row(id: i64, ds: i64, ul: i64, ur: i64) -> StreamRow {
        StreamRow {
            link_id: LinkId(id),
            ds_link: LinkId::from_sentinel(ds),
            us_left: LinkId::from_sentinel(ul),
            us_right: LinkId::from_sentinel(ur),
        }
    }

    #[test]
    fn single_node_tree() {
        let mut t = StreamTable::default();
        t.push(row(7, -1, -1, -1));
        compute_mnsi(&mut t).unwrap();
        let m = t.mnsi[0].unwrap();
        assert_eq!((m.root_id, m.discover, m.finish), (LinkId(7), 1, 2));
        assert!(m.is_leaf());
    }

    #[test]
    fn linear_chain_of_five_scenario_one() {
        // spec §8 scenario 1: 10->20->30->40->50 (us_left chain only).
        let mut t = StreamTable::default();
        t.push(row(10, 20, -1, -1));
        t.push(row(20, 30, 10, -1));
        t.push(row(30, 40, 20, -1));
        t.push(row(40, 50, 30, -1));
        t.push(row(50, -1, 40, -1));
        compute_mnsi(&mut t).unwrap();

        let idx = t.index();
        let discover_of = |id: i64| t.mnsi[idx[&LinkId(id)]].unwrap().discover;
        let finish_of = |id: i64| t.mnsi[idx[&LinkId(id)]].unwrap().finish;

        assert_eq!(discover_of(50), 1);
        assert_eq!(discover_of(40), 2);
        assert_eq!(discover_of(30), 3);
        assert_eq!(discover_of(20), 4);
        assert_eq!(discover_of(10), 5);

        assert_eq!(finish_of(10), 6);
        assert_eq!(finish_of(20), 7);
        assert_eq!(finish_of(30), 8);
        assert_eq!(finish_of(40), 9);
        assert_eq!(finish_of(50), 10);
    }

    #[test]
    fn balanced_binary_tree_of_three_scenario_two() {
        let mut t = StreamTable::default();
        t.push(row(1, -1, 2, 3)); // R, us_left=A(2), us_right=B(3)
        t.push(row(2, 1, -1, -1)); // A leaf
        t.push(row(3, 1, -1, -1)); // B leaf
        compute_mnsi(&mut t).unwrap();

        let idx = t.index();
        let r = t.mnsi[idx[&LinkId(1)]].unwrap();
        assert_eq!((r.discover, r.finish), (1, 6));

        // us_right pushed first, so us_left (A, id=2) is discovered first.
        let a = t.mnsi[idx[&LinkId(2)]].unwrap();
        let b = t.mnsi[idx[&LinkId(3)]].unwrap();
        assert_eq!((a.discover, a.finish), (2, 3));
        assert_eq!((b.discover, b.finish), (4, 5));
    }

    #[test]
    fn dangling_reference_is_reported() {
        let mut t = StreamTable::default();
        t.push(row(1, -1, 99, -1));
        let err = compute_mnsi(&mut t).unwrap_err();
        assert!(matches!(err, Error::DanglingReference { field: "USLINKNO1", .. }));
    }

    #[test]
    fn cycle_is_detected() {
        let mut t = StreamTable::default();
        // Two nodes pointing upstream at each other with no root among them.
        t.push(row(1, 2, -1, -1));
        t.push(row(2, 1, -1, -1));
        let err = compute_mnsi(&mut t).unwrap_err();
        assert!(matches!(err, Error::TopologyCycle { .. }));
    }

    #[test]
    fn back_edge_cycle_is_detected_mid_traversal() {
        let mut t = StreamTable::default();
        // R is a genuine root; A is discovered from it, then B's us_left
        // points back to A while A is still on the stack, which means A is
        // pushed a second time and finished twice before its own pop.
        t.push(row(100, -1, 200, -1)); // R, us_left = A
        t.push(row(200, 100, 300, -1)); // A, ds=R, us_left = B
        t.push(row(300, 200, 200, -1)); // B, ds=A, us_left = A (back-edge)
        let err = compute_mnsi(&mut t).unwrap_err();
        assert!(matches!(err, Error::TopologyCycle { link_id: LinkId(200) }));
    }
}
