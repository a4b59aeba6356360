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

//! Dissolve Planner (SPEC_FULL.md §4.4): greedy top-down grouping of basins
//! into contiguous upstream chunks sized within `[min_elements,
//! max_elements]`, to amortize polygon-union cost at query time.
//!
//! Grounded on the teacher's `persist-client/src/internal/compact.rs`:
//! both are a greedy, size-bounded grouping pass over a working set that
//! must make monotonic progress or relax its threshold. Mutation is kept
//! to two auxiliary arrays (`dissolve_root_id`, `element_count`),
//! separate from the immutable MNSI arrays they derive from, per Design
//! Note §9 ("In-place mutation of the dissolve planner").

use tdxh_repr::{BasinTable, Error, LinkId, Result};

const MIN_ELEMENTS_DECREMENT: i64 = 25;

/// Plans dissolve groups over `table`, setting `dissolve_root_id` (and
/// `element_count`, kept for callers that want it — spec §6 notes the
/// column "may be dropped" on write).
pub fn plan_dissolve_groups(table: &mut BasinTable, max_elements: i64, min_elements: i64) -> Result<()> {
    if min_elements < 2 {
        return Err(Error::ValueError { min_elements });
    }

    for i in 0..table.len() {
        table.element_count[i] = Some(table.mnsi_at(i).subtree_bound());
        table.dissolve_root_id[i] = None;
    }

    let mut min_cur = min_elements;
    loop {
        let ungrouped: Vec<usize> = ungrouped_indices(table);

        let any_over_max = ungrouped
            .iter()
            .any(|&i| table.element_count[i].unwrap() > max_elements);
        if !any_over_max {
            break;
        }
        if min_cur < 2 {
            // Decayed past the floor with basins still outside the window;
            // concede (spec §4.4 Guarantees: dissolve_root_id stays null).
            tracing::warn!(
                remaining = ungrouped.len(),
                "dissolve planner conceded: min_elements decayed below 2"
            );
            break;
        }

        match find_candidate(table, &ungrouped, max_elements, min_cur) {
            Some(x) => {
                tag_group(table, x);
                recompute_element_counts(table);
                min_cur = min_elements;
            }
            None => {
                min_cur -= MIN_ELEMENTS_DECREMENT;
                tracing::debug!(new_min = min_cur, "no eligible basin in window, relaxing threshold");
            }
        }
    }

    Ok(())
}

fn ungrouped_indices(table: &BasinTable) -> Vec<usize> {
    (0..table.len())
        .filter(|&i| table.dissolve_root_id[i].is_none())
        .collect()
}

/// Step 1: among ungrouped basins with `element_count <= max_elements`,
/// the one with the largest `element_count` that is also `> min_elements`.
fn find_candidate(table: &BasinTable, ungrouped: &[usize], max_elements: i64, min_elements: i64) -> Option<usize> {
    ungrouped
        .iter()
        .copied()
        .filter(|&i| {
            let c = table.element_count[i].unwrap();
            c <= max_elements && c > min_elements
        })
        .max_by_key(|&i| (table.element_count[i].unwrap(), std::cmp::Reverse(i)))
}

/// Step 2: tag every ungrouped basin upstream of (and including) `x` with
/// `dissolve_root_id = x.link_id`.
fn tag_group(table: &mut BasinTable, x: usize) {
    let target = table.mnsi_at(x);
    let root_link = table.link_id[x];
    for i in 0..table.len() {
        if table.dissolve_root_id[i].is_none() && table.mnsi_at(i).is_upstream_of(&target) {
            table.dissolve_root_id[i] = Some(root_link);
        }
    }
}

/// Step 3: recompute `element_count` for the still-ungrouped set.
fn recompute_element_counts(table: &mut BasinTable) {
    let ungrouped = ungrouped_indices(table);
    for &i in &ungrouped {
        let target = table.mnsi_at(i);
        let count = ungrouped
            .iter()
            .filter(|&&j| table.mnsi_at(j).is_upstream_of(&target))
            .count();
        table.element_count[i] = Some(count as i64);
    }
}

/// P7/P8 helper for callers/tests: the set of `link_id`s in the group
/// rooted at `root`.
pub fn group_members(table: &BasinTable, root: LinkId) -> Vec<LinkId> {
    (0..table.len())
        .filter(|&i| table.dissolve_root_id[i] == Some(root))
        .map(|i| table.link_id[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdxh_repr::Mnsi;

    fn chain_basins(n: i64) -> BasinTable {
        // A linear chain of `n` reaches, root at the end (largest discover
        // span), mirroring spec §8 scenario 5's 10-chain.
        let mut t = BasinTable::default();
        for k in 1..=n {
            let discover = (n - k + 1) as i32;
            let finish = (n + k) as i32;
            t.push(LinkId(k * 10), None, Mnsi::new(LinkId(n * 10), discover, finish));
        }
        t
    }

    #[test]
    fn value_error_on_small_min_elements() {
        let mut t = chain_basins(3);
        let err = plan_dissolve_groups(&mut t, 10, 1).unwrap_err();
        assert!(matches!(err, Error::ValueError { min_elements: 1 }));
    }

    #[test]
    fn scenario_five_ten_chain_max_four_min_two() {
        let mut t = chain_basins(10);
        plan_dissolve_groups(&mut t, 4, 2).unwrap();

        // Every reach ends up grouped, no group exceeds 4.
        assert!(t.dissolve_root_id.iter().all(Option::is_some));
        let mut groups: std::collections::HashMap<LinkId, usize> = std::collections::HashMap::new();
        for root in t.dissolve_root_id.iter().flatten() {
            *groups.entry(*root).or_default() += 1;
        }
        assert!(groups.values().all(|&size| size <= 4));

        // P7: the root of each group is itself tagged with that root.
        for (&root, _) in &groups {
            let idx = t.link_id.iter().position(|&id| id == root).unwrap();
            assert_eq!(t.dissolve_root_id[idx], Some(root));
        }
    }

    #[test]
    fn min_equals_max_still_progresses_or_concedes() {
        let mut t = chain_basins(4);
        plan_dissolve_groups(&mut t, 2, 2).unwrap();
        // No group should ever exceed max_elements even at the degenerate
        // min==max boundary case (spec §8 boundary cases).
        let mut groups: std::collections::HashMap<LinkId, usize> = std::collections::HashMap::new();
        for root in t.dissolve_root_id.iter().flatten() {
            *groups.entry(*root).or_default() += 1;
        }
        assert!(groups.values().all(|&size| size <= 2));
    }

    #[test]
    fn p8_each_basin_at_most_one_group() {
        let mut t = chain_basins(12);
        plan_dissolve_groups(&mut t, 4, 2).unwrap();
        // dissolve_root_id is a single Option<LinkId> per row by
        // construction, so "at most one group" holds by the type itself;
        // this test just exercises the full run without panicking and
        // checks totals add up.
        let tagged = t.dissolve_root_id.iter().filter(|r| r.is_some()).count();
        assert!(tagged <= t.len());
    }
}
