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

//! Delineation API (SPEC_FULL.md §4.5): point-in-basin lookup, upstream
//! subset, and watershed boundary union.
//!
//! Grounded on `original_source/delineation/delineate.py`: `linkno_of_point`
//! is its point-in-polygon scan, `upstream_basins` is its
//! `subset_network` (reused here as `tdxh_repr::upstream_indices`, the one
//! shared containment filter — see the dissolve planner for the other
//! caller), and `watershed_boundary` is its final dissolve-and-union step.

use geo::{Area, BooleanOps, Contains};
use geo_types::{MultiPolygon, Point, Polygon};

use tdxh_repr::{upstream_indices, BasinTable, Error, LinkId, Result};

/// Finds the basin containing `(lat, lon)` and returns its `link_id`.
///
/// A linear scan over `basins`: a region's basin count is in the
/// thousands, not the scale that would justify building and maintaining
/// an R-tree over it.
pub fn linkno_of_point(basins: &BasinTable, lat: f64, lon: f64) -> Result<LinkId> {
    let point = Point::new(lon, lat);
    for i in 0..basins.len() {
        if let Some(geometry) = &basins.geometry[i] {
            if geometry.contains(&point) {
                return Ok(basins.link_id[i]);
            }
        }
    }
    Err(Error::PointNotInAnyBasin { lat, lon })
}

/// Every basin upstream of (and including) `link_id`, by MNSI containment.
pub fn upstream_basins(basins: &BasinTable, link_id: LinkId) -> Result<Vec<LinkId>> {
    let index = basins.index();
    let &target_idx = index.get(&link_id).ok_or(Error::UnknownLink(link_id))?;
    let target = basins.mnsi_at(target_idx);
    let mnsi: Vec<_> = (0..basins.len()).map(|i| basins.mnsi_at(i)).collect();
    let upstream = upstream_indices(&target, &mnsi);
    Ok(upstream.into_iter().map(|i| basins.link_id[i]).collect())
}

/// Unions the geometries of `subset` into a single watershed boundary.
///
/// Folds pairwise with [`BooleanOps::union`]. The non-overlap precondition
/// (spec §4.5) means every pair unioned here is interior-disjoint; in
/// debug builds the first pair is checked against that assumption rather
/// than trusted blindly.
pub fn watershed_boundary(basins: &BasinTable, subset: &[LinkId]) -> Result<MultiPolygon<f64>> {
    let index = basins.index();
    let mut geometries = Vec::with_capacity(subset.len());
    for &id in subset {
        let &i = index.get(&id).ok_or(Error::UnknownLink(id))?;
        let geometry = basins.geometry[i]
            .clone()
            .ok_or_else(|| Error::SchemaMismatch(format!("basin {id} has no geometry")))?;
        geometries.push(geometry);
    }

    let Some((first, rest)) = geometries.split_first() else {
        return Ok(MultiPolygon::new(Vec::new()));
    };

    #[cfg(debug_assertions)]
    if let Some(second) = rest.first() {
        let overlap = first.intersection(second).unsigned_area();
        debug_assert!(overlap < 1e-9, "non-overlap precondition violated: overlap area {overlap}");
    }

    let mut union: MultiPolygon<f64> = MultiPolygon::new(vec![first.clone()]);
    for geometry in rest {
        let next = MultiPolygon::new(vec![geometry.clone()]);
        union = union.union(&next);
    }

    tracing::debug!(basins = subset.len(), "unioned watershed boundary");
    Ok(union)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdxh_repr::Mnsi;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        Polygon::new(
            geo_types::LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]),
            vec![],
        )
    }

    fn sample_basins() -> BasinTable {
        let mut t = BasinTable::default();
        let root = LinkId(30);
        t.push(LinkId(10), Some(square(0.0, 0.0, 1.0, 1.0)), Mnsi::new(root, 2, 3));
        t.push(LinkId(20), Some(square(1.0, 0.0, 2.0, 1.0)), Mnsi::new(root, 4, 5));
        t.push(LinkId(30), Some(square(0.0, 0.0, 2.0, 1.0)), Mnsi::new(root, 1, 6));
        t
    }

    #[test]
    fn point_lookup_finds_containing_basin() {
        let basins = sample_basins();
        let found = linkno_of_point(&basins, 0.5, 0.5).unwrap();
        assert_eq!(found, LinkId(10));
    }

    #[test]
    fn point_outside_all_basins_errors() {
        let basins = sample_basins();
        let err = linkno_of_point(&basins, 99.0, 99.0).unwrap_err();
        assert!(matches!(err, Error::PointNotInAnyBasin { .. }));
    }

    #[test]
    fn upstream_basins_of_leaf_is_itself() {
        let basins = sample_basins();
        let mut up = upstream_basins(&basins, LinkId(10)).unwrap();
        up.sort();
        assert_eq!(up, vec![LinkId(10)]);
    }

    #[test]
    fn upstream_basins_of_root_is_whole_tree() {
        let basins = sample_basins();
        let mut up = upstream_basins(&basins, LinkId(30)).unwrap();
        up.sort();
        assert_eq!(up, vec![LinkId(10), LinkId(20), LinkId(30)]);
    }

    #[test]
    fn unknown_link_errors() {
        let basins = sample_basins();
        let err = upstream_basins(&basins, LinkId(999)).unwrap_err();
        assert!(matches!(err, Error::UnknownLink(LinkId(999))));
    }

    #[test]
    fn boundary_union_covers_both_squares() {
        let basins = sample_basins();
        let boundary = watershed_boundary(&basins, &[LinkId(10), LinkId(20)]).unwrap();
        let area: f64 = boundary.unsigned_area();
        assert!((area - 2.0).abs() < 1e-9);
    }

    #[test]
    fn empty_subset_yields_empty_boundary() {
        let basins = sample_basins();
        let boundary = watershed_boundary(&basins, &[]).unwrap();
        assert!(boundary.0.is_empty());
    }
}
