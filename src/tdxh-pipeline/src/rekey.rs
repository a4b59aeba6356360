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

//! ID Rekeyer (SPEC_FULL.md §4.1): lifts per-region reach ids into a single
//! global namespace so ids from different regions never collide.

use tdxh_repr::link_id::LinkId;
use tdxh_repr::schema::REKEY_MULTIPLIER;
use tdxh_repr::{BasinTable, Error, HeaderCrosswalk, RegionCode, Result, StreamTable};

/// A rekeyer bound to one region's header value.
///
/// Resolving the header once at construction (rather than on every call)
/// keeps `rekey_link` infallible and makes "applying twice" an explicit,
/// caller-visible decision — the type itself carries no notion of whether
/// it has already been applied (spec: "Applying twice ... is undefined;
/// callers must guarantee single application").
#[derive(Debug, Clone, Copy)]
pub struct Rekeyer {
    header: i64,
}

impl Rekeyer {
    pub fn new(region: RegionCode, crosswalk: &dyn HeaderCrosswalk) -> Result<Self> {
        let header = crosswalk
            .header_for(region)
            .ok_or(Error::UnknownRegion { region })?;
        Ok(Rekeyer { header })
    }

    /// Header `0` is the identity rekey, used by tests to assert
    /// idempotence (P1/P2 hold trivially).
    pub fn identity() -> Self {
        Rekeyer { header: 0 }
    }

    /// Rewrites a single id field, preserving the `-1`/`None` sentinel
    /// (P1) by construction: `None` simply isn't touched.
    pub fn rekey_link(&self, link: Option<LinkId>) -> Option<LinkId> {
        link.map(|LinkId(id)| LinkId(id + self.header * REKEY_MULTIPLIER))
    }

    /// Rewrites a single id field that is always present (spec: a row's
    /// primary id, or the basins' `streamID` synonym, is never `-1`).
    pub fn rekey_id(&self, link: LinkId) -> LinkId {
        LinkId(link.0 + self.header * REKEY_MULTIPLIER)
    }

    pub fn rekey_stream_table(&self, table: &mut StreamTable) {
        for i in 0..table.len() {
            table.link_id[i] = self.rekey_id(table.link_id[i]);
            table.ds_link[i] = self.rekey_link(table.ds_link[i]);
            table.us_left[i] = self.rekey_link(table.us_left[i]);
            table.us_right[i] = self.rekey_link(table.us_right[i]);
        }
    }

    /// Rekeys the basins' `streamID`-derived `link_id` column (the
    /// "basins' synonym field" from spec §4.1's field list).
    pub fn rekey_basin_table(&self, table: &mut BasinTable) {
        for id in table.link_id.iter_mut() {
            *id = self.rekey_id(*id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdxh_repr::StaticCrosswalk;

    fn crosswalk(region: u64, header: i64) -> StaticCrosswalk {
        let mut map = std::collections::HashMap::new();
        map.insert(RegionCode(region), header);
        StaticCrosswalk(map)
    }

    #[test]
    fn unknown_region_is_fatal() {
        let cw = crosswalk(1, 2);
        let err = Rekeyer::new(RegionCode(999), &cw).unwrap_err();
        assert!(matches!(err, Error::UnknownRegion { .. }));
    }

    #[test]
    fn scenario_three_rekey_example() {
        // spec §8 scenario 3: region 4020024190 -> header 77.
        // LINKNO=12, DSLINKNO=-1, USLINKNO1=13 -> LINKNO=770000012, DSLINKNO=-1, USLINKNO1=770000013.
        let cw = crosswalk(4020024190, 77);
        let rekeyer = Rekeyer::new(RegionCode(4020024190), &cw).unwrap();

        assert_eq!(rekeyer.rekey_id(LinkId(12)), LinkId(770000012));
        assert_eq!(rekeyer.rekey_link(None), None);
        assert_eq!(rekeyer.rekey_link(Some(LinkId(13))), Some(LinkId(770000013)));
    }

    #[test]
    fn identity_header_is_idempotent() {
        let rekeyer = Rekeyer::identity();
        assert_eq!(rekeyer.rekey_id(LinkId(42)), LinkId(42));
        assert_eq!(rekeyer.rekey_link(None), None);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn p1_sentinel_preserved(raw in -1i64..1_000_000i64, header in 0i64..1000i64) {
            let rekeyer = Rekeyer { header };
            let link = LinkId::from_sentinel(raw);
            let rekeyed = rekeyer.rekey_link(link);
            prop_assert_eq!(rekeyed.is_none(), raw == -1);
        }
    }
}
