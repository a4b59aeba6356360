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

use std::collections::HashMap;

use geo_types::Polygon;

use crate::link_id::LinkId;
use crate::mnsi::Mnsi;

/// One basin polygon, keyed by `link_id`, before or after the basin join
/// and dissolve-group planning.
#[derive(Debug, Clone)]
pub struct BasinRow {
    pub link_id: LinkId,
    pub geometry: Option<Polygon<f64>>,
}

/// The joined, MNSI-annotated, (optionally) dissolve-planned basins table
/// as a struct-of-arrays (spec §3's `Basin`/`DissolveGroup`).
#[derive(Debug, Clone, Default)]
pub struct BasinTable {
    pub link_id: Vec<LinkId>,
    pub geometry: Vec<Option<Polygon<f64>>>,
    pub mnsi: Vec<Option<Mnsi>>,
    pub dissolve_root_id: Vec<Option<LinkId>>,
    pub element_count: Vec<Option<i64>>,
}

impl BasinTable {
    pub fn len(&self) -> usize {
        self.link_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.link_id.is_empty()
    }

    pub fn push(&mut self, link_id: LinkId, geometry: Option<Polygon<f64>>, mnsi: Mnsi) {
        self.link_id.push(link_id);
        self.geometry.push(geometry);
        self.mnsi.push(Some(mnsi));
        self.dissolve_root_id.push(None);
        self.element_count.push(None);
    }

    pub fn index(&self) -> HashMap<LinkId, usize> {
        self.link_id
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect()
    }

    pub fn mnsi_at(&self, i: usize) -> Mnsi {
        self.mnsi[i].expect("basin rows are always MNSI-annotated once joined")
    }
}
