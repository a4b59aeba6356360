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

use crate::link_id::LinkId;
use crate::mnsi::Mnsi;

/// One stream-network reach (spec §3's `StreamReach`), before or after
/// MNSI annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRow {
    pub link_id: LinkId,
    pub ds_link: Option<LinkId>,
    pub us_left: Option<LinkId>,
    pub us_right: Option<LinkId>,
}

/// The stream network as a struct-of-arrays, per Design Note §9.
///
/// `mnsi[i]` is `None` until the MNSI Engine has processed row `i`; every
/// row is guaranteed to have `Some` after a successful `compute_mnsi` call.
#[derive(Debug, Clone, Default)]
pub struct StreamTable {
    pub link_id: Vec<LinkId>,
    pub ds_link: Vec<Option<LinkId>>,
    pub us_left: Vec<Option<LinkId>>,
    pub us_right: Vec<Option<LinkId>>,
    pub mnsi: Vec<Option<Mnsi>>,
}

impl StreamTable {
    pub fn len(&self) -> usize {
        self.link_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.link_id.is_empty()
    }

    pub fn push(&mut self, row: StreamRow) {
        self.link_id.push(row.link_id);
        self.ds_link.push(row.ds_link);
        self.us_left.push(row.us_left);
        self.us_right.push(row.us_right);
        self.mnsi.push(None);
    }

    pub fn row(&self, i: usize) -> StreamRow {
        StreamRow {
            link_id: self.link_id[i],
            ds_link: self.ds_link[i],
            us_left: self.us_left[i],
            us_right: self.us_right[i],
        }
    }

    /// A `link_id -> row index` index, built once and reused by the MNSI
    /// engine and the basin joiner.
    pub fn index(&self) -> HashMap<LinkId, usize> {
        self.link_id
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect()
    }

    /// Row indices of tree roots (`ds_link == None`), spec §4.2 step 1.
    pub fn root_indices(&self) -> Vec<usize> {
        self.ds_link
            .iter()
            .enumerate()
            .filter(|(_, ds)| ds.is_none())
            .map(|(i, _)| i)
            .collect()
    }
}
