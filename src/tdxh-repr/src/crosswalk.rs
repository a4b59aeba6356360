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

use crate::link_id::RegionCode;

/// The region-to-header lookup the ID Rekeyer depends on (spec §4.1).
///
/// This is the narrow seam between the rekeyer and whatever owns the
/// crosswalk cache (`tdxh-io::Crosswalk`), so `tdxh-pipeline` never needs
/// to know how the header table was populated.
pub trait HeaderCrosswalk {
    fn header_for(&self, region: RegionCode) -> Option<i64>;
}

/// A crosswalk backed by a plain map, for tests and small deployments.
#[derive(Debug, Clone, Default)]
pub struct StaticCrosswalk(pub std::collections::HashMap<RegionCode, i64>);

impl HeaderCrosswalk for StaticCrosswalk {
    fn header_for(&self, region: RegionCode) -> Option<i64> {
        self.0.get(&region).copied()
    }
}
