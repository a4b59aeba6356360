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

use std::fmt;

/// A reach/basin identifier.
///
/// Internally topology edges are modeled as `Option<LinkId>` rather than
/// carrying the `-1` "no link" sentinel through arithmetic; the sentinel is
/// applied only at the storage boundary (see `tdxh-io`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkId(pub i64);

impl LinkId {
    pub const NONE_SENTINEL: i64 = -1;

    /// Reads a raw column value, treating `-1` as "no link".
    pub fn from_sentinel(raw: i64) -> Option<LinkId> {
        if raw == Self::NONE_SENTINEL {
            None
        } else {
            Some(LinkId(raw))
        }
    }

    /// Writes an optional link back to its sentinel-encoded column value.
    pub fn to_sentinel(value: Option<LinkId>) -> i64 {
        match value {
            Some(LinkId(id)) => id,
            None => Self::NONE_SENTINEL,
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for LinkId {
    fn from(value: i64) -> Self {
        LinkId(value)
    }
}

/// The 10-digit HydroBASINS Level 2 region code used to partition TDX Hydro
/// files and keyed into the header crosswalk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionCode(pub u64);

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RegionCode {
    fn from(value: u64) -> Self {
        RegionCode(value)
    }
}
