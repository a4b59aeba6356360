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

//! Logical column names (spec §6). These are part of the external
//! interface; downstream consumers read them literally, so changing them
//! is a breaking change.

/// Stream network / basin primary id column.
pub const LINK: &str = "LINKNO";
/// Downstream reach id column.
pub const DS_LINK: &str = "DSLINKNO";
/// Upstream-left reach id column.
pub const US_LEFT: &str = "USLINKNO1";
/// Upstream-right reach id column.
pub const US_RIGHT: &str = "USLINKNO2";
/// Basins' synonym for `LINK` as delivered by the source file.
pub const BASIN_STREAM_ID: &str = "streamID";

/// MNSI root id column.
pub const ROOT_ID: &str = "ROOT_ID";
/// MNSI discover-time column.
pub const DISCOVER_TIME: &str = "DISCOVER_TIME";
/// MNSI finish-time column.
pub const FINISH_TIME: &str = "FINISH_TIME";

/// Dissolve-group root id column.
pub const DISSOLVE_ROOT_ID: &str = "DISSOLVE_ROOT_ID";
/// Upstream-element-count column (optional; may be dropped on write).
pub const ELEMENT_COUNT: &str = "ELEMENT_COUNT";

/// Columns dropped on ingest: redundant or constant in the source data.
pub const USELESS_COLUMNS: &[&str] = &["WSNO", "DSNODEID"];

/// The id-bearing fields the ID Rekeyer rewrites, per spec §4.1.
pub const REKEY_FIELDS: &[&str] = &[LINK, DS_LINK, US_LEFT, US_RIGHT];

/// Output table file-name stems (spec §6), formatted as
/// `TDX_{stem}_{region}_01`.
pub const STREAMNET_STEM: &str = "streamnet";
pub const BASINS_MNSI_STEM: &str = "streamreach_basins_mnsi";
pub const STREAMS_NO_BASIN_STEM: &str = "streams_no_basin";

/// The offset multiplier used by the ID Rekeyer (spec §4.1).
pub const REKEY_MULTIPLIER: i64 = 10_000_000;

pub fn output_file_stem(stem: &str, region: u64) -> String {
    format!("TDX_{stem}_{region}_01")
}
