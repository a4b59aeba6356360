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

use crate::link_id::{LinkId, RegionCode};

/// The error kinds produced by the core pipeline (spec §7).
///
/// Library crates (`tdxh-repr`, `tdxh-pipeline`, `tdxh-delineate`,
/// `tdxh-io`) return this type directly; only `tdxh-cli`, the binary
/// boundary, collapses it into `anyhow::Error` for reporting.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no crosswalk header entry for region {region}")]
    UnknownRegion { region: RegionCode },

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("topology cycle detected at link {link_id}")]
    TopologyCycle { link_id: LinkId },

    #[error("dangling reference: link {link_id} field {field} points to an unknown reach")]
    DanglingReference { link_id: LinkId, field: &'static str },

    #[error("min_elements must be at least 2, got {min_elements}")]
    ValueError { min_elements: i64 },

    #[error("no basin contains the point ({lat}, {lon})")]
    PointNotInAnyBasin { lat: f64, lon: f64 },

    #[error("ambiguous input files for region {region}: found {count} {kind} files, expected exactly 1")]
    AmbiguousInputs {
        region: RegionCode,
        kind: &'static str,
        count: usize,
    },

    #[error("link {0} not found in table")]
    UnknownLink(LinkId),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
