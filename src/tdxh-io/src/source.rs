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

//! Source-side external interfaces (SPEC_FULL.md §6).
//!
//! Reading the on-disk vector format (shapefile/GeoPackage) is explicitly
//! out of scope; only the narrow trait boundary the rest of the pipeline
//! depends on is implemented here, grounded on `storage/src/source/
//! generator.rs`'s `SourceReader` trait — a pluggable source behind a
//! narrow interface, with the concrete file-format adapter left to a
//! caller-supplied implementation.

use geo_types::Polygon;

use tdxh_repr::{LinkId, RegionCode, Result, StreamTable};

/// A reader for one region's stream network file.
pub trait StreamNetworkSource {
    fn read_streams(&self, region: RegionCode) -> Result<StreamTable>;
}

/// Basin geometries keyed by `link_id`, as delivered by a vector-file
/// reader, prior to the MNSI join.
#[derive(Debug, Clone, Default)]
pub struct RawBasinGeometries {
    pub link_id: Vec<LinkId>,
    pub geometry: Vec<Polygon<f64>>,
}

/// A reader for one region's basin geometry file.
pub trait BasinSource {
    fn read_basins(&self, region: RegionCode) -> Result<RawBasinGeometries>;
}

/// A concrete `StreamNetworkSource`/`BasinSource` over GeoParquet files —
/// one of the two input formats spec §6 names, and the one this crate
/// already has a columnar reader and WKB decoder for. GeoPackage input is
/// the other named format; parsing it is out of scope (spec §1).
pub struct GeoParquetSource {
    streamnet_path: std::path::PathBuf,
    basins_path: std::path::PathBuf,
}

impl GeoParquetSource {
    pub fn new(streamnet_path: std::path::PathBuf, basins_path: std::path::PathBuf) -> Self {
        GeoParquetSource { streamnet_path, basins_path }
    }
}

impl StreamNetworkSource for GeoParquetSource {
    fn read_streams(&self, _region: RegionCode) -> Result<StreamTable> {
        crate::sink::ParquetTableReader::read_streams(&self.streamnet_path)
    }
}

impl BasinSource for GeoParquetSource {
    fn read_basins(&self, _region: RegionCode) -> Result<RawBasinGeometries> {
        crate::sink::ParquetTableReader::read_basin_geometries(&self.basins_path)
    }
}
