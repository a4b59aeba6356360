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

//! External interfaces for the TDX Hydro pipeline (SPEC_FULL.md §6):
//! source traits for the out-of-scope vector-file reader, the HTTP
//! crosswalk client, a minimal WKB geometry codec, and Parquet table I/O.

pub mod crosswalk;
pub mod sink;
pub mod source;
pub mod wkb;

pub use crosswalk::{Crosswalk, CrosswalkSource, HttpCrosswalkSource};
pub use sink::{CompressionKind, ParquetTableReader, ParquetTableWriter};
pub use source::{BasinSource, GeoParquetSource, RawBasinGeometries, StreamNetworkSource};
