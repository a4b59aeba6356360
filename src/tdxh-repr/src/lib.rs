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

//! Shared typed data model for the TDX Hydro watershed pipeline.
//!
//! This crate is the leaf dependency the rest of the workspace builds on:
//! the `LinkId`/`RegionCode` newtypes, the struct-of-arrays `StreamTable`/
//! `BasinTable`, the `Mnsi` triple, the column-name registry, and the
//! shared `Error` enum (spec §3, §6, §7).

pub mod basin_table;
pub mod crosswalk;
pub mod error;
pub mod link_id;
pub mod mnsi;
pub mod schema;
pub mod stream_table;

pub use basin_table::{BasinRow, BasinTable};
pub use crosswalk::{HeaderCrosswalk, StaticCrosswalk};
pub use error::{Error, Result};
pub use link_id::{LinkId, RegionCode};
pub use mnsi::{upstream_indices, Mnsi};
pub use stream_table::{StreamRow, StreamTable};
