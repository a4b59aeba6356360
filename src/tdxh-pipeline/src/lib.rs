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

//! ID rekeying, MNSI computation, basin joining, and dissolve-group
//! planning for TDX Hydro regions.
//!
//! These four modules correspond to pipeline stages §4.1–§4.4; each one
//! takes a `tdxh-repr` table and mutates or partitions it in place, so the
//! stage boundaries in this crate mirror the stage boundaries in the
//! written spec.

pub mod dissolve;
pub mod join;
pub mod mnsi;
pub mod rekey;

pub use dissolve::{group_members, plan_dissolve_groups};
pub use join::{join_basins, BasinGeometries, JoinOutput};
pub use mnsi::compute_mnsi;
pub use rekey::Rekeyer;
