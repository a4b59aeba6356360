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

//! Region input file selection (SPEC_FULL.md §9's resolved Open Question
//! on `select_tdx_files`'s undefined zero-or-multiple-match behavior).

use std::path::{Path, PathBuf};

use tdxh_repr::{Error, RegionCode, Result};

/// The two input files for one region, matched by filename substring.
#[derive(Debug)]
pub struct RegionFiles {
    pub streamnet: PathBuf,
    pub basins: PathBuf,
}

pub fn select_region_files(input_dir: &Path, region: RegionCode) -> Result<RegionFiles> {
    Ok(RegionFiles {
        streamnet: select_one(input_dir, region, "streamnet")?,
        basins: select_one(input_dir, region, "basins")?,
    })
}

fn select_one(input_dir: &Path, region: RegionCode, kind: &'static str) -> Result<PathBuf> {
    let needle = region.0.to_string();
    let matches: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name.contains(kind) && name.contains(&needle))
        })
        .collect();

    match matches.len() {
        1 => Ok(matches.into_iter().next().unwrap()),
        count => Err(Error::AmbiguousInputs { region, kind, count }),
    }
}

/// Scans `input_dir` for every region code implied by its streamnet
/// filenames (`--all`), per `original_source/batch_process.py`'s
/// `get_tdx_regions`.
pub fn scan_regions(input_dir: &Path) -> Result<Vec<RegionCode>> {
    let mut regions: Vec<RegionCode> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_owned))
        .filter(|name| name.contains("streamnet"))
        .filter_map(|name| {
            name.split(|c: char| !c.is_ascii_digit())
                .filter(|segment| segment.len() >= 8)
                .find_map(|segment| segment.parse::<u64>().ok())
                .map(RegionCode)
        })
        .collect();
    regions.sort();
    regions.dedup();
    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn finds_exactly_one_match_per_kind() {
        let dir = std::env::temp_dir().join(format!("tdxh-select-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        touch(&dir, "TDX_streamnet_4020024190_01.parquet");
        touch(&dir, "TDX_streamreach_basins_4020024190_01.parquet");

        let files = select_region_files(&dir, RegionCode(4020024190)).unwrap();
        assert!(files.streamnet.to_string_lossy().contains("streamnet"));
        assert!(files.basins.to_string_lossy().contains("basins"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn zero_matches_is_ambiguous() {
        let dir = std::env::temp_dir().join(format!("tdxh-select-empty-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let err = select_region_files(&dir, RegionCode(1)).unwrap_err();
        assert!(matches!(err, Error::AmbiguousInputs { count: 0, .. }));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn multiple_matches_is_ambiguous() {
        let dir = std::env::temp_dir().join(format!("tdxh-select-dup-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        touch(&dir, "TDX_streamnet_4020024190_01.parquet");
        touch(&dir, "TDX_streamnet_4020024190_02.parquet");
        touch(&dir, "TDX_streamreach_basins_4020024190_01.parquet");

        let err = select_region_files(&dir, RegionCode(4020024190)).unwrap_err();
        assert!(matches!(err, Error::AmbiguousInputs { count: 2, kind: "streamnet", .. }));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn scan_regions_finds_all_codes() {
        let dir = std::env::temp_dir().join(format!("tdxh-select-scan-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        touch(&dir, "TDX_streamnet_4020024190_01.parquet");
        touch(&dir, "TDX_streamnet_4020006940_01.parquet");

        let regions = scan_regions(&dir).unwrap();
        assert_eq!(regions, vec![RegionCode(4020006940), RegionCode(4020024190)]);

        std::fs::remove_dir_all(&dir).ok();
    }
}
