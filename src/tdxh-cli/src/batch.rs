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

//! Per-region batch driver (SPEC_FULL.md §5, §7): runs the full
//! rekey -> mnsi -> join -> dissolve -> write pipeline for one region,
//! and `run_batch` fans that out across regions with failure isolation.

use std::path::{Path, PathBuf};

use tdxh_io::{BasinSource, CompressionKind, Crosswalk, GeoParquetSource, ParquetTableWriter, StreamNetworkSource};
use tdxh_pipeline::{compute_mnsi, join_basins, plan_dissolve_groups, BasinGeometries, Rekeyer};
use tdxh_repr::schema::{output_file_stem, BASINS_MNSI_STEM, STREAMNET_STEM, STREAMS_NO_BASIN_STEM};
use tdxh_repr::{HeaderCrosswalk, RegionCode, Result};

use crate::select::select_region_files;

pub struct DissolveThresholds {
    pub max_elements: i64,
    pub min_elements: i64,
}

/// Runs one region end to end, writing its three output tables.
pub fn run_region(
    input_dir: &Path,
    output_dir: &Path,
    region: RegionCode,
    crosswalk: &dyn HeaderCrosswalk,
    thresholds: &DissolveThresholds,
) -> Result<()> {
    let files = select_region_files(input_dir, region)?;
    let source = GeoParquetSource::new(files.streamnet, files.basins);

    let rekeyer = Rekeyer::new(region, crosswalk)?;

    let mut streams = source.read_streams(region)?;
    rekeyer.rekey_stream_table(&mut streams);
    compute_mnsi(&mut streams)?;

    let raw_basins = source.read_basins(region)?;
    let basins = BasinGeometries {
        link_id: raw_basins.link_id.into_iter().map(|id| rekeyer.rekey_id(id)).collect(),
        geometry: raw_basins.geometry,
    };

    let mut joined = join_basins(&streams, &basins)?;
    plan_dissolve_groups(&mut joined.basins_mnsi, thresholds.max_elements, thresholds.min_elements)?;

    let writer = ParquetTableWriter::new(CompressionKind::Zstd);
    write_region_outputs(&writer, output_dir, region, &streams, &joined)?;

    tracing::info!(
        region = %region,
        basins = joined.basins_mnsi.len(),
        orphans = joined.streams_no_basin.len(),
        "region processed"
    );
    Ok(())
}

fn output_path(output_dir: &Path, stem: &str, region: RegionCode) -> PathBuf {
    output_dir.join(format!("{}.parquet", output_file_stem(stem, region.0)))
}

/// Writes all three region outputs, or none at all (SPEC_FULL.md §7: no
/// partial outputs for a failed region). Each table is written to a `.tmp`
/// sibling first; only once every write has succeeded are the three
/// renamed into their final paths. If any write fails, the `.tmp` files
/// produced so far are removed before the error propagates, and no final
/// path is ever touched.
fn write_region_outputs(
    writer: &ParquetTableWriter,
    output_dir: &Path,
    region: RegionCode,
    streams: &tdxh_repr::StreamTable,
    joined: &tdxh_pipeline::JoinOutput,
) -> Result<()> {
    let targets = [
        output_path(output_dir, STREAMNET_STEM, region),
        output_path(output_dir, BASINS_MNSI_STEM, region),
        output_path(output_dir, STREAMS_NO_BASIN_STEM, region),
    ];
    let tmp_paths: Vec<PathBuf> = targets.iter().map(|p| p.with_extension("parquet.tmp")).collect();

    let result = (|| -> Result<()> {
        writer.write_streams(&tmp_paths[0], streams)?;
        writer.write_basins(&tmp_paths[1], &joined.basins_mnsi)?;
        writer.write_streams(&tmp_paths[2], &joined.streams_no_basin)?;
        Ok(())
    })();

    if let Err(err) = result {
        for tmp in &tmp_paths {
            let _ = std::fs::remove_file(tmp);
        }
        return Err(err);
    }

    for (tmp, target) in tmp_paths.iter().zip(targets.iter()) {
        std::fs::rename(tmp, target).map_err(tdxh_repr::Error::Io)?;
    }
    Ok(())
}

/// Per-region outcomes for one invocation of the batch command.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<RegionCode>,
    pub failed: Vec<(RegionCode, String)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Processes `regions` with one thread per region, bounded by `jobs`
/// (spec §5: regions are independent; no shared mutable state besides the
/// read-only crosswalk).
pub fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    regions: &[RegionCode],
    crosswalk: &Crosswalk,
    thresholds: &DissolveThresholds,
    jobs: usize,
) -> BatchReport {
    let mut report = BatchReport::default();

    for chunk in regions.chunks(jobs.max(1)) {
        let outcomes: Vec<(RegionCode, Result<()>)> = std::thread::scope(|scope| {
            let handles: Vec<_> = chunk
                .iter()
                .map(|&region| {
                    scope.spawn(move || (region, run_region(input_dir, output_dir, region, crosswalk, thresholds)))
                })
                .collect();
            handles.into_iter().map(|h| h.join().expect("region thread panicked")).collect()
        });

        for (region, outcome) in outcomes {
            match outcome {
                Ok(()) => report.succeeded.push(region),
                Err(err) => {
                    tracing::error!(region = %region, %err, "region failed");
                    report.failed.push((region, err.to_string()));
                }
            }
        }
    }

    report
}
