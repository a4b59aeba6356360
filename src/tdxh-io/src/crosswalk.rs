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

//! ID-header crosswalk (SPEC_FULL.md §4.1, §9): a lazily-initialized,
//! process-wide cache fetched once over HTTP, owned by an instance rather
//! than a module-global (Design Note "Global state").

use std::collections::HashMap;

use once_cell::sync::OnceCell;

use tdxh_repr::{Error, HeaderCrosswalk, RegionCode, Result};

const DEFAULT_CROSSWALK_URL: &str =
    "https://geoglows-v2.s3-us-west-2.amazonaws.com/tdxhydro-processing/tdx_header_numbers.json";

/// The external collaborator that actually fetches the header table.
pub trait CrosswalkSource {
    fn fetch(&self) -> Result<HashMap<RegionCode, i64>>;
}

/// Blocking HTTP fetch of the well-known GEOGLOWS header table.
pub struct HttpCrosswalkSource {
    url: String,
}

impl HttpCrosswalkSource {
    pub fn new() -> Self {
        HttpCrosswalkSource { url: DEFAULT_CROSSWALK_URL.to_string() }
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        HttpCrosswalkSource { url: url.into() }
    }
}

impl Default for HttpCrosswalkSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosswalkSource for HttpCrosswalkSource {
    fn fetch(&self) -> Result<HashMap<RegionCode, i64>> {
        let text = reqwest::blocking::get(&self.url)
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| Error::SchemaMismatch(format!("crosswalk fetch failed: {e}")))?;
        let body: HashMap<String, i64> = serde_json::from_str(&text)
            .map_err(|e| Error::SchemaMismatch(format!("malformed crosswalk JSON: {e}")))?;

        body.into_iter()
            .map(|(k, v)| {
                k.parse::<u64>()
                    .map(|region| (RegionCode(region), v))
                    .map_err(|e| Error::SchemaMismatch(format!("bad region code {k:?}: {e}")))
            })
            .collect()
    }
}

/// Process-wide crosswalk cache: fetched once, safe under concurrent
/// first-touch (spec §5), passed by reference into every `Rekeyer`.
pub struct Crosswalk {
    source: Box<dyn CrosswalkSource + Send + Sync>,
    cache: OnceCell<HashMap<RegionCode, i64>>,
}

impl Crosswalk {
    pub fn new(source: impl CrosswalkSource + Send + Sync + 'static) -> Self {
        Crosswalk { source: Box::new(source), cache: OnceCell::new() }
    }

    fn table(&self) -> &HashMap<RegionCode, i64> {
        self.cache.get_or_init(|| match self.source.fetch() {
            Ok(table) => table,
            Err(err) => {
                tracing::error!(%err, "crosswalk fetch failed, falling back to an empty table");
                HashMap::new()
            }
        })
    }
}

impl HeaderCrosswalk for Crosswalk {
    fn header_for(&self, region: RegionCode) -> Option<i64> {
        self.table().get(&region).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSource(HashMap<RegionCode, i64>);

    impl CrosswalkSource for StaticSource {
        fn fetch(&self) -> Result<HashMap<RegionCode, i64>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn caches_after_first_touch() {
        let mut table = HashMap::new();
        table.insert(RegionCode(4020024190), 77);
        let crosswalk = Crosswalk::new(StaticSource(table));

        assert_eq!(crosswalk.header_for(RegionCode(4020024190)), Some(77));
        assert_eq!(crosswalk.header_for(RegionCode(999)), None);
        // Second lookup reuses the cached table rather than re-fetching.
        assert_eq!(crosswalk.header_for(RegionCode(4020024190)), Some(77));
    }
}
