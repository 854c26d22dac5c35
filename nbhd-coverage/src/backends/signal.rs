use std::path::Path;

use log::error;

use nbhd_core::models::RegionTable;

use crate::deadline::Deadline;
use crate::errors::{CoverageError, Result};
use crate::tools::SignalReader;

///
/// Coverage from a continuous-signal track: the mean over `[start, max(end, start + 1))` times
/// the effective region length. Regions without any signal count 0. A failed query is logged
/// with its coordinates and returned, never treated as 0.
///
pub fn count_signal(
    reader: &dyn SignalReader,
    track: &Path,
    table: &RegionTable,
    deadline: Deadline,
) -> Result<Vec<f64>> {
    let mut source = reader.open(track)?;
    let mut counts = Vec::with_capacity(table.len());

    for region in table.regions.iter() {
        if deadline.expired() {
            return Err(CoverageError::Timeout(track.to_path_buf()));
        }
        let end = region.query_end();
        let mean = source
            .mean(&region.chr, region.start, end)
            .map_err(|e| {
                error!(
                    "Signal query failed for {}:{}-{} in {}: {}",
                    region.chr,
                    region.start,
                    end,
                    track.display(),
                    e
                );
                CoverageError::SignalQuery {
                    track: track.to_path_buf(),
                    chr: region.chr.clone(),
                    start: region.start,
                    end,
                    msg: e.to_string(),
                }
            })?;
        counts.push(mean.unwrap_or(0.0) * region.effective_length() as f64);
    }

    Ok(counts)
}
