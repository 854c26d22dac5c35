use std::path::Path;

use nbhd_core::models::{RegionKey, RegionTable};

use crate::deadline::Deadline;
use crate::errors::{CoverageError, Result};
use crate::tools::TagIntervalTool;

/// Count tags overlapping every region of `table` through an indexed range query. No fallback.
pub fn count_tag_interval(
    tool: &dyn TagIntervalTool,
    tags: &Path,
    table: &RegionTable,
    deadline: Deadline,
) -> Result<Vec<f64>> {
    let keys: Vec<RegionKey> = table.keys().collect();
    if keys.is_empty() {
        return Ok(vec![]);
    }

    let counts = tool.region_counts(tags, &keys, deadline)?;
    if counts.len() != keys.len() {
        return Err(CoverageError::BackendFailed {
            track: tags.to_path_buf(),
            diagnostic: format!(
                "expected {} region counts, got {}",
                keys.len(),
                counts.len()
            ),
        });
    }
    Ok(counts)
}
