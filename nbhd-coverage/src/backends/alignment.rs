use std::path::Path;

use log::{info, warn};

use nbhd_core::models::{ChromSizes, ChromosomeOrder, RegionKey, RegionTable};

use crate::deadline::Deadline;
use crate::errors::{CoverageError, Result};
use crate::tools::AlignmentTool;

///
/// Count alignments overlapping every region of `table`.
///
/// The fast path sorts the regions into the alignment header's chromosome order (the genome
/// being the chromosome sizes reordered the same way) and runs sorted coverage. If that run
/// fails, one unsorted run over the canonical genome is attempted; a second failure is fatal
/// and carries both diagnostics.
///
pub fn count_alignment(
    tool: &dyn AlignmentTool,
    alignments: &Path,
    table: &RegionTable,
    sizes: &ChromSizes,
    canonical: &ChromosomeOrder,
    deadline: Deadline,
) -> Result<Vec<f64>> {
    let keys: Vec<RegionKey> = table.keys().collect();
    if keys.is_empty() {
        return Ok(vec![]);
    }

    let mut diagnostic = String::new();

    match tool.header_order(alignments) {
        Ok(header) => {
            let genome = sizes.reorder_by(&header);
            let header_order = ChromosomeOrder::new(genome.names());

            // rows on chromosomes missing from the header are never sent to the tool
            let mut rows: Vec<usize> = (0..keys.len())
                .filter(|&row| header_order.contains(&keys[row].chr))
                .collect();
            rows.sort_by_key(|&row| {
                let key = &keys[row];
                (header_order.rank(&key.chr), key.start, key.end)
            });
            let ordered: Vec<RegionKey> = rows.iter().map(|&row| keys[row].clone()).collect();

            let run = tool.sorted_coverage(alignments, &ordered, &genome, deadline);
            if !run.is_failed() && run.counts.len() == ordered.len() {
                let mut counts = vec![0.0; keys.len()];
                for (row, count) in rows.into_iter().zip(run.counts) {
                    counts[row] = count;
                }
                return Ok(counts);
            }
            diagnostic.push_str(&run.diagnostic);
        }
        Err(e) => diagnostic.push_str(&e.to_string()),
    }

    warn!(
        "Sorted coverage failed for {}; falling back to unsorted coverage",
        alignments.display()
    );
    if !diagnostic.is_empty() {
        info!("{}", diagnostic);
    }

    let genome = sizes.restrict_to(canonical);
    let run = tool.unsorted_coverage(alignments, &keys, &genome, deadline);
    if run.is_failed() || run.counts.len() != keys.len() {
        if !diagnostic.is_empty() {
            diagnostic.push('\n');
        }
        diagnostic.push_str(&run.diagnostic);
        return Err(CoverageError::BackendFailed {
            track: alignments.to_path_buf(),
            diagnostic,
        });
    }

    Ok(run.counts)
}
