//! Per-track count files. Each holds `chr start end count` for every region of the table the
//! counts were produced for.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use nbhd_core::models::RegionKey;
use nbhd_core::utils::{get_dynamic_reader, get_file_writer};

use crate::errors::{QuantError, Result};

/// `{outdir}/{table_label}.{feature}.{track basename}.CountReads.bed`
pub fn cache_path(outdir: &Path, table_label: &str, feature: &str, track_basename: &str) -> PathBuf {
    outdir.join(format!(
        "{}.{}.{}.CountReads.bed",
        table_label, feature, track_basename
    ))
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

///
/// A count file is reusable when it exists, is not empty, and is no older than any of the
/// `inputs` that can be stat'ed.
///
pub fn is_fresh(cache: &Path, inputs: &[&Path]) -> bool {
    let Ok(meta) = fs::metadata(cache) else {
        return false;
    };
    if meta.len() == 0 {
        return false;
    }
    let Ok(cache_time) = meta.modified() else {
        return true;
    };
    inputs
        .iter()
        .filter_map(|p| modified(p))
        .all(|input_time| input_time <= cache_time)
}

pub fn write_counts(path: &Path, keys: &[RegionKey], counts: &[f64]) -> Result<()> {
    let mut writer = get_file_writer(path)?;
    for (key, count) in keys.iter().zip(counts) {
        writeln!(writer, "{}\t{}\t{}\t{}", key.chr, key.start, key.end, count)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_counts(path: &Path) -> Result<Vec<(RegionKey, f64)>> {
    let reader = get_dynamic_reader(path)?;
    let mut rows = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let malformed = |msg: &str| QuantError::CacheParse {
            path: path.to_path_buf(),
            line: i + 1,
            msg: msg.to_string(),
        };

        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 4 {
            return Err(malformed("expected chr, start, end and count"));
        }
        let start = parts[1].parse().map_err(|_| malformed("bad start"))?;
        let end = parts[2].parse().map_err(|_| malformed("bad end"))?;
        let count = parts[parts.len() - 1]
            .parse()
            .map_err(|_| malformed("bad count"))?;
        rows.push((RegionKey::new(parts[0], start, end), count));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn test_cache_path() {
        let path = cache_path(Path::new("/out"), "EnhancerList", "DHS", "dnase.tagAlign.gz");
        assert_eq!(
            path,
            PathBuf::from("/out/EnhancerList.DHS.dnase.tagAlign.gz.CountReads.bed")
        );
    }

    #[test]
    fn test_counts_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counts").join("x.CountReads.bed");
        let keys = vec![RegionKey::new("chr1", 600, 700), RegionKey::new("chr2", 150, 150)];

        write_counts(&path, &keys, &[12.0, 0.25]).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "chr1\t600\t700\t12\nchr2\t150\t150\t0.25\n"
        );

        let rows = read_counts(&path).unwrap();
        assert_eq!(rows[0], (keys[0].clone(), 12.0));
        assert_eq!(rows[1], (keys[1].clone(), 0.25));
    }

    #[test]
    fn test_freshness() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("regions.bed");
        let cache = dir.path().join("regions.DHS.d.tagAlign.gz.CountReads.bed");

        std::fs::write(&input, "chr1\t1\t2\n").unwrap();
        assert!(!is_fresh(&cache, &[&input]));

        std::fs::write(&cache, "").unwrap();
        assert!(!is_fresh(&cache, &[&input]));

        std::fs::write(&cache, "chr1\t1\t2\t3\n").unwrap();
        let now = SystemTime::now();
        std::fs::File::options()
            .write(true)
            .open(&cache)
            .unwrap()
            .set_modified(now)
            .unwrap();
        std::fs::File::options()
            .write(true)
            .open(&input)
            .unwrap()
            .set_modified(now - Duration::from_secs(60))
            .unwrap();
        assert!(is_fresh(&cache, &[&input]));

        // input touched after the counts were written
        std::fs::File::options()
            .write(true)
            .open(&input)
            .unwrap()
            .set_modified(now + Duration::from_secs(60))
            .unwrap();
        assert!(!is_fresh(&cache, &[&input]));
    }

    #[test]
    fn test_malformed_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.CountReads.bed");
        std::fs::write(&path, "chr1\t600\t700\n").unwrap();
        assert!(matches!(
            read_counts(&path),
            Err(QuantError::CacheParse { line: 1, .. })
        ));
    }
}
