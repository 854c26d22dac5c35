use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{RegionTableError, Result};
use crate::utils::get_dynamic_reader;

///
/// An explicit, ordered list of canonical chromosome names. Membership decides which rows are
/// kept when parsing and which records count towards totals; position decides the sort order.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromosomeOrder {
    names: Vec<String>,
    ranks: HashMap<String, usize>,
}

impl ChromosomeOrder {
    /// Build an ordering from names. Repeated names keep their first position.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut ranks = HashMap::new();
        for name in names {
            let name: String = name.into();
            if !ranks.contains_key(&name) {
                ranks.insert(name.clone(), ordered.len());
                ordered.push(name);
            }
        }
        ChromosomeOrder {
            names: ordered,
            ranks,
        }
    }

    /// chr1..chr22, chrM, chrX, chrY
    pub fn human() -> Self {
        let autosomes = (1..=22).map(|i| format!("chr{}", i));
        let others = ["chrM", "chrX", "chrY"].into_iter().map(String::from);
        Self::new(autosomes.chain(others))
    }

    pub fn rank(&self, chr: &str) -> Option<usize> {
        self.ranks.get(chr).copied()
    }

    pub fn contains(&self, chr: &str) -> bool {
        self.ranks.contains_key(chr)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromStr for ChromosomeOrder {
    type Err = String;

    /// Parse a comma separated list, e.g. `chr1,chr2,chrX`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let names: Vec<&str> = s
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            return Err(format!("No chromosome names found in: {:?}", s));
        }
        Ok(Self::new(names))
    }
}

///
/// Chromosome lengths in the order of the chromosome-size file they were read from.
///
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChromSizes {
    entries: Vec<(String, u32)>,
}

impl ChromSizes {
    pub fn from_entries<S: Into<String>>(entries: Vec<(S, u32)>) -> Self {
        ChromSizes {
            entries: entries.into_iter().map(|(c, l)| (c.into(), l)).collect(),
        }
    }

    ///
    /// Read a tab (or whitespace) delimited `chr length` file.
    ///
    /// # Arguments
    /// - path: path to the chromosome-size file, optionally gzipped
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = get_dynamic_reader(path)
            .map_err(|_| RegionTableError::FileReadError(path.to_path_buf()))?;

        let mut entries = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            let (Some(chr), Some(length)) = (parts.next(), parts.next()) else {
                return Err(RegionTableError::ChromSizesParseError {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    msg: format!("expected two columns, got {:?}", line),
                });
            };
            let length = length
                .parse::<u32>()
                .map_err(|e| RegionTableError::ChromSizesParseError {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    msg: format!("invalid length {:?}: {}", length, e),
                })?;
            entries.push((chr.to_string(), length));
        }

        Ok(ChromSizes { entries })
    }

    pub fn length(&self, chr: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(name, _)| name == chr)
            .map(|(_, len)| *len)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(c, l)| (c.as_str(), *l))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(c, _)| c.as_str()).collect()
    }

    /// Keep the chromosomes named in `order` that are also present here, in the order of `order`.
    pub fn reorder_by<S: AsRef<str>>(&self, order: &[S]) -> ChromSizes {
        let entries = order
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                self.length(name).map(|len| (name.to_string(), len))
            })
            .collect();
        ChromSizes { entries }
    }

    /// Keep only canonical chromosomes, preserving file order.
    pub fn restrict_to(&self, canonical: &ChromosomeOrder) -> ChromSizes {
        ChromSizes {
            entries: self
                .entries
                .iter()
                .filter(|(c, _)| canonical.contains(c))
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_human_order() {
        let order = ChromosomeOrder::human();
        assert_eq!(order.len(), 25);
        assert_eq!(order.rank("chr1"), Some(0));
        assert_eq!(order.rank("chr22"), Some(21));
        assert_eq!(order.rank("chrM"), Some(22));
        assert_eq!(order.rank("chrY"), Some(24));
        assert_eq!(order.rank("chr1_random"), None);
        assert!(order.rank("chr2") < order.rank("chr10"));
    }

    #[test]
    fn test_parse_order_from_str() {
        let order: ChromosomeOrder = "chrX, chr2,chr1,chr2".parse().unwrap();
        assert_eq!(order.names(), &["chrX", "chr2", "chr1"]);
        assert!("".parse::<ChromosomeOrder>().is_err());
    }

    #[test]
    fn test_read_chrom_sizes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chr2\t2000").unwrap();
        writeln!(file, "chr1\t1000").unwrap();
        writeln!(file, "chrUn_gl000220\t500").unwrap();
        writeln!(file).unwrap();

        let sizes = ChromSizes::from_path(file.path()).unwrap();
        assert_eq!(sizes.len(), 3);
        assert_eq!(sizes.length("chr1"), Some(1000));
        assert_eq!(sizes.names(), vec!["chr2", "chr1", "chrUn_gl000220"]);

        let canonical = sizes.restrict_to(&ChromosomeOrder::human());
        assert_eq!(canonical.names(), vec!["chr2", "chr1"]);

        let reordered = sizes.reorder_by(&["chr1", "chr3", "chr2"]);
        assert_eq!(reordered.names(), vec!["chr1", "chr2"]);
    }

    #[test]
    fn test_bad_chrom_sizes_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chr1\tlots").unwrap();
        let err = ChromSizes::from_path(file.path()).unwrap_err();
        assert!(matches!(
            err,
            RegionTableError::ChromSizesParseError { line: 1, .. }
        ));
    }
}
