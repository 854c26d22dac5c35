use std::collections::{HashMap, HashSet};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::consts::{
    BED_EXTRA_COLUMNS, BROWSER_HEADER_PREFIX, COMMENT_PREFIX, STRAND_FIELD, TRACK_HEADER_PREFIX,
    TSS_COLUMN,
};
use crate::errors::{RegionTableError, Result};
use crate::models::{ChromosomeOrder, Column, ColumnData, GenomicInterval, RegionKey};
use crate::utils::{get_dynamic_reader, get_file_writer};

/// Knobs for [`RegionTable::parse`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Names for the columns after `chr`, `start`, `end`. Defaults to a header row if the file
    /// has one, otherwise to the BED convention (`name`, `score`, `strand`, ...).
    pub field_names: Option<Vec<String>>,
    /// Fully sort rows by `(chr, start, end)`.
    pub sort: bool,
    /// Keep file order instead of grouping rows by chromosome.
    pub skip_chr_sorting: bool,
    /// Only keep rows on this chromosome.
    pub chromosome: Option<String>,
}

///
/// RegionTable, the in-memory form of an interval file plus the annotation columns that pipeline
/// stages append to it.
///
/// Every annotation column holds exactly one value per row. Row filtering and reordering always
/// go through [`RegionTable::take_rows`] so that columns stay aligned with `regions`.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionTable {
    pub regions: Vec<GenomicInterval>,
    pub field_names: Vec<String>,
    columns: Vec<Column>,
    pub path: Option<PathBuf>,
}

impl RegionTable {
    pub fn new(regions: Vec<GenomicInterval>, field_names: Vec<String>) -> Self {
        RegionTable {
            regions,
            field_names,
            columns: Vec::new(),
            path: None,
        }
    }

    ///
    /// Parse an interval file.
    ///
    /// Leading `track`/`browser` lines and `#` comments are skipped. Rows on chromosomes outside
    /// `order` are dropped. Endpoints are normalised so that `start <= end`.
    ///
    /// # Arguments
    /// - path: path to the (optionally gzipped) interval file
    /// - order: the canonical chromosomes, also used as the sort key
    /// - options: column names, sorting and chromosome restriction
    pub fn parse<P: AsRef<Path>>(
        path: P,
        order: &ChromosomeOrder,
        options: &ParseOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let reader = get_dynamic_reader(path)
            .map_err(|_| RegionTableError::FileReadError(path.to_path_buf()))?;
        let mut table = Self::from_reader(reader, path, order, options)?;
        table.path = Some(path.to_path_buf());
        Ok(table)
    }

    /// Parse from any buffered reader; `origin` is only used in error messages.
    pub fn from_reader<R: BufRead>(
        reader: R,
        origin: &Path,
        order: &ChromosomeOrder,
        options: &ParseOptions,
    ) -> Result<Self> {
        let mut regions: Vec<GenomicInterval> = Vec::new();
        let mut header_names: Option<Vec<String>> = None;
        let mut seen_data = false;
        let mut skipped = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches(['\r', '\n']);

            if line.trim().is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }
            if !seen_data
                && (line.starts_with(TRACK_HEADER_PREFIX) || line.starts_with(BROWSER_HEADER_PREFIX))
            {
                continue;
            }

            let parts: Vec<&str> = line.split('\t').collect();

            // a column header such as `chr start end name ...`
            if !seen_data && header_names.is_none() && parts.len() >= 3 {
                if parts[1].trim().parse::<i64>().is_err() {
                    header_names = Some(parts[3..].iter().map(|s| s.to_string()).collect());
                    continue;
                }
            }
            seen_data = true;

            if parts.len() < 3 {
                return Err(RegionTableError::RegionParseError {
                    path: origin.to_path_buf(),
                    line: idx + 1,
                    msg: format!("expected at least 3 columns, got {}", parts.len()),
                });
            }

            let start = parse_coordinate(parts[1], origin, idx + 1, "start")?;
            let end = parse_coordinate(parts[2], origin, idx + 1, "end")?;
            let chr = parts[0];

            if !order.contains(chr) {
                skipped += 1;
                continue;
            }
            if let Some(keep) = &options.chromosome {
                if keep != chr {
                    continue;
                }
            }

            let fields = parts[3..].iter().map(|s| s.to_string()).collect();
            regions.push(GenomicInterval::with_fields(chr, start, end, fields));
        }

        if skipped > 0 {
            debug!(
                "Dropped {} rows on non-canonical chromosomes from {}",
                skipped,
                origin.display()
            );
        }

        let field_names = options
            .field_names
            .clone()
            .or(header_names)
            .unwrap_or_else(|| BED_EXTRA_COLUMNS.iter().map(|s| s.to_string()).collect());
        let width = regions.iter().map(|r| r.fields.len()).max().unwrap_or(0);
        let field_names = fit_field_names(field_names, width);
        for region in regions.iter_mut() {
            region.fields.resize(width, String::new());
        }

        let mut table = RegionTable::new(regions, field_names);
        if options.sort {
            table.sort_by_position(order);
        } else if !options.skip_chr_sorting {
            table.sort_by_chromosome(order);
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = RegionKey> + '_ {
        self.regions.iter().map(GenomicInterval::key)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.field_names.iter().position(|n| n == name)
    }

    pub fn field(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.field_index(name)?;
        self.regions.get(row)?.fields.get(idx).map(String::as_str)
    }

    /// Overwrite (or append) a named extra field for every row.
    pub fn set_field(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.len() {
            return Err(RegionTableError::ColumnLengthMismatch {
                name: name.to_string(),
                expected: self.len(),
                found: values.len(),
            });
        }
        let idx = match self.field_index(name) {
            Some(idx) => idx,
            None => {
                self.field_names.push(name.to_string());
                self.field_names.len() - 1
            }
        };
        for (region, value) in self.regions.iter_mut().zip(values) {
            if region.fields.len() <= idx {
                region.fields.resize(idx + 1, String::new());
            }
            region.fields[idx] = value;
        }
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.data)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Borrow a float column.
    pub fn float_column(&self, name: &str) -> Result<&[f64]> {
        match self.column(name) {
            Some(ColumnData::Float(values)) => Ok(values),
            Some(_) => Err(RegionTableError::NotNumeric(name.to_string())),
            None => Err(RegionTableError::MissingColumn(name.to_string())),
        }
    }

    /// Float or integer column as `f64` values.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let data = self
            .column(name)
            .ok_or_else(|| RegionTableError::MissingColumn(name.to_string()))?;
        data.to_f64()
            .ok_or_else(|| RegionTableError::NotNumeric(name.to_string()))
    }

    /// Add a column, replacing any column of the same name in place.
    pub fn push_column(&mut self, name: impl Into<String>, data: ColumnData) -> Result<()> {
        let name = name.into();
        if data.len() != self.len() {
            return Err(RegionTableError::ColumnLengthMismatch {
                name,
                expected: self.len(),
                found: data.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.data = data,
            None => self.columns.push(Column { name, data }),
        }
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(idx))
    }

    /// Keep (and reorder) rows by index. Every column follows.
    pub fn take_rows(&mut self, rows: &[usize]) {
        self.regions = rows.iter().map(|&i| self.regions[i].clone()).collect();
        for column in self.columns.iter_mut() {
            column.data = column.data.take(rows);
        }
    }

    pub fn retain_rows<F>(&mut self, keep: F)
    where
        F: Fn(&GenomicInterval) -> bool,
    {
        let rows: Vec<usize> = (0..self.len())
            .filter(|&i| keep(&self.regions[i]))
            .collect();
        if rows.len() != self.len() {
            self.take_rows(&rows);
        }
    }

    /// Stable sort by chromosome rank only.
    pub fn sort_by_chromosome(&mut self, order: &ChromosomeOrder) {
        let mut rows: Vec<usize> = (0..self.len()).collect();
        rows.sort_by_key(|&i| order.rank(&self.regions[i].chr).unwrap_or(usize::MAX));
        self.take_rows(&rows);
    }

    /// Stable sort by `(chromosome rank, start, end)`.
    pub fn sort_by_position(&mut self, order: &ChromosomeOrder) {
        let mut rows: Vec<usize> = (0..self.len()).collect();
        rows.sort_by_key(|&i| {
            let r = &self.regions[i];
            (order.rank(&r.chr).unwrap_or(usize::MAX), r.start, r.end)
        });
        self.take_rows(&rows);
    }

    /// Drop rows that are identical in every field and column, keeping the first occurrence.
    /// Returns the number of rows removed.
    pub fn dedup(&mut self) -> usize {
        let mut seen: HashSet<String> = HashSet::with_capacity(self.len());
        let rows: Vec<usize> = (0..self.len())
            .filter(|&i| seen.insert(self.row_line(i)))
            .collect();
        let removed = self.len() - rows.len();
        if removed > 0 {
            self.take_rows(&rows);
        }
        removed
    }

    ///
    /// Add the `tss` column: `start` on the forward strand, `end` on the reverse strand.
    /// Rows with an unknown strand use `start`.
    ///
    pub fn derive_tss(&mut self) -> Result<()> {
        let strand_idx = self
            .field_index(STRAND_FIELD)
            .ok_or_else(|| RegionTableError::MissingColumn(STRAND_FIELD.to_string()))?;
        let tss = self
            .regions
            .iter()
            .map(|r| match r.fields.get(strand_idx).map(String::as_str) {
                Some("-") => r.end as i64,
                _ => r.start as i64,
            })
            .collect();
        self.push_column(TSS_COLUMN, ColumnData::Integer(tss))
    }

    ///
    /// Left join the annotation columns of `other` onto this table, matching rows on the value of
    /// the extra field `field`. Joined columns are renamed `{name}{suffix}`. Rows without a match
    /// get empty values.
    ///
    /// Repeated keys pair up in order of occurrence: the n-th row carrying a key in this table
    /// takes the n-th such row of `other`, or its last one when `other` has fewer.
    ///
    pub fn join_by_field(&mut self, other: &RegionTable, field: &str, suffix: &str) -> Result<()> {
        let other_idx = other
            .field_index(field)
            .ok_or_else(|| RegionTableError::MissingColumn(field.to_string()))?;
        let self_idx = self
            .field_index(field)
            .ok_or_else(|| RegionTableError::MissingColumn(field.to_string()))?;

        let mut lookup: HashMap<&str, Vec<usize>> = HashMap::with_capacity(other.len());
        for (row, region) in other.regions.iter().enumerate() {
            lookup
                .entry(region.fields[other_idx].as_str())
                .or_default()
                .push(row);
        }
        let repeated = lookup.values().filter(|rows| rows.len() > 1).count();
        if repeated > 0 {
            debug!("{} {} values repeat in the joined table", repeated, field);
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        let matches: Vec<Option<usize>> = self
            .regions
            .iter()
            .map(|r| {
                let key = r.fields[self_idx].as_str();
                let rows = lookup.get(key)?;
                let nth = seen.entry(key).or_default();
                let row = rows.get(*nth).or(rows.last()).copied();
                *nth += 1;
                row
            })
            .collect();

        for column in other.columns() {
            let data = column.data.take_optional(&matches);
            self.push_column(format!("{}{}", column.name, suffix), data)?;
        }
        Ok(())
    }

    fn header_line(&self) -> String {
        let mut cols = vec!["chr".to_string(), "start".to_string(), "end".to_string()];
        cols.extend(self.field_names.iter().cloned());
        cols.extend(self.columns.iter().map(|c| c.name.clone()));
        cols.join("\t")
    }

    fn row_line(&self, row: usize) -> String {
        let mut line = self.regions[row].to_string();
        for column in &self.columns {
            line.push('\t');
            line.push_str(&column.data.cell(row));
        }
        line
    }

    ///
    /// Save the table, with a header row, as a tab-delimited file.
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    pub fn write_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = get_file_writer(path.as_ref())?;
        writeln!(writer, "{}", self.header_line())?;
        for row in 0..self.len() {
            writeln!(writer, "{}", self.row_line(row))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Save only the interval rows (no header, no annotation columns).
    pub fn write_bed<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = get_file_writer(path.as_ref())?;
        for region in &self.regions {
            writeln!(writer, "{}", region)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn parse_coordinate(raw: &str, origin: &Path, line: usize, what: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|e| RegionTableError::RegionParseError {
            path: origin.to_path_buf(),
            line,
            msg: format!("invalid {} {:?}: {}", what, raw, e),
        })
}

/// Trim or extend the name list to the number of extra fields actually present.
fn fit_field_names(mut names: Vec<String>, width: usize) -> Vec<String> {
    if names.len() > width {
        names.truncate(width);
    }
    while names.len() < width {
        names.push(format!("col{}", names.len() + 4));
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::io::Cursor;

    #[fixture]
    fn order() -> ChromosomeOrder {
        ChromosomeOrder::human()
    }

    fn parse_str(text: &str, order: &ChromosomeOrder, options: &ParseOptions) -> RegionTable {
        RegionTable::from_reader(Cursor::new(text), Path::new("test.bed"), order, options).unwrap()
    }

    #[rstest]
    fn test_parse_skips_track_and_comments(order: ChromosomeOrder) {
        let text = "track name=peaks\n# a comment\nchr2\t10\t20\tp1\nchr1\t30\t40\tp2\n";
        let table = parse_str(text, &order, &ParseOptions::default());

        assert_eq!(table.len(), 2);
        assert_eq!(table.field_names, vec!["name".to_string()]);
        // grouped by chromosome rank
        assert_eq!(table.regions[0].chr, "chr1");
        assert_eq!(table.field(1, "name"), Some("p1"));
    }

    #[rstest]
    fn test_parse_drops_non_canonical_and_normalises(order: ChromosomeOrder) {
        let text = "chr1\t50\t10\nchrUn_gl000220\t1\t5\nchr1_random\t1\t2\n";
        let table = parse_str(text, &order, &ParseOptions::default());
        assert_eq!(table.len(), 1);
        assert_eq!((table.regions[0].start, table.regions[0].end), (10, 50));
        assert!(table.regions.iter().all(|r| r.start <= r.end));
    }

    #[rstest]
    fn test_parse_full_sort_and_restrict(order: ChromosomeOrder) {
        let text = "chrX\t1\t2\nchr1\t30\t40\nchr1\t10\t20\nchr1\t10\t15\n";
        let options = ParseOptions {
            sort: true,
            ..Default::default()
        };
        let table = parse_str(text, &order, &options);
        let coords: Vec<String> = table.regions.iter().map(|r| r.coords()).collect();
        assert_eq!(
            coords,
            vec!["chr1:10-15", "chr1:10-20", "chr1:30-40", "chrX:1-2"]
        );

        let options = ParseOptions {
            chromosome: Some("chrX".to_string()),
            ..Default::default()
        };
        let table = parse_str(text, &order, &options);
        assert_eq!(table.len(), 1);
    }

    #[rstest]
    fn test_parse_header_row(order: ChromosomeOrder) {
        let text = "chr\tstart\tend\tname\tH3K27ac.RPM\nchr1\t1\t10\tp1\t2.5\n";
        let table = parse_str(text, &order, &ParseOptions::default());
        assert_eq!(
            table.field_names,
            vec!["name".to_string(), "H3K27ac.RPM".to_string()]
        );
        assert_eq!(table.field(0, "H3K27ac.RPM"), Some("2.5"));
    }

    #[rstest]
    fn test_parse_rejects_bad_coordinates(order: ChromosomeOrder) {
        let err = RegionTable::from_reader(
            Cursor::new("chr1\t1\t10\nchr1\tx\t10\n"),
            Path::new("bad.bed"),
            &order,
            &ParseOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RegionTableError::RegionParseError { line: 2, .. }));
    }

    #[rstest]
    fn test_derive_tss(order: ChromosomeOrder) {
        let text = "chr1\t1000\t5000\tA\t0\t+\nchr1\t2000\t8000\tB\t0\t-\n";
        let mut table = parse_str(text, &order, &ParseOptions::default());
        table.derive_tss().unwrap();
        assert_eq!(
            table.column(TSS_COLUMN),
            Some(&ColumnData::Integer(vec![1000, 8000]))
        );
    }

    #[rstest]
    fn test_derive_tss_needs_strand(order: ChromosomeOrder) {
        let mut table = parse_str("chr1\t1\t2\n", &order, &ParseOptions::default());
        assert!(matches!(
            table.derive_tss(),
            Err(RegionTableError::MissingColumn(_))
        ));
    }

    #[rstest]
    fn test_columns_follow_rows(order: ChromosomeOrder) {
        let mut table = parse_str("chr2\t1\t2\nchr1\t5\t6\n", &order, &ParseOptions {
            skip_chr_sorting: true,
            ..Default::default()
        });
        table
            .push_column("score", ColumnData::Float(vec![2.0, 1.0]))
            .unwrap();
        table.sort_by_position(&order);
        assert_eq!(table.regions[0].chr, "chr1");
        assert_eq!(table.float_column("score").unwrap(), &[1.0, 2.0]);

        assert!(table.push_column("bad", ColumnData::Float(vec![1.0])).is_err());
    }

    #[rstest]
    fn test_dedup(order: ChromosomeOrder) {
        let mut table = parse_str(
            "chr1\t1\t2\tx\nchr1\t1\t2\tx\nchr1\t1\t2\ty\n",
            &order,
            &ParseOptions::default(),
        );
        assert_eq!(table.dedup(), 1);
        assert_eq!(table.len(), 2);
    }

    #[rstest]
    fn test_join_by_field(order: ChromosomeOrder) {
        let mut genes =
            parse_str("chr1\t1\t2\tA\nchr1\t5\t9\tB\n", &order, &ParseOptions::default());
        let mut windows = parse_str("chr1\t0\t3\tB\n", &order, &ParseOptions::default());
        windows
            .push_column("H3K27ac.RPM", ColumnData::Float(vec![4.0]))
            .unwrap();

        genes.join_by_field(&windows, "name", ".TSS1Kb").unwrap();
        let joined = genes.float_column("H3K27ac.RPM.TSS1Kb").unwrap();
        assert!(joined[0].is_nan());
        assert_eq!(joined[1], 4.0);
    }

    #[rstest]
    fn test_join_with_repeated_keys(order: ChromosomeOrder) {
        let mut genes = parse_str(
            "chr1\t100\t200\tA\nchr1\t5000\t6000\tA\nchr2\t10\t20\tA\n",
            &order,
            &ParseOptions::default(),
        );
        let mut windows = parse_str(
            "chr1\t0\t600\tA\nchr1\t4500\t5500\tA\n",
            &order,
            &ParseOptions::default(),
        );
        windows
            .push_column("H3K27ac.RPM", ColumnData::Float(vec![1.0, 2.0]))
            .unwrap();

        genes.join_by_field(&windows, "name", ".TSS1Kb").unwrap();
        assert_eq!(genes.len(), 3);
        assert_eq!(
            genes.float_column("H3K27ac.RPM.TSS1Kb").unwrap(),
            &[1.0, 2.0, 2.0]
        );
    }

    #[rstest]
    fn test_write_tsv_round_trip(order: ChromosomeOrder) {
        let mut table = parse_str("chr1\t1\t2\tp1\n", &order, &ParseOptions::default());
        table
            .push_column("isPromoterElement", ColumnData::Bool(vec![true]))
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("table.tsv");
        table.write_tsv(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "chr\tstart\tend\tname\tisPromoterElement\nchr1\t1\t2\tp1\tTrue\n");

        let back = RegionTable::parse(&path, &order, &ParseOptions::default()).unwrap();
        assert_eq!(back.field(0, "isPromoterElement"), Some("True"));
    }
}
