/// Values of one annotation column, one entry per table row.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Float(Vec<f64>),
    Integer(Vec<i64>),
    Bool(Vec<bool>),
    Text(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(v) => v.len(),
            ColumnData::Integer(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render one cell the way it is written to disk. Booleans use `True`/`False` so that tables
    /// stay readable by the downstream pandas tooling.
    pub fn cell(&self, row: usize) -> String {
        match self {
            ColumnData::Float(v) => v[row].to_string(),
            ColumnData::Integer(v) => v[row].to_string(),
            ColumnData::Bool(v) => {
                if v[row] {
                    "True".to_string()
                } else {
                    "False".to_string()
                }
            }
            ColumnData::Text(v) => v[row].clone(),
        }
    }

    /// Numeric view of the column, `None` for booleans and text.
    pub fn to_f64(&self) -> Option<Vec<f64>> {
        match self {
            ColumnData::Float(v) => Some(v.clone()),
            ColumnData::Integer(v) => Some(v.iter().map(|x| *x as f64).collect()),
            _ => None,
        }
    }

    /// Select rows by index, in the given order. Indices may repeat.
    pub fn take(&self, rows: &[usize]) -> ColumnData {
        match self {
            ColumnData::Float(v) => ColumnData::Float(rows.iter().map(|&i| v[i]).collect()),
            ColumnData::Integer(v) => ColumnData::Integer(rows.iter().map(|&i| v[i]).collect()),
            ColumnData::Bool(v) => ColumnData::Bool(rows.iter().map(|&i| v[i]).collect()),
            ColumnData::Text(v) => ColumnData::Text(rows.iter().map(|&i| v[i].clone()).collect()),
        }
    }

    /// Like [`take`](Self::take) but with holes. Missing numeric cells become `NaN` (integer
    /// columns are widened to floats), missing booleans are `false` and missing text is empty.
    pub fn take_optional(&self, rows: &[Option<usize>]) -> ColumnData {
        match self {
            ColumnData::Float(v) => {
                ColumnData::Float(rows.iter().map(|r| r.map_or(f64::NAN, |i| v[i])).collect())
            }
            ColumnData::Integer(v) => ColumnData::Float(
                rows.iter()
                    .map(|r| r.map_or(f64::NAN, |i| v[i] as f64))
                    .collect(),
            ),
            ColumnData::Bool(v) => {
                ColumnData::Bool(rows.iter().map(|r| r.is_some_and(|i| v[i])).collect())
            }
            ColumnData::Text(v) => ColumnData::Text(
                rows.iter()
                    .map(|r| r.map_or_else(String::new, |i| v[i].clone()))
                    .collect(),
            ),
        }
    }
}

/// A named annotation column appended to a [`RegionTable`](super::RegionTable).
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cells() {
        let floats = ColumnData::Float(vec![0.5, 2.0]);
        assert_eq!(floats.cell(0), "0.5");
        assert_eq!(floats.cell(1), "2");

        let flags = ColumnData::Bool(vec![true, false]);
        assert_eq!(flags.cell(0), "True");
        assert_eq!(flags.cell(1), "False");
    }

    #[test]
    fn test_take_optional_fills_holes() {
        let ints = ColumnData::Integer(vec![10, 20]);
        let taken = ints.take_optional(&[Some(1), None]);
        match taken {
            ColumnData::Float(v) => {
                assert_eq!(v[0], 20.0);
                assert!(v[1].is_nan());
            }
            other => panic!("unexpected column type: {:?}", other),
        }

        let text = ColumnData::Text(vec!["a".to_string()]);
        assert_eq!(
            text.take_optional(&[None, Some(0)]),
            ColumnData::Text(vec![String::new(), "a".to_string()])
        );
    }
}
