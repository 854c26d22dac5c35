/// Diagnostic substrings that mark a failed alignment-coverage run even when the tool exits
/// cleanly. Only the alignment fast path and its fallback consult these.
pub const FAILURE_MARKERS: [&str; 3] = ["terminated", "Error", "ERROR"];

///
/// The structured outcome of one coverage-tool run.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolRun {
    pub exit_code: i32,
    pub records_written: usize,
    pub diagnostic: String,
    /// One value per requested region, in request order.
    pub counts: Vec<f64>,
}

impl ToolRun {
    pub fn success(counts: Vec<f64>) -> Self {
        ToolRun {
            exit_code: 0,
            records_written: counts.len(),
            diagnostic: String::new(),
            counts,
        }
    }

    pub fn failure(exit_code: i32, diagnostic: impl Into<String>) -> Self {
        ToolRun {
            exit_code,
            records_written: 0,
            diagnostic: diagnostic.into(),
            counts: Vec::new(),
        }
    }

    /// Append a line to the diagnostic text.
    pub fn with_note(mut self, note: impl AsRef<str>) -> Self {
        if !self.diagnostic.is_empty() {
            self.diagnostic.push('\n');
        }
        self.diagnostic.push_str(note.as_ref());
        self
    }

    /// A run failed when it exited non-zero, produced no values, produced only zeros, or
    /// reported one of the [`FAILURE_MARKERS`].
    pub fn is_failed(&self) -> bool {
        self.exit_code != 0
            || self.counts.is_empty()
            || self.counts.iter().all(|c| *c == 0.0)
            || FAILURE_MARKERS.iter().any(|m| self.diagnostic.contains(m))
    }
}
