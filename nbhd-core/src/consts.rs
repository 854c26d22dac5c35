/// Extra columns of an interval file, in order, after `chr`, `start` and `end`.
pub const BED_EXTRA_COLUMNS: [&str; 9] = [
    "name",
    "score",
    "strand",
    "thickStart",
    "thickEnd",
    "itemRgb",
    "blockCount",
    "blockSizes",
    "blockStarts",
];

pub const TRACK_HEADER_PREFIX: &str = "track";
pub const BROWSER_HEADER_PREFIX: &str = "browser";
pub const COMMENT_PREFIX: char = '#';

pub const NAME_FIELD: &str = "name";
pub const STRAND_FIELD: &str = "strand";
pub const TSS_COLUMN: &str = "tss";
