use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::ClassifyError;

/// Genomic context of a candidate region. Exactly one applies to each region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionClass {
    Promoter,
    Genic,
    Intergenic,
}

impl RegionClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionClass::Promoter => "promoter",
            RegionClass::Genic => "genic",
            RegionClass::Intergenic => "intergenic",
        }
    }
}

impl Display for RegionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionClass {
    type Err = ClassifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "promoter" => Ok(RegionClass::Promoter),
            "genic" => Ok(RegionClass::Genic),
            "intergenic" => Ok(RegionClass::Intergenic),
            other => Err(ClassifyError::UnknownClass(other.to_string())),
        }
    }
}
