use std::{fs, path::Path};

use anyhow::{Context, Result};
use space_shooter_core::ContributionData;

/// Reads a contribution calendar from a JSON file.
pub(crate) fn load(path: &Path) -> Result<ContributionData> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read contribution data from {}", path.display()))?;
    parse(&contents)
        .with_context(|| format!("failed to parse contribution data in {}", path.display()))
}

/// Parses a calendar of the form `{"weeks": [{"days": [{"level": 0}, ...]}, ...]}`.
///
/// Every week must list exactly seven days.
pub(crate) fn parse(contents: &str) -> Result<ContributionData, serde_json::Error> {
    serde_json::from_str(contents)
}
