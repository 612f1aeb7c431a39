use std::path::Path;

use passforge_generate::GenerationProfile;

use crate::CliError;

/// Load a profile from TOML, or JSON when the file ends in `.json`.
pub fn load_profile(path: &Path) -> Result<GenerationProfile, CliError> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(toml::from_str(&content)?)
    }
}
