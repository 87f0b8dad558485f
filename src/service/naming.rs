use std::sync::OnceLock;

use regex::Regex;

use crate::foundation::error::{PromoError, PromoResult};

/// Range of the random collision-avoidance suffix.
pub const SUFFIX_RANGE: std::ops::RangeInclusive<u32> = 1000..=9999;

/// Template ids end up in file names, so only a conservative character set is allowed.
pub fn validate_template_id(id: &str) -> PromoResult<()> {
    if id.is_empty() {
        return Err(PromoError::validation("template id must be non-empty"));
    }
    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(PromoError::validation(format!(
            "template id {id:?} may only contain letters, digits, '-' and '_'"
        )));
    }
    Ok(())
}

pub fn output_file_name(template_id: &str, unix_ts: i64, suffix: u32) -> PromoResult<String> {
    validate_template_id(template_id)?;
    if !SUFFIX_RANGE.contains(&suffix) {
        return Err(PromoError::validation(format!(
            "output suffix {suffix} must be four digits"
        )));
    }
    Ok(format!("video_{template_id}_{unix_ts}_{suffix}.mp4"))
}

/// Unix timestamp embedded in an output name, if the name follows the output pattern.
pub fn parse_output_timestamp(file_name: &str) -> Option<i64> {
    // The template id may itself contain underscores; the timestamp is the second-to-last field.
    static OUTPUT_NAME_RE: OnceLock<Regex> = OnceLock::new();
    OUTPUT_NAME_RE
        .get_or_init(|| {
            Regex::new(r"^video_.+_(\d+)_\d+\.mp4$").expect("output name regex should compile")
        })
        .captures(file_name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
#[path = "../../tests/unit/service/naming.rs"]
mod tests;
