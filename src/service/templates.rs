use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::media::VIDEO_EXTENSIONS;
use crate::assets::pool::list_by_extension;
use crate::foundation::error::PromoResult;

/// A selectable template: one base video in the pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// File stem of the video.
    pub id: String,
    pub name: String,
}

/// Templates for every video in `video_dir`, sorted by file name.
pub fn list_templates(video_dir: &Path) -> PromoResult<Vec<Template>> {
    Ok(list_by_extension(video_dir, VIDEO_EXTENSIONS)?
        .iter()
        .filter_map(|p| p.file_stem().and_then(|s| s.to_str()))
        .map(|id| Template {
            id: id.to_string(),
            name: format!("Template {id}"),
        })
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/service/templates.rs"]
mod tests;
