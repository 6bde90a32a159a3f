//! Portfolio content item types.
//!
//! One `ProjectItem` per feed row. All fields are already normalized
//! (trimmed, defaulted, classified) by the time an item exists.

use serde::{Deserialize, Serialize};

/// Section used for rows that carry no section value.
pub const DEFAULT_SECTION: &str = "Otros";

/// Gallery placement hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Larger / highlighted placement.
    Featured,
    #[default]
    Normal,
}

impl Layout {
    /// Literal cell values that mark a row as featured.
    const FEATURED_MARKERS: [&'static str; 2] = ["Destacado", "Featured"];

    /// Map a trimmed Layout cell. Anything but a featured marker is `Normal`.
    pub fn from_cell(value: &str) -> Self {
        if Self::FEATURED_MARKERS.contains(&value) {
            Self::Featured
        } else {
            Self::Normal
        }
    }

    pub const fn is_featured(self) -> bool {
        matches!(self, Self::Featured)
    }
}

/// How the media behind an item must be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
    /// Rendered through the YouTube embeddable player.
    YoutubeEmbed,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
            Self::YoutubeEmbed => write!(f, "youtubeEmbed"),
        }
    }
}

/// One row of portfolio content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItem {
    /// Section (gallery) key.
    pub section: String,
    /// Display title.
    pub title: String,
    /// Delivery URL after provider rewriting; empty when the row had none.
    pub media_url: String,
    /// Free-text description; format depends on the section.
    pub history: String,
    /// Ordering rank within the section, higher first.
    pub priority: i64,
    pub layout: Layout,
    pub media_type: MediaType,
}

/// Team member view of a `history` cell: `"role - bio"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberBio<'a> {
    pub role: &'a str,
    pub bio: &'a str,
}

/// Equipment view of a `history` cell: `"category|spec1,spec2"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquipmentSpec<'a> {
    pub category: &'a str,
    pub specs: Vec<&'a str>,
}

impl ProjectItem {
    pub const fn is_featured(&self) -> bool {
        self.layout.is_featured()
    }

    pub fn has_media(&self) -> bool {
        !self.media_url.is_empty()
    }

    /// Split `history` on the first `" - "` into role and bio.
    pub fn as_member_bio(&self) -> MemberBio<'_> {
        match self.history.split_once(" - ") {
            Some((role, bio)) => MemberBio {
                role: role.trim(),
                bio: bio.trim(),
            },
            None => MemberBio {
                role: self.history.trim(),
                bio: "",
            },
        }
    }

    /// Split `history` on the first `|` into a category and its
    /// comma-separated specs.
    pub fn as_equipment_spec(&self) -> EquipmentSpec<'_> {
        match self.history.split_once('|') {
            Some((category, rest)) => EquipmentSpec {
                category: category.trim(),
                specs: rest
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            None => EquipmentSpec {
                category: self.history.trim(),
                specs: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with_history(history: &str) -> ProjectItem {
        ProjectItem {
            section: "Equipo".to_string(),
            title: "Ana".to_string(),
            media_url: String::new(),
            history: history.to_string(),
            priority: 0,
            layout: Layout::Normal,
            media_type: MediaType::Image,
        }
    }

    #[test]
    fn test_layout_markers() {
        assert_eq!(Layout::from_cell("Destacado"), Layout::Featured);
        assert_eq!(Layout::from_cell("Featured"), Layout::Featured);
        assert_eq!(Layout::from_cell("destacado"), Layout::Normal);
        assert_eq!(Layout::from_cell(""), Layout::Normal);
    }

    #[test]
    fn test_member_bio_split() {
        let item = item_with_history("Directora de foto - Diez años rodando - en exteriores");
        let bio = item.as_member_bio();
        assert_eq!(bio.role, "Directora de foto");
        assert_eq!(bio.bio, "Diez años rodando - en exteriores");

        let plain = item_with_history("Editor");
        assert_eq!(plain.as_member_bio().role, "Editor");
        assert_eq!(plain.as_member_bio().bio, "");
    }

    #[test]
    fn test_equipment_spec_split() {
        let item = item_with_history("CÁMARAS|Sony FX6, 4K 120fps , ,Full frame");
        let spec = item.as_equipment_spec();
        assert_eq!(spec.category, "CÁMARAS");
        assert_eq!(spec.specs, vec!["Sony FX6", "4K 120fps", "Full frame"]);

        let bare = item_with_history("DRONES");
        assert_eq!(bare.as_equipment_spec().category, "DRONES");
        assert!(bare.as_equipment_spec().specs.is_empty());
    }

    #[test]
    fn test_media_type_serializes_camel_case() {
        let json = serde_json::to_string(&MediaType::YoutubeEmbed).unwrap();
        assert_eq!(json, "\"youtubeEmbed\"");
        assert_eq!(MediaType::YoutubeEmbed.to_string(), "youtubeEmbed");
    }
}
