// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};

/// Catalog listing and search entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMod {
    #[serde(rename(deserialize = "_idRow"))]
    pub id: i64,

    #[serde(rename(deserialize = "_sName"))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RecordPage {
    #[serde(rename = "_aRecords", default)]
    pub records: Vec<CatalogMod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModFile {
    #[serde(rename(deserialize = "_sFile"))]
    pub file_name: String,

    #[serde(rename(deserialize = "_sDownloadUrl"))]
    pub download_url: String,

    #[serde(rename(deserialize = "_nFilesize"), default)]
    pub file_size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewImage {
    #[serde(rename(deserialize = "_sBaseUrl"))]
    pub base_url: String,

    #[serde(rename(deserialize = "_sFile"))]
    pub file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewMedia {
    #[serde(rename(deserialize = "_aImages"), default)]
    pub images: Vec<PreviewImage>,
}

/// Mod details needed to install and record a catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModProfile {
    #[serde(rename(deserialize = "_idRow"), default)]
    pub id: i64,

    #[serde(rename(deserialize = "_sName"), default)]
    pub name: String,

    #[serde(rename(deserialize = "_aPreviewMedia"), default)]
    pub preview_media: PreviewMedia,

    #[serde(rename(deserialize = "_aFiles"), default)]
    pub files: Vec<ModFile>,
}

impl ModProfile {
    /// URL of the first preview image, if the mod has one
    pub fn image_url(&self) -> Option<String> {
        self.preview_media
            .images
            .first()
            .map(|image| format!("{}/{}", image.base_url.trim_end_matches('/'), image.file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserialize() {
        let json = r#"{
            "_sName": "Abrams Gold Skin",
            "_aPreviewMedia": {
                "_aImages": [
                    {"_sType": "screenshot", "_sBaseUrl": "https://images.gamebanana.com/img/ss/mods", "_sFile": "abc.jpg"},
                    {"_sType": "screenshot", "_sBaseUrl": "https://images.gamebanana.com/img/ss/mods", "_sFile": "def.jpg"}
                ]
            },
            "_aFiles": [
                {"_idRow": 1001, "_sFile": "abrams_gold.zip", "_nFilesize": 2048, "_sDownloadUrl": "https://gamebanana.com/dl/1001"}
            ]
        }"#;

        let profile: ModProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name, "Abrams Gold Skin");
        assert_eq!(profile.files.len(), 1);
        assert_eq!(profile.files[0].file_name, "abrams_gold.zip");
        assert_eq!(profile.files[0].file_size, 2048);
        assert_eq!(
            profile.image_url().as_deref(),
            Some("https://images.gamebanana.com/img/ss/mods/abc.jpg")
        );
    }

    #[test]
    fn test_profile_without_media() {
        let profile: ModProfile = serde_json::from_str(r#"{"_sName": "Bare"}"#).unwrap();
        assert_eq!(profile.image_url(), None);
        assert!(profile.files.is_empty());
    }

    #[test]
    fn test_catalog_mod_serializes_plain_keys() {
        let record: CatalogMod = serde_json::from_str(r#"{"_idRow": 5, "_sName": "Five", "_sModelName": "Mod"}"#).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":5,"name":"Five"}"#);
    }
}
