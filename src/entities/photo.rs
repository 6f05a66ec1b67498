use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{optional_text, require_text, Coordinates};
use crate::error::Error;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub url: String,
    /// Blob key inside the photo bucket.
    pub path: String,
    pub caption: Option<String>,
    pub location: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub user_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewPhoto {
    pub caption: Option<String>,
    pub location: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
}

pub struct PhotoFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for PhotoFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl NewPhoto {
    pub fn validate(self) -> Result<Self, Error> {
        Ok(Self {
            caption: optional_text(self.caption),
            location: require_text("location", &self.location)?,
            coordinates: self.coordinates.validate()?,
        })
    }
}

impl PhotoFile {
    /// Storage key: `<user id>/<random id>-<sanitized file name>`.
    pub fn storage_path(&self, user_id: Uuid) -> String {
        let file_name: String = self
            .file_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        let file_name = if file_name.trim_matches('.').is_empty() {
            "photo".to_string()
        } else {
            file_name
        };

        format!("{}/{}-{}", user_id, Uuid::new_v4(), file_name)
    }
}

impl Photo {
    pub fn new(user_id: Uuid, params: NewPhoto, path: String, url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            url,
            path,
            caption: params.caption,
            location: params.location,
            coordinates: params.coordinates,
            user_id,
        }
    }
}

#[test]
fn storage_path_test() {
    let user_id = Uuid::new_v4();
    let file = PhotoFile {
        file_name: "Grand Canyon (1).JPG".into(),
        content_type: "image/jpeg".into(),
        bytes: vec![],
    };

    let path = file.storage_path(user_id);
    let prefix = format!("{}/", user_id);

    assert!(path.starts_with(&prefix));
    assert!(path.ends_with("-Grand_Canyon__1_.JPG"));

    let unnamed = PhotoFile {
        file_name: "..".into(),
        content_type: "image/png".into(),
        bytes: vec![],
    };
    assert!(unnamed.storage_path(user_id).ends_with("-photo"));
}

#[test]
fn validate_test() {
    let params = NewPhoto {
        caption: Some("  ".into()),
        location: "Zion, UT".into(),
        coordinates: Coordinates::new(37.2982, -113.0263),
    };

    let params = params.validate().unwrap();
    assert_eq!(params.caption, None);

    let invalid = NewPhoto {
        caption: None,
        location: "Nowhere".into(),
        coordinates: Coordinates::new(0.0, 200.0),
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn photo_file_debug_omits_bytes_test() {
    let file = PhotoFile {
        file_name: "arches.jpg".into(),
        content_type: "image/jpeg".into(),
        bytes: vec![0xff, 0xd8, 0xff, 0xe0],
    };

    let rendered = format!("{:?}", file);

    assert!(rendered.contains("arches.jpg"));
    assert!(rendered.contains("size: 4"));
    assert!(!rendered.contains("255"));
}
