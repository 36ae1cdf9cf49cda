use std::path::{Path, PathBuf};

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};

use crate::vocab::{Laterality, Modality};

/// Label shown for the image file when nothing has been picked.
pub const NO_IMAGE_SELECTED: &str = "No image selected";

/// File extensions offered by the image picker.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagingRecord {
    pub image_type: Modality,
    pub laterality: Laterality,
    pub image_datetime: DateTime,
    pub reference_id: String,
    /// Full free-text description. Previews truncate; this never does.
    pub description: String,
    /// Reference to a locally selected image. The file is not copied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
}

impl ImagingRecord {
    pub fn new(image_datetime: DateTime) -> Self {
        Self {
            image_type: Modality::default(),
            laterality: Laterality::default(),
            image_datetime,
            reference_id: String::new(),
            description: String::new(),
            image_path: None,
        }
    }

    /// File name of the selected image, or [`NO_IMAGE_SELECTED`].
    pub fn file_label(&self) -> String {
        self.image_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| NO_IMAGE_SELECTED.to_string())
    }

    /// The selected path, only if it still points at an existing file.
    pub fn existing_image(&self) -> Option<&Path> {
        self.image_path.as_deref().filter(|p| p.is_file())
    }
}
