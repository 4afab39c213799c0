use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::database::Document;
use crate::error::ApiError;
use crate::types::Collection;

use super::validation::{clean_list, FieldErrors};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill all required fields";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CraftType {
    #[serde(rename = "Paper Craft")]
    PaperCraft,
    #[serde(rename = "Wood Craft")]
    WoodCraft,
    #[serde(rename = "Textile Craft")]
    TextileCraft,
    #[serde(rename = "Pottery")]
    Pottery,
    #[serde(rename = "Jewelry Making")]
    JewelryMaking,
    #[serde(rename = "Metal Craft")]
    MetalCraft,
    #[serde(rename = "Glass Craft")]
    GlassCraft,
    #[serde(rename = "Leather Craft")]
    LeatherCraft,
    #[serde(rename = "Mixed Media")]
    MixedMedia,
    #[serde(rename = "Other")]
    Other,
}

impl CraftType {
    pub const ALL: [CraftType; 10] = [
        CraftType::PaperCraft,
        CraftType::WoodCraft,
        CraftType::TextileCraft,
        CraftType::Pottery,
        CraftType::JewelryMaking,
        CraftType::MetalCraft,
        CraftType::GlassCraft,
        CraftType::LeatherCraft,
        CraftType::MixedMedia,
        CraftType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CraftType::PaperCraft => "Paper Craft",
            CraftType::WoodCraft => "Wood Craft",
            CraftType::TextileCraft => "Textile Craft",
            CraftType::Pottery => "Pottery",
            CraftType::JewelryMaking => "Jewelry Making",
            CraftType::MetalCraft => "Metal Craft",
            CraftType::GlassCraft => "Glass Craft",
            CraftType::LeatherCraft => "Leather Craft",
            CraftType::MixedMedia => "Mixed Media",
            CraftType::Other => "Other",
        }
    }
}

impl fmt::Display for CraftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CraftType {
    type Err = String;

    /// Exact display name match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CraftType::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Invalid craft type '{}'", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tutorial {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub craft_type: CraftType,
    pub author: Uuid,
    pub steps: Vec<String>,
    pub materials: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Tutorial {
    const COLLECTION: Collection = Collection::Tutorials;
    const LABEL: &'static str = "Tutorial";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Tutorial {
    pub fn new(author: Uuid, draft: TutorialDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            craft_type: draft.craft_type,
            author,
            steps: draft.steps,
            materials: draft.materials,
            images: draft.images.unwrap_or_default(),
            videos: draft.videos.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields. Media lists change only when supplied.
    pub fn apply(&mut self, draft: TutorialDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.craft_type = draft.craft_type;
        self.steps = draft.steps;
        self.materials = draft.materials;
        if let Some(images) = draft.images {
            self.images = images;
        }
        if let Some(videos) = draft.videos {
            self.videos = videos;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorialRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub steps: Option<Vec<String>>,
    pub materials: Option<Vec<String>>,
    pub craft_type: Option<String>,
    pub user_id: Option<Uuid>,
    pub images: Option<Vec<String>>,
    pub videos: Option<Vec<String>>,
}

/// A tutorial body that passed required-field and enum validation
#[derive(Debug, Clone)]
pub struct TutorialDraft {
    pub title: String,
    pub description: String,
    pub craft_type: CraftType,
    pub steps: Vec<String>,
    pub materials: Vec<String>,
    pub images: Option<Vec<String>>,
    pub videos: Option<Vec<String>>,
    pub user_id: Option<Uuid>,
}

impl TutorialRequest {
    pub fn validate(self) -> Result<TutorialDraft, ApiError> {
        let mut errors = FieldErrors::new();
        let title = errors.require_text("title", "Title", self.title);
        let description = errors.require_text("description", "Description", self.description);
        let steps = errors.require_list("steps", "Steps", self.steps);
        let materials = errors.require_list("materials", "Materials", self.materials);
        let craft_type = errors.require_text("craftType", "Craft type", self.craft_type);
        errors.finish(REQUIRED_FIELDS_MESSAGE)?;

        let craft_type = craft_type.parse::<CraftType>().map_err(|msg| {
            ApiError::validation_error(
                "Invalid craft type",
                Some(BTreeMap::from([("craftType".to_string(), msg)])),
            )
        })?;

        Ok(TutorialDraft {
            title,
            description,
            craft_type,
            steps,
            materials,
            images: self.images.map(|v| clean_list(Some(v))),
            videos: self.videos.map(|v| clean_list(Some(v))),
            user_id: self.user_id,
        })
    }
}
