//! Parsing of the official recipe dataset.
//!
//! The dataset is a `COOKRCP01` document with one `row` element per recipe;
//! field names follow the publisher's upper-case codes. Elements the
//! application does not use (result codes, steps past the third, ...) are
//! ignored.

use serde::Deserialize;

use crate::catalog::{ManualStep, Nutrition, OfficialRecipe};
use crate::error::AppError;

/// Image shown when a recipe ships without one.
pub const FALLBACK_IMAGE: &str = "/svg/logo.svg";

#[derive(Debug, Deserialize)]
struct CookRcp01 {
    #[serde(rename = "row", default)]
    rows: Vec<RecipeRow>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecipeRow {
    #[serde(rename = "RCP_SEQ")]
    seq: String,
    #[serde(rename = "RCP_NM")]
    name: String,
    #[serde(rename = "ATT_FILE_NO_MAIN")]
    main_image: String,
    #[serde(rename = "RCP_PARTS_DTLS")]
    parts: String,
    #[serde(rename = "MANUAL01")]
    manual_01: String,
    #[serde(rename = "MANUAL_IMG01")]
    manual_img_01: String,
    #[serde(rename = "MANUAL02")]
    manual_02: String,
    #[serde(rename = "MANUAL_IMG02")]
    manual_img_02: String,
    #[serde(rename = "MANUAL03")]
    manual_03: String,
    #[serde(rename = "MANUAL_IMG03")]
    manual_img_03: String,
    #[serde(rename = "INFO_ENG")]
    energy: String,
    #[serde(rename = "INFO_PRO")]
    protein: String,
    #[serde(rename = "INFO_FAT")]
    fat: String,
    #[serde(rename = "INFO_NA")]
    sodium: String,
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl From<RecipeRow> for OfficialRecipe {
    fn from(row: RecipeRow) -> Self {
        // A step is kept only when both its picture and its text are present.
        let manual = [
            (row.manual_img_01, row.manual_01),
            (row.manual_img_02, row.manual_02),
            (row.manual_img_03, row.manual_03),
        ]
        .into_iter()
        .filter_map(|(image, text)| match (non_blank(image), non_blank(text)) {
            (Some(image), Some(text)) => Some(ManualStep { image, text }),
            _ => None,
        })
        .collect();

        OfficialRecipe {
            id: row.seq.trim().to_string(),
            name: row.name.trim().to_string(),
            image: non_blank(row.main_image).unwrap_or_else(|| FALLBACK_IMAGE.to_string()),
            ingredients: row.parts.trim().to_string(),
            manual,
            nutrition: Nutrition {
                calories: non_blank(row.energy),
                protein: non_blank(row.protein),
                fat: non_blank(row.fat),
                sodium: non_blank(row.sodium),
            },
        }
    }
}

/// Parse the dataset into recipes, in document order. Rows without an id are
/// skipped.
pub fn parse_catalog(xml: &str) -> Result<Vec<OfficialRecipe>, AppError> {
    let document: CookRcp01 = quick_xml::de::from_str(xml)
        .map_err(|e| AppError::Catalog(format!("Malformed recipe XML: {e}")))?;

    Ok(document
        .rows
        .into_iter()
        .filter(|row| !row.seq.trim().is_empty())
        .map(OfficialRecipe::from)
        .collect())
}
