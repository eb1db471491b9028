//! Verification-area taxonomy: Level1 -> Level2 -> Level3 plus named
//! templates carrying tags. Stored as one JSON document.
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationArea {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub level1: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub level2: Vec<AreaLevel2>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub templates: Vec<AreaTemplate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaLevel2 {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub level3: Vec<AreaLevel3>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaLevel3 {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaTemplate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

/// Request and response body of `/verification-areas`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationAreasDocument {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<VerificationArea>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Trims every name in the tree. Applied on both read and write.
pub fn normalize_areas(items: Vec<VerificationArea>) -> Vec<VerificationArea> {
    items.into_iter().map(normalize_area).collect()
}

fn normalize_area(mut area: VerificationArea) -> VerificationArea {
    area.level1 = area.level1.trim().to_string();
    for level2 in area.level2.iter_mut() {
        level2.name = level2.name.trim().to_string();
        for level3 in level2.level3.iter_mut() {
            level3.name = level3.name.trim().to_string();
        }
    }
    for template in area.templates.iter_mut() {
        template.name = template.name.trim().to_string();
        for tag in template.tags.iter_mut() {
            *tag = tag.trim().to_string();
        }
    }
    area
}
