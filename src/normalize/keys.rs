//! Candidate property names per semantic field.
//!
//! Every list is ordinary data in priority order, Korean and English
//! variants side by side, so a locale can be extended from the settings
//! file without touching resolution logic.

use serde::{Deserialize, Serialize};

/// Minimal field list a client should request for generic element rows.
pub const COMMON_PROPERTIES: &[&str] = &[
    "ElementId", "Category", "Family", "Family Name", "Type", "Type Name", "유형 이름", "Level", "레벨",
    "폭", "Width", "벽 폭", "두께", "Thickness", "Overall Width", "타입 폭", "타입 두께",
    "Height", "Unconnected Height", "미연결 높이", "미연결 높이(mm)",
    "면적", "Area", "Surface Area",
    "체적", "부피", "Volume", "Volume (m3)", "Volume (m³)",
];

/// Minimal field list a client should request for wall rows.
pub const WALL_PROPERTIES: &[&str] = &[
    "ElementId", "Category", "Type", "Type Name", "유형 이름", "Level", "레벨",
    "폭", "Width", "너비", "폭(mm)", "두께", "Thickness", "Overall Width", "벽체폭", "구조두께",
    "Height", "Unconnected Height", "미연결높이", "미연결높이(mm)",
    "면적", "Area", "Surface Area",
    "체적", "부피", "Volume", "Volume (m3)", "Volume (m³)",
];

/// Candidate keys for one field plus an optional pattern over key names
/// used when none of the candidates is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FieldSpec {
    pub keys: Vec<String>,
    pub fallback: Option<String>,
}

impl FieldSpec {
    fn new(keys: &[&str], fallback: Option<&str>) -> Self {
        Self {
            keys: keys.iter().map(ToString::to_string).collect(),
            fallback: fallback.map(ToString::to_string),
        }
    }
}

/// Candidate-key tables for every semantic field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldKeys {
    pub category: FieldSpec,
    pub name: FieldSpec,
    pub type_name: FieldSpec,
    pub level: FieldSpec,
    pub material: FieldSpec,
    pub width: FieldSpec,
    pub thickness: FieldSpec,
    pub height: FieldSpec,
    pub area: FieldSpec,
    pub volume: FieldSpec,
    /// Keys a row's own metadata may carry its category under.
    pub category_backfill: Vec<String>,
    /// Tokens marking a category or name as a wall.
    pub wall_tokens: Vec<String>,
}

impl Default for FieldKeys {
    fn default() -> Self {
        Self {
            category: FieldSpec::new(
                &[
                    "Category", "CategoryId", "카테고리", "분류", "범주", "Type Name", "종류",
                    "Family", "패밀리", "패밀리 및 유형", "패밀리 및 타입",
                    "System Classification", "Structural Usage", "Function",
                ],
                None,
            ),
            name: FieldSpec::new(
                &[
                    "__name", "Name", "이름", "Element Name", "Type", "Type Name",
                    "Family and Type", "Family", "Symbol Name", "__externalId", "ExternalId",
                    "External Id",
                ],
                None,
            ),
            type_name: FieldSpec::new(
                &["유형 이름", "Type Name", "타입 이름", "유형 설명", "유형 해설"],
                None,
            ),
            level: FieldSpec::new(&["Level", "레벨", "층", "참조 레벨", "Reference Level"], None),
            material: FieldSpec::new(
                &[
                    "Material", "Materials", "Material Name", "Structural Material", "재료",
                    "구조 재료", "구조재료", "마감 재료", "마감재료",
                ],
                None,
            ),
            width: FieldSpec::new(
                &["폭", "Width", "벽 폭", "너비", "폭(mm)", "Nominal Width", "명목 너비"],
                Some(r"(?i)width|너비"),
            ),
            thickness: FieldSpec::new(
                &[
                    "폭", "Width", "두께", "벽 두께", "구조 두께", "Wall Width", "Thickness",
                    "Overall Width", "타입 폭", "타입 두께", "벽체폭", "구조두께",
                ],
                Some(r"(?i)width|thickness|두께|폭"),
            ),
            height: FieldSpec::new(
                &[
                    "Height", "Unconnected Height", "Unconnected Height (mm)", "미연결 높이",
                    "미연결 높이(mm)", "미연결 높이 (mm)", "미연결높이", "미연결높이(mm)",
                    "Base Constraint Height", "Top Offset", "높이",
                ],
                Some(r"(?i)height|높이"),
            ),
            area: FieldSpec::new(
                &["Area", "면적", "표면적", "Surface Area"],
                Some(r"(?i)area|면적|표면적"),
            ),
            volume: FieldSpec::new(
                &["Volume", "체적", "부피", "용적", "Volume (m3)", "Volume (m³)", "Gross Volume"],
                Some(r"(?i)volume|체적|부피|용적"),
            ),
            category_backfill: vec!["Category".to_string(), "카테고리".to_string()],
            wall_tokens: vec!["벽".to_string(), "wall".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_keep_remaining_defaults() {
        let keys: FieldKeys =
            serde_json::from_str(r#"{ "level": { "keys": ["Storey"] } }"#).unwrap();
        assert_eq!(keys.level.keys, vec!["Storey".to_string()]);
        assert_eq!(keys.level.fallback, None);
        assert_eq!(keys.volume, FieldKeys::default().volume);
    }
}
