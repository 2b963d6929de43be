//! Keyword tables driving the intent rules.

use serde::{Deserialize, Serialize};

/// Properties added to a metadata request when the message mentions any
/// of the triggers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRule {
    pub triggers: Vec<String>,
    pub properties: Vec<String>,
    /// Only applies when the message also carries a dimension keyword.
    #[serde(default)]
    pub requires_dimension: bool,
}

impl PropertyRule {
    fn new(triggers: &[&str], properties: &[&str], requires_dimension: bool) -> Self {
        Self {
            triggers: strings(triggers),
            properties: strings(properties),
            requires_dimension,
        }
    }
}

/// Every keyword list the classifier reads, Korean and English side by side.
/// Matching is substring containment against the lower-cased message, so
/// entries should be lower case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Category label emitted with every wall intent.
    pub wall_category: String,
    pub wall: Vec<String>,
    pub show: Vec<String>,
    pub only: Vec<String>,
    pub thickness: Vec<String>,
    pub volume: Vec<String>,
    pub table: Vec<String>,
    pub quantity: Vec<String>,
    pub dimension: Vec<String>,
    /// Generic "properties / info / data" words.
    pub info: Vec<String>,
    pub thickness_group: Vec<String>,
    pub chart: Vec<String>,
    pub hide: Vec<String>,
    /// Always requested with a metadata intent.
    pub base_properties: Vec<String>,
    pub property_rules: Vec<PropertyRule>,
    /// Requested when the derived list is small and the message asks for
    /// information in general.
    pub default_properties: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            wall_category: "Revit 벽".to_string(),
            wall: strings(&["벽체", "벽", "wall"]),
            show: strings(&["보여", "보여줘", "보기", "표시", "show", "추출", "확인", "검토"]),
            only: strings(&["만", "only"]),
            thickness: strings(&["두께", "폭", "width", "thickness"]),
            volume: strings(&["체적", "부피", "volume"]),
            table: strings(&["표", "테이블", "table", "schedule", "목록", "리스트"]),
            quantity: strings(&[
                "수량", "개수", "count", "volume", "체적", "부피", "area", "면적", "width", "너비",
                "폭", "두께", "thickness", "추출", "확인",
            ]),
            dimension: strings(&[
                "크기", "치수", "size", "dimension", "길이", "length", "높이", "height", "너비",
                "width", "폭", "두께", "thickness", "면적", "area", "체적", "부피", "volume",
            ]),
            info: strings(&["속성", "정보", "데이터"]),
            thickness_group: strings(&["두께별", "thickness"]),
            chart: strings(&["차트", "chart"]),
            hide: strings(&["숨기", "hide"]),
            base_properties: strings(&["Category", "카테고리", "Name", "이름"]),
            property_rules: vec![
                PropertyRule::new(&["type", "타입", "형"], &["Type", "Type Name", "타입 이름"], false),
                PropertyRule::new(&["family", "패밀리"], &["Family", "Family Name", "패밀리"], false),
                PropertyRule::new(&["level", "레벨", "층"], &["Level", "레벨", "층"], false),
                PropertyRule::new(
                    &["height", "높이"],
                    &["Height", "Unconnected Height", "미연결 높이"],
                    true,
                ),
                PropertyRule::new(
                    &["width", "폭", "두께", "thickness"],
                    &["Width", "Thickness", "두께", "폭", "너비"],
                    true,
                ),
                PropertyRule::new(&["area", "면적"], &["Area", "면적"], true),
                PropertyRule::new(&["volume", "체적", "부피"], &["Volume", "체적", "부피"], true),
            ],
            default_properties: strings(&[
                "Category", "카테고리", "Family", "Family Name", "패밀리", "타입 패밀리", "Type",
                "Type Name", "타입 이름", "Level", "레벨", "층", "Reference Level", "참조 레벨",
                "Height", "Unconnected Height", "미연결 높이", "미연결 높이(mm)",
                "Unconnected Height (mm)", "미연결 높이 (mm)", "Width", "너비", "폭", "두께",
                "Thickness", "Overall Width", "명목 너비", "Nominal Width", "명목 두께", "벽 두께",
                "벽 폭", "Volume", "체적", "부피", "Area", "면적",
            ]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
