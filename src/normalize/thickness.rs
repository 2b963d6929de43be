use regex::Regex;
use std::sync::LazyLock;

// Tried in order: "T150", "WALL-150" / "wall_150", "150mm" / "150 mm".
static THICKNESS_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"T(\d{2,4})").expect("T-prefix pattern"),
        Regex::new(r"(?i)WALL[_-](\d{2,4})").expect("wall-prefix pattern"),
        Regex::new(r"(?i)(\d{2,4})\s*mm").expect("mm-suffix pattern"),
    ]
});

/// Reads a wall thickness in millimetres out of a type or element name.
#[must_use]
pub fn thickness_from_text(text: &str) -> Option<f64> {
    THICKNESS_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_each_naming_convention() {
        assert_eq!(thickness_from_text("기본 벽 T200"), Some(200.0));
        assert_eq!(thickness_from_text("WALL-150"), Some(150.0));
        assert_eq!(thickness_from_text("ext_wall_90 concrete"), Some(90.0));
        assert_eq!(thickness_from_text("Generic - 300 mm"), Some(300.0));
        assert_eq!(thickness_from_text("Curtain Wall"), None);
    }

    #[test]
    fn earlier_pattern_wins() {
        assert_eq!(thickness_from_text("T120 (150mm)"), Some(120.0));
    }
}
