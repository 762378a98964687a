use crate::error::AppError;

/// Canonical container ids look like `c007`. Anything already starting with `c`
/// is trusted as-is; everything else must parse as an integer.
pub fn normalize_container_id(raw: &str) -> Result<String, AppError> {
    if raw.starts_with('c') {
        return Ok(raw.to_string());
    }

    raw.trim()
        .parse::<i64>()
        .map(container_id_from_number)
        .map_err(|_| AppError::InvalidIdentifier(raw.to_string()))
}

pub fn container_id_from_number(number: i64) -> String {
    format!("c{number:03}")
}

pub fn denormalize_container_id(raw: &str) -> Result<i64, AppError> {
    let digits = raw.strip_prefix('c').unwrap_or(raw);

    digits
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidIdentifier(digits.to_string()))
}

pub fn normalize_box_id(raw: &str) -> String {
    raw.to_uppercase()
}

/// `B1` + `A1` renders as `B1a1`. Missing or empty halves render as nothing.
pub fn render_location(box_id: Option<&str>, position_id: Option<&str>) -> Option<String> {
    match (box_id, position_id) {
        (Some(box_id), Some(position_id)) if !box_id.is_empty() && !position_id.is_empty() => {
            Some(format!("{box_id}{}", position_id.to_lowercase()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough() {
        assert_eq!(normalize_container_id("c007").unwrap(), "c007");
        assert_eq!(normalize_container_id("cXYZ").unwrap(), "cXYZ");
    }

    #[test]
    fn test_numeric_input() {
        assert_eq!(normalize_container_id("7").unwrap(), "c007");
        assert_eq!(normalize_container_id("42").unwrap(), "c042");
        assert_eq!(normalize_container_id("1234").unwrap(), "c1234");
        assert_eq!(normalize_container_id(" 5 ").unwrap(), "c005");
        assert_eq!(container_id_from_number(7), "c007");
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            normalize_container_id("abc"),
            Err(AppError::InvalidIdentifier(id)) if id == "abc"
        ));
        assert!(normalize_container_id("").is_err());
        assert!(normalize_container_id("C007").is_err());
    }

    #[test]
    fn test_denormalize() {
        assert_eq!(denormalize_container_id("c007").unwrap(), 7);
        assert_eq!(denormalize_container_id("12").unwrap(), 12);
        assert!(denormalize_container_id("cXYZ").is_err());
    }

    #[test]
    fn test_round_trip() {
        for n in 0..=999 {
            let canonical = container_id_from_number(n);
            let number = denormalize_container_id(&canonical).unwrap();
            let again = normalize_container_id(&number.to_string()).unwrap();

            assert_eq!(again, canonical);
            assert_eq!(normalize_container_id(&canonical).unwrap(), canonical);
        }
    }

    #[test]
    fn test_box_case() {
        assert_eq!(normalize_box_id("b1"), "B1");
        assert_eq!(normalize_box_id("B1"), "B1");
    }

    #[test]
    fn test_render_location() {
        assert_eq!(render_location(Some("B1"), Some("A1")).as_deref(), Some("B1a1"));
        assert_eq!(render_location(None, Some("A1")), None);
        assert_eq!(render_location(Some("B1"), None), None);
        assert_eq!(render_location(Some(""), Some("A1")), None);
    }
}
