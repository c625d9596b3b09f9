use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;

/// Shown in place of an unknown birth year.
pub const UNKNOWN_YEAR: &str = "?";

static LEADING_INT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").unwrap());

/// Year portion of a free-text date: whatever follows the last `/`, or the
/// whole text. `None` when the date is blank.
pub fn extract_year(date: &str) -> Option<String> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    let year = match date.rsplit_once('/') {
        Some((_, year)) => year.trim(),
        None => date,
    };
    Some(year.to_string())
}

/// Leading integer of `text`, ignoring trailing garbage (`"1950 ca."` is 1950).
pub fn parse_year(text: &str) -> Option<i32> {
    LEADING_INT_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Years lived, or still alive at `current_year` when there is no death year.
pub fn age(born: Option<&str>, death: Option<&str>, current_year: i32) -> Option<i32> {
    let born = parse_year(born?)?;
    match death {
        None => current_year.checked_sub(born),
        Some(death) => parse_year(death)?.checked_sub(born),
    }
}

/// Like [`age`], with a zero age treated as unknown.
pub fn known_age(born: Option<&str>, death: Option<&str>, current_year: i32) -> Option<i32> {
    age(born, death, current_year).filter(|age| *age != 0)
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_after_last_slash() {
        assert_eq!(extract_year("12/03/1950").as_deref(), Some("1950"));
        assert_eq!(extract_year("1950").as_deref(), Some("1950"));
        assert_eq!(extract_year("  "), None);
        assert_eq!(extract_year("03/").as_deref(), Some(""));
    }

    #[test]
    fn parse_year_takes_leading_digits() {
        assert_eq!(parse_year("1950"), Some(1950));
        assert_eq!(parse_year(" 1890 ca."), Some(1890));
        assert_eq!(parse_year("circa 1890"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn age_uses_current_year_when_alive() {
        assert_eq!(age(Some("1950"), None, 2024), Some(74));
        assert_eq!(age(Some("1900"), Some("1970"), 2024), Some(70));
        assert_eq!(age(None, Some("1970"), 2024), None);
        assert_eq!(age(Some("1900"), Some("unknown"), 2024), None);
    }

    #[test]
    fn extreme_years_are_unknown_instead_of_overflowing() {
        assert_eq!(age(Some("-2147483000"), None, 2024), None);
        assert_eq!(age(Some("-2147483000"), Some("2147483000"), 2024), None);
        assert_eq!(known_age(Some("2147483647"), Some("-5"), 2024), None);
    }

    #[test]
    fn zero_age_is_unknown() {
        assert_eq!(known_age(Some("1900"), Some("1900"), 2024), None);
        assert_eq!(known_age(Some("1900"), Some("1901"), 2024), Some(1));
    }
}
