use log::debug;

use crate::config::MonthKey;

/// Month abbreviations as they appear in the exports, January first.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Янв", "Фев", "Мар", "Апр", "Май", "Июн", "Июл", "Авг", "Сен", "Окт", "Ноя", "Дек",
];

/// Turns a month label into a month key.
///
/// Understood forms:
/// * an abbreviation and a 4-digit year: `Мар 2025`
/// * a 4-digit year and a 1-2 digit month separated by `-` or `/`: `2025-3`, `2025/03`
///
/// Anything else is returned trimmed but otherwise unchanged.
/// Normalizing a key a second time returns the same key.
pub fn normalize_month_label(label: &str) -> MonthKey {
    let trimmed = label.trim();
    if let Some(key) = parse_abbreviated(trimmed).or_else(|| parse_numeric(trimmed)) {
        return key;
    }
    if !trimmed.is_empty() {
        debug!("normalize_month_label: keeping opaque label {:?}", trimmed);
    }
    MonthKey(trimmed.to_string())
}

/// The label for a month key, in the abbreviated form (`2025-03` -> `Мар 2025`).
///
/// Opaque keys are returned unchanged.
pub fn month_display_label(key: &MonthKey) -> String {
    match key.year_month() {
        Some((year, month)) => format!("{} {}", MONTH_ABBREVIATIONS[(month - 1) as usize], year),
        None => key.as_str().to_string(),
    }
}

/// The `count` consecutive months ending with (and including) the given month, oldest first.
pub fn months_ending_at(year: u32, month: u32, count: usize) -> Vec<MonthKey> {
    let last = (year as i64) * 12 + (month as i64 - 1);
    (0..count as i64)
        .rev()
        .map(|back| last - back)
        .filter(|idx| *idx >= 0)
        .map(|idx| MonthKey::from_ym((idx / 12) as u32, (idx % 12) as u32 + 1))
        .collect()
}

fn parse_abbreviated(s: &str) -> Option<MonthKey> {
    let mut parts = s.split_whitespace();
    let abbr = parts.next()?;
    let year = parse_year(parts.next()?)?;
    if parts.next().is_some() || abbr.chars().count() != 3 {
        return None;
    }
    let abbr = abbr.to_lowercase();
    let month_idx = MONTH_ABBREVIATIONS
        .iter()
        .position(|m| m.to_lowercase() == abbr)?;
    Some(MonthKey::from_ym(year, month_idx as u32 + 1))
}

fn parse_numeric(s: &str) -> Option<MonthKey> {
    let (year, month) = s.split_once(|c: char| c == '-' || c == '/')?;
    let year = parse_year(year)?;
    if month.is_empty() || month.len() > 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(MonthKey::from_ym(year, month))
}

fn parse_year(s: &str) -> Option<u32> {
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        normalize_month_label(s).as_str().to_string()
    }

    #[test]
    fn abbreviated_labels() {
        assert_eq!(norm("Мар 2025"), "2025-03");
        assert_eq!(norm("Янв 2024"), "2024-01");
        assert_eq!(norm(" Дек 2023 "), "2023-12");
        assert_eq!(norm("май 2025"), "2025-05");
    }

    #[test]
    fn numeric_labels() {
        assert_eq!(norm("2025-3"), "2025-03");
        assert_eq!(norm("2025/11"), "2025-11");
        assert_eq!(norm("2025-03"), "2025-03");
    }

    #[test]
    fn opaque_labels() {
        assert_eq!(norm("Q1 2025"), "Q1 2025");
        assert_eq!(norm("Мая 2025"), "Мая 2025");
        assert_eq!(norm("2025-13"), "2025-13");
        assert_eq!(norm("2025-123"), "2025-123");
        assert_eq!(norm("25-3"), "25-3");
        assert_eq!(norm("  "), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for label in [
            "Мар 2025",
            "2025-3",
            "2025/12",
            "Q1 2025",
            " Фев 2024",
            "",
            "2025-13",
            "Апр — 2025",
        ] {
            let once = normalize_month_label(label);
            assert_eq!(normalize_month_label(once.as_str()), once, "label {:?}", label);
        }
    }

    #[test]
    fn display_labels() {
        assert_eq!(month_display_label(&MonthKey::from_ym(2025, 4)), "Апр 2025");
        assert_eq!(month_display_label(&normalize_month_label("Q1")), "Q1");
        let key = normalize_month_label("Окт 2024");
        assert_eq!(normalize_month_label(&month_display_label(&key)), key);
    }

    #[test]
    fn ranges_cross_years() {
        let ms: Vec<String> = months_ending_at(2025, 2, 4)
            .iter()
            .map(|m| m.to_string())
            .collect();
        assert_eq!(ms, vec!["2024-11", "2024-12", "2025-01", "2025-02"]);
        assert!(months_ending_at(2025, 2, 0).is_empty());
    }
}
