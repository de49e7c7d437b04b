use regex::Regex;
use std::sync::LazyLock;

static HOURS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)H").expect("valid regex"));
static MINUTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)M").expect("valid regex"));
static SECONDS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)S").expect("valid regex"));
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// Convert an ISO 8601 style duration (`PT1H2M3S`) into whole seconds.
///
/// Each component is matched on its own; a missing or unreadable component
/// contributes zero, so malformed input degrades to `0` instead of failing.
pub fn parse_duration(duration: &str) -> u64 {
    let component = |re: &Regex| -> u64 {
        re.captures(duration)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    component(&HOURS)
        .saturating_mul(3600)
        .saturating_add(component(&MINUTES).saturating_mul(60))
        .saturating_add(component(&SECONDS))
}

/// Format seconds as `H:MM:SS` when there is at least one hour, else `M:SS`
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Group digits in thousands: `1234567` -> `1,234,567`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

/// Date portion of an RFC 3339 timestamp (everything before the `T`)
pub fn date_portion(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

/// Quote a CSV field only when it contains a delimiter, quote or line break
pub fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Extract the first run of ASCII digits from free text
pub fn first_integer(text: &str) -> Option<&str> {
    DIGITS.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        for pattern in [&HOURS, &MINUTES, &SECONDS, &DIGITS] {
            assert!(LazyLock::force(pattern).as_str().contains("[0-9]+"));
        }
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("PT15M33S"), 933);
        assert_eq!(parse_duration("PT1H"), 3600);
        assert_eq!(parse_duration("PT1H2M3S"), 3723);
        assert_eq!(parse_duration("PT45S"), 45);
        assert_eq!(parse_duration("PT10M15S"), 615);
        assert_eq!(parse_duration(""), 0);
    }

    #[test]
    fn test_parse_duration_malformed() {
        assert_eq!(parse_duration("P0D"), 0);
        assert_eq!(parse_duration("garbage"), 0);
        // Components are located independently, regardless of order
        assert_eq!(parse_duration("PT5S3M"), 185);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(933), "15:33");
        assert_eq!(format_duration(3600), "1:00:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(36125), "10:02:05");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
        assert_eq!(format_thousands(100000), "100,000");
    }

    #[test]
    fn test_date_portion() {
        assert_eq!(date_portion("2024-05-01T12:30:00Z"), "2024-05-01");
        assert_eq!(date_portion("2024-05-01"), "2024-05-01");
        assert_eq!(date_portion(""), "");
    }

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a, b"), "\"a, b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_first_integer() {
        assert_eq!(first_integer("2"), Some("2"));
        assert_eq!(first_integer("Video #12."), Some("12"));
        assert_eq!(first_integer("3 or 4"), Some("3"));
        assert_eq!(first_integer("none"), None);
        assert_eq!(first_integer(""), None);
    }
}
