//! Notification message rendering.
//!
//! One line per statistic in fixed order, the new value with thousands
//! grouping, and an optional signed delta annotation. A delta of exactly zero
//! renders no annotation at all.

use casewatch_common::StatisticsSnapshot;

use crate::detector;

/// Render the notification message for one country: flag line, four statistic
/// lines, source URL.
///
/// `old == None` is the first observation: values render with no delta
/// annotations, there being nothing to compare against.
pub fn format_message(
    flag: &str,
    old: Option<&StatisticsSnapshot>,
    new: &StatisticsSnapshot,
    source_url: &str,
) -> String {
    let delta = old.map(|o| detector::compute_delta(o, new));

    let lines = [
        (
            "Total cases",
            format_count(new.total_cases),
            delta.map(|d| count_annotation(d.total_cases)),
        ),
        (
            "Deaths",
            format_count(new.deaths),
            delta.map(|d| count_annotation(d.deaths)),
        ),
        (
            "Fatality rate",
            format!("{:.2}%", new.fatality_rate),
            delta.map(|d| rate_annotation(d.fatality_rate)),
        ),
        (
            "Recoveries",
            format_count(new.recoveries),
            delta.map(|d| count_annotation(d.recoveries)),
        ),
    ];

    let mut message = format!("{flag}\n");
    for (label, value, annotation) in lines {
        message.push_str(label);
        message.push_str(": ");
        message.push_str(&value);
        if let Some(annotation) = annotation {
            if !annotation.is_empty() {
                message.push(' ');
                message.push_str(&annotation);
            }
        }
        message.push('\n');
    }
    message.push_str(source_url);
    message
}

/// Group digits into thousands with commas: 1234567 → "1,234,567".
fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `(+N)` / `(-N)` with grouping. Empty only when the delta is exactly zero;
/// negative deltas take their sign from the numeral, no double minus.
fn count_annotation(delta: i64) -> String {
    if delta == 0 {
        return String::new();
    }
    if delta > 0 {
        format!("(+{})", format_count(delta as u64))
    } else {
        format!("(-{})", format_count(delta.unsigned_abs()))
    }
}

/// `(+N.NN%)` / `(-N.NN%)`, rounded half-up at the hundredths place. Empty
/// when the delta is exactly zero.
fn rate_annotation(delta: f64) -> String {
    if delta == 0.0 {
        return String::new();
    }
    format!("({:+.2}%)", round_hundredths(delta))
}

fn round_hundredths(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    use casewatch_common::RawFields;

    use crate::parser;
    use crate::testing::snapshot;

    #[test]
    fn delta_message_matches_expected_lines() {
        let old = snapshot(1000, 50, 5.00, 200);
        let new = snapshot(1050, 52, 4.95, 230);
        let message = format_message("🇲🇽", Some(&old), &new, "https://covid.example/mx");
        assert_eq!(
            message,
            "🇲🇽\n\
             Total cases: 1,050 (+50)\n\
             Deaths: 52 (+2)\n\
             Fatality rate: 4.95% (-0.05%)\n\
             Recoveries: 230 (+30)\n\
             https://covid.example/mx"
        );
    }

    #[test]
    fn unchanged_field_renders_no_annotation_and_no_trailing_space() {
        let old = snapshot(1000, 52, 5.00, 200);
        let new = snapshot(1050, 52, 5.00, 230);
        let message = format_message("🇲🇽", Some(&old), &new, "https://covid.example/mx");
        assert!(message.contains("\nDeaths: 52\n"));
        assert!(message.contains("\nFatality rate: 5.00%\n"));
    }

    #[test]
    fn first_observation_has_no_annotations() {
        let new = snapshot(1050, 52, 4.95, 230);
        let message = format_message("🇲🇽", None, &new, "https://covid.example/mx");
        assert_eq!(
            message,
            "🇲🇽\n\
             Total cases: 1,050\n\
             Deaths: 52\n\
             Fatality rate: 4.95%\n\
             Recoveries: 230\n\
             https://covid.example/mx"
        );
    }

    #[test]
    fn counts_group_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn count_annotations_sign_and_group() {
        assert_eq!(count_annotation(0), "");
        assert_eq!(count_annotation(50), "(+50)");
        assert_eq!(count_annotation(-12), "(-12)");
        assert_eq!(count_annotation(1_234), "(+1,234)");
    }

    #[test]
    fn rate_annotation_rounds_half_up_at_hundredths() {
        assert_eq!(rate_annotation(0.005), "(+0.01%)");
        assert_eq!(rate_annotation(-0.05), "(-0.05%)");
        assert_eq!(rate_annotation(0.0), "");
    }

    #[test]
    fn formatted_values_parse_back() {
        let original = snapshot(1_234_567, 89_012, 7.21, 345_678);
        let raw = RawFields {
            total_cases: format_count(original.total_cases),
            deaths: format_count(original.deaths),
            fatality_rate: format!("{:.2}%", original.fatality_rate),
            recoveries: format_count(original.recoveries),
        };
        let parsed = parser::parse_snapshot(&raw).unwrap();
        assert_eq!(parsed, original);
    }
}
