use anyhow::{Context, Result, bail};
use chrono::{Days, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

use gymrat_core::models::{MacroTotals, WorkoutSet};

pub(crate) fn parse_grams(s: &str) -> Result<f64> {
    let trimmed = s.trim().trim_end_matches('g').trim();
    let value: f64 = trimmed
        .parse()
        .with_context(|| format!("Invalid quantity: '{s}'. Use a number like '150' or '150g'"))?;
    if !value.is_finite() || value <= 0.0 {
        bail!("Quantity must be greater than 0");
    }
    Ok(value)
}

pub(crate) fn parse_date(date_str: Option<String>) -> Result<NaiveDate> {
    match date_str {
        None => Ok(Local::now().date_naive()),
        Some(s) => match s.as_str() {
            "today" => Ok(Local::now().date_naive()),
            "yesterday" => Ok(Local::now().date_naive() - chrono::Duration::days(1)),
            "tomorrow" => Ok(Local::now().date_naive() + chrono::Duration::days(1)),
            _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d").with_context(|| {
                format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday/tomorrow")
            }),
        },
    }
}

/// `HH:MM` or `HH:MM:SS`; the current wall-clock time when absent.
pub(crate) fn parse_time(time_str: Option<&str>) -> Result<NaiveTime> {
    match time_str {
        None => {
            let now = Local::now().time();
            Ok(now.with_nanosecond(0).unwrap_or(now))
        }
        Some(s) => NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .with_context(|| format!("Invalid time '{s}'. Use HH:MM")),
    }
}

pub(crate) fn parse_timestamp(date: Option<String>, time: Option<&str>) -> Result<NaiveDateTime> {
    Ok(parse_date(date)?.and_time(parse_time(time)?))
}

/// Parse `WEIGHTxREPS[@RPE]`, e.g. `100x8@9`, `62.5x10` or `bwx12` for bodyweight.
pub(crate) fn parse_set(s: &str) -> Result<WorkoutSet> {
    let invalid = || format!("Invalid set '{s}'. Use WEIGHTxREPS[@RPE], e.g. 100x8@9");

    let lower = s.trim().to_lowercase();
    let (load, rpe) = match lower.split_once('@') {
        Some((load, rpe)) => {
            let rpe: u8 = rpe.trim().parse().with_context(invalid)?;
            (load, Some(rpe))
        }
        None => (lower.as_str(), None),
    };
    let (weight, reps) = load.split_once('x').with_context(invalid)?;
    let weight_kg = match weight.trim() {
        "bw" => 0.0,
        w => w.parse().with_context(invalid)?,
    };
    let reps: u32 = reps.trim().parse().with_context(invalid)?;

    let set = WorkoutSet {
        weight_kg,
        reps,
        rpe,
    };
    set.validate().with_context(invalid)?;
    Ok(set)
}

/// First day of a window of `days` days ending on `today`.
pub(crate) fn window_start(today: NaiveDate, days: u32) -> Result<NaiveDate> {
    today
        .checked_sub_days(Days::new(u64::from(days.max(1) - 1)))
        .with_context(|| format!("A window of {days} days reaches before the earliest date"))
}

pub(crate) fn format_macros(m: &MacroTotals) -> String {
    let cal = no_neg_zero(m.calories);
    let p = no_neg_zero(m.protein_g);
    let c = no_neg_zero(m.carbs_g);
    let f = no_neg_zero(m.fat_g);
    format!("{cal:.0} kcal | P:{p:.0}g C:{c:.0}g F:{f:.0}g")
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn no_neg_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grams() {
        assert!((parse_grams("200").unwrap() - 200.0).abs() < f64::EPSILON);
        assert!((parse_grams("200g").unwrap() - 200.0).abs() < f64::EPSILON);
        assert!((parse_grams("62.5 g").unwrap() - 62.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_grams_invalid() {
        assert!(parse_grams("abc").is_err());
        assert!(parse_grams("0").is_err());
        assert!(parse_grams("-50g").is_err());
    }

    #[test]
    fn test_parse_date_none() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date(None).unwrap(), today);
    }

    #[test]
    fn test_parse_date_keywords() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date(Some("today".to_string())).unwrap(), today);
        assert_eq!(
            parse_date(Some("yesterday".to_string())).unwrap(),
            today - chrono::Duration::days(1)
        );
    }

    #[test]
    fn test_parse_date_iso() {
        let date = parse_date(Some("2024-01-15".to_string())).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert!(parse_date(Some("nope".to_string())).is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(
            parse_time(Some("07:30")).unwrap(),
            NaiveTime::from_hms_opt(7, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time(Some("18:05:09")).unwrap(),
            NaiveTime::from_hms_opt(18, 5, 9).unwrap()
        );
        assert!(parse_time(Some("25:00")).is_err());
        assert!(parse_time(Some("noon")).is_err());
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp(Some("2024-06-15".to_string()), Some("12:00")).unwrap();
        assert_eq!(
            ts,
            NaiveDate::from_ymd_opt(2024, 6, 15)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_parse_set() {
        let set = parse_set("100x8@9").unwrap();
        assert!((set.weight_kg - 100.0).abs() < f64::EPSILON);
        assert_eq!(set.reps, 8);
        assert_eq!(set.rpe, Some(9));

        let set = parse_set("62.5X10").unwrap();
        assert!((set.weight_kg - 62.5).abs() < f64::EPSILON);
        assert_eq!(set.rpe, None);

        let set = parse_set("bwx12@7").unwrap();
        assert!(set.weight_kg.abs() < f64::EPSILON);
        assert_eq!(set.reps, 12);
    }

    #[test]
    fn test_parse_set_invalid() {
        assert!(parse_set("100").is_err());
        assert!(parse_set("100x").is_err());
        assert!(parse_set("100x0").is_err());
        assert!(parse_set("100x8@11").is_err());
        assert!(parse_set("-20x8").is_err());
        assert!(parse_set("heavyx8").is_err());
    }

    #[test]
    fn test_window_start() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert_eq!(
            window_start(today, 7).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 24).unwrap()
        );
        assert_eq!(window_start(today, 0).unwrap(), today);
        assert!(window_start(today, u32::MAX).is_err());
    }

    #[test]
    fn test_format_macros() {
        let m = MacroTotals::new(311.2, 13.5, 53.0, -0.0);
        assert_eq!(format_macros(&m), "311 kcal | P:14g C:53g F:0g");
    }

    #[test]
    fn test_json_error() {
        assert_eq!(json_error("Entry x not found"), r#"{"error":"Entry x not found"}"#);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
        assert_eq!(truncate("Crème fraîche", 10), "Crème f...");
    }

    #[test]
    fn test_no_neg_zero() {
        assert_eq!(no_neg_zero(-0.0).to_bits(), 0.0_f64.to_bits());
        assert_eq!(no_neg_zero(5.0), 5.0);
    }
}
