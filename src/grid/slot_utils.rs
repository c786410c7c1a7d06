use crate::error::{GridError, Result};

/// Slot granularity in minutes
pub const SLOT_MINUTES: u32 = 30;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parses a time string (HH:MM) to minutes since midnight.
/// `24:00` is accepted as the end of the day.
pub fn parse_time_to_minutes(time_str: &str) -> Option<u32> {
    let (hours, minutes) = time_str.trim().split_once(':')?;
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }
    if !all_digits(hours) || !all_digits(minutes) {
        return None;
    }
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 24 || minutes >= 60 {
        return None;
    }
    let total = hours * 60 + minutes;
    if total > MINUTES_PER_DAY {
        return None;
    }
    Some(total)
}

/// Formats minutes since midnight to time string (HH:MM)
pub fn minutes_to_time_string(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn parse_or_err(time_str: &str) -> Result<u32> {
    parse_time_to_minutes(time_str).ok_or_else(|| GridError::InvalidTime(time_str.to_string()))
}

/// Generates the ordered time slots for `[start, end)` in 30-minute steps.
///
/// The end time itself is never a slot. A range with `start >= end` is a
/// configuration error rather than an empty grid.
pub fn generate_slots(start: &str, end: &str) -> Result<Vec<String>> {
    let start_minutes = parse_or_err(start)?;
    let end_minutes = parse_or_err(end)?;

    if start_minutes >= end_minutes {
        return Err(GridError::InvalidTimeRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    Ok((start_minutes..end_minutes)
        .step_by(SLOT_MINUTES as usize)
        .map(minutes_to_time_string)
        .collect())
}

/// Whether a time falls on the 30-minute grid
pub fn is_slot_aligned(time_str: &str) -> bool {
    parse_time_to_minutes(time_str).is_some_and(|m| m % SLOT_MINUTES == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time_to_minutes("00:00"), Some(0));
        assert_eq!(parse_time_to_minutes("09:30"), Some(570));
        assert_eq!(parse_time_to_minutes("9:30"), Some(570));
        assert_eq!(parse_time_to_minutes("24:00"), Some(1440));
        assert_eq!(parse_time_to_minutes("24:30"), None);
        assert_eq!(parse_time_to_minutes("10:60"), None);
        assert_eq!(parse_time_to_minutes("10:5"), None);
        assert_eq!(parse_time_to_minutes("09:00G"), None);
        assert_eq!(parse_time_to_minutes("noon"), None);
        assert_eq!(parse_time_to_minutes("+9:00"), None);
        assert_eq!(parse_time_to_minutes("099:00"), None);
        assert_eq!(parse_time_to_minutes("25:00"), None);
    }

    #[test]
    fn test_oversized_hours_are_invalid() {
        assert_eq!(parse_time_to_minutes("99999999:00"), None);
        assert_eq!(parse_time_to_minutes("1073741824:00"), None);
        assert!(matches!(
            generate_slots("99999999:00", "10:00"),
            Err(GridError::InvalidTime(_))
        ));
        assert!(matches!(
            generate_slots("1073741824:00", "01:00"),
            Err(GridError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_generate_slots_half_open() {
        let slots = generate_slots("09:00", "10:00").unwrap();
        assert_eq!(slots, vec!["09:00", "09:30"]);
    }

    #[test]
    fn test_generate_slots_until_midnight() {
        let slots = generate_slots("23:00", "24:00").unwrap();
        assert_eq!(slots, vec!["23:00", "23:30"]);
    }

    #[test]
    fn test_generate_slots_unaligned_end() {
        // The last slot still starts before the end
        let slots = generate_slots("09:00", "10:15").unwrap();
        assert_eq!(slots, vec!["09:00", "09:30", "10:00"]);
    }

    #[test]
    fn test_generate_slots_rejects_empty_range() {
        assert!(matches!(
            generate_slots("10:00", "10:00"),
            Err(GridError::InvalidTimeRange { .. })
        ));
        assert!(matches!(
            generate_slots("11:00", "10:00"),
            Err(GridError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn test_generate_slots_rejects_bad_time() {
        assert!(matches!(
            generate_slots("09:00G", "10:00"),
            Err(GridError::InvalidTime(_))
        ));
    }

    proptest! {
        #[test]
        fn slot_count_matches_range(start in 0u32..48, len in 1u32..48) {
            let end = (start + len).min(48);
            prop_assume!(start < end);
            let start_str = minutes_to_time_string(start * 30);
            let end_str = minutes_to_time_string(end * 30);
            let slots = generate_slots(&start_str, &end_str).unwrap();

            prop_assert_eq!(slots.len() as u32, end - start);
            prop_assert!(!slots.contains(&end_str));
            let minutes: Vec<u32> = slots.iter().filter_map(|s| parse_time_to_minutes(s)).collect();
            prop_assert!(minutes.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
