//! Seconds from now until a local time of day

use crate::clock::{LocalTime, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};

/// Signed seconds from `now` to `hour:minute:00` today
///
/// Negative when the target has already passed today.
pub fn offset_to(now: LocalTime, hour: u8, minute: u8) -> i32 {
    (hour as i32 - now.hour as i32) * SECONDS_PER_HOUR as i32
        + (minute as i32 - now.minute as i32) * SECONDS_PER_MINUTE as i32
        - now.second as i32
}

/// Seconds until the next occurrence of `hour:minute:00`
///
/// Always in `1..=SECONDS_PER_DAY`: a target that has passed, or is exactly
/// now, lands on the following day.
pub fn next_offset(now: LocalTime, hour: u8, minute: u8) -> u32 {
    let offset = offset_to(now, hour, minute);
    let offset = if offset <= 0 {
        offset + SECONDS_PER_DAY as i32
    } else {
        offset
    };
    offset as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_passed_target_rolls_to_next_day() {
        let now = LocalTime::new(20, 0, 0);
        assert_eq!(offset_to(now, 9, 0), -39_600);
        assert_eq!(next_offset(now, 9, 0), 46_800);
    }

    #[test]
    fn test_later_today() {
        let now = LocalTime::new(8, 30, 15);
        assert_eq!(next_offset(now, 9, 0), 29 * 60 + 45);
    }

    #[test]
    fn test_exactly_now_is_tomorrow() {
        let now = LocalTime::new(17, 0, 0);
        assert_eq!(next_offset(now, 17, 0), SECONDS_PER_DAY);
    }

    #[test]
    fn test_seconds_into_target_minute() {
        // Target minute already started: next day, minus the elapsed seconds
        let now = LocalTime::new(17, 0, 30);
        assert_eq!(next_offset(now, 17, 0), SECONDS_PER_DAY - 30);
    }

    proptest! {
        #[test]
        fn prop_offset_strictly_future_within_a_day(
            now_s in 0u32..SECONDS_PER_DAY,
            hour in 0u8..24,
            minute in 0u8..60,
        ) {
            let now = LocalTime::from_seconds_of_day(now_s);
            let offset = next_offset(now, hour, minute);
            prop_assert!(offset > 0);
            prop_assert!(offset <= SECONDS_PER_DAY);

            // Lands exactly on the target time of day
            let landed = LocalTime::from_seconds_of_day(now_s + offset);
            prop_assert_eq!(landed, LocalTime::new(hour, minute, 0));
        }
    }
}
