
#[inline]
pub const fn is_leap (year: i32) -> bool {
    ((year % 4 == 0) && (year % 100 != 0)) || (year % 400 == 0)
}

/// Length of `month` in `year`; `None` for a month outside 1..=12.
pub const fn days_of_month (year: i32, month: u32) -> Option<u32> {
    const NO_LEAP_EOM: [u32; 13] = [
        0, 31, 28, 31, 30,
        31, 30, 31, 31, 30,
        31, 30, 31
    ];

    const LEAP_EOM: [u32; 13] = [
        0, 31, 29, 31, 30,
        31, 30, 31, 31, 30,
        31, 30, 31
    ];

    if month == 0 || month > 12 {
        return None;
    }

    if is_leap(year) {
        Some(LEAP_EOM[month as usize])
    } else {
        Some(NO_LEAP_EOM[month as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_lengths() {
        assert_eq!(days_of_month(2024, 2), Some(29));
        assert_eq!(days_of_month(2023, 2), Some(28));
        assert_eq!(days_of_month(1900, 2), Some(28));
        assert_eq!(days_of_month(2000, 2), Some(29));
        assert_eq!(days_of_month(2023, 12), Some(31));
        assert_eq!(days_of_month(2023, 13), None);
        assert!(!is_leap(2100));
    }
}
