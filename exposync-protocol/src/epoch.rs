//! Calendar correction for the text protocol
//!
//! The Magellan receivers report dates against a shifted epoch. The true UTC
//! date is 19 years and 229 days after the reported one.

/// Years added to the reported year
pub const EPOCH_YEAR_OFFSET: u16 = 19;

/// Days added after the year offset has been applied
pub const EPOCH_DAY_OFFSET: i16 = 229;

/// Gregorian leap-year rule
pub const fn is_leap_year(year: u16) -> bool {
    if year % 4 != 0 {
        return false;
    }
    if year % 100 != 0 {
        return true;
    }
    year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`, or 0 for an invalid month
pub const fn days_in_month(month: u8, year: u16) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// A calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarDate {
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

impl CalendarDate {
    /// Check that the day exists in the month
    pub fn is_valid(&self) -> bool {
        self.day >= 1 && self.day <= days_in_month(self.month, self.year)
    }
}

/// Convert a reported (day, month, year) into the true UTC date
///
/// Returns `None` when the reported fields are out of range (month outside
/// 1-12, day outside 1-31, or a year that would overflow).
pub fn correct_epoch(day: u8, month: u8, year: u16) -> Option<CalendarDate> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    let mut year = year.checked_add(EPOCH_YEAR_OFFSET)?;
    let mut month = month;
    let mut correction = EPOCH_DAY_OFFSET;

    // Walk forward a month at a time. The running correction may go
    // negative, in which case day + correction still lands inside the month.
    while day as i16 + correction > days_in_month(month, year) as i16 {
        correction -= days_in_month(month, year) as i16;
        month += 1;
        if month > 12 {
            month = 1;
            year = year.checked_add(1)?;
        }
    }

    Some(CalendarDate {
        day: (day as i16 + correction) as u8,
        month,
        year,
    })
}
