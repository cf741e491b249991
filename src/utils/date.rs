//! UTC timestamps without timezone dependencies.
//!
//! Provides a lightweight `DateTimeUtc` used for two things:
//!
//! - autoversion tokens (`2024-06-15T14:30:45` / `2024-06-15T14:30:45.123456`)
//! - HTTP dates for `Expires` headers (`Sat, 15 Jun 2024 14:30:45 GMT`)

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Precision used when formatting a timestamp as an ISO 8601 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Second,
    Microsecond,
}

/// UTC datetime without timezone complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeUtc {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub micros: u32,
}

impl DateTimeUtc {
    pub const fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            micros: 0,
        }
    }

    pub const fn with_micros(mut self, micros: u32) -> Self {
        self.micros = micros;
        self
    }

    /// Convert a `SystemTime`. Times before the epoch clamp to the epoch.
    pub fn from_system_time(time: SystemTime) -> Self {
        let since = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        Self::from_unix(since.as_secs()).with_micros(since.subsec_micros())
    }

    /// Build from seconds since the unix epoch.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn from_unix(secs: u64) -> Self {
        let days = (secs / 86_400) as i64;
        let rem = secs % 86_400;
        let (year, month, day) = civil_from_days(days);
        Self::new(
            year,
            month,
            day,
            (rem / 3600) as u8,
            ((rem % 3600) / 60) as u8,
            (rem % 60) as u8,
        )
    }

    /// Format as ISO 8601 without timezone suffix.
    pub fn to_iso(self, precision: Precision) -> String {
        let base = format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        );
        match precision {
            Precision::Second => base,
            Precision::Microsecond => format!("{base}.{:06}", self.micros),
        }
    }

    /// Format as an HTTP date (RFC 7231 IMF-fixdate).
    pub fn to_http_date(self) -> String {
        const WEEKDAYS: [&str; 7] = ["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"];
        const MONTHS: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];

        format!(
            "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
            WEEKDAYS[self.weekday_index()],
            self.day,
            MONTHS[usize::from(self.month - 1)],
            self.year,
            self.hour,
            self.minute,
            self.second
        )
    }

    // Zeller's congruence, 0 = Saturday
    #[allow(clippy::cast_sign_loss)]
    fn weekday_index(self) -> usize {
        let (y, m) = if self.month < 3 {
            (self.year - 1, i32::from(self.month) + 12)
        } else {
            (self.year, i32::from(self.month))
        };
        let d = i32::from(self.day);
        ((d + (13 * (m + 1)) / 5 + y + y / 4 - y / 100 + y / 400) % 7) as usize
    }
}

/// Days since 1970-01-01 to (year, month, day), proleptic Gregorian.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn civil_from_days(days: i64) -> (i32, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year as i32, month, day)
}
