//! Countdown to the wedding instant.

const SECOND_MS: i64 = 1000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Time left from `now_ms` until `target_ms`, clamped to zero.
    pub fn between(now_ms: i64, target_ms: i64) -> Self {
        let distance = target_ms - now_ms;
        if distance <= 0 {
            return Self::ZERO;
        }
        Self {
            days: distance / DAY_MS,
            hours: distance % DAY_MS / HOUR_MS,
            minutes: distance % HOUR_MS / MINUTE_MS,
            seconds: distance % MINUTE_MS / SECOND_MS,
        }
    }

    pub fn is_over(&self) -> bool {
        *self == Self::ZERO
    }

    /// Texts for the days / hours / minutes / seconds cells.
    ///
    /// Hours, minutes and seconds are zero-padded while counting; once the
    /// instant has passed every cell shows a plain `0`.
    pub fn labels(&self) -> [String; 4] {
        if self.is_over() {
            return ["0", "0", "0", "0"].map(str::to_string);
        }
        [
            self.days.to_string(),
            format!("{:02}", self.hours),
            format!("{:02}", self.minutes),
            format!("{:02}", self.seconds),
        ]
    }
}

/// Element ids of the four countdown cells, in [`Remaining::labels`] order.
pub const CELL_IDS: [&str; 4] = [
    "countdown-days",
    "countdown-hours",
    "countdown-minutes",
    "countdown-seconds",
];

#[derive(Clone, Copy, Debug)]
pub struct Countdown {
    target_ms: i64,
}

impl Countdown {
    pub fn new(target_ms: i64) -> Self {
        Self { target_ms }
    }

    pub fn tick(&self, now_ms: i64) -> Remaining {
        Remaining::between(now_ms, self.target_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_766_912_400_000;

    #[test]
    fn one_day_one_hour_two_minutes_five_seconds() {
        let remaining = Countdown::new(T).tick(T - 90_125_000);
        assert_eq!(
            remaining,
            Remaining {
                days: 1,
                hours: 1,
                minutes: 2,
                seconds: 5
            }
        );
        assert_eq!(remaining.labels(), ["1", "01", "02", "05"]);
    }

    #[test]
    fn partial_seconds_round_down() {
        let remaining = Countdown::new(T).tick(T - 1_999);
        assert_eq!(remaining.seconds, 1);
    }

    #[test]
    fn past_target_clamps_to_zero() {
        let countdown = Countdown::new(T);
        assert_eq!(countdown.tick(T), Remaining::ZERO);
        assert_eq!(countdown.tick(T + 5_000), Remaining::ZERO);
        assert_eq!(countdown.tick(T + 5_000).labels(), ["0", "0", "0", "0"]);
    }

    #[test]
    fn large_day_counts_are_not_padded() {
        let remaining = Countdown::new(T).tick(T - 120 * DAY_MS);
        assert_eq!(remaining.labels(), ["120", "00", "00", "00"]);
    }
}
