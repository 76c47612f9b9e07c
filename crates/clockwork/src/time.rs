use std::f64::consts::PI;
use thiserror::Error;

const DEG_TO_RAD: f64 = PI / 180.0;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TimeError {
    #[error("Time {0:02}:{1:02}:{2:02} is out of range")]
    OutOfRange(u32, u32, u32),
}

/// One reading of the wall clock on a twelve-hour dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimeSample {
    hour: u32,
    minute: u32,
    second: u32,
}

impl TimeSample {
    /// `hour` must already be reduced to `0..12`.
    pub fn new(hour: u32, minute: u32, second: u32) -> Result<Self, TimeError> {
        if hour < 12 && minute < 60 && second < 60 {
            Ok(Self {
                hour,
                minute,
                second,
            })
        } else {
            Err(TimeError::OutOfRange(hour, minute, second))
        }
    }

    /// Folds a 24-hour reading onto the dial.
    pub fn from_24h(hour: u32, minute: u32, second: u32) -> Result<Self, TimeError> {
        if hour >= 24 {
            return Err(TimeError::OutOfRange(hour, minute, second));
        }
        Self::new(hour % 12, minute, second)
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn second(&self) -> u32 {
        self.second
    }

    /// The sample one second later, wrapping at twelve o'clock.
    pub fn succ(self) -> Self {
        let total = (self.hour * 3600 + self.minute * 60 + self.second + 1) % (12 * 3600);
        Self {
            hour: total / 3600,
            minute: total / 60 % 60,
            second: total % 60,
        }
    }
}

/// Hand rotations in radians, clockwise from twelve o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl From<TimeSample> for HandAngles {
    fn from(t: TimeSample) -> Self {
        let (h, m, s) = (f64::from(t.hour), f64::from(t.minute), f64::from(t.second));
        Self {
            // 30° an hour, half a degree a minute, 1/120° a second
            hour: (30.0 * h + 0.5 * m + s / 120.0) * DEG_TO_RAD,
            minute: (6.0 * m + 0.1 * s) * DEG_TO_RAD,
            second: 6.0 * s * DEG_TO_RAD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angles(h: u32, m: u32, s: u32) -> HandAngles {
        TimeSample::new(h, m, s).unwrap().into()
    }

    #[test]
    fn test_midnight_is_zero() {
        assert_eq!(
            angles(0, 0, 0),
            HandAngles {
                hour: 0.0,
                minute: 0.0,
                second: 0.0
            }
        );
    }

    #[test]
    fn test_last_second_stays_below_full_turn() {
        let a = angles(11, 59, 59);
        assert!(a.hour < 2.0 * PI);
        assert!(a.hour > 11.0 * 30.0 * DEG_TO_RAD);
        assert!(a.minute < 2.0 * PI);
        assert!(a.second < 2.0 * PI);
    }

    #[test]
    fn test_angles_glide_through_every_hour() {
        for h in 0..12 {
            let mut t = TimeSample::new(h, 0, 0).unwrap();
            let mut prev = HandAngles::from(t);
            for _ in 0..3599 {
                t = t.succ();
                let next = HandAngles::from(t);
                assert!(next.hour > prev.hour, "hour hand stepped back at {t:?}");
                if t.second() != 0 {
                    assert!(next.minute > prev.minute);
                }
                prev = next;
            }
            let top = HandAngles::from(t.succ());
            let base = f64::from((h + 1) % 12) * 30.0 * DEG_TO_RAD;
            assert_eq!(top.hour, base);
            assert_eq!(top.minute, 0.0);
            assert!(prev.hour < base || h == 11);
        }
    }

    #[test]
    fn test_minute_hand_wraps_exactly_on_the_hour() {
        let before = angles(3, 59, 59);
        let after = angles(4, 0, 0);
        assert!(before.minute < 2.0 * PI);
        assert_eq!(after.minute, 0.0);
        assert_eq!(after.hour, 120.0 * DEG_TO_RAD);
    }

    #[test]
    fn test_24h_readings_fold_onto_dial() {
        assert_eq!(TimeSample::from_24h(13, 5, 0).unwrap().hour(), 1);
        assert_eq!(TimeSample::from_24h(0, 0, 0).unwrap().hour(), 0);
        assert_eq!(TimeSample::from_24h(12, 0, 0).unwrap().hour(), 0);
        assert!(TimeSample::from_24h(24, 0, 0).is_err());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(
            TimeSample::new(12, 0, 0),
            Err(TimeError::OutOfRange(12, 0, 0))
        );
        assert!(TimeSample::new(0, 60, 0).is_err());
        assert!(TimeSample::new(0, 0, 60).is_err());
    }

    #[test]
    fn test_succ_wraps_at_twelve() {
        let t = TimeSample::new(11, 59, 59).unwrap().succ();
        assert_eq!((t.hour(), t.minute(), t.second()), (0, 0, 0));
    }
}
