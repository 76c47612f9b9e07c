use clockwork::scheduler::TimeSource;
use clockwork::time::TimeSample;

/// The local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn sample(&self) -> TimeSample {
        let now = match glib::DateTime::now_local() {
            Ok(now) => now,
            Err(e) => {
                log::warn!("Failed to read local time: {}", e);
                return TimeSample::default();
            }
        };
        let (h, m, s) = (now.hour(), now.minute(), now.second());
        TimeSample::from_24h(h as u32, m as u32, s as u32).unwrap_or_else(|e| {
            log::warn!("{}", e);
            TimeSample::default()
        })
    }
}
