use std::time::Duration;

/// Reminder loop tick interval in milliseconds
pub const WATCH_TICK_MS: u64 = 1000;

/// Focus countdown advances one second per tick
pub const FOCUS_TICK_MS: u64 = 1000;

/// Number of watch ticks between reloads of the task file
pub const RELOAD_EVERY_TICKS: u32 = 15;

/// Get the reminder loop tick duration
pub fn watch_tick() -> Duration {
    Duration::from_millis(WATCH_TICK_MS)
}

/// Get the focus countdown tick duration
pub fn focus_tick() -> Duration {
    Duration::from_millis(FOCUS_TICK_MS)
}

/// Whether tick number `tick` should re-read the store
pub fn should_reload(tick: u32) -> bool {
    tick > 0 && tick % RELOAD_EVERY_TICKS == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_durations() {
        assert_eq!(watch_tick(), Duration::from_secs(1));
        assert_eq!(focus_tick(), Duration::from_secs(1));
    }

    #[test]
    fn test_should_reload() {
        assert!(!should_reload(0));
        assert!(!should_reload(1));
        assert!(should_reload(RELOAD_EVERY_TICKS));
        assert!(should_reload(RELOAD_EVERY_TICKS * 2));
    }
}
