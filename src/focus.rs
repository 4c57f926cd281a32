use crate::domain::FocusMode;
use crate::error::TaskError;
use crate::notifications::Notifier;
use log::info;

pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
pub const BREAK_MINUTES: u32 = 5;
pub const MIN_FOCUS_MINUTES: u32 = 1;
pub const MAX_FOCUS_MINUTES: u32 = 120;

/// Pomodoro countdown alternating focus and break phases.
/// Advanced one second per [`PomodoroTimer::tick`].
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    pub mode: FocusMode,
    /// Seconds left in the current phase
    pub time_left: u32,
    pub active: bool,
    pub custom_minutes: u32,
    pub task_title: Option<String>,
}

fn validate_minutes(minutes: u32) -> Result<u32, TaskError> {
    if (MIN_FOCUS_MINUTES..=MAX_FOCUS_MINUTES).contains(&minutes) {
        Ok(minutes)
    } else {
        Err(TaskError::InvalidMinutes(minutes))
    }
}

impl PomodoroTimer {
    pub fn new(minutes: u32, task_title: Option<String>) -> Result<Self, TaskError> {
        let minutes = validate_minutes(minutes)?;
        Ok(Self {
            mode: FocusMode::Focus,
            time_left: minutes * 60,
            active: false,
            custom_minutes: minutes,
            task_title,
        })
    }

    /// Length of the current phase in seconds
    pub fn phase_length(&self) -> u32 {
        match self.mode {
            FocusMode::Focus => self.custom_minutes * 60,
            FocusMode::Break => BREAK_MINUTES * 60,
        }
    }

    /// Change the focus length. The countdown only picks it up while idle in focus mode.
    pub fn set_minutes(&mut self, minutes: u32) -> Result<(), TaskError> {
        self.custom_minutes = validate_minutes(minutes)?;
        if !self.active && self.mode == FocusMode::Focus {
            self.time_left = self.custom_minutes * 60;
        }
        Ok(())
    }

    pub fn toggle(&mut self) {
        self.active = !self.active;
    }

    /// Stop and rewind the current phase
    pub fn reset(&mut self) {
        self.active = false;
        self.time_left = self.phase_length();
    }

    /// Count down one second. Returns the new mode when a phase just ended.
    pub fn tick(&mut self, notifier: &dyn Notifier) -> Option<FocusMode> {
        if !self.active || self.time_left == 0 {
            return None;
        }

        self.time_left -= 1;
        if self.time_left > 0 {
            return None;
        }

        self.active = false;
        self.complete_phase(notifier);
        Some(self.mode)
    }

    fn complete_phase(&mut self, notifier: &dyn Notifier) {
        match self.mode {
            FocusMode::Focus => {
                notifier.notify("Pomodoro Completed!", "Great job! Take a short break.");
                self.mode = FocusMode::Break;
            }
            FocusMode::Break => {
                notifier.notify("Break Over!", "Ready to focus again?");
                self.mode = FocusMode::Focus;
            }
        }
        self.time_left = self.phase_length();
        info!(
            "event=focus_phase module=focus next={} minutes={}",
            self.mode.name(),
            self.time_left / 60
        );
    }

    /// Remaining time as MM:SS
    pub fn format_time(&self) -> String {
        format!("{:02}:{:02}", self.time_left / 60, self.time_left % 60)
    }

    /// Share of the current phase already elapsed, 0..=100
    pub fn progress_percent(&self) -> f64 {
        let length = self.phase_length();
        if length == 0 {
            return 0.0;
        }
        100.0 - (self.time_left as f64 / length as f64) * 100.0
    }
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self {
            mode: FocusMode::Focus,
            time_left: DEFAULT_FOCUS_MINUTES * 60,
            active: false,
            custom_minutes: DEFAULT_FOCUS_MINUTES,
            task_title: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::testing::RecordingNotifier;

    #[test]
    fn test_new_validates_minutes() {
        assert_eq!(PomodoroTimer::new(0, None).unwrap_err(), TaskError::InvalidMinutes(0));
        assert!(PomodoroTimer::new(121, None).is_err());
        let timer = PomodoroTimer::new(120, None).unwrap();
        assert_eq!(timer.time_left, 7200);
        assert_eq!(timer.format_time(), "120:00");
    }

    #[test]
    fn test_tick_only_while_active() {
        let notifier = RecordingNotifier::default();
        let mut timer = PomodoroTimer::default();

        assert_eq!(timer.tick(&notifier), None);
        assert_eq!(timer.time_left, 1500);

        timer.toggle();
        timer.tick(&notifier);
        assert_eq!(timer.format_time(), "24:59");
    }

    #[test]
    fn test_focus_then_break_cycle() {
        let notifier = RecordingNotifier::default();
        let mut timer = PomodoroTimer::new(1, Some("Write".to_string())).unwrap();
        timer.toggle();

        for _ in 0..59 {
            assert_eq!(timer.tick(&notifier), None);
        }
        assert_eq!(timer.tick(&notifier), Some(FocusMode::Break));
        assert!(!timer.active);
        assert_eq!(timer.time_left, BREAK_MINUTES * 60);
        assert_eq!(notifier.sent()[0].0, "Pomodoro Completed!");

        timer.toggle();
        for _ in 0..(BREAK_MINUTES * 60 - 1) {
            timer.tick(&notifier);
        }
        assert_eq!(timer.tick(&notifier), Some(FocusMode::Focus));
        assert_eq!(timer.time_left, 60);
        assert_eq!(notifier.sent()[1].0, "Break Over!");
    }

    #[test]
    fn test_set_minutes_only_reloads_when_idle_in_focus() {
        let notifier = RecordingNotifier::default();
        let mut timer = PomodoroTimer::default();

        timer.set_minutes(10).unwrap();
        assert_eq!(timer.time_left, 600);

        timer.toggle();
        timer.tick(&notifier);
        timer.set_minutes(30).unwrap();
        assert_eq!(timer.time_left, 599);
        assert_eq!(timer.custom_minutes, 30);

        assert!(timer.set_minutes(500).is_err());
        assert_eq!(timer.custom_minutes, 30);
    }

    #[test]
    fn test_reset_and_progress() {
        let notifier = RecordingNotifier::default();
        let mut timer = PomodoroTimer::new(2, None).unwrap();
        timer.toggle();
        for _ in 0..60 {
            timer.tick(&notifier);
        }
        assert!((timer.progress_percent() - 50.0).abs() < f64::EPSILON);

        timer.reset();
        assert!(!timer.active);
        assert_eq!(timer.time_left, 120);
        assert_eq!(timer.progress_percent(), 0.0);
    }
}
