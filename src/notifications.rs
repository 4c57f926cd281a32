//! Notification delivery
//!
//! Desktop notifications go through `osascript` on macOS and `notify-send`
//! on Linux. When neither is available the alert is written to the terminal.

use log::{debug, warn};
#[cfg(unix)]
use std::process::Command;

/// Capability to alert the user
pub trait Notifier {
    fn notify(&self, title: &str, body: &str);
}

/// Synchronous terminal alert
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, body: &str) {
        eprintln!("{}", terminal_alert(title, body));
    }
}

fn terminal_alert(title: &str, body: &str) -> String {
    if body.is_empty() {
        title.to_string()
    } else {
        format!("{}\n  {}", title, body)
    }
}

/// Desktop notification with a terminal fallback
#[derive(Debug, Clone, Copy)]
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn send_desktop(&self, title: &str, body: &str) -> std::io::Result<bool> {
        #[cfg(target_os = "macos")]
        {
            let script = format!(
                r#"display notification "{}" with title "{}""#,
                body.replace('"', "\\\""),
                title.replace('"', "\\\"")
            );
            let output = Command::new("osascript").arg("-e").arg(&script).output()?;
            Ok(output.status.success())
        }

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let output = Command::new("notify-send")
                .arg("--app-name=NoteDo")
                .arg(title)
                .arg(body)
                .output()?;
            Ok(output.status.success())
        }

        #[cfg(not(unix))]
        {
            let _ = (title, body);
            Ok(false)
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) {
        if self.enabled {
            match self.send_desktop(title, body) {
                Ok(true) => {
                    debug!("event=notify module=notifications status=ok channel=desktop");
                    return;
                }
                Ok(false) => {
                    warn!("event=notify module=notifications status=rejected channel=desktop");
                }
                Err(err) => {
                    warn!(
                        "event=notify module=notifications status=unavailable channel=desktop err={}",
                        err
                    );
                }
            }
        }
        TerminalNotifier.notify(title, body);
    }
}

#[cfg(test)]
pub mod testing {
    use super::Notifier;
    use std::cell::RefCell;

    /// Collects notifications instead of delivering them
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        sent: RefCell<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        pub fn sent(&self) -> Vec<(String, String)> {
            self.sent.borrow().clone()
        }

        pub fn count(&self) -> usize {
            self.sent.borrow().len()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, title: &str, body: &str) {
            self.sent
                .borrow_mut()
                .push((title.to_string(), body.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingNotifier;
    use super::*;

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::default();
        notifier.notify("Reminder: A", "body");
        assert_eq!(notifier.sent(), vec![("Reminder: A".to_string(), "body".to_string())]);
    }

    #[test]
    fn test_terminal_alert_is_plain_text() {
        assert_eq!(terminal_alert("Reminder: Call", ""), "Reminder: Call");
        assert_eq!(
            terminal_alert("Reminder: Call", "Ask about Sunday"),
            "Reminder: Call\n  Ask about Sunday"
        );
    }

    #[test]
    fn test_disabled_desktop_falls_back_without_panicking() {
        DesktopNotifier::new(false).notify("title", "");
    }
}
