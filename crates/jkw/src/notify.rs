use crate::watch::Change;
use jkw_core::ResultStatus;

/// Notification summary and freedesktop icon name for a change.
pub fn summary(change: &Change) -> (&'static str, &'static str) {
    match change {
        Change::Started { .. } => ("Build Started", "dialog-information"),
        Change::Finished {
            result: ResultStatus::Success,
            ..
        } => ("Build Passed", "dialog-information"),
        Change::Finished {
            result: ResultStatus::Failure,
            ..
        } => ("Build Failed", "dialog-error"),
        Change::Finished { .. } => ("Build Finished", "dialog-information"),
    }
}

#[cfg(feature = "desktop-notify")]
pub fn send_desktop(change: &Change) {
    use notify_rust::{Notification, Urgency};

    let (summary, icon) = summary(change);
    let urgency = match change {
        Change::Finished {
            result: ResultStatus::Failure,
            ..
        } => Urgency::Critical,
        _ => Urgency::Normal,
    };
    if let Err(e) = Notification::new()
        .summary(summary)
        .body(&change.message())
        .icon(icon)
        .urgency(urgency)
        .show()
    {
        tracing::debug!("desktop notification failed: {e}");
    }
}

#[cfg(not(feature = "desktop-notify"))]
pub fn send_desktop(_change: &Change) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_uses_error_icon() {
        let change = Change::Finished {
            job: "api".to_string(),
            result: ResultStatus::Failure,
        };
        assert_eq!(summary(&change), ("Build Failed", "dialog-error"));
    }

    #[test]
    fn start_and_other_results() {
        assert_eq!(
            summary(&Change::Started { job: "api".to_string() }).0,
            "Build Started"
        );
        let aborted = Change::Finished {
            job: "api".to_string(),
            result: ResultStatus::Aborted,
        };
        assert_eq!(summary(&aborted).0, "Build Finished");
    }
}
