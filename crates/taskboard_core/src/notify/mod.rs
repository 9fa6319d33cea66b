use crate::error::AppError;
use tracing::warn;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxNotifier;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsNotifier;

pub const APP_NAME: &str = "taskboard";

/// Asks the user a yes/no question before a destructive action.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&self, _message: &str) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub summary: String,
    pub body: String,
}

impl Notice {
    pub fn new<S: Into<String>, B: Into<String>>(summary: S, body: B) -> Self {
        Self {
            summary: summary.into(),
            body: body.into(),
        }
    }
}

pub trait Notifier {
    fn notify(&self, notice: &Notice) -> Result<(), AppError>;
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notice: &Notice) -> Result<(), AppError> {
        Ok(())
    }
}

/// Picks the desktop notifier when enabled, falling back to a no-op on
/// platforms without one.
pub fn desktop_notifier(enabled: bool) -> Box<dyn Notifier> {
    if !enabled {
        return Box::new(NoopNotifier);
    }

    match platform_notifier() {
        Ok(notifier) => notifier,
        Err(err) => {
            warn!(error = %err, "desktop notifications unavailable");
            Box::new(NoopNotifier)
        }
    }
}

#[cfg(target_os = "linux")]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(LinuxNotifier))
}

#[cfg(windows)]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(WindowsNotifier))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Err(AppError::invalid_data(
        "notifications are not supported on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::{AlwaysConfirm, Confirm, NeverConfirm, Notice, desktop_notifier};

    #[test]
    fn fixed_confirmers_answer_consistently() {
        assert!(AlwaysConfirm.confirm("delete?"));
        assert!(!NeverConfirm.confirm("delete?"));
    }

    #[test]
    fn disabled_desktop_notifier_is_silent() {
        let notifier = desktop_notifier(false);
        notifier
            .notify(&Notice::new("taskboard", "Task added successfully!"))
            .unwrap();
    }
}
