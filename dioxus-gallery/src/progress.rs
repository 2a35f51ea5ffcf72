use crate::error::{validate_mount, GalleryError};

/// State of a simple linear progress bar
///
/// The indicator is a full-width bar shifted left by the missing percentage.
/// Resetting happens in two steps: the indicator is hidden first and only
/// moved back to 0 after a short delay, so the jump back is never animated.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBar {
    mount: String,
    percent: u8,
    visible: bool,
}

impl ProgressBar {
    pub fn new(selector: &str) -> Result<Self, GalleryError> {
        let mount = validate_mount(selector)?.to_string();
        Ok(Self {
            mount,
            percent: 0,
            visible: true,
        })
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Values above 100 are clamped
    pub fn set_value(&mut self, percent: u8) {
        self.percent = percent.min(100);
    }

    /// CSS transform of the indicator
    pub fn transform(&self) -> String {
        format!("translate({}%, 0)", i32::from(self.percent) - 100)
    }

    /// First step of a reset: hide the indicator
    pub fn begin_reset(&mut self) {
        self.visible = false;
    }

    /// Second step of a reset: rewind to 0 and show the indicator again
    pub fn finish_reset(&mut self) {
        self.percent = 0;
        self.visible = true;
    }
}
