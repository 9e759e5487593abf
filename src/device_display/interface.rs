use std::error::Error;

pub const DISPLAY_LINES: usize = 2;

/// Two-line character display the workout metrics are mirrored on.
pub trait DeviceDisplay: Send + Sync {
    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Writes `text` on `line` (0 or 1), truncated to [`DeviceDisplay::chars_per_line`].
    fn write_line(&mut self, line: u8, text: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn chars_per_line(&self) -> usize {
        16
    }

    /// Replaces the whole screen.
    fn show(&mut self, lines: &[String; DISPLAY_LINES]) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.clear()?;
        for (index, text) in lines.iter().enumerate() {
            self.write_line(index as u8, text)?;
        }
        Ok(())
    }
}

pub fn fit_to_line(text: &str, chars_per_line: usize) -> String {
    text.chars().take(chars_per_line).collect()
}
