use crate::device_display::interface::{fit_to_line, DeviceDisplay, DISPLAY_LINES};
use std::error::Error;

/// Keeps what would be on screen so tests can read it back.
#[derive(Debug, Default)]
pub struct DeviceDisplayFake {
    pub lines: [String; DISPLAY_LINES],
    /// Number of full-screen updates.
    pub shows: usize,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.lines = Default::default();
        Ok(())
    }

    fn write_line(&mut self, line: u8, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let width = self.chars_per_line();
        let slot = self
            .lines
            .get_mut(line as usize)
            .ok_or_else(|| format!("no display line {}", line))?;
        *slot = fit_to_line(text, width);
        Ok(())
    }

    fn show(&mut self, lines: &[String; DISPLAY_LINES]) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.clear()?;
        for (index, text) in lines.iter().enumerate() {
            self.write_line(index as u8, text)?;
        }
        self.shows += 1;
        Ok(())
    }
}

#[cfg(test)]
mod impl_fake_test {
    use super::*;

    #[test]
    fn test_lines_are_truncated() {
        let mut display = DeviceDisplayFake::new();

        display
            .show(&["Reps 1234567890 99.9kcal".to_string(), "squat".to_string()])
            .unwrap();

        assert_eq!(display.lines[0], "Reps 1234567890 ");
        assert_eq!(display.lines[1], "squat");
        assert_eq!(display.shows, 1);
    }

    #[test]
    fn test_invalid_line_is_rejected() {
        let mut display = DeviceDisplayFake::new();

        assert!(display.write_line(2, "x").is_err());
    }
}
