use crate::device_display::interface::{fit_to_line, DeviceDisplay, DISPLAY_LINES};
use std::error::Error;

/// Draws the screen on stdout each time it is fully replaced.
pub struct DeviceDisplayConsole {
    lines: [String; DISPLAY_LINES],
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self {
            lines: Default::default(),
        }
    }

    fn draw(&self) {
        let width = self.chars_per_line();
        let border = "─".repeat(width);
        println!("┌{}┐", border);
        for line in &self.lines {
            println!("│{:<width$}│", line, width = width);
        }
        println!("└{}┘", border);
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
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
        self.draw();
        Ok(())
    }
}
