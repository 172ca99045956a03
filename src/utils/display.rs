//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::game_of_life::{grid_to_string, Evolution, Grid};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Glyphs for increasing ages; age 1 is the plain live cell
const AGE_GLYPHS: [char; 4] = ['█', '▓', '▒', '░'];

/// Render grids for the terminal. Reads cells only, never writes them.
pub struct GridFormatter;

impl GridFormatter {
    /// Glyph for a single cell value
    pub fn glyph(value: u32) -> char {
        match value {
            0 => '·',
            age => AGE_GLYPHS[(age as usize - 1).min(AGE_GLYPHS.len() - 1)],
        }
    }

    /// Format a grid in compact form
    pub fn format_grid_compact(grid: &Grid) -> String {
        let mut output = String::with_capacity(grid.height() * (grid.width() + 1));
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                output.push(Self::glyph(grid.get(x, y)));
            }
            output.push('\n');
        }
        output
    }

    /// Format a grid with coordinates
    pub fn format_grid_with_coords(grid: &Grid) -> String {
        let mut output = String::new();

        // Header with column numbers
        output.push_str("   ");
        for x in 0..grid.width() {
            output.push_str(&format!("{:2}", x % 10));
        }
        output.push('\n');

        // Rows with row numbers
        for y in 0..grid.height() {
            output.push_str(&format!("{:2} ", y));
            for x in 0..grid.width() {
                let glyph = Self::glyph(grid.get(x, y));
                output.push(glyph);
                output.push(glyph);
            }
            output.push('\n');
        }

        output
    }

    /// One-line status for the driver loop
    pub fn format_status(engine: &Evolution) -> String {
        let grid = engine.world();
        let density = grid.living_count() as f64 / (grid.width() * grid.height()) as f64;
        let status = format!(
            "Generation {} | Rule {} | Living: {} ({:.1}%)",
            engine.generation(),
            engine.rules(),
            grid.living_count(),
            density * 100.0
        );
        if engine.rules().is_decay() {
            format!("{} | Oldest: {}", status, grid.max_value())
        } else {
            status
        }
    }
}

/// A saved view of the world at one generation
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub generation: u64,
    pub rule: String,
    pub width: usize,
    pub height: usize,
    pub living_cells: usize,
    pub grid: &'a Grid,
}

impl<'a> Snapshot<'a> {
    pub fn capture(engine: &'a Evolution) -> Self {
        let grid = engine.world();
        Self {
            generation: engine.generation(),
            rule: engine.rules().to_string(),
            width: grid.width(),
            height: grid.height(),
            living_cells: grid.living_count(),
            grid,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the snapshot into `output_dir` and return the file path
    pub fn save<P: AsRef<Path>>(&self, output_dir: P, format: OutputFormat) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        let (filename, content) = match format {
            OutputFormat::Text => (
                format!("generation_{:06}.txt", self.generation),
                grid_to_string(self.grid),
            ),
            OutputFormat::Json => (
                format!("generation_{:06}.json", self.generation),
                self.to_json().context("Failed to serialize snapshot")?,
            ),
            OutputFormat::Visual => (
                format!("generation_{:06}_visual.txt", self.generation),
                self.visual(),
            ),
        };

        let path = output_dir.join(filename);
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
        log::info!("Saved generation {} to {}", self.generation, path.display());
        Ok(path)
    }

    fn visual(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Generation {} - Rule {}\n", self.generation, self.rule));
        output.push_str(&"=".repeat(50));
        output.push('\n');
        output.push_str(&GridFormatter::format_grid_with_coords(self.grid));
        output.push_str(&format!("\nLiving cells: {}\n", self.living_cells));
        output
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
