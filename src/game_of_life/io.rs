//! File I/O operations for grids

use super::Grid;
use anyhow::{Context, Result};
use std::path::Path;

/// Load a grid from a text file
/// Format: each line is a row. Compact rows use one character per cell
/// ('0'-'9', '.' for dead); rows containing whitespace list one integer per cell.
pub fn load_grid_from_file<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read grid file: {}", path.as_ref().display()))?;

    parse_grid_from_string(&content)
        .with_context(|| format!("Failed to parse grid from file: {}", path.as_ref().display()))
}

/// Parse a grid from a string representation
pub fn parse_grid_from_string(content: &str) -> Result<Grid> {
    let lines: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Grid file is empty or contains no valid rows");
    }

    let mut rows = Vec::with_capacity(lines.len());
    for (row_idx, line) in lines.iter().enumerate() {
        let row = if line.contains(char::is_whitespace) {
            parse_spaced_row(line, row_idx)?
        } else {
            parse_compact_row(line, row_idx)?
        };

        if let Some(first) = rows.first().map(Vec::len) {
            if row.len() != first {
                anyhow::bail!(
                    "Row {} has length {}, expected {} (all rows must have the same length)",
                    row_idx,
                    row.len(),
                    first
                );
            }
        }
        rows.push(row);
    }

    Ok(Grid::from_rows(rows)?)
}

fn parse_compact_row(line: &str, row_idx: usize) -> Result<Vec<u32>> {
    line.chars()
        .enumerate()
        .map(|(col_idx, ch)| match ch {
            '.' => Ok(0),
            _ => ch.to_digit(10).ok_or_else(|| {
                anyhow::anyhow!(
                    "Invalid character '{}' at position ({}, {}). Only digits and '.' are allowed",
                    ch,
                    col_idx,
                    row_idx
                )
            }),
        })
        .collect()
}

fn parse_spaced_row(line: &str, row_idx: usize) -> Result<Vec<u32>> {
    line.split_whitespace()
        .enumerate()
        .map(|(col_idx, token)| {
            token.parse::<u32>().with_context(|| {
                format!("Invalid cell value '{}' at position ({}, {})", token, col_idx, row_idx)
            })
        })
        .collect()
}

/// Save a grid to a text file
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    let content = grid_to_string(grid);

    // Create parent directories if they don't exist
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write grid to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Convert a grid to string representation.
/// Single-digit grids use the compact form, anything larger is space separated.
pub fn grid_to_string(grid: &Grid) -> String {
    let compact = grid.max_value() <= 9;
    let mut result = String::with_capacity(grid.height() * (grid.width() + 1));

    for row in grid.cells().chunks(grid.width()) {
        if compact {
            result.extend(row.iter().map(|value| char::from(b'0' + *value as u8)));
        } else {
            let tokens: Vec<String> = row.iter().map(u32::to_string).collect();
            result.push_str(&tokens.join(" "));
        }
        result.push('\n');
    }

    result
}

/// Create example grid files
pub fn create_example_grids<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let examples = [
        // Glider pattern
        ("glider.txt", "01000000\n00100000\n11100000\n00000000\n00000000\n00000000\n00000000\n00000000\n"),
        // Blinker pattern
        ("blinker.txt", "00000\n00000\n01110\n00000\n00000\n"),
        // Block pattern (still life)
        ("block.txt", "0000\n0110\n0110\n0000\n"),
        // Beacon pattern (oscillator)
        ("beacon.txt", "000000\n011000\n011000\n000110\n000110\n000000\n"),
        // Mixed ages for decay rules
        ("aged.txt", "000000\n023000\n014300\n003200\n000000\n000000\n"),
    ];

    for (name, content) in examples {
        std::fs::write(dir.join(name), content)
            .with_context(|| format!("Failed to write {}", name))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_grid_from_string() {
        let content = "010\n101\n010\n";
        let grid = parse_grid_from_string(content).unwrap();

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);

        assert_eq!(grid.living_count(), 4);
        assert_eq!(grid.get(1, 0), 1);
        assert_eq!(grid.get(0, 1), 1);
        assert_eq!(grid.get(2, 1), 1);
        assert_eq!(grid.get(1, 2), 1);
    }

    #[test]
    fn test_parse_ages_and_comments() {
        let content = "# aged world\n.3.\n 120 \n";
        let grid = parse_grid_from_string(content).unwrap();
        assert_eq!(grid.cells(), &[0, 3, 0, 1, 2, 0]);

        let spaced = parse_grid_from_string("0 12 0\n4 0 0\n").unwrap();
        assert_eq!(spaced.get(1, 0), 12);
        assert_eq!(spaced.get(0, 1), 4);
    }

    #[test]
    fn test_grid_to_string() {
        let grid = Grid::from_rows(vec![vec![0, 1, 0], vec![1, 0, 7]]).unwrap();
        assert_eq!(grid_to_string(&grid), "010\n107\n");

        let aged = Grid::from_rows(vec![vec![0, 12], vec![3, 0]]).unwrap();
        assert_eq!(grid_to_string(&aged), "0 12\n3 0\n");
    }

    #[test]
    fn test_file_operations() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("nested/test_grid.txt");

        let original_grid = Grid::from_rows(vec![vec![1, 0, 1], vec![0, 1, 0]]).unwrap();

        save_grid_to_file(&original_grid, &file_path).unwrap();
        let loaded_grid = load_grid_from_file(&file_path).unwrap();

        assert_eq!(original_grid, loaded_grid);
    }

    #[test]
    fn test_invalid_input() {
        // Invalid character
        assert!(parse_grid_from_string("010\n1X1\n010\n").is_err());

        // Inconsistent row lengths
        assert!(parse_grid_from_string("010\n11\n010\n").is_err());

        // Empty content
        assert!(parse_grid_from_string("").is_err());
        assert!(parse_grid_from_string("# only a comment\n").is_err());

        // Negative values are not cell states
        assert!(parse_grid_from_string("0 -1\n0 0\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempdir().unwrap();
        assert!(load_grid_from_file(temp_dir.path().join("absent.txt")).is_err());
    }

    #[test]
    fn test_create_example_grids() {
        let temp_dir = tempdir().unwrap();
        create_example_grids(temp_dir.path()).unwrap();

        for name in ["glider.txt", "blinker.txt", "block.txt", "beacon.txt", "aged.txt"] {
            assert!(temp_dir.path().join(name).exists(), "{} missing", name);
        }

        let glider = load_grid_from_file(temp_dir.path().join("glider.txt")).unwrap();
        assert_eq!(glider.width(), 8);
        assert_eq!(glider.height(), 8);
        assert_eq!(glider.living_count(), 5); // Glider has 5 living cells

        let aged = load_grid_from_file(temp_dir.path().join("aged.txt")).unwrap();
        assert_eq!(aged.max_value(), 4);
    }
}
