use std::fs::File;
use std::io::Write;

use crate::error::Result;
use crate::grid::aggregate::{grid_summary, HeatBucket};
use crate::grid::coords::Grid;
use crate::grid::types::{BestSlot, Responses};

const TIME_LABEL_WIDTH: usize = 6;

/// One glyph per heatmap tier
pub fn bucket_glyph(bucket: HeatBucket) -> char {
    match bucket {
        HeatBucket::Empty => '.',
        HeatBucket::Low => '░',
        HeatBucket::Fair => '▒',
        HeatBucket::Medium => '▓',
        HeatBucket::High => '█',
        HeatBucket::Full => '#',
    }
}

/// Renders the heatmap as text: one row per time slot, one cell per column
/// showing the count and its tier glyph
pub fn render_heatmap(grid: &Grid, responses: &Responses) -> Result<String> {
    let cells = grid_summary(grid, responses)?;
    let rows = grid.time_slots().len();
    let width = grid.columns().iter().map(|c| c.chars().count()).max().unwrap_or(0).max(4);

    let mut out = String::new();
    out.push_str(&format!("{:w$}", "", w = TIME_LABEL_WIDTH));
    for column in grid.columns() {
        out.push_str(&format!(" {:>w$}", column, w = width));
    }
    out.push('\n');

    for (time_index, time) in grid.time_slots().iter().enumerate() {
        out.push_str(&format!("{:<w$}", time, w = TIME_LABEL_WIDTH));
        for column_index in 0..grid.columns().len() {
            // summary is in scan order: columns outer, time inner
            let cell = &cells[column_index * rows + time_index];
            let label = format!("{}{}", cell.count, bucket_glyph(cell.bucket));
            out.push_str(&format!(" {:>w$}", label, w = width));
        }
        out.push('\n');
    }

    Ok(out)
}

/// Formats the best-slot list, one line per tied slot
pub fn format_best_slots(best: &[BestSlot], total: usize) -> String {
    if best.is_empty() {
        return "No slot has any availability yet\n".to_string();
    }
    best.iter()
        .map(|b| format!("{} {} -> {}/{} available\n", b.column, b.time, b.count, total))
        .collect()
}

/// Prints a heatmap report for the given responses
pub fn print_report(name: &str, grid: &Grid, responses: &Responses, best: &[BestSlot]) -> Result<()> {
    println!("\n=== {} ===", name);
    println!("Respondents: {}", responses.len());
    println!();
    print!("{}", render_heatmap(grid, responses)?);
    println!("\nBest slots:");
    print!("{}", format_best_slots(best, responses.len()));
    Ok(())
}

/// Writes the same report to a file
pub fn write_report_to_file(
    name: &str,
    grid: &Grid,
    responses: &Responses,
    best: &[BestSlot],
    filename: &str,
) -> Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "** {} **", name)?;
    write!(file, "{}", render_heatmap(grid, responses)?)?;
    writeln!(file)?;
    write!(file, "{}", format_best_slots(best, responses.len()))?;
    Ok(())
}
