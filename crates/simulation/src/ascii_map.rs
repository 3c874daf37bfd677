//! ASCII map rendering for the colony grid.
//!
//! Provides two views:
//! - **Overview** (64x64): each character represents a 2x2 block of grid cells
//! - **Detail** (full resolution): 1 character per grid cell, cropped to content
//!
//! Maps are built on-demand from `&WorldGrid`, no per-frame systems needed.

use bevy::prelude::*;

use crate::grid::{Cell, CellType, PadRole, WorldGrid};

/// Empty plugin, ASCII maps are generated on-demand.
pub struct AsciiMapPlugin;

impl Plugin for AsciiMapPlugin {
    fn build(&self, _app: &mut App) {}
}

// -----------------------------------------------------------------------
// Character encoding
// -----------------------------------------------------------------------

/// Convert a single grid cell to its ASCII character representation.
///
/// Priority: crater > pad > regolith. Pad cells distinguish unassigned
/// cells from assembled members, with the center marked separately.
pub fn cell_to_char(cell: &Cell) -> char {
    if cell.cell_type == CellType::Crater {
        return '~';
    }
    if cell.cell_type == CellType::Pad {
        return match cell.pad_role {
            PadRole::None => 'p',
            PadRole::Center => '@',
            _ => 'P',
        };
    }
    '.'
}

/// Numeric priority for tie-breaking in overview blocks.
/// Higher value = wins the block.
fn char_priority(ch: char) -> u8 {
    match ch {
        '@' => 4,
        'P' => 3,
        'p' => 2,
        '~' => 1,
        _ => 0,
    }
}

// -----------------------------------------------------------------------
// Overview map (64x64, each char = 2x2 block)
// -----------------------------------------------------------------------

/// Build a 64x64 overview map of the full 128x128 grid.
///
/// Each character represents the dominant type in a 2x2 cell block.
/// Includes row/column coordinate headers and a legend.
pub fn build_overview_map(grid: &WorldGrid) -> String {
    const OVERVIEW: usize = 64;
    const BLOCK: usize = 2;

    let mut lines: Vec<String> = Vec::with_capacity(OVERVIEW + 8);

    // Column header, real grid coordinate every 8 overview columns
    let mut col_header = String::from("       ");
    for col in (0..OVERVIEW).step_by(8) {
        let real_col = col * BLOCK;
        let label = format!("{real_col:<8}");
        col_header.push_str(&label);
    }
    lines.push(col_header.trim_end().to_string());

    for row in 0..OVERVIEW {
        let real_row = row * BLOCK;
        let label = if row.is_multiple_of(4) {
            format!("{real_row:>4} | ")
        } else {
            "     | ".to_string()
        };

        let mut line = label;
        for col in 0..OVERVIEW {
            let ch = dominant_char(grid, col * BLOCK, row * BLOCK, BLOCK);
            line.push(ch);
        }
        lines.push(line);
    }

    lines.push(String::new());
    append_legend(&mut lines);

    lines.join("\n")
}

/// Find the dominant character in a BLOCK x BLOCK region starting at (gx, gy).
fn dominant_char(grid: &WorldGrid, gx: usize, gy: usize, block: usize) -> char {
    let mut best_char = '.';
    let mut best_priority = 0u8;

    for dy in 0..block {
        for dx in 0..block {
            let x = gx + dx;
            let y = gy + dy;
            if x < grid.width && y < grid.height {
                let ch = cell_to_char(grid.get(x, y));
                let pri = char_priority(ch);
                if pri > best_priority {
                    best_priority = pri;
                    best_char = ch;
                }
            }
        }
    }
    best_char
}

// -----------------------------------------------------------------------
// Detail map (full resolution, cropped to content)
// -----------------------------------------------------------------------

/// Build a full-resolution detail map, cropped to the bounding box of
/// non-regolith cells plus `margin` cells of padding on each side.
///
/// Returns a descriptive message if the grid is entirely regolith.
pub fn build_detail_map(grid: &WorldGrid, margin: usize) -> String {
    let mut min_x = grid.width;
    let mut max_x: usize = 0;
    let mut min_y = grid.height;
    let mut max_y: usize = 0;
    let mut has_content = false;

    for y in 0..grid.height {
        for x in 0..grid.width {
            if cell_to_char(grid.get(x, y)) != '.' {
                has_content = true;
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
    }

    if !has_content {
        return "(empty grid, nothing but regolith)".to_string();
    }

    let x0 = min_x.saturating_sub(margin);
    let y0 = min_y.saturating_sub(margin);
    let x1 = (max_x + margin).min(grid.width - 1);
    let y1 = (max_y + margin).min(grid.height - 1);

    let width = x1 - x0 + 1;

    let mut lines: Vec<String> = Vec::with_capacity((y1 - y0 + 1) + 4);
    lines.push(build_col_header(x0, width));

    for y in y0..=y1 {
        let mut line = format!("{y:>4} | ");
        for x in x0..=x1 {
            line.push(cell_to_char(grid.get(x, y)));
        }
        lines.push(line);
    }

    lines.push(String::new());
    append_legend(&mut lines);

    lines.join("\n")
}

fn build_col_header(x0: usize, width: usize) -> String {
    let margin_str = "       "; // matches row label width "XXXX | "
    let interval = if width > 40 { 10 } else { 5 };

    let mut header = String::from(margin_str);
    let mut col = 0;
    while col < width {
        let real_x = x0 + col;
        if real_x.is_multiple_of(interval) || col == 0 {
            let label = format!("{real_x}");
            header.push_str(&label);
            col += label.len();
        } else {
            header.push(' ');
            col += 1;
        }
    }
    header.trim_end().to_string()
}

fn append_legend(lines: &mut Vec<String>) {
    lines.push("Legend:".to_string());
    lines.push("  .=Regolith  ~=Crater  p=Pad(unassigned)".to_string());
    lines.push("  P=Pad(member)  @=Pad(center)".to_string());
}
