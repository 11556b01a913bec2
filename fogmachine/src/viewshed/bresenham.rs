//! Integer line rasterisation.

use crate::grid::Cell;

/// Cells on the line from `from` to `to`, excluding `from` and including `to`.
///
/// Rasterising A→B and B→A yields the same cells in reverse order: the line
/// is always traced from the lexicographically smaller endpoint and flipped
/// afterwards, so tie-breaking never depends on direction. Cells advance one
/// step along the major axis at a time, so their Chebyshev distance from
/// `from` strictly increases.
pub fn find_line(from: Cell, to: Cell) -> Vec<Cell> {
    let mut cells = Vec::new();
    trace_line(from, to, &mut cells);
    cells
}

/// [`find_line`] into a caller-owned buffer, which is cleared first.
pub fn trace_line(from: Cell, to: Cell, out: &mut Vec<Cell>) {
    out.clear();
    if from == to {
        return;
    }

    let reversed = (to.x, to.y) < (from.x, from.y);
    let (start, end) = if reversed { (to, from) } else { (from, to) };

    rasterise(start, end, out);

    if reversed {
        out.reverse();
    }
    // The observer's own cell is never part of its line of sight.
    out.remove(0);
}

/// Classic Bresenham, both endpoints included.
fn rasterise(start: Cell, end: Cell, out: &mut Vec<Cell>) {
    let dx = (end.x - start.x).abs();
    let dy = -(end.y - start.y).abs();
    let sx = if start.x < end.x { 1 } else { -1 };
    let sy = if start.y < end.y { 1 } else { -1 };

    out.reserve(dx.max(-dy) as usize + 1);

    let (mut x, mut y) = (start.x, start.y);
    let mut err = dx + dy;
    loop {
        out.push(Cell::new(x, y));
        if x == end.x && y == end.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
