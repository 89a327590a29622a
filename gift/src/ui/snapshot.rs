//! Turning a drawn terminal frame into a capture snapshot.

use gift_core::capture::{Rgba, Snapshot};
use ratatui::{buffer::Buffer, layout::Rect};

use crate::ui::theme::{color_to_rgba, GiftTheme};

/// One snapshot cell per terminal cell: the cell's foreground where it
/// shows a glyph, its background otherwise.
pub fn snapshot_buffer(buf: &Buffer, area: Rect, theme: &GiftTheme) -> Snapshot {
    let area = area.intersection(buf.area);
    let paper = color_to_rgba(theme.background, Rgba([255, 255, 255, 255]));
    let ink = color_to_rgba(theme.foreground, Rgba([0, 0, 0, 255]));

    let mut snapshot = Snapshot::new(area.width as u32, area.height as u32);
    for y in 0..area.height {
        for x in 0..area.width {
            let Some(cell) = buf.cell((area.x + x, area.y + y)) else {
                continue;
            };
            let background = color_to_rgba(cell.bg, paper);
            let color = if cell.symbol().trim().is_empty() {
                background
            } else {
                color_to_rgba(cell.fg, ink)
            };
            snapshot.set(x as u32, y as u32, color);
        }
    }
    snapshot
}
