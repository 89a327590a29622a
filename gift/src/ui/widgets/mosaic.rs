//! Heart-wall mosaic widget

use gift_core::tiles::{Cluster, Mosaic, TILE_PX};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::Widget,
};

use crate::ui::theme::GiftTheme;

const TILE: &str = "██";

/// Draws placed clusters two columns wide per tile, anchored at the centre
pub struct MosaicWidget<'a> {
    mosaic: &'a Mosaic,
    theme: &'a GiftTheme,
}

impl<'a> MosaicWidget<'a> {
    pub fn new(mosaic: &'a Mosaic, theme: &'a GiftTheme) -> Self {
        Self { mosaic, theme }
    }

    /// Terminal cell for a grid cell, relative to the area centre.
    fn terminal_offset(&self, cell: (i32, i32)) -> (i32, i32) {
        let (px, py) = self.mosaic.pixel(cell);
        let tile = TILE_PX as f32 * self.mosaic.scale.factor;
        ((px / tile * 2.0).round() as i32, (py / tile).round() as i32)
    }

    fn draw_cluster(&self, cluster: &Cluster, style: Style, area: Rect, buf: &mut Buffer) {
        let cx = area.x as i32 + area.width as i32 / 2;
        let cy = area.y as i32 + area.height as i32 / 2;
        for cell in cluster.visible_cells() {
            let (dx, dy) = self.terminal_offset(cell);
            let (x, y) = (cx + dx, cy + dy);
            let inside = x >= area.x as i32
                && y >= area.y as i32
                && x + 1 < area.right() as i32
                && y < area.bottom() as i32;
            if inside {
                buf.set_string(x as u16, y as u16, TILE, style);
            }
        }
    }
}

impl Widget for MosaicWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let heart = self.theme.heart_style();
        for cluster in &self.mosaic.clusters {
            self.draw_cluster(cluster, heart, area, buf);
        }
        if let Some(cursor) = &self.mosaic.cursor {
            let style = Style::default().fg(self.theme.accent);
            self.draw_cluster(cursor, style, area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gift_core::{TileSequencer, Viewport};
    use std::time::Duration;

    #[test]
    fn test_finished_wall_draws_tiles() {
        let mut seq = TileSequencer::new(Viewport::new(1280, 1024));
        seq.start();
        seq.advance(Duration::from_secs(60));
        let mosaic = seq.mosaic();
        let theme = GiftTheme::default();

        let area = Rect::new(0, 0, 120, 60);
        let mut buf = Buffer::empty(area);
        MosaicWidget::new(&mosaic, &theme).render(area, &mut buf);

        let painted = buf
            .content()
            .iter()
            .filter(|cell| cell.symbol() == "█")
            .count();
        assert!(painted > 0);
    }

    #[test]
    fn test_tiny_area_does_not_panic() {
        let seq = TileSequencer::new(Viewport::new(300, 300));
        let mosaic = seq.mosaic();
        let theme = GiftTheme::default();
        let area = Rect::new(0, 0, 1, 1);
        let mut buf = Buffer::empty(area);
        MosaicWidget::new(&mosaic, &theme).render(area, &mut buf);
    }
}
