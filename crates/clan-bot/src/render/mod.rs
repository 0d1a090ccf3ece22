//! Rasterizes a [`FormattedTable`] into a PNG.
//!
//! Layout is computed here; pixels are produced by a [`Rasterizer`]
//! backend so the grid arithmetic can be tested without fonts.

mod svg;

pub use svg::SvgRasterizer;

use crate::format::FormattedTable;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid svg: {0}")]
    Svg(String),

    #[error("cannot allocate a {0}x{1} canvas")]
    Pixmap(u32, u32),

    #[error("png encoding failed: {0}")]
    Encode(String),

    #[error("table has no columns")]
    Empty,

    #[error("render task failed: {0}")]
    Task(String),
}

/// RGB color as a CSS hex string, e.g. `#f0f0f0`.
pub type Color = &'static str;

/// A drawing target. Coordinates are in pixels from the top-left corner.
pub trait Surface: Send {
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Color);

    /// Left-aligned text whose glyphs are vertically centered on `center_y`.
    fn text(&mut self, x: f32, center_y: f32, text: &str, font_size: f32, color: Color);

    fn encode_png(self: Box<Self>) -> Result<Vec<u8>, RenderError>;
}

/// Creates surfaces of a given size.
pub trait Rasterizer: Send + Sync {
    fn surface(&self, width: u32, height: u32) -> Box<dyn Surface>;
}

/// Pixel metrics of the table image.
#[derive(Debug, Clone)]
pub struct TableLayout {
    /// Pixels per width-hint unit.
    pub cell_unit: u32,
    pub row_height: u32,
    pub font_size: f32,
    pub padding: u32,
    pub text_inset: f32,
    pub grid_width: f32,
    pub background: Color,
    pub header_fill: Color,
    pub grid_color: Color,
    pub text_color: Color,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            cell_unit: 16,
            row_height: 48,
            font_size: 30.0,
            padding: 40,
            text_inset: 10.0,
            grid_width: 2.0,
            background: "#ffffff",
            header_fill: "#f0f0f0",
            grid_color: "#000000",
            text_color: "#000000",
        }
    }
}

/// Width hint for columns the table does not size explicitly.
const DEFAULT_WIDTH_HINT: u32 = 10;

#[derive(Clone)]
pub struct TableRenderer {
    rasterizer: Arc<dyn Rasterizer>,
    layout: TableLayout,
}

impl TableRenderer {
    pub fn new(rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self {
            rasterizer,
            layout: TableLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: TableLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Column pixel widths for a table.
    fn column_widths(&self, table: &FormattedTable) -> Vec<u32> {
        (0..table.columns())
            .map(|i| {
                table
                    .column_widths
                    .get(i)
                    .copied()
                    .unwrap_or(DEFAULT_WIDTH_HINT)
                    * self.layout.cell_unit
            })
            .collect()
    }

    /// [`Self::render`] on the blocking thread pool, keeping rasterization
    /// off the async workers.
    pub async fn render_async(&self, table: FormattedTable) -> Result<Vec<u8>, RenderError> {
        let renderer = self.clone();
        tokio::task::spawn_blocking(move || renderer.render(&table))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))?
    }

    pub fn render(&self, table: &FormattedTable) -> Result<Vec<u8>, RenderError> {
        let layout = &self.layout;
        let widths = self.column_widths(table);
        if widths.is_empty() {
            return Err(RenderError::Empty);
        }

        let table_width: u32 = widths.iter().sum();
        let line_count = table.rows.len() as u32 + 1;
        let table_height = line_count * layout.row_height;
        let width = table_width + 2 * layout.padding;
        let height = table_height + 2 * layout.padding;

        let mut surface = self.rasterizer.surface(width, height);
        let left = layout.padding as f32;
        let top = layout.padding as f32;
        let right = left + table_width as f32;
        let bottom = top + table_height as f32;
        let row_height = layout.row_height as f32;

        surface.fill_rect(0.0, 0.0, width as f32, height as f32, layout.background);
        surface.fill_rect(left, top, table_width as f32, row_height, layout.header_fill);

        for i in 0..=line_count {
            let y = top + i as f32 * row_height;
            surface.line(left, y, right, y, layout.grid_width, layout.grid_color);
        }
        let mut x = left;
        surface.line(x, top, x, bottom, layout.grid_width, layout.grid_color);
        for w in &widths {
            x += *w as f32;
            surface.line(x, top, x, bottom, layout.grid_width, layout.grid_color);
        }

        let lines = std::iter::once(&table.header).chain(table.rows.iter());
        for (row_index, cells) in lines.enumerate() {
            let center_y = top + (row_index as f32 + 0.5) * row_height;
            let mut cell_x = left;
            for (col, w) in widths.iter().enumerate() {
                if let Some(cell) = cells.get(col).filter(|c| !c.is_empty()) {
                    surface.text(
                        cell_x + layout.text_inset,
                        center_y,
                        cell,
                        layout.font_size,
                        layout.text_color,
                    );
                }
                cell_x += *w as f32;
            }
        }

        surface.encode_png()
    }
}
