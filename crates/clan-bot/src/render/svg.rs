use super::{Color, RenderError, Rasterizer, Surface};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};
use usvg::fontdb::Database;

/// Offset from the vertical center to the text baseline, as a fraction of
/// the font size.
const BASELINE_SHIFT: f32 = 0.35;

/// Rasterizer backed by `resvg`. The font database is loaded once and
/// shared by every surface.
pub struct SvgRasterizer {
    fontdb: Arc<Database>,
    font_family: String,
}

impl SvgRasterizer {
    pub fn new(font_dir: Option<&Path>, font_family: impl Into<String>) -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        if let Some(dir) = font_dir {
            db.load_fonts_dir(dir);
        }
        if db.is_empty() {
            warn!("No fonts found; table text will not be drawn");
        } else {
            debug!("Loaded {} font faces", db.len());
        }

        Self {
            fontdb: Arc::new(db),
            font_family: font_family.into(),
        }
    }
}

impl Rasterizer for SvgRasterizer {
    fn surface(&self, width: u32, height: u32) -> Box<dyn Surface> {
        Box::new(SvgSurface {
            width,
            height,
            body: String::new(),
            fontdb: self.fontdb.clone(),
            font_family: self.font_family.clone(),
        })
    }
}

struct SvgSurface {
    width: u32,
    height: u32,
    body: String,
    fontdb: Arc<Database>,
    font_family: String,
}

impl SvgSurface {
    fn document(&self) -> String {
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" "#,
                r#"viewBox="0 0 {w} {h}">{body}</svg>"#
            ),
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

// Writing into a String cannot fail, so the fmt::Result is dropped.
impl Surface for SvgSurface {
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let _ = write!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            x, y, width, height, color
        );
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Color) {
        let _ = write!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
            x1, y1, x2, y2, color, width
        );
    }

    fn text(&mut self, x: f32, center_y: f32, text: &str, font_size: f32, color: Color) {
        let _ = write!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}">{}</text>"#,
            x,
            center_y + font_size * BASELINE_SHIFT,
            escape_xml(&self.font_family),
            font_size,
            color,
            escape_xml(text)
        );
    }

    fn encode_png(self: Box<Self>) -> Result<Vec<u8>, RenderError> {
        let svg = self.document();

        let mut options = usvg::Options::default();
        options.fontdb = self.fontdb.clone();
        let tree =
            usvg::Tree::from_str(&svg, &options).map_err(|e| RenderError::Svg(e.to_string()))?;

        let size = tree.size().to_int_size();
        let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
            .ok_or(RenderError::Pixmap(size.width(), size.height()))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::default(),
            &mut pixmap.as_mut(),
        );

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormattedTable;
    use crate::render::TableRenderer;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<A & \"B\">"), "&lt;A &amp; &quot;B&quot;&gt;");
        assert_eq!(escape_xml("Clan 'X'"), "Clan &apos;X&apos;");
    }

    #[test]
    fn test_document_contains_shapes() {
        let rasterizer = SvgRasterizer {
            fontdb: Arc::new(Database::new()),
            font_family: "sans-serif".into(),
        };
        let mut surface = SvgSurface {
            width: 100,
            height: 50,
            body: String::new(),
            fontdb: rasterizer.fontdb.clone(),
            font_family: rasterizer.font_family.clone(),
        };
        surface.fill_rect(0.0, 0.0, 100.0, 50.0, "#ffffff");
        surface.text(10.0, 24.0, "R&D", 30.0, "#000000");

        let doc = surface.document();
        assert!(doc.starts_with("<svg"));
        assert!(doc.contains(r##"<rect x="0" y="0" width="100" height="50" fill="#ffffff"/>"##));
        assert!(doc.contains(r#"font-size="30""#));
        assert!(doc.contains(">R&amp;D</text>"));
    }

    #[test]
    fn test_renders_png_without_fonts() {
        let rasterizer = SvgRasterizer {
            fontdb: Arc::new(Database::new()),
            font_family: "sans-serif".into(),
        };
        let renderer = TableRenderer::new(Arc::new(rasterizer));
        let mut table = FormattedTable::new(&["Opponent", "Result"], &[18, 8]);
        table.push_row(vec!["Rivals".into(), "Win".into()]);

        let png = renderer.render(&table).unwrap();

        assert!(png.starts_with(PNG_MAGIC));
    }
}
