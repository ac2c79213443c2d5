//! Formula-to-image rendering for `$$...$$` embeds.

use crate::error::ApiError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::sync::Arc;

pub const SVG_MIME: &str = "image/svg+xml";

/// Renders a formula to an image data URL.
///
/// The built-in [`SvgTextRenderer`] does no TeX layout: `\frac{a}{b}` comes
/// out as that literal text. Plug in a real typesetter through
/// [`DrawingProcessor::with_renderer_factory`](crate::drawing::DrawingProcessor::with_renderer_factory)
/// for rendered math.
pub trait FormulaRenderer: Send {
    fn render(&mut self, formula: &str) -> Result<String, ApiError>;
}

/// Creates renderers on demand; one renderer serves a whole document.
pub type RendererFactory = Arc<dyn Fn() -> Box<dyn FormulaRenderer> + Send + Sync>;

/// Default renderer: the formula source set as SVG text.
///
/// No TeX layout happens here; the image is sized from the character count.
#[derive(Debug, Clone)]
pub struct SvgTextRenderer {
    pub font_size: u32,
}

impl Default for SvgTextRenderer {
    fn default() -> Self {
        Self { font_size: 20 }
    }
}

impl SvgTextRenderer {
    pub fn factory() -> RendererFactory {
        Arc::new(|| Box::new(SvgTextRenderer::default()) as Box<dyn FormulaRenderer>)
    }

    fn to_svg(&self, formula: &str) -> String {
        let chars = formula.chars().count().max(1) as u32;
        let width = chars * self.font_size * 6 / 10 + self.font_size;
        let height = self.font_size * 2;
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\
<text x=\"50%\" y=\"50%\" dominant-baseline=\"middle\" text-anchor=\"middle\" \
font-family=\"serif\" font-style=\"italic\" font-size=\"{fs}\">{text}</text></svg>",
            w = width,
            h = height,
            fs = self.font_size,
            text = escape_xml(formula.trim()),
        )
    }
}

impl FormulaRenderer for SvgTextRenderer {
    fn render(&mut self, formula: &str) -> Result<String, ApiError> {
        let svg = self.to_svg(formula);
        Ok(format!("data:{};base64,{}", SVG_MIME, STANDARD.encode(svg)))
    }
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
