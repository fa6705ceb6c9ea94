//! Canvas Rendering
//!
//! This module renders a canvas to standalone HTML for export and preview.
//! Elements become absolutely positioned nodes inside a stage `<div>`, with
//! the same z-order and styling the live editor applies.

use crate::canvas::Canvas;
use crate::element::{
    CanvasElement, ElementContent, ImageFilter, ImageStyle, ShapeKind, TextStyle,
};

/// Renderer for canvas exports
#[derive(Debug, Clone)]
pub struct CanvasRenderer {
    /// Extra CSS class applied to the stage element
    stage_class: String,
}

impl CanvasRenderer {
    /// Create a renderer with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            stage_class: "easel-stage".to_string(),
        }
    }

    /// Set the stage CSS class
    #[must_use]
    pub fn with_stage_class(mut self, class: impl Into<String>) -> Self {
        self.stage_class = class.into();
        self
    }

    /// Render the whole canvas as one HTML fragment.
    ///
    /// Elements appear in paint order, background template first.
    #[must_use]
    pub fn render_canvas(&self, canvas: &Canvas) -> String {
        let (width, height) = canvas.extent();
        let mut out = format!(
            r#"<div class="{}" style="position: relative; width: {width}px; height: {height}px; background: {}; overflow: hidden;">"#,
            html_escape(&self.stage_class),
            html_escape(canvas.background()),
        );
        for element in canvas.elements_in_z_order() {
            out.push('\n');
            out.push_str(&self.render_element(element));
        }
        out.push_str("\n</div>");
        out
    }

    /// Render a single element to HTML
    #[must_use]
    pub fn render_element(&self, element: &CanvasElement) -> String {
        let position = position_css(element);
        match &element.content {
            ElementContent::Text { content, style } => format!(
                r#"<div class="element text" data-id="{}" style="{position}{}">{}</div>"#,
                element.id,
                text_css(style),
                html_escape(content),
            ),
            ElementContent::Image { src, style } => format!(
                r#"<img class="element image" data-id="{}" src="{}" style="{position}{}" loading="lazy" />"#,
                element.id,
                html_escape(src),
                image_css(style),
            ),
            ElementContent::Shape { shape, fill } => {
                let radius = match shape {
                    ShapeKind::Circle => " border-radius: 50%;",
                    ShapeKind::Rectangle => "",
                };
                format!(
                    r#"<div class="element shape" data-id="{}" style="{position} background: {};{radius}"></div>"#,
                    element.id,
                    html_escape(fill),
                )
            }
            ElementContent::Video { src, name } => format!(
                r#"<video class="element video" data-id="{}" src="{}" title="{}" style="{position}" controls></video>"#,
                element.id,
                html_escape(src),
                html_escape(name),
            ),
            ElementContent::Audio { src, name } => format!(
                r#"<audio class="element audio" data-id="{}" src="{}" title="{}" style="{position}" controls></audio>"#,
                element.id,
                html_escape(src),
                html_escape(name),
            ),
            ElementContent::BackgroundTemplate { src, name } => format!(
                r#"<img class="element background-template" data-id="{}" src="{}" alt="{}" style="position: absolute; inset: 0; width: 100%; height: 100%; object-fit: cover; z-index: 0; pointer-events: none;" />"#,
                element.id,
                html_escape(src),
                html_escape(name),
            ),
        }
    }
}

impl Default for CanvasRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Positioning CSS shared by every non-background element
fn position_css(element: &CanvasElement) -> String {
    let g = &element.geometry;
    // The background template paints at z-index 0; everything else must sit
    // above it even if a restored snapshot carries a non-positive z.
    let mut css = format!(
        "position: absolute; left: {}px; top: {}px; z-index: {};",
        g.x,
        g.y,
        element.z_order.max(1)
    );
    if let Some(width) = g.width {
        css.push_str(&format!(" width: {width}px;"));
    }
    if let Some(height) = g.height {
        css.push_str(&format!(" height: {height}px;"));
    }
    if g.rotation_deg != 0.0 {
        css.push_str(&format!(" transform: rotate({}deg);", g.rotation_deg));
    }
    if g.opacity < 1.0 {
        css.push_str(&format!(" opacity: {};", g.opacity));
    }
    css
}

fn text_css(style: &TextStyle) -> String {
    let mut css = format!(
        " font-family: {}; font-size: {}px; color: {}; text-align: {};",
        style.font_family,
        style.font_size,
        style.color,
        style.align.as_str()
    );
    if style.bold {
        css.push_str(" font-weight: bold;");
    }
    if style.italic {
        css.push_str(" font-style: italic;");
    }
    if style.underline {
        css.push_str(" text-decoration: underline;");
    }
    if let Some(background) = &style.background {
        css.push_str(&format!(" background: {background};"));
    }
    css
}

fn image_css(style: &ImageStyle) -> String {
    let mut css = String::new();
    if let Some(border) = &style.border {
        css.push_str(&format!(" border: {border};"));
    }
    if let Some(radius) = &style.border_radius {
        css.push_str(&format!(" border-radius: {radius};"));
    }
    if let Some(shadow) = &style.shadow {
        css.push_str(&format!(" box-shadow: {shadow};"));
    }
    if style.filter != ImageFilter::None {
        css.push_str(&format!(" filter: {};", style.filter.css_value()));
    }
    if style.flip_h || style.flip_v {
        let sx = if style.flip_h { -1 } else { 1 };
        let sy = if style.flip_v { -1 } else { 1 };
        css.push_str(&format!(" scale: {sx} {sy};"));
    }
    css
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeKind;

    #[test]
    fn test_render_text_element() {
        let renderer = CanvasRenderer::new();
        let element = CanvasElement::text("Hello", 10.0, 20.0);
        let html = renderer.render_element(&element);
        assert!(html.contains("left: 10px; top: 20px"));
        assert!(html.contains("font-size: 16px"));
        assert!(html.contains("font-family: Arial"));
        assert!(html.contains(">Hello</div>"));
        assert!(html.contains("z-index: 10"));
    }

    #[test]
    fn test_render_clamps_z_above_background() {
        let renderer = CanvasRenderer::new();
        let mut element = CanvasElement::text("behind", 0.0, 0.0);
        element.z_order = -3;
        let html = renderer.render_element(&element);
        assert!(html.contains("z-index: 1;"));
        assert!(!html.contains("z-index: -3"));
    }

    #[test]
    fn test_render_escapes_content() {
        let renderer = CanvasRenderer::new();
        let element = CanvasElement::text("<script>alert(1)</script>", 0.0, 0.0);
        let html = renderer.render_element(&element);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_circle_gets_border_radius() {
        let renderer = CanvasRenderer::new();
        let circle = CanvasElement::shape(ShapeKind::Circle, 0.0, 0.0);
        let rect = CanvasElement::shape(ShapeKind::Rectangle, 0.0, 0.0);
        assert!(renderer.render_element(&circle).contains("border-radius: 50%"));
        assert!(!renderer.render_element(&rect).contains("border-radius"));
    }

    #[test]
    fn test_render_image_defaults() {
        let renderer = CanvasRenderer::new();
        let element = CanvasElement::image("photo.png", 5.0, 5.0);
        let html = renderer.render_element(&element);
        assert!(html.contains(r#"src="photo.png""#));
        assert!(html.contains("width: 150px; height: 150px"));
    }

    #[test]
    fn test_render_rotation_and_opacity() {
        let renderer = CanvasRenderer::new();
        let mut element = CanvasElement::image("a.png", 0.0, 0.0);
        element.rotate_by(45.0);
        element.set_opacity(0.5);
        let html = renderer.render_element(&element);
        assert!(html.contains("rotate(45deg)"));
        assert!(html.contains("opacity: 0.5"));
    }

    #[test]
    fn test_render_canvas_background_first() {
        let renderer = CanvasRenderer::new();
        let mut canvas = Canvas::new();
        canvas
            .add_element(CanvasElement::text("top", 0.0, 0.0))
            .unwrap();
        canvas
            .add_element(CanvasElement::background_template("bg.png", "BG"))
            .unwrap();

        let html = renderer.render_canvas(&canvas);
        let bg_at = html.find("background-template").unwrap();
        let text_at = html.find(">top</div>").unwrap();
        assert!(bg_at < text_at);
        assert!(html.contains("width: 960px; height: 540px"));
        assert!(html.contains("background: #333"));
    }

    #[test]
    fn test_render_video_and_audio_controls() {
        let renderer = CanvasRenderer::new();
        let video = CanvasElement::video("clip.mp4", "Clip", 0.0, 0.0);
        let audio = CanvasElement::audio("song.mp3", "Song", 0.0, 0.0);
        assert!(renderer.render_element(&video).contains("<video"));
        assert!(renderer.render_element(&video).contains("controls"));
        assert!(renderer.render_element(&audio).contains(r#"title="Song""#));
    }
}
