//! Label overlays drawn as text at their projected pixel positions.

use glyphon::{
    Attrs, Buffer, Cache, Color as TextColor, Family, FontSystem, Metrics,
    PrepareError, RenderError, Resolution, Shaping, SwashCache, TextArea,
    TextAtlas, TextBounds, TextRenderer, Viewport,
};
use wgpu::MultisampleState;

use super::pipeline::overlay_depth_state;
use crate::gpu::render_context::RenderContext;
use crate::scene::LabelOverlay;
use crate::util::color::Color;

/// Label font size in pixels.
pub const LABEL_FONT_SIZE: f32 = 16.0;
/// Label line height in pixels.
pub const LABEL_LINE_HEIGHT: f32 = 20.0;

/// One shaped label and where its top-left corner goes.
struct PlacedText {
    buffer: Buffer,
    /// Text the buffer was last shaped with.
    text: String,
    color: TextColor,
    left: f32,
    top: f32,
}

impl PlacedText {
    fn new(font_system: &mut FontSystem) -> Self {
        let mut buffer = Buffer::new(
            font_system,
            Metrics::new(LABEL_FONT_SIZE, LABEL_LINE_HEIGHT),
        );
        buffer.set_size(font_system, None, None);
        Self {
            buffer,
            text: String::new(),
            color: TextColor::rgb(255, 255, 255),
            left: 0.0,
            top: 0.0,
        }
    }

    /// Reshape if the text changed, then centre on the overlay position.
    fn update(&mut self, font_system: &mut FontSystem, overlay: &LabelOverlay) {
        if self.text != overlay.text {
            self.buffer.set_text(
                font_system,
                &overlay.text,
                &Attrs::new().family(Family::SansSerif),
                Shaping::Advanced,
            );
            self.buffer.shape_until_scroll(font_system, false);
            overlay.text.clone_into(&mut self.text);
        }
        let (width, height) = text_extent(&self.buffer);
        let (left, top) = centred_origin(overlay, width, height);
        self.left = left;
        self.top = top;
        self.color = text_color(overlay);
    }

    fn area(&self, bounds: TextBounds) -> TextArea<'_> {
        TextArea {
            buffer: &self.buffer,
            left: self.left,
            top: self.top,
            scale: 1.0,
            bounds,
            default_color: self.color,
            custom_glyphs: &[],
        }
    }
}

/// Widest line and total height of shaped text.
fn text_extent(buffer: &Buffer) -> (f32, f32) {
    buffer.layout_runs().fold((0.0, 0.0), |(w, h), run| {
        (f32::max(w, run.line_w), h + run.line_height)
    })
}

/// Top-left corner that centres a `width × height` box on the overlay.
fn centred_origin(overlay: &LabelOverlay, width: f32, height: f32) -> (f32, f32) {
    (
        overlay.position.x - width / 2.0,
        overlay.position.y - height / 2.0,
    )
}

/// Overlay color with its opacity as alpha. Unparseable colors fall back
/// to white.
fn text_color(overlay: &LabelOverlay) -> TextColor {
    let rgb = Color::from_css(&overlay.color).unwrap_or(Color::WHITE).0;
    let alpha = (overlay.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    TextColor::rgba((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, alpha)
}

/// Draws the visible overlays of one scene inside the scene pass.
pub struct LabelRenderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    atlas: TextAtlas,
    renderer: TextRenderer,
    viewport: Viewport,
    texts: Vec<PlacedText>,
}

impl LabelRenderer {
    /// Glyph atlas and pipeline for `context`'s surface format.
    pub fn new(context: &RenderContext) -> Self {
        let device = &context.device;
        let cache = Cache::new(device);
        let mut atlas =
            TextAtlas::new(device, &context.queue, &cache, context.format());
        let renderer = TextRenderer::new(
            &mut atlas,
            device,
            MultisampleState::default(),
            Some(overlay_depth_state()),
        );
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            atlas,
            renderer,
            viewport: Viewport::new(device, &cache),
            texts: Vec::new(),
        }
    }

    /// Shape and upload `overlays`. Hidden overlays are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`PrepareError`] if the glyph atlas is full.
    pub fn prepare(
        &mut self,
        context: &RenderContext,
        overlays: &[LabelOverlay],
    ) -> Result<(), PrepareError> {
        let (width, height) = context.size();
        self.viewport
            .update(&context.queue, Resolution { width, height });

        let visible: Vec<&LabelOverlay> =
            overlays.iter().filter(|o| o.opacity > 0.0).collect();
        self.texts.truncate(visible.len());
        while self.texts.len() < visible.len() {
            self.texts.push(PlacedText::new(&mut self.font_system));
        }
        for (text, overlay) in self.texts.iter_mut().zip(visible) {
            text.update(&mut self.font_system, overlay);
        }

        let bounds = TextBounds {
            left: 0,
            top: 0,
            right: width as i32,
            bottom: height as i32,
        };
        self.renderer.prepare(
            &context.device,
            &context.queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            self.texts.iter().map(|t| t.area(bounds)),
            &mut self.swash_cache,
        )
    }

    /// Draw the prepared labels into `pass`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if a glyph vanished from the atlas.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) -> Result<(), RenderError> {
        self.renderer.render(&self.atlas, &self.viewport, pass)
    }

    /// Number of labels prepared for the next draw.
    #[must_use]
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether no label is prepared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Release atlas space of glyphs not used this frame.
    pub fn trim(&mut self) {
        self.atlas.trim();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn overlay(color: &str, opacity: f32) -> LabelOverlay {
        LabelOverlay {
            text: "P".into(),
            color: color.into(),
            position: Vec2::new(400.0, 300.0),
            opacity,
        }
    }

    #[test]
    fn box_is_centred_on_the_anchor() {
        let o = overlay("#ffffff", 1.0);
        assert_eq!(centred_origin(&o, 100.0, 20.0), (350.0, 290.0));
    }

    #[test]
    fn color_carries_overlay_opacity() {
        let c = text_color(&overlay("#00d9ff", 1.0));
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (0x00, 0xd9, 0xff, 255));
        assert_eq!(text_color(&overlay("#00d9ff", 0.0)).a(), 0);
    }

    #[test]
    fn bad_color_falls_back_to_white() {
        let c = text_color(&overlay("cyan", 1.0));
        assert_eq!((c.r(), c.g(), c.b()), (255, 255, 255));
    }

    #[test]
    fn shaped_text_has_an_extent() {
        let mut font_system = FontSystem::new();
        let mut placed = PlacedText::new(&mut font_system);
        let o = LabelOverlay {
            text: "Step 1: Selecting Generator Point G".into(),
            ..overlay("#ffffff", 1.0)
        };
        placed.update(&mut font_system, &o);
        let (width, height) = text_extent(&placed.buffer);
        if width > 0.0 {
            // Fonts are present: the box straddles the anchor.
            assert!(placed.left < o.position.x);
            assert!(placed.left + width > o.position.x);
            assert_eq!(height, LABEL_LINE_HEIGHT);
        }
        assert_eq!(placed.text, o.text);
    }
}
