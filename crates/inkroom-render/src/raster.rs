//! PNG raster export.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use crate::vello_impl::VelloSurface;
use ab_glyph::FontArc;
use inkroom_core::document::Document;

/// Encode straight RGBA pixels as an 8-bit PNG.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RendererError::Encode(format!("PNG header: {e}")))?;
        writer
            .write_image_data(rgba_data)
            .map_err(|e| RendererError::Encode(format!("PNG data: {e}")))?;
    }
    Ok(png_data)
}

impl VelloSurface {
    /// Rasterize the current scene and encode it as PNG.
    pub fn encode_png(&mut self) -> RenderResult<Vec<u8>> {
        let image = self.render_image()?;
        encode_png(image.as_raw(), image.width(), image.height())
    }
}

/// Render the committed document on white and encode it as PNG.
///
/// Only committed shapes are drawn; an in-progress gesture never reaches
/// an export.
pub fn export_png(
    document: &Document,
    width: u32,
    height: u32,
    font: Option<FontArc>,
) -> RenderResult<Vec<u8>> {
    let mut surface = VelloSurface::new(width, height)?;
    if let Some(font) = font {
        surface = surface.with_font(font);
    }
    Renderer::new().render(&mut surface, &RenderContext::new(document));
    log::debug!("Rendered {} shapes to {width}x{height} PNG", document.len());
    surface.encode_png()
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkroom_core::shapes::Shape;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png_signature() {
        let data = vec![255u8; 2 * 3 * 4];
        let png = encode_png(&data, 2, 3).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_encode_rejects_short_buffer() {
        assert!(matches!(encode_png(&[0u8; 4], 2, 2), Err(RendererError::Encode(_))));
    }

    #[test]
    fn test_export_png_round_trip() {
        let doc = Document::from_shapes(vec![Shape::rectangle(2.0, 2.0, 10.0, 10.0)]).unwrap();
        let bytes = export_png(&doc, 16, 16, None).unwrap();

        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!((info.width, info.height), (16, 16));

        // Background is opaque white, the rectangle edge is dark.
        let px = |x: usize, y: usize| &buf[(y * 16 + x) * 4..(y * 16 + x) * 4 + 4];
        assert_eq!(px(7, 7), &[255, 255, 255, 255]);
        assert!(px(2, 7)[0] < 128 || px(1, 7)[0] < 128);
    }

    #[test]
    fn test_export_png_invalid_size() {
        let doc = Document::new();
        assert!(matches!(export_png(&doc, 0, 0, None), Err(RendererError::InvalidSize { .. })));
    }
}
