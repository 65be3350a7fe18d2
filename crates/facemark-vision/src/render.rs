//! Redaction rendering: outlined/labeled copy and face-blurred copy.
//!
//! Both renderers work on an independent clone of the decoded image; the
//! source is never mutated. Boxes arrive already clamped to image bounds
//! (see `FaceBox::clamped`), so every rectangle drawn here has positive
//! area inside the canvas.

use ab_glyph::{FontArc, PxScale};
use image::imageops::{crop_imm, replace};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::filter::gaussian_blur_f32;
use imageproc::rect::Rect;

use facemark_models::FaceBox;

/// Outline and label tag color (green).
pub const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Label text color (white, contrasting with the green tag).
const LABEL_TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Outline stroke width in pixels.
const OUTLINE_THICKNESS: u32 = 3;

/// Label text height in pixels.
const LABEL_SCALE: f32 = 20.0;

/// Padding inside the label tag.
const LABEL_PAD: i32 = 3;

/// Gap between the tag and the top edge of the box.
const LABEL_GAP: i32 = 5;

/// Produce the marked copy: a green outline around each face plus a filled
/// "Face {id}" tag immediately above it.
///
/// Tags of faces near the top border may extend past the canvas and are
/// clipped; that is accepted, not corrected.
pub fn mark_faces(source: &RgbImage, faces: &[FaceBox], font: &FontArc) -> RgbImage {
    let mut out = source.clone();
    for face in faces {
        draw_outline(&mut out, face);
        draw_label(&mut out, face, font);
    }
    out
}

/// Produce the blurred copy: each face rectangle replaced by a heavily
/// Gaussian-blurred version of itself. Pixels outside every box are
/// untouched.
pub fn blur_faces(source: &RgbImage, faces: &[FaceBox]) -> RgbImage {
    let mut out = source.clone();
    for face in faces {
        let region = crop_imm(&out, face.x, face.y, face.width, face.height).to_image();
        let blurred = gaussian_blur_f32(&region, blur_sigma(face));
        replace(&mut out, &blurred, i64::from(face.x), i64::from(face.y));
    }
    out
}

/// Blur strength scaled to the box so features stay indistinguishable on
/// faces of any size.
fn blur_sigma(face: &FaceBox) -> f32 {
    (face.width.max(face.height) as f32 / 4.0).clamp(10.0, 100.0)
}

fn draw_outline(canvas: &mut RgbImage, face: &FaceBox) {
    // Nested 1-px rings, drawn inward from the box boundary.
    for t in 0..OUTLINE_THICKNESS {
        if face.width <= 2 * t || face.height <= 2 * t {
            break;
        }
        let rect = Rect::at((face.x + t) as i32, (face.y + t) as i32)
            .of_size(face.width - 2 * t, face.height - 2 * t);
        draw_hollow_rect_mut(canvas, rect, OUTLINE_COLOR);
    }
}

fn draw_label(canvas: &mut RgbImage, face: &FaceBox, font: &FontArc) {
    let text = format!("Face {}", face.id);
    let scale = PxScale::from(LABEL_SCALE);
    let (text_w, text_h) = text_size(scale, font, &text);

    let tag_w = text_w + 2 * LABEL_PAD as u32;
    let tag_h = text_h + 2 * LABEL_PAD as u32;
    let tag_top = face.y as i32 - LABEL_GAP - tag_h as i32;

    let tag = Rect::at(face.x as i32, tag_top).of_size(tag_w, tag_h);
    draw_filled_rect_mut(canvas, tag, OUTLINE_COLOR);
    draw_text_mut(
        canvas,
        LABEL_TEXT_COLOR,
        face.x as i32 + LABEL_PAD,
        tag_top + LABEL_PAD,
        scale,
        font,
        &text,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::load_label_font;

    /// Non-uniform test image; a flat color would make blur a no-op.
    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 11 % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    fn face(id: u32, x: u32, y: u32, w: u32, h: u32) -> FaceBox {
        FaceBox::clamped(id, x as i32, y as i32, w, h, 200, 200).unwrap()
    }

    #[test]
    fn blur_changes_inside_and_preserves_outside() {
        let src = gradient(200, 200);
        let boxes = [face(1, 40, 40, 60, 60)];
        let out = blur_faces(&src, &boxes);

        assert_eq!(out.dimensions(), src.dimensions());

        // Center of the box must differ from the source.
        assert_ne!(out.get_pixel(70, 70), src.get_pixel(70, 70));

        // Everything strictly outside the box is bit-identical.
        for (x, y, px) in out.enumerate_pixels() {
            if !boxes[0].contains(x, y) {
                assert_eq!(px, src.get_pixel(x, y), "pixel ({x},{y}) changed");
            }
        }
    }

    #[test]
    fn blur_with_no_faces_is_identity() {
        let src = gradient(64, 48);
        let out = blur_faces(&src, &[]);
        assert_eq!(out.as_raw(), src.as_raw());
    }

    #[test]
    fn blur_handles_box_touching_image_edge() {
        let src = gradient(100, 100);
        let boxes = [face(1, 0, 0, 30, 30), face(2, 70, 70, 30, 30)];
        let out = blur_faces(&src, &boxes);
        assert_eq!(out.dimensions(), (100, 100));
        assert_eq!(out.get_pixel(50, 50), src.get_pixel(50, 50));
    }

    #[test]
    fn outline_paints_box_boundary() {
        let src = gradient(200, 200);
        let b = face(1, 40, 40, 60, 60);
        let mut out = src.clone();
        draw_outline(&mut out, &b);

        // All four corners of the boundary ring carry the outline color.
        assert_eq!(out.get_pixel(40, 40), &OUTLINE_COLOR);
        assert_eq!(out.get_pixel(99, 40), &OUTLINE_COLOR);
        assert_eq!(out.get_pixel(40, 99), &OUTLINE_COLOR);
        assert_eq!(out.get_pixel(99, 99), &OUTLINE_COLOR);
        // Stroke extends inward, not outward.
        assert_eq!(out.get_pixel(42, 40), &OUTLINE_COLOR);
        assert_eq!(out.get_pixel(39, 40), src.get_pixel(39, 40));
        // Interior stays untouched.
        assert_eq!(out.get_pixel(70, 70), src.get_pixel(70, 70));
    }

    #[test]
    fn outline_survives_degenerately_small_boxes() {
        let src = gradient(50, 50);
        let mut out = src.clone();
        // 2x2 box: thinner than the full stroke; must not panic.
        draw_outline(&mut out, &face(1, 10, 10, 2, 2));
        assert_eq!(out.get_pixel(10, 10), &OUTLINE_COLOR);
    }

    #[test]
    fn marked_copy_keeps_dimensions_and_draws_label_tag() {
        // Needs an installed system font; skip on hosts without one.
        let Ok(font) = load_label_font(None) else {
            eprintln!("no system font installed, skipping");
            return;
        };
        let src = gradient(200, 200);
        let boxes = [face(1, 40, 60, 60, 60)];
        let out = mark_faces(&src, &boxes, &font);

        assert_eq!(out.dimensions(), src.dimensions());
        assert_eq!(out.get_pixel(40, 60), &OUTLINE_COLOR);

        // The tag sits in the gap above the box and is filled with the
        // outline color.
        let tag_probe_y = 60 - LABEL_GAP as u32 - 2;
        assert_eq!(out.get_pixel(41, tag_probe_y), &OUTLINE_COLOR);
    }

    #[test]
    fn label_near_top_edge_is_clipped_not_fatal() {
        let Ok(font) = load_label_font(None) else {
            eprintln!("no system font installed, skipping");
            return;
        };
        let src = gradient(120, 120);
        // Box at the very top: the tag lands off-canvas.
        let boxes = [face(1, 10, 0, 40, 40)];
        let out = mark_faces(&src, &boxes, &font);
        assert_eq!(out.dimensions(), src.dimensions());
        assert_eq!(out.get_pixel(10, 0), &OUTLINE_COLOR);
    }
}
