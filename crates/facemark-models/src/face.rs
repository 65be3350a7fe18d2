use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An axis-aligned face bounding box in pixel coordinates, relative to the
/// top-left origin of the input image.
///
/// Boxes are produced through [`FaceBox::clamped`], so a `FaceBox` always
/// lies fully inside its image and always has positive area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FaceBox {
    /// 1-based index in detection order
    pub id: u32,
    /// X coordinate of the top-left corner (pixels)
    pub x: u32,
    /// Y coordinate of the top-left corner (pixels)
    pub y: u32,
    /// Width of the box (pixels)
    pub width: u32,
    /// Height of the box (pixels)
    pub height: u32,
}

impl FaceBox {
    /// Clamp a raw detection rectangle to the image bounds.
    ///
    /// Detectors can emit rectangles that poke past the image borders (or,
    /// near corners, collapse entirely). Returns `None` when the clamped
    /// rectangle has no area left.
    pub fn clamped(
        id: u32,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    ) -> Option<Self> {
        let x0 = (x.max(0) as i64).min(image_width as i64);
        let y0 = (y.max(0) as i64).min(image_height as i64);
        let x1 = (x as i64 + width as i64).clamp(0, image_width as i64);
        let y1 = (y as i64 + height as i64).clamp(0, image_height as i64);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(Self {
            id,
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }

    /// Exclusive right edge in pixels.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge in pixels.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether a pixel falls inside the box.
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}
