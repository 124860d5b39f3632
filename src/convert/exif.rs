/// EXIF orientation handling
///
/// Phone cameras usually store the sensor image unrotated and record how
/// to display it in the EXIF orientation tag. The crop math assumes the
/// displayed geometry, so the tag is baked into the pixels first.

use exif::{In, Tag};
use image::DynamicImage;
use std::io::Cursor;

/// Read the EXIF orientation tag from an encoded image buffer.
/// Returns `None` when the buffer has no parseable EXIF segment or no
/// orientation tag.
pub fn orientation(bytes: &[u8]) -> Option<u32> {
    let parsed = exif::Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;

    parsed
        .get_field(Tag::Orientation, In::PRIMARY)?
        .value
        .get_uint(0)
}

/// Bake one of the eight standard EXIF orientations into the pixels.
/// Unknown values leave the image untouched.
pub fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.fliph().rotate180(),
        5 => img.flipv().rotate90(),
        6 => img.rotate90(),
        7 => img.flipv().rotate270(),
        8 => img.rotate270(),
        _ => img,
    }
}
