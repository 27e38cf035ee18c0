//! Shape generation for 2D primitives
//!
//! Everything here works in pixel space (origin top-left, y down) and
//! emits triangle lists.

use glam::Vec2;

use super::vertex::Vertex;

/// Push two triangles covering the quad a-b-c-d (in winding order)
fn push_quad(vertices: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
    vertices.push(Vertex::new(a.x, a.y, color));
    vertices.push(Vertex::new(b.x, b.y, color));
    vertices.push(Vertex::new(c.x, c.y, color));

    vertices.push(Vertex::new(a.x, a.y, color));
    vertices.push(Vertex::new(c.x, c.y, color));
    vertices.push(Vertex::new(d.x, d.y, color));
}

/// Filled axis-aligned rectangle with its top-left corner at `min`
pub fn rect(vertices: &mut Vec<Vertex>, min: Vec2, size: Vec2, color: [f32; 4]) {
    let max = min + size;
    push_quad(
        vertices,
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
        color,
    );
}

/// Line segment as a quad of the given width; degenerate segments emit nothing
pub fn line(vertices: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let perp = dir.perp() * (width * 0.5);
    push_quad(vertices, from + perp, to + perp, to - perp, from - perp, color);
}

/// Closed triangle outline
pub fn triangle_outline(
    vertices: &mut Vec<Vertex>,
    corners: [Vec2; 3],
    width: f32,
    color: [f32; 4],
) {
    for i in 0..3 {
        line(vertices, corners[i], corners[(i + 1) % 3], width, color);
    }
}

// Seven-segment glyphs, bit order: top, top-right, bottom-right, bottom,
// bottom-left, top-left, middle
const SEG_TOP: u8 = 1 << 0;
const SEG_TOP_RIGHT: u8 = 1 << 1;
const SEG_BOTTOM_RIGHT: u8 = 1 << 2;
const SEG_BOTTOM: u8 = 1 << 3;
const SEG_BOTTOM_LEFT: u8 = 1 << 4;
const SEG_TOP_LEFT: u8 = 1 << 5;
const SEG_MIDDLE: u8 = 1 << 6;

const DIGITS: [u8; 10] = [
    0b0111111, // 0
    0b0000110, // 1
    0b1011011, // 2
    0b1001111, // 3
    0b1100110, // 4
    0b1101101, // 5
    0b1111101, // 6
    0b0000111, // 7
    0b1111111, // 8
    0b1101111, // 9
];

fn glyph_segments(ch: char) -> Option<u8> {
    match ch {
        '0'..='9' => Some(DIGITS[ch as usize - '0' as usize]),
        '-' => Some(SEG_MIDDLE),
        _ => None,
    }
}

/// Seven-segment text; supports digits, `-`, `.` and space
///
/// Other characters advance the cursor but draw nothing. Returns the
/// x coordinate just past the last glyph.
pub fn seven_segment_text(
    vertices: &mut Vec<Vertex>,
    text: &str,
    origin: Vec2,
    height: f32,
    color: [f32; 4],
) -> f32 {
    let width = height * 0.5;
    let thickness = (height / 8.0).max(1.0);
    let half = height * 0.5;
    let mut x = origin.x;

    for ch in text.chars() {
        if ch == '.' {
            rect(
                vertices,
                Vec2::new(x, origin.y + height - thickness),
                Vec2::splat(thickness),
                color,
            );
            x += thickness * 2.0;
            continue;
        }

        if let Some(segments) = glyph_segments(ch) {
            let at = |dx: f32, dy: f32| Vec2::new(x + dx, origin.y + dy);
            let bars = [
                (SEG_TOP, at(0.0, 0.0), Vec2::new(width, thickness)),
                (SEG_TOP_RIGHT, at(width - thickness, 0.0), Vec2::new(thickness, half)),
                (SEG_BOTTOM_RIGHT, at(width - thickness, half), Vec2::new(thickness, half)),
                (SEG_BOTTOM, at(0.0, height - thickness), Vec2::new(width, thickness)),
                (SEG_BOTTOM_LEFT, at(0.0, half), Vec2::new(thickness, half)),
                (SEG_TOP_LEFT, at(0.0, 0.0), Vec2::new(thickness, half)),
                (SEG_MIDDLE, at(0.0, half - thickness * 0.5), Vec2::new(width, thickness)),
            ];
            for (bit, min, size) in bars {
                if segments & bit != 0 {
                    rect(vertices, min, size, color);
                }
            }
        }
        x += width + thickness * 2.0;
    }

    x
}
