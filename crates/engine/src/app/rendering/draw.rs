//! Software rasterizers for the frame buffer. Every function clips against
//! the frame bounds, so callers can draw partially off-screen shapes.

pub(super) fn put_px(frame: &mut [u8], width: u32, height: u32, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return;
    }
    let offset = (y as usize * width as usize + x as usize) * 4;
    if offset + 4 <= frame.len() {
        frame[offset..offset + 4].copy_from_slice(&color);
    }
}

pub(super) fn fill_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    left: i32,
    top: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    let draw_left = left.max(0);
    let draw_top = top.max(0);
    let draw_right = (left + rect_width).min(width as i32);
    let draw_bottom = (top + rect_height).min(height as i32);
    for y in draw_top..draw_bottom {
        for x in draw_left..draw_right {
            put_px(frame, width, height, x, y, color);
        }
    }
}

/// Isometric floor diamond centered on (`center_x`, `center_y`), spanning
/// `half_width` to each side and `half_height` up and down.
pub(super) fn fill_diamond(
    frame: &mut [u8],
    width: u32,
    height: u32,
    center_x: i32,
    center_y: i32,
    half_width: i32,
    half_height: i32,
    color: [u8; 4],
) {
    if half_width <= 0 || half_height <= 0 {
        return;
    }
    for dy in -half_height..=half_height {
        let row_half =
            ((half_height - dy.abs()) as f32 / half_height as f32 * half_width as f32) as i32;
        for dx in -row_half..=row_half {
            put_px(frame, width, height, center_x + dx, center_y + dy, color);
        }
    }
}

/// Side faces of a tile extruded upward by `wall_height`: each column is
/// filled from the base diamond's lower edge up to the raised top diamond.
#[allow(clippy::too_many_arguments)]
pub(super) fn fill_extruded_sides(
    frame: &mut [u8],
    width: u32,
    height: u32,
    center_x: i32,
    center_y: i32,
    half_width: i32,
    half_height: i32,
    wall_height: i32,
    left_color: [u8; 4],
    right_color: [u8; 4],
) {
    if half_width <= 0 || half_height <= 0 || wall_height <= 0 {
        return;
    }
    for dx in -half_width..=half_width {
        let edge_drop =
            ((half_width - dx.abs()) as f32 / half_width as f32 * half_height as f32) as i32;
        let bottom = center_y + edge_drop;
        let color = if dx < 0 { left_color } else { right_color };
        for y in (bottom - wall_height)..=bottom {
            put_px(frame, width, height, center_x + dx, y, color);
        }
    }
}

pub(super) fn fill_circle(
    frame: &mut [u8],
    width: u32,
    height: u32,
    center_x: i32,
    center_y: i32,
    radius: i32,
    color: [u8; 4],
) {
    if radius <= 0 {
        return;
    }
    let radius_sq = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius_sq {
                put_px(frame, width, height, center_x + dx, center_y + dy, color);
            }
        }
    }
}

/// Flattened circle used for ground shadows.
pub(super) fn fill_ellipse(
    frame: &mut [u8],
    width: u32,
    height: u32,
    center_x: i32,
    center_y: i32,
    radius_x: i32,
    radius_y: i32,
    color: [u8; 4],
) {
    if radius_x <= 0 || radius_y <= 0 {
        return;
    }
    for dy in -radius_y..=radius_y {
        for dx in -radius_x..=radius_x {
            let nx = dx as f32 / radius_x as f32;
            let ny = dy as f32 / radius_y as f32;
            if nx * nx + ny * ny <= 1.0 {
                put_px(frame, width, height, center_x + dx, center_y + dy, color);
            }
        }
    }
}
