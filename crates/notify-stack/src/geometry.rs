//! Stack geometry derived from the primary display's work area.

use serde::{Deserialize, Serialize};

use crate::MAX_VISIBLE_CEILING;
use crate::config::{Corner, NotifyConfig};

/// Absolute screen coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Screen rectangle in absolute coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Primary display geometry as reported by the window system.
///
/// `work_area` excludes task bars and docks and is absolute, like `bounds`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayInfo {
    pub bounds: Rect,
    pub work_area: Rect,
}

impl DisplayInfo {
    pub fn new(bounds: Rect, work_area: Rect) -> Self {
        Self { bounds, work_area }
    }

    /// Display whose work area is the full screen.
    pub fn full(width: u32, height: u32) -> Self {
        let rect = Rect::new(0, 0, width, height);
        Self::new(rect, rect)
    }
}

/// Geometry of the notification stack for one display configuration.
///
/// All fields are derived together; a display change replaces the whole
/// value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub corner: Corner,
    /// Corner of the work area the stack is anchored to.
    pub anchor: Point,
    pub total_width: i32,
    pub total_height: i32,
    /// Position of slot 0.
    pub first_pos: Point,
    pub max_visible: usize,
}

impl Layout {
    pub fn compute(config: &NotifyConfig, display: &DisplayInfo) -> Self {
        let area = display.work_area;
        let corner = config.corner;

        let mut anchor = Point::new(area.x, area.y);
        if corner.is_right() {
            anchor.x += to_i32(area.width);
        }
        if !corner.is_upper() {
            anchor.y += to_i32(area.height);
        }

        let total_width = to_i32(config.width.saturating_add(config.padding));
        let total_height = to_i32(config.height.saturating_add(config.padding));

        let first_pos = match corner {
            Corner::UpperRight => Point::new(anchor.x - total_width, anchor.y),
            Corner::LowerRight => Point::new(anchor.x - total_width, anchor.y - total_height),
            Corner::LowerLeft => Point::new(anchor.x, anchor.y - total_height),
            Corner::UpperLeft => anchor,
        };

        let max_visible = if total_height > 0 {
            (area.height / total_height.unsigned_abs()) as usize
        } else {
            0
        };

        Self {
            corner,
            anchor,
            total_width,
            total_height,
            first_pos,
            max_visible: max_visible.min(MAX_VISIBLE_CEILING),
        }
    }

    /// Vertical position of the given slot, counted from the anchor outward.
    pub fn slot_y(&self, index: usize) -> i32 {
        let index = to_i32(index);
        if self.corner.is_upper() {
            self.anchor.y + self.total_height * index
        } else {
            self.anchor.y - self.total_height * (index + 1)
        }
    }

    pub fn slot_position(&self, index: usize) -> Point {
        Point::new(self.first_pos.x, self.slot_y(index))
    }
}

fn to_i32<T: TryInto<i32>>(value: T) -> i32 {
    value.try_into().unwrap_or(i32::MAX)
}
