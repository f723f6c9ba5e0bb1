//! Byte protocol spoken by Matrix Orbital LK/MX series character displays.
//!
//! Every command starts with the `0xFE` command prefix. Text is sent as raw
//! ASCII after positioning the cursor; nothing here truncates or transliterates,
//! callers hand in display-ready text.

/// Command prefix byte.
pub const COMMAND: u8 = 0xFE;

/// Clear the screen (`X`), then send the cursor home (`H`).
pub const CLEAR_AND_HOME: [u8; 4] = [COMMAND, b'X', COMMAND, b'H'];

/// Load the horizontal bar graph character set.
pub const READY_HORIZONTAL_BARS: [u8; 2] = [COMMAND, b'h'];

/// Backlight on, with no auto-off timeout.
pub const BACKLIGHT_ON: [u8; 3] = [COMMAND, b'B', 0x00];

pub const BACKLIGHT_OFF: [u8; 2] = [COMMAND, b'F'];

const SET_CURSOR: u8 = b'G';
const HORIZONTAL_BAR: u8 = 0x7C;

/// Horizontal placement of a text run on a row.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Right,
    Center,
}

/// Display row. Two-line modules only have these two.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Row {
    Top,
    Bottom,
}

impl Row {
    /// 1-based row number as the controller expects it.
    pub fn selector(self) -> u8 {
        match self {
            Row::Top => 0x01,
            Row::Bottom => 0x02,
        }
    }
}

/// 1-based start column for `text_len` characters aligned on a `width` wide row.
///
/// Never returns less than 1, even when the text is wider than the display.
/// Columns beyond 255 are clamped since the protocol carries a single byte.
pub fn column(text_len: usize, align: HAlign, width: usize) -> u8 {
    let width = width as i64;
    let len = text_len as i64;
    let col = match align {
        HAlign::Left => 1,
        HAlign::Right => width - len + 1,
        HAlign::Center => (width - len).div_euclid(2) + 1,
    };
    col.clamp(1, u8::MAX as i64) as u8
}

/// Encode `text` positioned on `row` with the given alignment.
///
/// Output is `FE 47 <col> <row>` followed by the text bytes.
pub fn encode(text: &str, align: HAlign, row: Row, width: usize) -> Vec<u8> {
    let col = column(text.chars().count(), align, width);
    let mut out = Vec::with_capacity(4 + text.len());
    out.extend_from_slice(&[COMMAND, SET_CURSOR, col, row.selector()]);
    out.extend_from_slice(text.as_bytes());
    out
}

pub fn clear_and_home() -> [u8; 4] {
    CLEAR_AND_HOME
}

/// Horizontal bar graph on row 2 starting at column 1, growing to the right.
///
/// `percent` is the bar length in pixels and is capped at 100.
pub fn progress_bar(percent: u8) -> [u8; 6] {
    [COMMAND, HORIZONTAL_BAR, 0x01, 0x02, 0x00, percent.min(100)]
}
