//! Fixed series palette.

use egui::Color32;

/// Series colors, consumed in plotting order within a panel.
pub const PALETTE: [Color32; 8] = [
    Color32::from_rgb(0xFF, 0x41, 0x36), // red
    Color32::from_rgb(0x00, 0x74, 0xD9), // blue
    Color32::from_rgb(0xFF, 0x85, 0x1B), // orange
    Color32::from_rgb(0x7F, 0xDB, 0xFF), // aqua
    Color32::from_rgb(0xF0, 0x12, 0xBE), // fuchsia
    Color32::from_rgb(0x39, 0xCC, 0xCC), // teal
    Color32::from_rgb(0x00, 0x1F, 0x3F), // navy
    Color32::from_rgb(0x2E, 0xCC, 0x40), // green
];

/// Color of the `index`-th series in a panel. Wraps after the last entry.
pub fn series_color(index: usize) -> Color32 {
    PALETTE[index % PALETTE.len()]
}
