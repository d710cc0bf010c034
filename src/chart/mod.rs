//! Chart model shared by the window renderer.
//!
//! - `layout`: turns parsed records into a `Figure` of stacked panels
//! - `axis`: value ranges and tick placement
//! - `palette`: the fixed series colors
//! - `style`: the immutable rendering configuration

pub mod axis;
pub mod layout;
pub mod palette;
pub mod style;

pub use axis::{AxisRange, format_tick, nice_step};
pub use layout::{Figure, LegendCorner, Panel, build_figure, figure_title};
pub use style::ChartStyle;
