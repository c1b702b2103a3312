//! Indicator geometry, read fresh from layout on every call.

use super::dom::Element;

/// Axis along which an indicator follows its item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Bottom bar: offset is `left`, size is `width`
    Horizontal,
    /// Sidebar: offset is `top`, size is `height`
    Vertical,
}

/// Position of an item relative to its container, along one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorGeometry {
    pub offset: f64,
    pub size: f64,
}

/// Measure `item` relative to `container`.
///
/// Both elements are forced through a layout pass first so cached geometry
/// from before a class change is never read. Returns `None` when either
/// handle is missing or detached.
pub fn measure(
    container: Option<&dyn Element>,
    item: Option<&dyn Element>,
    axis: Axis,
) -> Option<IndicatorGeometry> {
    let (container, item) = (container?, item?);

    container.force_layout();
    item.force_layout();

    let outer = container.bounding_rect()?;
    let inner = item.bounding_rect()?;

    let geometry = match axis {
        Axis::Horizontal => IndicatorGeometry {
            offset: inner.x - outer.x,
            size: inner.width,
        },
        Axis::Vertical => IndicatorGeometry {
            offset: inner.y - outer.y,
            size: inner.height,
        },
    };

    Some(geometry)
}

/// Format a pixel value the way the stylesheet expects it
pub fn px(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}px", rounded)
}
