//! Usable render-surface size and DPI.

use std::sync::Arc;

use crate::quirks::QuirkCache;

/// Raw metrics of the default display as the OS reports them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisplayMetrics {
    /// Width in pixels.
    pub width_px: i32,
    /// Height in pixels.
    pub height_px: i32,
    /// Horizontal dots per inch.
    pub xdpi: f32,
    /// Vertical dots per inch.
    pub ydpi: f32,
}

/// A window-space rectangle in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameRect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge.
    pub right: i32,
    /// Bottom edge.
    pub bottom: i32,
}

impl FrameRect {
    /// Height of the rectangle.
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Where the probe reads display information from.
pub trait DisplaySource {
    /// Metrics of the full display.
    fn metrics(&self) -> DisplayMetrics;

    /// Whether the OS chrome (navigation/status bars) is hidden.
    fn chrome_hidden(&self) -> bool;

    /// Visible frame of the window's root view.
    fn visible_frame(&self) -> FrameRect;
}

/// Landscape-normalized surface size and effective DPI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGeometry {
    /// The longer side in pixels.
    pub width: i32,
    /// The shorter side in pixels, after device corrections.
    pub height: i32,
    /// Effective dots per inch.
    pub dpi: f32,
}

/// Measures the display, compensating for known device defects.
#[derive(Debug, Clone)]
pub struct DisplayGeometryProbe {
    quirks: Arc<QuirkCache>,
}

impl DisplayGeometryProbe {
    /// Creates a probe consulting `quirks`.
    pub fn new(quirks: Arc<QuirkCache>) -> Self {
        Self { quirks }
    }

    /// Reads the current geometry from `source`.
    pub fn measure(&self, source: &dyn DisplaySource) -> DisplayGeometry {
        let metrics = source.metrics();
        let profile = self.quirks.profile();

        let (mut width, mut height) = if source.chrome_hidden() {
            let frame = source.visible_frame();
            (frame.right, frame.bottom)
        } else {
            (metrics.width_px, metrics.height_px)
        };
        if height > width {
            std::mem::swap(&mut width, &mut height);
        }
        if let Some(correction) = profile.height_correction_px {
            height += correction;
        }

        let dpi = profile.dpi_override.unwrap_or_else(|| {
            ((metrics.xdpi * metrics.xdpi + metrics.ydpi * metrics.ydpi) / 2.0).sqrt()
        });

        DisplayGeometry { width, height, dpi }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{DisplayGeometryProbe, DisplayMetrics, FrameRect};
    use crate::{
        quirks::{HardwareIdentity, QuirkCache},
        testing::FakePlatform,
    };

    fn probe(manufacturer: &str, model: &str) -> DisplayGeometryProbe {
        DisplayGeometryProbe::new(Arc::new(QuirkCache::new(HardwareIdentity {
            manufacturer: manufacturer.into(),
            model: model.into(),
            board: "generic".into(),
            sdk_version: 21,
        })))
    }

    #[test]
    fn portrait_metrics_are_swapped() {
        let geometry = probe("Google", "Pixel").measure(&FakePlatform::default());
        assert_eq!((geometry.width, geometry.height), (1920, 1080));
        assert!((geometry.dpi - 400.0).abs() < 1e-3);
    }

    #[test]
    fn hidden_chrome_uses_visible_frame() {
        let platform = FakePlatform {
            chrome_hidden: true,
            visible_frame: FrameRect {
                left: 0,
                top: 0,
                right: 1794,
                bottom: 1080,
            },
            ..FakePlatform::default()
        };
        let geometry = probe("Google", "Pixel").measure(&platform);
        assert_eq!((geometry.width, geometry.height), (1794, 1080));
    }

    #[test]
    fn dpi_is_root_mean_square_of_both_axes() {
        let platform = FakePlatform {
            metrics: DisplayMetrics {
                width_px: 800,
                height_px: 480,
                xdpi: 300.0,
                ydpi: 100.0,
            },
            ..FakePlatform::default()
        };
        let geometry = probe("Acme", "Tab").measure(&platform);
        assert!((geometry.dpi - 223.607).abs() < 1e-2);
    }

    #[test]
    fn device_corrections_apply() {
        let kindle = probe("Amazon", "Kindle Fire").measure(&FakePlatform {
            metrics: DisplayMetrics {
                width_px: 1024,
                height_px: 600,
                xdpi: 169.0,
                ydpi: 169.0,
            },
            ..FakePlatform::default()
        });
        assert_eq!((kindle.width, kindle.height), (1024, 580));

        let one_x = probe("HTC", "HTC One X").measure(&FakePlatform::default());
        assert_eq!(one_x.dpi, 312.0);
    }
}
