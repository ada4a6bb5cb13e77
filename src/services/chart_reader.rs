use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{HarvestError, HarvestResult};
use crate::utils::time_label::{clean_label, has_valid_length};

/// An RGBA pixel buffer, row-major, four bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRegion {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImageRegion {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> HarvestResult<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(HarvestError::Image {
                path: "<buffer>".to_string(),
                reason: format!("expected {} bytes for {}x{}, got {}", expected, width, height, rgba.len()),
            });
        }
        Ok(Self { width, height, rgba })
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }

    /// Tightest box around every pixel with non-zero alpha, or `None` when
    /// the region is fully transparent.
    pub fn crop_transparent(&self) -> Option<ImageRegion> {
        let (mut left, mut top) = (u32::MAX, u32::MAX);
        let (mut right, mut bottom) = (0u32, 0u32);
        let mut found = false;

        for y in 0..self.height {
            for x in 0..self.width {
                if self.pixel(x, y)[3] > 0 {
                    found = true;
                    left = left.min(x);
                    right = right.max(x);
                    top = top.min(y);
                    bottom = bottom.max(y);
                }
            }
        }
        if !found {
            return None;
        }

        let width = right - left + 1;
        let height = bottom - top + 1;
        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        for y in top..=bottom {
            let start = (y as usize * self.width as usize + left as usize) * 4;
            rgba.extend_from_slice(&self.rgba[start..start + width as usize * 4]);
        }
        Some(ImageRegion { width, height, rgba })
    }
}

/// Source of the chart's time-axis image regions, in the order they should
/// be tried.
#[async_trait]
pub trait ImageRegionProvider: Send + Sync {
    async fn regions(&self) -> HarvestResult<Vec<ImageRegion>>;
}

#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &ImageRegion) -> HarvestResult<String>;
}

/// Recovers the date label the chart shows for the selected time.
#[derive(Clone)]
pub struct ChartTimeReader {
    provider: Arc<dyn ImageRegionProvider>,
    recognizer: Arc<dyn TextRecognizer>,
}

impl ChartTimeReader {
    pub fn new(provider: Arc<dyn ImageRegionProvider>, recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self { provider, recognizer }
    }

    /// Returns the first cleaned OCR result of a valid label length.
    /// Misreads are not retried here; callers re-trigger the scan.
    pub async fn read_label(&self) -> HarvestResult<String> {
        let regions = self.provider.regions().await?;
        tracing::debug!(count = regions.len(), "scanning time axis regions");

        for (index, region) in regions.iter().enumerate() {
            let Some(cropped) = region.crop_transparent() else {
                tracing::debug!(index, "region has no visible pixels");
                continue;
            };

            let text = match self.recognizer.recognize(&cropped).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(index, error = %e, "ocr failed on region");
                    continue;
                }
            };

            let label = clean_label(&text);
            if !has_valid_length(&label) {
                tracing::debug!(index, raw = %text.trim(), len = label.chars().count(), "rejected label");
                continue;
            }
            tracing::debug!(index, %label, "chart time label");
            return Ok(label);
        }

        Err(HarvestError::NoTimeLabelFound)
    }
}
