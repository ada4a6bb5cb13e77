//! Time-axis captures dumped by the chart host as netpbm files.
//!
//! Each `*.pam` (P7, depth 1-4) or `*.ppm` (P6) file in the capture directory
//! is one candidate region; files are tried in name order.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::{HarvestError, HarvestResult};
use crate::services::chart_reader::{ImageRegion, ImageRegionProvider};

#[derive(Debug, Clone)]
pub struct CaptureDirProvider {
    dir: PathBuf,
}

impl CaptureDirProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn capture_files(&self) -> HarvestResult<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(|e| HarvestError::Image {
            path: self.dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut files = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            let is_capture = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("pam") || ext.eq_ignore_ascii_case("ppm"))
                .unwrap_or(false);
            if is_capture {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// True once the host has written at least one capture.
    pub async fn has_regions(&self) -> bool {
        self.capture_files().await.map(|f| !f.is_empty()).unwrap_or(false)
    }
}

#[async_trait]
impl ImageRegionProvider for CaptureDirProvider {
    async fn regions(&self) -> HarvestResult<Vec<ImageRegion>> {
        let mut regions = Vec::new();
        for path in self.capture_files().await? {
            let bytes = tokio::fs::read(&path).await.map_err(|e| HarvestError::Image {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            match decode_netpbm(&bytes) {
                Ok(region) => regions.push(region),
                Err(reason) => {
                    tracing::warn!(path = %path.display(), %reason, "skipping unreadable capture");
                }
            }
        }
        Ok(regions)
    }
}

/// Splits whitespace-separated header tokens, skipping `#` comments, and
/// returns them with the offset just past the last one.
fn header_tokens(bytes: &[u8], count: usize) -> Result<(Vec<String>, usize), String> {
    let mut tokens = Vec::with_capacity(count);
    let mut i = 0;
    while tokens.len() < count {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'#' {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }
        let start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if start == i {
            return Err("truncated header".to_string());
        }
        tokens.push(String::from_utf8_lossy(&bytes[start..i]).into_owned());
    }
    Ok((tokens, i))
}

fn parse_dim(token: &str, name: &str) -> Result<u32, String> {
    token
        .parse::<u32>()
        .map_err(|_| format!("bad {} {:?}", name, token))
}

fn expand_to_rgba(data: &[u8], depth: usize, width: u32, height: u32) -> Result<ImageRegion, String> {
    let pixels = width as usize * height as usize;
    if data.len() < pixels * depth {
        return Err(format!("expected {} bytes of pixels, got {}", pixels * depth, data.len()));
    }
    let mut rgba = Vec::with_capacity(pixels * 4);
    for px in data[..pixels * depth].chunks_exact(depth) {
        match depth {
            1 => rgba.extend_from_slice(&[px[0], px[0], px[0], 255]),
            2 => rgba.extend_from_slice(&[px[0], px[0], px[0], px[1]]),
            3 => rgba.extend_from_slice(&[px[0], px[1], px[2], 255]),
            _ => rgba.extend_from_slice(&px[..4]),
        }
    }
    ImageRegion::new(width, height, rgba).map_err(|e| e.to_string())
}

fn decode_ppm(bytes: &[u8]) -> Result<ImageRegion, String> {
    let (tokens, end) = header_tokens(bytes, 4)?;
    let width = parse_dim(&tokens[1], "width")?;
    let height = parse_dim(&tokens[2], "height")?;
    if tokens[3] != "255" {
        return Err(format!("unsupported maxval {}", tokens[3]));
    }
    // exactly one whitespace byte separates the header from the raster
    expand_to_rgba(bytes.get(end + 1..).unwrap_or_default(), 3, width, height)
}

fn decode_pam(bytes: &[u8]) -> Result<ImageRegion, String> {
    let marker = b"ENDHDR\n";
    let header_end = bytes
        .windows(marker.len())
        .position(|w| w == marker)
        .ok_or("missing ENDHDR")?;
    let header = String::from_utf8_lossy(&bytes[..header_end]);

    let (mut width, mut height, mut depth, mut maxval) = (None, None, None, None);
    for line in header.lines().skip(1) {
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("WIDTH"), Some(v)) => width = Some(parse_dim(v, "width")?),
            (Some("HEIGHT"), Some(v)) => height = Some(parse_dim(v, "height")?),
            (Some("DEPTH"), Some(v)) => depth = Some(parse_dim(v, "depth")? as usize),
            (Some("MAXVAL"), Some(v)) => maxval = Some(parse_dim(v, "maxval")?),
            _ => {}
        }
    }

    let (width, height, depth) = match (width, height, depth) {
        (Some(w), Some(h), Some(d)) if (1..=4).contains(&d) => (w, h, d),
        _ => return Err("incomplete PAM header".to_string()),
    };
    if maxval.unwrap_or(255) != 255 {
        return Err("unsupported maxval".to_string());
    }
    expand_to_rgba(&bytes[header_end + marker.len()..], depth, width, height)
}

pub fn decode_netpbm(bytes: &[u8]) -> Result<ImageRegion, String> {
    match bytes.get(..2) {
        Some(b"P7") => decode_pam(bytes),
        Some(b"P6") => decode_ppm(bytes),
        _ => Err("not a P6/P7 netpbm image".to_string()),
    }
}

/// Writes a region as an `RGB_ALPHA` PAM file.
pub fn encode_pam(image: &ImageRegion) -> Vec<u8> {
    let mut out = format!(
        "P7\nWIDTH {}\nHEIGHT {}\nDEPTH 4\nMAXVAL 255\nTUPLTYPE RGB_ALPHA\nENDHDR\n",
        image.width, image.height
    )
    .into_bytes();
    out.extend_from_slice(&image.rgba);
    out
}
