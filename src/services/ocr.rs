use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::Env;
use crate::error::{HarvestError, HarvestResult};
use crate::services::chart_reader::{ImageRegion, TextRecognizer};

/// Runs the `tesseract` binary on a single line of text.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: String,
    language: String,
}

impl TesseractRecognizer {
    pub fn new(binary: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
        }
    }

    pub fn from_env(env: &Env) -> Self {
        Self::new(env.tesseract_bin.clone(), env.ocr_language.clone())
    }
}

/// Binary PPM of the region flattened onto black, which is how the chart
/// draws its axis behind the transparent canvas.
pub fn encode_ppm(image: &ImageRegion) -> Vec<u8> {
    let mut out = format!("P6\n{} {}\n255\n", image.width, image.height).into_bytes();
    out.reserve(image.width as usize * image.height as usize * 3);
    for px in image.rgba.chunks_exact(4) {
        let alpha = px[3] as u16;
        for channel in &px[..3] {
            out.push(((*channel as u16 * alpha) / 255) as u8);
        }
    }
    out
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(&self, image: &ImageRegion) -> HarvestResult<String> {
        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", &self.language, "--psm", "7"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| HarvestError::Ocr(format!("cannot start {}: {}", self.binary, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&encode_ppm(image))
                .await
                .map_err(|e| HarvestError::Ocr(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| HarvestError::Ocr(e.to_string()))?;
        if !output.status.success() {
            return Err(HarvestError::Ocr(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ppm_premultiplies_alpha() {
        let image = ImageRegion::new(2, 1, vec![255, 255, 255, 255, 200, 100, 50, 0]).unwrap();
        let ppm = encode_ppm(&image);
        let header = b"P6\n2 1\n255\n";
        assert_eq!(&ppm[..header.len()], header);
        assert_eq!(&ppm[header.len()..], &[255, 255, 255, 0, 0, 0]);
    }
}
