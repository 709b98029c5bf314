use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat};
use tokio::fs;
use tokio::fs::try_exists;

/// Creates the parent directory of `path` if it is missing.
pub async fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) else {
        return Ok(());
    };

    if !try_exists(parent)
        .await
        .with_context(|| format!("Failed to check directory '{}'", parent.display()))?
    {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Unable to create directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Picks the encoding for `path` from its extension, falling back to PNG.
pub fn output_format_for(path: &Path) -> ImageFormat {
    mime_guess::from_path(path)
        .first_raw()
        .and_then(ImageFormat::from_mime_type)
        .filter(|format| format.writing_enabled())
        .unwrap_or(ImageFormat::Png)
}

/// Writes `img` to `path`, overwriting any existing file.
pub async fn save_image(img: &DynamicImage, path: &Path) -> Result<PathBuf> {
    ensure_parent_dir(path).await?;

    let format = output_format_for(path);
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format)
        .with_context(|| format!("Unable to encode image as {format:?}"))?;

    fs::write(path, &bytes)
        .await
        .with_context(|| format!("Unable to persist generated image to '{}'", path.display()))?;

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid(color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(6, 6, Rgb(color)))
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(output_format_for(Path::new("a/b.png")), ImageFormat::Png);
        assert_eq!(output_format_for(Path::new("a/b.jpg")), ImageFormat::Jpeg);
        assert_eq!(output_format_for(Path::new("a/b")), ImageFormat::Png);
        assert_eq!(output_format_for(Path::new("a/b.unknown")), ImageFormat::Png);
    }

    #[tokio::test]
    async fn save_creates_missing_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/deeper/out.png");

        let saved = save_image(&solid([1, 2, 3]), &path).await.unwrap();

        assert_eq!(saved, path);
        let reloaded = image::open(&path).unwrap();
        assert_eq!(reloaded.to_rgb8().get_pixel(0, 0), &Rgb([1, 2, 3]));
    }

    #[tokio::test]
    async fn save_overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.png");

        save_image(&solid([255, 0, 0]), &path).await.unwrap();
        save_image(&solid([0, 0, 255]), &path).await.unwrap();

        let reloaded = image::open(&path).unwrap();
        assert_eq!(reloaded.to_rgb8().get_pixel(3, 3), &Rgb([0, 0, 255]));
    }

    #[tokio::test]
    async fn bare_file_name_needs_no_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("flat.png");
        ensure_parent_dir(Path::new("flat.png")).await.unwrap();
        save_image(&solid([9, 9, 9]), &path).await.unwrap();
        assert!(path.exists());
    }
}
