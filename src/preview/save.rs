use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use rfd::FileDialog;
use std::path::{Path, PathBuf};

/// Asks for a destination. `None` when the user cancels.
pub fn prompt_save_path(default_extension: &str) -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Save image")
        .set_file_name(format!("capture.{default_extension}"))
        .add_filter("PNG", &["png"])
        .add_filter("JPEG", &["jpg", "jpeg"])
        .add_filter("All Files", &["*"])
        .save_file()
        .map(|path| with_default_extension(path, default_extension))
}

fn with_default_extension(path: PathBuf, default_extension: &str) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(default_extension)
    }
}

/// Writes the image at its stored resolution, format taken from the extension.
pub fn save_image(image: &RgbaImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .with_context(|| format!("Unknown image format for {}", path.display()))?;

    // JPEG has no alpha channel.
    let result = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(image.clone())
            .to_rgb8()
            .save_with_format(path, format),
        _ => image.save_with_format(path, format),
    };
    result.with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::annotation::{Annotator, Pen};
    use crate::preview::view::ViewState;
    use eframe::egui::pos2;
    use image::Rgba;

    #[test]
    fn saves_annotated_image_at_capture_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let pen = Pen {
            color: Rgba([255, 0, 0, 255]),
            width: 2.0,
        };
        let mut annotator = Annotator::new(RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255])), pen);
        let mut view = ViewState::default();

        annotator.begin_stroke(pos2(10.0, 50.0), &view);
        annotator.continue_stroke(pos2(90.0, 50.0), &view);
        annotator.end_stroke();
        view.set_zoom(2.0);

        save_image(annotator.image(), &path).unwrap();

        let saved = image::open(&path).unwrap().to_rgba8();
        assert_eq!(saved.dimensions(), (100, 100));
        assert_eq!(*saved.get_pixel(50, 50), Rgba([255, 0, 0, 255]));
        assert_eq!(*saved.get_pixel(50, 10), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn jpeg_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let image = RgbaImage::from_pixel(8, 8, Rgba([10, 200, 30, 128]));
        save_image(&image, &path).unwrap();
        assert_eq!(image::open(&path).unwrap().color(), image::ColorType::Rgb8);
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = save_image(&RgbaImage::new(2, 2), &dir.path().join("out.xyz"));
        assert!(result.is_err());
    }

    #[test]
    fn missing_extension_gets_default() {
        let path = with_default_extension(PathBuf::from("/tmp/shot"), "png");
        assert_eq!(path, PathBuf::from("/tmp/shot.png"));
        let kept = with_default_extension(PathBuf::from("/tmp/shot.jpg"), "png");
        assert_eq!(kept, PathBuf::from("/tmp/shot.jpg"));
    }
}
