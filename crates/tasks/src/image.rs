//! Image brightness tasks.

use ::image::{DynamicImage, Pixel};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use taskwork_core::{task_name, FactoryError, PayloadError, Task, TaskFactory, TaskPayload};
use tracing::debug;

/// Brightness factor applied when none is configured.
pub const DEFAULT_BRIGHTNESS: f32 = 0.5;

/// File name suffixes picked up when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".jpg"];

fn scale(value: u8, factor: f32) -> u8 {
    (value as f32 * factor).round().clamp(0.0, 255.0) as u8
}

/// Reads an image, scales its brightness and writes the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustBrightness {
    name: String,
    source: PathBuf,
    destination: PathBuf,
    factor: f32,
}

impl AdjustBrightness {
    /// Payload kind.
    pub const KIND: &'static str = "brightness";

    /// Create a task.
    pub fn new(
        name: impl Into<String>,
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        factor: f32,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            destination: destination.into(),
            factor,
        }
    }

    /// Image read.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Image written.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Brightness factor.
    pub fn factor(&self) -> f32 {
        self.factor
    }
}

impl Task for AdjustBrightness {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self) -> anyhow::Result<()> {
        let input = ::image::open(&self.source)
            .with_context(|| format!("reading {}", self.source.display()))?;

        // Alpha is left untouched.
        let output = if input.color().has_alpha() {
            let mut pixels = input.to_rgba8();
            for pixel in pixels.pixels_mut() {
                pixel.apply_without_alpha(|v| scale(v, self.factor));
            }
            DynamicImage::ImageRgba8(pixels)
        } else {
            let mut pixels = input.to_rgb8();
            for pixel in pixels.pixels_mut() {
                pixel.apply(|v| scale(v, self.factor));
            }
            DynamicImage::ImageRgb8(pixels)
        };

        if let Some(parent) = self.destination.parent() {
            std::fs::create_dir_all(parent)?;
        }
        output
            .save(&self.destination)
            .with_context(|| format!("writing {}", self.destination.display()))?;

        debug!("{}: wrote {}", self.name, self.destination.display());
        Ok(())
    }

    fn payload(&self) -> Result<TaskPayload, PayloadError> {
        TaskPayload::new(Self::KIND, self)
    }
}

/// One [`AdjustBrightness`] per image file in a directory.
///
/// Only regular files directly inside the source directory whose name ends
/// with an allowed extension are picked up. Files are taken in name order.
#[derive(Debug, Clone)]
pub struct ImageTaskFactory {
    source_dir: PathBuf,
    destination_dir: PathBuf,
    extensions: Vec<String>,
    brightness: f32,
}

impl ImageTaskFactory {
    /// Create a factory.
    pub fn new<I, S>(
        source_dir: impl Into<PathBuf>,
        destination_dir: impl Into<PathBuf>,
        extensions: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source_dir: source_dir.into(),
            destination_dir: destination_dir.into(),
            extensions: extensions.into_iter().map(Into::into).collect(),
            brightness: DEFAULT_BRIGHTNESS,
        }
    }

    /// Set the brightness factor.
    pub fn with_brightness(mut self, factor: f32) -> Self {
        self.brightness = factor;
        self
    }

    fn is_allowed(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }

    fn io_error(&self, source: std::io::Error) -> FactoryError {
        FactoryError::Io {
            path: self.source_dir.clone(),
            source,
        }
    }
}

impl TaskFactory for ImageTaskFactory {
    type Task = AdjustBrightness;

    fn create_tasks(&self, name_prefix: &str) -> Result<Vec<AdjustBrightness>, FactoryError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.source_dir).map_err(|e| self.io_error(e))? {
            let entry = entry.map_err(|e| self.io_error(e))?;
            let path = entry.path();

            // Non UTF-8 names cannot match a configured extension.
            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if self.is_allowed(&file_name) && path.is_file() {
                files.push(file_name);
            }
        }
        files.sort();

        debug!(
            "Found {} images in {}",
            files.len(),
            self.source_dir.display()
        );

        Ok(files
            .into_iter()
            .enumerate()
            .map(|(i, file_name)| {
                AdjustBrightness::new(
                    task_name(name_prefix, i),
                    self.source_dir.join(&file_name),
                    self.destination_dir.join(&file_name),
                    self.brightness,
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_factory_filters_by_extension() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        touch(src.path(), "b.jpg");
        touch(src.path(), "c.png");
        touch(src.path(), "a.jpg");

        let tasks = ImageTaskFactory::new(src.path(), dst.path(), [".jpg"])
            .create_tasks("Task")
            .unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].name(), "Task-1");
        assert_eq!(tasks[0].source(), src.path().join("a.jpg"));
        assert_eq!(tasks[0].destination(), dst.path().join("a.jpg"));
        assert_eq!(tasks[1].name(), "Task-2");
        assert_eq!(tasks[1].source(), src.path().join("b.jpg"));
        assert_eq!(tasks[1].destination(), dst.path().join("b.jpg"));
        assert_eq!(tasks[1].factor(), DEFAULT_BRIGHTNESS);
    }

    #[test]
    fn test_factory_skips_directories() {
        let src = tempfile::tempdir().unwrap();
        std::fs::create_dir(src.path().join("nested.jpg")).unwrap();
        touch(src.path(), "photo.jpg");

        let tasks = ImageTaskFactory::new(src.path(), "out", [".jpg"])
            .create_tasks("Task")
            .unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].source(), src.path().join("photo.jpg"));
    }

    #[test]
    fn test_empty_directory_yields_no_tasks() {
        let src = tempfile::tempdir().unwrap();
        touch(src.path(), "notes.txt");

        let tasks = ImageTaskFactory::new(src.path(), "out", [".jpg", ".png"])
            .create_tasks("Task")
            .unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let src = tempfile::tempdir().unwrap();
        let missing = src.path().join("missing");

        let result = ImageTaskFactory::new(&missing, "out", [".jpg"]).create_tasks("Task");
        match result {
            Err(FactoryError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_run_writes_darkened_image() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        ::image::RgbImage::from_pixel(1, 1, ::image::Rgb([200, 100, 50]))
            .save(src.path().join("px.png"))
            .unwrap();

        let task = AdjustBrightness::new(
            "Task-1",
            src.path().join("px.png"),
            dst.path().join("out").join("px.png"),
            0.5,
        );
        task.run().unwrap();

        let output = ::image::open(dst.path().join("out/px.png")).unwrap().to_rgb8();
        assert_eq!(output.get_pixel(0, 0).0, [100, 50, 25]);
    }

    #[test]
    fn test_run_keeps_alpha() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        ::image::RgbaImage::from_pixel(1, 1, ::image::Rgba([200, 100, 50, 128]))
            .save(src.path().join("px.png"))
            .unwrap();

        AdjustBrightness::new("Task-1", src.path().join("px.png"), dst.path().join("px.png"), 0.5)
            .run()
            .unwrap();

        let output = ::image::open(dst.path().join("px.png")).unwrap().to_rgba8();
        assert_eq!(output.get_pixel(0, 0).0, [100, 50, 25, 128]);
    }

    #[test]
    fn test_run_handles_jpeg() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        ::image::RgbImage::from_pixel(4, 3, ::image::Rgb([200, 200, 200]))
            .save(src.path().join("photo.jpg"))
            .unwrap();

        let tasks = ImageTaskFactory::new(src.path(), dst.path(), DEFAULT_EXTENSIONS.iter().copied())
            .create_tasks("Task")
            .unwrap();
        assert_eq!(tasks.len(), 1);
        tasks[0].run().unwrap();

        let output = ::image::open(dst.path().join("photo.jpg")).unwrap().to_rgb8();
        assert_eq!(output.dimensions(), (4, 3));
        // Lossy, so only roughly halved.
        let value = output.get_pixel(0, 0).0[0];
        assert!((90..=110).contains(&value), "unexpected value {}", value);
    }

    #[test]
    fn test_run_fails_on_undecodable_source() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        touch(src.path(), "empty.jpg");

        let task = AdjustBrightness::new("Task-1", src.path().join("empty.jpg"), dst.path().join("empty.jpg"), 0.5);
        assert!(task.run().is_err());
        assert!(!dst.path().join("empty.jpg").exists());
    }

    #[test]
    fn test_run_fails_on_unreadable_source() {
        let dst = tempfile::tempdir().unwrap();
        let task = AdjustBrightness::new("Task-1", "/nonexistent/a.jpg", dst.path().join("a.jpg"), 0.5);
        assert!(task.run().is_err());
    }
}
