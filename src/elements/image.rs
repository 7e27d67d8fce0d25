use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::error::{ReportError, Result};
use crate::layout::{MeasureContext, Size};
use crate::media::{MediaFile, MediaStore};

use super::{Align, Drawable, LineBreak};

/// Points per pixel when an image is shown at its natural size (96 DPI).
const POINTS_PER_PIXEL: f64 = 0.75;

/// Size used for both sides when neither the element nor the file says.
const FALLBACK_IMAGE_SIZE: f64 = 72.0;

/// Where the bytes of an image come from. Resolved at render time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// A file on the local filesystem.
    FilePath(PathBuf),
    /// A file attached to a media object, loaded through a [`MediaStore`].
    MediaReference(MediaFile),
}

impl ImageSource {
    /// Loads the raw bytes of the image.
    pub fn load(&self, store: &dyn MediaStore) -> Result<Vec<u8>> {
        match self {
            ImageSource::FilePath(path) => {
                fs::read(path).map_err(|err| ReportError::missing_image(self.to_string(), err))
            }
            ImageSource::MediaReference(media) => store.load(media),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::FilePath(path) => write!(f, "{}", path.display()),
            ImageSource::MediaReference(media) => {
                write!(f, "{} ({})", media.xref(), media.filename().display())
            }
        }
    }
}

/// A loaded and decoded image.
#[derive(Clone)]
pub struct LoadedImage {
    bytes: Vec<u8>,
    format: Option<ImageFormat>,
    decoded: DynamicImage,
}

impl LoadedImage {
    /// Decodes `bytes`, failing with [`ReportError::MissingImageSource`].
    pub fn decode(source: &ImageSource, bytes: Vec<u8>) -> Result<Self> {
        let format = image::guess_format(&bytes).ok();
        let decoded = image::load_from_memory(&bytes)
            .map_err(|err| ReportError::missing_image(source.to_string(), err))?;
        Ok(Self {
            bytes,
            format,
            decoded,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn decoded(&self) -> &DynamicImage {
        &self.decoded
    }

    /// Pixel dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        self.decoded.dimensions()
    }

    /// MIME type derived from the sniffed format.
    pub fn mime_type(&self) -> &'static str {
        match self.format {
            Some(ImageFormat::Png) => "image/png",
            Some(ImageFormat::Jpeg) => "image/jpeg",
            Some(ImageFormat::Gif) => "image/gif",
            Some(ImageFormat::Bmp) => "image/bmp",
            Some(ImageFormat::WebP) => "image/webp",
            Some(ImageFormat::Tiff) => "image/tiff",
            _ => "application/octet-stream",
        }
    }
}

impl fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedImage")
            .field("bytes", &self.bytes.len())
            .field("format", &self.format)
            .field("dimensions", &self.dimensions())
            .finish()
    }
}

/// Every image of a report, loaded once before layout.
#[derive(Debug, Default)]
pub struct ImageCache {
    images: HashMap<ImageSource, LoadedImage>,
}

impl ImageCache {
    /// Loads and decodes each distinct source. The first failure aborts.
    pub fn load<'a, I>(sources: I, store: &dyn MediaStore) -> Result<Self>
    where
        I: IntoIterator<Item = &'a ImageSource>,
    {
        let mut cache = ImageCache::default();
        for source in sources {
            if cache.images.contains_key(source) {
                continue;
            }
            let bytes = source.load(store)?;
            let image = LoadedImage::decode(source, bytes)?;
            log::debug!("loaded image {source}: {image:?}");
            cache.images.insert(source.clone(), image);
        }
        Ok(cache)
    }

    pub fn get(&self, source: &ImageSource) -> Option<&LoadedImage> {
        self.images.get(source)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// An image placed by coordinates, by alignment or at the cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    source: ImageSource,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: f64,
    pub height: f64,
    /// `None` positions the image at `x` or the cursor.
    pub align: Option<Align>,
    pub line_break: LineBreak,
}

impl Image {
    pub fn new(source: ImageSource) -> Self {
        Self {
            source,
            x: None,
            y: None,
            width: 0.0,
            height: 0.0,
            align: None,
            line_break: LineBreak::NextLine,
        }
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn with_position(mut self, x: Option<f64>, y: Option<f64>) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Sets the display size; zero sides are derived from the aspect ratio.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_align(mut self, align: Option<Align>) -> Self {
        self.align = align;
        self
    }

    pub fn with_line_break(mut self, line_break: LineBreak) -> Self {
        self.line_break = line_break;
        self
    }

    /// Display size in points.
    pub fn display_size(&self, images: Option<&ImageCache>) -> Size {
        let natural = images
            .and_then(|cache| cache.get(&self.source))
            .map(|image| image.dimensions())
            .filter(|(w, h)| *w > 0 && *h > 0)
            .map(|(w, h)| (f64::from(w), f64::from(h)));

        match (self.width > 0.0, self.height > 0.0, natural) {
            (true, true, _) => Size::new(self.width, self.height),
            (true, false, Some((w, h))) => Size::new(self.width, self.width * h / w),
            (false, true, Some((w, h))) => Size::new(self.height * w / h, self.height),
            (false, false, Some((w, h))) => {
                Size::new(w * POINTS_PER_PIXEL, h * POINTS_PER_PIXEL)
            }
            (true, false, None) => Size::new(self.width, self.width),
            (false, true, None) => Size::new(self.height, self.height),
            (false, false, None) => Size::new(FALLBACK_IMAGE_SIZE, FALLBACK_IMAGE_SIZE),
        }
    }
}

impl Drawable for Image {
    fn footprint(&self, cx: &MeasureContext<'_>, _available_width: f64) -> Size {
        self.display_size(cx.images())
    }

    fn line_break(&self) -> LineBreak {
        self.line_break
    }
}
