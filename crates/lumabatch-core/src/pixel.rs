//! In-memory raster shared by the codec and the transforms.

/// Sample layout of a pixel, derived from the channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// 1 channel: gray
    Gray,
    /// 2 channels: gray + alpha
    GrayAlpha,
    /// 3 channels: red, green, blue
    Rgb,
    /// 4 channels: red, green, blue, alpha
    Rgba,
}

impl PixelLayout {
    /// Map a channel count to its layout. Counts outside 1..=4 have none.
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(Self::Gray),
            2 => Some(Self::GrayAlpha),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }

    /// Number of samples per pixel.
    pub fn channels(self) -> u8 {
        match self {
            Self::Gray => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Expand one pixel's samples to `[r, g, b, a]`.
    ///
    /// `px` must hold exactly `self.channels()` samples.
    pub fn to_rgba(self, px: &[u8]) -> [u8; 4] {
        match self {
            Self::Gray => [px[0], px[0], px[0], 255],
            Self::GrayAlpha => [px[0], px[0], px[0], px[1]],
            Self::Rgb => [px[0], px[1], px[2], 255],
            Self::Rgba => [px[0], px[1], px[2], px[3]],
        }
    }
}

/// Tightly packed 8-bit raster.
///
/// A buffer is never mutated after construction; transforms produce a new one.
/// Construction does not validate, so a buffer may be invalid; check
/// [`PixelBuffer::is_valid`] before trusting the layout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    samples: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl PixelBuffer {
    /// Wrap raw samples. The result may be invalid.
    pub fn new(samples: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        Self {
            samples,
            width,
            height,
            channels,
        }
    }

    /// The empty, invalid buffer returned when a transform cannot run.
    pub fn invalid() -> Self {
        Self::default()
    }

    /// Check the buffer invariant: known layout, non-zero dimensions and
    /// `samples.len() == width * height * channels`.
    pub fn is_valid(&self) -> bool {
        self.layout().is_some()
            && self.width > 0
            && self.height > 0
            && self.expected_len() == Some(self.samples.len())
    }

    /// Layout for the channel count, if it is a supported one.
    pub fn layout(&self) -> Option<PixelLayout> {
        PixelLayout::from_channels(self.channels)
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Number of pixels (`width * height`).
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Iterate over pixels as `[r, g, b, a]`, normalized from any layout.
    ///
    /// Yields nothing for an invalid buffer.
    pub fn rgba_pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        let layout = self.layout().filter(|_| self.is_valid());
        let step = layout.map_or(1, |l| l.channels() as usize);
        self.samples
            .chunks_exact(step)
            .take(if layout.is_some() { self.pixel_count() } else { 0 })
            .map(move |px| match layout {
                Some(layout) => layout.to_rgba(px),
                None => [0; 4],
            })
    }

    fn expected_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.channels as usize)
    }
}
