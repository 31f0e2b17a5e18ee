//! Raw per-pixel aggregates over a square RGB or RGBA buffer
//!
//! Everything here is a pure function of the pixel bytes. The descriptor
//! builder composes these aggregates; nothing in this module classifies or
//! rounds.

use crate::io::configuration::MAX_HISTOGRAM_BINS;
use crate::io::error::{Result, malformed_input};
use serde::{Deserialize, Serialize};

/// Normalized 5×5 Gaussian kernel numerators (sum 273)
pub const GAUSSIAN_KERNEL: [[u32; 5]; 5] = [
    [1, 4, 7, 4, 1],
    [4, 16, 26, 16, 4],
    [7, 26, 41, 26, 7],
    [4, 16, 26, 16, 4],
    [1, 4, 7, 4, 1],
];

/// Denominator of [`GAUSSIAN_KERNEL`]
pub const GAUSSIAN_KERNEL_SUM: f64 = 273.0;

/// Kernel radius around the center tap
const KERNEL_RADIUS: usize = 2;

/// Bits dropped from each channel to form a histogram bucket
const BUCKET_SHIFT: u8 = 5;

/// Borrowed view of a validated `side × side` pixel buffer
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    side: usize,
    channels: usize,
}

/// Per-channel sums accumulated in one linear scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSums {
    /// Sum of the red, green and blue samples
    pub rgb: [u64; 3],
    /// Sum of per-pixel `(r + g + b) / 3`
    pub intensity: f64,
    /// Number of pixels scanned
    pub count: usize,
}

/// One coarse color bucket and the number of pixels that fell into it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// High three bits of each channel (`channel >> 5`), each in `0..8`
    pub bucket: [u8; 3],
    /// Pixels in this bucket
    pub count: u32,
}

/// Summed absolute intensity differences between neighbouring pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborContrast {
    /// Σ |intensity(x, y) − intensity(x + 1, y)|
    pub horizontal: f64,
    /// Σ |intensity(x, y) − intensity(x, y + 1)|
    pub vertical: f64,
}

impl NeighborContrast {
    /// Horizontal plus vertical contrast
    pub fn total(&self) -> f64 {
        self.horizontal + self.vertical
    }
}

impl<'a> PixelBuffer<'a> {
    /// Wrap a buffer with an explicit channel count (3 = RGB, 4 = RGBA)
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` if `side` is zero, `channels` is not 3 or 4,
    /// or the buffer length is not `side * side * channels`
    pub fn new(data: &'a [u8], side: usize, channels: usize) -> Result<Self> {
        if side == 0 {
            return Err(malformed_input(side, data.len(), &"side must be positive"));
        }
        if channels != 3 && channels != 4 {
            return Err(malformed_input(
                side,
                data.len(),
                &format!("unsupported channel count {channels}"),
            ));
        }
        let expected = side
            .checked_mul(side)
            .and_then(|area| area.checked_mul(channels))
            .ok_or_else(|| malformed_input(side, data.len(), &"side is too large"))?;
        if data.len() != expected {
            return Err(malformed_input(
                side,
                data.len(),
                &format!("expected {expected} bytes for {channels} channels"),
            ));
        }
        Ok(Self {
            data,
            side,
            channels,
        })
    }

    /// Wrap a buffer, inferring RGB or RGBA from its length
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` if the length matches neither layout
    pub fn infer(data: &'a [u8], side: usize) -> Result<Self> {
        let area = side.saturating_mul(side);
        let channels = if area > 0 && data.len() % area == 0 {
            data.len() / area
        } else {
            0
        };
        Self::new(data, side, channels)
    }

    /// Side length in pixels
    pub const fn side(&self) -> usize {
        self.side
    }

    /// Bytes per pixel
    pub const fn channels(&self) -> usize {
        self.channels
    }

    /// Iterate RGB triples in row-major order, dropping alpha
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + 'a {
        self.data.chunks_exact(self.channels).map(rgb_of)
    }

    /// RGB triple at `(x, y)`, black when out of range
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        if x >= self.side || y >= self.side {
            return [0, 0, 0];
        }
        let start = (y * self.side + x) * self.channels;
        self.data
            .get(start..start + self.channels)
            .map_or([0, 0, 0], rgb_of)
    }

    /// Average of the three channels at `(x, y)`
    pub fn intensity(&self, x: usize, y: usize) -> f64 {
        intensity_of(self.rgb(x, y))
    }

    /// Channel and intensity sums over every pixel
    pub fn channel_sums(&self) -> ChannelSums {
        let mut sums = ChannelSums {
            rgb: [0; 3],
            intensity: 0.0,
            count: 0,
        };
        for pixel in self.pixels() {
            for (sum, &value) in sums.rgb.iter_mut().zip(pixel.iter()) {
                *sum += u64::from(value);
            }
            sums.intensity += intensity_of(pixel);
            sums.count += 1;
        }
        sums
    }

    /// Coarse 8×8×8 color histogram in first-encountered bucket order
    ///
    /// Only the first [`MAX_HISTOGRAM_BINS`] distinct buckets are kept. This is
    /// insertion-order truncation, not the most frequent buckets.
    pub fn histogram(&self) -> Vec<HistogramBin> {
        let mut slot_of_bucket: [Option<usize>; 512] = [None; 512];
        let mut bins: Vec<HistogramBin> = Vec::new();

        for pixel in self.pixels() {
            let bucket = pixel.map(|channel| channel >> BUCKET_SHIFT);
            let key = (usize::from(bucket[0]) << 6)
                | (usize::from(bucket[1]) << 3)
                | usize::from(bucket[2]);
            let Some(slot) = slot_of_bucket.get_mut(key) else {
                continue;
            };
            match *slot {
                Some(index) => {
                    if let Some(bin) = bins.get_mut(index) {
                        bin.count += 1;
                    }
                }
                None => {
                    *slot = Some(bins.len());
                    bins.push(HistogramBin { bucket, count: 1 });
                }
            }
        }

        bins.truncate(MAX_HISTOGRAM_BINS);
        bins
    }

    /// Convolve with [`GAUSSIAN_KERNEL`] using replicate-edge boundaries
    ///
    /// Returns one RGB triple of unrounded floats per pixel, row-major.
    pub fn gaussian_blur(&self) -> Vec<[f64; 3]> {
        let last = self.side - 1;
        let mut blurred = Vec::with_capacity(self.side * self.side);

        for y in 0..self.side {
            for x in 0..self.side {
                let mut acc = [0.0_f64; 3];
                for (ky, kernel_row) in GAUSSIAN_KERNEL.iter().enumerate() {
                    let sy = (y + ky).saturating_sub(KERNEL_RADIUS).min(last);
                    for (kx, &weight) in kernel_row.iter().enumerate() {
                        let sx = (x + kx).saturating_sub(KERNEL_RADIUS).min(last);
                        let sample = self.rgb(sx, sy);
                        for (channel, &value) in acc.iter_mut().zip(sample.iter()) {
                            *channel += f64::from(weight) * f64::from(value);
                        }
                    }
                }
                blurred.push(acc.map(|sum| sum / GAUSSIAN_KERNEL_SUM));
            }
        }

        blurred
    }

    /// Per-channel mean of the Gaussian-blurred buffer
    pub fn blurred_mean(&self) -> [f64; 3] {
        let blurred = self.gaussian_blur();
        let mut sums = [0.0_f64; 3];
        for pixel in &blurred {
            for (sum, &value) in sums.iter_mut().zip(pixel.iter()) {
                *sum += value;
            }
        }
        let count = blurred.len().max(1) as f64;
        sums.map(|sum| sum / count)
    }

    /// Neighbor contrast over interior pixels (`x < side - 1`, `y < side - 1`)
    pub fn neighbor_contrast(&self) -> NeighborContrast {
        let mut contrast = NeighborContrast {
            horizontal: 0.0,
            vertical: 0.0,
        };
        for y in 0..self.side - 1 {
            for x in 0..self.side - 1 {
                let current = self.intensity(x, y);
                contrast.horizontal += (current - self.intensity(x + 1, y)).abs();
                contrast.vertical += (current - self.intensity(x, y + 1)).abs();
            }
        }
        contrast
    }

    /// RGB triples along row `y`, left to right
    pub fn row(&self, y: usize) -> Vec<[u8; 3]> {
        (0..self.side).map(|x| self.rgb(x, y)).collect()
    }

    /// RGB triples along column `x`, top to bottom
    pub fn column(&self, x: usize) -> Vec<[u8; 3]> {
        (0..self.side).map(|y| self.rgb(x, y)).collect()
    }
}

fn rgb_of(chunk: &[u8]) -> [u8; 3] {
    match chunk {
        [r, g, b, ..] => [*r, *g, *b],
        _ => [0, 0, 0],
    }
}

fn intensity_of(pixel: [u8; 3]) -> f64 {
    (f64::from(pixel[0]) + f64::from(pixel[1]) + f64::from(pixel[2])) / 3.0
}
