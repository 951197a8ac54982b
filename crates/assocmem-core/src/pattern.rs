//! Bipolar patterns and the image encoder that produces them

use crate::random::RandomSource;
use crate::{AssocMemError, Result};
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Pixel level that encodes as `+1` unless configured otherwise.
pub const DEFAULT_FOREGROUND_LEVEL: u8 = 255;

/// A fixed-length vector whose components are exactly `+1` or `-1`
///
/// Used for the target pattern, the interference patterns and every network
/// state of a recall run. Values are never mutated in place; operations such
/// as [`BipolarVector::flipped`] return a new vector.
///
/// # Example
///
/// ```rust
/// use assocmem_core::BipolarVector;
///
/// let v = BipolarVector::new(vec![1, -1, 1]).unwrap();
/// assert_eq!(v.dot(&v.negated()), -3);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i8>", into = "Vec<i8>")]
pub struct BipolarVector(Vec<i8>);

impl BipolarVector {
    /// Wrap raw values, rejecting anything other than `+1` and `-1`
    pub fn new(values: Vec<i8>) -> Result<Self> {
        if let Some((idx, value)) = values
            .iter()
            .enumerate()
            .find(|(_, &v)| v != 1 && v != -1)
        {
            return Err(AssocMemError::InvalidParameter(format!(
                "bipolar component {} is {}, expected +1 or -1",
                idx, value
            )));
        }
        Ok(Self(values))
    }

    /// Threshold real-valued fields: `x >= 0` maps to `+1`, everything else
    /// (including NaN) to `-1`
    pub fn from_fields(fields: &[f64]) -> Self {
        Self(
            fields
                .iter()
                .map(|&h| if h >= 0.0 { 1 } else { -1 })
                .collect(),
        )
    }

    /// All components `+1`
    pub fn ones(len: usize) -> Self {
        Self(vec![1; len])
    }

    /// Draw `len` independent, uniformly distributed components
    pub fn random<S: RandomSource + ?Sized>(len: usize, source: &mut S) -> Self {
        Self((0..len).map(|_| source.spin()).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = i8> + '_ {
        self.0.iter().copied()
    }

    pub fn get(&self, index: usize) -> Option<i8> {
        self.0.get(index).copied()
    }

    /// Component-wise sign inversion
    pub fn negated(&self) -> Self {
        Self(self.0.iter().map(|&v| -v).collect())
    }

    /// Copy with the sign of every listed index inverted
    ///
    /// Indices are expected to be distinct and in range; an index listed
    /// twice is flipped twice.
    pub fn flipped(&self, indices: &[usize]) -> Self {
        let mut values = self.0.clone();
        for &idx in indices {
            values[idx] = -values[idx];
        }
        Self(values)
    }

    /// Integer dot product
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    pub fn dot(&self, other: &Self) -> i64 {
        assert_eq!(self.len(), other.len(), "bipolar length mismatch");
        self.0
            .iter()
            .zip(&other.0)
            .map(|(&a, &b)| i64::from(a) * i64::from(b))
            .sum()
    }

    /// Number of positions where the two vectors differ
    pub fn hamming_distance(&self, other: &Self) -> usize {
        self.0.iter().zip(&other.0).filter(|(a, b)| a != b).count()
    }
}

impl fmt::Debug for BipolarVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 32;
        write!(f, "BipolarVector[{}](", self.len())?;
        for &v in self.0.iter().take(PREVIEW) {
            f.write_str(if v > 0 { "+" } else { "-" })?;
        }
        if self.len() > PREVIEW {
            f.write_str("...")?;
        }
        f.write_str(")")
    }
}

impl TryFrom<Vec<i8>> for BipolarVector {
    type Error = AssocMemError;

    fn try_from(values: Vec<i8>) -> Result<Self> {
        Self::new(values)
    }
}

impl From<BipolarVector> for Vec<i8> {
    fn from(vector: BipolarVector) -> Self {
        vector.0
    }
}

/// Two-dimensional layout of a pattern, row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternShape {
    pub width: usize,
    pub height: usize,
}

impl PatternShape {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of units, `width * height`
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Output of the encoder: the target pattern plus the shape needed to turn
/// network states back into images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPattern {
    pub pattern: BipolarVector,
    pub shape: PatternShape,
}

impl EncodedPattern {
    pub fn width(&self) -> usize {
        self.shape.width
    }

    pub fn height(&self) -> usize {
        self.shape.height
    }

    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    pub fn into_pattern(self) -> BipolarVector {
        self.pattern
    }
}

/// Converts grayscale images into bipolar target patterns
///
/// A pixel equal to the foreground level (255 by default) becomes `+1`,
/// every other pixel becomes `-1`. Pixels are read row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternEncoder {
    foreground: u8,
}

impl Default for PatternEncoder {
    fn default() -> Self {
        Self {
            foreground: DEFAULT_FOREGROUND_LEVEL,
        }
    }
}

impl PatternEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_foreground(mut self, level: u8) -> Self {
        self.foreground = level;
        self
    }

    pub fn foreground(&self) -> u8 {
        self.foreground
    }

    /// Encode raw row-major 8-bit luma samples
    ///
    /// # Errors
    ///
    /// `PatternSource` if the image is empty or the sample count does not
    /// match `width * height`.
    pub fn from_luma(&self, width: usize, height: usize, pixels: &[u8]) -> Result<EncodedPattern> {
        let shape = PatternShape::new(width, height);
        if shape.is_empty() {
            return Err(AssocMemError::PatternSource(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }
        if pixels.len() != shape.len() {
            return Err(AssocMemError::PatternSource(format!(
                "expected {} pixels for a {}x{} image, got {}",
                shape.len(),
                width,
                height,
                pixels.len()
            )));
        }

        let values = pixels
            .iter()
            .map(|&px| if px == self.foreground { 1 } else { -1 })
            .collect();

        Ok(EncodedPattern {
            pattern: BipolarVector(values),
            shape,
        })
    }

    /// Encode an in-memory grayscale image
    pub fn encode_image(&self, image: &GrayImage) -> Result<EncodedPattern> {
        let (width, height) = image.dimensions();
        self.from_luma(width as usize, height as usize, image.as_raw())
    }

    /// Load any image format supported by the `image` crate, convert it to
    /// 8-bit grayscale and encode it
    ///
    /// # Errors
    ///
    /// `PatternSource` when the file is missing, unreadable or not an image.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<EncodedPattern> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| AssocMemError::PatternSource(format!("{}: {}", path.display(), e)))?
            .to_luma8();

        let encoded = self.encode_image(&image)?;
        tracing::debug!(
            path = %path.display(),
            width = encoded.width(),
            height = encoded.height(),
            "encoded target pattern"
        );
        Ok(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededSource;

    #[test]
    fn test_new_rejects_non_bipolar() {
        assert!(BipolarVector::new(vec![1, -1, 1]).is_ok());

        let result = BipolarVector::new(vec![1, 0, -1]);
        assert!(matches!(result, Err(AssocMemError::InvalidParameter(_))));
    }

    #[test]
    fn test_from_fields_threshold() {
        let v = BipolarVector::from_fields(&[0.5, 0.0, -0.0, -1e-12, f64::NAN]);
        assert_eq!(v.as_slice(), &[1, 1, 1, -1, -1]);
    }

    #[test]
    fn test_negated_and_flipped() {
        let v = BipolarVector::new(vec![1, 1, -1, -1]).unwrap();
        assert_eq!(v.negated().as_slice(), &[-1, -1, 1, 1]);
        assert_eq!(v.flipped(&[0, 3]).as_slice(), &[-1, 1, -1, 1]);
        // Source is untouched
        assert_eq!(v.as_slice(), &[1, 1, -1, -1]);
    }

    #[test]
    fn test_dot_and_hamming() {
        let a = BipolarVector::new(vec![1, 1, 1, 1]).unwrap();
        let b = BipolarVector::new(vec![1, -1, 1, -1]).unwrap();
        assert_eq!(a.dot(&a), 4);
        assert_eq!(a.dot(&b), 0);
        assert_eq!(a.hamming_distance(&b), 2);
    }

    #[test]
    fn test_random_is_bipolar_and_seeded() {
        let a = BipolarVector::random(256, &mut SeededSource::new(3));
        let b = BipolarVector::random(256, &mut SeededSource::new(3));
        assert_eq!(a, b);
        assert!(a.iter().all(|v| v == 1 || v == -1));
        // Not degenerate
        assert!(a.iter().any(|v| v == 1) && a.iter().any(|v| v == -1));
    }

    #[test]
    fn test_serde_validates() {
        let v = BipolarVector::new(vec![1, -1]).unwrap();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "[1,-1]");
        assert_eq!(serde_json::from_str::<BipolarVector>(&json).unwrap(), v);
        assert!(serde_json::from_str::<BipolarVector>("[1,2]").is_err());
    }

    #[test]
    fn test_debug_preview() {
        let v = BipolarVector::new(vec![1, -1, 1]).unwrap();
        assert_eq!(format!("{:?}", v), "BipolarVector[3](+-+)");
    }

    #[test]
    fn test_encoder_from_luma() {
        let encoded = PatternEncoder::new()
            .from_luma(3, 2, &[255, 0, 254, 255, 255, 12])
            .unwrap();
        assert_eq!(encoded.width(), 3);
        assert_eq!(encoded.height(), 2);
        assert_eq!(encoded.pattern.as_slice(), &[1, -1, -1, 1, 1, -1]);
    }

    #[test]
    fn test_encoder_custom_foreground() {
        let encoded = PatternEncoder::new()
            .with_foreground(0)
            .from_luma(2, 1, &[0, 255])
            .unwrap();
        assert_eq!(encoded.pattern.as_slice(), &[1, -1]);
    }

    #[test]
    fn test_encoder_rejects_bad_shapes() {
        let encoder = PatternEncoder::new();
        assert!(matches!(
            encoder.from_luma(0, 4, &[]),
            Err(AssocMemError::PatternSource(_))
        ));
        assert!(matches!(
            encoder.from_luma(2, 2, &[255, 0, 255]),
            Err(AssocMemError::PatternSource(_))
        ));
    }

    #[test]
    fn test_encoder_image_roundtrip() {
        let image = GrayImage::from_raw(2, 2, vec![255, 0, 0, 255]).unwrap();
        let encoded = PatternEncoder::new().encode_image(&image).unwrap();
        assert_eq!(encoded.shape, PatternShape::new(2, 2));
        assert_eq!(encoded.pattern.as_slice(), &[1, -1, -1, 1]);
    }

    #[test]
    fn test_encoder_missing_file() {
        let result = PatternEncoder::new().open("/definitely/not/here.png");
        assert!(matches!(result, Err(AssocMemError::PatternSource(_))));
    }
}
