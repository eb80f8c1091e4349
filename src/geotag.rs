//! Geolocation metadata embedding
//!
//! EXIF stores GPS coordinates as unsigned degrees/minutes/seconds rationals
//! with the hemisphere carried in a separate reference tag, so the magnitude
//! never carries a sign. Seconds keep two decimal digits through a x100
//! numerator over a 100 denominator.
//!
//! Embedding is a capability trait so the pipeline can be tested with a
//! recording fake; the real implementation writes GPS IFD tags with
//! little_exif, inserting into whatever metadata the image already carries.

use std::path::Path;

use crate::error::Result;

/// One EXIF rational: numerator over denominator
pub type Rational = (u32, u32);

/// Split a decimal coordinate into (degrees, minutes, seconds) rationals
///
/// The sign is dropped; hemisphere references carry it. Seconds are encoded
/// with two decimal digits of precision.
pub fn decimal_to_dms(value: f64) -> [Rational; 3] {
    let magnitude = value.abs();
    let degrees = magnitude.trunc();
    let minutes_full = (magnitude - degrees) * 60.0;
    let minutes = minutes_full.trunc();
    let seconds = (minutes_full - minutes) * 60.0;

    [
        (degrees as u32, 1),
        (minutes as u32, 1),
        ((seconds * 100.0).round() as u32, 100),
    ]
}

/// Hemisphere reference for a latitude
pub fn latitude_ref(latitude: f64) -> char {
    if latitude < 0.0 {
        'S'
    } else {
        'N'
    }
}

/// Hemisphere reference for a longitude
pub fn longitude_ref(longitude: f64) -> char {
    if longitude < 0.0 {
        'W'
    } else {
        'E'
    }
}

/// Capability to embed a geotag into an image file on disk
pub trait GeoTagWriter {
    fn embed(&self, image_path: &Path, latitude: f64, longitude: f64) -> Result<()>;
}

#[cfg(feature = "exif")]
pub use exif_impl::ExifGeoTagger;

#[cfg(feature = "exif")]
mod exif_impl {
    use std::path::Path;

    use little_exif::exif_tag::ExifTag;
    use little_exif::metadata::Metadata;
    use little_exif::rational::uR64;

    use super::{decimal_to_dms, latitude_ref, longitude_ref, GeoTagWriter, Rational};
    use crate::error::{FramerError, Result};

    /// Containers little_exif can write a GPS IFD into
    const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

    pub struct ExifGeoTagger;

    impl ExifGeoTagger {
        fn check_supported(image_path: &Path) -> Result<()> {
            let supported = image_path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if !supported {
                return Err(FramerError::UnsupportedImageFormat(format!(
                    "{:?} cannot carry EXIF GPS metadata",
                    image_path
                )));
            }
            Ok(())
        }
    }

    fn to_exif_rationals(dms: [Rational; 3]) -> Vec<uR64> {
        dms.iter()
            .map(|&(numerator, denominator)| uR64 {
                nominator: numerator,
                denominator,
            })
            .collect()
    }

    impl GeoTagWriter for ExifGeoTagger {
        /// Insert GPS tags into the image's metadata block, preserving any
        /// tags already present
        fn embed(&self, image_path: &Path, latitude: f64, longitude: f64) -> Result<()> {
            Self::check_supported(image_path)?;

            let mut metadata = Metadata::new_from_path(image_path)
                .map_err(|e| FramerError::Export(format!("read metadata: {}", e)))?;

            metadata.set_tag(ExifTag::GPSLatitudeRef(latitude_ref(latitude).to_string()));
            metadata.set_tag(ExifTag::GPSLatitude(to_exif_rationals(decimal_to_dms(
                latitude,
            ))));
            metadata.set_tag(ExifTag::GPSLongitudeRef(
                longitude_ref(longitude).to_string(),
            ));
            metadata.set_tag(ExifTag::GPSLongitude(to_exif_rationals(decimal_to_dms(
                longitude,
            ))));

            metadata
                .write_to_file(image_path)
                .map_err(|e| FramerError::Export(format!("write metadata: {}", e)))?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dms_whole_degrees() {
        assert_eq!(decimal_to_dms(47.0), [(47, 1), (0, 1), (0, 100)]);
    }

    #[test]
    fn test_dms_known_coordinate() {
        // 47.644548 = 47 deg 38 min 40.37 s
        let [d, m, s] = decimal_to_dms(47.644548);
        assert_eq!(d, (47, 1));
        assert_eq!(m, (38, 1));
        assert_eq!(s.1, 100);
        assert!((s.0 as i64 - 4037).abs() <= 1, "seconds numerator {}", s.0);
    }

    #[test]
    fn test_dms_magnitude_never_signed() {
        assert_eq!(decimal_to_dms(-122.326897), decimal_to_dms(122.326897));
    }

    #[test]
    fn test_hemisphere_refs() {
        assert_eq!(latitude_ref(47.6), 'N');
        assert_eq!(latitude_ref(-33.9), 'S');
        assert_eq!(latitude_ref(0.0), 'N');
        assert_eq!(longitude_ref(151.2), 'E');
        assert_eq!(longitude_ref(-122.3), 'W');
        assert_eq!(longitude_ref(0.0), 'E');
    }

    #[test]
    fn test_seconds_precision_two_decimals() {
        // 0.5 min boundary: 10.008333... deg = 10 deg 0 min 30.00 s
        let [_, m, s] = decimal_to_dms(10.0 + 30.0 / 3600.0);
        assert_eq!(m, (0, 1));
        assert_eq!(s, (3000, 100));
    }

    #[cfg(feature = "exif")]
    #[test]
    fn test_unsupported_container_rejected() {
        use super::ExifGeoTagger;
        let tagger = ExifGeoTagger;
        let result = tagger.embed(std::path::Path::new("/tmp/frame.bmp"), 1.0, 2.0);
        assert!(matches!(
            result,
            Err(crate::error::FramerError::UnsupportedImageFormat(_))
        ));
    }
}
