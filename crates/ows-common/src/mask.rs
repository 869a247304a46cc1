//! Extent and quality mask predicates.
//!
//! Stateless functions mapping retrieved band data to boolean masks; the
//! compositing layer ANDs/ORs the results per product configuration. All
//! predicates share the `(data, band)` signature so a dispatch configuration
//! can name any of them interchangeably; the fixed-band predicates ignore
//! the band argument.

use crate::band::{Band, BandSet, Mask};
use crate::error::{OwsError, OwsResult};

/// Pixels whose value differs from the no-data sentinel.
///
/// `val` overrides the band's declared sentinel when supplied.
pub fn mask_by_val(data: &BandSet, band: &str, val: Option<i64>) -> OwsResult<Mask> {
    let band_data = data.band(band)?;
    let sentinel = match val {
        Some(v) => v,
        None => declared_nodata(band_data, band)?,
    };
    Ok(Mask::from_fn(band_data, |v| v != sentinel))
}

/// Bit-flag bands: pixels with none of the no-data bits set are kept out.
///
/// The declared sentinel is read as a bitmask; the mask is true where the
/// inverted value still carries sentinel bits.
pub fn mask_by_bitflag(data: &BandSet, band: &str) -> OwsResult<Mask> {
    let band_data = data.band(band)?;
    let sentinel = declared_nodata(band_data, band)?;
    Ok(Mask::from_fn(band_data, |v| (!v & sentinel) != 0))
}

/// Fixed test: the `quality` band away from the value 1.
pub fn mask_by_quality(data: &BandSet, _band: &str) -> OwsResult<Mask> {
    let quality = data.band("quality")?;
    Ok(Mask::from_fn(quality, |v| v != 1))
}

/// True where the `extent` band flags coverage.
pub fn mask_by_extent_flag(data: &BandSet, _band: &str) -> OwsResult<Mask> {
    let extent = data.band("extent")?;
    Ok(Mask::from_fn(extent, |v| v == 1))
}

/// True where the `extent` band differs from its declared no-data value.
pub fn mask_by_extent_val(data: &BandSet, _band: &str) -> OwsResult<Mask> {
    let extent = data.band("extent")?;
    let sentinel = declared_nodata(extent, "extent")?;
    Ok(Mask::from_fn(extent, |v| v != sentinel))
}

fn declared_nodata(band: &Band, name: &str) -> OwsResult<i64> {
    band.nodata()
        .ok_or_else(|| OwsError::NoDataUndefined(name.to_string()))
}
