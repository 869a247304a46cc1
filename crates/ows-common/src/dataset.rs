//! Consumed interfaces to the data-cube layer, and dataset time/coordinate
//! helpers.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;
use serde_json::Value;

use crate::error::{OwsError, OwsResult};

/// A dataset supplied by the data-cube query layer.
///
/// Read-only view; the data-cube layer owns the object and performs any
/// extent projection before handing coordinates over.
pub trait Dataset {
    /// Center time computed by the data-cube layer.
    fn center_time(&self) -> DateTime<Utc>;

    /// Raw metadata document indexed with the dataset, when present.
    fn metadata_doc(&self) -> Option<&Value>;

    /// Extent centroid in geographic (EPSG:4326) coordinates, as (lon, lat).
    fn geographic_centroid(&self) -> (f64, f64);

    /// Source-location identifiers, e.g. object-store URIs.
    fn locations(&self) -> &[String];
}

/// A spatial footprint with a derivable geographic-extent centroid.
pub trait GeoBox {
    /// Centroid of the geographic extent, as (lon, lat).
    fn geographic_centroid(&self) -> (f64, f64);
}

/// Representative timestamp of a dataset.
///
/// The metadata document's `extent.center_dt` is what the protocol layer
/// advertises as the dataset's temporal extent, so it wins over the computed
/// center time, which can drift from it. An absent metadata path falls back
/// silently; a present but unparseable value is an error.
pub fn dataset_center_time<D: Dataset + ?Sized>(dataset: &D) -> OwsResult<DateTime<Utc>> {
    match dataset
        .metadata_doc()
        .and_then(|doc| doc.pointer("/extent/center_dt"))
    {
        Some(value) => {
            let raw = value.as_str().ok_or_else(|| {
                OwsError::InvalidTime(format!("extent.center_dt is not a string: {value}"))
            })?;
            parse_datetime(raw)
        }
        None => Ok(dataset.center_time()),
    }
}

/// Extent centroid of a dataset in geographic coordinates, as (lon, lat).
pub fn dataset_center_coords<D: Dataset + ?Sized>(dataset: &D) -> (f64, f64) {
    dataset.geographic_centroid()
}

/// Parse a free-form metadata date-time string.
///
/// Accepts RFC 3339, `T`- or space-separated naive forms with optional
/// fractional seconds (assumed UTC, trailing `Z` tolerated), and a bare date.
pub fn parse_datetime(s: &str) -> OwsResult<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = s.strip_suffix('Z').unwrap_or(s);
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(naive, format) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    if let Ok(nd) = NaiveDate::parse_from_str(naive, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&nd.and_time(NaiveTime::MIN)));
    }

    Err(OwsError::InvalidTime(format!(
        "Unparseable date-time string: '{s}'"
    )))
}

static LS8_PATH_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Landsat-8 sub-product discriminator: the WRS path number embedded in the
/// scene's first storage location under the `L8/<path>` convention.
pub fn ls8_path_subproduct<D: Dataset + ?Sized>(dataset: &D) -> OwsResult<u32> {
    let pattern =
        LS8_PATH_PATTERN.get_or_init(|| Regex::new(r"L8/(?P<path>[0-9]+)").expect("valid pattern"));
    let location = dataset
        .locations()
        .first()
        .ok_or_else(|| OwsError::Resolution("dataset has no source locations".to_string()))?;
    let captures = pattern.captures(location).ok_or_else(|| {
        OwsError::Resolution(format!("no L8 path component in location '{location}'"))
    })?;
    captures["path"].parse().map_err(|_| {
        OwsError::Resolution(format!("L8 path out of range in location '{location}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use serde_json::json;

    struct TestDataset {
        center_time: DateTime<Utc>,
        metadata_doc: Option<Value>,
        centroid: (f64, f64),
        locations: Vec<String>,
    }

    impl TestDataset {
        fn new(center_time: DateTime<Utc>) -> Self {
            Self {
                center_time,
                metadata_doc: None,
                centroid: (149.0, -35.3),
                locations: Vec::new(),
            }
        }
    }

    impl Dataset for TestDataset {
        fn center_time(&self) -> DateTime<Utc> {
            self.center_time
        }

        fn metadata_doc(&self) -> Option<&Value> {
            self.metadata_doc.as_ref()
        }

        fn geographic_centroid(&self) -> (f64, f64) {
            self.centroid
        }

        fn locations(&self) -> &[String] {
            &self.locations
        }
    }

    #[test]
    fn test_center_time_prefers_metadata() {
        let computed = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let mut ds = TestDataset::new(computed);
        ds.metadata_doc = Some(json!({
            "extent": { "center_dt": "2024-01-15T23:54:05.5Z" }
        }));

        let advertised = Utc
            .with_ymd_and_hms(2024, 1, 15, 23, 54, 5)
            .unwrap()
            .with_nanosecond(500_000_000)
            .unwrap();
        assert_eq!(dataset_center_time(&ds).unwrap(), advertised);
    }

    #[test]
    fn test_center_time_falls_back_when_path_absent() {
        let computed = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let mut ds = TestDataset::new(computed);
        assert_eq!(dataset_center_time(&ds).unwrap(), computed);

        // Partial metadata without the nested key also falls back.
        ds.metadata_doc = Some(json!({ "extent": {} }));
        assert_eq!(dataset_center_time(&ds).unwrap(), computed);
    }

    #[test]
    fn test_center_time_rejects_garbage_metadata() {
        let computed = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let mut ds = TestDataset::new(computed);
        ds.metadata_doc = Some(json!({ "extent": { "center_dt": "not a date" } }));
        assert!(matches!(
            dataset_center_time(&ds),
            Err(OwsError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 1, 3, 30, 0).unwrap();
        assert_eq!(parse_datetime("2024-06-01T03:30:00Z").unwrap(), expected);
        assert_eq!(parse_datetime("2024-06-01T03:30:00").unwrap(), expected);
        assert_eq!(parse_datetime("2024-06-01 03:30:00").unwrap(), expected);
        assert_eq!(parse_datetime("2024-06-01 03:30:00Z").unwrap(), expected);
        assert_eq!(
            parse_datetime("2024-06-01T05:30:00+02:00").unwrap(),
            expected
        );

        let midnight = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_datetime("2024-06-01").unwrap(), midnight);

        assert!(parse_datetime("June the first").is_err());
    }

    #[test]
    fn test_center_coords_reads_centroid() {
        let ds = TestDataset::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(dataset_center_coords(&ds), (149.0, -35.3));
    }

    #[test]
    fn test_ls8_path_subproduct() {
        let mut ds = TestDataset::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        ds.locations = vec!["s3://dea-public-data/L8/91/078/2024/scene.yaml".to_string()];
        assert_eq!(ls8_path_subproduct(&ds).unwrap(), 91);

        ds.locations = vec!["s3://dea-public-data/S2/tile/2024/scene.yaml".to_string()];
        assert!(matches!(
            ls8_path_subproduct(&ds),
            Err(OwsError::Resolution(_))
        ));

        ds.locations.clear();
        assert!(matches!(
            ls8_path_subproduct(&ds),
            Err(OwsError::Resolution(_))
        ));
    }
}
