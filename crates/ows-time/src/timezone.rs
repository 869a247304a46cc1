//! Coordinate to timezone resolution.

use std::sync::OnceLock;

use chrono_tz::Tz;
use tracing::warn;
use tzf_rs::DefaultFinder;

use ows_common::{OwsError, OwsResult};

/// First-pass search radius in degrees.
const FIRST_PASS_DELTA: f64 = 9.0;
/// Widened second-pass search radius in degrees.
const SECOND_PASS_DELTA: f64 = 15.0;
/// Probe bearings per ring in the widening search.
const RING_BEARINGS: usize = 16;

/// An in-memory timezone boundary index.
///
/// Implementations must be immutable once built and cheap to query; the
/// resolver issues many lookups per request burst, from any thread.
pub trait TimezoneIndex: Send + Sync {
    /// IANA name of the timezone containing the point, if any.
    fn timezone_at(&self, lon: f64, lat: f64) -> Option<String>;

    /// Nearest timezone within `delta_degree` of the point.
    ///
    /// The provided search probes the point itself, then rings of
    /// `RING_BEARINGS` bearings at one-degree radius steps out to
    /// `delta_degree`. Deterministic for a fixed index.
    fn closest_timezone(&self, lon: f64, lat: f64, delta_degree: f64) -> Option<String> {
        if let Some(name) = self.timezone_at(lon, lat) {
            return Some(name);
        }
        for ring in 1..=(delta_degree.floor() as usize) {
            for bearing in 0..RING_BEARINGS {
                let theta = bearing as f64 * std::f64::consts::TAU / RING_BEARINGS as f64;
                let probe_lon = wrap_lon(lon + ring as f64 * theta.cos());
                let probe_lat = (lat + ring as f64 * theta.sin()).clamp(-90.0, 90.0);
                if let Some(name) = self.timezone_at(probe_lon, probe_lat) {
                    return Some(name);
                }
            }
        }
        None
    }
}

impl<T: TimezoneIndex + ?Sized> TimezoneIndex for &T {
    fn timezone_at(&self, lon: f64, lat: f64) -> Option<String> {
        (**self).timezone_at(lon, lat)
    }

    fn closest_timezone(&self, lon: f64, lat: f64, delta_degree: f64) -> Option<String> {
        (**self).closest_timezone(lon, lat, delta_degree)
    }
}

fn wrap_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Production boundary index backed by the bundled tzf dataset.
pub struct TzfIndex {
    finder: DefaultFinder,
}

impl TzfIndex {
    /// Build a fresh index. Parsing the bundled boundary data is the
    /// expensive part; do it once per process.
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }

    /// Process-wide shared index, built on first use.
    pub fn shared() -> &'static TzfIndex {
        static SHARED: OnceLock<TzfIndex> = OnceLock::new();
        SHARED.get_or_init(TzfIndex::new)
    }
}

impl Default for TzfIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneIndex for TzfIndex {
    fn timezone_at(&self, lon: f64, lat: f64) -> Option<String> {
        let name = self.finder.get_tz_name(lon, lat);
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

/// Maps coordinates to IANA timezones with a bounded widening search.
#[derive(Clone)]
pub struct TimezoneResolver<I = &'static TzfIndex> {
    index: I,
}

impl TimezoneResolver<&'static TzfIndex> {
    /// Resolver over the process-wide boundary index.
    pub fn with_shared_index() -> Self {
        Self {
            index: TzfIndex::shared(),
        }
    }
}

impl<I: TimezoneIndex> TimezoneResolver<I> {
    /// Resolver over an explicit index (tests inject fixtures here).
    pub fn new(index: I) -> Self {
        Self { index }
    }

    /// Timezone in effect at a geographic coordinate.
    ///
    /// Exactly two attempts: 9 degrees, then 15. The widening covers sparse
    /// boundary regions (coastal water, polar gaps) without unbounded
    /// search cost; the radii are a fixed tradeoff, not configuration.
    pub fn tz_for_coord(&self, lon: f64, lat: f64) -> OwsResult<Tz> {
        let name = match self.index.closest_timezone(lon, lat, FIRST_PASS_DELTA) {
            Some(name) => name,
            None => {
                warn!(
                    lon,
                    lat,
                    delta_degree = FIRST_PASS_DELTA,
                    "closest timezone lookup failed, widening"
                );
                self.index
                    .closest_timezone(lon, lat, SECOND_PASS_DELTA)
                    .ok_or_else(|| {
                        OwsError::Resolution(format!(
                            "closest tz failed with delta {SECOND_PASS_DELTA}deg"
                        ))
                    })?
            }
        };
        name.parse::<Tz>().map_err(|_| {
            OwsError::Resolution(format!("unknown timezone identifier '{name}'"))
        })
    }
}
