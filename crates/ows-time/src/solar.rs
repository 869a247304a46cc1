//! Local solar date calculation.
//!
//! A UTC acquisition timestamp belongs to the calendar date in effect at the
//! observation's own location, not to the UTC date. These functions own that
//! mapping and the midnight-to-midnight UTC ranges derived from it.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use ows_common::{dataset_center_coords, dataset_center_time, Dataset, GeoBox, OwsError, OwsResult};

use crate::timezone::{TimezoneIndex, TimezoneResolver};

/// UTC instant range of `date`'s local solar day at the geobox centroid.
///
/// The range runs local `00:00:00` through `23:59:59` converted to UTC,
/// inclusive of the last second. The last local second is always `23:59:59`;
/// leap seconds are not modeled.
pub fn local_solar_date_range<G, I>(
    geobox: &G,
    date: NaiveDate,
    resolver: &TimezoneResolver<I>,
) -> OwsResult<(DateTime<Utc>, DateTime<Utc>)>
where
    G: GeoBox + ?Sized,
    I: TimezoneIndex,
{
    let (lon, lat) = geobox.geographic_centroid();
    let tz = resolver.tz_for_coord(lon, lat)?;

    let start = resolve_local(&tz, date.and_time(NaiveTime::MIN))?;
    let end = resolve_local(&tz, date.and_hms_opt(23, 59, 59).expect("valid wall-clock time"))?;
    Ok((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// Shift a UTC instant into the timezone in effect at a coordinate.
pub fn coord_date<I: TimezoneIndex>(
    time: DateTime<Utc>,
    lon: f64,
    lat: f64,
    resolver: &TimezoneResolver<I>,
) -> OwsResult<DateTime<Tz>> {
    let tz = resolver.tz_for_coord(lon, lat)?;
    Ok(time.with_timezone(&tz))
}

/// Local calendar date a dataset's observation belongs to.
///
/// With an explicit `tz`, every dataset in a spatial batch shares one zone,
/// consistent within a tile. Without one, the zone is resolved from the
/// dataset's own centroid, exact when a batch spans zone boundaries.
pub fn local_date<D, I>(
    dataset: &D,
    tz: Option<Tz>,
    resolver: &TimezoneResolver<I>,
) -> OwsResult<NaiveDate>
where
    D: Dataset + ?Sized,
    I: TimezoneIndex,
{
    let dt_utc = dataset_center_time(dataset)?;
    match tz {
        Some(tz) => Ok(dt_utc.with_timezone(&tz).date_naive()),
        None => {
            let (lon, lat) = dataset_center_coords(dataset);
            Ok(coord_date(dt_utc, lon, lat, resolver)?.date_naive())
        }
    }
}

/// A timestamp bound to the UTC range of its local solar day at a footprint.
///
/// The range derives from the calendar-date portion of `time` (date first,
/// range from the date), never from the instant, so `time` inside the range
/// is expected but not forced by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeHolder {
    pub time: DateTime<Utc>,
    pub solar_range: (DateTime<Utc>, DateTime<Utc>),
}

impl TimeHolder {
    pub fn new<G, I>(
        time: DateTime<Utc>,
        geobox: &G,
        resolver: &TimezoneResolver<I>,
    ) -> OwsResult<Self>
    where
        G: GeoBox + ?Sized,
        I: TimezoneIndex,
    {
        let solar_range = local_solar_date_range(geobox, time.date_naive(), resolver)?;
        Ok(Self { time, solar_range })
    }
}

// Ambiguous wall times take the earlier instant; wall times inside a DST gap
// take the first valid instant after the gap.
fn resolve_local(tz: &Tz, wall: NaiveDateTime) -> OwsResult<DateTime<Tz>> {
    match tz.from_local_datetime(&wall) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earlier, _) => Ok(earlier),
        LocalResult::None => {
            let shifted = wall + Duration::hours(1);
            tz.from_local_datetime(&shifted).earliest().ok_or_else(|| {
                OwsError::Resolution(format!("no valid local time for {wall} in {tz}"))
            })
        }
    }
}
