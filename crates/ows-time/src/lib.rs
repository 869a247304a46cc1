//! Timezone resolution and local solar dates for EO raster observations.

pub mod solar;
pub mod timezone;

pub use solar::{coord_date, local_date, local_solar_date_range, TimeHolder};
pub use timezone::{TimezoneIndex, TimezoneResolver, TzfIndex};
