//! Common types and utilities shared across the EO raster OWS stack.

pub mod band;
pub mod collection;
pub mod dataset;
pub mod dispatch;
pub mod error;
pub mod mask;
pub mod urls;

pub use band::{Band, BandSet, Mask, PixelGrid};
pub use collection::{DataCollection, DatasetCollection, TimeData, TimeDatasets};
pub use dataset::{
    dataset_center_coords, dataset_center_time, ls8_path_subproduct, parse_datetime, Dataset,
    GeoBox,
};
pub use dispatch::{
    DispatchFn, FunctionConfig, FunctionRecord, FunctionRegistry, FunctionWrapper, Kwargs,
};
pub use error::{OwsError, OwsResult};
pub use mask::{
    mask_by_bitflag, mask_by_extent_flag, mask_by_extent_val, mask_by_quality, mask_by_val,
};
pub use urls::{feature_info_url_template, get_service_base_url, parse_for_base_url};
