//! This module stores the column names used throughout the pipeline. The `SOURCE_*` names must be
//! kept in sync with the headers of the upstream JHU CSSE time-series CSV; everything else is the
//! canonical name we rename to.

/// Row-index key added at load time and carried through every stage.
pub const LOCATION_ID: &str = "location_id";

pub const SOURCE_COUNTRY: &str = "Country_Region";
pub const SOURCE_LOCATION: &str = "Province_State";
pub const SOURCE_LATITUDE: &str = "Lat";
pub const SOURCE_LONGITUDE: &str = "Long_";

pub const COUNTRY: &str = "country";
pub const LOCATION: &str = "location";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

pub const CONFIRMED_CASES: &str = "confirmed_cases";
pub const CONFIRMED_CASES_NORM: &str = "confirmed_cases_norm";
pub const TEXT: &str = "text";

/// Upstream header -> canonical name.
pub const RENAMED_COLUMNS: [(&str, &str); 4] = [
    (SOURCE_COUNTRY, COUNTRY),
    (SOURCE_LOCATION, LOCATION),
    (SOURCE_LATITUDE, LATITUDE),
    (SOURCE_LONGITUDE, LONGITUDE),
];

/// The geographic attribute columns in the order they appear in every case table.
pub const GEO_COLUMNS: [&str; 4] = [COUNTRY, LOCATION, LATITUDE, LONGITUDE];
