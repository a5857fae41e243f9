//! Stable column names of the exported tables.

pub const TIMESTAMP: &str = "Timestamp";

pub const ACCESS_COLUMNS: [&str; 8] = [
    TIMESTAMP,
    "Event",
    "Username",
    "StationID",
    "Source",
    "Destination",
    "ServerIP",
    "CUI",
];

pub const FTICKS_COLUMNS: [&str; 6] = [
    TIMESTAMP,
    "VISCOUNTRY",
    "VISINST",
    "CSI",
    "RESULT",
    "Reason",
];

pub const SESSION_COLUMNS: [&str; 19] = [
    "Kind",
    "Line",
    TIMESTAMP,
    "Event",
    "Username",
    "StationID",
    "Source",
    "Destination",
    "ServerIP",
    "CUI",
    "Realm",
    "VISCOUNTRY",
    "VISINST",
    "CSI",
    "Reason",
    "UserOrigin",
    "HomeJurisdiction",
    "VisitingJurisdiction",
    "IsRoaming",
];

/// Display format for timestamps in every table.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
