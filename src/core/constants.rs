//! Constants for the modem web interface
//!
//! This module defines the endpoint paths, login form keys, and status
//! field positions used when talking to the PK5001Z management pages.

/// Modem endpoint paths
pub mod endpoint {
    /// Login form target
    pub const LOGIN: &str = "/login.cgi";

    /// WAN/DSL status blob
    pub const WAN_DSL_INFO: &str = "/GetWANDSLInfo.cgi";
}

/// Login form field names
pub mod form {
    /// Submit marker expected by the firmware
    pub const SUBMIT: &str = "loginSubmitValue";

    /// Submit marker value
    pub const SUBMIT_VALUE: &str = "1";

    /// Administrator user name
    pub const USERNAME: &str = "admin_username";

    /// Administrator password
    pub const PASSWORD: &str = "admin_password";
}

/// Positions of the reported values within the status blob
pub mod field {
    pub const INTERNET_STATUS: usize = 0;
    pub const MODEM_IP: usize = 20;
    pub const REMOTE_IP: usize = 26;
    pub const IPV4_LINK_UPTIME: usize = 28;
    pub const DSL_STATUS: usize = 30;
    pub const UPLOAD: usize = 32;
    pub const DOWNLOAD: usize = 34;
}

/// Prefix for entity identifiers exposed to the host platform
pub const SENSOR_PREFIX: &str = "pk5001z";
