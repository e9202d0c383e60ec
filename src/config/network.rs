//! Network parameters for the radio link.
//!
//! Credentials default to the lab network and can be replaced at build time:
//!
//! ```text
//! REMOTE_WIFI_SSID=my-net REMOTE_WIFI_PASSWORD=secret cargo build --release
//! ```

/// Maximum SSID length accepted by 802.11.
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WPA passphrase length.
pub const MAX_PASSWORD_LEN: usize = 64;

/// Highest link id the radio accepts in multiplexed mode.
pub const MAX_LINK_ID: u8 = 4;

/// Network configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// E10: SSID is empty
    SsidEmpty,
    /// E11: SSID longer than 32 bytes
    SsidTooLong,
    /// E12: Password longer than 64 bytes
    PasswordTooLong,
    /// E13: Link id out of range
    LinkIdOutOfRange,
    /// E14: Remote address is empty
    AddressEmpty,
}

impl ConfigError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::SsidEmpty => "E10",
            Self::SsidTooLong => "E11",
            Self::PasswordTooLong => "E12",
            Self::LinkIdOutOfRange => "E13",
            Self::AddressEmpty => "E14",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::SsidEmpty => "SSID is empty",
            Self::SsidTooLong => "SSID longer than 32 bytes",
            Self::PasswordTooLong => "password longer than 64 bytes",
            Self::LinkIdOutOfRange => "link id must be 0-4",
            Self::AddressEmpty => "remote address is empty",
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// Parameters of the Wi-Fi network and the UDP link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    pub ssid: &'static str,
    pub password: &'static str,
    /// Multiplexed link id used for every CIP command.
    pub link_id: u8,
    pub remote_address: &'static str,
    pub remote_port: u16,
    pub local_port: u16,
}

impl NetworkConfig {
    /// Check the configuration against the limits of the radio firmware.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ssid.is_empty() {
            return Err(ConfigError::SsidEmpty);
        }
        if self.ssid.len() > MAX_SSID_LEN {
            return Err(ConfigError::SsidTooLong);
        }
        if self.password.len() > MAX_PASSWORD_LEN {
            return Err(ConfigError::PasswordTooLong);
        }
        if self.link_id > MAX_LINK_ID {
            return Err(ConfigError::LinkIdOutOfRange);
        }
        if self.remote_address.is_empty() {
            return Err(ConfigError::AddressEmpty);
        }
        Ok(())
    }
}

/// Network the controller joins and the peer it streams to.
pub const NETWORK: NetworkConfig = NetworkConfig {
    ssid: match option_env!("REMOTE_WIFI_SSID") {
        Some(ssid) => ssid,
        None => "C-project-45",
    },
    password: match option_env!("REMOTE_WIFI_PASSWORD") {
        Some(password) => password,
        None => "password",
    },
    link_id: 0,
    remote_address: "192.168.157.37",
    remote_port: 8888,
    local_port: 8888,
};
