//! AT command table for the radio module.
//!
//! Every command the controller sends, with the marker that means success
//! and how long to wait for it, lives in [`COMMANDS`]. Templates reference
//! the network configuration through placeholders:
//!
//! | Placeholder    | Value                                  |
//! |----------------|----------------------------------------|
//! | `{ssid}`       | `NetworkConfig::ssid`                  |
//! | `{password}`   | `NetworkConfig::password`              |
//! | `{link}`       | `NetworkConfig::link_id`               |
//! | `{addr}`       | `NetworkConfig::remote_address`        |
//! | `{port}`       | `NetworkConfig::remote_port`           |
//! | `{local_port}` | `NetworkConfig::local_port`            |
//!
//! In command lines `{ssid}` and `{password}` are escaped (`\`, `"`, `,`
//! get a backslash), as the AT firmware parses quoted arguments. Markers
//! use the raw values because that is how the module echoes them back.

use core::fmt::{self, Display, Write};

use crate::config::NetworkConfig;

/// What a command is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Purpose {
    SetMode = 0,
    QueryAssociation = 1,
    Associate = 2,
    EnableMux = 3,
    QueryLink = 4,
    OpenLink = 5,
    ArmSend = 6,
    /// The raw payload byte after the `>` prompt (no command line).
    Payload = 7,
}

impl Purpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Purpose::SetMode => "set mode",
            Purpose::QueryAssociation => "query association",
            Purpose::Associate => "associate",
            Purpose::EnableMux => "enable multiplex",
            Purpose::QueryLink => "query link",
            Purpose::OpenLink => "open link",
            Purpose::ArmSend => "arm send",
            Purpose::Payload => "payload",
        }
    }

    /// Table entry for this purpose.
    #[inline]
    pub fn spec(self) -> &'static CommandSpec {
        &COMMANDS[self as usize]
    }
}

impl Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the command table.
#[derive(Debug)]
pub struct CommandSpec {
    pub purpose: Purpose,
    /// Command line template, without line terminator.
    pub template: &'static str,
    /// Substring of the reply that means success.
    pub marker: &'static str,
    pub timeout_ms: u32,
}

impl CommandSpec {
    /// Command line bound to a configuration.
    pub fn command<'a>(&self, net: &'a NetworkConfig) -> Rendered<'a> {
        Rendered {
            template: self.template,
            net,
            escape_credentials: true,
        }
    }

    /// Success marker bound to a configuration.
    pub fn marker(&self, net: &NetworkConfig) -> Marker {
        let mut marker = Marker::new();
        let _ = write!(
            marker,
            "{}",
            Rendered {
                template: self.marker,
                net,
                escape_credentials: false,
            }
        );
        marker
    }
}

/// The command table, indexed by `Purpose`.
pub static COMMANDS: [CommandSpec; 8] = [
    CommandSpec {
        purpose: Purpose::SetMode,
        template: "AT+CWMODE=1",
        marker: "OK",
        timeout_ms: 2000,
    },
    CommandSpec {
        purpose: Purpose::QueryAssociation,
        template: "AT+CWJAP?",
        marker: "{ssid}",
        timeout_ms: 1000,
    },
    CommandSpec {
        purpose: Purpose::Associate,
        template: "AT+CWJAP=\"{ssid}\",\"{password}\"",
        marker: "OK",
        // association is slow
        timeout_ms: 20000,
    },
    CommandSpec {
        purpose: Purpose::EnableMux,
        template: "AT+CIPMUX=1",
        marker: "OK",
        timeout_ms: 2000,
    },
    CommandSpec {
        purpose: Purpose::QueryLink,
        template: "AT+CIPSTATUS",
        marker: "+CIPSTATUS:{link},\"UDP\"",
        timeout_ms: 1000,
    },
    CommandSpec {
        purpose: Purpose::OpenLink,
        template: "AT+CIPSTART={link},\"UDP\",\"{addr}\",{port},{local_port},0",
        marker: "OK",
        timeout_ms: 5000,
    },
    CommandSpec {
        purpose: Purpose::ArmSend,
        template: "AT+CIPSEND={link},1",
        marker: ">",
        timeout_ms: 2000,
    },
    CommandSpec {
        purpose: Purpose::Payload,
        template: "",
        marker: "SEND OK",
        timeout_ms: 5000,
    },
];

/// A template with its placeholders substituted on the fly.
pub struct Rendered<'a> {
    template: &'static str,
    net: &'a NetworkConfig,
    escape_credentials: bool,
}

impl Rendered<'_> {
    fn write_credential(&self, f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
        if !self.escape_credentials {
            return f.write_str(value);
        }
        for c in value.chars() {
            if matches!(c, '\\' | '"' | ',') {
                f.write_char('\\')?;
            }
            f.write_char(c)?;
        }
        Ok(())
    }
}

impl Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.template;

        while let Some(open) = rest.find('{') {
            f.write_str(&rest[..open])?;
            let after = &rest[open + 1..];

            let Some(close) = after.find('}') else {
                // Unterminated: emit the remainder literally
                return f.write_str(&rest[open..]);
            };

            match &after[..close] {
                "ssid" => self.write_credential(f, self.net.ssid)?,
                "password" => self.write_credential(f, self.net.password)?,
                "link" => write!(f, "{}", self.net.link_id)?,
                "addr" => f.write_str(self.net.remote_address)?,
                "port" => write!(f, "{}", self.net.remote_port)?,
                "local_port" => write!(f, "{}", self.net.local_port)?,
                other => write!(f, "{{{}}}", other)?,
            }
            rest = &after[close + 1..];
        }

        f.write_str(rest)
    }
}

/// Capacity of a rendered marker.
pub const MARKER_CAPACITY: usize = 64;

/// Rendered success marker (fixed capacity, truncates on overflow).
#[derive(Clone, Copy)]
pub struct Marker {
    buf: [u8; MARKER_CAPACITY],
    len: usize,
}

impl Marker {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; MARKER_CAPACITY],
            len: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(self.as_bytes()).unwrap_or("")
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for Marker {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let available = MARKER_CAPACITY - self.len;
        let to_copy = bytes.len().min(available);
        self.buf[self.len..self.len + to_copy].copy_from_slice(&bytes[..to_copy]);
        self.len += to_copy;
        Ok(())
    }
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Marker({:?})", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    const NET: NetworkConfig = NetworkConfig {
        ssid: "lab",
        password: "pw",
        link_id: 2,
        remote_address: "10.0.0.9",
        remote_port: 7000,
        local_port: 7001,
    };

    #[test]
    fn test_table_indexed_by_purpose() {
        for (i, spec) in COMMANDS.iter().enumerate() {
            assert_eq!(spec.purpose as usize, i);
        }
    }

    #[test]
    fn test_unknown_placeholder_kept() {
        let r = Rendered {
            template: "A{nope}B",
            net: &NET,
            escape_credentials: true,
        };
        assert_eq!(r.to_string(), "A{nope}B");
    }

    #[test]
    fn test_unterminated_placeholder_kept() {
        let r = Rendered {
            template: "AT{link",
            net: &NET,
            escape_credentials: true,
        };
        assert_eq!(r.to_string(), "AT{link");
    }

    #[test]
    fn test_marker_truncates() {
        let mut m = Marker::new();
        for _ in 0..10 {
            let _ = m.write_str("0123456789");
        }
        assert_eq!(m.as_bytes().len(), MARKER_CAPACITY);
    }
}
