//! Snowflake identifiers.
//!
//! Every platform object is addressed by a 64-bit snowflake. Each object kind
//! gets its own newtype so a channel id can never be passed where a user id is
//! expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of decimal digits in a snowflake issued by the platform.
///
/// Free-form lookups only treat a numeric token as an identifier when it has
/// exactly this many digits.
pub const SNOWFLAKE_LENGTH: usize = 18;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw snowflake value.
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Parses a bare snowflake of exactly [`SNOWFLAKE_LENGTH`] digits.
            pub fn parse_exact(raw: &str) -> Option<Self> {
                if raw.len() != SNOWFLAKE_LENGTH || !raw.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                raw.parse().ok().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

snowflake!(
    /// Identifies a user account.
    UserId
);
snowflake!(
    /// Identifies a guild (server).
    GuildId
);
snowflake!(
    /// Identifies a channel, including direct-message channels.
    ChannelId
);
snowflake!(
    /// Identifies a guild role.
    RoleId
);
snowflake!(
    /// Identifies a message within a channel.
    MessageId
);
