// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! QoS policy kind taxonomies.
//!
//! The ranked kinds (reliability, durability, liveliness) derive `Ord` in
//! declaration order, so `writer < reader` is exactly the Request vs Offered
//! incompatibility test used by the cross-profile rules.
//!
//! | Policy      | Levels                                                        |
//! |-------------|---------------------------------------------------------------|
//! | Reliability | BEST_EFFORT(0) < RELIABLE(1)                                  |
//! | Durability  | VOLATILE(0) < TRANSIENT_LOCAL(1) < TRANSIENT(2) < PERSISTENT(3) |
//! | Liveliness  | AUTOMATIC(0) < MANUAL_BY_PARTICIPANT(1) < MANUAL_BY_TOPIC(2)  |

use std::fmt;

macro_rules! qos_kind {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Parse a normalized (uppercase) profile value.
            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Profile spelling of this kind.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            /// Position in the declared order (0 = weakest).
            pub fn level(self) -> u8 {
                self as u8
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

qos_kind! {
    /// RELIABILITY kind (DDS v1.4 Sec.2.2.3.14).
    ReliabilityKind {
        #[default]
        BestEffort => "BEST_EFFORT",
        Reliable => "RELIABLE",
    }
}

qos_kind! {
    /// DURABILITY kind (DDS v1.4 Sec.2.2.3.4).
    DurabilityKind {
        #[default]
        Volatile => "VOLATILE",
        TransientLocal => "TRANSIENT_LOCAL",
        Transient => "TRANSIENT",
        Persistent => "PERSISTENT",
    }
}

qos_kind! {
    /// LIVELINESS kind (DDS v1.4 Sec.2.2.3.11).
    LivelinessKind {
        /// DDS infrastructure automatically asserts liveliness.
        #[default]
        Automatic => "AUTOMATIC",
        /// Application must assert per participant.
        ManualByParticipant => "MANUAL_BY_PARTICIPANT",
        /// Application must assert per writer/topic.
        ManualByTopic => "MANUAL_BY_TOPIC",
    }
}

qos_kind! {
    /// HISTORY kind.
    HistoryKind {
        #[default]
        KeepLast => "KEEP_LAST",
        KeepAll => "KEEP_ALL",
    }
}

qos_kind! {
    /// OWNERSHIP kind.
    OwnershipKind {
        #[default]
        Shared => "SHARED",
        Exclusive => "EXCLUSIVE",
    }
}

qos_kind! {
    /// DESTINATION_ORDER kind.
    DestinationOrderKind {
        #[default]
        ByReceptionTimestamp => "BY_RECEPTION_TIMESTAMP",
        BySourceTimestamp => "BY_SOURCE_TIMESTAMP",
    }
}

impl DurabilityKind {
    /// TRANSIENT_LOCAL, TRANSIENT or PERSISTENT.
    pub fn is_durable(self) -> bool {
        self > Self::Volatile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_follow_declaration_order() {
        assert!(ReliabilityKind::BestEffort < ReliabilityKind::Reliable);
        assert!(DurabilityKind::Volatile < DurabilityKind::TransientLocal);
        assert!(DurabilityKind::TransientLocal < DurabilityKind::Transient);
        assert!(DurabilityKind::Transient < DurabilityKind::Persistent);
        assert!(LivelinessKind::Automatic < LivelinessKind::ManualByParticipant);
        assert!(LivelinessKind::ManualByParticipant < LivelinessKind::ManualByTopic);
        assert_eq!(DurabilityKind::Persistent.level(), 3);
        assert_eq!(LivelinessKind::ManualByTopic.level(), 2);
    }

    #[test]
    fn test_default_is_weakest() {
        assert_eq!(ReliabilityKind::default(), ReliabilityKind::BestEffort);
        assert_eq!(DurabilityKind::default(), DurabilityKind::Volatile);
        assert_eq!(LivelinessKind::default(), LivelinessKind::Automatic);
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(
            DurabilityKind::parse("TRANSIENT_LOCAL"),
            Some(DurabilityKind::TransientLocal)
        );
        assert_eq!(DurabilityKind::parse("transient_local"), None);
        assert_eq!(ReliabilityKind::parse(""), None);
        assert_eq!(
            DestinationOrderKind::parse("BY_SOURCE_TIMESTAMP"),
            Some(DestinationOrderKind::BySourceTimestamp)
        );
    }

    #[test]
    fn test_durable() {
        assert!(!DurabilityKind::Volatile.is_durable());
        assert!(DurabilityKind::TransientLocal.is_durable());
        assert!(DurabilityKind::Persistent.is_durable());
    }
}
