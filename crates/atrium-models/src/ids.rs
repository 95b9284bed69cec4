//! Strongly-typed UUID identifiers.
//!
//! Session tokens, courses and schedules are keyed by random UUID v4 values.
//! Wrapping them keeps a course id from being passed where a schedule id or a
//! session token is expected.
//!
//! ```ignore
//! use atrium_models::ids::{CourseId, SessionTokenId};
//!
//! let token = SessionTokenId::new();
//! let key = token.to_string(); // sort key in the token table
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
        #[schema(value_type = String, format = "uuid")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random ID.
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[inline]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            #[inline]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            #[inline]
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                Uuid::deserialize(deserializer).map(Self)
            }
        }
    };
}

define_id!(
    /// Opaque session token handed out at login.
    SessionTokenId
);

define_id!(
    /// Identifier of a course within a tenant.
    CourseId
);

define_id!(
    /// Identifier of a weekly time slot of a course.
    ScheduleId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_v4_and_distinct() {
        let a = SessionTokenId::new();
        let b = SessionTokenId::new();
        assert_ne!(a, b);
        assert_eq!(a.into_inner().get_version_num(), 4);
    }

    #[test]
    fn test_id_debug_and_display() {
        let id = CourseId::from_uuid(Uuid::from_u128(0x12345678_1234_1234_1234_123456789abc));
        assert_eq!(
            format!("{:?}", id),
            "CourseId(12345678-1234-1234-1234-123456789abc)"
        );
        assert_eq!(id.to_string(), "12345678-1234-1234-1234-123456789abc");
    }

    #[test]
    fn test_id_from_str() {
        let id: CourseId = " 12345678-1234-1234-1234-123456789abc ".parse().unwrap();
        assert_eq!(
            id.into_inner(),
            Uuid::from_u128(0x12345678_1234_1234_1234_123456789abc)
        );
        assert!("not-a-uuid".parse::<CourseId>().is_err());
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id = SessionTokenId::from_uuid(Uuid::from_u128(1));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""00000000-0000-0000-0000-000000000001""#);
        let back: SessionTokenId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
