use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The string form doubles as the serde representation.
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(
    /// Why a seal verification ended where it did. Exactly one per call.
    ReasonCode {
        /// Default before any stage completes. Observing it means a defect.
        NotFound => "not_found",
        NoFile => "no_file",
        NoMarker => "no_marker",
        NoId => "no_id",
        NoHash => "no_hash",
        NoMatch => "no_match",
        DbError => "db_error",
        Ok => "ok",
    }
);

impl ReasonCode {
    /// Only `Ok` authorizes the document.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Faults of the system rather than of the document. These are the
    /// outcomes operators should be alerted about.
    pub fn is_system_fault(&self) -> bool {
        matches!(self, Self::DbError | Self::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    const ALL: [ReasonCode; 8] = [
        ReasonCode::NotFound,
        ReasonCode::NoFile,
        ReasonCode::NoMarker,
        ReasonCode::NoId,
        ReasonCode::NoHash,
        ReasonCode::NoMatch,
        ReasonCode::DbError,
        ReasonCode::Ok,
    ];

    #[test]
    fn as_str_parses_back() {
        for reason in ALL {
            assert_eq!(ReasonCode::from_str(reason.as_str()).unwrap(), reason);
        }
    }

    #[test]
    fn serde_uses_wire_codes() {
        assert_eq!(serde_json::to_string(&ReasonCode::NoHash).unwrap(), "\"no_hash\"");
        assert_eq!(serde_json::to_string(&ReasonCode::Ok).unwrap(), "\"ok\"");
        let parsed: ReasonCode = serde_json::from_str("\"db_error\"").unwrap();
        assert_eq!(parsed, ReasonCode::DbError);
    }

    #[test]
    fn unknown_code_is_invalid_enum() {
        let err = ReasonCode::from_str("maybe").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { ref field, .. } if field == "ReasonCode"));
    }

    #[test]
    fn only_ok_is_valid() {
        let valid: Vec<_> = ALL.iter().filter(|r| r.is_valid()).collect();
        assert_eq!(valid, vec![&ReasonCode::Ok]);
    }

    #[test]
    fn document_failures_are_not_system_faults() {
        assert!(ReasonCode::DbError.is_system_fault());
        assert!(ReasonCode::NotFound.is_system_fault());
        assert!(!ReasonCode::NoMatch.is_system_fault());
        assert!(!ReasonCode::NoMarker.is_system_fault());
        assert!(!ReasonCode::Ok.is_system_fault());
    }
}
