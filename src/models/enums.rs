use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
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

str_enum!(AppointmentKind {
    Consultation => "consultation",
    FollowUp => "follow_up",
    Exam => "exam",
});

str_enum!(AppointmentStatus {
    Pending => "pending",
    Confirmed => "confirmed",
    Done => "done",
    NoShow => "no_show",
    Late => "late",
});

str_enum!(PaymentStatus {
    Pending => "pending",
    Paid => "paid",
});

str_enum!(Role {
    Admin => "admin",
    Secretaria => "secretaria",
    SuperAdmin => "super_admin",
});

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Pending
    }
}
