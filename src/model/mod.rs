pub mod adjustment;
pub mod attendance;
pub mod employee;
pub mod loan;
pub mod project;
pub mod salary;
pub mod schedule;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Persisted Y/N flag. The single-character representation exists only at
/// the storage and wire edges; everything else branches on the enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type,
    strum::Display, strum::EnumString, ToSchema,
)]
pub enum YesNo {
    #[serde(rename = "Y")]
    #[sqlx(rename = "Y")]
    #[strum(serialize = "Y")]
    Yes,
    #[default]
    #[serde(rename = "N")]
    #[sqlx(rename = "N")]
    #[strum(serialize = "N")]
    No,
}

impl YesNo {
    pub fn as_bool(self) -> bool {
        self == YesNo::Yes
    }

    pub fn from_bool(value: bool) -> Self {
        if value { YesNo::Yes } else { YesNo::No }
    }
}
