//! Student records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::DEGREES;
use crate::error::{FirstMateError, FirstMateResult};

/// A registered student, stored at users/<zid>/user.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub zid: String,

    /// Shown to other students
    pub display_name: String,

    /// Where the timetable feed is fetched from
    pub ical_url: String,

    #[serde(default)]
    pub degrees: Vec<String>,

    /// Shown to anyone browsing mates
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub public_description: String,

    /// Only shown to mutual matches
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub private_description: String,

    /// zIDs this student has liked
    #[serde(default)]
    pub likes: Vec<String>,
}

impl User {
    pub fn likes(&self, zid: &str) -> bool {
        self.likes.iter().any(|liked| liked == zid)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.zid)
    }
}

/// Details needed to register a student.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub zid: String,
    pub display_name: String,
    pub ical_url: String,
    pub degrees: Vec<String>,
}

/// Profile fields to change; `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub degrees: Option<Vec<String>>,
    pub public_description: Option<String>,
    pub private_description: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.degrees.is_none()
            && self.public_description.is_none()
            && self.private_description.is_none()
    }

    pub(crate) fn apply(self, user: &mut User) -> FirstMateResult<()> {
        if let Some(degrees) = self.degrees {
            user.degrees = validate_degrees(degrees)?;
        }
        if let Some(name) = self.display_name {
            user.display_name = name;
        }
        if let Some(description) = self.public_description {
            user.public_description = description;
        }
        if let Some(description) = self.private_description {
            user.private_description = description;
        }
        Ok(())
    }
}

/// Check a zID is a `z` followed by 7 digits and return it lower-cased.
pub fn normalize_zid(zid: &str) -> FirstMateResult<String> {
    let zid = zid.trim().to_ascii_lowercase();

    let valid = zid.len() == 8
        && zid.starts_with('z')
        && zid[1..].chars().all(|c| c.is_ascii_digit());

    if valid {
        Ok(zid)
    } else {
        Err(FirstMateError::InvalidZid(zid))
    }
}

/// Match degrees against the known list, ignoring case, and return them
/// in their canonical spelling.
pub fn validate_degrees(degrees: Vec<String>) -> FirstMateResult<Vec<String>> {
    degrees
        .into_iter()
        .map(|degree| {
            DEGREES
                .iter()
                .find(|known| known.eq_ignore_ascii_case(degree.trim()))
                .map(|known| known.to_string())
                .ok_or(FirstMateError::UnknownDegree(degree))
        })
        .collect()
}
