//! # Passport Issuance
//!
//! Turns the passport form input into a traveler [`Profile`] and a mission.
//!
//! Derivation is deterministic:
//!
//! ```text
//! name        = trim(name).to_uppercase()
//! age_in_2050 = 2050 - birth_year
//! seed        = utf16(name)[0] + month*13 + day*7 + age_in_2050*5
//! mission     = MISSIONS[seed mod 4]
//! passport_id = "{name[0..2]}-{birth_year mod 100}{MM}{DD}-{seed mod 9999 :04}"
//! ```

use crate::catalog::{self, MISSIONS};
use crate::primitives::HORIZON_YEAR;
use crate::{Profile, TerraError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the passport slot stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportRecord {
    pub profile: Profile,
    pub mission_key: String,
}

impl PassportRecord {
    #[must_use]
    pub fn to_value(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "passport record serialization failed");
                Value::Null
            }
        }
    }

    /// Restore a stored record. An unknown mission key falls back to the
    /// first mission; a missing or malformed profile yields `None`.
    #[must_use]
    pub fn from_value(stored: &Value) -> Option<Self> {
        let profile: Profile = serde_json::from_value(stored.get("profile")?.clone())
            .map_err(|e| tracing::warn!(error = %e, "stored passport profile is malformed"))
            .ok()?;
        let key = stored.get("missionKey").and_then(Value::as_str).unwrap_or("");
        Some(Self {
            profile,
            mission_key: catalog::mission(key).key.to_string(),
        })
    }
}

fn invalid(reason: impl Into<String>) -> TerraError {
    TerraError::InvalidPassport(reason.into())
}

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Parse `YYYY-MM-DD` into `(year, month, day)`.
pub fn parse_dob(dob: &str) -> Result<(i32, u32, u32), TerraError> {
    let parts: Vec<&str> = dob.trim().split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return Err(invalid(format!("date of birth '{}' is not YYYY-MM-DD", dob)));
    };
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return Err(invalid(format!("date of birth '{}' is not YYYY-MM-DD", dob)));
    }

    let year: i32 = year
        .parse()
        .map_err(|_| invalid(format!("bad year in '{}'", dob)))?;
    let month: u32 = month
        .parse()
        .map_err(|_| invalid(format!("bad month in '{}'", dob)))?;
    let day: u32 = day
        .parse()
        .map_err(|_| invalid(format!("bad day in '{}'", dob)))?;

    if !(1..=12).contains(&month) {
        return Err(invalid(format!("month {} out of range", month)));
    }
    if day == 0 || day > days_in_month(year, month) {
        return Err(invalid(format!("day {} out of range", day)));
    }
    if year > HORIZON_YEAR {
        return Err(invalid(format!("birth year {} is after {}", year, HORIZON_YEAR)));
    }
    Ok((year, month, day))
}

/// Derive profile and mission from the form input.
pub fn issue(name: &str, dob: &str) -> Result<PassportRecord, TerraError> {
    let name = name.trim().to_uppercase();
    let Some(first_unit) = name.encode_utf16().next() else {
        return Err(invalid("name is empty"));
    };
    let (birth_year, month, day) = parse_dob(dob)?;

    let age_in_2050 = HORIZON_YEAR - birth_year;
    let seed = i64::from(first_unit)
        + i64::from(month) * 13
        + i64::from(day) * 7
        + i64::from(age_in_2050) * 5;

    let mission_index = usize::try_from(seed.rem_euclid(MISSIONS.len() as i64)).unwrap_or(0);
    let mission = &MISSIONS[mission_index];

    let prefix: String = name.chars().take(2).collect();
    let passport_id = format!(
        "{}-{}{:02}{:02}-{:04}",
        prefix,
        birth_year.rem_euclid(100),
        month,
        day,
        seed.rem_euclid(9999)
    );

    let profile = Profile {
        name,
        dob: format!("{:02}/{:02}/{}", day, month, birth_year),
        age_in_2050,
        birth_year,
        passport_id,
        source_dob: dob.trim().to_string(),
    };
    tracing::info!(passport = %profile.passport_id, mission = mission.key, "passport issued");

    Ok(PassportRecord {
        profile,
        mission_key: mission.key.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn derivation_is_deterministic() {
        let record = issue("  ada ", "1990-05-17").expect("issue");
        let p = &record.profile;
        assert_eq!(p.name, "ADA");
        assert_eq!(p.age_in_2050, 60);
        assert_eq!(p.dob, "17/05/1990");
        // seed = 65 + 5*13 + 17*7 + 60*5 = 549
        assert_eq!(p.passport_id, "AD-900517-0549");
        assert_eq!(record.mission_key, "ocean-guardian");
        assert_eq!(issue("ada", "1990-05-17").expect("issue"), record);
    }

    #[test]
    fn year_suffix_is_not_padded() {
        let record = issue("Zed", "2005-01-02").expect("issue");
        assert!(record.profile.passport_id.starts_with("ZE-50102-"));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(issue("   ", "1990-01-01"), Err(TerraError::InvalidPassport(_))));
        assert!(issue("a", "1990-13-01").is_err());
        assert!(issue("a", "1990-02-30").is_err());
        assert!(issue("a", "2051-01-01").is_err());
        assert!(issue("a", "90-01-01").is_err());
        assert!(issue("a", "2000-02-29").is_ok());
    }

    #[test]
    fn stored_record_restores_with_mission_fallback() {
        let record = issue("Lin", "1988-11-03").expect("issue");
        let mut stored = record.to_value();
        assert_eq!(PassportRecord::from_value(&stored), Some(record));

        stored["missionKey"] = json!("unknown");
        let restored = PassportRecord::from_value(&stored).expect("restore");
        assert_eq!(restored.mission_key, "solar-architect");

        assert!(PassportRecord::from_value(&json!({"missionKey": "x"})).is_none());
    }
}
