//! DTOs for REST API requests/responses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{Schedule, ShiftPreference, SolvedSchedule};

/// Staff member as submitted by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffDto {
    pub id: String,
    /// Display name; falls back to the id when omitted.
    #[serde(default)]
    pub name: String,
    pub roles_in_preference_order: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_hours_per_week: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hours_per_week: Option<u32>,
}

/// A `[start, end)` wall-clock window; `end <= start` continues into the
/// next day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindowDto {
    /// Zero-padded `HH:MM`.
    pub start: String,
    /// Zero-padded `HH:MM`.
    pub end: String,
}

/// Blocked windows for one staff member on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailabilityDto {
    pub employee_id: String,
    /// Day label, e.g. `"Monday"`.
    pub day_of_week: String,
    pub shifts: Vec<TimeWindowDto>,
}

/// Start/end times and paid hours of one named shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDefinitionDto {
    pub start: String,
    pub end: String,
    /// May carry one decimal, e.g. `7.5`.
    pub hours: f64,
}

/// Demand counts as submitted: day → shift → role → required.
///
/// Counts are kept signed here so that negative submissions reach the
/// validator instead of failing opaquely in deserialization.
pub type WeeklyNeedsDto = BTreeMap<String, BTreeMap<String, BTreeMap<String, i64>>>;

/// The full scheduling request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequestDto {
    pub staff_list: Vec<StaffDto>,
    #[serde(default)]
    pub unavailability_list: Vec<UnavailabilityDto>,
    #[serde(default)]
    pub weekly_needs: WeeklyNeedsDto,
    pub shift_definitions: BTreeMap<String, ShiftDefinitionDto>,
    #[serde(default)]
    pub shift_preference: ShiftPreference,
    #[serde(default)]
    pub staff_priority: Vec<String>,
}

/// Response body for `POST /api/schedule`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ScheduleResponseDto {
    #[serde(rename_all = "camelCase")]
    Solved {
        success: bool,
        schedule: Schedule,
        warnings: Vec<String>,
        calculation_time_ms: u64,
    },
    #[serde(rename_all = "camelCase")]
    Failed { success: bool, message: String },
}

impl ScheduleResponseDto {
    pub fn solved(result: SolvedSchedule) -> Self {
        ScheduleResponseDto::Solved {
            success: true,
            schedule: result.schedule,
            warnings: result.warnings.iter().map(ToString::to_string).collect(),
            calculation_time_ms: result.calculation_time_ms,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ScheduleResponseDto::Failed {
            success: false,
            message: message.into(),
        }
    }
}
