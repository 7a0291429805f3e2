//! Request validation: the boundary between wire DTOs and the solver core.
//!
//! The core assumes well-formed input; everything preventable (malformed
//! times, duplicate ids, negative counts) is rejected here with a message
//! naming the offending field.

use chrono::{NaiveTime, Timelike};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::domain::{
    DayOfWeek, MinuteWindow, ScheduleRequest, ShiftTimes, Staff, Unavailability, WeeklyNeeds,
};
use crate::dto::ScheduleRequestDto;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("staffList must not be empty")]
    EmptyStaffList,
    #[error("staff entry {index} is missing an id")]
    MissingStaffId { index: usize },
    #[error("duplicate staff id `{id}` in staffList")]
    DuplicateStaffId { id: String },
    #[error("staff `{id}`: minHoursPerWeek {min} exceeds maxHoursPerWeek {max}")]
    MinAboveMax { id: String, min: u32, max: u32 },
    #[error("shiftDefinitions must not be empty")]
    EmptyShiftDefinitions,
    #[error("invalid time `{value}` in {field} (expected zero-padded HH:MM)")]
    InvalidTime { field: String, value: String },
    #[error("shift `{shift}`: hours must be a non-negative number")]
    InvalidHours { shift: String },
    #[error("unknown day `{day}` in weeklyNeeds")]
    UnknownDay { day: String },
    #[error("weeklyNeeds for {day} references undefined shift `{shift}`")]
    UnknownShift { day: String, shift: String },
    #[error("required count for {day}/{shift}/{role} must be non-negative")]
    NegativeRequired {
        day: String,
        shift: String,
        role: String,
    },
    #[error("unknown staff ids in staffPriority: {ids}")]
    UnknownPriorityIds { ids: String },
}

/// Checks a request DTO and converts it into the typed core request.
pub fn validate(dto: &ScheduleRequestDto) -> Result<ScheduleRequest, ValidationError> {
    if dto.staff_list.is_empty() {
        return Err(ValidationError::EmptyStaffList);
    }

    let mut staff = Vec::with_capacity(dto.staff_list.len());
    let mut seen_ids = HashSet::new();
    for (index, entry) in dto.staff_list.iter().enumerate() {
        if entry.id.is_empty() {
            return Err(ValidationError::MissingStaffId { index });
        }
        if !seen_ids.insert(entry.id.clone()) {
            return Err(ValidationError::DuplicateStaffId {
                id: entry.id.clone(),
            });
        }
        if let (Some(min), Some(max)) = (entry.min_hours_per_week, entry.max_hours_per_week) {
            if min > max {
                return Err(ValidationError::MinAboveMax {
                    id: entry.id.clone(),
                    min,
                    max,
                });
            }
        }
        let name = if entry.name.is_empty() {
            entry.id.clone()
        } else {
            entry.name.clone()
        };
        staff.push(Staff {
            id: entry.id.clone(),
            name,
            roles_in_preference_order: entry.roles_in_preference_order.clone(),
            min_hours_per_week: entry.min_hours_per_week,
            max_hours_per_week: entry.max_hours_per_week,
        });
    }

    if dto.shift_definitions.is_empty() {
        return Err(ValidationError::EmptyShiftDefinitions);
    }
    let mut shift_definitions = BTreeMap::new();
    for (shift_name, def) in &dto.shift_definitions {
        let start_minute = parse_time(&def.start, || format!("shiftDefinitions.{shift_name}.start"))?;
        let end_minute = parse_time(&def.end, || format!("shiftDefinitions.{shift_name}.end"))?;
        if !def.hours.is_finite() || def.hours < 0.0 {
            return Err(ValidationError::InvalidHours {
                shift: shift_name.clone(),
            });
        }
        shift_definitions.insert(
            shift_name.clone(),
            ShiftTimes {
                start_minute,
                end_minute,
                hours_tenths: (def.hours * 10.0).round() as i64,
            },
        );
    }

    let mut weekly_needs: WeeklyNeeds = BTreeMap::new();
    for (day_label, day_needs) in &dto.weekly_needs {
        let day: DayOfWeek = day_label
            .parse()
            .map_err(|()| ValidationError::UnknownDay {
                day: day_label.clone(),
            })?;
        for (shift_name, shift_needs) in day_needs {
            if !shift_definitions.contains_key(shift_name) {
                return Err(ValidationError::UnknownShift {
                    day: day_label.clone(),
                    shift: shift_name.clone(),
                });
            }
            for (role, &required) in shift_needs {
                if required < 0 {
                    return Err(ValidationError::NegativeRequired {
                        day: day_label.clone(),
                        shift: shift_name.clone(),
                        role: role.clone(),
                    });
                }
                weekly_needs
                    .entry(day)
                    .or_default()
                    .entry(shift_name.clone())
                    .or_default()
                    .insert(role.clone(), required as u32);
            }
        }
    }

    // Unavailability entries naming unknown staff or day labels are dropped,
    // not rejected; they cannot affect any assignment.
    let mut unavailability = Vec::new();
    for entry in &dto.unavailability_list {
        if !seen_ids.contains(&entry.employee_id) {
            continue;
        }
        let Ok(day) = entry.day_of_week.parse::<DayOfWeek>() else {
            continue;
        };
        let mut windows = Vec::with_capacity(entry.shifts.len());
        for (i, window) in entry.shifts.iter().enumerate() {
            let field = |part: &str| {
                format!(
                    "unavailabilityList[{}].shifts[{i}].{part}",
                    entry.employee_id
                )
            };
            let start = parse_time(&window.start, || field("start"))?;
            let end = parse_time(&window.end, || field("end"))?;
            windows.push(MinuteWindow::new(start, end));
        }
        unavailability.push(Unavailability {
            staff_id: entry.employee_id.clone(),
            day,
            windows,
        });
    }

    let unknown_priority: Vec<&str> = dto
        .staff_priority
        .iter()
        .filter(|id| !seen_ids.contains(id.as_str()))
        .map(String::as_str)
        .collect();
    if !unknown_priority.is_empty() {
        return Err(ValidationError::UnknownPriorityIds {
            ids: unknown_priority.join(", "),
        });
    }

    Ok(ScheduleRequest {
        staff,
        unavailability,
        weekly_needs,
        shift_definitions,
        shift_preference: dto.shift_preference,
        staff_priority: dto.staff_priority.clone(),
    })
}

/// Parses a zero-padded `HH:MM` string into minutes since midnight.
///
/// `24:00` is rejected; a midnight end is expressed through wrap semantics.
fn parse_time(
    value: &str,
    field: impl Fn() -> String,
) -> Result<u16, ValidationError> {
    let invalid = || ValidationError::InvalidTime {
        field: field(),
        value: value.to_string(),
    };
    if value.len() != 5 {
        return Err(invalid());
    }
    let time = NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| invalid())?;
    Ok((time.hour() * 60 + time.minute()) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{ShiftDefinitionDto, StaffDto, TimeWindowDto, UnavailabilityDto};

    fn staff_dto(id: &str, roles: &[&str]) -> StaffDto {
        StaffDto {
            id: id.to_string(),
            name: String::new(),
            roles_in_preference_order: roles.iter().map(|r| r.to_string()).collect(),
            min_hours_per_week: None,
            max_hours_per_week: None,
        }
    }

    fn base_dto() -> ScheduleRequestDto {
        let mut shift_definitions = BTreeMap::new();
        shift_definitions.insert(
            "HALF_DAY_AM".to_string(),
            ShiftDefinitionDto {
                start: "11:00".to_string(),
                end: "16:00".to_string(),
                hours: 5.0,
            },
        );
        ScheduleRequestDto {
            staff_list: vec![staff_dto("alice", &["Server"])],
            unavailability_list: vec![],
            weekly_needs: BTreeMap::new(),
            shift_definitions,
            shift_preference: Default::default(),
            staff_priority: vec![],
        }
    }

    #[test]
    fn test_valid_request_converts() {
        let mut dto = base_dto();
        dto.weekly_needs
            .entry("Monday".to_string())
            .or_default()
            .entry("HALF_DAY_AM".to_string())
            .or_default()
            .insert("Server".to_string(), 2);

        let request = validate(&dto).unwrap();
        assert_eq!(request.staff.len(), 1);
        // Name falls back to the id when omitted.
        assert_eq!(request.staff[0].name, "alice");
        let times = &request.shift_definitions["HALF_DAY_AM"];
        assert_eq!(times.start_minute, 660);
        assert_eq!(times.end_minute, 960);
        assert_eq!(times.hours_tenths, 50);
        assert_eq!(
            request.weekly_needs[&DayOfWeek::Monday]["HALF_DAY_AM"]["Server"],
            2
        );
    }

    #[test]
    fn test_empty_staff_rejected() {
        let mut dto = base_dto();
        dto.staff_list.clear();
        assert_eq!(validate(&dto), Err(ValidationError::EmptyStaffList));
    }

    #[test]
    fn test_duplicate_staff_id_rejected() {
        let mut dto = base_dto();
        dto.staff_list.push(staff_dto("alice", &["Cashier"]));
        assert_eq!(
            validate(&dto),
            Err(ValidationError::DuplicateStaffId {
                id: "alice".to_string()
            })
        );
    }

    #[test]
    fn test_min_above_max_rejected() {
        let mut dto = base_dto();
        dto.staff_list[0].min_hours_per_week = Some(30);
        dto.staff_list[0].max_hours_per_week = Some(20);
        let err = validate(&dto).unwrap_err();
        assert!(matches!(err, ValidationError::MinAboveMax { min: 30, max: 20, .. }));
    }

    #[test]
    fn test_bad_times_rejected() {
        for bad in ["24:00", "7:30", "11:60", "nope", "11-00"] {
            let mut dto = base_dto();
            dto.shift_definitions.get_mut("HALF_DAY_AM").unwrap().start = bad.to_string();
            assert!(
                matches!(validate(&dto), Err(ValidationError::InvalidTime { .. })),
                "`{bad}` should be rejected"
            );
        }
    }

    #[test]
    fn test_unknown_needs_shift_rejected() {
        let mut dto = base_dto();
        dto.weekly_needs
            .entry("Monday".to_string())
            .or_default()
            .entry("NIGHT".to_string())
            .or_default()
            .insert("Server".to_string(), 1);
        assert!(matches!(
            validate(&dto),
            Err(ValidationError::UnknownShift { .. })
        ));
    }

    #[test]
    fn test_unknown_needs_day_rejected() {
        let mut dto = base_dto();
        dto.weekly_needs
            .entry("Funday".to_string())
            .or_default()
            .entry("HALF_DAY_AM".to_string())
            .or_default()
            .insert("Server".to_string(), 1);
        assert!(matches!(validate(&dto), Err(ValidationError::UnknownDay { .. })));
    }

    #[test]
    fn test_negative_required_rejected() {
        let mut dto = base_dto();
        dto.weekly_needs
            .entry("Monday".to_string())
            .or_default()
            .entry("HALF_DAY_AM".to_string())
            .or_default()
            .insert("Server".to_string(), -1);
        assert!(matches!(
            validate(&dto),
            Err(ValidationError::NegativeRequired { .. })
        ));
    }

    #[test]
    fn test_unknown_priority_id_rejected() {
        let mut dto = base_dto();
        dto.staff_priority = vec!["ghost".to_string()];
        assert_eq!(
            validate(&dto),
            Err(ValidationError::UnknownPriorityIds {
                ids: "ghost".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_unavailability_entries_dropped() {
        let mut dto = base_dto();
        dto.unavailability_list = vec![
            UnavailabilityDto {
                employee_id: "ghost".to_string(),
                day_of_week: "Monday".to_string(),
                shifts: vec![],
            },
            UnavailabilityDto {
                employee_id: "alice".to_string(),
                day_of_week: "Blursday".to_string(),
                shifts: vec![],
            },
            UnavailabilityDto {
                employee_id: "alice".to_string(),
                day_of_week: "Monday".to_string(),
                shifts: vec![TimeWindowDto {
                    start: "09:00".to_string(),
                    end: "12:00".to_string(),
                }],
            },
        ];
        let request = validate(&dto).unwrap();
        assert_eq!(request.unavailability.len(), 1);
        assert_eq!(request.unavailability[0].day, DayOfWeek::Monday);
        assert_eq!(
            request.unavailability[0].windows,
            vec![MinuteWindow::new(540, 720)]
        );
    }
}
