//! Domain model for restaurant shift scheduling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Minutes in one calendar day; minute-of-day values lie in `[0, 1440)`.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// The seven days of the scheduling week, in week order.
///
/// The derived `Ord` follows declaration order, so collections keyed by
/// `DayOfWeek` iterate Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    /// Zero-based position in the week (Monday = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::str::FromStr for DayOfWeek {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayOfWeek::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the objective treats split versus combined working days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftPreference {
    /// Prefer staff covering both shifts of a contiguous pair.
    #[default]
    #[serde(rename = "PRIORITIZE_FULL_DAYS")]
    FullDays,
    /// Prefer staff covering exactly one shift of a contiguous pair.
    #[serde(rename = "PRIORITIZE_HALF_DAYS")]
    HalfDays,
    /// Indifferent.
    #[serde(rename = "NONE")]
    None,
}

/// A staff member who can be assigned to shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub name: String,
    /// Qualified roles, most preferred first.
    pub roles_in_preference_order: Vec<String>,
    pub min_hours_per_week: Option<u32>,
    /// Absent means no upper bound.
    pub max_hours_per_week: Option<u32>,
}

impl Staff {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            roles_in_preference_order: roles.into_iter().map(Into::into).collect(),
            min_hours_per_week: None,
            max_hours_per_week: None,
        }
    }

    pub fn with_min_hours(mut self, hours: u32) -> Self {
        self.min_hours_per_week = Some(hours);
        self
    }

    pub fn with_max_hours(mut self, hours: u32) -> Self {
        self.max_hours_per_week = Some(hours);
        self
    }
}

/// Half-open minute-of-day window `[start, end)`.
///
/// `end < start` wraps past midnight into the following day;
/// `end == start` is an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinuteWindow {
    pub start: u16,
    pub end: u16,
}

impl MinuteWindow {
    pub fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn wraps(self) -> bool {
        self.end < self.start
    }
}

/// Windows during which one staff member cannot work, anchored to one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unavailability {
    pub staff_id: String,
    pub day: DayOfWeek,
    pub windows: Vec<MinuteWindow>,
}

/// Times and paid hours of one named shift. `hours_tenths` is authoritative
/// for the objective and the weekly-hour constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftTimes {
    pub start_minute: u16,
    pub end_minute: u16,
    pub hours_tenths: i64,
}

/// Weekly demand: day → shift → role → required head-count.
pub type WeeklyNeeds = BTreeMap<DayOfWeek, BTreeMap<String, BTreeMap<String, u32>>>;

/// A validated scheduling request, ready for the solver core.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRequest {
    pub staff: Vec<Staff>,
    pub unavailability: Vec<Unavailability>,
    pub weekly_needs: WeeklyNeeds,
    /// Shift name → times, iterated in name order.
    pub shift_definitions: BTreeMap<String, ShiftTimes>,
    pub shift_preference: ShiftPreference,
    /// Staff ids with stronger scheduling pressure, strongest first.
    pub staff_priority: Vec<String>,
}

/// Generated assignments: day → shift → role → staff ids.
///
/// Cells with no assignment are absent rather than empty.
pub type Schedule = BTreeMap<DayOfWeek, BTreeMap<String, BTreeMap<String, Vec<String>>>>;

/// A soft-constraint gap worth surfacing to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A demanded cell was left under-staffed.
    DemandShortage {
        day: DayOfWeek,
        shift: String,
        role: String,
        missing: u32,
    },
    /// A staff member was scheduled below their weekly minimum.
    MinHoursShortage {
        staff_name: String,
        target_tenths: i64,
        achieved_tenths: i64,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DemandShortage {
                day,
                shift,
                role,
                missing,
            } => {
                write!(f, "Shortage of {missing} for {role} on {day} {shift}.")
            }
            Warning::MinHoursShortage {
                staff_name,
                target_tenths,
                achieved_tenths,
            } => {
                write!(
                    f,
                    "Staff {staff_name} scheduled for {}h, below minimum {}h (missing {}h).",
                    fmt_tenths(*achieved_tenths),
                    fmt_tenths(*target_tenths),
                    fmt_tenths(target_tenths - achieved_tenths),
                )
            }
        }
    }
}

/// One-decimal rendering of an hour count stored in tenths.
fn fmt_tenths(tenths: i64) -> String {
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// A successfully generated weekly schedule.
#[derive(Debug, Clone)]
pub struct SolvedSchedule {
    pub schedule: Schedule,
    pub warnings: Vec<Warning>,
    pub calculation_time_ms: u64,
}

/// Result of one solve call.
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    Solved(SolvedSchedule),
    /// The hard constraints admit no assignment.
    Infeasible { message: String },
    /// Internal failure (invalid or unbounded model, backend error).
    Error { message: String },
}
