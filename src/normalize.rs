//! Canonicalisation of a validated request into solver-ready tables.
//!
//! All wall-clock reasoning happens here: shift and unavailability windows
//! are expanded into half-open minute spans on concrete days of the cyclic
//! week, so that the variable builder only ever consults boolean tables.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::domain::{
    DayOfWeek, ScheduleRequest, ShiftPreference, Staff, MINUTES_PER_DAY,
};

/// Half-open minute range `[start, end)` pinned to one day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySpan {
    pub day: usize,
    pub start: u16,
    pub end: u16,
}

/// Solver-ready view of one shift definition.
#[derive(Debug, Clone)]
pub struct ShiftSlot {
    pub name: String,
    pub start_minute: u16,
    pub end_minute: u16,
    pub hours_tenths: i64,
}

/// Canonical problem consumed by the variable and objective builders.
///
/// Staff, shifts and roles are addressed by index from here on; `demand`
/// holds only cells with `required > 0`.
#[derive(Debug)]
pub struct CanonicalProblem {
    pub staff: Vec<Staff>,
    /// Shift slots in definition (name) order.
    pub shifts: Vec<ShiftSlot>,
    /// Active roles, sorted: every role named by a staff member or by a
    /// demanded cell. Demanded roles with no qualified staff stay active so
    /// their shortages are reported.
    pub roles: Vec<String>,
    /// `(day, shift, role) → required`, demanded cells only.
    pub demand: BTreeMap<(usize, usize, usize), u32>,
    /// `(staff, day, shift)` tuples the staff member can work.
    pub available: HashSet<(usize, usize, usize)>,
    /// `(staff, role) → zero-based preference rank` (lower = preferred).
    pub role_rank: HashMap<(usize, usize), usize>,
    /// Same-day shift pairs `(a, b)` with `a.end == b.start`, by index.
    /// The first shift of a pair never wraps past midnight.
    pub consecutive_pairs: Vec<(usize, usize)>,
    pub shift_preference: ShiftPreference,
    /// Prioritised staff indices, strongest first, deduplicated.
    pub staff_priority: Vec<usize>,
}

pub fn normalize(request: &ScheduleRequest) -> CanonicalProblem {
    let staff = request.staff.clone();
    let staff_index: HashMap<&str, usize> = staff
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.as_str(), i))
        .collect();

    let shifts: Vec<ShiftSlot> = request
        .shift_definitions
        .iter()
        .map(|(name, times)| ShiftSlot {
            name: name.clone(),
            start_minute: times.start_minute,
            end_minute: times.end_minute,
            hours_tenths: times.hours_tenths,
        })
        .collect();
    let shift_index: HashMap<&str, usize> = shifts
        .iter()
        .enumerate()
        .map(|(i, s)| (s.name.as_str(), i))
        .collect();

    // Active roles: union of staff qualifications and demanded roles.
    let mut role_set = BTreeSet::new();
    for member in &staff {
        for role in &member.roles_in_preference_order {
            role_set.insert(role.clone());
        }
    }
    for day_needs in request.weekly_needs.values() {
        for shift_needs in day_needs.values() {
            for (role, &required) in shift_needs {
                if required > 0 {
                    role_set.insert(role.clone());
                }
            }
        }
    }
    let roles: Vec<String> = role_set.into_iter().collect();
    let role_index: HashMap<&str, usize> = roles
        .iter()
        .enumerate()
        .map(|(i, r)| (r.as_str(), i))
        .collect();

    // Demanded cells; `required == 0` entries behave as absent.
    let mut demand = BTreeMap::new();
    for (day, day_needs) in &request.weekly_needs {
        for (shift_name, shift_needs) in day_needs {
            let k = shift_index[shift_name.as_str()];
            for (role, &required) in shift_needs {
                if required > 0 {
                    demand.insert((day.index(), k, role_index[role.as_str()]), required);
                }
            }
        }
    }

    // Qualification ranks; the first occurrence of a repeated role wins.
    let mut role_rank = HashMap::new();
    for (s, member) in staff.iter().enumerate() {
        for (rank, role) in member.roles_in_preference_order.iter().enumerate() {
            if let Some(&r) = role_index.get(role.as_str()) {
                role_rank.entry((s, r)).or_insert(rank);
            }
        }
    }

    // Blocked minute spans per staff member, wrap expanded.
    let mut blocked: Vec<Vec<DaySpan>> = vec![Vec::new(); staff.len()];
    for entry in &request.unavailability {
        if let Some(&s) = staff_index.get(entry.staff_id.as_str()) {
            for window in &entry.windows {
                blocked[s].extend(day_spans(entry.day.index(), window.start, window.end));
            }
        }
    }

    let mut available = HashSet::new();
    for s in 0..staff.len() {
        for d in 0..DayOfWeek::ALL.len() {
            for (k, slot) in shifts.iter().enumerate() {
                let occupied = day_spans(d, slot.start_minute, slot.end_minute);
                let clash = blocked[s]
                    .iter()
                    .any(|b| occupied.iter().any(|o| spans_overlap(*o, *b)));
                if !clash {
                    available.insert((s, d, k));
                }
            }
        }
    }

    let mut consecutive_pairs = Vec::new();
    for (i, a) in shifts.iter().enumerate() {
        for (j, b) in shifts.iter().enumerate() {
            if i != j && a.start_minute < a.end_minute && a.end_minute == b.start_minute {
                consecutive_pairs.push((i, j));
            }
        }
    }

    let mut staff_priority = Vec::new();
    let mut seen = HashSet::new();
    for id in &request.staff_priority {
        if let Some(&s) = staff_index.get(id.as_str()) {
            if seen.insert(s) {
                staff_priority.push(s);
            }
        }
    }

    CanonicalProblem {
        staff,
        shifts,
        roles,
        demand,
        available,
        role_rank,
        consecutive_pairs,
        shift_preference: request.shift_preference,
        staff_priority,
    }
}

/// Expands a minute window on `day` into at most two day-pinned spans.
///
/// `end == start` is empty; `end < start` wraps into the following day of
/// the cyclic week (Sunday wraps into Monday).
pub fn day_spans(day: usize, start: u16, end: u16) -> Vec<DaySpan> {
    if start == end {
        return Vec::new();
    }
    if start < end {
        return vec![DaySpan { day, start, end }];
    }
    let mut spans = vec![DaySpan {
        day,
        start,
        end: MINUTES_PER_DAY,
    }];
    if end > 0 {
        spans.push(DaySpan {
            day: (day + 1) % DayOfWeek::ALL.len(),
            start: 0,
            end,
        });
    }
    spans
}

/// Half-open overlap on the same day; a point-touch does not count.
pub fn spans_overlap(a: DaySpan, b: DaySpan) -> bool {
    a.day == b.day && a.start < b.end && b.start < a.end
}
