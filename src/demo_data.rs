//! Demo data generators for the scheduling API.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

use crate::domain::DayOfWeek;
use crate::dto::{
    ScheduleRequestDto, ShiftDefinitionDto, StaffDto, TimeWindowDto, UnavailabilityDto,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoData {
    Small,
    Large,
}

impl std::str::FromStr for DemoData {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMALL" => Ok(DemoData::Small),
            "LARGE" => Ok(DemoData::Large),
            _ => Err(()),
        }
    }
}

impl DemoData {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoData::Small => "SMALL",
            DemoData::Large => "LARGE",
        }
    }

    fn parameters(&self) -> DemoDataParameters {
        match self {
            DemoData::Small => DemoDataParameters {
                staff_count: 6,
                roles: vec!["Server", "Cashier", "Expo"],
                max_required_per_role: 2,
                unavailable_day_chance: 0.25,
                priority_count: 1,
            },
            DemoData::Large => DemoDataParameters {
                staff_count: 20,
                roles: vec!["Server", "Cashier", "Expo", "Cook"],
                max_required_per_role: 4,
                unavailable_day_chance: 0.35,
                priority_count: 3,
            },
        }
    }
}

struct DemoDataParameters {
    staff_count: usize,
    roles: Vec<&'static str>,
    max_required_per_role: u32,
    unavailable_day_chance: f64,
    priority_count: usize,
}

/// List of available demo data sets.
pub fn list_demo_data() -> Vec<&'static str> {
    vec!["SMALL", "LARGE"]
}

/// Generates a ready-to-post scheduling request for the given size.
pub fn generate(demo: DemoData) -> ScheduleRequestDto {
    let params = demo.parameters();
    let mut rng = StdRng::seed_from_u64(0);

    // The classic restaurant split: AM touches PM, so the pair is a
    // full-day candidate.
    let mut shift_definitions = BTreeMap::new();
    shift_definitions.insert(
        "HALF_DAY_AM".to_string(),
        ShiftDefinitionDto {
            start: "11:00".to_string(),
            end: "16:00".to_string(),
            hours: 5.0,
        },
    );
    shift_definitions.insert(
        "HALF_DAY_PM".to_string(),
        ShiftDefinitionDto {
            start: "16:00".to_string(),
            end: "21:00".to_string(),
            hours: 5.0,
        },
    );

    let names = generate_name_permutations(&mut rng);
    let mut staff_list = Vec::with_capacity(params.staff_count);
    for i in 0..params.staff_count {
        let role_count = rng.gen_range(1..=params.roles.len().min(3));
        let mut roles: Vec<String> = params
            .roles
            .choose_multiple(&mut rng, role_count)
            .map(|r| r.to_string())
            .collect();
        roles.shuffle(&mut rng);

        let max_hours = if rng.gen_bool(0.7) {
            Some(*[30u32, 40, 50].choose(&mut rng).unwrap())
        } else {
            None
        };
        let min_hours = if rng.gen_bool(0.4) { Some(10) } else { None };

        staff_list.push(StaffDto {
            id: format!("staff-{i}"),
            name: names[i % names.len()].clone(),
            roles_in_preference_order: roles,
            min_hours_per_week: min_hours,
            max_hours_per_week: max_hours,
        });
    }

    let mut weekly_needs: BTreeMap<String, BTreeMap<String, BTreeMap<String, i64>>> =
        BTreeMap::new();
    for day in DayOfWeek::ALL {
        for shift in ["HALF_DAY_AM", "HALF_DAY_PM"] {
            for role in &params.roles {
                let required = rng.gen_range(0..=params.max_required_per_role) as i64;
                if required > 0 {
                    weekly_needs
                        .entry(day.as_str().to_string())
                        .or_default()
                        .entry(shift.to_string())
                        .or_default()
                        .insert(role.to_string(), required);
                }
            }
        }
    }

    let mut unavailability_list = Vec::new();
    for member in &staff_list {
        for day in DayOfWeek::ALL {
            if rng.gen_bool(params.unavailable_day_chance) {
                let window = match rng.gen_range(0..3) {
                    // Whole working day off.
                    0 => TimeWindowDto {
                        start: "09:00".to_string(),
                        end: "23:00".to_string(),
                    },
                    // Evening off.
                    1 => TimeWindowDto {
                        start: "16:00".to_string(),
                        end: "23:00".to_string(),
                    },
                    // Late night into the next morning.
                    _ => TimeWindowDto {
                        start: "22:00".to_string(),
                        end: "02:00".to_string(),
                    },
                };
                unavailability_list.push(UnavailabilityDto {
                    employee_id: member.id.clone(),
                    day_of_week: day.as_str().to_string(),
                    shifts: vec![window],
                });
            }
        }
    }

    let staff_priority = staff_list
        .iter()
        .take(params.priority_count)
        .map(|s| s.id.clone())
        .collect();

    ScheduleRequestDto {
        staff_list,
        unavailability_list,
        weekly_needs,
        shift_definitions,
        shift_preference: Default::default(),
        staff_priority,
    }
}

const FIRST_NAMES: &[&str] = &[
    "Amy", "Beth", "Carl", "Dan", "Elsa", "Flo", "Gus", "Hugo", "Ivy", "Jay",
];
const LAST_NAMES: &[&str] = &[
    "Cole", "Fox", "Green", "Jones", "King", "Li", "Poe", "Rye", "Smith", "Watt",
];

fn generate_name_permutations(rng: &mut StdRng) -> Vec<String> {
    let mut names = Vec::with_capacity(FIRST_NAMES.len() * LAST_NAMES.len());
    for first in FIRST_NAMES {
        for last in LAST_NAMES {
            names.push(format!("{} {}", first, last));
        }
    }
    names.shuffle(rng);
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate;

    #[test]
    fn test_generate_small() {
        let dto = generate(DemoData::Small);
        assert_eq!(dto.staff_list.len(), 6);
        assert_eq!(dto.shift_definitions.len(), 2);
        assert!(!dto.weekly_needs.is_empty());
    }

    #[test]
    fn test_generate_large() {
        let dto = generate(DemoData::Large);
        assert_eq!(dto.staff_list.len(), 20);
        assert_eq!(dto.staff_priority.len(), 3);
    }

    #[test]
    fn test_demo_data_validates() {
        for demo in [DemoData::Small, DemoData::Large] {
            let dto = generate(demo);
            validate::validate(&dto).expect("demo data must pass validation");
        }
    }

    #[test]
    fn test_demo_data_is_deterministic() {
        let a = serde_json::to_string(&generate(DemoData::Small)).unwrap();
        let b = serde_json::to_string(&generate(DemoData::Small)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_demo_data_from_str() {
        assert_eq!("SMALL".parse::<DemoData>(), Ok(DemoData::Small));
        assert_eq!("small".parse::<DemoData>(), Ok(DemoData::Small));
        assert_eq!("LARGE".parse::<DemoData>(), Ok(DemoData::Large));
        assert!("invalid".parse::<DemoData>().is_err());
    }

    #[test]
    fn test_every_staff_has_a_role() {
        let dto = generate(DemoData::Large);
        for member in &dto.staff_list {
            assert!(
                !member.roles_in_preference_order.is_empty(),
                "staff {} has no roles",
                member.id
            );
        }
    }
}
