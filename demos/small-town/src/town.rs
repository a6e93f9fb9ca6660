//! Synthetic town: households on a grid, a few schools, and workplaces.

use anyhow::Result;

use epi_core::{EpiRng, GeoPoint, MixingGroupKind, PlaceId, SimRng};
use epi_world::{PlaceRegistry, PopulationStore, WorldBuilder};

use crate::TownConfig;

// Grid origin and spacing (~0.5 km).
const ORIGIN_LAT: f32 = 40.44;
const ORIGIN_LON: f32 = -79.99;
const STEP_DEG:   f32 = 0.0045;

/// Build the town.  Children (under 18) attend a school, adults under 65
/// work; everyone lives in a household.
pub fn build_town(cfg: &TownConfig, seed: u64) -> Result<(PopulationStore, PlaceRegistry)> {
    let mut rng = SimRng::new(seed);
    let mut world = WorldBuilder::new();

    let schools: Vec<PlaceId> = (0..cfg.schools)
        .map(|i| world.add_place(format!("school-{i}"), MixingGroupKind::School, None))
        .collect();
    let workplaces: Vec<PlaceId> = (0..cfg.workplaces)
        .map(|i| world.add_place(format!("work-{i}"), MixingGroupKind::Workplace, None))
        .collect();

    let side = (cfg.households as f64).sqrt().ceil() as usize;
    for h in 0..cfg.households {
        let location = GeoPoint::new(
            ORIGIN_LAT + STEP_DEG * (h / side.max(1)) as f32,
            ORIGIN_LON + STEP_DEG * (h % side.max(1)) as f32,
        );
        let home = world.add_place(format!("household-{h}"), MixingGroupKind::Household, Some(location));

        let size = 1 + rng.below(cfg.max_household_size.max(1));
        for _ in 0..size {
            let age = (rng.uniform() * 90.0).floor();
            let mut places = vec![home];
            if age < 18.0 {
                if let Some(&school) = pick(&schools, &mut rng) {
                    places.push(school);
                }
            } else if age < 65.0 {
                if let Some(&work) = pick(&workplaces, &mut rng) {
                    places.push(work);
                }
            }
            world.add_agent(age, &places)?;
        }
    }
    Ok(world.build())
}

fn pick<'a>(places: &'a [PlaceId], rng: &mut dyn EpiRng) -> Option<&'a PlaceId> {
    if places.is_empty() {
        return None;
    }
    places.get(rng.below(places.len()))
}
