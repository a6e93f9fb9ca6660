//! Place registry: mixing groups, presence, and per-day infection markers.
//!
//! # Layout
//!
//! Places are stored SoA by `PlaceId` (kind, location, members).  A second
//! index lists the places of each [`MixingGroupKind`] in id order, which is
//! the order the daily spread step visits them.  Households with a location
//! are bulk-loaded into an R-tree for radius queries during importation.
//!
//! # Presence
//!
//! An agent is present at a place on a day when it is a member, the place
//! is not closed that day, and, if weekend closures are on, the day is not
//! a weekend for a school/classroom/workplace/office.  Day 0 is a Monday.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::{FxHashMap, FxHashSet};

use epi_core::{
    AgentId, Day, DiseaseId, GeoPoint, GroupInfectionCounts, MixingGroupKind, PlaceId, Places,
};

const KINDS: usize = MixingGroupKind::ALL.len();

// ── R-tree household entry ────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct HouseholdEntry {
    point: [f32; 2],
    id:    PlaceId,
}

impl RTreeObject for HouseholdEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for HouseholdEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── Closures & stats ──────────────────────────────────────────────────────────

/// Every place of `kind` is closed on days `start..=end`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Closure {
    pub kind:  MixingGroupKind,
    pub start: Day,
    pub end:   Day,
}

impl Closure {
    #[inline]
    pub fn covers(&self, kind: MixingGroupKind, day: Day) -> bool {
        self.kind == kind && self.start <= day && day <= self.end
    }
}

/// Infection counters of one (place, disease) pair.  Daily fields hold the
/// values of `day` only.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupStats {
    pub day:                   Day,
    pub new_infections:        u32,
    pub symptomatic:           u32,
    pub new_symptomatic:       u32,
    pub case_fatalities:       u32,
    pub total_infections:      u32,
    pub total_case_fatalities: u32,
}

impl GroupStats {
    fn roll_to(&mut self, day: Day) {
        if self.day != day {
            self.day = day;
            self.new_infections = 0;
            self.symptomatic = 0;
            self.new_symptomatic = 0;
            self.case_fatalities = 0;
        }
    }
}

// ── PlaceRegistry ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct PlaceRegistry {
    pub kinds:      Vec<MixingGroupKind>,
    pub locations:  Vec<Option<GeoPoint>>,
    pub labels:     Vec<String>,
    members:        Vec<Vec<AgentId>>,
    enrolled:       FxHashSet<(PlaceId, AgentId)>,
    by_kind:        [Vec<PlaceId>; KINDS],
    household_idx:  RTree<HouseholdEntry>,
    closures:       Vec<Closure>,
    weekend_closed: bool,
    infectious:     FxHashMap<(PlaceId, DiseaseId), Vec<AgentId>>,
    vectors:        FxHashMap<(PlaceId, DiseaseId), u32>,
    stats:          FxHashMap<(PlaceId, DiseaseId), GroupStats>,
}

impl PlaceRegistry {
    /// Assemble the registry; `members[p]` are the members of place `p`.
    pub(crate) fn new(
        kinds:     Vec<MixingGroupKind>,
        locations: Vec<Option<GeoPoint>>,
        labels:    Vec<String>,
        members:   Vec<Vec<AgentId>>,
    ) -> Self {
        let mut by_kind: [Vec<PlaceId>; KINDS] = Default::default();
        let mut entries = Vec::new();
        for (i, &kind) in kinds.iter().enumerate() {
            let id = PlaceId(i as u32);
            by_kind[kind.index()].push(id);
            if let (MixingGroupKind::Household, Some(p)) = (kind, locations[i]) {
                entries.push(HouseholdEntry { point: [p.lat, p.lon], id });
            }
        }

        let enrolled = members
            .iter()
            .enumerate()
            .flat_map(|(i, list)| list.iter().map(move |&a| (PlaceId(i as u32), a)))
            .collect();

        Self {
            kinds,
            locations,
            labels,
            members,
            enrolled,
            by_kind,
            household_idx:  RTree::bulk_load(entries),
            closures:       Vec::new(),
            weekend_closed: false,
            infectious:     FxHashMap::default(),
            vectors:        FxHashMap::default(),
            stats:          FxHashMap::default(),
        }
    }

    pub fn label(&self, place: PlaceId) -> &str {
        self.labels.get(place.index()).map_or("", String::as_str)
    }

    pub fn close(&mut self, closure: Closure) {
        self.closures.push(closure);
    }

    /// Close schools, classrooms, workplaces and offices on weekends.
    pub fn set_weekend_closures(&mut self, closed: bool) {
        self.weekend_closed = closed;
    }

    pub fn is_open(&self, place: PlaceId, day: Day) -> bool {
        let kind = self.kinds[place.index()];
        if self.closures.iter().any(|c| c.covers(kind, day)) {
            return false;
        }
        !(self.weekend_closed && is_weekend(day) && closes_on_weekends(kind))
    }

    pub fn set_infectious_vectors(&mut self, place: PlaceId, disease: DiseaseId, count: u32) {
        if count == 0 {
            self.vectors.remove(&(place, disease));
        } else {
            self.vectors.insert((place, disease), count);
        }
    }

    pub fn group_stats(&self, place: PlaceId, disease: DiseaseId) -> Option<&GroupStats> {
        self.stats.get(&(place, disease))
    }

    fn stats_for(&mut self, day: Day, place: PlaceId, disease: DiseaseId) -> &mut GroupStats {
        let stats = self.stats.entry((place, disease)).or_default();
        stats.roll_to(day);
        stats
    }
}

impl Places for PlaceRegistry {
    fn place_count(&self) -> usize {
        self.kinds.len()
    }

    fn kind(&self, place: PlaceId) -> MixingGroupKind {
        self.kinds[place.index()]
    }

    fn members(&self, place: PlaceId) -> &[AgentId] {
        self.members.get(place.index()).map_or(&[], Vec::as_slice)
    }

    fn location(&self, place: PlaceId) -> Option<GeoPoint> {
        self.locations.get(place.index()).copied().flatten()
    }

    fn places_of_kind(&self, kind: MixingGroupKind) -> &[PlaceId] {
        &self.by_kind[kind.index()]
    }

    fn households_within(&self, center: GeoPoint, radius_km: Option<f64>) -> Vec<PlaceId> {
        let Some(radius) = radius_km else {
            return self.by_kind[MixingGroupKind::Household.index()].clone();
        };
        let radius = radius as f32;
        let (d_lat, d_lon) = center.bbox_half_degrees(radius);
        let envelope = AABB::from_corners(
            [center.lat - d_lat, center.lon - d_lon],
            [center.lat + d_lat, center.lon + d_lon],
        );
        let mut found: Vec<PlaceId> = self
            .household_idx
            .locate_in_envelope(&envelope)
            .filter(|e| center.distance_km(GeoPoint::new(e.point[0], e.point[1])) <= radius)
            .map(|e| e.id)
            .collect();
        found.sort_unstable();
        found
    }

    fn is_present(&self, day: Day, agent: AgentId, place: PlaceId) -> bool {
        self.enrolled.contains(&(place, agent)) && self.is_open(place, day)
    }

    fn add_infectious_person(&mut self, place: PlaceId, disease: DiseaseId, agent: AgentId) {
        let list = self.infectious.entry((place, disease)).or_default();
        if !list.contains(&agent) {
            list.push(agent);
        }
    }

    fn clear_infectious_people(&mut self, place: PlaceId, disease: DiseaseId) {
        self.infectious.remove(&(place, disease));
    }

    fn infectious_people(&self, place: PlaceId, disease: DiseaseId) -> &[AgentId] {
        self.infectious.get(&(place, disease)).map_or(&[], Vec::as_slice)
    }

    fn infectious_vectors(&self, place: PlaceId, disease: DiseaseId) -> u32 {
        self.vectors.get(&(place, disease)).copied().unwrap_or(0)
    }

    fn record_infection_counts(
        &mut self,
        day:     Day,
        place:   PlaceId,
        disease: DiseaseId,
        counts:  GroupInfectionCounts,
    ) {
        let stats = self.stats_for(day, place, disease);
        if counts.newly_infected {
            stats.new_infections += 1;
            stats.total_infections += 1;
        }
        if counts.symptomatic {
            stats.symptomatic += 1;
        }
        if counts.newly_symptomatic {
            stats.new_symptomatic += 1;
        }
    }

    fn record_case_fatality(&mut self, day: Day, place: PlaceId, disease: DiseaseId) {
        let stats = self.stats_for(day, place, disease);
        stats.case_fatalities += 1;
        stats.total_case_fatalities += 1;
    }
}

#[inline]
fn is_weekend(day: Day) -> bool {
    day.0.rem_euclid(7) >= 5
}

fn closes_on_weekends(kind: MixingGroupKind) -> bool {
    matches!(
        kind,
        MixingGroupKind::School
            | MixingGroupKind::Classroom
            | MixingGroupKind::Workplace
            | MixingGroupKind::Office
    )
}
