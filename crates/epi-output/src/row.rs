//! Plain data row types written by output backends.

use epi_core::DiseaseId;
use epi_sim::{DailyCounts, InfectionEvent};

/// One disease's counters for one day, flattened for tabular output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyCountsRow {
    pub day:                     i32,
    pub disease:                 u16,
    pub susceptible:             u64,
    pub exposed:                 u64,
    pub infectious:              u64,
    pub convalescent:            u64,
    pub symptomatic:             u64,
    pub removed:                 u64,
    pub immune:                  u64,
    pub new_exposed:             u64,
    pub new_symptomatic:         u64,
    pub case_fatalities:         u64,
    pub total_case_fatalities:   u64,
    pub prevalence:              u64,
    pub attack_rate:             f64,
    pub symptomatic_attack_rate: f64,
    pub case_fatality_rate:      f64,
    pub reproduction:            f64,
}

impl DailyCountsRow {
    /// Column names, in write order.
    pub const COLUMNS: [&'static str; 18] = [
        "day",
        "disease",
        "susceptible",
        "exposed",
        "infectious",
        "convalescent",
        "symptomatic",
        "removed",
        "immune",
        "new_exposed",
        "new_symptomatic",
        "case_fatalities",
        "total_case_fatalities",
        "prevalence",
        "attack_rate",
        "symptomatic_attack_rate",
        "case_fatality_rate",
        "reproduction",
    ];

    pub fn from_counts(counts: &DailyCounts, disease: DiseaseId) -> Self {
        Self {
            day:                     counts.day.0,
            disease:                 disease.0,
            susceptible:             counts.susceptible as u64,
            exposed:                 counts.exposed as u64,
            infectious:              counts.infectious as u64,
            convalescent:            counts.convalescent as u64,
            symptomatic:             counts.symptomatic as u64,
            removed:                 counts.removed as u64,
            immune:                  counts.immune as u64,
            new_exposed:             counts.new_exposed as u64,
            new_symptomatic:         counts.new_symptomatic as u64,
            case_fatalities:         counts.case_fatalities as u64,
            total_case_fatalities:   counts.total_case_fatalities as u64,
            prevalence:              counts.prevalence() as u64,
            attack_rate:             counts.attack_rate(),
            symptomatic_attack_rate: counts.symptomatic_attack_rate(),
            case_fatality_rate:      counts.case_fatality_rate(),
            reproduction:            counts.reproduction,
        }
    }

    /// The integer columns from `susceptible` through `prevalence`.
    pub(crate) fn counters(&self) -> [u64; 12] {
        [
            self.susceptible,
            self.exposed,
            self.infectious,
            self.convalescent,
            self.symptomatic,
            self.removed,
            self.immune,
            self.new_exposed,
            self.new_symptomatic,
            self.case_fatalities,
            self.total_case_fatalities,
            self.prevalence,
        ]
    }

    /// The rate columns from `attack_rate` through `reproduction`.
    pub(crate) fn rates(&self) -> [f64; 4] {
        [
            self.attack_rate,
            self.symptomatic_attack_rate,
            self.case_fatality_rate,
            self.reproduction,
        ]
    }
}

/// One exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfectionEventRow {
    pub day:      i32,
    pub disease:  u16,
    pub infectee: u32,
    /// `None` for imported, seeded, and vector-borne cases.
    pub infector: Option<u32>,
    pub place:    Option<u32>,
}

impl InfectionEventRow {
    pub const COLUMNS: [&'static str; 5] = ["day", "disease", "infectee", "infector", "place"];
}

impl From<&InfectionEvent> for InfectionEventRow {
    fn from(e: &InfectionEvent) -> Self {
        Self {
            day:      e.day.0,
            disease:  e.disease.0,
            infectee: e.infectee.0,
            infector: e.infector.map(|a| a.0),
            place:    e.place.map(|p| p.0),
        }
    }
}
