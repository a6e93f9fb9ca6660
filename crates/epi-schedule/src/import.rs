//! Import windows: when, where, and how many cases arrive from outside the
//! modeled population.

use epi_core::{Day, DiseaseId, GeoPoint};

/// One row of the import schedule.
///
/// On every day in `start..=end` the driver for `disease` attempts
/// `attempts` imports, each succeeding with probability `attempt_prob`; at
/// least `min_successful` are requested regardless.  Candidates are drawn
/// from households within `radius_km` of `center`, or from anywhere when
/// either is absent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportWindow {
    pub start:          Day,
    pub end:            Day,
    pub attempts:       u32,
    pub disease:        DiseaseId,
    pub attempt_prob:   f64,
    pub min_successful: u32,
    pub center:         Option<GeoPoint>,
    pub radius_km:      Option<f64>,
}

impl ImportWindow {
    /// A window importing `attempts` cases of `disease` anywhere, every day
    /// from `start` through `end`.
    pub fn anywhere(disease: DiseaseId, start: Day, end: Day, attempts: u32) -> Self {
        Self {
            start,
            end,
            attempts,
            disease,
            attempt_prob:   1.0,
            min_successful: 0,
            center:         None,
            radius_km:      None,
        }
    }

    /// Restrict the window to households within `radius_km` of `center`.
    pub fn within(mut self, center: GeoPoint, radius_km: f64) -> Self {
        self.center = Some(center);
        self.radius_km = (radius_km > 0.0).then_some(radius_km);
        self
    }

    #[inline]
    pub fn is_active(&self, day: Day) -> bool {
        self.start <= day && day <= self.end
    }

    /// `Some((center, radius))` when the search is geographically bounded.
    pub fn search_area(&self) -> Option<(GeoPoint, f64)> {
        self.center.zip(self.radius_km)
    }
}

/// All import windows of a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportSchedule {
    windows: Vec<ImportWindow>,
}

impl ImportSchedule {
    pub fn new(windows: Vec<ImportWindow>) -> Self {
        Self { windows }
    }

    pub fn push(&mut self, window: ImportWindow) {
        self.windows.push(window);
    }

    /// Windows for `disease` active on `day`, in file order.
    pub fn active(&self, day: Day, disease: DiseaseId) -> impl Iterator<Item = &ImportWindow> {
        self.windows
            .iter()
            .filter(move |w| w.disease == disease && w.is_active(day))
    }

    /// Windows belonging to `disease`.
    pub fn for_disease(&self, disease: DiseaseId) -> ImportSchedule {
        ImportSchedule {
            windows: self.windows.iter().filter(|w| w.disease == disease).cloned().collect(),
        }
    }

    pub fn windows(&self) -> &[ImportWindow] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
