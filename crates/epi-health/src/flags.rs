//! Per-(agent, disease) health flags.

/// Six independent health flags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthFlags {
    pub susceptible:   bool,
    pub infectious:    bool,
    pub symptomatic:   bool,
    pub recovered:     bool,
    pub immune:        bool,
    pub case_fatality: bool,
}

impl HealthFlags {
    /// A never-infected host.
    pub const SUSCEPTIBLE: HealthFlags = HealthFlags {
        susceptible:   true,
        infectious:    false,
        symptomatic:   false,
        recovered:     false,
        immune:        false,
        case_fatality: false,
    };

    /// Clear the flags that only hold while an infection is open.
    pub(crate) fn close_infection(&mut self) {
        self.infectious = false;
        self.symptomatic = false;
    }
}
