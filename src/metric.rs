//! The numeric columns that can be aggregated from the US daily reports.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

/// A per-region numeric column of the daily report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Metric {
    #[default]
    IncidentRate,
    Confirmed,
    Deaths,
    Recovered,
    Active,
    PeopleTested,
    PeopleHospitalized,
    MortalityRate,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::IncidentRate,
        Metric::Confirmed,
        Metric::Deaths,
        Metric::Recovered,
        Metric::Active,
        Metric::PeopleTested,
        Metric::PeopleHospitalized,
        Metric::MortalityRate,
    ];

    /// Header of this metric's column in the upstream CSV files.
    pub fn column(self) -> &'static str {
        match self {
            Metric::IncidentRate => "Incident_Rate",
            Metric::Confirmed => "Confirmed",
            Metric::Deaths => "Deaths",
            Metric::Recovered => "Recovered",
            Metric::Active => "Active",
            Metric::PeopleTested => "People_Tested",
            Metric::PeopleHospitalized => "People_Hospitalized",
            Metric::MortalityRate => "Mortality_Rate",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Metric {
    type Err = String;

    /// Accepts the CSV header (`People_Tested`) or the CLI spelling
    /// (`people-tested`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Metric::ALL
            .into_iter()
            .find(|m| m.column().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown metric '{s}'"))
    }
}
