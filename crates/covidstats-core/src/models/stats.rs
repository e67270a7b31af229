//! Global stats payload as returned by the tracker API.
//!
//! Every counter is optional. The API omits fields or sends `null` freely,
//! so nothing is defaulted while parsing; the accessors substitute 0 when a
//! value is read for display.

use serde::{Deserialize, Serialize};

/// Envelope around the stats list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalStatsResponse {
    #[serde(default)]
    pub results: Option<Vec<GlobalStats>>,
    #[serde(default)]
    pub stat: Option<String>,
}

/// One snapshot of global pandemic counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    #[serde(default)]
    pub total_cases: Option<i64>,
    #[serde(default)]
    pub total_recovered: Option<i64>,
    #[serde(default)]
    pub total_unresolved: Option<i64>,
    #[serde(default)]
    pub total_deaths: Option<i64>,
    #[serde(default)]
    pub total_new_cases_today: Option<i64>,
    #[serde(default)]
    pub total_new_deaths_today: Option<i64>,
    #[serde(default)]
    pub total_active_cases: Option<i64>,
    #[serde(default)]
    pub total_serious_cases: Option<i64>,
}

impl GlobalStats {
    pub fn cases(&self) -> i64 {
        self.total_cases.unwrap_or(0)
    }

    pub fn deaths(&self) -> i64 {
        self.total_deaths.unwrap_or(0)
    }

    pub fn recovered(&self) -> i64 {
        self.total_recovered.unwrap_or(0)
    }

    pub fn unresolved(&self) -> i64 {
        self.total_unresolved.unwrap_or(0)
    }

    /// The four summary strings shown for this record.
    pub fn summary_lines(&self) -> [String; 4] {
        [
            format!("Infected {}", self.cases()),
            format!("Deaths {}", self.deaths()),
            format!("Recovered {}", self.recovered()),
            format!("Unresolved {}", self.unresolved()),
        ]
    }
}

/// Flatten a list of records into display strings, four per record, in order.
pub fn summary_lines(stats: &[GlobalStats]) -> Vec<String> {
    stats.iter().flat_map(GlobalStats::summary_lines).collect()
}
