//! Statistics read-model over an angler's log.
//!
//! Aggregates are computed in memory from a [`StatsSnapshot`] of one owner's
//! locations, sessions, and catches. Weights are reported in kilograms
//! rounded to two decimals and durations in hours rounded to one decimal.

use std::collections::{BTreeMap, HashMap};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Catch, FishingSession, Location};

/// Default number of rows for ranked statistics.
pub const DEFAULT_RANKING_LIMIT: usize = 10;
/// Default number of items for recent activity.
pub const DEFAULT_RECENT_LIMIT: usize = 5;
/// Upper bound accepted for any statistics `limit`.
pub const MAX_STATS_LIMIT: usize = 100;
/// Size of the monthly statistics window in days.
pub const MONTHLY_WINDOW_DAYS: u64 = 365;

/// Everything one owner has logged.
#[derive(Debug, Clone, Default)]
pub struct StatsSnapshot {
    pub locations: Vec<Location>,
    pub sessions: Vec<FishingSession>,
    pub catches: Vec<Catch>,
}

/// Headline totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub total_sessions: u64,
    pub total_catches: u64,
    pub total_locations: u64,
    pub released_count: u64,
    pub kept_count: u64,
    pub total_weight_kg: f64,
    pub total_hours: f64,
    pub last_session_date: Option<NaiveDate>,
    pub last_session_location: Option<String>,
}

/// Per-species aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesStats {
    pub species: String,
    pub count: u64,
    pub avg_weight_kg: Option<f64>,
    pub total_weight_kg: Option<f64>,
    pub released_count: u64,
    pub kept_count: u64,
}

/// Per-location aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationStats {
    pub location_id: Uuid,
    pub location_name: String,
    pub sessions_count: u64,
    pub catches_count: u64,
    pub total_hours: f64,
    pub avg_weight_kg: Option<f64>,
}

/// Per-bait aggregate. `success_rate` is the share of all catches, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BaitStats {
    pub bait: String,
    pub count: u64,
    pub avg_weight_kg: Option<f64>,
    pub released_count: u64,
    pub kept_count: u64,
    pub success_rate: f64,
}

/// Per-month aggregate keyed by `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub month: String,
    pub sessions_count: u64,
    pub total_hours: f64,
    pub catches_count: u64,
    pub total_weight_kg: f64,
}

/// Most recent sessions and catches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentActivity {
    pub sessions: Vec<FishingSession>,
    pub catches: Vec<Catch>,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

fn hours(minutes: i64) -> f64 {
    round_to(minutes as f64 / 60.0, 1)
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

#[derive(Default)]
struct WeightTally {
    count: u64,
    released: u64,
    weighed: u64,
    total: f64,
}

impl WeightTally {
    fn add(&mut self, catch: &Catch) {
        self.count += 1;
        if catch.details.released() {
            self.released += 1;
        }
        if let Some(weight) = catch.details.weight() {
            self.weighed += 1;
            self.total += weight;
        }
    }

    fn average(&self) -> Option<f64> {
        (self.weighed > 0).then(|| round_to(self.total / self.weighed as f64, 2))
    }

    fn total(&self) -> Option<f64> {
        (self.weighed > 0).then(|| round_to(self.total, 2))
    }
}

fn latest_first(sessions: &mut [&FishingSession]) {
    sessions.sort_by(|a, b| {
        (b.details.date(), b.details.start_time()).cmp(&(a.details.date(), a.details.start_time()))
    });
}

impl StatsSnapshot {
    fn location_name(&self, id: Uuid) -> Option<&str> {
        self.locations
            .iter()
            .find(|location| location.id == id)
            .map(|location| location.details.name())
    }

    /// Headline totals across the whole log.
    pub fn overview(&self) -> OverviewStats {
        let released_count = count(
            self.catches
                .iter()
                .filter(|catch| catch.details.released())
                .count(),
        );
        let total_catches = count(self.catches.len());
        let total_weight: f64 = self
            .catches
            .iter()
            .filter_map(|catch| catch.details.weight())
            .sum();
        let total_minutes: i64 = self
            .sessions
            .iter()
            .map(|session| i64::from(session.details.duration_minutes()))
            .sum();

        let mut ordered: Vec<&FishingSession> = self.sessions.iter().collect();
        latest_first(&mut ordered);
        let last = ordered.first();

        OverviewStats {
            total_sessions: count(self.sessions.len()),
            total_catches,
            total_locations: count(self.locations.len()),
            released_count,
            kept_count: total_catches - released_count,
            total_weight_kg: round_to(total_weight, 2),
            total_hours: hours(total_minutes),
            last_session_date: last.map(|session| session.details.date()),
            last_session_location: last.and_then(|session| {
                self.location_name(session.details.location_id())
                    .map(str::to_owned)
            }),
        }
    }

    /// Species ranked by number of catches.
    pub fn species(&self, limit: usize) -> Vec<SpeciesStats> {
        let mut tallies: BTreeMap<&str, WeightTally> = BTreeMap::new();
        for catch in &self.catches {
            tallies.entry(catch.details.species()).or_default().add(catch);
        }
        let mut rows: Vec<SpeciesStats> = tallies
            .into_iter()
            .map(|(species, tally)| SpeciesStats {
                species: species.to_owned(),
                count: tally.count,
                avg_weight_kg: tally.average(),
                total_weight_kg: tally.total(),
                released_count: tally.released,
                kept_count: tally.count - tally.released,
            })
            .collect();
        // Stable sort keeps the alphabetical order among equal counts.
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        rows.truncate(limit);
        rows
    }

    /// Locations ranked by number of sessions held there.
    pub fn locations(&self) -> Vec<LocationStats> {
        let mut rows: Vec<LocationStats> = self
            .locations
            .iter()
            .map(|location| {
                let sessions: Vec<&FishingSession> = self
                    .sessions
                    .iter()
                    .filter(|session| session.details.location_id() == location.id)
                    .collect();
                let minutes: i64 = sessions
                    .iter()
                    .map(|session| i64::from(session.details.duration_minutes()))
                    .sum();
                let mut tally = WeightTally::default();
                self.catches
                    .iter()
                    .filter(|catch| {
                        catch
                            .details
                            .session_id()
                            .is_some_and(|id| sessions.iter().any(|session| session.id == id))
                    })
                    .for_each(|catch| tally.add(catch));
                LocationStats {
                    location_id: location.id,
                    location_name: location.details.name().to_owned(),
                    sessions_count: count(sessions.len()),
                    catches_count: tally.count,
                    total_hours: hours(minutes),
                    avg_weight_kg: tally.average(),
                }
            })
            .collect();
        rows.sort_by(|a, b| {
            b.sessions_count
                .cmp(&a.sessions_count)
                .then_with(|| a.location_name.cmp(&b.location_name))
        });
        rows
    }

    /// Baits ranked by number of catches; blank baits are ignored.
    pub fn baits(&self, limit: usize) -> Vec<BaitStats> {
        let total_catches = self.catches.len();
        let mut tallies: BTreeMap<&str, WeightTally> = BTreeMap::new();
        for catch in &self.catches {
            if let Some(bait) = catch.details.bait() {
                tallies.entry(bait).or_default().add(catch);
            }
        }
        let mut rows: Vec<BaitStats> = tallies
            .into_iter()
            .map(|(bait, tally)| BaitStats {
                bait: bait.to_owned(),
                count: tally.count,
                avg_weight_kg: tally.average(),
                released_count: tally.released,
                kept_count: tally.count - tally.released,
                success_rate: if total_catches == 0 {
                    0.0
                } else {
                    round_to(tally.count as f64 / total_catches as f64 * 100.0, 1)
                },
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        rows.truncate(limit);
        rows
    }

    /// Per-month totals for sessions dated within the trailing window
    /// ending on `today`, oldest month first.
    pub fn monthly(&self, today: NaiveDate) -> Vec<MonthlyStats> {
        let since = today
            .checked_sub_days(Days::new(MONTHLY_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MIN);
        let mut months: BTreeMap<String, (u64, i64, WeightTally)> = BTreeMap::new();
        let mut month_of_session: HashMap<Uuid, String> = HashMap::new();

        for session in self
            .sessions
            .iter()
            .filter(|session| session.details.date() >= since)
        {
            let month = session.details.date().format("%Y-%m").to_string();
            let entry = months.entry(month.clone()).or_default();
            entry.0 += 1;
            entry.1 += i64::from(session.details.duration_minutes());
            month_of_session.insert(session.id, month);
        }
        for catch in &self.catches {
            let month = catch
                .details
                .session_id()
                .and_then(|id| month_of_session.get(&id));
            if let Some(entry) = month.and_then(|key| months.get_mut(key)) {
                entry.2.add(catch);
            }
        }

        months
            .into_iter()
            .map(|(month, (sessions_count, minutes, tally))| MonthlyStats {
                month,
                sessions_count,
                total_hours: hours(minutes),
                catches_count: tally.count,
                total_weight_kg: tally.total().unwrap_or(0.0),
            })
            .collect()
    }

    /// Latest sessions by date and start time, and latest catches by
    /// creation time.
    pub fn recent(&self, limit: usize) -> RecentActivity {
        let mut sessions: Vec<&FishingSession> = self.sessions.iter().collect();
        latest_first(&mut sessions);
        let mut catches: Vec<&Catch> = self.catches.iter().collect();
        catches.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        RecentActivity {
            sessions: sessions.into_iter().take(limit).cloned().collect(),
            catches: catches.into_iter().take(limit).cloned().collect(),
        }
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
