use crate::domain::model::{Activity, ActivityRef, Client, Polarity, Preference, PreferenceId};
use crate::domain::ports::{ActivityStore, PreferenceStore};
use crate::utils::error::{ImagelynError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-pairing weights. Unsigned so the score stays monotonic in both
/// directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub positive: u32,
    pub negative: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            positive: 1,
            negative: 1,
        }
    }
}

/// A match between a client preference and an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    activity: ActivityRef,
    preference: PreferenceId,
    polarity: Polarity,
}

impl Pairing {
    /// The only way to create a pairing; unlocks the matching hint on
    /// `activity`.
    fn unlock(
        activity: &mut Activity,
        at: ActivityRef,
        preference: PreferenceId,
        polarity: Polarity,
    ) -> Self {
        activity.unlock_hint(preference, polarity);
        Self {
            activity: at,
            preference,
            polarity,
        }
    }

    pub fn activity(&self) -> ActivityRef {
        self.activity
    }

    pub fn preference(&self) -> PreferenceId {
        self.preference
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }
}

fn preference_name(preferences: &dyn PreferenceStore, id: PreferenceId) -> &str {
    preferences
        .get(id)
        .map(Preference::name)
        .unwrap_or("<unknown>")
}

fn unknown_activity(at: ActivityRef) -> ImagelynError {
    ImagelynError::UnknownActivity {
        location: at.location.0,
        index: at.index,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    client: String,
    score: i64,
    pairings: Vec<Pairing>,
    generated_at: DateTime<Utc>,
}

impl Report {
    /// Pairs every client preference against every activity, in the order
    /// given, and scores the result. Every handle is resolved before any
    /// hint is unlocked, so a failed build leaves the activities untouched.
    pub fn build(
        client: &Client,
        activities: &[ActivityRef],
        locations: &mut dyn ActivityStore,
        weights: ScoreWeights,
    ) -> Result<Self> {
        if let Some(&missing) = activities
            .iter()
            .find(|&&at| locations.activity(at).is_none())
        {
            return Err(unknown_activity(missing));
        }

        let mut pairings = Vec::new();
        let mut score: i64 = 0;

        for &at in activities {
            let activity = locations
                .activity_mut(at)
                .ok_or_else(|| unknown_activity(at))?;

            for &preference in client.preferences() {
                for polarity in [Polarity::Positive, Polarity::Negative] {
                    if !activity.has_preference(preference, polarity) {
                        continue;
                    }
                    pairings.push(Pairing::unlock(activity, at, preference, polarity));
                    score += match polarity {
                        Polarity::Positive => i64::from(weights.positive),
                        Polarity::Negative => -i64::from(weights.negative),
                    };
                }
            }
        }

        Ok(Self {
            client: client.name().to_string(),
            score,
            pairings,
            generated_at: Utc::now(),
        })
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn pairings(&self) -> &[Pairing] {
        &self.pairings
    }

    /// Equal score and pairings; the timestamp is ignored.
    pub fn same_content(&self, other: &Report) -> bool {
        self.client == other.client && self.score == other.score && self.pairings == other.pairings
    }

    /// Binds the report to the registries its handles point into.
    pub fn view<'r>(
        &'r self,
        preferences: &'r dyn PreferenceStore,
        activities: &'r dyn ActivityStore,
    ) -> ReportView<'r> {
        ReportView {
            report: self,
            preferences,
            activities,
        }
    }

    pub fn render(
        &self,
        preferences: &dyn PreferenceStore,
        activities: &dyn ActivityStore,
    ) -> String {
        self.view(preferences, activities).to_string()
    }

    pub fn to_json(
        &self,
        preferences: &dyn PreferenceStore,
        activities: &dyn ActivityStore,
    ) -> Result<String> {
        let pairings: Vec<serde_json::Value> = self
            .pairings
            .iter()
            .map(|pairing| {
                serde_json::json!({
                    "activity": activities.activity(pairing.activity).map(Activity::name),
                    "preference": preference_name(preferences, pairing.preference),
                    "polarity": pairing.polarity,
                })
            })
            .collect();

        let value = serde_json::json!({
            "client": self.client,
            "score": self.score,
            "generated_at": self.generated_at,
            "pairings": pairings,
        });

        Ok(serde_json::to_string_pretty(&value)?)
    }
}

/// Text form of a report, one line per pairing.
pub struct ReportView<'r> {
    report: &'r Report,
    preferences: &'r dyn PreferenceStore,
    activities: &'r dyn ActivityStore,
}

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Report for {}", self.report.client)?;
        if self.report.pairings.is_empty() {
            writeln!(f, "  (no matching preferences)")?;
        }
        for pairing in &self.report.pairings {
            let activity = self
                .activities
                .activity(pairing.activity)
                .map(Activity::name)
                .unwrap_or("<unknown>");
            writeln!(
                f,
                "  {} {}: {}",
                pairing.polarity.sign(),
                activity,
                preference_name(self.preferences, pairing.preference)
            )?;
        }
        write!(f, "Score: {}", self.report.score)
    }
}

/// Retains every report generated during a session.
#[derive(Debug, Default)]
pub struct ReportRegistry {
    reports: Vec<Report>,
}

impl ReportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(
        &mut self,
        client: &Client,
        activities: &[ActivityRef],
        locations: &mut dyn ActivityStore,
        weights: ScoreWeights,
    ) -> Result<&Report> {
        let report = Report::build(client, activities, locations, weights)?;
        tracing::info!(
            client = report.client(),
            score = report.score(),
            pairings = report.pairings().len(),
            "report generated"
        );
        self.reports.push(report);
        Ok(&self.reports[self.reports.len() - 1])
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Report> {
        self.reports.get(index)
    }
}

/// Human-readable hints unlocked so far on the given activities.
pub fn unlocked_hints(
    activities: &[ActivityRef],
    preferences: &dyn PreferenceStore,
    locations: &dyn ActivityStore,
) -> Vec<String> {
    activities
        .iter()
        .filter_map(|&at| locations.activity(at))
        .flat_map(|activity| {
            activity.hints().map(|hint| {
                hint.describe(activity.name(), preference_name(preferences, hint.preference))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{LocationRegistry, PreferenceRegistry};
    use crate::domain::model::{Location, LocationId};
    use crate::domain::ports::LocationStore;

    struct Fixture {
        preferences: PreferenceRegistry,
        locations: LocationRegistry,
        park: LocationId,
        sun: PreferenceId,
        quiet: PreferenceId,
        crowds: PreferenceId,
    }

    fn fixture() -> Fixture {
        let mut preferences = PreferenceRegistry::new();
        let sun = preferences.insert(Preference::new("sun")).unwrap();
        let quiet = preferences.insert(Preference::new("quiet")).unwrap();
        let crowds = preferences.insert(Preference::new("crowds")).unwrap();

        let mut park = Location::new("Park");
        let mut picnic = Activity::new("Picnic");
        picnic.add_preference(sun, Polarity::Positive);
        picnic.add_preference(crowds, Polarity::Negative);
        park.add_activity(picnic);
        let mut concert = Activity::new("Concert");
        concert.add_preference(crowds, Polarity::Positive);
        concert.add_preference(quiet, Polarity::Negative);
        park.add_activity(concert);

        let mut locations = LocationRegistry::new();
        let park = locations.add_location(park);

        Fixture {
            preferences,
            locations,
            park,
            sun,
            quiet,
            crowds,
        }
    }

    #[test]
    fn test_report_pairs_and_scores() {
        let mut f = fixture();
        let client = Client::new("Ada", vec![f.sun, f.quiet]);
        let activities = f.locations.activity_refs(f.park);

        let report = Report::build(&client, &activities, &mut f.locations, ScoreWeights::default())
            .unwrap();

        assert_eq!(report.pairings().len(), 2);
        assert_eq!(report.pairings()[0].activity(), activities[0]);
        assert_eq!(report.pairings()[0].polarity(), Polarity::Positive);
        assert_eq!(report.pairings()[1].preference(), f.quiet);
        assert_eq!(report.pairings()[1].polarity(), Polarity::Negative);
        assert_eq!(report.score(), 0);
    }

    #[test]
    fn test_hints_unlock_only_for_pairings() {
        let mut f = fixture();
        let client = Client::new("Ada", vec![f.sun]);
        let activities = f.locations.activity_refs(f.park);

        Report::build(&client, &activities, &mut f.locations, ScoreWeights::default()).unwrap();

        let picnic = f.locations.activity(activities[0]).unwrap();
        assert!(picnic.is_hint_unlocked(f.sun, Polarity::Positive));
        assert!(!picnic.is_hint_unlocked(f.crowds, Polarity::Negative));
        let concert = f.locations.activity(activities[1]).unwrap();
        assert_eq!(concert.hints().count(), 0);

        assert_eq!(
            unlocked_hints(&activities, &f.preferences, &f.locations),
            vec!["Picnic suits clients who like sun"]
        );
    }

    #[test]
    fn test_weights_are_applied() {
        let mut f = fixture();
        let client = Client::new("Bob", vec![f.crowds]);
        let activities = f.locations.activity_refs(f.park);
        let weights = ScoreWeights {
            positive: 3,
            negative: 2,
        };

        let report = Report::build(&client, &activities, &mut f.locations, weights).unwrap();
        assert_eq!(report.score(), 1);
    }

    #[test]
    fn test_unknown_activity_is_an_error() {
        let mut f = fixture();
        let client = Client::new("Ada", vec![f.sun]);
        let bogus = ActivityRef {
            location: f.park,
            index: 7,
        };

        let result = Report::build(&client, &[bogus], &mut f.locations, ScoreWeights::default());
        assert!(matches!(
            result,
            Err(ImagelynError::UnknownActivity { index: 7, .. })
        ));
    }

    #[test]
    fn test_failed_build_unlocks_nothing() {
        let mut f = fixture();
        let client = Client::new("Ada", vec![f.sun]);
        let picnic = ActivityRef {
            location: f.park,
            index: 0,
        };
        let bogus = ActivityRef {
            location: f.park,
            index: 9,
        };

        let result = Report::build(
            &client,
            &[picnic, bogus],
            &mut f.locations,
            ScoreWeights::default(),
        );

        assert!(matches!(
            result,
            Err(ImagelynError::UnknownActivity { index: 9, .. })
        ));
        let picnic = f.locations.activity(picnic).unwrap();
        assert!(!picnic.is_hint_unlocked(f.sun, Polarity::Positive));
        assert_eq!(picnic.hints().count(), 0);
    }

    #[test]
    fn test_render_and_json() {
        let mut f = fixture();
        let client = Client::new("Ada", vec![f.sun]);
        let activities = f.locations.activity_refs(f.park);
        let report = Report::build(&client, &activities, &mut f.locations, ScoreWeights::default())
            .unwrap();

        assert_eq!(
            report.render(&f.preferences, &f.locations),
            "Report for Ada\n  + Picnic: sun\nScore: 1"
        );

        let json: serde_json::Value =
            serde_json::from_str(&report.to_json(&f.preferences, &f.locations).unwrap()).unwrap();
        assert_eq!(json["score"], 1);
        assert_eq!(json["pairings"][0]["activity"], "Picnic");
        assert_eq!(json["pairings"][0]["polarity"], "positive");
    }

    #[test]
    fn test_render_without_pairings() {
        let mut f = fixture();
        let client = Client::new("Cy", vec![]);
        let activities = f.locations.activity_refs(f.park);
        let report = Report::build(&client, &activities, &mut f.locations, ScoreWeights::default())
            .unwrap();

        assert_eq!(
            format!("{}", report.view(&f.preferences, &f.locations)),
            "Report for Cy\n  (no matching preferences)\nScore: 0"
        );
    }

    #[test]
    fn test_registry_retains_reports() {
        let mut f = fixture();
        let client = Client::new("Ada", vec![f.sun, f.crowds]);
        let activities = f.locations.activity_refs(f.park);
        let mut reports = ReportRegistry::new();

        reports
            .generate(&client, &activities, &mut f.locations, ScoreWeights::default())
            .unwrap();
        reports
            .generate(&client, &activities, &mut f.locations, ScoreWeights::default())
            .unwrap();

        assert_eq!(reports.len(), 2);
        let first = reports.get(0).unwrap();
        let second = reports.get(1).unwrap();
        assert!(first.same_content(second));
    }
}
