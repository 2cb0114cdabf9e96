use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Stable handle to a preference owned by a preference registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PreferenceId(pub usize);

/// Stable handle to a location owned by a location registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationId(pub usize);

/// Non-owning handle to one activity of a registered location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActivityRef {
    pub location: LocationId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn sign(self) -> char {
        match self {
            Polarity::Positive => '+',
            Polarity::Negative => '-',
        }
    }
}

/// A named taste a client may have. The name is always lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    name: String,
}

impl Preference {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: normalize_preference_name(name.as_ref()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Preference names compare case-insensitively (ASCII only).
pub fn normalize_preference_name(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// An unlocked disclosure about how an activity relates to a preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hint {
    pub preference: PreferenceId,
    pub polarity: Polarity,
}

impl Hint {
    pub fn describe(&self, activity: &str, preference: &str) -> String {
        match self.polarity {
            Polarity::Positive => format!("{} suits clients who like {}", activity, preference),
            Polarity::Negative => {
                format!("{} disappoints clients who like {}", activity, preference)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    name: String,
    positive: Vec<PreferenceId>,
    negative: Vec<PreferenceId>,
    hints: BTreeSet<Hint>,
}

impl Activity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            positive: Vec::new(),
            negative: Vec::new(),
            hints: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_preference(&mut self, preference: PreferenceId, polarity: Polarity) {
        let set = match polarity {
            Polarity::Positive => &mut self.positive,
            Polarity::Negative => &mut self.negative,
        };
        if !set.contains(&preference) {
            set.push(preference);
        }
    }

    pub fn positive_preferences(&self) -> &[PreferenceId] {
        &self.positive
    }

    pub fn negative_preferences(&self) -> &[PreferenceId] {
        &self.negative
    }

    pub fn has_preference(&self, preference: PreferenceId, polarity: Polarity) -> bool {
        match polarity {
            Polarity::Positive => self.positive.contains(&preference),
            Polarity::Negative => self.negative.contains(&preference),
        }
    }

    /// Only reachable through `Pairing::unlock`, which keeps hints and
    /// pairings in lockstep.
    pub(crate) fn unlock_hint(&mut self, preference: PreferenceId, polarity: Polarity) {
        self.hints.insert(Hint {
            preference,
            polarity,
        });
    }

    pub fn is_hint_unlocked(&self, preference: PreferenceId, polarity: Polarity) -> bool {
        self.hints.contains(&Hint {
            preference,
            polarity,
        })
    }

    pub fn hints(&self) -> impl Iterator<Item = &Hint> {
        self.hints.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    name: String,
    activities: Vec<Activity>,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            activities: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends an activity and returns its index within this location.
    pub fn add_activity(&mut self, activity: Activity) -> usize {
        self.activities.push(activity);
        self.activities.len() - 1
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn activity(&self, index: usize) -> Option<&Activity> {
        self.activities.get(index)
    }

    pub fn activity_mut(&mut self, index: usize) -> Option<&mut Activity> {
        self.activities.get_mut(index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    name: String,
    preferences: Vec<PreferenceId>,
}

impl Client {
    pub fn new(name: impl Into<String>, preferences: Vec<PreferenceId>) -> Self {
        let mut unique = Vec::with_capacity(preferences.len());
        for preference in preferences {
            if !unique.contains(&preference) {
                unique.push(preference);
            }
        }
        Self {
            name: name.into(),
            preferences: unique,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn preferences(&self) -> &[PreferenceId] {
        &self.preferences
    }
}
