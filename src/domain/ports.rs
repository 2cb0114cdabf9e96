use crate::domain::model::{Activity, ActivityRef, Location, LocationId, Preference, PreferenceId};

pub trait PreferenceStore {
    /// Looks up by name; callers pass an already-lowercased name.
    fn lookup(&self, name: &str) -> Option<PreferenceId>;
    /// Returns `None` when a preference with the same name already exists.
    fn insert(&mut self, preference: Preference) -> Option<PreferenceId>;
    fn get(&self, id: PreferenceId) -> Option<&Preference>;
}

pub trait ClientNameStore {
    fn add_name(&mut self, name: String);
}

pub trait LocationStore {
    fn add_location(&mut self, location: Location) -> LocationId;
}

/// Access to the activities of registered locations, used by report building.
pub trait ActivityStore {
    fn activity(&self, at: ActivityRef) -> Option<&Activity>;
    fn activity_mut(&mut self, at: ActivityRef) -> Option<&mut Activity>;
}

/// Where the interpreter reports progress. Formatting is up to the sink.
pub trait LogSink {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}
