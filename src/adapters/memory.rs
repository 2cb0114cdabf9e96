use crate::core::interpreter::FileInterpreter;
use crate::core::report::ReportRegistry;
use crate::domain::model::{
    normalize_preference_name, Activity, ActivityRef, Client, Location, LocationId, Preference,
    PreferenceId,
};
use crate::domain::ports::{ActivityStore, ClientNameStore, LocationStore, LogSink, PreferenceStore};
use crate::utils::error::{ImagelynError, Result};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct PreferenceRegistry {
    preferences: Vec<Preference>,
    by_name: HashMap<String, PreferenceId>,
}

impl PreferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.preferences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preferences.is_empty()
    }

    /// Resolves free-form names (any case) to registered preferences.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<PreferenceId>> {
        names
            .iter()
            .map(|name| {
                let name = normalize_preference_name(name.as_ref());
                self.lookup(&name)
                    .ok_or(ImagelynError::UnknownPreference { name })
            })
            .collect()
    }
}

impl PreferenceStore for PreferenceRegistry {
    fn lookup(&self, name: &str) -> Option<PreferenceId> {
        self.by_name.get(name).copied()
    }

    fn insert(&mut self, preference: Preference) -> Option<PreferenceId> {
        if self.by_name.contains_key(preference.name()) {
            return None;
        }
        let id = PreferenceId(self.preferences.len());
        self.by_name.insert(preference.name().to_string(), id);
        self.preferences.push(preference);
        Some(id)
    }

    fn get(&self, id: PreferenceId) -> Option<&Preference> {
        self.preferences.get(id.0)
    }
}

#[derive(Debug, Default)]
pub struct ClientRegistry {
    names: Vec<String>,
    clients: Vec<Client>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names declared by `name` directives, in load order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn add_client(&mut self, client: Client) {
        self.clients.push(client);
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn find_client(&self, name: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.name() == name)
    }
}

impl ClientNameStore for ClientRegistry {
    fn add_name(&mut self, name: String) {
        self.names.push(name);
    }
}

#[derive(Debug, Default)]
pub struct LocationRegistry {
    locations: Vec<Location>,
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn get(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<LocationId> {
        self.locations
            .iter()
            .position(|l| l.name() == name)
            .map(LocationId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LocationId, &Location)> {
        self.locations
            .iter()
            .enumerate()
            .map(|(i, l)| (LocationId(i), l))
    }

    pub fn activity(&self, activity: ActivityRef) -> Option<&Activity> {
        self.get(activity.location)?.activity(activity.index)
    }

    pub fn activity_mut(&mut self, activity: ActivityRef) -> Option<&mut Activity> {
        self.locations
            .get_mut(activity.location.0)?
            .activity_mut(activity.index)
    }

    /// Handles to every activity of a location, in file order.
    pub fn activity_refs(&self, id: LocationId) -> Vec<ActivityRef> {
        self.get(id)
            .map(|location| {
                (0..location.activities().len())
                    .map(|index| ActivityRef {
                        location: id,
                        index,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl ActivityStore for LocationRegistry {
    fn activity(&self, at: ActivityRef) -> Option<&Activity> {
        LocationRegistry::activity(self, at)
    }

    fn activity_mut(&mut self, at: ActivityRef) -> Option<&mut Activity> {
        LocationRegistry::activity_mut(self, at)
    }
}

impl LocationStore for LocationRegistry {
    fn add_location(&mut self, location: Location) -> LocationId {
        tracing::debug!(location = location.name(), "registering location");
        self.locations.push(location);
        LocationId(self.locations.len() - 1)
    }
}

/// Every registry a session needs, passed around explicitly.
#[derive(Debug, Default)]
pub struct Catalog {
    pub preferences: PreferenceRegistry,
    pub clients: ClientRegistry,
    pub locations: LocationRegistry,
    pub reports: ReportRegistry,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interpreter<'a>(&'a mut self, console: &'a dyn LogSink) -> FileInterpreter<'a> {
        FileInterpreter::new(
            &mut self.preferences,
            &mut self.clients,
            &mut self.locations,
            console,
        )
    }
}
