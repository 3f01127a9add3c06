use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

/// Roster and capacity details for one activity, as returned under its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDetails {
    pub description: String,
    pub schedule: String,
    pub max_participants: i64,
    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub name: String,
    pub details: ActivityDetails,
}

impl Activity {
    pub fn new(name: impl Into<String>, details: ActivityDetails) -> Self {
        Self {
            name: name.into(),
            details,
        }
    }

    /// Remaining capacity. Negative when the roster is oversubscribed.
    pub fn spots_left(&self) -> i64 {
        let taken = i64::try_from(self.details.participants.len()).unwrap_or(i64::MAX);
        self.details.max_participants.saturating_sub(taken)
    }

    pub fn has_participant(&self, email: &str) -> bool {
        self.details.participants.iter().any(|p| p == email)
    }
}

/// Activities in the order the server listed them.
///
/// The wire form is a JSON object keyed by activity name; key order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    activities: Vec<Activity>,
}

impl Catalog {
    pub fn new(activities: Vec<Activity>) -> Self {
        Self { activities }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.name == name)
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.activities.iter().map(|a| a.name.as_str())
    }
}

impl IntoIterator for Catalog {
    type Item = Activity;
    type IntoIter = std::vec::IntoIter<Activity>;

    fn into_iter(self) -> Self::IntoIter {
        self.activities.into_iter()
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.activities.len()))?;
        for activity in &self.activities {
            map.serialize_entry(&activity.name, &activity.details)?;
        }
        map.end()
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping activity names to activity details")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut activities = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, details)) = access.next_entry::<String, ActivityDetails>()? {
            // Later duplicates win, like a JS object literal.
            if let Some(existing) = activities.iter_mut().find(|a: &&mut Activity| a.name == name) {
                existing.details = details;
            } else {
                activities.push(Activity { name, details });
            }
        }
        Ok(Catalog { activities })
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}
