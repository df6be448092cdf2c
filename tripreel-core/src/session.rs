// ============================================================================
// tripreel-core/src/session.rs
// ============================================================================
//
// TRIP SESSION: Explicit state carried between CLI invocations
//
// Holds what the traveler told us, the recommended destination and
// attractions (produced by an external language model and stored here
// verbatim), the clips uploaded per attraction, and the quest progress that
// gates the final assembly. Persisted as JSON between runs.
//
// AI-ASSISTANT-INFO: Session model, quest progress, request text rendering

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Points added to the quest per uploaded clip.
pub const QUEST_STEP: u32 = 5;

/// Quest progress at which the final video can be assembled.
pub const QUEST_MAX: u32 = 30;

/// Free-text traveler attributes, as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelerProfile {
    pub party_size: String,
    pub companions: String,
    pub transport: String,
    pub budget: String,
    pub ages: String,
    pub genders: String,
}

/// The three kinds of attraction a trip quest covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttractionCategory {
    Food,
    Activity,
    TouristSpot,
}

impl AttractionCategory {
    pub const ALL: [AttractionCategory; 3] = [
        AttractionCategory::Food,
        AttractionCategory::Activity,
        AttractionCategory::TouristSpot,
    ];

    /// The recommendation question for this category at `destination`.
    pub fn request_text(self, destination: &str) -> String {
        match self {
            AttractionCategory::Food => format!(
                "Recommend the single most delicious or most unusual dish to eat in \
                 {destination}. Answer with the name only."
            ),
            AttractionCategory::Activity => format!(
                "Recommend the single most exciting and fun place in {destination}, \
                 something out of the ordinary. Answer with the place name only."
            ),
            AttractionCategory::TouristSpot => format!(
                "Recommend the single most spectacular spot for natural scenery in \
                 {destination}. Answer with the place name only."
            ),
        }
    }
}

impl fmt::Display for AttractionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttractionCategory::Food => "food",
            AttractionCategory::Activity => "activity",
            AttractionCategory::TouristSpot => "spot",
        };
        f.write_str(name)
    }
}

impl FromStr for AttractionCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "food" => Ok(AttractionCategory::Food),
            "activity" => Ok(AttractionCategory::Activity),
            "spot" | "tourist_spot" => Ok(AttractionCategory::TouristSpot),
            other => Err(CoreError::Config(format!(
                "unknown attraction category '{other}' (expected food, activity or spot)"
            ))),
        }
    }
}

/// Everything remembered about one trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripSession {
    pub profile: Option<TravelerProfile>,
    pub destination: Option<String>,
    /// Recommended attraction name per category
    pub attractions: BTreeMap<AttractionCategory, String>,
    /// Uploaded clip keys per category, in upload order
    pub uploads: BTreeMap<AttractionCategory, Vec<String>>,
    /// Quest progress, `0..=QUEST_MAX`
    pub progress: u32,
    /// Key of the most recently assembled video
    pub merged_key: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TripSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a session from `path`; a missing file yields a fresh session.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            log::debug!("No session at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let contents = std::fs::read_to_string(path)?;
        let session: Self = serde_json::from_str(&contents)?;
        Ok(session)
    }

    /// Writes the session to `path` as pretty JSON, replacing it atomically.
    pub fn save(&mut self, path: &Path) -> CoreResult<()> {
        self.updated_at = Some(Utc::now());
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(self)?;
        let mut staging = tempfile::NamedTempFile::new_in(dir)?;
        std::io::Write::write_all(&mut staging, json.as_bytes())?;
        staging.persist(path).map_err(|e| CoreError::Io(e.error))?;
        log::debug!("Saved session to {}", path.display());
        Ok(())
    }

    pub fn set_profile(&mut self, profile: TravelerProfile) {
        self.profile = Some(profile);
    }

    pub fn set_destination(&mut self, destination: &str) {
        self.destination = Some(destination.trim().to_string());
    }

    pub fn set_attraction(&mut self, category: AttractionCategory, name: &str) {
        self.attractions.insert(category, name.trim().to_string());
    }

    /// Records an uploaded clip and advances the quest. Returns the new progress.
    pub fn record_upload(&mut self, category: AttractionCategory, key: &str) -> u32 {
        self.uploads
            .entry(category)
            .or_default()
            .push(key.to_string());
        if self.progress + QUEST_STEP <= QUEST_MAX {
            self.progress += QUEST_STEP;
        }
        self.progress
    }

    pub fn quest_complete(&self) -> bool {
        self.progress >= QUEST_MAX
    }

    /// Quest progress in `[0, 1]`.
    pub fn progress_fraction(&self) -> f64 {
        f64::from(self.progress.min(QUEST_MAX)) / f64::from(QUEST_MAX)
    }

    /// All uploaded keys, grouped by category in `AttractionCategory::ALL` order.
    pub fn uploaded_keys(&self) -> Vec<String> {
        AttractionCategory::ALL
            .iter()
            .filter_map(|category| self.uploads.get(category))
            .flatten()
            .cloned()
            .collect()
    }

    /// The destination recommendation request for the traveler profile.
    pub fn describe_request(&self) -> CoreResult<String> {
        let profile = self.profile.as_ref().ok_or_else(|| {
            CoreError::OperationFailed("no traveler profile has been entered".to_string())
        })?;
        Ok(format!(
            "We are {} people travelling with {}. Genders: {}; ages: {}. \
             Our budget is {} and we will get around by {}. Taking this into \
             account, recommend exactly one destination in Korea, avoiding the \
             well-known places.",
            profile.party_size,
            profile.companions,
            profile.genders,
            profile.ages,
            profile.budget,
            profile.transport
        ))
    }

    /// The attraction recommendation request for `category`.
    pub fn attraction_request(&self, category: AttractionCategory) -> CoreResult<String> {
        let destination = self.destination.as_deref().ok_or_else(|| {
            CoreError::OperationFailed("no destination has been chosen".to_string())
        })?;
        Ok(category.request_text(destination))
    }
}
