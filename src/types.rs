use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

/// A day of programs for one channel.
///
/// The upstream document is kept as received, so serializing a `Schedule`
/// re-emits it with the same keys, order and `null`s. The typed fields are a
/// read-only view over it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Schedule {
    pub channel: Option<String>,
    pub events: Vec<Option<Event>>,
    /// The document as received.
    pub raw: Value,
}

#[derive(Deserialize)]
struct ScheduleFields {
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    events: Vec<Option<Event>>,
}

impl TryFrom<Value> for Schedule {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let fields: ScheduleFields = serde_json::from_value(raw.clone())?;
        Ok(Schedule {
            channel: fields.channel,
            events: fields.events,
            raw,
        })
    }
}

impl From<Schedule> for Value {
    fn from(schedule: Schedule) -> Value {
        schedule.raw
    }
}

impl Schedule {
    /// Events that carry data; `null` and `{}` placeholders are skipped.
    pub fn programs(&self) -> Vec<&Event> {
        self.events
            .iter()
            .flatten()
            .filter(|e| !e.is_empty())
            .collect()
    }
}

/// One program of a [`Schedule`], kept verbatim like its parent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Event {
    pub name: Option<String>,
    pub hour: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub dfp: Option<Dfp>,
    /// The document as received.
    pub raw: Value,
}

#[derive(Deserialize)]
struct EventFields {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    hour: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    dfp: Option<Dfp>,
}

impl TryFrom<Value> for Event {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let fields: EventFields = serde_json::from_value(raw.clone())?;
        Ok(Event {
            name: fields.name,
            hour: fields.hour,
            duration: fields.duration,
            description: fields.description,
            dfp: fields.dfp,
            raw,
        })
    }
}

impl From<Event> for Value {
    fn from(event: Event) -> Value {
        event.raw
    }
}

impl Event {
    /// Only a literal `{}` is a placeholder. `{"name": null}` is a program
    /// without a name.
    pub fn is_empty(&self) -> bool {
        matches!(&self.raw, Value::Object(map) if map.is_empty())
    }

    pub fn name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }

    pub fn hour_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.hour.as_deref().unwrap_or(fallback)
    }

    pub fn duration_str(&self) -> &str {
        self.duration.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dfp {
    #[serde(default)]
    pub escaped_typology_name: Option<String>,
    #[serde(default)]
    pub escaped_genre_name: Option<String>,
}

/// Channel list; serializes back to the upstream document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct ChannelGuide {
    pub channels: Vec<GuideChannel>,
    /// The document as received.
    pub raw: Value,
}

#[derive(Deserialize)]
struct ChannelGuideFields {
    #[serde(default)]
    channels: Vec<GuideChannel>,
}

impl TryFrom<Value> for ChannelGuide {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let fields: ChannelGuideFields = serde_json::from_value(raw.clone())?;
        Ok(ChannelGuide {
            channels: fields.channels,
            raw,
        })
    }
}

impl From<ChannelGuide> for Value {
    fn from(guide: ChannelGuide) -> Value {
        guide.raw
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuideChannel {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub absolute_path: String,
}

#[derive(Tabled)]
pub struct ChannelTableRow {
    #[tabled(rename = "Canale")]
    pub label: String,
    #[tabled(rename = "Opzione")]
    pub option: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnAir {
    #[serde(default)]
    pub dirette: Vec<LiveChannel>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveChannel {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default, rename = "currentItem")]
    pub current_item: Option<LiveItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "isPartOf")]
    pub is_part_of: Option<LiveProgram>,
}

impl LiveItem {
    /// Item name, falling back to the name of the program it belongs to.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or_else(|| self.is_part_of.as_ref().and_then(|p| p.name.as_deref()))
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveProgram {
    #[serde(default)]
    pub name: Option<String>,
}

/// Login state persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tokens {
    #[serde(default)]
    pub jwt_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub ua: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub login_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_refresh: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedConfig {
    #[serde(rename = "_cached_at", default)]
    pub cached_at: String,
    #[serde(rename = "_source", default)]
    pub source: String,
    #[serde(default)]
    pub config: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub blocchi: Vec<CatalogBlock>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogBlock {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub lanci: Vec<CatalogItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default, rename = "isPartOf")]
    pub is_part_of: Option<PartOf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartOf {
    #[serde(default)]
    pub generi: Vec<Named>,
    #[serde(default)]
    pub sottogenere: Vec<Named>,
    #[serde(default)]
    pub tipologia: Vec<Named>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub anno: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub regia: Option<String>,
    #[serde(default)]
    pub interpreti: Option<String>,
    #[serde(default)]
    pub conduttore: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, rename = "durataFirstItem")]
    pub durata_first_item: Option<String>,
    #[serde(default)]
    pub weblink: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub nome: Option<String>,
}

/// A catalog item together with the section it was listed in.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub section: String,
    pub item: CatalogItem,
}

#[derive(Tabled)]
pub struct TypologyCountRow {
    #[tabled(rename = "Tipologia")]
    pub typology: String,
    #[tabled(rename = "Elementi")]
    pub count: usize,
}
