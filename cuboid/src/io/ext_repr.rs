use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// External representation of the three dimensions of a box.
/// Values are parsed as JSON numbers and converted to whole units during import.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ExtDimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// External representation of an [`Item`](crate::entities::Item).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtItem {
    /// Unique identifier of the item
    pub id: u64,
    pub dimensions: ExtDimensions,
}

/// External representation of a packing job: one container, a list of items and optional run parameters.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtJob {
    /// Dimensions of the [`Container`](crate::entities::Container)
    pub container: ExtDimensions,
    pub items: Vec<ExtItem>,
    /// Run parameters, every missing or invalid field is left to the optimizer's default
    #[serde(default, deserialize_with = "or_default")]
    pub config: ExtJobConfig,
}

/// Optional run parameters of a job.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtJobConfig {
    #[serde(
        default,
        deserialize_with = "positive_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub population_size: Option<usize>,
    #[serde(
        default,
        deserialize_with = "positive_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub generations: Option<usize>,
}

/// External representation of a [`Placement`](crate::entities::Placement).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtPlacement {
    pub item_id: u64,
    pub x: usize,
    pub y: usize,
    pub z: usize,
    pub width: usize,
    pub height: usize,
    pub depth: usize,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtStatus {
    /// All items were placed
    Success,
    /// Not all items could be placed, the result contains a partial packing
    Failure,
    /// The job could not be processed
    Error,
}

/// External representation of the result of a packing job.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtResult {
    pub status: ExtStatus,
    pub placements: Vec<ExtPlacement>,
    /// Percentage of the container volume used, rounded to two decimals
    pub space_utilization: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl ExtResult {
    pub fn error(message: impl Into<String>) -> Self {
        ExtResult {
            status: ExtStatus::Error,
            placements: vec![],
            space_utilization: 0.0,
            message: Some(message.into()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OrIgnored<T> {
    Valid(T),
    Ignored(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Deserializes `T`, falling back to `T::default()` for `null` or values of the wrong shape.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    match Option::<OrIgnored<T>>::deserialize(deserializer)? {
        Some(OrIgnored::Valid(value)) => Ok(value),
        Some(OrIgnored::Ignored(_)) | None => Ok(T::default()),
    }
}

/// Accepts numbers and numeric strings, truncated to an integer.
/// Anything else, or a value below 1, is treated as absent.
fn positive_int<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<LenientNumber>::deserialize(deserializer)? {
        Some(LenientNumber::Number(n)) => Some(n),
        Some(LenientNumber::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(LenientNumber::Other(_)) | None => None,
    };
    Ok(value
        .filter(|v| v.is_finite() && *v >= 1.0)
        .map(|v| v.trunc() as usize))
}
