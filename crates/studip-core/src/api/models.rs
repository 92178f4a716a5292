//! Wire types for the Stud.IP REST API
//!
//! Only the fields the mirror needs are decoded; everything else in the
//! responses is ignored.

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;

/// A `collection` value from a list endpoint
///
/// The API returns collections either as JSON arrays or as JSON objects
/// keyed by resource path; both decode to the items in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T>(pub Vec<T>);

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Collection(Vec::new())
    }
}

impl<T> Collection<T> {
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Collection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
            serde_json::Value::Null => Vec::new(),
            other => {
                return Err(D::Error::custom(format!(
                    "expected collection array or object, got {}",
                    other
                )))
            }
        };

        items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
            .collect::<Result<Vec<T>, _>>()
            .map(Collection)
    }
}

/// Envelope of every list endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Page<T> {
    #[serde(default)]
    pub collection: Collection<T>,
}

/// `GET /user`
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub user_id: String,
}

/// Entry of `GET /semesters`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Semester {
    pub id: String,
    pub title: String,
}

/// Entry of `GET /user/{id}/courses`
#[derive(Debug, Clone, Deserialize)]
pub struct RawCourse {
    pub course_id: String,
    pub title: String,
    /// Map of module name to resource path; PHP encodes an empty map as `[]`
    #[serde(default)]
    pub modules: serde_json::Value,
}

impl RawCourse {
    /// Path of the course's root document folder, if the documents module
    /// is enabled
    pub fn documents_path(&self) -> Option<&str> {
        self.modules.get("documents").and_then(|v| v.as_str())
    }
}

/// A folder as returned by the folder endpoints
///
/// Doubles as the stub from which the full subtree is fetched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFolder {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_readable: Option<bool>,
}

/// A file reference as listed in `GET /folder/{id}/files`
#[derive(Debug, Clone, Deserialize)]
pub struct RawFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_downloadable: Option<bool>,
}

/// `GET /file/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct FileMeta {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_downloadable: bool,
}
