use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub page: i64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Absent on some error-shaped payloads
    pub total_pages: Option<i64>,
    pub total_results: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverMovie {
    pub id: i32,
    pub title: String,
    #[serde(default, deserialize_with = "empty_date_as_none")]
    pub release_date: Option<NaiveDate>,
    pub original_language: Option<String>,
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieCredits {
    pub id: i32,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub id: i32,
    pub name: String,
    pub character: Option<String>,
    /// Billing position, 0 for the lead
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: i32,
    pub name: String,
    pub job: Option<String>,
    pub department: Option<String>,
}

/// Entry of `/person/popular`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: i32,
    pub name: String,
    pub known_for_department: Option<String>,
    pub popularity: Option<f64>,
}

impl Person {
    /// Missing departments are treated as acting
    pub fn is_actor(&self) -> bool {
        matches!(self.known_for_department.as_deref(), None | Some("Acting"))
    }
}

impl MovieCredits {
    pub fn director(&self) -> Option<&CrewMember> {
        self.crew.iter().find(|c| c.job.as_deref() == Some("Director"))
    }
}

// TMDB sends "" for unknown release dates
fn empty_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
