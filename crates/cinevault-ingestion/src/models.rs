//! Wire models for the TMDB v3 API.
//!
//! Listing endpoints return summaries; `/movie/{id}` with
//! `append_to_response=videos,keywords,credits` returns [`MovieDetails`]
//! with the three extras inlined. Absent or null fields default rather
//! than fail, since upstream payloads are irregular between titles.

use serde::{Deserialize, Serialize};

/// One page of a paged listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: i64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub total_results: i64,
}

/// Listing entry; just enough to gate an item before paying for its detail
/// request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

/// Full movie record with appended videos, keywords and credits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    /// Upstream sends "" for unreleased titles; parsed leniently during
    /// assembly.
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub adult: bool,
    /// Inline genre objects. When this field is present it wins over
    /// `genre_ids`, even when empty.
    #[serde(default)]
    pub genres: Option<Vec<GenreDto>>,
    /// Bare genre ids, the summary-shaped fallback.
    #[serde(default)]
    pub genre_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub production_companies: Vec<CompanyDto>,
    #[serde(default)]
    pub videos: Option<VideoList>,
    #[serde(default)]
    pub keywords: Option<KeywordList>,
    #[serde(default)]
    pub credits: Option<CreditsDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreDto {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<VideoDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDto {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub official: bool,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordList {
    #[serde(default)]
    pub keywords: Vec<KeywordDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordDto {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditsDto {
    #[serde(default)]
    pub cast: Vec<CastCreditDto>,
    #[serde(default)]
    pub crew: Vec<CrewCreditDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastCreditDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewCreditDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_detail_payload_with_extras() {
        let json = r#"{
            "id": 550,
            "title": "Fight Club",
            "overview": "An insomniac office worker...",
            "poster_path": "/poster.jpg",
            "vote_average": 8.4,
            "vote_count": 26000,
            "release_date": "1999-10-15",
            "runtime": 139,
            "status": "Released",
            "popularity": 61.4,
            "original_language": "en",
            "adult": false,
            "genres": [{"id": 18, "name": "Drama"}],
            "production_companies": [
                {"id": 508, "name": "Regency Enterprises", "logo_path": null, "origin_country": "US"}
            ],
            "videos": {"results": [
                {"key": "abc123", "site": "YouTube", "type": "Trailer", "official": true, "name": "Official Trailer"}
            ]},
            "keywords": {"keywords": [{"id": 825, "name": "support group"}]},
            "credits": {"cast": [
                {"id": 819, "name": "Edward Norton", "character": "The Narrator", "profile_path": null, "order": 0}
            ], "crew": []}
        }"#;

        let details: MovieDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.id, 550);
        assert_eq!(details.genres.as_ref().unwrap()[0].name, "Drama");
        assert!(details.genre_ids.is_none());
        assert_eq!(details.videos.unwrap().results[0].kind, "Trailer");
        assert_eq!(details.keywords.unwrap().keywords[0].name, "support group");
        assert_eq!(details.credits.unwrap().cast[0].order, 0);
    }

    #[test]
    fn missing_extras_default_instead_of_failing() {
        let json = r#"{"id": 1, "title": "Sparse", "release_date": ""}"#;
        let details: MovieDetails = serde_json::from_str(json).unwrap();

        assert_eq!(details.release_date.as_deref(), Some(""));
        assert!(details.genres.is_none());
        assert!(details.genre_ids.is_none());
        assert!(details.videos.is_none());
        assert!(details.production_companies.is_empty());
        assert_eq!(details.vote_average, 0.0);
    }

    #[test]
    fn parses_summary_page() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 603, "title": "The Matrix", "adult": false, "genre_ids": [28, 878]},
                {"id": 604, "title": "Unflagged"}
            ],
            "total_pages": 500,
            "total_results": 10000
        }"#;

        let page: Page<MovieSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].genre_ids, vec![28, 878]);
        assert!(!page.results[1].adult);
        assert!(page.results[1].genre_ids.is_empty());
    }
}
