//! Assembly of a detail record into a fully-resolved insert payload.
//!
//! Pure functions: all remote data is already in hand, genre references are
//! resolved against the pre-seeded id set, and the output is ready for a
//! single transactional save.

use std::collections::HashSet;

use chrono::NaiveDate;

use cinevault_db::schema::{NewCastMember, NewCompany, NewMovie};

use crate::models::{CastCreditDto, KeywordDto, MovieDetails, VideoDto};

/// Cast cap per movie: the first entries in source order.
pub const MAX_CAST_ENTRIES: usize = 10;

/// Genre references arrive in one of two shapes. Inline objects win
/// whenever the field is present, even when the list is empty; bare ids
/// are only consulted otherwise.
#[derive(Debug)]
pub enum GenreInput {
    Objects(Vec<i64>),
    Ids(Vec<i64>),
    Absent,
}

impl GenreInput {
    pub fn from_details(details: &MovieDetails) -> Self {
        match (&details.genres, &details.genre_ids) {
            (Some(objects), _) => GenreInput::Objects(objects.iter().map(|g| g.id).collect()),
            (None, Some(ids)) => GenreInput::Ids(ids.clone()),
            (None, None) => GenreInput::Absent,
        }
    }

    /// Resolve against the known vocabulary: unknown ids are dropped, order
    /// is kept, duplicates collapse to the first occurrence.
    pub fn resolve(self, known: &HashSet<i64>) -> Vec<i64> {
        let ids = match self {
            GenreInput::Objects(ids) | GenreInput::Ids(ids) => ids,
            GenreInput::Absent => Vec::new(),
        };
        let mut seen = HashSet::new();
        ids.into_iter()
            .filter(|id| known.contains(id) && seen.insert(*id))
            .collect()
    }
}

/// First video satisfying the trailer predicate: hosted on YouTube, typed
/// Trailer or Teaser, and officially flagged.
pub fn pick_trailer(videos: &[VideoDto]) -> Option<&VideoDto> {
    videos.iter().find(|v| {
        v.site == "YouTube" && (v.kind == "Trailer" || v.kind == "Teaser") && v.official
    })
}

/// Lenient release-date parse: absent, empty and malformed all become None.
fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// The first `min(10, n)` credits in source order, each keeping its original
/// credit-order value as its position key.
fn truncate_cast(credits: &[CastCreditDto]) -> Vec<NewCastMember> {
    credits
        .iter()
        .take(MAX_CAST_ENTRIES)
        .map(|credit| NewCastMember {
            tmdb_id: credit.id,
            name: credit.name.clone(),
            character: credit.character.clone(),
            profile_path: credit.profile_path.clone(),
            credit_order: credit.order,
        })
        .collect()
}

/// Keyword names with duplicates collapsed, first occurrence order kept.
fn keyword_names(keywords: &[KeywordDto]) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .iter()
        .filter(|k| seen.insert(k.name.as_str()))
        .map(|k| k.name.clone())
        .collect()
}

/// Map a detail record into the insert payload.
pub fn assemble_movie(details: &MovieDetails, known_genres: &HashSet<i64>) -> NewMovie {
    let genre_ids = GenreInput::from_details(details).resolve(known_genres);

    let trailer_key = details
        .videos
        .as_ref()
        .and_then(|videos| pick_trailer(&videos.results))
        .map(|video| video.key.clone());

    let keywords = details
        .keywords
        .as_ref()
        .map(|list| keyword_names(&list.keywords))
        .unwrap_or_default();

    let cast = details
        .credits
        .as_ref()
        .map(|credits| truncate_cast(&credits.cast))
        .unwrap_or_default();

    let companies = details
        .production_companies
        .iter()
        .map(|company| NewCompany {
            tmdb_id: company.id,
            name: company.name.clone(),
            logo_path: company.logo_path.clone(),
            origin_country: company.origin_country.clone(),
        })
        .collect();

    NewMovie {
        tmdb_id: details.id,
        title: details.title.clone(),
        overview: details.overview.clone(),
        poster_path: details.poster_path.clone(),
        backdrop_path: details.backdrop_path.clone(),
        vote_average: details.vote_average,
        vote_count: details.vote_count,
        release_date: parse_release_date(details.release_date.as_deref()),
        runtime: details.runtime,
        status: details.status.clone(),
        popularity: details.popularity,
        original_language: details.original_language.clone(),
        original_title: details.original_title.clone(),
        adult: details.adult,
        trailer_key,
        keywords,
        genre_ids,
        companies,
        cast,
    }
}
