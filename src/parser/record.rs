//! Record Extractor: one catalog entry node to one `MovieRecord`.
//!
//! Each field is looked up on its own; a missing or unparsable field becomes
//! `None` without affecting the others. A record with an empty title is
//! returned as-is and the caller drops it.

use super::entities::decode_entities;
use super::node::{CatalogNode, CREDIT, DESCRIPTION, HEADER, METADATA, POSTER, RATING, VOTE_COUNT};
use crate::types::MovieRecord;
use tracing::debug;

/// Year, duration and age rating as they appear positionally in the metadata row.
#[derive(Debug, Default, PartialEq)]
struct Metadata {
    year: Option<i32>,
    duration: Option<String>,
    age_rating: Option<String>,
}

pub fn extract_record<N: CatalogNode + ?Sized>(node: &N, ordinal: u32) -> MovieRecord {
    let (rank, title) = rank_and_title(node, ordinal);
    let meta = metadata(node);
    let (rating_value, rating_count) = rating(node).unzip();
    let (directors, cast) = credits(node);

    let record = MovieRecord {
        rank: Some(rank),
        title,
        year: meta.year,
        duration: meta.duration,
        age_rating: meta.age_rating,
        rating_value,
        rating_count,
        poster_url: poster(node),
        description: description(node),
        directors,
        cast,
    };

    let missing = missing_fields(&record);
    if !missing.is_empty() {
        debug!(ordinal, title = %record.title, ?missing, "Extracted partial record");
    }
    record
}

fn rank_and_title<N: CatalogNode + ?Sized>(node: &N, ordinal: u32) -> (u32, String) {
    let header = node.find_text(&HEADER).unwrap_or_default();
    split_header(&header, ordinal)
}

/// Splits "12. Title" at the first `.`; an unparsable rank falls back to `ordinal`
/// and a header without a separator yields an empty title.
pub(crate) fn split_header(header: &str, ordinal: u32) -> (u32, String) {
    match header.split_once('.') {
        Some((rank, title)) => {
            let rank = rank.trim().parse().unwrap_or(ordinal);
            let title = decode_entities(title.trim()).trim().to_string();
            (rank, title)
        }
        None => (ordinal, String::new()),
    }
}

fn metadata<N: CatalogNode + ?Sized>(node: &N) -> Metadata {
    let items = node.find_all_text(&METADATA);
    let at = |i: usize| items.get(i).map(|s| s.trim()).filter(|s| !s.is_empty()).map(str::to_string);
    Metadata {
        year: items.first().and_then(|s| parse_year(s)),
        duration: at(1),
        age_rating: at(2),
    }
}

/// Only plain integer literals count as a year.
pub(crate) fn parse_year(text: &str) -> Option<i32> {
    let text = text.trim();
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Rating and vote count come from the same block: if either lookup or the
/// rating parse fails, both are dropped.
fn rating<N: CatalogNode + ?Sized>(node: &N) -> Option<(f64, String)> {
    let rating_text = node.find_text(&RATING).ok()?;
    let vote_text = node.find_text(&VOTE_COUNT).ok()?;
    let value = parse_rating(&rating_text)?;
    Some((value, clean_vote_count(&vote_text)))
}

pub(crate) fn parse_rating(text: &str) -> Option<f64> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

pub(crate) fn clean_vote_count(text: &str) -> String {
    text.trim()
        .trim_matches(|c| c == '(' || c == ')')
        .replace('\u{a0}', "")
        .trim()
        .to_string()
}

fn poster<N: CatalogNode + ?Sized>(node: &N) -> Option<String> {
    node.find_attribute(&POSTER, "src")
        .ok()
        .filter(|src| !src.trim().is_empty())
}

fn description<N: CatalogNode + ?Sized>(node: &N) -> Option<String> {
    node.find_text(&DESCRIPTION)
        .ok()
        .map(|text| decode_entities(&text).trim().to_string())
        .filter(|text| !text.is_empty())
}

/// First credit link is the director, the rest are cast, in page order.
fn credits<N: CatalogNode + ?Sized>(node: &N) -> (Vec<String>, Vec<String>) {
    let names = node.find_all_text(&CREDIT);
    match names.split_first() {
        Some((director, cast)) => (vec![director.clone()], cast.to_vec()),
        None => (Vec::new(), Vec::new()),
    }
}

fn missing_fields(record: &MovieRecord) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if record.year.is_none() {
        missing.push("year");
    }
    if record.duration.is_none() {
        missing.push("duration");
    }
    if record.age_rating.is_none() {
        missing.push("age_rating");
    }
    if record.rating_value.is_none() {
        missing.push("rating");
    }
    if record.poster_url.is_none() {
        missing.push("poster_url");
    }
    if record.description.is_none() {
        missing.push("description");
    }
    if record.directors.is_empty() {
        missing.push("credits");
    }
    missing
}
