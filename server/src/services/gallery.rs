//! Photo catalog for the exhibit.
//!
//! The artworks are fixed at build time: five works by each artist, served
//! as static images from the SPA bundle.

#[cfg(test)]
#[path = "gallery_test.rs"]
mod gallery_test;

use serde::Serialize;

const WORKS_PER_ARTIST: i64 = 5;
const FALLBACK_URL: &str = "/L_1.jpg";
const FALLBACK_LABEL: &str = "絵";

struct Artist {
    id_prefix: &'static str,
    url_prefix: &'static str,
    name: &'static str,
}

const ARTISTS: [Artist; 2] = [
    Artist { id_prefix: "l", url_prefix: "L", name: "Lee Jong-keun" },
    Artist { id_prefix: "k", url_prefix: "K", name: "Kodama Mitsuo" },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Photo {
    pub id: String,
    pub url: String,
    pub label: String,
    pub artist: String,
}

/// Every photo in exhibit order. Labels number the works across artists.
#[must_use]
pub fn catalog() -> Vec<Photo> {
    ARTISTS
        .iter()
        .zip(0_i64..)
        .flat_map(|(artist, a)| (1..=WORKS_PER_ARTIST).map(move |n| work(a, artist, n)))
        .collect()
}

fn work(artist_index: i64, artist: &Artist, n: i64) -> Photo {
    let offset = artist_index * WORKS_PER_ARTIST;
    Photo {
        id: format!("{}{n}", artist.id_prefix),
        url: format!("/{}_{n}.jpg", artist.url_prefix),
        label: format!("{FALLBACK_LABEL} {}", offset.saturating_add(n)),
        artist: artist.name.to_owned(),
    }
}

/// Work number from the part of an id after the artist prefix. Anything
/// that is not a non-zero integer counts as the artist's first work.
fn work_number(rest: &str) -> i64 {
    match rest.trim().parse::<i64>() {
        Ok(0) | Err(_) => 1,
        Ok(n) => n,
    }
}

/// Look up a photo by id.
#[must_use]
pub fn find(photo_id: &str) -> Option<Photo> {
    catalog().into_iter().find(|p| p.id == photo_id)
}

/// Resolve any photo id to an image.
///
/// Ids starting with an artist prefix keep that artist and take their number
/// from the rest of the id (`k7` is `/K_7.jpg`, `lfoo` is `/L_1.jpg`); any
/// other id gets the default image.
#[must_use]
pub fn photo_or_fallback(photo_id: &str) -> Photo {
    ARTISTS
        .iter()
        .zip(0_i64..)
        .find_map(|(artist, a)| {
            let rest = photo_id.strip_prefix(artist.id_prefix)?;
            Some(Photo { id: photo_id.to_owned(), ..work(a, artist, work_number(rest)) })
        })
        .unwrap_or_else(|| Photo {
            id: photo_id.to_owned(),
            url: FALLBACK_URL.to_owned(),
            label: FALLBACK_LABEL.to_owned(),
            artist: String::new(),
        })
}
