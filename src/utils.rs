use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::types::{
    Artist, ArtistTableRow, PlayHistoryEntry, RecentTableRow, Track, TrackTableRow,
};

/// `m:ss` representation of a track duration.
pub fn format_duration(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Groups thousands with commas, e.g. `1234567` -> `1,234,567`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn track_rows(tracks: &[Track]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            rank: i + 1,
            name: t.name.clone(),
            artists: t.artist_names(),
            album: t.album.name.clone(),
            duration: format_duration(t.duration_ms),
        })
        .collect()
}

pub fn artist_rows(artists: &[Artist]) -> Vec<ArtistTableRow> {
    artists
        .iter()
        .enumerate()
        .map(|(i, a)| ArtistTableRow {
            rank: i + 1,
            name: a.name.clone(),
            followers: a.followers.total,
            genres: a.genres.iter().take(3).cloned().collect::<Vec<_>>().join(","),
        })
        .collect()
}

pub fn recent_rows(recent: &[PlayHistoryEntry]) -> Vec<RecentTableRow> {
    recent
        .iter()
        .map(|e| RecentTableRow {
            played_at: e.played_at.format("%Y-%m-%d %H:%M").to_string(),
            name: e.track.name.clone(),
            artists: e.track.artist_names(),
        })
        .collect()
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
