use chrono::{TimeZone, Utc};
use sporlstats::config::CredentialStatus;
use sporlstats::session::{SessionView, Status};
use sporlstats::types::{
    AlbumRef, Artist, DataBundle, ExternalUrls, Followers, PlayHistoryEntry, SimplifiedArtist,
    TimeRange, Track, UserProfile,
};
use sporlstats::utils::*;
use sporlstats::view::{escape, render, render_config_error};

// Helper function to create a test track
fn create_test_track(id: &str, name: &str, artists: &[&str], duration_ms: u64) -> Track {
    Track {
        id: Some(id.to_string()),
        name: name.to_string(),
        artists: artists
            .iter()
            .enumerate()
            .map(|(i, a)| SimplifiedArtist {
                id: Some(format!("{}_artist_{}", id, i)),
                name: a.to_string(),
            })
            .collect(),
        album: AlbumRef {
            id: Some(format!("{}_album", id)),
            name: format!("{} Album", name),
            images: vec![],
        },
        duration_ms,
        external_urls: ExternalUrls::default(),
    }
}

// Helper function to create a test artist
fn create_test_artist(id: &str, name: &str, followers: u64, genres: &[&str]) -> Artist {
    Artist {
        id: id.to_string(),
        name: name.to_string(),
        images: vec![],
        genres: genres.iter().map(|g| g.to_string()).collect(),
        followers: Followers { total: followers },
        external_urls: ExternalUrls::default(),
    }
}

fn create_test_bundle() -> DataBundle {
    DataBundle {
        time_range: TimeRange::ShortTerm,
        top_tracks: vec![create_test_track("t1", "Song <One>", &["Band"], 215000)],
        top_artists: vec![create_test_artist("a1", "Band", 1234567, &["rock"])],
        recent: vec![PlayHistoryEntry {
            track: create_test_track("t2", "Recent Song", &["Other"], 60000),
            played_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        }],
    }
}

fn create_test_view(status: Status, bundle: Option<DataBundle>) -> SessionView {
    SessionView {
        authenticated: status.has_token(),
        status,
        time_range: TimeRange::ShortTerm,
        limit: 10,
        bundle,
        profile: None,
    }
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(0), "0:00");
    assert_eq!(format_duration(59999), "0:59");
    assert_eq!(format_duration(215000), "3:35");
    assert_eq!(format_duration(3600000), "60:00");
}

#[test]
fn test_format_count() {
    assert_eq!(format_count(0), "0");
    assert_eq!(format_count(999), "999");
    assert_eq!(format_count(1000), "1,000");
    assert_eq!(format_count(1234567), "1,234,567");
    assert_eq!(format_count(100000), "100,000");
}

#[test]
fn test_track_rows() {
    let tracks = vec![
        create_test_track("t1", "First", &["A", "B"], 215000),
        create_test_track("t2", "Second", &[], 61000),
    ];

    let rows = track_rows(&tracks);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[0].artists, "A, B");
    assert_eq!(rows[0].album, "First Album");
    assert_eq!(rows[0].duration, "3:35");
    assert_eq!(rows[1].rank, 2);
    assert_eq!(rows[1].artists, "");
}

#[test]
fn test_artist_rows_limit_genres() {
    let artists = vec![create_test_artist(
        "a1",
        "Band",
        42,
        &["rock", "indie", "pop", "folk"],
    )];

    let rows = artist_rows(&artists);

    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[0].followers, 42);
    assert_eq!(rows[0].genres, "rock,indie,pop");
}

#[test]
fn test_recent_rows() {
    let bundle = create_test_bundle();

    let rows = recent_rows(&bundle.recent);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].played_at, "2024-05-01 12:30");
    assert_eq!(rows[0].name, "Recent Song");
    assert_eq!(rows[0].artists, "Other");
}

#[test]
fn test_recent_entry_identity_includes_play_time() {
    let track = create_test_track("t1", "Song", &["Band"], 1000);
    let first = PlayHistoryEntry {
        track: track.clone(),
        played_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    };
    let second = PlayHistoryEntry {
        track,
        played_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 4, 0).unwrap(),
    };

    assert_eq!(first.key().0, Some("t1"));
    assert_eq!(first.key().0, second.key().0);
    assert_ne!(first.key(), second.key());
}

#[test]
fn test_local_file_play_decodes_without_ids() {
    let entry: PlayHistoryEntry = serde_json::from_value(serde_json::json!({
        "track": {
            "id": null,
            "name": "Home Recording",
            "artists": [{ "id": null, "name": "Me" }],
            "album": { "id": null, "name": "Demos", "images": [] },
            "duration_ms": 180000,
            "external_urls": {}
        },
        "played_at": "2024-05-01T12:00:00.000Z"
    }))
    .unwrap();

    assert_eq!(entry.track.id, None);
    assert_eq!(entry.track.artists[0].id, None);
    assert_eq!(entry.track.album.id, None);
    assert_eq!(entry.key().0, None);
    assert_eq!(recent_rows(&[entry])[0].artists, "Me");
}

#[test]
fn test_time_range_parse() {
    for range in TimeRange::ALL {
        assert_eq!(TimeRange::parse(range.as_str()), Some(range));
    }
    assert_eq!(TimeRange::parse("forever"), None);
    assert_eq!(TimeRange::default(), TimeRange::MediumTerm);
}

#[test]
fn test_escape() {
    assert_eq!(
        escape("<a href=\"x\">Tom & Jerry's</a>"),
        "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
    );
    assert_eq!(escape("plain"), "plain");
}

#[test]
fn test_render_unauthenticated_shows_login() {
    let html = render(&create_test_view(Status::Unauthenticated, None));

    assert!(html.contains("Login with Spotify"));
    assert!(html.contains("href=\"/login\""));
    assert!(!html.contains("/logout"));
}

#[test]
fn test_render_auth_error_offers_retry() {
    let html = render(&create_test_view(
        Status::AuthError("token endpoint answered with HTTP 400".to_string()),
        None,
    ));

    assert!(html.contains("Can't log in"));
    assert!(html.contains("HTTP 400"));
    assert!(html.contains("Try Login Again"));
}

#[test]
fn test_render_data_ready_shows_all_sections() {
    let html = render(&create_test_view(Status::DataReady, Some(create_test_bundle())));

    assert!(html.contains("Top Tracks"));
    assert!(html.contains("Top Artists"));
    assert!(html.contains("Recently Played"));
    assert!(html.contains("Song &lt;One&gt;"));
    assert!(html.contains("1,234,567 followers"));
    assert!(html.contains("/range/short_term"));
    assert!(html.contains("Logout"));
}

#[test]
fn test_render_empty_lists() {
    let bundle = DataBundle {
        time_range: TimeRange::MediumTerm,
        top_tracks: vec![],
        top_artists: vec![],
        recent: vec![],
    };

    let html = render(&create_test_view(Status::DataReady, Some(bundle)));

    assert!(html.contains("No top tracks available"));
    assert!(html.contains("No top artists available"));
    assert!(html.contains("No recently played tracks"));
}

#[test]
fn test_render_data_error_hides_bundle() {
    let html = render(&create_test_view(
        Status::DataError("failed to load top tracks".to_string()),
        Some(create_test_bundle()),
    ));

    assert!(html.contains("Error Loading Data"));
    assert!(html.contains("Try Again"));
    assert!(!html.contains("Song &lt;One&gt;"));
}

#[test]
fn test_render_profile() {
    let mut view = create_test_view(Status::Authenticated, None);
    view.profile = Some(UserProfile {
        id: "listener".to_string(),
        display_name: None,
        email: Some("listener@example.com".to_string()),
        country: None,
        product: Some("premium".to_string()),
        images: vec![],
        followers: Some(Followers { total: 1200 }),
    });

    let html = render(&view);

    assert!(html.contains("<summary>listener</summary>"));
    assert!(html.contains("listener@example.com"));
    assert!(html.contains("Plan: premium"));
    assert!(html.contains("1,200 followers"));
    assert!(html.contains("Load My Music Data"));
}

#[test]
fn test_render_config_error() {
    let credentials = CredentialStatus {
        client_id: None,
        client_secret_loaded: true,
        broker_configured: false,
    };

    let html = render_config_error("missing required environment variable X", &credentials);

    assert!(html.contains("Configuration error"));
    assert!(html.contains("CLIENT_ID: MISSING"));
    assert!(html.contains("CLIENT_SECRET: LOADED"));
}
