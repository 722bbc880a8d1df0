use tabled::Table;

use crate::{
    cli::authenticated_session,
    config::Config,
    error, info,
    types::TimeRange,
    utils::{artist_rows, recent_rows, spinner, track_rows},
};

/// Prints the three statistics lists for `time_range`.
///
/// Nothing is printed unless all three lists loaded.
pub async fn stats(config: Config, time_range: TimeRange) {
    let session = authenticated_session(&config).await;
    if let Err(e) = session.set_time_range(time_range).await {
        error!("{}", e);
    }

    let pb = spinner("Loading your music data...");
    let result = session.load_data().await;
    pb.finish_and_clear();

    if let Err(e) = result {
        error!("{}", e);
    }

    let view = session.view().await;
    let Some(bundle) = view.bundle else {
        error!("No data loaded.");
    };

    match &view.profile {
        Some(profile) => info!("{} ({})", profile.name(), time_range.label()),
        None => info!("{}", time_range.label()),
    }

    info!("Top tracks");
    println!("{}", Table::new(track_rows(&bundle.top_tracks)));
    info!("Top artists");
    println!("{}", Table::new(artist_rows(&bundle.top_artists)));
    info!("Recently played");
    println!("{}", Table::new(recent_rows(&bundle.recent)));
}
