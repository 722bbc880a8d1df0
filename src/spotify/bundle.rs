use crate::{
    error::{AggregateError, ApiError},
    spotify::client::SpotifyClient,
    types::{BundlePart, DataBundle, TimeRange},
};

/// Loads top tracks, top artists and recently played tracks as one bundle.
///
/// The three requests run concurrently and are all awaited to completion,
/// even when one of them fails early. The bundle is all-or-nothing: if any
/// part failed the successful parts are dropped and every failure is
/// reported in bundle order.
pub async fn load_bundle(
    client: &SpotifyClient,
    token: &str,
    time_range: TimeRange,
    limit: u32,
) -> Result<DataBundle, AggregateError> {
    tracing::debug!(%time_range, limit, "loading data bundle");

    let (top_tracks, top_artists, recent) = tokio::join!(
        client.get_top_tracks(token, time_range, limit),
        client.get_top_artists(token, time_range, limit),
        client.get_recently_played(token, limit),
    );

    match (top_tracks, top_artists, recent) {
        (Ok(top_tracks), Ok(top_artists), Ok(recent)) => Ok(DataBundle {
            time_range,
            top_tracks,
            top_artists,
            recent,
        }),
        (top_tracks, top_artists, recent) => {
            let failures: Vec<(BundlePart, ApiError)> = [
                (BundlePart::TopTracks, top_tracks.err()),
                (BundlePart::TopArtists, top_artists.err()),
                (BundlePart::RecentlyPlayed, recent.err()),
            ]
            .into_iter()
            .filter_map(|(part, err)| err.map(|e| (part, e)))
            .collect();

            let failed: Vec<BundlePart> = failures.iter().map(|(part, _)| *part).collect();
            tracing::warn!(?failed, "data bundle incomplete");
            Err(AggregateError { failures })
        }
    }
}
