//! HTML rendering of a [`SessionView`].
//!
//! Pure functions from an already-resolved snapshot to markup. A bundle is
//! only rendered when the session is in `DataReady` or still showing the
//! previous bundle while `DataLoading`; an error never comes with data.

use std::fmt::Write;

use crate::{
    config::CredentialStatus,
    session::{SessionView, Status},
    types::{DataBundle, TimeRange, UserProfile},
    utils::format_count,
};

const STYLE: &str = "body{background:#2a2a2a;color:#fff;font-family:system-ui;margin:0}\
main{max-width:1200px;margin:0 auto;padding:40px}\
.grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(300px,1fr));gap:30px}\
section{background:#3a3a3a;border-radius:12px;padding:20px}\
h2{font-size:14px;color:#b3b3b3;text-transform:uppercase;letter-spacing:.5px}\
li{background:#1a1a1a;border-radius:8px;padding:15px;margin-bottom:10px;list-style:none}\
small{color:#b3b3b3}.error{color:#ff4444}\
button{background:#1ed760;color:#000;border:0;border-radius:50px;padding:10px 24px;font-weight:600;cursor:pointer}\
button.active{background:#fff}";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(body: &str, refresh: bool) -> String {
    let meta = if refresh {
        "<meta http-equiv=\"refresh\" content=\"1\">"
    } else {
        ""
    };
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>My Spotify Dashboard</title>{meta}<style>{STYLE}</style></head><body><main>{body}</main></body></html>"
    )
}

fn form_button(action: &str, label: &str, class: &str) -> String {
    format!(
        "<form method=\"post\" action=\"{}\" style=\"display:inline\"><button class=\"{}\">{}</button></form>",
        escape(action),
        class,
        escape(label)
    )
}

pub fn render(view: &SessionView) -> String {
    let mut body = String::new();

    match &view.status {
        Status::Booting | Status::ExchangingCode => {
            body.push_str("<h1>My Spotify Dashboard</h1><p>Loading...</p>");
            return page(&body, true);
        }
        Status::Unauthenticated => {
            body.push_str("<h1>My Spotify Dashboard</h1>");
            body.push_str("<p>Connect your Spotify account to see your music data</p>");
            body.push_str("<a href=\"/login\"><button>Login with Spotify</button></a>");
            return page(&body, false);
        }
        Status::AuthError(reason) => {
            body.push_str("<h1>My Spotify Dashboard</h1><h2>Can't log in</h2>");
            let _ = write!(body, "<p class=\"error\">{}</p>", escape(reason));
            body.push_str(&form_button("/retry", "Try Login Again", ""));
            return page(&body, false);
        }
        _ => {}
    }

    render_header(&mut body, view);

    match &view.status {
        Status::Authenticated => {
            body.push_str("<h1>Connected to Spotify!</h1><p>Ready to load your music data</p>");
            body.push_str(&form_button("/load", "Load My Music Data", ""));
        }
        Status::DataLoading if view.bundle.is_none() => {
            body.push_str("<h1>Loading your music data...</h1>");
        }
        Status::DataError(reason) => {
            body.push_str("<h1>Error Loading Data</h1>");
            let _ = write!(body, "<p class=\"error\">{}</p>", escape(reason));
            body.push_str(&form_button("/retry", "Try Again", ""));
        }
        _ => {}
    }

    if !matches!(view.status, Status::DataError(_)) {
        if let Some(bundle) = &view.bundle {
            render_bundle(&mut body, bundle);
        }
    }

    page(&body, view.status == Status::DataLoading)
}

fn render_header(body: &mut String, view: &SessionView) {
    body.push_str("<header>");
    if let Some(profile) = &view.profile {
        render_profile(body, profile);
    }
    for range in TimeRange::ALL {
        let class = if range == view.time_range { "active" } else { "" };
        body.push_str(&form_button(
            &format!("/range/{}", range.as_str()),
            range.label(),
            class,
        ));
    }
    body.push_str(&form_button("/logout", "Logout", ""));
    body.push_str("</header>");
}

fn render_profile(body: &mut String, profile: &UserProfile) {
    let _ = write!(
        body,
        "<details style=\"display:inline-block\"><summary>{}</summary><ul>",
        escape(profile.name())
    );
    if let Some(email) = &profile.email {
        let _ = write!(body, "<li>{}</li>", escape(email));
    }
    if let Some(product) = &profile.product {
        let _ = write!(body, "<li>Plan: {}</li>", escape(product));
    }
    if let Some(followers) = &profile.followers {
        let _ = write!(body, "<li>{} followers</li>", format_count(followers.total));
    }
    body.push_str("</ul></details>");
}

fn render_bundle(body: &mut String, bundle: &DataBundle) {
    body.push_str("<div class=\"grid\">");

    body.push_str("<section><h2>Top Tracks</h2><ol>");
    for (i, track) in bundle.top_tracks.iter().enumerate() {
        let _ = write!(
            body,
            "<li>{} <b>{}</b><br><small>{}</small></li>",
            i + 1,
            escape(&track.name),
            escape(track.primary_artist().unwrap_or_default())
        );
    }
    if bundle.top_tracks.is_empty() {
        body.push_str("<li>No top tracks available</li>");
    }
    body.push_str("</ol></section>");

    body.push_str("<section><h2>Top Artists</h2><ol>");
    for (i, artist) in bundle.top_artists.iter().enumerate() {
        let _ = write!(
            body,
            "<li>{} <b>{}</b><br><small>{} followers</small></li>",
            i + 1,
            escape(&artist.name),
            format_count(artist.followers.total)
        );
    }
    if bundle.top_artists.is_empty() {
        body.push_str("<li>No top artists available</li>");
    }
    body.push_str("</ol></section>");

    body.push_str("<section><h2>Recently Played</h2><ol>");
    for (i, entry) in bundle.recent.iter().enumerate() {
        let _ = write!(
            body,
            "<li>{} <b>{}</b><br><small>{}</small></li>",
            i + 1,
            escape(&entry.track.name),
            escape(entry.track.primary_artist().unwrap_or_default())
        );
    }
    if bundle.recent.is_empty() {
        body.push_str("<li>No recently played tracks</li>");
    }
    body.push_str("</ol></section>");

    body.push_str("</div>");
}

/// Page shown for every route when the credentials are missing or invalid.
pub fn render_config_error(reason: &str, credentials: &CredentialStatus) -> String {
    let mut body = String::from("<h1>My Spotify Dashboard</h1><h2>Configuration error</h2>");
    let _ = write!(body, "<p class=\"error\">{}</p>", escape(reason));
    let _ = write!(
        body,
        "<p><small>CLIENT_ID: {}</small></p>",
        escape(credentials.client_id.as_deref().unwrap_or("MISSING"))
    );
    let secret = if credentials.broker_configured {
        "NOT NEEDED (token broker)"
    } else if credentials.client_secret_loaded {
        "LOADED"
    } else {
        "MISSING"
    };
    let _ = write!(body, "<p><small>CLIENT_SECRET: {}</small></p>", secret);
    page(&body, false)
}
