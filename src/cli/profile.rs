use crate::{cli::authenticated_session, config::Config, error, info, utils::format_count};

pub async fn profile(config: Config) {
    let session = authenticated_session(&config).await;
    let profile = match session.load_profile().await {
        Ok(p) => p,
        Err(e) => error!("{}", e),
    };

    info!("Name: {}", profile.name());
    info!("Id: {}", profile.id);
    if let Some(email) = &profile.email {
        info!("Email: {}", email);
    }
    if let Some(country) = &profile.country {
        info!("Country: {}", country);
    }
    if let Some(product) = &profile.product {
        info!("Plan: {}", product);
    }
    if let Some(followers) = &profile.followers {
        info!("Followers: {}", format_count(followers.total));
    }
}
