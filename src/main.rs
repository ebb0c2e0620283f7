#![windows_subsystem = "windows"]
slint::include_modules!();

use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use slint::{ComponentHandle, Image, Rgba8Pixel, SharedPixelBuffer, Weak};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use github_profile_lookup::view::{self, ScreenView};
use github_profile_lookup::{AvatarPixels, Config, GitHubClient, LookupSession, ProfileScreen, SubmitError};

/// Edge length the avatar is requested and scaled at.
const AVATAR_SIZE: u32 = 128;

type Session = LookupSession<GitHubClient>;

fn main() -> Result<()> {
    init_logging();

    let config = Config::from_env().context("Invalid configuration")?;
    let client = GitHubClient::new(&config).context("Failed to build HTTP client")?;

    // Background tokio runtime for async HTTP
    let rt = Arc::new(tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?);

    let screen = Arc::new(Mutex::new(ProfileScreen::new()));
    let session = Arc::new(LookupSession::new(client, screen.clone()));

    let app = AppWindow::new()?;
    apply_view(&app, &screen);

    {
        let screen = screen.clone();
        app.on_username_edited(move |text| {
            screen.lock().set_username(text.as_str());
        });
    }

    // =============================================
    //  CALLBACK: submit-requested (Form -> Loading)
    // =============================================
    {
        let app_weak = app.as_weak();
        let session = session.clone();
        let rt = rt.clone();

        app.on_submit_requested(move || {
            let Some(app) = app_weak.upgrade() else { return };

            // The bound text is authoritative; `edited` does not fire for programmatic changes.
            session.screen().lock().set_username(app.get_username().as_str());

            let ticket = match session.begin() {
                Ok(ticket) => ticket,
                Err(SubmitError::EmptyUsername) => {
                    app.set_notice(SubmitError::EmptyUsername.to_string().into());
                    return;
                }
                Err(e @ SubmitError::InFlight) => {
                    debug!(error = %e, "Submit ignored");
                    return;
                }
            };
            apply_view(&app, session.screen());

            let app_weak = app_weak.clone();
            let session = session.clone();
            rt.spawn(async move {
                if !session.resolve(ticket).await {
                    return;
                }
                let avatar_url = {
                    let screen = session.screen().lock();
                    screen.show_result().then(|| screen.profile().avatar_url.clone())
                };

                let screen = session.screen().clone();
                let app_weak_view = app_weak.clone();
                let _ = slint::invoke_from_event_loop(move || {
                    if let Some(app) = app_weak_view.upgrade() {
                        apply_view(&app, &screen);
                    }
                });

                if let Some(url) = avatar_url.filter(|url| !url.is_empty()) {
                    tokio::spawn(load_avatar(session, app_weak, url));
                }
            });
        });
    }

    // =============================================
    //  CALLBACK: fetch-another-requested (Card -> Form)
    // =============================================
    {
        let app_weak = app.as_weak();
        let screen = screen.clone();

        app.on_fetch_another_requested(move || {
            screen.lock().reset_to_input();
            if let Some(app) = app_weak.upgrade() {
                apply_view(&app, &screen);
            }
        });
    }

    app.run()?;

    // Anything still in flight finishes against a closed screen.
    screen.lock().close();

    Ok(())
}

/// Pushes the rendered screen into the window's properties.
fn apply_view(app: &AppWindow, screen: &Mutex<ProfileScreen>) {
    let rendered = view::render(&screen.lock());
    match rendered {
        ScreenView::Form(form) => {
            app.set_show_card(false);
            app.set_username(form.username.into());
            app.set_loading(form.loading);
            app.set_error_message(form.error.unwrap_or_default().into());
        }
        ScreenView::Card(card) => {
            app.set_avatar(Image::default());
            app.set_name(card.name.into());
            app.set_email(card.email.into());
            app.set_bio(card.bio.into());
            app.set_location(card.location.into());
            app.set_public_repos(card.public_repos.into());
            app.set_created_at(card.created_at.into());
            app.set_loading(false);
            app.set_error_message("".into());
            app.set_show_card(true);
        }
    }
}

/// Downloads the avatar and shows it if the same profile is still on screen.
async fn load_avatar(session: Arc<Session>, app_weak: Weak<AppWindow>, url: String) {
    let pixels = match session.source().fetch_avatar(&url, AVATAR_SIZE).await {
        Ok(pixels) => pixels,
        Err(e) => {
            warn!(%url, error = %e, "Failed to load avatar");
            return;
        }
    };

    let screen = session.screen().clone();
    let _ = slint::invoke_from_event_loop(move || {
        let current = {
            let screen = screen.lock();
            screen.show_result() && screen.profile().avatar_url == url
        };
        if !current {
            return;
        }
        if let Some(app) = app_weak.upgrade() {
            app.set_avatar(to_image(&pixels));
        }
    });
}

fn to_image(pixels: &AvatarPixels) -> Image {
    let buffer = SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(
        &pixels.rgba,
        pixels.width,
        pixels.height,
    );
    Image::from_rgba8(buffer)
}

/// Initialize logging with tracing.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("github_profile_lookup=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
