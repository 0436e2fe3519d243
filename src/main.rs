use axum::{Router, extract::Query, http::StatusCode, response::IntoResponse, routing::get};
use lunch_finder_api::acquire::HttpFetcher;
use lunch_finder_api::image_search::ImageSearch;
use lunch_finder_api::ocr::{DocumentAnalyzer, NoopAnalyzer, TesseractAnalyzer};
use lunch_finder_api::pdf;
use lunch_finder_api::translate::Translator;
use lunch_finder_api::{Provider, ProviderKind, Weekday, WeekdayMenu};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Everything a request handler needs: the three providers with their
/// memoized weekly snapshots, plus the translation and image collaborators
/// with their own caches.
struct AppState {
    providers: Vec<Provider>,
    translator: Translator,
    images: ImageSearch,
}

impl AppState {
    fn provider(&self, id: &str) -> Option<&Provider> {
        let kind = ProviderKind::from_id(id)?;
        self.providers.iter().find(|p| p.kind() == kind)
    }
}

type SharedState = Arc<AppState>;

#[derive(Deserialize)]
struct MenuQuery {
    provider: String,
    day: Option<String>,
    #[serde(default)]
    images: bool,
}

#[derive(Serialize)]
struct DishResponse {
    name_de: String,
    name_en: String,
    price: Option<String>,
    category: Option<String>,
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
}

#[derive(Serialize)]
struct MenuResponse {
    provider: String,
    day: String,
    closed: bool,
    dishes: Vec<DishResponse>,
}

#[derive(Serialize)]
struct ProviderInfo {
    id: &'static str,
    name: &'static str,
    url: &'static str,
}

async fn get_menu(
    Query(params): Query<MenuQuery>,
    state: axum::extract::Extension<SharedState>,
) -> impl IntoResponse {
    // Weekend and unknown day names are rejected here; the core only ever
    // sees the five valid weekdays.
    let day = match &params.day {
        Some(raw) => match raw.parse::<Weekday>() {
            Ok(day) => day,
            Err(()) => {
                return (
                    StatusCode::BAD_REQUEST,
                    "Invalid day. Use Monday through Friday.",
                )
                    .into_response();
            }
        },
        None => Weekday::today_or_monday(),
    };

    if state.provider(&params.provider).is_none() {
        return (
            StatusCode::BAD_REQUEST,
            format!("Unknown provider '{}'", params.provider),
        )
            .into_response();
    }

    let provider_id = params.provider.clone();
    let with_images = params.images;
    let state = state.0.clone();

    // The pipeline blocks on network, pdftoppm and tesseract; keep it off
    // the async workers.
    let response = tokio::task::spawn_blocking(move || {
        let provider = state
            .provider(&provider_id)
            .expect("provider checked above");
        let menu = provider.get_menu(day);
        render_menu(&state, menu, with_images)
    })
    .await;

    match response {
        Ok(menu) => axum::Json(menu).into_response(),
        Err(err) => {
            warn!(%err, "menu task panicked");
            (StatusCode::INTERNAL_SERVER_ERROR, "menu extraction failed").into_response()
        }
    }
}

/// Fill in translations (and optionally thumbnails) on the way out. Both
/// collaborators fail closed, so this never turns a menu into an error.
fn render_menu(state: &AppState, menu: WeekdayMenu, with_images: bool) -> MenuResponse {
    let WeekdayMenu {
        day,
        dishes,
        provider,
        closed,
    } = menu;

    let dishes = dishes
        .into_iter()
        .map(|dish| {
            let name_en = if dish.name_en.is_empty() {
                state.translator.translate(&dish.name_de)
            } else {
                dish.name_en
            };
            let image_url = if with_images && !closed {
                Some(state.images.search(&dish.name_de))
            } else {
                None
            };
            DishResponse {
                name_de: dish.name_de,
                name_en,
                price: dish.price,
                category: dish.category,
                description: dish.description,
                image_url,
            }
        })
        .collect();

    MenuResponse {
        provider,
        day: day.english().to_string(),
        closed,
        dishes,
    }
}

async fn list_providers(state: axum::extract::Extension<SharedState>) -> impl IntoResponse {
    let infos: Vec<ProviderInfo> = state
        .providers
        .iter()
        .map(|p| ProviderInfo {
            id: p.kind().id(),
            name: p.name(),
            url: p.homepage(),
        })
        .collect();
    axum::Json(infos)
}

fn build_analyzer() -> Arc<dyn DocumentAnalyzer> {
    if std::env::var_os("LUNCH_DISABLE_OCR").is_some() {
        info!("OCR disabled by LUNCH_DISABLE_OCR");
        return Arc::new(NoopAnalyzer);
    }
    if !TesseractAnalyzer::is_installed() {
        warn!("tesseract not installed, OCR providers will serve empty menus");
        return Arc::new(NoopAnalyzer);
    }
    if !pdf::rasterizer_available() {
        warn!("pdftoppm not installed, OCR providers will serve empty menus");
        return Arc::new(NoopAnalyzer);
    }
    info!("tesseract and pdftoppm found, OCR providers enabled");
    Arc::new(TesseractAnalyzer::new())
}

fn build_state() -> anyhow::Result<SharedState> {
    let fetcher = Arc::new(HttpFetcher::new()?);
    let analyzer = build_analyzer();
    let providers = ProviderKind::ALL
        .into_iter()
        .map(|kind| Provider::new(kind, fetcher.clone(), analyzer.clone()))
        .collect();

    Ok(Arc::new(AppState {
        providers,
        translator: Translator::new(),
        images: ImageSearch::new(),
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Blocking reqwest clients must be built off the async runtime.
    let state = tokio::task::spawn_blocking(build_state).await??;

    let app = Router::new()
        .route("/menu", get(get_menu))
        .route("/providers", get(list_providers))
        .layer(axum::extract::Extension(state))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on http://127.0.0.1:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}
