use actix_web::{web, App, HttpServer, HttpResponse, Result as ActixResult};
use actix_cors::Cors;
use fairshelf_core::{Audience, Catalog, Category, Item, SizeChart};
use fairshelf_fit::{ClothingMatchResponse, FitDecoder, SizeResponse, UserMeasurements};
use fairshelf_similarity::{EquivalenceMatcher, MatchRequest, MatchResponse};
use fairshelf_storage::{SavingsEntry, SavingsStore};
use serde::Deserialize;
use serde_json::json;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::debug;

const WAIST_RANGE: RangeInclusive<f64> = 20.0..=60.0;
const HIP_RANGE: RangeInclusive<f64> = 25.0..=70.0;
const CHEST_RANGE: RangeInclusive<f64> = 25.0..=60.0;
const HEIGHT_RANGE: RangeInclusive<f64> = 48.0..=84.0;

/// Shared state behind every handler
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub matcher: EquivalenceMatcher,
    pub decoder: FitDecoder,
    pub savings: Arc<dyn SavingsStore>,
}

impl AppState {
    /// State with default matcher and decoder settings and no chart extractor
    pub fn new(catalog: Arc<Catalog>, savings: Arc<dyn SavingsStore>) -> Self {
        Self {
            matcher: EquivalenceMatcher::new(catalog.clone()),
            decoder: FitDecoder::new(catalog.clone()),
            catalog,
            savings,
        }
    }

    pub fn with_decoder(mut self, decoder: FitDecoder) -> Self {
        self.decoder = decoder;
        self
    }
}

#[derive(Deserialize)]
struct QuickMatchQuery {
    title: String,
    price: f64,
    category: Option<String>,
}

#[derive(Deserialize)]
struct SizeRequest {
    product_title: String,
    user_measurements: UserMeasurements,
    size_chart_url: Option<String>,
    #[serde(alias = "size_chart_data")]
    size_chart: Option<SizeChart>,
}

#[derive(Deserialize)]
struct ClothingMatchQuery {
    womens_product_title: String,
    waist: f64,
    hip: f64,
    chest: Option<f64>,
}

#[derive(Deserialize)]
struct CategoryQuery {
    category: Option<String>,
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
    category: Option<String>,
}

#[derive(Deserialize)]
struct RecordSavingsQuery {
    user_id: String,
    amount: f64,
    category: String,
    product_title: String,
    savings_percent: Option<f64>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        state: Arc<AppState>,
        port: u16,
    ) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .configure(configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Register every route; expects `web::Data<Arc<AppState>>` in app data
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/health", web::get().to(health))
        .route("/api/v1/match", web::post().to(find_match))
        .route("/api/v1/match/quick", web::get().to(quick_match))
        .route("/api/v1/size", web::post().to(recommend_size))
        .route("/api/v1/clothing/match", web::post().to(match_clothing))
        .route("/api/v1/products/womens", web::get().to(list_womens_products))
        .route("/api/v1/products/mens", web::get().to(list_mens_products))
        .route("/api/v1/products/search", web::get().to(search_products))
        .route("/api/v1/pairs", web::get().to(list_pairs))
        .route("/api/v1/savings/record", web::post().to(record_savings))
        .route("/api/v1/savings/{user_id}", web::get().to(get_savings));
}

fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "error": message.into()
    }))
}

fn validate_match_request(request: &MatchRequest) -> Result<(), String> {
    if request.title.trim().is_empty() {
        return Err("title must not be empty".to_string());
    }
    if !(request.price.is_finite() && request.price > 0.0) {
        return Err(format!("price must be greater than 0, got {}", request.price));
    }
    Ok(())
}

fn check_range(name: &str, value: f64, range: &RangeInclusive<f64>) -> Result<(), String> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "{} must be between {} and {} inches, got {}",
            name,
            range.start(),
            range.end(),
            value
        ))
    }
}

fn validate_measurements(m: &UserMeasurements) -> Result<(), String> {
    check_range("waist", m.waist, &WAIST_RANGE)?;
    check_range("hip", m.hip, &HIP_RANGE)?;
    if let Some(chest) = m.chest {
        check_range("chest", chest, &CHEST_RANGE)?;
    }
    if let Some(height) = m.height {
        check_range("height", height, &HEIGHT_RANGE)?;
    }
    Ok(())
}

async fn root() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "FairShelf API",
        "version": env!("CARGO_PKG_VERSION"),
        "tagline": "Shop by specs, not stereotypes"
    })))
}

async fn health(
    state: web::Data<Arc<AppState>>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "womens_products_loaded": state.catalog.count(Audience::Womens),
        "mens_products_loaded": state.catalog.count(Audience::Mens),
        "curated_pairs_loaded": state.catalog.overrides().len(),
        "extractor_configured": state.decoder.has_extractor()
    })))
}

async fn find_match(
    state: web::Data<Arc<AppState>>,
    req: web::Json<MatchRequest>,
) -> ActixResult<HttpResponse> {
    let request = req.into_inner();
    if let Err(e) = validate_match_request(&request) {
        return Ok(bad_request(e));
    }

    let found = state.matcher.find_equivalent(&request);
    Ok(HttpResponse::Ok().json(MatchResponse::new(&request.title, request.price, found)))
}

async fn quick_match(
    state: web::Data<Arc<AppState>>,
    query: web::Query<QuickMatchQuery>,
) -> ActixResult<HttpResponse> {
    let query = query.into_inner();
    let category = query
        .category
        .as_deref()
        .and_then(|c| c.parse::<Category>().ok())
        .unwrap_or(Category::PersonalCare);

    let request = MatchRequest::new(query.title, query.price, category);
    if let Err(e) = validate_match_request(&request) {
        return Ok(bad_request(e));
    }

    let found = state.matcher.find_equivalent(&request);
    Ok(HttpResponse::Ok().json(MatchResponse::new(&request.title, request.price, found)))
}

async fn recommend_size(
    state: web::Data<Arc<AppState>>,
    req: web::Json<SizeRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();
    if let Err(e) = validate_measurements(&req.user_measurements) {
        return Ok(bad_request(e));
    }

    let recommendation = state
        .decoder
        .recommend(
            &req.product_title,
            &req.user_measurements,
            req.size_chart_url.as_deref(),
            req.size_chart.as_ref(),
        )
        .await;

    Ok(HttpResponse::Ok().json(SizeResponse::new(recommendation)))
}

async fn match_clothing(
    state: web::Data<Arc<AppState>>,
    query: web::Query<ClothingMatchQuery>,
) -> ActixResult<HttpResponse> {
    let query = query.into_inner();
    let measurements = UserMeasurements {
        waist: query.waist,
        hip: query.hip,
        chest: query.chest,
        height: None,
    };
    if let Err(e) = validate_measurements(&measurements) {
        return Ok(bad_request(e));
    }

    match state.decoder.match_clothing(&query.womens_product_title, &measurements) {
        Some(found) => Ok(HttpResponse::Ok().json(ClothingMatchResponse::new(
            &query.womens_product_title,
            found,
        ))),
        None => Ok(HttpResponse::NotFound().json(json!({
            "error": "No men's equivalent found for this clothing item"
        }))),
    }
}

fn list_products(state: &AppState, audience: Audience, category: Option<&str>) -> HttpResponse {
    // an unknown category matches nothing
    let filter = match category.map(str::parse::<Category>) {
        None => None,
        Some(Ok(c)) => Some(c),
        Some(Err(_)) => {
            return HttpResponse::Ok().json(json!({
                "count": 0,
                "products": []
            }))
        }
    };

    let products: Vec<&Item> = state
        .catalog
        .audience_items(audience)
        .filter(|item| filter.map_or(true, |c| item.category == c))
        .collect();

    HttpResponse::Ok().json(json!({
        "count": products.len(),
        "products": products
    }))
}

async fn list_womens_products(
    state: web::Data<Arc<AppState>>,
    query: web::Query<CategoryQuery>,
) -> ActixResult<HttpResponse> {
    Ok(list_products(&state, Audience::Womens, query.category.as_deref()))
}

async fn list_mens_products(
    state: web::Data<Arc<AppState>>,
    query: web::Query<CategoryQuery>,
) -> ActixResult<HttpResponse> {
    Ok(list_products(&state, Audience::Mens, query.category.as_deref()))
}

async fn search_products(
    state: web::Data<Arc<AppState>>,
    query: web::Query<SearchQuery>,
) -> ActixResult<HttpResponse> {
    // an unknown category is ignored
    let category = query.category.as_deref().and_then(|c| c.parse::<Category>().ok());
    let results = state.catalog.search(&query.q, category);
    debug!("Search '{}' returned {} items", query.q, results.len());

    Ok(HttpResponse::Ok().json(json!({
        "query": query.q,
        "count": results.len(),
        "results": results
    })))
}

async fn list_pairs(
    state: web::Data<Arc<AppState>>,
) -> ActixResult<HttpResponse> {
    let pairs: Vec<_> = state.catalog.overrides().iter().collect();
    Ok(HttpResponse::Ok().json(json!({
        "count": pairs.len(),
        "pairs": pairs
    })))
}

async fn record_savings(
    state: web::Data<Arc<AppState>>,
    query: web::Query<RecordSavingsQuery>,
) -> ActixResult<HttpResponse> {
    let query = query.into_inner();
    if query.user_id.trim().is_empty() {
        return Ok(bad_request("user_id must not be empty"));
    }
    if !query.amount.is_finite() {
        return Ok(bad_request("amount must be a number"));
    }

    let mut entry = SavingsEntry::new(query.amount, query.category, query.product_title);
    if let Some(percent) = query.savings_percent {
        entry = entry.with_savings_percent(percent);
    }

    let receipt = state.savings.record(&query.user_id, entry);
    Ok(HttpResponse::Ok().json(receipt))
}

async fn get_savings(
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let user_id = path.into_inner();
    Ok(HttpResponse::Ok().json(state.savings.stats(&user_id)))
}
