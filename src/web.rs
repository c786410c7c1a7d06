use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::GridError;
use crate::form::{calendar_link, export_responses_csv, validate_event, EventRequest};
use crate::grid::{filter_to_best, find_best, grid_summary, to_key, Availability, BestSlot, CellView, ChosenSlot, EventConfig};
use crate::logging::{log_best_slots, log_submission};
use crate::store::EventStore;

pub struct AppState {
    pub store: EventStore,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    success: bool,
    id: String,
    time_slots: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    id: String,
    config: EventConfig,
    time_slots: Vec<String>,
    respondents: Vec<String>,
}

#[derive(Serialize)]
pub struct GridResponse {
    total: usize,
    cells: Vec<CellView>,
}

#[derive(Serialize)]
pub struct BestResponse {
    total: usize,
    best: Vec<BestSlot>,
}

#[derive(Deserialize)]
pub struct GridQuery {
    #[serde(default)]
    best_only: bool,
}

#[derive(Deserialize)]
pub struct CalendarRequest {
    column: String,
    time: String,
    /// Date weekly columns are resolved against; defaults to today
    reference: Option<NaiveDate>,
}

fn error_response(err: GridError) -> HttpResponse {
    let body = serde_json::json!({"success": false, "error": err.to_string()});
    match err {
        GridError::EventNotFound(_) => HttpResponse::NotFound().json(body),
        e if e.is_client_error() => HttpResponse::BadRequest().json(body),
        e => {
            warn!(error = %e, "Request failed");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

// Create event endpoint
async fn create_event(
    req: web::Json<EventRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let created = validate_event(&req).and_then(|config| {
        let grid = crate::grid::Grid::from_config(&config)?;
        let id = state.store.create(config)?;
        Ok((id, grid))
    });

    match created {
        Ok((id, grid)) => Ok(HttpResponse::Created().json(CreatedResponse {
            success: true,
            id,
            time_slots: grid.time_slots().to_vec(),
        })),
        Err(e) => Ok(error_response(e)),
    }
}

async fn get_event(id: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let event = match state.store.get(&id) {
        Ok(event) => event,
        Err(e) => return Ok(error_response(e)),
    };
    let grid = match event.grid() {
        Ok(grid) => grid,
        Err(e) => return Ok(error_response(e)),
    };

    Ok(HttpResponse::Ok().json(EventResponse {
        id: id.into_inner(),
        time_slots: grid.time_slots().to_vec(),
        respondents: event.responses.keys().cloned().collect(),
        config: event.config,
    }))
}

// Submit (or resubmit) a respondent's availability
async fn put_response(
    path: web::Path<(String, String)>,
    body: web::Json<Availability>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (id, respondent) = path.into_inner();
    let availability = body.into_inner();
    let slots = availability.selected_keys().count();

    match state.store.upsert_response(&id, &respondent, availability) {
        Ok(()) => {
            log_submission(&id, &respondent, slots);
            Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
        }
        Err(e) => Ok(error_response(e)),
    }
}

async fn delete_response(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (id, respondent) = path.into_inner();
    match state.store.remove_response(&id, &respondent) {
        Ok(true) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true}))),
        Ok(false) => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": format!("No response from {}", respondent)
        }))),
        Err(e) => Ok(error_response(e)),
    }
}

// Heatmap endpoint; `best_only` narrows every response to the best slots
async fn get_grid(
    id: web::Path<String>,
    query: web::Query<GridQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let summary = state.store.get(&id).and_then(|event| {
        let grid = event.grid()?;
        let responses = if query.best_only {
            filter_to_best(&event.responses, &find_best(&grid, &event.responses))
        } else {
            event.responses
        };
        Ok(GridResponse {
            total: responses.len(),
            cells: grid_summary(&grid, &responses)?,
        })
    });

    match summary {
        Ok(summary) => Ok(HttpResponse::Ok().json(summary)),
        Err(e) => Ok(error_response(e)),
    }
}

async fn get_best(id: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let best = state.store.get(&id).and_then(|event| {
        let grid = event.grid()?;
        crate::grid::aggregate::validate_responses(&grid, &event.responses)?;
        Ok(BestResponse {
            total: event.responses.len(),
            best: find_best(&grid, &event.responses),
        })
    });

    match best {
        Ok(best) => {
            let max = best.best.first().map(|b| b.count).unwrap_or(0);
            log_best_slots(&id, best.total, best.best.len(), max);
            Ok(HttpResponse::Ok().json(best))
        }
        Err(e) => Ok(error_response(e)),
    }
}

async fn export_csv(id: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let csv = state.store.get(&id).and_then(|event| {
        let grid = event.grid()?;
        let mut out = Vec::new();
        export_responses_csv(&mut out, &grid, &event.responses)?;
        Ok(out)
    });

    match csv {
        Ok(body) => Ok(HttpResponse::Ok().content_type("text/csv").body(body)),
        Err(e) => Ok(error_response(e)),
    }
}

// Calendar link for the slot chosen while scheduling
async fn create_calendar_link(
    id: web::Path<String>,
    req: web::Json<CalendarRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let link = state.store.get(&id).and_then(|event| {
        let grid = event.grid()?;
        grid.to_coordinates(&to_key(&req.column, &req.time))?;
        let chosen = ChosenSlot {
            column: req.column,
            time: req.time,
        };
        let reference = req
            .reference
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        calendar_link(&event.config, &chosen, reference)
    });

    match link {
        Ok(url) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "url": url}))),
        Err(e) => Ok(error_response(e)),
    }
}

/// Registers the API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/events", web::post().to(create_event))
        .route("/api/events/{id}", web::get().to(get_event))
        .service(
            web::resource("/api/events/{id}/responses/{respondent}")
                .route(web::put().to(put_response))
                .route(web::delete().to(delete_response)),
        )
        .route("/api/events/{id}/grid", web::get().to(get_grid))
        .route("/api/events/{id}/best", web::get().to(get_best))
        .route("/api/events/{id}/export.csv", web::get().to(export_csv))
        .route("/api/events/{id}/calendar", web::post().to(create_calendar_link));
}

pub async fn start_server(settings: &Settings, store: EventStore) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState { store });
    let bind = (settings.server.host.clone(), settings.server.port);
    info!(host = %bind.0, port = bind.1, "Starting web server");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(bind)?
    .run()
    .await
}
