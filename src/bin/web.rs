//! Single binary web server: JSON API over the fixture scheduler.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Set DATA_DIR to keep tournaments on disk between restarts.

use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use padel_fixtures::{
    export_schedule, generate_schedule, import_roster, ContactUpdate, GenerateRequest, LogObserver, Member,
    Pair, PairId, ScheduleWriter, SchedulerError, ServerConfig, Tournament, TournamentId, TournamentStore,
};
use serde::Deserialize;

/// Shared state: the tournament store plus the audit observer.
struct AppState {
    store: TournamentStore,
    observer: LogObserver,
}

type State = Data<AppState>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
}

#[derive(Deserialize)]
struct CategoryBody {
    name: String,
}

#[derive(Deserialize)]
struct AddPairBody {
    category: String,
    members: [Member; 2],
    #[serde(default)]
    confirmed: bool,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and pair id.
#[derive(Deserialize)]
struct TournamentPairPath {
    id: TournamentId,
    pair_id: PairId,
}

/// Path segments: tournament id, pair id and member position (0 or 1).
#[derive(Deserialize)]
struct MemberPath {
    id: TournamentId,
    pair_id: PairId,
    index: usize,
}

fn error_response(e: SchedulerError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        SchedulerError::TournamentNotFound(_) => HttpResponse::NotFound().json(body),
        SchedulerError::Storage(_) => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

/// Run a write against one tournament and answer with its new state.
fn update_and_respond(
    state: &State,
    id: TournamentId,
    f: impl FnOnce(&mut Tournament) -> Result<(), SchedulerError>,
) -> HttpResponse {
    let result = state.store.transaction(id, |t| {
        f(t)?;
        Ok(t.clone())
    });
    match result {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "padel-fixtures",
    })
}

/// Create a new tournament (returns it with id).
#[post("/api/tournaments")]
async fn api_create_tournament(state: State, body: Json<CreateTournamentBody>) -> HttpResponse {
    let tournament = Tournament::new(body.name.trim());
    let response = HttpResponse::Ok().json(&tournament);
    match state.store.insert(tournament) {
        Ok(_) => response,
        Err(e) => error_response(e),
    }
}

/// Ids of all stored tournaments.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: State) -> HttpResponse {
    match state.store.ids() {
        Ok(ids) => HttpResponse::Ok().json(ids),
        Err(e) => error_response(e),
    }
}

/// Delete a tournament and everything in it.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: State, path: Path<TournamentPath>) -> HttpResponse {
    match state.store.remove(path.id) {
        Ok(()) => {
            log::info!("Tournament {} deleted", path.id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => error_response(e),
    }
}

/// Get a tournament with its pairs, groups, fixtures and last schedule summary.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: State, path: Path<TournamentPath>) -> HttpResponse {
    match state.store.get(path.id) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    }
}

/// Declare a category; declaration order is allocation order.
#[post("/api/tournaments/{id}/categories")]
async fn api_declare_category(state: State, path: Path<TournamentPath>, body: Json<CategoryBody>) -> HttpResponse {
    update_and_respond(&state, path.id, |t| t.declare_category(body.name.as_str()))
}

/// Register a pair.
#[post("/api/tournaments/{id}/pairs")]
async fn api_add_pair(state: State, path: Path<TournamentPath>, body: Json<AddPairBody>) -> HttpResponse {
    let body = body.into_inner();
    update_and_respond(&state, path.id, |t| {
        let [first, second] = body.members;
        let mut pair = Pair::new(t.id, body.category, first, second)?;
        pair.confirmed = body.confirmed;
        t.add_pair(pair).map(|_| ())
    })
}

/// Confirm a registered pair so it is picked up by the partitioner.
#[post("/api/tournaments/{id}/pairs/{pair_id}/confirm")]
async fn api_confirm_pair(state: State, path: Path<TournamentPairPath>) -> HttpResponse {
    update_and_respond(&state, path.id, |t| t.confirm_pair(path.pair_id))
}

/// Edit a member's contact details.
#[put("/api/tournaments/{id}/pairs/{pair_id}/members/{index}/contact")]
async fn api_update_contact(state: State, path: Path<MemberPath>, body: Json<ContactUpdate>) -> HttpResponse {
    let update = body.into_inner();
    update_and_respond(&state, path.id, |t| t.update_contact(path.pair_id, path.index, update))
}

/// Import pairs from a CSV body.
#[post("/api/tournaments/{id}/roster")]
async fn api_import_roster(state: State, path: Path<TournamentPath>, body: String) -> HttpResponse {
    update_and_respond(&state, path.id, |t| import_roster(t, body.as_bytes()).map(|_| ()))
}

/// Build groups and fixtures for confirmed pairs and (re)allocate courts and times.
#[post("/api/tournaments/{id}/schedule/generate")]
async fn api_generate_schedule(state: State, path: Path<TournamentPath>, body: Json<GenerateRequest>) -> HttpResponse {
    let id = path.id;
    let request = body.into_inner();
    let worker_state = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        generate_schedule(&worker_state.store, &worker_state.observer, id, &request)
    })
    .await;
    match result {
        Ok(Ok(report)) => HttpResponse::Ok().json(report),
        Ok(Err(e)) => error_response(e),
        Err(e) => {
            log::error!("Schedule generation task failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": "generation failed" }))
        }
    }
}

/// Remove courts and times from every fixture.
#[delete("/api/tournaments/{id}/schedule")]
async fn api_clear_schedule(state: State, path: Path<TournamentPath>) -> HttpResponse {
    let writer = ScheduleWriter::new(&state.store, &state.observer);
    match writer.clear(path.id) {
        Ok(cleared) => HttpResponse::Ok().json(serde_json::json!({ "cleared": cleared })),
        Err(e) => error_response(e),
    }
}

/// Delete all groups and fixtures; pairs stay registered.
#[post("/api/tournaments/{id}/reset")]
async fn api_reset_tournament(state: State, path: Path<TournamentPath>) -> HttpResponse {
    match state.store.transaction(path.id, |t| Ok(t.reset())) {
        Ok(removed) => {
            log::info!("Tournament {} reset: {} fixture(s) removed", path.id, removed);
            HttpResponse::Ok().json(serde_json::json!({ "removed": removed }))
        }
        Err(e) => error_response(e),
    }
}

/// Schedule as CSV, one row per fixture.
#[get("/api/tournaments/{id}/schedule.csv")]
async fn api_export_schedule(state: State, path: Path<TournamentPath>) -> HttpResponse {
    let exported = state.store.read(path.id, |t| {
        let mut buf = Vec::new();
        export_schedule(t, &mut buf).map(|_| buf)
    });
    match exported.and_then(|r| r) {
        Ok(buf) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(buf),
        Err(e) => error_response(e),
    }
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_create_tournament)
        .service(api_list_tournaments)
        .service(api_delete_tournament)
        .service(api_get_tournament)
        .service(api_declare_category)
        .service(api_add_pair)
        .service(api_confirm_pair)
        .service(api_update_contact)
        .service(api_import_roster)
        .service(api_generate_schedule)
        .service(api_clear_schedule)
        .service(api_reset_tournament)
        .service(api_export_schedule);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let store = match &config.data_dir {
        Some(dir) => TournamentStore::open(dir).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?,
        None => {
            log::warn!("DATA_DIR not set: tournaments are kept in memory only");
            TournamentStore::in_memory()
        }
    };
    let state = Data::new(AppState {
        store,
        observer: LogObserver,
    });

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    fn state() -> State {
        Data::new(AppState {
            store: TournamentStore::in_memory(),
            observer: LogObserver,
        })
    }

    #[actix_web::test]
    async fn generate_over_http() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/tournaments")
            .set_json(serde_json::json!({ "name": "Club Open" }))
            .to_request();
        let t: Tournament = test::call_and_read_body_json(&app, req).await;

        let roster = "category,player_1,player_2,email_1,email_2,confirmed\n\
                      Men,A1,B1,,,\nMen,A2,B2,,,\nMen,A3,B3,,,\nMen,A4,B4,,,\n";
        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{}/roster", t.id))
            .set_payload(roster)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{}/schedule/generate", t.id))
            .set_json(serde_json::json!({
                "group_size": 4,
                "courts": 2,
                "match_minutes": 50,
                "break_minutes": 10,
                "windows": [{ "date": "2026-09-12", "start_time": "09:00:00", "end_time": "12:00:00" }]
            }))
            .to_request();
        let report: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(report["scheduled"], 6);
        assert_eq!(report["unscheduled"].as_array().map(Vec::len), Some(0));

        let req = test::TestRequest::get()
            .uri(&format!("/api/tournaments/{}/schedule.csv", t.id))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        // Header plus six fixtures.
        assert_eq!(String::from_utf8_lossy(&body).lines().count(), 7);
    }

    #[actix_web::test]
    async fn bad_request_and_not_found() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let missing = uuid::Uuid::new_v4();
        let req = test::TestRequest::get()
            .uri(&format!("/api/tournaments/{}", missing))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/tournaments")
            .set_json(serde_json::json!({ "name": "Empty" }))
            .to_request();
        let t: Tournament = test::call_and_read_body_json(&app, req).await;
        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{}/schedule/generate", t.id))
            .set_json(serde_json::json!({
                "group_size": 4,
                "courts": 0,
                "match_minutes": 50,
                "windows": [{ "date": "2026-09-12", "start_time": "09:00:00", "end_time": "12:00:00" }]
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn list_and_delete_tournaments() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/tournaments")
            .set_json(serde_json::json!({ "name": "Winter Cup" }))
            .to_request();
        let t: Tournament = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get().uri("/api/tournaments").to_request();
        let ids: Vec<TournamentId> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ids, vec![t.id]);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/tournaments/{}", t.id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
        let req = test::TestRequest::get()
            .uri(&format!("/api/tournaments/{}", t.id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
