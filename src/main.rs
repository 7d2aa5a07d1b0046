use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use log::info;
use serde::Serialize;

mod budget;
mod game_state;
mod logic;
mod sim;

use budget::BudgetStore;
use game_state::GameState;

// ---------------------------
// API responses
// ---------------------------
#[derive(Serialize)]
struct InfoResponse {
    apiversion: String,
    author: String,
    color: String,
    head: String,
    tail: String,
    version: String,
}

#[derive(Serialize)]
struct MoveResponse {
    #[serde(rename = "move")]
    move_dir: String,
    shout: String,
}

// ---------------------------
// Handlers
// ---------------------------
#[get("/")]
async fn handle_index() -> impl Responder {
    HttpResponse::Ok().json(InfoResponse {
        apiversion: "1".to_string(),
        author: "horizon".to_string(),
        color: "#1F7A8C".to_string(),
        head: "default".to_string(),
        tail: "default".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[post("/start")]
async fn handle_start(
    store: web::Data<BudgetStore>,
    state: web::Json<GameState>,
) -> impl Responder {
    store.set(&state.game.id, state.game.timeout as u64);
    info!(
        "Game {} started. Ruleset: {}, timeout {}ms",
        state.game.id, state.game.ruleset.name, state.game.timeout
    );
    HttpResponse::Ok().body("")
}

#[post("/move")]
async fn handle_move(
    store: web::Data<BudgetStore>,
    state: web::Json<GameState>,
) -> impl Responder {
    let budget_ms = store.lookup(&state.game.id);
    let decision = logic::decide_move(&state, budget_ms);

    HttpResponse::Ok().json(MoveResponse {
        move_dir: decision.direction.as_str().to_string(),
        shout: format!("Turn {}!", state.turn),
    })
}

#[post("/end")]
async fn handle_end(
    store: web::Data<BudgetStore>,
    state: web::Json<GameState>,
) -> impl Responder {
    store.clear(&state.game.id);
    let outcome = if state.board.snakes.iter().any(|s| s.id == state.you.id) {
        if state.board.snakes.len() == 1 {
            "Win"
        } else {
            "Survived?"
        }
    } else {
        "Loss/Draw"
    };
    info!("Game {} ended. Outcome: {}", state.game.id, outcome);
    HttpResponse::Ok().body("")
}

// ---------------------------
// Server setup
// ---------------------------
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("0.0.0.0:{}", port);
    info!(
        "{} v{} starting on {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        addr
    );

    let store = web::Data::new(BudgetStore::new());

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .wrap(actix_web::middleware::Logger::default())
            .service(handle_index)
            .service(handle_start)
            .service(handle_move)
            .service(handle_end)
    })
    .bind(addr)?
    .run()
    .await
}
