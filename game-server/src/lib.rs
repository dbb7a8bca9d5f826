use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use warp::Filter;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};

use crate::game_manager::GameManager;
use game_types::{
    CreateGameRequest, GameError, JoinGameRequest, MoveTileRequest, PlayerAction,
    ValidateWordsRequest, ValidateWordsResponse,
};

pub mod commentary;
pub mod config;
pub mod dictionary;
pub mod game_manager;

#[derive(Deserialize)]
struct StateQuery {
    player_id: Option<Uuid>,
}

type JsonReply = WithStatus<Json>;

pub fn create_routes(
    game_manager: Arc<GameManager>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let game_manager_filter = warp::any().map({
        let game_manager = game_manager.clone();
        move || game_manager.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let create_game = warp::path!("games")
        .and(warp::post())
        .and(warp::body::json::<CreateGameRequest>())
        .and(game_manager_filter.clone())
        .and_then(handle_create_game);

    let join_game = warp::path!("games" / "join")
        .and(warp::post())
        .and(warp::body::json::<JoinGameRequest>())
        .and(game_manager_filter.clone())
        .and_then(handle_join_game);

    let start_game = warp::path!("games" / Uuid / "start")
        .and(warp::post())
        .and(warp::body::json::<PlayerAction>())
        .and(game_manager_filter.clone())
        .and_then(handle_start_game);

    let move_tile = warp::path!("games" / Uuid / "move")
        .and(warp::post())
        .and(warp::body::json::<MoveTileRequest>())
        .and(game_manager_filter.clone())
        .and_then(handle_move_tile);

    let claim_round = warp::path!("games" / Uuid / "claim")
        .and(warp::post())
        .and(warp::body::json::<PlayerAction>())
        .and(game_manager_filter.clone())
        .and_then(handle_claim_round);

    let mess_it_up = warp::path!("games" / Uuid / "mess")
        .and(warp::post())
        .and(warp::body::json::<PlayerAction>())
        .and(game_manager_filter.clone())
        .and_then(handle_mess_it_up);

    let stuck = warp::path!("games" / Uuid / "stuck")
        .and(warp::post())
        .and(warp::body::json::<PlayerAction>())
        .and(game_manager_filter.clone())
        .and_then(handle_stuck);

    let finish_game = warp::path!("games" / Uuid / "finish")
        .and(warp::post())
        .and(warp::body::json::<PlayerAction>())
        .and(game_manager_filter.clone())
        .and_then(handle_finish_game);

    // Polling endpoint, redacted per requester
    let game_state = warp::path!("games" / "code" / String / "state")
        .and(warp::get())
        .and(warp::query::<StateQuery>())
        .and(game_manager_filter.clone())
        .and_then(handle_game_state);

    let final_stats = warp::path!("games" / Uuid / "final-stats")
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_final_stats);

    let validate_words = warp::path!("validate")
        .and(warp::post())
        .and(warp::body::json::<ValidateWordsRequest>())
        .and(game_manager_filter.clone())
        .and_then(handle_validate_words);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST"]);

    health
        .or(create_game)
        .or(join_game)
        .or(start_game)
        .or(move_tile)
        .or(claim_round)
        .or(mess_it_up)
        .or(stuck)
        .or(finish_game)
        .or(game_state)
        .or(final_stats)
        .or(validate_words)
        .with(cors)
        .with(warp::log("mess_it_up"))
}

fn status_for(error: &GameError) -> StatusCode {
    match error {
        GameError::Validation(_) => StatusCode::BAD_REQUEST,
        GameError::NotFound(_) => StatusCode::NOT_FOUND,
        GameError::Forbidden(_) => StatusCode::FORBIDDEN,
        GameError::InvalidState { .. } | GameError::Conflict(_) => StatusCode::CONFLICT,
        GameError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond<T: Serialize>(result: Result<T, GameError>) -> Result<JsonReply, warp::Rejection> {
    match result {
        Ok(body) => Ok(warp::reply::with_status(
            warp::reply::json(&body),
            StatusCode::OK,
        )),
        Err(err) => {
            let status = status_for(&err);
            if status.is_server_error() {
                tracing::error!("Request failed: {}", err);
            }
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({
                    "error": err.to_string(),
                    "details": err,
                })),
                status,
            ))
        }
    }
}

async fn handle_create_game(
    request: CreateGameRequest,
    game_manager: Arc<GameManager>,
) -> Result<JsonReply, warp::Rejection> {
    respond(game_manager.create_game(request).await)
}

async fn handle_join_game(
    request: JoinGameRequest,
    game_manager: Arc<GameManager>,
) -> Result<JsonReply, warp::Rejection> {
    respond(game_manager.join_game(request).await)
}

async fn handle_start_game(
    game_id: Uuid,
    action: PlayerAction,
    game_manager: Arc<GameManager>,
) -> Result<JsonReply, warp::Rejection> {
    let result = game_manager.start_game(game_id, action.player_id).await;
    respond(result.map(|()| serde_json::json!({ "success": true })))
}

async fn handle_move_tile(
    game_id: Uuid,
    request: MoveTileRequest,
    game_manager: Arc<GameManager>,
) -> Result<JsonReply, warp::Rejection> {
    respond(game_manager.move_tile(game_id, request).await)
}

async fn handle_claim_round(
    game_id: Uuid,
    action: PlayerAction,
    game_manager: Arc<GameManager>,
) -> Result<JsonReply, warp::Rejection> {
    respond(game_manager.claim_round(game_id, action.player_id).await)
}

async fn handle_mess_it_up(
    game_id: Uuid,
    action: PlayerAction,
    game_manager: Arc<GameManager>,
) -> Result<JsonReply, warp::Rejection> {
    respond(game_manager.mess_it_up(game_id, action.player_id).await)
}

async fn handle_stuck(
    game_id: Uuid,
    action: PlayerAction,
    game_manager: Arc<GameManager>,
) -> Result<JsonReply, warp::Rejection> {
    respond(game_manager.stuck(game_id, action.player_id).await)
}

async fn handle_finish_game(
    game_id: Uuid,
    action: PlayerAction,
    game_manager: Arc<GameManager>,
) -> Result<JsonReply, warp::Rejection> {
    respond(game_manager.finish_game(game_id, action.player_id).await)
}

async fn handle_game_state(
    join_code: String,
    query: StateQuery,
    game_manager: Arc<GameManager>,
) -> Result<JsonReply, warp::Rejection> {
    respond(game_manager.get_state(&join_code, query.player_id).await)
}

async fn handle_final_stats(
    game_id: Uuid,
    game_manager: Arc<GameManager>,
) -> Result<JsonReply, warp::Rejection> {
    respond(game_manager.get_final_stats(game_id).await)
}

async fn handle_validate_words(
    request: ValidateWordsRequest,
    game_manager: Arc<GameManager>,
) -> Result<JsonReply, warp::Rejection> {
    let results = game_manager.validate_words(&request.words).await;
    respond(Ok(ValidateWordsResponse { results }))
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::config::Config;
    use crate::dictionary::{DictionaryError, DictionaryOracle, DictionaryValidator};
    use async_trait::async_trait;
    use game_persistence::{GameRepository, MemoryKvStore};
    use game_types::{GameStateView, JoinInfo};
    use std::time::Duration;

    struct AcceptEverything;

    #[async_trait]
    impl DictionaryOracle for AcceptEverything {
        async fn lookup(&self, _word: &str) -> Result<bool, DictionaryError> {
            Ok(true)
        }
    }

    fn create_test_app() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let repository = GameRepository::new(Arc::new(MemoryKvStore::new()));
        let dictionary = Arc::new(DictionaryValidator::new(
            Arc::new(AcceptEverything),
            repository.clone(),
            Duration::from_secs(1),
        ));
        let game_manager = Arc::new(GameManager::new(
            repository,
            dictionary,
            None,
            &Config::default(),
        ));
        create_routes(game_manager)
    }

    async fn create_game_via_http<F>(app: &F, name: &str) -> JoinInfo
    where
        F: Filter + 'static,
        F::Extract: warp::Reply + Send,
    {
        let response = warp::test::request()
            .method("POST")
            .path("/games")
            .json(&serde_json::json!({ "display_name": name }))
            .reply(app)
            .await;
        assert_eq!(response.status(), 200);
        serde_json::from_slice(response.body()).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = warp::test::request()
            .method("GET")
            .path("/health")
            .reply(&app)
            .await;

        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), "OK");
    }

    #[tokio::test]
    async fn test_create_and_join_over_http() {
        let app = create_test_app();
        let created = create_game_via_http(&app, "Alice").await;
        assert_eq!(created.join_code.len(), 6);

        let response = warp::test::request()
            .method("POST")
            .path("/games/join")
            .json(&serde_json::json!({
                "join_code": created.join_code.to_lowercase(),
                "display_name": "Bob",
            }))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);
        let joined: JoinInfo = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(joined.game_id, created.game_id);
        assert_ne!(joined.player_id, created.player_id);
    }

    #[tokio::test]
    async fn test_state_is_redacted_for_requester() {
        let app = create_test_app();
        let created = create_game_via_http(&app, "Alice").await;

        let response = warp::test::request()
            .method("GET")
            .path(&format!(
                "/games/code/{}/state?player_id={}",
                created.join_code, created.player_id
            ))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);
        let view: GameStateView = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(view.players.len(), 1);
        assert_eq!(view.tiles.len(), 4);

        let anonymous = warp::test::request()
            .method("GET")
            .path(&format!("/games/code/{}/state", created.join_code))
            .reply(&app)
            .await;
        let view: GameStateView = serde_json::from_slice(anonymous.body()).unwrap();
        assert!(view.tiles.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let app = create_test_app();

        let response = warp::test::request()
            .method("POST")
            .path("/games")
            .json(&serde_json::json!({ "display_name": "   " }))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 400);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["details"]["kind"], "validation");

        let response = warp::test::request()
            .method("GET")
            .path("/games/code/ZZZZZZ/state")
            .reply(&app)
            .await;
        assert_eq!(response.status(), 404);

        let created = create_game_via_http(&app, "Alice").await;
        let response = warp::test::request()
            .method("GET")
            .path(&format!("/games/{}/final-stats", created.game_id))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 404);

        let response = warp::test::request()
            .method("POST")
            .path(&format!("/games/{}/mess", created.game_id))
            .json(&serde_json::json!({ "player_id": created.player_id }))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 409);
    }

    #[tokio::test]
    async fn test_validate_endpoint_uses_two_letter_list() {
        let app = create_test_app();

        let response = warp::test::request()
            .method("POST")
            .path("/validate")
            .json(&serde_json::json!({ "words": ["qi", "zz", "hello"] }))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);
        let body: ValidateWordsResponse = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body.results.get("QI"), Some(&true));
        assert_eq!(body.results.get("ZZ"), Some(&false));
        assert_eq!(body.results.get("HELLO"), Some(&true));
    }

    #[tokio::test]
    async fn test_http_endpoints_cors() {
        let app = create_test_app();

        let response = warp::test::request()
            .method("OPTIONS")
            .path("/health")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "GET")
            .reply(&app)
            .await;

        assert_eq!(response.status(), 200);
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }
}
