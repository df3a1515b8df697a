use super::Floor;
use crate::protocol::ClientMessage;
use crate::protocol::Event;
use crate::protocol::Status;
use crate::render::ViewConfig;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::web;
use actix_web::App;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use futures::StreamExt;
use tokio::sync::broadcast::error::RecvError;

pub struct Hub;

impl Hub {
    pub async fn run(config: ViewConfig) -> Result<(), std::io::Error> {
        let addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let floor = web::Data::new(Floor::default());
        let config = web::Data::new(config);
        log::info!("starting hub on {}", addr);
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(floor.clone())
                .app_data(config.clone())
                .route("/api/cards", web::get().to(cards))
                .route("/api/stream", web::get().to(stream))
                .route("/ws", web::get().to(socket))
                .route("/api/config", web::get().to(view_config))
                .route("/api/clients", web::get().to(clients))
                .route("/api/client/register", web::post().to(enroll))
                .route("/api/client/update", web::post().to(ingest))
                .route("/api/client/{origin}/data", web::get().to(client_data))
                .route("/api/client/{origin}/config", web::get().to(client_config))
                .route("/health", web::get().to(health))
        })
        .workers(4)
        .bind(addr)?
        .run()
        .await
    }
}

/// Full aggregate state, ETag-gated so a polling viewer that already
/// holds the current digest gets 304 and an empty body.
async fn cards(floor: web::Data<Floor>, req: HttpRequest) -> impl Responder {
    let snapshot = floor.snapshot().await;
    let digest = snapshot.digest();
    let held = req
        .headers()
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .map(|token| token.trim_matches('"') == digest)
        .unwrap_or(false);
    match held {
        true => HttpResponse::NotModified().finish(),
        false => HttpResponse::Ok()
            .insert_header((header::ETAG, format!("\"{}\"", digest)))
            .json(snapshot),
    }
}

fn frame(event: Event) -> Result<bytes::Bytes, actix_web::Error> {
    Ok(bytes::Bytes::from(event.sse()))
}

/// Event-stream endpoint. Opens with a connected ack and the current
/// state when there is any, then relays global updates, padding long
/// silences with heartbeats so proxies keep the stream alive.
async fn stream(floor: web::Data<Floor>) -> impl Responder {
    let rx = floor.subscribe();
    let tag = format!("viewer-{:08x}", rand::random::<u32>());
    log::info!("stream subscriber {} connected", tag);
    let mut opening = vec![Event::connected(&tag)];
    let snapshot = floor.snapshot().await;
    if snapshot.total() > 0 {
        opening.push(Event::update(snapshot));
    }
    let head = futures::stream::iter(opening.into_iter().map(frame));
    let live = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            break match tokio::time::timeout(crate::SSE_HEARTBEAT, rx.recv()).await {
                Ok(Ok(Event::DetectionUpdate(snapshot))) => {
                    Some((frame(Event::update(snapshot)), rx))
                }
                Ok(Ok(_)) => continue,
                Ok(Err(RecvError::Lagged(n))) => {
                    log::warn!("stream subscriber dropped {} events", n);
                    continue;
                }
                Ok(Err(RecvError::Closed)) => None,
                Err(_) => Some((frame(Event::heartbeat()), rx)),
            };
        }
    });
    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(head.chain(live))
}

async fn socket(
    floor: web::Data<Floor>,
    body: web::Payload,
    req: HttpRequest,
) -> impl Responder {
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => {
            relay(floor, session, stream).await;
            response.map_into_left_body()
        }
        Err(e) => HttpResponse::InternalServerError()
            .body(e.to_string())
            .map_into_right_body(),
    }
}

/// One WebSocket session. Detectors push wire messages and get acks
/// back; viewers get the fanout, narrowed to one origin once they
/// subscribe to it. A detector's windows leave the floor when its
/// session does.
async fn relay(
    floor: web::Data<Floor>,
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) {
    let mut rx = floor.subscribe();
    let tag = format!("session-{:08x}", rand::random::<u32>());
    log::info!("socket session {} connected", tag);
    actix_web::rt::spawn(async move {
        let mut scope: Option<String> = None;
        let mut origin: Option<String> = None;
        if session.text(Event::connected(&tag).to_json()).await.is_err() {
            return;
        }
        let opening = floor.snapshot().await;
        if opening.total() > 0
            && session.text(Event::update(opening).to_json()).await.is_err()
        {
            return;
        }
        'sesh: loop {
            tokio::select! {
                biased;
                event = rx.recv() => match event {
                    Ok(event) => {
                        let wanted = match (&event, &scope) {
                            (Event::DetectionUpdate(_), None) => true,
                            (Event::ClientDetectionUpdate { client_id, .. }, Some(scope)) => client_id == scope,
                            _ => false,
                        };
                        if wanted && session.text(event.to_json()).await.is_err() { break 'sesh }
                    }
                    Err(RecvError::Lagged(n)) => log::warn!("session {} dropped {} events", tag, n),
                    Err(RecvError::Closed) => break 'sesh,
                },
                msg = stream.next() => match msg {
                    Some(Ok(actix_ws::Message::Text(text))) => {
                        let answer = match text.parse::<ClientMessage>() {
                            Ok(ClientMessage::SubscribeClient { client_id }) => {
                                scope = client_id;
                                match &scope {
                                    Some(origin) => Some(Event::scoped(origin, floor.scoped(origin).await)),
                                    None => match floor.snapshot().await {
                                        state if state.total() > 0 => Some(Event::update(state)),
                                        _ => None,
                                    },
                                }
                            }
                            Ok(ClientMessage::UnsubscribeClient { .. }) => {
                                scope = None;
                                None
                            }
                            Ok(message) => {
                                if let Some(id) = message.origin() {
                                    origin = Some(id.to_string());
                                }
                                Some(floor.apply(message).await)
                            }
                            Err(e) => {
                                log::warn!("unreadable message in session {}: {}", tag, e);
                                Some(Event::error("invalid message format"))
                            }
                        };
                        if let Some(answer) = answer {
                            if session.text(answer.to_json()).await.is_err() { break 'sesh }
                        }
                    }
                    Some(Ok(actix_ws::Message::Ping(payload))) => {
                        if session.pong(&payload).await.is_err() { break 'sesh }
                    }
                    Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                    Some(Err(_)) => break 'sesh,
                    None => break 'sesh,
                    _ => continue 'sesh,
                },
            }
        }
        if let Some(origin) = origin {
            floor.disconnect(&origin).await;
        }
        log::info!("socket session {} closed", tag);
    });
}

async fn view_config(config: web::Data<ViewConfig>) -> impl Responder {
    HttpResponse::Ok().json(config.get_ref())
}

async fn client_config(
    floor: web::Data<Floor>,
    config: web::Data<ViewConfig>,
    path: web::Path<String>,
) -> impl Responder {
    let origin = path.into_inner();
    match floor.knows(&origin).await {
        true => HttpResponse::Ok().json(serde_json::json!({
            "client_id": origin,
            "backend_capture_interval": config.capture_interval,
            "show_table_cards": config.show_table_cards,
            "show_positions": config.show_positions,
            "show_moves": config.show_moves,
            "show_solver_link": config.show_solver_link,
        })),
        false => {
            HttpResponse::NotFound().json(serde_json::json!({ "error": "client not found" }))
        }
    }
}

async fn client_data(floor: web::Data<Floor>, path: web::Path<String>) -> impl Responder {
    let origin = path.into_inner();
    let slice = floor.scoped(&origin).await;
    HttpResponse::Ok().json(serde_json::json!({
        "client_id": origin,
        "detections": slice.detections,
        "last_update": slice.last_update,
        "total_tables": slice.total(),
    }))
}

async fn clients(floor: web::Data<Floor>) -> impl Responder {
    let origins = floor.origins().await;
    HttpResponse::Ok().json(serde_json::json!({
        "connected_clients": origins,
        "total_clients": origins.len(),
    }))
}

async fn enroll(
    floor: web::Data<Floor>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    match body.get("client_id").and_then(|id| id.as_str()) {
        Some(client_id) => {
            let interval = body
                .get("detection_interval")
                .and_then(|n| n.as_u64())
                .unwrap_or(crate::DEFAULT_CLIENT_INTERVAL);
            let ack = floor
                .apply(ClientMessage::register(client_id, interval))
                .await;
            HttpResponse::Ok().json(ack)
        }
        None => HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "client_id required" })),
    }
}

async fn ingest(floor: web::Data<Floor>, body: web::Json<ClientMessage>) -> impl Responder {
    let ack = floor.apply(body.into_inner()).await;
    match &ack {
        Event::Response {
            status: Status::Success,
            ..
        } => HttpResponse::Ok().json(&ack),
        _ => HttpResponse::BadRequest().json(&ack),
    }
}

async fn health(floor: web::Data<Floor>) -> impl Responder {
    let snapshot = floor.snapshot().await;
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "connected_clients": floor.origins().await.len(),
        "stream_clients": floor.listeners(),
        "total_tables": snapshot.total(),
        "last_update": snapshot.last_update,
        "started": floor.started(),
    }))
}
