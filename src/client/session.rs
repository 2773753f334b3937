use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use ahash::AHashMap;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::bot::capabilities::Capabilities;
use crate::bot::goals::Goal;
use crate::bot::movement::{Control, Movements};
use crate::client::events::GameEvent;
use crate::client::protocol::{Inbound, Request, Response};
use crate::codec::{BlockPos, Vec3};
use crate::error::{Error, Result};
use crate::state::{BlockQuery, BlockType, Entity, EntityFilter, EntityId, Hand, ItemStack};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Option<String>,
    /// Limit for query calls; long-running actions are not timed out
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16, username: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: None,
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Requests awaiting a response, shared with the reader task
#[derive(Default)]
struct Pending {
    waiting: Mutex<AHashMap<u64, oneshot::Sender<Response>>>,
    closed: AtomicBool,
}

impl Pending {
    fn waiting(&self) -> MutexGuard<'_, AHashMap<u64, oneshot::Sender<Response>>> {
        self.waiting.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Active gateway session
pub struct Session {
    username: String,
    writer: tokio::sync::Mutex<OwnedWriteHalf>,
    pending: Arc<Pending>,
    next_id: AtomicU64,
    request_timeout: Duration,
    reader: JoinHandle<()>,
}

impl Session {
    /// Connect, log in and start routing gateway traffic.
    ///
    /// Events arrive on the returned channel until the connection ends, which
    /// is signalled by a final [`GameEvent::Disconnected`].
    pub async fn connect(config: ClientConfig) -> Result<(Self, mpsc::UnboundedReceiver<GameEvent>)> {
        let stream = TcpStream::connect((config.host.as_str(), config.port))
            .await
            .map_err(|e| Error::ConnectionRefused { reason: e.to_string() })?;
        stream.set_nodelay(true)?;
        let (read_half, write_half) = stream.into_split();

        let pending = Arc::new(Pending::default());
        // Unbounded so a slow dispatcher never stalls response routing.
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let reader = tokio::spawn(read_loop(read_half, pending.clone(), event_tx));

        let mut session = Self {
            username: config.username.clone(),
            writer: tokio::sync::Mutex::new(write_half),
            pending,
            next_id: AtomicU64::new(1),
            request_timeout: config.request_timeout,
            reader,
        };

        let result = session
            .call(
                "login",
                json!({ "username": config.username, "password": config.password }),
                Some(config.request_timeout),
            )
            .await?;
        if let Some(name) = result.get("username").and_then(Value::as_str) {
            session.username = name.to_string();
        }
        info!(username = %session.username, host = %config.host, port = config.port, "logged in");

        Ok((session, event_rx))
    }

    async fn send_line(&self, line: &str) -> std::io::Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await
    }

    async fn call(&self, command: &str, args: Value, limit: Option<Duration>) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.pending.waiting().insert(id, tx);
        if self.pending.closed.load(Ordering::SeqCst) {
            self.pending.waiting().remove(&id);
            return Err(Error::NotConnected);
        }

        let request = Request { id, command: command.to_string(), args };
        let line = serde_json::to_string(&request)?;
        debug!(id, command, "-> gateway");
        if let Err(e) = self.send_line(&line).await {
            self.pending.waiting().remove(&id);
            return Err(Error::Disconnected { reason: e.to_string() });
        }

        let received = match limit {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(received) => received,
                Err(_) => {
                    self.pending.waiting().remove(&id);
                    return Err(Error::Timeout { operation: command.to_string() });
                }
            },
            None => rx.await,
        };
        let response = received.map_err(|_| Error::Disconnected {
            reason: format!("connection lost during {}", command),
        })?;

        if !response.success {
            return Err(Error::Rejected {
                command: command.to_string(),
                reason: response.error.unwrap_or_else(|| "no reason given".into()),
            });
        }
        Ok(response.result.unwrap_or(Value::Null))
    }

    /// Call with the request timeout and decode the result
    async fn query<T: DeserializeOwned>(&self, command: &str, args: Value) -> Result<T> {
        let value = self.call(command, args, Some(self.request_timeout)).await?;
        serde_json::from_value(value).map_err(|e| Error::InvalidResponse {
            command: command.to_string(),
            reason: e.to_string(),
        })
    }

    /// Call with the request timeout, ignoring any result
    async fn send(&self, command: &str, args: Value) -> Result<()> {
        self.call(command, args, Some(self.request_timeout)).await.map(|_| ())
    }

    /// Call without a timeout; used for actions that take game time
    async fn act(&self, command: &str, args: Value) -> Result<()> {
        self.call(command, args, None).await.map(|_| ())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_loop(reader: OwnedReadHalf, pending: Arc<Pending>, events: mpsc::UnboundedSender<GameEvent>) {
    let mut lines = BufReader::new(reader).lines();

    let reason = loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break "gateway closed the connection".to_string(),
            Err(e) => break e.to_string(),
        };
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Inbound>(&line) {
            Ok(Inbound::Response(response)) => {
                let waiter = pending.waiting().remove(&response.id);
                match waiter {
                    Some(tx) => {
                        let _ = tx.send(response);
                    }
                    None => debug!(id = response.id, "response nobody is waiting for"),
                }
            }
            Ok(Inbound::Event(event)) => {
                if events.send(event.into()).is_err() {
                    break "event receiver dropped".to_string();
                }
            }
            Err(e) => warn!(error = %e, "unparseable line from gateway"),
        }
    };

    info!(%reason, "gateway connection ended");
    pending.closed.store(true, Ordering::SeqCst);
    pending.waiting().clear();
    let _ = events.send(GameEvent::Disconnected { reason });
}

#[async_trait]
impl Capabilities for Session {
    fn username(&self) -> &str {
        &self.username
    }

    async fn wait_for_chunks_to_load(&self) -> Result<()> {
        self.act("wait_for_chunks", Value::Null).await
    }

    async fn position(&self) -> Result<Vec3> {
        self.query("position", Value::Null).await
    }

    async fn block_by_name(&self, name: &str) -> Result<Option<BlockType>> {
        self.query("block_by_name", json!({ "name": name })).await
    }

    async fn find_blocks(&self, query: BlockQuery) -> Result<Vec<BlockPos>> {
        self.query("find_blocks", serde_json::to_value(query)?).await
    }

    async fn player_entity(&self, username: &str) -> Result<Option<Entity>> {
        self.query("player_entity", json!({ "username": username })).await
    }

    async fn nearest_entity(&self, filter: EntityFilter) -> Result<Option<Entity>> {
        self.query("nearest_entity", serde_json::to_value(filter)?).await
    }

    async fn attack(&self, entity: EntityId) -> Result<()> {
        self.act("attack", json!({ "entity": entity })).await
    }

    async fn set_control_state(&self, control: Control, on: bool) -> Result<()> {
        self.send("set_control_state", json!({ "control": control, "state": on })).await
    }

    async fn clear_control_states(&self) -> Result<()> {
        self.send("clear_control_states", Value::Null).await
    }

    async fn set_goal(&self, goal: Goal, movements: &Movements) -> Result<()> {
        self.send("set_goal", json!({ "goal": goal, "movements": movements })).await
    }

    async fn inventory_items(&self) -> Result<Vec<ItemStack>> {
        self.query("inventory", Value::Null).await
    }

    async fn equip(&self, item: &str, hand: Hand) -> Result<()> {
        self.act("equip", json!({ "item": item, "hand": hand })).await
    }

    async fn fish(&self) -> Result<()> {
        self.act("fish", Value::Null).await
    }

    async fn dig(&self, pos: BlockPos) -> Result<()> {
        self.act("dig", json!({ "position": pos })).await
    }

    async fn place_block(&self, reference: BlockPos, face: Vec3) -> Result<()> {
        self.act("place_block", json!({ "reference": reference, "face": face })).await
    }

    async fn chat(&self, message: &str) -> Result<()> {
        self.send("chat", json!({ "message": message })).await
    }

    async fn start_viewer(&self, port: u16, first_person: bool) -> Result<()> {
        self.send("start_viewer", json!({ "port": port, "first_person": first_person })).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Accept one connection and answer requests with `respond`.
    /// `None` leaves a request unanswered.
    async fn fake_gateway<F>(respond: F) -> (u16, JoinHandle<()>)
    where
        F: Fn(&Request) -> Option<Value> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let task = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = stream.into_split();
            let mut lines = BufReader::new(read_half).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let request: Request = serde_json::from_str(&line).unwrap();
                if request.command == "quit" {
                    break;
                }
                if let Some(reply) = respond(&request) {
                    let mut out = reply.to_string();
                    out.push('\n');
                    write_half.write_all(out.as_bytes()).await.unwrap();
                }
            }
        });
        (port, task)
    }

    fn ok(request: &Request, result: Value) -> Option<Value> {
        Some(json!({ "id": request.id, "success": true, "result": result }))
    }

    #[test]
    fn test_client_config() {
        let config = ClientConfig::new("localhost", 25565, "TestBot")
            .password(Some("hunter2".into()))
            .timeout(Duration::from_secs(3));

        assert_eq!(config.username, "TestBot");
        assert_eq!(config.password.as_deref(), Some("hunter2"));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_login_and_query() {
        let (port, _server) = fake_gateway(|req| match req.command.as_str() {
            "login" => ok(req, json!({ "username": "GatewayBot" })),
            "position" => ok(req, json!({ "x": 1.5, "y": 64.0, "z": -3.0 })),
            "block_by_name" => ok(req, Value::Null),
            _ => Some(json!({ "id": req.id, "success": false, "error": "unsupported" })),
        })
        .await;

        let config = ClientConfig::new("127.0.0.1", port, "Another Dude");
        let (session, _events) = Session::connect(config).await.unwrap();

        assert_eq!(session.username(), "GatewayBot");
        assert_eq!(session.position().await.unwrap(), Vec3::new(1.5, 64.0, -3.0));
        assert_eq!(session.block_by_name("not_a_block").await.unwrap(), None);

        let err = session.fish().await.unwrap_err();
        assert!(matches!(err, Error::Rejected { ref command, .. } if command == "fish"));
    }

    #[tokio::test]
    async fn test_events_are_forwarded() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = stream.into_split();
            let mut lines = BufReader::new(read_half).lines();
            let line = lines.next_line().await.unwrap().unwrap();
            let login: Request = serde_json::from_str(&line).unwrap();
            let script = format!(
                "{}\n{}\n{}\n",
                json!({ "id": login.id, "success": true }),
                json!({ "event": "spawn" }),
                json!({ "event": "chat", "username": "alex", "message": "bt come" }),
            );
            write_half.write_all(script.as_bytes()).await.unwrap();
        });

        let (session, mut events) =
            Session::connect(ClientConfig::new("127.0.0.1", port, "bot")).await.unwrap();
        assert_eq!(session.username(), "bot");

        assert_eq!(events.recv().await, Some(GameEvent::Spawn));
        assert_eq!(
            events.recv().await,
            Some(GameEvent::Chat { username: "alex".into(), message: "bt come".into() })
        );
        assert!(matches!(events.recv().await, Some(GameEvent::Disconnected { .. })));
        let err = session.position().await.unwrap_err();
        assert!(matches!(err, Error::NotConnected));
    }

    #[tokio::test]
    async fn test_event_backlog_does_not_block_responses() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = stream.into_split();
            let mut lines = BufReader::new(read_half).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let request: Request = serde_json::from_str(&line).unwrap();
                let mut out = String::new();
                if request.command == "dig" {
                    for _ in 0..1000 {
                        let event = json!({
                            "event": "player_collect",
                            "collector": "bot",
                            "collected": "wheat",
                        });
                        out.push_str(&event.to_string());
                        out.push('\n');
                    }
                }
                out.push_str(&json!({ "id": request.id, "success": true }).to_string());
                out.push('\n');
                write_half.write_all(out.as_bytes()).await.unwrap();
            }
        });

        let (session, mut events) =
            Session::connect(ClientConfig::new("127.0.0.1", port, "bot")).await.unwrap();

        // Nobody drains events while the dig is in flight.
        let dig = tokio::time::timeout(Duration::from_secs(3), session.dig(BlockPos::new(1, 64, 1)))
            .await
            .expect("dig response was not routed");
        tokio_test::assert_ok!(dig);

        let mut collected = 0;
        while let Ok(GameEvent::PlayerCollect { .. }) = events.try_recv() {
            collected += 1;
        }
        assert_eq!(collected, 1000);
    }

    #[tokio::test]
    async fn test_query_timeout() {
        let (port, _server) = fake_gateway(|req| match req.command.as_str() {
            "login" => ok(req, json!({})),
            _ => None,
        })
        .await;

        let config = ClientConfig::new("127.0.0.1", port, "bot").timeout(Duration::from_millis(50));
        let (session, _events) = Session::connect(config).await.unwrap();

        let err = session.position().await.unwrap_err();
        assert!(matches!(err, Error::Timeout { ref operation } if operation == "position"));
    }

    #[tokio::test]
    async fn test_pending_action_fails_on_disconnect() {
        let (port, _server) = fake_gateway(|req| match req.command.as_str() {
            "login" => ok(req, json!({})),
            _ => None,
        })
        .await;

        let (session, _events) =
            Session::connect(ClientConfig::new("127.0.0.1", port, "bot")).await.unwrap();
        let session = Arc::new(session);

        let digging = {
            let session = session.clone();
            tokio::spawn(async move { session.dig(BlockPos::new(0, 64, 0)).await })
        };
        tokio::task::yield_now().await;
        session.call("quit", Value::Null, Some(Duration::from_millis(10))).await.ok();

        let result = digging.await.unwrap();
        assert!(matches!(
            result,
            Err(Error::Disconnected { .. }) | Err(Error::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = Session::connect(ClientConfig::new("127.0.0.1", port, "bot")).await;
        assert!(matches!(result, Err(Error::ConnectionRefused { .. })));
    }
}
