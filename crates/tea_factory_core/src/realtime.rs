//! Live driver locations over a Pusher-compatible WebSocket.
//!
//! Only the handshake, private-channel subscribe and ping/pong framing are spoken.
//! A [`Subscription`] owns the reader task; dropping it aborts the task and closes the socket.

use chrono::Local;
use futures_util::{SinkExt, Stream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::api::HttpBackend;
use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::models::{Driver, LocationUpdate};

pub const LOCATION_EVENT: &str = "driver-location-update";
const UPDATE_BUFFER: usize = 64;

/// One decoded text frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Connected { socket_id: String },
    Subscribed { channel: String },
    Ping,
    Location(LocationUpdate),
    Error(String),
    Other(String),
}

#[derive(Deserialize)]
struct RawFrame {
    event: String,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    data: Value,
}

/// Event payloads arrive either as a JSON object or as a JSON-encoded string.
fn payload(data: Value) -> CoreResult<Value> {
    match data {
        Value::String(s) => Ok(serde_json::from_str(&s)?),
        other => Ok(other),
    }
}

pub fn parse_frame(text: &str) -> CoreResult<Frame> {
    let raw: RawFrame = serde_json::from_str(text)?;
    let frame = match raw.event.as_str() {
        "pusher:connection_established" => {
            let data = payload(raw.data)?;
            let socket_id = data
                .get("socket_id")
                .and_then(Value::as_str)
                .ok_or_else(|| CoreError::Channel("handshake without socket_id".to_string()))?;
            Frame::Connected {
                socket_id: socket_id.to_string(),
            }
        }
        "pusher_internal:subscription_succeeded" => Frame::Subscribed {
            channel: raw.channel.unwrap_or_default(),
        },
        "pusher:ping" => Frame::Ping,
        "pusher:error" => {
            let data = payload(raw.data).unwrap_or(Value::Null);
            let message = data
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            Frame::Error(message)
        }
        LOCATION_EVENT => Frame::Location(serde_json::from_value(payload(raw.data)?)?),
        other => Frame::Other(other.to_string()),
    };
    Ok(frame)
}

pub fn subscribe_frame(channel: &str, auth: &str) -> String {
    json!({
        "event": "pusher:subscribe",
        "data": { "channel": channel, "auth": auth },
    })
    .to_string()
}

pub fn pong_frame() -> String {
    json!({ "event": "pusher:pong", "data": {} }).to_string()
}

pub fn socket_url(config: &Config) -> String {
    format!(
        "wss://ws-{}.pusher.com/app/{}?protocol=7&client=tea-factory&version={}",
        config.pusher_cluster,
        config.pusher_key,
        env!("CARGO_PKG_VERSION")
    )
}

async fn await_socket_id<S>(ws: &mut S) -> CoreResult<String>
where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    while let Some(msg) = ws.next().await {
        if let Message::Text(text) = msg? {
            match parse_frame(&text)? {
                Frame::Connected { socket_id } => return Ok(socket_id),
                Frame::Error(e) => return Err(CoreError::Channel(e)),
                _ => {}
            }
        }
    }
    Err(CoreError::Channel("socket closed before handshake".to_string()))
}

/// Live location feed. Dropping it stops the reader task.
pub struct Subscription {
    updates: mpsc::Receiver<LocationUpdate>,
    task: JoinHandle<()>,
}

impl Subscription {
    /// Handshake, authorize the private channel through the backend, subscribe, then hand the
    /// socket to a reader task.
    pub async fn connect(backend: &HttpBackend, config: &Config) -> CoreResult<Self> {
        if config.pusher_key.trim().is_empty() {
            return Err(CoreError::Config("TEA_PUSHER_KEY is not set".to_string()));
        }
        let url = socket_url(config);
        tracing::info!("connecting to {}", url);
        let (mut ws, _) = connect_async(url.as_str()).await?;

        let socket_id = tokio::time::timeout(config.http_timeout, await_socket_id(&mut ws))
            .await
            .map_err(|_| CoreError::Channel("handshake timed out".to_string()))??;

        let channel = config.driver_channel.clone();
        let auth = backend
            .authorize_channel(&config.pusher_auth_url(), &socket_id, &channel)
            .await?;
        ws.send(Message::Text(subscribe_frame(&channel, &auth))).await?;

        let (tx, rx) = mpsc::channel(UPDATE_BUFFER);
        let task = tokio::spawn(async move {
            let (mut sink, mut stream) = ws.split();
            while let Some(msg) = stream.next().await {
                let text = match msg {
                    Ok(Message::Text(text)) => text,
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::warn!("driver channel read failed: {}", e);
                        break;
                    }
                };
                match parse_frame(&text) {
                    Ok(Frame::Location(update)) => {
                        if tx.send(update).await.is_err() {
                            break;
                        }
                    }
                    Ok(Frame::Ping) => {
                        if sink.send(Message::Text(pong_frame())).await.is_err() {
                            break;
                        }
                    }
                    Ok(Frame::Subscribed { channel }) => tracing::info!("subscribed to {}", channel),
                    Ok(Frame::Error(e)) => tracing::warn!("driver channel error: {}", e),
                    Ok(_) => {}
                    Err(e) => tracing::debug!("skipping frame: {}", e),
                }
            }
            let _ = sink.close().await;
            tracing::info!("driver channel reader stopped");
        });

        Ok(Self::from_parts(rx, task))
    }

    fn from_parts(updates: mpsc::Receiver<LocationUpdate>, task: JoinHandle<()>) -> Self {
        Self { updates, task }
    }

    /// Next update, or `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<LocationUpdate> {
        self.updates.recv().await
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrackedDriver {
    pub id: String,
    pub name: String,
    pub vehicle: String,
    pub route: String,
    pub status: String,
    pub location: String,
    pub last_update: String,
}

pub fn format_location(latitude: f64, longitude: f64) -> String {
    format!("Lat: {:.5}, Lon: {:.5}", latitude, longitude)
}

fn or_unknown(s: &str) -> String {
    if s.trim().is_empty() {
        "Unknown".to_string()
    } else {
        s.trim().to_string()
    }
}

impl From<&Driver> for TrackedDriver {
    fn from(d: &Driver) -> Self {
        let location = match (d.latitude, d.longitude) {
            (Some(lat), Some(lon)) => format_location(lat, lon),
            _ => "Unknown".to_string(),
        };
        Self {
            id: d.id.clone(),
            name: or_unknown(&d.full_name),
            vehicle: or_unknown(&d.vehicle_number),
            route: or_unknown(&d.route),
            status: or_unknown(&d.status),
            location,
            last_update: d
                .last_updated
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "Never".to_string()),
        }
    }
}

/// Driver list kept current by location updates.
#[derive(Clone, Debug, Default)]
pub struct TrackingBoard {
    drivers: Vec<TrackedDriver>,
}

impl TrackingBoard {
    pub fn new(drivers: &[Driver]) -> Self {
        Self {
            drivers: drivers.iter().map(TrackedDriver::from).collect(),
        }
    }

    pub fn drivers(&self) -> &[TrackedDriver] {
        &self.drivers
    }

    pub fn get(&self, id: &str) -> Option<&TrackedDriver> {
        self.drivers.iter().find(|d| d.id == id)
    }

    /// Returns false for unknown driver ids, which are ignored.
    pub fn apply(&mut self, update: &LocationUpdate) -> bool {
        let stamp = Local::now().format("%H:%M:%S").to_string();
        self.apply_at(update, stamp)
    }

    fn apply_at(&mut self, update: &LocationUpdate, stamp: String) -> bool {
        match self.drivers.iter_mut().find(|d| d.id == update.driver_id) {
            Some(d) => {
                d.location = format_location(update.latitude, update.longitude);
                d.last_update = stamp;
                d.status = "Collecting".to_string();
                true
            }
            None => {
                tracing::debug!("location for unknown driver {}", update.driver_id);
                false
            }
        }
    }
}
