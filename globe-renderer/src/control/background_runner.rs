use std::fmt::Display;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use bytes::Bytes;
use color_eyre::{Result, eyre::WrapErr};
use globe_common::CoordinateRecord;
use tokio::{
    select,
    sync::{broadcast, mpsc::Receiver},
    task::{JoinSet, spawn_blocking},
};
use tokio_with_wasm::alias as tokio;
use winit::event_loop::EventLoopProxy;

use crate::{
    app::ApplicationEvent,
    render::{render_engine::RenderEvent, texture::TextureData},
};

/// Location of a file the application loads at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Http(String),
    #[cfg(not(target_arch = "wasm32"))]
    File(PathBuf),
}

impl AssetSource {
    /// `http://` and `https://` sources are fetched, anything else is a local
    /// path on desktop. The browser can only fetch.
    pub fn parse(source: &str) -> Self {
        let source = source.trim();

        #[cfg(not(target_arch = "wasm32"))]
        if !(source.starts_with("http://") || source.starts_with("https://")) {
            return AssetSource::File(PathBuf::from(source));
        }

        AssetSource::Http(source.to_string())
    }
}

impl Display for AssetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetSource::Http(url) => write!(f, "{url}"),
            #[cfg(not(target_arch = "wasm32"))]
            AssetSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum BackgroundEvent {
    LoadTexture {
        source: AssetSource,
        max_dimension: u32,
    },
    LoadCoordinates {
        source: AssetSource,
    },
}

impl Display for BackgroundEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackgroundEvent::LoadTexture { source, .. } => write!(f, "{source}"),
            BackgroundEvent::LoadCoordinates { source } => write!(f, "{source}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    pub task: String,
    pub finished: usize,
    pub total: usize,
}

impl TaskInfo {
    pub fn new(task: String, finished: usize, total: usize) -> Self {
        Self {
            task,
            finished,
            total,
        }
    }
}

#[derive(Debug, Clone)]
pub enum BackgroundNotification {
    TaskStarted(TaskInfo),
    TaskFinished(TaskInfo),
    TaskErrored { task: TaskInfo, error: String },
    JoinError(String),
}

impl Display for BackgroundNotification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackgroundNotification::TaskStarted(info) => {
                write!(f, "Started loading file: {}", info.task)
            }
            BackgroundNotification::TaskFinished(info) => write!(
                f,
                "Loading file: {}. Loaded {} of {} files.",
                info.task, info.finished, info.total
            ),
            BackgroundNotification::TaskErrored { task, error } => write!(
                f,
                "Failed loading file: {}. Loaded {} of {} files. {error}",
                task.task, task.finished, task.total
            ),
            BackgroundNotification::JoinError(error) => write!(f, "Loading task failed: {error}"),
        }
    }
}

/// This handles async operations of the application
/// which includes non-gpu long cpu-bound tasks done in the background
#[derive(Debug)]
pub struct BackgroundRunner {
    event_receiver: Receiver<BackgroundEvent>,
    render_event_loopback: EventLoopProxy<ApplicationEvent>,
    notification_broadcaster: broadcast::Sender<BackgroundNotification>,
    running_tasks: JoinSet<(String, Result<()>)>,
    started_tasks: usize,
    finished_tasks: usize,
}

pub async fn fetch_bytes(source: &AssetSource) -> Result<Bytes> {
    match source {
        AssetSource::Http(url) => reqwest::get(url)
            .await
            .wrap_err_with(|| format!("Error trying to fetch from {url}"))?
            .error_for_status()
            .wrap_err_with(|| format!("Unexpected response from {url}"))?
            .bytes()
            .await
            .wrap_err_with(|| format!("Error reading response from {url}")),
        #[cfg(not(target_arch = "wasm32"))]
        AssetSource::File(path) => ::tokio::fs::read(path)
            .await
            .map(Bytes::from)
            .wrap_err_with(|| format!("Error reading file {}", path.display())),
    }
}

/// A JSON array of `{ "latitude": .., "longitude": .. }` objects. A single
/// invalid record rejects the whole list.
pub fn parse_coordinates(bytes: &[u8]) -> Result<Vec<CoordinateRecord>> {
    serde_json::from_slice(bytes).wrap_err("Invalid coordinate list")
}

async fn load_texture(source: &AssetSource, max_dimension: u32) -> Result<TextureData> {
    let bytes = fetch_bytes(source).await?;
    spawn_blocking(move || TextureData::decode(&bytes, max_dimension))
        .await
        .wrap_err("Texture decoding task failed")?
}

async fn load_coordinates(source: &AssetSource) -> Result<Vec<CoordinateRecord>> {
    let bytes = fetch_bytes(source).await?;
    parse_coordinates(&bytes)
}

impl BackgroundRunner {
    pub fn new(
        event_receiver: Receiver<BackgroundEvent>,
        render_event_loopback: EventLoopProxy<ApplicationEvent>,
    ) -> Self {
        let (notification_broadcaster, _notification_subscriber) = broadcast::channel(128);
        Self {
            event_receiver,
            render_event_loopback,
            notification_broadcaster,
            running_tasks: JoinSet::new(),
            started_tasks: 0,
            finished_tasks: 0,
        }
    }

    pub async fn process_event(
        render_event_loopback: EventLoopProxy<ApplicationEvent>,
        event: BackgroundEvent,
    ) -> Result<()> {
        use BackgroundEvent::*;

        match event {
            LoadTexture {
                source,
                max_dimension,
            } => match load_texture(&source, max_dimension).await {
                Ok(texture) => {
                    let _ = render_event_loopback.send_event(ApplicationEvent::RenderEvent(
                        RenderEvent::TextureReady(texture),
                    ));
                    Ok(())
                }
                Err(err) => {
                    log::warn!("Globe stays untextured: {err:?}");
                    Err(err)
                }
            },
            LoadCoordinates { source } => match load_coordinates(&source).await {
                Ok(records) => {
                    let _ = render_event_loopback
                        .send_event(ApplicationEvent::CoordinatesLoaded(records));
                    Ok(())
                }
                Err(err) => {
                    log::error!("Error loading coordinates: {err:?}");
                    Err(err)
                }
            },
        }
    }

    pub async fn run(&mut self) {
        loop {
            let notification = select! {
                Some(event) = self.event_receiver.recv() => {
                    let sender = self.render_event_loopback.clone();
                    let event_name = format!("{event}");
                    {
                        let event_name = event_name.clone();
                        self.running_tasks.spawn(async move {
                            (event_name, Self::process_event(sender, event).await)
                        });
                    }
                    self.started_tasks += 1;
                    BackgroundNotification::TaskStarted(self.task_info(event_name))
                }
                Some(result) = self.running_tasks.join_next() => {
                    self.finished_tasks += 1;
                    match result {
                        Ok((event, task_result)) => {
                            let task = self.task_info(event);
                            match task_result {
                                Ok(()) => BackgroundNotification::TaskFinished(task),
                                Err(err) => BackgroundNotification::TaskErrored {
                                    task,
                                    error: format!("{err:}"),
                                },
                            }
                        }
                        Err(err) => {
                            log::error!("Error joining task: {err:?}");
                            BackgroundNotification::JoinError(format!("{err:}"))
                        }
                    }
                }
                else => break,
            };
            let _ = self.notification_broadcaster.send(notification);
        }
    }

    fn task_info(&self, task: String) -> TaskInfo {
        TaskInfo::new(task, self.finished_tasks, self.started_tasks)
    }

    pub fn get_notification_receiver(&self) -> broadcast::Receiver<BackgroundNotification> {
        self.notification_broadcaster.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("http://localhost:8080/earth.jpg")]
    #[case("https://example.com/coordinates.json")]
    #[case("  https://example.com/padded.json ")]
    fn urls_are_fetched(#[case] source: &str) {
        assert_eq!(
            AssetSource::parse(source),
            AssetSource::Http(source.trim().to_string())
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[rstest]
    #[case("resources/earth.jpg")]
    #[case("/srv/globe/coordinates.json")]
    #[case("httpdocs/earth.png")]
    fn other_sources_are_local_files(#[case] source: &str) {
        assert_eq!(
            AssetSource::parse(source),
            AssetSource::File(PathBuf::from(source))
        );
    }

    #[test]
    fn parses_coordinate_list() {
        let records =
            parse_coordinates(br#"[{"latitude": 52.23, "longitude": 21.01}, {"latitude": -33.9, "longitude": 151.2}]"#)
                .unwrap();

        assert_eq!(
            records,
            vec![
                CoordinateRecord::new(52.23, 21.01).unwrap(),
                CoordinateRecord::new(-33.9, 151.2).unwrap(),
            ]
        );
    }

    #[rstest]
    #[case(br#"{"latitude": 1, "longitude": 2}"#.as_slice())]
    #[case(br#"[{"latitude": 1}]"#.as_slice())]
    #[case(br#"[{"latitude": 95, "longitude": 2}]"#.as_slice())]
    #[case(b"<html>not found</html>".as_slice())]
    fn invalid_coordinate_lists_are_rejected(#[case] bytes: &[u8]) {
        assert!(parse_coordinates(bytes).is_err());
    }

    #[test]
    fn empty_coordinate_list_is_valid() {
        assert!(parse_coordinates(b"[]").unwrap().is_empty());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[::tokio::test]
    async fn missing_local_file_is_an_error() {
        let source = AssetSource::parse("this/file/does/not/exist.json");

        assert!(fetch_bytes(&source).await.is_err());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[::tokio::test]
    async fn unreachable_coordinates_leave_the_globe_without_markers() {
        use crate::data::{globe::GlobeState, marker::build_markers};

        let mut globe = GlobeState::new(16);
        let source = AssetSource::parse("this/file/does/not/exist.json");

        let result = load_coordinates(&source).await;
        assert!(result.is_err());

        let markers = result
            .map(|records| build_markers(&records, globe.radius()))
            .unwrap_or_default();
        globe.attach_markers(markers);

        assert!(globe.markers().is_empty());
        assert_eq!(globe.rotation, GlobeState::new(16).rotation);
    }

    #[test]
    fn progress_is_reported_per_file() {
        let notification = BackgroundNotification::TaskFinished(TaskInfo::new(
            "http://localhost:8080/coordinates.json".to_string(),
            1,
            2,
        ));

        assert_eq!(
            notification.to_string(),
            "Loading file: http://localhost:8080/coordinates.json. Loaded 1 of 2 files."
        );
    }
}
