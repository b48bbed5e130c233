use std::{pin::Pin, sync::Arc};

use color_eyre::{Report, Result};
use futures::channel::oneshot;
use globe_common::CoordinateRecord;
use tokio::{sync::broadcast::Receiver, task::JoinHandle};
use tokio_with_wasm::alias as tokio;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    error::EventLoopError,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowAttributes,
};

use crate::{
    control::{
        application_controllers::ApplicationControllers,
        background_runner::{AssetSource, BackgroundEvent, BackgroundNotification},
        ui_controller::{ManualRotationSpeed, RotationSpeedSource},
    },
    data::{application_data::ApplicationData, marker::build_markers},
    render::render_engine::{RenderEngine, RenderEvent},
};

const DEFAULT_SPHERE_SEGMENTS: u32 = 512;

/// Values baked in at build time from `Settings.toml` and `GLOBE_*` overrides.
#[derive(Debug, Clone)]
pub struct ApplicationSettings {
    pub texture_url: String,
    pub coordinates_url: String,
    pub auto_rotation_speed: String,
    pub sphere_segments: u32,
}

impl ApplicationSettings {
    pub fn from_build_environment() -> Self {
        let sphere_segments = env!("GLOBE_sphere_segments");

        Self {
            texture_url: env!("GLOBE_texture_url").to_string(),
            coordinates_url: env!("GLOBE_coordinates_url").to_string(),
            auto_rotation_speed: env!("GLOBE_auto_rotation_speed").to_string(),
            sphere_segments: sphere_segments.parse().unwrap_or_else(|_| {
                log::warn!(
                    "Invalid sphere_segments {sphere_segments:?}, using {DEFAULT_SPHERE_SEGMENTS}"
                );
                DEFAULT_SPHERE_SEGMENTS
            }),
        }
    }
}

pub enum ApplicationEvent {
    TerminateWithError(Report),
    RenderEvent(RenderEvent),
    CoordinatesLoaded(Vec<CoordinateRecord>),
    SetRotationSpeed(String),
}

pub struct Application {
    engine: Option<RenderEngine>,
    controllers: ApplicationControllers,
    data: ApplicationData,
    settings: ApplicationSettings,
    window_attributes: WindowAttributes,
    event_loop_proxy: EventLoopProxy<ApplicationEvent>,
    surface_configured: bool,
    receiver: Option<oneshot::Receiver<RenderEngine>>,
    resized: Option<PhysicalSize<u32>>,
}

impl Application {
    pub fn new(
        window_attributes: WindowAttributes,
        event_loop_proxy: EventLoopProxy<ApplicationEvent>,
    ) -> Self {
        let settings = ApplicationSettings::from_build_environment();

        let rotation_speed = ManualRotationSpeed::new(settings.auto_rotation_speed.as_str());
        let controllers = ApplicationControllers::new(event_loop_proxy.clone(), Box::new(rotation_speed));

        let bounds = window_attributes
            .inner_size
            .map(|s| s.to_physical(1.0).into())
            .unwrap_or((800.0, 600.0).into());
        let data = ApplicationData::new(bounds, settings.sphere_segments);

        Self {
            engine: None,
            controllers,
            data,
            settings,
            window_attributes,
            event_loop_proxy,
            surface_configured: false,
            receiver: None,
            resized: None,
        }
    }

    /// Picks up the engine once its asynchronous initialization is done.
    fn receive_engine(&mut self) {
        let Some(receiver) = self.receiver.as_mut() else {
            return;
        };

        match receiver.try_recv() {
            Ok(Some(mut engine)) => {
                self.data.set_scale_factor(engine.window().scale_factor());
                let size = self.resized.take().unwrap_or(engine.size());
                self.surface_configured = engine.resize(size, &mut self.data);
                engine.window().request_redraw();
                self.request_assets(&engine);
                self.engine = Some(engine);
                self.receiver = None;
            }
            Ok(None) => {
                log::debug!("No engine received at initialization");
            }
            Err(err) => {
                log::debug!("Canceled engine initialization: {err:?}");
                self.receiver = None;
            }
        }
    }

    fn request_assets(&mut self, engine: &RenderEngine) {
        let events = [
            BackgroundEvent::LoadTexture {
                source: AssetSource::parse(&self.settings.texture_url),
                max_dimension: engine.max_texture_dimension(),
            },
            BackgroundEvent::LoadCoordinates {
                source: AssetSource::parse(&self.settings.coordinates_url),
            },
        ];

        for event in events {
            if let Err(err) = self.controllers.send_event(event) {
                log::error!("{err:?}");
            }
        }
    }
}

pub struct ApplicationRunner {
    event_loop: EventLoop<ApplicationEvent>,
    app: Application,
}

impl ApplicationRunner {
    pub fn new(window_attributes: WindowAttributes) -> Result<Self> {
        let event_loop = EventLoop::<ApplicationEvent>::with_user_event().build()?;
        let event_loop_proxy = event_loop.create_proxy();

        let app = Application::new(window_attributes, event_loop_proxy);

        Ok(Self { app, event_loop })
    }

    /// Replaces the settings-seeded speed, e.g. with a slider on the page.
    pub fn with_rotation_speed_source(mut self, source: Box<dyn RotationSpeedSource>) -> Self {
        self.app
            .controllers
            .ui_controller
            .set_rotation_speed_source(source);
        self
    }

    pub fn get_event_loop_proxy(&self) -> EventLoopProxy<ApplicationEvent> {
        self.event_loop.create_proxy()
    }

    pub fn configure_background_runner(
        &mut self,
        async_runner: impl FnOnce(Pin<Box<dyn Future<Output = ()> + Send>>) -> JoinHandle<()>,
    ) -> Result<(), Report> {
        self.app
            .controllers
            .configure_background_runner(async_runner)
    }

    pub fn subscribe_to_background_notifications(
        &mut self,
    ) -> Option<Receiver<BackgroundNotification>> {
        self.app.controllers.subscribe_to_notifications()
    }

    pub fn run(self) -> Result<(), EventLoopError> {
        let mut app = self.app;
        self.event_loop.run_app(&mut app)
    }
}

impl ApplicationHandler<ApplicationEvent> for Application {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() || self.receiver.is_some() {
            return;
        }

        let window = match event_loop.create_window(self.window_attributes.clone()) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Unable to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        let event_loop_proxy = self.event_loop_proxy.clone();
        let globe = self.data.globe.clone();

        let (sender, receiver) = oneshot::channel();
        self.receiver = Some(receiver);

        let initialize_engine = async move {
            match RenderEngine::new(window, globe).await {
                Ok(render_engine) => {
                    if sender.send(render_engine).is_err() {
                        log::error!("Unable to use render engine: sender expired");
                    }
                }
                Err(err) => {
                    log::error!("{err:?}");
                    if let Err(err) =
                        event_loop_proxy.send_event(ApplicationEvent::TerminateWithError(err))
                    {
                        log::error!("{err}");
                    }
                }
            }
        };

        #[cfg(target_arch = "wasm32")]
        tokio::spawn(initialize_engine);
        #[cfg(not(target_arch = "wasm32"))]
        match tokio::runtime::Builder::new_current_thread().build() {
            Ok(runtime) => {
                runtime.block_on(initialize_engine);
                self.receive_engine();
            }
            Err(err) => {
                log::error!("Unable to start engine initialization: {err}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if self.engine.is_none() {
            // always check for resized as it may happen before the
            // wgpu engine gets initialized (e.g. in the browser)
            if let WindowEvent::Resized(physical_size) = event {
                self.resized = Some(physical_size);
            }
            self.receive_engine();
        }

        let Some(engine) = &mut self.engine else {
            if let WindowEvent::CloseRequested = event {
                event_loop.exit();
            }
            return;
        };

        if self.controllers.input(&event, &mut self.data) {
            return;
        }

        match event {
            WindowEvent::Resized(physical_size) => {
                self.surface_configured = engine.resize(physical_size, &mut self.data);
                // On macos the window needs to be redrawn manually after resizing
                engine.window().request_redraw();
            }
            WindowEvent::RedrawRequested => {
                engine.window().request_redraw();

                if !self.surface_configured {
                    return;
                }

                self.controllers.update(&mut self.data);
                engine.update(&mut self.data);
                match engine.render() {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        self.surface_configured = engine.resize(engine.size(), &mut self.data);
                    }
                    // The system is out of memory, we should probably quit
                    Err(wgpu::SurfaceError::OutOfMemory | wgpu::SurfaceError::Other) => {
                        log::error!("OutOfMemory");
                        event_loop.exit()
                    }
                    // This happens when the a frame takes too long to present
                    Err(wgpu::SurfaceError::Timeout) => {
                        log::warn!("Surface timeout")
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => event_loop.exit(),
            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: ApplicationEvent) {
        match event {
            ApplicationEvent::TerminateWithError(err) => {
                log::error!("{err:?}");
                event_loop.exit();
            }
            ApplicationEvent::RenderEvent(render_event) => {
                if let Some(engine) = &mut self.engine {
                    engine.process_event(render_event);
                }
            }
            ApplicationEvent::CoordinatesLoaded(records) => {
                let markers = build_markers(&records, self.data.globe.radius());
                log::info!("Loaded {} coordinates", records.len());
                self.data.globe.attach_markers(markers);
                if let Some(engine) = &mut self.engine {
                    engine.set_markers(self.data.globe.markers());
                }
            }
            ApplicationEvent::SetRotationSpeed(value) => {
                self.controllers.ui_controller.set_rotation_speed(&value);
            }
        }
    }
}
