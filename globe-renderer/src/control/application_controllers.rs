use std::pin::Pin;

use color_eyre::{Report, Result};
use tokio::{
    sync::{
        broadcast,
        mpsc::{Sender, channel},
    },
    task::JoinHandle,
};
use tokio_with_wasm::alias as tokio;
use winit::{event::WindowEvent, event_loop::EventLoopProxy};

use crate::{
    app::ApplicationEvent,
    control::{
        background_runner::{BackgroundEvent, BackgroundNotification, BackgroundRunner},
        input_controller::InputController,
        ui_controller::{RotationSpeedSource, UiController},
    },
    data::application_data::ApplicationData,
};

pub enum RunnerState {
    Initialized(BackgroundRunner),
    Started(JoinHandle<()>),
}

pub struct ApplicationControllers {
    runner_state: Option<RunnerState>,
    event_sender: Sender<BackgroundEvent>,
    pub ui_controller: UiController,
    pub input_controller: InputController,
}

impl ApplicationControllers {
    pub fn new(
        render_event_loopback: EventLoopProxy<ApplicationEvent>,
        rotation_speed: Box<dyn RotationSpeedSource>,
    ) -> Self {
        let (event_sender, event_receiver) = channel(128);

        let runner = BackgroundRunner::new(event_receiver, render_event_loopback);

        ApplicationControllers {
            runner_state: Some(RunnerState::Initialized(runner)),
            event_sender,
            ui_controller: UiController::new(rotation_speed),
            input_controller: InputController::default(),
        }
    }

    pub fn configure_background_runner(
        &mut self,
        async_runner: impl FnOnce(Pin<Box<dyn Future<Output = ()> + Send + 'static>>) -> JoinHandle<()>,
    ) -> Result<(), Report> {
        if let Some(RunnerState::Initialized(mut runner)) = self.runner_state.take() {
            let pinned = Box::pin(async move { runner.run().await });
            self.runner_state = Some(RunnerState::Started(async_runner(pinned)));
        }

        Ok(())
    }

    /// Only available before the runner is started.
    pub fn subscribe_to_notifications(&self) -> Option<broadcast::Receiver<BackgroundNotification>> {
        match &self.runner_state {
            Some(RunnerState::Initialized(runner)) => Some(runner.get_notification_receiver()),
            _ => None,
        }
    }

    /// Never blocks, the event loop thread may be the one driving the runner.
    pub fn send_event(&mut self, event: BackgroundEvent) -> Result<()> {
        self.event_sender.try_send(event)?;
        Ok(())
    }

    pub fn input(&mut self, event: &WindowEvent, data: &mut ApplicationData) -> bool {
        self.ui_controller.process_events(event)
            || self.input_controller.process_events(event, data)
    }

    pub fn update(&mut self, data: &mut ApplicationData) {
        self.ui_controller.auto_rotate(&mut data.globe);
    }
}

impl Drop for ApplicationControllers {
    fn drop(&mut self) {
        if let Some(RunnerState::Started(handle)) = &mut self.runner_state {
            handle.abort();
        }
    }
}
