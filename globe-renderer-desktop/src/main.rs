use color_eyre::{Report, Result};
use globe_renderer::{app::ApplicationRunner, control::background_runner::BackgroundNotification};
use tokio::{runtime::Runtime, sync::broadcast::error::RecvError};
use tokio_with_wasm::alias as tokio;
use winit::{dpi::LogicalSize, window::Window};

pub fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let (width, height) = (800, 600);
    let window_attributes = Window::default_attributes()
        .with_title("Globe")
        .with_min_inner_size(LogicalSize::new(width as f64 / 2.0, height as f64 / 2.0))
        .with_inner_size(LogicalSize::new(width as f64, height as f64));

    let background_runtime = Runtime::new()?;

    let mut app_runner = ApplicationRunner::new(window_attributes)?;

    if let Some(mut notifications) = app_runner.subscribe_to_background_notifications() {
        background_runtime.spawn(async move {
            loop {
                match notifications.recv().await {
                    Ok(notification @ BackgroundNotification::TaskErrored { .. }) => {
                        log::debug!("{notification}")
                    }
                    Ok(notification) => log::info!("{notification}"),
                    Err(RecvError::Lagged(skipped)) => {
                        log::debug!("Skipped {skipped} loading notifications")
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }

    if let Err(err) = app_runner.configure_background_runner(|f| background_runtime.spawn(f)) {
        log::error!("{err:?}");
    }

    Ok::<(), Report>(app_runner.run()?)
}
