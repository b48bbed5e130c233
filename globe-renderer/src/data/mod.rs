pub mod application_data;
pub mod camera;
pub mod globe;
pub mod marker;
pub mod pointer;

use winit::dpi::PhysicalSize;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> From<PhysicalSize<T>> for Size<T> {
    fn from(physical_size: PhysicalSize<T>) -> Self {
        Size {
            width: physical_size.width,
            height: physical_size.height,
        }
    }
}

impl<T> From<(T, T)> for Size<T> {
    fn from(value: (T, T)) -> Self {
        Size {
            width: value.0,
            height: value.1,
        }
    }
}
