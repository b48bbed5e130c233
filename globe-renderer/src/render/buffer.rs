use wgpu::util::DeviceExt;

// A custom buffer container for dynamic resizing.
pub struct Buffer {
    pub raw: wgpu::Buffer,
    label: &'static str,
    size: u64,
    usage: wgpu::BufferUsages,
}

impl Buffer {
    pub fn new(
        device: &wgpu::Device,
        label: &'static str,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> Self {
        Self {
            raw: device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage,
                mapped_at_creation: false,
            }),
            label,
            size,
            usage,
        }
    }

    pub fn new_init(
        device: &wgpu::Device,
        label: &'static str,
        data: &[u8],
        usage: wgpu::BufferUsages,
    ) -> Self {
        Self {
            raw: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data,
                usage,
            }),
            label,
            size: data.len() as u64,
            usage,
        }
    }

    /// Only ever grows; the previous contents are discarded when it does.
    pub fn resize(&mut self, device: &wgpu::Device, new_size: u64) {
        if new_size > self.size {
            self.raw = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: new_size,
                usage: self.usage,
                mapped_at_creation: false,
            });
            self.size = new_size;
        }
    }

    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[u8]) {
        self.resize(device, data.len() as u64);
        queue.write_buffer(&self.raw, 0, data);
    }
}
