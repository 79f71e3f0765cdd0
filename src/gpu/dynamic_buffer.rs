//! Growable GPU buffers for per-frame vertex and uniform uploads.
//!
//! The viewport rebuilds its geometry every frame it draws, so buffers are
//! rewritten from offset zero and only reallocated when a frame needs more
//! room than any frame before it.

/// Smallest buffer ever allocated.
const MIN_CAPACITY: usize = 256;

/// A GPU buffer that grows by doubling and never shrinks.
pub struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    len: usize,
    usage: wgpu::BufferUsages,
    label: String,
}

impl DynamicBuffer {
    /// Buffer with the given initial byte capacity.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        initial_capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = initial_capacity.max(MIN_CAPACITY);
        Self {
            buffer: allocate(device, label, capacity, usage),
            capacity,
            len: 0,
            usage,
            label: label.to_owned(),
        }
    }

    /// Replace the contents with `data`, growing if necessary.
    ///
    /// Returns `true` if the buffer was reallocated; bind groups that
    /// reference it must be recreated.
    pub fn write<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let needed = bytes.len();

        let reallocated = needed > self.capacity;
        if reallocated {
            let new_capacity = (needed * 2).max(self.capacity * 2);
            log::debug!(
                "gpu: growing {} from {} to {} bytes",
                self.label,
                self.capacity,
                new_capacity
            );
            self.buffer = allocate(device, &self.label, new_capacity, self.usage);
            self.capacity = new_capacity;
        }

        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.len = needed;
        reallocated
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Bytes written by the last [`write`](Self::write).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the last write was empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated size in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn allocate(
    device: &wgpu::Device,
    label: &str,
    capacity: usize,
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: capacity as u64,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// [`DynamicBuffer`] that counts items of `T` instead of bytes.
pub struct TypedBuffer<T> {
    inner: DynamicBuffer,
    count: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Buffer with room for `capacity` items.
    pub fn with_capacity(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        Self {
            inner: DynamicBuffer::new(device, label, std::mem::size_of::<T>() * capacity, usage),
            count: 0,
            _marker: std::marker::PhantomData,
        }
    }

    /// Replace the contents with `data`, growing if necessary. Returns
    /// `true` if the buffer was reallocated.
    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[T]) -> bool {
        self.count = data.len();
        self.inner.write(device, queue, data)
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        self.inner.buffer()
    }

    /// Items written by the last [`write`](Self::write).
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the last write was empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Allocated size in items.
    pub fn capacity(&self) -> usize {
        self.inner.capacity() / std::mem::size_of::<T>()
    }
}
