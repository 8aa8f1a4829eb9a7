//! Texture layers owned by an instrument.
//!
//! Each instrument draws itself as a stack of textured layers positioned
//! relative to the instrument origin. Layers are addressed by the
//! [`LayerIndex`] returned when they are added; indices stay valid until the
//! set is released.
//!
//! Drawing order is a stable sort on `z_layer`: lower values are drawn first,
//! and layers sharing a value keep the order they were added in.

use crate::camera::Camera;
use crate::graphics::{GraphicsBackend, Quad, TextureId};
use crate::Result;
use std::path::Path;
use tracing::{debug, warn};

/// Initial layer capacity of a set.
pub const MIN_LAYER_CAPACITY: usize = 16;

/// Stable index of a layer within its [`LayerSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerIndex(usize);

impl LayerIndex {
    pub fn get(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub texture: TextureId,
    pub offset_x: i32,
    pub offset_y: i32,
    pub visible: bool,
    pub opacity: u8,
    pub z_layer: i32,
}

#[derive(Debug)]
pub struct LayerSet {
    layers: Vec<Layer>,
    /// Layer indices in drawing order.
    draw_order: Vec<usize>,
    capacity: usize,
    reallocations: usize,
}

impl Default for LayerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerSet {
    pub fn new() -> Self {
        Self {
            layers: Vec::with_capacity(MIN_LAYER_CAPACITY),
            draw_order: Vec::with_capacity(MIN_LAYER_CAPACITY),
            capacity: MIN_LAYER_CAPACITY,
            reallocations: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Slots available before the next growth.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of times the set has doubled its capacity.
    pub fn reallocations(&self) -> usize {
        self.reallocations
    }

    pub fn get(&self, index: LayerIndex) -> Option<&Layer> {
        self.layers.get(index.0)
    }

    /// Layers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (LayerIndex, &Layer)> {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, layer)| (LayerIndex(i), layer))
    }

    /// Layers in the order they are drawn.
    pub fn draw_order(&self) -> impl Iterator<Item = (LayerIndex, &Layer)> {
        self.draw_order
            .iter()
            .map(|&i| (LayerIndex(i), &self.layers[i]))
    }

    /// Load `path` as a new visible, opaque layer.
    ///
    /// If the texture cannot be loaded the set is left untouched.
    pub fn add_layer(
        &mut self,
        graphics: &mut dyn GraphicsBackend,
        path: &Path,
        offset_x: i32,
        offset_y: i32,
        z_layer: i32,
    ) -> Result<LayerIndex> {
        let texture = graphics.load_texture(path)?;

        if self.layers.len() == self.capacity {
            self.grow();
        }

        let index = self.layers.len();
        self.layers.push(Layer {
            texture,
            offset_x,
            offset_y,
            visible: true,
            opacity: u8::MAX,
            z_layer,
        });

        let layers = &self.layers;
        let slot = self
            .draw_order
            .partition_point(|&i| layers[i].z_layer <= z_layer);
        self.draw_order.insert(slot, index);

        debug!(
            "Added layer {} from '{}' (z {})",
            index,
            path.display(),
            z_layer
        );

        Ok(LayerIndex(index))
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity * 2;
        self.layers.reserve_exact(new_capacity - self.layers.len());
        self.draw_order
            .reserve_exact(new_capacity - self.draw_order.len());
        self.capacity = new_capacity;
        self.reallocations += 1;
        debug!("Layer set grew to {} slots", new_capacity);
    }

    fn layer_mut(&mut self, index: LayerIndex, op: &str) -> Option<&mut Layer> {
        let len = self.layers.len();
        let layer = self.layers.get_mut(index.0);
        if layer.is_none() {
            warn!("{}: layer {} out of range (have {})", op, index.0, len);
        }
        layer
    }

    pub fn set_visible(&mut self, index: LayerIndex, visible: bool) {
        if let Some(layer) = self.layer_mut(index, "set_visible") {
            layer.visible = visible;
        }
    }

    pub fn set_offset(&mut self, index: LayerIndex, offset_x: i32, offset_y: i32) {
        if let Some(layer) = self.layer_mut(index, "set_offset") {
            layer.offset_x = offset_x;
            layer.offset_y = offset_y;
        }
    }

    pub fn set_opacity(&mut self, index: LayerIndex, opacity: u8) {
        if let Some(layer) = self.layer_mut(index, "set_opacity") {
            layer.opacity = opacity;
        }
    }

    pub fn set_z_layer(&mut self, index: LayerIndex, z_layer: i32) {
        let Some(layer) = self.layer_mut(index, "set_z_layer") else {
            return;
        };
        if layer.z_layer == z_layer {
            return;
        }
        layer.z_layer = z_layer;

        let layers = &self.layers;
        self.draw_order.clear();
        self.draw_order.extend(0..layers.len());
        self.draw_order.sort_by_key(|&i| layers[i].z_layer);
    }

    /// Release every texture and empty the set.
    pub fn release_all(&mut self, graphics: &mut dyn GraphicsBackend) {
        let count = self.layers.len();
        for layer in self.layers.drain(..) {
            graphics.release_texture(layer.texture);
        }
        self.draw_order.clear();
        if count > 0 {
            debug!("Released {} layers", count);
        }
    }

    /// Draw every visible layer relative to the instrument origin.
    ///
    /// Fully transparent layers and textures the backend no longer knows are
    /// skipped.
    pub fn render(
        &self,
        graphics: &mut dyn GraphicsBackend,
        camera: &Camera,
        origin_x: f32,
        origin_y: f32,
    ) {
        let zoom = camera.zoom();

        for &i in &self.draw_order {
            let layer = &self.layers[i];
            if !layer.visible || layer.opacity == 0 {
                continue;
            }
            let Some((width, height)) = graphics.texture_size(layer.texture) else {
                continue;
            };

            let (sx, sy) = camera.stage_to_screen(
                origin_x + layer.offset_x as f32,
                origin_y + layer.offset_y as f32,
            );

            graphics.draw(
                layer.texture,
                Quad {
                    x: sx.round() as i32,
                    y: sy.round() as i32,
                    width: (width as f32 * zoom).round() as u32,
                    height: (height as f32 * zoom).round() as u32,
                    opacity: layer.opacity,
                },
            );
        }
    }
}
