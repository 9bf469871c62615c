//! Ordered layer collection.
//!
//! Index 0 is the bottom layer. Layers are stored as `Arc<Layer>` and edited
//! with `Arc::make_mut`, so a cloned stack is a snapshot that later edits do
//! not touch. Operations on an unknown id, or that do not apply to the
//! layer's kind, change nothing and report it through their return value.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strata_core::RgbaImage;
use strata_ops::{AdjustmentSet, BlendMode, Canvas, PipelineOptions, Transform};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::compositor::{placement_for, render_image_layer};
use crate::layer::{clamp_opacity, Direction, ImageContent, Layer, LayerContent, LayerId, LayerOptions};

/// Layers in compositing order plus the active selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerStack {
    layers: Vec<Arc<Layer>>,
    active: Option<LayerId>,
}

impl LayerStack {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a layer from `content`, appends it on top and makes it active.
    pub fn add_layer(&mut self, content: impl Into<LayerContent>, name: Option<String>, options: LayerOptions) -> LayerId {
        self.push(Layer::new(content, name, options))
    }

    /// Appends `layer` on top and makes it active.
    ///
    /// A layer whose id is already present gets a fresh id.
    pub fn push(&mut self, mut layer: Layer) -> LayerId {
        if self.index_of(layer.id).is_some() {
            layer.id = LayerId::new();
        }
        let id = layer.id;
        debug!(layer = %id, name = %layer.name, kind = layer.content.kind(), "stack::push");
        self.layers.push(Arc::new(layer));
        self.active = Some(id);
        id
    }

    /// Removes a layer. If it was active, the new top layer becomes active.
    pub fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        let idx = self.index_of(id)?;
        let removed = self.layers.remove(idx);
        if self.active == Some(id) {
            self.active = self.layers.last().map(|l| l.id);
        }
        debug!(layer = %id, "stack::remove_layer");
        Some(Arc::unwrap_or_clone(removed))
    }

    /// Inserts a copy directly above `id` and makes it active.
    pub fn duplicate_layer(&mut self, id: LayerId) -> Option<LayerId> {
        let idx = self.index_of(id)?;
        let copy = self.layers[idx].duplicate();
        let new_id = copy.id;
        self.layers.insert(idx + 1, Arc::new(copy));
        self.active = Some(new_id);
        Some(new_id)
    }

    /// Swaps a layer with its neighbor. Returns `false` at either end.
    pub fn move_layer(&mut self, id: LayerId, direction: Direction) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let Some(target) = idx.checked_add_signed(direction.offset()) else {
            return false;
        };
        if target >= self.layers.len() {
            return false;
        }
        self.layers.swap(idx, target);
        true
    }

    /// Flips visibility.
    pub fn toggle_visibility(&mut self, id: LayerId) -> bool {
        self.modify(id, |l| l.visible = !l.visible)
    }

    /// Flips the lock flag.
    pub fn toggle_lock(&mut self, id: LayerId) -> bool {
        self.modify(id, |l| l.locked = !l.locked)
    }

    /// Sets opacity, clamped to 0..1.
    pub fn set_opacity(&mut self, id: LayerId, opacity: f64) -> bool {
        let opacity = clamp_opacity(opacity);
        self.modify(id, |l| l.opacity = opacity)
    }

    /// Sets the blend mode.
    pub fn set_blend_mode(&mut self, id: LayerId, mode: BlendMode) -> bool {
        self.modify(id, |l| l.blend_mode = mode)
    }

    /// Renames a layer.
    pub fn set_name(&mut self, id: LayerId, name: impl Into<String>) -> bool {
        let name = name.into();
        self.modify(id, |l| l.name = name)
    }

    /// Replaces the payload. The layer kind may change.
    pub fn update_content(&mut self, id: LayerId, content: impl Into<LayerContent>) -> bool {
        let content = content.into();
        self.modify(id, |l| l.content = content)
    }

    /// Replaces the transform.
    pub fn update_transform(&mut self, id: LayerId, transform: Transform) -> bool {
        self.modify(id, |l| l.transform = transform)
    }

    /// Replaces the adjustments.
    pub fn update_adjustments(&mut self, id: LayerId, adjustments: AdjustmentSet) -> bool {
        self.modify(id, |l| l.adjustments = adjustments)
    }

    /// Bakes a layer into the one below it.
    ///
    /// Both layers must be image layers and the lower one must hold its own
    /// pixels; an upper layer without pixels renders `base`. The upper layer
    /// is rendered through its adjustments and transform and drawn onto the
    /// lower layer's raw pixels with its opacity and blend mode. The lower
    /// layer's adjustments are reset, the upper layer is removed and the
    /// lower layer becomes active.
    pub fn merge_down(&mut self, id: LayerId, base: Option<&RgbaImage>) -> bool {
        self.merge_down_with(id, base, &PipelineOptions::default())
    }

    /// [`merge_down`](Self::merge_down) with explicit pipeline options.
    pub fn merge_down_with(&mut self, id: LayerId, base: Option<&RgbaImage>, opts: &PipelineOptions) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        if idx == 0 {
            return false;
        }
        let (upper, lower) = (&self.layers[idx], &self.layers[idx - 1]);
        if !upper.is_image() {
            return false;
        }
        let Some(lower_pixels) = lower.content.pixels() else {
            debug!(layer = %lower.id, "stack::merge_down target has no pixels");
            return false;
        };
        let src = match (upper.content.pixels(), base) {
            (Some(p), _) => p.as_ref(),
            (None, Some(b)) => b,
            (None, None) => {
                debug!(layer = %upper.id, "stack::merge_down source has no pixels");
                return false;
            }
        };
        let rendered = render_image_layer(upper, src, opts);
        let placement = placement_for(&upper.transform, rendered.width(), rendered.height());
        let map = placement.to_affine(rendered.width(), rendered.height());

        let mut canvas = Canvas::from_image(lower_pixels.as_ref().clone());
        canvas.draw_image(&rendered, &map, upper.opacity, upper.blend_mode);
        let merged = canvas.into_image();

        let lower_id = lower.id;
        trace!(upper = %id, lower = %lower_id, "stack::merge_down");
        let lower = Arc::make_mut(&mut self.layers[idx - 1]);
        lower.content = LayerContent::Image(ImageContent::new(merged));
        lower.adjustments = AdjustmentSet::default();
        self.layers.remove(idx);
        self.active = Some(lower_id);
        true
    }

    /// The active layer.
    pub fn active(&self) -> Option<&Layer> {
        self.active.and_then(|id| self.get(id))
    }

    /// Id of the active layer.
    pub fn active_id(&self) -> Option<LayerId> {
        self.active
    }

    /// Selects a layer. Unknown ids are ignored.
    pub fn set_active(&mut self, id: LayerId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Looks up a layer.
    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id).map(|l| l.as_ref())
    }

    /// Stack position of a layer, 0 at the bottom.
    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Layers bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Layer> + ExactSizeIterator {
        self.layers.iter().map(|l| l.as_ref())
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if there are no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Removes every layer.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.active = None;
    }

    /// Snapshot of the active layer's adjustments, or defaults.
    pub fn active_adjustments(&self) -> AdjustmentSet {
        self.active().map(|l| l.adjustments.clone()).unwrap_or_default()
    }

    /// Writes `adjustments` to the active layer. Returns `false` when there
    /// is no active layer or nothing changed; an unchanged set leaves the
    /// layer buffer shared.
    pub fn commit_active_adjustments(&mut self, adjustments: &AdjustmentSet) -> bool {
        let Some(id) = self.active else {
            return false;
        };
        match self.get(id) {
            Some(l) if l.adjustments != *adjustments => self.update_adjustments(id, adjustments.clone()),
            _ => false,
        }
    }

    fn modify(&mut self, id: LayerId, f: impl FnOnce(&mut Layer)) -> bool {
        match self.layers.iter_mut().find(|l| l.id == id) {
            Some(layer) => {
                f(Arc::make_mut(layer));
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::TextContent;

    fn three() -> (LayerStack, [LayerId; 3]) {
        let mut s = LayerStack::new();
        let a = s.push(Layer::image(RgbaImage::filled(2, 2, [255, 0, 0, 255])).with_name("a"));
        let b = s.push(Layer::image(RgbaImage::filled(2, 2, [0, 255, 0, 255])).with_name("b"));
        let c = s.push(Layer::image(RgbaImage::filled(2, 2, [0, 0, 255, 255])).with_name("c"));
        (s, [a, b, c])
    }

    fn names(s: &LayerStack) -> Vec<&str> {
        s.iter().map(|l| l.name.as_str()).collect()
    }

    #[test]
    fn test_add_makes_active() {
        let (s, [_, _, c]) = three();
        assert_eq!(s.len(), 3);
        assert_eq!(s.active_id(), Some(c));
        assert_eq!(names(&s), ["a", "b", "c"]);
    }

    #[test]
    fn test_remove_active_selects_top() {
        let (mut s, [a, b, c]) = three();
        s.set_active(b);
        assert_eq!(s.remove_layer(b).map(|l| l.name), Some("b".to_string()));
        assert_eq!(s.active_id(), Some(c));
        s.remove_layer(c);
        assert_eq!(s.active_id(), Some(a));
        s.remove_layer(a);
        assert_eq!(s.active_id(), None);
        assert!(s.remove_layer(a).is_none());
    }

    #[test]
    fn test_remove_inactive_keeps_selection() {
        let (mut s, [a, _, c]) = three();
        s.remove_layer(a);
        assert_eq!(s.active_id(), Some(c));
    }

    #[test]
    fn test_duplicate_above_source() {
        let (mut s, [a, _, _]) = three();
        s.toggle_lock(a);
        let d = s.duplicate_layer(a).unwrap();
        assert_eq!(names(&s), ["a", "a copy", "b", "c"]);
        assert_eq!(s.active_id(), Some(d));
        assert!(!s.get(d).unwrap().locked);
        assert!(s.duplicate_layer(LayerId::new()).is_none());
    }

    #[test]
    fn test_move_layer() {
        let (mut s, [a, _, c]) = three();
        assert!(s.move_layer(a, Direction::Up));
        assert_eq!(names(&s), ["b", "a", "c"]);
        assert!(!s.move_layer(c, Direction::Up));
        assert!(s.move_layer(c, Direction::Down));
        assert_eq!(names(&s), ["b", "c", "a"]);
    }

    #[test]
    fn test_field_setters() {
        let (mut s, [a, ..]) = three();
        assert!(s.set_opacity(a, -1.0));
        assert_eq!(s.get(a).unwrap().opacity, 0.0);
        s.set_opacity(a, 0.25);
        assert_eq!(s.get(a).unwrap().opacity, 0.25);
        s.set_blend_mode(a, BlendMode::Screen);
        s.set_name(a, "renamed");
        s.toggle_visibility(a);
        let l = s.get(a).unwrap();
        assert_eq!((l.blend_mode, l.name.as_str(), l.visible), (BlendMode::Screen, "renamed", false));
        assert!(!s.set_opacity(LayerId::new(), 1.0));
    }

    #[test]
    fn test_clone_is_snapshot() {
        let (mut s, [a, ..]) = three();
        let snap = s.clone();
        s.update_transform(a, Transform { x: 5.0, ..Transform::for_size(2, 2) });
        s.update_content(a, TextContent::new("t", 0.0, 0.0));
        assert_eq!(snap.get(a).unwrap().transform, Transform::for_size(2, 2));
        assert!(snap.get(a).unwrap().is_image());
        assert!(!s.get(a).unwrap().is_image());
    }

    #[test]
    fn test_merge_down_preconditions() {
        let (mut s, [a, b, _]) = three();
        assert!(!s.merge_down(a, None));
        let t = s.add_layer(TextContent::new("t", 0.0, 0.0), None, LayerOptions::default());
        assert!(!s.merge_down(t, None));
        s.remove_layer(t);
        s.update_content(a, ImageContent::base());
        assert!(!s.merge_down(b, None));
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_merge_down_half_opacity() {
        let (mut s, [a, b, _]) = three();
        s.set_opacity(b, 0.5);
        s.update_adjustments(a, AdjustmentSet { brightness: 50.0, ..AdjustmentSet::default() });
        assert!(s.merge_down(b, None));
        assert_eq!(s.len(), 2);
        assert_eq!(s.active_id(), Some(a));
        let l = s.get(a).unwrap();
        assert!(l.adjustments.is_identity());
        // Lower raw pixels, not its adjusted render.
        assert_eq!(l.content.pixels().unwrap().pixel(0, 0), [128, 128, 0, 255]);
    }

    #[test]
    fn test_merge_down_base_source() {
        let mut s = LayerStack::new();
        let a = s.push(Layer::image(RgbaImage::filled(2, 2, [0, 0, 0, 255])));
        let b = s.push(Layer::base());
        let base = RgbaImage::filled(2, 2, [10, 20, 30, 255]);
        assert!(!s.merge_down(b, None));
        assert!(s.merge_down(b, Some(&base)));
        assert_eq!(s.get(a).unwrap().content.pixels().unwrap().as_ref(), &base);
    }

    #[test]
    fn test_sync_projection() {
        let (mut s, [_, _, c]) = three();
        let mut adj = s.active_adjustments();
        assert!(adj.is_identity());
        assert!(!s.commit_active_adjustments(&adj));
        adj.contrast = 30.0;
        assert!(s.commit_active_adjustments(&adj));
        assert_eq!(s.get(c).unwrap().adjustments.contrast, 30.0);
        s.clear();
        assert!(!s.commit_active_adjustments(&adj));
        assert!(s.active_adjustments().is_identity());
    }

    #[test]
    fn test_push_duplicate_id_gets_fresh_id() {
        let mut s = LayerStack::new();
        let l = Layer::base();
        let a = s.push(l.clone());
        let b = s.push(l);
        assert_ne!(a, b);
    }
}
