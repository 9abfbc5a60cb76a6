//! Composition of the device, user, image, layer and net-state transforms.
//!
//! The effective transform of a net is `device * user * image * layer * state`, the device transform
//! being outermost. The first three only depend on the render inputs and are combined once into the
//! global transform.

use log::debug;

use crate::geometry::{Affine, Mirroring};
use crate::image::{AxisSelect, ImageInfo, Layer, NetState, RenderInfo, UserTransform};

#[derive(Debug, Clone, PartialEq)]
pub struct TransformStack {
    global: Affine,
    layer: Affine,
    state: Affine,
}

impl TransformStack {
    pub fn new(info: &ImageInfo, user: &UserTransform, render_info: &RenderInfo) -> Self {
        let global = Self::device(render_info)
            .then(&Self::user(user))
            .then(&Self::image(info));

        debug!("global transform: {:?}", global.to_row());

        Self {
            global,
            layer: Affine::identity(),
            state: Affine::identity(),
        }
    }

    /// Image units to device pixels, device Y growing downwards.
    pub fn device(render_info: &RenderInfo) -> Affine {
        Affine::identity()
            .translate(0.0, render_info.display_height as f64)
            .scale(1.0, -1.0)
            .scale(render_info.scale_factor_x, render_info.scale_factor_y)
            .translate(-render_info.lower_left_x, -render_info.lower_left_y)
    }

    /// Translate, scale, mirror, then rotate. The order is significant.
    pub fn user(user: &UserTransform) -> Affine {
        let [mirror_x, mirror_y] = Mirroring::from((user.mirror_around_x, user.mirror_around_y)).as_f64();

        Affine::identity()
            .translate(user.translate_x, user.translate_y)
            .scale(user.scale_x, user.scale_y)
            .scale(mirror_x, mirror_y)
            .rotate(user.rotation)
    }

    pub fn image(info: &ImageInfo) -> Affine {
        Affine::identity()
            .translate(info.image_justify_offset_a, info.image_justify_offset_b)
            .translate(info.offset_a, info.offset_b)
            .rotate(info.image_rotation)
    }

    pub fn for_layer(layer: &Layer) -> Affine {
        Affine::identity().rotate(layer.rotation)
    }

    /// Scale then offset, then mirror; swapping the axes rotates by 270 degrees and flips Y.
    pub fn for_state(state: &NetState) -> Affine {
        let [mirror_x, mirror_y] = Mirroring::from(state.mirror).as_f64();

        let transform = Affine::identity()
            .scale(state.scale_a, state.scale_b)
            .translate(state.offset_a, state.offset_b)
            .scale(mirror_x, mirror_y);

        match state.axis_select {
            AxisSelect::None => transform,
            AxisSelect::SwapAB => transform
                .rotate(270.0)
                .scale(1.0, -1.0),
        }
    }

    pub fn set_layer(&mut self, layer: &Layer) {
        self.layer = Self::for_layer(layer);
    }

    pub fn set_state(&mut self, state: &NetState) {
        self.state = Self::for_state(state);
    }

    pub fn global(&self) -> &Affine {
        &self.global
    }

    /// Global and layer transforms, used for layer-wide drawing such as knockouts.
    pub fn layer_transform(&self) -> Affine {
        self.global.then(&self.layer)
    }

    pub fn net_transform(&self) -> Affine {
        self.global
            .then(&self.layer)
            .then(&self.state)
    }
}
