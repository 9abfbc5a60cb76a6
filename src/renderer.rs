use log::{debug, info};

use crate::config::RenderConfiguration;
use crate::error::{Diagnostics, RenderError, RenderSummary};
use crate::geometry::{Affine, BoundingBox, ShapePath};
use crate::image::{Image, Layer, LayerId, NetStateId, RenderInfo, UserTransform};
use crate::net::NetRenderer;
use crate::painter::PainterState;
use crate::surface::Surface;
use crate::transform_stack::TransformStack;
use crate::types::{Exposure, ImagePolarity, Polarity};
use crate::Position;

/// Renders images onto a [`Surface`].
///
/// Walks the renderable nets in order, tracking the current layer and net state. A layer change
/// rebuilds the layer transform, recomputes the layer's inversion and draws its knockout; a state change
/// rebuilds the net state transform. Each net is then drawn across the layer's step-and-repeat grid.
#[derive(Debug, Clone, Default)]
pub struct GerberRenderer {
    pub configuration: RenderConfiguration,
}

impl GerberRenderer {
    pub fn new(configuration: RenderConfiguration) -> Self {
        Self {
            configuration,
        }
    }

    /// Renders `image` with a best-effort contract: problems with individual nets are recorded in the
    /// summary and rendering carries on with the next net.
    ///
    /// The surface's transform and composite mode are restored afterwards.
    #[profiling::function]
    pub fn render(
        &self,
        surface: &mut dyn Surface,
        image: &Image,
        user: &UserTransform,
        render_info: &RenderInfo,
    ) -> RenderSummary {
        let mut diagnostics = Diagnostics::default();
        let mut painter = PainterState::new(&self.configuration);
        let mut transforms = TransformStack::new(&image.info, user, render_info);

        let global_invert = user.inverted ^ (image.info.polarity == ImagePolarity::Negative);

        surface.save();
        surface.set_transform(transforms.global());

        if self.configuration.fill_before_draw || global_invert {
            self.fill_background(surface, &painter, image, render_info, &transforms, global_invert);
        }

        let net_renderer = NetRenderer::new(image, &self.configuration);
        let mut current_layer: Option<LayerId> = None;
        let mut current_state: Option<NetStateId> = None;
        let mut summary = RenderSummary::default();

        for (index, net) in image.renderable_nets() {
            let layer = match image
                .layer(net.layer)
                .ok_or(RenderError::MissingLayer(net.layer))
                .and_then(|layer| {
                    image
                        .state(net.state)
                        .map(|state| (layer, state))
                        .ok_or(RenderError::MissingNetState(net.state))
                }) {
                Ok((layer, state)) => {
                    if current_layer != Some(net.layer) {
                        debug!("net {}: entering layer {:?}", index, net.layer);
                        self.enter_layer(surface, &mut painter, &mut transforms, layer, global_invert);
                        current_layer = Some(net.layer);
                    }
                    if current_state != Some(net.state) {
                        debug!("net {}: entering net state {:?}", index, net.state);
                        transforms.set_state(state);
                        surface.set_transform(&transforms.net_transform());
                        current_state = Some(net.state);
                    }
                    layer
                }
                Err(error) => {
                    diagnostics.report(Some(index), error);
                    summary.nets_skipped += 1;
                    continue;
                }
            };

            match net_renderer.render_net(surface, &painter, index, &layer.step_and_repeat, &mut diagnostics) {
                Ok(true) => summary.nets_rendered += 1,
                Ok(false) => {}
                Err(error) => {
                    diagnostics.report(Some(index), error);
                    summary.nets_skipped += 1;
                }
            }
        }

        surface.restore();

        info!(
            "rendered nets: {}, skipped: {}, diagnostics: {}",
            summary.nets_rendered,
            summary.nets_skipped,
            diagnostics.len()
        );

        summary.diagnostics = diagnostics.into_vec();
        summary
    }

    /// Paints the tone the first exposures draw onto: dark for an inverted image, clear otherwise.
    fn fill_background(
        &self,
        surface: &mut dyn Surface,
        painter: &PainterState,
        image: &Image,
        render_info: &RenderInfo,
        transforms: &TransformStack,
        global_invert: bool,
    ) {
        let exposure = match global_invert {
            true => Exposure::Dark,
            false => Exposure::Clear,
        };

        let (transform, area) = match self.configuration.fill_full_device {
            true => (
                Affine::identity(),
                BoundingBox {
                    min: Position::new(0.0, 0.0),
                    max: Position::new(render_info.display_width as f64, render_info.display_height as f64),
                },
            ),
            false => (*transforms.global(), image.info.bounding_box()),
        };

        debug!("background fill. exposure: {:?}, area: {:?}", exposure, area);

        surface.set_transform(&transform);
        let paint = painter.apply(surface, exposure);
        surface.fill_path(&area.to_path(), paint.color);
        surface.set_transform(transforms.global());
    }

    fn enter_layer(
        &self,
        surface: &mut dyn Surface,
        painter: &mut PainterState,
        transforms: &mut TransformStack,
        layer: &Layer,
        global_invert: bool,
    ) {
        transforms.set_layer(layer);
        painter.set_inverted((layer.polarity == Polarity::Clear) ^ global_invert);

        if let Some(knockout) = layer
            .knockout
            .as_ref()
            .filter(|knockout| knockout.first_instance)
        {
            let exposure = match knockout.polarity {
                Polarity::Dark => Exposure::Dark,
                Polarity::Clear => Exposure::Clear,
            };
            let area: ShapePath = knockout.bounding_box().to_path();
            debug!("knockout. exposure: {:?}, area: {:?}", exposure, knockout.bounding_box());

            surface.set_transform(&transforms.layer_transform());
            let paint = painter.apply(surface, exposure);
            surface.fill_path(&area, paint.color);
        }

        painter.apply(surface, Exposure::Dark);
        surface.set_transform(&transforms.net_transform());
    }
}
