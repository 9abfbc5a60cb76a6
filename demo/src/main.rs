use std::path::PathBuf;

use gerber_raster::backend::PixmapSurface;
use gerber_raster::testing::{star_outline_primitive, ImageBuilder};
use gerber_raster::{
    Aperture, CircleSegment, GerberRenderer, Image, ImageInfo, Knockout, Layer, MacroPrimitive, MirrorState, NetState, Polarity,
    Position, RenderConfiguration, RenderInfo, StepAndRepeat, SurfaceError, UserTransform, Winding,
};
use log::{error, info};

const OUTPUT: &str = "demo.png";

// pixels per image unit
const SCALE: f64 = 20.0;
const MARGIN: f64 = 2.0;

const ROTATION_DEGREES: f64 = 0.0;
const MIRRORING: [bool; 2] = [false, false];
const INVERTED: bool = false;

/// A small board: pads and traces, a ground pour with a clear keep-out, a thermal macro and a panel of
/// repeated fiducials.
fn demo_image() -> Image {
    ImageBuilder::new()
        .info(ImageInfo {
            min: Position::new(0.0, 0.0),
            max: Position::new(30.0, 20.0),
            ..ImageInfo::default()
        })
        .aperture(10, Aperture::circle(0.5))
        .aperture(11, Aperture::rectangle(2.0, 1.2))
        .aperture(12, Aperture::oval(1.0, 2.0).with_hole(0.4))
        .aperture(13, Aperture::polygon(2.0, 8, 22.5).with_hole(0.8))
        .aperture(
            14,
            Aperture::macro_aperture(vec![
                // thermal relief
                MacroPrimitive::new(7, vec![0.0, 0.0, 3.0, 2.0, 0.4, 45.0]),
                MacroPrimitive::new(1, vec![1.0, 1.0, 0.0, 0.0]),
            ]),
        )
        .aperture(15, Aperture::macro_aperture(vec![star_outline_primitive(2.5, 1.0, 0.0)]))
        .aperture(16, Aperture::circle(1.0))
        // pour
        .region(&[(1.0, 1.0), (14.0, 1.0), (14.0, 9.0), (8.0, 9.0), (1.0, 4.0)])
        // traces
        .flash(11, (18.0, 4.0))
        .line(10, (18.0, 4.0), (24.0, 4.0))
        .line(10, (24.0, 4.0), (26.0, 6.0))
        .flash(11, (26.0, 6.0))
        .arc(
            10,
            (18.0, 12.0),
            (22.0, 12.0),
            CircleSegment {
                center: Position::new(20.0, 12.0),
                width: 4.0,
                height: 4.0,
                angle1: 180.0,
                angle2: 360.0,
            },
            Winding::Clockwise,
        )
        .flash(12, (18.0, 12.0))
        .flash(12, (22.0, 12.0))
        .flash(13, (5.0, 15.0))
        .flash(14, (10.0, 15.0))
        .flash(15, (26.0, 16.0))
        // keep-out cut from the pour
        .layer(Layer {
            polarity: Polarity::Clear,
            ..Layer::default()
        })
        .flash(16, (7.0, 3.0))
        .line(16, (3.0, 2.5), (12.0, 2.5))
        // fiducial panel, mirrored, on a cleared patch
        .layer(Layer {
            step_and_repeat: StepAndRepeat {
                x: 3,
                y: 2,
                distance_x: 1.5,
                distance_y: 1.5,
            },
            knockout: Some(Knockout {
                first_instance: true,
                polarity: Polarity::Clear,
                lower_left: Position::new(13.0, 17.0),
                width: 4.0,
                height: 2.5,
                border: 0.2,
            }),
            ..Layer::default()
        })
        .state(NetState {
            mirror: MirrorState::FlipA,
            ..NetState::default()
        })
        .flash(10, (-16.5, 17.5))
        .build()
}

fn render(path: PathBuf) -> Result<(), SurfaceError> {
    let image = demo_image();
    let bounds = image.info.bounding_box();

    let render_info = RenderInfo {
        scale_factor_x: SCALE,
        scale_factor_y: SCALE,
        lower_left_x: bounds.min.x - MARGIN,
        lower_left_y: bounds.min.y - MARGIN,
        display_width: ((bounds.width() + 2.0 * MARGIN) * SCALE) as u32,
        display_height: ((bounds.height() + 2.0 * MARGIN) * SCALE) as u32,
    };
    let user = UserTransform {
        rotation: ROTATION_DEGREES,
        mirror_around_x: MIRRORING[0],
        mirror_around_y: MIRRORING[1],
        inverted: INVERTED,
        ..UserTransform::default()
    };

    let mut surface = PixmapSurface::new(render_info.display_width, render_info.display_height)?;
    let renderer = GerberRenderer::new(RenderConfiguration {
        fill_before_draw: true,
        ..RenderConfiguration::default()
    });

    let summary = renderer.render(&mut surface, &image, &user, &render_info);
    for diagnostic in &summary.diagnostics {
        error!("net {:?}: {}", diagnostic.net_index, diagnostic.error);
    }
    info!(
        "nets rendered: {}, skipped: {}",
        summary.nets_rendered, summary.nets_skipped
    );

    surface.save_png(&path)?;
    info!("saved {}", path.display());

    Ok(())
}

fn main() {
    init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(OUTPUT));

    if let Err(error) = render(path) {
        error!("{}", error);
        std::process::exit(1);
    }
}

pub fn init() {
    env_logger::init(); // Log to stderr (optional).

    #[cfg(feature = "profile-with-puffin")]
    {
        start_puffin_server();
    }
}

#[cfg(feature = "profile-with-puffin")]
fn start_puffin_server() {
    use tracing::{error, info};

    profiling::puffin::set_scopes_on(true); // tell puffin to collect data

    match puffin_http::Server::new("127.0.0.1:8585") {
        Ok(puffin_server) => {
            info!("Run:  cargo install puffin_viewer && puffin_viewer --url 127.0.0.1:8585");

            std::process::Command::new("puffin_viewer")
                .arg("--url")
                .arg("127.0.0.1:8585")
                .spawn()
                .ok();

            #[allow(clippy::mem_forget)]
            std::mem::forget(puffin_server);
        }
        Err(err) => {
            error!("Failed to start puffin server: {err}");
        }
    };
}
