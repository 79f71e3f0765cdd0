use std::path::PathBuf;
use std::str::FromStr;

use glam::{Quat, Vec3};
use vantage::{
    gizmo::GizmoAxis,
    options::Options,
    scene::{Scene, SceneGraph, SceneObject},
    Viewer,
};

/// Command-line settings.
#[derive(Debug, Default)]
struct Args {
    view: Option<GizmoAxis>,
    options: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--view" => {
                let tag = args.next().ok_or("--view needs an axis tag")?;
                parsed.view = Some(GizmoAxis::from_str(&tag).map_err(|e| e.to_string())?);
            }
            "--options" => {
                let path = args.next().ok_or("--options needs a path")?;
                parsed.options = Some(PathBuf::from(path));
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(parsed)
}

/// A few boxes on a floor outline, tall enough to show off the helper view.
fn demo_scene() -> Scene {
    let mut scene = Scene::new();
    let _ = scene.add(
        SceneObject::cuboid("pillar", Vec3::new(2.0, 8.0, 2.0), [0.9, 0.9, 0.9])
            .with_translation(Vec3::new(0.0, 4.0, 0.0)),
    );
    let _ = scene.add(
        SceneObject::cuboid("crate", Vec3::splat(3.0), [0.95, 0.6, 0.2])
            .with_translation(Vec3::new(6.0, 1.5, -2.0))
            .with_rotation(Quat::from_rotation_y(0.4)),
    );
    let _ = scene.add(
        SceneObject::cuboid("slab", Vec3::new(4.0, 1.0, 6.0), [0.3, 0.7, 0.9])
            .with_translation(Vec3::new(-6.0, 0.5, 3.0)),
    );
    let half = 10.0;
    let _ = scene.add(SceneObject::polyline(
        "floor",
        vec![
            Vec3::new(-half, 0.0, -half),
            Vec3::new(half, 0.0, -half),
            Vec3::new(half, 0.0, half),
            Vec3::new(-half, 0.0, half),
            Vec3::new(-half, 0.0, -half),
        ],
        [0.5, 0.5, 0.5],
    ));
    scene
}

fn main() {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            log::error!(
                "usage: vantage [--view posX|posY|posZ|negX|negY|negZ] [--options <file.toml>]"
            );
            std::process::exit(1);
        }
    };

    let options = match args.options.as_deref().map(Options::load) {
        Some(Ok(options)) => options,
        Some(Err(e)) => {
            log::error!("{e}");
            std::process::exit(1);
        }
        None => Options::default(),
    };

    let mut builder = Viewer::builder()
        .with_scene(demo_scene())
        .with_options(options)
        .with_fit_on_start(true);
    if let Some(axis) = args.view {
        builder = builder.with_initial_view(axis);
    }

    if let Err(e) = builder.build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
