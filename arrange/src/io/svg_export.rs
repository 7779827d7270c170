use bednest::geometry::primitives::Point;
use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Path, Rectangle};

use crate::scene::Scene;

const BED_MARGIN: f64 = 5.0;

/// Renders one bed of the scene: the bed outline plus every instance (and
/// the wipe tower) assigned to it, in bed-local coordinates.
pub fn bed_to_svg(scene: &Scene, bed: usize) -> Document {
    let (width, depth) = (scene.bed.width, scene.bed.depth);

    //svg y points down, the scene y points up
    let flip = move |p: Point| (p.0, depth - p.1);

    let mut document = Document::new()
        .set(
            "viewBox",
            (
                -BED_MARGIN,
                -BED_MARGIN,
                width + 2.0 * BED_MARGIN,
                depth + 2.0 * BED_MARGIN,
            ),
        )
        .add(
            Rectangle::new()
                .set("x", 0.0)
                .set("y", 0.0)
                .set("width", width)
                .set("height", depth)
                .set("fill", "#fafafa")
                .set("stroke", "#333333")
                .set("stroke-width", 0.5),
        );

    for object in scene.objects.iter() {
        for instance in object.instances.iter() {
            if instance.bed != Some(bed) {
                continue;
            }
            let local = scene.bed.to_local(bed, instance.translation_point());
            let points: Vec<(f64, f64)> = object
                .outline
                .iter()
                .map(|&[x, y]| flip(Point(x, y).rotated(instance.rotation) + local))
                .collect();
            document = document.add(contour_path(&points, "#bdd7ee"));
        }
    }

    if let Some(wt) = &scene.wipe_tower {
        if wt.bed.unwrap_or(0) == bed {
            let local = scene.bed.to_local(bed, Point(wt.position[0], wt.position[1]));
            let points: Vec<(f64, f64)> = [
                Point(0.0, 0.0),
                Point(wt.width, 0.0),
                Point(wt.width, wt.depth),
                Point(0.0, wt.depth),
            ]
            .iter()
            .map(|&p| flip(p + local))
            .collect();
            document = document.add(contour_path(&points, "#f4cccc"));
        }
    }

    document
}

fn contour_path(points: &[(f64, f64)], fill: &str) -> Path {
    let mut data = Data::new();
    if let Some(&(x, y)) = points.first() {
        data = data.move_to((x, y));
        for &(x, y) in &points[1..] {
            data = data.line_to((x, y));
        }
        data = data.close();
    }
    Path::new()
        .set("fill", fill)
        .set("stroke", "#1f4e79")
        .set("stroke-width", 0.3)
        .set("d", data)
}
