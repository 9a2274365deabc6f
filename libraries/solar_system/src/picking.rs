use crate::body::CelestialBody;
use crate::camera::{CameraView, Viewport};
use bevy::math::bounding::RayCast3d;
use bevy::prelude::*;

/// Converts a pointer position in pixels (origin top-left) to normalized device coordinates.
pub fn pointer_to_ndc(pointer: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(
        pointer.x / viewport.width * 2.0 - 1.0,
        -(pointer.y / viewport.height) * 2.0 + 1.0,
    )
}

/// Finds the body under the pointer.
///
/// Casts a ray from the camera through the pointer and tests it against each candidate's
/// bounding sphere. When several spheres are hit, the one hit closest to the camera wins.
pub fn pick<'a>(
    pointer: Vec2,
    viewport: Viewport,
    camera: &CameraView,
    candidates: impl IntoIterator<Item = &'a CelestialBody>,
) -> Option<&'a CelestialBody> {
    if viewport.is_degenerate() {
        return None;
    }
    let ray = camera.ray_through_ndc(pointer_to_ndc(pointer, viewport))?;
    let cast = RayCast3d::from_ray(ray, f32::MAX);
    candidates
        .into_iter()
        .filter_map(|body| {
            cast.sphere_intersection_at(&body.bounding_sphere())
                .map(|distance| (distance, body))
        })
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, body)| body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{create_body, CelestialBody};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const VIEWPORT: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    fn camera() -> CameraView {
        CameraView::looking_at(
            Vec3::new(0.0, 0.0, 50.0),
            Vec3::ZERO,
            75f32.to_radians(),
            VIEWPORT,
            0.1,
            1000.0,
        )
    }

    fn body_at(name: &str, radius: f32, position: Vec3) -> CelestialBody {
        let mut rng = StdRng::seed_from_u64(0);
        let mut body = create_body(radius, "", position.length(), name, &mut rng);
        body.position = position;
        body
    }

    #[test]
    fn pointer_corners_map_to_ndc_corners() {
        assert_eq!(pointer_to_ndc(Vec2::ZERO, VIEWPORT), Vec2::new(-1.0, 1.0));
        assert_eq!(
            pointer_to_ndc(Vec2::new(800.0, 600.0), VIEWPORT),
            Vec2::new(1.0, -1.0)
        );
        assert_eq!(pointer_to_ndc(Vec2::new(400.0, 300.0), VIEWPORT), Vec2::ZERO);
    }

    #[test]
    fn picks_body_under_pointer() {
        let camera = camera();
        let mars = body_at("Mars", 0.4, Vec3::new(8.0, 0.0, 0.0));
        let bodies = [mars];
        let ndc = camera.world_to_ndc(bodies[0].position).unwrap();
        let pointer = Vec2::new(
            (ndc.x * 0.5 + 0.5) * VIEWPORT.width,
            (-(ndc.y * 0.5) + 0.5) * VIEWPORT.height,
        );
        let picked = pick(pointer, VIEWPORT, &camera, &bodies).map(|b| b.name.as_str());
        assert_eq!(picked, Some("Mars"));
    }

    #[test]
    fn empty_space_picks_nothing() {
        let bodies = [body_at("Mars", 0.4, Vec3::new(8.0, 0.0, 0.0))];
        assert!(pick(Vec2::new(5.0, 5.0), VIEWPORT, &camera(), &bodies).is_none());
    }

    #[test]
    fn nearest_body_wins_regardless_of_order() {
        let far = body_at("Jupiter", 0.9, Vec3::new(0.0, 0.0, -20.0));
        let near = body_at("Earth", 0.5, Vec3::new(0.0, 0.0, 10.0));
        let center = Vec2::new(400.0, 300.0);
        let bodies = [far, near];
        let picked = pick(center, VIEWPORT, &camera(), &bodies).map(|b| b.name.as_str());
        assert_eq!(picked, Some("Earth"));
    }

    #[test]
    fn degenerate_viewport_picks_nothing() {
        let bodies = [body_at("Earth", 0.5, Vec3::ZERO)];
        let viewport = Viewport::new(0.0, 600.0);
        assert!(pick(Vec2::ZERO, viewport, &camera(), &bodies).is_none());
    }
}
