//! Property-based invariant tests for the effect cores.
//!
//! 1. Stored hues, angles and depths stay in range for any frame count.
//! 2. Every bounce strictly loses speed; the ball stays inside the box.
//! 3. Stars that leave the right edge re-enter inside the viewport.
//! 4. Rotating by θ then 2π − θ is the identity.
//! 5. Corners at or behind the eye never produce edges.
//! 6. Rendering never emits non-finite geometry, whatever the viewport.

use std::f64::consts::TAU;

use dfx_core::geometry::Viewport;
use dfx_core::rng::Lcg64;
use dfx_fx::effects::boing::{Ball, Contact, step_vertical};
use dfx_fx::effects::cube::{CUBE_EDGES, project_cube};
use dfx_fx::effects::{
    BoingFx, CopperFx, CopperParams, CubeFx, CubeParams, ScrollerFx, StarfieldFx,
    StarfieldParams, TunnelFx, TunnelParams,
};
use dfx_fx::math3d::{Rotation, Vec3};
use dfx_fx::{Effect, FxContext};
use dfx_render::draw::DrawList;
use proptest::prelude::*;

fn ctx(w: u32, h: u32, frame: u64) -> FxContext {
    FxContext::at_frame(Viewport::new(w, h), frame, 60.0)
}

proptest! {
    #[test]
    fn copper_hues_stay_wrapped(
        hue in -720.0f64..720.0,
        increment in -40.0f64..40.0,
        frames in 0u64..600,
    ) {
        let params = CopperParams { hue, hue_increment: increment, ..CopperParams::default() };
        let mut fx = CopperFx::try_new(params).unwrap();
        for f in 0..frames {
            fx.update(&ctx(64, 48, f));
        }
        for bar in fx.bars() {
            prop_assert!((0.0..360.0).contains(&bar.hue), "hue {}", bar.hue);
        }
    }

    #[test]
    fn tunnel_state_stays_wrapped(
        speed in 0.0f64..1.5,
        rotation_speed in -3.0f64..3.0,
        frames in 0u64..600,
    ) {
        let params = TunnelParams { speed, rotation_speed, ..TunnelParams::default() };
        let mut fx = TunnelFx::try_new(params).unwrap();
        for f in 0..frames {
            fx.update(&ctx(64, 48, f));
        }
        for ring in fx.rings() {
            prop_assert!(ring.z > 0.0 && ring.z <= 1.0, "z {}", ring.z);
            prop_assert!((0.0..TAU).contains(&ring.angle), "angle {}", ring.angle);
        }
    }

    #[test]
    fn cube_angles_stay_wrapped(
        sx in -20.0f64..20.0,
        sy in -20.0f64..20.0,
        sz in -20.0f64..20.0,
        frames in 0u64..600,
    ) {
        let params = CubeParams { speed: Vec3::new(sx, sy, sz), ..CubeParams::default() };
        let mut fx = CubeFx::try_new(params).unwrap();
        for f in 0..frames {
            fx.update(&ctx(64, 48, f));
        }
        for cube in fx.cubes() {
            prop_assert!(cube.rotation.is_wrapped(), "{:?}", cube.rotation);
        }
    }

    #[test]
    fn ball_angle_stays_wrapped(frames in 0u64..600) {
        let mut fx = BoingFx::new();
        for f in 0..frames {
            fx.update(&ctx(320, 200, f));
        }
        prop_assert!((0.0..360.0).contains(&fx.ball().angle));
    }

    #[test]
    fn bounces_lose_speed_and_ball_stays_inside(
        radius in 1.0f64..50.0,
        extra in 1.0f64..600.0,
        start in 0.0f64..1.0,
        vy in -30.0f64..30.0,
        gravity in 0.01f64..2.0,
        damping in 0.05f64..0.99,
        frames in 1usize..400,
    ) {
        let height = 2.0 * radius + extra;
        let mut ball = Ball {
            y: radius + start * (height - 2.0 * radius),
            vy,
            radius,
            ..Ball::default()
        };
        for _ in 0..frames {
            let before = ball.vy + gravity;
            if let Some(contact) = step_vertical(&mut ball, gravity, damping, height) {
                prop_assert!(ball.vy.abs() < before.abs(), "{contact:?}: {before} -> {}", ball.vy);
                match contact {
                    Contact::Floor => prop_assert!(ball.vy <= 0.0),
                    Contact::Ceiling => prop_assert!(ball.vy >= 0.0),
                }
            }
            prop_assert!(ball.y >= radius && ball.y <= height - radius, "y {}", ball.y);
        }
    }

    #[test]
    fn stars_reenter_inside_viewport(
        seed in any::<u64>(),
        w in 8u32..400,
        h in 8u32..300,
        pushes in proptest::collection::vec(0.0f64..50.0, 1..16),
    ) {
        let params = StarfieldParams { density: 0.002, ..StarfieldParams::default() };
        let mut fx = StarfieldFx::with_rng(params, Lcg64::new(seed)).unwrap();
        fx.resize(Viewport::new(w, h));
        let width = f64::from(w);
        let outside: Vec<usize> = fx
            .stars_mut()
            .iter_mut()
            .zip(pushes.iter().cycle())
            .enumerate()
            .filter_map(|(i, (star, push))| {
                if i % 2 == 0 {
                    star.x = width + 0.001 + push;
                    Some(i)
                } else {
                    None
                }
            })
            .collect();
        fx.update(&ctx(w, h, 1));
        for (i, star) in fx.stars().iter().enumerate() {
            prop_assert!(star.x >= 0.0 && star.x <= width, "star {i} x {}", star.x);
            prop_assert!(star.y >= 0.0 && star.y <= f64::from(h), "star {i} y {}", star.y);
        }
        for i in outside {
            prop_assert_eq!(fx.stars()[i].x, 0.0);
        }
    }

    #[test]
    fn rotation_then_complement_is_identity(
        theta in 0.0f64..TAU,
        x in -10.0f64..10.0,
        y in -10.0f64..10.0,
        z in -10.0f64..10.0,
    ) {
        let v = Vec3::new(x, y, z);
        let eps = 1e-9;
        prop_assert!(v.rotate_x(theta).rotate_x(TAU - theta).approx_eq(v, eps));
        prop_assert!(v.rotate_y(theta).rotate_y(TAU - theta).approx_eq(v, eps));
        prop_assert!(v.rotate_z(theta).rotate_z(TAU - theta).approx_eq(v, eps));

        let mut r = Rotation::IDENTITY;
        r.advance(Vec3::new(theta, theta, theta), 1.0);
        r.advance(Vec3::new(TAU - theta, TAU - theta, TAU - theta), 1.0);
        prop_assert!(r.apply(v).approx_eq(v, eps), "{:?}", r);
    }

    #[test]
    fn culled_corners_never_draw_edges(
        ax in 0.0f64..TAU,
        ay in 0.0f64..TAU,
        az in 0.0f64..TAU,
        focal in 0.2f64..3.0,
    ) {
        let params = CubeParams { focal, ..CubeParams::single() };
        let mut fx = CubeFx::try_new(params).unwrap();
        let c = ctx(200, 200, 0);
        fx.update(&c);
        fx.cubes_mut()[0].rotation = Rotation::new(ax, ay, az);

        let cube = &fx.cubes()[0];
        let (points, depths) = project_cube(cube, focal, fx.global_scale(), fx.center());
        for (p, z) in points.iter().zip(depths) {
            prop_assert_eq!(p.is_some(), z + focal > 0.0);
        }
        let expected = CUBE_EDGES
            .iter()
            .filter(|&&(a, b)| points[a].is_some() && points[b].is_some())
            .count();

        let mut out = DrawList::new();
        fx.render(&c, &mut out);
        prop_assert_eq!(out.count_kind("line"), expected);
        prop_assert_eq!(out.rejected(), 0);
    }

    #[test]
    fn rendering_is_finite_for_any_viewport(w in 0u32..64, h in 0u32..64, frames in 1u64..30) {
        let effects: Vec<Box<dyn Effect>> = vec![
            Box::new(CubeFx::new()),
            Box::new(BoingFx::new()),
            Box::new(CopperFx::new()),
            Box::new(TunnelFx::new()),
            Box::new(ScrollerFx::new()),
            Box::new(StarfieldFx::new()),
        ];
        for mut fx in effects {
            let mut out = DrawList::new();
            for f in 0..frames {
                let c = ctx(w, h, f);
                fx.update(&c);
                out.clear();
                fx.render(&c, &mut out);
                prop_assert_eq!(out.rejected(), 0, "{} at {}x{}", fx.name(), w, h);
            }
        }
    }
}
