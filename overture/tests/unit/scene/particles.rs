use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn generates_exactly_80_particles_within_bounds() {
    let mut rng = StdRng::seed_from_u64(7);
    let vp = Viewport::new(400, 300);
    let field = ParticleField::generate(&vp, &mut rng);
    assert_eq!(field.len(), PARTICLE_COUNT);
    assert_eq!(field.generated_for(), (400, 300));
    for p in field.particles() {
        assert!((-400.0..400.0).contains(&p.x));
        assert!((-300.0..300.0).contains(&p.y));
        assert!((0.5..2.5).contains(&p.z));
        assert!((0.0..1.5).contains(&p.size));
    }
}

#[test]
fn same_seed_gives_same_field() {
    let vp = Viewport::new(64, 64);
    let a = ParticleField::generate(&vp, &mut StdRng::seed_from_u64(1));
    let b = ParticleField::generate(&vp, &mut StdRng::seed_from_u64(1));
    assert_eq!(a, b);
}

#[test]
fn projection_zooms_out_with_progress() {
    let p = Particle {
        x: 10.0,
        y: -20.0,
        z: 2.0,
        size: 1.0,
    };
    let c = Point::new(50.0, 50.0);
    assert_eq!(p.project(c, 0.0), Point::new(55.0, 40.0));
    let zoomed = p.project(c, 1.0);
    assert!((zoomed.x - 59.0).abs() < 1e-9);
    assert!((zoomed.y - 32.0).abs() < 1e-9);
}
