use flock_core::{
    overlaps, CollisionPolicy, Entity, Pilot, Simulation, SimulationConfig, SteeringBehavior,
    TargetPolicy, Vector2,
};

fn body(x: f32, y: f32, radius: f32, max_speed: f32) -> Entity {
    Entity::new(Vector2::new(x, y), radius, max_speed).unwrap()
}

fn pilot(behavior: SteeringBehavior, max_force: f32, slowing: f32, target: TargetPolicy) -> Pilot {
    Pilot::new(vec![behavior], max_force, slowing)
        .unwrap()
        .with_target(target)
}

#[test]
fn seek_approaches_fixed_target_at_max_speed() {
    let mut sim = Simulation::new(0);
    let id = sim.spawn(
        body(0.0, 0.0, 1.0, 5.0),
        Some(pilot(
            SteeringBehavior::seek(),
            10.0,
            0.0,
            TargetPolicy::Point(Vector2::new(10.0, 0.0)),
        )),
    );
    sim.start();

    let mut previous_x = 0.0;
    let mut previous_speed = 0.0;
    let mut ticks = 0;
    while sim.entity(id).unwrap().position().x < 9.0 {
        sim.tick(0.1);
        ticks += 1;
        assert!(ticks < 100, "never got close to the target");

        let e = sim.entity(id).unwrap();
        assert!(e.position().x > previous_x);
        assert!(e.speed() > previous_speed);
        assert!(e.speed() <= 5.0 + 1e-4);
        assert!(e.position().y.abs() < 1e-6);
        previous_x = e.position().x;
        previous_speed = e.speed();
    }

    assert!(previous_speed > 4.5);

    // Pure seek has no braking, so it overshoots and then keeps circling
    // back through the target along the x axis.
    let mut max_x = 0.0_f32;
    for _ in 0..300 {
        sim.tick(0.1);
        let e = sim.entity(id).unwrap();
        assert!((e.position().x - 10.0).abs() < 2.5);
        assert!(e.position().y.abs() < 1e-6);
        assert!(e.speed() <= 5.0 + 1e-4);
        max_x = max_x.max(e.position().x);
    }
    assert!(max_x > 10.0);
}

#[test]
fn arrival_settles_on_target() {
    let mut sim = Simulation::new(0);
    let id = sim.spawn(
        body(0.0, 0.0, 1.0, 5.0),
        Some(pilot(
            SteeringBehavior::arrive(),
            10.0,
            5.0,
            TargetPolicy::Point(Vector2::new(10.0, 0.0)),
        )),
    );
    sim.start();

    for _ in 0..300 {
        sim.tick(0.1);
    }

    let e = sim.entity(id).unwrap();
    assert!(e.position().distance(&Vector2::new(10.0, 0.0)) < 1.0);
    assert!(e.speed() < 1.0);
}

#[test]
fn contact_starts_strictly_below_radius_sum() {
    let mut sim = Simulation::new(0).with_collision_policy(CollisionPolicy::Report);
    let a = sim.spawn(body(0.0, 0.0, 5.0, 5.0).with_velocity(Vector2::new(5.0, 0.0)), None);
    let b = sim.spawn(body(20.0, 0.0, 5.0, 5.0).with_velocity(Vector2::new(-5.0, 0.0)), None);
    sim.start();

    // center distances after each tick: 15, 10, 5
    let expected = [(15.0, false), (10.0, false), (5.0, true)];
    for (distance, touching) in expected {
        let report = sim.tick(0.5);
        let (ea, eb) = (sim.entity(a).unwrap(), sim.entity(b).unwrap());

        assert_eq!(ea.position().distance(&eb.position()), distance);
        assert_eq!(overlaps(ea, eb), touching);
        assert_eq!(overlaps(eb, ea), touching);
        assert_eq!(report.contacts.len(), usize::from(touching));
    }
}

#[test]
fn head_on_collision_removes_both_under_remove_policy() {
    let mut sim = Simulation::new(0).with_collision_policy(CollisionPolicy::Remove);
    sim.spawn(body(0.0, 0.0, 5.0, 5.0).with_velocity(Vector2::new(5.0, 0.0)), None);
    sim.spawn(body(20.0, 0.0, 5.0, 5.0).with_velocity(Vector2::new(-5.0, 0.0)), None);
    let bystander = sim.spawn(body(0.0, 100.0, 5.0, 5.0), None);
    sim.start();

    let mut removed = Vec::new();
    for _ in 0..5 {
        removed.extend(sim.tick(0.5).removed);
    }

    assert_eq!(removed.len(), 2);
    assert_eq!(sim.len(), 1);
    assert_eq!(sim.entities()[0].id(), bystander);
}

fn mutual_seekers(a_first: bool) -> (Entity, Entity) {
    let a = body(0.0, 0.0, 1.0, 5.0).with_velocity(Vector2::new(0.0, 5.0));
    let b = body(10.0, 0.0, 1.0, 5.0);
    let seeker = || {
        Some(pilot(
            SteeringBehavior::seek(),
            100.0,
            0.0,
            TargetPolicy::Nearest,
        ))
    };

    let mut sim = Simulation::new(0);
    let (ia, ib) = if a_first {
        let ia = sim.spawn(a, seeker());
        let ib = sim.spawn(b, seeker());
        (ia, ib)
    } else {
        let ib = sim.spawn(b, seeker());
        let ia = sim.spawn(a, seeker());
        (ia, ib)
    };
    sim.step();
    sim.tick(0.5);

    (sim.entity(ia).unwrap().clone(), sim.entity(ib).unwrap().clone())
}

#[test]
fn steering_sees_pre_tick_positions() {
    let (a, b) = mutual_seekers(true);

    // A steers towards B's start (10, 0): desired (5, 0), force (5, -5).
    assert!((a.acceleration().x - 5.0).abs() < 1e-5);
    assert!((a.acceleration().y + 5.0).abs() < 1e-5);
    assert!((a.position().x - 1.25).abs() < 1e-5);
    assert!((a.position().y - 1.25).abs() < 1e-5);

    // B steers towards A's start (0, 0), not A's new position (1.25, 1.25),
    // so it stays on the x axis.
    assert!((b.acceleration().x + 5.0).abs() < 1e-5);
    assert_eq!(b.acceleration().y, 0.0);
    assert!((b.position().x - 8.75).abs() < 1e-5);
    assert_eq!(b.position().y, 0.0);
}

#[test]
fn spawn_order_does_not_change_the_outcome() {
    let (a1, b1) = mutual_seekers(true);
    let (a2, b2) = mutual_seekers(false);

    assert_eq!(a1.position(), a2.position());
    assert_eq!(a1.velocity(), a2.velocity());
    assert_eq!(b1.position(), b2.position());
    assert_eq!(b1.velocity(), b2.velocity());
}

fn trajectory(config: &SimulationConfig, ticks: usize) -> Vec<(u32, u32, u32, u32)> {
    let mut sim = Simulation::from_config(config).unwrap();
    sim.start();

    let mut samples = Vec::new();
    for _ in 0..ticks {
        sim.tick(1.0 / 30.0);
        for e in sim.entities() {
            samples.push((
                e.position().x.to_bits(),
                e.position().y.to_bits(),
                e.velocity().x.to_bits(),
                e.velocity().y.to_bits(),
            ));
        }
    }
    samples
}

#[test]
fn same_seed_same_trajectories() {
    let config = SimulationConfig {
        seed: 42,
        ..SimulationConfig::default()
    };
    assert_eq!(trajectory(&config, 200), trajectory(&config, 200));
}

#[test]
fn different_seed_different_trajectories() {
    let a = SimulationConfig {
        seed: 1,
        ..SimulationConfig::default()
    };
    let b = SimulationConfig {
        seed: 2,
        ..SimulationConfig::default()
    };
    assert_ne!(trajectory(&a, 10), trajectory(&b, 10));
}

#[test]
fn speed_cap_holds_for_a_whole_population() {
    let mut sim = Simulation::from_config(&SimulationConfig::default()).unwrap();
    sim.start();

    for _ in 0..300 {
        sim.tick(1.0 / 30.0);
        for e in sim.entities() {
            assert!(e.speed() <= e.max_speed() + 1e-3);
            assert!(e.position().is_finite());
        }
    }
}

#[test]
fn avoidance_reacts_to_a_neighbor_ahead() {
    let mut sim = Simulation::new(0);
    let avoider = || {
        Pilot::new(vec![SteeringBehavior::avoid(20.0, 5.0).unwrap()], 10.0, 0.0).unwrap()
    };
    let id = sim.spawn(
        body(0.0, 0.0, 1.0, 5.0).with_velocity(Vector2::new(5.0, 0.0)),
        Some(avoider()),
    );
    sim.start();

    // Alone, the actor's own body is never treated as an obstacle.
    sim.tick(0.1);
    assert_eq!(sim.entity(id).unwrap().acceleration(), Vector2::ZERO);

    sim.spawn(body(8.0, 1.0, 1.0, 0.0), None);
    sim.tick(0.1);
    let e = sim.entity(id).unwrap();
    assert!(e.acceleration().y < 0.0);
    assert!(e.velocity().y < 0.0);

    for _ in 0..10 {
        sim.tick(0.1);
    }
    assert!(sim.entity(id).unwrap().position().y < 0.0);
}
