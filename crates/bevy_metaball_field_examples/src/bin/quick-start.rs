use bevy::prelude::*;
use bevy_metaball_field::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng as RngCore, SeedableRng};

const FIELD_SIZE: UVec2 = UVec2::new(640, 360);

#[derive(Component)]
struct Velocity(Vec2);

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(MetaballFieldPlugin::new(
            FieldConfig::new(FIELD_SIZE).with_pixel_skip(4),
        ))
        .add_systems(Startup, setup)
        .add_systems(Update, (move_balls, pop_ball_on_space, log_frames))
        .run();
}

/// Spawns the camera, a handful of bouncing balls, and binds each ball as a metaball.
fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
    commands.trigger(InitializeField);

    let mut rng = StdRng::seed_from_u64(7);
    let half = FIELD_SIZE.as_vec2() * 0.5;
    for i in 0..8 {
        let position = Vec2::new(rand_signed(&mut rng), rand_signed(&mut rng)) * half * 0.8;
        let velocity = Vec2::new(rand_signed(&mut rng), rand_signed(&mut rng)) * 120.0;
        let ball = commands
            .spawn((
                Transform::from_translation(position.extend(0.0)),
                Velocity(velocity),
            ))
            .id();
        commands.trigger(
            AddMetaball::new(ball)
                .with_strength(400.0 + 100.0 * (i % 4) as f32)
                .with_color(2 + (i % 8) as u8),
        );
    }
}

/// Moves balls and bounces them off the field edges.
fn move_balls(time: Res<Time>, mut balls: Query<(&mut Transform, &mut Velocity)>) {
    let half = FIELD_SIZE.as_vec2() * 0.5;
    for (mut transform, mut velocity) in balls.iter_mut() {
        let mut p = transform.translation.truncate() + velocity.0 * time.delta_secs();
        if p.x.abs() > half.x {
            velocity.0.x = -velocity.0.x;
            p.x = p.x.clamp(-half.x, half.x);
        }
        if p.y.abs() > half.y {
            velocity.0.y = -velocity.0.y;
            p.y = p.y.clamp(-half.y, half.y);
        }
        transform.translation = p.extend(0.0);
    }
}

/// Unbinds and despawns one ball each time space is pressed.
fn pop_ball_on_space(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    balls: Query<Entity, With<Velocity>>,
) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }
    if let Some(ball) = balls.iter().next() {
        commands.trigger(RemoveMetaball { entity: ball });
        commands.entity(ball).despawn();
    }
}

fn log_frames(mut frames: MessageReader<FieldFrameMessage>) {
    for frame in frames.read() {
        if frame.stats.frame % 120 == 0 {
            info!(
                "frame {}: {} sources, {} colored samples",
                frame.stats.frame, frame.stats.sources, frame.stats.raster.colored_samples
            );
        }
    }
}

fn rand_signed(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / (u32::MAX as f32) * 2.0 - 1.0
}
