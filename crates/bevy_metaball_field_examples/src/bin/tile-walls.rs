use bevy::prelude::*;
use bevy_metaball_field::prelude::*;

#[derive(Resource, Default)]
struct LevelHandle(Handle<TileGridAsset>);

#[derive(Component)]
struct Player;

fn main() {
    App::new()
        .init_resource::<LevelHandle>()
        .add_plugins(DefaultPlugins)
        .add_plugins(MetaballFieldPlugin::new(FieldConfig::new(UVec2::new(640, 352))))
        .add_systems(Startup, setup)
        .add_systems(Update, (activate_level, move_player, toggle_walls))
        .run();
}

fn setup(mut commands: Commands, mut handle: ResMut<LevelHandle>, assets: Res<AssetServer>) {
    commands.spawn(Camera2d);
    commands.trigger(InitializeField);
    handle.0 = assets.load("level.tiles");

    let player = commands.spawn((Player, Transform::default())).id();
    commands.trigger(AddMetaball::new(player).with_strength(900.0).with_color(7));
}

/// Makes the level the active tile grid once loaded and turns its walls into metaballs.
fn activate_level(
    mut commands: Commands,
    mut done: Local<bool>,
    handle: Res<LevelHandle>,
    levels: Res<Assets<TileGridAsset>>,
    mut active: ResMut<ActiveTileGrid>,
) {
    if *done {
        return;
    }
    let Some(level) = levels.get(&handle.0) else {
        return;
    };

    match level.to_wall_grid() {
        Ok(grid) => {
            info!("Level loaded with {} wall tiles", grid.wall_count());
            active.set(grid);
            commands.trigger(AddWallMetaballs::new(80.0, 8));
        }
        Err(err) => error!("Level is not a valid tile grid: {}", err),
    }
    *done = true;
}

/// Arrow keys move the player blob.
fn move_player(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mut player: Query<&mut Transform, With<Player>>,
) {
    let mut dir = Vec2::ZERO;
    if keys.pressed(KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if keys.pressed(KeyCode::ArrowRight) {
        dir.x += 1.0;
    }
    if keys.pressed(KeyCode::ArrowUp) {
        dir.y += 1.0;
    }
    if keys.pressed(KeyCode::ArrowDown) {
        dir.y -= 1.0;
    }
    for mut transform in player.iter_mut() {
        transform.translation += (dir * 160.0 * time.delta_secs()).extend(0.0);
    }
}

/// `C` clears the wall metaballs, `W` adds them back.
fn toggle_walls(mut commands: Commands, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::KeyC) {
        commands.trigger(ClearTileMetaballs);
    }
    if keys.just_pressed(KeyCode::KeyW) {
        commands.trigger(AddWallMetaballs::new(80.0, 8));
    }
}
