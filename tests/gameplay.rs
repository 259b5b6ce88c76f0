//! End-to-end gameplay through the public API: menu intents, shots, physics,
//! scoring and the scene bridge driven together.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};

use mini_golf::consts::SIM_DT;
use mini_golf::scene::{
    LoadError, LoadTicket, ModelHandle, ModelLoader, ObjectId, Placement, PresentationBridge,
    Scene, SceneObject, SceneRenderer,
};
use mini_golf::sim::{
    Autoplayer, Camera, CourseBook, GameEvent, GameMode, GameSession, Intent, MenuAction,
    ShotInput, ShotRelease, TickInput, tick,
};
use mini_golf::{InputTuning, PhysicsTuning};

/// Two boxed one-metre putts
const SHORT_COURSES: &str = r#"{
  "courses": [
    {
      "index": 1, "name": "Tap In", "par": 2,
      "start": [0.0, 0.0, 1.0],
      "hole": { "center": [0.0, 0.0, 0.0], "radius": 0.3, "depth": 0.5 },
      "walls": [
        { "kind": "box", "center": [-1.2, 0.25, 0.5], "half_extents": [0.2, 0.25, 2.4] },
        { "kind": "box", "center": [1.2, 0.25, 0.5], "half_extents": [0.2, 0.25, 2.4] },
        { "kind": "box", "center": [0.0, 0.25, 2.7], "half_extents": [1.4, 0.25, 0.2] },
        { "kind": "box", "center": [0.0, 0.25, -1.7], "half_extents": [1.4, 0.25, 0.2] }
      ],
      "decorations": [ { "model": "flag.glb", "position": [0.0, 0.0, 0.0] } ]
    },
    {
      "index": 2, "name": "Tap In Again", "par": 3,
      "start": [0.0, 0.0, 1.0],
      "hole": { "center": [0.0, 0.0, 0.0], "radius": 0.3, "depth": 0.5 },
      "walls": [
        { "kind": "box", "center": [-1.2, 0.25, 0.5], "half_extents": [0.2, 0.25, 2.4] },
        { "kind": "box", "center": [1.2, 0.25, 0.5], "half_extents": [0.2, 0.25, 2.4] },
        { "kind": "box", "center": [0.0, 0.25, 2.7], "half_extents": [1.4, 0.25, 0.2] },
        { "kind": "box", "center": [0.0, 0.25, -1.7], "half_extents": [1.4, 0.25, 0.2] }
      ]
    }
  ]
}"#;

fn short_session() -> GameSession {
    GameSession::new(
        CourseBook::from_json(SHORT_COURSES).unwrap(),
        PhysicsTuning::default(),
    )
}

fn send(session: &mut GameSession, intent: Intent) {
    let mut input = TickInput::default();
    input.push(intent);
    tick(session, &input, SIM_DT);
}

/// Tick until the ball stops, the course ends, or `max` ticks pass
fn settle(session: &mut GameSession, max: u32) {
    let idle = TickInput::default();
    for _ in 0..max {
        if session.mode != GameMode::Playing || session.ball.is_at_rest() {
            break;
        }
        tick(session, &idle, SIM_DT);
    }
}

fn sink_with_one_putt(session: &mut GameSession) {
    let mut bot = Autoplayer::new(1);
    bot.jitter = 0.0;
    let shot = bot.choose_shot(session).unwrap();
    send(session, Intent::Shot(shot));
    settle(session, 2000);
    assert_eq!(session.mode, GameMode::WaitingForContinue);
}

#[derive(Default)]
struct Recorder {
    objects: BTreeMap<ObjectId, SceneObject>,
    draws: u32,
}

impl SceneRenderer for Recorder {
    fn attach(&mut self, id: ObjectId, object: &SceneObject, _placement: Placement) {
        assert!(self.objects.insert(id, object.clone()).is_none(), "double attach {:?}", id);
    }

    fn detach(&mut self, id: ObjectId) {
        assert!(self.objects.remove(&id).is_some(), "detach of unknown {:?}", id);
    }

    fn place(&mut self, id: ObjectId, _placement: Placement) {
        assert!(self.objects.contains_key(&id), "place of unknown {:?}", id);
    }

    fn set_camera(&mut self, _camera: &Camera) {}

    fn draw(&mut self) {
        self.draws += 1;
    }
}

/// Completes every request on the next poll
#[derive(Default)]
struct InstantLoader {
    pending: Vec<LoadTicket>,
    next: u32,
}

impl ModelLoader for InstantLoader {
    fn request(&mut self, _asset: &str, ticket: LoadTicket) {
        self.pending.push(ticket);
    }

    fn drain_completed(&mut self) -> Vec<(LoadTicket, Result<ModelHandle, LoadError>)> {
        self.pending
            .drain(..)
            .map(|ticket| {
                self.next += 1;
                (ticket, Ok(ModelHandle(self.next)))
            })
            .collect()
    }
}

#[test]
fn test_straight_course_putt() {
    let mut session = GameSession::with_builtin_courses().unwrap();
    send(&mut session, Intent::Menu(MenuAction::Play));
    assert_eq!(session.mode, GameMode::Playing);
    let start = session.ball.pos;

    send(
        &mut session,
        Intent::Shot(ShotRelease {
            direction: Vec3::NEG_Z,
            power: 0.6,
        }),
    );
    assert_eq!(session.strokes, 1);
    settle(&mut session, 5000);

    match session.mode {
        GameMode::WaitingForContinue => {
            assert_eq!(session.total_score, 1);
            assert_eq!(session.last_result.as_ref().unwrap().label, "Hole-in-One!");
        }
        GameMode::Playing => {
            assert!(session.ball.is_at_rest());
            assert_eq!(session.ball.vel, Vec3::ZERO);
            assert!(session.ball.pos.z < start.z);
            assert!(session.ball.pos.x.abs() < 2.0 && session.ball.pos.z.abs() < 10.0);
            assert_eq!(session.ball.pos.y, 0.0);
        }
        other => panic!("unexpected mode {:?}", other),
    }
}

#[test]
fn test_input_is_gated_by_mode() {
    let mut session = short_session();
    let start = session.ball.pos;
    let shot = ShotRelease {
        direction: Vec3::NEG_Z,
        power: 0.5,
    };

    // Title ignores shots and the continue key
    send(&mut session, Intent::Shot(shot));
    send(&mut session, Intent::Menu(MenuAction::Continue));
    assert_eq!(session.mode, GameMode::Title);
    assert_eq!(session.strokes, 0);
    assert_eq!(session.ball.pos, start);

    // Locked courses cannot be picked
    send(&mut session, Intent::Menu(MenuAction::OpenLevelSelect));
    send(&mut session, Intent::Menu(MenuAction::SelectCourse(2)));
    assert_eq!(session.mode, GameMode::LevelSelect);
    send(&mut session, Intent::Menu(MenuAction::SelectCourse(1)));
    assert_eq!(session.mode, GameMode::Playing);

    // Pointer gestures do nothing once the course is over
    sink_with_one_putt(&mut session);
    let camera = Camera::new(start + Vec3::new(0.0, 2.0, 3.0), start, Vec2::new(800.0, 600.0));
    let mut input = ShotInput::new(InputTuning::default());
    assert!(!input.pointer_down(&session, &camera, Vec2::new(400.0, 300.0)));
    send(&mut session, Intent::Shot(shot));
    assert_eq!(session.strokes, 1);
}

#[test]
fn test_full_run_ends_in_game_over() {
    let mut session = short_session();
    let mut bot = Autoplayer::new(9);
    bot.jitter = 0.0;

    let results = bot.play_run(&mut session);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].label, "Hole-in-One!");
    assert!(!results[0].final_course);
    assert!(results[1].final_course);
    assert_eq!(results[1].total_score, 2);

    // Final continue goes back to the title with everything unlocked
    assert_eq!(session.mode, GameMode::Title);
    assert!(session.is_unlocked(2));
}

#[test]
fn test_continue_swaps_scene_and_keeps_total() {
    let mut session = short_session();
    let mut scene = Scene::new(Recorder::default());
    let mut bridge = PresentationBridge::new();
    let mut loader = InstantLoader::default();
    let shot = ShotInput::new(InputTuning::default());
    let camera = Camera::new(Vec3::new(0.0, 2.0, 4.0), Vec3::ZERO, Vec2::new(800.0, 600.0));

    send(&mut session, Intent::Menu(MenuAction::Play));
    bridge.sync(&mut scene, &session, &shot, &camera, &mut loader);
    bridge.sync(&mut scene, &session, &shot, &camera, &mut loader);
    let first: Vec<ObjectId> = bridge.course_objects().to_vec();
    assert!(
        scene
            .renderer()
            .objects
            .values()
            .any(|o| matches!(o, SceneObject::Model { .. }))
    );

    sink_with_one_putt(&mut session);
    let events = session.drain_events();
    assert!(events.iter().any(|e| matches!(e, GameEvent::HoleSunk(_))));

    send(&mut session, Intent::Menu(MenuAction::Continue));
    assert_eq!(session.mode, GameMode::Playing);
    assert_eq!(session.course_index, 2);
    assert_eq!(session.strokes, 0);
    assert_eq!(session.total_score, 1);

    bridge.sync(&mut scene, &session, &shot, &camera, &mut loader);
    for id in &first {
        assert!(!scene.is_attached(*id));
    }
    let walls = scene
        .renderer()
        .objects
        .values()
        .filter(|o| matches!(o, SceneObject::BoxWall { .. }))
        .count();
    assert_eq!(walls, 4);
    assert!(scene.is_attached(bridge.ball_id()));
    assert_eq!(scene.renderer().draws, 3);
}
