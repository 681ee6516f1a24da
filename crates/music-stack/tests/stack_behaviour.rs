use approx::assert_relative_eq;
use music_stack::backend::memory::MemoryAsset;
use music_stack::{
    BasicMusicStackElement, FadeState, MusicId, MusicRegistry, MusicStack, MusicStackError,
    MusicStackPriority, PriorityKey, Transition,
};
use std::sync::Arc;

fn asset(id: u64) -> Arc<MemoryAsset> {
    Arc::new(MemoryAsset::new(MusicId::from_raw(id)))
}

fn element(
    asset: &Arc<MemoryAsset>,
    priority: MusicStackPriority,
    transition: Transition,
) -> Arc<BasicMusicStackElement> {
    Arc::new(
        BasicMusicStackElement::new(asset.clone())
            .with_priority(priority)
            .with_transition_in(transition)
            .with_transition_out(transition),
    )
}

fn advance(stack: &mut MusicStack, seconds: f32, step: f32) {
    let ticks = (seconds / step).round() as usize;
    for _ in 0..ticks {
        stack.advance(step);
    }
}

#[test]
fn newest_normal_element_takes_control() {
    let mut stack = MusicStack::new();
    let a = stack
        .add(element(&asset(1), MusicStackPriority::Normal, Transition::INSTANT))
        .unwrap();
    let b = stack
        .add(element(&asset(2), MusicStackPriority::Normal, Transition::INSTANT))
        .unwrap();
    assert_eq!(stack.current_key(), Some(b));

    stack.remove(b).unwrap();
    assert_eq!(stack.current_key(), Some(a));

    stack.remove(a).unwrap();
    assert_eq!(stack.current_key(), None);
    assert!(stack.current().is_none());
}

#[test]
fn removing_high_priority_reverts_to_latest_low() {
    let mut stack = MusicStack::new();
    let _older = stack
        .add(element(&asset(1), MusicStackPriority::Low, Transition::INSTANT))
        .unwrap();
    let a = stack
        .add(element(&asset(2), MusicStackPriority::Low, Transition::INSTANT))
        .unwrap();
    let b = stack
        .add(element(&asset(3), MusicStackPriority::High, Transition::INSTANT))
        .unwrap();
    assert_eq!(stack.current_key(), Some(b));

    stack.remove(b).unwrap();
    assert_eq!(stack.current_key(), Some(a));
}

#[test]
fn shared_content_reuses_one_player() {
    let registry = MusicRegistry::new();
    let id = registry.id_for("music/overworld.ogg");
    let first = Arc::new(MemoryAsset::new(id));
    let second = Arc::new(MemoryAsset::new(registry.id_for("music/overworld.ogg")));

    let mut stack = MusicStack::new();
    stack
        .add(element(&first, MusicStackPriority::Normal, Transition::CROSS_FADE))
        .unwrap();
    advance(&mut stack, 1.0, 0.25);

    stack
        .add(element(&second, MusicStackPriority::Normal, Transition::CROSS_FADE))
        .unwrap();
    assert_eq!(stack.controller_count(), 1);
    assert_eq!(first.created_count(), 1);
    assert_eq!(second.created_count(), 0);

    let controller = stack.controller(id).unwrap();
    assert!(controller.is_conceptually_playing());
}

#[test]
fn content_from_separate_registries_gets_separate_players() {
    let scenes = MusicRegistry::new();
    let menus = MusicRegistry::new();
    let town = Arc::new(MemoryAsset::new(scenes.id_for("music/town.ogg")));
    let title = Arc::new(MemoryAsset::new(menus.id_for("music/title.ogg")));

    let mut stack = MusicStack::new();
    stack
        .add(element(&town, MusicStackPriority::Low, Transition::INSTANT))
        .unwrap();
    stack.advance(0.25);
    stack
        .add(element(&title, MusicStackPriority::High, Transition::INSTANT))
        .unwrap();
    stack.advance(0.25);

    assert_eq!(title.created_count(), 1);
    assert!(title.last_player().unwrap().is_playing());
    assert!(town.last_player().unwrap().is_released());
}

#[test]
fn crossfade_runs_both_players_then_releases_old() {
    let mut stack = MusicStack::new();
    let town = asset(1);
    let battle = asset(2);

    stack
        .add(element(&town, MusicStackPriority::Low, Transition::INSTANT))
        .unwrap();
    stack.advance(0.25);
    let town_player = town.last_player().unwrap();
    assert_eq!(town_player.volume(), 1.0);

    stack
        .add(element(&battle, MusicStackPriority::High, Transition::CROSS_FADE))
        .unwrap();
    assert_eq!(stack.controller_count(), 2);

    advance(&mut stack, 1.0, 0.25);
    let battle_player = battle.last_player().unwrap();
    assert_relative_eq!(town_player.volume(), 0.5);
    assert_relative_eq!(battle_player.volume(), 0.5);
    assert!(town_player.is_playing());

    advance(&mut stack, 1.0, 0.25);
    assert_eq!(town_player.volume(), 0.0);
    assert_eq!(battle_player.volume(), 1.0);
    assert_eq!(stack.controller_count(), 1);
    assert!(town_player.is_released());
    assert!(!battle_player.is_released());
}

#[test]
fn release_transition_of_removed_element_is_used() {
    let mut stack = MusicStack::new();
    let town = asset(1);
    let jingle = asset(2);

    stack
        .add(element(&town, MusicStackPriority::Low, Transition::INSTANT))
        .unwrap();
    let jingle_key = stack
        .add(Arc::new(
            BasicMusicStackElement::new(jingle.clone())
                .with_priority(MusicStackPriority::High)
                .with_transition_in(Transition::INSTANT)
                .with_transition_out(Transition::QUICK_OUT),
        ))
        .unwrap();
    stack.advance(0.25);

    stack.remove(jingle_key).unwrap();
    let town_id = MusicId::from_raw(1);
    assert_eq!(
        stack.controller(town_id).unwrap().state(),
        FadeState::Delayed
    );

    // The jingle is gone after its 0.1s fade while the town music still waits.
    stack.advance(0.125);
    assert!(jingle.last_player().unwrap().is_released());
    assert_eq!(town.last_player().unwrap().volume(), 0.0);

    advance(&mut stack, 0.5, 0.125);
    assert_eq!(town.last_player().unwrap().volume(), 1.0);
}

#[test]
fn controller_that_was_cleaned_up_is_rebuilt() {
    let mut stack = MusicStack::new();
    let town = asset(1);
    let cutscene = asset(2);

    stack
        .add(element(&town, MusicStackPriority::Low, Transition::INSTANT))
        .unwrap();
    let cutscene_key = stack
        .add(element(&cutscene, MusicStackPriority::High, Transition::INSTANT))
        .unwrap();
    stack.advance(0.25);
    assert!(town.last_player().unwrap().is_released());

    stack.remove(cutscene_key).unwrap();
    stack.advance(0.25);
    assert_eq!(town.created_count(), 2);
    assert!(town.last_player().unwrap().is_playing());
}

#[test]
fn removing_twice_is_rejected() {
    let mut stack = MusicStack::new();
    let key = stack
        .add(element(&asset(1), MusicStackPriority::Normal, Transition::INSTANT))
        .unwrap();

    stack.remove(key).unwrap();
    let err = stack.remove(key).unwrap_err();
    assert!(matches!(err, MusicStackError::UnknownKey(k) if k == key));
    assert!(err.is_programmer_error());
}

#[test]
fn desired_volume_becomes_fade_target() {
    let mut stack = MusicStack::new();
    let quiet = asset(1);
    stack
        .add(Arc::new(
            BasicMusicStackElement::new(quiet.clone())
                .with_volume(0.4)
                .with_transition_in(Transition::INSTANT),
        ))
        .unwrap();
    stack.advance(0.1);
    assert_relative_eq!(quiet.last_player().unwrap().volume(), 0.4);
}

/// Reference model: the expected top is the max priority, newest insertion.
#[test]
fn top_always_matches_reference_model() {
    let mut stack = MusicStack::new();
    let mut registered: Vec<(PriorityKey, i32, usize)> = Vec::new();
    let priorities = [
        MusicStackPriority::Low,
        MusicStackPriority::Normal,
        MusicStackPriority::High,
    ];
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };

    for step in 0..500usize {
        let roll = next();
        if registered.is_empty() || roll % 3 != 0 {
            let priority = priorities[(roll >> 8) as usize % priorities.len()];
            let key = stack
                .add(element(
                    &asset(roll % 5),
                    priority,
                    Transition::CROSS_FADE,
                ))
                .unwrap();
            registered.push((key, priority.value(), step));
        } else {
            let index = (roll >> 16) as usize % registered.len();
            let (key, _, _) = registered.remove(index);
            stack.remove(key).unwrap();
        }
        stack.advance(0.1);

        let expected = registered
            .iter()
            .max_by_key(|(_, priority, inserted)| (*priority, *inserted))
            .map(|(key, _, _)| *key);
        assert_eq!(stack.current_key(), expected);
        assert_eq!(stack.len(), registered.len());
    }
}
