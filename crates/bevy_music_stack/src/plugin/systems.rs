use super::MusicStackPluginConfig;
use crate::events::{MusicControlChanged, MusicOutputRequest};
use crate::stack::ActiveMusicStack;
use bevy::prelude::*;
use music_stack::PriorityKey;

pub(super) fn apply_output_requests(
    mut requests: MessageReader<MusicOutputRequest>,
    mut stack: ResMut<ActiveMusicStack>,
) {
    for request in requests.read() {
        stack.set_output(request.output.clone());
    }
}

pub(super) fn advance_music_stack(
    config: Res<MusicStackPluginConfig>,
    real_time: Res<Time<Real>>,
    time: Res<Time>,
    mut stack: ResMut<ActiveMusicStack>,
) {
    let delta = if config.use_real_time {
        real_time.delta_secs()
    } else {
        time.delta_secs()
    };
    stack.advance(delta);
}

pub(super) fn emit_control_changes(
    stack: Res<ActiveMusicStack>,
    mut last: Local<Option<PriorityKey>>,
    mut changes: MessageWriter<MusicControlChanged>,
) {
    let current = stack.current_key();
    if current == *last {
        return;
    }
    changes.write(MusicControlChanged {
        previous: *last,
        current,
    });
    *last = current;
}

pub(super) fn shutdown_on_exit(
    mut exits: MessageReader<AppExit>,
    mut stack: ResMut<ActiveMusicStack>,
) {
    if exits.read().next().is_some() {
        info!("Shutting down music stack");
        stack.shutdown();
    }
}
