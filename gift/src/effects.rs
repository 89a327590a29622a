//! Session-event-to-UI mapping

use gift_core::{SequencerEvent, SessionEvent};

use crate::app::App;
use crate::capture_worker::CaptureTarget;
use crate::scenes::Cue;

/// Process a session event and update UI state accordingly
pub fn process_session_event(app: &mut App, event: &SessionEvent) {
    match event {
        SessionEvent::Settled(screen) => {
            tracing::debug!(%screen, "screen settled");
        }

        SessionEvent::HeartWall(event) => process_sequencer_event(event),

        SessionEvent::CaptureReady {
            page,
            title,
            snapshot,
        } => {
            tracing::info!(%page, "capturing photo memory");
            app.submit_capture(
                CaptureTarget::Memory {
                    page: *page,
                    title: *title,
                },
                snapshot.clone(),
            );
        }
    }
}

/// Process a heart-wall event
pub fn process_sequencer_event(event: &SequencerEvent) {
    match event {
        SequencerEvent::StartAudio => tracing::debug!("heart wall music started"),
        SequencerEvent::Placed { step, .. } => {
            tracing::trace!(step, "cluster placed");
        }
        SequencerEvent::RiseStarted => tracing::debug!("heart wall rising"),
        SequencerEvent::Rose { .. } => {}
        SequencerEvent::Completed => tracing::info!("heart wall complete"),
        SequencerEvent::CaptureRequested => {}
    }
}

/// Play a sound cue from the letter timeline
pub fn process_cue(app: &mut App, cue: Cue) {
    if app.scenes.pictures.sound_on {
        tracing::trace!(?cue, "sound cue");
    }
}
