use std::sync::Arc;

use huddle_sdk::{
    config::CallCreationSettings,
    parse_join_input,
    test_utils::{logged_in_client, MockLocalParticipant, MockMediaSession},
    CallId, CallingState, MeetingPhase, MeetingRoom, TrackKind,
};

#[tokio::test]
async fn scheduled_meeting_shows_up_as_upcoming_after_the_next_refresh() {
    let (client, calls, _) = logged_in_client();

    let starts_at = chrono::Utc::now() + chrono::Duration::hours(1);
    let settings = CallCreationSettings::scheduled(Some(starts_at)).description("Standup");
    let session = client.create_or_join_call(CallId::from("standup"), settings).await.unwrap();

    // The remote get-or-create received the exact start time and the custom
    // description.
    let data = calls.last_creation_data().unwrap();
    assert_eq!(data.starts_at.to_rfc3339(), starts_at.to_rfc3339());
    assert_eq!(data.custom.description, "Standup");

    let call_list = client.call_list();
    call_list.refresh().await;

    let upcoming = call_list.upcoming();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(&upcoming[0].id, session.id());
    assert!(call_list.ended().is_empty());
}

#[tokio::test]
async fn a_full_meeting_roundtrip() {
    let (client, _, chat) = logged_in_client();

    // Create an instant meeting and share its link.
    let session = client
        .create_or_join_call(CallId::random(), CallCreationSettings::instant())
        .await
        .unwrap();
    let link = client.join_link(session.id());

    // Another participant extracts the id from the pasted link.
    assert_eq!(&parse_join_input(&link).unwrap(), session.id());

    // Chat is provisioned once the call exists.
    let channel = client.provision_chat(session.id()).await.unwrap();
    assert_eq!(chat.ensured_channels(), vec![channel.clone()]);

    // Mount the meeting surface; it stays gated until the transport reports
    // a fully-joined state.
    let participant =
        Arc::new(MockLocalParticipant::publishing([TrackKind::Camera, TrackKind::Microphone]));
    let media = Arc::new(MockMediaSession::with_participant(participant.clone()));
    let room = MeetingRoom::builder(client.clone())
        .session(session)
        .media_session(media.clone())
        .build();

    assert!(!room.toggle_chat());
    room.handle_calling_state(CallingState::Joined);
    assert!(room.toggle_chat());
    assert_eq!(room.chat_channel(), Some(channel));

    // Leaving shuts the published devices down before tearing down the
    // session.
    room.leave().await;

    assert_eq!(participant.camera_commands(), vec![false]);
    assert_eq!(participant.microphone_commands(), vec![false]);
    assert!(media.has_left());
    assert_eq!(room.phase(), MeetingPhase::Left);
}
