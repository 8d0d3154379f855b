use std::time::Duration;

use huddle_sdk::{
    config::CallListSettings,
    test_utils::{logged_in_client, upcoming_call},
    CallListService,
};

#[tokio::test]
async fn background_failures_never_surface_and_keep_the_last_good_snapshot() {
    let (client, calls, _) = logged_in_client();
    calls.seed(upcoming_call("weekly", "@alice", 90));

    let call_list = client.call_list();
    call_list.refresh().await;
    let good = call_list.snapshot();
    assert_eq!(good.calls.len(), 1);

    calls.set_fail_queries(true);
    for _ in 0..3 {
        call_list.refresh().await;
    }

    let snapshot = call_list.snapshot();
    assert_eq!(snapshot.calls, good.calls);
    assert_eq!(snapshot.fetched_at, good.fetched_at);
    assert!(!snapshot.is_loading);
}

#[tokio::test(start_paused = true)]
async fn the_poll_loop_picks_up_remotely_created_calls() {
    let (client, calls, _) = logged_in_client();

    let call_list = CallListService::with_settings(
        client,
        CallListSettings::new().poll_interval(Duration::from_secs(30)),
    );
    call_list.start();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(call_list.upcoming().is_empty());

    // A call scheduled elsewhere appears after the next poll.
    calls.seed(upcoming_call("offsite", "@alice", 120));
    tokio::time::sleep(Duration::from_secs(30)).await;

    let upcoming = call_list.upcoming();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].id.as_str(), "offsite");

    call_list.stop();
}
