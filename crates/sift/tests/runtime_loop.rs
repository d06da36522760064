mod common;

use common::{FakeBackend, animals, headless, headless_with};
use core_config::ConfigError;
use core_events::{Event, InputEvent, KeyCode, KeyEvent, KeyModifiers};
use sift::{Exit, FinderHandle, FinderInit, LineStreamSource, SessionOptions};
use std::time::Duration;
use tokio::time::timeout;

async fn type_str(handle: &FinderHandle, text: &str) {
    for c in text.chars() {
        handle
            .send(Event::Input(InputEvent::Key(KeyEvent::char(c))))
            .await
            .expect("session accepts keys");
    }
}

async fn press(handle: &FinderHandle, code: KeyCode) {
    handle
        .send(Event::key(code, KeyModifiers::empty()))
        .await
        .expect("session accepts keys");
}

#[tokio::test]
async fn typed_query_selects_and_restores_terminal() {
    let finder = headless(animals());
    let handle = finder.handle();
    type_str(&handle, "cro").await;
    press(&handle, KeyCode::Enter).await;

    let mut backend = FakeBackend::sized(80, 24);
    let mut out = Vec::new();
    let outcome = finder.run_with(&mut backend, &mut out).await.expect("run");

    let selected = outcome.selected.expect("selection");
    assert_eq!(selected.value, "Crocodiles");
    assert_eq!(selected.index, 3);
    assert_eq!(outcome.query, "cro");
    assert_eq!(outcome.status, Exit::Finished);
    assert_eq!((backend.entered, backend.left), (1, 1));
    assert!(String::from_utf8_lossy(&out).contains("Crocodiles"));
}

#[tokio::test]
async fn stop_cancels_and_keeps_query() {
    let finder = headless(animals());
    let handle = finder.handle();
    type_str(&handle, "gir").await;
    handle.stop().await.expect("stop");

    let mut backend = FakeBackend::sized(80, 24);
    let outcome = finder
        .run_with(&mut backend, &mut Vec::new())
        .await
        .expect("run");
    assert_eq!(outcome.status, Exit::Cancelled);
    assert_eq!(outcome.query, "gir");
    assert!(outcome.selected.is_none());
    assert_eq!(backend.left, 1);
}

#[tokio::test]
async fn escape_cancels() {
    let finder = headless(animals());
    let handle = finder.handle();
    type_str(&handle, "z").await;
    press(&handle, KeyCode::Esc).await;

    let outcome = finder
        .run_with(&mut FakeBackend::sized(80, 24), &mut Vec::new())
        .await
        .expect("run");
    assert_eq!(outcome.status, Exit::Cancelled);
    assert!(outcome.selected.is_none());
}

#[tokio::test]
async fn missing_raw_mode_reports_cancelled_without_drawing() {
    let options = SessionOptions {
        query: "gi".into(),
        ..Default::default()
    };
    let mut backend = FakeBackend::without_raw_mode();
    let mut out = Vec::new();
    let outcome = headless_with(options)
        .run_with(&mut backend, &mut out)
        .await
        .expect("degrades instead of failing");
    assert_eq!(outcome, sift::Outcome::cancelled("gi"));
    assert!(out.is_empty());
    assert_eq!(backend.left, 0);
}

#[tokio::test]
async fn invalid_options_fail_before_touching_the_terminal() {
    let options = SessionOptions {
        height: Some(150),
        ..Default::default()
    };
    let mut backend = FakeBackend::sized(80, 24);
    let err = headless_with(options)
        .run_with(&mut backend, &mut Vec::new())
        .await
        .expect_err("height above 100 is rejected");
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidHeight(150))
    ));
    assert_eq!(backend.entered, 0);
}

#[tokio::test]
async fn channel_closing_cancels_with_initial_query() {
    let options = SessionOptions {
        query: "ze".into(),
        ..Default::default()
    };
    let finder = headless_with(options);
    let outcome = timeout(
        Duration::from_secs(2),
        finder.run_with(&mut FakeBackend::sized(80, 24), &mut Vec::new()),
    )
    .await
    .expect("no producers left")
    .expect("run");
    assert_eq!(outcome.status, Exit::Cancelled);
    assert_eq!(outcome.query, "ze");
}

#[tokio::test]
async fn static_select_one_finishes_without_keys() {
    let options = SessionOptions {
        query: "Gi".into(),
        select_one: true,
        ..Default::default()
    };
    let finder = headless_with(options);
    let _handle = finder.handle();
    let outcome = timeout(
        Duration::from_secs(2),
        finder.run_with(&mut FakeBackend::sized(80, 24), &mut Vec::new()),
    )
    .await
    .expect("finishes on its own")
    .expect("run");
    let selected = outcome.selected.expect("auto selection");
    assert_eq!((selected.value.as_str(), selected.index), ("Giraffes", 6));
    assert_eq!(outcome.status, Exit::Finished);
}

#[tokio::test]
async fn streamed_select_one_waits_for_the_settled_list() {
    let options = SessionOptions {
        query: "Gi".into(),
        select_one: true,
        ..Default::default()
    };
    let finder = headless(FinderInit::with_options(Vec::new(), options)).streaming();
    let handle = finder.handle();
    handle.update(["Giraffes"]).await.expect("update");
    handle
        .settle(["Apes", "Gibbons", "Zebras"])
        .await
        .expect("settle");

    let outcome = timeout(
        Duration::from_secs(2),
        finder.run_with(&mut FakeBackend::sized(80, 24), &mut Vec::new()),
    )
    .await
    .expect("finishes on its own")
    .expect("run");
    let selected = outcome.selected.expect("auto selection");
    assert_eq!((selected.value.as_str(), selected.index), ("Gibbons", 1));
}

#[tokio::test]
async fn list_update_keeps_the_query() {
    let finder = headless(FinderInit::with_options(Vec::new(), SessionOptions::default()))
        .streaming();
    let handle = finder.handle();
    type_str(&handle, "ra").await;
    handle
        .update(["Apes", "Giraffes", "Rats", "Zebras"])
        .await
        .expect("update");
    press(&handle, KeyCode::Enter).await;

    let outcome = finder
        .run_with(&mut FakeBackend::sized(80, 24), &mut Vec::new())
        .await
        .expect("run");
    assert_eq!(outcome.query, "ra");
    // fuzzy "ra": Giraffes, Rats, Zebras in alphabetical order
    assert_eq!(outcome.selected.expect("selection").value, "Giraffes");
}

#[tokio::test]
async fn lines_from_a_reader_feed_the_list() {
    let options = SessionOptions {
        query: "Gi".into(),
        select_one: true,
        ..Default::default()
    };
    let input: &'static [u8] = b"Apes\n\n   \nGiraffes\nZebras\n";
    let mut finder = headless(FinderInit::with_options(Vec::new(), options));
    let debounce = finder.update_debounce();
    finder.register_source(LineStreamSource::new(input, debounce));
    let finder = finder.streaming();

    let outcome = timeout(
        Duration::from_secs(2),
        finder.run_with(&mut FakeBackend::sized(80, 24), &mut Vec::new()),
    )
    .await
    .expect("finishes once the stream settles")
    .expect("run");
    let selected = outcome.selected.expect("auto selection");
    assert_eq!((selected.value.as_str(), selected.index), ("Giraffes", 1));
}

#[tokio::test]
async fn handle_reports_a_finished_session() {
    let finder = headless(animals());
    let handle = finder.handle();
    press(&handle, KeyCode::Enter).await;
    let outcome = finder
        .run_with(&mut FakeBackend::sized(80, 24), &mut Vec::new())
        .await
        .expect("run");
    assert_eq!(outcome.selected.expect("selection").value, "Apes");
    assert!(handle.update(["late"]).await.is_err());
}

#[tokio::test]
async fn unsized_terminal_falls_back() {
    let finder = headless(animals());
    let handle = finder.handle();
    handle
        .send(Event::Input(InputEvent::Key(KeyEvent::ctrl('j'))))
        .await
        .expect("key");
    press(&handle, KeyCode::Enter).await;
    let outcome = finder
        .run_with(&mut FakeBackend::default(), &mut Vec::new())
        .await
        .expect("run");
    assert_eq!(outcome.selected.expect("selection").value, "Badgers");
}

#[tokio::test]
async fn row_hooks_decorate_the_drawn_band() {
    let finder = headless(animals())
        .with_row_prefix(|index| format!("{index}:"))
        .with_row_suffix(|index| if index == 6 { " *".to_string() } else { String::new() });
    let handle = finder.handle();
    type_str(&handle, "gi").await;
    press(&handle, KeyCode::Enter).await;

    let mut out = Vec::new();
    let outcome = finder
        .run_with(&mut FakeBackend::sized(80, 24), &mut out)
        .await
        .expect("run");
    assert_eq!(outcome.selected.expect("selection").value, "Giraffes");
    let screen = String::from_utf8(out).expect("utf8");
    assert!(screen.contains("> 6:Giraffes *"));
}
