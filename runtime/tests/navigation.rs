//! End-to-end transition coverage against the in-memory host.
//!
//! All tests run on a paused clock; sleeping past the fixed phase durations
//! advances the driver task deterministically.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::broadcast::error::TryRecvError;

use hashnav_core::memory::{MemoryGestures, MemoryHost, MemoryMedia};
use hashnav_core::{Host, MediaElement, PageLoaded, Phase, ScriptSpec};
use hashnav_runtime::Engine;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn demo_host() -> MemoryHost {
    let mut host = MemoryHost::new();
    host.insert_template("home-template", "<h1>Home</h1>");
    host.insert_template("faq-template", "<h1>FAQ</h1>");
    host.insert_template("shop-template", "<h1>Shop</h1>");
    host.insert_template("play-template", "<h1>Play</h1>");
    for page in ["home", "faq", "shop", "play"] {
        host.add_link(page);
    }
    host
}

fn demo_engine(host: MemoryHost) -> Arc<Engine<MemoryHost>> {
    init_tracing();
    Engine::builder(host)
        .route("home", "home-template")
        .route("faq", "faq-template")
        .route("shop", "shop-template")
        .route("play", "play-template")
        .build()
}

/// Past the exit phase, with slack for scheduling.
const AFTER_EXIT: Duration = Duration::from_millis(410);
/// From the swap to past the enter phase.
const AFTER_ENTER: Duration = Duration::from_millis(510);

#[tokio::test(start_paused = true)]
async fn navigate_runs_the_two_phase_swap() {
    let engine = demo_engine(demo_host());
    engine.with_host(|h| h.set_scroll(0, 640));
    let mut events = engine.subscribe();

    engine.navigate("faq");
    assert!(engine.in_transition());
    assert_eq!(engine.current_page(), "faq");
    engine.with_host(|h| {
        assert!(h.loading());
        assert_eq!(h.phase(), Phase::Exiting);
        assert_eq!(h.history(), ["faq".to_string()]);
        // Indicator moves immediately, ahead of the content.
        assert_eq!(h.active_link(), Some("faq"));
        // Old content still visible during the exit phase.
        assert_eq!(h.content(), "");
    });

    tokio::time::sleep(AFTER_EXIT).await;
    engine.with_host(|h| {
        assert_eq!(h.content(), "<h1>FAQ</h1>");
        assert_eq!(h.phase(), Phase::Entering);
        assert!(!h.loading());
    });
    assert!(engine.in_transition());
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));

    tokio::time::sleep(AFTER_ENTER).await;
    assert!(!engine.in_transition());
    assert_eq!(events.try_recv().unwrap(), PageLoaded::new("faq"));
    engine.with_host(|h| {
        assert_eq!(h.phase(), Phase::Idle);
        assert_eq!(h.scroll(), (0, 0));
    });
}

#[tokio::test(start_paused = true)]
async fn unregistered_page_loads_the_default_content() {
    let engine = demo_engine(demo_host());
    let mut events = engine.subscribe();

    engine.request_load("does-not-exist");
    tokio::time::sleep(AFTER_EXIT + AFTER_ENTER).await;

    engine.with_host(|h| assert_eq!(h.content(), "<h1>Home</h1>"));
    assert_eq!(events.try_recv().unwrap(), PageLoaded::new("home"));
}

#[tokio::test(start_paused = true)]
async fn in_flight_transition_refuses_a_second_load() {
    let engine = demo_engine(demo_host());
    let mut events = engine.subscribe();

    engine.request_load("faq");
    engine.request_load("play");
    tokio::time::sleep(AFTER_EXIT + AFTER_ENTER).await;

    engine.with_host(|h| assert_eq!(h.content(), "<h1>FAQ</h1>"));
    assert_eq!(events.try_recv().unwrap(), PageLoaded::new("faq"));
    // The refused call neither queued nor ran a second transition.
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
    assert!(!engine.in_transition());
}

#[tokio::test(start_paused = true)]
async fn queued_requests_coalesce_to_the_last_one() {
    let engine = demo_engine(demo_host());
    let mut events = engine.subscribe();

    engine.request_load("faq");
    assert!(engine.queue_pending("home"));
    assert!(engine.queue_pending("shop"));
    assert!(engine.queue_pending("play"));

    tokio::time::sleep(AFTER_EXIT + AFTER_ENTER).await;
    // The drained follow-up went through the URL-mutating entry point.
    assert!(engine.in_transition());
    assert_eq!(engine.current_page(), "play");
    engine.with_host(|h| assert_eq!(h.history(), ["play".to_string()]));

    tokio::time::sleep(AFTER_EXIT + AFTER_ENTER).await;
    assert!(!engine.in_transition());
    engine.with_host(|h| assert_eq!(h.content(), "<h1>Play</h1>"));

    // Exactly one follow-up transition: two events in total, never one for
    // the superseded requests.
    assert_eq!(events.try_recv().unwrap(), PageLoaded::new("faq"));
    assert_eq!(events.try_recv().unwrap(), PageLoaded::new("play"));
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn missing_template_stalls_the_transition() {
    // "ghost" is routed but its template content is absent from the host.
    let engine = Engine::builder(demo_host())
        .route("home", "home-template")
        .route("ghost", "ghost-template")
        .build();
    let mut events = engine.subscribe();

    engine.request_load("ghost");
    assert!(engine.in_transition());

    // The flag never clears and nothing is emitted when template content
    // is absent.
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(engine.in_transition());
    engine.with_host(|h| assert_eq!(h.content(), ""));
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn inert_scripts_are_reinstantiated_before_the_hook_runs() {
    let mut host = demo_host();
    host.attach_script(
        "faq-template",
        ScriptSpec::inline("initFaq()").with_attr("type", "module"),
    );

    let scripts_seen_by_hook = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&scripts_seen_by_hook);
    let engine = Engine::builder(host)
        .route("home", "home-template")
        .route("faq", "faq-template")
        .hook("faq", move |h: &mut MemoryHost| {
            seen.store(h.executed_scripts().len(), Ordering::Relaxed);
        })
        .build();

    engine.request_load("faq");
    tokio::time::sleep(AFTER_EXIT + AFTER_ENTER).await;

    assert_eq!(scripts_seen_by_hook.load(Ordering::Relaxed), 1);
    engine.with_host(|h| {
        assert_eq!(h.executed_scripts().len(), 1);
        assert_eq!(h.executed_scripts()[0].text, "initFaq()");
        assert_eq!(
            h.executed_scripts()[0].attrs,
            vec![("type".to_string(), "module".to_string())]
        );
        assert!(h.take_inert_scripts().is_empty());
    });
}

#[tokio::test(start_paused = true)]
async fn hooks_fire_only_for_their_own_page() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let engine = Engine::builder(demo_host())
        .route("home", "home-template")
        .route("faq", "faq-template")
        .hook("faq", move |_h: &mut MemoryHost| {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .build();

    engine.request_load("home");
    tokio::time::sleep(AFTER_EXIT + AFTER_ENTER).await;
    assert_eq!(hits.load(Ordering::Relaxed), 0);

    engine.request_load("faq");
    tokio::time::sleep(AFTER_EXIT + AFTER_ENTER).await;
    assert_eq!(hits.load(Ordering::Relaxed), 1);
}

#[tokio::test(start_paused = true)]
async fn swapped_in_media_ends_up_muted_and_playing() {
    let mut host = demo_host();
    let media = MemoryMedia::new();
    host.attach_media("faq-template", media.clone());
    let engine = demo_engine(host);

    engine.navigate("faq");
    tokio::time::sleep(AFTER_EXIT + AFTER_ENTER).await;

    assert!(media.is_playing());
    assert!(media.is_muted());
}

#[tokio::test(start_paused = true)]
async fn first_gesture_resumes_paused_media() {
    let mut host = demo_host();
    let media = MemoryMedia::new();
    media.reject_next_plays(100);
    host.attach_media("home-template", media.clone());
    let engine = demo_engine(host);
    let gestures = MemoryGestures::new();

    engine.request_load("home");
    tokio::time::sleep(AFTER_EXIT + AFTER_ENTER).await;
    assert!(media.is_paused());
    let attempts = media.play_attempts();

    engine.resume_media_on_first_gesture(gestures.clone());
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    gestures.emit();
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }

    assert_eq!(media.play_attempts(), attempts + 1);
}
