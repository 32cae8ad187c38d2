//! Scripts both engines against a virtual 60fps host and logs what a
//! renderer would draw.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{bail, ensure, Result};
use swipekit_carousel::{Carousel, CarouselSettings};
use swipekit_core::{Runtime, RuntimeScheduler};
use swipekit_foundation::PanEvent;
use swipekit_swipe::{SwipeDeck, SwipeSettings};
use swipekit_ui_graphics::{Point, Rect};

const FRAME_NANOS: u64 = 16_666_667;
const MAX_FRAMES: usize = 1_000;
const DEMO_PAGES: usize = 5;
const CARD_BOUNDS: Rect = Rect::new(0.0, 0.0, 340.0, 480.0);

#[derive(Default)]
struct FrameCounter {
    requests: AtomicUsize,
}

impl RuntimeScheduler for FrameCounter {
    fn schedule_frame(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }
}

/// Plays the platform: owns the clock and pumps frames and main tasks.
struct Host {
    runtime: Runtime,
    scheduler: Arc<FrameCounter>,
    frame_time_nanos: u64,
}

impl Host {
    fn new() -> Self {
        let scheduler = Arc::new(FrameCounter::default());
        Self {
            runtime: Runtime::new(scheduler.clone()),
            scheduler,
            frame_time_nanos: 0,
        }
    }

    fn settle(&mut self) -> Result<usize> {
        let mut frames = 0;
        while self.runtime.has_frame_callbacks() || self.runtime.has_pending_main_tasks() {
            if frames == MAX_FRAMES {
                bail!("still animating after {MAX_FRAMES} frames");
            }
            self.frame_time_nanos += FRAME_NANOS;
            self.runtime.drain_frame_callbacks(self.frame_time_nanos);
            self.runtime.drain_main_tasks();
            frames += 1;
        }
        Ok(frames)
    }
}

#[derive(Clone, Debug)]
struct Profile {
    id: u32,
    name: &'static str,
}

#[derive(Clone, Debug)]
struct Photo {
    id: String,
    url: &'static str,
}

fn pan(start: Point, translation: Point, velocity: Point) -> [PanEvent; 3] {
    let half = Point::new(translation.x / 2.0, translation.y / 2.0);
    [
        PanEvent::begin(start),
        PanEvent::update(half, start + half),
        PanEvent::end(translation, start + translation, Some(velocity)),
    ]
}

fn run_deck(host: &mut Host) -> Result<()> {
    let profiles = vec![
        Profile { id: 1, name: "Ada" },
        Profile { id: 2, name: "Grace" },
        Profile { id: 3, name: "Linus" },
        Profile { id: 4, name: "Barbara" },
    ];
    let liked = Rc::new(RefCell::new(Vec::new()));
    let passed = Rc::new(RefCell::new(Vec::new()));
    let liked_sink = Rc::clone(&liked);
    let passed_sink = Rc::clone(&passed);

    let deck = SwipeDeck::new(
        &host.runtime.handle(),
        profiles,
        |profile: &Profile| profile.id,
        |_id: &u32| Some(CARD_BOUNDS),
        SwipeSettings::default(),
    )
    .on_swipe_right(move |profile: Profile| liked_sink.borrow_mut().push(profile.name))
    .on_swipe_left(move |profile: Profile| passed_sink.borrow_mut().push(profile.name));

    let start = Point::new(170.0, 240.0);
    let script = [
        ("short drag", Point::new(140.0, 10.0)),
        ("swipe right", Point::new(260.0, -30.0)),
        ("swipe left", Point::new(-230.0, 40.0)),
        ("straight down", Point::new(0.0, 210.0)),
    ];
    for (label, translation) in script {
        for event in pan(start, translation, Point::ZERO) {
            deck.handle_pan(event);
        }
        let frames = host.settle()?;
        log::info!("{label}: settled in {frames} frames, deck now {:?}", deck.keys());
        for frame in deck.cards() {
            log::debug!(
                "  card {} depth {} scale {:.2} y {:.1}",
                frame.key,
                frame.position,
                frame.transform.scale,
                frame.transform.translate_y
            );
        }
    }

    log::info!("liked {:?}, passed {:?}", liked.borrow(), passed.borrow());
    ensure!(*liked.borrow() == vec!["Ada"], "expected one like");
    ensure!(passed.borrow().len() == 2, "expected two passes");
    Ok(())
}

fn run_carousel(host: &mut Host, pages: usize) -> Result<()> {
    let photos: Vec<Photo> = (0..pages)
        .map(|index| Photo {
            id: format!("photo-{index}"),
            url: "https://images.invalid/photo.jpg",
        })
        .collect();
    let carousel = Carousel::new(
        &host.runtime.handle(),
        photos,
        |photo: &Photo| photo.id.clone(),
        |photo: &Photo| photo.url,
        CarouselSettings::default(),
    );
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    carousel
        .engine()
        .set_on_index_change(move |index| sink.borrow_mut().push(index));

    let engine = carousel.engine();
    let start = Point::new(150.0, 150.0);
    for event in pan(start, Point::new(0.0, 80.0), Point::ZERO) {
        engine.handle_pan(event);
    }
    log::info!(
        "pulled past the top: viewport {:.1}, first page {:.1}",
        engine.viewport_height(),
        carousel.pages().first().map_or(0.0, |page| page.height)
    );
    host.settle()?;

    for event in pan(start, Point::new(0.0, -160.0), Point::ZERO) {
        engine.handle_pan(event);
    }
    host.settle()?;
    log::info!("slow drag settled on page {}", engine.settled_index());

    for event in pan(start, Point::new(0.0, -60.0), Point::new(0.0, -1_600.0)) {
        engine.handle_pan(event);
    }
    host.settle()?;
    log::info!("fling settled on page {}", engine.settled_index());

    engine.on_tap(12.0);
    host.settle()?;
    log::info!("top tap settled on page {}", engine.settled_index());

    let dots: Vec<String> = carousel
        .dots()
        .iter()
        .map(|dot| format!("{:.0}@{:.2}", dot.height, dot.opacity))
        .collect();
    log::info!("dots {}", dots.join(" "));
    log::info!("index changes {:?}", changes.borrow());
    ensure!(
        carousel.current_item().is_some(),
        "carousel lost its current page"
    );
    Ok(())
}

fn main() -> Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut host = Host::new();
    run_deck(&mut host)?;
    run_carousel(&mut host, DEMO_PAGES)?;
    log::info!(
        "done after {:.2}s of virtual time, {} frame requests",
        host.frame_time_nanos as f64 / 1e9,
        host.scheduler.requests.load(Ordering::Relaxed)
    );
    Ok(())
}
