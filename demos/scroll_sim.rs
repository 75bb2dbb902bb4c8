use std::cell::Cell;
use std::rc::Rc;

use parallax_scroll::{
    Axis, ElementGeometry, ElementOptions, InViewOptions, IntersectionEntry, ObservationHandle,
    ParallaxElement, ParallaxError, ParallaxOptions, ScrollCoordinator, ScrollSource,
    ScrollSubscription, TransformPoint, ViewMargin, ViewportGeometrySource, VisibilityObserver,
};

// Simulate a page: a window with a shared scroll position and blocks laid out in document
// coordinates.
#[derive(Clone)]
struct Page {
    scroll_y: Rc<Cell<f64>>,
}

impl ViewportGeometrySource for Page {
    fn scroll_offsets(&self) -> (f64, f64) {
        (0.0, self.scroll_y.get())
    }

    fn viewport_size(&self) -> (f64, f64) {
        (1200.0, 800.0)
    }

    fn outer_viewport_height(&self) -> f64 {
        900.0
    }

    fn outer_viewport_width(&self) -> f64 {
        1280.0
    }
}

struct Block {
    doc_top: f64,
    height: f64,
    scroll_y: Rc<Cell<f64>>,
}

impl ElementGeometry for Block {
    fn bounding_top(&self) -> f64 {
        self.doc_top - self.scroll_y.get()
    }

    fn rendered_height(&self) -> f64 {
        self.height
    }
}

// Intersection detection computed from geometry, the way a polyfill would.
#[derive(Default)]
struct GeometryObserver {
    next: u64,
    live: Vec<(ObservationHandle, ViewMargin)>,
}

impl VisibilityObserver<Block> for GeometryObserver {
    fn observe(
        &mut self,
        _target: &Block,
        view_margin: &ViewMargin,
    ) -> Result<ObservationHandle, ParallaxError> {
        let handle = ObservationHandle(self.next);
        self.next += 1;
        self.live.push((handle, view_margin.clone()));
        Ok(handle)
    }

    fn unobserve(&mut self, handle: ObservationHandle) {
        self.live.retain(|(h, _)| *h != handle);
    }
}

struct Window {
    next: u64,
}

impl ScrollSource for Window {
    fn subscribe(&mut self) -> ScrollSubscription {
        self.next += 1;
        ScrollSubscription(self.next)
    }

    fn unsubscribe(&mut self, _subscription: ScrollSubscription) {}
}

fn main() {
    let scroll_y = Rc::new(Cell::new(0.0));
    let page = Page {
        scroll_y: Rc::clone(&scroll_y),
    };
    let mut window = Window { next: 0 };
    let mut observer = GeometryObserver::default();

    let mut coordinator = ScrollCoordinator::new(page.clone());
    coordinator.start(&mut window);

    let hero = ParallaxElement::new(
        Block {
            doc_top: 400.0,
            height: 300.0,
            scroll_y: Rc::clone(&scroll_y),
        },
        ElementOptions::new()
            .with_class_name("hero")
            .with_parallax(Some(ParallaxOptions::new(
                TransformPoint::new().with(Axis::Y, -80.0),
                TransformPoint::new()
                    .with(Axis::Y, 80.0)
                    .with(Axis::RotateZ, 12.0),
            ))),
        page.outer_viewport_width(),
    );
    let card = ParallaxElement::new(
        Block {
            doc_top: 1600.0,
            height: 200.0,
            scroll_y: Rc::clone(&scroll_y),
        },
        ElementOptions::new()
            .with_parallax(Some(ParallaxOptions::new(
                TransformPoint::new(),
                TransformPoint::new().with(Axis::Scale, 1.5),
            )))
            .with_in_view(InViewOptions::default().with_repeat_in_view(false)),
        page.outer_viewport_width(),
    );
    hero.mount(&mut coordinator, &mut observer);
    card.mount(&mut coordinator, &mut observer);

    let elements = [("hero", &hero), ("card", &card)];
    let mut now_ms = 0u64;
    for step in 0..12 {
        // The user scrolls 150px every 16ms frame.
        now_ms += 16;
        scroll_y.set(step as f64 * 150.0);
        if let Err(err) = coordinator.on_scroll_event(now_ms) {
            println!("dispatch failed: {err}");
        }
        if let Err(err) = coordinator.tick(now_ms) {
            println!("trailing dispatch failed: {err}");
        }

        // Deliver intersection reports for live observations.
        for (_, element) in elements {
            let handle = element.controller().borrow().observation();
            let Some(handle) = handle else {
                continue;
            };
            let margin = observer
                .live
                .iter()
                .find(|(h, _)| *h == handle)
                .map(|(_, m)| m.clone());
            let Some(margin) = margin else {
                continue;
            };
            let is_intersecting = {
                let c = element.controller().borrow();
                let g = c.geometry();
                margin.intersects(1200.0, 800.0, g.bounding_top(), g.rendered_height())
            };
            element.on_intersection(
                IntersectionEntry {
                    handle,
                    is_intersecting,
                },
                &mut observer,
            );
        }

        for (name, element) in elements {
            let state = element.render_state();
            println!(
                "t={now_ms}ms scroll={} {name}: transform={:?} class={:?}",
                scroll_y.get(),
                state.transform,
                state.class_name
            );
        }
    }

    hero.unmount(&mut coordinator, &mut observer);
    card.unmount(&mut coordinator, &mut observer);
    coordinator.stop(&mut window);
    println!(
        "unmounted: registered={}, live observations={}",
        coordinator.len(),
        observer.live.len()
    );
}
