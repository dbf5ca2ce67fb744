use anyhow::anyhow;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use worldscope::panels::{FrameCtx, Panel, PanelQueue, PanelRegistry};
use worldscope::session::SessionState;

fn run_frame(
    registry: &mut PanelRegistry,
    session: &mut SessionState,
    queue: &mut PanelQueue,
    ctx: &egui::Context,
) {
    registry.flush_pending(queue);
    let _ = ctx.run(egui::RawInput::default(), |ctx| {
        let mut frame = FrameCtx { session, panels: queue };
        registry.render_all(ctx, &mut frame);
    });
}

#[test]
fn opens_during_a_frame_stay_buffered_until_the_boundary() {
    let ctx = egui::Context::default();
    let mut session = SessionState::new();
    let mut registry = PanelRegistry::new();
    let mut queue = PanelQueue::new();

    let spawned = Rc::new(Cell::new(false));
    let spawned_flag = spawned.clone();
    queue.open(Panel::new("root", move |ui, frame| {
        ui.label("root");
        if !spawned_flag.get() {
            spawned_flag.set(true);
            frame.panels.open(Panel::new("child one", |ui, _| {
                ui.label("one");
                Ok(())
            }));
            frame.panels.open(Panel::new("child two", |ui, _| {
                ui.label("two");
                Ok(())
            }));
        }
        Ok(())
    }));

    registry.flush_pending(&mut queue);
    assert_eq!(registry.live_count(), 1);

    let _ = ctx.run(egui::RawInput::default(), |ctx| {
        let mut frame = FrameCtx { session: &mut session, panels: &mut queue };
        registry.render_all(ctx, &mut frame);
    });

    // The two children were requested mid-frame and must not be live yet.
    assert_eq!(registry.live_count(), 1);
    assert_eq!(queue.pending_count(), 2);

    registry.flush_pending(&mut queue);
    assert_eq!(registry.live_count(), 3);
    assert_eq!(registry.live_titles(), vec!["root", "child one", "child two"]);
    assert_eq!(queue.pending_count(), 0);
}

#[test]
fn failing_panel_does_not_take_down_its_neighbours() {
    let ctx = egui::Context::default();
    let mut session = SessionState::new();
    let mut registry = PanelRegistry::new();
    let mut queue = PanelQueue::new();

    let log = Rc::new(RefCell::new(Vec::<&'static str>::new()));
    let log_a = log.clone();
    let log_b = log.clone();
    let log_c = log.clone();
    queue.open(Panel::new("a", move |ui, _| {
        log_a.borrow_mut().push("a");
        ui.label("a");
        Ok(())
    }));
    queue.open(Panel::new("b", move |_, _| {
        log_b.borrow_mut().push("b");
        Err(anyhow!("synthetic render failure"))
    }));
    queue.open(Panel::new("c", move |ui, _| {
        log_c.borrow_mut().push("c");
        ui.label("c");
        Ok(())
    }));

    run_frame(&mut registry, &mut session, &mut queue, &ctx);
    assert_eq!(*log.borrow(), vec!["a", "b", "c"], "the failure must not skip later panels");
    assert_eq!(registry.failed_count(), 1);
    assert_eq!(registry.live_count(), 3, "a failed panel stays open");

    log.borrow_mut().clear();
    run_frame(&mut registry, &mut session, &mut queue, &ctx);
    assert_eq!(*log.borrow(), vec!["a", "c"], "a failed panel shows its placeholder instead");
    assert_eq!(registry.live_count(), 3);
}

#[test]
fn duplicate_opens_make_independent_panels() {
    let ctx = egui::Context::default();
    let mut session = SessionState::new();
    let mut registry = PanelRegistry::new();
    let mut queue = PanelQueue::new();

    for _ in 0..2 {
        queue.open(Panel::new("same title", |ui, _| {
            ui.label("body");
            Ok(())
        }));
    }
    run_frame(&mut registry, &mut session, &mut queue, &ctx);
    assert_eq!(registry.live_count(), 2);
    assert_eq!(registry.live_titles(), vec!["same title", "same title"]);
}

#[test]
fn a_panel_queued_in_frame_n_renders_in_frame_n_plus_one() {
    let ctx = egui::Context::default();
    let mut session = SessionState::new();
    let mut registry = PanelRegistry::new();
    let mut queue = PanelQueue::new();

    let child_rendered = Rc::new(Cell::new(0usize));
    let opened = Rc::new(Cell::new(false));
    let child_counter = child_rendered.clone();
    let opened_flag = opened.clone();
    queue.open(Panel::new("opener", move |ui, frame| {
        ui.label("opener");
        if !opened_flag.get() {
            opened_flag.set(true);
            let counter = child_counter.clone();
            frame.panels.open(Panel::new("late child", move |ui, _| {
                counter.set(counter.get() + 1);
                ui.label("child");
                Ok(())
            }));
        }
        Ok(())
    }));

    run_frame(&mut registry, &mut session, &mut queue, &ctx);
    assert_eq!(child_rendered.get(), 0, "the child must not render in the frame that opened it");

    run_frame(&mut registry, &mut session, &mut queue, &ctx);
    assert_eq!(child_rendered.get(), 1);
}
