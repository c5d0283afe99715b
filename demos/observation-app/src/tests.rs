#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use observa_core::*;
    use observa_platform::render_text;
    use observa_ui::{Column, Provide};
    use web_time::Duration;

    use crate::*;

    fn mounted(clock: &ManualClock) -> Evaluator {
        let mut ev = Evaluator::with_clock(Rc::new(clock.clone()));
        ev.mount(App(Entropy::seeded(1)));
        ev
    }

    fn displayed_counter(frame: &Frame) -> String {
        frame
            .texts()
            .find(|(_, style)| style.font == Font::Title)
            .map(|(t, _)| t.to_string())
            .unwrap_or_default()
    }

    fn stepper_value(frame: &Frame) -> Option<i64> {
        frame.nodes.iter().find_map(|n| match n.kind {
            NodeKind::Stepper { value, .. } => Some(value),
            _ => None,
        })
    }

    #[test]
    fn increments_from_one_to_five() {
        let clock = ManualClock::new();
        let ev = mounted(&clock);
        assert_eq!(displayed_counter(&ev.frame()), "1");

        ev.dispatch(&Interaction::tap("Present Incrementer")).unwrap();
        assert_eq!(ev.frame().sheet_state(), SheetState::Shown);

        for expected in 2..=5 {
            ev.dispatch(&Interaction::increment("Counter")).unwrap();
            let frame = ev.frame();
            assert_eq!(displayed_counter(&frame), expected.to_string());
            assert_eq!(stepper_value(&frame), Some(expected));
        }
        assert!(ev.frame().buttons().any(|b| b == "Return"));
    }

    #[test]
    fn counter_writes_rerender_only_its_readers_and_their_subtrees() {
        let clock = ManualClock::new();
        let ev = mounted(&clock);
        ev.dispatch(&Interaction::tap("Present Incrementer")).unwrap();
        ev.reset_render_counts();

        ev.dispatch(&Interaction::increment("Counter")).unwrap();
        assert_eq!(ev.render_count("DisplayerView"), 1);
        assert_eq!(ev.render_count("IncrementerView"), 1);
        assert_eq!(ev.render_count("ContentView"), 0);
        // nested under IncrementerView
        assert_eq!(ev.render_count("AlertPresenterView"), 1);
        assert_eq!(ev.render_count("App"), 0);
    }

    #[test]
    fn sheet_toggle_animates_height_both_ways() {
        let clock = ManualClock::new();
        let ev = mounted(&clock);
        assert_eq!(ev.frame().frame_heights(), vec![1.0]);

        ev.dispatch(&Interaction::tap("Present Incrementer")).unwrap();
        let node = ev
            .frame()
            .nodes
            .into_iter()
            .find_map(|n| match n.kind {
                NodeKind::Frame { target, current } => Some((target, current)),
                _ => None,
            })
            .unwrap();
        assert!((node.0 - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(node.1, 1.0);

        clock.advance(Duration::from_millis(150));
        let mid = ev.frame().frame_heights()[0];
        assert!(mid < 1.0 && mid > 2.0 / 3.0);

        clock.advance(Duration::from_millis(150));
        assert!(!ev.advance());
        assert!((ev.frame().frame_heights()[0] - 2.0 / 3.0).abs() < 1e-6);

        // child writes the parent's field through its binding
        ev.dispatch(&Interaction::tap("Return")).unwrap();
        assert_eq!(ev.frame().sheet_state(), SheetState::Hidden);
        clock.advance(Duration::from_millis(300));
        assert!(!ev.advance());
        assert_eq!(ev.frame().frame_heights(), vec![1.0]);
    }

    #[test]
    fn sheet_content_is_modal() {
        let clock = ManualClock::new();
        let ev = mounted(&clock);
        ev.dispatch(&Interaction::tap("Present Incrementer")).unwrap();
        assert!(matches!(
            ev.dispatch(&Interaction::tap("Present Incrementer")),
            Err(DispatchError::Blocked { .. })
        ));
    }

    #[test]
    fn incrementer_sheet_cannot_be_swiped_away() {
        let clock = ManualClock::new();
        let ev = mounted(&clock);
        ev.dispatch(&Interaction::tap("Present Incrementer")).unwrap();
        assert_eq!(
            ev.dispatch(&Interaction::Dismiss),
            Err(DispatchError::DismissDisabled)
        );
        assert_eq!(ev.frame().sheet_state(), SheetState::Shown);
    }

    #[test]
    fn counter_survives_closing_and_reopening_the_sheet() {
        let clock = ManualClock::new();
        let ev = mounted(&clock);
        ev.dispatch(&Interaction::tap("Present Incrementer")).unwrap();
        ev.dispatch(&Interaction::increment("Counter")).unwrap();
        ev.dispatch(&Interaction::tap("Return")).unwrap();
        assert_eq!(displayed_counter(&ev.frame()), "2");

        ev.dispatch(&Interaction::tap("Present Incrementer")).unwrap();
        assert_eq!(stepper_value(&ev.frame()), Some(2));
    }

    #[test]
    fn global_alert_round_trip() {
        let clock = ManualClock::new();
        let ev = mounted(&clock);
        ev.dispatch(&Interaction::tap("Present Incrementer")).unwrap();

        ev.dispatch(&Interaction::tap("Present alert")).unwrap();
        let frame = ev.frame();
        assert_eq!(frame.alert(), Some("Global alert"));
        assert!(render_text(&frame).contains("*Alert \"Global alert\" [Ok]"));

        assert!(matches!(
            ev.dispatch(&Interaction::tap("Return")),
            Err(DispatchError::Blocked { .. })
        ));

        ev.dispatch(&Interaction::tap("Ok")).unwrap();
        assert_eq!(ev.frame().alert(), None);
        assert_eq!(ev.frame().sheet_state(), SheetState::Shown);
    }

    #[test]
    fn independently_resolved_globals_see_each_others_writes() {
        let global = Store::new(GlobalAppState::default());
        with_context(global.clone(), || {
            let a = use_context::<Store<GlobalAppState>>();
            let b = use_context::<Store<GlobalAppState>>();
            a.set(GlobalAppState::ALERT_PRESENTED, true);
            assert!(b.get(GlobalAppState::ALERT_PRESENTED));
            b.toggle(GlobalAppState::ALERT_PRESENTED);
            assert!(!a.get(GlobalAppState::ALERT_PRESENTED));
        });
    }

    #[test]
    fn every_alert_presenter_observes_the_same_global() {
        let global = Store::new(GlobalAppState::default());
        let mut ev = Evaluator::new();
        ev.mount(Component::new("Pair", {
            let global = global.clone();
            move || {
                Provide(
                    global.clone(),
                    Column(vec![
                        AlertPresenterView().keyed("left").into(),
                        AlertPresenterView().keyed("right").into(),
                    ]),
                )
            }
        }));
        assert_eq!(global.subscriber_count(GlobalAppState::ALERT_PRESENTED), 2);

        ev.dispatch(&Interaction::tap("Present alert")).unwrap();
        let alerts = ev
            .frame()
            .nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Alert { .. }))
            .count();
        assert_eq!(alerts, 2);
        assert!(global.peek(GlobalAppState::ALERT_PRESENTED));
    }

    #[test]
    #[should_panic(expected = "GlobalAppState")]
    fn alert_presenter_without_provider_fails_fast() {
        let mut ev = Evaluator::new();
        ev.mount(AlertPresenterView());
    }

    #[test]
    fn initial_frame_outline() {
        let clock = ManualClock::new();
        let ev = mounted(&clock);
        let text = render_text(&ev.frame());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "<App>");
        assert_eq!(lines[1], "  <ContentView>");
        assert_eq!(lines[2], "    Column");
        assert_eq!(lines[3], "      Frame height=100.0%");
        assert_eq!(lines[4], "        Column");
        assert_eq!(lines[5], "          <DisplayerView>");
        assert!(lines[6].starts_with("            Text \"1\" [title, bold, "));
        assert_eq!(lines[7], "          *Button \"Present Incrementer\"");
        assert_eq!(lines[8], "      Sheet hidden (detent 33.3%, no swipe dismiss)");
        assert_eq!(lines.len(), 9);
    }
}
