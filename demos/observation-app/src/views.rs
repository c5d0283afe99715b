#![allow(non_snake_case)]

use observa_core::*;
use observa_ui::*;

use crate::state::{GlobalAppState, ScreenState, format_number, height_fraction, tint_color};

/// Root of the process: owns the one `GlobalAppState` and provides it, along
/// with the random source, to everything below.
pub fn App(entropy: Entropy) -> Component {
    Component::new("App", move || {
        let global = remember_store_with_key("global-app-state", GlobalAppState::default);
        Provide(global, Provide(entropy.clone(), ContentView().into()))
    })
}

/// Owns the screen state; presents the incrementer in a sheet.
pub fn ContentView() -> Component {
    Component::new("ContentView", || {
        let state = remember_store(ScreenState::default);
        let presented = state.binding(ScreenState::SHEET_PRESENTED);

        let toggle = presented.clone();
        let body = Column(vec![
            DisplayerView(state.clone()).into(),
            Button("Present Incrementer", move || with_animation(|| toggle.toggle())),
        ]);

        let counter = state.binding(ScreenState::COUNTER);
        let sheet = Sheet(presented.clone(), || {
            IncrementerView(counter, presented.clone()).into()
        })
        .presentation_detent(1.0 / 3.0)
        .interactive_dismiss_disabled(true);

        Column(vec![Frame(height_fraction(&state), body), sheet])
    })
}

/// Read-only view of the counter.
pub fn DisplayerView(state: Store<ScreenState>) -> Component {
    Component::new("DisplayerView", move || {
        let entropy = use_context::<Entropy>();
        Text(format_number(state.get(ScreenState::COUNTER)))
            .font(Font::Title)
            .bold()
            .foreground(tint_color(&entropy))
    })
}

/// Mutates the parent's screen state through bindings only.
pub fn IncrementerView(counter: Binding<i64>, sheet_presented: Binding<bool>) -> Component {
    Component::new("IncrementerView", move || {
        let close = sheet_presented.clone();
        Column(vec![
            Stepper(format!("Counter: {}", counter.get()), counter.clone()),
            Button("Return", move || with_animation(|| close.toggle())),
            AlertPresenterView().into(),
        ])
    })
}

/// Reaches the global state through context.
pub fn AlertPresenterView() -> Component {
    Component::new("AlertPresenterView", || {
        let global = use_context::<Store<GlobalAppState>>();

        let presented = {
            let reader = global.clone();
            let writer = global.clone();
            Binding::new(
                move || reader.get(GlobalAppState::ALERT_PRESENTED),
                move |value| writer.set(GlobalAppState::ALERT_PRESENTED, value),
            )
        };

        let present = global.clone();
        let dismiss = global.clone();
        Alert(
            "Global alert",
            presented,
            vec![AlertButton("Ok", move || {
                dismiss.toggle(GlobalAppState::ALERT_PRESENTED)
            })],
            Button("Present alert", move || {
                present.toggle(GlobalAppState::ALERT_PRESENTED)
            }),
        )
    })
}
